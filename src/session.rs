use crate::api::ApiClient;
use crate::error::{ApiError, ApiResult};
use crate::guard::AuthSnapshot;
use crate::identity::Identity;
use crate::request::HttpClient;
use crate::state::{StateCell, Status, Tracked};
use crate::storage::TokenStorage;
use travel_market_shared::protocol::{Login, Register};
use travel_market_shared::{
    Credentials, RegisterRequest, Role, TOKEN_STORAGE_KEY, USERNAME_STORAGE_KEY,
};

pub const LOGIN_FAILED: &str = "Login failed";
pub const REGISTER_FAILED: &str = "Registration failed";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    pub token: Option<String>,
    pub status: Status,
}

impl Tracked for SessionState {
    fn status(&self) -> &Status {
        &self.status
    }
    fn status_mut(&mut self) -> &mut Status {
        &mut self.status
    }
}

// =========================================================
// 会话 (Session)
// =========================================================

/// 会话存储：持有 Token 并从中推导身份与角色
///
/// 启动时创建一次，以 `Rc<Session>` 共享给路由、服务与状态容器；
/// 只能通过 `logout` 重置。身份信息从不缓存，每次都从当前 Token 解码。
pub struct Session {
    storage: Box<dyn TokenStorage>,
    state: StateCell<SessionState>,
}

impl Session {
    /// 从持久化存储恢复 Token
    pub fn new(storage: impl TokenStorage + 'static) -> Self {
        let token = storage
            .get(TOKEN_STORAGE_KEY)
            .filter(|t| !t.is_empty());
        Self {
            storage: Box::new(storage),
            state: StateCell::new(SessionState {
                token,
                status: Status::default(),
            }),
        }
    }

    pub fn state(&self) -> &StateCell<SessionState> {
        &self.state
    }

    /// 设置或清除 Token；清除时删除存储项而不是写入空字符串
    pub fn set_token(&self, token: Option<String>) {
        let token = token.filter(|t| !t.is_empty());
        match &token {
            Some(t) => self.storage.set(TOKEN_STORAGE_KEY, t),
            None => self.storage.remove(TOKEN_STORAGE_KEY),
        }
        self.state.update(|s| s.token = token);
    }

    pub fn token(&self) -> Option<String> {
        self.state.with(|s| s.token.clone())
    }

    pub fn identity(&self) -> Option<Identity> {
        self.state.with(|s| s.token.as_deref().and_then(Identity::decode))
    }

    pub fn role(&self) -> Option<Role> {
        self.identity().map(|id| id.role)
    }

    pub fn is_admin(&self) -> bool {
        self.role() == Some(Role::Admin)
    }

    pub fn is_merchant(&self) -> bool {
        self.role() == Some(Role::Merchant)
    }

    pub fn is_authenticated(&self) -> bool {
        self.state
            .with(|s| s.token.as_deref().is_some_and(|t| !t.is_empty()))
            && self.identity().is_some()
    }

    /// 导航守卫需要的会话快照
    pub fn auth_snapshot(&self) -> AuthSnapshot {
        AuthSnapshot {
            has_token: self.token().is_some(),
            role: self.role(),
        }
    }

    pub fn logout(&self) {
        tracing::info!("Session cleared");
        self.set_token(None);
    }

    /// 上次成功登录的用户名，用于预填登录表单
    pub fn remembered_username(&self) -> Option<String> {
        self.storage.get(USERNAME_STORAGE_KEY)
    }

    /// 登录：保存返回的 Token 并记住用户名
    pub async fn login<C: HttpClient>(
        &self,
        api: &ApiClient<C>,
        credentials: Credentials,
    ) -> ApiResult<()> {
        let action = self.state.begin();
        let username = credentials.username.clone();

        match api.call(&Login { body: credentials }, None).await {
            Ok(resp) if !resp.token.is_empty() => {
                self.set_token(Some(resp.token));
                self.storage.set(USERNAME_STORAGE_KEY, &username);
                tracing::info!(user = %username, "Logged in");
                Ok(())
            }
            Ok(_) => {
                let err = ApiError::unknown("Login response carried an empty token")
                    .in_op("session.login");
                action.fail(LOGIN_FAILED, &err);
                Err(err)
            }
            Err(err) => {
                let err = err.in_op("session.login");
                action.fail(err.server_message().unwrap_or(LOGIN_FAILED).to_string(), &err);
                Err(err)
            }
        }
    }

    pub async fn register<C: HttpClient>(
        &self,
        api: &ApiClient<C>,
        data: RegisterRequest,
    ) -> ApiResult<()> {
        let action = self.state.begin();

        match api.call(&Register { body: data }, None).await {
            Ok(_) => Ok(()),
            Err(err) => {
                let err = err.in_op("session.register");
                action.fail(
                    err.server_message().unwrap_or(REGISTER_FAILED).to_string(),
                    &err,
                );
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use crate::identity::tests::token_for;
    use crate::request::MockHttpClient;
    use crate::storage::MemoryStorage;
    use serde_json::json;
    use std::rc::Rc;
    use travel_market_shared::protocol::HttpMethod;

    fn api() -> ApiClient<MockHttpClient> {
        ApiClient::new(ClientConfig::default(), MockHttpClient::new())
    }

    #[test]
    fn test_role_projections() {
        let session = Session::new(MemoryStorage::new());

        session.set_token(Some(token_for("ADMIN")));
        assert_eq!(session.role(), Some(Role::Admin));
        assert!(session.is_admin());
        assert!(!session.is_merchant());

        session.set_token(Some(token_for("MERCHANT")));
        assert!(session.is_merchant());
        assert!(!session.is_admin());

        session.set_token(Some(token_for("CUSTOMER")));
        assert_eq!(session.role(), Some(Role::Customer));
        assert!(!session.is_admin());
        assert!(!session.is_merchant());
        assert!(session.is_authenticated());
    }

    #[test]
    fn test_undecodable_token_is_not_authenticated() {
        let session = Session::new(MemoryStorage::new());
        assert!(!session.is_authenticated());

        session.set_token(Some("garbage".to_string()));
        assert!(session.token().is_some());
        assert!(session.identity().is_none());
        assert!(session.role().is_none());
        assert!(!session.is_authenticated());
    }

    #[test]
    fn test_set_then_clear_restores_initial_state() {
        let storage = Rc::new(MemoryStorage::new());
        let session = Session::new(storage.clone());
        let before = session.state().snapshot();

        session.set_token(Some(token_for("CUSTOMER")));
        assert!(storage.contains(TOKEN_STORAGE_KEY));

        session.logout();
        assert_eq!(session.state().snapshot(), before);
        assert!(!storage.contains(TOKEN_STORAGE_KEY));
        assert!(!session.is_authenticated());
    }

    #[test]
    fn test_token_restored_from_storage() {
        let storage = Rc::new(MemoryStorage::new());
        storage.set(TOKEN_STORAGE_KEY, &token_for("MERCHANT"));
        let session = Session::new(storage);
        assert!(session.is_merchant());
    }

    #[tokio::test]
    async fn test_login_persists_token_and_username() {
        let storage = Rc::new(MemoryStorage::new());
        let session = Session::new(storage.clone());
        let api = api();
        let token = token_for("CUSTOMER");
        api.transport().mock_response(
            HttpMethod::Post,
            "http://localhost:8080/auth/login",
            200,
            json!({ "token": token }),
        );

        session
            .login(
                &api,
                Credentials {
                    username: "alice".into(),
                    password: "pw".into(),
                },
            )
            .await
            .unwrap();

        assert_eq!(storage.get(TOKEN_STORAGE_KEY), Some(token));
        assert_eq!(session.remembered_username().as_deref(), Some("alice"));
        assert!(session.is_authenticated());
        assert!(!session.state().loading());
    }

    #[tokio::test]
    async fn test_login_failure_uses_server_message() {
        let session = Session::new(MemoryStorage::new());
        let api = api();
        api.transport().mock_response(
            HttpMethod::Post,
            "http://localhost:8080/auth/login",
            401,
            json!({ "message": "Bad credentials" }),
        );

        let err = session
            .login(
                &api,
                Credentials {
                    username: "alice".into(),
                    password: "wrong".into(),
                },
            )
            .await
            .unwrap_err();

        assert_eq!(err.kind, crate::error::ApiErrorKind::Auth);
        assert_eq!(session.state().error().as_deref(), Some("Bad credentials"));
        assert!(session.token().is_none());
        assert!(session.remembered_username().is_none());
    }

    #[tokio::test]
    async fn test_register_failure_falls_back_to_generic_message() {
        let session = Session::new(MemoryStorage::new());
        let api = api();
        api.transport()
            .mock_transport_error(HttpMethod::Post, "http://localhost:8080/auth/register");

        let data = RegisterRequest {
            user_name: "carol".into(),
            password: "pw".into(),
            user_email: "carol@example.com".into(),
            user_tel: "123".into(),
            user_role: Role::Customer,
        };
        assert!(session.register(&api, data).await.is_err());
        assert_eq!(session.state().error().as_deref(), Some(REGISTER_FAILED));
        assert!(!session.state().loading());
    }
}
