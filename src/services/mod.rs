pub mod accounts;
pub mod items;
pub mod products;
pub mod stores;
pub mod users;

use crate::api::ApiClient;
use crate::error::ApiResult;
use crate::request::HttpClient;
use crate::session::Session;
use std::rc::Rc;
use travel_market_shared::protocol::ApiRequest;

pub use accounts::AccountService;
pub use items::ItemService;
pub use products::ProductService;
pub use stores::StoreService;
pub use users::UserService;

// =========================================================
// 服务上下文
// =========================================================

/// 资源服务共用的依赖：请求管线与会话
///
/// 每次调用都读取会话中的当前 Token，有则附加 Bearer 头。
pub struct ServiceContext<C: HttpClient> {
    api: Rc<ApiClient<C>>,
    session: Rc<Session>,
}

impl<C: HttpClient> Clone for ServiceContext<C> {
    fn clone(&self) -> Self {
        Self {
            api: self.api.clone(),
            session: self.session.clone(),
        }
    }
}

impl<C: HttpClient> ServiceContext<C> {
    pub fn new(api: Rc<ApiClient<C>>, session: Rc<Session>) -> Self {
        Self { api, session }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn api(&self) -> &ApiClient<C> {
        &self.api
    }

    pub(crate) async fn call<R: ApiRequest>(&self, req: &R) -> ApiResult<R::Response> {
        let token = self.session.token();
        self.api.call(req, token.as_deref()).await
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use crate::config::ClientConfig;
    use crate::identity::tests::token_for;
    use crate::request::MockHttpClient;
    use crate::storage::MemoryStorage;

    pub const BASE: &str = "http://localhost:8080";

    pub fn url(path: &str) -> String {
        format!("{}{}", BASE, path)
    }

    /// 未登录的测试上下文
    pub fn anonymous() -> ServiceContext<MockHttpClient> {
        ServiceContext::new(
            Rc::new(ApiClient::new(ClientConfig::default(), MockHttpClient::new())),
            Rc::new(Session::new(MemoryStorage::new())),
        )
    }

    /// 以指定角色登录的测试上下文
    pub fn signed_in(role: &str) -> ServiceContext<MockHttpClient> {
        let ctx = anonymous();
        ctx.session().set_token(Some(token_for(role)));
        ctx
    }

    pub fn transport(ctx: &ServiceContext<MockHttpClient>) -> &MockHttpClient {
        ctx.api().transport()
    }
}
