use super::{FETCH_FAILED, upsert};
use crate::error::ApiResult;
use crate::request::HttpClient;
use crate::services::{ServiceContext, UserService};
use crate::state::{StateCell, Status, Tracked};
use travel_market_shared::User;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserState {
    pub users: Vec<User>,
    /// 当前登录用户
    pub current: Option<User>,
    pub status: Status,
}

impl Tracked for UserState {
    fn status(&self) -> &Status {
        &self.status
    }
    fn status_mut(&mut self) -> &mut Status {
        &mut self.status
    }
}

pub struct UserContainer<C: HttpClient> {
    service: UserService<C>,
    state: StateCell<UserState>,
}

impl<C: HttpClient> UserContainer<C> {
    pub fn new(ctx: ServiceContext<C>) -> Self {
        Self {
            service: UserService::new(ctx),
            state: StateCell::default(),
        }
    }

    pub fn state(&self) -> &StateCell<UserState> {
        &self.state
    }

    pub fn snapshot(&self) -> UserState {
        self.state.snapshot()
    }

    pub async fn fetch_users(&self) -> ApiResult<()> {
        let action = self.state.begin();
        match self.service.list().await {
            Ok(users) => {
                self.state.update(|s| s.users = users);
                Ok(())
            }
            Err(err) => {
                action.fail(FETCH_FAILED, &err);
                self.state.update(|s| s.users.clear());
                Err(err)
            }
        }
    }

    pub async fn fetch_user(&self, id: i64) -> ApiResult<User> {
        let action = self.state.begin();
        match self.service.get(id).await {
            Ok(user) => {
                self.state.update(|s| upsert(&mut s.users, user.clone()));
                Ok(user)
            }
            Err(err) => {
                action.fail(FETCH_FAILED, &err);
                Err(err)
            }
        }
    }

    pub async fn fetch_self(&self) -> ApiResult<User> {
        let action = self.state.begin();
        match self.service.get_self().await {
            Ok(user) => {
                self.state.update(|s| s.current = Some(user.clone()));
                Ok(user)
            }
            Err(err) => {
                action.fail(FETCH_FAILED, &err);
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::{signed_in, transport, url};
    use serde_json::json;
    use travel_market_shared::protocol::HttpMethod;

    fn user(id: i64, name: &str) -> serde_json::Value {
        json!({
            "userId": id,
            "userName": name,
            "userRole": "CUSTOMER",
            "userEmail": "",
            "userTel": ""
        })
    }

    #[tokio::test]
    async fn test_fetch_users_and_upsert() {
        let ctx = signed_in("ADMIN");
        transport(&ctx).mock_response(
            HttpMethod::Get,
            &url("/admin/users"),
            200,
            json!([user(1, "alice"), user(2, "bob")]),
        );
        transport(&ctx).mock_response(HttpMethod::Get, &url("/users/2"), 200, user(2, "bobby"));
        transport(&ctx).mock_response(HttpMethod::Get, &url("/users/3"), 200, user(3, "carol"));
        let container = UserContainer::new(ctx);

        container.fetch_users().await.unwrap();
        container.fetch_user(2).await.unwrap();
        container.fetch_user(3).await.unwrap();

        let names: Vec<String> = container
            .snapshot()
            .users
            .into_iter()
            .map(|u| u.user_name)
            .collect();
        assert_eq!(names, vec!["alice", "bobby", "carol"]);
    }

    #[tokio::test]
    async fn test_failed_listing_clears_users() {
        let ctx = signed_in("CUSTOMER");
        transport(&ctx).mock_response(
            HttpMethod::Get,
            &url("/admin/users"),
            200,
            json!([user(1, "a")]),
        );
        let container = UserContainer::new(ctx.clone());
        container.fetch_users().await.unwrap();

        transport(&ctx).mock_response(
            HttpMethod::Get,
            &url("/admin/users"),
            403,
            json!({"message": "Forbidden"}),
        );
        assert!(container.fetch_users().await.is_err());

        let state = container.snapshot();
        assert!(state.users.is_empty());
        assert_eq!(state.status.error.as_deref(), Some(FETCH_FAILED));
        assert!(!state.status.loading);
    }

    #[tokio::test]
    async fn test_fetch_self_sets_current() {
        let ctx = signed_in("MERCHANT");
        transport(&ctx).mock_response(HttpMethod::Get, &url("/users/self"), 200, user(9, "me"));
        let container = UserContainer::new(ctx);

        container.fetch_self().await.unwrap();
        assert_eq!(container.snapshot().current.unwrap().user_id, 9);
    }
}
