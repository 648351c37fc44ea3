use super::ServiceContext;
use crate::error::ApiResult;
use crate::request::HttpClient;
use travel_market_shared::User;
use travel_market_shared::protocol::{GetSelf, GetUser, ListUsers};

pub struct UserService<C: HttpClient> {
    ctx: ServiceContext<C>,
}

impl<C: HttpClient> UserService<C> {
    pub fn new(ctx: ServiceContext<C>) -> Self {
        Self { ctx }
    }

    /// 管理员用户列表
    pub async fn list(&self) -> ApiResult<Vec<User>> {
        tracing::debug!("Fetching all users");
        self.ctx
            .call(&ListUsers {})
            .await
            .map_err(|e| e.in_op("users.list"))
    }

    pub async fn get(&self, id: i64) -> ApiResult<User> {
        tracing::debug!(id, "Fetching user");
        self.ctx
            .call(&GetUser { id })
            .await
            .map_err(|e| e.in_op_with("users.get", id.to_string()))
    }

    pub async fn get_self(&self) -> ApiResult<User> {
        self.ctx
            .call(&GetSelf {})
            .await
            .map_err(|e| e.in_op("users.self"))
    }
}
