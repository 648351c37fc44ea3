use super::ServiceContext;
use crate::error::ApiResult;
use crate::request::HttpClient;
use travel_market_shared::protocol::{GetAccount, TopUp};
use travel_market_shared::{Account, BalanceUpdateRequest};

pub struct AccountService<C: HttpClient> {
    ctx: ServiceContext<C>,
}

impl<C: HttpClient> AccountService<C> {
    pub fn new(ctx: ServiceContext<C>) -> Self {
        Self { ctx }
    }

    /// 当前用户的账户
    pub async fn current(&self) -> ApiResult<Account> {
        self.ctx
            .call(&GetAccount {})
            .await
            .map_err(|e| e.in_op("accounts.current"))
    }

    pub async fn top_up(&self, amount: f64) -> ApiResult<Account> {
        let body = BalanceUpdateRequest {
            amount_increment: amount,
        };
        self.ctx
            .call(&TopUp { body })
            .await
            .map_err(|e| e.in_op_with("accounts.top_up", amount.to_string()))
    }
}
