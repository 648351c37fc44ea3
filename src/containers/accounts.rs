use super::FETCH_FAILED;
use crate::error::ApiResult;
use crate::request::HttpClient;
use crate::services::{AccountService, ServiceContext};
use crate::state::{StateCell, Status, Tracked};
use travel_market_shared::Account;

pub const TOP_UP_FAILED: &str = "Failed to update account balance";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AccountState {
    pub account: Account,
    pub status: Status,
}

impl Tracked for AccountState {
    fn status(&self) -> &Status {
        &self.status
    }
    fn status_mut(&mut self) -> &mut Status {
        &mut self.status
    }
}

pub struct AccountContainer<C: HttpClient> {
    service: AccountService<C>,
    state: StateCell<AccountState>,
}

impl<C: HttpClient> AccountContainer<C> {
    pub fn new(ctx: ServiceContext<C>) -> Self {
        Self {
            service: AccountService::new(ctx),
            state: StateCell::default(),
        }
    }

    pub fn state(&self) -> &StateCell<AccountState> {
        &self.state
    }

    pub fn snapshot(&self) -> AccountState {
        self.state.snapshot()
    }

    pub async fn fetch_current_account(&self) -> ApiResult<Account> {
        let action = self.state.begin();
        match self.service.current().await {
            Ok(account) => {
                self.state.update(|s| s.account = account.clone());
                Ok(account)
            }
            Err(err) => {
                action.fail(FETCH_FAILED, &err);
                Err(err)
            }
        }
    }

    /// 充值，成功后以服务端返回的账户替换本地账户
    pub async fn top_up(&self, amount: f64) -> ApiResult<Account> {
        let action = self.state.begin();
        match self.service.top_up(amount).await {
            Ok(account) => {
                tracing::info!(amount, balance = account.account_balance, "Account topped up");
                self.state.update(|s| s.account = account.clone());
                Ok(account)
            }
            Err(err) => {
                action.fail(TOP_UP_FAILED, &err);
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

    #[tokio::test]
    async fn test_top_up_replaces_account() {
        let ctx = signed_in("CUSTOMER");
        transport(&ctx).mock_response(
            HttpMethod::Get,
            &url("/account"),
            200,
            json!({"accountBalance": 10.0, "accountStatus": "ACTIVE"}),
        );
        transport(&ctx).mock_response(
            HttpMethod::Post,
            &url("/account/balance"),
            200,
            json!({"accountBalance": 60.5, "accountStatus": "ACTIVE"}),
        );
        let container = AccountContainer::new(ctx.clone());

        container.fetch_current_account().await.unwrap();
        assert_eq!(container.snapshot().account.account_balance, 10.0);

        container.top_up(50.5).await.unwrap();
        assert_eq!(container.snapshot().account.account_balance, 60.5);

        let (_, _, _, body) = transport(&ctx).last_request().unwrap();
        assert_eq!(body.as_deref(), Some(r#"{"amountIncrement":50.5}"#));
    }

    #[tokio::test]
    async fn test_failed_top_up_keeps_balance() {
        let ctx = signed_in("CUSTOMER");
        transport(&ctx).mock_response(
            HttpMethod::Post,
            &url("/account/balance"),
            400,
            json!({"message": "Amount must be positive"}),
        );
        let container = AccountContainer::new(ctx);

        let err = container.top_up(-1.0).await.unwrap_err();
        assert_eq!(err.server_message(), Some("Amount must be positive"));
        let state = container.snapshot();
        assert_eq!(state.account, Account::default());
        assert_eq!(state.status.error.as_deref(), Some(TOP_UP_FAILED));
    }
}
