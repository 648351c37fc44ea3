pub mod api;
pub mod config;
pub mod containers;
pub mod error;
pub mod guard;
pub mod identity;
pub mod request;
pub mod route;
pub mod services;
pub mod session;
pub mod state;
pub mod storage;
#[cfg(not(target_arch = "wasm32"))]
pub mod telemetry;

use std::rc::Rc;

pub use api::ApiClient;
pub use config::ClientConfig;
pub use error::{ApiError, ApiErrorKind, ApiResult};
pub use guard::{AuthSnapshot, Navigator};
pub use request::HttpClient;
pub use route::RouteTable;
pub use session::Session;
pub use storage::TokenStorage;

use containers::{AccountContainer, ItemContainer, ProductContainer, StoreContainer, UserContainer};
use services::ServiceContext;

// =========================================================
// 客户端组装 (Client Assembly)
// =========================================================

/// 应用的全部客户端状态
///
/// 启动时创建一次：会话与请求管线通过 `Rc` 在各状态容器间共享。
pub struct MarketClient<C: HttpClient> {
    pub config: ClientConfig,
    pub api: Rc<ApiClient<C>>,
    pub session: Rc<Session>,
    pub users: UserContainer<C>,
    pub stores: StoreContainer<C>,
    pub products: ProductContainer<C>,
    pub items: ItemContainer<C>,
    pub accounts: AccountContainer<C>,
}

impl<C: HttpClient> MarketClient<C> {
    pub fn new(config: ClientConfig, transport: C, storage: impl TokenStorage + 'static) -> Self {
        let api = Rc::new(ApiClient::new(config.clone(), transport));
        let session = Rc::new(Session::new(storage));
        let ctx = ServiceContext::new(api.clone(), session.clone());

        Self {
            users: UserContainer::new(ctx.clone()),
            stores: StoreContainer::new(ctx.clone()),
            products: ProductContainer::new(ctx.clone()),
            items: ItemContainer::new(ctx.clone()),
            accounts: AccountContainer::new(ctx),
            config,
            api,
            session,
        }
    }

    /// 丢弃已经过期的 Token
    pub fn discard_expired_token(&self, now: chrono::DateTime<chrono::Utc>) -> bool {
        let expired = self
            .session
            .identity()
            .is_some_and(|identity| identity.is_expired(now));
        if expired {
            tracing::info!("Stored token has expired");
            self.session.logout();
        }
        expired
    }

    /// 基于当前会话构造导航器
    pub fn navigator(&self) -> Navigator {
        Navigator::new(RouteTable::standard(), self.config.title_suffix.clone())
    }

    pub async fn login(&self, credentials: travel_market_shared::Credentials) -> ApiResult<()> {
        self.session.login(&self.api, credentials).await
    }

    pub async fn register(&self, data: travel_market_shared::RegisterRequest) -> ApiResult<()> {
        self.session.register(&self.api, data).await
    }
}
