//! 应用上下文
//!
//! 核心库的状态容器是单线程的 `StateCell`，这里把它们镜像到 Leptos 信号里，
//! 组件只读信号，写操作一律经由容器的异步动作完成。

use std::rc::Rc;

use leptos::prelude::*;
use leptos::task::spawn_local;
use travel_market::containers::{AccountState, ItemState, ProductState, StoreState, UserState};
use travel_market::session::SessionState;
use travel_market::state::StateCell;
use travel_market::config::{ENV_BASE_URL, ENV_TIMEOUT_MS, ENV_TITLE_SUFFIX};
use travel_market::{AuthSnapshot, ClientConfig, MarketClient};

use crate::web::{BrowserStorage, FetchHttpClient};

pub type Client = MarketClient<FetchHttpClient>;

/// 编译期注入的配置，如 `TRAVEL_API_BASE_URL=https://api.example.com trunk build`
pub fn compiled_config() -> ClientConfig {
    ClientConfig::from_lookup(|key| {
        let value = match key {
            ENV_BASE_URL => option_env!("TRAVEL_API_BASE_URL"),
            ENV_TIMEOUT_MS => option_env!("TRAVEL_API_TIMEOUT_MS"),
            ENV_TITLE_SUFFIX => option_env!("TRAVEL_TITLE_SUFFIX"),
            _ => None,
        };
        value.map(str::to_string)
    })
}

// 订阅后每次 update 都把快照写进信号
fn mirror<S>(cell: &StateCell<S>) -> RwSignal<S>
where
    S: Clone + Send + Sync + 'static,
{
    let signal = RwSignal::new(cell.snapshot());
    cell.subscribe(move |state: &S| signal.set(state.clone()));
    signal
}

/// 全局上下文，通过 Context 在组件间共享
#[derive(Clone, Copy)]
pub struct AppContext {
    client: StoredValue<Rc<Client>, LocalStorage>,
    pub session: RwSignal<SessionState>,
    pub users: RwSignal<UserState>,
    pub stores: RwSignal<StoreState>,
    pub products: RwSignal<ProductState>,
    pub items: RwSignal<ItemState>,
    pub accounts: RwSignal<AccountState>,
}

impl AppContext {
    pub fn new(config: ClientConfig) -> Self {
        let client = MarketClient::new(config, FetchHttpClient, BrowserStorage);
        client.discard_expired_token(chrono::Utc::now());

        Self {
            session: mirror(client.session.state()),
            users: mirror(client.users.state()),
            stores: mirror(client.stores.state()),
            products: mirror(client.products.state()),
            items: mirror(client.items.state()),
            accounts: mirror(client.accounts.state()),
            client: StoredValue::new_local(Rc::new(client)),
        }
    }

    pub fn client(&self) -> Rc<Client> {
        self.client.get_value()
    }

    /// 会话快照信号，注入给路由服务
    ///
    /// 依赖 `session` 信号，Token 变化时重新计算。
    pub fn auth_signal(&self) -> Signal<AuthSnapshot> {
        let session = self.session;
        let client = self.client;
        Signal::derive(move || {
            session.track();
            client.with_value(|c| c.session.auth_snapshot())
        })
    }

    pub fn is_admin(&self) -> bool {
        self.session.track();
        self.client.with_value(|c| c.session.is_admin())
    }

    pub fn is_merchant(&self) -> bool {
        self.session.track();
        self.client.with_value(|c| c.session.is_merchant())
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.track();
        self.client.with_value(|c| c.session.is_authenticated())
    }

    /// 注销；路由服务监听会话信号，自动把受保护页面重定向到登录页
    pub fn logout(&self) {
        self.client.with_value(|c| c.session.logout());
    }

    /// 在后台执行一个容器动作，错误已由容器写入状态
    pub fn run<F, Fut, T>(&self, action: F)
    where
        F: FnOnce(Rc<Client>) -> Fut + 'static,
        Fut: Future<Output = travel_market::ApiResult<T>> + 'static,
    {
        let client = self.client();
        spawn_local(async move {
            let _ = action(client).await;
        });
    }
}

/// 从 Context 获取应用上下文
pub fn use_app() -> AppContext {
    use_context::<AppContext>().expect("AppContext should be provided")
}
