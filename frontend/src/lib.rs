//! 旅行市场前端应用
//!
//! 采用 Context-Driven 的架构：
//! - `context`: 核心库客户端与状态镜像信号
//! - `web::router`: 路由服务，守卫逻辑来自核心库的 `Navigator`
//! - `components`: UI 组件层

mod components {
    pub mod account;
    pub mod home;
    pub mod items;
    pub mod layout;
    pub mod login;
    pub mod products;
    pub mod register;
    pub mod stores;
    pub mod users;
}
mod context;
pub mod web;

use crate::components::account::AccountPage;
use crate::components::home::HomePage;
use crate::components::items::{ItemDetailPage, ItemEditPage, ItemsPage};
use crate::components::layout::Layout;
use crate::components::login::LoginPage;
use crate::components::products::{ProductApplicationsPage, ProductDetailPage};
use crate::components::register::RegisterPage;
use crate::components::stores::{StoreCreatePage, StoreDetailPage, StoresPage};
use crate::components::users::{ProfilePage, UsersPage};
use crate::context::{AppContext, compiled_config};

use leptos::prelude::*;
use travel_market::route::Page;
use web::router::{Link, Router, RouterOutlet};

/// 路由匹配函数：页面标识到视图组件
fn route_matcher(page: Page) -> AnyView {
    match page {
        Page::Login => view! { <LoginPage /> }.into_any(),
        Page::Register => view! { <RegisterPage /> }.into_any(),
        Page::Home => view! { <HomePage /> }.into_any(),
        Page::Items => view! { <ItemsPage /> }.into_any(),
        Page::ItemDetail => view! { <ItemDetailPage /> }.into_any(),
        Page::ItemEdit => view! { <ItemEditPage /> }.into_any(),
        Page::Users => view! { <UsersPage /> }.into_any(),
        Page::Profile => view! { <ProfilePage /> }.into_any(),
        Page::Account => view! { <AccountPage /> }.into_any(),
        Page::Stores => view! { <StoresPage /> }.into_any(),
        Page::StoreCreate => view! { <StoreCreatePage /> }.into_any(),
        Page::StoreDetail => view! { <StoreDetailPage /> }.into_any(),
        Page::ProductDetail => view! { <ProductDetailPage /> }.into_any(),
        Page::ProductApplications => view! { <ProductApplicationsPage /> }.into_any(),
        Page::NotFound => view! {
            <div class="flex items-center justify-center min-h-[60vh]">
                <div class="text-center">
                    <h1 class="text-6xl font-bold text-error">"404"</h1>
                    <p class="text-xl mt-4">"Page not found"</p>
                    <Link to="/" class="btn btn-primary mt-6">"Back to home"</Link>
                </div>
            </div>
        }
        .into_any(),
    }
}

#[component]
pub fn App() -> impl IntoView {
    // 1. 创建应用上下文（恢复 Token，丢弃过期 Token）
    let app = AppContext::new(compiled_config());
    provide_context(app);

    // 2. 会话快照信号注入路由服务
    let auth = app.auth_signal();
    let navigator = app.client().navigator();

    view! {
        <Router navigator=navigator auth=auth>
            <Layout>
                <RouterOutlet matcher=route_matcher />
            </Layout>
        </Router>
    }
}
