//! 路由服务模块 - 核心引擎
//!
//! 封装了 web_sys 的 History API：所有对 window.history 的操作都集中在此模块。
//! 路由解析、守卫与刷新标记由核心库的 `Navigator` 完成，这里只负责把结果
//! 落到浏览器地址栏、文档标题和响应式信号上。

use std::cell::RefCell;

use leptos::prelude::*;
use travel_market::guard::{AfterNavigate, HOME_PATH, REDIRECT_QUERY};
use travel_market::route::{Page, RouteMatch};
use travel_market::{AuthSnapshot, Navigator};
use wasm_bindgen::prelude::*;

/// 获取当前浏览器路径（含查询串）
fn current_full_path() -> String {
    web_sys::window()
        .and_then(|w| {
            let location = w.location();
            let path = location.pathname().ok()?;
            let search = location.search().unwrap_or_default();
            Some(format!("{}{}", path, search))
        })
        .unwrap_or_else(|| HOME_PATH.to_string())
}

fn push_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.push_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

fn replace_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.replace_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

fn set_document_title(title: &str) {
    if let Some(document) = web_sys::window().and_then(|w| w.document()) {
        document.set_title(title);
    }
}

// 只接受站内路径，避免 `?redirect=//evil.com` 这类跳转
fn safe_redirect(target: Option<&str>) -> String {
    match target {
        Some(path) if path.starts_with('/') && !path.starts_with("//") => path.to_string(),
        _ => HOME_PATH.to_string(),
    }
}

/// 切换到不同页面时滚动回顶部
struct ScrollToTop;

impl AfterNavigate for ScrollToTop {
    fn after_navigate(&self, to: &RouteMatch, from: Option<&RouteMatch>) {
        if from.is_some_and(|from| from.name == to.name) {
            return;
        }
        if let Some(window) = web_sys::window() {
            window.scroll_to_with_x_and_y(0.0, 0.0);
        }
    }
}

/// 路由器服务
///
/// 通过 Signal 驱动界面更新；认证状态以信号形式注入，实现与会话的解耦。
#[derive(Clone, Copy)]
pub struct RouterService {
    navigator: StoredValue<RefCell<Navigator>, LocalStorage>,
    current: RwSignal<RouteMatch>,
    auth: Signal<AuthSnapshot>,
}

impl RouterService {
    fn new(mut navigator: Navigator, auth: Signal<AuthSnapshot>) -> Self {
        navigator.add_hook(ScrollToTop);

        // 首次进入也要经过守卫
        let landed = navigator.navigate(&current_full_path(), &auth.get_untracked());
        replace_history_state(&landed.route.full_path());
        set_document_title(&landed.document_title);

        Self {
            navigator: StoredValue::new_local(RefCell::new(navigator)),
            current: RwSignal::new(landed.route),
            auth,
        }
    }

    pub fn current_route(&self) -> ReadSignal<RouteMatch> {
        self.current.read_only()
    }

    /// 导航到完整路径（可带查询串），经过守卫后写入 History
    pub fn navigate(&self, path: &str) {
        self.navigate_with(path, true);
    }

    fn navigate_with(&self, path: &str, use_push: bool) {
        let auth = self.auth.get_untracked();
        let landed = self
            .navigator
            .with_value(|nav| nav.borrow_mut().navigate(path, &auth));

        let target = landed.route.full_path();
        if use_push {
            push_history_state(&target);
        } else {
            replace_history_state(&target);
        }
        set_document_title(&landed.document_title);
        self.current.set(landed.route);
    }

    /// 取走当前页面的刷新标记
    pub fn take_refresh(&self, name: &str) -> bool {
        self.navigator
            .with_value(|nav| nav.borrow_mut().take_refresh(name))
    }

    /// 页面挂载时是否需要拉取数据
    ///
    /// keep-alive 页面在已有缓存且没有刷新标记时复用缓存。
    pub fn needs_load(&self, cached: bool) -> bool {
        let (name, keep_alive) = self
            .current
            .with_untracked(|r| (r.name, r.meta.keep_alive));
        let refresh = self.take_refresh(name);
        refresh || !keep_alive || !cached
    }

    /// 初始化浏览器后退/前进按钮监听
    fn init_popstate_listener(&self) {
        let this = *self;
        let closure = Closure::<dyn Fn()>::new(move || {
            this.navigate_with(&current_full_path(), false);
        });

        if let Some(window) = web_sys::window() {
            let _ = window
                .add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref());
        }

        // 泄漏闭包以保持监听器存活
        closure.forget();
    }

    /// 认证状态变化时重新判定当前页面
    fn setup_auth_redirect(&self) {
        let this = *self;

        Effect::new(move |prev: Option<AuthSnapshot>| {
            let auth = this.auth.get();
            if prev.is_some_and(|prev| prev != auth) {
                this.on_auth_change(&auth);
            }
            auth
        });
    }

    fn on_auth_change(&self, auth: &AuthSnapshot) {
        let current = self.current.get_untracked();

        if auth.has_token && current.page == Page::Login {
            let target = safe_redirect(current.location.query_value(REDIRECT_QUERY));
            tracing::info!(to = %target, "Logged in, leaving login page");
            self.navigate_with(&target, true);
        } else {
            // 登出后受保护页面会被守卫重定向到登录页
            self.navigate_with(&current.full_path(), false);
        }
    }
}

fn provide_router(navigator: Navigator, auth: Signal<AuthSnapshot>) -> RouterService {
    let router = RouterService::new(navigator, auth);

    router.init_popstate_listener();
    router.setup_auth_redirect();

    provide_context(router);
    router
}

/// 从 Context 获取路由服务
pub fn use_router() -> RouterService {
    use_context::<RouterService>()
        .expect("RouterService not found in context. Ensure Router is provided.")
}

// ============================================================================
// UI 组件
// ============================================================================

/// 路由器根组件，应在 App 根部使用
#[component]
pub fn Router(
    navigator: Navigator,
    /// 会话快照信号
    auth: Signal<AuthSnapshot>,
    children: Children,
) -> impl IntoView {
    provide_router(navigator, auth);

    children()
}

/// 路由出口组件
///
/// 根据当前路由渲染对应页面；同一页面参数变化时也会重新渲染。
#[component]
pub fn RouterOutlet(matcher: fn(Page) -> AnyView) -> impl IntoView {
    let router = use_router();

    move || {
        let page = router.current_route().with(|r| r.page);
        matcher(page)
    }
}

#[component]
pub fn Link(
    #[prop(into)] to: String,
    #[prop(optional, into)] class: String,
    children: Children,
) -> impl IntoView {
    let router = use_router();

    let target = to.clone();
    let on_click = move |ev: web_sys::MouseEvent| {
        ev.prevent_default();
        router.navigate(&target);
    };

    view! {
        <a href=to class=class on:click=on_click>
            {children()}
        </a>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_redirect_rejects_external_targets() {
        assert_eq!(safe_redirect(Some("/items/3")), "/items/3");
        assert_eq!(safe_redirect(Some("//evil.com")), "/");
        assert_eq!(safe_redirect(Some("https://evil.com")), "/");
        assert_eq!(safe_redirect(None), "/");
    }
}
