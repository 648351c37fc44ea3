use crate::context::use_app;
use crate::web::router::{Link, use_router};
use leptos::prelude::*;
use travel_market::guard::LOGIN_PATH;

/// 错误提示条，消息为空时不渲染
#[component]
pub fn ErrorAlert(#[prop(into)] error: Signal<Option<String>>) -> impl IntoView {
    view! {
        <Show when=move || error.with(Option::is_some)>
            <div role="alert" class="alert alert-error text-sm py-2">
                <span>{move || error.get().unwrap_or_default()}</span>
            </div>
        </Show>
    }
}

#[component]
pub fn Spinner() -> impl IntoView {
    view! {
        <div class="flex justify-center py-10">
            <span class="loading loading-spinner loading-lg text-primary"></span>
        </div>
    }
}

#[component]
fn Sidebar() -> impl IntoView {
    let app = use_app();
    let router = use_router();

    let on_logout = move |_| {
        app.logout();
        router.navigate(LOGIN_PATH);
    };

    view! {
        <aside class="w-56 min-h-screen bg-base-100 shadow-lg p-4 space-y-2">
            <h2 class="text-xl font-bold mb-4">"Travel"</h2>
            <ul class="menu">
                <li><Link to="/">"Home"</Link></li>
                <li><Link to="/stores">"Stores"</Link></li>
                <li><Link to="/items">"Tasks"</Link></li>
                <Show when=move || app.is_authenticated()>
                    <li><Link to="/product-applications">"Product Applications"</Link></li>
                    <li><Link to="/account">"My Account"</Link></li>
                </Show>
                <Show when=move || app.is_admin()>
                    <li><Link to="/users">"User Management"</Link></li>
                </Show>
                <Show when=move || app.is_authenticated() && !app.is_admin()>
                    <li><Link to="/profile">"Profile"</Link></li>
                </Show>
            </ul>
            <div class="divider"></div>
            <Show
                when=move || app.is_authenticated()
                fallback=|| view! { <Link to=LOGIN_PATH class="btn btn-primary btn-sm w-full">"Login"</Link> }
            >
                <button class="btn btn-ghost btn-sm w-full" on:click=on_logout>
                    "Logout"
                </button>
            </Show>
        </aside>
    }
}

/// 页面框架：路由元数据要求时隐藏侧边栏
#[component]
pub fn Layout(children: Children) -> impl IntoView {
    let router = use_router();
    let hide_sidebar = move || router.current_route().with(|r| r.meta.hide_sidebar);

    view! {
        <div class="min-h-screen bg-base-200 flex font-sans">
            <Show when=move || !hide_sidebar()>
                <Sidebar />
            </Show>
            <main class="flex-1 p-4 md:p-8">{children()}</main>
        </div>
    }
}
