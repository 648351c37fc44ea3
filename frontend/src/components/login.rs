use crate::components::layout::ErrorAlert;
use crate::context::use_app;
use crate::web::router::Link;
use leptos::ev::SubmitEvent;
use leptos::prelude::*;
use travel_market_shared::Credentials;

#[component]
pub fn LoginPage() -> impl IntoView {
    let app = use_app();

    // 预填上次成功登录的用户名
    let remembered = app
        .client()
        .session
        .remembered_username()
        .unwrap_or_default();
    let (username, set_username) = signal(remembered);
    let (password, set_password) = signal(String::new());

    let loading = move || app.session.with(|s| s.status.loading);
    let error = Signal::derive(move || app.session.with(|s| s.status.error.clone()));

    // 登录成功后由路由服务根据 redirect 参数离开登录页
    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        let credentials = Credentials {
            username: username.get_untracked(),
            password: password.get_untracked(),
        };
        app.run(move |client| async move { client.login(credentials).await });
    };

    view! {
        <div class="hero min-h-screen bg-base-200">
            <div class="hero-content flex-col w-full max-w-md">
                <h1 class="text-3xl font-bold">"Travel Marketplace"</h1>
                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <form class="card-body" on:submit=on_submit>
                        <ErrorAlert error=error />
                        <div class="form-control">
                            <label class="label" for="username">
                                <span class="label-text">"Username"</span>
                            </label>
                            <input
                                id="username"
                                type="text"
                                on:input=move |ev| set_username.set(event_target_value(&ev))
                                prop:value=username
                                class="input input-bordered"
                                required
                            />
                        </div>
                        <div class="form-control">
                            <label class="label" for="password">
                                <span class="label-text">"Password"</span>
                            </label>
                            <input
                                id="password"
                                type="password"
                                on:input=move |ev| set_password.set(event_target_value(&ev))
                                prop:value=password
                                class="input input-bordered"
                                required
                            />
                        </div>
                        <div class="form-control mt-6">
                            <button class="btn btn-primary" disabled=loading>
                                {move || if loading() { "Signing in..." } else { "Login" }}
                            </button>
                        </div>
                        <Link to="/register" class="link link-hover text-sm text-center">
                            "No account yet? Register"
                        </Link>
                    </form>
                </div>
            </div>
        </div>
    }
}
