use crate::components::layout::ErrorAlert;
use crate::context::use_app;
use crate::web::router::{Link, use_router};
use leptos::ev::SubmitEvent;
use leptos::prelude::*;
use leptos::task::spawn_local;
use travel_market::guard::LOGIN_PATH;
use travel_market_shared::{RegisterRequest, Role};

#[component]
pub fn RegisterPage() -> impl IntoView {
    let app = use_app();
    let router = use_router();

    let (user_name, set_user_name) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (email, set_email) = signal(String::new());
    let (tel, set_tel) = signal(String::new());
    let (role, set_role) = signal(Role::Customer);

    let loading = move || app.session.with(|s| s.status.loading);
    let error = Signal::derive(move || app.session.with(|s| s.status.error.clone()));

    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        let data = RegisterRequest {
            user_name: user_name.get_untracked(),
            password: password.get_untracked(),
            user_email: email.get_untracked(),
            user_tel: tel.get_untracked(),
            user_role: role.get_untracked(),
        };
        let client = app.client();
        spawn_local(async move {
            if client.register(data).await.is_ok() {
                router.navigate(LOGIN_PATH);
            }
        });
    };

    let on_role = move |ev: leptos::ev::Event| {
        let role = match event_target_value(&ev).as_str() {
            "MERCHANT" => Role::Merchant,
            _ => Role::Customer,
        };
        set_role.set(role);
    };

    view! {
        <div class="hero min-h-screen bg-base-200">
            <div class="hero-content flex-col w-full max-w-md">
                <h1 class="text-3xl font-bold">"Create an account"</h1>
                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <form class="card-body" on:submit=on_submit>
                        <ErrorAlert error=error />
                        <input
                            type="text"
                            placeholder="Username"
                            class="input input-bordered"
                            on:input=move |ev| set_user_name.set(event_target_value(&ev))
                            prop:value=user_name
                            required
                        />
                        <input
                            type="password"
                            placeholder="Password"
                            class="input input-bordered"
                            on:input=move |ev| set_password.set(event_target_value(&ev))
                            prop:value=password
                            required
                        />
                        <input
                            type="email"
                            placeholder="Email"
                            class="input input-bordered"
                            on:input=move |ev| set_email.set(event_target_value(&ev))
                            prop:value=email
                            required
                        />
                        <input
                            type="tel"
                            placeholder="Phone"
                            class="input input-bordered"
                            on:input=move |ev| set_tel.set(event_target_value(&ev))
                            prop:value=tel
                        />
                        <select class="select select-bordered" on:change=on_role>
                            <option value="CUSTOMER" selected>{Role::Customer.label()}</option>
                            <option value="MERCHANT">{Role::Merchant.label()}</option>
                        </select>
                        <button class="btn btn-primary mt-4" disabled=loading>
                            "Register"
                        </button>
                        <Link to=LOGIN_PATH class="link link-hover text-sm text-center">
                            "Back to login"
                        </Link>
                    </form>
                </div>
            </div>
        </div>
    }
}
