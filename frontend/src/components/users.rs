use crate::components::layout::{ErrorAlert, Spinner};
use crate::context::use_app;
use crate::web::router::use_router;
use leptos::prelude::*;

/// 用户管理（仅管理员）
#[component]
pub fn UsersPage() -> impl IntoView {
    let app = use_app();
    let router = use_router();

    let cached = app.users.with_untracked(|s| !s.users.is_empty());
    if router.needs_load(cached) {
        app.run(|client| async move { client.users.fetch_users().await });
    }

    let loading = move || app.users.with(|s| s.status.loading);
    let error = Signal::derive(move || app.users.with(|s| s.status.error.clone()));

    view! {
        <div class="max-w-5xl mx-auto space-y-4">
            <h1 class="text-2xl font-bold">"User Management"</h1>
            <ErrorAlert error=error />
            <Show when=move || !loading() fallback=|| view! { <Spinner /> }>
                <div class="overflow-x-auto bg-base-100 rounded-box shadow">
                    <table class="table">
                        <thead>
                            <tr>
                                <th>"ID"</th>
                                <th>"Username"</th>
                                <th>"Role"</th>
                                <th>"Email"</th>
                                <th>"Phone"</th>
                            </tr>
                        </thead>
                        <tbody>
                            <For each=move || app.users.get().users key=|u| u.user_id let:user>
                                <tr>
                                    <td>{user.user_id}</td>
                                    <td>{user.user_name.clone()}</td>
                                    <td>{user.role_label()}</td>
                                    <td>{user.user_email.clone()}</td>
                                    <td>{user.user_tel.clone()}</td>
                                </tr>
                            </For>
                        </tbody>
                    </table>
                </div>
            </Show>
        </div>
    }
}

#[component]
pub fn ProfilePage() -> impl IntoView {
    let app = use_app();
    app.run(|client| async move { client.users.fetch_self().await });

    let error = Signal::derive(move || app.users.with(|s| s.status.error.clone()));

    view! {
        <div class="max-w-xl mx-auto space-y-4">
            <ErrorAlert error=error />
            {move || app.users.get().current.map(|user| view! {
                <div class="card bg-base-100 shadow card-body">
                    <h1 class="card-title">{user.user_name.clone()}</h1>
                    <p><span class="badge badge-primary">{user.role_label()}</span></p>
                    <p>"Email: " {user.user_email.clone()}</p>
                    <p>"Phone: " {user.user_tel.clone()}</p>
                </div>
            })}
        </div>
    }
}
