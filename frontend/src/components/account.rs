use crate::components::layout::ErrorAlert;
use crate::context::use_app;
use leptos::ev::SubmitEvent;
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
pub fn AccountPage() -> impl IntoView {
    let app = use_app();
    app.run(|client| async move { client.accounts.fetch_current_account().await });

    let (amount, set_amount) = signal(String::new());
    let (invalid, set_invalid) = signal(Option::<String>::None);

    let on_top_up = move |ev: SubmitEvent| {
        ev.prevent_default();
        let value = match amount.get_untracked().trim().parse::<f64>() {
            Ok(v) if v > 0.0 => v,
            _ => {
                set_invalid.set(Some("Enter an amount greater than 0".to_string()));
                return;
            }
        };
        set_invalid.set(None);
        let client = app.client();
        spawn_local(async move {
            if client.accounts.top_up(value).await.is_ok() {
                set_amount.set(String::new());
            }
        });
    };

    let loading = move || app.accounts.with(|s| s.status.loading);
    let error = Signal::derive(move || {
        invalid
            .get()
            .or_else(|| app.accounts.with(|s| s.status.error.clone()))
    });

    view! {
        <div class="max-w-xl mx-auto space-y-4">
            <h1 class="text-2xl font-bold">"My Account"</h1>
            <ErrorAlert error=error />
            <div class="stats shadow bg-base-100 w-full">
                <div class="stat">
                    <div class="stat-title">"Balance"</div>
                    <div class="stat-value">
                        {move || format!("{:.2}", app.accounts.with(|s| s.account.account_balance))}
                    </div>
                    <div class="stat-desc">
                        {move || app.accounts.with(|s| s.account.account_status.clone())}
                    </div>
                </div>
            </div>
            <form class="card bg-base-100 shadow card-body gap-2" on:submit=on_top_up>
                <input
                    type="number"
                    step="0.01"
                    min="0"
                    placeholder="Amount"
                    class="input input-bordered"
                    on:input=move |ev| set_amount.set(event_target_value(&ev))
                    prop:value=amount
                />
                <button class="btn btn-primary" disabled=loading>"Top Up"</button>
            </form>
        </div>
    }
}
