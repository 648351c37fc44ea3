use crate::components::layout::{ErrorAlert, Spinner};
use crate::context::use_app;
use crate::web::router::{Link, use_router};
use leptos::prelude::*;
use travel_market_shared::{DEFAULT_STORE_IMAGE, ServiceCategory, Store};

const CATEGORIES: [ServiceCategory; 4] = [
    ServiceCategory::Hotel,
    ServiceCategory::Transport,
    ServiceCategory::Restaurant,
    ServiceCategory::Ticket,
];

#[component]
fn StoreCard(store: Store) -> impl IntoView {
    let image = store
        .image_url
        .clone()
        .unwrap_or_else(|| DEFAULT_STORE_IMAGE.to_string());
    let categories = store
        .categories
        .iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(" / ");

    view! {
        <div class="card bg-base-100 shadow">
            <figure><img src=image alt=store.store_name.clone() class="h-40 w-full object-cover" /></figure>
            <div class="card-body">
                <h3 class="card-title">{store.store_name.clone()}</h3>
                <p class="text-sm text-base-content/70">{categories}</p>
                <p>{store.description.clone()}</p>
                <div class="card-actions justify-end">
                    <Link to=format!("/store/{}", store.id) class="btn btn-sm btn-primary">"View"</Link>
                </div>
            </div>
        </div>
    }
}

/// 首页：店铺轮播与按类别浏览
#[component]
pub fn HomePage() -> impl IntoView {
    let app = use_app();
    let router = use_router();

    let cached = app.stores.with_untracked(|s| !s.stores.is_empty());
    if router.needs_load(cached) {
        app.run(|client| async move { client.stores.fetch_stores().await });
    }

    let (category, set_category) = signal(Option::<ServiceCategory>::None);

    let current = move || app.stores.with(|s| s.stores.get(s.cursor).cloned());
    let filtered = move || {
        let selected = category.get()?;
        app.stores.track();
        Some(app.client().stores.stores_by_category(&selected))
    };

    let on_prev = move |_| {
        app.client().stores.prev_store();
    };
    let on_next = move |_| {
        app.client().stores.next_store();
    };
    let on_random = move |_| {
        app.client().stores.random_store();
    };

    let loading = move || app.stores.with(|s| s.status.loading);
    let error = Signal::derive(move || app.stores.with(|s| s.status.error.clone()));

    view! {
        <div class="max-w-5xl mx-auto space-y-8">
            <ErrorAlert error=error />
            <Show when=move || !loading() fallback=|| view! { <Spinner /> }>
                <section class="flex items-center gap-4">
                    <button class="btn btn-circle" on:click=on_prev>"❮"</button>
                    <div class="flex-1">
                        {move || match current() {
                            Some(store) => view! { <StoreCard store=store /> }.into_any(),
                            None => view! { <p class="text-center">"No stores yet"</p> }.into_any(),
                        }}
                    </div>
                    <button class="btn btn-circle" on:click=on_next>"❯"</button>
                </section>
                <div class="flex justify-center">
                    <button class="btn btn-sm btn-ghost" on:click=on_random>"Surprise me"</button>
                </div>
            </Show>

            <section class="space-y-4">
                <div class="join">
                    {CATEGORIES
                        .into_iter()
                        .map(|c| {
                            let label = c.to_string();
                            let active = {
                                let c = c.clone();
                                move || category.get().as_ref() == Some(&c)
                            };
                            view! {
                                <button
                                    class="btn join-item"
                                    class:btn-active=active
                                    on:click=move |_| set_category.set(Some(c.clone()))
                                >
                                    {label}
                                </button>
                            }
                        })
                        .collect_view()}
                </div>
                <div class="grid grid-cols-1 md:grid-cols-3 gap-4">
                    {move || {
                        filtered()
                            .unwrap_or_default()
                            .into_iter()
                            .map(|store| view! { <StoreCard store=store /> })
                            .collect_view()
                    }}
                </div>
            </section>
        </div>
    }
}
