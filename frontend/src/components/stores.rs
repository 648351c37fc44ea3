use crate::components::layout::{ErrorAlert, Spinner};
use crate::components::products::ProductDraftForm;
use crate::context::use_app;
use crate::web::router::{Link, use_router};
use leptos::ev::SubmitEvent;
use leptos::prelude::*;
use leptos::task::spawn_local;
use travel_market_shared::{
    CreateStoreRequest, DEFAULT_STORE_IMAGE, ProductDraft, ServiceCategory, Store,
};

const CATEGORIES: [ServiceCategory; 4] = [
    ServiceCategory::Hotel,
    ServiceCategory::Transport,
    ServiceCategory::Restaurant,
    ServiceCategory::Ticket,
];

// =========================================================
// 店铺列表
// =========================================================

/// 商户看到自己的店铺，其余角色看到全部店铺
#[component]
pub fn StoresPage() -> impl IntoView {
    let app = use_app();
    let router = use_router();

    let cached = app.stores.with_untracked(|s| !s.stores.is_empty());
    if router.needs_load(cached) {
        if app.is_merchant() {
            app.run(|client| async move { client.stores.fetch_merchant_stores().await });
        } else {
            app.run(|client| async move { client.stores.fetch_stores().await });
        }
    }

    let loading = move || app.stores.with(|s| s.status.loading);
    let error = Signal::derive(move || app.stores.with(|s| s.status.error.clone()));

    view! {
        <div class="max-w-5xl mx-auto space-y-4">
            <div class="flex justify-between items-center">
                <h1 class="text-2xl font-bold">"Stores"</h1>
                <Show when=move || app.is_merchant()>
                    <Link to="/stores/new" class="btn btn-primary btn-sm">"Open a Store"</Link>
                </Show>
            </div>
            <ErrorAlert error=error />
            <Show when=move || !loading() fallback=|| view! { <Spinner /> }>
                <div class="grid grid-cols-1 md:grid-cols-2 gap-4">
                    <For each=move || app.stores.get().stores key=|s| s.id let:store>
                        <StoreRow store=store />
                    </For>
                </div>
            </Show>
        </div>
    }
}

#[component]
fn StoreRow(store: Store) -> impl IntoView {
    let image = store
        .image_url
        .clone()
        .unwrap_or_else(|| DEFAULT_STORE_IMAGE.to_string());
    view! {
        <div class="card card-side bg-base-100 shadow">
            <figure><img src=image class="w-32 h-full object-cover" /></figure>
            <div class="card-body">
                <h2 class="card-title">{store.store_name.clone()}</h2>
                <p class="text-sm">{store.registration_address.clone()}</p>
                <div class="card-actions justify-end">
                    <Link to=format!("/store/{}", store.id) class="btn btn-sm">"Details"</Link>
                </div>
            </div>
        </div>
    }
}

// =========================================================
// 开店
// =========================================================

#[component]
pub fn StoreCreatePage() -> impl IntoView {
    let app = use_app();
    let router = use_router();

    let (name, set_name) = signal(String::new());
    let (description, set_description) = signal(String::new());
    let (owner_id_number, set_owner_id_number) = signal(String::new());
    let (address, set_address) = signal(String::new());
    let (capital, set_capital) = signal(String::new());
    let (date, set_date) = signal(String::new());
    let categories = RwSignal::new(Vec::<ServiceCategory>::new());

    let toggle = move |category: ServiceCategory| {
        categories.update(|list| {
            if let Some(pos) = list.iter().position(|c| *c == category) {
                list.remove(pos);
            } else {
                list.push(category);
            }
        });
    };

    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        let data = CreateStoreRequest {
            store_name: name.get_untracked(),
            categories: categories.get_untracked(),
            owner_id_number: owner_id_number.get_untracked(),
            description: description.get_untracked(),
            registration_address: address.get_untracked(),
            registered_capital: capital.get_untracked().trim().parse().unwrap_or(0.0),
            registration_date: date.get_untracked(),
        };
        let client = app.client();
        spawn_local(async move {
            if client.stores.create_store(data).await.is_ok() {
                router.navigate("/stores");
            }
        });
    };

    let loading = move || app.stores.with(|s| s.status.loading);
    let error = Signal::derive(move || app.stores.with(|s| s.status.error.clone()));

    view! {
        <form class="max-w-2xl mx-auto card bg-base-100 shadow card-body gap-2" on:submit=on_submit>
            <h1 class="card-title">"Open a Store"</h1>
            <ErrorAlert error=error />
            <input type="text" placeholder="Store name" class="input input-bordered" required
                on:input=move |ev| set_name.set(event_target_value(&ev)) prop:value=name />
            <div class="flex flex-wrap gap-4">
                {CATEGORIES
                    .into_iter()
                    .map(|c| {
                        let label = c.to_string();
                        view! {
                            <label class="label cursor-pointer gap-2">
                                <input type="checkbox" class="checkbox" on:change=move |_| toggle(c.clone()) />
                                <span class="label-text">{label}</span>
                            </label>
                        }
                    })
                    .collect_view()}
            </div>
            <input type="text" placeholder="Owner ID number" class="input input-bordered" required
                on:input=move |ev| set_owner_id_number.set(event_target_value(&ev)) prop:value=owner_id_number />
            <input type="text" placeholder="Registration address" class="input input-bordered"
                on:input=move |ev| set_address.set(event_target_value(&ev)) prop:value=address />
            <input type="number" step="0.01" placeholder="Registered capital" class="input input-bordered"
                on:input=move |ev| set_capital.set(event_target_value(&ev)) prop:value=capital />
            <input type="date" class="input input-bordered"
                on:input=move |ev| set_date.set(event_target_value(&ev)) prop:value=date />
            <textarea placeholder="Description" class="textarea textarea-bordered"
                on:input=move |ev| set_description.set(event_target_value(&ev)) prop:value=description></textarea>
            <button class="btn btn-primary" disabled=loading>"Submit"</button>
        </form>
    }
}

// =========================================================
// 店铺详情
// =========================================================

#[component]
pub fn StoreDetailPage() -> impl IntoView {
    let app = use_app();
    let router = use_router();
    let id = router.current_route().with_untracked(|r| r.param_id("id"));
    let store = RwSignal::new(Option::<Store>::None);

    if let Some(id) = id {
        let client = app.client();
        spawn_local(async move {
            if let Ok(found) = client.stores.fetch_store(id).await {
                store.set(Some(found));
            }
            let _ = client.products.fetch_store_products(id).await;
        });
    }

    let on_apply = Callback::new(move |draft: ProductDraft| {
        app.run(move |client| async move { client.products.apply_for_new_product(draft).await });
    });

    let error = Signal::derive(move || {
        app.stores
            .with(|s| s.status.error.clone())
            .or_else(|| app.products.with(|s| s.status.error.clone()))
    });

    view! {
        <div class="max-w-5xl mx-auto space-y-6">
            <ErrorAlert error=error />
            {move || store.get().map(|store| view! {
                <div class="card bg-base-100 shadow card-body">
                    <h1 class="card-title">{store.store_name.clone()}</h1>
                    <p>{store.description.clone()}</p>
                    <p class="text-sm">{store.registration_address.clone()}</p>
                </div>
            })}

            <h2 class="text-xl font-bold">"Products"</h2>
            <Show when=move || !app.products.with(|s| s.status.loading) fallback=|| view! { <Spinner /> }>
                <div class="grid grid-cols-1 md:grid-cols-3 gap-4">
                    <For each=move || app.products.get().products key=|p| (p.id, p.status.clone()) let:product>
                        <div class="card bg-base-100 shadow card-body">
                            <h3 class="card-title">{product.name.clone()}</h3>
                            <p>{format!("¥{:.2}", product.price)}</p>
                            <span class="badge">{product.status.to_string()}</span>
                            <Link to=format!("/products/{}", product.id) class="btn btn-sm">"View"</Link>
                        </div>
                    </For>
                </div>
            </Show>

            <Show when=move || app.is_merchant() && id.is_some()>
                <h2 class="text-xl font-bold">"Apply for a new product"</h2>
                <ProductDraftForm
                    initial=ProductDraft {
                        store_id: id.unwrap_or_default(),
                        name: String::new(),
                        description: String::new(),
                        price: 0.0,
                        image_url: String::new(),
                    }
                    on_submit=on_apply
                />
            </Show>
        </div>
    }
}
