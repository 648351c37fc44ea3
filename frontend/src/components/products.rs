use crate::components::layout::{ErrorAlert, Spinner};
use crate::context::use_app;
use crate::web::router::use_router;
use leptos::ev::SubmitEvent;
use leptos::prelude::*;
use leptos::task::spawn_local;
use travel_market_shared::{
    ApplicationStatus, PRODUCT_DESCRIPTION_MAX, ProductApplication, ProductDraft, ProductStatus,
    ReviewApplicationRequest,
};

/// 商品信息表单，新品申请与修改申请共用
#[component]
pub fn ProductDraftForm(initial: ProductDraft, on_submit: Callback<ProductDraft>) -> impl IntoView {
    let store_id = initial.store_id;
    let (name, set_name) = signal(initial.name);
    let (description, set_description) = signal(initial.description);
    let (price, set_price) = signal(if initial.price > 0.0 {
        format!("{:.2}", initial.price)
    } else {
        String::new()
    });
    let (image_url, set_image_url) = signal(initial.image_url);

    let submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        on_submit.run(ProductDraft {
            store_id,
            name: name.get_untracked(),
            description: description.get_untracked(),
            price: price.get_untracked().trim().parse().unwrap_or(0.0),
            image_url: image_url.get_untracked(),
        });
    };

    let remaining = move || {
        PRODUCT_DESCRIPTION_MAX as i64 - description.with(|d| d.chars().count()) as i64
    };

    view! {
        <form class="card bg-base-100 shadow card-body gap-2" on:submit=submit>
            <input type="text" placeholder="Product name" class="input input-bordered"
                on:input=move |ev| set_name.set(event_target_value(&ev)) prop:value=name />
            <textarea placeholder="Description" class="textarea textarea-bordered"
                on:input=move |ev| set_description.set(event_target_value(&ev)) prop:value=description></textarea>
            <span class="text-xs text-base-content/60" class:text-error=move || remaining() < 0>
                {move || format!("{} characters left", remaining())}
            </span>
            <input type="number" step="0.01" placeholder="Price" class="input input-bordered"
                on:input=move |ev| set_price.set(event_target_value(&ev)) prop:value=price />
            <input type="text" placeholder="Image URL" class="input input-bordered"
                on:input=move |ev| set_image_url.set(event_target_value(&ev)) prop:value=image_url />
            <button class="btn btn-primary">"Submit application"</button>
        </form>
    }
}

// =========================================================
// 商品详情
// =========================================================

#[component]
pub fn ProductDetailPage() -> impl IntoView {
    let app = use_app();
    let router = use_router();
    let id = router.current_route().with_untracked(|r| r.param_id("id"));

    if let Some(id) = id {
        app.run(move |client| async move { client.products.fetch_product(id).await });
    }

    let product = move || app.products.with(|s| s.current_product.clone());

    let on_modify = Callback::new(move |draft: ProductDraft| {
        let Some(id) = id else { return };
        let client = app.client();
        spawn_local(async move {
            if client.products.apply_for_modification(id, draft).await.is_ok() {
                router.navigate("/product-applications");
            }
        });
    });

    let on_take_off = move |_| {
        let Some(id) = id else { return };
        app.run(move |client| async move { client.products.take_off_shelf(id).await });
    };

    let error = Signal::derive(move || app.products.with(|s| s.status.error.clone()));

    view! {
        <div class="max-w-3xl mx-auto space-y-6">
            <ErrorAlert error=error />
            {move || product().map(|p| {
                let on_shelf = p.status == ProductStatus::OnShelf;
                let draft = ProductDraft {
                    store_id: p.store_id,
                    name: p.name.clone(),
                    description: p.description.clone(),
                    price: p.price,
                    image_url: p.image_url.clone(),
                };
                view! {
                    <div class="card bg-base-100 shadow">
                        <figure><img src=p.image_url.clone() class="h-56 w-full object-cover" /></figure>
                        <div class="card-body">
                            <h1 class="card-title">{p.name.clone()}</h1>
                            <p>{p.description.clone()}</p>
                            <p class="text-lg font-bold">{format!("¥{:.2}", p.price)}</p>
                            <span class="badge">{p.status.to_string()}</span>
                            <Show when=move || app.is_merchant() && on_shelf>
                                <div class="card-actions justify-end">
                                    <button class="btn btn-warning btn-sm" on:click=on_take_off>
                                        "Take off shelf"
                                    </button>
                                </div>
                            </Show>
                        </div>
                    </div>
                    <Show when=move || app.is_merchant()>
                        <h2 class="text-xl font-bold">"Request a modification"</h2>
                        <ProductDraftForm initial=draft.clone() on_submit=on_modify />
                    </Show>
                }
            })}
        </div>
    }
}

// =========================================================
// 商品申请
// =========================================================

#[component]
fn ApplicationRow(application: ProductApplication) -> impl IntoView {
    let app = use_app();
    let id = application.id;
    let (comment, set_comment) = signal(String::new());

    let review = move |status: ApplicationStatus| {
        let comment = comment.get_untracked();
        let request = ReviewApplicationRequest {
            status,
            review_comments: (!comment.trim().is_empty()).then_some(comment),
        };
        app.run(move |client| async move { client.products.review_application(id, request).await });
    };

    let pending = application.status == ApplicationStatus::Pending;
    let requested = application
        .requested_product()
        .map(|draft| format!("{} · ¥{:.2}", draft.name, draft.price))
        .unwrap_or_default();
    let store = application
        .store
        .as_ref()
        .map(|s| s.name.clone())
        .unwrap_or_default();

    view! {
        <tr>
            <td>{id}</td>
            <td>{store}</td>
            <td>{application.application_type.to_string()}</td>
            <td>{requested}</td>
            <td><span class="badge">{application.status.to_string()}</span></td>
            <td>{application.review_comments.clone().unwrap_or_default()}</td>
            <td>
                <Show when=move || pending && app.is_admin()>
                    <div class="flex gap-2">
                        <input type="text" placeholder="Comments" class="input input-bordered input-sm"
                            on:input=move |ev| set_comment.set(event_target_value(&ev)) prop:value=comment />
                        <button class="btn btn-success btn-sm" on:click=move |_| review(ApplicationStatus::Approved)>
                            "Approve"
                        </button>
                        <button class="btn btn-error btn-sm" on:click=move |_| review(ApplicationStatus::Rejected)>
                            "Reject"
                        </button>
                    </div>
                </Show>
            </td>
        </tr>
    }
}

/// 申请列表：商户查看自己的申请，管理员审核
#[component]
pub fn ProductApplicationsPage() -> impl IntoView {
    let app = use_app();
    let router = use_router();

    let cached = app.products.with_untracked(|s| !s.applications.is_empty());
    if router.needs_load(cached) {
        app.run(|client| async move { client.products.fetch_applications().await });
    }

    let loading = move || app.products.with(|s| s.status.loading);
    let error = Signal::derive(move || app.products.with(|s| s.status.error.clone()));

    view! {
        <div class="max-w-6xl mx-auto space-y-4">
            <h1 class="text-2xl font-bold">"Product Applications"</h1>
            <ErrorAlert error=error />
            <Show when=move || !loading() fallback=|| view! { <Spinner /> }>
                <div class="overflow-x-auto bg-base-100 rounded-box shadow">
                    <table class="table">
                        <thead>
                            <tr>
                                <th>"ID"</th>
                                <th>"Store"</th>
                                <th>"Type"</th>
                                <th>"Requested"</th>
                                <th>"Status"</th>
                                <th>"Comments"</th>
                                <th></th>
                            </tr>
                        </thead>
                        <tbody>
                            <For
                                each=move || app.products.get().applications
                                key=|a| (a.id, a.status.clone())
                                let:application
                            >
                                <ApplicationRow application=application />
                            </For>
                        </tbody>
                    </table>
                </div>
            </Show>
        </div>
    }
}
