use crate::components::layout::{ErrorAlert, Spinner};
use crate::context::use_app;
use crate::web::router::{Link, use_router};
use leptos::ev::SubmitEvent;
use leptos::prelude::*;
use leptos::task::spawn_local;
use travel_market_shared::{CreateItemRequest, Item, UpdateItemRequest};

fn route_id() -> Option<i64> {
    use_router()
        .current_route()
        .with_untracked(|r| r.param_id("id"))
}

// =========================================================
// 任务列表
// =========================================================

#[component]
pub fn ItemsPage() -> impl IntoView {
    let app = use_app();
    let router = use_router();

    let cached = app.items.with_untracked(|s| !s.items.is_empty());
    if router.needs_load(cached) {
        app.run(|client| async move { client.items.fetch_items().await });
    }

    let (title, set_title) = signal(String::new());
    let (description, set_description) = signal(String::new());

    let on_create = move |ev: SubmitEvent| {
        ev.prevent_default();
        let data = CreateItemRequest {
            title: title.get_untracked(),
            description: description.get_untracked(),
        };
        let client = app.client();
        spawn_local(async move {
            if client.items.create_item(data).await.is_ok() {
                set_title.set(String::new());
                set_description.set(String::new());
            }
        });
    };

    let on_delete = move |id: i64| {
        app.run(move |client| async move { client.items.delete_item(id).await });
    };

    let loading = move || app.items.with(|s| s.status.loading);
    let error = Signal::derive(move || app.items.with(|s| s.status.error.clone()));

    view! {
        <div class="max-w-4xl mx-auto space-y-6">
            <h1 class="text-2xl font-bold">"Tasks"</h1>
            <ErrorAlert error=error />

            <form class="card bg-base-100 shadow card-body gap-2" on:submit=on_create>
                <input
                    type="text"
                    placeholder="Title"
                    class="input input-bordered"
                    on:input=move |ev| set_title.set(event_target_value(&ev))
                    prop:value=title
                    required
                />
                <textarea
                    placeholder="Description"
                    class="textarea textarea-bordered"
                    on:input=move |ev| set_description.set(event_target_value(&ev))
                    prop:value=description
                ></textarea>
                <button class="btn btn-primary" disabled=loading>"Add Task"</button>
            </form>

            <Show when=move || !loading() fallback=|| view! { <Spinner /> }>
                <ul class="space-y-2">
                    <For
                        each=move || app.items.get().items
                        key=|item| (item.id, item.updated_at.clone())
                        let:item
                    >
                        {
                            let id = item.id;
                            view! {
                                <li class="card bg-base-100 shadow p-4 flex flex-row justify-between items-center">
                                    <Link to=format!("/items/{}", id) class="font-semibold">
                                        {item.title.clone()}
                                    </Link>
                                    <div class="flex gap-2">
                                        <Link to=format!("/items/{}/edit", id) class="btn btn-sm">"Edit"</Link>
                                        <button class="btn btn-sm btn-error" on:click=move |_| on_delete(id)>
                                            "Delete"
                                        </button>
                                    </div>
                                </li>
                            }
                        }
                    </For>
                </ul>
            </Show>
        </div>
    }
}

// =========================================================
// 任务详情 / 编辑
// =========================================================

#[component]
pub fn ItemDetailPage() -> impl IntoView {
    let app = use_app();
    let item = RwSignal::new(Option::<Item>::None);

    if let Some(id) = route_id() {
        let client = app.client();
        spawn_local(async move {
            if let Ok(found) = client.items.fetch_item(id).await {
                item.set(Some(found));
            }
        });
    }

    let error = Signal::derive(move || app.items.with(|s| s.status.error.clone()));

    view! {
        <div class="max-w-3xl mx-auto space-y-4">
            <ErrorAlert error=error />
            {move || item.get().map(|item| view! {
                <div class="card bg-base-100 shadow card-body">
                    <h1 class="card-title">{item.title.clone()}</h1>
                    <p>{item.description.clone()}</p>
                    <p class="text-sm text-base-content/60">
                        "Created " {item.created_at.clone()} " · Updated " {item.updated_at.clone()}
                    </p>
                    <div class="card-actions justify-end">
                        <Link to=format!("/items/{}/edit", item.id) class="btn btn-primary btn-sm">"Edit"</Link>
                        <Link to="/items" class="btn btn-sm">"Back"</Link>
                    </div>
                </div>
            })}
        </div>
    }
}

/// 编辑任务，保存后回到列表（列表页因此带上刷新标记）
#[component]
pub fn ItemEditPage() -> impl IntoView {
    let app = use_app();
    let router = use_router();
    let id = route_id();

    let (title, set_title) = signal(String::new());
    let (description, set_description) = signal(String::new());

    if let Some(id) = id {
        let client = app.client();
        spawn_local(async move {
            if let Ok(item) = client.items.fetch_item(id).await {
                set_title.set(item.title);
                set_description.set(item.description);
            }
        });
    }

    let on_save = move |ev: SubmitEvent| {
        ev.prevent_default();
        let Some(id) = id else { return };
        let data = UpdateItemRequest {
            title: Some(title.get_untracked()),
            description: Some(description.get_untracked()),
        };
        let client = app.client();
        spawn_local(async move {
            if client.items.update_item(id, data).await.is_ok() {
                router.navigate("/items");
            }
        });
    };

    let loading = move || app.items.with(|s| s.status.loading);
    let error = Signal::derive(move || app.items.with(|s| s.status.error.clone()));

    view! {
        <form class="max-w-3xl mx-auto card bg-base-100 shadow card-body gap-2" on:submit=on_save>
            <h1 class="card-title">"Edit Task"</h1>
            <ErrorAlert error=error />
            <input
                type="text"
                class="input input-bordered"
                on:input=move |ev| set_title.set(event_target_value(&ev))
                prop:value=title
                required
            />
            <textarea
                class="textarea textarea-bordered"
                on:input=move |ev| set_description.set(event_target_value(&ev))
                prop:value=description
            ></textarea>
            <button class="btn btn-primary" disabled=loading>"Save"</button>
        </form>
    }
}
