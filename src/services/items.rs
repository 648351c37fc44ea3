use super::ServiceContext;
use crate::error::ApiResult;
use crate::request::HttpClient;
use travel_market_shared::protocol::{CreateItem, DeleteItem, GetItem, ListItems, UpdateItem};
use travel_market_shared::{CreateItemRequest, Item, UpdateItemRequest};

pub struct ItemService<C: HttpClient> {
    ctx: ServiceContext<C>,
}

impl<C: HttpClient> ItemService<C> {
    pub fn new(ctx: ServiceContext<C>) -> Self {
        Self { ctx }
    }

    pub async fn list(&self) -> ApiResult<Vec<Item>> {
        tracing::debug!("Fetching all items");
        self.ctx
            .call(&ListItems {})
            .await
            .map_err(|e| e.in_op("items.list"))
    }

    pub async fn get(&self, id: i64) -> ApiResult<Item> {
        self.ctx
            .call(&GetItem { id })
            .await
            .map_err(|e| e.in_op_with("items.get", id.to_string()))
    }

    pub async fn create(&self, data: CreateItemRequest) -> ApiResult<Item> {
        self.ctx
            .call(&CreateItem { body: data })
            .await
            .map_err(|e| e.in_op("items.create"))
    }

    pub async fn update(&self, id: i64, data: UpdateItemRequest) -> ApiResult<Item> {
        self.ctx
            .call(&UpdateItem { id, body: data })
            .await
            .map_err(|e| e.in_op_with("items.update", id.to_string()))
    }

    pub async fn delete(&self, id: i64) -> ApiResult<()> {
        self.ctx
            .call(&DeleteItem { id })
            .await
            .map_err(|e| e.in_op_with("items.delete", id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::{anonymous, transport, url};
    use serde_json::json;
    use travel_market_shared::protocol::HttpMethod;

    #[tokio::test]
    async fn test_partial_update_omits_missing_fields() {
        let ctx = anonymous();
        transport(&ctx).mock_response(
            HttpMethod::Put,
            &url("/items/5"),
            200,
            json!({
                "id": 5,
                "title": "New",
                "description": "old",
                "created_at": "c",
                "updated_at": "u"
            }),
        );
        let service = ItemService::new(ctx.clone());

        let item = service
            .update(
                5,
                UpdateItemRequest {
                    title: Some("New".into()),
                    description: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(item.title, "New");

        let (_, _, _, body) = transport(&ctx).last_request().unwrap();
        assert_eq!(body.as_deref(), Some(r#"{"title":"New"}"#));
    }
}
