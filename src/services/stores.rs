use super::ServiceContext;
use crate::error::{ApiError, ApiResult};
use crate::request::HttpClient;
use travel_market_shared::protocol::{CreateStore, GetStore, ListMerchantStores, ListStores};
use travel_market_shared::{CreateStoreRequest, Store};

pub struct StoreService<C: HttpClient> {
    ctx: ServiceContext<C>,
}

impl<C: HttpClient> StoreService<C> {
    pub fn new(ctx: ServiceContext<C>) -> Self {
        Self { ctx }
    }

    pub async fn list(&self) -> ApiResult<Vec<Store>> {
        tracing::debug!("Fetching all stores");
        self.ctx
            .call(&ListStores {})
            .await
            .map_err(|e| e.in_op("stores.list"))
    }

    /// 当前商户自己的店铺；未登录时直接失败，不发请求
    pub async fn list_merchant(&self) -> ApiResult<Vec<Store>> {
        if self.ctx.session().token().is_none() {
            return Err(ApiError::auth("User is not logged in").in_op("stores.merchant"));
        }
        self.ctx
            .call(&ListMerchantStores {})
            .await
            .map_err(|e| e.in_op("stores.merchant"))
    }

    pub async fn get(&self, id: i64) -> ApiResult<Store> {
        self.ctx
            .call(&GetStore { id })
            .await
            .map_err(|e| e.in_op_with("stores.get", id.to_string()))
    }

    pub async fn create(&self, data: CreateStoreRequest) -> ApiResult<Store> {
        self.ctx
            .call(&CreateStore { body: data })
            .await
            .map_err(|e| e.in_op("stores.create"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiErrorKind;
    use crate::services::testing::{anonymous, signed_in, transport, url};
    use serde_json::json;
    use travel_market_shared::protocol::HttpMethod;

    #[tokio::test]
    async fn test_merchant_list_requires_token() {
        let ctx = anonymous();
        let service = StoreService::new(ctx.clone());

        let err = service.list_merchant().await.unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::Auth);
        assert_eq!(transport(&ctx).request_count(), 0);
    }

    #[tokio::test]
    async fn test_merchant_list_sends_bearer() {
        let ctx = signed_in("MERCHANT");
        transport(&ctx).mock_response(HttpMethod::Get, &url("/stores/merchant"), 200, json!([]));
        let service = StoreService::new(ctx.clone());

        assert!(service.list_merchant().await.unwrap().is_empty());
        let (_, _, headers, _) = transport(&ctx).last_request().unwrap();
        assert!(headers.get("Authorization").unwrap().starts_with("Bearer "));
    }
}
