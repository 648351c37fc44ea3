use super::ServiceContext;
use crate::error::ApiResult;
use crate::request::HttpClient;
use travel_market_shared::protocol::{
    CreateApplication, GetApplication, GetProduct, ListApplications, ListStoreProducts,
    ModifyProduct, ReviewApplication, TakeOffShelf,
};
use travel_market_shared::{
    CreateProductRequest, Product, ProductApplication, ReviewApplicationRequest,
    UpdateProductRequest,
};

/// 商品与上架申请
pub struct ProductService<C: HttpClient> {
    ctx: ServiceContext<C>,
}

impl<C: HttpClient> ProductService<C> {
    pub fn new(ctx: ServiceContext<C>) -> Self {
        Self { ctx }
    }

    pub async fn store_products(&self, store_id: i64) -> ApiResult<Vec<Product>> {
        self.ctx
            .call(&ListStoreProducts { store_id })
            .await
            .map_err(|e| e.in_op_with("products.by_store", store_id.to_string()))
    }

    pub async fn get(&self, id: i64) -> ApiResult<Product> {
        self.ctx
            .call(&GetProduct { id })
            .await
            .map_err(|e| e.in_op_with("products.get", id.to_string()))
    }

    pub async fn applications(&self) -> ApiResult<Vec<ProductApplication>> {
        self.ctx
            .call(&ListApplications {})
            .await
            .map_err(|e| e.in_op("applications.list"))
    }

    pub async fn application(&self, id: i64) -> ApiResult<ProductApplication> {
        self.ctx
            .call(&GetApplication { id })
            .await
            .map_err(|e| e.in_op_with("applications.get", id.to_string()))
    }

    pub async fn apply_new(&self, data: CreateProductRequest) -> ApiResult<ProductApplication> {
        self.ctx
            .call(&CreateApplication { body: data })
            .await
            .map_err(|e| e.in_op("applications.create"))
    }

    pub async fn apply_modification(
        &self,
        product_id: i64,
        data: UpdateProductRequest,
    ) -> ApiResult<ProductApplication> {
        self.ctx
            .call(&ModifyProduct {
                product_id,
                body: data,
            })
            .await
            .map_err(|e| e.in_op_with("applications.modify", product_id.to_string()))
    }

    pub async fn review(
        &self,
        id: i64,
        data: ReviewApplicationRequest,
    ) -> ApiResult<ProductApplication> {
        self.ctx
            .call(&ReviewApplication { id, body: data })
            .await
            .map_err(|e| e.in_op_with("applications.review", id.to_string()))
    }

    pub async fn take_off_shelf(&self, product_id: i64) -> ApiResult<()> {
        self.ctx
            .call(&TakeOffShelf { product_id })
            .await
            .map_err(|e| e.in_op_with("products.off_shelf", product_id.to_string()))
    }
}
