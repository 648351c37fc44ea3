use super::{FETCH_FAILED, insert_front, replace_by_id};
use crate::error::{ApiError, ApiResult};
use crate::request::HttpClient;
use crate::services::{ProductService, ServiceContext};
use crate::state::{ActionGuard, StateCell, Status, Tracked};
use travel_market_shared::{
    CreateProductRequest, Product, ProductApplication, ProductStatus, ReviewApplicationRequest,
    UpdateProductRequest,
};

pub const APPLY_FAILED: &str = "Failed to submit product application";
pub const REVIEW_FAILED: &str = "Failed to review application";
pub const OFF_SHELF_FAILED: &str = "Failed to take product off shelf";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductState {
    /// 当前店铺的商品
    pub products: Vec<Product>,
    pub applications: Vec<ProductApplication>,
    pub current_product: Option<Product>,
    pub current_application: Option<ProductApplication>,
    pub status: Status,
}

impl Tracked for ProductState {
    fn status(&self) -> &Status {
        &self.status
    }
    fn status_mut(&mut self) -> &mut Status {
        &mut self.status
    }
}

pub struct ProductContainer<C: HttpClient> {
    service: ProductService<C>,
    state: StateCell<ProductState>,
}

impl<C: HttpClient> ProductContainer<C> {
    pub fn new(ctx: ServiceContext<C>) -> Self {
        Self {
            service: ProductService::new(ctx),
            state: StateCell::default(),
        }
    }

    pub fn state(&self) -> &StateCell<ProductState> {
        &self.state
    }

    pub fn snapshot(&self) -> ProductState {
        self.state.snapshot()
    }

    pub async fn fetch_store_products(&self, store_id: i64) -> ApiResult<Vec<Product>> {
        let action = self.state.begin();
        match self.service.store_products(store_id).await {
            Ok(products) => {
                tracing::debug!(store_id, count = products.len(), "Store products fetched");
                self.state.update(|s| s.products = products.clone());
                Ok(products)
            }
            Err(err) => {
                action.fail(FETCH_FAILED, &err);
                self.state.update(|s| s.products.clear());
                Err(err)
            }
        }
    }

    /// 单个商品详情；失败时清空 `current_product`
    pub async fn fetch_product(&self, id: i64) -> ApiResult<Product> {
        let action = self.state.begin();
        match self.service.get(id).await {
            Ok(product) => {
                self.state.update(|s| s.current_product = Some(product.clone()));
                Ok(product)
            }
            Err(err) => {
                action.fail(FETCH_FAILED, &err);
                self.state.update(|s| s.current_product = None);
                Err(err)
            }
        }
    }

    pub async fn fetch_applications(&self) -> ApiResult<()> {
        let action = self.state.begin();
        match self.service.applications().await {
            Ok(applications) => {
                self.state.update(|s| s.applications = applications);
                Ok(())
            }
            Err(err) => {
                action.fail(FETCH_FAILED, &err);
                self.state.update(|s| s.applications.clear());
                Err(err)
            }
        }
    }

    pub async fn fetch_application(&self, id: i64) -> ApiResult<ProductApplication> {
        let action = self.state.begin();
        match self.service.application(id).await {
            Ok(application) => {
                self.state
                    .update(|s| s.current_application = Some(application.clone()));
                Ok(application)
            }
            Err(err) => {
                action.fail(FETCH_FAILED, &err);
                self.state.update(|s| s.current_application = None);
                Err(err)
            }
        }
    }

    // 提交前的本地校验，失败时不发请求
    fn check_draft(
        &self,
        action: &ActionGuard<'_, ProductState>,
        draft: &CreateProductRequest,
    ) -> ApiResult<()> {
        draft.validate().map_err(|reason| {
            let err = ApiError::validation(reason).in_op("applications.validate");
            action.fail(err.message.clone(), &err);
            err
        })
    }

    /// 申请上架新商品
    pub async fn apply_for_new_product(
        &self,
        data: CreateProductRequest,
    ) -> ApiResult<ProductApplication> {
        let action = self.state.begin();
        self.check_draft(&action, &data)?;

        match self.service.apply_new(data).await {
            Ok(application) => {
                self.state
                    .update(|s| insert_front(&mut s.applications, application.clone()));
                Ok(application)
            }
            Err(err) => {
                action.fail(APPLY_FAILED, &err);
                Err(err)
            }
        }
    }

    /// 申请修改已有商品
    pub async fn apply_for_modification(
        &self,
        product_id: i64,
        data: UpdateProductRequest,
    ) -> ApiResult<ProductApplication> {
        let action = self.state.begin();
        self.check_draft(&action, &data)?;

        match self.service.apply_modification(product_id, data).await {
            Ok(application) => {
                self.state
                    .update(|s| insert_front(&mut s.applications, application.clone()));
                Ok(application)
            }
            Err(err) => {
                action.fail(APPLY_FAILED, &err);
                Err(err)
            }
        }
    }

    /// 审核申请（管理员）
    pub async fn review_application(
        &self,
        id: i64,
        review: ReviewApplicationRequest,
    ) -> ApiResult<ProductApplication> {
        let action = self.state.begin();
        match self.service.review(id, review).await {
            Ok(application) => {
                let replaced = self
                    .state
                    .update(|s| replace_by_id(&mut s.applications, application.clone()));
                if !replaced {
                    tracing::warn!(id, "Reviewed application not found in local list");
                }
                Ok(application)
            }
            Err(err) => {
                action.fail(REVIEW_FAILED, &err);
                Err(err)
            }
        }
    }

    /// 下架商品：本地商品状态改为 OFF_SHELF
    pub async fn take_off_shelf(&self, product_id: i64) -> ApiResult<()> {
        let action = self.state.begin();
        match self.service.take_off_shelf(product_id).await {
            Ok(()) => {
                self.state.update(|s| {
                    for product in s.products.iter_mut().filter(|p| p.id == product_id) {
                        product.status = ProductStatus::OffShelf;
                    }
                    if let Some(current) = s
                        .current_product
                        .as_mut()
                        .filter(|p| p.id == product_id)
                    {
                        current.status = ProductStatus::OffShelf;
                    }
                });
                Ok(())
            }
            Err(err) => {
                action.fail(OFF_SHELF_FAILED, &err);
                Err(err)
            }
        }
    }
}
