use super::{CREATE_FAILED, FETCH_FAILED, insert_front, upsert};
use crate::error::ApiResult;
use crate::request::HttpClient;
use crate::services::{ServiceContext, StoreService};
use crate::state::{StateCell, Status, Tracked};
use rand::Rng;
use rand::seq::IndexedRandom;
use travel_market_shared::{CreateStoreRequest, ServiceCategory, Store};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoreState {
    pub stores: Vec<Store>,
    /// 浏览游标：首页轮播当前展示的店铺
    pub cursor: usize,
    pub status: Status,
}

impl Tracked for StoreState {
    fn status(&self) -> &Status {
        &self.status
    }
    fn status_mut(&mut self) -> &mut Status {
        &mut self.status
    }
}

pub struct StoreContainer<C: HttpClient> {
    service: StoreService<C>,
    state: StateCell<StoreState>,
}

impl<C: HttpClient> StoreContainer<C> {
    pub fn new(ctx: ServiceContext<C>) -> Self {
        Self {
            service: StoreService::new(ctx),
            state: StateCell::default(),
        }
    }

    pub fn state(&self) -> &StateCell<StoreState> {
        &self.state
    }

    pub fn snapshot(&self) -> StoreState {
        self.state.snapshot()
    }

    fn replace_all(&self, stores: Vec<Store>) {
        let stores = stores.into_iter().map(Store::with_default_image).collect();
        self.state.update(|s| {
            s.stores = stores;
            s.cursor = 0;
        });
    }

    fn clear(&self) {
        self.state.update(|s| {
            s.stores.clear();
            s.cursor = 0;
        });
    }

    pub async fn fetch_stores(&self) -> ApiResult<()> {
        let action = self.state.begin();
        match self.service.list().await {
            Ok(stores) => {
                tracing::debug!(count = stores.len(), "Stores fetched");
                self.replace_all(stores);
                Ok(())
            }
            Err(err) => {
                action.fail(FETCH_FAILED, &err);
                self.clear();
                Err(err)
            }
        }
    }

    /// 商户自己的店铺；未登录时以鉴权错误失败，不发请求
    pub async fn fetch_merchant_stores(&self) -> ApiResult<()> {
        let action = self.state.begin();
        match self.service.list_merchant().await {
            Ok(stores) => {
                self.replace_all(stores);
                Ok(())
            }
            Err(err) => {
                action.fail(FETCH_FAILED, &err);
                self.clear();
                Err(err)
            }
        }
    }

    pub async fn fetch_store(&self, id: i64) -> ApiResult<Store> {
        let action = self.state.begin();
        match self.service.get(id).await {
            Ok(store) => {
                let store = store.with_default_image();
                self.state.update(|s| upsert(&mut s.stores, store.clone()));
                Ok(store)
            }
            Err(err) => {
                action.fail(FETCH_FAILED, &err);
                Err(err)
            }
        }
    }

    pub async fn create_store(&self, data: CreateStoreRequest) -> ApiResult<Store> {
        let action = self.state.begin();
        match self.service.create(data).await {
            Ok(store) => {
                let store = store.with_default_image();
                tracing::info!(id = store.id, name = %store.store_name, "Store created");
                self.state.update(|s| insert_front(&mut s.stores, store.clone()));
                Ok(store)
            }
            Err(err) => {
                action.fail(CREATE_FAILED, &err);
                Err(err)
            }
        }
    }

    // --- 浏览游标 ---

    pub fn current_store(&self) -> Option<Store> {
        self.state.with(|s| s.stores.get(s.cursor).cloned())
    }

    /// 下一个店铺，到末尾后回到第一个
    pub fn next_store(&self) -> Option<Store> {
        self.step(1)
    }

    /// 上一个店铺，到开头后回到最后一个
    pub fn prev_store(&self) -> Option<Store> {
        self.step(-1)
    }

    fn step(&self, delta: isize) -> Option<Store> {
        self.state.update(|s| {
            let len = s.stores.len();
            if len == 0 {
                return None;
            }
            let next = (s.cursor as isize + delta).rem_euclid(len as isize) as usize;
            s.cursor = next;
            s.stores.get(next).cloned()
        })
    }

    pub fn stores_by_category(&self, category: &ServiceCategory) -> Vec<Store> {
        self.state.with(|s| {
            s.stores
                .iter()
                .filter(|store| store.has_category(category))
                .cloned()
                .collect()
        })
    }

    /// 随机选一个店铺并把游标移到它上面
    pub fn random_store(&self) -> Option<Store> {
        self.random_store_with(&mut rand::rng())
    }

    pub fn random_store_with<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Store> {
        self.state.update(|s| {
            if s.stores.is_empty() {
                return None;
            }
            s.cursor = rng.random_range(0..s.stores.len());
            s.stores.get(s.cursor).cloned()
        })
    }

    /// 指定类别中随机选一个店铺，不移动游标
    pub fn random_store_by_category(&self, category: &ServiceCategory) -> Option<Store> {
        self.random_store_by_category_with(category, &mut rand::rng())
    }

    pub fn random_store_by_category_with<R: Rng + ?Sized>(
        &self,
        category: &ServiceCategory,
        rng: &mut R,
    ) -> Option<Store> {
        self.stores_by_category(category).choose(rng).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiErrorKind;
    use crate::services::testing::{anonymous, signed_in, transport, url};
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use serde_json::json;
    use travel_market_shared::DEFAULT_STORE_IMAGE;
    use travel_market_shared::protocol::HttpMethod;

    fn store(id: i64, name: &str, categories: &[&str]) -> serde_json::Value {
        json!({
            "id": id,
            "storeName": name,
            "categories": categories,
            "ownerIdNumber": "110101199001011234",
            "description": "",
            "registrationAddress": "Hangzhou",
            "registeredCapital": 100000.0,
            "registrationDate": "2024-01-01",
            "ownerId": 3
        })
    }

    fn request() -> CreateStoreRequest {
        CreateStoreRequest {
            store_name: "Lake Hotel".into(),
            categories: vec![ServiceCategory::Hotel],
            owner_id_number: "110101199001011234".into(),
            description: "By the lake".into(),
            registration_address: "Hangzhou".into(),
            registered_capital: 500000.0,
            registration_date: "2024-05-01".into(),
        }
    }

    #[tokio::test]
    async fn test_create_inserts_at_front() {
        let ctx = signed_in("MERCHANT");
        transport(&ctx).mock_response(
            HttpMethod::Get,
            &url("/stores"),
            200,
            json!([store(1, "A", &["餐饮"]), store(2, "B", &["酒店"])]),
        );
        let mut created = store(3, "Lake Hotel", &["酒店"]);
        created["imageUrl"] = json!("/lake.jpg");
        transport(&ctx).mock_response(HttpMethod::Post, &url("/stores"), 201, created);
        let container = StoreContainer::new(ctx);

        container.fetch_stores().await.unwrap();
        let new_store = container.create_store(request()).await.unwrap();

        let state = container.snapshot();
        assert_eq!(state.stores.len(), 3);
        assert_eq!(state.stores[0], new_store);
        assert_eq!(state.stores[0].store_name, "Lake Hotel");
        assert_eq!(state.stores[0].image_url.as_deref(), Some("/lake.jpg"));
        assert_eq!(state.stores[0].registration_address, "Hangzhou");
    }

    #[tokio::test]
    async fn test_default_image_and_categories() {
        let ctx = anonymous();
        transport(&ctx).mock_response(
            HttpMethod::Get,
            &url("/stores"),
            200,
            json!([store(1, "A", &["餐饮"]), store(2, "B", &["酒店", "交通"])]),
        );
        let container = StoreContainer::new(ctx);
        container.fetch_stores().await.unwrap();

        assert!(
            container
                .snapshot()
                .stores
                .iter()
                .all(|s| s.image_url.as_deref() == Some(DEFAULT_STORE_IMAGE))
        );
        let transport_stores = container.stores_by_category(&ServiceCategory::Transport);
        assert_eq!(transport_stores.len(), 1);
        assert_eq!(transport_stores[0].id, 2);
    }

    #[tokio::test]
    async fn test_cursor_wraps() {
        let ctx = anonymous();
        transport(&ctx).mock_response(
            HttpMethod::Get,
            &url("/stores"),
            200,
            json!([store(1, "A", &[]), store(2, "B", &[]), store(3, "C", &[])]),
        );
        let container = StoreContainer::new(ctx);
        assert!(container.next_store().is_none());

        container.fetch_stores().await.unwrap();
        assert_eq!(container.current_store().unwrap().id, 1);
        assert_eq!(container.prev_store().unwrap().id, 3);
        assert_eq!(container.next_store().unwrap().id, 1);
        assert_eq!(container.next_store().unwrap().id, 2);
    }

    #[tokio::test]
    async fn test_random_store_moves_cursor() {
        let ctx = anonymous();
        transport(&ctx).mock_response(
            HttpMethod::Get,
            &url("/stores"),
            200,
            json!([store(1, "A", &["酒店"]), store(2, "B", &[]), store(3, "C", &["酒店"])]),
        );
        let container = StoreContainer::new(ctx);
        let mut rng = StdRng::seed_from_u64(7);
        assert!(container.random_store_with(&mut rng).is_none());
        assert_eq!(container.snapshot().cursor, 0);

        container.fetch_stores().await.unwrap();
        for _ in 0..10 {
            let picked = container.random_store_with(&mut rng).unwrap();
            assert_eq!(container.current_store(), Some(picked));
        }
        assert!(container.random_store().is_some());

        for _ in 0..10 {
            let hotel = container
                .random_store_by_category_with(&ServiceCategory::Hotel, &mut rng)
                .unwrap();
            assert!(hotel.id == 1 || hotel.id == 3);
        }
    }

    #[tokio::test]
    async fn test_random_store_by_category_without_match() {
        let ctx = anonymous();
        transport(&ctx).mock_response(
            HttpMethod::Get,
            &url("/stores"),
            200,
            json!([store(1, "A", &["餐饮"])]),
        );
        let container = StoreContainer::new(ctx);
        assert!(container.random_store_by_category(&ServiceCategory::Ticket).is_none());

        container.fetch_stores().await.unwrap();
        let before = container.snapshot().cursor;
        assert!(container.random_store_by_category(&ServiceCategory::Ticket).is_none());
        assert_eq!(
            container.random_store_by_category(&ServiceCategory::Restaurant).map(|s| s.id),
            Some(1)
        );
        assert_eq!(container.snapshot().cursor, before);
    }

    #[tokio::test]
    async fn test_merchant_stores_without_token() {
        let ctx = anonymous();
        let container = StoreContainer::new(ctx.clone());

        let err = container.fetch_merchant_stores().await.unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::Auth);
        assert_eq!(transport(&ctx).request_count(), 0);
        assert_eq!(container.snapshot().status.error.as_deref(), Some(FETCH_FAILED));
    }

    #[tokio::test]
    async fn test_failed_single_fetch_keeps_list() {
        let ctx = anonymous();
        transport(&ctx).mock_response(
            HttpMethod::Get,
            &url("/stores"),
            200,
            json!([store(1, "A", &[])]),
        );
        let container = StoreContainer::new(ctx);
        container.fetch_stores().await.unwrap();

        assert!(container.fetch_store(42).await.is_err());
        let state = container.snapshot();
        assert_eq!(state.stores.len(), 1);
        assert_eq!(state.status.error.as_deref(), Some(FETCH_FAILED));
    }
}
