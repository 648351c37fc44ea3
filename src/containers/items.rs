use super::{
    CREATE_FAILED, DELETE_FAILED, FETCH_FAILED, ITEM_DETAILS_FAILED, UPDATE_FAILED, insert_front,
    remove_by_id, replace_by_id,
};
use crate::error::ApiResult;
use crate::request::HttpClient;
use crate::services::{ItemService, ServiceContext};
use crate::state::{StateCell, Status, Tracked};
use travel_market_shared::{CreateItemRequest, Item, UpdateItemRequest};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemState {
    pub items: Vec<Item>,
    pub status: Status,
}

impl Tracked for ItemState {
    fn status(&self) -> &Status {
        &self.status
    }
    fn status_mut(&mut self) -> &mut Status {
        &mut self.status
    }
}

pub struct ItemContainer<C: HttpClient> {
    service: ItemService<C>,
    state: StateCell<ItemState>,
}

impl<C: HttpClient> ItemContainer<C> {
    pub fn new(ctx: ServiceContext<C>) -> Self {
        Self {
            service: ItemService::new(ctx),
            state: StateCell::default(),
        }
    }

    pub fn state(&self) -> &StateCell<ItemState> {
        &self.state
    }

    pub fn snapshot(&self) -> ItemState {
        self.state.snapshot()
    }

    pub async fn fetch_items(&self) -> ApiResult<()> {
        let action = self.state.begin();
        match self.service.list().await {
            Ok(items) => {
                self.state.update(|s| s.items = items);
                Ok(())
            }
            Err(err) => {
                action.fail(FETCH_FAILED, &err);
                self.state.update(|s| s.items.clear());
                Err(err)
            }
        }
    }

    /// 单个条目，只返回给调用方，不修改列表
    pub async fn fetch_item(&self, id: i64) -> ApiResult<Item> {
        let action = self.state.begin();
        self.service.get(id).await.inspect_err(|err| {
            action.fail(ITEM_DETAILS_FAILED, err);
        })
    }

    pub async fn create_item(&self, data: CreateItemRequest) -> ApiResult<Item> {
        let action = self.state.begin();
        match self.service.create(data).await {
            Ok(item) => {
                self.state.update(|s| insert_front(&mut s.items, item.clone()));
                Ok(item)
            }
            Err(err) => {
                action.fail(CREATE_FAILED, &err);
                Err(err)
            }
        }
    }

    pub async fn update_item(&self, id: i64, data: UpdateItemRequest) -> ApiResult<Item> {
        let action = self.state.begin();
        match self.service.update(id, data).await {
            Ok(item) => {
                self.state.update(|s| replace_by_id(&mut s.items, item.clone()));
                Ok(item)
            }
            Err(err) => {
                action.fail(UPDATE_FAILED, &err);
                Err(err)
            }
        }
    }

    pub async fn delete_item(&self, id: i64) -> ApiResult<()> {
        let action = self.state.begin();
        match self.service.delete(id).await {
            Ok(()) => {
                self.state.update(|s| remove_by_id(&mut s.items, id));
                Ok(())
            }
            Err(err) => {
                action.fail(DELETE_FAILED, &err);
                Err(err)
            }
        }
    }
}
