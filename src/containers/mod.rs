//! 状态容器：每种资源一个
//!
//! 每个动作都遵循同样的流程：置 loading、清空 error、调用服务、修改本地状态，
//! 最后由守卫复位 loading。失败时设置容器自己的错误消息，并把原始错误返回给调用方。

pub mod accounts;
pub mod items;
pub mod products;
pub mod stores;
pub mod users;

use travel_market_shared::Identified;

pub use accounts::{AccountContainer, AccountState};
pub use items::{ItemContainer, ItemState};
pub use products::{ProductContainer, ProductState};
pub use stores::{StoreContainer, StoreState};
pub use users::{UserContainer, UserState};

pub const FETCH_FAILED: &str = "Failed to fetch data";
pub const ITEM_DETAILS_FAILED: &str = "Failed to fetch item details";
pub const CREATE_FAILED: &str = "Failed to create";
pub const UPDATE_FAILED: &str = "Failed to update";
pub const DELETE_FAILED: &str = "Failed to delete";

/// 新实体插入到最前面
pub(crate) fn insert_front<T>(list: &mut Vec<T>, entity: T) {
    list.insert(0, entity);
}

/// 按 ID 替换；不存在时不做任何修改
pub(crate) fn replace_by_id<T: Identified>(list: &mut [T], entity: T) -> bool {
    match list.iter_mut().find(|e| e.id() == entity.id()) {
        Some(slot) => {
            *slot = entity;
            true
        }
        None => false,
    }
}

/// 按 ID 替换，不存在时追加到末尾
pub(crate) fn upsert<T: Identified>(list: &mut Vec<T>, entity: T) {
    if let Some(slot) = list.iter_mut().find(|e| e.id() == entity.id()) {
        *slot = entity;
    } else {
        list.push(entity);
    }
}

pub(crate) fn remove_by_id<T: Identified>(list: &mut Vec<T>, id: i64) {
    list.retain(|e| e.id() != id);
}

#[cfg(test)]
pub(crate) mod testing {
    use crate::state::{StateCell, Tracked};
    use std::cell::Cell;
    use std::rc::Rc;

    /// 把 loading 标记镜像出来，供请求发出时的断言读取
    pub fn loading_mirror<S: Tracked + Clone + 'static>(cell: &StateCell<S>) -> Rc<Cell<bool>> {
        let mirror = Rc::new(Cell::new(cell.loading()));
        let sink = mirror.clone();
        cell.subscribe(move |s: &S| sink.set(s.status().loading));
        mirror
    }
}
