use crate::error::ApiError;
use std::cell::{Ref, RefCell};
use std::rc::Rc;

// =========================================================
// 共享状态标记
// =========================================================

/// 每个状态容器共有的加载 / 错误标记
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Status {
    pub loading: bool,
    pub error: Option<String>,
}

/// 带有 [`Status`] 的状态
pub trait Tracked {
    fn status(&self) -> &Status;
    fn status_mut(&mut self) -> &mut Status;
}

type Listener<S> = Rc<dyn Fn(&S)>;

// =========================================================
// 状态单元 (StateCell)
// =========================================================

/// 单线程的可观察状态
///
/// 借用从不跨越 `.await`：所有读写都在闭包内完成。
/// 每次 `update` 之后按订阅顺序通知监听者，UI 层借此把状态镜像到响应式信号里。
pub struct StateCell<S> {
    state: RefCell<S>,
    listeners: RefCell<Vec<(usize, Listener<S>)>>,
    next_id: std::cell::Cell<usize>,
}

impl<S: Default> Default for StateCell<S> {
    fn default() -> Self {
        Self::new(S::default())
    }
}

impl<S> StateCell<S> {
    pub fn new(initial: S) -> Self {
        Self {
            state: RefCell::new(initial),
            listeners: RefCell::new(Vec::new()),
            next_id: std::cell::Cell::new(0),
        }
    }

    pub fn read(&self) -> Ref<'_, S> {
        self.state.borrow()
    }

    pub fn with<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        f(&*self.state.borrow())
    }
}

impl<S: Clone> StateCell<S> {
    pub fn update<R>(&self, f: impl FnOnce(&mut S) -> R) -> R {
        let result = f(&mut *self.state.borrow_mut());
        self.notify();
        result
    }

    /// 注册监听者，返回可用于 [`StateCell::unsubscribe`] 的句柄
    pub fn subscribe(&self, listener: impl Fn(&S) + 'static) -> usize {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.listeners.borrow_mut().push((id, Rc::new(listener)));
        id
    }

    pub fn unsubscribe(&self, id: usize) {
        self.listeners.borrow_mut().retain(|(lid, _)| *lid != id);
    }

    fn notify(&self) {
        // 先复制监听者列表，允许监听者在回调中订阅 / 退订
        let listeners: Vec<Listener<S>> = self
            .listeners
            .borrow()
            .iter()
            .map(|(_, l)| l.clone())
            .collect();
        if listeners.is_empty() {
            return;
        }
        // 回调拿到的是快照，不持有借用，监听者可以再次 update 本单元
        let state = self.state.borrow().clone();
        for listener in listeners {
            listener(&state);
        }
    }

    pub fn snapshot(&self) -> S {
        self.state.borrow().clone()
    }
}

impl<S: Tracked + Clone> StateCell<S> {
    /// 开始一个异步动作：loading = true，清空 error
    ///
    /// 返回的守卫在 drop 时把 loading 复位，无论动作成功、失败还是被取消。
    pub fn begin(&self) -> ActionGuard<'_, S> {
        self.update(|s| {
            let status = s.status_mut();
            status.loading = true;
            status.error = None;
        });
        ActionGuard { cell: self }
    }

    pub fn loading(&self) -> bool {
        self.state.borrow().status().loading
    }

    pub fn error(&self) -> Option<String> {
        self.state.borrow().status().error.clone()
    }
}

// =========================================================
// 动作守卫 (ActionGuard)
// =========================================================

pub struct ActionGuard<'a, S: Tracked + Clone> {
    cell: &'a StateCell<S>,
}

impl<S: Tracked + Clone> ActionGuard<'_, S> {
    /// 记录失败：设置容器的错误消息并写日志
    pub fn fail(&self, message: impl Into<String>, err: &ApiError) {
        let message = message.into();
        tracing::error!(error = %err, "{}", message);
        self.cell.update(|s| s.status_mut().error = Some(message));
    }
}

impl<S: Tracked + Clone> Drop for ActionGuard<'_, S> {
    fn drop(&mut self) {
        self.cell.update(|s| s.status_mut().loading = false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Default)]
    struct Counter {
        value: i32,
        status: Status,
    }

    impl Tracked for Counter {
        fn status(&self) -> &Status {
            &self.status
        }
        fn status_mut(&mut self) -> &mut Status {
            &mut self.status
        }
    }

    #[test]
    fn test_guard_resets_loading() {
        let cell = StateCell::<Counter>::default();
        {
            let _guard = cell.begin();
            assert!(cell.loading());
        }
        assert!(!cell.loading());
    }

    #[test]
    fn test_fail_sets_error_and_begin_clears_it() {
        let cell = StateCell::<Counter>::default();
        {
            let guard = cell.begin();
            guard.fail("Failed to fetch data", &ApiError::transport("down"));
        }
        assert_eq!(cell.error().as_deref(), Some("Failed to fetch data"));

        let _guard = cell.begin();
        assert!(cell.error().is_none());
    }

    #[test]
    fn test_listeners_see_every_update() {
        let cell = StateCell::<Counter>::default();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let id = cell.subscribe(move |s: &Counter| sink.borrow_mut().push(s.value));

        cell.update(|s| s.value = 1);
        cell.update(|s| s.value = 2);
        cell.unsubscribe(id);
        cell.update(|s| s.value = 3);

        assert_eq!(*seen.borrow(), vec![1, 2]);
        assert_eq!(cell.snapshot().value, 3);
    }

    #[test]
    fn test_listener_can_update_same_cell() {
        let cell = Rc::new(StateCell::<Counter>::default());
        let weak = Rc::downgrade(&cell);
        cell.subscribe(move |s: &Counter| {
            if s.value == 1 {
                if let Some(cell) = weak.upgrade() {
                    cell.update(|s| s.value = 2);
                }
            }
        });

        cell.update(|s| s.value = 1);
        assert_eq!(cell.snapshot().value, 2);
    }
}
