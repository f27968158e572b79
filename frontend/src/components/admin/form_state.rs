//! 创建活动表单的状态
//!
//! 使用 `RwSignal` 因为它实现了 `Copy` trait，可以直接在闭包和子组件间传递。

use leptos::prelude::*;

use crate::controllers::admin::EventDraft;

#[derive(Clone, Copy)]
pub struct EventFormState {
    pub name: RwSignal<String>,
    pub total_seats: RwSignal<String>,
}

impl EventFormState {
    pub fn new() -> Self {
        Self {
            name: RwSignal::new(String::new()),
            total_seats: RwSignal::new(String::new()),
        }
    }

    /// 创建成功后清空表单
    pub fn reset(&self) {
        self.name.set(String::new());
        self.total_seats.set(String::new());
    }

    /// 当前输入的快照，校验由控制器完成
    pub fn to_draft(&self) -> EventDraft {
        EventDraft::new(self.name.get_untracked(), self.total_seats.get_untracked())
    }
}
