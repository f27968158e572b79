//! 全局通知
//!
//! 控制器返回的提示统一推送到这里，显示一段时间后自动消失。

use std::time::Duration;

use leptos::prelude::*;

use crate::controllers::Notification;

#[derive(Clone, Copy)]
pub struct Toasts {
    entries: RwSignal<Vec<(u64, Notification)>>,
    next_id: StoredValue<u64>,
    timeout: Duration,
}

impl Toasts {
    pub fn new(timeout: Duration) -> Self {
        Self {
            entries: RwSignal::new(Vec::new()),
            next_id: StoredValue::new(0),
            timeout,
        }
    }

    pub fn push(&self, notification: Notification) {
        let id = self.next_id.get_value();
        self.next_id.set_value(id + 1);
        self.entries.update(|list| list.push((id, notification)));

        let toasts = *self;
        set_timeout(move || toasts.dismiss(id), self.timeout);
    }

    pub fn extend(&self, notifications: impl IntoIterator<Item = Notification>) {
        for n in notifications {
            self.push(n);
        }
    }

    pub fn dismiss(&self, id: u64) {
        self.entries.update(|list| list.retain(|(existing, _)| *existing != id));
    }
}

pub fn use_toasts() -> Toasts {
    expect_context::<Toasts>()
}

/// 通知提示框
#[component]
pub fn ToastHost() -> impl IntoView {
    let toasts = use_toasts();

    view! {
        <div class="toast toast-top toast-end z-50">
            <For
                each=move || toasts.entries.get()
                key=|(id, _)| *id
                children=move |(id, notification)| {
                    let class = if notification.is_error() {
                        "alert alert-error shadow-lg"
                    } else {
                        "alert alert-success shadow-lg"
                    };
                    view! {
                        <div class=class on:click=move |_| toasts.dismiss(id)>
                            <span>{notification.message}</span>
                        </div>
                    }
                }
            />
        </div>
    }
}
