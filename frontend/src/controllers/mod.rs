//! 视图控制器
//!
//! 每个页面的业务流程：校验 → 请求 → 成功后重新获取数据（或写入会话）→ 通知。
//! 控制器不依赖 DOM，组件层只负责把结果写入信号。

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use futures::lock::{Mutex, MutexGuard};

use crate::error::ClientError;

pub mod admin;
pub mod events;
pub mod login;
pub mod my_tickets;
pub mod register;

#[cfg(test)]
mod test_support;

// =========================================================
// 通知
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Error,
}

/// 非阻塞的用户提示
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.into(),
        }
    }

    /// 把错误转换为提示，后端原文优先，否则使用 `fallback`
    pub fn from_error(err: &ClientError, fallback: &str) -> Self {
        Self::error(err.user_message(fallback))
    }

    pub fn is_error(&self) -> bool {
        self.level == NotificationLevel::Error
    }
}

/// 一次用户动作的结果
#[derive(Debug, Clone, PartialEq)]
pub struct ActionOutcome<T> {
    /// 按发生顺序排列的提示
    pub notifications: Vec<Notification>,
    /// 动作成功后得到的新数据；`None` 表示保持原状态
    pub value: Option<T>,
}

impl<T> ActionOutcome<T> {
    pub fn failed(notification: Notification) -> Self {
        Self {
            notifications: vec![notification],
            value: None,
        }
    }

    pub fn succeeded(notification: Notification, value: Option<T>) -> Self {
        Self {
            notifications: vec![notification],
            value,
        }
    }

    pub fn with_notification(mut self, notification: Notification) -> Self {
        self.notifications.push(notification);
        self
    }

    pub fn is_success(&self) -> bool {
        self.notifications
            .first()
            .is_some_and(|n| !n.is_error())
    }
}

// =========================================================
// 并发控制
// =========================================================

/// 同一控制器内的修改操作串行执行
///
/// 修改请求与随后的重新获取都在持有门闩期间完成，
/// 所以两次连续点击不会交错为 `修改, 修改, 获取, 获取`。
#[derive(Clone, Default)]
pub struct MutationGate {
    lock: Arc<Mutex<()>>,
}

impl MutationGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn enter(&self) -> MutexGuard<'_, ()> {
        self.lock.lock().await
    }
}

/// 视图挂载标记
///
/// 视图卸载时调用 `dispose`，之后到达的响应不再写入视图状态。
#[derive(Clone, Debug)]
pub struct MountToken {
    live: Arc<AtomicBool>,
}

impl Default for MountToken {
    fn default() -> Self {
        Self::new()
    }
}

impl MountToken {
    pub fn new() -> Self {
        Self {
            live: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn is_live(&self) -> bool {
        self.live.load(Ordering::Acquire)
    }

    pub fn dispose(&self) {
        self.live.store(false, Ordering::Release);
    }

    /// 视图仍然挂载时返回结果，否则丢弃
    pub fn admit<T>(&self, value: T) -> Option<T> {
        self.is_live().then_some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mount_token_drops_results_after_dispose() {
        let token = MountToken::new();
        let clone = token.clone();
        assert_eq!(token.admit(1), Some(1));

        clone.dispose();
        assert!(!token.is_live());
        assert_eq!(token.admit(2), None);
    }

    #[test]
    fn test_outcome_success_follows_first_notification() {
        let ok: ActionOutcome<()> = ActionOutcome::succeeded(Notification::success("done"), None)
            .with_notification(Notification::error("Failed to load events"));
        assert!(ok.is_success());
        assert_eq!(ok.notifications.len(), 2);

        let failed: ActionOutcome<()> = ActionOutcome::failed(Notification::error("nope"));
        assert!(!failed.is_success());
    }

    #[tokio::test]
    async fn test_gate_is_exclusive() {
        let gate = MutationGate::new();
        let guard = gate.enter().await;
        assert!(gate.lock.try_lock().is_none());
        drop(guard);
        assert!(gate.lock.try_lock().is_some());
    }
}
