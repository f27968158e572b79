//! LocalStorage 会话持久化
//!
//! 会话记录作为单个键保存，读写都是一次操作。

use gloo_storage::{LocalStorage, Storage};
use tracing::warn;

use crate::error::{ClientError, ClientResult};
use crate::session::SessionPersistence;

/// 浏览器 LocalStorage 中的会话记录
pub struct BrowserSessionStorage {
    key: String,
}

impl BrowserSessionStorage {
    /// 打开指定键的存储
    ///
    /// 浏览器禁用 LocalStorage（如隐私模式）时返回 `None`。
    pub fn open(key: &str) -> Option<Self> {
        let available = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .is_some();

        if !available {
            warn!("LocalStorage unavailable, session will not survive reloads");
            return None;
        }

        Some(Self {
            key: key.to_string(),
        })
    }
}

impl SessionPersistence for BrowserSessionStorage {
    fn read(&self) -> Option<String> {
        LocalStorage::get::<String>(&self.key).ok()
    }

    fn write(&self, value: &str) -> ClientResult<()> {
        LocalStorage::set(&self.key, value)
            .map_err(|e| ClientError::InvalidSession(format!("failed to persist session: {}", e)))
    }

    fn delete(&self) {
        LocalStorage::delete(&self.key);
    }
}
