//! 会话存储模块
//!
//! 令牌与角色作为一条 JSON 记录保存在同一个键下，写入与删除都是一次操作，
//! 因此不存在"有令牌无角色"的中间状态。
//! 每次 `get()` 都从持久化介质重新读取；变更通过订阅通知路由与导航栏。

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};
use ticketdesk_shared::Role;
use tracing::{debug, info, warn};

use crate::error::{ClientError, ClientResult};

// =========================================================
// 会话模型
// =========================================================

/// 已认证会话：令牌 + 角色，二者总是同时存在
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    token: String,
    role: Role,
}

impl Session {
    /// 校验并构造会话
    ///
    /// 令牌为空白或角色无法识别时返回 `InvalidSession`。
    pub fn new(token: impl Into<String>, role: &str) -> ClientResult<Self> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(ClientError::InvalidSession("token is empty".to_string()));
        }
        let role = role
            .parse::<Role>()
            .map_err(|e| ClientError::InvalidSession(e.to_string()))?;
        Ok(Self { token, role })
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    fn decode(raw: &str) -> Option<Self> {
        let session: Session = serde_json::from_str(raw).ok()?;
        (!session.token.trim().is_empty()).then_some(session)
    }
}

// =========================================================
// 持久化抽象
// =========================================================

/// 会话记录的持久化介质
///
/// 实现只负责原始字符串的读写，编码与校验由 `SessionStore` 完成。
pub trait SessionPersistence: Send + Sync {
    fn read(&self) -> Option<String>;
    fn write(&self, value: &str) -> ClientResult<()>;
    fn delete(&self);
}

/// 内存实现：用于测试，以及浏览器禁用 LocalStorage 时的回退
#[derive(Default)]
pub struct MemorySessionStorage {
    slot: Mutex<Option<String>>,
}

impl MemorySessionStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// 以一条原始记录初始化（可用于模拟损坏的数据）
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            slot: Mutex::new(Some(raw.into())),
        }
    }

    fn slot(&self) -> MutexGuard<'_, Option<String>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SessionPersistence for MemorySessionStorage {
    fn read(&self) -> Option<String> {
        self.slot().clone()
    }

    fn write(&self, value: &str) -> ClientResult<()> {
        *self.slot() = Some(value.to_string());
        Ok(())
    }

    fn delete(&self) {
        self.slot().take();
    }
}

// =========================================================
// 会话存储
// =========================================================

pub type SubscriptionId = u64;

type Listener = Arc<dyn Fn(Option<&Session>) + Send + Sync>;

struct Inner {
    persistence: Box<dyn SessionPersistence>,
    listeners: Mutex<Vec<(SubscriptionId, Listener)>>,
    next_id: AtomicU64,
}

/// 会话存储句柄
///
/// 克隆开销很小，所有克隆共享同一个存储与订阅列表。
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<Inner>,
}

impl SessionStore {
    pub fn new(persistence: impl SessionPersistence + 'static) -> Self {
        Self {
            inner: Arc::new(Inner {
                persistence: Box::new(persistence),
                listeners: Mutex::new(Vec::new()),
                next_id: AtomicU64::new(1),
            }),
        }
    }

    /// 仅存在于内存中的会话存储
    pub fn in_memory() -> Self {
        Self::new(MemorySessionStorage::new())
    }

    /// 读取当前会话
    ///
    /// 记录损坏（无法解析、令牌为空、未知角色）时视为未登录并删除该记录。
    pub fn get(&self) -> Option<Session> {
        let raw = self.inner.persistence.read()?;
        match Session::decode(&raw) {
            Some(session) => Some(session),
            None => {
                warn!("Discarding malformed session record");
                self.inner.persistence.delete();
                None
            }
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.get().is_some()
    }

    /// 同时写入令牌与角色
    pub fn set(&self, token: impl Into<String>, role: &str) -> ClientResult<Session> {
        let session = Session::new(token, role)?;
        let raw = serde_json::to_string(&session)
            .map_err(|e| ClientError::InvalidSession(e.to_string()))?;
        self.inner.persistence.write(&raw)?;

        info!(role = %session.role(), "Session established");
        self.notify(Some(&session));
        Ok(session)
    }

    /// 清除会话；重复调用是安全的，且只有在确实存在会话时才通知订阅者
    pub fn clear(&self) {
        let was_present = self.get().is_some();
        self.inner.persistence.delete();

        if was_present {
            info!("Session cleared");
            self.notify(None);
        } else {
            debug!("Session clear requested with no active session");
        }
    }

    /// 订阅会话变更
    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(Option<&Session>) + Send + Sync + 'static,
    {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        self.listeners().push((id, Arc::new(listener)));
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.listeners().retain(|(existing, _)| *existing != id);
    }

    fn listeners(&self) -> MutexGuard<'_, Vec<(SubscriptionId, Listener)>> {
        self.inner
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn notify(&self, session: Option<&Session>) {
        // 先复制列表再回调，允许监听器在回调中订阅或退订
        let listeners: Vec<Listener> = self
            .listeners()
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();

        for listener in listeners {
            listener(session);
        }
    }
}
