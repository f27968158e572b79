//! 认证模块
//!
//! 把会话存储桥接为响应式信号，供导航栏等组件使用。
//! 路由服务直接订阅会话存储，不依赖这里的信号。

use leptos::prelude::*;

use crate::session::{Session, SessionStore};

/// 认证上下文
///
/// 包含会话存储句柄和当前会话的只读信号，通过 Context 在组件间共享。
#[derive(Clone)]
pub struct AuthContext {
    pub store: SessionStore,
    /// 当前会话（只读）
    pub session: ReadSignal<Option<Session>>,
}

impl AuthContext {
    /// 创建认证上下文，并订阅会话变化
    pub fn new(store: SessionStore) -> Self {
        let (session, set_session) = signal(store.get());

        let id = store.subscribe(move |current| set_session.set(current.cloned()));
        let cleanup_store = store.clone();
        on_cleanup(move || cleanup_store.unsubscribe(id));

        Self { store, session }
    }
}

/// 从 Context 获取认证上下文
pub fn use_auth() -> AuthContext {
    expect_context::<AuthContext>()
}
