//! 导航栏模型
//!
//! 决定当前角色可见的链接、哪个链接处于激活状态，以及登出动作。

use crate::session::{Session, SessionStore};
use crate::web::route::AppRoute;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavLink {
    pub route: AppRoute,
    pub label: &'static str,
}

impl NavLink {
    const fn new(route: AppRoute, label: &'static str) -> Self {
        Self { route, label }
    }

    pub fn path(&self) -> &'static str {
        self.route.to_path()
    }

    /// 仅当路径完全相同时激活，不做前缀匹配
    pub fn is_active(&self, current_path: &str) -> bool {
        self.path() == current_path
    }
}

const EVENTS: NavLink = NavLink::new(AppRoute::Events, "Events");
const MY_TICKETS: NavLink = NavLink::new(AppRoute::MyTickets, "My Tickets");
const ADMIN: NavLink = NavLink::new(AppRoute::Admin, "Admin Dashboard");

/// 当前会话可见的链接
pub fn visible_links(session: Option<&Session>) -> Vec<NavLink> {
    match session {
        None => Vec::new(),
        Some(s) if s.is_admin() => vec![EVENTS, MY_TICKETS, ADMIN],
        Some(_) => vec![EVENTS, MY_TICKETS],
    }
}

/// 登出：清除会话并返回应导航到的路由
///
/// 未登录时调用同样安全。
pub fn logout(store: &SessionStore) -> AppRoute {
    store.clear();
    AppRoute::auth_failure_redirect()
}
