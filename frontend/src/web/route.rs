//! 路由定义模块 - 领域模型
//!
//! 这是纯粹的业务逻辑层，不依赖于 DOM 或 web_sys。
//! 定义了应用的所有路由、访问要求以及守卫判定。

use std::fmt::Display;

use crate::session::Session;

/// 应用路由枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AppRoute {
    /// 登录页面 (默认路由)
    #[default]
    Login,
    Register,
    Events,
    MyTickets,
    /// 管理面板 (需要 admin 角色)
    Admin,
    /// 页面未找到
    NotFound,
}

/// 路由访问要求
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteRequirement {
    Public,
    Session,
    Admin,
}

/// 由会话推导出的访问级别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessLevel {
    Unauthenticated,
    AuthenticatedNoPrivilege,
    AuthenticatedPrivileged,
}

impl AccessLevel {
    pub fn of(session: Option<&Session>) -> Self {
        match session {
            None => Self::Unauthenticated,
            Some(s) if s.is_admin() => Self::AuthenticatedPrivileged,
            Some(_) => Self::AuthenticatedNoPrivilege,
        }
    }
}

/// 守卫判定结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Render(AppRoute),
    Redirect(AppRoute),
}

impl GuardDecision {
    /// 最终要展示的路由
    pub fn route(&self) -> AppRoute {
        match self {
            Self::Render(route) | Self::Redirect(route) => *route,
        }
    }

    pub fn is_redirect(&self) -> bool {
        matches!(self, Self::Redirect(_))
    }
}

impl AppRoute {
    /// 将 URL path 解析为路由枚举（精确匹配，忽略查询串与末尾 `/`）
    pub fn from_path(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let trimmed = path.trim_end_matches('/');
        match trimmed {
            "" | "/login" => Self::Login,
            "/register" => Self::Register,
            "/events" => Self::Events,
            "/my-tickets" => Self::MyTickets,
            "/admin" => Self::Admin,
            _ => Self::NotFound,
        }
    }

    /// 获取路由对应的 URL path
    pub fn to_path(&self) -> &'static str {
        match self {
            Self::Login => "/",
            Self::Register => "/register",
            Self::Events => "/events",
            Self::MyTickets => "/my-tickets",
            Self::Admin => "/admin",
            Self::NotFound => "/404",
        }
    }

    /// **核心守卫逻辑：定义该路由的访问要求**
    pub fn requirement(&self) -> RouteRequirement {
        match self {
            Self::Login | Self::Register | Self::NotFound => RouteRequirement::Public,
            Self::Events | Self::MyTickets => RouteRequirement::Session,
            Self::Admin => RouteRequirement::Admin,
        }
    }

    pub fn requires_auth(&self) -> bool {
        self.requirement() != RouteRequirement::Public
    }

    /// 是否包裹在带导航栏的布局中
    pub fn uses_layout(&self) -> bool {
        self.requires_auth()
    }

    /// 获取认证失败时的重定向目标
    pub fn auth_failure_redirect() -> Self {
        Self::Login
    }

    /// 已认证用户的默认落地页（权限不足时也回到这里）
    pub fn landing() -> Self {
        Self::Events
    }
}

impl Display for AppRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_path())
    }
}

/// 判定目标路由在当前会话下是否可达
///
/// - 无会话访问受保护路由 → 登录页
/// - 非 admin 访问 admin 路由 → 默认落地页
/// - 其余情况直接渲染
pub fn guard(target: AppRoute, session: Option<&Session>) -> GuardDecision {
    let access = AccessLevel::of(session);

    match (target.requirement(), access) {
        (RouteRequirement::Public, _) => GuardDecision::Render(target),
        (_, AccessLevel::Unauthenticated) => {
            GuardDecision::Redirect(AppRoute::auth_failure_redirect())
        }
        (RouteRequirement::Admin, AccessLevel::AuthenticatedNoPrivilege) => {
            GuardDecision::Redirect(AppRoute::landing())
        }
        _ => GuardDecision::Render(target),
    }
}

/// 会话变化后对当前路由的重新判定
///
/// 在登录页上完成登录时跳转到落地页；其余情况按 `guard` 处理。
pub fn on_session_change(current: AppRoute, session: Option<&Session>) -> GuardDecision {
    if current == AppRoute::Login && session.is_some() {
        return GuardDecision::Redirect(AppRoute::landing());
    }
    guard(current, session)
}
