//! 路由服务模块 - 核心引擎
//!
//! 封装了 web_sys 的 History API，实现高内聚：
//! 所有对 window.history 的操作都集中在此模块。
//! 实现了"监听 -> 验证 -> 处理 -> 加载"的导航流程。

use leptos::prelude::*;
use tracing::{debug, info};
use wasm_bindgen::prelude::*;

use super::route::{AppRoute, GuardDecision, guard, on_session_change};
use crate::session::SessionStore;

/// 获取当前浏览器路径
fn current_path() -> String {
    web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_else(|| "/".to_string())
}

/// 写入 History 状态；`push` 为 false 时替换当前条目
fn write_history(path: &str, push: bool) {
    let Some(history) = web_sys::window().and_then(|w| w.history().ok()) else {
        return;
    };
    let _ = if push {
        history.push_state_with_url(&JsValue::NULL, "", Some(path))
    } else {
        history.replace_state_with_url(&JsValue::NULL, "", Some(path))
    };
}

/// 路由器服务
///
/// 封装所有路由操作，通过 Signal 驱动界面更新。
/// 每次导航都从会话存储重新读取会话，不缓存认证结果。
#[derive(Clone)]
pub struct RouterService {
    /// 当前路由（只读信号）
    current_route: ReadSignal<AppRoute>,
    set_route: WriteSignal<AppRoute>,
    /// 地址栏中的实际路径，用于导航链接的激活状态
    current_path: ReadSignal<String>,
    set_path: WriteSignal<String>,
    session: SessionStore,
}

impl RouterService {
    fn new(session: SessionStore) -> Self {
        let (current_route, set_route) = signal(AppRoute::default());
        let (current_path, set_path) = signal(String::from("/"));

        Self {
            current_route,
            set_route,
            current_path,
            set_path,
            session,
        }
    }

    /// 获取当前路由信号
    pub fn current_route(&self) -> ReadSignal<AppRoute> {
        self.current_route
    }

    pub fn current_path(&self) -> ReadSignal<String> {
        self.current_path
    }

    /// **核心方法：导航与守卫**
    ///
    /// 流程：请求 -> 验证(Guard) -> 处理 -> 加载
    pub fn navigate(&self, path: &str) {
        self.resolve(path, true);
    }

    /// 以替换方式导航，不产生新的历史记录
    pub fn replace(&self, path: &str) {
        self.resolve(path, false);
    }

    fn resolve(&self, path: &str, push: bool) {
        let target = AppRoute::from_path(path);
        let session = self.session.get();

        match guard(target, session.as_ref()) {
            GuardDecision::Render(route) => {
                debug!(%path, ?route, "Route rendered");
                write_history(path, push);
                self.load(route, path);
            }
            GuardDecision::Redirect(route) => {
                info!(%path, redirect = %route, "Route guarded, redirecting");
                write_history(route.to_path(), push);
                self.load(route, route.to_path());
            }
        }
    }

    fn load(&self, route: AppRoute, path: &str) {
        self.set_path.set(path.to_string());
        self.set_route.set(route);
    }

    /// 初始化浏览器后退/前进按钮监听
    fn init_popstate_listener(&self) {
        let router = self.clone();

        // popstate 时也执行守卫逻辑，重定向时替换当前条目
        let closure = Closure::<dyn Fn()>::new(move || {
            router.replace(&current_path());
        });

        if let Some(window) = web_sys::window() {
            let _ = window
                .add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref());
        }

        // 泄漏闭包以保持监听器存活
        closure.forget();
    }

    /// 订阅会话变化，对当前路由重新判定
    ///
    /// 登出或会话过期时离开受保护页面；在登录页完成登录时进入落地页。
    fn setup_session_redirect(&self) {
        let current_route = self.current_route;
        let set_route = self.set_route;
        let set_path = self.set_path;

        let id = self.session.subscribe(move |session| {
            let route = current_route.get_untracked();
            if let GuardDecision::Redirect(target) = on_session_change(route, session) {
                info!(from = %route, to = %target, "Session changed, redirecting");
                write_history(target.to_path(), true);
                set_path.set(target.to_path().to_string());
                set_route.set(target);
            }
        });

        let session = self.session.clone();
        on_cleanup(move || session.unsubscribe(id));
    }
}

/// 提供路由服务到 Context 并初始化
fn provide_router(session: SessionStore) -> RouterService {
    let router = RouterService::new(session);

    // 首次加载同样经过守卫
    router.replace(&current_path());
    router.init_popstate_listener();
    router.setup_session_redirect();

    provide_context(router.clone());
    router
}

/// 从 Context 获取路由服务
pub fn use_router() -> RouterService {
    expect_context::<RouterService>()
}

/// 导航函数（返回一个可调用的闭包）
pub fn use_navigate() -> impl Fn(&str) + Clone {
    let router = use_router();
    move |to: &str| {
        router.navigate(to);
    }
}

// ============================================================================
// UI 组件
// ============================================================================

/// 路由器根组件
///
/// 提供路由上下文，应在 App 根部使用。
#[component]
pub fn Router(
    /// 会话存储，导航守卫从这里读取会话
    session: SessionStore,
    children: Children,
) -> impl IntoView {
    provide_router(session);

    children()
}

/// 路由出口组件
///
/// 根据当前路由状态渲染对应的组件。
#[component]
pub fn RouterOutlet(
    /// 路由匹配函数：接收当前路由，返回对应视图
    matcher: fn(AppRoute) -> AnyView,
) -> impl IntoView {
    let router = use_router();

    move || {
        let current = router.current_route().get();
        matcher(current)
    }
}

/// 应用内链接：拦截点击，经由路由服务导航
#[component]
pub fn Link(
    route: AppRoute,
    #[prop(into)] class: Signal<String>,
    children: Children,
) -> impl IntoView {
    let router = use_router();

    let on_click = move |ev: web_sys::MouseEvent| {
        ev.prevent_default();
        router.navigate(route.to_path());
    };

    view! {
        <a href=route.to_path() class=class on:click=on_click>
            {children()}
        </a>
    }
}
