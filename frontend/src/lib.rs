//! TicketDesk 前端应用
//!
//! 采用 Context-Driven 的高内聚低耦合架构：
//! - `session`: 会话存储（唯一的共享可变状态）
//! - `web::route`: 路由定义与守卫（领域模型）
//! - `web::router`: 路由服务（核心引擎）
//! - `api` / `controllers`: 后端访问与页面业务流程，不依赖 DOM
//! - `components`: UI 组件层

pub mod api;
mod auth;
pub mod config;
pub mod controllers;
pub mod error;
pub mod logging;
pub mod nav;
pub mod request;
pub mod session;

mod components {
    pub mod admin;
    pub mod events;
    pub mod layout;
    pub mod login;
    pub mod my_tickets;
    pub mod register;
    pub mod toast;
}

// 浏览器原生 API 的封装
pub mod web {
    pub mod download;
    pub mod http;
    pub mod route;
    pub mod router;
    pub mod storage;
}

use leptos::prelude::*;

use crate::api::TicketApi;
use crate::auth::AuthContext;
use crate::components::admin::AdminPage;
use crate::components::events::EventsPage;
use crate::components::layout::Layout;
use crate::components::login::LoginPage;
use crate::components::my_tickets::MyTicketsPage;
use crate::components::register::RegisterPage;
use crate::components::toast::{ToastHost, Toasts};
use crate::config::ClientConfig;
use crate::controllers::MountToken;
use crate::session::{MemorySessionStorage, SessionStore};
use crate::web::http::FetchClient;
use crate::web::route::AppRoute;
use crate::web::router::{Link, Router, RouterOutlet};
use crate::web::storage::BrowserSessionStorage;

/// 浏览器中使用的 API 客户端
pub type BrowserApi = TicketApi<FetchClient>;

pub(crate) fn use_api() -> BrowserApi {
    expect_context::<BrowserApi>()
}

/// 当前视图的挂载标记，视图卸载时自动失效
pub(crate) fn use_mount_token() -> MountToken {
    let token = MountToken::new();
    let disposer = token.clone();
    on_cleanup(move || disposer.dispose());
    token
}

fn open_session_store(config: &ClientConfig) -> SessionStore {
    match BrowserSessionStorage::open(&config.session_storage_key) {
        Some(storage) => SessionStore::new(storage),
        None => SessionStore::new(MemorySessionStorage::new()),
    }
}

/// 路由匹配函数
///
/// 根据 AppRoute 枚举返回对应的视图组件。
fn route_matcher(route: AppRoute) -> AnyView {
    match route {
        AppRoute::Login => view! { <LoginPage /> }.into_any(),
        AppRoute::Register => view! { <RegisterPage /> }.into_any(),
        AppRoute::Events => view! { <Layout><EventsPage /></Layout> }.into_any(),
        AppRoute::MyTickets => view! { <Layout><MyTicketsPage /></Layout> }.into_any(),
        AppRoute::Admin => view! { <Layout><AdminPage /></Layout> }.into_any(),
        AppRoute::NotFound => view! {
            <div class="flex items-center justify-center min-h-screen bg-base-200">
                <div class="text-center">
                    <h1 class="text-6xl font-bold text-error">"404"</h1>
                    <p class="text-xl mt-4">"Page not found"</p>
                    <Link route=AppRoute::Login class="btn btn-link mt-4">"Back to login"</Link>
                </div>
            </div>
        }
        .into_any(),
    }
}

#[component]
pub fn App() -> impl IntoView {
    let config = ClientConfig::from_build_env();

    // 1. 会话存储：守卫、导航栏、API 客户端共用同一个句柄
    let store = open_session_store(&config);
    provide_context(AuthContext::new(store.clone()));

    // 2. API 客户端与通知
    provide_context::<BrowserApi>(TicketApi::new(FetchClient, &config.api_base_url, store.clone()));
    provide_context(Toasts::new(config.toast_timeout));
    provide_context(config);

    view! {
        // 3. 路由器组件：注入会话存储实现守卫
        <Router session=store>
            <RouterOutlet matcher=route_matcher />
            <ToastHost />
        </Router>
    }
}
