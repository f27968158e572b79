//! 受保护页面的外框：侧边导航栏与顶栏

use leptos::prelude::*;

use crate::auth::use_auth;
use crate::nav::{self, visible_links};
use crate::web::router::{Link, use_router};

#[component]
pub fn Sidebar() -> impl IntoView {
    let auth = use_auth();
    let router = use_router();
    let session = auth.session;
    let current_path = router.current_path();

    let on_logout = {
        let store = auth.store.clone();
        let router = router.clone();
        move |_| {
            let target = nav::logout(&store);
            router.replace(target.to_path());
        }
    };

    view! {
        <aside class="w-60 min-h-screen bg-base-100 shadow-xl flex flex-col">
            <div class="p-4 text-xl font-bold text-primary">"TicketDesk"</div>
            <ul class="menu flex-1 gap-1">
                {move || {
                    session
                        .with(|s| visible_links(s.as_ref()))
                        .into_iter()
                        .map(|link| {
                            let class = Signal::derive(move || {
                                if current_path.with(|p| link.is_active(p)) {
                                    "menu-active".to_string()
                                } else {
                                    String::new()
                                }
                            });
                            view! {
                                <li>
                                    <Link route=link.route class=class>
                                        {link.label}
                                    </Link>
                                </li>
                            }
                        })
                        .collect_view()
                }}
            </ul>
            <div class="p-4">
                <button class="btn btn-outline btn-error w-full" on:click=on_logout>
                    "Logout"
                </button>
            </div>
        </aside>
    }
}

#[component]
pub fn Topbar() -> impl IntoView {
    let session = use_auth().session;
    let role = move || {
        session.with(|s| {
            s.as_ref()
                .map(|s| s.role().as_str())
                .unwrap_or_default()
        })
    };

    view! {
        <div class="navbar bg-base-100 rounded-box shadow">
            <div class="flex-1 px-2 text-lg font-semibold">"Welcome to TicketDesk"</div>
            <div class="flex-none px-2">
                <span class="badge badge-primary badge-outline">"Role: " {role}</span>
            </div>
        </div>
    }
}

#[component]
pub fn Layout(children: Children) -> impl IntoView {
    view! {
        <div class="flex min-h-screen bg-base-200 font-sans">
            <Sidebar />
            <main class="flex-1 p-4 md:p-8 space-y-6">
                <Topbar />
                {children()}
            </main>
        </div>
    }
}
