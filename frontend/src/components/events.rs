use leptos::prelude::*;
use leptos::task::spawn_local;
use ticketdesk_shared::Event;

use crate::components::toast::use_toasts;
use crate::controllers::events::EventsController;
use crate::{use_api, use_mount_token};

#[component]
pub fn EventsPage() -> impl IntoView {
    let controller = EventsController::new(use_api());
    let toasts = use_toasts();
    let mount = use_mount_token();

    let (events, set_events) = signal(Vec::<Event>::new());
    let (loading, set_loading) = signal(true);

    // 初始加载
    {
        let controller = controller.clone();
        let mount = mount.clone();
        spawn_local(async move {
            let result = controller.load().await;
            let Some(result) = mount.admit(result) else {
                return;
            };
            match result {
                Ok(list) => set_events.set(list),
                Err(n) => toasts.push(n),
            }
            set_loading.set(false);
        });
    }

    let handle_book = move |event: Event| {
        let controller = controller.clone();
        let mount = mount.clone();
        spawn_local(async move {
            let outcome = controller.book(&event).await;
            let Some(outcome) = mount.admit(outcome) else {
                return;
            };
            if let Some(list) = outcome.value {
                set_events.set(list);
            }
            toasts.extend(outcome.notifications);
        });
    };

    view! {
        <div class="space-y-4">
            <h2 class="text-2xl font-bold">"Events"</h2>
            <Show when=move || loading.get() && events.with(Vec::is_empty)>
                <span class="loading loading-spinner loading-md"></span>
            </Show>
            <Show when=move || !loading.get() && events.with(Vec::is_empty)>
                <p class="text-base-content/50">"No events available"</p>
            </Show>
            <div class="grid gap-4 md:grid-cols-2 lg:grid-cols-3">
                <For
                    each=move || events.get()
                    key=|e| (e.id, e.available_seats)
                    children=move |event| {
                        let sold_out = event.is_sold_out();
                        let handle_book = handle_book.clone();
                        let target = event.clone();
                        view! {
                            <div class="card bg-base-100 shadow-xl">
                                <div class="card-body">
                                    <h3 class="card-title">{event.name}</h3>
                                    <p>"Total seats: " {event.total_seats}</p>
                                    <p>"Available: " {event.available_seats}</p>
                                    <div class="card-actions justify-end">
                                        <button
                                            class="btn btn-primary btn-sm"
                                            disabled=sold_out
                                            on:click=move |_| handle_book(target.clone())
                                        >
                                            {if sold_out { "Sold Out" } else { "Book Ticket" }}
                                        </button>
                                    </div>
                                </div>
                            </div>
                        }
                    }
                />
            </div>
        </div>
    }
}
