use leptos::prelude::*;
use leptos::task::spawn_local;
use ticketdesk_shared::Ticket;

use crate::components::toast::use_toasts;
use crate::controllers::my_tickets::MyTicketsController;
use crate::{use_api, use_mount_token};

#[component]
pub fn MyTicketsPage() -> impl IntoView {
    let controller = MyTicketsController::new(use_api());
    let toasts = use_toasts();
    let mount = use_mount_token();

    let (tickets, set_tickets) = signal(Vec::<Ticket>::new());
    let (loading, set_loading) = signal(true);

    {
        let controller = controller.clone();
        let mount = mount.clone();
        spawn_local(async move {
            let result = controller.load().await;
            let Some(result) = mount.admit(result) else {
                return;
            };
            match result {
                Ok(list) => set_tickets.set(list),
                Err(n) => toasts.push(n),
            }
            set_loading.set(false);
        });
    }

    let handle_cancel = move |ticket: Ticket| {
        let controller = controller.clone();
        let mount = mount.clone();
        spawn_local(async move {
            let outcome = controller.cancel(&ticket).await;
            let Some(outcome) = mount.admit(outcome) else {
                return;
            };
            if let Some(list) = outcome.value {
                set_tickets.set(list);
            }
            toasts.extend(outcome.notifications);
        });
    };

    view! {
        <div class="card bg-base-100 shadow-xl">
            <div class="card-body">
                <h2 class="card-title">"My Tickets"</h2>
                <div class="overflow-x-auto">
                    <table class="table">
                        <thead>
                            <tr>
                                <th>"Event"</th>
                                <th>"Reference"</th>
                                <th></th>
                            </tr>
                        </thead>
                        <tbody>
                            <Show when=move || !loading.get() && tickets.with(Vec::is_empty)>
                                <tr>
                                    <td colspan="3" class="text-center py-8 text-base-content/50">
                                        "No tickets booked yet"
                                    </td>
                                </tr>
                            </Show>
                            <For
                                each=move || tickets.get()
                                key=|t| t.id
                                children=move |ticket| {
                                    let handle_cancel = handle_cancel.clone();
                                    let target = ticket.clone();
                                    view! {
                                        <tr>
                                            <td>{ticket.event_name}</td>
                                            <td class="font-mono text-sm">{ticket.reference_number}</td>
                                            <td class="text-right">
                                                <button
                                                    class="btn btn-error btn-outline btn-sm"
                                                    on:click=move |_| handle_cancel(target.clone())
                                                >
                                                    "Cancel"
                                                </button>
                                            </td>
                                        </tr>
                                    }
                                }
                            />
                        </tbody>
                    </table>
                </div>
            </div>
        </div>
    }
}
