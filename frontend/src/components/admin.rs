mod form_state;

use leptos::prelude::*;
use leptos::task::spawn_local;
use ticketdesk_shared::{Event, ReportPeriod};
use tracing::error;

use self::form_state::EventFormState;
use crate::components::toast::use_toasts;
use crate::controllers::Notification;
use crate::controllers::admin::{AdminController, AdminRefresh, AdminReports};
use crate::web::download::save_bytes;
use crate::{use_api, use_mount_token};

#[component]
pub fn AdminPage() -> impl IntoView {
    let controller = AdminController::new(use_api());
    let toasts = use_toasts();
    let mount = use_mount_token();
    let form = EventFormState::new();

    let (events, set_events) = signal(Vec::<Event>::new());
    let (reports, set_reports) = signal(AdminReports::default());
    let (is_submitting, set_is_submitting) = signal(false);

    let apply = move |refresh: AdminRefresh| {
        if let Some(list) = refresh.events {
            set_events.set(list);
        }
        if let Some(r) = refresh.reports {
            set_reports.set(r);
        }
    };

    // 初始加载：会话过期时只提示一次
    {
        let controller = controller.clone();
        let mount = mount.clone();
        spawn_local(async move {
            let loaded = controller.load_all().await;
            if let Some((refresh, notifications)) = mount.admit(loaded) {
                apply(refresh);
                toasts.extend(notifications);
            }
        });
    }

    let on_create = {
        let controller = controller.clone();
        let mount = mount.clone();
        move |ev: leptos::web_sys::SubmitEvent| {
            ev.prevent_default();
            set_is_submitting.set(true);

            let draft = form.to_draft();
            let controller = controller.clone();
            let mount = mount.clone();
            spawn_local(async move {
                let outcome = controller.create(&draft).await;
                let Some(outcome) = mount.admit(outcome) else {
                    return;
                };
                if outcome.is_success() {
                    form.reset();
                }
                if let Some(refresh) = outcome.value {
                    apply(refresh);
                }
                toasts.extend(outcome.notifications);
                set_is_submitting.set(false);
            });
        }
    };

    let handle_delete = {
        let controller = controller.clone();
        let mount = mount.clone();
        move |event: Event| {
            let controller = controller.clone();
            let mount = mount.clone();
            spawn_local(async move {
                let outcome = controller.delete(&event).await;
                let Some(outcome) = mount.admit(outcome) else {
                    return;
                };
                if let Some(refresh) = outcome.value {
                    apply(refresh);
                }
                toasts.extend(outcome.notifications);
            });
        }
    };

    let handle_download = move |period: ReportPeriod| {
        let controller = controller.clone();
        spawn_local(async move {
            let outcome = controller.download(period).await;
            match outcome.value {
                Some(file) => match save_bytes(&file.file_name, &file.bytes) {
                    Ok(()) => toasts.extend(outcome.notifications),
                    Err(e) => {
                        error!(error = %e, "Saving report failed");
                        toasts.push(Notification::from_error(&e, "Failed to download report"));
                    }
                },
                None => toasts.extend(outcome.notifications),
            }
        });
    };

    let total_events = move || events.with(Vec::len);
    let total_bookings = move || reports.with(|r| r.total_bookings);

    view! {
        <div class="space-y-6">
            <h2 class="text-2xl font-bold">"Admin Dashboard"</h2>

            // 统计
            <div class="stats shadow bg-base-100 w-full">
                <div class="stat">
                    <div class="stat-title">"Total Bookings"</div>
                    <div class="stat-value text-primary">{total_bookings}</div>
                </div>
                <div class="stat">
                    <div class="stat-title">"Total Events"</div>
                    <div class="stat-value">{total_events}</div>
                </div>
                <div class="stat">
                    <div class="stat-title">"Reports"</div>
                    <div class="stat-actions flex gap-2">
                        <button
                            class="btn btn-sm btn-outline"
                            on:click={
                                let handle_download = handle_download.clone();
                                move |_| handle_download(ReportPeriod::Weekly)
                            }
                        >
                            "Weekly Report"
                        </button>
                        <button
                            class="btn btn-sm btn-outline"
                            on:click=move |_| handle_download(ReportPeriod::Monthly)
                        >
                            "Monthly Report"
                        </button>
                    </div>
                </div>
            </div>

            // 创建活动
            <div class="card bg-base-100 shadow-xl">
                <form class="card-body" on:submit=on_create>
                    <h3 class="card-title">"Create Event"</h3>
                    <div class="flex flex-col md:flex-row gap-4">
                        <input
                            type="text"
                            placeholder="Event name"
                            class="input input-bordered flex-1"
                            on:input=move |ev| form.name.set(event_target_value(&ev))
                            prop:value=move || form.name.get()
                        />
                        <input
                            type="number"
                            min="1"
                            placeholder="Total seats"
                            class="input input-bordered w-40"
                            on:input=move |ev| form.total_seats.set(event_target_value(&ev))
                            prop:value=move || form.total_seats.get()
                        />
                        <button class="btn btn-primary" disabled=move || is_submitting.get()>
                            "Create"
                        </button>
                    </div>
                </form>
            </div>

            // 按活动统计
            <div class="card bg-base-100 shadow-xl">
                <div class="card-body">
                    <h3 class="card-title">"Event-wise Report"</h3>
                    <table class="table">
                        <thead>
                            <tr>
                                <th>"Event"</th>
                                <th>"Bookings"</th>
                            </tr>
                        </thead>
                        <tbody>
                            <For
                                each=move || reports.get().rows
                                key=|row| (row.event_name.clone(), row.total_bookings)
                                children=move |row| {
                                    view! {
                                        <tr>
                                            <td>{row.event_name}</td>
                                            <td>{row.total_bookings}</td>
                                        </tr>
                                    }
                                }
                            />
                        </tbody>
                    </table>
                </div>
            </div>

            // 活动管理
            <div class="card bg-base-100 shadow-xl">
                <div class="card-body">
                    <h3 class="card-title">"Events"</h3>
                    <table class="table">
                        <thead>
                            <tr>
                                <th>"Name"</th>
                                <th>"Total"</th>
                                <th>"Available"</th>
                                <th></th>
                            </tr>
                        </thead>
                        <tbody>
                            <For
                                each=move || events.get()
                                key=|e| (e.id, e.available_seats)
                                children=move |event| {
                                    let handle_delete = handle_delete.clone();
                                    let target = event.clone();
                                    view! {
                                        <tr>
                                            <td>{event.name}</td>
                                            <td>{event.total_seats}</td>
                                            <td>{event.available_seats}</td>
                                            <td class="text-right">
                                                <button
                                                    class="btn btn-error btn-outline btn-sm"
                                                    on:click=move |_| handle_delete(target.clone())
                                                >
                                                    "Delete"
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
