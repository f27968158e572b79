use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::components::toast::use_toasts;
use crate::controllers::register::RegisterController;
use crate::use_api;
use crate::web::route::AppRoute;
use crate::web::router::{Link, use_router};

#[component]
pub fn RegisterPage() -> impl IntoView {
    let controller = RegisterController::new(use_api());
    let toasts = use_toasts();
    let router = use_router();

    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (is_submitting, set_is_submitting) = signal(false);

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        set_is_submitting.set(true);

        let controller = controller.clone();
        let router = router.clone();
        spawn_local(async move {
            let outcome = controller
                .register(&email.get_untracked(), &password.get_untracked())
                .await;
            toasts.extend(outcome.notifications);
            set_is_submitting.set(false);
            if let Some(next) = outcome.value {
                router.navigate(next.to_path());
            }
        });
    };

    view! {
        <div class="hero min-h-screen bg-base-200">
            <div class="hero-content flex-col w-full max-w-md">
                <div class="text-center mb-4">
                    <h1 class="text-3xl font-bold">"Create an account"</h1>
                </div>

                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <form class="card-body" on:submit=on_submit>
                        <div class="form-control">
                            <label class="label" for="email">
                                <span class="label-text">"Email"</span>
                            </label>
                            <input
                                id="email"
                                type="email"
                                on:input=move |ev| set_email.set(event_target_value(&ev))
                                prop:value=email
                                class="input input-bordered"
                            />
                        </div>
                        <div class="form-control">
                            <label class="label" for="password">
                                <span class="label-text">"Password"</span>
                            </label>
                            <input
                                id="password"
                                type="password"
                                on:input=move |ev| set_password.set(event_target_value(&ev))
                                prop:value=password
                                class="input input-bordered"
                            />
                        </div>
                        <div class="form-control mt-6">
                            <button class="btn btn-primary" disabled=move || is_submitting.get()>
                                "Register"
                            </button>
                        </div>
                        <p class="text-sm text-center mt-2">
                            "Already registered? "
                            <Link route=AppRoute::Login class="link link-primary">
                                "Login"
                            </Link>
                        </p>
                    </form>
                </div>
            </div>
        </div>
    }
}
