use crate::api::use_api;
use crate::auth::{register, use_auth};
use crate::components::status::ErrorAlert;
use crate::web::router::{Link, use_navigate};
use easypark::AppRoute;
use easypark_shared::Registration;
use leptos::prelude::*;
use leptos::task::spawn_local;

const MIN_PASSWORD_LEN: usize = 6;

/// Sign-up form. A new account is signed in right away.
#[component]
pub fn RegisterPage() -> impl IntoView {
    let auth = use_auth();
    let api = use_api();
    let navigate = use_navigate();

    let (name, set_name) = signal(String::new());
    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (confirm, set_confirm) = signal(String::new());
    let (is_submitting, set_is_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let problem = if name.get().trim().is_empty() || email.get().trim().is_empty() {
            Some("Please fill in all fields.")
        } else if password.get().len() < MIN_PASSWORD_LEN {
            Some("The password must have at least 6 characters.")
        } else if password.get() != confirm.get() {
            Some("The passwords do not match.")
        } else {
            None
        };
        if let Some(problem) = problem {
            set_error_msg.set(Some(problem.to_string()));
            return;
        }

        set_is_submitting.set(true);
        set_error_msg.set(None);

        let registration = Registration {
            email: email.get().trim().to_string(),
            password: password.get(),
            name: name.get().trim().to_string(),
        };
        let api = api.clone();
        let navigate = navigate.clone();
        spawn_local(async move {
            match register(&auth, &api, registration).await {
                Ok(_) => navigate(&AppRoute::auth_success_redirect().to_path()),
                Err(e) => {
                    log::warn!("{e}");
                    set_error_msg.set(Some(e.user_message()));
                }
            }
            set_is_submitting.set(false);
        });
    };

    let field = |id: &'static str, label: &'static str, kind: &'static str, value: ReadSignal<String>, set: WriteSignal<String>| {
        view! {
            <div class="form-control">
                <label class="label" for=id>
                    <span class="label-text">{label}</span>
                </label>
                <input
                    id=id
                    type=kind
                    on:input=move |ev| set.set(event_target_value(&ev))
                    prop:value=value
                    class="input input-bordered"
                    required
                />
            </div>
        }
    };

    view! {
        <div class="hero min-h-[80vh] bg-base-200">
            <div class="hero-content flex-col w-full max-w-md">
                <h1 class="text-3xl font-bold">"Create an account"</h1>
                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <form class="card-body" on:submit=on_submit>
                        <Show when=move || error_msg.get().is_some()>
                            <ErrorAlert message=Signal::derive(move || error_msg.get().unwrap_or_default()) />
                        </Show>

                        {field("name", "Full name", "text", name, set_name)}
                        {field("email", "Email", "email", email, set_email)}
                        {field("password", "Password", "password", password, set_password)}
                        {field("confirm", "Confirm password", "password", confirm, set_confirm)}

                        <div class="form-control mt-6">
                            <button class="btn btn-primary" disabled=move || is_submitting.get()>
                                {move || if is_submitting.get() {
                                    view! { <span class="loading loading-spinner"></span> "Creating account..." }.into_any()
                                } else {
                                    "Register".into_any()
                                }}
                            </button>
                        </div>
                        <p class="text-center text-sm mt-2">
                            "Already registered? "
                            <Link to=AppRoute::Login.to_path() class="link link-primary">"Sign in"</Link>
                        </p>
                    </form>
                </div>
            </div>
        </div>
    }
}
