use crate::api::use_api;
use crate::auth::use_auth;
use crate::components::icons::MapPin;
use crate::components::map_panel::MapPanel;
use crate::components::status::{ErrorAlert, use_view_scope};
use crate::web::BrowserLocator;
use crate::web::router::use_navigate;
use easypark::AppRoute;
use easypark::browse::Locator;
use easypark::config::DEFAULT_CENTER;
use easypark::map::MapView;
use easypark::registration::{FacilityDraft, register_facility};
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
pub fn FacilityRegisterPage() -> impl IntoView {
    let api = use_api();
    let auth = use_auth();
    let scope = use_view_scope();
    let navigate = use_navigate();

    let draft = RwSignal::new(FacilityDraft::default());
    let (is_submitting, set_is_submitting) = signal(false);
    let (is_locating, set_is_locating) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    let picker = Memo::new(move |_| {
        MapView::picker(draft.with(FacilityDraft::position).unwrap_or(DEFAULT_CENTER))
    });

    let use_my_location = {
        let scope = scope.clone();
        move |_| {
            let scope = scope.clone();
            set_is_locating.set(true);
            spawn_local(async move {
                match scope.run(BrowserLocator.locate()).await {
                    Some(Ok(position)) => draft.update(|d| d.set_position(position)),
                    Some(Err(e)) => {
                        log::info!("{e}");
                        set_error_msg.set(Some(e.user_message()));
                    }
                    None => return,
                }
                set_is_locating.set(false);
            });
        }
    };

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        set_is_submitting.set(true);
        set_error_msg.set(None);

        let snapshot = draft.get_untracked();
        let session = auth.session_untracked();
        let api = api.clone();
        let scope = scope.clone();
        let navigate = navigate.clone();
        spawn_local(async move {
            let Some(result) = scope
                .run(register_facility(&api.api, &session, &snapshot))
                .await
            else {
                return;
            };
            match result {
                Ok(_) => navigate(&AppRoute::Facilities.to_path()),
                Err(e) => {
                    log::warn!("{e}");
                    set_error_msg.set(Some(auth.check(e).user_message()));
                }
            }
            set_is_submitting.set(false);
        });
    };

    view! {
        <div class="max-w-5xl mx-auto p-4 md:p-8 space-y-6">
            <h1 class="text-3xl font-bold">"Register a parking"</h1>
            <div class="grid lg:grid-cols-2 gap-6">
                <form class="card bg-base-100 shadow-xl" on:submit=on_submit>
                    <div class="card-body space-y-2">
                        <Show when=move || error_msg.get().is_some()>
                            <ErrorAlert message=Signal::derive(move || error_msg.get().unwrap_or_default()) />
                        </Show>

                        {text_field(draft, "name", "Name", "text", |d| &d.name, |d, v| d.name = v)}
                        {text_field(draft, "address", "Address", "text", |d| &d.address, |d, v| d.address = v)}
                        {text_field(draft, "city", "City", "text", |d| &d.city, |d, v| d.city = v)}
                        <div class="grid grid-cols-3 gap-2">
                            {text_field(draft, "total", "Total spaces", "number", |d| &d.total_spaces, |d, v| d.total_spaces = v)}
                            {text_field(draft, "hourly", "Hourly rate", "number", |d| &d.hourly_rate, |d, v| d.hourly_rate = v)}
                            {text_field(draft, "daily", "Daily rate", "number", |d| &d.daily_rate, |d, v| d.daily_rate = v)}
                        </div>
                        <div class="grid grid-cols-2 gap-2">
                            {text_field(draft, "lat", "Latitude", "number", |d| &d.latitude, |d, v| d.latitude = v)}
                            {text_field(draft, "lon", "Longitude", "number", |d| &d.longitude, |d, v| d.longitude = v)}
                        </div>
                        <button
                            type="button"
                            class="btn btn-outline btn-sm gap-2"
                            on:click=use_my_location
                            disabled=move || is_locating.get()
                        >
                            <MapPin attr:class="h-4 w-4" />
                            {move || if is_locating.get() { "Locating..." } else { "Use my location" }}
                        </button>

                        <div class="card-actions justify-end mt-4">
                            <button class="btn btn-primary" disabled=move || is_submitting.get()>
                                {move || if is_submitting.get() {
                                    view! { <span class="loading loading-spinner"></span> "Saving..." }.into_any()
                                } else {
                                    "Register parking".into_any()
                                }}
                            </button>
                        </div>
                    </div>
                </form>
                <MapPanel map=picker />
            </div>
        </div>
    }
}

fn text_field(
    draft: RwSignal<FacilityDraft>,
    id: &'static str,
    label: &'static str,
    kind: &'static str,
    get: fn(&FacilityDraft) -> &String,
    set: fn(&mut FacilityDraft, String),
) -> impl IntoView {
    view! {
        <div class="form-control">
            <label for=id class="label">
                <span class="label-text">{label}</span>
            </label>
            <input
                id=id
                type=kind
                step="any"
                on:input=move |ev| draft.update(|d| set(d, event_target_value(&ev)))
                prop:value=move || draft.with(|d| get(d).clone())
                class="input input-bordered w-full"
            />
        </div>
    }
}
