//! Reservation form for one facility.

use crate::api::use_api;
use crate::auth::use_auth;
use crate::components::map_panel::MapPanel;
use crate::components::status::{ErrorAlert, Loaded, use_view_scope};
use crate::web::router::use_router;
use easypark::browse::load_facility;
use easypark::history::fetch_users;
use easypark::load::LoadState;
use easypark::map::MapView;
use easypark::reservation::{ReservationForm, filter_users, submit_reservation};
use easypark_shared::pricing::format_money;
use easypark_shared::{Facility, UserIdentity};
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
pub fn ReservationPage(facility_id: String) -> impl IntoView {
    let api = use_api();
    let auth = use_auth();
    let scope = use_view_scope();
    let (state, set_state) = signal(LoadState::<Facility>::Loading);

    spawn_local(async move {
        if let Some(result) = scope.run(load_facility(&api.api, &facility_id)).await {
            set_state.set(result.map_err(|e| auth.check(e)).into());
        }
    });

    view! {
        <div class="max-w-5xl mx-auto p-4 md:p-8 space-y-6">
            <Loaded state=state ready=|facility: Facility| view! { <ReservationCard facility=facility /> } />
        </div>
    }
}

#[component]
fn ReservationCard(facility: Facility) -> impl IntoView {
    let api = use_api();
    let auth = use_auth();
    let router = use_router();
    let scope = use_view_scope();
    let session = auth.session();

    let form = RwSignal::new(ReservationForm::default());
    let users = RwSignal::new(Vec::<UserIdentity>::new());
    let (is_submitting, set_is_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);
    let (success_msg, set_success_msg) = signal(Option::<String>::None);

    // admins book on behalf of someone else
    if session.get_untracked().is_admin() {
        let api = api.clone();
        let scope = scope.clone();
        let session = session.get_untracked();
        spawn_local(async move {
            match scope.run(fetch_users(&api.api, &session)).await {
                Some(Ok(list)) => users.set(list),
                Some(Err(e)) => {
                    log::warn!("{e}");
                    set_error_msg.set(Some(auth.check(e).user_message()));
                }
                None => {}
            }
        });
    }

    let rate = facility.hourly_rate;
    let quote = Memo::new(move |_| form.with(|f| f.quote(rate)));
    let can_submit = Memo::new(move |_| {
        let submitting = is_submitting.get() || success_msg.with(Option::is_some);
        session.with(|s| form.with(|f| f.can_submit(s, submitting)))
    });

    let on_submit = {
        let facility = facility.clone();
        move |ev: web_sys::SubmitEvent| {
            ev.prevent_default();
            if !can_submit.get_untracked() {
                return;
            }
            set_is_submitting.set(true);
            set_error_msg.set(None);

            let api = api.clone();
            let scope = scope.clone();
            let facility = facility.clone();
            let snapshot = form.get_untracked();
            let current = session.get_untracked();
            spawn_local(async move {
                let submitted = scope
                    .run(submit_reservation(&api.api, &current, &facility, &snapshot, &api.config))
                    .await;
                let Some(submitted) = submitted else { return };
                set_is_submitting.set(false);

                match submitted {
                    Ok(receipt) => {
                        set_success_msg.set(Some(receipt.message.clone()));
                        if let Some(route) = scope
                            .run(receipt.await_redirect(gloo_timers::future::sleep))
                            .await
                        {
                            router.redirect(route);
                        }
                    }
                    Err(e) => {
                        log::warn!("{e}");
                        set_error_msg.set(Some(auth.check(e).user_message()));
                    }
                }
            });
        }
    };

    let is_admin = move || session.with(|s| s.is_admin());
    let map = MapView::single(&facility);

    view! {
        <div class="grid lg:grid-cols-2 gap-6">
            <form class="card bg-base-100 shadow-xl" on:submit=on_submit>
                <div class="card-body space-y-3">
                    <h1 class="card-title text-2xl">{facility.name.clone()}</h1>
                    <p class="text-sm opacity-70">{facility.address.clone()}</p>
                    <p class="text-sm">
                        {format_money(facility.hourly_rate)} " per hour · "
                        {format!("{} spaces free", facility.available_spaces)}
                    </p>

                    <Show when=move || error_msg.get().is_some()>
                        <ErrorAlert message=Signal::derive(move || error_msg.get().unwrap_or_default()) />
                    </Show>
                    <Show when=move || success_msg.get().is_some()>
                        <div role="status" class="alert alert-success text-sm py-2">
                            <span>{move || success_msg.get().unwrap_or_default()}</span>
                        </div>
                    </Show>

                    <Show when=is_admin>
                        <UserPicker form=form users=users />
                    </Show>

                    <div class="grid grid-cols-2 gap-2">
                        <div class="form-control">
                            <label for="start" class="label"><span class="label-text">"Start"</span></label>
                            <input
                                id="start"
                                type="datetime-local"
                                on:input=move |ev| form.update(|f| f.start = event_target_value(&ev))
                                prop:value=move || form.with(|f| f.start.clone())
                                class="input input-bordered w-full"
                                required
                            />
                        </div>
                        <div class="form-control">
                            <label for="end" class="label"><span class="label-text">"End"</span></label>
                            <input
                                id="end"
                                type="datetime-local"
                                on:input=move |ev| form.update(|f| f.end = event_target_value(&ev))
                                prop:value=move || form.with(|f| f.end.clone())
                                class="input input-bordered w-full"
                                required
                            />
                        </div>
                    </div>

                    <div class="form-control">
                        <label for="notes" class="label"><span class="label-text">"Notes"</span></label>
                        <textarea
                            id="notes"
                            on:input=move |ev| form.update(|f| f.notes = event_target_value(&ev))
                            prop:value=move || form.with(|f| f.notes.clone())
                            class="textarea textarea-bordered"
                        ></textarea>
                    </div>

                    <div class="stats bg-base-200">
                        <div class="stat py-2">
                            <div class="stat-title">"Hours"</div>
                            <div class="stat-value text-lg">{move || quote.get().display_hours()}</div>
                        </div>
                        <div class="stat py-2">
                            <div class="stat-title">"Total"</div>
                            <div class="stat-value text-lg text-primary">
                                {move || format_money(quote.get().total)}
                            </div>
                        </div>
                    </div>

                    <div class="card-actions justify-end">
                        <button class="btn btn-primary" disabled=move || !can_submit.get()>
                            {move || if is_submitting.get() {
                                view! { <span class="loading loading-spinner"></span> "Reserving..." }.into_any()
                            } else {
                                "Confirm reservation".into_any()
                            }}
                        </button>
                    </div>
                </div>
            </form>
            <MapPanel map=map />
        </div>
    }
}

/// Target-user search for admins.
#[component]
fn UserPicker(form: RwSignal<ReservationForm>, users: RwSignal<Vec<UserIdentity>>) -> impl IntoView {
    let matches = move || {
        let query = form.with(|f| f.user_query.clone());
        users.with(|all| filter_users(all, &query).into_iter().cloned().collect::<Vec<_>>())
    };

    view! {
        <div class="form-control">
            <label for="user-query" class="label">
                <span class="label-text">"Reserve for"</span>
                <span class="label-text-alt">
                    {move || form.with(|f| f.target.as_ref().map(UserIdentity::display_name))
                        .unwrap_or_else(|| "nobody selected".to_string())}
                </span>
            </label>
            <input
                id="user-query"
                type="search"
                placeholder="Search by name or email"
                on:input=move |ev| form.update(|f| f.user_query = event_target_value(&ev))
                prop:value=move || form.with(|f| f.user_query.clone())
                class="input input-bordered input-sm"
            />
            <ul class="menu menu-sm bg-base-200 rounded-box mt-1 max-h-40 overflow-y-auto">
                <For
                    each=matches
                    key=|user| user.id.clone()
                    children=move |user| {
                        let id = user.id.clone();
                        let selected = move || form.with(|f| f.target.as_ref().is_some_and(|t| t.id == id));
                        let label = format!("{} · {}", user.display_name(), user.email);
                        view! {
                            <li>
                                <a
                                    class:active=selected
                                    on:click=move |_| form.update(|f| f.target = Some(user.clone()))
                                >
                                    {label}
                                </a>
                            </li>
                        }
                    }
                />
            </ul>
        </div>
    }
}
