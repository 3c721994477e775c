//! Reservation lists: the admin view of every reservation and the signed-in
//! user's recent ones.

use crate::api::use_api;
use crate::auth::use_auth;
use crate::components::icons::{Calendar, RefreshCw};
use crate::components::status::{ErrorAlert, Loaded, use_view_scope};
use easypark::history::{
    PaymentFilter, ReservationFilter, cancel_reservation, fetch_all_reservations,
    fetch_my_reservations, fetch_users, parse_status_filter, user_label,
};
use easypark::load::LoadState;
use easypark_shared::date::{format_date, format_time};
use easypark_shared::pricing::format_money;
use easypark_shared::{Reservation, ReservationStatus, UserIdentity};
use leptos::prelude::*;
use leptos::task::spawn_local;

fn status_badge(status: &ReservationStatus) -> &'static str {
    match status {
        ReservationStatus::Pending => "badge badge-warning",
        ReservationStatus::Confirmed | ReservationStatus::Active => "badge badge-success",
        ReservationStatus::Cancelled => "badge badge-error",
        ReservationStatus::Completed => "badge badge-neutral",
        ReservationStatus::Other(_) => "badge badge-ghost",
    }
}

fn payment_label(reservation: &Reservation) -> String {
    reservation
        .payment_status
        .as_ref()
        .map_or_else(|| "-".to_string(), |p| p.label().to_string())
}

/// Status and payment selects, shared by both lists.
#[component]
fn FilterBar(filter: RwSignal<ReservationFilter>) -> impl IntoView {
    view! {
        <select
            class="select select-bordered select-sm"
            on:change=move |ev| {
                let status = parse_status_filter(&event_target_value(&ev));
                filter.update(|f| f.status = status);
            }
        >
            <option value="">"Any status"</option>
            {ReservationStatus::ALL
                .into_iter()
                .map(|s| view! { <option value=s.as_str().to_string()>{s.label().to_string()}</option> })
                .collect_view()}
        </select>
        <select
            class="select select-bordered select-sm"
            on:change=move |ev| {
                let payment = PaymentFilter::parse(&event_target_value(&ev));
                filter.update(|f| f.payment = payment);
            }
        >
            {PaymentFilter::ALL
                .into_iter()
                .map(|p| view! { <option value=p.as_str()>{format!("Paid: {}", p.label())}</option> })
                .collect_view()}
        </select>
    }
}

// =========================================================
// Admin list
// =========================================================

#[component]
pub fn ReservationsPage() -> impl IntoView {
    let api = use_api();
    let auth = use_auth();
    let scope = use_view_scope();

    let (state, set_state) = signal(LoadState::<Vec<Reservation>>::Loading);
    let users = RwSignal::new(Vec::<UserIdentity>::new());
    let filter = RwSignal::new(ReservationFilter::default());

    let load = move || {
        let api = api.clone();
        let scope = scope.clone();
        let session = auth.session_untracked();
        set_state.set(LoadState::Loading);
        spawn_local(async move {
            let loaded = scope
                .run(async {
                    let reservations = fetch_all_reservations(&api.api, &session).await;
                    // names are a nicety; the list works with raw ids
                    let names = fetch_users(&api.api, &session).await;
                    (reservations, names)
                })
                .await;
            if let Some((reservations, names)) = loaded {
                match names {
                    Ok(list) => users.set(list),
                    Err(e) => log::warn!("{e}"),
                }
                set_state.set(reservations.map_err(|e| auth.check(e)).into());
            }
        });
    };
    load();

    let rows = move |all: Vec<Reservation>| {
        move || {
            let visible: Vec<Reservation> =
                filter.with(|f| f.apply(&all).into_iter().cloned().collect());
            if visible.is_empty() {
                return view! {
                    <tr><td colspan="7" class="text-center py-8 text-base-content/50">"No reservations match."</td></tr>
                }
                .into_any();
            }
            visible
                .into_iter()
                .map(|r| {
                    let user = users.with(|list| user_label(list, &r.user_id));
                    view! {
                        <tr>
                            <td class="font-mono text-xs">{r.id.clone()}</td>
                            <td>{user}</td>
                            <td>{r.facility_id.clone()}</td>
                            <td>{format!("{} {} – {}", format_date(&r.start_time), format_time(&r.start_time), format_time(&r.end_time))}</td>
                            <td><span class=status_badge(&r.status)>{r.status.label().to_string()}</span></td>
                            <td>{payment_label(&r)}</td>
                            <td class="text-right">{format_money(r.total_amount)}</td>
                        </tr>
                    }
                })
                .collect_view()
                .into_any()
        }
    };

    view! {
        <div class="max-w-7xl mx-auto p-4 md:p-8 space-y-6">
            <div class="flex flex-wrap items-center justify-between gap-2">
                <h1 class="text-3xl font-bold">"Reservations"</h1>
                <button class="btn btn-ghost btn-circle" on:click=move |_| load() disabled=move || state.with(LoadState::is_loading)>
                    <RefreshCw attr:class="h-5 w-5" />
                </button>
            </div>
            <div class="flex flex-wrap gap-2">
                <input
                    type="search"
                    placeholder="User id"
                    class="input input-bordered input-sm"
                    on:input=move |ev| filter.update(|f| f.user_id = event_target_value(&ev).trim().to_string())
                />
                <FilterBar filter=filter />
            </div>
            <Loaded state=state ready=move |all: Vec<Reservation>| view! {
                <div class="overflow-x-auto card bg-base-100 shadow">
                    <table class="table table-zebra w-full">
                        <thead>
                            <tr>
                                <th>"Id"</th>
                                <th>"User"</th>
                                <th>"Parking"</th>
                                <th>"When"</th>
                                <th>"Status"</th>
                                <th>"Paid"</th>
                                <th class="text-right">"Total"</th>
                            </tr>
                        </thead>
                        <tbody>{rows(all)}</tbody>
                    </table>
                </div>
            } />
        </div>
    }
}

// =========================================================
// My reservations
// =========================================================

#[component]
pub fn MyReservationsPage() -> impl IntoView {
    let api = use_api();
    let auth = use_auth();
    let scope = use_view_scope();

    let (state, set_state) = signal(LoadState::<Vec<Reservation>>::Loading);
    let filter = RwSignal::new(ReservationFilter::recent());
    let (action_error, set_action_error) = signal(Option::<String>::None);
    let cancelling = RwSignal::new(Option::<String>::None);

    let load = {
        let api = api.clone();
        let scope = scope.clone();
        move || {
            let api = api.clone();
            let scope = scope.clone();
            let session = auth.session_untracked();
            spawn_local(async move {
                if let Some(result) = scope.run(fetch_my_reservations(&api.api, &session)).await {
                    set_state.set(result.map_err(|e| auth.check(e)).into());
                }
            });
        }
    };
    load();

    let cancel = {
        let load = load.clone();
        move |reservation: Reservation| {
            let api = api.clone();
            let scope = scope.clone();
            let load = load.clone();
            let session = auth.session_untracked();
            cancelling.set(Some(reservation.id.clone()));
            set_action_error.set(None);
            spawn_local(async move {
                let Some(result) = scope
                    .run(cancel_reservation(&api.api, &session, &reservation))
                    .await
                else {
                    return;
                };
                cancelling.set(None);
                match result {
                    Ok(_) => load(),
                    Err(e) => {
                        log::warn!("{e}");
                        set_action_error.set(Some(auth.check(e).user_message()));
                    }
                }
            });
        }
    };

    let cards = move |all: Vec<Reservation>| {
        let cancel = cancel.clone();
        move || {
            let visible: Vec<Reservation> =
                filter.with(|f| f.apply(&all).into_iter().cloned().collect());
            if visible.is_empty() {
                return view! {
                    <div class="text-center py-8 text-base-content/50">"You have no reservations yet."</div>
                }
                .into_any();
            }
            visible
                .into_iter()
                .map(|r| {
                    let cancel = cancel.clone();
                    let id = r.id.clone();
                    let busy = move || cancelling.with(|c| c.as_deref() == Some(id.as_str()));
                    let cancellable = r.status.is_cancellable();
                    let space = r.assigned_space().map(str::to_string);
                    view! {
                        <div class="card bg-base-100 shadow">
                            <div class="card-body p-5 gap-1">
                                <div class="flex items-center justify-between">
                                    <h3 class="card-title text-base">
                                        <Calendar attr:class="h-4 w-4 text-primary" />
                                        {format!("{} · {} – {}", format_date(&r.start_time), format_time(&r.start_time), format_time(&r.end_time))}
                                    </h3>
                                    <span class=status_badge(&r.status)>{r.status.label().to_string()}</span>
                                </div>
                                <p class="text-sm opacity-70">{format!("Parking {}", r.facility_id)}</p>
                                {space.map(|s| view! { <p class="text-sm">"Space " <span class="font-mono">{s}</span></p> })}
                                <p class="text-sm">
                                    {format_money(r.total_amount)} " · Paid: " {payment_label(&r)}
                                </p>
                                {cancellable.then(|| {
                                    let r = r.clone();
                                    view! {
                                        <div class="card-actions justify-end">
                                            <button
                                                class="btn btn-outline btn-error btn-xs"
                                                disabled=busy
                                                on:click=move |_| cancel(r.clone())
                                            >"Cancel"</button>
                                        </div>
                                    }
                                })}
                            </div>
                        </div>
                    }
                })
                .collect_view()
                .into_any()
        }
    };

    view! {
        <div class="max-w-3xl mx-auto p-4 md:p-8 space-y-6">
            <div class="flex flex-wrap items-center justify-between gap-2">
                <div>
                    <h1 class="text-3xl font-bold">"My reservations"</h1>
                    <p class="text-base-content/70">"Your most recent reservations."</p>
                </div>
                <div class="flex gap-2">
                    <FilterBar filter=filter />
                </div>
            </div>
            <Show when=move || action_error.get().is_some()>
                <ErrorAlert message=Signal::derive(move || action_error.get().unwrap_or_default()) />
            </Show>
            <Loaded state=state ready=move |all: Vec<Reservation>| view! {
                <div class="space-y-3">{cards(all)}</div>
            } />
        </div>
    }
}
