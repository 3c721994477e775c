use crate::api::use_api;
use crate::components::icons::{Car, MapPin};
use crate::components::map_panel::MapPanel;
use crate::components::status::{Loaded, use_view_scope};
use crate::web::BrowserLocator;
use crate::web::router::Link;
use easypark::AppRoute;
use easypark::browse::{BrowseResult, browse_facilities};
use easypark::load::LoadState;
use easypark::map::MapView;
use easypark_shared::Facility;
use easypark_shared::pricing::format_money;
use leptos::prelude::*;
use leptos::task::spawn_local;

/// Facility browser: nearby parkings when the position is known, all of
/// them otherwise.
#[component]
pub fn FacilityBrowserPage() -> impl IntoView {
    let api = use_api();
    let scope = use_view_scope();
    let (state, set_state) = signal(LoadState::<BrowseResult>::Loading);

    spawn_local(async move {
        let outcome = scope
            .run(browse_facilities(&api.api, &BrowserLocator, &api.config))
            .await;
        if let Some(result) = outcome {
            set_state.set(result.into());
        }
    });

    view! {
        <div class="max-w-7xl mx-auto p-4 md:p-8 space-y-6">
            <div>
                <h1 class="text-3xl font-bold">"Parkings"</h1>
                <p class="text-base-content/70">
                    {move || match state.with(|s| s.ready().map(BrowseResult::is_nearby)) {
                        Some(true) => "Parkings close to your position.",
                        Some(false) => "Your position is unavailable; showing every parking.",
                        None => "Looking for parkings...",
                    }}
                </p>
            </div>
            <Loaded state=state ready=|result: BrowseResult| view! { <BrowseResults result=result /> } />
        </div>
    }
}

#[component]
fn BrowseResults(result: BrowseResult) -> impl IntoView {
    let map = MapView::overview(result.center, result.user_location, &result.facilities);
    let count = result.facilities.len();
    let facilities = result.facilities;

    view! {
        <div class="grid lg:grid-cols-2 gap-6">
            <MapPanel map=map />
            <div class="space-y-4">
                <div class="badge badge-neutral">{format!("{count} found")}</div>
                {if facilities.is_empty() {
                    view! {
                        <div class="text-center py-8 text-base-content/50">
                            "No parkings found in this area."
                        </div>
                    }.into_any()
                } else {
                    facilities
                        .into_iter()
                        .map(|facility| view! { <FacilityCard facility=facility /> })
                        .collect_view()
                        .into_any()
                }}
            </div>
        </div>
    }
}

#[component]
pub fn FacilityCard(facility: Facility) -> impl IntoView {
    let reserve = AppRoute::Reserve(facility.id.clone()).to_path();
    let full = facility.available_spaces == 0;

    view! {
        <div class="card bg-base-100 shadow">
            <div class="card-body p-5">
                <div class="flex items-start justify-between gap-2">
                    <h3 class="card-title text-lg">
                        <Car attr:class="h-5 w-5 text-primary" />
                        {facility.name.clone()}
                    </h3>
                    <span class=if full { "badge badge-error" } else { "badge badge-success" }>
                        {format!("{} / {} free", facility.available_spaces, facility.total_spaces)}
                    </span>
                </div>
                <p class="flex items-center gap-1 text-sm opacity-70">
                    <MapPin attr:class="h-4 w-4" />
                    {facility.address.clone()}
                    {(!facility.city.is_empty()).then(|| format!(", {}", facility.city))}
                </p>
                <p class="text-sm">
                    <span class="font-semibold">{format_money(facility.hourly_rate)}</span>
                    " per hour"
                </p>
                <div class="card-actions justify-end">
                    <Link to=reserve class="btn btn-primary btn-sm">"Reserve"</Link>
                </div>
            </div>
        </div>
    }
}
