use crate::components::icons::{Calendar, Car, MapPin};
use crate::web::router::Link;
use easypark::AppRoute;
use leptos::prelude::*;

#[component]
pub fn HomePage() -> impl IntoView {
    view! {
        <div class="hero min-h-[70vh] bg-base-200">
            <div class="hero-content text-center">
                <div class="max-w-2xl">
                    <h1 class="text-5xl font-bold">"Parking without the search"</h1>
                    <p class="py-6 text-base-content/70">
                        "See the parkings around you, compare rates and reserve a space before you arrive."
                    </p>
                    <Link to=AppRoute::Facilities.to_path() class="btn btn-primary">"Find parking"</Link>

                    <div class="grid md:grid-cols-3 gap-4 mt-12 text-left">
                        <div class="card bg-base-100 shadow">
                            <div class="card-body">
                                <MapPin attr:class="h-6 w-6 text-primary" />
                                <h3 class="card-title text-base">"Nearby"</h3>
                                <p class="text-sm opacity-70">"Parkings within a few kilometres of your position."</p>
                            </div>
                        </div>
                        <div class="card bg-base-100 shadow">
                            <div class="card-body">
                                <Calendar attr:class="h-6 w-6 text-primary" />
                                <h3 class="card-title text-base">"Reserve"</h3>
                                <p class="text-sm opacity-70">"Pick a time range and see the price before you book."</p>
                            </div>
                        </div>
                        <div class="card bg-base-100 shadow">
                            <div class="card-body">
                                <Car attr:class="h-6 w-6 text-primary" />
                                <h3 class="card-title text-base">"Own a parking?"</h3>
                                <p class="text-sm opacity-70">"Register it and start receiving reservations."</p>
                            </div>
                        </div>
                    </div>
                </div>
            </div>
        </div>
    }
}
