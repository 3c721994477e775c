//! EasyPark web client.
//!
//! Context-driven layout:
//! - `api`: transport selection and the shared gateway
//! - `auth`: session store in a signal
//! - `web`: browser adapters and the router service
//! - `components`: views; every guarded view sits behind `Protected`

mod api;
mod auth;
mod components {
    pub mod all_facilities;
    pub mod facilities;
    pub mod facility_register;
    pub mod guard;
    pub mod home;
    mod icons;
    pub mod login;
    mod map_panel;
    pub mod navbar;
    pub mod register;
    pub mod reservation;
    pub mod reservations;
    pub mod status;
}
pub(crate) mod web;

use crate::api::ApiContext;
use crate::auth::{AuthContext, init_auth};
use crate::components::all_facilities::AllFacilitiesPage;
use crate::components::facilities::FacilityBrowserPage;
use crate::components::facility_register::FacilityRegisterPage;
use crate::components::guard::Protected;
use crate::components::home::HomePage;
use crate::components::login::LoginPage;
use crate::components::navbar::Navbar;
use crate::components::register::RegisterPage;
use crate::components::reservation::ReservationPage;
use crate::components::reservations::{MyReservationsPage, ReservationsPage};
use crate::web::router::{Link, Router, RouterOutlet};
use easypark::{AppRoute, ClientConfig};
use leptos::prelude::*;

fn route_matcher(route: AppRoute) -> AnyView {
    let requirement = route.requirement();
    match route {
        AppRoute::Facilities => view! { <FacilityBrowserPage /> }.into_any(),
        AppRoute::Home => view! { <HomePage /> }.into_any(),
        AppRoute::Login => view! { <LoginPage /> }.into_any(),
        AppRoute::Register => view! { <RegisterPage /> }.into_any(),
        AppRoute::AllFacilities => view! {
            <Protected requirement=requirement><AllFacilitiesPage /></Protected>
        }
        .into_any(),
        AppRoute::RegisterFacility => view! {
            <Protected requirement=requirement><FacilityRegisterPage /></Protected>
        }
        .into_any(),
        AppRoute::Reserve(id) => view! {
            <Protected requirement=requirement><ReservationPage facility_id=id.clone() /></Protected>
        }
        .into_any(),
        AppRoute::Reservations => view! {
            <Protected requirement=requirement><ReservationsPage /></Protected>
        }
        .into_any(),
        AppRoute::MyReservations => view! {
            <Protected requirement=requirement><MyReservationsPage /></Protected>
        }
        .into_any(),
        AppRoute::NotFound => view! {
            <div class="flex items-center justify-center min-h-[60vh]">
                <div class="text-center space-y-4">
                    <h1 class="text-6xl font-bold text-error">"404"</h1>
                    <p class="text-xl">"Page not found"</p>
                    <Link to=AppRoute::Facilities.to_path() class="btn btn-primary">"Back to parkings"</Link>
                </div>
            </div>
        }
        .into_any(),
    }
}

#[component]
pub fn App() -> impl IntoView {
    // 1. configuration and gateway
    let api_ctx = ApiContext::new(ClientConfig::from_build_env());
    provide_context(api_ctx.clone());

    // 2. session restored from local storage
    let auth_ctx = AuthContext::new();
    provide_context(auth_ctx);
    init_auth(&auth_ctx, &api_ctx);

    // 3. the router only sees the auth flag
    let is_authenticated = auth_ctx.is_authenticated_signal();
    let checking = auth_ctx.checking;

    view! {
        <Router is_authenticated=is_authenticated>
            <div class="min-h-screen bg-base-200 font-sans">
                <Navbar />
                <Show
                    when=move || !checking.get()
                    fallback=|| view! {
                        <div class="flex items-center justify-center min-h-[60vh]">
                            <span class="loading loading-spinner loading-lg text-primary"></span>
                        </div>
                    }
                >
                    <RouterOutlet matcher=route_matcher />
                </Show>
            </div>
        </Router>
    }
}
