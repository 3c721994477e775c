//! Route table.
//!
//! Pure domain model: every screen of the application, its path and the
//! access requirement the guard enforces. No DOM access here.

use crate::guard::RouteRequirement;
use std::fmt::Display;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AppRoute {
    /// Facility browser with map (default route).
    #[default]
    Facilities,
    /// Static landing page.
    Home,
    /// Admin overview of every facility.
    AllFacilities,
    RegisterFacility,
    /// Reservation form for one facility.
    Reserve(String),
    Login,
    Register,
    /// Admin list of every reservation.
    Reservations,
    MyReservations,
    NotFound,
}

impl AppRoute {
    /// Parses a URL path. Trailing slashes and query strings are ignored.
    pub fn from_path(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let trimmed = path.trim_end_matches('/');

        match trimmed {
            "" | "/parkings" => Self::Facilities,
            "/home" => Self::Home,
            "/all-parkings" => Self::AllFacilities,
            "/register-parking" => Self::RegisterFacility,
            "/login" => Self::Login,
            "/register" => Self::Register,
            "/reservations" => Self::Reservations,
            "/my-reservations" => Self::MyReservations,
            other => match other.strip_prefix("/reservation/") {
                Some(id) if !id.is_empty() && !id.contains('/') => Self::Reserve(id.to_string()),
                _ => Self::NotFound,
            },
        }
    }

    pub fn to_path(&self) -> String {
        match self {
            Self::Facilities => "/parkings".to_string(),
            Self::Home => "/home".to_string(),
            Self::AllFacilities => "/all-parkings".to_string(),
            Self::RegisterFacility => "/register-parking".to_string(),
            Self::Reserve(id) => format!("/reservation/{id}"),
            Self::Login => "/login".to_string(),
            Self::Register => "/register".to_string(),
            Self::Reservations => "/reservations".to_string(),
            Self::MyReservations => "/my-reservations".to_string(),
            Self::NotFound => "/404".to_string(),
        }
    }

    /// Access requirement of the route.
    pub fn requirement(&self) -> RouteRequirement {
        match self {
            Self::AllFacilities | Self::Reservations => RouteRequirement::admin(),
            Self::RegisterFacility | Self::Reserve(_) | Self::MyReservations => {
                RouteRequirement::authenticated()
            }
            Self::Facilities | Self::Home | Self::Login | Self::Register | Self::NotFound => {
                RouteRequirement::public()
            }
        }
    }

    /// Signed-in users are sent away from these (sign-in and sign-up forms).
    pub fn should_redirect_when_authenticated(&self) -> bool {
        matches!(self, Self::Login | Self::Register)
    }

    /// Where a signed-in user lands after leaving the sign-in forms.
    pub fn auth_success_redirect() -> Self {
        Self::Facilities
    }
}

impl Display for AppRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_path())
    }
}
