use crate::{
    AuthResponse, Credentials, Facility, NewFacility, Registration, Reservation,
    ReservationRequest, UserIdentity,
};
use serde::{Serialize, de::DeserializeOwned};

/// HTTP methods used by the parking service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// Request/response relationship and routing metadata of one endpoint.
///
/// Endpoints that carry a JSON body serialize the request value itself.
pub trait ApiRequest: Serialize {
    /// The decoded response type.
    type Response: DeserializeOwned;
    /// The HTTP method.
    const METHOD: HttpMethod;
    /// Whether the request value is sent as the JSON body.
    const HAS_BODY: bool = false;

    /// Path relative to the API base URL.
    fn path(&self) -> String;

    /// Query string parameters.
    fn query(&self) -> Vec<(&'static str, String)> {
        Vec::new()
    }
}

// =========================================================
// Identity
// =========================================================

impl ApiRequest for Credentials {
    type Response = AuthResponse;
    const METHOD: HttpMethod = HttpMethod::Post;
    const HAS_BODY: bool = true;

    fn path(&self) -> String {
        "/Auth/login".to_string()
    }
}

impl ApiRequest for Registration {
    type Response = AuthResponse;
    const METHOD: HttpMethod = HttpMethod::Post;
    const HAS_BODY: bool = true;

    fn path(&self) -> String {
        "/Auth/register".to_string()
    }
}

/// The identity bound to the bearer token.
#[derive(Debug, Serialize)]
pub struct CurrentUserRequest;

impl ApiRequest for CurrentUserRequest {
    type Response = UserIdentity;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        "/Auth/me".to_string()
    }
}

#[derive(Debug, Serialize)]
pub struct ListUsersRequest;

impl ApiRequest for ListUsersRequest {
    type Response = Vec<UserIdentity>;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        "/Users".to_string()
    }
}

// =========================================================
// Facilities
// =========================================================

#[derive(Debug, Serialize)]
pub struct ListAvailableFacilitiesRequest;

impl ApiRequest for ListAvailableFacilitiesRequest {
    type Response = Vec<Facility>;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        "/Parkings/available".to_string()
    }
}

#[derive(Debug, Serialize)]
pub struct ListFacilitiesRequest;

impl ApiRequest for ListFacilitiesRequest {
    type Response = Vec<Facility>;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        "/Parkings".to_string()
    }
}

#[derive(Debug, Serialize)]
pub struct SearchFacilitiesRequest {
    pub latitude: f64,
    pub longitude: f64,
    pub radius_km: f64,
}

impl ApiRequest for SearchFacilitiesRequest {
    type Response = Vec<Facility>;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        "/Parkings/search/location".to_string()
    }

    fn query(&self) -> Vec<(&'static str, String)> {
        vec![
            ("latitude", self.latitude.to_string()),
            ("longitude", self.longitude.to_string()),
            ("radiusKm", self.radius_km.to_string()),
        ]
    }
}

#[derive(Debug, Serialize)]
pub struct GetFacilityRequest {
    pub id: String,
}

impl ApiRequest for GetFacilityRequest {
    type Response = Facility;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        format!("/Parkings/{}", self.id)
    }
}

impl ApiRequest for NewFacility {
    type Response = Facility;
    const METHOD: HttpMethod = HttpMethod::Post;
    const HAS_BODY: bool = true;

    fn path(&self) -> String {
        "/parkings".to_string()
    }
}

// =========================================================
// Reservations
// =========================================================

impl ApiRequest for ReservationRequest {
    type Response = Reservation;
    const METHOD: HttpMethod = HttpMethod::Post;
    const HAS_BODY: bool = true;

    fn path(&self) -> String {
        "/reservations".to_string()
    }
}

#[derive(Debug, Serialize)]
pub struct ListReservationsRequest;

impl ApiRequest for ListReservationsRequest {
    type Response = Vec<Reservation>;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        "/reservations".to_string()
    }
}

#[derive(Debug, Serialize)]
pub struct ListUserReservationsRequest {
    pub user_id: String,
}

impl ApiRequest for ListUserReservationsRequest {
    type Response = Vec<Reservation>;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        format!("/reservations/user/{}", self.user_id)
    }
}

#[derive(Debug, Serialize)]
pub struct CancelReservationRequest {
    pub id: String,
}

impl ApiRequest for CancelReservationRequest {
    type Response = Reservation;
    const METHOD: HttpMethod = HttpMethod::Patch;

    fn path(&self) -> String {
        format!("/reservations/{}/cancel", self.id)
    }
}
