use crate::error::{ClientError, ErrorKind};
use crate::request::{HttpClient, HttpError, HttpRequest};
use easypark_shared::HEADER_AUTHORIZATION;
use easypark_shared::protocol::{
    ApiRequest, CancelReservationRequest, CurrentUserRequest, GetFacilityRequest,
    ListAvailableFacilitiesRequest, ListFacilitiesRequest, ListReservationsRequest,
    ListUserReservationsRequest, ListUsersRequest, SearchFacilitiesRequest,
};
use easypark_shared::{
    AuthResponse, Coordinates, Credentials, Facility, NewFacility, Registration, Reservation,
    ReservationRequest, UserIdentity,
};
use thiserror::Error;

#[cfg(test)]
mod tests;

const CONTENT_TYPE_JSON: &str = "application/json";

// =========================================================
// Gateway failures
// =========================================================

/// Why a gateway call produced no typed response.
#[derive(Debug, Error)]
pub enum ApiFailure {
    #[error(transparent)]
    Transport(#[from] HttpError),
    #[error("unexpected status {status}")]
    Status { status: u16, body: String },
    #[error("response decode failed: {0}")]
    Decode(String),
}

impl ApiFailure {
    /// Status code the service answered with, when it answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiFailure::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    /// Lifts the failure into the domain error of the calling operation.
    /// A 401 always becomes `SessionExpired`.
    pub fn into_client(self, kind: ErrorKind) -> ClientError {
        let kind = if self.is_unauthorized() {
            ErrorKind::SessionExpired
        } else {
            kind
        };
        ClientError::new(kind, self.to_string()).with_source(self)
    }
}

pub type ApiResult<T> = Result<T, ApiFailure>;

// =========================================================
// Gateway
// =========================================================

/// Typed access to the parking service.
///
/// Shapes requests and decodes responses; nothing else. The bearer token is
/// attached when present.
#[derive(Debug, Clone)]
pub struct ParkingApi<C> {
    base_url: String,
    token: Option<String>,
    client: C,
}

impl<C> ParkingApi<C> {
    pub fn new(base_url: &str, client: C) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
            client,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl<C: Clone> ParkingApi<C> {
    /// Copy of the gateway bound to `token`. `None` drops the header.
    pub fn with_token(&self, token: Option<&str>) -> Self {
        Self {
            base_url: self.base_url.clone(),
            token: token.map(str::to_string),
            client: self.client.clone(),
        }
    }
}

impl<C: HttpClient> ParkingApi<C> {
    /// Sends one endpoint request and decodes its response.
    pub async fn send<R: ApiRequest>(&self, request: &R) -> ApiResult<R::Response> {
        let path = request.path();
        let mut url = self.url(&path);

        let query = request.query();
        if !query.is_empty() {
            let pairs: Vec<String> = query.iter().map(|(k, v)| format!("{k}={v}")).collect();
            url.push('?');
            url.push_str(&pairs.join("&"));
        }

        let mut req = HttpRequest::new(&url, R::METHOD)
            .with_header("Content-Type", CONTENT_TYPE_JSON)
            .with_header("Accept", CONTENT_TYPE_JSON);

        if let Some(token) = &self.token {
            req = req.with_header(HEADER_AUTHORIZATION, &format!("Bearer {token}"));
        }

        if R::HAS_BODY {
            let body = serde_json::to_string(request)
                .map_err(|e| HttpError::RequestBuildFailed(e.to_string()))?;
            req = req.with_body(body);
        }

        log::debug!("{} {}", R::METHOD.as_str(), path);

        let resp = self.client.send(req).await.inspect_err(|e| {
            log::warn!("{} {} failed: {}", R::METHOD.as_str(), path, e);
        })?;

        if !resp.ok() {
            log::warn!("{} {} answered {}", R::METHOD.as_str(), path, resp.status);
            return Err(ApiFailure::Status {
                status: resp.status,
                body: resp.body,
            });
        }

        resp.json::<R::Response>()
            .map_err(|e| ApiFailure::Decode(e.to_string()))
    }

    // ---------------------------------------------------------
    // Identity
    // ---------------------------------------------------------

    pub async fn authenticate(&self, credentials: &Credentials) -> ApiResult<AuthResponse> {
        self.send(credentials).await
    }

    pub async fn register_identity(&self, registration: &Registration) -> ApiResult<AuthResponse> {
        self.send(registration).await
    }

    pub async fn current_user(&self) -> ApiResult<UserIdentity> {
        self.send(&CurrentUserRequest).await
    }

    pub async fn list_users(&self) -> ApiResult<Vec<UserIdentity>> {
        self.send(&ListUsersRequest).await
    }

    // ---------------------------------------------------------
    // Facilities
    // ---------------------------------------------------------

    pub async fn list_available_facilities(&self) -> ApiResult<Vec<Facility>> {
        self.send(&ListAvailableFacilitiesRequest).await
    }

    pub async fn list_facilities(&self) -> ApiResult<Vec<Facility>> {
        self.send(&ListFacilitiesRequest).await
    }

    pub async fn search_facilities(
        &self,
        around: Coordinates,
        radius_km: f64,
    ) -> ApiResult<Vec<Facility>> {
        self.send(&SearchFacilitiesRequest {
            latitude: around.latitude,
            longitude: around.longitude,
            radius_km,
        })
        .await
    }

    pub async fn get_facility(&self, id: &str) -> ApiResult<Facility> {
        self.send(&GetFacilityRequest { id: id.to_string() }).await
    }

    pub async fn create_facility(&self, facility: &NewFacility) -> ApiResult<Facility> {
        self.send(facility).await
    }

    // ---------------------------------------------------------
    // Reservations
    // ---------------------------------------------------------

    pub async fn create_reservation(&self, request: &ReservationRequest) -> ApiResult<Reservation> {
        self.send(request).await
    }

    pub async fn list_reservations(&self) -> ApiResult<Vec<Reservation>> {
        self.send(&ListReservationsRequest).await
    }

    pub async fn list_user_reservations(&self, user_id: &str) -> ApiResult<Vec<Reservation>> {
        self.send(&ListUserReservationsRequest {
            user_id: user_id.to_string(),
        })
        .await
    }

    pub async fn cancel_reservation(&self, id: &str) -> ApiResult<Reservation> {
        self.send(&CancelReservationRequest { id: id.to_string() })
            .await
    }
}
