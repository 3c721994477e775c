//! In-memory parking service.
//!
//! Speaks the same endpoints as the remote service so it can stand in as the
//! HTTP transport: in tests, and in the browser when the API mode is `mock`.
//! State lives behind an `Arc<Mutex<..>>`; clones share it.

use crate::request::{HttpClient, HttpError, HttpRequest, HttpResponse};
use easypark_shared::protocol::HttpMethod;
use easypark_shared::{
    AuthResponse, Coordinates, Credentials, Facility, NewFacility, ParkingSpace, PaymentStatus,
    Registration, Reservation, ReservationRequest, ReservationStatus, Role, UserIdentity,
    HEADER_AUTHORIZATION,
};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

const TOKEN_PREFIX: &str = "mock-token-";

#[derive(Debug, Clone)]
struct Account {
    identity: UserIdentity,
    password: String,
}

#[derive(Debug, Default)]
struct MockState {
    accounts: Vec<Account>,
    facilities: Vec<Facility>,
    reservations: Vec<Reservation>,
    next_id: u64,
    next_space: u64,
    requests: Vec<HttpRequest>,
    fail_status: Option<u16>,
    offline: bool,
}

impl MockState {
    fn seeded() -> Self {
        let account = |id: &str, first: &str, last: &str, email: &str, role: Role, pw: &str| {
            Account {
                identity: UserIdentity {
                    id: id.to_string(),
                    first_name: first.to_string(),
                    last_name: last.to_string(),
                    email: email.to_string(),
                    role,
                },
                password: pw.to_string(),
            }
        };

        let accounts = vec![
            account("USER1", "Juan", "Pérez", "juan.perez@example.com", Role::User, "password123"),
            account("1", "Usuario", "Test", "usuario@test.com", Role::User, "password123"),
            account("2", "Admin", "Test", "admin@test.com", Role::Admin, "admin123"),
            account(
                "OWNER1",
                "Empresa",
                "Parking Solutions",
                "contacto@parkingsolutions.com",
                Role::Owner,
                "owner123",
            ),
        ];

        let facilities = vec![
            Facility {
                id: "1".into(),
                name: "Estacionamiento Centro Comercial Plaza".into(),
                address: "Av. Principal 123".into(),
                city: "Lima".into(),
                coordinates: Coordinates::new(-12.0464, -77.0428),
                total_spaces: 100,
                available_spaces: 45,
                hourly_rate: 5.0,
                daily_rate: 30.0,
            },
            Facility {
                id: "2".into(),
                name: "Parking Express Miraflores".into(),
                address: "Calle Los Robles 456".into(),
                city: "Miraflores".into(),
                coordinates: Coordinates::new(-12.1224, -77.0305),
                total_spaces: 50,
                available_spaces: 20,
                hourly_rate: 7.5,
                daily_rate: 45.0,
            },
        ];

        let reservations = vec![
            Reservation {
                id: "RES1".into(),
                user_id: "USER1".into(),
                facility_id: "1".into(),
                start_time: "2024-03-20T10:00:00Z".into(),
                end_time: "2024-03-20T12:00:00Z".into(),
                status: ReservationStatus::Confirmed,
                total_amount: 10.0,
                payment_status: Some(PaymentStatus::Paid),
                parking_space: Some(ParkingSpace {
                    id: "1".into(),
                    space_number: "A-1".into(),
                    is_available: false,
                }),
                notes: None,
            },
            Reservation {
                id: "RES2".into(),
                user_id: "USER1".into(),
                facility_id: "2".into(),
                start_time: "2024-03-21T14:00:00Z".into(),
                end_time: "2024-03-21T16:00:00Z".into(),
                status: ReservationStatus::Pending,
                total_amount: 15.0,
                payment_status: Some(PaymentStatus::Pending),
                parking_space: None,
                notes: None,
            },
        ];

        Self {
            accounts,
            facilities,
            reservations,
            next_id: 100,
            next_space: 2,
            ..Default::default()
        }
    }

    fn fresh_id(&mut self) -> String {
        self.next_id += 1;
        self.next_id.to_string()
    }

    fn identity_for(&self, req: &HttpRequest) -> Option<UserIdentity> {
        let token = req
            .header(HEADER_AUTHORIZATION)?
            .strip_prefix("Bearer ")?
            .strip_prefix(TOKEN_PREFIX)?;
        self.accounts
            .iter()
            .find(|account| account.identity.id == token)
            .map(|account| account.identity.clone())
    }

    fn login(&self, identity: &UserIdentity) -> HttpResponse {
        json_response(
            200,
            &AuthResponse {
                user: identity.clone(),
                token: format!("{TOKEN_PREFIX}{}", identity.id),
            },
        )
    }
}

/// Offline stand-in for the parking service.
#[derive(Debug, Clone)]
pub struct MockBackend {
    state: Arc<Mutex<MockState>>,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::seeded()
    }
}

impl MockBackend {
    /// Backend preloaded with two Lima facilities, four accounts and two
    /// reservations.
    pub fn seeded() -> Self {
        Self {
            state: Arc::new(Mutex::new(MockState::seeded())),
        }
    }

    /// Backend with no data at all.
    pub fn empty() -> Self {
        Self {
            state: Arc::new(Mutex::new(MockState::default())),
        }
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Token the backend issues for `user_id`.
    pub fn token_for(user_id: &str) -> String {
        format!("{TOKEN_PREFIX}{user_id}")
    }

    pub fn request_count(&self) -> usize {
        self.lock().requests.len()
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.lock().requests.clone()
    }

    pub fn last_request(&self) -> Option<HttpRequest> {
        self.lock().requests.last().cloned()
    }

    /// Every following request answers `status` with an empty body.
    pub fn fail_with(&self, status: u16) {
        self.lock().fail_status = Some(status);
    }

    /// Every following request fails at the transport level.
    pub fn go_offline(&self) {
        self.lock().offline = true;
    }

    pub fn recover(&self) {
        let mut state = self.lock();
        state.fail_status = None;
        state.offline = false;
    }

    pub fn add_facility(&self, facility: Facility) {
        self.lock().facilities.push(facility);
    }

    pub fn add_reservation(&self, reservation: Reservation) {
        self.lock().reservations.push(reservation);
    }

    pub fn reservations(&self) -> Vec<Reservation> {
        self.lock().reservations.clone()
    }

    pub fn facility(&self, id: &str) -> Option<Facility> {
        self.lock().facilities.iter().find(|f| f.id == id).cloned()
    }

    fn handle(&self, req: &HttpRequest) -> HttpResponse {
        let mut state = self.lock();
        let (path, query) = split_url(&req.url);
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let lowered: Vec<String> = segments.iter().map(|s| s.to_lowercase()).collect();
        let route: Vec<&str> = lowered.iter().map(String::as_str).collect();

        match (req.method, route.as_slice()) {
            (HttpMethod::Post, ["auth", "login"]) => {
                let Some(credentials) = body::<Credentials>(req) else {
                    return empty(400);
                };
                match state.accounts.iter().find(|account| {
                    account.identity.email == credentials.email
                        && account.password == credentials.password
                }) {
                    Some(account) => state.login(&account.identity),
                    None => empty(401),
                }
            }
            (HttpMethod::Post, ["auth", "register"]) => {
                let Some(registration) = body::<Registration>(req) else {
                    return empty(400);
                };
                if state
                    .accounts
                    .iter()
                    .any(|account| account.identity.email == registration.email)
                {
                    return empty(409);
                }
                let (first_name, last_name) = match registration.name.trim().split_once(' ') {
                    Some((first, last)) => (first.to_string(), last.trim().to_string()),
                    None => (registration.name.trim().to_string(), String::new()),
                };
                let identity = UserIdentity {
                    id: state.fresh_id(),
                    first_name,
                    last_name,
                    email: registration.email,
                    role: Role::User,
                };
                state.accounts.push(Account {
                    identity: identity.clone(),
                    password: registration.password,
                });
                state.login(&identity)
            }
            (HttpMethod::Get, ["auth", "me"]) => match state.identity_for(req) {
                Some(identity) => json_response(200, &identity),
                None => empty(401),
            },
            (HttpMethod::Get, ["users"]) => {
                if state.identity_for(req).is_none() {
                    return empty(401);
                }
                let users: Vec<&UserIdentity> =
                    state.accounts.iter().map(|account| &account.identity).collect();
                json_response(200, &users)
            }
            (HttpMethod::Get, ["parkings"]) => json_response(200, &state.facilities),
            (HttpMethod::Get, ["parkings", "available"]) => {
                let available: Vec<&Facility> = state
                    .facilities
                    .iter()
                    .filter(|f| f.available_spaces > 0)
                    .collect();
                json_response(200, &available)
            }
            (HttpMethod::Get, ["parkings", "search", "location"]) => {
                let params = parse_query(query);
                let number = |key: &str| params.get(key).and_then(|v| v.parse::<f64>().ok());
                let (Some(latitude), Some(longitude), Some(radius)) =
                    (number("latitude"), number("longitude"), number("radiusKm"))
                else {
                    return empty(400);
                };
                let origin = Coordinates::new(latitude, longitude);
                let nearby: Vec<&Facility> = state
                    .facilities
                    .iter()
                    .filter(|f| origin.distance_km(&f.coordinates) <= radius)
                    .collect();
                json_response(200, &nearby)
            }
            (HttpMethod::Get, ["parkings", _]) => {
                let id = segments[1];
                match state.facilities.iter().find(|f| f.id == id) {
                    Some(facility) => json_response(200, facility),
                    None => empty(404),
                }
            }
            (HttpMethod::Post, ["parkings"]) => {
                if state.identity_for(req).is_none() {
                    return empty(401);
                }
                let Some(new) = body::<NewFacility>(req) else {
                    return empty(400);
                };
                let facility = Facility {
                    id: state.fresh_id(),
                    name: new.name,
                    address: new.address,
                    city: new.city,
                    coordinates: new.coordinates,
                    total_spaces: new.total_spaces,
                    available_spaces: new.total_spaces,
                    hourly_rate: new.hourly_rate,
                    daily_rate: new.daily_rate,
                };
                state.facilities.push(facility.clone());
                json_response(201, &facility)
            }
            (HttpMethod::Post, ["reservations"]) => {
                if state.identity_for(req).is_none() {
                    return empty(401);
                }
                let Some(request) = body::<ReservationRequest>(req) else {
                    return empty(400);
                };
                let Some(index) = state
                    .facilities
                    .iter()
                    .position(|f| f.id == request.facility_id)
                else {
                    return empty(404);
                };
                if state.facilities[index].available_spaces == 0 {
                    return empty(409);
                }
                state.facilities[index].available_spaces -= 1;

                let space_id = state.next_space;
                state.next_space += 1;
                let reservation = Reservation {
                    id: format!("RES{}", state.fresh_id()),
                    user_id: request.user_id,
                    facility_id: request.facility_id,
                    start_time: request.start_time,
                    end_time: request.end_time,
                    status: ReservationStatus::Confirmed,
                    total_amount: request.total_amount,
                    payment_status: Some(PaymentStatus::Pending),
                    parking_space: Some(ParkingSpace {
                        id: space_id.to_string(),
                        space_number: format!("A-{space_id}"),
                        is_available: false,
                    }),
                    notes: request.notes,
                };
                state.reservations.push(reservation.clone());
                json_response(201, &reservation)
            }
            (HttpMethod::Get, ["reservations"]) => {
                if state.identity_for(req).is_none() {
                    return empty(401);
                }
                json_response(200, &state.reservations)
            }
            (HttpMethod::Get, ["reservations", "user", _]) => {
                if state.identity_for(req).is_none() {
                    return empty(401);
                }
                let user_id = segments[2];
                let mine: Vec<&Reservation> = state
                    .reservations
                    .iter()
                    .filter(|r| r.user_id == user_id)
                    .collect();
                json_response(200, &mine)
            }
            (HttpMethod::Patch, ["reservations", _, "cancel"]) => {
                if state.identity_for(req).is_none() {
                    return empty(401);
                }
                let id = segments[1];
                let Some(index) = state.reservations.iter().position(|r| r.id == id) else {
                    return empty(404);
                };
                if !state.reservations[index].status.is_cancellable() {
                    return empty(409);
                }
                let facility_id = state.reservations[index].facility_id.clone();
                if let Some(facility) = state.facilities.iter_mut().find(|f| f.id == facility_id) {
                    facility.available_spaces =
                        (facility.available_spaces + 1).min(facility.total_spaces);
                }
                state.reservations[index].status = ReservationStatus::Cancelled;
                json_response(200, &state.reservations[index])
            }
            _ => empty(404),
        }
    }
}

#[async_trait::async_trait(?Send)]
impl HttpClient for MockBackend {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, HttpError> {
        {
            let mut state = self.lock();
            state.requests.push(req.clone());
            if state.offline {
                return Err(HttpError::NetworkError("mock backend offline".to_string()));
            }
            if let Some(status) = state.fail_status {
                return Ok(empty(status));
            }
        }
        Ok(self.handle(&req))
    }
}

// =========================================================
// Helpers
// =========================================================

/// Path below the `/api` prefix and the raw query string.
fn split_url(url: &str) -> (&str, &str) {
    let without_scheme = url.split_once("://").map_or(url, |(_, rest)| rest);
    let path = without_scheme
        .find('/')
        .map_or("", |index| &without_scheme[index..]);
    let (path, query) = path.split_once('?').unwrap_or((path, ""));
    let path = path.strip_prefix("/api").unwrap_or(path);
    (path, query)
}

fn parse_query(query: &str) -> HashMap<&str, &str> {
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .collect()
}

fn body<T: serde::de::DeserializeOwned>(req: &HttpRequest) -> Option<T> {
    req.body
        .as_deref()
        .and_then(|raw| serde_json::from_str(raw).ok())
}

fn json_response<T: Serialize + ?Sized>(status: u16, value: &T) -> HttpResponse {
    match serde_json::to_string(value) {
        Ok(body) => HttpResponse::new(status, body),
        Err(e) => HttpResponse::new(500, e.to_string()),
    }
}

fn empty(status: u16) -> HttpResponse {
    HttpResponse::new(status, "")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_url_strips_host_and_api_prefix() {
        assert_eq!(
            split_url("https://localhost:7041/api/Parkings/search/location?latitude=1"),
            ("/Parkings/search/location", "latitude=1")
        );
        assert_eq!(split_url("mock://local/reservations"), ("/reservations", ""));
        assert_eq!(split_url("https://host"), ("", ""));
    }

    #[tokio::test]
    async fn unknown_routes_answer_not_found() {
        let backend = MockBackend::seeded();
        let resp = backend
            .send(HttpRequest::new("https://h/api/nowhere", HttpMethod::Get))
            .await
            .unwrap();
        assert_eq!(resp.status, 404);
        assert_eq!(backend.request_count(), 1);
    }

    #[tokio::test]
    async fn available_listing_skips_full_facilities() {
        let backend = MockBackend::seeded();
        backend.add_facility(Facility {
            id: "9".into(),
            name: "Parking Lleno".into(),
            address: "Jr. Cusco 10".into(),
            city: "Lima".into(),
            coordinates: Coordinates::new(-12.05, -77.03),
            total_spaces: 10,
            available_spaces: 0,
            hourly_rate: 4.0,
            daily_rate: 20.0,
        });

        let all: Vec<Facility> = backend
            .send(HttpRequest::new("https://h/api/Parkings", HttpMethod::Get))
            .await
            .unwrap()
            .json()
            .unwrap();
        assert_eq!(all.len(), 3);

        let available: Vec<Facility> = backend
            .send(HttpRequest::new("https://h/api/Parkings/available", HttpMethod::Get))
            .await
            .unwrap()
            .json()
            .unwrap();
        let ids: Vec<&str> = available.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, ["1", "2"]);
    }

    #[tokio::test]
    async fn offline_backend_fails_at_transport() {
        let backend = MockBackend::seeded();
        backend.go_offline();
        let err = backend
            .send(HttpRequest::new("https://h/api/Parkings", HttpMethod::Get))
            .await
            .unwrap_err();
        assert!(matches!(err, HttpError::NetworkError(_)));

        backend.recover();
        let resp = backend
            .send(HttpRequest::new("https://h/api/Parkings", HttpMethod::Get))
            .await
            .unwrap();
        assert!(resp.ok());
    }
}
