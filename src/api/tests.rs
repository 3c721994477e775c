use super::*;
use crate::mock::MockBackend;
use crate::request::HttpResponse;
use easypark_shared::protocol::HttpMethod;

const BASE: &str = "https://localhost:7041/api/";

/// Answers every request with the same response.
#[derive(Clone)]
struct CannedClient(u16, &'static str);

#[async_trait::async_trait(?Send)]
impl HttpClient for CannedClient {
    async fn send(&self, _req: HttpRequest) -> Result<HttpResponse, HttpError> {
        Ok(HttpResponse::new(self.0, self.1))
    }
}

#[tokio::test]
async fn requests_carry_json_headers_and_bearer_token() {
    let backend = MockBackend::seeded();
    let api = ParkingApi::new(BASE, backend.clone()).with_token(Some("mock-token-USER1"));

    let me = api.current_user().await.unwrap();
    assert_eq!(me.id, "USER1");

    let req = backend.last_request().unwrap();
    assert_eq!(req.url, "https://localhost:7041/api/Auth/me");
    assert_eq!(req.method, HttpMethod::Get);
    assert_eq!(req.header("Content-Type"), Some("application/json"));
    assert_eq!(req.header("Accept"), Some("application/json"));
    assert_eq!(req.header(HEADER_AUTHORIZATION), Some("Bearer mock-token-USER1"));
    assert_eq!(req.body, None);
}

#[tokio::test]
async fn dropping_the_token_drops_the_header() {
    let backend = MockBackend::seeded();
    let api = ParkingApi::new(BASE, backend.clone()).with_token(Some("mock-token-USER1"));

    api.with_token(None).list_facilities().await.unwrap();
    let req = backend.last_request().unwrap();
    assert_eq!(req.header(HEADER_AUTHORIZATION), None);

    let err = api.with_token(None).current_user().await.unwrap_err();
    assert!(err.is_unauthorized());
}

#[tokio::test]
async fn available_listing_hits_its_own_endpoint() {
    let backend = MockBackend::seeded();
    let api = ParkingApi::new(BASE, backend.clone());

    let available = api.list_available_facilities().await.unwrap();
    assert_eq!(available.len(), 2);

    let req = backend.last_request().unwrap();
    assert_eq!(req.url, "https://localhost:7041/api/Parkings/available");
    assert_eq!(req.method, HttpMethod::Get);
    assert_eq!(req.body, None);
}

#[tokio::test]
async fn search_sends_query_parameters() {
    let backend = MockBackend::seeded();
    let api = ParkingApi::new(BASE, backend.clone());

    let nearby = api
        .search_facilities(Coordinates::new(-12.0464, -77.0428), 5.0)
        .await
        .unwrap();
    assert_eq!(nearby.len(), 1);
    assert_eq!(nearby[0].id, "1");

    let req = backend.last_request().unwrap();
    assert_eq!(
        req.url,
        "https://localhost:7041/api/Parkings/search/location?latitude=-12.0464&longitude=-77.0428&radiusKm=5"
    );
}

#[tokio::test]
async fn login_posts_credentials_as_body() {
    let backend = MockBackend::seeded();
    let api = ParkingApi::new(BASE, backend.clone());

    let credentials = Credentials {
        email: "admin@test.com".into(),
        password: "admin123".into(),
    };
    let auth = api.authenticate(&credentials).await.unwrap();
    assert!(auth.user.role.is_admin());

    let req = backend.last_request().unwrap();
    assert_eq!(req.method, HttpMethod::Post);
    let sent: Credentials = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
    assert_eq!(sent, credentials);
}

#[tokio::test]
async fn non_success_status_is_reported_with_code() {
    let api = ParkingApi::new(BASE, MockBackend::seeded());

    let err = api.get_facility("404").await.unwrap_err();
    assert_eq!(err.status(), Some(404));
    assert!(!err.is_unauthorized());
    assert_eq!(err.to_string(), "unexpected status 404");
}

#[tokio::test]
async fn undecodable_body_is_a_decode_failure() {
    let api = ParkingApi::new(BASE, CannedClient(200, "<html>maintenance</html>"));

    let err = api.list_facilities().await.unwrap_err();
    assert!(matches!(err, ApiFailure::Decode(_)));
    assert_eq!(err.status(), None);
}

#[tokio::test]
async fn transport_failure_has_no_status() {
    let backend = MockBackend::seeded();
    backend.go_offline();
    let api = ParkingApi::new(BASE, backend);

    let err = api.list_facilities().await.unwrap_err();
    assert!(matches!(err, ApiFailure::Transport(HttpError::NetworkError(_))));
    assert_eq!(err.status(), None);
}

#[test]
fn unauthorized_lifts_to_session_expired() {
    let expired = ApiFailure::Status {
        status: 401,
        body: String::new(),
    }
    .into_client(ErrorKind::FacilityFetchFailed);
    assert_eq!(expired.kind, ErrorKind::SessionExpired);

    let failed = ApiFailure::Status {
        status: 500,
        body: String::new(),
    }
    .into_client(ErrorKind::FacilityFetchFailed);
    assert_eq!(failed.kind, ErrorKind::FacilityFetchFailed);
    assert_eq!(failed.user_message(), "Could not load parking facilities.");
}

#[test]
fn base_url_loses_trailing_slash() {
    let api = ParkingApi::new(BASE, CannedClient(200, "[]"));
    assert_eq!(api.base_url(), "https://localhost:7041/api");
    assert_eq!(api.token(), None);
}
