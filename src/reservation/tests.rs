use super::*;
use crate::mock::MockBackend;
use easypark_shared::{Coordinates, ParkingSpace, ReservationStatus, Role};
use tokio::time::Instant;

const BASE: &str = "https://localhost:7041/api";

fn identity(id: &str, first: &str, last: &str, email: &str, role: &str) -> UserIdentity {
    UserIdentity {
        id: id.to_string(),
        first_name: first.to_string(),
        last_name: last.to_string(),
        email: email.to_string(),
        role: Role::from(role),
    }
}

fn session_for(user: UserIdentity) -> Session {
    Session {
        token: Some(MockBackend::token_for(&user.id)),
        identity: Some(user),
        is_authenticated: true,
    }
}

fn user_session() -> Session {
    session_for(identity("1", "Usuario", "Test", "usuario@test.com", "user"))
}

fn admin_session() -> Session {
    session_for(identity("2", "Admin", "Test", "admin@test.com", "admin"))
}

fn plaza() -> Facility {
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
    }
}

fn two_hour_form() -> ReservationForm {
    ReservationForm {
        start: "2024-01-01T10:00".into(),
        end: "2024-01-01T12:00".into(),
        ..Default::default()
    }
}

#[test]
fn admin_cannot_submit_without_target() {
    let admin = admin_session();
    let mut form = two_hour_form();
    assert!(!form.can_submit(&admin, false));

    form.target = Some(identity("USER1", "Juan", "Pérez", "juan.perez@example.com", "user"));
    assert!(form.can_submit(&admin, false));
    assert!(!form.can_submit(&admin, true));
}

#[test]
fn submit_disabled_for_empty_or_degenerate_ranges() {
    let user = user_session();
    let mut form = ReservationForm::default();
    assert!(!form.can_submit(&user, false));

    form.start = "2024-01-01T10:00".into();
    assert!(!form.can_submit(&user, false));

    form.end = "2024-01-01T09:00".into();
    assert!(!form.can_submit(&user, false));

    form.end = "2024-01-01T10:30".into();
    assert!(form.can_submit(&user, false));
    assert!(!form.can_submit(&Session::default(), false));
}

#[test]
fn two_hours_at_five_totals_ten() {
    let form = two_hour_form();
    assert_eq!(form.quote(5.0).display_total(), "10.00");
    assert_eq!(form.quote(5.0).display_hours(), "2.0");

    let request = form.build_request(&user_session(), &plaza()).unwrap();
    assert_eq!(request.total_amount, 10.0);
    assert_eq!(request.user_id, "1");
    assert_eq!(request.facility_id, "1");
    assert_eq!(request.start_time, "2024-01-01T10:00:00");
    assert_eq!(request.end_time, "2024-01-01T12:00:00");
    assert_eq!(request.notes, None);
}

#[test]
fn admin_books_for_the_chosen_target() {
    let mut form = two_hour_form();
    form.target = Some(identity("USER1", "Juan", "Pérez", "juan.perez@example.com", "user"));
    form.notes = "  gate B  ".into();
    let request = form.build_request(&admin_session(), &plaza()).unwrap();
    assert_eq!(request.user_id, "USER1");
    assert_eq!(request.notes.as_deref(), Some("gate B"));
}

#[test]
fn non_admins_ignore_a_stray_target() {
    let mut form = two_hour_form();
    form.target = Some(identity("USER1", "Juan", "Pérez", "juan.perez@example.com", "user"));
    let request = form.build_request(&user_session(), &plaza()).unwrap();
    assert_eq!(request.user_id, "1");
}

#[test]
fn user_filter_matches_names_and_email_ignoring_case() {
    let users = vec![
        identity("1", "Juan", "Pérez", "juan.perez@example.com", "user"),
        identity("2", "Ana", "Torres", "ana@test.com", "user"),
        identity("3", "Luis", "Anaya", "luis@parking.pe", "owner"),
    ];

    let ids = |query: &str| -> Vec<String> {
        filter_users(&users, query)
            .into_iter()
            .map(|u| u.id.clone())
            .collect()
    };

    assert_eq!(ids(""), vec!["1", "2", "3"]);
    assert_eq!(ids("ANA"), vec!["2", "3"]);
    assert_eq!(ids("parking.PE"), vec!["3"]);
    assert_eq!(ids("pérez"), vec!["1"]);
    assert!(ids("nobody").is_empty());
}

#[test]
fn success_message_names_the_assigned_space() {
    assert!(success_message(Some("A-12")).contains("A-12"));
    assert_eq!(success_message(None), GENERIC_SUCCESS);
}

#[tokio::test(start_paused = true)]
async fn assigned_space_appears_and_redirect_follows_the_role() {
    let backend = MockBackend::seeded();
    let api = ParkingApi::new(BASE, backend.clone());
    let config = ClientConfig::default();

    // seeded spaces run A-1, then new ones from A-2; burn ten to reach A-12
    for _ in 0..10 {
        submit_reservation(&api, &user_session(), &plaza(), &two_hour_form(), &config)
            .await
            .unwrap();
    }

    let receipt = submit_reservation(&api, &user_session(), &plaza(), &two_hour_form(), &config)
        .await
        .unwrap();
    assert_eq!(receipt.reservation.assigned_space(), Some("A-12"));
    assert!(receipt.message.contains("A-12"));
    assert_eq!(receipt.redirect, AppRoute::Facilities);

    let started = Instant::now();
    let destination = receipt.await_redirect(tokio::time::sleep).await;
    assert_eq!(destination, AppRoute::Facilities);
    assert!(started.elapsed() >= Duration::from_secs(5));

    let mut admin_form = two_hour_form();
    admin_form.target = Some(identity("1", "Usuario", "Test", "usuario@test.com", "user"));
    let receipt = submit_reservation(&api, &admin_session(), &plaza(), &admin_form, &config)
        .await
        .unwrap();
    assert_eq!(receipt.redirect, AppRoute::Reservations);
    assert_eq!(receipt.redirect_after, Duration::from_secs(5));
}

#[test]
fn response_without_space_gets_the_generic_message() {
    let reservation = Reservation {
        id: "R".into(),
        user_id: "1".into(),
        facility_id: "1".into(),
        start_time: "2024-01-01T10:00:00".into(),
        end_time: "2024-01-01T12:00:00".into(),
        status: ReservationStatus::Pending,
        total_amount: 10.0,
        payment_status: None,
        parking_space: Some(ParkingSpace {
            id: "3".into(),
            space_number: " ".into(),
            is_available: false,
        }),
        notes: None,
    };
    assert_eq!(success_message(reservation.assigned_space()), GENERIC_SUCCESS);
}

#[tokio::test]
async fn failures_keep_the_form_and_are_not_retried() {
    let backend = MockBackend::seeded();
    backend.fail_with(500);
    let api = ParkingApi::new(BASE, backend.clone());
    let form = two_hour_form();
    let before = form.clone();

    let err = submit_reservation(&api, &user_session(), &plaza(), &form, &ClientConfig::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::ReservationSubmissionFailed);
    assert_eq!(err.user_message(), "Could not create the reservation.");
    assert_eq!(form, before);
    assert_eq!(backend.request_count(), 1);
}

#[tokio::test]
async fn rejected_token_reports_an_expired_session() {
    let backend = MockBackend::seeded();
    let api = ParkingApi::new(BASE, backend);
    let mut session = user_session();
    session.token = Some("stale".into());

    let err = submit_reservation(&api, &session, &plaza(), &two_hour_form(), &ClientConfig::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::SessionExpired);
}

#[tokio::test]
async fn invalid_forms_never_reach_the_service() {
    let backend = MockBackend::seeded();
    let api = ParkingApi::new(BASE, backend.clone());

    let err = submit_reservation(
        &api,
        &admin_session(),
        &plaza(),
        &two_hour_form(),
        &ClientConfig::default(),
    )
    .await
    .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
    assert_eq!(backend.request_count(), 0);
}
