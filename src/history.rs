//! Reservation lists: the admin list of every reservation and the signed-in
//! user's own, both filtered and sorted in memory.

use crate::api::ParkingApi;
use crate::config::RECENT_RESERVATIONS;
use crate::error::{ClientError, ClientResult, ErrorKind};
use crate::request::HttpClient;
use crate::session::Session;
use easypark_shared::date::parse_timestamp;
use easypark_shared::{Reservation, ReservationStatus, UserIdentity};
use std::cmp::Reverse;

/// Payment filter. "Unpaid" is anything that is not `paid`, including a
/// missing payment status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaymentFilter {
    #[default]
    Any,
    Paid,
    Unpaid,
}

impl PaymentFilter {
    pub const ALL: [PaymentFilter; 3] = [
        PaymentFilter::Any,
        PaymentFilter::Paid,
        PaymentFilter::Unpaid,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PaymentFilter::Any => "",
            PaymentFilter::Paid => "paid",
            PaymentFilter::Unpaid => "pending",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PaymentFilter::Any => "All",
            PaymentFilter::Paid => "Paid",
            PaymentFilter::Unpaid => "Not paid",
        }
    }

    /// Inverse of [`PaymentFilter::as_str`]; unknown values mean `Any`.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "paid" => PaymentFilter::Paid,
            "pending" => PaymentFilter::Unpaid,
            _ => PaymentFilter::Any,
        }
    }

    fn matches(self, reservation: &Reservation) -> bool {
        match self {
            PaymentFilter::Any => true,
            PaymentFilter::Paid => reservation.is_paid(),
            PaymentFilter::Unpaid => !reservation.is_paid(),
        }
    }
}

/// Filters of a reservation list.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReservationFilter {
    /// Exact user id. Empty means everyone.
    pub user_id: String,
    pub status: Option<ReservationStatus>,
    pub payment: PaymentFilter,
    /// Keep only the first `limit` after sorting.
    pub limit: Option<usize>,
}

impl ReservationFilter {
    /// Filter of the "my reservations" view: most recent five.
    pub fn recent() -> Self {
        Self {
            limit: Some(RECENT_RESERVATIONS),
            ..Self::default()
        }
    }

    pub fn matches(&self, reservation: &Reservation) -> bool {
        let user_id = self.user_id.trim();
        (user_id.is_empty() || reservation.user_id == user_id)
            && self
                .status
                .as_ref()
                .is_none_or(|status| &reservation.status == status)
            && self.payment.matches(reservation)
    }

    /// Matching reservations, newest start first. Unparsable start times
    /// sort last.
    pub fn apply<'a>(&self, reservations: &'a [Reservation]) -> Vec<&'a Reservation> {
        let mut kept: Vec<&Reservation> = reservations.iter().filter(|r| self.matches(r)).collect();
        kept.sort_by_key(|r| Reverse(parse_timestamp(&r.start_time)));
        if let Some(limit) = self.limit {
            kept.truncate(limit);
        }
        kept
    }
}

/// Parses a status picked in a `<select>`; the empty value means "all".
pub fn parse_status_filter(raw: &str) -> Option<ReservationStatus> {
    let raw = raw.trim();
    if raw.is_empty() {
        None
    } else {
        Some(ReservationStatus::from(raw.to_string()))
    }
}

/// Name for a user id, falling back to the id itself.
pub fn user_label(users: &[UserIdentity], user_id: &str) -> String {
    users
        .iter()
        .find(|user| user.id == user_id)
        .map(UserIdentity::display_name)
        .unwrap_or_else(|| user_id.to_string())
}

// =========================================================
// Remote operations
// =========================================================

pub async fn fetch_all_reservations<C: HttpClient + Clone>(
    api: &ParkingApi<C>,
    session: &Session,
) -> ClientResult<Vec<Reservation>> {
    api.with_token(session.token())
        .list_reservations()
        .await
        .map_err(|failure| {
            failure
                .into_client(ErrorKind::ReservationFetchFailed)
                .in_op("reservations.list")
        })
}

/// Reservations of the signed-in user.
pub async fn fetch_my_reservations<C: HttpClient + Clone>(
    api: &ParkingApi<C>,
    session: &Session,
) -> ClientResult<Vec<Reservation>> {
    let Some(user_id) = session.user_id() else {
        return Err(ClientError::new(
            ErrorKind::ReservationFetchFailed,
            "no user information in the session",
        )
        .in_op("reservations.mine"));
    };

    api.with_token(session.token())
        .list_user_reservations(user_id)
        .await
        .map_err(|failure| {
            failure
                .into_client(ErrorKind::ReservationFetchFailed)
                .in_op_with("reservations.mine", user_id)
        })
}

/// Cancels a pending or confirmed reservation.
pub async fn cancel_reservation<C: HttpClient + Clone>(
    api: &ParkingApi<C>,
    session: &Session,
    reservation: &Reservation,
) -> ClientResult<Reservation> {
    if !reservation.status.is_cancellable() {
        return Err(ClientError::validation(format!(
            "A {} reservation cannot be cancelled.",
            reservation.status.label().to_lowercase()
        )));
    }

    let cancelled = api
        .with_token(session.token())
        .cancel_reservation(&reservation.id)
        .await
        .map_err(|failure| {
            failure
                .into_client(ErrorKind::ReservationSubmissionFailed)
                .in_op_with("reservations.cancel", &reservation.id)
        })?;
    log::info!("reservation {} cancelled", cancelled.id);
    Ok(cancelled)
}

/// Everyone the admin can book for.
pub async fn fetch_users<C: HttpClient + Clone>(
    api: &ParkingApi<C>,
    session: &Session,
) -> ClientResult<Vec<UserIdentity>> {
    api.with_token(session.token())
        .list_users()
        .await
        .map_err(|failure| {
            failure
                .into_client(ErrorKind::UserFetchFailed)
                .in_op("users.list")
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockBackend;
    use easypark_shared::{PaymentStatus, Role};

    fn reservation(id: &str, user: &str, start: &str, status: &str, paid: Option<&str>) -> Reservation {
        Reservation {
            id: id.into(),
            user_id: user.into(),
            facility_id: "1".into(),
            start_time: start.into(),
            end_time: start.into(),
            status: ReservationStatus::from(status.to_string()),
            total_amount: 10.0,
            payment_status: paid.map(|p| PaymentStatus::from(p.to_string())),
            parking_space: None,
            notes: None,
        }
    }

    fn sample() -> Vec<Reservation> {
        vec![
            reservation("a", "U1", "2024-03-01T10:00:00Z", "confirmed", Some("paid")),
            reservation("b", "U2", "2024-03-05T10:00:00Z", "pending", Some("pending")),
            reservation("c", "U1", "2024-03-03T10:00:00Z", "Cancelled", None),
            reservation("d", "U1", "garbage", "completed", Some("refunded")),
            reservation("e", "U3", "2024-03-04T10:00:00Z", "confirmed", Some("PAID")),
        ]
    }

    fn ids(list: Vec<&Reservation>) -> Vec<&str> {
        list.into_iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn sorted_newest_first_with_unparsable_last() {
        let all = sample();
        assert_eq!(ids(ReservationFilter::default().apply(&all)), ["b", "e", "c", "a", "d"]);
    }

    #[test]
    fn filters_combine() {
        let all = sample();
        let filter = ReservationFilter {
            user_id: "U1".into(),
            ..Default::default()
        };
        assert_eq!(ids(filter.apply(&all)), ["c", "a", "d"]);

        let filter = ReservationFilter {
            status: parse_status_filter("confirmed"),
            payment: PaymentFilter::Paid,
            ..Default::default()
        };
        assert_eq!(ids(filter.apply(&all)), ["e", "a"]);

        let filter = ReservationFilter {
            payment: PaymentFilter::Unpaid,
            ..Default::default()
        };
        assert_eq!(ids(filter.apply(&all)), ["b", "c", "d"]);
    }

    #[test]
    fn recent_keeps_five() {
        let mut all = sample();
        all.push(reservation("f", "U1", "2024-03-06T10:00:00Z", "pending", None));
        all.push(reservation("g", "U1", "2024-03-07T10:00:00Z", "pending", None));
        assert_eq!(ids(ReservationFilter::recent().apply(&all)), ["g", "f", "b", "e", "c"]);
    }

    #[test]
    fn select_values_round_trip() {
        assert_eq!(parse_status_filter(""), None);
        assert_eq!(parse_status_filter("pending"), Some(ReservationStatus::Pending));
        for filter in PaymentFilter::ALL {
            assert_eq!(PaymentFilter::parse(filter.as_str()), filter);
        }
    }

    #[test]
    fn user_label_falls_back_to_id() {
        let users = vec![UserIdentity {
            id: "U1".into(),
            first_name: "Juan".into(),
            last_name: "Pérez".into(),
            email: "juan.perez@example.com".into(),
            role: Role::User,
        }];
        assert_eq!(user_label(&users, "U1"), "Juan Pérez");
        assert_eq!(user_label(&users, "U9"), "U9");
    }

    fn session(user_id: &str, role: Role) -> Session {
        Session {
            identity: Some(UserIdentity {
                id: user_id.into(),
                first_name: String::new(),
                last_name: String::new(),
                email: format!("{user_id}@test.com"),
                role,
            }),
            token: Some(MockBackend::token_for(user_id)),
            is_authenticated: true,
        }
    }

    #[tokio::test]
    async fn my_reservations_and_cancel() {
        let backend = MockBackend::seeded();
        let api = ParkingApi::new("https://localhost:7041/api", backend.clone());
        let me = session("USER1", Role::User);

        let mine = fetch_my_reservations(&api, &me).await.unwrap();
        assert_eq!(mine.len(), 2);
        let pending = mine
            .iter()
            .find(|r| r.status == ReservationStatus::Pending)
            .unwrap();

        let cancelled = cancel_reservation(&api, &me, pending).await.unwrap();
        assert_eq!(cancelled.status, ReservationStatus::Cancelled);
        assert_eq!(backend.facility("2").unwrap().available_spaces, 21);

        let err = cancel_reservation(&api, &me, &cancelled).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[tokio::test]
    async fn admin_lists_and_users() {
        let backend = MockBackend::seeded();
        let api = ParkingApi::new("https://localhost:7041/api", backend.clone());
        let admin = session("2", Role::Admin);

        assert_eq!(fetch_all_reservations(&api, &admin).await.unwrap().len(), 2);
        assert_eq!(fetch_users(&api, &admin).await.unwrap().len(), 4);

        backend.fail_with(500);
        let err = fetch_users(&api, &admin).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::UserFetchFailed);
    }

    #[tokio::test]
    async fn anonymous_sessions_cannot_list_their_reservations() {
        let backend = MockBackend::seeded();
        let api = ParkingApi::new("https://localhost:7041/api", backend.clone());
        let err = fetch_my_reservations(&api, &Session::default()).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::ReservationFetchFailed);
        assert_eq!(backend.request_count(), 0);
    }
}
