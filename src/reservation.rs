//! Reservation submission flow.
//!
//! Form state, submit gating, request construction and the post-submit
//! redirect. The view owns a [`ReservationForm`] and calls
//! [`submit_reservation`]; everything here is testable without a browser.

use crate::api::ParkingApi;
use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult, ErrorKind};
use crate::request::HttpClient;
use crate::route::AppRoute;
use crate::session::Session;
use easypark_shared::date::normalize_for_wire;
use easypark_shared::pricing::{Quote, compute_price};
use easypark_shared::{Facility, Reservation, ReservationRequest, UserIdentity};
use std::future::Future;
use std::time::Duration;

#[cfg(test)]
mod tests;

pub const GENERIC_SUCCESS: &str = "Reservation created successfully.";

/// Reservation form contents.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReservationForm {
    pub start: String,
    pub end: String,
    /// User the reservation is made for. Admins must choose one.
    pub target: Option<UserIdentity>,
    /// Search text of the target-user picker.
    pub user_query: String,
    pub notes: String,
}

impl ReservationForm {
    pub fn quote(&self, hourly_rate: f64) -> Quote {
        Quote::for_range(&self.start, &self.end, hourly_rate)
    }

    /// Whether the submit action is enabled.
    ///
    /// Disabled while a submission is in flight, while either timestamp is
    /// empty, while the range holds no billable time, and for admins until a
    /// target user is chosen.
    pub fn can_submit(&self, session: &Session, submitting: bool) -> bool {
        if submitting || !session.is_authenticated {
            return false;
        }
        if self.start.trim().is_empty() || self.end.trim().is_empty() {
            return false;
        }
        if self.quote(1.0).is_degenerate() {
            return false;
        }
        self.beneficiary(session).is_some()
    }

    /// Id the reservation is booked for: the admin-chosen target, or the
    /// signed-in user.
    fn beneficiary<'a>(&'a self, session: &'a Session) -> Option<&'a str> {
        if session.is_admin() {
            self.target.as_ref().map(|target| target.id.as_str())
        } else {
            session.user_id()
        }
    }

    /// Builds the request payload. Fails with `Validation` when the form is
    /// not submittable.
    pub fn build_request(
        &self,
        session: &Session,
        facility: &Facility,
    ) -> ClientResult<ReservationRequest> {
        if !session.is_authenticated {
            return Err(ClientError::new(
                ErrorKind::SessionExpired,
                "reservation requires a signed-in user",
            ));
        }
        if self.start.trim().is_empty() || self.end.trim().is_empty() {
            return Err(ClientError::validation("Choose a start and an end time."));
        }
        if self.quote(facility.hourly_rate).is_degenerate() {
            return Err(ClientError::validation("The end time must be after the start time."));
        }
        let Some(user_id) = self.beneficiary(session) else {
            let message = if session.is_admin() {
                "Choose the user this reservation is for."
            } else {
                "Your account details are unavailable. Please sign in again."
            };
            return Err(ClientError::validation(message));
        };

        let notes = self.notes.trim();
        Ok(ReservationRequest {
            facility_id: facility.id.clone(),
            user_id: user_id.to_string(),
            start_time: normalize_for_wire(&self.start),
            end_time: normalize_for_wire(&self.end),
            total_amount: compute_price(&self.start, &self.end, facility.hourly_rate),
            notes: (!notes.is_empty()).then(|| notes.to_string()),
        })
    }
}

/// Users whose first name, last name or email contains `query`, ignoring
/// case. An empty query keeps everyone.
pub fn filter_users<'a>(users: &'a [UserIdentity], query: &str) -> Vec<&'a UserIdentity> {
    let needle = query.trim().to_lowercase();
    users
        .iter()
        .filter(|user| {
            needle.is_empty()
                || [&user.first_name, &user.last_name, &user.email]
                    .iter()
                    .any(|field| field.to_lowercase().contains(&needle))
        })
        .collect()
}

/// Success text. Names the assigned space literally when there is one.
pub fn success_message(assigned_space: Option<&str>) -> String {
    match assigned_space {
        Some(space) => format!("Reservation confirmed. Your assigned space is {space}."),
        None => GENERIC_SUCCESS.to_string(),
    }
}

/// Post-submit destination: admins go to the reservation list, everyone
/// else back to the facility browser.
pub fn redirect_for(session: &Session) -> AppRoute {
    if session.is_admin() {
        AppRoute::Reservations
    } else {
        AppRoute::Facilities
    }
}

/// Outcome of a successful submission.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionReceipt {
    pub reservation: Reservation,
    pub message: String,
    pub redirect: AppRoute,
    pub redirect_after: Duration,
}

impl SubmissionReceipt {
    /// Waits out the redirect delay with `sleep`, then yields the
    /// destination.
    pub async fn await_redirect<F, Fut>(&self, sleep: F) -> AppRoute
    where
        F: FnOnce(Duration) -> Fut,
        Fut: Future<Output = ()>,
    {
        sleep(self.redirect_after).await;
        self.redirect.clone()
    }
}

/// Sends the reservation for `facility`.
///
/// Any failure leaves `form` untouched and comes back as
/// `ReservationSubmissionFailed` (or `SessionExpired` on 401, which the
/// caller answers by expiring the session). Nothing is retried.
pub async fn submit_reservation<C: HttpClient + Clone>(
    api: &ParkingApi<C>,
    session: &Session,
    facility: &Facility,
    form: &ReservationForm,
    config: &ClientConfig,
) -> ClientResult<SubmissionReceipt> {
    let request = form
        .build_request(session, facility)
        .map_err(|e| e.in_op("reservation.submit"))?;

    let reservation = api
        .with_token(session.token())
        .create_reservation(&request)
        .await
        .map_err(|failure| {
            failure
                .into_client(ErrorKind::ReservationSubmissionFailed)
                .in_op_with("reservation.submit", &facility.id)
        })?;

    log::info!(
        "reservation {} created for user {} at facility {}",
        reservation.id,
        request.user_id,
        facility.id
    );

    Ok(SubmissionReceipt {
        message: success_message(reservation.assigned_space()),
        redirect: redirect_for(session),
        redirect_after: config.redirect_delay,
        reservation,
    })
}
