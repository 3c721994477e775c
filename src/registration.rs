//! Facility registration form.

use crate::api::ParkingApi;
use crate::config::DEFAULT_CENTER;
use crate::error::{ClientError, ClientResult, ErrorKind};
use crate::request::HttpClient;
use crate::session::Session;
use easypark_shared::{Coordinates, Facility, NewFacility};

/// Raw form input, exactly as typed.
#[derive(Debug, Clone, PartialEq)]
pub struct FacilityDraft {
    pub name: String,
    pub address: String,
    pub city: String,
    pub total_spaces: String,
    pub hourly_rate: String,
    pub daily_rate: String,
    pub latitude: String,
    pub longitude: String,
}

impl Default for FacilityDraft {
    /// Empty form positioned on the default centre.
    fn default() -> Self {
        Self {
            name: String::new(),
            address: String::new(),
            city: String::new(),
            total_spaces: String::new(),
            hourly_rate: String::new(),
            daily_rate: String::new(),
            latitude: DEFAULT_CENTER.latitude.to_string(),
            longitude: DEFAULT_CENTER.longitude.to_string(),
        }
    }
}

impl FacilityDraft {
    pub fn set_position(&mut self, position: Coordinates) {
        self.latitude = position.latitude.to_string();
        self.longitude = position.longitude.to_string();
    }

    /// Position currently typed in, if it parses.
    pub fn position(&self) -> Option<Coordinates> {
        let latitude = self.latitude.trim().parse::<f64>().ok()?;
        let longitude = self.longitude.trim().parse::<f64>().ok()?;
        Some(Coordinates::new(latitude, longitude))
    }

    /// Checks every field and builds the payload. The first problem found is
    /// reported as a `Validation` error with a user-facing message.
    pub fn validate(&self) -> ClientResult<NewFacility> {
        let name = required(&self.name, "Name is required.")?;
        let address = required(&self.address, "Address is required.")?;

        let total_spaces = self
            .total_spaces
            .trim()
            .parse::<u32>()
            .ok()
            .filter(|n| *n >= 1)
            .ok_or_else(|| ClientError::validation("Total spaces must be a whole number of at least 1."))?;

        let hourly_rate = rate(&self.hourly_rate, "Hourly rate must be a number of 0 or more.")?;
        // daily rate is optional; blank means 0
        let daily_rate = if self.daily_rate.trim().is_empty() {
            0.0
        } else {
            rate(&self.daily_rate, "Daily rate must be a number of 0 or more.")?
        };

        let coordinates = self
            .position()
            .filter(|c| (-90.0..=90.0).contains(&c.latitude) && (-180.0..=180.0).contains(&c.longitude))
            .ok_or_else(|| ClientError::validation("Location must be a valid latitude and longitude."))?;

        Ok(NewFacility {
            name,
            address,
            city: self.city.trim().to_string(),
            coordinates,
            total_spaces,
            hourly_rate,
            daily_rate,
        })
    }
}

fn required(value: &str, message: &str) -> ClientResult<String> {
    let value = value.trim();
    if value.is_empty() {
        Err(ClientError::validation(message))
    } else {
        Ok(value.to_string())
    }
}

fn rate(value: &str, message: &str) -> ClientResult<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|r| r.is_finite() && *r >= 0.0)
        .ok_or_else(|| ClientError::validation(message))
}

/// Validates `draft` and registers it. Nothing is sent when validation
/// fails.
pub async fn register_facility<C: HttpClient + Clone>(
    api: &ParkingApi<C>,
    session: &Session,
    draft: &FacilityDraft,
) -> ClientResult<Facility> {
    let payload = draft.validate()?;

    let facility = api
        .with_token(session.token())
        .create_facility(&payload)
        .await
        .map_err(|failure| {
            failure
                .into_client(ErrorKind::FacilityRegistrationFailed)
                .in_op_with("facilities.register", &payload.name)
        })?;

    log::info!("facility {} registered as {}", facility.name, facility.id);
    Ok(facility)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockBackend;
    use easypark_shared::{Role, UserIdentity};

    fn filled() -> FacilityDraft {
        FacilityDraft {
            name: " Parking Barranco ".into(),
            address: "Av. Grau 300".into(),
            city: "Lima".into(),
            total_spaces: "30".into(),
            hourly_rate: "4.5".into(),
            daily_rate: "".into(),
            ..Default::default()
        }
    }

    fn owner() -> Session {
        Session {
            identity: Some(UserIdentity {
                id: "OWNER1".into(),
                first_name: "Empresa".into(),
                last_name: "Parking Solutions".into(),
                email: "contacto@parkingsolutions.com".into(),
                role: Role::Owner,
            }),
            token: Some(MockBackend::token_for("OWNER1")),
            is_authenticated: true,
        }
    }

    #[test]
    fn valid_draft_builds_payload() {
        let payload = filled().validate().unwrap();
        assert_eq!(payload.name, "Parking Barranco");
        assert_eq!(payload.total_spaces, 30);
        assert_eq!(payload.daily_rate, 0.0);
        assert_eq!(payload.coordinates, DEFAULT_CENTER);
    }

    #[test]
    fn each_field_is_checked() {
        let cases: [(fn(&mut FacilityDraft), &str); 5] = [
            (|d: &mut FacilityDraft| d.name = "  ".into(), "Name is required."),
            (|d: &mut FacilityDraft| d.total_spaces = "0".into(), "Total spaces must be a whole number of at least 1."),
            (|d: &mut FacilityDraft| d.total_spaces = "2.5".into(), "Total spaces must be a whole number of at least 1."),
            (|d: &mut FacilityDraft| d.hourly_rate = "-1".into(), "Hourly rate must be a number of 0 or more."),
            (|d: &mut FacilityDraft| d.latitude = "95".into(), "Location must be a valid latitude and longitude."),
        ];
        for (break_it, expected) in cases {
            let mut draft = filled();
            break_it(&mut draft);
            let err = draft.validate().unwrap_err();
            assert_eq!(err.kind, ErrorKind::Validation);
            assert_eq!(err.user_message(), expected);
        }
    }

    #[tokio::test]
    async fn registered_facility_is_fully_available() {
        let backend = MockBackend::seeded();
        let api = ParkingApi::new("https://localhost:7041/api", backend.clone());

        let mut draft = filled();
        draft.set_position(Coordinates::new(-12.1500, -77.0220));
        let facility = register_facility(&api, &owner(), &draft).await.unwrap();
        assert_eq!(facility.available_spaces, 30);
        assert_eq!(backend.facility(&facility.id).unwrap().name, "Parking Barranco");
    }

    #[tokio::test]
    async fn service_failure_is_a_registration_failure() {
        let backend = MockBackend::seeded();
        backend.fail_with(500);
        let api = ParkingApi::new("https://localhost:7041/api", backend.clone());

        let err = register_facility(&api, &owner(), &filled()).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::FacilityRegistrationFailed);

        let mut invalid = filled();
        invalid.address.clear();
        let before = backend.request_count();
        let err = register_facility(&api, &owner(), &invalid).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        assert_eq!(backend.request_count(), before);
    }
}
