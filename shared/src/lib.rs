use serde::{Deserialize, Deserializer, Serialize};

pub mod date;
pub mod pricing;
pub mod protocol;

// =========================================================
// Constants
// =========================================================

pub const ADMIN_ROLE: &str = "admin";
pub const HEADER_AUTHORIZATION: &str = "Authorization";
pub const CURRENCY_PREFIX: &str = "S/";

// =========================================================
// Identity
// =========================================================

/// Account role.
///
/// Parsing is an exact, case-sensitive match. Anything that is not one of the
/// three known roles is kept verbatim in `Other` and never grants admin rights,
/// so `"Admin"` or `"admin "` stay ordinary accounts.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    #[default]
    User,
    Admin,
    Owner,
    Other(String),
}

impl Role {
    pub fn as_str(&self) -> &str {
        match self {
            Role::User => "user",
            Role::Admin => ADMIN_ROLE,
            Role::Owner => "owner",
            Role::Other(raw) => raw,
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl From<String> for Role {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "user" => Role::User,
            ADMIN_ROLE => Role::Admin,
            "owner" => Role::Owner,
            _ => Role::Other(raw),
        }
    }
}

impl From<&str> for Role {
    fn from(raw: &str) -> Self {
        Role::from(raw.to_string())
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        match role {
            Role::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserIdentity {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub role: Role,
}

impl UserIdentity {
    /// Full name, falling back to the email when the service sent no name.
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name.trim(), self.last_name.trim());
        let full = full.trim();
        if full.is_empty() {
            self.email.clone()
        } else {
            full.to_string()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Registration {
    pub email: String,
    pub password: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthResponse {
    pub user: UserIdentity,
    pub token: String,
}

// =========================================================
// Facilities
// =========================================================

const EARTH_RADIUS_KM: f64 = 6371.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Great-circle distance (haversine).
    pub fn distance_km(&self, other: &Coordinates) -> f64 {
        let d_lat = (other.latitude - self.latitude).to_radians();
        let d_lon = (other.longitude - self.longitude).to_radians();
        let a = (d_lat / 2.0).sin().powi(2)
            + self.latitude.to_radians().cos()
                * other.latitude.to_radians().cos()
                * (d_lon / 2.0).sin().powi(2);
        2.0 * EARTH_RADIUS_KM * a.sqrt().asin()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Facility {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub name: String,
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(flatten)]
    pub coordinates: Coordinates,
    pub total_spaces: u32,
    pub available_spaces: u32,
    pub hourly_rate: f64,
    #[serde(default)]
    pub daily_rate: f64,
}

/// Registration payload: a facility without its server-assigned id and
/// availability counter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFacility {
    pub name: String,
    pub address: String,
    pub city: String,
    #[serde(flatten)]
    pub coordinates: Coordinates,
    pub total_spaces: u32,
    pub hourly_rate: f64,
    pub daily_rate: f64,
}

// =========================================================
// Reservations
// =========================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ReservationStatus {
    Pending,
    Confirmed,
    Cancelled,
    Active,
    Completed,
    Other(String),
}

impl ReservationStatus {
    pub const ALL: [ReservationStatus; 5] = [
        ReservationStatus::Pending,
        ReservationStatus::Confirmed,
        ReservationStatus::Cancelled,
        ReservationStatus::Active,
        ReservationStatus::Completed,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            ReservationStatus::Pending => "pending",
            ReservationStatus::Confirmed => "confirmed",
            ReservationStatus::Cancelled => "cancelled",
            ReservationStatus::Active => "active",
            ReservationStatus::Completed => "completed",
            ReservationStatus::Other(raw) => raw,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            ReservationStatus::Pending => "Pending",
            ReservationStatus::Confirmed => "Confirmed",
            ReservationStatus::Cancelled => "Cancelled",
            ReservationStatus::Active => "Active",
            ReservationStatus::Completed => "Completed",
            ReservationStatus::Other(raw) => raw,
        }
    }

    pub fn is_cancellable(&self) -> bool {
        matches!(
            self,
            ReservationStatus::Pending | ReservationStatus::Confirmed
        )
    }
}

impl From<String> for ReservationStatus {
    fn from(raw: String) -> Self {
        match raw.to_lowercase().as_str() {
            "pending" => ReservationStatus::Pending,
            "confirmed" => ReservationStatus::Confirmed,
            "cancelled" => ReservationStatus::Cancelled,
            "active" => ReservationStatus::Active,
            "completed" => ReservationStatus::Completed,
            _ => ReservationStatus::Other(raw),
        }
    }
}

impl From<ReservationStatus> for String {
    fn from(status: ReservationStatus) -> Self {
        status.as_str().to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Refunded,
    Other(String),
}

impl PaymentStatus {
    pub fn as_str(&self) -> &str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Paid => "paid",
            PaymentStatus::Refunded => "refunded",
            PaymentStatus::Other(raw) => raw,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            PaymentStatus::Pending => "No",
            PaymentStatus::Paid => "Yes",
            PaymentStatus::Refunded => "Refunded",
            PaymentStatus::Other(raw) => raw,
        }
    }
}

impl From<String> for PaymentStatus {
    fn from(raw: String) -> Self {
        match raw.to_lowercase().as_str() {
            "pending" => PaymentStatus::Pending,
            "paid" => PaymentStatus::Paid,
            "refunded" => PaymentStatus::Refunded,
            _ => PaymentStatus::Other(raw),
        }
    }
}

impl From<PaymentStatus> for String {
    fn from(status: PaymentStatus) -> Self {
        status.as_str().to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParkingSpace {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub space_number: String,
    #[serde(default)]
    pub is_available: bool,
}

/// Client-built reservation payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationRequest {
    #[serde(rename = "parkingId")]
    pub facility_id: String,
    pub user_id: String,
    pub start_time: String,
    pub end_time: String,
    pub total_amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(deserialize_with = "string_or_number")]
    pub user_id: String,
    #[serde(rename = "parkingId", deserialize_with = "string_or_number")]
    pub facility_id: String,
    pub start_time: String,
    pub end_time: String,
    pub status: ReservationStatus,
    pub total_amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_status: Option<PaymentStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parking_space: Option<ParkingSpace>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Reservation {
    /// Identifier of the space the service assigned, if any.
    pub fn assigned_space(&self) -> Option<&str> {
        self.parking_space
            .as_ref()
            .map(|space| space.space_number.as_str())
            .filter(|number| !number.trim().is_empty())
    }

    pub fn is_paid(&self) -> bool {
        matches!(self.payment_status, Some(PaymentStatus::Paid))
    }
}

// =========================================================
// Serde helpers
// =========================================================

/// Accepts ids sent either as JSON strings or as numbers.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Int(i64),
        Float(f64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Int(n) => n.to_string(),
        RawId::Float(n) => n.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn role_parsing_is_exact() {
        assert_eq!(Role::from("admin"), Role::Admin);
        assert!(Role::from("admin").is_admin());
        assert!(!Role::from("Admin").is_admin());
        assert!(!Role::from("admin ").is_admin());
        assert!(!Role::from("ADMIN").is_admin());
        assert_eq!(Role::from("Admin"), Role::Other("Admin".to_string()));
        assert_eq!(String::from(Role::from("admin ")), "admin ");
    }

    #[test]
    fn identity_without_role_is_an_ordinary_user() {
        let identity: UserIdentity =
            serde_json::from_value(json!({ "id": "7", "email": "x@y.z" })).unwrap();
        assert_eq!(identity.role, Role::User);
        assert!(!identity.role.is_admin());
    }

    #[test]
    fn identity_accepts_numeric_ids_and_missing_names() {
        let identity: UserIdentity = serde_json::from_value(json!({
            "id": 42,
            "email": "a@b.c",
            "role": "owner"
        }))
        .unwrap();
        assert_eq!(identity.id, "42");
        assert_eq!(identity.role, Role::Owner);
        assert_eq!(identity.display_name(), "a@b.c");
    }

    #[test]
    fn facility_uses_flat_coordinates_on_the_wire() {
        let facility: Facility = serde_json::from_value(json!({
            "id": "1",
            "name": "Plaza",
            "address": "Av. Principal 123",
            "city": "Lima",
            "latitude": -12.0464,
            "longitude": -77.0428,
            "totalSpaces": 100,
            "availableSpaces": 45,
            "hourlyRate": 5.0,
            "dailyRate": 30.0
        }))
        .unwrap();
        assert_eq!(facility.coordinates, Coordinates::new(-12.0464, -77.0428));

        let value = serde_json::to_value(&facility).unwrap();
        assert_eq!(value["latitude"], json!(-12.0464));
        assert_eq!(value["availableSpaces"], json!(45));
    }

    #[test]
    fn reservation_statuses_decode_case_insensitively() {
        let reservation: Reservation = serde_json::from_value(json!({
            "id": 7,
            "userId": "USER1",
            "parkingId": "1",
            "startTime": "2024-03-20T10:00:00Z",
            "endTime": "2024-03-20T12:00:00Z",
            "status": "Confirmed",
            "totalAmount": 10.0,
            "paymentStatus": "PAID",
            "parkingSpace": { "id": 3, "spaceNumber": "A-12", "isAvailable": false }
        }))
        .unwrap();
        assert_eq!(reservation.status, ReservationStatus::Confirmed);
        assert!(reservation.is_paid());
        assert_eq!(reservation.assigned_space(), Some("A-12"));
    }

    #[test]
    fn unknown_status_is_kept_for_display() {
        let status = ReservationStatus::from("on-hold".to_string());
        assert_eq!(status.label(), "on-hold");
        assert!(!status.is_cancellable());
    }

    #[test]
    fn reservation_request_serializes_parking_id() {
        let request = ReservationRequest {
            facility_id: "1".into(),
            user_id: "USER1".into(),
            start_time: "2024-01-01T10:00:00".into(),
            end_time: "2024-01-01T12:00:00".into(),
            total_amount: 10.0,
            notes: None,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["parkingId"], json!("1"));
        assert_eq!(value["totalAmount"], json!(10.0));
        assert!(value.get("notes").is_none());
    }

    #[test]
    fn distance_between_lima_and_miraflores() {
        let centro = Coordinates::new(-12.0464, -77.0428);
        let miraflores = Coordinates::new(-12.1224, -77.0305);
        let d = centro.distance_km(&miraflores);
        assert!(d > 8.0 && d < 9.0, "unexpected distance {d}");
        assert_eq!(centro.distance_km(&centro), 0.0);
    }
}
