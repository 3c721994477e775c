use std::fmt;

// =========================================================
// Error kinds
// =========================================================

/// What went wrong, from the user's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The identity endpoint rejected the credentials (401).
    InvalidCredentials,
    /// Registration hit an existing identity (409).
    EmailAlreadyRegistered,
    /// The identity endpoint could not be reached or answered unexpectedly.
    AuthServiceUnavailable,
    /// A protected call answered 401; the session was dropped.
    SessionExpired,
    FacilityFetchFailed,
    FacilityRegistrationFailed,
    ReservationSubmissionFailed,
    ReservationFetchFailed,
    UserFetchFailed,
    /// Position could not be obtained. Callers degrade instead of surfacing it.
    GeolocationUnavailable,
    /// Form input rejected before anything was sent.
    Validation,
}

impl ErrorKind {
    /// Machine-readable code.
    pub fn error_code(&self) -> &'static str {
        match self {
            ErrorKind::InvalidCredentials => "INVALID_CREDENTIALS",
            ErrorKind::EmailAlreadyRegistered => "EMAIL_ALREADY_REGISTERED",
            ErrorKind::AuthServiceUnavailable => "AUTH_SERVICE_UNAVAILABLE",
            ErrorKind::SessionExpired => "SESSION_EXPIRED",
            ErrorKind::FacilityFetchFailed => "FACILITY_FETCH_FAILED",
            ErrorKind::FacilityRegistrationFailed => "FACILITY_REGISTRATION_FAILED",
            ErrorKind::ReservationSubmissionFailed => "RESERVATION_SUBMISSION_FAILED",
            ErrorKind::ReservationFetchFailed => "RESERVATION_FETCH_FAILED",
            ErrorKind::UserFetchFailed => "USER_FETCH_FAILED",
            ErrorKind::GeolocationUnavailable => "GEOLOCATION_UNAVAILABLE",
            ErrorKind::Validation => "VALIDATION_FAILED",
        }
    }

    /// Inline message shown in place of the view content.
    pub fn user_message(&self) -> &'static str {
        match self {
            ErrorKind::InvalidCredentials => "Invalid email or password.",
            ErrorKind::EmailAlreadyRegistered => "That email is already registered.",
            ErrorKind::AuthServiceUnavailable => {
                "The sign-in service is unavailable. Please try again."
            }
            ErrorKind::SessionExpired => "Your session has expired. Please sign in again.",
            ErrorKind::FacilityFetchFailed => "Could not load parking facilities.",
            ErrorKind::FacilityRegistrationFailed => "Could not register the parking facility.",
            ErrorKind::ReservationSubmissionFailed => "Could not create the reservation.",
            ErrorKind::ReservationFetchFailed => "Could not load reservations.",
            ErrorKind::UserFetchFailed => "Could not load users.",
            ErrorKind::GeolocationUnavailable => "Your location is unavailable.",
            ErrorKind::Validation => "Please check the form fields.",
        }
    }
}

// =========================================================
// Context trail
// =========================================================

/// One step of the operation trail attached to an error.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorSpan {
    pub operation: String,
    pub detail: Option<String>,
}

impl ErrorSpan {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            detail: None,
        }
    }

    pub fn with_detail(operation: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            detail: Some(detail.into()),
        }
    }
}

// =========================================================
// Client error
// =========================================================

/// Domain error of the client core.
///
/// - `kind`: what failed, drives the inline message
/// - `message`: developer-facing detail
/// - `source`: underlying error, if any
/// - `spans`: operation trail
#[derive(Debug)]
pub struct ClientError {
    pub kind: ErrorKind,
    pub message: String,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
    spans: Vec<ErrorSpan>,
}

impl ClientError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
            spans: Vec::new(),
        }
    }

    pub fn invalid_credentials(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidCredentials, message)
    }

    pub fn auth_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::AuthServiceUnavailable, message)
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    pub fn geolocation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::GeolocationUnavailable, message)
    }

    pub fn in_op(mut self, operation: impl Into<String>) -> Self {
        self.spans.push(ErrorSpan::new(operation));
        self
    }

    pub fn in_op_with(mut self, operation: impl Into<String>, detail: impl Into<String>) -> Self {
        self.spans.push(ErrorSpan::with_detail(operation, detail));
        self
    }

    pub fn with_source<E: std::error::Error + Send + Sync + 'static>(mut self, source: E) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    pub fn error_code(&self) -> &'static str {
        self.kind.error_code()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn spans(&self) -> &[ErrorSpan] {
        &self.spans
    }

    /// What the view renders. Validation errors carry their own wording;
    /// everything else uses the generic text of its kind.
    pub fn user_message(&self) -> String {
        match self.kind {
            ErrorKind::Validation if !self.message.is_empty() => self.message.clone(),
            kind => kind.user_message().to_string(),
        }
    }
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.error_code(), self.message)?;

        if !self.spans.is_empty() {
            write!(f, " | trace: ")?;
            for (i, span) in self.spans.iter().enumerate() {
                if i > 0 {
                    write!(f, " -> ")?;
                }
                write!(f, "{}", span.operation)?;
                if let Some(detail) = &span.detail {
                    write!(f, "({})", detail)?;
                }
            }
        }
        Ok(())
    }
}

impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

pub type ClientResult<T> = std::result::Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn display_includes_code_and_trail() {
        let err = ClientError::new(ErrorKind::FacilityFetchFailed, "status 500")
            .in_op("facilities.list")
            .in_op_with("browse", "fallback");
        assert_eq!(
            err.to_string(),
            "[FACILITY_FETCH_FAILED] status 500 | trace: facilities.list -> browse(fallback)"
        );
        assert_eq!(err.spans().len(), 2);
    }

    #[test]
    fn user_message_is_generic_except_for_validation() {
        let err = ClientError::new(ErrorKind::ReservationSubmissionFailed, "status 500");
        assert_eq!(err.user_message(), "Could not create the reservation.");

        let err = ClientError::validation("Total spaces must be at least 1.");
        assert_eq!(err.user_message(), "Total spaces must be at least 1.");
    }

    #[test]
    fn source_is_exposed() {
        let io = std::io::Error::other("boom");
        let err = ClientError::auth_unavailable("transport").with_source(io);
        assert!(err.source().is_some());
    }
}
