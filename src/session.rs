//! Session store.
//!
//! Owns the authentication state of the client: who is signed in, with which
//! token, and the two persisted markers that survive a reload. The store is
//! an explicit value built over an injected [`MarkerStorage`]; the frontend
//! shares it through a context.
//!
//! Startup follows trust-on-presence: a stored token alone marks the session
//! authenticated, without a network call. [`SessionStore::revalidate`] is the
//! opt-in server check.

use crate::api::{ApiResult, ParkingApi};
use crate::error::{ClientError, ClientResult, ErrorKind};
use crate::request::HttpClient;
use easypark_shared::{AuthResponse, Credentials, Registration, UserIdentity};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[cfg(test)]
mod tests;

pub const TOKEN_KEY: &str = "auth_token";
pub const IDENTITY_KEY: &str = "user";

// =========================================================
// Marker storage
// =========================================================

/// Key-value persistence for the session markers.
pub trait MarkerStorage {
    fn get(&self, key: &str) -> Option<String>;
    /// Returns `false` when the value could not be stored.
    fn set(&self, key: &str, value: &str) -> bool;
    fn delete(&self, key: &str) -> bool;
}

/// Process-local storage. Clones share their contents, which lets tests
/// "restart" a store over the same markers.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_entries<T>(&self, f: impl FnOnce(&mut HashMap<String, String>) -> T) -> T {
        let mut entries = self
            .entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut entries)
    }
}

impl MarkerStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.with_entries(|entries| entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> bool {
        self.with_entries(|entries| entries.insert(key.to_string(), value.to_string()));
        true
    }

    fn delete(&self, key: &str) -> bool {
        self.with_entries(|entries| entries.remove(key));
        true
    }
}

// =========================================================
// Session
// =========================================================

/// Snapshot of the authentication state.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Session {
    pub identity: Option<UserIdentity>,
    pub token: Option<String>,
    pub is_authenticated: bool,
}

impl Session {
    fn signed_in(auth: AuthResponse) -> Self {
        Self {
            identity: Some(auth.user),
            token: Some(auth.token),
            is_authenticated: true,
        }
    }

    /// Admin iff authenticated and the role is exactly `admin`.
    pub fn is_admin(&self) -> bool {
        self.is_authenticated
            && self
                .identity
                .as_ref()
                .is_some_and(|identity| identity.role.is_admin())
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn user_id(&self) -> Option<&str> {
        self.identity.as_ref().map(|identity| identity.id.as_str())
    }

    pub fn display_name(&self) -> Option<String> {
        self.identity.as_ref().map(UserIdentity::display_name)
    }
}

// =========================================================
// Store
// =========================================================

#[derive(Debug, Clone)]
pub struct SessionStore<S> {
    storage: S,
    session: Session,
}

impl<S: MarkerStorage> SessionStore<S> {
    /// Empty, unauthenticated store. Existing markers are left alone.
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            session: Session::default(),
        }
    }

    /// Store rebuilt from persisted markers.
    ///
    /// A token marker alone is enough to be authenticated. The identity is
    /// restored when its marker decodes; otherwise it stays absent and the
    /// session is authenticated but not admin.
    pub fn restore(storage: S) -> Self {
        let mut store = Self::new(storage);

        let Some(token) = store.storage.get(TOKEN_KEY).filter(|t| !t.is_empty()) else {
            return store;
        };

        let identity = store.storage.get(IDENTITY_KEY).and_then(|raw| {
            serde_json::from_str::<UserIdentity>(&raw)
                .inspect_err(|e| log::warn!("stored identity unreadable: {e}"))
                .ok()
        });

        log::info!(
            "session restored for {}",
            identity.as_ref().map_or("unknown identity", |i| i.email.as_str())
        );

        store.session = Session {
            identity,
            token: Some(token),
            is_authenticated: true,
        };
        store
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated
    }

    pub fn is_admin(&self) -> bool {
        self.session.is_admin()
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Signs in. 401 means bad credentials; every other failure is reported
    /// as the identity service being unavailable. A failed attempt leaves the
    /// current session as it was.
    pub async fn login<C: HttpClient>(
        &mut self,
        api: &ParkingApi<C>,
        credentials: &Credentials,
    ) -> ClientResult<Session> {
        let auth = request_sign_in(api, credentials).await?;
        Ok(self.sign_in(auth))
    }

    /// Creates an account and signs in with it. 409 means the email is taken.
    pub async fn register<C: HttpClient>(
        &mut self,
        api: &ParkingApi<C>,
        registration: &Registration,
    ) -> ClientResult<Session> {
        let auth = request_registration(api, registration).await?;
        Ok(self.sign_in(auth))
    }

    /// Confirms the current token with the identity endpoint and refreshes
    /// the identity. A 401 expires the session; transport failures keep it.
    pub async fn revalidate<C: HttpClient + Clone>(
        &mut self,
        api: &ParkingApi<C>,
    ) -> ClientResult<Session> {
        let Some(token) = self.session.token.clone().filter(|_| self.session.is_authenticated)
        else {
            return Ok(self.session.clone());
        };
        let check = check_token(api, &token).await;
        self.apply_revalidation(check)
    }

    /// Installs a session issued by the identity endpoint and persists its
    /// markers.
    pub fn sign_in(&mut self, auth: AuthResponse) -> Session {
        if !self.storage.set(TOKEN_KEY, &auth.token) {
            log::warn!("could not persist session token");
        }
        self.persist_identity(&auth.user);

        log::info!("signed in as {} ({})", auth.user.email, auth.user.role.as_str());
        self.session = Session::signed_in(auth);
        self.session.clone()
    }

    /// Applies an identity check. A check made for a token the store no
    /// longer holds (signed out or replaced meanwhile) changes nothing.
    pub fn apply_revalidation(&mut self, check: TokenCheck) -> ClientResult<Session> {
        if self.session.token() != Some(check.token.as_str()) {
            log::debug!("identity check for a replaced session ignored");
            return Ok(self.session.clone());
        }

        match check.outcome {
            Ok(identity) => {
                self.persist_identity(&identity);
                self.session.identity = Some(identity);
                Ok(self.session.clone())
            }
            Err(failure) if failure.is_unauthorized() => {
                self.expire();
                Err(failure
                    .into_client(ErrorKind::SessionExpired)
                    .in_op("session.revalidate"))
            }
            Err(failure) => Err(failure
                .into_client(ErrorKind::AuthServiceUnavailable)
                .in_op("session.revalidate")),
        }
    }

    /// Clears memory and markers. Safe to call when already signed out.
    pub fn logout(&mut self) {
        if self.session.is_authenticated {
            log::info!("session closed");
        }
        self.clear();
    }

    /// Drops a session the service no longer accepts.
    pub fn expire(&mut self) {
        log::warn!("session expired");
        self.clear();
    }

    fn clear(&mut self) {
        for key in [TOKEN_KEY, IDENTITY_KEY] {
            if !self.storage.delete(key) {
                log::warn!("could not remove session marker {key}");
            }
        }
        self.session = Session::default();
    }

    fn persist_identity(&self, identity: &UserIdentity) {
        match serde_json::to_string(identity) {
            Ok(raw) => {
                if !self.storage.set(IDENTITY_KEY, &raw) {
                    log::warn!("could not persist identity");
                }
            }
            Err(e) => log::warn!("identity not serializable: {e}"),
        }
    }
}

// =========================================================
// Identity calls
// =========================================================
//
// Network halves of the store transitions. They borrow nothing from the
// store, so a shared store can stay readable (and be signed out) while they
// run; the result is applied afterwards.

pub async fn request_sign_in<C: HttpClient>(
    api: &ParkingApi<C>,
    credentials: &Credentials,
) -> ClientResult<AuthResponse> {
    api.authenticate(credentials).await.map_err(|failure| {
        let kind = match failure.status() {
            Some(401) => ErrorKind::InvalidCredentials,
            _ => ErrorKind::AuthServiceUnavailable,
        };
        ClientError::new(kind, failure.to_string())
            .with_source(failure)
            .in_op_with("session.login", &credentials.email)
    })
}

pub async fn request_registration<C: HttpClient>(
    api: &ParkingApi<C>,
    registration: &Registration,
) -> ClientResult<AuthResponse> {
    api.register_identity(registration).await.map_err(|failure| {
        let kind = match failure.status() {
            Some(409) => ErrorKind::EmailAlreadyRegistered,
            _ => ErrorKind::AuthServiceUnavailable,
        };
        ClientError::new(kind, failure.to_string())
            .with_source(failure)
            .in_op_with("session.register", &registration.email)
    })
}

/// Identity endpoint answer for one token.
#[derive(Debug)]
pub struct TokenCheck {
    token: String,
    outcome: ApiResult<UserIdentity>,
}

pub async fn check_token<C: HttpClient + Clone>(api: &ParkingApi<C>, token: &str) -> TokenCheck {
    let outcome = api.with_token(Some(token)).current_user().await;
    TokenCheck {
        token: token.to_string(),
        outcome,
    }
}
