//! Authentication context.
//!
//! Holds the `SessionStore` in a signal shared through a context. The router
//! and the guard only read the derived signals; the store itself is the
//! single writer. Async transitions make their network call without holding
//! the store and apply the answer with `update`, so a sign-out made while a
//! call is pending is never overwritten.

use crate::api::ApiContext;
use crate::web::LocalStorage;
use easypark::session::{check_token, request_registration, request_sign_in};
use easypark::{ClientError, ClientResult, ErrorKind, Session, SessionStore, StartupPolicy};
use easypark_shared::{Credentials, Registration};
use leptos::prelude::*;
use leptos::task::spawn_local;

#[derive(Clone, Copy)]
pub struct AuthContext {
    store: RwSignal<SessionStore<LocalStorage>>,
    session: Memo<Session>,
    /// Set while the startup check against the identity endpoint runs.
    pub checking: RwSignal<bool>,
}

impl AuthContext {
    /// Context restored from the persisted markers.
    pub fn new() -> Self {
        let store = RwSignal::new(SessionStore::restore(LocalStorage));
        let session = Memo::new(move |_| store.with(|s| s.session().clone()));
        Self {
            store,
            session,
            checking: RwSignal::new(false),
        }
    }

    pub fn session(&self) -> Memo<Session> {
        self.session
    }

    pub fn session_untracked(&self) -> Session {
        self.session.get_untracked()
    }

    /// Injected into the router.
    pub fn is_authenticated_signal(&self) -> Signal<bool> {
        let session = self.session;
        Signal::derive(move || session.with(|s| s.is_authenticated))
    }

    pub fn is_admin_signal(&self) -> Signal<bool> {
        let session = self.session;
        Signal::derive(move || session.with(Session::is_admin))
    }

    /// Drops the session when `error` says the service no longer accepts
    /// it. Returns the error unchanged.
    pub fn check(&self, error: ClientError) -> ClientError {
        if error.kind == ErrorKind::SessionExpired {
            self.store.update(SessionStore::expire);
        }
        error
    }
}

impl Default for AuthContext {
    fn default() -> Self {
        Self::new()
    }
}

pub fn use_auth() -> AuthContext {
    use_context::<AuthContext>().expect("AuthContext should be provided")
}

/// Applies the startup policy. Trust-on-presence needs nothing further.
pub fn init_auth(ctx: &AuthContext, api: &ApiContext) {
    if api.config.startup_policy != StartupPolicy::Validate
        || !ctx.session_untracked().is_authenticated
    {
        return;
    }

    let Some(token) = ctx.session_untracked().token else {
        return;
    };

    let ctx = *ctx;
    let gateway = api.api.clone();
    ctx.checking.set(true);
    spawn_local(async move {
        let check = check_token(&gateway, &token).await;
        if let Some(Err(e)) = ctx.store.try_update(|store| store.apply_revalidation(check)) {
            log::warn!("{e}");
        }
        ctx.checking.set(false);
    });
}

pub async fn login(
    ctx: &AuthContext,
    api: &ApiContext,
    credentials: Credentials,
) -> ClientResult<Session> {
    let auth = request_sign_in(&api.api, &credentials).await?;
    Ok(ctx.store.try_update(|store| store.sign_in(auth)).unwrap_or_default())
}

pub async fn register(
    ctx: &AuthContext,
    api: &ApiContext,
    registration: Registration,
) -> ClientResult<Session> {
    let auth = request_registration(&api.api, &registration).await?;
    Ok(ctx.store.try_update(|store| store.sign_in(auth)).unwrap_or_default())
}

/// Guarded views react to the flipped session on their own.
pub fn logout(ctx: &AuthContext) {
    ctx.store.update(SessionStore::logout);
}
