use super::*;
use crate::mock::MockBackend;
use easypark_shared::Role;

const BASE: &str = "https://localhost:7041/api";

fn api(backend: &MockBackend) -> ParkingApi<MockBackend> {
    ParkingApi::new(BASE, backend.clone())
}

fn credentials(email: &str, password: &str) -> Credentials {
    Credentials {
        email: email.to_string(),
        password: password.to_string(),
    }
}

#[tokio::test]
async fn login_persists_markers_and_restart_restores_without_network() {
    let backend = MockBackend::seeded();
    let storage = MemoryStorage::new();
    let mut store = SessionStore::new(storage.clone());

    let session = store
        .login(&api(&backend), &credentials("usuario@test.com", "password123"))
        .await
        .unwrap();
    assert!(session.is_authenticated);
    assert!(!session.is_admin());
    assert_eq!(storage.get(TOKEN_KEY).as_deref(), Some("mock-token-1"));
    assert!(storage.get(IDENTITY_KEY).is_some());

    let requests_before = backend.request_count();
    let restored = SessionStore::restore(storage.clone());
    assert!(restored.is_authenticated());
    assert_eq!(restored.session().user_id(), Some("1"));
    assert_eq!(backend.request_count(), requests_before);
}

#[tokio::test]
async fn admin_login_grants_admin() {
    let backend = MockBackend::seeded();
    let mut store = SessionStore::new(MemoryStorage::new());
    store
        .login(&api(&backend), &credentials("admin@test.com", "admin123"))
        .await
        .unwrap();
    assert!(store.is_admin());
    assert_eq!(store.session().token(), Some("mock-token-2"));
}

#[tokio::test]
async fn wrong_password_is_invalid_credentials() {
    let backend = MockBackend::seeded();
    let mut store = SessionStore::new(MemoryStorage::new());
    let err = store
        .login(&api(&backend), &credentials("usuario@test.com", "nope"))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidCredentials);
    assert!(!store.is_authenticated());
}

#[tokio::test]
async fn unreachable_service_is_auth_unavailable() {
    let backend = MockBackend::seeded();
    backend.go_offline();
    let mut store = SessionStore::new(MemoryStorage::new());
    let err = store
        .login(&api(&backend), &credentials("usuario@test.com", "password123"))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::AuthServiceUnavailable);

    backend.recover();
    backend.fail_with(500);
    let err = store
        .login(&api(&backend), &credentials("usuario@test.com", "password123"))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::AuthServiceUnavailable);
}

#[tokio::test]
async fn register_signs_in_and_rejects_duplicates() {
    let backend = MockBackend::seeded();
    let mut store = SessionStore::new(MemoryStorage::new());
    let registration = Registration {
        email: "nuevo@test.com".to_string(),
        password: "secret".to_string(),
        name: "Ana María Torres".to_string(),
    };

    let session = store.register(&api(&backend), &registration).await.unwrap();
    assert!(session.is_authenticated);
    let identity = session.identity.unwrap();
    assert_eq!(identity.first_name, "Ana");
    assert_eq!(identity.last_name, "María Torres");
    assert_eq!(identity.role, Role::User);

    let mut other = SessionStore::new(MemoryStorage::new());
    let err = other.register(&api(&backend), &registration).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::EmailAlreadyRegistered);
}

#[tokio::test]
async fn logout_is_idempotent_and_clears_markers() {
    let backend = MockBackend::seeded();
    let storage = MemoryStorage::new();
    let mut store = SessionStore::new(storage.clone());
    store
        .login(&api(&backend), &credentials("usuario@test.com", "password123"))
        .await
        .unwrap();

    store.logout();
    store.logout();
    assert_eq!(store.session(), &Session::default());
    assert_eq!(storage.get(TOKEN_KEY), None);
    assert_eq!(storage.get(IDENTITY_KEY), None);
    assert!(!SessionStore::restore(storage).is_authenticated());
}

#[test]
fn token_without_identity_is_authenticated_but_not_admin() {
    let storage = MemoryStorage::new();
    storage.set(TOKEN_KEY, "opaque");
    storage.set(IDENTITY_KEY, "{not json");

    let store = SessionStore::restore(storage);
    assert!(store.is_authenticated());
    assert!(!store.is_admin());
    assert_eq!(store.session().identity, None);
}

#[test]
fn restored_role_is_matched_exactly() {
    let storage = MemoryStorage::new();
    storage.set(TOKEN_KEY, "opaque");
    storage.set(
        IDENTITY_KEY,
        r#"{"id":"9","firstName":"A","lastName":"B","email":"a@b.c","role":"Admin"}"#,
    );
    assert!(!SessionStore::restore(storage.clone()).is_admin());

    storage.set(
        IDENTITY_KEY,
        r#"{"id":"9","firstName":"A","lastName":"B","email":"a@b.c","role":"admin"}"#,
    );
    assert!(SessionStore::restore(storage).is_admin());
}

#[tokio::test]
async fn revalidate_expires_rejected_tokens() {
    let backend = MockBackend::seeded();
    let storage = MemoryStorage::new();
    storage.set(TOKEN_KEY, "forged");

    let mut store = SessionStore::restore(storage.clone());
    let err = store.revalidate(&api(&backend)).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::SessionExpired);
    assert!(!store.is_authenticated());
    assert_eq!(storage.get(TOKEN_KEY), None);
}

#[tokio::test]
async fn revalidate_refreshes_identity_and_survives_outages() {
    let backend = MockBackend::seeded();
    let storage = MemoryStorage::new();
    storage.set(TOKEN_KEY, &MockBackend::token_for("2"));

    let mut store = SessionStore::restore(storage.clone());
    assert!(!store.is_admin());

    let session = store.revalidate(&api(&backend)).await.unwrap();
    assert!(session.is_admin());
    assert!(storage.get(IDENTITY_KEY).is_some());

    backend.go_offline();
    let err = store.revalidate(&api(&backend)).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::AuthServiceUnavailable);
    assert!(store.is_authenticated());
}

#[tokio::test]
async fn identity_check_after_sign_out_leaves_store_signed_out() {
    let backend = MockBackend::seeded();
    let storage = MemoryStorage::new();
    let token = MockBackend::token_for("2");
    storage.set(TOKEN_KEY, &token);

    let mut store = SessionStore::restore(storage.clone());
    let check = check_token(&api(&backend), &token).await;
    store.logout();

    let session = store.apply_revalidation(check).unwrap();
    assert!(!session.is_authenticated);
    assert!(!store.is_authenticated());
    assert_eq!(storage.get(TOKEN_KEY), None);
    assert_eq!(storage.get(IDENTITY_KEY), None);
}

#[tokio::test]
async fn identity_check_for_replaced_token_is_ignored() {
    let backend = MockBackend::seeded();
    let storage = MemoryStorage::new();
    storage.set(TOKEN_KEY, "forged");

    let mut store = SessionStore::restore(storage.clone());
    let check = check_token(&api(&backend), "forged").await;
    let auth = request_sign_in(&api(&backend), &credentials("usuario@test.com", "password123"))
        .await
        .unwrap();
    store.sign_in(auth);

    // the 401 belongs to the old token and must not expire the new session
    let session = store.apply_revalidation(check).unwrap();
    assert_eq!(session.token(), Some("mock-token-1"));
    assert_eq!(storage.get(TOKEN_KEY).as_deref(), Some("mock-token-1"));
}

/// Storage that accepts writes but refuses removals.
#[derive(Clone, Default)]
struct StickyStorage(MemoryStorage);

impl MarkerStorage for StickyStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.0.get(key)
    }

    fn set(&self, key: &str, value: &str) -> bool {
        self.0.set(key, value)
    }

    fn delete(&self, _key: &str) -> bool {
        false
    }
}

#[tokio::test]
async fn logout_clears_memory_when_markers_cannot_be_removed() {
    let backend = MockBackend::seeded();
    let storage = StickyStorage::default();
    let mut store = SessionStore::new(storage.clone());
    store
        .login(&api(&backend), &credentials("usuario@test.com", "password123"))
        .await
        .unwrap();

    store.logout();
    assert!(!store.is_authenticated());
    assert_eq!(store.session(), &Session::default());
    assert!(storage.get(TOKEN_KEY).is_some());
}
