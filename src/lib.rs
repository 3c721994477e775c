//! EasyPark client core.
//!
//! Platform-agnostic half of the parking client: the typed gateway to the
//! parking service, the session store, route table and guard, and the
//! browse / register / reserve flows. The browser frontend supplies the
//! HTTP transport, storage and geolocation through the traits defined here;
//! native tests use the in-memory [`mock::MockBackend`].

pub mod api;
pub mod browse;
pub mod config;
pub mod error;
pub mod guard;
pub mod history;
pub mod load;
pub mod map;
pub mod mock;
pub mod registration;
pub mod request;
pub mod reservation;
pub mod route;
pub mod scope;
pub mod session;

pub use api::{ApiFailure, ParkingApi};
pub use config::{ApiMode, ClientConfig, StartupPolicy};
pub use error::{ClientError, ClientResult, ErrorKind};
pub use guard::{GuardOutcome, Prompt, RouteRequirement};
pub use request::{HttpClient, HttpError, HttpRequest, HttpResponse};
pub use route::AppRoute;
pub use session::{MarkerStorage, MemoryStorage, Session, SessionStore};

#[cfg(not(target_arch = "wasm32"))]
pub use request::ReqwestHttpClient;
