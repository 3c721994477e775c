//! Browser adapters.
//!
//! Thin wrappers over the native Web APIs, each plugged into a seam of the
//! core: fetch (`HttpClient`), localStorage (`MarkerStorage`), geolocation
//! (`Locator`), plus the History API router.

mod geolocation;
mod http;
pub mod router;
mod storage;

pub use geolocation::BrowserLocator;
pub use http::FetchClient;
pub use storage::LocalStorage;
