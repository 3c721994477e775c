use easypark_shared::Coordinates;
use std::time::Duration;

// =========================================================
// Defaults
// =========================================================

pub const DEFAULT_API_URL: &str = "https://localhost:7041/api";
pub const DEFAULT_SEARCH_RADIUS_KM: f64 = 5.0;
pub const DEFAULT_PAGE_SIZE: usize = 10;
/// Lima city centre.
pub const DEFAULT_CENTER: Coordinates = Coordinates::new(-12.0464, -77.0428);

pub const OVERVIEW_ZOOM: u8 = 13;
pub const LOCATED_ZOOM: u8 = 15;
pub const FACILITY_ZOOM: u8 = 17;

/// How many reservations "my reservations" shows.
pub const RECENT_RESERVATIONS: usize = 5;
pub const REDIRECT_DELAY: Duration = Duration::from_secs(5);

const KEY_API_URL: &str = "EASYPARK_API_URL";
const KEY_API_MODE: &str = "EASYPARK_API_MODE";
const KEY_STARTUP_POLICY: &str = "EASYPARK_STARTUP_POLICY";
const KEY_SEARCH_RADIUS: &str = "EASYPARK_SEARCH_RADIUS_KM";
const KEY_PAGE_SIZE: &str = "EASYPARK_PAGE_SIZE";

/// Where API calls go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ApiMode {
    #[default]
    Remote,
    /// In-memory service, no network.
    Mock,
}

/// How a persisted session marker is treated at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StartupPolicy {
    /// Marker present means authenticated. No network call.
    #[default]
    TrustOnPresence,
    /// Confirm the marker with the identity endpoint.
    Validate,
}

/// Client settings.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub api_url: String,
    pub api_mode: ApiMode,
    pub startup_policy: StartupPolicy,
    pub search_radius_km: f64,
    pub page_size: usize,
    pub redirect_delay: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_mode: ApiMode::default(),
            startup_policy: StartupPolicy::default(),
            search_radius_km: DEFAULT_SEARCH_RADIUS_KM,
            page_size: DEFAULT_PAGE_SIZE,
            redirect_delay: REDIRECT_DELAY,
        }
    }
}

impl ClientConfig {
    /// Reads every key through `lookup`, keeping the default for absent or
    /// malformed values.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let read = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let api_url = read(KEY_API_URL)
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or(defaults.api_url);

        let api_mode = match read(KEY_API_MODE).as_deref() {
            None | Some("remote") => ApiMode::Remote,
            Some("mock") => ApiMode::Mock,
            Some(other) => {
                log::warn!("{KEY_API_MODE}: unknown mode '{other}', using remote");
                ApiMode::Remote
            }
        };

        let startup_policy = match read(KEY_STARTUP_POLICY).as_deref() {
            None | Some("trust") => StartupPolicy::TrustOnPresence,
            Some("validate") => StartupPolicy::Validate,
            Some(other) => {
                log::warn!("{KEY_STARTUP_POLICY}: unknown policy '{other}', using trust");
                StartupPolicy::TrustOnPresence
            }
        };

        let search_radius_km = parse_or(
            read(KEY_SEARCH_RADIUS),
            KEY_SEARCH_RADIUS,
            defaults.search_radius_km,
            |r: &f64| r.is_finite() && *r > 0.0,
        );

        let page_size = parse_or(read(KEY_PAGE_SIZE), KEY_PAGE_SIZE, defaults.page_size, |n| {
            *n > 0
        });

        Self {
            api_url,
            api_mode,
            startup_policy,
            search_radius_km,
            page_size,
            redirect_delay: defaults.redirect_delay,
        }
    }

    /// Settings baked in at compile time.
    pub fn from_build_env() -> Self {
        Self::from_lookup(|key| {
            let value = match key {
                KEY_API_URL => option_env!("EASYPARK_API_URL"),
                KEY_API_MODE => option_env!("EASYPARK_API_MODE"),
                KEY_STARTUP_POLICY => option_env!("EASYPARK_STARTUP_POLICY"),
                KEY_SEARCH_RADIUS => option_env!("EASYPARK_SEARCH_RADIUS_KM"),
                KEY_PAGE_SIZE => option_env!("EASYPARK_PAGE_SIZE"),
                _ => None,
            };
            value.map(str::to_string)
        })
    }
}

fn parse_or<T, P>(raw: Option<String>, key: &str, default: T, valid: P) -> T
where
    T: std::str::FromStr + Copy + std::fmt::Display,
    P: Fn(&T) -> bool,
{
    let Some(raw) = raw else {
        return default;
    };
    match raw.parse::<T>() {
        Ok(value) if valid(&value) => value,
        _ => {
            log::warn!("{key}: invalid value '{raw}', using {default}");
            default
        }
    }
}
