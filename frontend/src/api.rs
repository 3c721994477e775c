//! Gateway wiring.
//!
//! Picks the transport from the configured API mode and shares one
//! `ParkingApi` plus the resolved config through a context.

use crate::web::FetchClient;
use easypark::mock::MockBackend;
use easypark::{ApiMode, ClientConfig, HttpClient, HttpError, HttpRequest, HttpResponse, ParkingApi};
use leptos::prelude::*;

/// Transport selected at startup.
#[derive(Debug, Clone)]
pub enum AppHttpClient {
    Fetch(FetchClient),
    /// In-memory service, for running without a backend.
    Mock(MockBackend),
}

#[async_trait::async_trait(?Send)]
impl HttpClient for AppHttpClient {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, HttpError> {
        match self {
            AppHttpClient::Fetch(client) => client.send(req).await,
            AppHttpClient::Mock(backend) => backend.send(req).await,
        }
    }
}

pub type AppApi = ParkingApi<AppHttpClient>;

#[derive(Debug, Clone)]
pub struct ApiContext {
    /// Unauthenticated gateway; bind a token with `with_token`.
    pub api: AppApi,
    pub config: ClientConfig,
}

impl ApiContext {
    pub fn new(config: ClientConfig) -> Self {
        let client = match config.api_mode {
            ApiMode::Remote => AppHttpClient::Fetch(FetchClient),
            ApiMode::Mock => {
                log::warn!("running against the in-memory parking service");
                AppHttpClient::Mock(MockBackend::seeded())
            }
        };
        log::info!("parking service at {}", config.api_url);
        Self {
            api: ParkingApi::new(&config.api_url, client),
            config,
        }
    }
}

pub fn use_api() -> ApiContext {
    use_context::<ApiContext>().expect("ApiContext should be provided")
}
