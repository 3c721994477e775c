//! Browser HTTP transport.
//!
//! Implements the core `HttpClient` seam on top of `gloo-net` (window fetch).
//! Any answer the server gives, whatever the status, is handed back as an
//! `HttpResponse`; only fetch-level failures become `HttpError`.

use easypark::{HttpClient, HttpError, HttpRequest, HttpResponse};
use easypark_shared::protocol::HttpMethod;
use gloo_net::http::{Method, RequestBuilder};

#[derive(Debug, Clone, Copy, Default)]
pub struct FetchClient;

fn method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Patch => Method::PATCH,
        HttpMethod::Delete => Method::DELETE,
    }
}

#[async_trait::async_trait(?Send)]
impl HttpClient for FetchClient {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, HttpError> {
        let mut builder = RequestBuilder::new(&req.url).method(method(req.method));
        for (key, value) in &req.headers {
            builder = builder.header(key, value);
        }

        let request = match req.body {
            Some(body) => builder.body(body),
            None => builder.build(),
        }
        .map_err(|e| HttpError::RequestBuildFailed(e.to_string()))?;

        let response = request
            .send()
            .await
            .map_err(|e| HttpError::NetworkError(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| HttpError::ResponseReadFailed(e.to_string()))?;

        Ok(HttpResponse::new(status, body))
    }
}
