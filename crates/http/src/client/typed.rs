//! Public and private API clients
//!
//! Both clients share one pipeline: request interceptor, send with optional
//! deadline and cancellation, response interceptor. They differ only in
//! whether the request interceptor attaches the stored bearer token.

use super::classifier::{normalize_path, relative_to_base};
use super::error::ClientError;
use super::exchange::{ApiRequest, ApiResponse, RequestBody, decode_body};
use super::interceptor::{RequestInterceptor, ResponseInterceptor};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use url::Url;

struct Transport {
    client: Client,
    base_url: String,
    default_timeout: Option<Duration>,
    request: RequestInterceptor,
    response: Arc<ResponseInterceptor>,
    name: &'static str,
}

impl Transport {
    /// Absolute URLs are only followed on the base URL's origin
    fn url_for(&self, path: &str) -> Result<Url, ClientError> {
        let Some(relative) = relative_to_base(&self.base_url, path) else {
            return Err(ClientError::Request(format!(
                "{} is outside the API base URL {}",
                path.trim(),
                self.base_url
            )));
        };
        let raw = if relative.starts_with('/') {
            format!("{}{relative}", self.base_url)
        } else {
            format!("{}/{relative}", self.base_url)
        };

        Url::parse(&raw).map_err(|e| ClientError::Request(format!("invalid URL {raw}: {e}")))
    }

    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ClientError> {
        let ApiRequest {
            method,
            path,
            body,
            query,
            timeout,
            cancel,
        } = request;
        let started = Instant::now();
        let path = relative_to_base(&self.base_url, &path).unwrap_or(path);

        let prepared = self.request.intercept(|| {
            let mut builder = self.client.request(method.clone(), self.url_for(&path)?);
            if !query.is_empty() {
                builder = builder.query(&query);
            }
            match body {
                Some(RequestBody::Json(value)) => builder = builder.json(&value),
                Some(RequestBody::Unencodable(reason)) => {
                    return Err(ClientError::Request(format!("body could not be encoded: {reason}")));
                }
                None => {}
            }
            Ok(builder)
        });

        let (http_request, in_flight) = match prepared {
            Ok(prepared) => prepared,
            Err(error) => {
                warn!(client = self.name, %method, %path, "request not sent: {error}");
                self.response.on_error(&method, &path, &error);
                return Err(error);
            }
        };

        let outcome = self
            .execute(http_request, timeout.or(self.default_timeout), cancel.as_ref())
            .await;
        drop(in_flight);

        let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        match outcome {
            Ok((status, body)) if status.is_success() => {
                debug!(client = self.name, %method, path = %normalize_path(&path), %status, elapsed_ms, "request completed");
                self.response.on_success(&method, &path, status, &body);
                Ok(ApiResponse::new(status, body))
            }
            Ok((status, body)) => {
                let error = ClientError::from_status(status, &body);
                debug!(client = self.name, %method, path = %normalize_path(&path), %status, elapsed_ms, "request rejected");
                self.response.on_error(&method, &path, &error);
                Err(error)
            }
            Err(error) => {
                warn!(client = self.name, %method, path = %normalize_path(&path), elapsed_ms, "request failed: {error}");
                self.response.on_error(&method, &path, &error);
                Err(error)
            }
        }
    }

    async fn execute(
        &self,
        request: reqwest::Request,
        timeout: Option<Duration>,
        cancel: Option<&CancellationToken>,
    ) -> Result<(StatusCode, Value), ClientError> {
        let exchange = async {
            let response = self.client.execute(request).await?;
            let status = response.status();
            let bytes = response.bytes().await?;
            Ok::<_, ClientError>((status, decode_body(&bytes)))
        };

        let bounded = async {
            match timeout {
                Some(limit) => match tokio::time::timeout(limit, exchange).await {
                    Ok(outcome) => outcome,
                    Err(_) => Err(ClientError::Timeout(limit)),
                },
                None => exchange.await,
            }
        };

        match cancel {
            Some(token) => {
                tokio::select! {
                    biased;
                    () = token.cancelled() => Err(ClientError::Cancelled),
                    outcome = bounded => outcome,
                }
            }
            None => bounded.await,
        }
    }
}

fn transport(
    client: Client,
    base_url: String,
    default_timeout: Option<Duration>,
    request: RequestInterceptor,
    response: Arc<ResponseInterceptor>,
    name: &'static str,
) -> Arc<Transport> {
    Arc::new(Transport {
        client,
        base_url,
        default_timeout,
        request,
        response,
        name,
    })
}

/// Client for endpoints that take no credentials
#[derive(Clone)]
pub struct PublicClient {
    transport: Arc<Transport>,
}

/// Client for endpoints that require the bearer token
#[derive(Clone)]
pub struct PrivateClient {
    transport: Arc<Transport>,
}

impl PublicClient {
    pub(crate) fn new(
        client: Client,
        base_url: String,
        default_timeout: Option<Duration>,
        request: RequestInterceptor,
        response: Arc<ResponseInterceptor>,
    ) -> Self {
        Self {
            transport: transport(client, base_url, default_timeout, request, response, "public"),
        }
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.transport.base_url
    }

    /// Send a request without credentials
    pub async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ClientError> {
        self.transport.send(request).await
    }
}

impl PrivateClient {
    pub(crate) fn new(
        client: Client,
        base_url: String,
        default_timeout: Option<Duration>,
        request: RequestInterceptor,
        response: Arc<ResponseInterceptor>,
    ) -> Self {
        Self {
            transport: transport(client, base_url, default_timeout, request, response, "private"),
        }
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.transport.base_url
    }

    /// Send a request with the stored bearer token, when there is one
    pub async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ClientError> {
        self.transport.send(request).await
    }
}
