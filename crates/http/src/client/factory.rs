//! Builds the public and private clients from one configuration

use super::classifier::EndpointClassifier;
use super::config::ClientConfig;
use super::dispatcher::ApiClient;
use super::error::ClientError;
use super::interceptor::{RequestInterceptor, ResponseInterceptor, SessionPolicy};
use super::loading::LoadingCounter;
use super::navigate::{Navigator, TracingNavigator};
use super::notify::{Notifier, TracingNotifier};
use super::typed::{PrivateClient, PublicClient};
use carecom_core::{CredentialStore, MemoryStore};
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Client, ClientBuilder};
use std::sync::Arc;
use url::Url;

/// Builder for the client pair and the dispatcher on top of it
pub struct ClientFactory {
    config: ClientConfig,
    counter: Option<LoadingCounter>,
    credentials: Option<Arc<dyn CredentialStore>>,
    notifier: Option<Arc<dyn Notifier>>,
    navigator: Option<Arc<dyn Navigator>>,
}

/// Collaborators shared by both clients
pub(crate) struct Shared {
    pub(crate) config: ClientConfig,
    pub(crate) classifier: Arc<EndpointClassifier>,
    pub(crate) counter: LoadingCounter,
    pub(crate) credentials: Arc<dyn CredentialStore>,
    pub(crate) notifier: Arc<dyn Notifier>,
    pub(crate) navigator: Arc<dyn Navigator>,
}

impl ClientFactory {
    pub const fn new(config: ClientConfig) -> Self {
        Self {
            config,
            counter: None,
            credentials: None,
            notifier: None,
            navigator: None,
        }
    }

    /// Factory over [`ClientConfig::from_env`]
    pub fn from_env() -> Self {
        Self::new(ClientConfig::from_env())
    }

    /// Share an in-flight counter with the caller
    #[must_use]
    pub fn loading_counter(mut self, counter: LoadingCounter) -> Self {
        self.counter = Some(counter);
        self
    }

    /// Where the token and role are persisted
    #[must_use]
    pub fn credential_store(mut self, store: Arc<dyn CredentialStore>) -> Self {
        self.credentials = Some(store);
        self
    }

    #[must_use]
    pub fn notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    #[must_use]
    pub fn navigator(mut self, navigator: Arc<dyn Navigator>) -> Self {
        self.navigator = Some(navigator);
        self
    }

    /// Build only the client for public endpoints
    pub fn build_public(self) -> Result<PublicClient, ClientError> {
        let (public, _, _) = self.build_parts()?;
        Ok(public)
    }

    /// Build only the client that attaches the bearer token
    pub fn build_private(self) -> Result<PrivateClient, ClientError> {
        let (_, private, _) = self.build_parts()?;
        Ok(private)
    }

    /// Build both clients
    pub fn build_pair(self) -> Result<(PublicClient, PrivateClient), ClientError> {
        let (public, private, _) = self.build_parts()?;
        Ok((public, private))
    }

    /// Build both clients behind the dispatcher
    pub fn build(self) -> Result<ApiClient, ClientError> {
        let (public, private, shared) = self.build_parts()?;
        Ok(ApiClient::new(public, private, shared))
    }

    fn build_parts(self) -> Result<(PublicClient, PrivateClient, Shared), ClientError> {
        let base_url = validate_base_url(&self.config.base_url)?;
        let default_timeout = self.config.timeout();

        let classifier = Arc::new(
            EndpointClassifier::new(&self.config.public_prefixes, self.config.match_mode)
                .with_pmo_fragment(self.config.pmo_fragment.clone()),
        );
        let counter = self.counter.unwrap_or_default();
        let credentials: Arc<dyn CredentialStore> = match self.credentials {
            Some(store) => store,
            None => Arc::new(MemoryStore::new()),
        };
        let notifier: Arc<dyn Notifier> = match self.notifier {
            Some(notifier) => notifier,
            None => Arc::new(TracingNotifier),
        };
        let navigator: Arc<dyn Navigator> = match self.navigator {
            Some(navigator) => navigator,
            None => Arc::new(TracingNavigator),
        };

        let response = Arc::new(ResponseInterceptor::new(
            Arc::clone(&classifier),
            SessionPolicy {
                login_path: self.config.login_path.clone(),
                quiet_not_found: self.config.quiet_not_found.clone(),
            },
            Arc::clone(&credentials),
            Arc::clone(&notifier),
            Arc::clone(&navigator),
        ));

        let public = PublicClient::new(
            http_client(&self.config)?,
            base_url.clone(),
            default_timeout,
            RequestInterceptor::public(counter.clone()),
            Arc::clone(&response),
        );
        let private = PrivateClient::new(
            http_client(&self.config)?,
            base_url,
            default_timeout,
            RequestInterceptor::private(counter.clone(), Arc::clone(&credentials)),
            response,
        );

        tracing::debug!(base_url = %public.base_url(), "api clients built");

        Ok((
            public,
            private,
            Shared {
                config: self.config,
                classifier,
                counter,
                credentials,
                notifier,
                navigator,
            },
        ))
    }
}

fn validate_base_url(base_url: &str) -> Result<String, ClientError> {
    let trimmed = base_url.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(ClientError::Configuration("base_url is required".into()));
    }
    let url = Url::parse(trimmed)
        .map_err(|e| ClientError::Configuration(format!("invalid base_url {trimmed}: {e}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ClientError::Configuration(format!(
            "base_url must be http or https, got {}",
            url.scheme()
        )));
    }
    Ok(trimmed.to_string())
}

/// One underlying HTTP client with the shared JSON defaults
fn http_client(config: &ClientConfig) -> Result<Client, ClientError> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    ClientBuilder::new()
        .user_agent(config.user_agent.clone())
        .default_headers(headers)
        .build()
        .map_err(|e| ClientError::Configuration(format!("failed to build HTTP client: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requires_base_url() {
        let result = ClientFactory::new(ClientConfig::with_base_url("  ")).build();
        assert!(matches!(result, Err(ClientError::Configuration(_))));
    }

    #[test]
    fn test_rejects_non_http_base_url() {
        let result = ClientFactory::new(ClientConfig::with_base_url("ftp://tb.example.id")).build();
        assert!(matches!(result, Err(ClientError::Configuration(_))));
    }

    #[test]
    fn test_pair_shares_base_url() {
        let (public, private) =
            ClientFactory::new(ClientConfig::with_base_url("http://localhost:8000/api/"))
                .build_pair()
                .unwrap();
        assert_eq!(public.base_url(), "http://localhost:8000/api");
        assert_eq!(private.base_url(), public.base_url());
    }
}
