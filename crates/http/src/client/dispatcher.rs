//! Smart dispatcher
//!
//! Call sites use one client. Each request is classified by path and handed
//! to the public or the private client. Nothing is cached.

use super::classifier::{Access, EndpointClassifier, relative_to_base};
use super::config::ClientConfig;
use super::error::ClientError;
use super::exchange::{ApiRequest, ApiResponse};
use super::factory::{ClientFactory, Shared};
use super::loading::LoadingCounter;
use super::navigate::Navigator;
use super::notify::Notifier;
use super::typed::{PrivateClient, PublicClient};
use carecom_core::CredentialStore;
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

/// Role-aware API client
#[derive(Clone)]
pub struct ApiClient {
    public: PublicClient,
    private: PrivateClient,
    classifier: Arc<EndpointClassifier>,
    counter: LoadingCounter,
    credentials: Arc<dyn CredentialStore>,
    notifier: Arc<dyn Notifier>,
    navigator: Arc<dyn Navigator>,
    login_path: String,
}

impl ApiClient {
    pub(crate) fn new(public: PublicClient, private: PrivateClient, shared: Shared) -> Self {
        let Shared {
            config,
            classifier,
            counter,
            credentials,
            notifier,
            navigator,
        } = shared;
        Self {
            public,
            private,
            classifier,
            counter,
            credentials,
            notifier,
            navigator,
            login_path: config.login_path,
        }
    }

    /// Start building a client
    pub const fn builder(config: ClientConfig) -> ClientFactory {
        ClientFactory::new(config)
    }

    /// Which client a path goes through
    ///
    /// An absolute URL outside the base URL is never given the private
    /// client; the public one refuses to send it.
    pub fn route(&self, path: &str) -> Access {
        relative_to_base(self.base_url(), path)
            .map_or(Access::Public, |relative| self.classifier.classify(&relative))
    }

    /// Send a request through the client its path is classified to
    pub async fn send(&self, mut request: ApiRequest) -> Result<ApiResponse, ClientError> {
        if let Some(relative) = relative_to_base(self.base_url(), &request.path) {
            request.path = relative;
        }
        let access = self.route(request.path());
        debug!(
            method = %request.method(),
            path = request.path(),
            access = access.as_str(),
            in_flight = self.counter.current(),
            "dispatching request"
        );
        match access {
            Access::Public => self.public.send(request).await,
            Access::Private => self.private.send(request).await,
        }
    }

    pub async fn get(&self, path: &str) -> Result<ApiResponse, ClientError> {
        self.send(ApiRequest::get(path)).await
    }

    pub async fn post<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<ApiResponse, ClientError> {
        self.send(ApiRequest::post(path).json(body)).await
    }

    pub async fn put<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<ApiResponse, ClientError> {
        self.send(ApiRequest::put(path).json(body)).await
    }

    pub async fn patch<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<ApiResponse, ClientError> {
        self.send(ApiRequest::patch(path).json(body)).await
    }

    pub async fn delete(&self, path: &str) -> Result<ApiResponse, ClientError> {
        self.send(ApiRequest::delete(path)).await
    }

    pub const fn public(&self) -> &PublicClient {
        &self.public
    }

    pub const fn private(&self) -> &PrivateClient {
        &self.private
    }

    /// Store holding the token and role
    pub fn credentials(&self) -> &Arc<dyn CredentialStore> {
        &self.credentials
    }

    /// Sink for notifications raised outside the response interceptor
    pub fn notifier(&self) -> &Arc<dyn Notifier> {
        &self.notifier
    }

    pub fn navigator(&self) -> &Arc<dyn Navigator> {
        &self.navigator
    }

    /// In-flight counter shared by both clients
    pub const fn loading(&self) -> &LoadingCounter {
        &self.counter
    }

    /// View shown after logout
    pub fn login_path(&self) -> &str {
        &self.login_path
    }

    pub fn base_url(&self) -> &str {
        self.public.base_url()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> ApiClient {
        ApiClient::builder(ClientConfig::with_base_url("http://localhost:8000/api"))
            .build()
            .unwrap()
    }

    #[test]
    fn test_route() {
        let client = client();
        assert_eq!(client.route("/auth/login"), Access::Public);
        assert_eq!(client.route("/auth/register"), Access::Public);
        assert_eq!(client.route("/pmo/patient"), Access::Private);
        assert_eq!(client.route("/user/profile"), Access::Private);
    }

    #[test]
    fn test_route_absolute_urls() {
        let client = client();
        assert_eq!(
            client.route("http://localhost:8000/api/auth/login"),
            Access::Public
        );
        assert_eq!(
            client.route("http://localhost:8000/api/user/profile"),
            Access::Private
        );
        assert_eq!(client.route("http://collector.example.com/user/profile"), Access::Public);
        assert_eq!(client.route("http://localhost:9000/api/user/profile"), Access::Public);
    }

    #[test]
    fn test_defaults() {
        let client = client();
        assert_eq!(client.base_url(), "http://localhost:8000/api");
        assert_eq!(client.login_path(), "/login");
        assert!(!client.loading().is_loading());
    }
}
