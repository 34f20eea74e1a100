//! Request interceptor

use crate::client::error::ClientError;
use crate::client::loading::{InFlight, LoadingCounter};
use carecom_core::{CredentialStore, CredentialStoreExt};
use std::sync::Arc;

/// Runs before a request is sent
#[derive(Clone)]
pub struct RequestInterceptor {
    counter: LoadingCounter,
    credentials: Option<Arc<dyn CredentialStore>>,
}

impl RequestInterceptor {
    /// Interceptor for the public client: counts requests, never authenticates
    pub fn public(counter: LoadingCounter) -> Self {
        Self {
            counter,
            credentials: None,
        }
    }

    /// Interceptor for the private client: attaches the stored bearer token
    pub fn private(counter: LoadingCounter, credentials: Arc<dyn CredentialStore>) -> Self {
        Self {
            counter,
            credentials: Some(credentials),
        }
    }

    pub const fn attaches_token(&self) -> bool {
        self.credentials.is_some()
    }

    /// Count the request as in flight, then build it.
    ///
    /// When `build` or the final assembly fails the guard is dropped before
    /// the error is returned, so the counter stays balanced.
    pub fn intercept<F>(&self, build: F) -> Result<(reqwest::Request, InFlight), ClientError>
    where
        F: FnOnce() -> Result<reqwest::RequestBuilder, ClientError>,
    {
        let in_flight = self.counter.begin();

        let mut builder = build()?;
        if let Some(token) = self.credentials.as_ref().and_then(|store| store.token()) {
            builder = builder.bearer_auth(token);
        }

        let request = builder.build()?;
        Ok((request, in_flight))
    }
}
