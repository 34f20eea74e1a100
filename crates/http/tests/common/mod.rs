//! Shared fixtures for the integration tests

#![allow(dead_code)]

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use carecom_core::{CredentialStoreExt, Credentials, MemoryStore, Role};
use carecom_http::client::{
    ApiClient, ChannelNotifier, ClientConfig, LoadingCounter, Navigator, Notification,
};
use serde_json::json;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc::UnboundedReceiver;
use wiremock::MockServer;

/// Navigator that remembers every redirect
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    visited: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn visited(&self) -> Vec<String> {
        self.visited.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, path: &str) {
        self.visited.lock().unwrap().push(path.to_string());
    }
}

pub struct Harness {
    pub client: ApiClient,
    pub store: Arc<MemoryStore>,
    pub navigator: Arc<RecordingNavigator>,
    pub counter: LoadingCounter,
    notifications: UnboundedReceiver<Notification>,
}

impl Harness {
    /// Notifications raised since the last call
    pub fn notifications(&mut self) -> Vec<Notification> {
        let mut seen = Vec::new();
        while let Ok(notification) = self.notifications.try_recv() {
            seen.push(notification);
        }
        seen
    }

    pub fn titles(&mut self) -> Vec<String> {
        self.notifications()
            .into_iter()
            .map(|notification| notification.title)
            .collect()
    }

    pub fn log_in_as(&self, token: &str, role: Role) {
        self.store
            .save(&Credentials {
                token: token.to_string(),
                role,
            })
            .unwrap();
    }
}

pub fn harness(server: &MockServer) -> Harness {
    harness_with(ClientConfig::with_base_url(server.uri()))
}

/// Route client logs to the test output, once per test binary
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("carecom_http=debug")
        .with_test_writer()
        .try_init();
}

pub fn harness_with(config: ClientConfig) -> Harness {
    init_test_tracing();
    let store = Arc::new(MemoryStore::new());
    let navigator = Arc::new(RecordingNavigator::default());
    let counter = LoadingCounter::new();
    let (notifier, notifications) = ChannelNotifier::channel();

    let client = ApiClient::builder(config)
        .loading_counter(counter.clone())
        .credential_store(store.clone())
        .notifier(Arc::new(notifier))
        .navigator(navigator.clone())
        .build()
        .unwrap();

    Harness {
        client,
        store,
        navigator,
        counter,
        notifications,
    }
}

/// Unsigned JWT carrying `role`
pub fn token_for(role: &str) -> String {
    let header = URL_SAFE_NO_PAD.encode(json!({"alg": "HS256", "typ": "JWT"}).to_string());
    let payload = URL_SAFE_NO_PAD.encode(json!({"sub": 12, "role": role}).to_string());
    format!("{header}.{payload}.signature")
}
