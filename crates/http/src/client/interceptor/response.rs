//! Response interceptor

use crate::client::classifier::{Access, EndpointClassifier, normalize_path};
use crate::client::error::ClientError;
use crate::client::messages::{error_notification, success_notification};
use crate::client::navigate::Navigator;
use crate::client::notify::Notifier;
use carecom_core::{CredentialStore, CredentialStoreExt, message_of};
use reqwest::{Method, StatusCode};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

/// What happens to the session when the backend rejects a request
#[derive(Debug, Clone)]
pub struct SessionPolicy {
    /// View shown after a forced logout
    pub login_path: String,
    /// Path fragments whose 404 is an expected outcome for the caller
    pub quiet_not_found: Vec<String>,
}

impl Default for SessionPolicy {
    fn default() -> Self {
        Self {
            login_path: "/login".to_string(),
            quiet_not_found: vec!["/pmo/patient".to_string()],
        }
    }
}

/// Runs after every response or failure, for both clients
#[derive(Clone)]
pub struct ResponseInterceptor {
    classifier: Arc<EndpointClassifier>,
    policy: SessionPolicy,
    credentials: Arc<dyn CredentialStore>,
    notifier: Arc<dyn Notifier>,
    navigator: Arc<dyn Navigator>,
}

impl ResponseInterceptor {
    pub fn new(
        classifier: Arc<EndpointClassifier>,
        policy: SessionPolicy,
        credentials: Arc<dyn CredentialStore>,
        notifier: Arc<dyn Notifier>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            classifier,
            policy,
            credentials,
            notifier,
            navigator,
        }
    }

    /// Announce a successful write. The response itself is not touched.
    pub fn on_success(&self, method: &Method, path: &str, status: StatusCode, body: &Value) {
        let server_message = message_of(body);
        if let Some(notification) =
            success_notification(method, path, status, server_message.as_deref())
        {
            self.notifier.notify(notification);
        }
    }

    /// Announce a failure and apply the session policy. The caller still
    /// receives the error.
    pub fn on_error(&self, method: &Method, path: &str, error: &ClientError) {
        let access = self.classifier.classify(path);

        match error {
            ClientError::Unauthorized { .. } if access == Access::Private => {
                if self.classifier.is_pmo_path(path) {
                    debug!(%method, %path, "401 on PMO endpoint left to the caller");
                    return;
                }
                self.expire_session(method, path);
            }
            ClientError::NotFound { .. } if self.is_quiet_not_found(path) => {
                debug!(%method, %path, "expected 404 not announced");
                return;
            }
            _ => {}
        }

        if let Some(notification) = error_notification(error, access) {
            self.notifier.notify(notification);
        }
    }

    fn expire_session(&self, method: &Method, path: &str) {
        warn!(%method, %path, "session rejected, clearing credentials");
        if let Err(e) = self.credentials.clear() {
            warn!("failed to clear credentials: {e}");
        }
        self.navigator.navigate(&self.policy.login_path);
    }

    fn is_quiet_not_found(&self, path: &str) -> bool {
        let path = normalize_path(path);
        self.policy
            .quiet_not_found
            .iter()
            .any(|fragment| !fragment.is_empty() && path.contains(fragment.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::classifier::MatchMode;
    use crate::client::navigate::MockNavigator;
    use crate::client::notify::{MockNotifier, NotificationLevel};
    use carecom_core::{Credentials, MemoryStore, Role};
    use serde_json::json;

    fn classifier() -> Arc<EndpointClassifier> {
        Arc::new(EndpointClassifier::new(
            ["/auth/login", "/auth/register"],
            MatchMode::Prefix,
        ))
    }

    fn logged_in_store() -> Arc<MemoryStore> {
        let store = Arc::new(MemoryStore::new());
        store
            .save(&Credentials {
                token: "abc".to_string(),
                role: Role::Perawat,
            })
            .unwrap();
        store
    }

    fn interceptor(
        store: Arc<MemoryStore>,
        notifier: MockNotifier,
        navigator: MockNavigator,
    ) -> ResponseInterceptor {
        ResponseInterceptor::new(
            classifier(),
            SessionPolicy::default(),
            store,
            Arc::new(notifier),
            Arc::new(navigator),
        )
    }

    fn unauthorized() -> ClientError {
        ClientError::Unauthorized {
            message: "Unauthenticated.".to_string(),
        }
    }

    #[test]
    fn test_private_401_clears_and_redirects() {
        let store = logged_in_store();
        let mut notifier = MockNotifier::new();
        notifier
            .expect_notify()
            .withf(|n| n.title == "Sesi Berakhir")
            .times(1)
            .return_const(());
        let mut navigator = MockNavigator::new();
        navigator
            .expect_navigate()
            .withf(|path| path == "/login")
            .times(1)
            .return_const(());

        interceptor(store.clone(), notifier, navigator).on_error(
            &Method::GET,
            "/perawat/patients",
            &unauthorized(),
        );

        assert!(store.token().is_none());
        assert!(store.role().is_none());
    }

    #[test]
    fn test_pmo_401_is_left_to_caller() {
        let store = logged_in_store();
        let mut notifier = MockNotifier::new();
        notifier.expect_notify().never();
        let mut navigator = MockNavigator::new();
        navigator.expect_navigate().never();

        interceptor(store.clone(), notifier, navigator).on_error(
            &Method::GET,
            "/pmo/patient",
            &unauthorized(),
        );

        assert_eq!(store.token().as_deref(), Some("abc"));
        assert_eq!(store.role(), Some(Role::Perawat));
    }

    #[test]
    fn test_public_401_reports_login_failure_only() {
        let store = logged_in_store();
        let mut notifier = MockNotifier::new();
        notifier
            .expect_notify()
            .withf(|n| n.title == "Login Gagal" && n.level == NotificationLevel::Error)
            .times(1)
            .return_const(());
        let mut navigator = MockNavigator::new();
        navigator.expect_navigate().never();

        interceptor(store.clone(), notifier, navigator).on_error(
            &Method::POST,
            "/auth/login",
            &unauthorized(),
        );

        assert_eq!(store.token().as_deref(), Some("abc"));
    }

    #[test]
    fn test_quiet_not_found() {
        let mut notifier = MockNotifier::new();
        notifier.expect_notify().never();
        let navigator = MockNavigator::new();
        let error = ClientError::NotFound {
            message: "Not Found".to_string(),
        };

        interceptor(logged_in_store(), notifier, navigator).on_error(
            &Method::GET,
            "/pmo/patient?include=reports",
            &error,
        );
    }

    #[test]
    fn test_other_not_found_is_announced() {
        let mut notifier = MockNotifier::new();
        notifier
            .expect_notify()
            .withf(|n| n.title == "Tidak Ditemukan")
            .times(1)
            .return_const(());
        let error = ClientError::NotFound {
            message: "Artikel tidak ditemukan".to_string(),
        };

        interceptor(logged_in_store(), notifier, MockNavigator::new()).on_error(
            &Method::GET,
            "/articles/99",
            &error,
        );
    }

    #[test]
    fn test_success_uses_server_message() {
        let mut notifier = MockNotifier::new();
        notifier
            .expect_notify()
            .withf(|n| n.message == "Pasien berhasil ditambahkan")
            .times(1)
            .return_const(());

        interceptor(logged_in_store(), notifier, MockNavigator::new()).on_success(
            &Method::POST,
            "/perawat/patients",
            StatusCode::CREATED,
            &json!({"meta": {"code": 201, "message": "Pasien berhasil ditambahkan"}}),
        );
    }

    #[test]
    fn test_reads_are_silent() {
        let mut notifier = MockNotifier::new();
        notifier.expect_notify().never();

        interceptor(logged_in_store(), notifier, MockNavigator::new()).on_success(
            &Method::GET,
            "/articles",
            StatusCode::OK,
            &json!({"data": []}),
        );
    }
}
