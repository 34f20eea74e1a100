//! Role-aware API client
//!
//! Two clients share one base URL: a public one for the authentication
//! endpoints and a private one that attaches the stored bearer token.
//! [`ApiClient`] picks between them per request.

pub mod classifier;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod exchange;
pub mod factory;
pub mod interceptor;
pub mod loading;
pub mod messages;
pub mod navigate;
pub mod notify;
pub mod typed;

pub use classifier::{Access, EndpointClassifier, MatchMode, relative_to_base};
pub use config::ClientConfig;
pub use dispatcher::ApiClient;
pub use error::{ClientError, FieldError};
pub use exchange::{ApiRequest, ApiResponse};
pub use factory::ClientFactory;
pub use loading::{InFlight, LoadingCounter};
pub use navigate::{Navigator, TracingNavigator};
pub use notify::{ChannelNotifier, Notification, NotificationLevel, Notifier, TracingNotifier};
pub use typed::{PrivateClient, PublicClient};
