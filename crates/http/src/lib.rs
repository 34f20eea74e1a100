//! HTTP client layer for the TB CareCom backend
//!
//! [`client`] holds the transport: endpoint classification, the public and
//! private clients, interceptors and the dispatcher. [`services`] wraps the
//! endpoints the app calls into typed operations.

pub mod client;
pub mod services;

pub use client::{ApiClient, ApiRequest, ApiResponse, ClientConfig, ClientError, ClientFactory};
pub use services::{AuthService, MonitoringService, PmoService, ProfileService};
