//! Typed operations over the API endpoints the app uses

pub mod auth;
pub mod monitoring;
pub mod pmo;
pub mod profile;

pub use auth::{AuthService, LoginOutcome, LoginRequest, RegisterRequest};
pub use monitoring::{DailyMonitoringRequest, MonitoringService, parse_monitoring_code};
pub use pmo::{PATIENT_NOT_AVAILABLE, PmoService};
pub use profile::{ProfileService, UpdateProfileRequest};
