//! Hooks run around every request
//!
//! The request side counts the request as in flight and, for the private
//! client, attaches the bearer token. The response side announces the outcome
//! and handles rejected sessions.

pub mod request;
pub mod response;

pub use request::RequestInterceptor;
pub use response::{ResponseInterceptor, SessionPolicy};
