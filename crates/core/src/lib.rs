//! Shared types for the TB CareCom client

pub mod credentials;
pub mod envelope;
pub mod error;
pub mod paths;
pub mod role;
pub mod telemetry;

pub use credentials::{
    CredentialStore, CredentialStoreExt, Credentials, FileStore, MemoryStore, ROLE_KEY, TOKEN_KEY,
    TokenClaims, decode_claims,
};
pub use envelope::{Envelope, message_of};
pub use error::{CoreError, CoreResult};
pub use paths::{DATA_DIR_ENV, data_dir, resolve_data_dir};
pub use role::Role;
