//! Persisted credential state
//!
//! The bearer token and the role tag live in a small key-value store under the
//! `token` and `role` keys. The store is written on login, read on every
//! private request and cleared on logout or when the backend rejects the
//! session.

use crate::error::{CoreError, CoreResult};
use crate::role::Role;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

/// Storage key for the bearer token
pub const TOKEN_KEY: &str = "token";
/// Storage key for the role tag
pub const ROLE_KEY: &str = "role";

/// Key-value storage for credentials
pub trait CredentialStore: Send + Sync {
    /// Read a value
    fn get(&self, key: &str) -> Option<String>;

    /// Write a value
    fn set(&self, key: &str, value: &str) -> CoreResult<()>;

    /// Remove a value; removing a missing key is not an error
    fn remove(&self, key: &str) -> CoreResult<()>;
}

/// Token and role written together after a successful login
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub token: String,
    pub role: Role,
}

/// Typed helpers over any [`CredentialStore`]
pub trait CredentialStoreExt: CredentialStore {
    /// Stored bearer token, if any
    fn token(&self) -> Option<String> {
        self.get(TOKEN_KEY).filter(|token| !token.is_empty())
    }

    /// Stored role, if any and known
    fn role(&self) -> Option<Role> {
        self.get(ROLE_KEY).and_then(|role| role.parse().ok())
    }

    /// Persist token and role
    fn save(&self, credentials: &Credentials) -> CoreResult<()> {
        self.set(TOKEN_KEY, &credentials.token)?;
        self.set(ROLE_KEY, credentials.role.as_str())
    }

    /// Remove token and role together
    fn clear(&self) -> CoreResult<()> {
        self.remove(TOKEN_KEY)?;
        self.remove(ROLE_KEY)
    }
}

impl<S: CredentialStore + ?Sized> CredentialStoreExt for S {}

/// In-process store
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<BTreeMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

impl CredentialStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.read().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> CoreResult<()> {
        self.entries
            .write()
            .map_err(|_| CoreError::storage("memory store lock poisoned"))?
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> CoreResult<()> {
        self.entries
            .write()
            .map_err(|_| CoreError::storage("memory store lock poisoned"))?
            .remove(key);
        Ok(())
    }
}

/// Store backed by a JSON object on disk, written through on every change
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: RwLock<BTreeMap<String, String>>,
}

impl FileStore {
    /// File name used inside the data directory
    pub const FILE_NAME: &'static str = "credentials.json";

    /// Open a store at `path`. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> CoreResult<Self> {
        let path = path.into();
        let entries = match std::fs::read_to_string(&path) {
            Ok(content) if content.trim().is_empty() => BTreeMap::new(),
            Ok(content) => serde_json::from_str(&content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    /// Open the store inside `data_dir`
    pub fn in_dir(data_dir: &Path) -> CoreResult<Self> {
        Self::open(data_dir.join(Self::FILE_NAME))
    }

    /// Location of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> CoreResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(entries)?;
        write_private(&self.path, content.as_bytes())?;
        Ok(())
    }

    fn mutate(&self, f: impl FnOnce(&mut BTreeMap<String, String>)) -> CoreResult<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| CoreError::storage("file store lock poisoned"))?;
        f(&mut entries);
        self.persist(&entries)
    }
}

impl CredentialStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.read().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> CoreResult<()> {
        self.mutate(|entries| {
            entries.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: &str) -> CoreResult<()> {
        self.mutate(|entries| {
            entries.remove(key);
        })
    }
}

/// Claims read from the login token payload
#[derive(Debug, Clone, PartialEq)]
pub struct TokenClaims {
    pub role: Role,
    pub subject: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl TokenClaims {
    /// Whether the token expired at `now`. Tokens without `exp` never expire.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|exp| now >= exp)
    }
}

/// Write a file readable only by its owner
#[cfg(unix)]
fn write_private(path: &Path, content: &[u8]) -> std::io::Result<()> {
    use std::io::Write;
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

    let mut file = std::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    // Files created before the mode was enforced keep their old permissions
    file.set_permissions(std::fs::Permissions::from_mode(0o600))?;
    file.write_all(content)
}

#[cfg(not(unix))]
fn write_private(path: &Path, content: &[u8]) -> std::io::Result<()> {
    std::fs::write(path, content)
}

#[derive(Deserialize)]
struct RawClaims {
    role: Option<String>,
    sub: Option<serde_json::Value>,
    exp: Option<i64>,
}

/// Decode the payload of a JWT without verifying its signature.
///
/// The backend verifies tokens; the client only needs the role to pick a
/// landing view.
pub fn decode_claims(token: &str) -> CoreResult<TokenClaims> {
    let mut segments = token.split('.');
    let payload = match (segments.next(), segments.next(), segments.next(), segments.next()) {
        (Some(_), Some(payload), Some(_), None) => payload,
        _ => return Err(CoreError::invalid_token("expected three dot-separated segments")),
    };

    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|e| CoreError::invalid_token(format!("payload is not base64url: {e}")))?;
    let raw: RawClaims = serde_json::from_slice(&bytes)
        .map_err(|e| CoreError::invalid_token(format!("payload is not JSON claims: {e}")))?;

    let role = raw
        .role
        .ok_or_else(|| CoreError::invalid_token("missing role claim"))?;
    let role = role
        .parse::<Role>()
        .map_err(|_| CoreError::invalid_token(format!("unknown role claim {role:?}")))?;

    let subject = raw.sub.map(|sub| match sub {
        serde_json::Value::String(s) => s,
        other => other.to_string(),
    });

    let expires_at = raw.exp.and_then(|exp| DateTime::from_timestamp(exp, 0));

    Ok(TokenClaims {
        role,
        subject,
        expires_at,
    })
}
