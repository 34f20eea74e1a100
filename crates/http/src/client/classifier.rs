//! Endpoint classification
//!
//! Decides whether a request path is public (sent without a bearer token) or
//! private. Paths are compared after normalization: query and fragment are
//! dropped, absolute URLs are reduced to their path, and a leading `/` is
//! enforced.

use serde::{Deserialize, Serialize};
use url::Url;

/// How paths are compared against the public list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// The path starts with a listed prefix on a segment boundary
    #[default]
    Prefix,
    /// The path contains a listed fragment anywhere. Compatible with the web
    /// frontend, but `/admin/auth/login-history` counts as public.
    Substring,
}

/// Classification of a request path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    Private,
}

impl Access {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Private => "private",
        }
    }
}

/// Classifies request paths against a fixed public list
#[derive(Debug, Clone)]
pub struct EndpointClassifier {
    public: Vec<String>,
    mode: MatchMode,
    pmo_fragment: String,
}

impl EndpointClassifier {
    /// Create a classifier over `public` prefixes
    pub fn new<I, S>(public: I, mode: MatchMode) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            public: public
                .into_iter()
                .map(|prefix| ensure_leading_slash(prefix.as_ref().trim()))
                .filter(|prefix| prefix != "/")
                .collect(),
            mode,
            pmo_fragment: "/pmo/".to_string(),
        }
    }

    /// Set the fragment that marks PMO endpoints
    #[must_use]
    pub fn with_pmo_fragment(mut self, fragment: impl Into<String>) -> Self {
        self.pmo_fragment = fragment.into();
        self
    }

    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    /// Classify a request path
    pub fn classify(&self, path: &str) -> Access {
        let path = normalize_path(path);
        let public = self.public.iter().any(|entry| match self.mode {
            MatchMode::Prefix => prefix_matches(&path, entry),
            MatchMode::Substring => path.contains(entry.as_str()),
        });

        if public { Access::Public } else { Access::Private }
    }

    pub fn is_public(&self, path: &str) -> bool {
        self.classify(path) == Access::Public
    }

    /// Whether the path belongs to the PMO area
    pub fn is_pmo_path(&self, path: &str) -> bool {
        !self.pmo_fragment.is_empty() && normalize_path(path).contains(&self.pmo_fragment)
    }
}

fn prefix_matches(path: &str, prefix: &str) -> bool {
    path.strip_prefix(prefix)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/') || prefix.ends_with('/'))
}

fn ensure_leading_slash(path: &str) -> String {
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    }
}

/// Reduce a request path or URL to its path component
pub fn normalize_path(path: &str) -> String {
    let trimmed = path.trim();
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        if let Ok(url) = Url::parse(trimmed) {
            return url.path().to_string();
        }
    }

    let end = trimmed.find(['?', '#']).unwrap_or(trimmed.len());
    ensure_leading_slash(&trimmed[..end])
}

fn is_absolute_url(path: &str) -> bool {
    let lower: String = path.trim_start().chars().take(8).collect::<String>().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Rewrite an absolute URL as a path relative to `base_url`
///
/// Relative paths pass through unchanged. Returns `None` for an absolute URL
/// on another origin or outside the base URL's path.
pub fn relative_to_base(base_url: &str, path: &str) -> Option<String> {
    let trimmed = path.trim();
    if !is_absolute_url(trimmed) {
        return Some(trimmed.to_string());
    }

    let base = Url::parse(base_url).ok()?;
    let url = Url::parse(trimmed).ok()?;
    if url.origin() != base.origin() {
        return None;
    }

    let base_path = base.path().trim_end_matches('/');
    let rest = url
        .path()
        .strip_prefix(base_path)
        .filter(|rest| rest.is_empty() || rest.starts_with('/'))?;

    let mut relative = ensure_leading_slash(rest);
    if let Some(query) = url.query() {
        relative.push('?');
        relative.push_str(query);
    }
    Some(relative)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier(mode: MatchMode) -> EndpointClassifier {
        EndpointClassifier::new(["/auth/login", "/auth/register", "public/"], mode)
    }

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path("auth/login?next=/x"), "/auth/login");
        assert_eq!(normalize_path("/pmo/patient#top"), "/pmo/patient");
        assert_eq!(
            normalize_path("https://tb.example.id/api/user/profile?x=1"),
            "/api/user/profile"
        );
        assert_eq!(normalize_path(""), "/");
    }

    #[test]
    fn test_relative_to_base() {
        let base = "https://tb.example.id/api";
        assert_eq!(
            relative_to_base(base, "https://tb.example.id/api/auth/login").as_deref(),
            Some("/auth/login")
        );
        assert_eq!(
            relative_to_base(base, "HTTPS://TB.example.id:443/api/pmo/patient?day=1").as_deref(),
            Some("/pmo/patient?day=1")
        );
        assert_eq!(relative_to_base(base, "https://tb.example.id/api").as_deref(), Some("/"));
        assert_eq!(relative_to_base(base, " user/profile ").as_deref(), Some("user/profile"));

        assert_eq!(relative_to_base(base, "https://collector.example.com/api/user"), None);
        assert_eq!(relative_to_base(base, "http://tb.example.id/api/user"), None);
        assert_eq!(relative_to_base(base, "https://tb.example.id:8443/api/user"), None);
        assert_eq!(relative_to_base(base, "https://tb.example.id/apix/user"), None);
        assert_eq!(relative_to_base(base, "https://tb.example.id/other"), None);
    }

    #[test]
    fn test_prefix_mode() {
        let c = classifier(MatchMode::Prefix);
        assert_eq!(c.classify("/auth/login"), Access::Public);
        assert_eq!(c.classify("/auth/login/"), Access::Public);
        assert_eq!(c.classify("auth/register?ref=qr"), Access::Public);
        assert_eq!(c.classify("/public/articles/3"), Access::Public);
        assert_eq!(c.classify("/auth/logout"), Access::Private);
        assert_eq!(c.classify("/auth/login-history"), Access::Private);
        assert_eq!(c.classify("/admin/auth/login"), Access::Private);
        assert_eq!(c.classify("/user/profile"), Access::Private);
    }

    #[test]
    fn test_substring_mode_keeps_legacy_false_positive() {
        let c = classifier(MatchMode::Substring);
        assert_eq!(c.classify("/admin/auth/login-history"), Access::Public);
        assert_eq!(c.classify("/user/profile"), Access::Private);
    }

    #[test]
    fn test_pmo_paths() {
        let c = classifier(MatchMode::Prefix);
        assert!(c.is_pmo_path("/pmo/patient"));
        assert!(c.is_pmo_path("/api/pmo/daily-monitoring?x=1"));
        assert!(!c.is_pmo_path("/pmo"));
        assert!(!c.is_pmo_path("/perawat/patients"));

        let c = c.with_pmo_fragment("");
        assert!(!c.is_pmo_path("/pmo/patient"));
    }

    #[test]
    fn test_root_prefix_is_ignored() {
        let c = EndpointClassifier::new(["/", "  "], MatchMode::Prefix);
        assert_eq!(c.classify("/anything"), Access::Private);
    }
}
