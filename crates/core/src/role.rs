//! User roles and their landing views

use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Role carried in the login token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Administrator
    Admin,
    /// Nurse / clinic staff
    Perawat,
    /// Treatment supervisor (Pengawas Menelan Obat)
    Pmo,
}

impl Role {
    /// All known roles
    pub const ALL: [Self; 3] = [Self::Admin, Self::Perawat, Self::Pmo];

    /// Storage representation
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Perawat => "perawat",
            Self::Pmo => "pmo",
        }
    }

    /// View the user lands on after a successful login
    pub const fn dashboard_path(self) -> &'static str {
        match self {
            Self::Admin => "/admin/dashboard",
            Self::Perawat => "/perawat/dashboard",
            Self::Pmo => "/pmo/dashboard",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| CoreError::UnknownRole(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("PMO".parse::<Role>().unwrap(), Role::Pmo);
        assert_eq!(" Perawat ".parse::<Role>().unwrap(), Role::Perawat);
        assert!(matches!(
            "dokter".parse::<Role>(),
            Err(CoreError::UnknownRole(_))
        ));
    }

    #[test]
    fn test_dashboard_paths() {
        assert_eq!(Role::Admin.dashboard_path(), "/admin/dashboard");
        assert_eq!(Role::Perawat.dashboard_path(), "/perawat/dashboard");
        assert_eq!(Role::Pmo.dashboard_path(), "/pmo/dashboard");
    }

    #[test]
    fn test_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Perawat).unwrap(), "\"perawat\"");
        let role: Role = serde_json::from_str("\"admin\"").unwrap();
        assert_eq!(role, Role::Admin);
    }
}
