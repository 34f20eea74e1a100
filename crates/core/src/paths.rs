//! Data directory resolution

use std::path::PathBuf;

/// Overrides the data directory
pub const DATA_DIR_ENV: &str = "CARECOM_DATA_DIR";

/// Directory for the credential file, config and logs.
///
/// `CARECOM_DATA_DIR` wins, then the platform data directory, then `.`.
pub fn data_dir() -> PathBuf {
    std::env::var_os(DATA_DIR_ENV)
        .filter(|dir| !dir.is_empty())
        .map_or_else(
            || {
                dirs::data_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join("carecom")
            },
            PathBuf::from,
        )
}

/// `explicit` when given, otherwise [`data_dir`]
pub fn resolve_data_dir(explicit: Option<PathBuf>) -> PathBuf {
    explicit.unwrap_or_else(data_dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_dir_wins() {
        let dir = PathBuf::from("/tmp/carecom-test");
        assert_eq!(resolve_data_dir(Some(dir.clone())), dir);
    }
}
