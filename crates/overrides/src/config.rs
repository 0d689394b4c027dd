use bevy::prelude::*;
use std::path::PathBuf;

/// File the overrides are stored in when nothing else is configured.
pub const DEFAULT_OVERRIDES_FILE: &str = "building_overrides.json";

/// Environment variable that overrides [`DEFAULT_OVERRIDES_FILE`].
pub const OVERRIDES_FILE_ENV: &str = "BUILDING_OVERRIDES_FILE";

/// Environment variable holding the log filter for the editor binary.
pub const LOG_FILTER_ENV: &str = "BUILDING_OVERRIDES_LOG";

/// Default log filter when [`LOG_FILTER_ENV`] is unset.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Where the override store lives on disk.
///
/// Insert this before adding [`crate::OverridesPlugin`] to point the plugin
/// at a different file; the plugin only initializes it when absent.
#[derive(Resource, Debug, Clone, PartialEq, Eq)]
pub struct OverridesConfig {
    pub file_path: PathBuf,
}

impl Default for OverridesConfig {
    fn default() -> Self {
        Self {
            file_path: PathBuf::from(DEFAULT_OVERRIDES_FILE),
        }
    }
}

impl OverridesConfig {
    pub fn with_file(file_path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: file_path.into(),
        }
    }

    /// Default config, with the file path taken from [`OVERRIDES_FILE_ENV`] if set.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        match lookup(OVERRIDES_FILE_ENV).filter(|v| !v.trim().is_empty()) {
            Some(path) => Self::with_file(path),
            None => Self::default(),
        }
    }
}

/// Log filter for the editor binary, from [`LOG_FILTER_ENV`] or [`DEFAULT_LOG_FILTER`].
pub fn log_filter_from_env() -> String {
    std::env::var(LOG_FILTER_ENV).unwrap_or_else(|_| DEFAULT_LOG_FILTER.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_file() {
        assert_eq!(
            OverridesConfig::default().file_path,
            PathBuf::from("building_overrides.json")
        );
    }

    #[test]
    fn test_env_path_wins() {
        let config = OverridesConfig::from_lookup(|key| {
            (key == OVERRIDES_FILE_ENV).then(|| "/srv/city/overrides.json".to_string())
        });
        assert_eq!(config.file_path, PathBuf::from("/srv/city/overrides.json"));
    }

    #[test]
    fn test_blank_env_falls_back_to_default() {
        let config = OverridesConfig::from_lookup(|_| Some("  ".to_string()));
        assert_eq!(config, OverridesConfig::default());
    }

    #[test]
    fn test_unset_env_falls_back_to_default() {
        let config = OverridesConfig::from_lookup(|_| None);
        assert_eq!(config, OverridesConfig::default());
    }
}
