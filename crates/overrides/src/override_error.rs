// ---------------------------------------------------------------------------
// OverrideError: error types for override edits and persistence
// ---------------------------------------------------------------------------

use std::fmt;

/// Errors that can occur while editing or persisting building overrides.
///
/// Load failures never surface as this type to the store's users: the codec
/// recovers them into an empty store plus a [`crate::override_codec::LoadReport`].
/// Write failures always do.
#[derive(Debug)]
pub enum OverrideError {
    /// I/O error while writing the overrides file (disk full, permission denied, etc.)
    Io(std::io::Error),
    /// JSON encoding failed.
    Encode(String),
    /// JSON decoding failed (corrupt or hand-edited file).
    Decode(String),
    /// Overrides file version is newer than this build supports.
    VersionMismatch { expected_max: u32, found: u32 },
    /// Text entered for a count is not a positive integer.
    InvalidInput(String),
    /// Entity name is empty or blank.
    InvalidName,
    /// Count is below the minimum of 1.
    InvalidCount(u32),
    /// A save or delete was requested with nothing selected.
    NoSelection,
    /// A delete was requested for a selection that has no override.
    NoOverride,
}

impl OverrideError {
    /// True for errors caused by bad user input rather than I/O or file contents.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            OverrideError::InvalidInput(_)
                | OverrideError::InvalidName
                | OverrideError::InvalidCount(_)
        )
    }
}

impl fmt::Display for OverrideError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverrideError::Io(e) => write!(f, "I/O error: {e}"),
            OverrideError::Encode(msg) => write!(f, "Encoding error: {msg}"),
            OverrideError::Decode(msg) => write!(f, "Decoding error: {msg}"),
            OverrideError::VersionMismatch {
                expected_max,
                found,
            } => write!(
                f,
                "Version mismatch: overrides file is v{found}, but this build only supports up to v{expected_max}"
            ),
            OverrideError::InvalidInput(text) => {
                write!(f, "Invalid value {text:?}: expected a whole number of 1 or more")
            }
            OverrideError::InvalidName => write!(f, "Building name must not be empty"),
            OverrideError::InvalidCount(count) => {
                write!(f, "Invalid count {count}: overrides must be at least 1")
            }
            OverrideError::NoSelection => write!(f, "No building selected"),
            OverrideError::NoOverride => {
                write!(f, "Selected building has no custom setting to delete")
            }
        }
    }
}

impl std::error::Error for OverrideError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            OverrideError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for OverrideError {
    fn from(e: std::io::Error) -> Self {
        OverrideError::Io(e)
    }
}

impl From<serde_json::Error> for OverrideError {
    fn from(e: serde_json::Error) -> Self {
        if e.is_io() {
            OverrideError::Io(e.into())
        } else {
            OverrideError::Decode(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_override_error_display_io() {
        let err = OverrideError::Io(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "read-only filesystem",
        ));
        let msg = format!("{err}");
        assert!(msg.contains("I/O error"), "got: {msg}");
        assert!(msg.contains("read-only filesystem"), "got: {msg}");
    }

    #[test]
    fn test_override_error_display_invalid_input() {
        let err = OverrideError::InvalidInput("abc".to_string());
        let msg = format!("{err}");
        assert!(msg.contains("\"abc\""), "got: {msg}");
    }

    #[test]
    fn test_override_error_display_version_mismatch() {
        let err = OverrideError::VersionMismatch {
            expected_max: 1,
            found: 7,
        };
        let msg = format!("{err}");
        assert!(msg.contains("v7"), "got: {msg}");
        assert!(msg.contains("v1"), "got: {msg}");
    }

    #[test]
    fn test_override_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
        let err: OverrideError = io_err.into();
        assert!(matches!(err, OverrideError::Io(_)));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_override_error_from_json_syntax() {
        let json_err = serde_json::from_str::<serde_json::Value>("{ not json").unwrap_err();
        let err: OverrideError = json_err.into();
        assert!(matches!(err, OverrideError::Decode(_)), "got: {err:?}");
    }

    #[test]
    fn test_override_error_validation_classification() {
        assert!(OverrideError::InvalidInput("x".into()).is_validation());
        assert!(OverrideError::InvalidName.is_validation());
        assert!(OverrideError::InvalidCount(0).is_validation());
        assert!(!OverrideError::NoSelection.is_validation());
        assert!(!OverrideError::Decode("bad".into()).is_validation());
    }
}
