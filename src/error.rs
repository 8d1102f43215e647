// SPDX-License-Identifier: MIT OR Apache-2.0

#![allow(non_shorthand_field_patterns)]
#![doc = "Error handling primitives shared across the badge generator."]

//! The derive emitted by [`masterror::Error`] expands pattern matches that
//! trigger the `non_shorthand_field_patterns` lint. The lint is disabled for
//! the module to keep the generated implementations warning-free.

use std::path::{Path, PathBuf};

/// Unified error type returned by configuration, rendering, and writing.
///
/// Each variant names the stage that failed so the CLI can surface a single
/// human-readable message identifying it. Instances are typically constructed
/// through the helper constructors or by converting from underlying error
/// types via the provided `From` implementations.
#[derive(Debug, masterror::Error)]
pub enum Error {
    /// Required configuration input is missing or empty.
    #[error("configuration error: {message}")]
    Configuration {
        /// Human readable message naming the missing input.
        message: String
    },
    /// Failure while resolving a statistic from the hosting platform.
    #[error("provider error: {message}")]
    Provider {
        /// Human readable message describing the provider failure.
        message: String
    },
    /// A shipped template asset could not be read.
    #[error("failed to read template at {path:?}: {source}")]
    Template {
        /// Location of the template file.
        path:   PathBuf,
        /// Underlying I/O error reported by the operating system.
        source: std::io::Error
    },
    /// Wraps serialization errors when encoding JSON payloads.
    #[error("failed to serialize artifact payload: {source}")]
    Serialize {
        /// Underlying serialization error.
        source: serde_json::Error
    },
    /// Wraps I/O errors while creating the output directory or writing files.
    #[error("failed to write artifact at {path:?}: {source}")]
    ArtifactIo {
        /// Location of the artifact being produced.
        path:   PathBuf,
        /// Underlying I/O error reported by the operating system.
        source: std::io::Error
    }
}

impl Error {
    /// Constructs a configuration error from the provided displayable value.
    pub fn configuration<M>(message: M) -> Self
    where
        M: Into<String>
    {
        Self::Configuration {
            message: message.into()
        }
    }

    /// Constructs a provider error from the provided displayable value.
    pub fn provider<M>(message: M) -> Self
    where
        M: Into<String>
    {
        Self::Provider {
            message: message.into()
        }
    }

    /// Formats the error for diagnostics without the variant name.
    ///
    /// Intended for CLI contexts where the variant name does not add value to
    /// end users. The returned string matches the [`std::fmt::Display`]
    /// implementation.
    pub fn to_display_string(&self) -> String {
        format!("{self}")
    }
}

impl From<serde_json::Error> for Error {
    fn from(source: serde_json::Error) -> Self {
        Self::Serialize {
            source
        }
    }
}

impl From<octocrab::Error> for Error {
    fn from(source: octocrab::Error) -> Self {
        Self::Provider {
            message: source.to_string()
        }
    }
}

/// Creates an [`Error::Template`] variant capturing the failing path and
/// source.
pub fn template_io_error(path: &Path, source: std::io::Error) -> Error {
    Error::Template {
        path: path.to_path_buf(),
        source
    }
}

/// Creates an [`Error::ArtifactIo`] variant capturing the failing path and
/// source.
pub fn artifact_io_error(path: &Path, source: std::io::Error) -> Error {
    Error::ArtifactIo {
        path: path.to_path_buf(),
        source
    }
}

#[cfg(test)]
mod tests {
    use super::Error;

    #[test]
    fn configuration_constructor_populates_message() {
        let error = Error::configuration("ACCESS_TOKEN must be set");
        match error {
            Error::Configuration {
                ref message
            } => {
                assert_eq!(message, "ACCESS_TOKEN must be set");
            }
            other => panic!("expected configuration error, got {other:?}")
        }
    }

    #[test]
    fn provider_constructor_populates_message() {
        let error = Error::provider("rate limited");
        match error {
            Error::Provider {
                ref message
            } => {
                assert_eq!(message, "rate limited");
            }
            other => panic!("expected provider error, got {other:?}")
        }
    }

    #[test]
    fn to_display_string_matches_display() {
        let error = Error::configuration("display me");
        assert_eq!(error.to_string(), error.to_display_string());
    }

    #[test]
    fn template_io_error_helper_wraps_path_and_source() {
        let path = std::path::Path::new("templates/overview.svg");
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let error = super::template_io_error(path, io_error);

        match error {
            Error::Template {
                path: ref stored_path,
                ref source
            } => {
                assert_eq!(stored_path, path);
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("expected template error, got {other:?}")
        }
    }

    #[test]
    fn artifact_io_error_helper_wraps_path_and_source() {
        let path = std::path::Path::new("generated/overview.svg");
        let io_error = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let error = super::artifact_io_error(path, io_error);

        match error {
            Error::ArtifactIo {
                path: ref stored_path,
                ref source
            } => {
                assert_eq!(stored_path, path);
                assert_eq!(source.kind(), std::io::ErrorKind::PermissionDenied);
            }
            other => panic!("expected artifact io error, got {other:?}")
        }
    }

    #[test]
    fn serde_json_conversion_maps_to_serialize_variant() {
        let invalid = serde_json::from_str::<serde_json::Value>("not-json").unwrap_err();
        let mapped: Error = invalid.into();
        assert!(matches!(mapped, Error::Serialize { .. }));
    }
}
