//! Error types.

use thiserror::Error;

/// Result alias used throughout the roomfit crates.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that prevent a placement run from producing a result.
///
/// Per-instance placement failures are not errors; they are reported as
/// [`FailureReason`](crate::result::FailureReason) entries in the run result.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Room dimensions, catalog, or configuration values are unusable.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A rectangle (zone, obstacle, footprint) is degenerate or non-finite.
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),

    /// An archetype references a zone the room does not define.
    #[error("unknown zone: {0}")]
    UnknownZone(String),

    /// An external scoring oracle failed to produce a usable score.
    #[error("scoring oracle failed: {0}")]
    Oracle(String),
}

impl Error {
    /// Returns true for errors that abort a run before any placement.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::Oracle(_))
    }
}
