//! Error types for route editing, serialization and reference data loading.

use std::path::PathBuf;

use thiserror::Error;

use crate::models::ShiftDirection;

/// Failures of SequenceStore operations and leg construction.
///
/// Every operation that returns one of these has left the store untouched.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RouteError {
    /// Malformed numeric input or a coordinate outside its legal range.
    #[error("invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    /// A position that does not name a leg in the route.
    #[error("position {position} is outside the route range 1..={count}")]
    PositionOutOfRange { position: usize, count: usize },

    /// A shift whose destination would fall outside the route.
    #[error("shift exceeds route range: cannot move position {from} {steps} step(s) {direction} in a route of {count}")]
    ShiftOutOfRange {
        from: usize,
        steps: usize,
        direction: ShiftDirection,
        count: usize,
    },
}

impl RouteError {
    pub(crate) fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field,
            reason: reason.into(),
        }
    }

    /// True for the RangeError family (bad position or shift target).
    pub fn is_range(&self) -> bool {
        matches!(
            self,
            Self::PositionOutOfRange { .. } | Self::ShiftOutOfRange { .. }
        )
    }
}

/// Portable route text that could not be read back.
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("route text is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unexpected route layout: {0}")]
    Shape(String),

    #[error("route text contains an invalid leg: {0}")]
    Leg(#[from] RouteError),
}

/// Reference table loading failures.
#[derive(Debug, Error)]
pub enum ReferenceError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {what} table: {source}")]
    Json {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("{what} entry {ident} has a malformed coordinate: {reason}")]
    Coordinate {
        what: &'static str,
        ident: String,
        reason: String,
    },
}
