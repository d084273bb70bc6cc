//! Error types shared across tilekit crates.
//!
//! Every variant describes a test-construction mistake, never a transient
//! condition: callers surface them immediately instead of retrying.

use thiserror::Error;

/// Errors raised by geometry, codec, broadcast, capacity and format queries.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TileError {
    #[error("invalid geometry: {reason}")]
    InvalidGeometry { reason: String },

    #[error("buffer length mismatch: expected {expected} elements, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("shape mismatch: expected {expected} elements (one tile), got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    #[error("unsupported broadcast kind: {kind}")]
    UnsupportedBroadcastKind { kind: String },

    #[error("dest capacity resolved to zero tiles")]
    ZeroCapacity,

    #[error("tile count must be positive, got {count}")]
    NonPositiveTileCount { count: usize },

    #[error("cannot fit {tiles} tiles when dest capacity is {capacity}")]
    CapacityExceeded { tiles: usize, capacity: usize },

    #[error("incompatible formats {src} -> {dst}: {reason}")]
    IncompatibleFormats { src: String, dst: String, reason: String },

    #[error("unknown data format: {0}")]
    UnknownFormat(String),
}

impl TileError {
    /// Shorthand for [`TileError::InvalidGeometry`].
    pub fn geometry(reason: impl Into<String>) -> Self {
        Self::InvalidGeometry { reason: reason.into() }
    }
}

/// Convenience alias used throughout tilekit.
pub type Result<T> = std::result::Result<T, TileError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_carry_offending_values() {
        let err = TileError::LengthMismatch { expected: 1024, actual: 1000 };
        assert_eq!(err.to_string(), "buffer length mismatch: expected 1024 elements, got 1000");

        let err = TileError::CapacityExceeded { tiles: 9, capacity: 8 };
        assert!(err.to_string().contains("9 tiles"));
        assert!(err.to_string().contains("capacity is 8"));
    }

    #[test]
    fn geometry_helper_builds_variant() {
        let err = TileError::geometry("rows must be positive");
        assert_eq!(err, TileError::InvalidGeometry { reason: "rows must be positive".into() });
    }
}
