//! Error types for netspeed

use std::io;
use thiserror::Error;

/// Result type alias for netspeed operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for interface enumeration and rate sampling.
///
/// The two query variants are non-fatal by contract: a failed poll yields no
/// data this cycle and the caller retries at the next timer tick, with all
/// tracker baselines intact.
#[derive(Error, Debug)]
pub enum Error {
    /// The sizing pass of the interface-table query failed
    #[error("interface table sizing query failed (errno {errno})")]
    SizingQuery {
        /// Raw OS error code from the failed call
        errno: i32,
    },

    /// The fetch pass of the interface-table query failed
    #[error("interface table fetch failed (errno {errno})")]
    FetchQuery {
        /// Raw OS error code from the failed call
        errno: i32,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Parse error
    #[error("parse error: {0}")]
    Parse(String),

    /// Unsupported platform
    #[error("unsupported platform: {0}")]
    UnsupportedPlatform(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_stage() {
        let sizing = Error::SizingQuery { errno: 1 }.to_string();
        let fetch = Error::FetchQuery { errno: 1 }.to_string();
        assert!(sizing.contains("sizing"));
        assert!(fetch.contains("fetch"));
    }
}
