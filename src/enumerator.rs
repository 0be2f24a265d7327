//! Interface-table enumeration

use std::collections::HashMap;

use crate::error::Result;
use crate::sample::InterfaceSample;

/// Reads the OS interface table on demand.
///
/// Each call is a pure read of kernel state: it returns every up,
/// non-loopback interface with its cumulative byte counters and mutates
/// nothing but the retained fetch buffer. Failures are per-poll; the
/// caller logs, skips the cycle, and tries again at the next tick.
#[derive(Debug, Default)]
pub struct InterfaceEnumerator {
    /// Fetch buffer retained between polls; grows to the kernel's declared
    /// size and never shrinks.
    #[cfg(target_os = "macos")]
    buf: Vec<u8>,
}

impl InterfaceEnumerator {
    /// Creates an enumerator with an empty fetch buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queries the interface table, returning samples keyed by interface
    /// name.
    ///
    /// Interfaces that are loopback, down, or whose name cannot be
    /// resolved are absent from the result.
    pub fn enumerate(&mut self) -> Result<HashMap<String, InterfaceSample>> {
        #[cfg(target_os = "macos")]
        {
            crate::platform::macos::enumerate(&mut self.buf)
        }

        #[cfg(target_os = "linux")]
        {
            crate::platform::linux::enumerate()
        }

        #[cfg(not(any(target_os = "macos", target_os = "linux")))]
        {
            Err(crate::error::Error::UnsupportedPlatform(
                "interface enumeration requires macOS or Linux".to_string(),
            ))
        }
    }
}
