//! Per-poll observation and rate records

use serde::{Deserialize, Serialize};
use std::time::Instant;

/// One interface as observed during a single poll of the OS interface table.
///
/// Byte counters are cumulative since boot and monotonic except for
/// wraparound, which [`TrafficRateTracker`](crate::TrafficRateTracker)
/// corrects for when diffing consecutive samples.
#[derive(Debug, Clone)]
pub struct InterfaceSample {
    /// Interface name (e.g. "en0", "eth0"), unique within a poll
    pub name: String,
    /// Interface is administratively up
    pub is_up: bool,
    /// Interface is a loopback device
    pub is_loopback: bool,
    /// Cumulative bytes received
    pub rx_bytes: u64,
    /// Cumulative bytes transmitted
    pub tx_bytes: u64,
    /// When the counters were read
    pub timestamp: Instant,
}

/// Throughput derived from two consecutive observations of one interface.
///
/// Deltas are wraparound-corrected and therefore always non-negative; rates
/// are zeroed for the first-ever observation of an interface and for stale
/// intervals (see [`TrafficRateTracker`](crate::TrafficRateTracker)).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateSample {
    /// Interface name
    pub name: String,
    /// Seconds elapsed since the previous snapshot of this interface
    pub delta_time_secs: f64,
    /// Bytes received since the previous snapshot
    pub rx_delta_bytes: u64,
    /// Bytes transmitted since the previous snapshot
    pub tx_delta_bytes: u64,
    /// Inbound throughput in bytes per second
    pub rx_bytes_per_sec: f64,
    /// Outbound throughput in bytes per second
    pub tx_bytes_per_sec: f64,
}

impl RateSample {
    /// A zeroed sample, emitted when an interface is seen for the first time
    /// and there is no baseline to diff against.
    pub(crate) fn first_seen(name: &str) -> Self {
        Self {
            name: name.to_string(),
            delta_time_secs: 0.0,
            rx_delta_bytes: 0,
            tx_delta_bytes: 0,
            rx_bytes_per_sec: 0.0,
            tx_bytes_per_sec: 0.0,
        }
    }

    /// Combined inbound and outbound throughput in bytes per second.
    pub fn total_bytes_per_sec(&self) -> f64 {
        self.rx_bytes_per_sec + self.tx_bytes_per_sec
    }
}
