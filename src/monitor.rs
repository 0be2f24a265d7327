//! Poll-loop facade
//!
//! [`SpeedMonitor`] couples the enumerator, the rate tracker, and a
//! primary-interface resolver behind the two calls a timer-driven consumer
//! needs: one poll of every interface, or one poll reduced to the primary
//! interface with its compact text rendering.

use std::collections::HashMap;
use std::time::Instant;

use log::{debug, warn};

use crate::config::MonitorConfig;
use crate::enumerator::InterfaceEnumerator;
use crate::error::Result;
use crate::primary::{PrimaryInterfaceResolver, SystemResolver};
use crate::sample::RateSample;
use crate::tracker::TrafficRateTracker;
use crate::units::{format_rate, SpeedUnit};

/// Rate for the primary interface from one poll.
#[derive(Debug, Clone)]
pub struct PrimarySpeed {
    /// Name of the primary interface
    pub interface: String,
    /// Its rate sample for this poll
    pub rates: RateSample,
}

impl PrimarySpeed {
    /// Two-line "↓ …/s / ↑ …/s" rendering in the given unit.
    pub fn display(&self, unit: SpeedUnit) -> String {
        format!(
            "↓ {}\n↑ {}",
            format_rate(self.rates.rx_bytes_per_sec, unit),
            format_rate(self.rates.tx_bytes_per_sec, unit)
        )
    }
}

/// One-stop monitor: enumerates interfaces, tracks per-interface rates,
/// and resolves the primary interface.
///
/// The caller drives it from a recurring timer at the configured interval;
/// every poll is a short synchronous operation. Methods take `&mut self`,
/// so sharing a monitor across threads requires a mutex.
pub struct SpeedMonitor {
    config: MonitorConfig,
    enumerator: InterfaceEnumerator,
    tracker: TrafficRateTracker,
    resolver: Box<dyn PrimaryInterfaceResolver>,
}

impl SpeedMonitor {
    /// Monitor using live system routing state for primary-interface
    /// resolution.
    pub fn new(config: MonitorConfig) -> Self {
        Self::with_resolver(config, Box::new(SystemResolver))
    }

    /// Monitor with a caller-supplied resolver (e.g.
    /// [`FixedResolver`](crate::FixedResolver) to pin one interface).
    pub fn with_resolver(config: MonitorConfig, resolver: Box<dyn PrimaryInterfaceResolver>) -> Self {
        Self {
            config,
            enumerator: InterfaceEnumerator::new(),
            tracker: TrafficRateTracker::new(),
            resolver,
        }
    }

    /// The configuration currently in effect.
    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    /// Replaces the configuration. Rate baselines are kept; counters are
    /// interval-independent.
    pub fn set_config(&mut self, config: MonitorConfig) {
        self.config = config;
    }

    /// Polls every up, non-loopback interface, returning rates keyed by
    /// interface name.
    pub fn poll_all(&mut self) -> Result<HashMap<String, RateSample>> {
        let samples = match self.enumerator.enumerate() {
            Ok(samples) => samples,
            Err(e) => {
                warn!("failed to fetch interface statistics: {}", e);
                return Err(e);
            }
        };
        debug!("observed {} interfaces", samples.len());
        Ok(self.tracker.sample(&samples, Instant::now()))
    }

    /// Polls and returns the primary interface's rate.
    ///
    /// `Ok(None)` when no primary interface resolves, or when it resolved
    /// but produced no sample this poll (e.g. it went down between the
    /// route lookup and the table read).
    pub fn poll(&mut self) -> Result<Option<PrimarySpeed>> {
        let Some(primary) = self.resolver.resolve_primary_interface() else {
            debug!("no primary interface resolved");
            return Ok(None);
        };

        let mut rates = self.poll_all()?;
        match rates.remove(&primary) {
            Some(sample) => Ok(Some(PrimarySpeed {
                interface: primary,
                rates: sample,
            })),
            None => {
                warn!("no statistics for primary interface {}", primary);
                Ok(None)
            }
        }
    }

    /// Discards all per-interface baselines; the next poll re-seeds every
    /// interface as first-seen.
    pub fn reset(&mut self) {
        self.tracker.reset();
    }
}
