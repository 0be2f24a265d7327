//! Display units, poll intervals, and compact rate formatting

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Unit used when presenting a throughput figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeedUnit {
    /// Bits per second; the underlying bytes-per-second rate is multiplied
    /// by 8
    #[default]
    Bits,
    /// Bytes per second
    Bytes,
}

impl SpeedUnit {
    /// Factor applied to a bytes-per-second figure before display.
    pub fn multiplier(self) -> f64 {
        match self {
            SpeedUnit::Bits => 8.0,
            SpeedUnit::Bytes => 1.0,
        }
    }

    /// Short unit suffix ("b" or "B").
    pub fn short_unit(self) -> &'static str {
        match self {
            SpeedUnit::Bits => "b",
            SpeedUnit::Bytes => "B",
        }
    }
}

impl fmt::Display for SpeedUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpeedUnit::Bits => write!(f, "Bits/s"),
            SpeedUnit::Bytes => write!(f, "Bytes/s"),
        }
    }
}

/// Supported polling periods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum UpdateInterval {
    /// Poll every second
    #[default]
    #[serde(rename = "1s")]
    Sec1,
    /// Poll every 2 seconds
    #[serde(rename = "2s")]
    Sec2,
    /// Poll every 5 seconds
    #[serde(rename = "5s")]
    Sec5,
    /// Poll every 10 seconds
    #[serde(rename = "10s")]
    Sec10,
    /// Poll every 30 seconds
    #[serde(rename = "30s")]
    Sec30,
}

impl UpdateInterval {
    /// Poll period in whole seconds.
    pub fn seconds(self) -> u64 {
        match self {
            UpdateInterval::Sec1 => 1,
            UpdateInterval::Sec2 => 2,
            UpdateInterval::Sec5 => 5,
            UpdateInterval::Sec10 => 10,
            UpdateInterval::Sec30 => 30,
        }
    }

    /// Poll period as a [`Duration`].
    pub fn duration(self) -> Duration {
        Duration::from_secs(self.seconds())
    }

    /// Display label ("1s" through "30s").
    pub fn label(self) -> &'static str {
        match self {
            UpdateInterval::Sec1 => "1s",
            UpdateInterval::Sec2 => "2s",
            UpdateInterval::Sec5 => "5s",
            UpdateInterval::Sec10 => "10s",
            UpdateInterval::Sec30 => "30s",
        }
    }
}

impl fmt::Display for UpdateInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

const KILO_LIMIT_F64: f64 = 1000.0;
const MEGA_LIMIT_F64: f64 = 1_000_000.0;
const GIGA_LIMIT_F64: f64 = 1_000_000_000.0;
const TERA_LIMIT_F64: f64 = 1_000_000_000_000.0;

/// Scales a value onto decimal (1000-based) prefixes, the convention for
/// network rates. Supports up to tera.
fn scale_decimal(value: f64) -> (f64, &'static str) {
    match value {
        v if v < KILO_LIMIT_F64 => (v, ""),
        v if v < MEGA_LIMIT_F64 => (v / KILO_LIMIT_F64, "K"),
        v if v < GIGA_LIMIT_F64 => (v / MEGA_LIMIT_F64, "M"),
        v if v < TERA_LIMIT_F64 => (v / GIGA_LIMIT_F64, "G"),
        v => (v / TERA_LIMIT_F64, "T"),
    }
}

/// Formats a bytes-per-second figure as compact text in the given unit,
/// e.g. "12.3 MB/s" or "98.4 Kb/s".
pub fn format_rate(bytes_per_sec: f64, unit: SpeedUnit) -> String {
    let (value, prefix) = scale_decimal(bytes_per_sec * unit.multiplier());
    if prefix.is_empty() {
        format!("{:.0} {}/s", value, unit.short_unit())
    } else {
        format!("{:.1} {}{}/s", value, prefix, unit.short_unit())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_multipliers() {
        assert_eq!(SpeedUnit::Bits.multiplier(), 8.0);
        assert_eq!(SpeedUnit::Bytes.multiplier(), 1.0);
        assert_eq!(SpeedUnit::Bits.short_unit(), "b");
        assert_eq!(SpeedUnit::Bytes.short_unit(), "B");
    }

    #[test]
    fn test_interval_durations() {
        assert_eq!(UpdateInterval::Sec1.duration(), Duration::from_secs(1));
        assert_eq!(UpdateInterval::Sec30.duration(), Duration::from_secs(30));
        assert_eq!(UpdateInterval::Sec5.label(), "5s");
        assert_eq!(UpdateInterval::default(), UpdateInterval::Sec1);
    }

    #[test]
    fn test_format_rate_bytes() {
        assert_eq!(format_rate(0.0, SpeedUnit::Bytes), "0 B/s");
        assert_eq!(format_rate(873.0, SpeedUnit::Bytes), "873 B/s");
        assert_eq!(format_rate(1_500.0, SpeedUnit::Bytes), "1.5 KB/s");
        assert_eq!(format_rate(12_300_000.0, SpeedUnit::Bytes), "12.3 MB/s");
        assert_eq!(format_rate(2_000_000_000.0, SpeedUnit::Bytes), "2.0 GB/s");
    }

    #[test]
    fn test_format_rate_bits_applies_multiplier() {
        // 1000 B/s is 8000 b/s.
        assert_eq!(format_rate(1_000.0, SpeedUnit::Bits), "8.0 Kb/s");
        assert_eq!(format_rate(100.0, SpeedUnit::Bits), "800 b/s");
    }
}
