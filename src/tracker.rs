//! Per-interface rate tracking across polls
//!
//! [`TrafficRateTracker`] keeps the last-seen counters for every interface
//! it has observed and turns each new poll into per-interface throughput.
//! It owns all mutable sampling state; callers that poll from more than one
//! thread must wrap the tracker in a mutex, since its methods take
//! `&mut self`.

use std::collections::HashMap;
use std::time::Instant;

use crate::sample::{InterfaceSample, RateSample};

/// Intervals longer than this are treated as discontinuous (a reappearing
/// interface, a suspended machine, a skipped timer) and produce zero rates
/// instead of a rate extrapolated over the gap.
const STALE_INTERVAL_SECS: f64 = 60.0;

/// Floor for the rate divisor, so back-to-back polls cannot divide by zero
/// or a near-zero interval.
const MIN_INTERVAL_SECS: f64 = 1e-3;

/// Last-recorded counters for one interface, the baseline for the next
/// delta computation.
#[derive(Debug, Clone, Copy)]
struct InterfaceSnapshot {
    timestamp: Instant,
    rx_bytes: u64,
    tx_bytes: u64,
}

/// Tracks cumulative byte counters across polls and derives instantaneous
/// throughput per interface.
///
/// Interfaces present in an earlier poll but absent from the current one
/// keep their snapshot untouched; if they reappear after a long gap the
/// staleness cap zeroes that one sample's rates rather than reporting a
/// misleading figure.
#[derive(Debug, Default)]
pub struct TrafficRateTracker {
    snapshots: HashMap<String, InterfaceSnapshot>,
}

impl TrafficRateTracker {
    /// Creates an empty tracker with no baselines.
    pub fn new() -> Self {
        Self::default()
    }

    /// Diffs `current` against the stored snapshots, returning one
    /// [`RateSample`] per interface in `current`.
    ///
    /// First-seen interfaces seed a baseline and emit zero deltas and
    /// rates. Every interface's snapshot is overwritten with `now` and the
    /// current counters.
    pub fn sample(
        &mut self,
        current: &HashMap<String, InterfaceSample>,
        now: Instant,
    ) -> HashMap<String, RateSample> {
        let mut rates = HashMap::with_capacity(current.len());

        for (name, sample) in current {
            let rate = match self.snapshots.get(name) {
                Some(prev) => {
                    let delta_time = now.saturating_duration_since(prev.timestamp).as_secs_f64();
                    let rx_delta = wrap_aware_diff(sample.rx_bytes, prev.rx_bytes);
                    let tx_delta = wrap_aware_diff(sample.tx_bytes, prev.tx_bytes);
                    let (rx_rate, tx_rate) = compute_rates(delta_time, rx_delta, tx_delta);

                    RateSample {
                        name: name.clone(),
                        delta_time_secs: delta_time,
                        rx_delta_bytes: rx_delta,
                        tx_delta_bytes: tx_delta,
                        rx_bytes_per_sec: rx_rate,
                        tx_bytes_per_sec: tx_rate,
                    }
                }
                None => RateSample::first_seen(name),
            };

            self.snapshots.insert(
                name.clone(),
                InterfaceSnapshot {
                    timestamp: now,
                    rx_bytes: sample.rx_bytes,
                    tx_bytes: sample.tx_bytes,
                },
            );
            rates.insert(name.clone(), rate);
        }

        rates
    }

    /// Discards all stored snapshots. The next poll re-seeds every
    /// interface as if it were first seen.
    pub fn reset(&mut self) {
        self.snapshots.clear();
    }

    /// Number of interfaces with a stored baseline.
    pub fn tracked_interfaces(&self) -> usize {
        self.snapshots.len()
    }
}

/// Forward distance from `previous` to `current` on the u64 counter ring.
fn wrap_aware_diff(current: u64, previous: u64) -> u64 {
    if current >= previous {
        current - previous
    } else {
        // Counter wrapped past u64::MAX; measure forward through zero.
        current.wrapping_add(u64::MAX - previous).wrapping_add(1)
    }
}

/// Turns byte deltas over `delta_time` seconds into bytes-per-second rates,
/// zeroing stale intervals and flooring the divisor at [`MIN_INTERVAL_SECS`].
fn compute_rates(delta_time: f64, rx_delta: u64, tx_delta: u64) -> (f64, f64) {
    if delta_time > STALE_INTERVAL_SECS {
        return (0.0, 0.0);
    }
    let safe_interval = delta_time.max(MIN_INTERVAL_SECS);
    (
        rx_delta as f64 / safe_interval,
        tx_delta as f64 / safe_interval,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    const EPSILON: f64 = 1e-6;

    fn observed(name: &str, rx: u64, tx: u64, at: Instant) -> (String, InterfaceSample) {
        (
            name.to_string(),
            InterfaceSample {
                name: name.to_string(),
                is_up: true,
                is_loopback: false,
                rx_bytes: rx,
                tx_bytes: tx,
                timestamp: at,
            },
        )
    }

    fn poll(tracker: &mut TrafficRateTracker, samples: &[(String, InterfaceSample)], now: Instant) -> HashMap<String, RateSample> {
        let current: HashMap<String, InterfaceSample> = samples.iter().cloned().collect();
        tracker.sample(&current, now)
    }

    #[test]
    fn test_wrap_aware_diff_monotonic() {
        assert_eq!(wrap_aware_diff(2500, 1000), 1500);
        assert_eq!(wrap_aware_diff(1000, 1000), 0);
        assert_eq!(wrap_aware_diff(u64::MAX, 0), u64::MAX);
    }

    #[test]
    fn test_wrap_aware_diff_wraparound() {
        // Distance forward from MAX through zero.
        assert_eq!(wrap_aware_diff(0, u64::MAX), 1);
        assert_eq!(wrap_aware_diff(50, u64::MAX), 51);
        assert_eq!(wrap_aware_diff(0, u64::MAX - 9), 10);
        // Wrapped by exactly one full ring position less than previous.
        assert_eq!(wrap_aware_diff(u64::MAX - 1, u64::MAX), u64::MAX);
    }

    #[test]
    fn test_wrap_aware_diff_matches_modular_distance() {
        let values = [0u64, 1, 499, u64::MAX / 2, u64::MAX - 1, u64::MAX];
        for &previous in &values {
            for &current in &values {
                let diff = wrap_aware_diff(current, previous);
                assert_eq!(current.wrapping_sub(previous), diff);
            }
        }
    }

    #[test]
    fn test_compute_rates_stale_interval_is_zeroed() {
        assert_eq!(compute_rates(60.001, 1_000_000, 2_000_000), (0.0, 0.0));
        assert_eq!(compute_rates(120.0, u64::MAX, u64::MAX), (0.0, 0.0));
    }

    #[test]
    fn test_compute_rates_exactly_sixty_seconds_is_not_stale() {
        let (rx, tx) = compute_rates(60.0, 6000, 600);
        assert!((rx - 100.0).abs() < EPSILON);
        assert!((tx - 10.0).abs() < EPSILON);
    }

    #[test]
    fn test_compute_rates_floors_tiny_intervals() {
        // A zero interval divides by the 1 ms floor instead of zero.
        let (rx, tx) = compute_rates(0.0, 10, 20);
        assert!((rx - 10_000.0).abs() < EPSILON);
        assert!((tx - 20_000.0).abs() < EPSILON);

        let (rx, _) = compute_rates(0.0001, 10, 0);
        assert!((rx - 10_000.0).abs() < EPSILON);
    }

    #[test]
    fn test_first_observation_is_zeroed() {
        let mut tracker = TrafficRateTracker::new();
        let t0 = Instant::now();

        let rates = poll(&mut tracker, &[observed("en0", 1000, 500, t0)], t0);
        let rate = &rates["en0"];
        assert_eq!(rate.rx_delta_bytes, 0);
        assert_eq!(rate.tx_delta_bytes, 0);
        assert_eq!(rate.rx_bytes_per_sec, 0.0);
        assert_eq!(rate.tx_bytes_per_sec, 0.0);
        assert_eq!(rate.delta_time_secs, 0.0);
        assert_eq!(tracker.tracked_interfaces(), 1);
    }

    #[test]
    fn test_second_observation_yields_rates() {
        let mut tracker = TrafficRateTracker::new();
        let t0 = Instant::now();
        let t1 = t0 + Duration::from_secs(1);

        poll(&mut tracker, &[observed("en0", 1000, 500, t0)], t0);
        let rates = poll(&mut tracker, &[observed("en0", 2500, 1200, t1)], t1);

        let rate = &rates["en0"];
        assert_eq!(rate.rx_delta_bytes, 1500);
        assert_eq!(rate.tx_delta_bytes, 700);
        assert!((rate.rx_bytes_per_sec - 1500.0).abs() < EPSILON);
        assert!((rate.tx_bytes_per_sec - 700.0).abs() < EPSILON);
        assert!((rate.delta_time_secs - 1.0).abs() < 1e-3);
    }

    #[test]
    fn test_counter_wraparound_in_sample() {
        let mut tracker = TrafficRateTracker::new();
        let t0 = Instant::now();
        let t1 = t0 + Duration::from_secs(1);

        poll(&mut tracker, &[observed("en0", u64::MAX, 100, t0)], t0);
        let rates = poll(&mut tracker, &[observed("en0", 50, 100, t1)], t1);

        let rate = &rates["en0"];
        assert_eq!(rate.rx_delta_bytes, 51);
        assert_eq!(rate.tx_delta_bytes, 0);
        assert!((rate.rx_bytes_per_sec - 51.0).abs() < EPSILON);
    }

    #[test]
    fn test_reappearance_after_long_gap_is_zeroed() {
        let mut tracker = TrafficRateTracker::new();
        let t0 = Instant::now();
        let t1 = t0 + Duration::from_secs(120);

        poll(&mut tracker, &[observed("en0", 1000, 500, t0)], t0);
        // Interface absent for several polls, then back with advanced
        // counters two minutes later.
        let rates = poll(&mut tracker, &[observed("en0", 900_000, 450_000, t1)], t1);

        let rate = &rates["en0"];
        assert_eq!(rate.rx_delta_bytes, 899_000);
        assert_eq!(rate.tx_delta_bytes, 449_500);
        assert_eq!(rate.rx_bytes_per_sec, 0.0);
        assert_eq!(rate.tx_bytes_per_sec, 0.0);
    }

    #[test]
    fn test_absent_interface_keeps_its_snapshot() {
        let mut tracker = TrafficRateTracker::new();
        let t0 = Instant::now();
        let t1 = t0 + Duration::from_secs(1);
        let t2 = t0 + Duration::from_secs(2);

        poll(&mut tracker, &[observed("en0", 1000, 0, t0)], t0);
        let rates = poll(&mut tracker, &[], t1);
        assert!(rates.is_empty());
        assert_eq!(tracker.tracked_interfaces(), 1);

        // Reappears within the staleness window: delta spans the whole gap.
        let rates = poll(&mut tracker, &[observed("en0", 3000, 0, t2)], t2);
        let rate = &rates["en0"];
        assert_eq!(rate.rx_delta_bytes, 2000);
        assert!((rate.rx_bytes_per_sec - 1000.0).abs() < EPSILON);
    }

    #[test]
    fn test_reset_behaves_like_first_observation() {
        let mut tracker = TrafficRateTracker::new();
        let t0 = Instant::now();
        let t1 = t0 + Duration::from_secs(1);

        poll(&mut tracker, &[observed("en0", 1000, 500, t0)], t0);
        tracker.reset();
        assert_eq!(tracker.tracked_interfaces(), 0);

        let rates = poll(&mut tracker, &[observed("en0", 2500, 1200, t1)], t1);
        let rate = &rates["en0"];
        assert_eq!(rate.rx_delta_bytes, 0);
        assert_eq!(rate.tx_delta_bytes, 0);
        assert_eq!(rate.rx_bytes_per_sec, 0.0);
    }

    #[test]
    fn test_interfaces_are_tracked_independently() {
        let mut tracker = TrafficRateTracker::new();
        let t0 = Instant::now();
        let t1 = t0 + Duration::from_secs(2);

        poll(
            &mut tracker,
            &[observed("en0", 1000, 0, t0), observed("en1", 5000, 0, t0)],
            t0,
        );
        let rates = poll(
            &mut tracker,
            &[observed("en0", 3000, 0, t1), observed("en1", 5000, 0, t1)],
            t1,
        );

        assert!((rates["en0"].rx_bytes_per_sec - 1000.0).abs() < EPSILON);
        assert_eq!(rates["en1"].rx_bytes_per_sec, 0.0);
        assert_eq!(rates["en1"].rx_delta_bytes, 0);
    }
}
