//! # netspeed
//!
//! Per-interface network throughput sampling for macOS and Linux.
//!
//! The crate reads cumulative byte counters from the kernel's interface
//! table, tracks a snapshot per interface across polls, and derives
//! instantaneous inbound/outbound rates with correct handling of counter
//! wraparound, irregular polling intervals, and interfaces that come and
//! go. A resolver picks the "primary" interface (the one carrying the
//! default route) so a display layer can show a single meaningful number.
//!
//! There is no timer inside: the caller polls at whatever period it wants
//! (the [`UpdateInterval`] candidates match common menu-bar refresh
//! choices), and a failed poll simply yields no data for that tick while
//! all baselines stay intact for the next one.
//!
//! ## Quick start
//!
//! ```no_run
//! use netspeed::{MonitorConfig, SpeedMonitor};
//! use std::thread;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = MonitorConfig::default();
//! let period = config.interval.duration();
//! let unit = config.unit;
//! let mut monitor = SpeedMonitor::new(config);
//!
//! loop {
//!     match monitor.poll()? {
//!         Some(speed) => println!("[{}]\n{}", speed.interface, speed.display(unit)),
//!         None => println!("no primary interface"),
//!     }
//!     thread::sleep(period);
//! }
//! # }
//! ```
//!
//! ## Sampling by hand
//!
//! The leaf components compose without the facade when a consumer wants
//! every interface rather than just the primary one:
//!
//! ```no_run
//! use netspeed::{InterfaceEnumerator, TrafficRateTracker};
//! use std::time::{Duration, Instant};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut enumerator = InterfaceEnumerator::new();
//! let mut tracker = TrafficRateTracker::new();
//!
//! // First poll seeds baselines; all rates are zero.
//! let samples = enumerator.enumerate()?;
//! tracker.sample(&samples, Instant::now());
//!
//! std::thread::sleep(Duration::from_secs(1));
//!
//! let samples = enumerator.enumerate()?;
//! for (name, rate) in tracker.sample(&samples, Instant::now()) {
//!     println!(
//!         "{}: down {:.0} B/s, up {:.0} B/s",
//!         name, rate.rx_bytes_per_sec, rate.tx_bytes_per_sec
//!     );
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Platform support
//!
//! | Platform | Interface table              | Primary interface      |
//! |----------|------------------------------|------------------------|
//! | macOS    | `sysctl(NET_RT_IFLIST)`      | default-route lookup   |
//! | Linux    | `/sys/class/net`             | `/proc/net/route`      |
//!
//! Other platforms fail enumeration with
//! [`Error::UnsupportedPlatform`](crate::Error::UnsupportedPlatform).

pub mod config;
pub mod enumerator;
pub mod error;
pub mod monitor;
pub mod primary;
pub mod sample;
pub mod tracker;
pub mod units;

mod platform;

pub use config::MonitorConfig;
pub use enumerator::InterfaceEnumerator;
pub use error::{Error, Result};
pub use monitor::{PrimarySpeed, SpeedMonitor};
pub use primary::{FixedResolver, PrimaryInterfaceResolver, SystemResolver};
pub use sample::{InterfaceSample, RateSample};
pub use tracker::TrafficRateTracker;
pub use units::{format_rate, SpeedUnit, UpdateInterval};
