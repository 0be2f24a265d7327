//! Watches the primary interface and prints its throughput, the way a
//! menu-bar consumer would.
//!
//! Pass an interface name to pin monitoring to it instead of following the
//! default route:
//!
//! ```text
//! cargo run --example speedwatch [interface]
//! ```

use netspeed::{FixedResolver, MonitorConfig, SpeedMonitor};
use std::thread;

fn main() {
    env_logger::init();

    let config = MonitorConfig::default();
    let period = config.interval.duration();
    let unit = config.unit;

    let mut monitor = match std::env::args().nth(1) {
        Some(name) => {
            println!("Pinned to interface {}", name);
            SpeedMonitor::with_resolver(config, Box::new(FixedResolver::new(name)))
        }
        None => SpeedMonitor::new(config),
    };

    println!("Polling every {} (Ctrl+C to exit)\n", monitor.config().interval);

    loop {
        match monitor.poll() {
            Ok(Some(speed)) => {
                println!("[{}]", speed.interface);
                println!("{}", speed.display(unit));
            }
            Ok(None) => println!("(no primary interface)"),
            Err(e) => eprintln!("poll failed: {}", e),
        }
        thread::sleep(period);
    }
}
