//! Prints throughput for every up, non-loopback interface once per second.
//!
//! ```text
//! cargo run --example interfaces [--json]
//! ```

use netspeed::{format_rate, InterfaceEnumerator, RateSample, SpeedUnit, TrafficRateTracker};
use std::collections::HashMap;
use std::thread;
use std::time::{Duration, Instant};

fn main() {
    env_logger::init();
    let json = std::env::args().any(|arg| arg == "--json");

    let mut enumerator = InterfaceEnumerator::new();
    let mut tracker = TrafficRateTracker::new();

    println!("Sampling every second (Ctrl+C to exit)\n");

    loop {
        let samples = match enumerator.enumerate() {
            Ok(samples) => samples,
            Err(e) => {
                eprintln!("enumeration failed: {}", e);
                thread::sleep(Duration::from_secs(1));
                continue;
            }
        };
        let rates = tracker.sample(&samples, Instant::now());

        if json {
            match serde_json::to_string_pretty(&rates) {
                Ok(out) => println!("{}", out),
                Err(e) => eprintln!("serialization failed: {}", e),
            }
        } else {
            print_table(&rates);
        }

        thread::sleep(Duration::from_secs(1));
    }
}

fn print_table(rates: &HashMap<String, RateSample>) {
    let mut names: Vec<&String> = rates.keys().collect();
    names.sort();

    println!("{:<14} {:>14} {:>14}", "interface", "down", "up");
    for name in names {
        let rate = &rates[name];
        println!(
            "{:<14} {:>14} {:>14}",
            name,
            format_rate(rate.rx_bytes_per_sec, SpeedUnit::Bytes),
            format_rate(rate.tx_bytes_per_sec, SpeedUnit::Bytes)
        );
    }
    println!();
}
