//! Linux interface-table access via sysfs
//!
//! Interface enumeration reads `/sys/class/net/<iface>/flags` and
//! `statistics/{rx,tx}_bytes`; the primary interface comes from the
//! default-route entry in `/proc/net/route`.

use std::collections::HashMap;
use std::fs;
use std::time::Instant;

use crate::error::Result;
use crate::sample::InterfaceSample;

const SYS_CLASS_NET: &str = "/sys/class/net";
const PROC_NET_ROUTE: &str = "/proc/net/route";

// Route flag bits from the kernel's route.h, as surfaced in the hex Flags
// column of /proc/net/route.
const RTF_UP: u16 = 0x0001;
const RTF_GATEWAY: u16 = 0x0002;

/// Reads the interface table, returning every up, non-loopback interface
/// keyed by name.
pub fn enumerate() -> Result<HashMap<String, InterfaceSample>> {
    let entries = fs::read_dir(SYS_CLASS_NET)?;
    let now = Instant::now();

    let mut interfaces = HashMap::new();
    for entry in entries {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.is_empty() {
            continue;
        }
        // A single interface failing to read is expected mid-teardown;
        // drop it and keep going.
        if let Some(sample) = read_interface(&name, now) {
            if sample.is_up && !sample.is_loopback {
                interfaces.insert(name, sample);
            }
        }
    }

    Ok(interfaces)
}

fn read_interface(name: &str, now: Instant) -> Option<InterfaceSample> {
    let base = format!("{}/{}", SYS_CLASS_NET, name);
    let flags = parse_flags(&fs::read_to_string(format!("{}/flags", base)).ok()?)?;
    let rx_bytes = read_stat(&base, "rx_bytes")?;
    let tx_bytes = read_stat(&base, "tx_bytes")?;

    Some(InterfaceSample {
        name: name.to_string(),
        is_up: flags & libc::IFF_UP as u32 != 0,
        is_loopback: flags & libc::IFF_LOOPBACK as u32 != 0,
        rx_bytes,
        tx_bytes,
        timestamp: now,
    })
}

/// Parses the contents of a sysfs `flags` file (e.g. "0x1003").
fn parse_flags(raw: &str) -> Option<u32> {
    let trimmed = raw.trim();
    let hex = trimmed.strip_prefix("0x").unwrap_or(trimmed);
    u32::from_str_radix(hex, 16).ok()
}

fn read_stat(base: &str, stat: &str) -> Option<u64> {
    fs::read_to_string(format!("{}/statistics/{}", base, stat))
        .ok()?
        .trim()
        .parse()
        .ok()
}

/// Name of the interface carrying the IPv4 default route, if any.
pub fn default_route_interface() -> Option<String> {
    let table = fs::read_to_string(PROC_NET_ROUTE).ok()?;
    parse_route_table(&table)
}

/// Finds the first up gateway route with an all-zero destination.
///
/// `/proc/net/route` is a whitespace-separated table with a header line;
/// destination and flags are hex, and the default route's destination is
/// "00000000".
fn parse_route_table(table: &str) -> Option<String> {
    for line in table.lines().skip(1) {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 4 {
            continue;
        }
        let (iface, dest, flags) = (fields[0], fields[1], fields[3]);
        if dest != "00000000" {
            continue;
        }
        let Ok(flags) = u16::from_str_radix(flags, 16) else {
            continue;
        };
        if flags & (RTF_UP | RTF_GATEWAY) == RTF_UP | RTF_GATEWAY {
            return Some(iface.to_string());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flags() {
        assert_eq!(parse_flags("0x1003\n"), Some(0x1003));
        assert_eq!(parse_flags("0x8"), Some(0x8));
        assert_eq!(parse_flags("1003"), Some(0x1003));
        assert_eq!(parse_flags("not hex"), None);
        assert_eq!(parse_flags(""), None);
    }

    #[test]
    fn test_parse_route_table_finds_default_route() {
        let table = "Iface\tDestination\tGateway \tFlags\tRefCnt\tUse\tMetric\tMask\t\tMTU\tWindow\tIRTT\n\
                     eth0\t000FEA0A\t00000000\t0001\t0\t0\t0\t00FFFFFF\t0\t0\t0\n\
                     wlan0\t00000000\t010FEA0A\t0003\t0\t0\t600\t00000000\t0\t0\t0\n";
        assert_eq!(parse_route_table(table), Some("wlan0".to_string()));
    }

    #[test]
    fn test_parse_route_table_ignores_down_and_non_default() {
        // Default destination but the route is not up.
        let table = "Iface\tDestination\tGateway\tFlags\n\
                     eth0\t00000000\t010FEA0A\t0002\n";
        assert_eq!(parse_route_table(table), None);

        // No default destination at all.
        let table = "Iface\tDestination\tGateway\tFlags\n\
                     eth0\t000FEA0A\t00000000\t0001\n";
        assert_eq!(parse_route_table(table), None);
    }

    #[test]
    fn test_parse_route_table_tolerates_garbage() {
        assert_eq!(parse_route_table(""), None);
        assert_eq!(parse_route_table("Iface\n\nshort line\n"), None);
        assert_eq!(parse_route_table("Iface\tDest\tGw\tFlags\nx\t00000000\ty\tZZZZ\n"), None);
    }

    #[test]
    fn test_enumerate_live_system() {
        // /sys/class/net exists on any Linux this runs on; the result may
        // legitimately be empty (e.g. loopback only).
        assert!(enumerate().is_ok());
    }
}
