//! macOS interface-table access over the PF_ROUTE sysctl
//!
//! The kernel hands back the interface table as a packed sequence of
//! variable-length routing messages, sized with one sysctl call and fetched
//! with a second. [`walk_messages`] advances through the records with
//! explicit bounds checks against the fetched length; every raw `libc`
//! call in the crate lives in this module.

use std::collections::HashMap;
use std::ffi::CStr;
use std::mem;
use std::ptr;
use std::time::Instant;

use libc::{c_int, c_void, AF_INET, CTL_NET, IFF_LOOPBACK, IFF_UP, IF_NAMESIZE, PF_ROUTE};

use crate::error::{Error, Result};
use crate::sample::InterfaceSample;

/// Partial layouts and constants from Apple's `net/if.h` and `net/route.h`
/// for the routing-table sysctl; not all of these are exported by `libc`
/// for apple targets.
#[allow(non_camel_case_types)]
mod bindings {
    use libc::{c_int, pid_t};

    /// Common prefix shared by every PF_ROUTE message type. See
    /// [`route.h`](https://opensource.apple.com/source/xnu/xnu-7195.141.2/bsd/net/route.h).
    #[repr(C)]
    #[derive(Copy, Clone)]
    pub struct rt_msg_prefix {
        pub msglen: u16,
        pub version: u8,
        pub msgtype: u8,
    }

    /// 32-bit timeval embedded in `if_data` on every architecture.
    #[repr(C)]
    #[derive(Copy, Clone)]
    pub struct timeval32 {
        pub tv_sec: i32,
        pub tv_usec: i32,
    }

    /// Interface statistics block carried by RTM_IFINFO messages. See
    /// [`if_var.h`](https://opensource.apple.com/source/xnu/xnu-7195.141.2/bsd/net/if_var.h).
    /// Byte counters are 32-bit here; they are widened at the parse
    /// boundary.
    #[repr(C)]
    #[derive(Copy, Clone)]
    pub struct if_data {
        pub ifi_type: u8,
        pub ifi_typelen: u8,
        pub ifi_physical: u8,
        pub ifi_addrlen: u8,
        pub ifi_hdrlen: u8,
        pub ifi_recvquota: u8,
        pub ifi_xmitquota: u8,
        pub ifi_unused1: u8,
        pub ifi_mtu: u32,
        pub ifi_metric: u32,
        pub ifi_baudrate: u32,
        pub ifi_ipackets: u32,
        pub ifi_ierrors: u32,
        pub ifi_opackets: u32,
        pub ifi_oerrors: u32,
        pub ifi_collisions: u32,
        pub ifi_ibytes: u32,
        pub ifi_obytes: u32,
        pub ifi_imcasts: u32,
        pub ifi_omcasts: u32,
        pub ifi_iqdrops: u32,
        pub ifi_noproto: u32,
        pub ifi_recvtiming: u32,
        pub ifi_xmittiming: u32,
        pub ifi_lastchange: timeval32,
        pub ifi_unused2: u32,
        pub ifi_hwassist: u32,
        pub ifi_reserved1: u32,
        pub ifi_reserved2: u32,
    }

    /// Interface-info message header. See `if_var.h` (`if_msghdr`).
    #[repr(C)]
    #[derive(Copy, Clone)]
    pub struct if_msghdr {
        pub ifm_msglen: u16,
        pub ifm_version: u8,
        pub ifm_type: u8,
        pub ifm_addrs: c_int,
        pub ifm_flags: c_int,
        pub ifm_index: u16,
        pub ifm_data: if_data,
    }

    /// Route metrics block inside `rt_msghdr`. See `route.h`.
    #[repr(C)]
    #[derive(Copy, Clone)]
    pub struct rt_metrics {
        pub rmx_locks: u32,
        pub rmx_mtu: u32,
        pub rmx_hopcount: u32,
        pub rmx_expire: i32,
        pub rmx_recvpipe: u32,
        pub rmx_sendpipe: u32,
        pub rmx_ssthresh: u32,
        pub rmx_rtt: u32,
        pub rmx_rttvar: u32,
        pub rmx_pksent: u32,
        pub rmx_state: u32,
        pub rmx_filler: [u32; 3],
    }

    /// Route entry message header. See `route.h` (`rt_msghdr`).
    #[repr(C)]
    #[derive(Copy, Clone)]
    pub struct rt_msghdr {
        pub rtm_msglen: u16,
        pub rtm_version: u8,
        pub rtm_type: u8,
        pub rtm_index: u16,
        pub rtm_flags: c_int,
        pub rtm_addrs: c_int,
        pub rtm_pid: pid_t,
        pub rtm_seq: c_int,
        pub rtm_errno: c_int,
        pub rtm_use: c_int,
        pub rtm_inits: u32,
        pub rtm_rmx: rt_metrics,
    }

    pub const NET_RT_FLAGS: c_int = 2;
    pub const NET_RT_IFLIST: c_int = 3;
    pub const RTM_IFINFO: u8 = 0xe;
    pub const RTF_UP: c_int = 0x1;
    pub const RTF_GATEWAY: c_int = 0x2;
    pub const RTA_DST: c_int = 0x1;
}

/// Reads the interface table, returning every up, non-loopback interface
/// keyed by name.
///
/// `buf` is the caller-retained fetch buffer; it is grown when the kernel
/// asks for more room and never shrunk, so steady-state polls allocate
/// nothing.
pub fn enumerate(buf: &mut Vec<u8>) -> Result<HashMap<String, InterfaceSample>> {
    let mut mib: [c_int; 6] = [CTL_NET, PF_ROUTE, 0, 0, bindings::NET_RT_IFLIST, 0];
    let len = fetch_routing_table(&mut mib, buf)?;
    let now = Instant::now();

    let mut interfaces = HashMap::new();
    walk_messages(&buf[..len], |msgtype, msg| {
        if msgtype != bindings::RTM_IFINFO {
            return;
        }
        let Some(info) = parse_ifinfo(msg) else {
            return;
        };
        let is_loopback = info.flags & IFF_LOOPBACK as u32 != 0;
        let is_up = info.flags & IFF_UP as u32 != 0;
        if is_loopback || !is_up {
            return;
        }
        // Index reuse mid-enumeration and mid-teardown interfaces resolve
        // to nothing or an empty name; drop them.
        let Some(name) = interface_name(u32::from(info.index)) else {
            return;
        };
        interfaces.insert(
            name.clone(),
            InterfaceSample {
                name,
                is_up,
                is_loopback,
                rx_bytes: info.rx_bytes,
                tx_bytes: info.tx_bytes,
                timestamp: now,
            },
        );
    });

    Ok(interfaces)
}

/// Name of the interface carrying the IPv4 default route, if any.
pub fn default_route_interface() -> Option<String> {
    let mut mib: [c_int; 6] = [
        CTL_NET,
        PF_ROUTE,
        0,
        AF_INET,
        bindings::NET_RT_FLAGS,
        bindings::RTF_GATEWAY,
    ];
    let mut buf = Vec::new();
    let len = fetch_routing_table(&mut mib, &mut buf).ok()?;

    let mut index = None;
    walk_messages(&buf[..len], |_msgtype, msg| {
        if index.is_none() {
            index = parse_default_route_index(msg);
        }
    });

    index.and_then(|idx| interface_name(u32::from(idx)))
}

/// Runs the two-stage sizing/fetch sysctl for a routing-table mib, reusing
/// `buf` and growing it only upward. Returns the length of the valid
/// prefix of `buf`.
fn fetch_routing_table(mib: &mut [c_int; 6], buf: &mut Vec<u8>) -> Result<usize> {
    let mut needed: libc::size_t = 0;

    // SAFETY: mib points at a valid 6-element array; a null oldp makes
    // sysctl report the required buffer size in `needed`.
    let status = unsafe {
        libc::sysctl(
            mib.as_mut_ptr(),
            mib.len() as libc::c_uint,
            ptr::null_mut(),
            &mut needed,
            ptr::null_mut(),
            0,
        )
    };
    if status != 0 {
        return Err(Error::SizingQuery { errno: last_errno() });
    }

    if buf.len() < needed {
        buf.resize(needed, 0);
    }

    let mut len = needed;
    // SAFETY: buf holds at least `len` initialized bytes for the kernel to
    // fill; sysctl updates `len` to the bytes actually written.
    let status = unsafe {
        libc::sysctl(
            mib.as_mut_ptr(),
            mib.len() as libc::c_uint,
            buf.as_mut_ptr() as *mut c_void,
            &mut len,
            ptr::null_mut(),
            0,
        )
    };
    if status != 0 {
        return Err(Error::FetchQuery { errno: last_errno() });
    }

    Ok(len)
}

fn last_errno() -> i32 {
    std::io::Error::last_os_error().raw_os_error().unwrap_or(0)
}

/// Walks the packed routing messages in `buf`, invoking `visit` with each
/// message's type and full bytes.
///
/// Each record's declared length is validated against the remaining buffer
/// before any read or advance; a zero, undersized, or overrunning declared
/// length ends the walk.
fn walk_messages<'a>(buf: &'a [u8], mut visit: impl FnMut(u8, &'a [u8])) {
    let prefix_len = mem::size_of::<bindings::rt_msg_prefix>();
    let mut offset = 0;

    while offset + prefix_len <= buf.len() {
        // SAFETY: the loop condition guarantees prefix_len readable bytes
        // at offset; read_unaligned tolerates the packed record layout.
        let prefix: bindings::rt_msg_prefix =
            unsafe { ptr::read_unaligned(buf.as_ptr().add(offset) as *const _) };

        let msg_len = usize::from(prefix.msglen);
        if msg_len < prefix_len || offset + msg_len > buf.len() {
            break;
        }

        visit(prefix.msgtype, &buf[offset..offset + msg_len]);
        offset += msg_len;
    }
}

/// Fields pulled out of one RTM_IFINFO message.
struct IfInfo {
    index: u16,
    flags: u32,
    rx_bytes: u64,
    tx_bytes: u64,
}

fn parse_ifinfo(msg: &[u8]) -> Option<IfInfo> {
    if msg.len() < mem::size_of::<bindings::if_msghdr>() {
        return None;
    }
    // SAFETY: length checked above.
    let hdr: bindings::if_msghdr = unsafe { ptr::read_unaligned(msg.as_ptr() as *const _) };

    Some(IfInfo {
        index: hdr.ifm_index,
        flags: hdr.ifm_flags as u32,
        // Darwin's if_data carries 32-bit byte counters; widen here so all
        // delta arithmetic upstream is u64.
        rx_bytes: u64::from(hdr.ifm_data.ifi_ibytes),
        tx_bytes: u64::from(hdr.ifm_data.ifi_obytes),
    })
}

/// Returns the interface index of a route message describing the IPv4
/// default route (zero destination, up, via a gateway).
fn parse_default_route_index(msg: &[u8]) -> Option<u16> {
    if msg.len() < mem::size_of::<bindings::rt_msghdr>() {
        return None;
    }
    // SAFETY: length checked above.
    let hdr: bindings::rt_msghdr = unsafe { ptr::read_unaligned(msg.as_ptr() as *const _) };

    let wanted = bindings::RTF_UP | bindings::RTF_GATEWAY;
    if hdr.rtm_flags & wanted != wanted || hdr.rtm_addrs & bindings::RTA_DST == 0 {
        return None;
    }

    // The destination sockaddr directly follows the header: sa_len and
    // sa_family lead, and for AF_INET the 4-byte address sits at offset 4.
    let sa = &msg[mem::size_of::<bindings::rt_msghdr>()..];
    if sa.len() < 8 || sa[1] != AF_INET as u8 {
        return None;
    }
    let is_default = sa[4..8].iter().all(|&b| b == 0);
    is_default.then_some(hdr.rtm_index)
}

/// Resolves an interface index to its name. Returns `None` for indexes the
/// kernel no longer knows and for names that come back empty.
fn interface_name(index: u32) -> Option<String> {
    let mut name_buf = [0 as libc::c_char; IF_NAMESIZE];
    // SAFETY: if_indextoname writes at most IF_NAMESIZE bytes including
    // the NUL terminator into name_buf.
    let ret = unsafe { libc::if_indextoname(index, name_buf.as_mut_ptr()) };
    if ret.is_null() {
        return None;
    }
    // SAFETY: on success the buffer holds a NUL-terminated C string.
    let name = unsafe { CStr::from_ptr(name_buf.as_ptr()) }
        .to_string_lossy()
        .into_owned();
    (!name.is_empty()).then_some(name)
}
