//! Primary-interface resolution

/// Resolves the name of the interface the OS currently prefers for
/// outbound default-route traffic.
///
/// Resolution is always best-effort: `None` means "nothing to show this
/// poll" (no default route, mid-switch, airplane mode), never an error.
pub trait PrimaryInterfaceResolver {
    /// Returns the primary interface name, if one can be determined.
    fn resolve_primary_interface(&self) -> Option<String>;
}

/// Resolves the primary interface from live system routing state.
#[derive(Debug, Default)]
pub struct SystemResolver;

impl PrimaryInterfaceResolver for SystemResolver {
    fn resolve_primary_interface(&self) -> Option<String> {
        #[cfg(target_os = "macos")]
        {
            crate::platform::macos::default_route_interface()
        }

        #[cfg(target_os = "linux")]
        {
            crate::platform::linux::default_route_interface()
        }

        #[cfg(not(any(target_os = "macos", target_os = "linux")))]
        {
            None
        }
    }
}

/// Always reports a fixed interface name; pins monitoring to a specific
/// interface regardless of routing state.
#[derive(Debug, Clone)]
pub struct FixedResolver {
    name: String,
}

impl FixedResolver {
    /// Resolver pinned to `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl PrimaryInterfaceResolver for FixedResolver {
    fn resolve_primary_interface(&self) -> Option<String> {
        Some(self.name.clone())
    }
}
