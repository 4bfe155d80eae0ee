//! Capability objects for the OS subsystems the inspector reads
//!
//! Each trait covers one subsystem. Implementations return `Ok(None)` (or
//! [`SourceError::Unavailable`](crate::SourceError::Unavailable)) when the
//! subsystem simply is not there, and
//! [`SourceError::Fault`](crate::SourceError::Fault) when it is there but
//! cannot be read.

mod records;

pub use records::*;

use crate::error::SourceResult;
use crate::types::HostCapabilities;

/// Wireless subsystem (WiFi association and signal)
pub trait WirelessSource: Send + Sync {
    /// Current wireless link, or `None` if the host has no wireless hardware
    fn wireless_info(&self) -> SourceResult<Option<WirelessInfo>>;
}

/// Connectivity subsystem (active network and its configuration)
pub trait ConnectivitySource: Send + Sync {
    /// Network currently carrying the default route, if any
    fn active_network(&self) -> SourceResult<Option<NetworkHandle>>;

    /// Addresses, routes, resolvers and MTU of `network`
    fn link_properties(&self, network: &NetworkHandle) -> SourceResult<Option<LinkProperties>>;

    /// Transport flags and bandwidth estimates of `network`
    fn network_capabilities(
        &self,
        network: &NetworkHandle,
    ) -> SourceResult<Option<NetworkCapabilities>>;
}

/// Capability detection for platform-gated fields
pub trait CapabilityProbe: Send + Sync {
    fn probe(&self) -> HostCapabilities;
}

/// Probe reporting a fixed capability level
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedCapabilities(pub HostCapabilities);

impl CapabilityProbe for FixedCapabilities {
    fn probe(&self) -> HostCapabilities {
        self.0
    }
}

/// Source for hosts without a wireless subsystem
#[derive(Debug, Clone, Copy, Default)]
pub struct NoWireless;

impl WirelessSource for NoWireless {
    fn wireless_info(&self) -> SourceResult<Option<WirelessInfo>> {
        Ok(None)
    }
}
