//! Raw records returned by capability objects, before normalization

use std::collections::BTreeSet;
use std::net::IpAddr;

use crate::types::Transport;

/// Wireless link as the OS reports it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WirelessInfo {
    pub interface_name: Option<String>,
    pub ip_address: Option<IpAddr>,
    /// SSID exactly as reported, possibly wrapped in quotes
    pub ssid: Option<String>,
    pub bssid: Option<String>,
    /// Transmit link speed
    pub link_speed_mbps: Option<u32>,
    pub signal_dbm: Option<i32>,
    pub frequency_mhz: Option<u32>,
}

/// Opaque handle to an OS network
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NetworkHandle {
    pub id: String,
}

impl NetworkHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// Address assigned to an interface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterfaceAddress {
    pub address: IpAddr,
    pub prefix_length: u8,
}

/// One entry of a route table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteInfo {
    /// Destination in CIDR form (e.g., "0.0.0.0/0")
    pub destination: String,
    /// Next hop, `None` for on-link routes
    pub gateway: Option<IpAddr>,
    pub interface_name: Option<String>,
}

/// Configuration of a network's link
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkProperties {
    pub interface_name: Option<String>,
    pub addresses: Vec<InterfaceAddress>,
    /// Routes in the order the OS lists them
    pub routes: Vec<RouteInfo>,
    /// Resolvers in the order the OS lists them
    pub dns_servers: Vec<IpAddr>,
    pub mtu: Option<u32>,
}

/// Capabilities a network advertises
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NetworkCapabilities {
    pub transports: BTreeSet<Transport>,
    pub downlink_kbps: Option<u32>,
    pub uplink_kbps: Option<u32>,
}
