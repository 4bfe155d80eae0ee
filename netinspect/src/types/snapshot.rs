//! Network snapshot types

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Link-layer medium a network runs over
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Transport {
    Wifi,
    Cellular,
    Ethernet,
}

impl Transport {
    /// Lower-case name used for `connectionType`
    pub fn as_str(&self) -> &'static str {
        match self {
            Transport::Wifi => "wifi",
            Transport::Cellular => "cellular",
            Transport::Ethernet => "ethernet",
        }
    }
}

/// Point-in-time view of the active network
///
/// Every field is independently optional: the wireless and connectivity
/// subsystems are read separately and either may be missing on a host.
/// Absent fields are omitted from the serialized form rather than written
/// as `null` or zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkSnapshot {
    /// Textual address of the active interface (e.g., "192.168.1.23")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    /// Prefix length of `ip_address` as configured on the interface
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix_length: Option<u8>,
    /// Dotted-quad mask for an IPv4 `ip_address`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subnet_mask: Option<String>,

    /// Wireless network name, surrounding quotes removed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssid: Option<String>,
    /// Access point hardware address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bssid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_speed_mbps: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signal_strength_dbm: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency_mhz: Option<u32>,

    /// First gateway found in the active route table
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gateway: Option<String>,
    /// At most two resolvers, in the order the OS lists them
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dns_servers: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interface_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mtu: Option<u32>,
    /// Transports advertised by the active network. `None` when its
    /// capabilities could not be read at all.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transports: Option<BTreeSet<Transport>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub downlink_kbps: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uplink_kbps: Option<u32>,
}

impl NetworkSnapshot {
    pub fn has_transport(&self, transport: Transport) -> bool {
        self.transports
            .as_ref()
            .is_some_and(|set| set.contains(&transport))
    }

    /// Primary transport, preferring WiFi over cellular over ethernet
    pub fn connection_type(&self) -> Option<Transport> {
        [Transport::Wifi, Transport::Cellular, Transport::Ethernet]
            .into_iter()
            .find(|t| self.has_transport(*t))
    }
}
