//! The network inspector
//!
//! Two independent sub-queries feed one snapshot: the wireless subsystem
//! fills the WiFi fields, the connectivity subsystem fills everything about
//! the active network. Unavailable subsystems leave their fields absent.
//! Any fault fails the whole inspection with a single `QueryFailure`.

use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;

use crate::error::{InspectError, SourceError, SourceResult};
use crate::source::{
    CapabilityProbe, ConnectivitySource, InterfaceAddress, LinkProperties, NetworkCapabilities,
    RouteInfo, WirelessInfo, WirelessSource,
};
use crate::types::{HostCapabilities, NetworkSnapshot};

/// Number of resolver slots in a snapshot
pub const MAX_DNS_SERVERS: usize = 2;

/// SSID placeholder some platforms report when the name is hidden from the caller
const UNKNOWN_SSID: &str = "<unknown ssid>";

/// Queries the OS for the active network and normalizes the result
#[derive(Clone)]
pub struct NetworkInspector {
    wireless: Arc<dyn WirelessSource>,
    connectivity: Arc<dyn ConnectivitySource>,
    probe: Arc<dyn CapabilityProbe>,
}

/// Connectivity sub-query result
#[derive(Debug, Default)]
struct ActiveNetwork {
    properties: Option<LinkProperties>,
    capabilities: Option<NetworkCapabilities>,
}

impl NetworkInspector {
    pub fn new(
        wireless: Arc<dyn WirelessSource>,
        connectivity: Arc<dyn ConnectivitySource>,
        probe: Arc<dyn CapabilityProbe>,
    ) -> Self {
        Self {
            wireless,
            connectivity,
            probe,
        }
    }

    /// Capability level of the host this inspector reads from
    pub fn capabilities(&self) -> HostCapabilities {
        self.probe.probe()
    }

    /// Take a snapshot of the active network
    pub fn inspect(&self) -> Result<NetworkSnapshot, InspectError> {
        let capabilities = self.probe.probe();

        // Both sub-queries always run; a fault in one does not skip the other.
        let wireless = absorb("wireless", self.wireless.wireless_info());
        let active = self.query_active_network();

        let wireless = wireless.map_err(|e| fault("wireless", e))?;
        let active = active.map_err(|e| fault("connectivity", e))?;

        let mut snapshot = NetworkSnapshot::default();
        if let Some(info) = wireless {
            apply_wireless(&mut snapshot, info, capabilities);
        }
        if let Some(active) = active {
            apply_active_network(&mut snapshot, active, capabilities);
        }

        tracing::debug!(
            interface = ?snapshot.interface_name,
            gateway = ?snapshot.gateway,
            ssid = ?snapshot.ssid,
            "Network snapshot taken"
        );
        Ok(snapshot)
    }

    fn query_active_network(&self) -> SourceResult<Option<ActiveNetwork>> {
        let Some(network) = absorb("active network", self.connectivity.active_network())? else {
            tracing::debug!("No active network");
            return Ok(None);
        };

        let properties = absorb(
            "link properties",
            self.connectivity.link_properties(&network),
        )?;
        let capabilities = absorb(
            "network capabilities",
            self.connectivity.network_capabilities(&network),
        )?;

        Ok(Some(ActiveNetwork {
            properties,
            capabilities,
        }))
    }
}

/// Turn `Unavailable` into an absent value, keep faults
fn absorb<T>(what: &str, result: SourceResult<Option<T>>) -> SourceResult<Option<T>> {
    match result {
        Err(SourceError::Unavailable(reason)) => {
            tracing::debug!("{} unavailable: {}", what, reason);
            Ok(None)
        }
        other => other,
    }
}

fn fault(subsystem: &str, err: SourceError) -> InspectError {
    tracing::warn!("{} query failed: {}", subsystem, err);
    InspectError::QueryFailure(format!("{} query failed: {}", subsystem, err))
}

fn apply_wireless(snapshot: &mut NetworkSnapshot, info: WirelessInfo, caps: HostCapabilities) {
    snapshot.ip_address = info.ip_address.filter(is_assigned).map(|ip| ip.to_string());
    snapshot.ssid = info.ssid.as_deref().and_then(normalize_ssid);
    snapshot.bssid = info.bssid;
    snapshot.link_speed_mbps = info.link_speed_mbps;
    snapshot.signal_strength_dbm = info.signal_dbm;
    if caps.wireless_frequency {
        snapshot.frequency_mhz = info.frequency_mhz;
    }
}

fn apply_active_network(snapshot: &mut NetworkSnapshot, active: ActiveNetwork, caps: HostCapabilities) {
    if let Some(props) = active.properties {
        apply_address(snapshot, &props.addresses);
        snapshot.gateway = first_gateway(&props.routes).map(|gw| gw.to_string());
        snapshot.dns_servers = leading_dns_servers(&props.dns_servers)
            .iter()
            .map(|ip| ip.to_string())
            .collect();
        snapshot.interface_name = props.interface_name;
        snapshot.mtu = props.mtu;
    }

    if let Some(network_caps) = active.capabilities {
        snapshot.transports = Some(network_caps.transports);
        if caps.link_bandwidth {
            snapshot.downlink_kbps = network_caps.downlink_kbps;
            snapshot.uplink_kbps = network_caps.uplink_kbps;
        }
    }
}

/// Fill prefix and mask for the snapshot's address, picking one from the
/// link when the wireless subsystem had none
fn apply_address(snapshot: &mut NetworkSnapshot, addresses: &[InterfaceAddress]) {
    let chosen = match snapshot.ip_address.as_deref() {
        Some(ip) => addresses.iter().find(|a| a.address.to_string() == ip).copied(),
        None => primary_address(addresses),
    };
    let Some(chosen) = chosen else {
        return;
    };

    snapshot.ip_address = Some(chosen.address.to_string());
    snapshot.prefix_length = Some(chosen.prefix_length);
    if chosen.address.is_ipv4() {
        snapshot.subnet_mask = ipv4_mask(chosen.prefix_length).map(|m| m.to_string());
    }
}

/// Remove the quote characters the OS wraps around an SSID
///
/// Returns `None` for an empty name or the hidden-SSID placeholder.
pub fn normalize_ssid(raw: &str) -> Option<String> {
    let ssid = raw.replace('"', "");
    if ssid.is_empty() || ssid == UNKNOWN_SSID {
        None
    } else {
        Some(ssid)
    }
}

/// Gateway of the first route that has one, in route-table order
///
/// This is first-match, not best-route: metrics and prefixes are ignored.
pub fn first_gateway(routes: &[RouteInfo]) -> Option<IpAddr> {
    routes.iter().find_map(|route| route.gateway)
}

/// The first [`MAX_DNS_SERVERS`] resolvers, order kept
pub fn leading_dns_servers(servers: &[IpAddr]) -> &[IpAddr] {
    &servers[..servers.len().min(MAX_DNS_SERVERS)]
}

/// First assigned IPv4 address, otherwise the first assigned address
pub fn primary_address(addresses: &[InterfaceAddress]) -> Option<InterfaceAddress> {
    let mut assigned = addresses.iter().filter(|a| is_assigned(&a.address));
    let first = assigned.clone().next().copied();
    assigned.find(|a| a.address.is_ipv4()).copied().or(first)
}

fn ipv4_mask(prefix_length: u8) -> Option<Ipv4Addr> {
    match prefix_length {
        0 => Some(Ipv4Addr::UNSPECIFIED),
        1..=32 => Some(Ipv4Addr::from(u32::MAX << (32 - u32::from(prefix_length)))),
        _ => None,
    }
}

fn is_assigned(ip: &IpAddr) -> bool {
    !ip.is_unspecified()
}
