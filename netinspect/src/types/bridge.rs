//! Flat key-value rendering of a snapshot
//!
//! Host applications written against the mobile NetworkConfig plugin expect a flat
//! map with fixed key names (`dns1`/`dns2`, `hasWifi`, `rssi`, ...). Only
//! keys with a value are emitted.

use serde_json::{Map, Value};

use super::{NetworkSnapshot, Transport};

/// Render a snapshot as the flat bridge response
pub fn to_bridge_map(snapshot: &NetworkSnapshot) -> Map<String, Value> {
    let mut map = Map::new();

    put(&mut map, "ipAddress", snapshot.ip_address.clone());
    put(&mut map, "networkPrefixLength", snapshot.prefix_length);
    put(&mut map, "subnetMask", snapshot.subnet_mask.clone());

    put(&mut map, "ssid", snapshot.ssid.clone());
    put(&mut map, "bssid", snapshot.bssid.clone());
    put(&mut map, "linkSpeed", snapshot.link_speed_mbps);
    put(&mut map, "rssi", snapshot.signal_strength_dbm);
    put(&mut map, "frequency", snapshot.frequency_mhz);

    put(&mut map, "gateway", snapshot.gateway.clone());
    put(&mut map, "dns1", snapshot.dns_servers.first().cloned());
    put(&mut map, "dns2", snapshot.dns_servers.get(1).cloned());
    put(&mut map, "interfaceName", snapshot.interface_name.clone());
    put(&mut map, "mtu", snapshot.mtu);

    if snapshot.transports.is_some() {
        map.insert("hasWifi".into(), snapshot.has_transport(Transport::Wifi).into());
        map.insert("hasCellular".into(), snapshot.has_transport(Transport::Cellular).into());
        map.insert("hasEthernet".into(), snapshot.has_transport(Transport::Ethernet).into());
    }
    put(
        &mut map,
        "connectionType",
        snapshot.connection_type().map(|t| t.as_str()),
    );
    put(&mut map, "downlinkBandwidth", snapshot.downlink_kbps);
    put(&mut map, "uplinkBandwidth", snapshot.uplink_kbps);

    map
}

fn put<V: Into<Value>>(map: &mut Map<String, Value>, key: &str, value: Option<V>) {
    if let Some(value) = value {
        map.insert(key.to_string(), value.into());
    }
}
