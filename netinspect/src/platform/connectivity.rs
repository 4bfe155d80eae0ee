//! Connectivity source backed by procfs and sysfs
//!
//! The active network is the interface carrying the up default route with
//! the lowest metric in `/proc/net/route`. Its link properties come from the same table,
//! `resolv.conf`, `/sys/class/net/<if>` and the address book.

use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::net::{IpAddr, Ipv4Addr};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::SourceResult;
use crate::source::{
    ConnectivitySource, LinkProperties, NetworkCapabilities, NetworkHandle, RouteInfo,
};
use crate::types::Transport;

use super::addresses::AddressBook;

const RTF_UP: u16 = 0x0001;
const RTF_GATEWAY: u16 = 0x0002;

const ARPHRD_ETHER: u32 = 1;
const ARPHRD_RAWIP: u32 = 519;
const ARPHRD_NONE: u32 = 65534;

/// One row of `/proc/net/route`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteEntry {
    pub interface: String,
    pub destination: Ipv4Addr,
    pub gateway: Ipv4Addr,
    pub flags: u16,
    pub metric: u32,
    pub mask: Ipv4Addr,
}

impl RouteEntry {
    pub fn is_up(&self) -> bool {
        self.flags & RTF_UP != 0
    }

    pub fn is_default(&self) -> bool {
        self.destination.is_unspecified() && self.mask.is_unspecified()
    }

    pub fn next_hop(&self) -> Option<Ipv4Addr> {
        (self.flags & RTF_GATEWAY != 0 && !self.gateway.is_unspecified()).then_some(self.gateway)
    }

    pub fn prefix_length(&self) -> u32 {
        u32::from(self.mask).count_ones()
    }

    fn to_route_info(&self) -> RouteInfo {
        RouteInfo {
            destination: format!("{}/{}", self.destination, self.prefix_length()),
            gateway: self.next_hop().map(IpAddr::V4),
            interface_name: Some(self.interface.clone()),
        }
    }
}

/// Parse the IPv4 route table, skipping the header and malformed rows
pub fn parse_route_table(content: &str) -> Vec<RouteEntry> {
    content
        .lines()
        .skip(1)
        .filter_map(|line| {
            let entry = parse_route_line(line);
            if entry.is_none() && !line.trim().is_empty() {
                tracing::debug!("Skipping malformed route line: {:?}", line);
            }
            entry
        })
        .collect()
}

fn parse_route_line(line: &str) -> Option<RouteEntry> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < 8 {
        return None;
    }

    Some(RouteEntry {
        interface: fields[0].to_string(),
        destination: parse_hex_ipv4(fields[1])?,
        gateway: parse_hex_ipv4(fields[2])?,
        flags: u16::from_str_radix(fields[3], 16).ok()?,
        metric: fields[6].parse().ok()?,
        mask: parse_hex_ipv4(fields[7])?,
    })
}

/// Addresses in the route table are printed as host-order hex words
fn parse_hex_ipv4(hex: &str) -> Option<Ipv4Addr> {
    u32::from_str_radix(hex, 16)
        .ok()
        .map(|word| Ipv4Addr::from(word.to_ne_bytes()))
}

/// `nameserver` entries of a resolver config, in file order
pub fn parse_resolv_conf(content: &str) -> Vec<IpAddr> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.starts_with('#') && !line.starts_with(';'))
        .filter_map(|line| {
            let mut parts = line.split_whitespace();
            match (parts.next(), parts.next()) {
                (Some("nameserver"), Some(addr)) => {
                    // Drop an IPv6 zone suffix such as "%wlan0"
                    let addr = addr.split('%').next().unwrap_or(addr);
                    addr.parse().ok()
                }
                _ => None,
            }
        })
        .collect()
}

/// Connectivity source for Linux hosts
pub struct LinuxConnectivity {
    proc_root: PathBuf,
    sys_root: PathBuf,
    resolv_conf: PathBuf,
    addresses: Arc<dyn AddressBook>,
}

impl LinuxConnectivity {
    pub fn new(
        proc_root: impl Into<PathBuf>,
        sys_root: impl Into<PathBuf>,
        resolv_conf: impl Into<PathBuf>,
        addresses: Arc<dyn AddressBook>,
    ) -> Self {
        Self {
            proc_root: proc_root.into(),
            sys_root: sys_root.into(),
            resolv_conf: resolv_conf.into(),
            addresses,
        }
    }

    fn read_route_table(&self) -> SourceResult<Vec<RouteEntry>> {
        let content = fs::read_to_string(self.proc_root.join("net").join("route"))?;
        Ok(parse_route_table(&content))
    }

    fn interface_dir(&self, interface: &str) -> PathBuf {
        self.sys_root.join("class").join("net").join(interface)
    }

    fn read_dns_servers(&self) -> SourceResult<Vec<IpAddr>> {
        match read_optional(&self.resolv_conf)? {
            Some(content) => Ok(parse_resolv_conf(&content)),
            None => {
                tracing::debug!("No resolver config at {}", self.resolv_conf.display());
                Ok(Vec::new())
            }
        }
    }

    fn transports(&self, dir: &Path) -> SourceResult<BTreeSet<Transport>> {
        let mut transports = BTreeSet::new();

        let link_type = read_optional(&dir.join("type"))?.and_then(|t| t.trim().parse::<u32>().ok());
        let uevent = read_optional(&dir.join("uevent"))?.unwrap_or_default();
        let is_wwan = uevent.lines().any(|line| line.trim() == "DEVTYPE=wwan");

        if dir.join("wireless").exists() || dir.join("phy80211").exists() {
            transports.insert(Transport::Wifi);
        } else if is_wwan || matches!(link_type, Some(ARPHRD_RAWIP | ARPHRD_NONE)) {
            transports.insert(Transport::Cellular);
        } else if link_type == Some(ARPHRD_ETHER) {
            transports.insert(Transport::Ethernet);
        }

        Ok(transports)
    }
}

impl ConnectivitySource for LinuxConnectivity {
    fn active_network(&self) -> SourceResult<Option<NetworkHandle>> {
        let table = self.read_route_table()?;

        // min_by_key keeps the first of equal metrics
        let active = table
            .iter()
            .filter(|route| route.is_up() && route.is_default())
            .min_by_key(|route| route.metric)
            .map(|route| NetworkHandle::new(route.interface.clone()));

        Ok(active)
    }

    fn link_properties(&self, network: &NetworkHandle) -> SourceResult<Option<LinkProperties>> {
        let interface = network.id.as_str();

        let routes = self
            .read_route_table()?
            .iter()
            .filter(|route| route.interface == interface)
            .map(RouteEntry::to_route_info)
            .collect();

        let mtu = read_optional(&self.interface_dir(interface).join("mtu"))?
            .and_then(|mtu| mtu.trim().parse().ok());

        Ok(Some(LinkProperties {
            interface_name: Some(interface.to_string()),
            addresses: self.addresses.addresses(interface),
            routes,
            dns_servers: self.read_dns_servers()?,
            mtu,
        }))
    }

    fn network_capabilities(
        &self,
        network: &NetworkHandle,
    ) -> SourceResult<Option<NetworkCapabilities>> {
        let dir = self.interface_dir(&network.id);
        if !dir.exists() {
            tracing::debug!("No sysfs entry for {}", network.id);
            return Ok(None);
        }

        // Drivers without a speed report fail the read with EINVAL
        let bandwidth_kbps = fs::read_to_string(dir.join("speed"))
            .ok()
            .and_then(|speed| speed.trim().parse::<i64>().ok())
            .filter(|mbps| *mbps > 0)
            .map(|mbps| u32::try_from(mbps.saturating_mul(1000)).unwrap_or(u32::MAX));

        Ok(Some(NetworkCapabilities {
            transports: self.transports(&dir)?,
            downlink_kbps: bandwidth_kbps,
            uplink_kbps: bandwidth_kbps,
        }))
    }
}

/// Read a file, treating a missing file as `None`
pub(crate) fn read_optional(path: &Path) -> SourceResult<Option<String>> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::InterfaceAddress;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn hex(ip: [u8; 4]) -> String {
        format!("{:08X}", u32::from_ne_bytes(ip))
    }

    fn route_line(iface: &str, dest: [u8; 4], gw: [u8; 4], flags: u16, metric: u32, mask: [u8; 4]) -> String {
        format!(
            "{}\t{}\t{}\t{:04X}\t0\t0\t{}\t{}\t0\t0\t0",
            iface,
            hex(dest),
            hex(gw),
            flags,
            metric,
            hex(mask)
        )
    }

    const HEADER: &str =
        "Iface\tDestination\tGateway \tFlags\tRefCnt\tUse\tMetric\tMask\t\tMTU\tWindow\tIRTT";

    struct FakeHost {
        dir: TempDir,
    }

    impl FakeHost {
        fn new() -> Self {
            let dir = TempDir::new().unwrap();
            fs::create_dir_all(dir.path().join("proc/net")).unwrap();
            fs::create_dir_all(dir.path().join("sys/class/net")).unwrap();
            fs::create_dir_all(dir.path().join("etc")).unwrap();
            Self { dir }
        }

        fn routes(&self, lines: &[String]) {
            let mut content = String::from(HEADER);
            for line in lines {
                content.push('\n');
                content.push_str(line);
            }
            content.push('\n');
            fs::write(self.dir.path().join("proc/net/route"), content).unwrap();
        }

        fn iface(&self, name: &str, files: &[(&str, &str)]) {
            let dir = self.dir.path().join("sys/class/net").join(name);
            fs::create_dir_all(&dir).unwrap();
            for (file, content) in files {
                if content.is_empty() {
                    fs::create_dir_all(dir.join(file)).unwrap();
                } else {
                    fs::write(dir.join(file), content).unwrap();
                }
            }
        }

        fn resolv(&self, content: &str) {
            fs::write(self.dir.path().join("etc/resolv.conf"), content).unwrap();
        }

        fn source(&self) -> LinuxConnectivity {
            let mut book: HashMap<String, Vec<InterfaceAddress>> = HashMap::new();
            book.insert(
                "eth0".into(),
                vec![InterfaceAddress {
                    address: "192.168.0.10".parse().unwrap(),
                    prefix_length: 24,
                }],
            );
            LinuxConnectivity::new(
                self.dir.path().join("proc"),
                self.dir.path().join("sys"),
                self.dir.path().join("etc/resolv.conf"),
                Arc::new(book),
            )
        }
    }

    #[test]
    fn test_parse_hex_ipv4() {
        assert_eq!(
            parse_hex_ipv4(&hex([192, 168, 0, 1])),
            Some(Ipv4Addr::new(192, 168, 0, 1))
        );
        assert_eq!(parse_hex_ipv4("00000000"), Some(Ipv4Addr::UNSPECIFIED));
        assert_eq!(parse_hex_ipv4("zz"), None);
    }

    #[test]
    fn test_parse_route_table_skips_garbage() {
        let content = format!(
            "{}\n{}\nnot a route\n",
            HEADER,
            route_line("eth0", [0, 0, 0, 0], [192, 168, 0, 1], 0x3, 100, [0, 0, 0, 0])
        );
        let table = parse_route_table(&content);
        assert_eq!(table.len(), 1);
        assert!(table[0].is_default());
        assert!(table[0].is_up());
        assert_eq!(table[0].next_hop(), Some(Ipv4Addr::new(192, 168, 0, 1)));
        assert_eq!(table[0].prefix_length(), 0);
    }

    #[test]
    fn test_parse_resolv_conf() {
        let content = "# generated\nsearch lan\nnameserver 10.10.92.99\n; old\nnameserver fe80::1%wlan0\nnameserver bogus\noptions edns0\n";
        let servers = parse_resolv_conf(content);
        assert_eq!(
            servers,
            vec![
                "10.10.92.99".parse::<IpAddr>().unwrap(),
                "fe80::1".parse::<IpAddr>().unwrap()
            ]
        );
    }

    #[test]
    fn test_active_network_prefers_lowest_metric() {
        let host = FakeHost::new();
        host.routes(&[
            route_line("wlan0", [0, 0, 0, 0], [10, 0, 0, 1], 0x3, 600, [0, 0, 0, 0]),
            route_line("eth0", [0, 0, 0, 0], [192, 168, 0, 1], 0x3, 100, [0, 0, 0, 0]),
            route_line("eth0", [192, 168, 0, 0], [0, 0, 0, 0], 0x1, 100, [255, 255, 255, 0]),
        ]);

        let active = host.source().active_network().unwrap();
        assert_eq!(active, Some(NetworkHandle::new("eth0")));
    }

    #[test]
    fn test_active_network_metric_tie_takes_first() {
        let host = FakeHost::new();
        host.routes(&[
            route_line("wlan0", [0, 0, 0, 0], [10, 0, 0, 1], 0x3, 100, [0, 0, 0, 0]),
            route_line("eth0", [0, 0, 0, 0], [192, 168, 0, 1], 0x3, 100, [0, 0, 0, 0]),
            route_line("usb0", [0, 0, 0, 0], [172, 20, 0, 1], 0x2, 10, [0, 0, 0, 0]),
        ]);
        // usb0 has the lowest metric but its route is not up
        assert_eq!(
            host.source().active_network().unwrap(),
            Some(NetworkHandle::new("wlan0"))
        );
    }

    #[test]
    fn test_no_default_route_means_no_active_network() {
        let host = FakeHost::new();
        host.routes(&[route_line(
            "eth0",
            [192, 168, 0, 0],
            [0, 0, 0, 0],
            0x1,
            100,
            [255, 255, 255, 0],
        )]);
        assert_eq!(host.source().active_network().unwrap(), None);
    }

    #[test]
    fn test_missing_route_table_is_unavailable() {
        let host = FakeHost::new();
        let err = host.source().active_network().unwrap_err();
        assert!(err.is_unavailable());
    }

    #[test]
    fn test_link_properties() {
        let host = FakeHost::new();
        host.routes(&[
            route_line("eth0", [192, 168, 0, 0], [0, 0, 0, 0], 0x1, 100, [255, 255, 255, 0]),
            route_line("eth0", [0, 0, 0, 0], [192, 168, 0, 1], 0x3, 100, [0, 0, 0, 0]),
            route_line("wlan0", [0, 0, 0, 0], [10, 0, 0, 1], 0x3, 600, [0, 0, 0, 0]),
        ]);
        host.iface("eth0", &[("mtu", "1500\n")]);
        host.resolv("nameserver 8.8.8.8\nnameserver 8.8.4.4\nnameserver 1.1.1.1\n");

        let props = host
            .source()
            .link_properties(&NetworkHandle::new("eth0"))
            .unwrap()
            .unwrap();

        assert_eq!(props.interface_name.as_deref(), Some("eth0"));
        assert_eq!(props.mtu, Some(1500));
        assert_eq!(props.routes.len(), 2);
        assert_eq!(props.routes[0].destination, "192.168.0.0/24");
        assert_eq!(props.routes[0].gateway, None);
        assert_eq!(props.routes[1].gateway, Some("192.168.0.1".parse().unwrap()));
        // All resolvers are reported; the inspector applies the two-slot cap
        assert_eq!(props.dns_servers.len(), 3);
        assert_eq!(props.addresses.len(), 1);
    }

    #[test]
    fn test_link_properties_without_resolv_conf() {
        let host = FakeHost::new();
        host.routes(&[route_line("eth0", [0, 0, 0, 0], [192, 168, 0, 1], 0x3, 100, [0, 0, 0, 0])]);
        let props = host
            .source()
            .link_properties(&NetworkHandle::new("eth0"))
            .unwrap()
            .unwrap();
        assert!(props.dns_servers.is_empty());
        assert_eq!(props.mtu, None);
    }

    #[test]
    fn test_wifi_capabilities() {
        let host = FakeHost::new();
        host.iface("wlan0", &[("type", "1\n"), ("wireless", ""), ("speed", "-1\n")]);
        let caps = host
            .source()
            .network_capabilities(&NetworkHandle::new("wlan0"))
            .unwrap()
            .unwrap();
        assert_eq!(caps.transports, BTreeSet::from([Transport::Wifi]));
        assert_eq!(caps.downlink_kbps, None);
    }

    #[test]
    fn test_ethernet_capabilities_with_speed() {
        let host = FakeHost::new();
        host.iface("eth0", &[("type", "1\n"), ("speed", "1000\n")]);
        let caps = host
            .source()
            .network_capabilities(&NetworkHandle::new("eth0"))
            .unwrap()
            .unwrap();
        assert_eq!(caps.transports, BTreeSet::from([Transport::Ethernet]));
        assert_eq!(caps.downlink_kbps, Some(1_000_000));
        assert_eq!(caps.uplink_kbps, Some(1_000_000));
    }

    #[test]
    fn test_cellular_capabilities() {
        let host = FakeHost::new();
        host.iface("wwan0", &[("type", "519\n")]);
        host.iface("rmnet0", &[("type", "65534\n")]);
        host.iface("usb0", &[("type", "1\n"), ("uevent", "INTERFACE=usb0\nDEVTYPE=wwan\n")]);
        let source = host.source();

        for name in ["wwan0", "rmnet0", "usb0"] {
            let caps = source
                .network_capabilities(&NetworkHandle::new(name))
                .unwrap()
                .unwrap();
            assert_eq!(caps.transports, BTreeSet::from([Transport::Cellular]), "{}", name);
        }
    }

    #[test]
    fn test_unknown_interface_has_no_capabilities() {
        let host = FakeHost::new();
        let caps = host
            .source()
            .network_capabilities(&NetworkHandle::new("tun0"))
            .unwrap();
        assert!(caps.is_none());
    }
}
