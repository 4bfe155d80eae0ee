//! End-to-end inspection against a fake procfs/sysfs tree
//!
//! Builds a host layout in a temp dir, points the config at it and checks the
//! snapshot and bridge map the Linux sources produce.
//!
//! The live-host test is ignored by default:
//!
//! ```bash
//! cargo test -p netinspect --test host_tree -- --ignored
//! ```

use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::io;
use std::path::Path;
use std::sync::Arc;

use netinspect::platform::{self, AddressBook, CommandOutput, CommandRunner};
use netinspect::source::InterfaceAddress;
use netinspect::{to_bridge_map, Config, InspectError, Transport};
use tempfile::TempDir;

const PROC_WIRELESS: &str = "Inter-| sta-|   Quality        |   Discarded packets               | Missed | WE
 face | tus | link level noise |  nwid  crypt   frag  retry   misc | beacon | 22
 wlan0: 0000   54.  -56.  -256        0      0      0      0      0        0
";

const IW_LINK: &str = "Connected to aa:bb:cc:dd:ee:ff (on wlan0)
\tSSID: \"MyNetwork\"
\tfreq: 5180
\tsignal: -48 dBm
\ttx bitrate: 866.7 MBit/s VHT-MCS 9 80MHz short GI VHT-NSS 2
";

/// Stands in for `iw`
struct FakeIw;

impl CommandRunner for FakeIw {
    fn run(&self, _program: &str, args: &[&str]) -> io::Result<CommandOutput> {
        let stdout = match args {
            ["--version"] => "iw version 5.19\n",
            ["dev", "wlan0", "link"] => IW_LINK,
            _ => return Ok(CommandOutput { exit_code: 1, ..Default::default() }),
        };
        Ok(CommandOutput {
            stdout: stdout.to_string(),
            stderr: String::new(),
            exit_code: 0,
        })
    }
}

fn hex(ip: [u8; 4]) -> String {
    format!("{:08X}", u32::from_ne_bytes(ip))
}

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// Laptop on WiFi with a (higher-metric) wired link also up
fn laptop_tree() -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path();

    let route = |iface: &str, dest: [u8; 4], gw: [u8; 4], flags: &str, metric: u32, mask: [u8; 4]| {
        format!(
            "{}\t{}\t{}\t{}\t0\t0\t{}\t{}\t0\t0\t0\n",
            iface,
            hex(dest),
            hex(gw),
            flags,
            metric,
            hex(mask)
        )
    };
    let mut table =
        String::from("Iface\tDestination\tGateway \tFlags\tRefCnt\tUse\tMetric\tMask\t\tMTU\tWindow\tIRTT\n");
    table += &route("wlan0", [10, 82, 0, 0], [0, 0, 0, 0], "0001", 600, [255, 255, 0, 0]);
    table += &route("wlan0", [0, 0, 0, 0], [10, 82, 0, 1], "0003", 50, [0, 0, 0, 0]);
    table += &route("wlan0", [0, 0, 0, 0], [10, 82, 0, 2], "0003", 60, [0, 0, 0, 0]);
    table += &route("eth0", [0, 0, 0, 0], [192, 168, 0, 1], "0003", 100, [0, 0, 0, 0]);
    write(root, "proc/net/route", &table);
    write(root, "proc/net/wireless", PROC_WIRELESS);

    write(root, "sys/class/net/wlan0/type", "1\n");
    write(root, "sys/class/net/wlan0/mtu", "1500\n");
    fs::create_dir_all(root.join("sys/class/net/wlan0/wireless")).unwrap();
    write(root, "sys/class/net/eth0/type", "1\n");
    write(root, "sys/class/net/eth0/speed", "1000\n");

    write(
        root,
        "etc/resolv.conf",
        "nameserver 10.10.92.99\nnameserver 10.10.92.98\nnameserver 1.1.1.1\n",
    );

    dir
}

fn config_for(root: &Path) -> Config {
    let mut config = Config::default();
    config.sources.proc_root = root.join("proc");
    config.sources.sys_root = root.join("sys");
    config.sources.resolv_conf = root.join("etc/resolv.conf");
    config
}

fn address_book() -> Arc<dyn AddressBook> {
    let mut book: HashMap<String, Vec<InterfaceAddress>> = HashMap::new();
    book.insert(
        "wlan0".into(),
        vec![InterfaceAddress {
            address: "10.82.33.136".parse().unwrap(),
            prefix_length: 16,
        }],
    );
    Arc::new(book)
}

#[test]
fn inspects_wifi_laptop() {
    let tree = laptop_tree();
    let inspector =
        platform::inspector_with(&config_for(tree.path()), Arc::new(FakeIw), address_book());

    let snapshot = inspector.inspect().unwrap();

    assert_eq!(snapshot.ip_address.as_deref(), Some("10.82.33.136"));
    assert_eq!(snapshot.subnet_mask.as_deref(), Some("255.255.0.0"));
    assert_eq!(snapshot.ssid.as_deref(), Some("MyNetwork"));
    assert_eq!(snapshot.bssid.as_deref(), Some("aa:bb:cc:dd:ee:ff"));
    assert_eq!(snapshot.frequency_mhz, Some(5180));
    assert_eq!(snapshot.signal_strength_dbm, Some(-48));
    assert_eq!(snapshot.link_speed_mbps, Some(866));
    assert_eq!(snapshot.interface_name.as_deref(), Some("wlan0"));
    assert_eq!(snapshot.gateway.as_deref(), Some("10.82.0.1"));
    assert_eq!(snapshot.dns_servers, vec!["10.10.92.99", "10.10.92.98"]);
    assert_eq!(snapshot.mtu, Some(1500));
    assert_eq!(snapshot.transports, Some(BTreeSet::from([Transport::Wifi])));
    assert_eq!(snapshot.downlink_kbps, None);
}

#[test]
fn bridge_map_matches_plugin_keys() {
    let tree = laptop_tree();
    let inspector =
        platform::inspector_with(&config_for(tree.path()), Arc::new(FakeIw), address_book());

    let map = to_bridge_map(&inspector.inspect().unwrap());

    assert_eq!(map["dns1"], "10.10.92.99");
    assert_eq!(map["dns2"], "10.10.92.98");
    assert_eq!(map["hasWifi"], true);
    assert_eq!(map["hasEthernet"], false);
    assert_eq!(map["connectionType"], "wifi");
    assert_eq!(map["rssi"], -48);
    assert_eq!(map["networkPrefixLength"], 16);
    assert!(!map.contains_key("downlinkBandwidth"));
}

#[test]
fn capability_config_hides_frequency() {
    let tree = laptop_tree();
    let mut config = config_for(tree.path());
    config.capabilities.wireless_frequency = false;
    let inspector = platform::inspector_with(&config, Arc::new(FakeIw), address_book());

    let snapshot = inspector.inspect().unwrap();
    assert!(snapshot.frequency_mhz.is_none());
    assert_eq!(snapshot.ssid.as_deref(), Some("MyNetwork"));
}

#[test]
fn empty_host_gives_empty_snapshot() {
    let dir = TempDir::new().unwrap();
    let inspector =
        platform::inspector_with(&config_for(dir.path()), Arc::new(FakeIw), address_book());

    let snapshot = inspector.inspect().unwrap();
    assert_eq!(snapshot, Default::default());
    assert!(to_bridge_map(&snapshot).is_empty());
}

#[cfg(unix)]
#[test]
fn unreadable_route_table_is_a_query_failure() {
    use std::os::unix::fs::PermissionsExt;

    let tree = laptop_tree();
    let route = tree.path().join("proc/net/route");
    fs::set_permissions(&route, fs::Permissions::from_mode(0o000)).unwrap();
    if fs::read_to_string(&route).is_ok() {
        eprintln!("Skipping: running with permission to read mode-000 files");
        return;
    }

    let inspector =
        platform::inspector_with(&config_for(tree.path()), Arc::new(FakeIw), address_book());
    let result = inspector.inspect();

    assert!(matches!(result, Err(InspectError::QueryFailure(ref msg)) if msg.contains("permission denied")));
}

#[test]
#[ignore = "reads the live host network state"]
fn live_host_inspection_is_total() {
    let inspector = platform::host_inspector(&Config::default());
    match inspector.inspect() {
        Ok(snapshot) => assert!(snapshot.dns_servers.len() <= 2),
        Err(InspectError::QueryFailure(msg)) => assert!(!msg.is_empty()),
    }
}
