//! Wireless source backed by `/proc/net/wireless` and `iw`
//!
//! `/proc/net/wireless` tells whether the host has a wireless interface and
//! gives its signal level. Association details (SSID, BSSID, frequency,
//! bitrate) come from `iw dev <if> link`; when `iw` is missing those fields
//! are simply left out.

use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use crate::error::SourceResult;
use crate::inspector::primary_address;
use crate::source::{WirelessInfo, WirelessSource};

use super::addresses::AddressBook;
use super::command::CommandRunner;

/// One interface row of `/proc/net/wireless`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WirelessStatus {
    pub interface: String,
    pub signal_dbm: Option<i32>,
}

/// Parse `/proc/net/wireless`, skipping its two header lines
pub fn parse_proc_wireless(content: &str) -> Vec<WirelessStatus> {
    content
        .lines()
        .skip(2)
        .filter_map(|line| {
            let (interface, rest) = line.split_once(':')?;
            let fields: Vec<&str> = rest.split_whitespace().collect();
            // status, link quality, signal level, noise level, ...
            let signal_dbm = fields
                .get(2)
                .and_then(|level| level.trim_end_matches('.').parse::<f64>().ok())
                .map(|level| level.round() as i32)
                .filter(|level| *level != 0);

            Some(WirelessStatus {
                interface: interface.trim().to_string(),
                signal_dbm,
            })
        })
        .collect()
}

/// Association details from `iw dev <if> link`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkReport {
    pub connected: bool,
    pub bssid: Option<String>,
    pub ssid: Option<String>,
    pub frequency_mhz: Option<u32>,
    pub signal_dbm: Option<i32>,
    pub tx_bitrate_mbps: Option<u32>,
}

pub fn parse_iw_link(output: &str) -> LinkReport {
    let mut report = LinkReport::default();

    for line in output.lines().map(str::trim) {
        if let Some(rest) = line.strip_prefix("Connected to ") {
            report.connected = true;
            report.bssid = rest.split_whitespace().next().map(str::to_string);
        } else if let Some(ssid) = line.strip_prefix("SSID: ") {
            report.ssid = Some(unescape_ssid(ssid));
        } else if let Some(freq) = line.strip_prefix("freq: ") {
            report.frequency_mhz = first_number(freq).map(|mhz| mhz.round() as u32);
        } else if let Some(signal) = line.strip_prefix("signal: ") {
            report.signal_dbm = first_number(signal).map(|dbm| dbm.round() as i32);
        } else if let Some(bitrate) = line.strip_prefix("tx bitrate: ") {
            report.tx_bitrate_mbps = first_number(bitrate).map(|mbps| mbps.floor() as u32);
        }
    }

    report
}

/// Undo the `\xNN` and `\\` escapes `iw` prints for SSID bytes
fn unescape_ssid(raw: &str) -> String {
    let bytes = raw.as_bytes();
    let mut decoded = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        match (bytes[i], bytes.get(i + 1)) {
            (b'\\', Some(b'\\')) => {
                decoded.push(b'\\');
                i += 2;
            }
            (b'\\', Some(b'x')) => match hex_byte(bytes.get(i + 2..i + 4)) {
                Some(byte) => {
                    decoded.push(byte);
                    i += 4;
                }
                None => {
                    decoded.push(b'\\');
                    i += 1;
                }
            },
            (byte, _) => {
                decoded.push(byte);
                i += 1;
            }
        }
    }

    String::from_utf8_lossy(&decoded).into_owned()
}

fn hex_byte(digits: Option<&[u8]>) -> Option<u8> {
    match digits? {
        [hi, lo] => {
            let hi = char::from(*hi).to_digit(16)?;
            let lo = char::from(*lo).to_digit(16)?;
            u8::try_from(hi * 16 + lo).ok()
        }
        _ => None,
    }
}

fn first_number(text: &str) -> Option<f64> {
    text.split_whitespace().next()?.parse().ok()
}

/// Wireless source for Linux hosts
pub struct LinuxWireless {
    proc_root: PathBuf,
    iw_command: String,
    runner: Arc<dyn CommandRunner>,
    addresses: Arc<dyn AddressBook>,
}

impl LinuxWireless {
    pub fn new(
        proc_root: impl Into<PathBuf>,
        iw_command: impl Into<String>,
        runner: Arc<dyn CommandRunner>,
        addresses: Arc<dyn AddressBook>,
    ) -> Self {
        Self {
            proc_root: proc_root.into(),
            iw_command: iw_command.into(),
            runner,
            addresses,
        }
    }

    fn link_report(&self, interface: &str) -> Option<LinkReport> {
        match self.runner.run(&self.iw_command, &["dev", interface, "link"]) {
            Ok(output) if output.success() => Some(parse_iw_link(&output.stdout)),
            Ok(output) => {
                tracing::debug!(
                    "{} link failed for {}: {}",
                    self.iw_command,
                    interface,
                    output.stderr.trim()
                );
                None
            }
            Err(e) => {
                tracing::debug!("{} not runnable: {}", self.iw_command, e);
                None
            }
        }
    }
}

impl WirelessSource for LinuxWireless {
    fn wireless_info(&self) -> SourceResult<Option<WirelessInfo>> {
        let content = match fs::read_to_string(self.proc_root.join("net").join("wireless")) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let Some(status) = parse_proc_wireless(&content).into_iter().next() else {
            tracing::debug!("No wireless interfaces");
            return Ok(None);
        };

        let mut info = WirelessInfo {
            interface_name: Some(status.interface.clone()),
            signal_dbm: status.signal_dbm,
            ..Default::default()
        };

        if let Some(report) = self.link_report(&status.interface) {
            if report.connected {
                info.ssid = report.ssid;
                info.bssid = report.bssid;
                info.frequency_mhz = report.frequency_mhz;
                info.link_speed_mbps = report.tx_bitrate_mbps;
                info.signal_dbm = report.signal_dbm.or(info.signal_dbm);
            }
        }

        info.ip_address =
            primary_address(&self.addresses.addresses(&status.interface)).map(|a| a.address);

        Ok(Some(info))
    }
}
