//! Host capability level

use serde::{Deserialize, Serialize};

/// Which capability-gated fields the current host can report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostCapabilities {
    /// WiFi channel frequency can be read
    pub wireless_frequency: bool,
    /// Link bandwidth estimates can be read
    pub link_bandwidth: bool,
}

impl HostCapabilities {
    pub fn all() -> Self {
        Self {
            wireless_frequency: true,
            link_bandwidth: true,
        }
    }

    pub fn none() -> Self {
        Self {
            wireless_frequency: false,
            link_bandwidth: false,
        }
    }
}

impl Default for HostCapabilities {
    fn default() -> Self {
        Self::all()
    }
}
