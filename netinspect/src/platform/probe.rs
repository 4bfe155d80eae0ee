//! Capability detection for Linux hosts

use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

use crate::config::CapabilitiesConfig;
use crate::source::CapabilityProbe;
use crate::types::HostCapabilities;

use super::command::CommandRunner;

/// Detects which capability-gated fields this host can report
///
/// Frequency needs the `iw` tool; bandwidth needs sysfs. Detection runs
/// once per probe and is then reused.
pub struct LinuxCapabilityProbe {
    sys_root: PathBuf,
    iw_command: String,
    runner: Arc<dyn CommandRunner>,
    allowed: CapabilitiesConfig,
    detected: OnceLock<HostCapabilities>,
}

impl LinuxCapabilityProbe {
    pub fn new(
        sys_root: impl Into<PathBuf>,
        iw_command: impl Into<String>,
        runner: Arc<dyn CommandRunner>,
        allowed: CapabilitiesConfig,
    ) -> Self {
        Self {
            sys_root: sys_root.into(),
            iw_command: iw_command.into(),
            runner,
            allowed,
            detected: OnceLock::new(),
        }
    }

    fn detect(&self) -> HostCapabilities {
        let iw_available = self.allowed.wireless_frequency
            && self
                .runner
                .run(&self.iw_command, &["--version"])
                .map(|output| output.success())
                .unwrap_or(false);
        let sysfs_available =
            self.allowed.link_bandwidth && self.sys_root.join("class").join("net").is_dir();

        let capabilities = HostCapabilities {
            wireless_frequency: iw_available,
            link_bandwidth: sysfs_available,
        };
        tracing::debug!(?capabilities, "Host capabilities detected");
        capabilities
    }
}

impl CapabilityProbe for LinuxCapabilityProbe {
    fn probe(&self) -> HostCapabilities {
        *self.detected.get_or_init(|| self.detect())
    }
}
