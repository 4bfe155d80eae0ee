//! Linux implementations of the capability objects
//!
//! Everything is read from procfs, sysfs, `resolv.conf` and the `iw` tool,
//! rooted at configurable paths. On hosts without these the sources report
//! their subsystems as unavailable and the snapshot comes back empty.

pub mod addresses;
pub mod command;
pub mod connectivity;
pub mod probe;
pub mod wireless;

use std::sync::Arc;

use crate::config::Config;
use crate::inspector::NetworkInspector;

pub use addresses::{AddressBook, SysinfoAddressBook};
pub use command::{CommandOutput, CommandRunner, SystemCommandRunner};
pub use connectivity::LinuxConnectivity;
pub use probe::LinuxCapabilityProbe;
pub use wireless::LinuxWireless;

/// Build an inspector for the local host
pub fn host_inspector(config: &Config) -> NetworkInspector {
    let runner: Arc<dyn CommandRunner> = Arc::new(SystemCommandRunner);
    let addresses: Arc<dyn AddressBook> = Arc::new(SysinfoAddressBook);
    inspector_with(config, runner, addresses)
}

/// Build an inspector with caller-supplied command runner and address book
pub fn inspector_with(
    config: &Config,
    runner: Arc<dyn CommandRunner>,
    addresses: Arc<dyn AddressBook>,
) -> NetworkInspector {
    let sources = &config.sources;

    let wireless = LinuxWireless::new(
        &sources.proc_root,
        sources.iw_command.clone(),
        runner.clone(),
        addresses.clone(),
    );
    let connectivity = LinuxConnectivity::new(
        &sources.proc_root,
        &sources.sys_root,
        &sources.resolv_conf,
        addresses,
    );
    let probe = LinuxCapabilityProbe::new(
        &sources.sys_root,
        sources.iw_command.clone(),
        runner,
        config.capabilities,
    );

    tracing::debug!(
        proc_root = %sources.proc_root.display(),
        sys_root = %sources.sys_root.display(),
        "Building host inspector"
    );

    NetworkInspector::new(Arc::new(wireless), Arc::new(connectivity), Arc::new(probe))
}
