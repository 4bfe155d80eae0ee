//! Interface address lookup

use std::collections::HashMap;

use sysinfo::Networks;

use crate::source::InterfaceAddress;

/// Looks up the addresses assigned to an interface
pub trait AddressBook: Send + Sync {
    /// Addresses of `interface`, empty if it has none or does not exist
    fn addresses(&self, interface: &str) -> Vec<InterfaceAddress>;
}

/// Address book backed by the host's interface list
#[derive(Debug, Clone, Copy, Default)]
pub struct SysinfoAddressBook;

impl AddressBook for SysinfoAddressBook {
    fn addresses(&self, interface: &str) -> Vec<InterfaceAddress> {
        let networks = Networks::new_with_refreshed_list();

        networks
            .iter()
            .find(|(name, _)| name.as_str() == interface)
            .map(|(_, data)| {
                data.ip_networks()
                    .iter()
                    .map(|ip| InterfaceAddress {
                        address: ip.addr,
                        prefix_length: ip.prefix,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Fixed address table, keyed by interface name
impl AddressBook for HashMap<String, Vec<InterfaceAddress>> {
    fn addresses(&self, interface: &str) -> Vec<InterfaceAddress> {
        self.get(interface).cloned().unwrap_or_default()
    }
}
