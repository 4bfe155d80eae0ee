//! Network Inspector Library
//!
//! Reads the state of the host's active network in one synchronous call:
//! WiFi association details, the address, gateway and DNS configuration of
//! the default-route interface, its MTU, transport flags and bandwidth.
//!
//! Every OS subsystem is reached through an injected capability object
//! (see [`source`]), so the inspector holds no global state and can run
//! against fakes. [`platform`] provides the real Linux implementations.
//!
//! # Usage as Library
//!
//! ```rust,ignore
//! use netinspect::{platform, Config};
//!
//! let config = Config::load(None)?;
//! let inspector = platform::host_inspector(&config);
//! let snapshot = inspector.inspect()?;
//! println!("gateway: {:?}", snapshot.gateway);
//! ```
//!
//! # Usage as Binary
//!
//! Run directly: `netinspect inspect --format bridge`

pub mod config;
pub mod error;
pub mod inspector;
pub mod logging;
pub mod platform;
pub mod source;
pub mod types;

pub use config::Config;
pub use error::{InspectError, SourceError, SourceResult};
pub use inspector::NetworkInspector;
pub use types::{to_bridge_map, HostCapabilities, NetworkSnapshot, Transport};
