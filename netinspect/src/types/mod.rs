//! Response types for network inspection

mod bridge;
mod capabilities;
mod snapshot;

pub use bridge::*;
pub use capabilities::*;
pub use snapshot::*;
