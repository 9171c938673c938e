//! Registry of paired devices
//!
//! Devices are keyed by their stable long (IEEE) address and can also be
//! found by the short network address the coordinator routes with. The
//! registry is persisted as a single JSON snapshot, rewritten on every change.

pub mod registry;
pub mod snapshot;
pub mod types;

pub use registry::DeviceRegistry;
pub use types::{AddressParseError, Device, Endpoint, IeeeAddress, LogicalType, NetworkAddress};
