//! Steward - control plane of a mesh-network coordinator
//!
//! This library provides the two stateful pieces of the coordinator:
//! - A durable registry of paired devices, addressable by long (IEEE) and
//!   short (network) address
//! - A command dispatcher that resolves typed cluster commands to their wire
//!   identifiers, sends them, and interprets the device's acknowledgement
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                     Callers                         │
//! │     pairing  │  automations  │  steward CLI         │
//! └──────────┬──────────────────────────┬───────────────┘
//!            │                          │
//! ┌──────────▼──────────┐   ┌───────────▼───────────────┐
//! │   DeviceRegistry    │   │    CommandDispatcher      │
//! │  devices.json (RW)  │   │  CommandIndex (read-only) │
//! └─────────────────────┘   └───────────┬───────────────┘
//!                                       │
//! ┌─────────────────────────────────────▼───────────────┐
//! │        FrameCodec  │  Transport (radio / serial)    │
//! └─────────────────────────────────────────────────────┘
//! ```

pub mod commands;
pub mod config;
pub mod devices;
pub mod error;
pub mod zcl;

pub use commands::{CommandDispatcher, CommandError, CommandIndex, FrameCodec, Transport};
pub use config::Config;
pub use devices::{Device, DeviceRegistry, IeeeAddress, NetworkAddress};
pub use error::{Error, Result};
pub use zcl::{ClusterCatalog, ClusterId, Command, CommandShape, StandardCatalog, ZclStatus};
