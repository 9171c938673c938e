//! Application-layer protocol vocabulary
//!
//! Cluster identifiers, status codes, the closed set of commands the
//! coordinator can issue, and the cluster catalog describing which command
//! each cluster accepts under which identifier. Wire encoding lives behind
//! [`crate::commands::FrameCodec`].

pub mod catalog;
pub mod command;
pub mod frame;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use catalog::{ClusterCatalog, ClusterDescriptor, CommandDescriptor, StandardCatalog};
pub use command::{Command, CommandShape, HueDirection, MoveMode};
pub use frame::{Direction, FrameHeader, FrameType, IncomingCommand, IncomingMessage};

/// Cluster identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClusterId(pub u16);

impl ClusterId {
    pub const BASIC: Self = Self(0x0000);
    pub const IDENTIFY: Self = Self(0x0003);
    pub const GROUPS: Self = Self(0x0004);
    pub const SCENES: Self = Self(0x0005);
    pub const ON_OFF: Self = Self(0x0006);
    pub const LEVEL_CONTROL: Self = Self(0x0008);
    pub const COLOR_CONTROL: Self = Self(0x0300);

    /// Well-known name of the cluster, if it is one of the standard ones
    #[must_use]
    pub const fn name(self) -> Option<&'static str> {
        match self.0 {
            0x0000 => Some("Basic"),
            0x0003 => Some("Identify"),
            0x0004 => Some("Groups"),
            0x0005 => Some("Scenes"),
            0x0006 => Some("OnOff"),
            0x0008 => Some("LevelControl"),
            0x0300 => Some("ColorControl"),
            _ => None,
        }
    }
}

impl fmt::Display for ClusterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u16> for ClusterId {
    fn from(raw: u16) -> Self {
        Self(raw)
    }
}

/// Status code carried by a default response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ZclStatus(pub u8);

impl ZclStatus {
    pub const SUCCESS: Self = Self(0x00);
    pub const FAILURE: Self = Self(0x01);
    pub const NOT_AUTHORIZED: Self = Self(0x7e);
    pub const MALFORMED_COMMAND: Self = Self(0x80);
    pub const UNSUP_CLUSTER_COMMAND: Self = Self(0x81);
    pub const UNSUP_GENERAL_COMMAND: Self = Self(0x82);
    pub const INVALID_FIELD: Self = Self(0x85);
    pub const UNSUPPORTED_ATTRIBUTE: Self = Self(0x86);
    pub const INVALID_VALUE: Self = Self(0x87);
    pub const INSUFFICIENT_SPACE: Self = Self(0x89);
    pub const NOT_FOUND: Self = Self(0x8b);
    pub const TIMEOUT: Self = Self(0x94);
    pub const HARDWARE_FAILURE: Self = Self(0xc0);
    pub const SOFTWARE_FAILURE: Self = Self(0xc1);

    #[must_use]
    pub const fn code(self) -> u8 {
        self.0
    }

    #[must_use]
    pub const fn is_success(self) -> bool {
        self.0 == Self::SUCCESS.0
    }

    #[must_use]
    pub const fn name(self) -> Option<&'static str> {
        match self.0 {
            0x00 => Some("SUCCESS"),
            0x01 => Some("FAILURE"),
            0x7e => Some("NOT_AUTHORIZED"),
            0x80 => Some("MALFORMED_COMMAND"),
            0x81 => Some("UNSUP_CLUSTER_COMMAND"),
            0x82 => Some("UNSUP_GENERAL_COMMAND"),
            0x85 => Some("INVALID_FIELD"),
            0x86 => Some("UNSUPPORTED_ATTRIBUTE"),
            0x87 => Some("INVALID_VALUE"),
            0x89 => Some("INSUFFICIENT_SPACE"),
            0x8b => Some("NOT_FOUND"),
            0x94 => Some("TIMEOUT"),
            0xc0 => Some("HARDWARE_FAILURE"),
            0xc1 => Some("SOFTWARE_FAILURE"),
            _ => None,
        }
    }
}

impl fmt::Display for ZclStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{} ({name})", self.0),
            None => write!(f, "{}", self.0),
        }
    }
}
