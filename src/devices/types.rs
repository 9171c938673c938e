//! Device record and address types

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Failure to parse a device address
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressParseError {
    #[error("'{0}' is not a long address (expected 00:11:22:33:44:55:66:77 or 0x0011223344556677)")]
    Ieee(String),

    #[error("'{0}' is not a short address (expected 0x1234)")]
    Network(String),
}

/// Stable 64-bit device identifier assigned by the manufacturer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IeeeAddress(pub u64);

impl IeeeAddress {
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for IeeeAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bytes = self.0.to_be_bytes();
        for (i, byte) in bytes.iter().enumerate() {
            if i > 0 {
                f.write_str(":")?;
            }
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl FromStr for IeeeAddress {
    type Err = AddressParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || AddressParseError::Ieee(s.to_string());
        let trimmed = s.trim();

        if trimmed.contains(':') {
            let octets: Vec<&str> = trimmed.split(':').collect();
            if octets.len() != 8 {
                return Err(err());
            }
            let mut raw = 0u64;
            for octet in octets {
                if octet.len() != 2 || !is_hex(octet) {
                    return Err(err());
                }
                let value = u8::from_str_radix(octet, 16).map_err(|_| err())?;
                raw = (raw << 8) | u64::from(value);
            }
            return Ok(Self(raw));
        }

        let digits = strip_hex_prefix(trimmed);
        if digits.is_empty() || digits.len() > 16 || !is_hex(digits) {
            return Err(err());
        }
        u64::from_str_radix(digits, 16).map(Self).map_err(|_| err())
    }
}

impl Serialize for IeeeAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for IeeeAddress {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Volatile 16-bit address assigned by the network, may change on rejoin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NetworkAddress(pub u16);

impl NetworkAddress {
    /// Address of the coordinator itself
    pub const COORDINATOR: Self = Self(0x0000);

    #[must_use]
    pub const fn new(raw: u16) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn as_u16(self) -> u16 {
        self.0
    }
}

impl fmt::Display for NetworkAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:04x}", self.0)
    }
}

impl FromStr for NetworkAddress {
    type Err = AddressParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = strip_hex_prefix(s.trim());
        if digits.is_empty() || digits.len() > 4 || !is_hex(digits) {
            return Err(AddressParseError::Network(s.to_string()));
        }
        u16::from_str_radix(digits, 16)
            .map(Self)
            .map_err(|_| AddressParseError::Network(s.to_string()))
    }
}

impl Serialize for NetworkAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for NetworkAddress {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

fn strip_hex_prefix(s: &str) -> &str {
    s.strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s)
}

/// `from_str_radix` tolerates a leading sign, addresses don't
fn is_hex(s: &str) -> bool {
    s.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Role a device plays in the mesh
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogicalType {
    Coordinator,
    Router,
    EndDevice,
}

/// Application endpoint exposed by a device
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Endpoint {
    pub id: u8,
    #[serde(default)]
    pub profile_id: u16,
    #[serde(default)]
    pub device_id: u16,
    #[serde(default)]
    pub in_clusters: Vec<u16>,
    #[serde(default)]
    pub out_clusters: Vec<u16>,
}

/// A paired device
///
/// Only the two addresses are meaningful to the registry; everything else
/// is carried as-is for whoever discovered the device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    pub ieee_address: IeeeAddress,
    pub network_address: NetworkAddress,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logical_type: Option<LogicalType>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main_powered: Option<bool>,

    #[serde(default)]
    pub endpoints: Vec<Endpoint>,
}

impl Device {
    /// Create a bare device record with no descriptive attributes
    #[must_use]
    pub const fn new(ieee_address: IeeeAddress, network_address: NetworkAddress) -> Self {
        Self {
            ieee_address,
            network_address,
            manufacturer: None,
            model: None,
            logical_type: None,
            main_powered: None,
            endpoints: Vec::new(),
        }
    }

    /// Look up an endpoint by id
    #[must_use]
    pub fn endpoint(&self, id: u8) -> Option<&Endpoint> {
        self.endpoints.iter().find(|e| e.id == id)
    }
}
