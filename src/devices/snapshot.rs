//! On-disk device snapshot
//!
//! The whole registry is stored as one JSON document:
//!
//! ```text
//! {
//!     "devices": {
//!         "00:11:22:33:44:55:66:77": { "ieee_address": ..., "network_address": ... }
//!     }
//! }
//! ```
//!
//! Every write replaces the file wholesale through a temporary file in the
//! same directory followed by a rename, so readers see either the old or the
//! new document and never a torn one.

use std::io::Write;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use thiserror::Error;

use super::types::{Device, IeeeAddress};
use crate::{Error, Result};

/// Devices keyed by long address, oldest registration first
pub type DeviceMap = IndexMap<IeeeAddress, Device>;

const UNMARSHAL: &str = "can't unmarshal database";

/// Keys are parsed separately so that two spellings of one address, or a key
/// that disagrees with its record, are caught instead of silently merged
#[derive(Debug, Default, Deserialize)]
struct SnapshotFile {
    #[serde(default)]
    devices: IndexMap<String, Device>,
}

/// A snapshot that parses but breaks the one-record-per-long-address rule
#[derive(Debug, Error)]
enum SnapshotError {
    #[error("record keyed {key} claims long address {record}")]
    KeyMismatch { key: IeeeAddress, record: IeeeAddress },

    #[error("long address {0} is stored under more than one key")]
    DuplicateKey(IeeeAddress),
}

#[derive(Serialize)]
struct SnapshotRef<'a> {
    devices: &'a DeviceMap,
}

/// Whether a snapshot file is present at `path`
///
/// # Errors
///
/// Returns `Error::Persistence` if presence can't be determined
pub fn exists(path: &Path) -> Result<bool> {
    path.try_exists()
        .map_err(|e| Error::persistence(path, "can't load database", e))
}

/// Read and parse the snapshot at `path`
///
/// # Errors
///
/// Returns `Error::Persistence` if the file can't be read or parsed, or if a
/// long address appears twice or disagrees with its key
pub fn read(path: &Path) -> Result<DeviceMap> {
    let data = std::fs::read(path)
        .map_err(|e| Error::persistence(path, "can't read database", e))?;
    let file: SnapshotFile =
        serde_json::from_slice(&data).map_err(|e| Error::persistence(path, UNMARSHAL, e))?;

    let mut devices = DeviceMap::with_capacity(file.devices.len());
    for (key, device) in file.devices {
        let ieee: IeeeAddress = key
            .parse()
            .map_err(|e| Error::persistence(path, UNMARSHAL, e))?;
        if ieee != device.ieee_address {
            let mismatch = SnapshotError::KeyMismatch {
                key: ieee,
                record: device.ieee_address,
            };
            return Err(Error::persistence(path, UNMARSHAL, mismatch));
        }
        if devices.insert(ieee, device).is_some() {
            return Err(Error::persistence(path, UNMARSHAL, SnapshotError::DuplicateKey(ieee)));
        }
    }
    Ok(devices)
}

/// Serialize `devices` and atomically replace the snapshot at `path`
///
/// # Errors
///
/// Returns `Error::Persistence` if serialization or any file operation fails;
/// the previous snapshot is left untouched in that case
pub fn write(path: &Path, devices: &DeviceMap) -> Result<()> {
    let data = encode(devices).map_err(|e| Error::persistence(path, "can't marshal database", e))?;

    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut tmp = NamedTempFile::new_in(dir)
        .map_err(|e| Error::persistence(path, "can't create temporary file", e))?;
    tmp.write_all(&data)
        .and_then(|()| tmp.as_file().sync_all())
        .map_err(|e| Error::persistence(path, "can't write database", e))?;
    tmp.persist(path)
        .map_err(|e| Error::persistence(path, "can't replace database", e.error))?;

    tracing::trace!(path = %path.display(), bytes = data.len(), "snapshot written");
    Ok(())
}

fn encode(devices: &DeviceMap) -> serde_json::Result<Vec<u8>> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    SnapshotRef { devices }.serialize(&mut ser)?;
    buf.push(b'\n');
    Ok(buf)
}
