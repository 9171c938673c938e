//! Durable registry of paired devices

use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::Span;

use super::snapshot::{self, DeviceMap};
use super::types::{Device, IeeeAddress, NetworkAddress};
use crate::{Error, Result};

/// Registry of paired devices keyed by long address
///
/// Reads share the lock; `add` and `remove` hold it exclusively while the
/// new snapshot is written, and only commit to memory once the file has been
/// replaced. A failed write therefore leaves both memory and disk at the
/// previous state and surfaces as a fatal [`Error::Persistence`].
#[derive(Debug)]
pub struct DeviceRegistry {
    path: PathBuf,
    devices: RwLock<DeviceMap>,
    span: Span,
}

impl DeviceRegistry {
    /// Open the registry stored at `path`, creating an empty snapshot if absent
    ///
    /// # Errors
    ///
    /// Returns `Error::Persistence` if the snapshot can't be created, read or parsed
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let span = tracing::info_span!("registry", path = %path.display());
        Self::open_in_span(path, span)
    }

    /// Open the registry, emitting its events inside `span`
    ///
    /// # Errors
    ///
    /// Returns `Error::Persistence` if the snapshot can't be created, read or parsed
    pub fn open_in_span(path: impl AsRef<Path>, span: Span) -> Result<Self> {
        let path = std::path::absolute(path.as_ref())
            .map_err(|e| Error::persistence(path.as_ref(), "can't load database", e))?;
        let devices = span.in_scope(|| {
            if !snapshot::exists(&path)? {
                if let Some(parent) = path.parent() {
                    std::fs::create_dir_all(parent).map_err(|e| {
                        Error::persistence(&path, "can't create database directory", e)
                    })?;
                }
                snapshot::write(&path, &DeviceMap::new())?;
                tracing::info!("created empty device database");
            }

            let devices = snapshot::read(&path)?;
            tracing::info!(devices = devices.len(), "loaded device database");
            Ok::<_, Error>(devices)
        })?;

        Ok(Self {
            path,
            devices: RwLock::new(devices),
            span,
        })
    }

    /// Insert or replace the record keyed by `device.ieee_address`
    ///
    /// The record becomes the most recent one for short-address lookups.
    ///
    /// # Errors
    ///
    /// Returns `Error::Persistence` if the snapshot can't be written; the
    /// registry is unchanged in that case
    pub fn add(&self, device: Device) -> Result<()> {
        let _entered = self.span.enter();
        let ieee = device.ieee_address;
        let nwk = device.network_address;

        self.update(|devices| {
            let replaced = devices.shift_remove(&ieee).is_some();
            devices.insert(ieee, device);
            replaced
        })
        .map(|replaced| {
            tracing::info!(ieee = %ieee, nwk = %nwk, replaced, "device added");
        })
    }

    /// Delete the record for `ieee`; removing an unknown device still persists
    ///
    /// # Errors
    ///
    /// Returns `Error::Persistence` if the snapshot can't be written; the
    /// registry is unchanged in that case
    pub fn remove(&self, ieee: IeeeAddress) -> Result<()> {
        let _entered = self.span.enter();

        self.update(|devices| devices.shift_remove(&ieee).is_some())
            .map(|removed| {
                if removed {
                    tracing::info!(ieee = %ieee, "device removed");
                } else {
                    tracing::debug!(ieee = %ieee, "remove of unknown device");
                }
            })
    }

    /// Get a device by long address
    #[must_use]
    pub fn get(&self, ieee: IeeeAddress) -> Option<Device> {
        self.read().get(&ieee).cloned()
    }

    /// Get a device by short address
    ///
    /// Short addresses can be reassigned, so two records may briefly share
    /// one. The most recently added record wins.
    #[must_use]
    pub fn get_by_short_address(&self, nwk: NetworkAddress) -> Option<Device> {
        self.read()
            .values()
            .rev()
            .find(|d| d.network_address == nwk)
            .cloned()
    }

    /// Whether a device with this long address is registered
    #[must_use]
    pub fn exists(&self, ieee: IeeeAddress) -> bool {
        self.read().contains_key(&ieee)
    }

    /// All devices, oldest registration first
    #[must_use]
    pub fn list(&self) -> Vec<Device> {
        self.read().values().cloned().collect()
    }

    /// Number of registered devices
    #[must_use]
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Whether the registry is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Absolute path of the snapshot file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Apply `mutate` to a copy of the devices, persist it, then commit
    fn update<T>(&self, mutate: impl FnOnce(&mut DeviceMap) -> T) -> Result<T> {
        let mut devices = self.write();
        let mut next = devices.clone();
        let out = mutate(&mut next);

        if let Err(e) = snapshot::write(&self.path, &next) {
            tracing::error!(error = %e, "can't write database");
            return Err(e);
        }

        *devices = next;
        Ok(out)
    }

    fn read(&self) -> RwLockReadGuard<'_, DeviceMap> {
        self.devices.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, DeviceMap> {
        self.devices.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_device() -> Device {
        Device::new(
            "00:11:22:33:44:55:66:77".parse().unwrap(),
            "0x1234".parse().unwrap(),
        )
    }

    #[test]
    fn open_creates_empty_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state").join("devices.json");

        let registry = DeviceRegistry::open(&path).unwrap();

        assert!(registry.is_empty());
        assert!(path.exists());
        assert!(registry.path().is_absolute());
    }

    #[test]
    fn add_and_get() {
        let dir = tempfile::tempdir().unwrap();
        let registry = DeviceRegistry::open(dir.path().join("devices.json")).unwrap();
        let device = sample_device();

        registry.add(device.clone()).unwrap();

        assert_eq!(registry.get(device.ieee_address), Some(device.clone()));
        assert!(registry.exists(device.ieee_address));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn remove_unknown_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let registry = DeviceRegistry::open(dir.path().join("devices.json")).unwrap();
        registry.add(sample_device()).unwrap();

        registry.remove(IeeeAddress(0xdead)).unwrap();

        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn short_address_prefers_latest_add() {
        let dir = tempfile::tempdir().unwrap();
        let registry = DeviceRegistry::open(dir.path().join("devices.json")).unwrap();
        let nwk = NetworkAddress(0x0042);

        let stale = Device::new(IeeeAddress(1), nwk);
        let fresh = Device::new(IeeeAddress(2), nwk);
        registry.add(stale.clone()).unwrap();
        registry.add(fresh.clone()).unwrap();
        assert_eq!(registry.get_by_short_address(nwk), Some(fresh));

        // Re-adding moves the stale record to the front again
        registry.add(stale.clone()).unwrap();
        assert_eq!(registry.get_by_short_address(nwk), Some(stale));
    }

    #[test]
    fn failed_write_leaves_memory_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let state = dir.path().join("state");
        let registry = DeviceRegistry::open(state.join("devices.json")).unwrap();

        // Pull the directory out from under the registry
        std::fs::remove_dir_all(&state).unwrap();

        let err = registry.add(sample_device()).unwrap_err();
        assert!(err.is_fatal());
        assert!(registry.is_empty());
    }
}
