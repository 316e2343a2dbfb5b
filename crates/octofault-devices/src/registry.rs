//! Device registry boundary.
//!
//! Discovery of physical devices belongs to the host framework. Octofault only
//! needs to enumerate what was discovered and ask for a device's names.

use std::fmt;
use std::sync::Arc;

use crate::capability::{DeviceCategory, HardwareDevice};

/// True if both handles point at the same device.
#[must_use]
pub fn same_device(a: &Arc<dyn HardwareDevice>, b: &Arc<dyn HardwareDevice>) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}

/// Source of discovered devices.
///
/// No ordering guarantee is part of this contract.
pub trait DeviceRegistry {
    /// Every known device, each at most once.
    fn devices(&self) -> Vec<Arc<dyn HardwareDevice>>;

    /// Every device exposing `category`'s capability.
    fn devices_of(&self, category: DeviceCategory) -> Vec<Arc<dyn HardwareDevice>> {
        self.devices()
            .into_iter()
            .filter(|device| category.matches(device))
            .collect()
    }

    /// Names under which `device` is registered. The first one is canonical.
    fn names_of(&self, device: &Arc<dyn HardwareDevice>) -> Vec<String>;
}

/// Registry held in memory, in insertion order.
#[derive(Default)]
pub struct InMemoryDeviceRegistry {
    entries: Vec<(String, Arc<dyn HardwareDevice>)>,
}

impl InMemoryDeviceRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `device` under `name`, replacing any device already using that name.
    pub fn insert(&mut self, name: impl Into<String>, device: Arc<dyn HardwareDevice>) {
        let name = name.into();
        if let Some(entry) = self.entries.iter_mut().find(|(n, _)| *n == name) {
            entry.1 = device;
        } else {
            self.entries.push((name, device));
        }
    }

    /// Builder form of [`InMemoryDeviceRegistry::insert`].
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, device: Arc<dyn HardwareDevice>) -> Self {
        self.insert(name, device);
        self
    }

    /// Look a device up by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<dyn HardwareDevice>> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, device)| Arc::clone(device))
    }

    /// Drop the name binding; the device stays reachable through other names.
    pub fn remove(&mut self, name: &str) -> Option<Arc<dyn HardwareDevice>> {
        let index = self.entries.iter().position(|(n, _)| n == name)?;
        Some(self.entries.remove(index).1)
    }

    /// Number of name bindings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if no device is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl DeviceRegistry for InMemoryDeviceRegistry {
    fn devices(&self) -> Vec<Arc<dyn HardwareDevice>> {
        let mut unique: Vec<Arc<dyn HardwareDevice>> = Vec::with_capacity(self.entries.len());
        for (_, device) in &self.entries {
            if !unique.iter().any(|seen| same_device(seen, device)) {
                unique.push(Arc::clone(device));
            }
        }
        unique
    }

    fn names_of(&self, device: &Arc<dyn HardwareDevice>) -> Vec<String> {
        self.entries
            .iter()
            .filter(|(_, d)| same_device(d, device))
            .map(|(name, _)| name.clone())
            .collect()
    }
}

impl fmt::Debug for InMemoryDeviceRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InMemoryDeviceRegistry")
            .field(
                "names",
                &self.entries.iter().map(|(n, _)| n.as_str()).collect::<Vec<_>>(),
            )
            .finish()
    }
}
