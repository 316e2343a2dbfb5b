//! Host-facing facade: one object to build at startup and tick every loop.

use octofault_devices::DeviceRegistry;
use octofault_telemetry::TelemetrySink;
use std::fmt;
use std::sync::Arc;

use crate::config::FaultManagerConfig;
use crate::dispatcher::DeviceDispatcher;
use crate::error::WatchdogResult;
use crate::manager::{FaultManager, TickReport};

/// Owns a [`FaultManager`] and the [`DeviceDispatcher`] that filled it.
///
/// Build it after the host has discovered its devices, then call
/// [`Octofault::tick`] once per control-loop iteration.
pub struct Octofault<R> {
    registry: R,
    manager: FaultManager,
    dispatcher: DeviceDispatcher,
}

impl<R: DeviceRegistry> Octofault<R> {
    /// Monitor every device in `registry`, reporting to `sink`.
    #[must_use]
    pub fn new(registry: R, sink: Arc<dyn TelemetrySink>) -> Self {
        let mut manager = FaultManager::new();
        manager.set_sink(sink);
        Self::scanned(registry, manager, DeviceDispatcher::new())
    }

    /// Like [`Octofault::new`] with an explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if `config` is invalid.
    pub fn with_config(
        registry: R,
        sink: Arc<dyn TelemetrySink>,
        config: FaultManagerConfig,
    ) -> WatchdogResult<Self> {
        Self::with_dispatcher(registry, sink, config, DeviceDispatcher::new())
    }

    /// Like [`Octofault::with_config`] with a custom dispatcher, typically one
    /// carrying an extension hook.
    ///
    /// # Errors
    ///
    /// Returns an error if `config` is invalid.
    pub fn with_dispatcher(
        registry: R,
        sink: Arc<dyn TelemetrySink>,
        config: FaultManagerConfig,
        dispatcher: DeviceDispatcher,
    ) -> WatchdogResult<Self> {
        let mut manager = FaultManager::with_config(config)?;
        manager.set_sink(sink);
        Ok(Self::scanned(registry, manager, dispatcher))
    }

    /// Assemble from parts without scanning `registry`.
    ///
    /// Monitors are whatever `manager` already holds; call
    /// [`Octofault::rescan`] to pick up the registry's devices.
    #[must_use]
    pub fn from_parts(registry: R, manager: FaultManager, dispatcher: DeviceDispatcher) -> Self {
        Self {
            registry,
            manager,
            dispatcher,
        }
    }

    fn scanned(registry: R, mut manager: FaultManager, dispatcher: DeviceDispatcher) -> Self {
        dispatcher.register_all(&mut manager, &registry);
        Self::from_parts(registry, manager, dispatcher)
    }

    /// Run one monitor pass.
    pub fn tick(&mut self) -> TickReport {
        self.manager.update_all()
    }

    /// Monitor devices added to the registry since the last scan.
    ///
    /// Devices whose canonical name already has a monitor keep it, so their
    /// health and stall tracking carry on. Returns how many monitors were
    /// added.
    pub fn rescan(&mut self) -> usize {
        self.dispatcher.register_new(&mut self.manager, &self.registry)
    }

    /// The fault manager.
    #[must_use]
    pub fn manager(&self) -> &FaultManager {
        &self.manager
    }

    /// Mutable access to the fault manager, for manual registration.
    pub fn manager_mut(&mut self) -> &mut FaultManager {
        &mut self.manager
    }

    /// The dispatcher.
    #[must_use]
    pub fn dispatcher(&self) -> &DeviceDispatcher {
        &self.dispatcher
    }

    /// The device registry.
    #[must_use]
    pub fn registry(&self) -> &R {
        &self.registry
    }

    /// Mutable access to the device registry. Follow with
    /// [`Octofault::rescan`] to monitor newly added devices.
    pub fn registry_mut(&mut self) -> &mut R {
        &mut self.registry
    }
}

impl<R> fmt::Debug for Octofault<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Octofault")
            .field("manager", &self.manager)
            .field("dispatcher", &self.dispatcher)
            .finish_non_exhaustive()
    }
}
