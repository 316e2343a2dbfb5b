//! Device dispatcher: resolves discovered devices to monitors.
//!
//! Capabilities are probed in a fixed priority order and the first match
//! wins. A device exposing several capabilities therefore gets exactly one
//! monitor, the one for its highest-priority capability.

use octofault_devices::{
    Clock, DeviceCategory, DeviceRegistry, HardwareDevice, SystemClock, same_device,
};
use octofault_monitors::{DeviceMonitor, Monitor};
use octofault_telemetry::Severity;
use std::fmt;
use std::sync::Arc;

use crate::manager::FaultManager;

/// Fallback consulted when no built-in capability matches.
pub type ExtensionHook = Box<dyn Fn(&str, &Arc<dyn HardwareDevice>) -> Option<Monitor> + Send + Sync>;

/// Built-in probe order.
pub const PROBE_ORDER: [DeviceCategory; 6] = [
    DeviceCategory::Rotary,
    DeviceCategory::Positional,
    DeviceCategory::Inertial,
    DeviceCategory::Ranging,
    DeviceCategory::Chromatic,
    DeviceCategory::Contact,
];

/// Extension hook that monitors power sensors.
///
/// Power sensors are not part of the built-in probe order; install this with
/// [`DeviceDispatcher::with_extension`] to pick them up.
#[must_use]
pub fn power_extension(name: &str, device: &Arc<dyn HardwareDevice>) -> Option<Monitor> {
    Arc::clone(device)
        .as_power()
        .map(|sensor| Monitor::power(name, sensor))
}

/// Maps physical devices to [`Monitor`] variants and registers them.
pub struct DeviceDispatcher {
    clock: Arc<dyn Clock>,
    extension: Option<ExtensionHook>,
}

impl DeviceDispatcher {
    /// Dispatcher with the system clock and no extension hook.
    #[must_use]
    pub fn new() -> Self {
        Self {
            clock: Arc::new(SystemClock),
            extension: None,
        }
    }

    /// Use `clock` for rotary stall detection.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Install the fallback consulted when no built-in capability matches.
    #[must_use]
    pub fn with_extension<F>(mut self, hook: F) -> Self
    where
        F: Fn(&str, &Arc<dyn HardwareDevice>) -> Option<Monitor> + Send + Sync + 'static,
    {
        self.extension = Some(Box::new(hook));
        self
    }

    /// True if an extension hook is installed.
    #[must_use]
    pub fn has_extension(&self) -> bool {
        self.extension.is_some()
    }

    /// Build the monitor for `device`, or `None` if nothing matches.
    #[must_use]
    pub fn resolve(&self, name: &str, device: &Arc<dyn HardwareDevice>) -> Option<Monitor> {
        PROBE_ORDER
            .iter()
            .find_map(|category| self.probe(*category, name, device))
            .or_else(|| self.extension.as_ref().and_then(|hook| hook(name, device)))
    }

    fn probe(
        &self,
        category: DeviceCategory,
        name: &str,
        device: &Arc<dyn HardwareDevice>,
    ) -> Option<Monitor> {
        let device = Arc::clone(device);
        match category {
            DeviceCategory::Rotary => device
                .as_rotary()
                .map(|d| Monitor::rotary_with_clock(name, d, Arc::clone(&self.clock))),
            DeviceCategory::Positional => device.as_positional().map(|d| Monitor::positional(name, d)),
            DeviceCategory::Inertial => device.as_inertial().map(|d| Monitor::inertial(name, d)),
            DeviceCategory::Ranging => device.as_ranging().map(|d| Monitor::ranging(name, d)),
            DeviceCategory::Chromatic => device.as_chromatic().map(|d| Monitor::chromatic(name, d)),
            DeviceCategory::Contact => device.as_contact().map(|d| Monitor::contact(name, d)),
            DeviceCategory::Power | DeviceCategory::Any => None,
        }
    }

    /// Resolve `device` and register it under its canonical name.
    ///
    /// Returns the name used, or `None` if the device has no name, no
    /// monitor matches it, or the extension hook built a monitor under a
    /// different name.
    pub fn register_device<R>(
        &self,
        manager: &mut FaultManager,
        registry: &R,
        device: &Arc<dyn HardwareDevice>,
    ) -> Option<String>
    where
        R: DeviceRegistry + ?Sized,
    {
        let Some(name) = registry.names_of(device).into_iter().next() else {
            tracing::debug!("Skipping device without a name");
            return None;
        };
        let Some(monitor) = self.resolve(&name, device) else {
            tracing::debug!(device = %name, "No monitor matches device");
            return None;
        };

        if monitor.name() != name {
            tracing::warn!(
                device = %name,
                monitor = %monitor.name(),
                "Extension monitor name does not match the device name, skipping"
            );
            return None;
        }

        let device_type = monitor.device_type().to_string();
        let category = monitor.category();
        manager.register(monitor);

        tracing::info!(
            device = %name,
            category = %category,
            device_type = %device_type,
            "Registered device"
        );
        if let Some(sink) = manager.sink() {
            sink.log_at(
                Severity::Info,
                &format!(
                    "Registered Device with the name of {{{name}}}, with monitor type: {device_type}"
                ),
            );
        }
        Some(name)
    }

    /// Register every device of `category`. Returns how many were registered.
    pub fn register_all_of<R>(
        &self,
        manager: &mut FaultManager,
        registry: &R,
        category: DeviceCategory,
    ) -> usize
    where
        R: DeviceRegistry + ?Sized,
    {
        registry
            .devices_of(category)
            .iter()
            .filter_map(|device| self.register_device(manager, registry, device))
            .count()
    }

    /// Register every device in `registry`, rotary devices first.
    ///
    /// Each physical device is considered once even when the registry lists
    /// it under several categories. Returns how many were registered.
    pub fn register_all<R>(&self, manager: &mut FaultManager, registry: &R) -> usize
    where
        R: DeviceRegistry + ?Sized,
    {
        self.scan(manager, registry, false)
    }

    /// Register only devices whose canonical name has no monitor yet.
    ///
    /// Existing monitors, including ones registered by hand, are left
    /// untouched along with their cross-tick state. Returns how many new
    /// monitors were registered.
    pub fn register_new<R>(&self, manager: &mut FaultManager, registry: &R) -> usize
    where
        R: DeviceRegistry + ?Sized,
    {
        self.scan(manager, registry, true)
    }

    fn scan<R>(&self, manager: &mut FaultManager, registry: &R, skip_monitored: bool) -> usize
    where
        R: DeviceRegistry + ?Sized,
    {
        let mut seen: Vec<Arc<dyn HardwareDevice>> = Vec::new();
        let mut registered = 0_usize;

        let candidates = registry
            .devices_of(DeviceCategory::Rotary)
            .into_iter()
            .chain(registry.devices());
        for device in candidates {
            if seen.iter().any(|d| same_device(d, &device)) {
                continue;
            }
            if skip_monitored
                && registry
                    .names_of(&device)
                    .first()
                    .is_some_and(|name| manager.contains(name))
            {
                seen.push(device);
                continue;
            }
            if self.register_device(manager, registry, &device).is_some() {
                registered = registered.saturating_add(1);
            }
            seen.push(device);
        }

        tracing::info!(registered, monitors = manager.len(), "Device scan complete");
        registered
    }
}

impl Default for DeviceDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for DeviceDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceDispatcher")
            .field("has_extension", &self.extension.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use octofault_devices::InMemoryDeviceRegistry;
    use octofault_monitors::MonitorKind;
    use octofault_telemetry::MemorySink;
    use octofault_test_helpers::prelude::*;

    fn resolve_kind(device: Arc<dyn HardwareDevice>) -> Option<MonitorKind> {
        DeviceDispatcher::new()
            .resolve("dev", &device)
            .map(|m| m.category())
    }

    #[test]
    fn test_each_category_resolves() {
        assert_eq!(resolve_kind(Arc::new(MockMotor::dc_motor_ex())), Some(MonitorKind::Rotary));
        assert_eq!(resolve_kind(Arc::new(MockServo::new())), Some(MonitorKind::Positional));
        assert_eq!(resolve_kind(Arc::new(MockImu::new())), Some(MonitorKind::Inertial));
        assert_eq!(resolve_kind(Arc::new(MockRangefinder::new(5.0))), Some(MonitorKind::Ranging));
        assert_eq!(resolve_kind(Arc::new(MockColorSensor::new())), Some(MonitorKind::Chromatic));
        assert_eq!(resolve_kind(Arc::new(MockTouchSensor::new())), Some(MonitorKind::Contact));
    }

    #[test]
    fn test_ranging_wins_over_chromatic() {
        assert_eq!(
            resolve_kind(Arc::new(MockColorRangeSensor::new(12.0))),
            Some(MonitorKind::Ranging)
        );
    }

    #[test]
    fn test_power_needs_extension() {
        let device: Arc<dyn HardwareDevice> = Arc::new(MockVoltageSensor::new(12.0));
        assert!(DeviceDispatcher::new().resolve("hub", &device).is_none());

        let dispatcher = DeviceDispatcher::new().with_extension(power_extension);
        assert!(dispatcher.has_extension());
        let monitor = dispatcher.resolve("hub", &device);
        assert_eq!(monitor.map(|m| m.category()), Some(MonitorKind::Power));
    }

    #[test]
    fn test_extension_not_consulted_when_builtin_matches() {
        let dispatcher = DeviceDispatcher::new().with_extension(|name, _| {
            Some(Monitor::power(name, Arc::new(MockVoltageSensor::new(1.0))))
        });
        let device: Arc<dyn HardwareDevice> = Arc::new(MockRangefinder::new(5.0));
        assert_eq!(
            dispatcher.resolve("front", &device).map(|m| m.category()),
            Some(MonitorKind::Ranging)
        );
    }

    #[test]
    fn test_register_device_logs_and_uses_first_name() {
        let device: Arc<dyn HardwareDevice> = Arc::new(MockRangefinder::new(5.0));
        let registry = InMemoryDeviceRegistry::new()
            .with("front", Arc::clone(&device))
            .with("front_alias", Arc::clone(&device));
        let sink = Arc::new(MemorySink::new());
        let mut manager = FaultManager::new();
        manager.set_sink(sink.clone());

        let name = DeviceDispatcher::new().register_device(&mut manager, &registry, &device);
        assert_eq!(name.as_deref(), Some("front"));
        assert!(manager.get("front").is_some());
        assert!(manager.get("front_alias").is_none());
        assert_eq!(
            sink.texts(),
            vec!["INFO: Registered Device with the name of {front}, with monitor type: Distance Sensor"
                .to_string()]
        );
    }

    #[test]
    fn test_extension_monitor_under_other_name_is_rejected() {
        let device: Arc<dyn HardwareDevice> = Arc::new(MockVoltageSensor::new(12.0));
        let registry = InMemoryDeviceRegistry::new().with("hub", Arc::clone(&device));
        let sink = Arc::new(MemorySink::new());
        let mut manager = FaultManager::new();
        manager.set_sink(sink.clone());

        let dispatcher = DeviceDispatcher::new().with_extension(|_, device| {
            power_extension("battery", device)
        });
        assert!(dispatcher.register_device(&mut manager, &registry, &device).is_none());
        assert!(manager.is_empty());
        assert!(sink.is_empty(), "no registration line without a registered monitor");
    }

    #[test]
    fn test_registration_line_follows_registration() {
        let device: Arc<dyn HardwareDevice> = Arc::new(MockVoltageSensor::new(12.0));
        let registry = InMemoryDeviceRegistry::new().with("hub", Arc::clone(&device));
        let sink = Arc::new(MemorySink::new());
        let mut manager = FaultManager::new();
        manager.set_sink(sink.clone());

        let dispatcher = DeviceDispatcher::new().with_extension(power_extension);
        assert!(sink.is_empty());
        let name = dispatcher.register_device(&mut manager, &registry, &device);
        assert_eq!(name.as_deref(), Some("hub"));
        assert!(manager.contains("hub"));
        assert!(sink.contains("{hub}, with monitor type: Voltage Sensor"));
    }

    #[test]
    fn test_register_new_skips_monitored_devices() {
        let registry = InMemoryDeviceRegistry::new()
            .with("arm", Arc::new(MockServo::new()))
            .with("front", Arc::new(MockRangefinder::new(5.0)));
        let sink = Arc::new(MemorySink::new());
        let mut manager = FaultManager::new();
        manager.set_sink(sink.clone());
        let dispatcher = DeviceDispatcher::new();

        assert_eq!(dispatcher.register_all_of(&mut manager, &registry, DeviceCategory::Positional), 1);
        sink.clear();

        assert_eq!(dispatcher.register_new(&mut manager, &registry), 1);
        assert_eq!(manager.names(), vec!["arm", "front"]);
        assert_eq!(sink.len(), 1);
        assert!(sink.contains("{front}"));

        assert_eq!(dispatcher.register_new(&mut manager, &registry), 0);
    }

    #[test]
    fn test_unnamed_device_is_skipped() {
        let registry = InMemoryDeviceRegistry::new();
        let device: Arc<dyn HardwareDevice> = Arc::new(MockRangefinder::new(5.0));
        let mut manager = FaultManager::new();

        assert!(
            DeviceDispatcher::new()
                .register_device(&mut manager, &registry, &device)
                .is_none()
        );
        assert!(manager.is_empty());
    }

    #[test]
    fn test_register_all_of_category() {
        let registry = InMemoryDeviceRegistry::new()
            .with("arm", Arc::new(MockServo::new()))
            .with("front", Arc::new(MockRangefinder::new(5.0)));
        let mut manager = FaultManager::new();

        let count = DeviceDispatcher::new().register_all_of(
            &mut manager,
            &registry,
            DeviceCategory::Positional,
        );
        assert_eq!(count, 1);
        assert_eq!(manager.names(), vec!["arm"]);
    }
}
