//! Property and snapshot tests for the in-memory registry and device errors.

use octofault_devices::prelude::*;
use proptest::prelude::*;
use std::sync::Arc;

struct Voltmeter(f64);

impl PowerSensor for Voltmeter {
    fn voltage(&self) -> DeviceResult<f64> {
        Ok(self.0)
    }
}

impl HardwareDevice for Voltmeter {
    fn as_power(self: Arc<Self>) -> Option<Arc<dyn PowerSensor>> {
        Some(self)
    }
}

fn voltmeters(n: usize) -> Vec<Arc<dyn HardwareDevice>> {
    (0..n)
        .map(|_| Arc::new(Voltmeter(12.0)) as Arc<dyn HardwareDevice>)
        .collect()
}

proptest! {
    /// Every name binding points at one of the devices, and `devices()` lists
    /// each distinct device exactly once whatever the aliasing.
    #[test]
    fn prop_devices_are_deduplicated(bindings in prop::collection::vec(0usize..4, 1..16)) {
        let pool = voltmeters(4);
        let mut registry = InMemoryDeviceRegistry::new();
        for (i, slot) in bindings.iter().enumerate() {
            if let Some(device) = pool.get(*slot) {
                registry.insert(format!("dev{i}"), Arc::clone(device));
            }
        }

        let devices = registry.devices();
        let mut distinct: Vec<usize> = bindings.clone();
        distinct.sort_unstable();
        distinct.dedup();
        prop_assert_eq!(devices.len(), distinct.len());
        prop_assert_eq!(registry.len(), bindings.len());

        let named: usize = devices.iter().map(|d| registry.names_of(d).len()).sum();
        prop_assert_eq!(named, bindings.len());
    }

    /// The first name of a device is the first one it was inserted under.
    #[test]
    fn prop_first_name_is_canonical(aliases in 1usize..6) {
        let device: Arc<dyn HardwareDevice> = Arc::new(Voltmeter(12.0));
        let mut registry = InMemoryDeviceRegistry::new();
        for i in 0..aliases {
            registry.insert(format!("hub{i}"), Arc::clone(&device));
        }

        let names = registry.names_of(&device);
        prop_assert_eq!(names.first().map(String::as_str), Some("hub0"));
        prop_assert_eq!(names.len(), aliases);
    }
}

#[test]
fn test_removed_alias_keeps_device_reachable() {
    let device: Arc<dyn HardwareDevice> = Arc::new(Voltmeter(12.0));
    let mut registry = InMemoryDeviceRegistry::new()
        .with("hub", Arc::clone(&device))
        .with("battery", Arc::clone(&device));

    assert!(registry.remove("hub").is_some());
    assert_eq!(registry.names_of(&device), vec!["battery"]);
    assert_eq!(registry.devices_of(DeviceCategory::Power).len(), 1);
    assert!(registry.devices_of(DeviceCategory::Rotary).is_empty());
}

#[test]
fn test_category_names() {
    let names: Vec<String> = [
        DeviceCategory::Rotary,
        DeviceCategory::Positional,
        DeviceCategory::Inertial,
        DeviceCategory::Ranging,
        DeviceCategory::Chromatic,
        DeviceCategory::Contact,
        DeviceCategory::Power,
        DeviceCategory::Any,
    ]
    .iter()
    .map(ToString::to_string)
    .collect();

    insta::assert_debug_snapshot!(names, @r#"
    [
        "Rotary Actuator",
        "Positional Actuator",
        "Inertial Sensor",
        "Ranging Sensor",
        "Chromatic Sensor",
        "Contact Sensor",
        "Power Sensor",
        "Any Device",
    ]
    "#);
}

#[test]
fn test_device_error_messages() {
    let messages: Vec<String> = [
        DeviceError::driver("I2C NACK"),
        DeviceError::Disconnected,
        DeviceError::timeout(25),
        DeviceError::unsupported("encoder"),
    ]
    .iter()
    .map(ToString::to_string)
    .collect();

    insta::assert_debug_snapshot!(messages, @r#"
    [
        "I2C NACK",
        "Device disconnected",
        "Device timeout after 25ms",
        "Unsupported reading: encoder",
    ]
    "#);
}
