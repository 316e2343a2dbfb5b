//! Device dispatch against an in-memory registry.

use octofault_devices::prelude::*;
use octofault_telemetry::prelude::*;
use octofault_test_helpers::prelude::*;
use octofault_watchdog::prelude::*;
use std::sync::Arc;

fn manager_with_sink() -> (FaultManager, Arc<MemorySink>) {
    let sink = Arc::new(MemorySink::new());
    let mut manager = FaultManager::new();
    manager.set_sink(sink.clone());
    (manager, sink)
}

#[test]
fn test_register_all_covers_every_category() {
    let registry = InMemoryDeviceRegistry::new()
        .with("left_drive", Arc::new(MockMotor::dc_motor_ex()))
        .with("intake", Arc::new(MockMotor::cr_servo()))
        .with("claw", Arc::new(MockServo::new()))
        .with("imu", Arc::new(MockImu::new()))
        .with("front", Arc::new(MockRangefinder::new(30.0)))
        .with("color", Arc::new(MockColorSensor::with_diagnostics()))
        .with("bumper", Arc::new(MockTouchSensor::new()));
    let (mut manager, sink) = manager_with_sink();

    let count = DeviceDispatcher::new().register_all(&mut manager, &registry);

    assert_eq!(count, 7);
    assert_eq!(
        manager.names(),
        vec!["bumper", "claw", "color", "front", "imu", "intake", "left_drive"]
    );
    assert_eq!(sink.len(), 7);
    assert!(sink.lines().iter().all(|line| line.level == Some(Severity::Info)));
}

#[test]
fn test_rotary_devices_register_first() {
    let registry = InMemoryDeviceRegistry::new()
        .with("front", Arc::new(MockRangefinder::new(30.0)))
        .with("left_drive", Arc::new(MockMotor::dc_motor_ex()))
        .with("claw", Arc::new(MockServo::new()));
    let (mut manager, sink) = manager_with_sink();

    DeviceDispatcher::new().register_all(&mut manager, &registry);

    let texts = sink.texts();
    assert!(texts.first().is_some_and(|line| line.contains("{left_drive}")));
}

#[test]
fn test_aliased_device_registers_once() {
    let motor: Arc<dyn HardwareDevice> = Arc::new(MockMotor::dc_motor_ex());
    let registry = InMemoryDeviceRegistry::new()
        .with("left_drive", Arc::clone(&motor))
        .with("drive_alias", Arc::clone(&motor));
    let (mut manager, sink) = manager_with_sink();

    let count = DeviceDispatcher::new().register_all(&mut manager, &registry);

    assert_eq!(count, 1);
    assert_eq!(manager.names(), vec!["left_drive"]);
    assert_eq!(sink.len(), 1);
}

#[test]
fn test_combo_sensor_gets_single_ranging_monitor() {
    let registry = InMemoryDeviceRegistry::new().with("combo", Arc::new(MockColorRangeSensor::new(8.0)));
    let mut manager = FaultManager::new();

    DeviceDispatcher::new().register_all(&mut manager, &registry);

    assert_eq!(manager.len(), 1);
    assert_eq!(
        manager.get("combo").map(|m| m.category()),
        Some(MonitorKind::Ranging)
    );
}

#[test]
fn test_unmatched_device_is_skipped_without_extension() {
    let registry = InMemoryDeviceRegistry::new()
        .with("hub", Arc::new(MockVoltageSensor::new(12.6)))
        .with("front", Arc::new(MockRangefinder::new(30.0)));
    let (mut manager, sink) = manager_with_sink();

    let count = DeviceDispatcher::new().register_all(&mut manager, &registry);

    assert_eq!(count, 1);
    assert!(manager.get("hub").is_none());
    assert!(!sink.contains("{hub}"));
}

#[test]
fn test_power_extension_registers_voltage_sensor() -> TestResult {
    let registry = InMemoryDeviceRegistry::new().with("hub", Arc::new(MockVoltageSensor::new(12.6)));
    let (mut manager, sink) = manager_with_sink();

    let dispatcher = DeviceDispatcher::new().with_extension(power_extension);
    dispatcher.register_all(&mut manager, &registry);

    let hub = manager.require("hub")?;
    assert_eq!(hub.category(), MonitorKind::Power);
    assert_eq!(hub.current_value(), "12.6");
    assert!(sink.contains("with monitor type: Voltage Sensor"));
    Ok(())
}

#[test]
fn test_custom_hook_sees_canonical_name() -> TestResult {
    let registry = InMemoryDeviceRegistry::new()
        .with("hub", Arc::new(MockVoltageSensor::new(12.6)))
        .with("hub_alias", Arc::new(MockVoltageSensor::new(11.0)));
    let mut manager = FaultManager::new();

    let dispatcher = DeviceDispatcher::new().with_extension(|name, device| {
        if name.ends_with("alias") {
            return None;
        }
        power_extension(name, device)
    });
    let count = dispatcher.register_all(&mut manager, &registry);

    assert_eq!(count, 1);
    assert_eq!(manager.names(), vec!["hub"]);
    Ok(())
}

#[test]
fn test_dispatched_rotary_uses_dispatcher_clock() -> TestResult {
    let clock = Arc::new(ManualClock::new());
    let motor = Arc::new(MockMotor::dc_motor_ex());
    motor.set_power(0.8);
    motor.set_encoder(42, 20.0);
    let registry = InMemoryDeviceRegistry::new().with("arm", motor.clone());
    let mut manager = FaultManager::new();
    manager.set_report_tick_duration(false);

    DeviceDispatcher::new()
        .with_clock(clock.clone())
        .register_all(&mut manager, &registry);

    manager.update_all();
    clock.advance_ms(300);
    assert!(manager.update_all().is_clean());
    clock.advance_ms(301);
    assert_eq!(manager.update_all().faulty_names(), vec!["arm"]);
    Ok(())
}
