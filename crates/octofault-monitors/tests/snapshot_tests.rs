//! Snapshot tests for fault reason and current value text.

use insta::assert_snapshot;
use octofault_devices::prelude::*;
use octofault_monitors::prelude::*;
use octofault_test_helpers::prelude::*;
use std::sync::Arc;

fn reasons(monitor: &Monitor) -> String {
    monitor.fault_reasons().join("\n")
}

#[test]
fn test_rotary_reasons() {
    let motor = Arc::new(MockMotor::cr_servo_ex());
    motor.set_power(0.9);
    motor.set_drive_enabled(false);
    let mut monitor = Monitor::rotary("spinner", motor);

    monitor.update();
    assert_snapshot!(reasons(&monitor), @r"
    INFO: spinner: Power high, but no encoder feedback available.
    ERROR: spinner: PWM is not enabled
    ");
}

#[test]
fn test_inertial_reasons() {
    let imu = Arc::new(MockImu::new());
    imu.set_angular_velocity(None);
    imu.set_orientation(Some(Orientation::new(f64::NAN, 0.0, 0.0)));
    let mut monitor = Monitor::inertial("imu", imu);

    monitor.update();
    assert_snapshot!(reasons(&monitor), @r"
    WARNING: imu: Angular velocity data unavailable
    WARNING: imu: Yaw, Pitch, or Roll is NaN
    ");
}

#[test]
fn test_current_values() {
    let motor = Arc::new(MockMotor::dc_motor_ex());
    motor.set_power(0.5);
    motor.set_encoder(120, 30.0);
    let servo = Arc::new(MockServo::new());
    servo.set_position(1.5);
    let imu = Arc::new(MockImu::new());
    imu.set_orientation(Some(Orientation::new(1.0, 2.0, 3.0)));
    let color = Arc::new(MockColorSensor::new());
    color.set_channels(10.0, 10.0, 10.0, 30.0);
    let touch = Arc::new(MockTouchSensor::new());
    touch.set_value(1.0);

    let monitors = [
        Monitor::rotary("m", motor),
        Monitor::positional("s", servo),
        Monitor::inertial("i", imu),
        Monitor::ranging("r", Arc::new(MockRangefinder::new(50.0))),
        Monitor::chromatic("c", color),
        Monitor::contact("t", touch),
        Monitor::power("v", Arc::new(MockVoltageSensor::new(12.5))),
    ];
    let text = monitors
        .iter()
        .map(DeviceMonitor::current_value)
        .collect::<Vec<_>>()
        .join("\n");

    assert_snapshot!(text, @r"
    Power: 0.50, Pos: 120, Vel: 30.00, Busy: false
    Target Position: 1.50, PWM Enabled: true
    Orientation [°]: Yaw: 1.0, Pitch: 2.0, Roll: 3.0
    Distance(CM) : 50.0
    R: 10, G: 10, B: 10, A: 30
    Touched: true, Value: 1.00
    12.5
    ");
}

#[test]
fn test_read_failure_values() {
    let range = Arc::new(MockRangefinder::new(0.0));
    range.fail(DeviceError::timeout(15));
    let color = Arc::new(MockColorSensor::new());
    color.fail_channels(DeviceError::Disconnected);

    let monitors = [
        Monitor::ranging("r", range),
        Monitor::chromatic("c", color),
    ];
    let text = monitors
        .iter()
        .map(DeviceMonitor::current_value)
        .collect::<Vec<_>>()
        .join("\n");

    assert_snapshot!(text, @r"
    Distance read failed: Device timeout after 15ms
    Sensor read failed: Device disconnected
    ");
}
