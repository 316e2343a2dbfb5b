//! Scriptable mock devices.
//!
//! Every mock keeps its readings behind a mutex so a test can hold one
//! `Arc` for scripting and hand another to the monitor under test. Each
//! reading is a `DeviceResult`, so errors are injected the same way values
//! are.

use octofault_devices::{
    AngularVelocity, BusStatus, ChromaticSensor, ColorChannels, ContactSensor, DeviceError,
    DeviceResult, EncoderSample, HardwareDevice, InertialSensor, Orientation,
    PositionalActuator, PowerSensor, RangingSensor, RotaryActuator, RotaryFeatures,
};
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Debug, Clone)]
struct MotorState {
    features: RotaryFeatures,
    power: DeviceResult<f64>,
    encoder: DeviceResult<EncoderSample>,
    busy: DeviceResult<bool>,
    drive_enabled: DeviceResult<bool>,
}

/// Mock rotary actuator.
#[derive(Debug)]
pub struct MockMotor {
    state: Mutex<MotorState>,
    power_reads: AtomicUsize,
}

impl MockMotor {
    /// Drive with the given optional feedback, idle and enabled.
    pub fn new(features: RotaryFeatures) -> Self {
        Self {
            state: Mutex::new(MotorState {
                features,
                power: Ok(0.0),
                encoder: Ok(EncoderSample::default()),
                busy: Ok(false),
                drive_enabled: Ok(true),
            }),
            power_reads: AtomicUsize::new(0),
        }
    }

    /// Encoded motor with busy flag and drive-enable status.
    pub fn dc_motor_ex() -> Self {
        Self::new(RotaryFeatures {
            encoder: true,
            busy_flag: true,
            drive_enable: true,
        })
    }

    /// Motor with a busy flag only.
    pub fn dc_motor() -> Self {
        Self::new(RotaryFeatures {
            busy_flag: true,
            ..RotaryFeatures::default()
        })
    }

    /// Continuous servo with drive-enable status.
    pub fn cr_servo_ex() -> Self {
        Self::new(RotaryFeatures {
            drive_enable: true,
            ..RotaryFeatures::default()
        })
    }

    /// Continuous servo without any feedback.
    pub fn cr_servo() -> Self {
        Self::new(RotaryFeatures::default())
    }

    pub fn set_power(&self, power: f64) {
        self.state.lock().power = Ok(power);
    }

    pub fn fail_power(&self, error: DeviceError) {
        self.state.lock().power = Err(error);
    }

    pub fn set_encoder(&self, position: i64, velocity: f64) {
        self.state.lock().encoder = Ok(EncoderSample::new(position, velocity));
    }

    pub fn fail_encoder(&self, error: DeviceError) {
        self.state.lock().encoder = Err(error);
    }

    pub fn set_busy(&self, busy: bool) {
        self.state.lock().busy = Ok(busy);
    }

    pub fn fail_busy(&self, error: DeviceError) {
        self.state.lock().busy = Err(error);
    }

    pub fn set_drive_enabled(&self, enabled: bool) {
        self.state.lock().drive_enabled = Ok(enabled);
    }

    pub fn fail_drive_enabled(&self, error: DeviceError) {
        self.state.lock().drive_enabled = Err(error);
    }

    /// Number of times the power has been read.
    pub fn power_reads(&self) -> usize {
        self.power_reads.load(Ordering::Relaxed)
    }
}

impl RotaryActuator for MockMotor {
    fn power(&self) -> DeviceResult<f64> {
        self.power_reads.fetch_add(1, Ordering::Relaxed);
        self.state.lock().power.clone()
    }

    fn features(&self) -> RotaryFeatures {
        self.state.lock().features
    }

    fn encoder(&self) -> DeviceResult<EncoderSample> {
        self.state.lock().encoder.clone()
    }

    fn is_busy(&self) -> DeviceResult<bool> {
        self.state.lock().busy.clone()
    }

    fn drive_enabled(&self) -> DeviceResult<bool> {
        self.state.lock().drive_enabled.clone()
    }
}

impl HardwareDevice for MockMotor {
    fn as_rotary(self: Arc<Self>) -> Option<Arc<dyn RotaryActuator>> {
        Some(self)
    }
}

#[derive(Debug, Clone)]
struct ServoState {
    position: DeviceResult<f64>,
    drive_enabled: DeviceResult<bool>,
}

/// Mock positional actuator.
#[derive(Debug)]
pub struct MockServo {
    state: Mutex<ServoState>,
}

impl MockServo {
    /// Enabled servo at position 0.5.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(ServoState {
                position: Ok(0.5),
                drive_enabled: Ok(true),
            }),
        }
    }

    pub fn set_position(&self, position: f64) {
        self.state.lock().position = Ok(position);
    }

    pub fn fail_position(&self, error: DeviceError) {
        self.state.lock().position = Err(error);
    }

    pub fn set_drive_enabled(&self, enabled: bool) {
        self.state.lock().drive_enabled = Ok(enabled);
    }

    pub fn fail_drive_enabled(&self, error: DeviceError) {
        self.state.lock().drive_enabled = Err(error);
    }
}

impl Default for MockServo {
    fn default() -> Self {
        Self::new()
    }
}

impl PositionalActuator for MockServo {
    fn position(&self) -> DeviceResult<f64> {
        self.state.lock().position.clone()
    }

    fn drive_enabled(&self) -> DeviceResult<bool> {
        self.state.lock().drive_enabled.clone()
    }
}

impl HardwareDevice for MockServo {
    fn as_positional(self: Arc<Self>) -> Option<Arc<dyn PositionalActuator>> {
        Some(self)
    }
}

#[derive(Debug, Clone)]
struct ImuState {
    angular_velocity: DeviceResult<Option<AngularVelocity>>,
    orientation: DeviceResult<Option<Orientation>>,
}

/// Mock inertial sensor.
#[derive(Debug)]
pub struct MockImu {
    state: Mutex<ImuState>,
}

impl MockImu {
    /// Level, motionless IMU.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(ImuState {
                angular_velocity: Ok(Some(AngularVelocity::default())),
                orientation: Ok(Some(Orientation::default())),
            }),
        }
    }

    pub fn set_angular_velocity(&self, velocity: Option<AngularVelocity>) {
        self.state.lock().angular_velocity = Ok(velocity);
    }

    pub fn set_orientation(&self, orientation: Option<Orientation>) {
        self.state.lock().orientation = Ok(orientation);
    }

    /// Make every read fail with `error`.
    pub fn fail(&self, error: DeviceError) {
        let mut state = self.state.lock();
        state.angular_velocity = Err(error.clone());
        state.orientation = Err(error);
    }

    pub fn fail_orientation(&self, error: DeviceError) {
        self.state.lock().orientation = Err(error);
    }
}

impl Default for MockImu {
    fn default() -> Self {
        Self::new()
    }
}

impl InertialSensor for MockImu {
    fn angular_velocity(&self) -> DeviceResult<Option<AngularVelocity>> {
        self.state.lock().angular_velocity.clone()
    }

    fn orientation(&self) -> DeviceResult<Option<Orientation>> {
        self.state.lock().orientation.clone()
    }
}

impl HardwareDevice for MockImu {
    fn as_inertial(self: Arc<Self>) -> Option<Arc<dyn InertialSensor>> {
        Some(self)
    }
}

/// Mock ranging sensor.
#[derive(Debug)]
pub struct MockRangefinder {
    distance: Mutex<DeviceResult<f64>>,
}

impl MockRangefinder {
    /// Sensor reading `distance_cm`.
    pub fn new(distance_cm: f64) -> Self {
        Self {
            distance: Mutex::new(Ok(distance_cm)),
        }
    }

    pub fn set_distance(&self, distance_cm: f64) {
        *self.distance.lock() = Ok(distance_cm);
    }

    pub fn fail(&self, error: DeviceError) {
        *self.distance.lock() = Err(error);
    }
}

impl RangingSensor for MockRangefinder {
    fn distance_cm(&self) -> DeviceResult<f64> {
        self.distance.lock().clone()
    }
}

impl HardwareDevice for MockRangefinder {
    fn as_ranging(self: Arc<Self>) -> Option<Arc<dyn RangingSensor>> {
        Some(self)
    }
}

#[derive(Debug, Clone)]
struct ColorState {
    channels: DeviceResult<ColorChannels>,
    bus: Option<DeviceResult<BusStatus>>,
}

/// Mock chromatic sensor.
#[derive(Debug)]
pub struct MockColorSensor {
    state: Mutex<ColorState>,
}

impl MockColorSensor {
    /// Plain color sensor seeing neutral gray, without bus diagnostics.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(ColorState {
                channels: Ok(ColorChannels::new(100.0, 100.0, 100.0, 300.0)),
                bus: None,
            }),
        }
    }

    /// Color sensor with bus diagnostics, armed at address `0x52`.
    pub fn with_diagnostics() -> Self {
        let sensor = Self::new();
        sensor.set_bus_status(true, Some(0x52));
        sensor
    }

    pub fn set_channels(&self, red: f64, green: f64, blue: f64, alpha: f64) {
        self.state.lock().channels = Ok(ColorChannels::new(red, green, blue, alpha));
    }

    pub fn fail_channels(&self, error: DeviceError) {
        self.state.lock().channels = Err(error);
    }

    pub fn set_bus_status(&self, armed: bool, address: Option<u8>) {
        self.state.lock().bus = Some(Ok(BusStatus { armed, address }));
    }

    pub fn fail_bus_status(&self, error: DeviceError) {
        self.state.lock().bus = Some(Err(error));
    }
}

impl Default for MockColorSensor {
    fn default() -> Self {
        Self::new()
    }
}

impl ChromaticSensor for MockColorSensor {
    fn channels(&self) -> DeviceResult<ColorChannels> {
        self.state.lock().channels.clone()
    }

    fn bus_status(&self) -> Option<DeviceResult<BusStatus>> {
        self.state.lock().bus.clone()
    }

    fn has_diagnostics(&self) -> bool {
        self.state.lock().bus.is_some()
    }
}

impl HardwareDevice for MockColorSensor {
    fn as_chromatic(self: Arc<Self>) -> Option<Arc<dyn ChromaticSensor>> {
        Some(self)
    }
}

#[derive(Debug, Clone)]
struct TouchState {
    value: DeviceResult<f64>,
    pressed: DeviceResult<bool>,
}

/// Mock contact sensor.
#[derive(Debug)]
pub struct MockTouchSensor {
    state: Mutex<TouchState>,
}

impl MockTouchSensor {
    /// Released sensor.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(TouchState {
                value: Ok(0.0),
                pressed: Ok(false),
            }),
        }
    }

    /// Set the analog value; pressed follows `value >= 0.5`.
    pub fn set_value(&self, value: f64) {
        let mut state = self.state.lock();
        state.value = Ok(value);
        state.pressed = Ok(value >= 0.5);
    }

    pub fn fail(&self, error: DeviceError) {
        let mut state = self.state.lock();
        state.value = Err(error.clone());
        state.pressed = Err(error);
    }
}

impl Default for MockTouchSensor {
    fn default() -> Self {
        Self::new()
    }
}

impl ContactSensor for MockTouchSensor {
    fn value(&self) -> DeviceResult<f64> {
        self.state.lock().value.clone()
    }

    fn is_pressed(&self) -> DeviceResult<bool> {
        self.state.lock().pressed.clone()
    }
}

impl HardwareDevice for MockTouchSensor {
    fn as_contact(self: Arc<Self>) -> Option<Arc<dyn ContactSensor>> {
        Some(self)
    }
}

/// Mock supply voltage sensor.
#[derive(Debug)]
pub struct MockVoltageSensor {
    voltage: Mutex<DeviceResult<f64>>,
}

impl MockVoltageSensor {
    /// Sensor reading `volts`.
    pub fn new(volts: f64) -> Self {
        Self {
            voltage: Mutex::new(Ok(volts)),
        }
    }

    pub fn set_voltage(&self, volts: f64) {
        *self.voltage.lock() = Ok(volts);
    }

    pub fn fail(&self, error: DeviceError) {
        *self.voltage.lock() = Err(error);
    }
}

impl PowerSensor for MockVoltageSensor {
    fn voltage(&self) -> DeviceResult<f64> {
        self.voltage.lock().clone()
    }
}

impl HardwareDevice for MockVoltageSensor {
    fn as_power(self: Arc<Self>) -> Option<Arc<dyn PowerSensor>> {
        Some(self)
    }
}

/// Color sensor that also measures distance.
#[derive(Debug)]
pub struct MockColorRangeSensor {
    pub color: MockColorSensor,
    pub range: MockRangefinder,
}

impl MockColorRangeSensor {
    /// Diagnosable color sensor reading `distance_cm`.
    pub fn new(distance_cm: f64) -> Self {
        Self {
            color: MockColorSensor::with_diagnostics(),
            range: MockRangefinder::new(distance_cm),
        }
    }
}

impl ChromaticSensor for MockColorRangeSensor {
    fn channels(&self) -> DeviceResult<ColorChannels> {
        self.color.channels()
    }

    fn bus_status(&self) -> Option<DeviceResult<BusStatus>> {
        self.color.bus_status()
    }

    fn has_diagnostics(&self) -> bool {
        self.color.has_diagnostics()
    }
}

impl RangingSensor for MockColorRangeSensor {
    fn distance_cm(&self) -> DeviceResult<f64> {
        self.range.distance_cm()
    }
}

impl HardwareDevice for MockColorRangeSensor {
    fn as_ranging(self: Arc<Self>) -> Option<Arc<dyn RangingSensor>> {
        Some(self)
    }

    fn as_chromatic(self: Arc<Self>) -> Option<Arc<dyn ChromaticSensor>> {
        Some(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_motor_scripting() {
        let motor = MockMotor::dc_motor_ex();
        motor.set_power(0.8);
        motor.set_encoder(120, 45.0);
        assert_eq!(motor.power(), Ok(0.8));
        assert_eq!(motor.encoder(), Ok(EncoderSample::new(120, 45.0)));
        assert_eq!(motor.model(), "DcMotorEx");
        assert_eq!(motor.power_reads(), 1);

        motor.fail_power(DeviceError::Disconnected);
        assert_eq!(motor.power(), Err(DeviceError::Disconnected));
    }

    #[test]
    fn test_mock_color_sensor_models() {
        assert_eq!(MockColorSensor::new().model(), "ColorSensor");
        assert_eq!(MockColorSensor::with_diagnostics().model(), "RevColorSensorV3");
    }

    #[test]
    fn test_shared_handle_sees_scripted_values() {
        let servo = Arc::new(MockServo::new());
        let device: Arc<dyn HardwareDevice> = servo.clone();
        let positional = device.as_positional();
        assert!(positional.is_some());

        servo.set_position(0.9);
        if let Some(positional) = positional {
            assert_eq!(positional.position(), Ok(0.9));
        }
    }

    #[test]
    fn test_combo_sensor_exposes_both_capabilities() {
        let device: Arc<dyn HardwareDevice> = Arc::new(MockColorRangeSensor::new(25.0));
        assert!(device.clone().as_ranging().is_some());
        assert!(device.clone().as_chromatic().is_some());
        assert!(device.as_rotary().is_none());
    }
}
