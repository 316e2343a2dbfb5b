//! Scripted devices driven by a shared tick cursor

use octofault_devices::{
    AngularVelocity, BusStatus, ChromaticSensor, ColorChannels, ContactSensor, DeviceError,
    DeviceResult, EncoderSample, HardwareDevice, InertialSensor, Orientation, PositionalActuator,
    PowerSensor, RangingSensor, RotaryActuator, RotaryFeatures,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Which simulated device to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimKind {
    /// Encoded motor with busy flag and drive-enable status.
    Motor,
    /// Motor with a busy flag only.
    BasicMotor,
    /// Continuous-rotation servo with drive-enable status.
    CrServo,
    Servo,
    Imu,
    Distance,
    /// Color sensor without bus diagnostics.
    Color,
    /// Color sensor with bus diagnostics.
    ColorV3,
    Touch,
    Voltage,
}

impl SimKind {
    fn rotary_features(self) -> Option<RotaryFeatures> {
        match self {
            SimKind::Motor => Some(RotaryFeatures {
                encoder: true,
                busy_flag: true,
                drive_enable: true,
            }),
            SimKind::BasicMotor => Some(RotaryFeatures {
                busy_flag: true,
                ..RotaryFeatures::default()
            }),
            SimKind::CrServo => Some(RotaryFeatures {
                drive_enable: true,
                ..RotaryFeatures::default()
            }),
            _ => None,
        }
    }
}

/// One scripted tick. Readings carry over to later ticks until overridden;
/// `error` does not carry over.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Step {
    pub power: Option<f64>,
    pub encoder: Option<i64>,
    pub velocity: Option<f64>,
    pub busy: Option<bool>,
    pub enabled: Option<bool>,
    pub position: Option<f64>,
    pub angular_velocity: Option<[f64; 3]>,
    pub orientation: Option<[f64; 3]>,
    pub distance: Option<f64>,
    pub rgba: Option<[f64; 4]>,
    pub armed: Option<bool>,
    pub address: Option<u8>,
    pub value: Option<f64>,
    pub volts: Option<f64>,
    /// Every read on this tick fails with this driver message.
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
struct Readings {
    power: f64,
    encoder: i64,
    velocity: f64,
    busy: bool,
    enabled: bool,
    position: f64,
    angular_velocity: [f64; 3],
    orientation: [f64; 3],
    distance: f64,
    rgba: [f64; 4],
    armed: bool,
    address: u8,
    value: f64,
    volts: f64,
}

impl Default for Readings {
    fn default() -> Self {
        Self {
            power: 0.0,
            encoder: 0,
            velocity: 0.0,
            busy: false,
            enabled: true,
            position: 0.5,
            angular_velocity: [0.0; 3],
            orientation: [0.0; 3],
            distance: 50.0,
            rgba: [100.0, 100.0, 100.0, 300.0],
            armed: true,
            address: 0x52,
            value: 0.0,
            volts: 12.0,
        }
    }
}

impl Readings {
    fn apply(&mut self, step: &Step) {
        if let Some(v) = step.power {
            self.power = v;
        }
        if let Some(v) = step.encoder {
            self.encoder = v;
        }
        if let Some(v) = step.velocity {
            self.velocity = v;
        }
        if let Some(v) = step.busy {
            self.busy = v;
        }
        if let Some(v) = step.enabled {
            self.enabled = v;
        }
        if let Some(v) = step.position {
            self.position = v;
        }
        if let Some(v) = step.angular_velocity {
            self.angular_velocity = v;
        }
        if let Some(v) = step.orientation {
            self.orientation = v;
        }
        if let Some(v) = step.distance {
            self.distance = v;
        }
        if let Some(v) = step.rgba {
            self.rgba = v;
        }
        if let Some(v) = step.armed {
            self.armed = v;
        }
        if let Some(v) = step.address {
            self.address = v;
        }
        if let Some(v) = step.value {
            self.value = v;
        }
        if let Some(v) = step.volts {
            self.volts = v;
        }
    }
}

/// Current tick shared by every simulated device.
#[derive(Debug, Default)]
pub struct TickCursor(AtomicUsize);

impl TickCursor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, tick: usize) {
        self.0.store(tick, Ordering::SeqCst);
    }

    pub fn get(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

/// Device replaying a script. The last step repeats once the script runs out.
#[derive(Debug)]
pub struct SimDevice {
    kind: SimKind,
    steps: Vec<Step>,
    cursor: Arc<TickCursor>,
}

impl SimDevice {
    pub fn new(kind: SimKind, steps: Vec<Step>, cursor: Arc<TickCursor>) -> Self {
        Self {
            kind,
            steps,
            cursor,
        }
    }

    fn read<T>(&self, f: impl FnOnce(&Readings) -> T) -> DeviceResult<T> {
        let last = self.cursor.get().min(self.steps.len().saturating_sub(1));
        let mut readings = Readings::default();
        for step in self.steps.iter().take(last.saturating_add(1)) {
            readings.apply(step);
        }
        match self.steps.get(last).and_then(|step| step.error.as_deref()) {
            Some(message) => Err(DeviceError::driver(message)),
            None => Ok(f(&readings)),
        }
    }
}

impl RotaryActuator for SimDevice {
    fn power(&self) -> DeviceResult<f64> {
        self.read(|r| r.power)
    }

    fn features(&self) -> RotaryFeatures {
        self.kind.rotary_features().unwrap_or_default()
    }

    fn encoder(&self) -> DeviceResult<EncoderSample> {
        self.read(|r| EncoderSample::new(r.encoder, r.velocity))
    }

    fn is_busy(&self) -> DeviceResult<bool> {
        self.read(|r| r.busy)
    }

    fn drive_enabled(&self) -> DeviceResult<bool> {
        self.read(|r| r.enabled)
    }
}

impl PositionalActuator for SimDevice {
    fn position(&self) -> DeviceResult<f64> {
        self.read(|r| r.position)
    }

    fn drive_enabled(&self) -> DeviceResult<bool> {
        self.read(|r| r.enabled)
    }
}

impl InertialSensor for SimDevice {
    fn angular_velocity(&self) -> DeviceResult<Option<AngularVelocity>> {
        self.read(|r| {
            let [x, y, z] = r.angular_velocity;
            Some(AngularVelocity { x, y, z })
        })
    }

    fn orientation(&self) -> DeviceResult<Option<Orientation>> {
        self.read(|r| {
            let [yaw, pitch, roll] = r.orientation;
            Some(Orientation::new(yaw, pitch, roll))
        })
    }
}

impl RangingSensor for SimDevice {
    fn distance_cm(&self) -> DeviceResult<f64> {
        self.read(|r| r.distance)
    }
}

impl ChromaticSensor for SimDevice {
    fn channels(&self) -> DeviceResult<ColorChannels> {
        self.read(|r| {
            let [red, green, blue, alpha] = r.rgba;
            ColorChannels::new(red, green, blue, alpha)
        })
    }

    fn bus_status(&self) -> Option<DeviceResult<BusStatus>> {
        self.has_diagnostics().then(|| {
            self.read(|r| BusStatus {
                armed: r.armed,
                address: Some(r.address),
            })
        })
    }

    fn has_diagnostics(&self) -> bool {
        self.kind == SimKind::ColorV3
    }
}

impl ContactSensor for SimDevice {
    fn value(&self) -> DeviceResult<f64> {
        self.read(|r| r.value)
    }

    fn is_pressed(&self) -> DeviceResult<bool> {
        self.read(|r| r.value >= 0.5)
    }
}

impl PowerSensor for SimDevice {
    fn voltage(&self) -> DeviceResult<f64> {
        self.read(|r| r.volts)
    }
}

impl HardwareDevice for SimDevice {
    fn as_rotary(self: Arc<Self>) -> Option<Arc<dyn RotaryActuator>> {
        self.kind
            .rotary_features()
            .map(|_| self as Arc<dyn RotaryActuator>)
    }

    fn as_positional(self: Arc<Self>) -> Option<Arc<dyn PositionalActuator>> {
        (self.kind == SimKind::Servo).then_some(self as Arc<dyn PositionalActuator>)
    }

    fn as_inertial(self: Arc<Self>) -> Option<Arc<dyn InertialSensor>> {
        (self.kind == SimKind::Imu).then_some(self as Arc<dyn InertialSensor>)
    }

    fn as_ranging(self: Arc<Self>) -> Option<Arc<dyn RangingSensor>> {
        (self.kind == SimKind::Distance).then_some(self as Arc<dyn RangingSensor>)
    }

    fn as_chromatic(self: Arc<Self>) -> Option<Arc<dyn ChromaticSensor>> {
        matches!(self.kind, SimKind::Color | SimKind::ColorV3).then_some(self as Arc<dyn ChromaticSensor>)
    }

    fn as_contact(self: Arc<Self>) -> Option<Arc<dyn ContactSensor>> {
        (self.kind == SimKind::Touch).then_some(self as Arc<dyn ContactSensor>)
    }

    fn as_power(self: Arc<Self>) -> Option<Arc<dyn PowerSensor>> {
        (self.kind == SimKind::Voltage).then_some(self as Arc<dyn PowerSensor>)
    }
}
