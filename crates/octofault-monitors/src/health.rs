//! Per-monitor health state and the fault accumulation policy.
//!
//! A tick is evaluated as `begin_tick` / any number of `report` /
//! `finish_tick`. The monitor is healthy after a tick iff nothing was
//! reported during it.

use octofault_telemetry::Severity;
use serde::{Deserialize, Serialize};
use std::fmt;

/// What happens to the previous tick's reasons when a new tick starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FaultAccumulation {
    /// Reasons are cleared before every evaluation; the list only ever holds
    /// the reasons of the latest tick.
    #[default]
    ClearEachTick,
    /// Reasons keep piling up across consecutive faulty ticks and are only
    /// cleared by a tick that detects nothing.
    Sticky,
}

impl fmt::Display for FaultAccumulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FaultAccumulation::ClearEachTick => write!(f, "clear each tick"),
            FaultAccumulation::Sticky => write!(f, "sticky"),
        }
    }
}

/// Health flag and fault reasons of one monitor.
#[derive(Debug, Clone)]
pub struct HealthState {
    name: String,
    healthy: bool,
    reasons: Vec<String>,
    faults_this_tick: usize,
    accumulation: FaultAccumulation,
}

impl HealthState {
    /// Fresh, healthy state for the monitor called `name`.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            healthy: true,
            reasons: Vec::new(),
            faults_this_tick: 0,
            accumulation: FaultAccumulation::default(),
        }
    }

    /// Monitor name used as the reason prefix.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Start evaluating a tick.
    pub fn begin_tick(&mut self) {
        self.faults_this_tick = 0;
        if self.accumulation == FaultAccumulation::ClearEachTick {
            self.reasons.clear();
        }
    }

    /// Record a fault as `"<SEVERITY>: <name>: <text>"`.
    pub fn report(&mut self, severity: Severity, text: impl fmt::Display) {
        let reason = format!("{severity}: {}: {text}", self.name);
        tracing::debug!(monitor = %self.name, %severity, reason = %reason, "Fault detected");
        self.reasons.push(reason);
        self.faults_this_tick = self.faults_this_tick.saturating_add(1);
        self.healthy = false;
    }

    /// Close the tick. A tick without reports leaves the monitor healthy
    /// with no reasons.
    pub fn finish_tick(&mut self) {
        if self.faults_this_tick == 0 {
            self.healthy = true;
            self.reasons.clear();
        }
    }

    /// True iff the last completed tick reported nothing.
    #[must_use]
    pub fn is_healthy(&self) -> bool {
        self.healthy
    }

    /// Current fault reasons.
    #[must_use]
    pub fn reasons(&self) -> &[String] {
        &self.reasons
    }

    /// Faults reported since the last [`HealthState::begin_tick`].
    #[must_use]
    pub fn faults_this_tick(&self) -> usize {
        self.faults_this_tick
    }

    /// Current accumulation policy.
    #[must_use]
    pub fn accumulation(&self) -> FaultAccumulation {
        self.accumulation
    }

    /// Change the accumulation policy; takes effect at the next tick.
    pub fn set_accumulation(&mut self, accumulation: FaultAccumulation) {
        self.accumulation = accumulation;
    }
}
