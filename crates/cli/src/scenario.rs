//! Scenario files: which devices exist and what they read on each tick

use octofault_devices::{HardwareDevice, InMemoryDeviceRegistry};
use octofault_watchdog::FaultManagerConfig;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use crate::error::SimError;
use crate::sim::{SimDevice, SimKind, Step, TickCursor};

/// A simulated robot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    /// Fault manager configuration; defaults apply when omitted.
    #[serde(default)]
    pub config: FaultManagerConfig,
    /// Monitor voltage sensors through the power extension hook.
    #[serde(default)]
    pub power_monitors: bool,
    pub devices: Vec<DeviceSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeviceSpec {
    pub name: String,
    /// Extra registry names bound to the same device.
    #[serde(default)]
    pub aliases: Vec<String>,
    pub kind: SimKind,
    #[serde(default)]
    pub steps: Vec<Step>,
}

impl Scenario {
    /// Load and validate a scenario, picking the parser from the extension.
    pub fn load(path: &Path) -> Result<Self, SimError> {
        let text = std::fs::read_to_string(path).map_err(|source| SimError::ScenarioRead {
            path: path.to_path_buf(),
            source,
        })?;
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        let scenario: Scenario = match extension.as_deref() {
            Some("yaml" | "yml") => serde_yaml::from_str(&text).map_err(|e| SimError::ScenarioParse {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?,
            Some("json") => serde_json::from_str(&text).map_err(|e| SimError::ScenarioParse {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?,
            _ => return Err(SimError::UnsupportedFormat(path.to_path_buf())),
        };
        scenario.validate()?;
        Ok(scenario)
    }

    pub fn validate(&self) -> Result<(), SimError> {
        self.config.validate()?;
        if self.devices.is_empty() {
            return Err(SimError::InvalidScenario("no devices defined".to_string()));
        }

        let mut names = HashSet::new();
        for spec in &self.devices {
            for name in std::iter::once(&spec.name).chain(&spec.aliases) {
                if name.trim().is_empty() {
                    return Err(SimError::InvalidScenario("device name is empty".to_string()));
                }
                if !names.insert(name.as_str()) {
                    return Err(SimError::InvalidScenario(format!(
                        "device name '{name}' is used twice"
                    )));
                }
            }
        }
        Ok(())
    }

    /// Longest device script, in ticks.
    pub fn script_len(&self) -> usize {
        self.devices
            .iter()
            .map(|spec| spec.steps.len())
            .max()
            .unwrap_or(0)
    }

    /// Build the registry of simulated devices, all reading from `cursor`.
    pub fn build_registry(&self, cursor: &Arc<TickCursor>) -> InMemoryDeviceRegistry {
        let mut registry = InMemoryDeviceRegistry::new();
        for spec in &self.devices {
            let device: Arc<dyn HardwareDevice> = Arc::new(SimDevice::new(
                spec.kind,
                spec.steps.clone(),
                Arc::clone(cursor),
            ));
            registry.insert(spec.name.clone(), Arc::clone(&device));
            for alias in &spec.aliases {
                registry.insert(alias.clone(), Arc::clone(&device));
            }
            tracing::debug!(device = %spec.name, kind = ?spec.kind, steps = spec.steps.len(), "Simulated device created");
        }
        registry
    }
}
