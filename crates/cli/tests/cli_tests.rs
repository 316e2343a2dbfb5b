//! Integration tests for octofault-sim
//!
//! Each test writes a scenario to a temporary directory and checks what the
//! binary prints and how it exits.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

type TestResult = Result<(), Box<dyn std::error::Error>>;

fn octofault_sim() -> Result<Command, Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("octofault-sim")?;
    cmd.env("NO_COLOR", "1").env_remove("RUST_LOG");
    Ok(cmd)
}

fn write_scenario(dir: &TempDir, file: &str, text: &str) -> Result<PathBuf, std::io::Error> {
    let path = dir.path().join(file);
    fs::write(&path, text)?;
    Ok(path)
}

const RANGING: &str = "
config:
  report_tick_duration: false
devices:
  - name: front
    kind: distance
    steps:
      - { distance: -5.0 }
      - { distance: -5.0 }
      - { distance: 50.0 }
  - name: claw
    kind: servo
";

#[test]
fn test_cli_help() -> TestResult {
    octofault_sim()?
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--scenario"))
        .stdout(predicate::str::contains("--sticky"));
    Ok(())
}

#[test]
fn test_faults_are_printed_per_tick() -> TestResult {
    let dir = TempDir::new()?;
    let path = write_scenario(&dir, "robot.yaml", RANGING)?;

    octofault_sim()?
        .arg("--scenario")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Registered Device with the name of {front}, with monitor type: Distance Sensor",
        ))
        .stdout(predicate::str::contains(
            "front is faulty: [WARNING: front: Invalid distance reading: -5.0]",
        ))
        .stdout(predicate::str::contains("front: healthy"))
        .stdout(predicate::str::contains("claw is faulty").not());
    Ok(())
}

#[test]
fn test_sticky_flag_keeps_reasons() -> TestResult {
    let dir = TempDir::new()?;
    let path = write_scenario(&dir, "robot.yaml", RANGING)?;

    octofault_sim()?
        .arg("--scenario")
        .arg(&path)
        .args(["--ticks", "2", "--sticky"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "front is faulty: [WARNING: front: Invalid distance reading: -5.0, WARNING: front: Invalid distance reading: -5.0]",
        ));
    Ok(())
}

#[test]
fn test_json_output_is_one_object_per_line() -> TestResult {
    let dir = TempDir::new()?;
    let path = write_scenario(&dir, "robot.yaml", RANGING)?;

    let output = octofault_sim()?
        .arg("--scenario")
        .arg(&path)
        .args(["--json", "--ticks", "3"])
        .output()?;
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout)?;
    let objects = stdout
        .lines()
        .map(serde_json::from_str::<Value>)
        .collect::<Result<Vec<_>, _>>()?;
    assert_eq!(objects.len(), 4);

    let ticks: Vec<&Value> = objects.iter().skip(1).collect();
    assert_eq!(ticks.first().map(|t| t["faulty"][0]["name"].clone()), Some(Value::from("front")));
    assert_eq!(ticks.last().map(|t| t["faulty"].as_array().map(Vec::len)), Some(Some(0)));
    Ok(())
}

#[test]
fn test_stall_with_long_interval() -> TestResult {
    let dir = TempDir::new()?;
    let path = write_scenario(
        &dir,
        "motor.yaml",
        "
config:
  report_tick_duration: false
devices:
  - name: arm
    kind: motor
    steps:
      - { power: 0.5, encoder: 10, velocity: 30.0 }
",
    )?;

    octofault_sim()?
        .arg("--scenario")
        .arg(&path)
        .args(["--ticks", "2", "--interval-ms", "301"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Encoder not moving despite power (stalled)"));
    Ok(())
}

#[test]
fn test_stall_at_default_interval() -> TestResult {
    let dir = TempDir::new()?;
    let path = write_scenario(
        &dir,
        "motor.yaml",
        "
config:
  report_tick_duration: false
devices:
  - name: arm
    kind: motor
    steps:
      - { power: 0.5, encoder: 10, velocity: 30.0 }
",
    )?;

    octofault_sim()?
        .arg("--scenario")
        .arg(&path)
        .args(["--ticks", "7"])
        .assert()
        .success()
        .stdout(predicate::str::contains("stalled").not());

    octofault_sim()?
        .arg("--scenario")
        .arg(&path)
        .args(["--ticks", "8"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "arm is faulty: [WARNING: arm: Encoder not moving despite power (stalled)]",
        ));
    Ok(())
}

#[test]
fn test_missing_scenario_exits_with_2() -> TestResult {
    octofault_sim()?
        .args(["--scenario", "/nonexistent/robot.yaml"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Failed to read scenario"));
    Ok(())
}

#[test]
fn test_invalid_scenario_exits_with_2() -> TestResult {
    let dir = TempDir::new()?;
    let path = write_scenario(&dir, "robot.yaml", "devices: []\n")?;

    octofault_sim()?
        .arg("--scenario")
        .arg(&path)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("no devices defined"));
    Ok(())
}

#[test]
fn test_bundled_demo_runs() -> TestResult {
    let demo = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../demos/scenarios/robot.yaml");

    octofault_sim()?
        .arg("--scenario")
        .arg(&demo)
        .assert()
        .success()
        .stdout(predicate::str::contains("bumper is faulty"))
        .stdout(predicate::str::contains("with monitor type: Voltage Sensor"));
    Ok(())
}
