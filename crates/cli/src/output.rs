//! Output formatting for simulation runs

use colored::*;
use octofault_telemetry::{Severity, TelemetryLine};
use octofault_watchdog::TickReport;
use serde_json::json;

/// Print the registration lines emitted while scanning devices
pub fn print_setup_human(monitors: usize, lines: &[TelemetryLine]) {
    println!("{} {monitors} monitors registered", "[setup]".bold());
    for line in lines {
        println!("  {} {}", marker(line), line.text);
    }
}

/// Print the registration lines as a single JSON line
pub fn print_setup_json(monitors: usize, lines: &[TelemetryLine]) {
    let output = json!({
        "monitors": monitors,
        "lines": texts(lines),
    });
    println!("{output}");
}

/// Print one tick in human-readable format
pub fn print_tick_human(tick: usize, report: &TickReport, lines: &[TelemetryLine]) {
    let status = if report.is_clean() {
        "OK".green()
    } else {
        "FAULT".red().bold()
    };
    println!(
        "{} {} ({} monitors, {} faulty)",
        format!("[tick {tick}]").bold(),
        status,
        report.monitors_checked,
        report.faulty.len()
    );
    for line in lines {
        println!("  {} {}", marker(line), line.text);
    }
}

/// Print one tick as a single JSON line
pub fn print_tick_json(tick: usize, report: &TickReport, lines: &[TelemetryLine]) {
    let faulty: Vec<_> = report
        .faulty
        .iter()
        .map(|line| json!({ "name": line.name, "reasons": line.reasons }))
        .collect();
    let output = json!({
        "tick": tick,
        "monitors_checked": report.monitors_checked,
        "duration_us": u64::try_from(report.duration.as_micros()).unwrap_or(u64::MAX),
        "faulty": faulty,
        "lines": texts(lines),
    });
    println!("{output}");
}

/// Print the final health of every monitor
pub fn print_summary_human<'a>(health: impl IntoIterator<Item = (&'a String, &'a bool)>) {
    println!("{}", "Final health:".bold());
    for (name, healthy) in health {
        let state = if *healthy { "healthy".green() } else { "faulty".red() };
        println!("  {name}: {state}");
    }
}

fn texts(lines: &[TelemetryLine]) -> Vec<&str> {
    lines.iter().map(|line| line.text.as_str()).collect()
}

fn marker(line: &TelemetryLine) -> ColoredString {
    match (line.level, line.effective_level()) {
        (None, _) => "!".red(),
        (Some(_), Severity::Error) => "E".red(),
        (Some(_), Severity::Warning) => "W".yellow(),
        (Some(_), Severity::Info) => "i".blue(),
        (Some(_), Severity::Debug) => "d".dimmed(),
    }
}
