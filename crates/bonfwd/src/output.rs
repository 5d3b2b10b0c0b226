//! Output rendering: report lines, the dry-run plan table, and progress.

use std::io::{self, IsTerminal, Write};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use bonfwd_core::{LineOutcome, PlannedUpdate, Report, ReportLine};

use crate::cli::ColorMode;

// ── Color detection ──────────────────────────────────────────────────

/// Determine whether color should be used based on the color mode and
/// terminal detection.
pub fn should_color(mode: &ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
    }
}

// ── Report ───────────────────────────────────────────────────────────

pub fn render_line(line: &ReportLine, color: bool) -> String {
    if !color {
        return line.to_string();
    }
    match &line.outcome {
        LineOutcome::Success => format!("{}: {}", line.subject, "OK".green().bold()),
        LineOutcome::Failure(reason) => {
            format!("{}: {}: {reason}", line.subject, "FAILED".red().bold())
        }
    }
}

pub fn render_report(report: &Report, color: bool) -> String {
    report
        .lines()
        .iter()
        .map(|line| render_line(line, color))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn summary(report: &Report) -> String {
    format!(
        "{} succeeded, {} failed",
        report.success_count(),
        report.failure_count()
    )
}

// ── Dry-run plan ─────────────────────────────────────────────────────

#[derive(Tabled)]
struct PlanRow {
    #[tabled(rename = "Network")]
    network: String,
    #[tabled(rename = "SSID")]
    ssid: String,
    #[tabled(rename = "Lines")]
    lines: String,
    #[tabled(rename = "Current")]
    current: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "VLAN")]
    vlan: String,
    #[tabled(rename = "Services")]
    services: String,
}

impl From<&PlannedUpdate<'_>> for PlanRow {
    fn from(p: &PlannedUpdate<'_>) -> Self {
        let current = match &p.current {
            Some(c) if c.enabled => format!("enabled, {} rule(s)", c.rules.len()),
            Some(_) => "disabled".into(),
            None => "unavailable".into(),
        };
        let rule = p.update.rules.first();
        Self {
            network: p.group.network_name.clone(),
            ssid: format!("{} (#{})", p.group.ssid_name, p.group.key.ssid),
            lines: join(p.group.lines.iter().map(ToString::to_string)),
            current,
            description: rule.map(|r| r.description.clone()).unwrap_or_default(),
            vlan: rule.map(|r| r.vlan_id.clone()).unwrap_or_default(),
            services: rule.map(|r| r.services.join(", ")).unwrap_or_default(),
        }
    }
}

fn join(parts: impl Iterator<Item = String>) -> String {
    parts.collect::<Vec<_>>().join(", ")
}

pub fn render_plan(planned: &[PlannedUpdate<'_>]) -> String {
    let rows: Vec<PlanRow> = planned.iter().map(PlanRow::from).collect();
    Table::new(rows).with(Style::rounded()).to_string()
}

// ── Progress ─────────────────────────────────────────────────────────

/// A progress bar on stderr; hidden automatically when stderr is not a terminal.
pub fn progress_bar(len: usize) -> ProgressBar {
    let bar = ProgressBar::new(u64::try_from(len).unwrap_or(u64::MAX));
    bar.set_style(
        ProgressStyle::with_template("{spinner} [{bar:30}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> "),
    );
    bar.enable_steady_tick(Duration::from_millis(120));
    bar
}

/// Print rendered output to stdout, skipping empty strings.
pub fn print_output(output: &str) {
    if output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}
