//! Result reporter.
//!
//! Flattens rejected rows and update outcomes into one line each: rejected
//! rows first (file order), then groups (dispatch order).

use std::fmt;

use crate::model::{RowError, UpdateOutcome};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineOutcome {
    Success,
    Failure(String),
}

/// One line of the final summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportLine {
    /// What the line is about, e.g. `Network 01/Wifi01 (lines 2, 3)`.
    pub subject: String,
    pub outcome: LineOutcome,
}

impl ReportLine {
    pub fn is_success(&self) -> bool {
        self.outcome == LineOutcome::Success
    }
}

impl fmt::Display for ReportLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.outcome {
            LineOutcome::Success => write!(f, "{}: OK", self.subject),
            LineOutcome::Failure(reason) => write!(f, "{}: FAILED: {reason}", self.subject),
        }
    }
}

/// The run summary.
#[derive(Debug, Clone, Default)]
pub struct Report {
    lines: Vec<ReportLine>,
}

impl Report {
    pub fn new(rejected: &[RowError], outcomes: &[UpdateOutcome]) -> Self {
        let rows = rejected.iter().map(|r| ReportLine {
            subject: format!("line {}: {}/{}", r.row.line, r.row.network, r.row.ssid),
            outcome: LineOutcome::Failure(r.error.to_string()),
        });

        let groups = outcomes.iter().map(|o| ReportLine {
            subject: format!(
                "{}/{} ({})",
                o.group.network_name,
                o.group.ssid_name,
                describe_lines(&o.group.lines)
            ),
            outcome: match &o.error {
                None => LineOutcome::Success,
                Some(detail) => LineOutcome::Failure(detail.clone()),
            },
        });

        Self {
            lines: rows.chain(groups).collect(),
        }
    }

    pub fn lines(&self) -> &[ReportLine] {
        &self.lines
    }

    pub fn success_count(&self) -> usize {
        self.lines.iter().filter(|l| l.is_success()).count()
    }

    pub fn failure_count(&self) -> usize {
        self.lines.len() - self.success_count()
    }

    /// `true` only if every row and every group succeeded.
    pub fn succeeded(&self) -> bool {
        self.lines.iter().all(ReportLine::is_success)
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

fn describe_lines(lines: &[u64]) -> String {
    let list = lines
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    if lines.len() == 1 {
        format!("line {list}")
    } else {
        format!("lines {list}")
    }
}
