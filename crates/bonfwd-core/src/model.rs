// ── Pipeline data types ──
//
// Every type here is produced by exactly one stage and handed by value to
// the next. Nothing is mutated after it leaves the stage that built it.

use std::fmt;

use serde::Serialize;

use crate::error::ResolveError;

/// One validated data line of the input CSV.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RawRow {
    /// 1-based line number in the file (the header is line 1).
    pub line: u64,
    pub network: String,
    pub ssid: String,
    pub description: String,
    pub vlan: u16,
    /// Comma-split, trimmed, never empty, in file order.
    pub services: Vec<String>,
}

/// Identity of one Bonjour forwarding target.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct GroupKey {
    pub network_id: String,
    /// SSID slot number within the network.
    pub ssid: u8,
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/ssid-{}", self.network_id, self.ssid)
    }
}

/// The merged configuration for one (network, SSID) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleGroup {
    pub key: GroupKey,
    pub network_name: String,
    pub ssid_name: String,
    /// Last write wins.
    pub description: String,
    /// Last write wins.
    pub vlan: u16,
    /// Union across merged rows, first-seen spelling and order. No two
    /// entries are equal ignoring ASCII case.
    pub services: Vec<String>,
    /// CSV lines merged into this group, in file order.
    pub lines: Vec<u64>,
}

impl RuleGroup {
    /// Start a group from the first row that references `key`.
    pub fn new(key: GroupKey, row: RawRow) -> Self {
        let mut group = Self {
            key,
            network_name: row.network,
            ssid_name: row.ssid,
            description: row.description,
            vlan: row.vlan,
            services: Vec::with_capacity(row.services.len()),
            lines: vec![row.line],
        };
        group.add_services(row.services);
        group
    }

    /// Fold a later row for the same key into this group.
    pub fn merge(&mut self, row: RawRow) {
        self.description = row.description;
        self.vlan = row.vlan;
        self.add_services(row.services);
        self.lines.push(row.line);
    }

    fn add_services(&mut self, services: Vec<String>) {
        for service in services {
            if !self.services.iter().any(|s| s.eq_ignore_ascii_case(&service)) {
                self.services.push(service);
            }
        }
    }
}

/// A row whose names could not be resolved. Skipped, then reported.
#[derive(Debug)]
pub struct RowError {
    pub row: RawRow,
    pub error: ResolveError,
}

/// Result of one update call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateOutcome {
    pub group: RuleGroup,
    /// `None` on success, the dashboard's message otherwise.
    pub error: Option<String>,
}

impl UpdateOutcome {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}
