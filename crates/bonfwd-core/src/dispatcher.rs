//! Update dispatcher.
//!
//! One `PUT` per [`RuleGroup`], in group order. A failed call is recorded
//! in its [`UpdateOutcome`] and the next group is still attempted. Nothing
//! is retried.

use tracing::{info, warn};

use bonfwd_api::models::{BonjourForwarding, BonjourForwardingUpdate, BonjourRule};

use crate::directory::Directory;
use crate::model::{RuleGroup, UpdateOutcome};

/// Canonical spellings of the services the dashboard knows about.
pub const BONJOUR_SERVICES: [&str; 11] = [
    "All Services",
    "AirPlay",
    "AFP",
    "BitTorrent",
    "FTP",
    "iChat",
    "iTunes",
    "Printers",
    "Samba",
    "Scanners",
    "SSH",
];

/// Map a service name to its canonical spelling; unknown names pass through.
pub fn canonical_service(name: &str) -> &str {
    BONJOUR_SERVICES
        .iter()
        .find(|known| known.eq_ignore_ascii_case(name))
        .copied()
        .unwrap_or(name)
}

/// Canonicalize and de-duplicate (case-insensitively), keeping first-seen order.
pub fn normalize_services(services: &[String]) -> Vec<String> {
    let mut normalized: Vec<String> = Vec::with_capacity(services.len());
    for service in services {
        let canonical = canonical_service(service);
        if !normalized.iter().any(|s| s.eq_ignore_ascii_case(canonical)) {
            normalized.push(canonical.to_owned());
        }
    }
    normalized
}

/// The request body that replaces `group`'s SSID configuration.
pub fn build_update(group: &RuleGroup) -> BonjourForwardingUpdate {
    BonjourForwardingUpdate {
        enabled: true,
        rules: vec![BonjourRule {
            description: group.description.clone(),
            vlan_id: group.vlan.to_string(),
            services: normalize_services(&group.services),
        }],
    }
}

/// Apply every group, calling `on_outcome` after each attempt.
pub async fn dispatch<D: Directory>(
    directory: &D,
    groups: Vec<RuleGroup>,
    mut on_outcome: impl FnMut(&UpdateOutcome),
) -> Vec<UpdateOutcome> {
    let mut outcomes = Vec::with_capacity(groups.len());

    for group in groups {
        let update = build_update(&group);
        let result = directory
            .update_bonjour_forwarding(&group.key.network_id, group.key.ssid, &update)
            .await;

        let error = match result {
            Ok(()) => {
                info!(target_group = %group.key, "updated Bonjour forwarding");
                None
            }
            Err(e) => {
                warn!(target_group = %group.key, error = %e, "update failed");
                Some(e.to_string())
            }
        };

        let outcome = UpdateOutcome { group, error };
        on_outcome(&outcome);
        outcomes.push(outcome);
    }

    outcomes
}

// ── Dry run ─────────────────────────────────────────────────────────

/// What an update would change, without applying it.
#[derive(Debug)]
pub struct PlannedUpdate<'a> {
    pub group: &'a RuleGroup,
    /// Current remote settings; `None` when they could not be fetched.
    pub current: Option<BonjourForwarding>,
    pub update: BonjourForwardingUpdate,
}

/// Fetch current settings for each group and pair them with the payload.
///
/// A failed fetch is logged and leaves `current` empty; it never aborts.
pub async fn preview<'a, D: Directory>(
    directory: &D,
    groups: &'a [RuleGroup],
) -> Vec<PlannedUpdate<'a>> {
    let mut planned = Vec::with_capacity(groups.len());

    for group in groups {
        let current = match directory
            .get_bonjour_forwarding(&group.key.network_id, group.key.ssid)
            .await
        {
            Ok(current) => Some(current),
            Err(e) => {
                warn!(target_group = %group.key, error = %e, "could not fetch current settings");
                None
            }
        };

        planned.push(PlannedUpdate {
            group,
            current,
            update: build_update(group),
        });
    }

    planned
}
