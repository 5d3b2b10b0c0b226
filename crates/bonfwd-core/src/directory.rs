// ── Remote directory seam ──
//
// The pipeline only needs four dashboard operations. `Directory` names them
// so the name cache, grouper, and dispatcher can run against an in-memory
// fake in tests; `DashboardDirectory` is the real implementation, scoped to
// one organization.

use tracing::debug;

use bonfwd_api::DashboardClient;
use bonfwd_api::models::{BonjourForwarding, BonjourForwardingUpdate, Network, Organization, Ssid};

use crate::error::CoreError;

/// Error type of every remote call.
pub use bonfwd_api::Error as RemoteError;

/// The remote operations the pipeline depends on.
#[allow(async_fn_in_trait)]
pub trait Directory {
    /// Every network of the organization the directory is scoped to.
    async fn list_networks(&self) -> Result<Vec<Network>, RemoteError>;

    /// The SSID slots of one network.
    async fn list_ssids(&self, network_id: &str) -> Result<Vec<Ssid>, RemoteError>;

    /// Current Bonjour forwarding settings for one SSID.
    async fn get_bonjour_forwarding(
        &self,
        network_id: &str,
        ssid: u8,
    ) -> Result<BonjourForwarding, RemoteError>;

    /// Replace the Bonjour forwarding settings for one SSID.
    async fn update_bonjour_forwarding(
        &self,
        network_id: &str,
        ssid: u8,
        update: &BonjourForwardingUpdate,
    ) -> Result<(), RemoteError>;
}

/// [`Directory`] backed by the dashboard API, scoped to one organization.
pub struct DashboardDirectory {
    client: DashboardClient,
    org_id: String,
}

impl DashboardDirectory {
    pub fn new(client: DashboardClient, org_id: impl Into<String>) -> Self {
        Self {
            client,
            org_id: org_id.into(),
        }
    }
}

impl Directory for DashboardDirectory {
    async fn list_networks(&self) -> Result<Vec<Network>, RemoteError> {
        debug!(org = %self.org_id, "listing networks");
        self.client.list_networks(&self.org_id).await
    }

    async fn list_ssids(&self, network_id: &str) -> Result<Vec<Ssid>, RemoteError> {
        debug!(network = network_id, "listing SSIDs");
        self.client.list_ssids(network_id).await
    }

    async fn get_bonjour_forwarding(
        &self,
        network_id: &str,
        ssid: u8,
    ) -> Result<BonjourForwarding, RemoteError> {
        self.client.get_bonjour_forwarding(network_id, ssid).await
    }

    async fn update_bonjour_forwarding(
        &self,
        network_id: &str,
        ssid: u8,
        update: &BonjourForwardingUpdate,
    ) -> Result<(), RemoteError> {
        self.client
            .update_bonjour_forwarding(network_id, ssid, update)
            .await
            .map(|_| ())
    }
}

// ── Organization selection ──────────────────────────────────────────

/// Pick the organization to work in.
///
/// `wanted` matches an exact id first, then an exact name. Without `wanted`,
/// a lone organization is chosen automatically; several are ambiguous.
pub fn select_organization(
    mut orgs: Vec<Organization>,
    wanted: Option<&str>,
) -> Result<Organization, CoreError> {
    if orgs.is_empty() {
        return Err(CoreError::NoOrganizations);
    }

    match wanted {
        Some(wanted) => {
            let position = orgs
                .iter()
                .position(|o| o.id == wanted)
                .or_else(|| orgs.iter().position(|o| o.name == wanted));
            let Some(i) = position else {
                return Err(CoreError::UnknownOrganization {
                    wanted: wanted.into(),
                    available: org_names(&orgs),
                });
            };
            Ok(orgs.swap_remove(i))
        }
        None if orgs.len() == 1 => Ok(orgs.swap_remove(0)),
        None => Err(CoreError::AmbiguousOrganization {
            available: org_names(&orgs),
        }),
    }
}

fn org_names(orgs: &[Organization]) -> Vec<String> {
    orgs.iter().map(|o| o.name.clone()).collect()
}
