//! Name resolution cache.
//!
//! Turns human-readable network and SSID names into dashboard identifiers.
//! The network list is fetched once, on the first lookup; each network's SSID
//! list is fetched once, on the first lookup inside that network. Nothing is
//! refreshed for the rest of the run. Matching is exact and case-sensitive.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::directory::Directory;
use crate::error::ResolveError;
use crate::model::GroupKey;

#[derive(Debug, Clone)]
struct NetworkEntry {
    id: String,
    wireless: bool,
}

/// Memoized name → id lookups over a [`Directory`].
pub struct NameCache<'d, D> {
    directory: &'d D,
    /// Network name → entry. `None` until the first network lookup.
    networks: Option<HashMap<String, NetworkEntry>>,
    /// Network id → (SSID name → slot number).
    ssids: HashMap<String, HashMap<String, u8>>,
}

impl<'d, D: Directory> NameCache<'d, D> {
    pub fn new(directory: &'d D) -> Self {
        Self {
            directory,
            networks: None,
            ssids: HashMap::new(),
        }
    }

    /// Resolve a network name to its id.
    pub async fn resolve_network(&mut self, name: &str) -> Result<String, ResolveError> {
        let networks = self.networks().await?;
        match networks.get(name) {
            Some(entry) if entry.wireless => Ok(entry.id.clone()),
            Some(_) => Err(ResolveError::NotWireless { name: name.into() }),
            None => Err(ResolveError::UnknownNetwork { name: name.into() }),
        }
    }

    /// Resolve an SSID name to its slot number within `network_id`.
    pub async fn resolve_ssid(&mut self, network_id: &str, name: &str) -> Result<u8, ResolveError> {
        if !self.ssids.contains_key(network_id) {
            let listed = self
                .directory
                .list_ssids(network_id)
                .await
                .map_err(|source| ResolveError::Directory {
                    operation: "list SSIDs",
                    source,
                })?;
            debug!(network = network_id, count = listed.len(), "cached SSIDs");

            let mut by_name = HashMap::with_capacity(listed.len());
            for ssid in listed {
                by_name.entry(ssid.name).or_insert(ssid.number);
            }
            self.ssids.insert(network_id.to_owned(), by_name);
        }

        self.ssids
            .get(network_id)
            .and_then(|by_name| by_name.get(name))
            .copied()
            .ok_or_else(|| ResolveError::UnknownSsid {
                network_id: network_id.into(),
                name: name.into(),
            })
    }

    /// Resolve both names of a row into its group key.
    pub async fn resolve(&mut self, network: &str, ssid: &str) -> Result<GroupKey, ResolveError> {
        let network_id = self.resolve_network(network).await?;
        let ssid = self.resolve_ssid(&network_id, ssid).await?;
        Ok(GroupKey { network_id, ssid })
    }

    async fn networks(&mut self) -> Result<&HashMap<String, NetworkEntry>, ResolveError> {
        if self.networks.is_none() {
            let listed =
                self.directory
                    .list_networks()
                    .await
                    .map_err(|source| ResolveError::Directory {
                        operation: "list networks",
                        source,
                    })?;
            debug!(count = listed.len(), "cached networks");

            let mut by_name = HashMap::with_capacity(listed.len());
            for network in listed {
                if by_name.contains_key(&network.name) {
                    warn!(name = %network.name, id = %network.id, "duplicate network name, keeping first");
                    continue;
                }
                let entry = NetworkEntry {
                    wireless: network.is_wireless(),
                    id: network.id,
                };
                by_name.insert(network.name, entry);
            }
            self.networks = Some(by_name);
        }

        Ok(self.networks.get_or_insert_with(HashMap::new))
    }
}
