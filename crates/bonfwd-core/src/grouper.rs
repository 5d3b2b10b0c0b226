//! Rule grouper.
//!
//! Resolves every row and folds rows that land on the same
//! (network, SSID) pair into one [`RuleGroup`]. Groups keep the order in
//! which their key first appeared in the file.

use indexmap::IndexMap;
use indexmap::map::Entry;
use tracing::{debug, info};

use crate::cache::NameCache;
use crate::directory::Directory;
use crate::error::{CoreError, ResolveError};
use crate::model::{GroupKey, RawRow, RowError, RuleGroup};

/// Output of the grouping stage.
#[derive(Debug, Default)]
pub struct Grouping {
    /// One entry per distinct (network id, SSID) pair, first-seen order.
    pub groups: Vec<RuleGroup>,
    /// Rows skipped because a name did not resolve, in file order.
    pub rejected: Vec<RowError>,
}

/// Resolve and merge `rows` (already in file order).
///
/// Unknown names are recorded against their row and processing continues.
/// A failing directory listing aborts the whole stage.
pub async fn group_rows<D: Directory>(
    cache: &mut NameCache<'_, D>,
    rows: Vec<RawRow>,
) -> Result<Grouping, CoreError> {
    let total = rows.len();
    let mut groups: IndexMap<GroupKey, RuleGroup> = IndexMap::new();
    let mut rejected = Vec::new();

    for row in rows {
        let key = match cache.resolve(&row.network, &row.ssid).await {
            Ok(key) => key,
            Err(ResolveError::Directory { operation, source }) => {
                return Err(CoreError::Directory { operation, source });
            }
            Err(error) => {
                debug!(line = row.line, %error, "row rejected");
                rejected.push(RowError { row, error });
                continue;
            }
        };

        match groups.entry(key) {
            Entry::Occupied(mut slot) => slot.get_mut().merge(row),
            Entry::Vacant(slot) => {
                let group = RuleGroup::new(slot.key().clone(), row);
                slot.insert(group);
            }
        }
    }

    info!(
        rows = total,
        groups = groups.len(),
        rejected = rejected.len(),
        "grouped rows"
    );

    Ok(Grouping {
        groups: groups.into_values().collect(),
        rejected,
    })
}
