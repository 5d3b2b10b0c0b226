// bonfwd-core: CSV rows -> resolved identifiers -> grouped rules -> dashboard
// updates -> report. Each stage hands its output to the next by value.

pub mod cache;
pub mod directory;
pub mod dispatcher;
pub mod error;
pub mod grouper;
pub mod loader;
pub mod model;
pub mod report;

// ── Primary re-exports ──────────────────────────────────────────────
pub use cache::NameCache;
pub use directory::{DashboardDirectory, Directory, RemoteError, select_organization};
pub use dispatcher::{PlannedUpdate, build_update, dispatch, preview};
pub use error::{CoreError, LoadError, ResolveError};
pub use grouper::{Grouping, group_rows};
pub use loader::{COLUMNS, RowReader, load_rows};
pub use model::{GroupKey, RawRow, RowError, RuleGroup, UpdateOutcome};
pub use report::{LineOutcome, Report, ReportLine};

pub use bonfwd_api::models::{
    BonjourForwarding, BonjourForwardingUpdate, BonjourRule, Network, Organization, Ssid,
};
