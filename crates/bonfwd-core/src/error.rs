// ── Core error types ──
//
// Three tiers, matching how far a failure is allowed to travel:
// `LoadError` and `CoreError` abort the run, `ResolveError` is recorded
// against a single CSV row while the rest of the file carries on.
// Update failures never become errors at all; they are captured in
// `UpdateOutcome`.

use std::path::PathBuf;

use thiserror::Error;

use crate::directory::RemoteError;

/// Fatal failure while reading the input CSV.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is structurally wrong at `line` (1-based, header is line 1).
    #[error("line {line}: {reason}")]
    MalformedRow { line: u64, reason: String },

    #[error("line {line}: read failed: {message}")]
    Read { line: u64, message: String },
}

/// Why a single row's network or SSID name could not be turned into an id.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("network '{name}' not found in organization")]
    UnknownNetwork { name: String },

    #[error("network '{name}' has no wireless product and cannot carry SSIDs")]
    NotWireless { name: String },

    #[error("SSID '{name}' not found in network")]
    UnknownSsid { network_id: String, name: String },

    /// The directory listing itself failed. Not row-level: aborts the run.
    #[error("failed to {operation}: {source}")]
    Directory {
        operation: &'static str,
        #[source]
        source: RemoteError,
    },
}

/// Unified fatal error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Load(#[from] LoadError),

    // ── Directory ────────────────────────────────────────────────────
    #[error("failed to {operation}: {source}")]
    Directory {
        operation: &'static str,
        #[source]
        source: RemoteError,
    },

    // ── Organization selection ───────────────────────────────────────
    #[error("the API key has access to no organizations")]
    NoOrganizations,

    #[error("organization '{wanted}' not found")]
    UnknownOrganization { wanted: String, available: Vec<String> },

    #[error("{} organizations available; choose one", available.len())]
    AmbiguousOrganization { available: Vec<String> },
}
