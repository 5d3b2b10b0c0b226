//! CLI error types with miette diagnostics.
//!
//! Maps config, loader and dashboard failures into user-facing errors with
//! actionable help text and a stable exit code.

use miette::Diagnostic;
use thiserror::Error;

use bonfwd_config::ConfigError;
use bonfwd_core::{CoreError, LoadError, RemoteError};

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to the dashboard at {url}")]
    #[diagnostic(
        code(bonfwd::connection_failed),
        help(
            "Check network access to the dashboard API.\n\
             URL: {url}\n\
             Override it with --base-url or BONFWD_BASE_URL."
        )
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: RemoteError,
    },

    #[error("Request to the dashboard timed out")]
    #[diagnostic(
        code(bonfwd::timeout),
        help("Increase the timeout with --timeout or [dashboard] timeout in the config file.")
    )]
    Timeout {
        #[source]
        source: RemoteError,
    },

    // ── Authentication ───────────────────────────────────────────────
    #[error("No API key available")]
    #[diagnostic(
        code(bonfwd::no_credentials),
        help(
            "Set {var} in the environment or in a .env file,\n\
             or run bonfwd from a terminal to be prompted for it."
        )
    )]
    NoCredentials { var: String },

    #[error("The dashboard rejected the API key")]
    #[diagnostic(
        code(bonfwd::auth_failed),
        help("Check that the key is valid and has API access enabled for the organization.")
    )]
    AuthFailed,

    // ── Organization ─────────────────────────────────────────────────
    #[error("Organization '{wanted}' not found")]
    #[diagnostic(code(bonfwd::unknown_organization), help("Available organizations: {available}"))]
    UnknownOrganization { wanted: String, available: String },

    #[error("The API key can access several organizations")]
    #[diagnostic(
        code(bonfwd::ambiguous_organization),
        help(
            "Pick one with --org <id or name>.\n\
             Available organizations: {available}"
        )
    )]
    AmbiguousOrganization { available: String },

    #[error("The API key has access to no organizations")]
    #[diagnostic(code(bonfwd::no_organizations))]
    NoOrganizations,

    // ── Input ────────────────────────────────────────────────────────
    #[error("Malformed CSV: {source}")]
    #[diagnostic(
        code(bonfwd::malformed_csv),
        help(
            "Expected the columns: Network Name, SSID Name, Description, VLAN, Services.\n\
             Nothing was sent to the dashboard; fix the file and run again."
        )
    )]
    MalformedCsv {
        #[source]
        source: LoadError,
    },

    #[error("Cannot read the CSV file: {source}")]
    #[diagnostic(code(bonfwd::csv_unreadable))]
    CsvUnreadable {
        #[source]
        source: LoadError,
    },

    #[error("No CSV file given")]
    #[diagnostic(
        code(bonfwd::no_input),
        help("Pass the file with --file (-f) or set BONFWD_FILE.")
    )]
    NoInput,

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(bonfwd::validation))]
    Validation { field: String, reason: String },

    // ── API ──────────────────────────────────────────────────────────
    #[error("Failed to {operation}")]
    #[diagnostic(code(bonfwd::api_error))]
    ApiError {
        operation: String,
        #[source]
        source: RemoteError,
    },

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Updating Bonjour settings requires confirmation")]
    #[diagnostic(
        code(bonfwd::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes,

    #[error("Aborted; no changes were made")]
    #[diagnostic(code(bonfwd::aborted))]
    Aborted,

    #[error("Prompt failed: {message}")]
    #[diagnostic(code(bonfwd::prompt))]
    Prompt { message: String },

    // ── Outcome ──────────────────────────────────────────────────────
    #[error("{failed} of {total} entries failed")]
    #[diagnostic(
        code(bonfwd::partial_failure),
        help("Failed entries are listed above. Fix them and run again; successful ones are safe to re-apply.")
    )]
    UpdatesFailed { failed: usize, total: usize },

    // ── Configuration ────────────────────────────────────────────────
    #[error(transparent)]
    #[diagnostic(code(bonfwd::config))]
    Config(ConfigError),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::NoCredentials { .. } | Self::AuthFailed => exit_code::AUTH,
            Self::UnknownOrganization { .. }
            | Self::AmbiguousOrganization { .. }
            | Self::MalformedCsv { .. }
            | Self::CsvUnreadable { .. }
            | Self::NoInput
            | Self::Validation { .. }
            | Self::NonInteractiveRequiresYes => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }

    /// Classify a failed dashboard call made while trying to `operation`.
    pub fn from_remote(operation: &str, base_url: &str, err: RemoteError) -> Self {
        if matches!(err, RemoteError::InvalidApiKey) {
            Self::AuthFailed
        } else if err.is_timeout() {
            Self::Timeout { source: err }
        } else if err.is_connect() {
            Self::ConnectionFailed {
                url: base_url.to_owned(),
                source: err,
            }
        } else {
            Self::ApiError {
                operation: operation.to_owned(),
                source: err,
            }
        }
    }

    /// Map a core failure, using `base_url` for connection diagnostics.
    pub fn from_core(err: CoreError, base_url: &str) -> Self {
        match err {
            CoreError::Load(source) => source.into(),
            CoreError::Directory { operation, source } => {
                Self::from_remote(operation, base_url, source)
            }
            CoreError::NoOrganizations => Self::NoOrganizations,
            CoreError::UnknownOrganization { wanted, available } => Self::UnknownOrganization {
                wanted,
                available: available.join(", "),
            },
            CoreError::AmbiguousOrganization { available } => Self::AmbiguousOrganization {
                available: available.join(", "),
            },
        }
    }
}

// ── Conversions ──────────────────────────────────────────────────────

impl From<LoadError> for CliError {
    fn from(err: LoadError) -> Self {
        match err {
            LoadError::Open { .. } => Self::CsvUnreadable { source: err },
            LoadError::MalformedRow { .. } | LoadError::Read { .. } => {
                Self::MalformedCsv { source: err }
            }
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::MissingCredential { var } => Self::NoCredentials { var },
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            other => Self::Config(other),
        }
    }
}

impl From<dialoguer::Error> for CliError {
    fn from(err: dialoguer::Error) -> Self {
        Self::Prompt {
            message: err.to_string(),
        }
    }
}
