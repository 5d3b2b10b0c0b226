//! The apply run: credentials, CSV, organization, resolve, update, report.

use tracing::{debug, info};

use bonfwd_api::{DashboardClient, TransportConfig};
use bonfwd_config::{Config, CredentialSource};
use bonfwd_core::{
    DashboardDirectory, Grouping, NameCache, Report, dispatch, group_rows, load_rows, preview,
};

use crate::cli::Cli;
use crate::error::CliError;
use crate::output;
use crate::prompt;

const CONFIRM_PROMPT: &str = "Proceed with updating Bonjour settings?";

/// Apply CLI overrides on top of the loaded config.
fn merge_overrides(cfg: &mut Config, cli: &Cli) {
    let dashboard = &mut cfg.dashboard;
    if let Some(ref url) = cli.base_url {
        dashboard.base_url.clone_from(url);
    }
    if let Some(secs) = cli.timeout {
        dashboard.timeout = secs;
    }
    if cli.org.is_some() {
        dashboard.organization.clone_from(&cli.org);
    }
}

pub async fn run(cli: Cli) -> Result<(), CliError> {
    let mut cfg = bonfwd_config::load_config(cli.config.as_deref())?;
    merge_overrides(&mut cfg, &cli);
    let settings = &cfg.dashboard;
    let base_url = settings.base_url()?;
    let color = output::should_color(&cli.color);

    // Both of these abort before any remote call.
    let source = CredentialSource::detect(&settings.api_key_env)?;
    debug!(source = %source.describe(), "resolving API key");
    let api_key = source.resolve()?;

    let path = prompt::csv_path(cli.file)?;
    let rows = load_rows(&path)?;
    info!(rows = rows.len(), path = %path.display(), "loaded CSV");

    let transport = TransportConfig::default().with_timeout(settings.timeout());
    let client = DashboardClient::from_api_key(base_url.as_str(), &api_key, &transport)
        .map_err(|e| CliError::from_remote("build the HTTP client", base_url.as_str(), e))?;

    let orgs = client
        .list_organizations()
        .await
        .map_err(|e| CliError::from_remote("list organizations", base_url.as_str(), e))?;
    let org = prompt::organization(orgs, settings.organization.as_deref(), base_url.as_str())?;
    eprintln!("Organization: {} ({})", org.name, org.id);

    let directory = DashboardDirectory::new(client, org.id);
    let mut cache = NameCache::new(&directory);
    let Grouping { groups, rejected } = group_rows(&mut cache, rows)
        .await
        .map_err(|e| CliError::from_core(e, base_url.as_str()))?;
    info!(groups = groups.len(), rejected = rejected.len(), "resolved rows");

    if cli.dry_run {
        let planned = preview(&directory, &groups).await;
        output::print_output(&output::render_plan(&planned));
        let report = Report::new(&rejected, &[]);
        output::print_output(&output::render_report(&report, color));
        eprintln!("Dry run: {} update(s) planned, nothing sent.", planned.len());
        return finish(&report);
    }

    if !groups.is_empty() && !prompt::confirm(CONFIRM_PROMPT, cli.yes)? {
        return Err(CliError::Aborted);
    }

    let bar = output::progress_bar(groups.len());
    let outcomes = dispatch(&directory, groups, |outcome| {
        bar.set_message(outcome.group.key.to_string());
        bar.inc(1);
    })
    .await;
    bar.finish_and_clear();

    let report = Report::new(&rejected, &outcomes);
    output::print_output(&output::render_report(&report, color));
    eprintln!("{}", output::summary(&report));
    finish(&report)
}

fn finish(report: &Report) -> Result<(), CliError> {
    if report.succeeded() {
        Ok(())
    } else {
        Err(CliError::UpdatesFailed {
            failed: report.failure_count(),
            total: report.lines().len(),
        })
    }
}
