//! Interactive helpers. Every prompt checks for a terminal first so that
//! piped or scripted runs fail with a usage error instead of hanging.

use std::io::{self, IsTerminal};
use std::path::PathBuf;

use dialoguer::{Confirm, Input, Select};

use bonfwd_core::{CoreError, Organization, select_organization};

use crate::error::CliError;

fn interactive() -> bool {
    io::stdin().is_terminal()
}

/// Use `given` when present, otherwise ask until an existing file is named.
pub fn csv_path(given: Option<PathBuf>) -> Result<PathBuf, CliError> {
    if let Some(path) = given {
        return Ok(path);
    }
    if !interactive() {
        return Err(CliError::NoInput);
    }

    loop {
        let answer: String = Input::new()
            .with_prompt("Path to the CSV file")
            .interact_text()?;
        let path = PathBuf::from(answer.trim());
        if path.is_file() {
            return Ok(path);
        }
        eprintln!("No such file: {}", path.display());
    }
}

/// Pick the organization, offering a selection list when the choice is ambiguous.
pub fn organization(
    orgs: Vec<Organization>,
    wanted: Option<&str>,
    base_url: &str,
) -> Result<Organization, CliError> {
    match select_organization(orgs.clone(), wanted) {
        Err(CoreError::AmbiguousOrganization { .. }) if interactive() => {
            let names: Vec<&str> = orgs.iter().map(|o| o.name.as_str()).collect();
            let choice = Select::new()
                .with_prompt("Which organization should be updated?")
                .items(&names)
                .default(0)
                .interact()?;
            orgs.into_iter()
                .nth(choice)
                .ok_or_else(|| CliError::Prompt {
                    message: format!("selection {choice} is out of range"),
                })
        }
        other => other.map_err(|e| CliError::from_core(e, base_url)),
    }
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !interactive() {
        return Err(CliError::NonInteractiveRequiresYes);
    }
    Ok(Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()?)
}
