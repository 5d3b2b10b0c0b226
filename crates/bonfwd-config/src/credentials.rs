// ── API key resolution ──
//
// Two sources, picked by availability: the environment variable when it
// holds a non-empty value, otherwise a masked prompt when a terminal is
// attached. With neither, resolution fails before any remote call.

use std::io::IsTerminal;

use secrecy::SecretString;

use crate::ConfigError;

/// Environment variable read unless the config names another.
pub const DEFAULT_API_KEY_ENV: &str = "MERAKI_DASHBOARD_API_KEY";

/// Where the API key comes from.
#[derive(Debug)]
pub enum CredentialSource {
    /// Already read from `var`.
    Environment { var: String, key: SecretString },
    /// Ask on the terminal with echo disabled.
    Interactive { var: String, prompt: String },
}

impl CredentialSource {
    /// Pick the source for `var` from the live environment and stdin.
    pub fn detect(var: &str) -> Result<Self, ConfigError> {
        Self::detect_with(var, std::env::var(var).ok(), std::io::stdin().is_terminal())
    }

    /// Pick the source given an already-read value and terminal state.
    pub fn detect_with(
        var: &str,
        value: Option<String>,
        interactive: bool,
    ) -> Result<Self, ConfigError> {
        match value.map(|v| v.trim().to_owned()).filter(|v| !v.is_empty()) {
            Some(key) => Ok(Self::Environment {
                var: var.into(),
                key: SecretString::from(key),
            }),
            None if interactive => Ok(Self::Interactive {
                var: var.into(),
                prompt: "Enter dashboard API key: ".into(),
            }),
            None => Err(ConfigError::MissingCredential { var: var.into() }),
        }
    }

    /// Short human description, safe to log.
    pub fn describe(&self) -> String {
        match self {
            Self::Environment { var, .. } => format!("environment variable {var}"),
            Self::Interactive { .. } => "interactive prompt".into(),
        }
    }

    /// Produce the key, prompting if this is the interactive source.
    pub fn resolve(self) -> Result<SecretString, ConfigError> {
        match self {
            Self::Environment { key, .. } => Ok(key),
            Self::Interactive { var, prompt } => {
                let entered = rpassword::prompt_password(prompt)
                    .map_err(|source| ConfigError::Prompt { source })?;
                let entered = entered.trim();
                if entered.is_empty() {
                    return Err(ConfigError::MissingCredential { var });
                }
                Ok(SecretString::from(entered.to_owned()))
            }
        }
    }
}
