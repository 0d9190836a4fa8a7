use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::error::MigrateError;
use crate::providers::{bitbucket, github};

pub const GITHUB_PASSWORD_ENV: &str = "BB2GH_GITHUB_PASSWORD";
pub const BITBUCKET_PASSWORD_ENV: &str = "BB2GH_BITBUCKET_PASSWORD";

#[derive(Debug, Deserialize, Default)]
pub struct AppConfig {
    pub bitbucket: Option<BitbucketConfig>,
    pub github: Option<GitHubConfig>,
}

#[derive(Debug, Deserialize, Default)]
pub struct BitbucketConfig {
    pub username: Option<String>,
    pub password: Option<String>,
    pub api_url: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct GitHubConfig {
    /// Account password or a personal access token.
    pub password: Option<String>,
    pub api_url: Option<String>,
}

impl AppConfig {
    pub fn bitbucket_api_url(&self) -> &str {
        self.bitbucket
            .as_ref()
            .and_then(|b| b.api_url.as_deref())
            .unwrap_or(bitbucket::DEFAULT_API_URL)
    }

    pub fn github_api_url(&self) -> &str {
        self.github
            .as_ref()
            .and_then(|g| g.api_url.as_deref())
            .unwrap_or(github::DEFAULT_API_URL)
    }

    pub fn bitbucket_username(&self) -> Option<&str> {
        self.bitbucket.as_ref().and_then(|b| b.username.as_deref())
    }
}

fn config_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".bb2gh")
        .join("config.toml")
}

/// Load the config file. An explicitly given path must exist; the default
/// one is optional.
pub fn load_config(explicit: Option<&Path>) -> Result<AppConfig> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let path = config_path();
            if !path.exists() {
                return Ok(AppConfig::default());
            }
            path
        }
    };
    let contents = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config from {}", path.display()))?;
    let config: AppConfig = toml::from_str(&contents)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    Ok(config)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Username and password; `None` means anonymous access.
    pub bitbucket: Option<(String, String)>,
    pub github_password: String,
}

/// Pick a secret from the config file, then the environment, then the
/// prompt.
pub fn resolve_secret(
    configured: Option<&str>,
    from_env: Option<String>,
    prompt: impl FnOnce() -> Result<String>,
) -> Result<String> {
    if let Some(secret) = configured.filter(|s| !s.is_empty()) {
        return Ok(secret.to_string());
    }
    if let Some(secret) = from_env.filter(|s| !s.is_empty()) {
        return Ok(secret);
    }
    prompt()
}

fn prompt_password(what: &'static str, prompt: &str) -> Result<String> {
    if !std::io::stdin().is_terminal() {
        return Err(MigrateError::MissingCredential(what).into());
    }
    let password = dialoguer::Password::new()
        .with_prompt(prompt)
        .interact()
        .with_context(|| format!("Failed to read {what}"))?;
    Ok(password)
}

pub fn resolve_credentials(
    config: &AppConfig,
    bitbucket_username: Option<&str>,
) -> Result<Credentials> {
    let bitbucket = match bitbucket_username {
        Some(username) => {
            let password = resolve_secret(
                config.bitbucket.as_ref().and_then(|b| b.password.as_deref()),
                std::env::var(BITBUCKET_PASSWORD_ENV).ok(),
                || prompt_password("Bitbucket password", "Please enter your Bitbucket password"),
            )?;
            Some((username.to_string(), password))
        }
        None => None,
    };

    let github_password = resolve_secret(
        config.github.as_ref().and_then(|g| g.password.as_deref()),
        std::env::var(GITHUB_PASSWORD_ENV).ok(),
        || prompt_password("GitHub password", "Please enter your GitHub password"),
    )?;

    Ok(Credentials {
        bitbucket,
        github_password,
    })
}
