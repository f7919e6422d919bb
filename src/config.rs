use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::{
    env, fs,
    path::{Path, PathBuf},
};

use crate::hn::DEFAULT_API_BASE;

pub const DEFAULT_PAGE_SIZE: usize = 10;
pub const DEFAULT_ISSUES_FILE: &str = "data/issues.json";

/// On-disk `config.toml`. Every key is optional.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub api_base: Option<String>,
    pub page_size: Option<usize>,
    pub issues_file: Option<PathBuf>,
    pub open_command: Option<String>,
    pub header: Option<String>,
}

/// Command-line values that win over the file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub config: Option<PathBuf>,
    pub page_size: Option<usize>,
    pub issues_file: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeConfig {
    pub api_base: String,
    pub page_size: usize,
    pub issues_file: PathBuf,
    pub open_command: Option<String>,
    pub header: Option<String>,
}

pub fn load(overrides: Overrides) -> Result<RuntimeConfig> {
    let file = match overrides.config.as_deref() {
        Some(path) => read_config(path)?,
        None => match default_config_path() {
            Some(path) if path.is_file() => read_config(&path)?,
            _ => AppConfig::default(),
        },
    };
    resolve(file, overrides)
}

fn read_config(path: &Path) -> Result<AppConfig> {
    let txt = fs::read_to_string(path)
        .with_context(|| format!("failed to read config: {}", path.display()))?;
    toml::from_str(&txt).with_context(|| format!("failed to parse toml: {}", path.display()))
}

fn resolve(file: AppConfig, overrides: Overrides) -> Result<RuntimeConfig> {
    let page_size = overrides
        .page_size
        .or(file.page_size)
        .unwrap_or(DEFAULT_PAGE_SIZE);
    if page_size == 0 {
        bail!("page_size must be at least 1");
    }
    Ok(RuntimeConfig {
        api_base: file.api_base.unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
        page_size,
        issues_file: overrides
            .issues_file
            .or(file.issues_file)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_ISSUES_FILE)),
        open_command: file.open_command,
        header: file.header,
    })
}

fn default_config_path() -> Option<PathBuf> {
    let base = match env::var("XDG_CONFIG_HOME") {
        Ok(xdg) => PathBuf::from(xdg),
        Err(_) => PathBuf::from(env::var("HOME").ok()?).join(".config"),
    };
    Some(base.join("newsboard").join("config.toml"))
}
