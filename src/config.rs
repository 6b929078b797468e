use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Ok, Result, bail};
use glob::Pattern;
use serde::{Deserialize, Serialize};

use crate::core::directive::DEFAULT_MARKER;

pub const CONFIG_FILE_NAME: &str = "apiscribe.json";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Project root; struct declarations are collected below it.
    #[serde(default = "default_root")]
    pub root: String,
    /// Where documented handlers live. Defaults to `root`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc_root: Option<String>,
    /// Additional trees to collect struct declarations from.
    #[serde(default)]
    pub extra_roots: Vec<String>,
    #[serde(default)]
    pub include_vendor: bool,
    #[serde(default)]
    pub ignores: Vec<String>,
    #[serde(default = "default_output")]
    pub output: String,
    #[serde(default = "default_marker")]
    pub marker: String,
}

fn default_root() -> String {
    ".".to_string()
}

fn default_output() -> String {
    "api-docs.json".to_string()
}

fn default_marker() -> String {
    DEFAULT_MARKER.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root: default_root(),
            doc_root: None,
            extra_roots: Vec::new(),
            include_vendor: false,
            ignores: Vec::new(),
            output: default_output(),
            marker: default_marker(),
        }
    }
}

impl Config {
    /// Validate configuration values.
    ///
    /// Rejects invalid glob patterns in `ignores` and a marker that is empty
    /// or contains whitespace.
    pub fn validate(&self) -> Result<()> {
        for pattern in &self.ignores {
            if pattern.contains('*') || pattern.contains('?') {
                Pattern::new(pattern)
                    .with_context(|| format!("Invalid glob pattern in 'ignores': \"{}\"", pattern))?;
            }
        }

        if self.marker.trim().is_empty() {
            bail!("'marker' must not be empty");
        }
        if self.marker.chars().any(char::is_whitespace) {
            bail!("'marker' must be a single token: \"{}\"", self.marker);
        }

        Ok(())
    }

    pub fn doc_root(&self) -> &str {
        self.doc_root.as_deref().unwrap_or(&self.root)
    }
}

pub fn default_config_json() -> Result<String> {
    let config = Config::default();
    serde_json::to_string_pretty(&config).context("Failed to generate default config.")
}

pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }
        if current.join(".git").exists() {
            return None;
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Result of loading configuration.
pub struct ConfigLoadResult {
    pub config: Config,
    /// Directory relative config paths resolve against: the config file's
    /// directory, or the start directory when no file was found.
    pub base_dir: PathBuf,
    /// True if config was loaded from a file, false if using defaults.
    pub from_file: bool,
}

pub fn load_config(start_dir: &Path) -> Result<ConfigLoadResult> {
    match find_config_file(start_dir) {
        Some(path) => {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?;
            config.validate()?;
            let base_dir = path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| start_dir.to_path_buf());
            Ok(ConfigLoadResult {
                config,
                base_dir,
                from_file: true,
            })
        }
        None => Ok(ConfigLoadResult {
            config: Config::default(),
            base_dir: start_dir.to_path_buf(),
            from_file: false,
        }),
    }
}

/// Resolve a configured path against `base_dir`; absolute paths are kept.
pub fn resolve_path(base_dir: &Path, path: &str) -> PathBuf {
    let p = Path::new(path);
    if p.is_absolute() {
        return p.to_path_buf();
    }
    let rel = p.strip_prefix(".").unwrap_or(p);
    if rel.as_os_str().is_empty() {
        base_dir.to_path_buf()
    } else {
        base_dir.join(rel)
    }
}
