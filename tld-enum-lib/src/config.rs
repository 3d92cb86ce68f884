//! Configuration file parsing and management.
//!
//! Settings come from, highest precedence first: CLI flags (applied by the
//! binary), `TLD_ENUM_*` environment variables, a local `tld-enum.toml`,
//! `~/.tld-enum.toml`, and `$XDG_CONFIG_HOME/tld-enum/config.toml`.
//!
//! ```toml
//! [defaults]
//! threads = 20
//! output = "acme.yaml"
//! whois_timeout = "15s"
//! tld_url = "https://data.iana.org/TLD/tlds-alpha-by-domain.txt"
//! ```

use crate::error::TldEnumError;
use crate::types::EnumConfig;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

/// Configuration loaded from TOML files.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FileConfig {
    /// Default values for CLI options
    #[serde(skip_serializing_if = "Option::is_none")]
    pub defaults: Option<DefaultsConfig>,
}

/// Default configuration values that map to CLI options.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DefaultsConfig {
    /// Number of concurrent checks
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threads: Option<usize>,

    /// Report file to write
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,

    /// TLD list URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tld_url: Option<String>,

    /// WHOIS timeout (as string, e.g., "5s", "2m")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub whois_timeout: Option<String>,
}

/// Configuration discovery and loading.
#[derive(Debug, Clone, Default)]
pub struct ConfigManager {
    /// Directory searched for a local config file
    local_dir: Option<PathBuf>,
    /// Home directory searched for a global config file
    home_dir: Option<PathBuf>,
    /// XDG config directory
    xdg_config_dir: Option<PathBuf>,
}

impl ConfigManager {
    /// Manager rooted at the current directory, `$HOME` and `$XDG_CONFIG_HOME`.
    pub fn new() -> Self {
        let home_dir = env::var_os("HOME").map(PathBuf::from);
        let xdg_config_dir = env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| home_dir.as_ref().map(|home| home.join(".config")));

        Self {
            local_dir: Some(PathBuf::from(".")),
            home_dir,
            xdg_config_dir,
        }
    }

    /// Manager with explicit search directories.
    pub fn with_dirs(
        local_dir: Option<PathBuf>,
        home_dir: Option<PathBuf>,
        xdg_config_dir: Option<PathBuf>,
    ) -> Self {
        Self {
            local_dir,
            home_dir,
            xdg_config_dir,
        }
    }

    /// Load configuration from a specific file.
    pub fn load_file<P: AsRef<Path>>(&self, path: P) -> Result<FileConfig, TldEnumError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(TldEnumError::config(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        let content = fs::read_to_string(path).map_err(|e| {
            TldEnumError::config(format!(
                "Failed to read configuration file {}: {}",
                path.display(),
                e
            ))
        })?;

        let config: FileConfig = toml::from_str(&content)?;
        self.validate_config(&config)?;

        debug!(path = %path.display(), "loaded configuration file");
        Ok(config)
    }

    /// Discover and merge configuration files in precedence order.
    pub fn discover_and_load(&self) -> Result<FileConfig, TldEnumError> {
        let mut merged_config = FileConfig::default();

        let candidates = [
            self.get_xdg_config_path(),
            self.get_global_config_path(),
            self.get_local_config_path(),
        ];

        // Lowest precedence first, so later files win
        for path in candidates.into_iter().flatten() {
            let config = self.load_file(&path)?;
            merged_config = self.merge_configs(merged_config, config);
        }

        Ok(merged_config)
    }

    fn get_local_config_path(&self) -> Option<PathBuf> {
        let dir = self.local_dir.as_ref()?;
        ["tld-enum.toml", ".tld-enum.toml"]
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.exists())
    }

    fn get_global_config_path(&self) -> Option<PathBuf> {
        let home = self.home_dir.as_ref()?;
        [".tld-enum.toml", "tld-enum.toml"]
            .iter()
            .map(|name| home.join(name))
            .find(|path| path.exists())
    }

    fn get_xdg_config_path(&self) -> Option<PathBuf> {
        let path = self
            .xdg_config_dir
            .as_ref()?
            .join("tld-enum")
            .join("config.toml");
        path.exists().then_some(path)
    }

    /// Merge two configurations; values from `higher` win.
    fn merge_configs(&self, lower: FileConfig, higher: FileConfig) -> FileConfig {
        let defaults = match (lower.defaults, higher.defaults) {
            (Some(lower_defaults), Some(higher_defaults)) => Some(DefaultsConfig {
                threads: higher_defaults.threads.or(lower_defaults.threads),
                output: higher_defaults.output.or(lower_defaults.output),
                tld_url: higher_defaults.tld_url.or(lower_defaults.tld_url),
                whois_timeout: higher_defaults
                    .whois_timeout
                    .or(lower_defaults.whois_timeout),
            }),
            (lower_defaults, higher_defaults) => higher_defaults.or(lower_defaults),
        };

        FileConfig { defaults }
    }

    /// Validate a configuration for common issues.
    fn validate_config(&self, config: &FileConfig) -> Result<(), TldEnumError> {
        let Some(defaults) = &config.defaults else {
            return Ok(());
        };

        if let Some(threads) = defaults.threads {
            if threads == 0 || threads > 100 {
                return Err(TldEnumError::config("threads must be between 1 and 100"));
            }
        }

        if let Some(timeout_str) = &defaults.whois_timeout {
            if parse_timeout_string(timeout_str).is_none() {
                return Err(TldEnumError::config(format!(
                    "Invalid timeout format '{}'. Use format like '5s', '30s', '2m'",
                    timeout_str
                )));
            }
        }

        if let Some(output) = &defaults.output {
            if output.trim().is_empty() {
                return Err(TldEnumError::config("output cannot be empty"));
            }
        }

        Ok(())
    }
}

/// Settings taken from `TLD_ENUM_*` environment variables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvConfig {
    pub threads: Option<usize>,
    pub output: Option<String>,
    pub tld_url: Option<String>,
    pub whois_timeout: Option<Duration>,
}

/// Load configuration from the process environment.
///
/// Invalid values are logged as warnings and ignored.
pub fn load_env_config() -> EnvConfig {
    env_config_from(|key| env::var(key).ok())
}

/// Build an [`EnvConfig`] from an arbitrary variable lookup.
pub fn env_config_from<F>(lookup: F) -> EnvConfig
where
    F: Fn(&str) -> Option<String>,
{
    let mut env_config = EnvConfig::default();

    if let Some(val) = lookup("TLD_ENUM_THREADS") {
        match val.trim().parse::<usize>() {
            Ok(threads) if (1..=100).contains(&threads) => env_config.threads = Some(threads),
            _ => warn!("Invalid TLD_ENUM_THREADS='{}', must be 1-100", val),
        }
    }

    if let Some(output) = lookup("TLD_ENUM_OUTPUT") {
        if !output.trim().is_empty() {
            env_config.output = Some(output);
        }
    }

    if let Some(url) = lookup("TLD_ENUM_TLD_URL") {
        if !url.trim().is_empty() {
            env_config.tld_url = Some(url);
        }
    }

    if let Some(val) = lookup("TLD_ENUM_WHOIS_TIMEOUT") {
        match parse_timeout_string(&val) {
            Some(secs) => env_config.whois_timeout = Some(Duration::from_secs(secs)),
            None => warn!(
                "Invalid TLD_ENUM_WHOIS_TIMEOUT='{}', use format like '5s', '30s', '2m'",
                val
            ),
        }
    }

    env_config
}

/// Layer file and environment settings over the defaults.
pub fn resolve_config(file: &FileConfig, env: &EnvConfig) -> EnumConfig {
    let mut config = EnumConfig::default();

    if let Some(defaults) = &file.defaults {
        if let Some(threads) = defaults.threads {
            config = config.with_concurrency(threads);
        }
        if let Some(output) = &defaults.output {
            config = config.with_output(output.clone());
        }
        if let Some(url) = &defaults.tld_url {
            config = config.with_tld_url(url.clone());
        }
        if let Some(secs) = defaults
            .whois_timeout
            .as_deref()
            .and_then(parse_timeout_string)
        {
            config = config.with_whois_timeout(Duration::from_secs(secs));
        }
    }

    if let Some(threads) = env.threads {
        config = config.with_concurrency(threads);
    }
    if let Some(output) = &env.output {
        config = config.with_output(output.clone());
    }
    if let Some(url) = &env.tld_url {
        config = config.with_tld_url(url.clone());
    }
    if let Some(timeout) = env.whois_timeout {
        config = config.with_whois_timeout(timeout);
    }

    config
}

/// Parse a timeout string like "5s", "30s", "2m" into seconds.
pub fn parse_timeout_string(timeout_str: &str) -> Option<u64> {
    let timeout_str = timeout_str.trim().to_lowercase();

    if let Some(secs) = timeout_str.strip_suffix('s') {
        secs.parse::<u64>().ok()
    } else if let Some(mins) = timeout_str.strip_suffix('m') {
        mins.parse::<u64>().ok().map(|m| m * 60)
    } else {
        // Assume seconds if no unit
        timeout_str.parse::<u64>().ok()
    }
}
