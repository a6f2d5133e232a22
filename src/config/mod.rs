use crate::constants::{self, env_vars};
use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub mod paths;
pub mod validation;

use paths::{get_config_path, get_log_dir_path};
use validation::validate_config;

/// Configuration structure for the application.
/// Handles loading, saving, and managing application settings.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Origin of the NHL web API
    #[serde(default = "default_base_url")]
    pub default_base_url: String,
    /// Origin of the NHL stats REST API
    #[serde(default = "stats_base_url")]
    pub stats_base_url: String,
    /// HTTP timeout in seconds for API requests. Defaults to 30 seconds if not specified.
    #[serde(default = "default_http_timeout")]
    pub http_timeout_seconds: u64,
    /// Total time budget for retrying one request after connection failures
    #[serde(default = "default_retry_budget")]
    pub retry_max_elapsed_seconds: u64,
    /// Root directory for downloaded data files
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Path to the log file. If not specified, logs will be written to a default location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_file_path: Option<String>,
    /// Bucket receiving uploaded data files. Only ever read from the environment.
    #[serde(skip)]
    pub s3_bucket: Option<String>,
    /// Key prefix for uploaded data files
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub s3_prefix: Option<String>,
    /// Log every outbound request at info level
    #[serde(skip)]
    pub verbose: bool,
}

fn default_base_url() -> String {
    constants::api::DEFAULT_BASE_URL.to_string()
}

fn stats_base_url() -> String {
    constants::api::STATS_BASE_URL.to_string()
}

fn default_http_timeout() -> u64 {
    constants::DEFAULT_HTTP_TIMEOUT_SECONDS
}

fn default_retry_budget() -> u64 {
    constants::retry::MAX_ELAPSED_SECONDS
}

fn default_data_dir() -> PathBuf {
    PathBuf::from(constants::moneypuck::DEFAULT_DATA_DIR)
}

impl Default for Config {
    fn default() -> Self {
        Config {
            default_base_url: default_base_url(),
            stats_base_url: stats_base_url(),
            http_timeout_seconds: default_http_timeout(),
            retry_max_elapsed_seconds: default_retry_budget(),
            data_dir: default_data_dir(),
            log_file_path: None,
            s3_bucket: None,
            s3_prefix: None,
            verbose: false,
        }
    }
}

impl Config {
    /// Loads configuration from the default config file location, falling
    /// back to defaults when no file exists. Environment variables override
    /// file values.
    ///
    /// # Environment Variables
    /// - `NHL_DATA_DEFAULT_BASE_URL` / `NHL_DATA_STATS_BASE_URL` - Override API origins
    /// - `NHL_DATA_HTTP_TIMEOUT` - Override HTTP timeout in seconds (default: 30)
    /// - `NHL_DATA_DIR` - Override data directory
    /// - `NHL_DATA_LOG_FILE` - Override log file path
    /// - `S3_BUCKET_NAME` / `S3_PREFIX` - Upload destination
    pub fn load() -> Result<Self, AppError> {
        let config_path = get_config_path();

        let mut config = if Path::new(&config_path).exists() {
            Self::load_from_path(&config_path)?
        } else {
            Config::default()
        };

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Applies environment variable overrides on top of the current values.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var(env_vars::DEFAULT_BASE_URL) {
            self.default_base_url = url;
        }

        if let Ok(url) = std::env::var(env_vars::STATS_BASE_URL) {
            self.stats_base_url = url;
        }

        if let Some(timeout) = std::env::var(env_vars::HTTP_TIMEOUT)
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
        {
            self.http_timeout_seconds = timeout;
        }

        if let Ok(dir) = std::env::var(env_vars::DATA_DIR) {
            self.data_dir = PathBuf::from(dir);
        }

        if let Ok(log_file_path) = std::env::var(env_vars::LOG_FILE) {
            self.log_file_path = Some(log_file_path);
        }

        if let Ok(bucket) = std::env::var(env_vars::S3_BUCKET_NAME) {
            self.s3_bucket = Some(bucket);
        }

        if let Ok(prefix) = std::env::var(env_vars::S3_PREFIX) {
            self.s3_prefix = Some(prefix);
        }
    }

    /// Validates the configuration settings
    pub fn validate(&self) -> Result<(), AppError> {
        validate_config(self)
    }

    /// Saves current configuration to the default config file location.
    pub fn save(&self) -> Result<(), AppError> {
        self.save_to_path(&get_config_path())
    }

    /// Returns the platform-specific path for the config file.
    pub fn get_config_path() -> String {
        paths::get_config_path()
    }

    /// Returns the platform-specific path for the log directory.
    pub fn get_log_dir_path() -> String {
        paths::get_log_dir_path()
    }

    /// Bucket for uploads, required by the upload planner.
    pub fn require_bucket(&self) -> Result<&str, AppError> {
        self.s3_bucket.as_deref().ok_or_else(|| {
            AppError::config_error(format!(
                "{} is not set; export it to plan uploads",
                env_vars::S3_BUCKET_NAME
            ))
        })
    }

    /// Displays current configuration settings to stdout.
    pub fn display(&self) {
        let config_path = get_config_path();
        let log_dir = get_log_dir_path();

        println!("\nCurrent Configuration");
        println!("────────────────────────────────────");
        println!("Config Location:");
        if Path::new(&config_path).exists() {
            println!("{config_path}");
        } else {
            println!("{config_path} (not created, using defaults)");
        }
        println!("────────────────────────────────────");
        println!("API Origins:");
        println!("default: {}", self.default_base_url);
        println!("stats:   {}", self.stats_base_url);
        println!("────────────────────────────────────");
        println!("HTTP Timeout:");
        println!(
            "{} seconds (retry budget {} seconds)",
            self.http_timeout_seconds, self.retry_max_elapsed_seconds
        );
        println!("────────────────────────────────────");
        println!("Data Directory:");
        println!("{}", self.data_dir.display());
        println!("────────────────────────────────────");
        println!("Upload Bucket:");
        println!("{}", self.s3_bucket.as_deref().unwrap_or("(unset)"));
        println!("────────────────────────────────────");
        println!("Log File Location:");
        if let Some(custom_path) = &self.log_file_path {
            println!("{custom_path}");
        } else {
            println!("{log_dir}/nhl_data.log");
            println!("(Default location)");
        }
    }

    /// Saves configuration to a custom file path, creating the parent
    /// directory if needed.
    ///
    /// # Errors
    /// * `AppError::Config` - If the provided path has no parent directory
    /// * `AppError::Io` - If there's an I/O error creating directories or writing the file
    /// * `AppError::TomlSerialize` - If there's an error serializing the configuration
    pub fn save_to_path(&self, path: &str) -> Result<(), AppError> {
        let config_dir = Path::new(path).parent().ok_or_else(|| {
            AppError::config_error(format!("Path '{path}' has no parent directory"))
        })?;

        if !config_dir.as_os_str().is_empty() && !config_dir.exists() {
            fs::create_dir_all(config_dir)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Loads configuration from a custom file path.
    pub fn load_from_path(path: &str) -> Result<Self, AppError> {
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::tempdir;

    #[test]
    fn test_config_load_existing_file() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        let config_path_str = config_path.to_string_lossy();

        let config_content = r#"
default_base_url = "http://localhost:8080"
log_file_path = "/custom/log/path"
http_timeout_seconds = 10
"#;
        std::fs::write(&config_path, config_content).unwrap();

        let config = Config::load_from_path(&config_path_str).unwrap();

        assert_eq!(config.default_base_url, "http://localhost:8080");
        assert_eq!(config.stats_base_url, constants::api::STATS_BASE_URL);
        assert_eq!(config.log_file_path, Some("/custom/log/path".to_string()));
        assert_eq!(config.http_timeout_seconds, 10);
        assert_eq!(config.retry_max_elapsed_seconds, 15);
    }

    #[test]
    fn test_config_empty_file_uses_defaults() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        std::fs::write(&config_path, "").unwrap();

        let config = Config::load_from_path(&config_path.to_string_lossy()).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_config_save_creates_directory_and_roundtrips() {
        let temp_dir = tempdir().unwrap();
        let config_dir = temp_dir.path().join("nhl_data");
        let config_path = config_dir.join("config.toml");
        let config_path_str = config_path.to_string_lossy();
        let original = Config {
            data_dir: PathBuf::from("/srv/moneypuck"),
            log_file_path: Some("/custom/log/path".to_string()),
            s3_prefix: Some("nhl-data/".to_string()),
            ..Config::default()
        };

        original.save_to_path(&config_path_str).unwrap();
        assert!(config_dir.exists());

        let content = std::fs::read_to_string(&config_path).unwrap();
        assert!(content.contains("default_base_url"));
        assert!(!content.contains("verbose"));

        let loaded = Config::load_from_path(&config_path_str).unwrap();
        assert_eq!(loaded, original);
    }

    #[test]
    #[serial]
    fn test_env_overrides() {
        unsafe {
            std::env::set_var(env_vars::DEFAULT_BASE_URL, "http://127.0.0.1:9999");
            std::env::set_var(env_vars::HTTP_TIMEOUT, "5");
            std::env::set_var(env_vars::S3_BUCKET_NAME, "nhl-bucket");
        }

        let mut config = Config::default();
        config.apply_env_overrides();

        unsafe {
            std::env::remove_var(env_vars::DEFAULT_BASE_URL);
            std::env::remove_var(env_vars::HTTP_TIMEOUT);
            std::env::remove_var(env_vars::S3_BUCKET_NAME);
        }

        assert_eq!(config.default_base_url, "http://127.0.0.1:9999");
        assert_eq!(config.http_timeout_seconds, 5);
        assert_eq!(config.require_bucket().unwrap(), "nhl-bucket");
    }

    #[test]
    #[serial]
    fn test_invalid_timeout_env_is_ignored() {
        unsafe {
            std::env::set_var(env_vars::HTTP_TIMEOUT, "soon");
        }
        let mut config = Config::default();
        config.apply_env_overrides();
        unsafe {
            std::env::remove_var(env_vars::HTTP_TIMEOUT);
        }
        assert_eq!(config.http_timeout_seconds, constants::DEFAULT_HTTP_TIMEOUT_SECONDS);
    }

    #[test]
    fn test_missing_bucket_is_config_error() {
        let config = Config::default();
        assert!(matches!(config.require_bucket(), Err(AppError::Config(_))));
    }
}
