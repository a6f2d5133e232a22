use super::Config;
use crate::error::AppError;
use std::path::Path;

/// Validates the configuration settings
///
/// # Validation Rules
/// - Both API origins must be http(s) URLs with a host
/// - HTTP timeout must be positive
/// - If log file path is provided, it cannot be empty
/// - Log file path parent directory must exist or be creatable
pub fn validate_config(config: &Config) -> Result<(), AppError> {
    validate_origin("default_base_url", &config.default_base_url)?;
    validate_origin("stats_base_url", &config.stats_base_url)?;

    if config.http_timeout_seconds == 0 {
        return Err(AppError::config_error("HTTP timeout must be at least 1 second"));
    }

    if let Some(log_path) = &config.log_file_path {
        if log_path.is_empty() {
            return Err(AppError::config_error("Log file path cannot be empty"));
        }

        // Check if parent directory exists or can be created
        if let Some(parent) = Path::new(log_path).parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| {
                AppError::config_error(format!(
                    "Cannot create log directory '{}': {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }

    Ok(())
}

fn validate_origin(name: &str, origin: &str) -> Result<(), AppError> {
    let url = reqwest::Url::parse(origin)
        .map_err(|e| AppError::config_error(format!("{name} '{origin}' is not a valid URL: {e}")))?;

    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(AppError::config_error(format!(
            "{name} must be an http(s) URL, got '{origin}'"
        )));
    }
    if url.query().is_some() {
        return Err(AppError::config_error(format!(
            "{name} must not carry a query string"
        )));
    }
    Ok(())
}
