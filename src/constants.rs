//! Application-wide constants and configuration values
//!
//! This module centralizes API origins, timeouts, retry tuning and the
//! environment variable names read by the configuration layer.

/// Default timeout for HTTP requests in seconds
pub const DEFAULT_HTTP_TIMEOUT_SECONDS: u64 = 30;

/// Origins of the two NHL APIs
pub mod api {
    /// Web API serving gamecenter, player, club and standings endpoints
    pub const DEFAULT_BASE_URL: &str = "http://api-web.nhle.com";

    /// Stats REST API serving team lists, game lists, glossary and shift charts
    pub const STATS_BASE_URL: &str = "https://api.nhle.com/stats/rest";

    pub const USER_AGENT: &str = "nhl-api-client/1.0.0";

    /// Earliest date the schedule calendar endpoint serves
    pub const SCHEDULE_CALENDAR_FLOOR: &str = "1916-12-19";
}

/// Retry configuration for transient network failures
pub mod retry {
    /// First backoff before jitter (milliseconds)
    pub const INITIAL_BACKOFF_MS: u64 = 500;

    /// Upper bound for a single wait (seconds)
    pub const MAX_BACKOFF_SECONDS: u64 = 8;

    /// Total time budget across all attempts of one request (seconds)
    pub const MAX_ELAPSED_SECONDS: u64 = 15;
}

/// MoneyPuck data site
pub mod moneypuck {
    pub const DATA_PAGE_URL: &str = "https://moneypuck.com/data.htm";

    pub const SEASON_TABLE_SELECTOR: &str = "#page-content-wrapper > div:nth-child(1) > table";

    pub const SEASONS_BASE_URL: &str = "https://moneypuck.com/moneypuck/playerData/seasons";

    pub const USER_AGENT: &str = "nhl_data/https://github.com/bbrewington/nhl-data";

    /// Default location for downloaded files, relative to the working directory
    pub const DEFAULT_DATA_DIR: &str = "data/moneypuck";

    /// Subdirectory holding the per-season category files
    pub const SEASON_LEVEL_SUBDIR: &str = "season_level";
}

/// Environment variable names
pub mod env_vars {
    pub const DEFAULT_BASE_URL: &str = "NHL_DATA_DEFAULT_BASE_URL";

    pub const STATS_BASE_URL: &str = "NHL_DATA_STATS_BASE_URL";

    /// HTTP timeout override in seconds (default: 30)
    pub const HTTP_TIMEOUT: &str = "NHL_DATA_HTTP_TIMEOUT";

    pub const DATA_DIR: &str = "NHL_DATA_DIR";

    pub const LOG_FILE: &str = "NHL_DATA_LOG_FILE";

    /// Bucket receiving uploaded data files
    pub const S3_BUCKET_NAME: &str = "S3_BUCKET_NAME";

    pub const S3_PREFIX: &str = "S3_PREFIX";
}
