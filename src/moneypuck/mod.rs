//! MoneyPuck data files: season/link table scraping, bulk downloads and the
//! object-store upload plan.

pub mod download;
pub mod table;
pub mod upload;

use crate::constants::moneypuck::{SEASONS_BASE_URL, USER_AGENT};
use crate::error::AppError;
use crate::nhl_api::SeasonId;
use reqwest::blocking::Client;
use std::time::Duration;
use tracing::debug;

pub use download::{
    DownloadReport, FailedDownload, LinkConfigEntry, download_season_level, download_skater_csv,
    load_download_config, run_supplementary_downloads, season_file_name, write_links_csv,
};
pub use table::{Category, SeasonLinks, fetch_season_table, parse_season_table};
pub use upload::{UploadItem, plan_uploads};

/// Where page and file bodies come from.
///
/// [`Downloader`] is the network implementation; tests serve bodies from memory.
pub trait FileSource {
    fn fetch_text(&self, url: &str) -> Result<String, AppError>;
    fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, AppError>;
}

/// Blocking HTTP client identifying itself to MoneyPuck.
#[derive(Debug, Clone)]
pub struct Downloader {
    client: Client,
}

impl Downloader {
    pub fn new(timeout_seconds: u64) -> Result<Self, AppError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(timeout_seconds))
            .build()?;
        Ok(Self { client })
    }

    fn get(&self, url: &str) -> Result<reqwest::blocking::Response, AppError> {
        debug!("GET {url}");
        let response = self.client.get(url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(AppError::from_status(status.as_u16(), url));
        }
        Ok(response)
    }
}

impl FileSource for Downloader {
    fn fetch_text(&self, url: &str) -> Result<String, AppError> {
        Ok(self.get(url)?.text()?)
    }

    fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, AppError> {
        Ok(self.get(url)?.bytes()?.to_vec())
    }
}

/// Per-season skater file, e.g. `.../seasons/20232024/20232024_skaters.csv`.
pub fn skater_csv_url(season: SeasonId) -> String {
    format!("{SEASONS_BASE_URL}/{season}/{season}_skaters.csv")
}
