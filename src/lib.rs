//! NHL statistics client and data-file tooling
//!
//! This library wraps the public NHL web and stats APIs behind a small
//! blocking client, snapshots sample responses to disk, and downloads
//! MoneyPuck season data files.
//!
//! # Examples
//!
//! ```rust,no_run
//! use nhl_data::{AppError, Config, NhlClient};
//! use nhl_data::nhl_api::Language;
//!
//! fn main() -> Result<(), AppError> {
//!     let config = Config::load()?;
//!
//!     NhlClient::scoped(&config, |client| {
//!         let blues = client.teams().get_info(19, Language::En)?;
//!         println!("{}", blues["fullName"]);
//!
//!         let standings = client.league().get_standings(Some("2024-01-15"), false)?;
//!         println!("{}", serde_json::to_string_pretty(&standings)?);
//!         Ok(())
//!     })
//! }
//! ```

pub mod cli;
pub mod collect;
pub mod commands;
pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod moneypuck;
pub mod nhl_api;
pub mod testing_utils;

// Re-export commonly used types for convenience
pub use config::Config;
pub use error::AppError;
pub use nhl_api::{NhlClient, NhlSession, ReqwestTransport, Transport};

/// Current version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
