use super::resources::{Games, League, Players, Teams};
use super::retry::RetryPolicy;
use super::session::{BaseUrls, NhlSession};
use super::transport::{ReqwestTransport, Transport};
use crate::config::Config;
use crate::error::AppError;
use std::time::Duration;
use tracing::{debug, info};

/// Entry point to the NHL APIs.
///
/// Owns one session; every resource client borrows it. The underlying
/// connection is released when the client is closed or dropped, so leaving
/// a scope early through `?` or a panic still releases it.
///
/// ```rust,no_run
/// use nhl_data::{Config, NhlClient};
///
/// # fn main() -> Result<(), nhl_data::AppError> {
/// let standings = NhlClient::scoped(&Config::default(), |client| {
///     client.league().get_standings(None, false)
/// })?;
/// println!("{standings}");
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct NhlClient<T: Transport = ReqwestTransport> {
    session: NhlSession<T>,
}

impl NhlClient<ReqwestTransport> {
    /// Opens a client using the configured origins, timeout and retry budget.
    pub fn open(config: &Config) -> Result<Self, AppError> {
        let transport = ReqwestTransport::new(config.http_timeout_seconds)?;
        let session = NhlSession::new(
            transport,
            BaseUrls::new(&config.default_base_url, &config.stats_base_url),
        )
        .with_retry_policy(RetryPolicy::with_max_elapsed(Duration::from_secs(
            config.retry_max_elapsed_seconds,
        )))
        .with_verbose(config.verbose);

        info!(
            "Opened NHL API session ({}, {})",
            config.default_base_url, config.stats_base_url
        );
        Ok(Self { session })
    }

    /// Opens a client, runs `f` with it and closes it again, whatever `f` returns.
    pub fn scoped<R>(
        config: &Config,
        f: impl FnOnce(&Self) -> Result<R, AppError>,
    ) -> Result<R, AppError> {
        let client = Self::open(config)?;
        let result = f(&client);
        client.close();
        result
    }
}

impl<T: Transport> NhlClient<T> {
    pub fn with_session(session: NhlSession<T>) -> Self {
        Self { session }
    }

    pub fn with_transport(transport: T, base_urls: BaseUrls) -> Self {
        Self::with_session(NhlSession::new(transport, base_urls))
    }

    pub fn session(&self) -> &NhlSession<T> {
        &self.session
    }

    pub fn league(&self) -> League<'_, T> {
        League::new(&self.session)
    }

    pub fn teams(&self) -> Teams<'_, T> {
        Teams::new(&self.session, self.league())
    }

    pub fn players(&self) -> Players<'_, T> {
        Players::new(&self.session)
    }

    pub fn games(&self) -> Games<'_, T> {
        Games::new(&self.session)
    }

    /// Releases the session now instead of at end of scope.
    pub fn close(self) {
        drop(self);
    }
}

impl<T: Transport> Drop for NhlClient<T> {
    fn drop(&mut self) {
        debug!("Closing NHL API session");
    }
}
