use crate::error::AppError;
use crate::nhl_api::params::{ApiDate, Language};
use crate::nhl_api::session::{Endpoint, NhlSession};
use crate::nhl_api::transport::Transport;
use serde_json::Value;

/// League-wide endpoints: schedule calendar, seasons, standings and the
/// stats API's team, game and glossary listings.
#[derive(Debug)]
pub struct League<'a, T: Transport> {
    session: &'a NhlSession<T>,
}

impl<T: Transport> Clone for League<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: Transport> Copy for League<'_, T> {}

impl<'a, T: Transport> League<'a, T> {
    pub fn new(session: &'a NhlSession<T>) -> Self {
        Self { session }
    }

    /// Schedule calendar for a date in `YYYY-MM-DD` form, no earlier than 1916-12-19.
    ///
    /// The response lists the teams active on that date along with the
    /// surrounding schedule window (`startDate`, `endDate`, `nextStartDate`).
    pub fn get_schedule_calendar(&self, date: &str) -> Result<Value, AppError> {
        let date = ApiDate::schedule_calendar(date)?;
        self.session
            .get_json(&Endpoint::new(format!("/v1/schedule-calendar/{date}")))
    }

    /// Every season id past and present, e.g. `[19171918, ..., 20242025]`.
    pub fn list_season_ids(&self) -> Result<Value, AppError> {
        self.session.get_json(&Endpoint::new("/v1/season"))
    }

    /// Standings as of now, as of `date`, or (with `season_info`) the
    /// per-season standings metadata. `season_info` wins over `date`.
    pub fn get_standings(&self, date: Option<&str>, season_info: bool) -> Result<Value, AppError> {
        let endpoint = standings_endpoint(date, season_info)?;
        self.session.get_json(&endpoint)
    }

    /// All teams from the stats API as `{ "data": [...], "total": n }`.
    pub fn list_team_info(&self, lang: Language) -> Result<Value, AppError> {
        self.session
            .get_json(&Endpoint::stats(format!("/{}/team", lang.code())))
    }

    /// Every completed game across all seasons. The response is large.
    pub fn list_games(&self, lang: Language) -> Result<Value, AppError> {
        self.session
            .get_json(&Endpoint::stats(format!("/{}/game", lang.code())))
    }

    pub fn get_glossary(&self, lang: Language) -> Result<Value, AppError> {
        self.session
            .get_json(&Endpoint::stats(format!("/{}/glossary", lang.code())))
    }
}

pub(crate) fn standings_endpoint(date: Option<&str>, season_info: bool) -> Result<Endpoint, AppError> {
    if season_info {
        return Ok(Endpoint::new("/v1/standings-season"));
    }
    match date {
        Some(date) => {
            let date = ApiDate::parse(date)?;
            Ok(Endpoint::new(format!("/v1/standings/{date}")))
        }
        None => Ok(Endpoint::new("/v1/standings/now")),
    }
}
