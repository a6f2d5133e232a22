//! Typed endpoint arguments.
//!
//! Every value here is validated when it is constructed, so a resource method
//! holding one can build its path without further checks and a rejected
//! argument never reaches the network.

use crate::constants::api::SCHEDULE_CALENDAR_FLOOR;
use crate::error::AppError;
use chrono::{Datelike, NaiveDate};
use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

static SEASON_ID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^((19|20)\d{2}){2}$").expect("season pattern is valid"));

static YEAR_MONTH_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-(0[1-9]|1[0-2])$").expect("month pattern is valid"));

/// Season identifier in `YYYYYYYY` form, e.g. `20232024`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SeasonId(u32);

impl SeasonId {
    pub fn new(raw: u32) -> Result<Self, AppError> {
        raw.to_string().parse()
    }

    /// The season in progress (or about to start) on `today`.
    /// Seasons roll over in September.
    pub fn current(today: NaiveDate) -> Self {
        let year = today.year() as u32;
        let start = if today.month() >= 9 { year } else { year - 1 };
        SeasonId(start * 10_000 + start + 1)
    }

    pub fn value(self) -> u32 {
        self.0
    }

    pub fn start_year(self) -> u32 {
        self.0 / 10_000
    }
}

impl FromStr for SeasonId {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if !SEASON_ID_PATTERN.is_match(trimmed) {
            return Err(AppError::validation_error(format!(
                "season_id must be YYYYYYYY format, got '{s}'"
            )));
        }
        trimmed
            .parse::<u32>()
            .map(SeasonId)
            .map_err(|e| AppError::validation_error(format!("season_id '{s}': {e}")))
    }
}

impl TryFrom<u32> for SeasonId {
    type Error = AppError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        SeasonId::new(value)
    }
}

impl fmt::Display for SeasonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Regular season or playoffs. The discriminant is the API's game type id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameType {
    Regular = 2,
    Playoffs = 3,
}

impl GameType {
    pub fn id(self) -> u8 {
        self as u8
    }

    pub fn as_str(self) -> &'static str {
        match self {
            GameType::Regular => "regular",
            GameType::Playoffs => "playoffs",
        }
    }
}

impl FromStr for GameType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "regular" => Ok(GameType::Regular),
            "playoffs" => Ok(GameType::Playoffs),
            other => Err(AppError::validation_error(format!(
                "game_type must be 'regular' or 'playoffs', got '{other}'"
            ))),
        }
    }
}

impl fmt::Display for GameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerType {
    Skater,
    Goalie,
}

impl PlayerType {
    pub fn slug(self) -> &'static str {
        match self {
            PlayerType::Skater => "skater",
            PlayerType::Goalie => "goalie",
        }
    }
}

impl FromStr for PlayerType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "skater" => Ok(PlayerType::Skater),
            "goalie" => Ok(PlayerType::Goalie),
            other => Err(AppError::validation_error(format!(
                "player_type must be 'skater' or 'goalie', got '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScheduleType {
    #[default]
    Season,
    Month,
    Week,
}

impl FromStr for ScheduleType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "season" => Ok(ScheduleType::Season),
            "month" => Ok(ScheduleType::Month),
            "week" => Ok(ScheduleType::Week),
            other => Err(AppError::validation_error(format!(
                "schedule_type must be 'season', 'month', or 'week', got '{other}'"
            ))),
        }
    }
}

/// Response language of the stats API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    #[default]
    En,
    Fr,
}

impl Language {
    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Fr => "fr",
        }
    }
}

impl FromStr for Language {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "en" => Ok(Language::En),
            "fr" => Ok(Language::Fr),
            other => Err(AppError::validation_error(format!(
                "lang must be 'en' or 'fr', got '{other}'"
            ))),
        }
    }
}

/// Calendar date in the API's `YYYY-MM-DD` form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ApiDate(NaiveDate);

impl ApiDate {
    pub fn parse(s: &str) -> Result<Self, AppError> {
        NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map(ApiDate)
            .map_err(|e| AppError::validation_error(format!("date must be YYYY-MM-DD, got '{s}': {e}")))
    }

    /// Parses `s` and rejects dates before `floor`.
    pub fn parse_at_least(s: &str, floor: &str) -> Result<Self, AppError> {
        let date = Self::parse(s)?;
        let floor = Self::parse(floor)?;
        if date < floor {
            return Err(AppError::validation_error(format!("date must be >= {floor}")));
        }
        Ok(date)
    }

    /// Parses a schedule calendar date, enforcing the API's earliest date.
    pub fn schedule_calendar(s: &str) -> Result<Self, AppError> {
        Self::parse_at_least(s, SCHEDULE_CALENDAR_FLOOR)
    }
}

impl From<NaiveDate> for ApiDate {
    fn from(date: NaiveDate) -> Self {
        ApiDate(date)
    }
}

impl fmt::Display for ApiDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

/// Month in `YYYY-MM` form, used by monthly club schedules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearMonth(String);

impl FromStr for YearMonth {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if YEAR_MONTH_PATTERN.is_match(trimmed) {
            Ok(YearMonth(trimmed.to_string()))
        } else {
            Err(AppError::validation_error(format!(
                "month must be YYYY-MM, got '{s}'"
            )))
        }
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Three-letter club code such as `STL`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TeamCode(String);

impl TeamCode {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for TeamCode {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let valid = (2..=3).contains(&trimmed.len())
            && trimmed.chars().all(|c| c.is_ascii_alphabetic());
        if valid {
            Ok(TeamCode(trimmed.to_ascii_uppercase()))
        } else {
            Err(AppError::validation_error(format!(
                "team code must be 2-3 letters, got '{s}'"
            )))
        }
    }
}

impl fmt::Display for TeamCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
