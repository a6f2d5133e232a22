use super::league::League;
use crate::error::AppError;
use crate::nhl_api::params::{ApiDate, GameType, Language, ScheduleType, SeasonId, TeamCode, YearMonth};
use crate::nhl_api::session::{Endpoint, NhlSession};
use crate::nhl_api::transport::Transport;
use serde_json::Value;

/// Which club statistics to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TeamStatsScope {
    Now,
    BySeason,
    Season { season: SeasonId, game_type: GameType },
}

impl TeamStatsScope {
    /// Builds a scope from its name (`now`, `by_season`, `season_game_type`).
    /// `season_game_type` needs both a season and a game type.
    pub fn parse(
        stat_type: &str,
        season: Option<&str>,
        game_type: Option<&str>,
    ) -> Result<Self, AppError> {
        match stat_type {
            "now" => Ok(TeamStatsScope::Now),
            "by_season" => Ok(TeamStatsScope::BySeason),
            "season_game_type" => match (season, game_type) {
                (Some(season), Some(game_type)) => Ok(TeamStatsScope::Season {
                    season: season.parse()?,
                    game_type: game_type.parse()?,
                }),
                _ => Err(AppError::validation_error(
                    "season and game_type required for season_game_type",
                )),
            },
            other => Err(AppError::validation_error(format!(
                "Invalid stat_type: {other}"
            ))),
        }
    }
}

/// Club endpoints. Team lookups by id go through the league listing.
#[derive(Debug)]
pub struct Teams<'a, T: Transport> {
    session: &'a NhlSession<T>,
    league: League<'a, T>,
}

impl<'a, T: Transport> Teams<'a, T> {
    pub fn new(session: &'a NhlSession<T>, league: League<'a, T>) -> Self {
        Self { session, league }
    }

    /// The single team record whose `id` equals `team_id`, e.g.
    /// `{"id": 19, "triCode": "STL", "fullName": "St. Louis Blues", ...}`.
    pub fn get_info(&self, team_id: u32, lang: Language) -> Result<Value, AppError> {
        let all_teams = self.league.list_team_info(lang)?;
        find_team(all_teams, team_id)
    }

    pub fn get_stats(&self, team_code: &str, scope: TeamStatsScope) -> Result<Value, AppError> {
        let code: TeamCode = team_code.parse()?;
        let path = match scope {
            TeamStatsScope::Now => format!("/v1/club-stats/{code}/now"),
            TeamStatsScope::BySeason => format!("/v1/club-stats-season/{code}"),
            TeamStatsScope::Season { season, game_type } => {
                format!("/v1/club-stats/{code}/{season}/{}", game_type.id())
            }
        };
        self.session.get_json(&Endpoint::new(path))
    }

    pub fn get_scoreboard(&self, team_code: &str) -> Result<Value, AppError> {
        let code: TeamCode = team_code.parse()?;
        self.session
            .get_json(&Endpoint::new(format!("/v1/scoreboard/{code}/now")))
    }

    /// Club schedule for the current period, or for `period` when given:
    /// a season id for `Season`, `YYYY-MM` for `Month`, a date for `Week`.
    pub fn get_schedule(
        &self,
        team_code: &str,
        schedule_type: ScheduleType,
        period: Option<&str>,
    ) -> Result<Value, AppError> {
        let code: TeamCode = team_code.parse()?;
        let path = schedule_path(&code, schedule_type, period)?;
        self.session.get_json(&Endpoint::new(path))
    }
}

fn schedule_path(
    code: &TeamCode,
    schedule_type: ScheduleType,
    period: Option<&str>,
) -> Result<String, AppError> {
    let suffix = match (schedule_type, period) {
        (_, None) => "now".to_string(),
        (ScheduleType::Season, Some(p)) => p.parse::<SeasonId>()?.to_string(),
        (ScheduleType::Month, Some(p)) => p.parse::<YearMonth>()?.to_string(),
        (ScheduleType::Week, Some(p)) => ApiDate::parse(p)?.to_string(),
    };
    Ok(match schedule_type {
        ScheduleType::Season => format!("/v1/club-schedule-season/{code}/{suffix}"),
        ScheduleType::Month => format!("/v1/club-schedule/{code}/month/{suffix}"),
        ScheduleType::Week => format!("/v1/club-schedule/{code}/week/{suffix}"),
    })
}

fn find_team(all_teams: Value, team_id: u32) -> Result<Value, AppError> {
    let Value::Object(mut body) = all_teams else {
        return Err(AppError::api_unexpected_structure(
            "team list is not an object",
            "/team",
        ));
    };
    let Some(Value::Array(teams)) = body.remove("data") else {
        return Err(AppError::api_unexpected_structure(
            "team list has no 'data' array",
            "/team",
        ));
    };

    let mut matches: Vec<Value> = teams
        .into_iter()
        .filter(|team| team.get("id").and_then(Value::as_u64) == Some(u64::from(team_id)))
        .collect();

    match matches.len() {
        0 => Err(AppError::team_not_found(team_id)),
        1 => Ok(matches.remove(0)),
        n => Err(AppError::ambiguous_data(format!(
            "{n} teams from the team list share id {team_id}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nhl_api::retry::RetryPolicy;
    use crate::nhl_api::session::BaseUrls;
    use crate::testing_utils::StubTransport;
    use serde_json::json;

    fn session(stub: StubTransport) -> NhlSession<StubTransport> {
        NhlSession::new(stub, BaseUrls::new("http://web.test", "http://stats.test/rest"))
            .with_retry_policy(RetryPolicy::none())
    }

    fn teams<'a>(session: &'a NhlSession<StubTransport>) -> Teams<'a, StubTransport> {
        Teams::new(session, League::new(session))
    }

    fn team_list() -> Value {
        json!({
            "data": [
                {"id": 1, "triCode": "NJD", "fullName": "New Jersey Devils"},
                {"id": 19, "triCode": "STL", "fullName": "St. Louis Blues", "franchiseId": 18}
            ],
            "total": 2
        })
    }

    #[test]
    fn test_get_info_returns_matching_team() {
        let stub = StubTransport::new();
        stub.push_json(team_list());
        let session = session(stub);

        let team = teams(&session).get_info(19, Language::En).unwrap();
        assert_eq!(team["triCode"], "STL");
        assert_eq!(
            session.transport().requested_urls(),
            vec!["http://stats.test/rest/en/team"]
        );
    }

    #[test]
    fn test_get_info_not_found() {
        let stub = StubTransport::new();
        stub.push_json(team_list());
        let session = session(stub);

        let err = teams(&session).get_info(99, Language::En).unwrap_err();
        assert!(matches!(err, AppError::TeamNotFound { team_id: 99 }));
    }

    #[test]
    fn test_get_info_duplicate_ids_are_ambiguous() {
        let stub = StubTransport::new();
        stub.push_json(json!({"data": [{"id": 19}, {"id": 19}], "total": 2}));
        let session = session(stub);

        let err = teams(&session).get_info(19, Language::En).unwrap_err();
        assert!(matches!(err, AppError::AmbiguousData { .. }));
    }

    #[test]
    fn test_get_info_without_data_array() {
        let stub = StubTransport::new();
        stub.push_json(json!({"total": 0}));
        let session = session(stub);

        let err = teams(&session).get_info(19, Language::En).unwrap_err();
        assert!(matches!(err, AppError::ApiUnexpectedStructure { .. }));
    }

    #[test]
    fn test_stats_scope_parsing() {
        assert_eq!(TeamStatsScope::parse("now", None, None).unwrap(), TeamStatsScope::Now);
        assert_eq!(
            TeamStatsScope::parse("by_season", None, None).unwrap(),
            TeamStatsScope::BySeason
        );
        assert!(matches!(
            TeamStatsScope::parse("season_game_type", Some("20232024"), Some("regular")).unwrap(),
            TeamStatsScope::Season { game_type: GameType::Regular, .. }
        ));
        assert!(TeamStatsScope::parse("season_game_type", Some("20232024"), None).is_err());
        assert!(TeamStatsScope::parse("career", None, None).is_err());
    }

    #[test]
    fn test_stats_paths() {
        let stub = StubTransport::new();
        for _ in 0..3 {
            stub.push_json(json!({}));
        }
        let session = session(stub);
        let teams = teams(&session);

        teams.get_stats("stl", TeamStatsScope::Now).unwrap();
        teams.get_stats("STL", TeamStatsScope::BySeason).unwrap();
        teams
            .get_stats(
                "STL",
                TeamStatsScope::Season {
                    season: SeasonId::new(20232024).unwrap(),
                    game_type: GameType::Playoffs,
                },
            )
            .unwrap();

        assert_eq!(
            session.transport().requested_urls(),
            vec![
                "http://web.test/v1/club-stats/STL/now",
                "http://web.test/v1/club-stats-season/STL",
                "http://web.test/v1/club-stats/STL/20232024/3",
            ]
        );
    }

    #[test]
    fn test_schedule_paths() {
        let code: TeamCode = "STL".parse().unwrap();
        assert_eq!(
            schedule_path(&code, ScheduleType::Season, None).unwrap(),
            "/v1/club-schedule-season/STL/now"
        );
        assert_eq!(
            schedule_path(&code, ScheduleType::Season, Some("20232024")).unwrap(),
            "/v1/club-schedule-season/STL/20232024"
        );
        assert_eq!(
            schedule_path(&code, ScheduleType::Month, Some("2024-03")).unwrap(),
            "/v1/club-schedule/STL/month/2024-03"
        );
        assert_eq!(
            schedule_path(&code, ScheduleType::Week, None).unwrap(),
            "/v1/club-schedule/STL/week/now"
        );
        assert_eq!(
            schedule_path(&code, ScheduleType::Week, Some("2024-03-23")).unwrap(),
            "/v1/club-schedule/STL/week/2024-03-23"
        );
        assert!(schedule_path(&code, ScheduleType::Month, Some("2024-03-23")).is_err());
        assert!(schedule_path(&code, ScheduleType::Season, Some("2024")).is_err());
    }

    #[test]
    fn test_invalid_team_code_issues_no_request() {
        let session = session(StubTransport::panicking());
        assert!(teams(&session).get_scoreboard("St. Louis").is_err());
    }
}
