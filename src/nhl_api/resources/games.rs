use crate::error::AppError;
use crate::nhl_api::params::Language;
use crate::nhl_api::session::{Endpoint, NhlSession};
use crate::nhl_api::transport::Transport;
use serde_json::{Map, Value};

#[derive(Debug)]
pub struct Games<'a, T: Transport> {
    session: &'a NhlSession<T>,
}

impl<'a, T: Transport> Games<'a, T> {
    pub fn new(session: &'a NhlSession<T>) -> Self {
        Self { session }
    }

    fn gamecenter(&self, game_id: u64, view: &str) -> Result<Value, AppError> {
        self.session
            .get_json(&Endpoint::new(format!("/v1/gamecenter/{game_id}/{view}")))
    }

    pub fn get_play_by_play(&self, game_id: u64) -> Result<Value, AppError> {
        self.gamecenter(game_id, "play-by-play")
    }

    pub fn get_landing(&self, game_id: u64) -> Result<Value, AppError> {
        self.gamecenter(game_id, "landing")
    }

    pub fn get_boxscore(&self, game_id: u64) -> Result<Value, AppError> {
        self.gamecenter(game_id, "boxscore")
    }

    /// Season state and the two participating teams.
    pub fn get_info(&self, game_id: u64) -> Result<Value, AppError> {
        self.session
            .get_json(&Endpoint::new(format!("/v1/meta/game/{game_id}")))
    }

    /// Every shift of every player, as `{ "data": [...], "total": n }`.
    pub fn get_shift_charts(&self, game_id: u64, lang: Language) -> Result<Value, AppError> {
        let endpoint = Endpoint::stats(format!("/{}/shiftcharts", lang.code()))
            .with_query("cayenneExp", format!("gameId={game_id}"));
        self.session.get_json(&endpoint)
    }

    /// Play-by-play, landing, boxscore, info and shift charts merged into
    /// one object. On key collisions the later payload wins.
    pub fn get_all_details(&self, game_id: u64) -> Result<Value, AppError> {
        let payloads = [
            self.get_play_by_play(game_id)?,
            self.get_landing(game_id)?,
            self.get_boxscore(game_id)?,
            self.get_info(game_id)?,
            self.get_shift_charts(game_id, Language::En)?,
        ];

        let mut merged = Map::new();
        for payload in payloads {
            match payload {
                Value::Object(fields) => merged.extend(fields),
                other => {
                    return Err(AppError::api_unexpected_structure(
                        format!("expected an object, got {}", kind(&other)),
                        format!("/v1/gamecenter/{game_id}"),
                    ));
                }
            }
        }
        Ok(Value::Object(merged))
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
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

    #[test]
    fn test_gamecenter_paths() {
        let stub = StubTransport::new();
        for _ in 0..4 {
            stub.push_json(json!({}));
        }
        let session = session(stub);
        let games = Games::new(&session);

        games.get_play_by_play(2023020204).unwrap();
        games.get_landing(2023020204).unwrap();
        games.get_boxscore(2023020204).unwrap();
        games.get_info(2023020204).unwrap();

        assert_eq!(
            session.transport().requested_urls(),
            vec![
                "http://web.test/v1/gamecenter/2023020204/play-by-play",
                "http://web.test/v1/gamecenter/2023020204/landing",
                "http://web.test/v1/gamecenter/2023020204/boxscore",
                "http://web.test/v1/meta/game/2023020204",
            ]
        );
    }

    #[test]
    fn test_shift_charts_query() {
        let stub = StubTransport::new();
        stub.push_json(json!({"data": [], "total": 0}));
        let session = session(stub);

        Games::new(&session)
            .get_shift_charts(2023020204, Language::En)
            .unwrap();
        assert_eq!(
            session.transport().requested_urls(),
            vec!["http://stats.test/rest/en/shiftcharts?cayenneExp=gameId=2023020204"]
        );
    }

    #[test]
    fn test_all_details_merges_objects() {
        let stub = StubTransport::new();
        stub.push_json(json!({"id": 2023020204, "plays": [1, 2]}));
        stub.push_json(json!({"summary": "landing"}));
        stub.push_json(json!({"summary": "boxscore", "playerByGameStats": {}}));
        stub.push_json(json!({"seasonStates": {}, "teams": []}));
        stub.push_json(json!({"data": [], "total": 0}));
        let session = session(stub);

        let details = Games::new(&session).get_all_details(2023020204).unwrap();
        assert_eq!(details["id"], 2023020204);
        assert_eq!(details["summary"], "boxscore");
        assert_eq!(details["total"], 0);
        assert_eq!(session.transport().call_count(), 5);
    }

    #[test]
    fn test_all_details_rejects_non_object() {
        let stub = StubTransport::new();
        stub.push_json(json!([1, 2, 3]));
        for _ in 0..4 {
            stub.push_json(json!({}));
        }
        let session = session(stub);

        let err = Games::new(&session).get_all_details(1).unwrap_err();
        assert!(matches!(err, AppError::ApiUnexpectedStructure { .. }));
    }
}
