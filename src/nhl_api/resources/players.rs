use crate::error::AppError;
use crate::nhl_api::params::{GameType, PlayerType, SeasonId};
use crate::nhl_api::session::{Endpoint, NhlSession};
use crate::nhl_api::transport::Transport;
use serde_json::Value;

/// Optional filters for [`Players::get_stats_leaders`].
///
/// A specific season is only requested when both `season` and `game_type`
/// are set; otherwise the current leaders are returned.
#[derive(Debug, Clone, Default)]
pub struct LeadersQuery {
    pub season: Option<SeasonId>,
    pub game_type: Option<GameType>,
    pub categories: Option<String>,
    pub limit: Option<u32>,
}

#[derive(Debug)]
pub struct Players<'a, T: Transport> {
    session: &'a NhlSession<T>,
}

impl<'a, T: Transport> Players<'a, T> {
    pub fn new(session: &'a NhlSession<T>) -> Self {
        Self { session }
    }

    /// Player landing page, e.g. `/v1/player/8478402/landing`.
    pub fn get(&self, player_id: u64) -> Result<Value, AppError> {
        self.session
            .get_json(&Endpoint::new(format!("/v1/player/{player_id}/landing")))
    }

    /// Game log for one season and game type. Both are validated before
    /// anything is sent.
    pub fn get_game_log(
        &self,
        player_id: u64,
        season_id: &str,
        game_type: &str,
    ) -> Result<Value, AppError> {
        let game_type: GameType = game_type.parse()?;
        let season: SeasonId = season_id.parse()?;
        self.session.get_json(&Endpoint::new(format!(
            "/v1/player/{player_id}/game-log/{season}/{}",
            game_type.id()
        )))
    }

    pub fn get_game_log_current(&self, player_id: u64) -> Result<Value, AppError> {
        self.session
            .get_json(&Endpoint::new(format!("/v1/player/{player_id}/game-log/now")))
    }

    pub fn get_stats_leaders(
        &self,
        player_type: PlayerType,
        query: &LeadersQuery,
    ) -> Result<Value, AppError> {
        self.session.get_json(&leaders_endpoint(player_type, query))
    }

    pub fn get_spotlight(&self) -> Result<Value, AppError> {
        self.session.get_json(&Endpoint::new("/v1/player-spotlight"))
    }
}

fn leaders_endpoint(player_type: PlayerType, query: &LeadersQuery) -> Endpoint {
    let scope = match (query.season, query.game_type) {
        (Some(season), Some(game_type)) => format!("{season}/{}", game_type.id()),
        _ => "current".to_string(),
    };
    let mut endpoint = Endpoint::new(format!("/v1/{}-stats-leaders/{scope}", player_type.slug()));
    if let Some(categories) = &query.categories {
        endpoint = endpoint.with_query("categories", categories);
    }
    if let Some(limit) = query.limit {
        endpoint = endpoint.with_query("limit", limit);
    }
    endpoint
}
