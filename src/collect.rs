//! Snapshots a fixed catalogue of API responses to disk, one JSON file per
//! endpoint, for use as test fixtures.

use crate::error::AppError;
use crate::nhl_api::{BaseUrls, Endpoint, NhlClient, Transport};
use chrono::Local;
use serde_json::{Value, json};
use std::fs;
use std::path::Path;
use tracing::{error, info, warn};

/// One named entry of the collection catalogue.
#[derive(Debug, Clone)]
pub struct SampleEndpoint {
    pub name: &'static str,
    pub endpoint: Endpoint,
    pub description: &'static str,
}

impl SampleEndpoint {
    fn web(name: &'static str, path: &str, description: &'static str) -> Self {
        Self {
            name,
            endpoint: Endpoint::new(path),
            description,
        }
    }

    fn stats(name: &'static str, path: &str, description: &'static str) -> Self {
        Self {
            name,
            endpoint: Endpoint::stats(path),
            description,
        }
    }

    fn with_query(mut self, name: &str, value: &str) -> Self {
        self.endpoint = self.endpoint.with_query(name, value);
        self
    }

    /// Full URL including the query string, as recorded in the metadata.
    pub fn url(&self, urls: &BaseUrls) -> String {
        let base = self.endpoint.url(urls);
        if self.endpoint.query.is_empty() {
            return base;
        }
        let query: Vec<String> = self
            .endpoint
            .query
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect();
        format!("{base}?{}", query.join("&"))
    }
}

/// Outcome counts of one collection run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollectSummary {
    pub successful: usize,
    pub failed: usize,
}

/// The endpoints snapshotted by [`collect_responses`].
pub fn sample_endpoints() -> Vec<SampleEndpoint> {
    vec![
        // League
        SampleEndpoint::web("standings_now", "/v1/standings/now", "Current NHL standings"),
        SampleEndpoint::web("standings_date", "/v1/standings/2024-01-15", "Standings for specific date"),
        SampleEndpoint::web("season_ids", "/v1/season", "All season IDs"),
        SampleEndpoint::web("schedule_calendar", "/v1/schedule-calendar/2024-12-01", "Schedule calendar for date"),
        SampleEndpoint::stats("team_info_list", "/en/team", "List of all teams"),
        SampleEndpoint::stats("games_list", "/en/game", "All games (large response)"),
        SampleEndpoint::stats("glossary", "/en/glossary", "NHL glossary terms"),
        // Teams
        SampleEndpoint::web("team_stats_stl_now", "/v1/club-stats/STL/now", "Current STL team stats"),
        SampleEndpoint::web("team_stats_stl_season", "/v1/club-stats/STL/20232024/2", "STL 2023-24 regular season stats"),
        SampleEndpoint::web("team_schedule_stl", "/v1/club-schedule-season/STL/now", "STL current season schedule"),
        SampleEndpoint::web("team_scoreboard_stl", "/v1/scoreboard/STL/now", "STL current scoreboard"),
        // Players
        SampleEndpoint::web("player_8478402_mcdavid", "/v1/player/8478402/landing", "Connor McDavid player page"),
        SampleEndpoint::web(
            "player_8478402_mcdavid_game_log_20232024_regular_season",
            "/v1/player/8478402/game-log/20232024/2",
            "McDavid 2023-24 regular season game log",
        ),
        SampleEndpoint::web("player_8478402_mcdavid_game_log_now", "/v1/player/8478402/game-log/now", "McDavid current game log"),
        SampleEndpoint::web("stats_leaders_skater_current", "/v1/skater-stats-leaders/current", "Current skater stats leaders"),
        SampleEndpoint::web("stats_leaders_goalie_current", "/v1/goalie-stats-leaders/current", "Current goalie stats leaders"),
        SampleEndpoint::web(
            "stats_leaders_skater_20232024_regular",
            "/v1/skater-stats-leaders/20232024/2",
            "2023-24 regular season skater leaders",
        ),
        SampleEndpoint::web("stats_leaders_skater_goals_limit10", "/v1/skater-stats-leaders/current", "Top 10 current goal leaders")
            .with_query("categories", "goals")
            .with_query("limit", "10"),
        SampleEndpoint::web("player_spotlight", "/v1/player-spotlight", "Players in spotlight"),
        // Games
        SampleEndpoint::web("game_2023020204_play_by_play", "/v1/gamecenter/2023020204/play-by-play", "Game play-by-play data"),
        SampleEndpoint::web("game_2023020204_landing", "/v1/gamecenter/2023020204/landing", "Game landing page data"),
        SampleEndpoint::web("game_boxscore", "/v1/gamecenter/2023020204/boxscore", "Game boxscore data"),
        SampleEndpoint::web("game_info", "/v1/meta/game/2023020204", "Basic game information"),
        SampleEndpoint::stats("game_shift_charts", "/en/shiftcharts", "Game shift charts")
            .with_query("cayenneExp", "gameId=2023020204"),
    ]
}

/// Fetches every endpoint and writes `{out_dir}/{name}.json`.
///
/// A failing endpoint is logged and counted; the run carries on with the
/// next one. Only failing to create `out_dir` aborts the run.
pub fn collect_responses<T: Transport>(
    client: &NhlClient<T>,
    endpoints: &[SampleEndpoint],
    out_dir: &Path,
) -> Result<CollectSummary, AppError> {
    fs::create_dir_all(out_dir)?;
    info!("Collecting {} API responses into {}", endpoints.len(), out_dir.display());

    let mut summary = CollectSummary::default();
    for sample in endpoints {
        info!("Fetching: {} - {}", sample.name, sample.description);
        match collect_one(client, sample, out_dir) {
            Ok(()) => summary.successful += 1,
            Err(e) => {
                error!("Failed to fetch {}: {}", sample.name, e);
                summary.failed += 1;
            }
        }
    }

    info!(
        "Collection complete: {} successful, {} failed",
        summary.successful, summary.failed
    );
    Ok(summary)
}

fn collect_one<T: Transport>(
    client: &NhlClient<T>,
    sample: &SampleEndpoint,
    out_dir: &Path,
) -> Result<(), AppError> {
    let session = client.session();
    let response = session.fetch(&sample.endpoint)?;
    let body = response.body;

    let data = serde_json::from_str::<Value>(&body).unwrap_or_else(|_| {
        warn!("Response for {} is not valid JSON, saving as text", sample.name);
        json!({ "raw_text": body })
    });

    let document = json!({
        "metadata": {
            "endpoint_name": sample.name,
            "url": sample.url(session.base_urls()),
            "description": sample.description,
            "status_code": response.status,
            "content_type": response.content_type,
            "collected_at": Local::now().to_rfc3339(),
        },
        "data": data,
    });

    let path = out_dir.join(format!("{}.json", sample.name));
    fs::write(&path, serde_json::to_string_pretty(&document)?)?;
    info!("Saved {} response to {}", sample.name, path.display());
    Ok(())
}
