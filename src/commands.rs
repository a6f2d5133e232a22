use crate::cli::{Command, GameView, LeagueCommand, PlayerCommand, TeamCommand};
use crate::collect::{collect_responses, sample_endpoints};
use crate::config::Config;
use crate::constants::moneypuck::{DATA_PAGE_URL, SEASON_LEVEL_SUBDIR};
use crate::error::AppError;
use crate::moneypuck::{
    Category, DownloadReport, Downloader, FileSource, download_season_level, download_skater_csv,
    fetch_season_table, load_download_config, plan_uploads, run_supplementary_downloads,
    write_links_csv,
};
use crate::nhl_api::{LeadersQuery, NhlClient, ScheduleType, SeasonId, TeamStatsScope, Transport};
use chrono::{Local, NaiveDate};
use serde_json::Value;
use std::path::Path;
use tracing::{info, warn};

/// Dispatches a parsed subcommand.
pub fn run(command: &Command, config: &Config) -> Result<(), AppError> {
    match command {
        Command::League(cmd) => print_json(NhlClient::scoped(config, |c| league(c, cmd))?),
        Command::Team(cmd) => print_json(NhlClient::scoped(config, |c| team(c, cmd))?),
        Command::Player(cmd) => print_json(NhlClient::scoped(config, |c| player(c, cmd))?),
        Command::Game { view, game_id } => {
            print_json(NhlClient::scoped(config, |c| game(c, *view, *game_id))?)
        }
        Command::Collect { out_dir } => handle_collect_command(config, out_dir),
        Command::Moneypuck {
            category,
            links_config,
            links_csv,
        } => handle_moneypuck_command(
            config,
            category.as_deref(),
            links_config.as_deref(),
            links_csv.as_deref(),
        ),
        Command::MoneypuckSkaters { season } => {
            let season = resolve_season(season.as_deref(), Local::now().date_naive())?;
            let downloader = Downloader::new(config.http_timeout_seconds)?;
            handle_skaters_command(&downloader, season, &config.data_dir)
        }
        Command::UploadPlan { ext } => handle_upload_plan_command(config, ext),
        Command::ListConfig => {
            config.display();
            Ok(())
        }
    }
}

fn print_json(value: Value) -> Result<(), AppError> {
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

pub fn league<T: Transport>(client: &NhlClient<T>, cmd: &LeagueCommand) -> Result<Value, AppError> {
    let league = client.league();
    match cmd {
        LeagueCommand::Standings { date, season_info } => {
            league.get_standings(date.as_deref(), *season_info)
        }
        LeagueCommand::Calendar { date } => league.get_schedule_calendar(date),
        LeagueCommand::Seasons => league.list_season_ids(),
        LeagueCommand::Teams { lang } => league.list_team_info(lang.parse()?),
        LeagueCommand::Games { lang } => league.list_games(lang.parse()?),
        LeagueCommand::Glossary { lang } => league.get_glossary(lang.parse()?),
    }
}

pub fn team<T: Transport>(client: &NhlClient<T>, cmd: &TeamCommand) -> Result<Value, AppError> {
    let teams = client.teams();
    match cmd {
        TeamCommand::Info { team_id, lang } => teams.get_info(*team_id, lang.parse()?),
        TeamCommand::Stats {
            team_code,
            stat_type,
            season,
            game_type,
        } => {
            let scope = TeamStatsScope::parse(stat_type, season.as_deref(), game_type.as_deref())?;
            teams.get_stats(team_code, scope)
        }
        TeamCommand::Scoreboard { team_code } => teams.get_scoreboard(team_code),
        TeamCommand::Schedule {
            team_code,
            schedule_type,
            period,
        } => {
            let schedule_type: ScheduleType = schedule_type.parse()?;
            teams.get_schedule(team_code, schedule_type, period.as_deref())
        }
    }
}

pub fn player<T: Transport>(client: &NhlClient<T>, cmd: &PlayerCommand) -> Result<Value, AppError> {
    let players = client.players();
    match cmd {
        PlayerCommand::Info { player_id } => players.get(*player_id),
        PlayerCommand::GameLog {
            player_id,
            season,
            game_type,
        } => match (season, game_type) {
            (Some(season), Some(game_type)) => players.get_game_log(*player_id, season, game_type),
            (None, None) => players.get_game_log_current(*player_id),
            _ => Err(AppError::validation_error(
                "--season and --game-type must be given together",
            )),
        },
        PlayerCommand::Leaders {
            player_type,
            season,
            game_type,
            categories,
            limit,
        } => {
            let query = LeadersQuery {
                season: season.as_deref().map(str::parse).transpose()?,
                game_type: game_type.as_deref().map(str::parse).transpose()?,
                categories: categories.clone(),
                limit: *limit,
            };
            players.get_stats_leaders(player_type.parse()?, &query)
        }
        PlayerCommand::Spotlight => players.get_spotlight(),
    }
}

pub fn game<T: Transport>(client: &NhlClient<T>, view: GameView, game_id: u64) -> Result<Value, AppError> {
    let games = client.games();
    match view {
        GameView::PlayByPlay => games.get_play_by_play(game_id),
        GameView::Landing => games.get_landing(game_id),
        GameView::Boxscore => games.get_boxscore(game_id),
        GameView::Info => games.get_info(game_id),
        GameView::ShiftCharts => games.get_shift_charts(game_id, Default::default()),
        GameView::All => games.get_all_details(game_id),
    }
}

/// Handles the `collect` command.
pub fn handle_collect_command(config: &Config, out_dir: &Path) -> Result<(), AppError> {
    let summary = NhlClient::scoped(config, |client| {
        collect_responses(client, &sample_endpoints(), out_dir)
    })?;

    println!("Collection complete!");
    println!("Successful: {}", summary.successful);
    println!("Failed: {}", summary.failed);
    println!("Files are in {}", out_dir.display());
    Ok(())
}

/// Handles the `moneypuck` command.
///
/// Scrapes the season table, downloads the season-level files and then any
/// extra files listed in the links configuration.
pub fn handle_moneypuck_command(
    config: &Config,
    category: Option<&str>,
    links_config: Option<&Path>,
    links_csv: Option<&Path>,
) -> Result<(), AppError> {
    // Validate before touching the network
    let category: Option<Category> = category.map(str::parse).transpose()?;
    let entries = links_config.map(load_download_config).transpose()?;

    let downloader = Downloader::new(config.http_timeout_seconds)?;
    let rows = fetch_season_table(&downloader, DATA_PAGE_URL)?;
    info!("Found {} seasons", rows.len());

    if let Some(path) = links_csv {
        write_links_csv(&rows, path)?;
    }

    let mut report = DownloadReport::default();
    let season_dir = config.data_dir.join(SEASON_LEVEL_SUBDIR);
    match category {
        Some(category) => {
            report.merge(download_season_level(&downloader, &rows, Some(category), &season_dir)?)
        }
        None => {
            for category in Category::ALL {
                println!("Downloading all {} files...", category.name().to_lowercase());
                report.merge(download_season_level(
                    &downloader,
                    &rows,
                    Some(category),
                    &season_dir,
                )?);
            }
        }
    }

    if let Some(entries) = entries {
        report.merge(run_supplementary_downloads(&downloader, &entries, &config.data_dir)?);
    }

    println!("Downloaded {} files into {}", report.downloaded.len(), config.data_dir.display());
    if !report.failed.is_empty() {
        warn!("{} downloads failed", report.failed.len());
        for failure in &report.failed {
            println!("Failed: {} ({})", failure.url, failure.reason);
        }
    }
    Ok(())
}

/// An explicit season wins; otherwise the season in progress on `today`.
fn resolve_season(season: Option<&str>, today: NaiveDate) -> Result<SeasonId, AppError> {
    match season {
        Some(season) => season.parse(),
        None => Ok(SeasonId::current(today)),
    }
}

/// Handles the `moneypuck-skaters` command.
pub fn handle_skaters_command(
    source: &impl FileSource,
    season: SeasonId,
    data_dir: &Path,
) -> Result<(), AppError> {
    let path = download_skater_csv(source, season, data_dir)?;
    println!("Saved {season} skater data to {}", path.display());
    Ok(())
}

/// Handles the `upload-plan` command: one `local -> s3://bucket/key` line per file.
pub fn handle_upload_plan_command(config: &Config, ext: &str) -> Result<(), AppError> {
    let bucket = config.require_bucket()?;
    let plan = plan_uploads(&config.data_dir, ext, bucket, config.s3_prefix.as_deref())?;
    for item in &plan {
        println!("{} -> {}", item.path.display(), item.destination());
    }
    Ok(())
}
