use clap::builder::styling::{AnsiColor, Effects, Styles};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

fn get_styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
        .usage(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
        .literal(AnsiColor::Green.on_default())
        .placeholder(AnsiColor::Yellow.on_default())
        .error(AnsiColor::Red.on_default().effects(Effects::BOLD))
        .valid(AnsiColor::Green.on_default())
        .invalid(AnsiColor::Red.on_default())
}

/// NHL statistics fetcher
///
/// Queries the public NHL web and stats APIs and prints the JSON responses,
/// snapshots a catalogue of sample responses to disk, and downloads
/// MoneyPuck season data files.
///
/// Arguments such as seasons (`20232024`), dates (`YYYY-MM-DD`), game types
/// (`regular`/`playoffs`) and languages (`en`/`fr`) are validated before any
/// request is sent.
#[derive(Parser, Debug)]
#[command(author = "Brent Brewington", version, about, long_about = None)]
#[command(styles = get_styles())]
pub struct Args {
    /// Log every outbound request and mirror log output to the terminal.
    #[arg(short, long, global = true, help_heading = "Debug")]
    pub verbose: bool,

    /// Specify a custom log file path. If not provided, logs will be written to the default location.
    #[arg(long = "log-file", global = true, help_heading = "Debug")]
    pub log_file: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// League-wide endpoints
    #[command(subcommand)]
    League(LeagueCommand),

    /// Club endpoints
    #[command(subcommand)]
    Team(TeamCommand),

    /// Player endpoints
    #[command(subcommand)]
    Player(PlayerCommand),

    /// Gamecenter endpoints for one game
    Game {
        #[arg(value_enum)]
        view: GameView,
        game_id: u64,
    },

    /// Save a fixed catalogue of sample API responses as JSON files
    Collect {
        #[arg(long, default_value = "api_responses")]
        out_dir: PathBuf,
    },

    /// Download MoneyPuck season-level data files
    Moneypuck {
        /// Only download this category (Skaters, Goalies, Lines or Teams)
        #[arg(long)]
        category: Option<String>,

        /// JSON list of extra files to download ({dest_subdir, dest_filename, url})
        #[arg(long = "links-config")]
        links_config: Option<PathBuf>,

        /// Also write the scraped season/link table to this CSV file
        #[arg(long = "links-csv")]
        links_csv: Option<PathBuf>,
    },

    /// Download one season's MoneyPuck skater summary
    MoneypuckSkaters {
        /// Season id such as 20232024; defaults to the current season
        #[arg(long)]
        season: Option<String>,
    },

    /// List the object-store keys the data files would be uploaded to
    UploadPlan {
        #[arg(long, default_value = "parquet")]
        ext: String,
    },

    /// List current configuration settings
    ListConfig,
}

#[derive(Subcommand, Debug)]
pub enum LeagueCommand {
    /// Standings for today or a given date
    Standings {
        #[arg(long)]
        date: Option<String>,
        /// Fetch per-season standings metadata instead
        #[arg(long = "season-info")]
        season_info: bool,
    },
    /// Schedule calendar for a date (1916-12-19 or later)
    Calendar { date: String },
    /// All season ids
    Seasons,
    /// Team listing from the stats API
    Teams {
        #[arg(long, default_value = "en")]
        lang: String,
    },
    /// Game listing from the stats API
    Games {
        #[arg(long, default_value = "en")]
        lang: String,
    },
    /// Stat glossary
    Glossary {
        #[arg(long, default_value = "en")]
        lang: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum TeamCommand {
    /// Team record by numeric id
    Info {
        team_id: u32,
        #[arg(long, default_value = "en")]
        lang: String,
    },
    /// Club stats: now, by_season or season_game_type
    Stats {
        team_code: String,
        stat_type: String,
        #[arg(long)]
        season: Option<String>,
        #[arg(long = "game-type")]
        game_type: Option<String>,
    },
    /// Current scoreboard
    Scoreboard { team_code: String },
    /// Club schedule for a season, month or week
    Schedule {
        team_code: String,
        #[arg(long = "type", default_value = "season")]
        schedule_type: String,
        /// Season id, YYYY-MM or YYYY-MM-DD depending on --type
        #[arg(long)]
        period: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum PlayerCommand {
    /// Player landing page
    Info { player_id: u64 },
    /// Game log, current unless both --season and --game-type are given
    GameLog {
        player_id: u64,
        #[arg(long)]
        season: Option<String>,
        #[arg(long = "game-type")]
        game_type: Option<String>,
    },
    /// Stats leaders for skaters or goalies
    Leaders {
        player_type: String,
        #[arg(long)]
        season: Option<String>,
        #[arg(long = "game-type")]
        game_type: Option<String>,
        #[arg(long)]
        categories: Option<String>,
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Players in the spotlight
    Spotlight,
}

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameView {
    PlayByPlay,
    Landing,
    Boxscore,
    Info,
    ShiftCharts,
    /// Every view above merged into one object
    All,
}
