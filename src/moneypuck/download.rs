use super::{FileSource, skater_csv_url};
use super::table::{Category, SeasonLinks};
use crate::error::AppError;
use crate::nhl_api::{GameType, SeasonId};
use serde::Deserialize;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// Local file name of one season-level download,
/// e.g. `Skaters_2023-2024_playoffs.csv`.
///
/// `season` is the label as scraped from the season table (`2023-2024`),
/// not a [`SeasonId`].
pub fn season_file_name(category: Category, season: &str, game_type: GameType) -> String {
    format!("{category}_{season}_{game_type}.csv")
}

/// Links on the page point at regular-season files; the playoff file lives
/// at the same path under `/playoffs/`.
pub fn season_file_url(link: &str, game_type: GameType) -> String {
    match game_type {
        GameType::Regular => link.to_string(),
        GameType::Playoffs => link.replace("/regular/", "/playoffs/"),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedDownload {
    pub url: String,
    pub reason: String,
}

/// What a batch download achieved. Individual failures never abort a batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DownloadReport {
    pub downloaded: Vec<PathBuf>,
    pub failed: Vec<FailedDownload>,
}

impl DownloadReport {
    fn record(&mut self, url: &str, result: Result<PathBuf, AppError>) {
        match result {
            Ok(path) => self.downloaded.push(path),
            Err(e) => {
                error!("Failed to download {}: {}", url, e);
                self.failed.push(FailedDownload {
                    url: url.to_string(),
                    reason: e.to_string(),
                });
            }
        }
    }

    pub fn merge(&mut self, other: DownloadReport) {
        self.downloaded.extend(other.downloaded);
        self.failed.extend(other.failed);
    }
}

fn download_to(source: &impl FileSource, url: &str, dest: &Path) -> Result<PathBuf, AppError> {
    info!("Downloading {} to {}", url, dest.display());
    let bytes = source.fetch_bytes(url)?;
    fs::write(dest, bytes)?;
    Ok(dest.to_path_buf())
}

/// Downloads the regular-season and playoff file of every row for the given
/// category, or for all categories when `category` is `None`.
///
/// Files land in `out_dir`, which is created if missing.
pub fn download_season_level(
    source: &impl FileSource,
    rows: &[SeasonLinks],
    category: Option<Category>,
    out_dir: &Path,
) -> Result<DownloadReport, AppError> {
    fs::create_dir_all(out_dir)?;
    let categories: Vec<Category> = match category {
        Some(category) => vec![category],
        None => Category::ALL.to_vec(),
    };

    let mut report = DownloadReport::default();
    for row in rows {
        for game_type in [GameType::Regular, GameType::Playoffs] {
            for &category in &categories {
                let Some(link) = row.link(category) else {
                    continue;
                };
                let url = season_file_url(link, game_type);
                let dest = out_dir.join(season_file_name(category, &row.season, game_type));
                report.record(&url, download_to(source, &url, &dest));
            }
        }
    }

    info!(
        "Season-level download finished: {} files, {} failures",
        report.downloaded.len(),
        report.failed.len()
    );
    Ok(report)
}

/// Downloads one season's skater summary to
/// `data_dir/moneypuck_skaters_{season}.csv`.
pub fn download_skater_csv(
    source: &impl FileSource,
    season: SeasonId,
    data_dir: &Path,
) -> Result<PathBuf, AppError> {
    fs::create_dir_all(data_dir)?;
    let dest = data_dir.join(format!("moneypuck_skaters_{season}.csv"));
    download_to(source, &skater_csv_url(season), &dest)
}

/// One extra file to fetch, read from the links configuration file.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct LinkConfigEntry {
    pub dest_subdir: String,
    pub dest_filename: String,
    pub url: String,
}

/// Reads a JSON list of `{dest_subdir, dest_filename, url}` objects.
pub fn load_download_config(path: &Path) -> Result<Vec<LinkConfigEntry>, AppError> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Downloads each configured file into `data_dir/dest_subdir`. Zip archives
/// are extracted next to the downloaded archive.
pub fn run_supplementary_downloads(
    source: &impl FileSource,
    entries: &[LinkConfigEntry],
    data_dir: &Path,
) -> Result<DownloadReport, AppError> {
    let mut report = DownloadReport::default();
    for entry in entries {
        let output_dir = data_dir.join(&entry.dest_subdir);
        let result = fs::create_dir_all(&output_dir)
            .map_err(AppError::from)
            .and_then(|()| download_to(source, &entry.url, &output_dir.join(&entry.dest_filename)))
            .and_then(|path| {
                if entry.dest_filename.ends_with(".zip") {
                    info!("Unzipping {}", entry.dest_filename);
                    extract_zip(&path, &output_dir)?;
                }
                Ok(path)
            });
        report.record(&entry.url, result);
    }
    Ok(report)
}

fn extract_zip(archive_path: &Path, dest: &Path) -> Result<(), AppError> {
    let file = fs::File::open(archive_path)?;
    let mut archive = zip::ZipArchive::new(file)?;
    archive.extract(dest)?;
    Ok(())
}

fn needs_quotes(field: &str) -> bool {
    field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r')
}

fn write_row<W: Write>(mut w: W, row: &[&str]) -> io::Result<()> {
    let cells: Vec<String> = row
        .iter()
        .map(|cell| {
            if needs_quotes(cell) {
                format!("\"{}\"", cell.replace('"', "\"\""))
            } else {
                cell.to_string()
            }
        })
        .collect();
    writeln!(w, "{}", cells.join(","))
}

/// Writes the season/link table as CSV. Missing links are empty cells.
pub fn write_links_csv(rows: &[SeasonLinks], path: &Path) -> Result<(), AppError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    let mut out = io::BufWriter::new(fs::File::create(path)?);
    write_row(
        &mut out,
        &["Season", "Skaters_URL", "Goalies_URL", "Lines_URL", "Teams_URL"],
    )?;
    for row in rows {
        let mut cells = vec![row.season.as_str()];
        cells.extend(Category::ALL.iter().map(|c| row.link(*c).unwrap_or("")));
        write_row(&mut out, &cells)?;
    }
    out.flush()?;
    info!("Saved {} season rows to {}", rows.len(), path.display());
    Ok(())
}
