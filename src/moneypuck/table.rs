use super::FileSource;
use crate::constants::moneypuck::SEASON_TABLE_SELECTOR;
use crate::error::AppError;
use reqwest::Url;
use scraper::{ElementRef, Html, Selector};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info};

/// File categories published per season, in table column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Skaters,
    Goalies,
    Lines,
    Teams,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Skaters,
        Category::Goalies,
        Category::Lines,
        Category::Teams,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Category::Skaters => "Skaters",
            Category::Goalies => "Goalies",
            Category::Lines => "Lines",
            Category::Teams => "Teams",
        }
    }
}

impl FromStr for Category {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                AppError::validation_error(format!(
                    "category must be one of Skaters, Goalies, Lines, Teams, got '{s}'"
                ))
            })
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One row of the season table: the season label and an absolute link per
/// category, if the site offers one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeasonLinks {
    pub season: String,
    pub skaters: Option<String>,
    pub goalies: Option<String>,
    pub lines: Option<String>,
    pub teams: Option<String>,
}

impl SeasonLinks {
    pub fn link(&self, category: Category) -> Option<&str> {
        match category {
            Category::Skaters => self.skaters.as_deref(),
            Category::Goalies => self.goalies.as_deref(),
            Category::Lines => self.lines.as_deref(),
            Category::Teams => self.teams.as_deref(),
        }
    }

    fn set_link(&mut self, category: Category, link: Option<String>) {
        match category {
            Category::Skaters => self.skaters = link,
            Category::Goalies => self.goalies = link,
            Category::Lines => self.lines = link,
            Category::Teams => self.teams = link,
        }
    }
}

fn selector(css: &str) -> Result<Selector, AppError> {
    Selector::parse(css).map_err(|e| AppError::config_error(format!("Invalid selector '{css}': {e:?}")))
}

/// Parses the season/link table out of the data page.
///
/// The header row and rows with fewer than five cells are skipped.
/// Relative links are resolved against `page_url`.
pub fn parse_season_table(html: &str, page_url: &str) -> Result<Vec<SeasonLinks>, AppError> {
    let base = Url::parse(page_url)
        .map_err(|e| AppError::validation_error(format!("Invalid page URL '{page_url}': {e}")))?;
    let table_selector = selector(SEASON_TABLE_SELECTOR)?;
    let row_selector = selector("tr")?;
    let cell_selector = selector("td")?;
    let link_selector = selector("a")?;

    let document = Html::parse_document(html);
    let table = document
        .select(&table_selector)
        .next()
        .ok_or_else(|| AppError::ScrapeNoTable {
            selector: SEASON_TABLE_SELECTOR.to_string(),
            url: page_url.to_string(),
        })?;

    let mut rows = Vec::new();
    for row in table.select(&row_selector).skip(1) {
        let cells: Vec<ElementRef> = row.select(&cell_selector).collect();
        if cells.len() < 5 {
            continue;
        }

        let mut links = SeasonLinks {
            season: cells[0]
                .text()
                .flat_map(str::chars)
                .filter(|c| !c.is_whitespace())
                .collect(),
            ..SeasonLinks::default()
        };
        for (category, cell) in Category::ALL.into_iter().zip(&cells[1..]) {
            let link = cell
                .select(&link_selector)
                .next()
                .and_then(|a| a.value().attr("href"))
                .and_then(|href| base.join(href).ok())
                .map(String::from);
            links.set_link(category, link);
        }
        rows.push(links);
    }

    debug!("Parsed {} season rows from {}", rows.len(), page_url);
    Ok(rows)
}

/// Downloads the data page and parses its season table.
pub fn fetch_season_table(
    source: &impl FileSource,
    page_url: &str,
) -> Result<Vec<SeasonLinks>, AppError> {
    info!("Fetching season table from {page_url}");
    let html = source.fetch_text(page_url)?;
    parse_season_table(&html, page_url)
}
