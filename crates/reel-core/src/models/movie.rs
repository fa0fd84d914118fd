//! Movie summary model

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

const IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p";
const POSTER_PLACEHOLDER_URL: &str =
    "https://via.placeholder.com/500x750/1f2937/9ca3af?text=No+Image";
const NOT_AVAILABLE: &str = "N/A";

/// Catalog identifier of a movie
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MovieId(u64);

impl MovieId {
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for MovieId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl fmt::Display for MovieId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for MovieId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.trim().parse()?))
    }
}

/// Poster widths offered by the image CDN
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PosterSize {
    W92,
    W154,
    W185,
    W342,
    #[default]
    W500,
    W780,
    Original,
}

impl PosterSize {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::W92 => "w92",
            Self::W154 => "w154",
            Self::W185 => "w185",
            Self::W342 => "w342",
            Self::W500 => "w500",
            Self::W780 => "w780",
            Self::Original => "original",
        }
    }
}

/// Display attributes of a movie as returned by the catalog API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieSummary {
    /// Catalog identifier
    pub id: MovieId,
    /// Display title
    pub title: String,
    /// Poster image path relative to the image CDN
    #[serde(default)]
    pub poster_path: Option<String>,
    /// Backdrop image path relative to the image CDN
    #[serde(default)]
    pub backdrop_path: Option<String>,
    /// Release date as `YYYY-MM-DD`
    #[serde(default)]
    pub release_date: Option<String>,
    /// Average audience rating (0-10)
    #[serde(default)]
    pub vote_average: f64,
    /// Plot synopsis
    #[serde(default)]
    pub overview: String,
}

impl MovieSummary {
    /// Create a summary with only an id and title set
    #[must_use]
    pub fn new(id: u64, title: impl Into<String>) -> Self {
        Self {
            id: MovieId::new(id),
            title: title.into(),
            poster_path: None,
            backdrop_path: None,
            release_date: None,
            vote_average: 0.0,
            overview: String::new(),
        }
    }

    /// Full poster URL, or a placeholder image when the movie has no poster
    #[must_use]
    pub fn poster_url(&self, size: PosterSize) -> String {
        match self.poster_path.as_deref().map(str::trim) {
            Some(path) if !path.is_empty() => {
                format!("{IMAGE_BASE_URL}/{}{path}", size.as_str())
            }
            _ => POSTER_PLACEHOLDER_URL.to_string(),
        }
    }

    /// Release year, or `N/A` when the date is missing or unparseable
    #[must_use]
    pub fn release_year(&self) -> String {
        self.parsed_release_date()
            .map_or_else(|| NOT_AVAILABLE.to_string(), |date| date.year().to_string())
    }

    /// Long-form release date such as `July 16, 2010`
    #[must_use]
    pub fn format_release_date(&self) -> String {
        self.parsed_release_date().map_or_else(
            || NOT_AVAILABLE.to_string(),
            |date| date.format("%B %-d, %Y").to_string(),
        )
    }

    /// Rating rounded to one decimal place
    #[must_use]
    pub fn rating_label(&self) -> String {
        format!("{:.1}", self.vote_average)
    }

    fn parsed_release_date(&self) -> Option<NaiveDate> {
        let raw = self.release_date.as_deref()?.trim();
        NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
    }
}
