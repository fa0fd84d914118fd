use std::env;
use std::path::PathBuf;

use chrono::Utc;
use reel_core::config::FirebaseConfig;
use reel_core::remote::{FirestoreFavoritesStore, RemoteFavoritesStore};
use reel_core::storage::FileMirror;
use reel_core::util::normalize_text_option;
use reel_core::{
    FavoriteRecord, FavoritesCoordinator, MovieId, MovieSummary, PendingSync, SyncOutcome, UserId,
};
use serde::Serialize;

use crate::cli::MovieArgs;
use crate::error::CliError;

pub type CliCoordinator = FavoritesCoordinator<FileMirror, RemoteBackend>;

/// Where favorites live for this invocation.
#[derive(Debug, Clone)]
pub struct Session {
    pub data_dir: PathBuf,
    pub identity: Option<UserId>,
}

impl Session {
    pub fn resolve(data_dir: Option<PathBuf>, user: Option<String>) -> Self {
        Self {
            data_dir: resolve_data_dir(data_dir),
            identity: resolve_identity(user, env::var("REEL_USER_ID").ok()),
        }
    }
}

/// Remote store chosen for this invocation.
///
/// `Disabled` is only used without an identity, so the coordinator never
/// calls it.
#[derive(Debug)]
pub enum RemoteBackend {
    Firestore(FirestoreFavoritesStore),
    Disabled,
}

impl RemoteBackend {
    fn not_configured() -> reel_core::Error {
        reel_core::Error::NotConfigured("remote favorites store".to_string())
    }
}

impl RemoteFavoritesStore for RemoteBackend {
    async fn list_for(&self, user: &UserId) -> reel_core::Result<Vec<FavoriteRecord>> {
        match self {
            Self::Firestore(store) => store.list_for(user).await,
            Self::Disabled => Err(Self::not_configured()),
        }
    }

    async fn upsert(&self, user: &UserId, record: &FavoriteRecord) -> reel_core::Result<()> {
        match self {
            Self::Firestore(store) => store.upsert(user, record).await,
            Self::Disabled => Err(Self::not_configured()),
        }
    }

    async fn delete(&self, user: &UserId, movie_id: MovieId) -> reel_core::Result<()> {
        match self {
            Self::Firestore(store) => store.delete(user, movie_id).await,
            Self::Disabled => Err(Self::not_configured()),
        }
    }
}

/// Build the coordinator for `session` and load its favorites.
pub async fn open_coordinator(session: &Session) -> Result<CliCoordinator, CliError> {
    let backend = remote_backend(session.identity.as_ref(), &FirebaseConfig::from_env())?;
    open_coordinator_with(session, backend).await
}

pub async fn open_coordinator_with(
    session: &Session,
    backend: RemoteBackend,
) -> Result<CliCoordinator, CliError> {
    let mirror = FileMirror::in_dir(&session.data_dir);
    let coordinator = FavoritesCoordinator::<_, RemoteBackend>::new(mirror, backend);
    coordinator.load(session.identity.as_ref()).await;
    Ok(coordinator)
}

pub fn remote_backend(
    identity: Option<&UserId>,
    config: &FirebaseConfig,
) -> Result<RemoteBackend, CliError> {
    if identity.is_none() {
        return Ok(RemoteBackend::Disabled);
    }

    let missing = config.missing_required_vars();
    if !missing.is_empty() {
        return Err(CliError::RemoteNotConfigured(format!(
            "missing {}",
            missing.join(", ")
        )));
    }

    let store = FirestoreFavoritesStore::new(config)?
        .with_id_token(env::var("REEL_FIREBASE_ID_TOKEN").ok());
    tracing::info!("Remote favorites enabled for project {:?}", config.project_id);
    Ok(RemoteBackend::Firestore(store))
}

/// Wait for remote propagation so the process does not exit mid-write.
pub async fn finish_sync(pending: PendingSync) -> SyncOutcome {
    let outcome = pending.outcome().await;
    if outcome == SyncOutcome::Failed {
        eprintln!("Warning: change saved locally but not synced to your account");
    }
    outcome
}

pub fn resolve_data_dir(cli_data_dir: Option<PathBuf>) -> PathBuf {
    cli_data_dir
        .or_else(|| env::var_os("REEL_DATA_DIR").map(PathBuf::from))
        .unwrap_or_else(default_data_dir)
}

pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("reel")
}

pub fn resolve_identity(cli_user: Option<String>, env_user: Option<String>) -> Option<UserId> {
    UserId::from_optional(cli_user).or_else(|| UserId::from_optional(env_user))
}

pub fn movie_from_args(args: MovieArgs) -> Result<MovieSummary, CliError> {
    let title = normalize_text_option(Some(args.title)).ok_or(CliError::EmptyTitle)?;
    Ok(MovieSummary {
        id: MovieId::new(args.id),
        title,
        poster_path: normalize_text_option(args.poster),
        backdrop_path: normalize_text_option(args.backdrop),
        release_date: normalize_text_option(args.release_date),
        vote_average: args.rating,
        overview: args.overview.trim().to_string(),
    })
}

#[derive(Debug, Serialize)]
pub struct FavoriteListItem {
    pub id: u64,
    pub title: String,
    pub year: String,
    pub rating: f64,
    pub poster_url: String,
    pub overview: String,
    pub added_at: i64,
    pub relative_time: String,
}

pub fn favorite_to_list_item(record: &FavoriteRecord) -> FavoriteListItem {
    let now_ms = Utc::now().timestamp_millis();
    let movie = &record.movie;
    FavoriteListItem {
        id: movie.id.get(),
        title: movie.title.clone(),
        year: movie.release_year(),
        rating: movie.vote_average,
        poster_url: movie.poster_url(reel_core::models::PosterSize::default()),
        overview: movie.overview.clone(),
        added_at: record.added_at,
        relative_time: format_relative_time(record.added_at, now_ms),
    }
}

pub fn format_favorite_lines(records: &[FavoriteRecord], now_ms: i64) -> Vec<String> {
    records
        .iter()
        .map(|record| {
            let movie = &record.movie;
            let title = truncate_title(&movie.title, 40);
            format!(
                "{:<8}  {title:<40}  {:<4}  {:>4}  {}",
                movie.id.get(),
                movie.release_year(),
                movie.rating_label(),
                format_relative_time(record.added_at, now_ms)
            )
        })
        .collect()
}

pub fn truncate_title(title: &str, max_chars: usize) -> String {
    let collapsed = title.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() <= max_chars {
        collapsed
    } else {
        let take_len = max_chars.saturating_sub(3);
        let mut truncated = collapsed.chars().take(take_len).collect::<String>();
        truncated.push_str("...");
        truncated
    }
}

pub fn format_relative_time(timestamp_ms: i64, now_ms: i64) -> String {
    let diff = now_ms.saturating_sub(timestamp_ms);
    let minute = 60_000;
    let hour = 60 * minute;
    let day = 24 * hour;
    let week = 7 * day;
    let month = 30 * day;
    let year = 365 * day;

    if diff < minute {
        "just now".to_string()
    } else if diff < hour {
        format!("{}m ago", diff / minute)
    } else if diff < day {
        format!("{}h ago", diff / hour)
    } else if diff < week {
        format!("{}d ago", diff / day)
    } else if diff < month {
        format!("{}w ago", diff / week)
    } else if diff < year {
        format!("{}mo ago", diff / month)
    } else {
        format!("{}y ago", diff / year)
    }
}
