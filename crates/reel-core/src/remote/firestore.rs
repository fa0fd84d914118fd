//! Firestore REST adapter for the per-user favorites collection.
//!
//! Documents live at `users/{uid}/favorites/{movieId}` and carry the full
//! favorite record as Firestore typed values.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::config::FirebaseConfig;
use crate::error::{Error, Result};
use crate::models::{FavoriteRecord, MovieId, MovieSummary, UserId};
use crate::remote::{sort_newest_first, RemoteFavoritesStore};
use crate::util::{compact_text, normalize_text_option};

const HTTP_TIMEOUT_SECS: u64 = 10;
const USERS_COLLECTION: &str = "users";
const FAVORITES_COLLECTION: &str = "favorites";
const ADDED_AT_FIELD: &str = "addedAt";

/// Remote favorites store talking to the Firestore REST API.
#[derive(Clone)]
pub struct FirestoreFavoritesStore {
    documents_url: String,
    api_key: Option<String>,
    id_token: Option<String>,
    client: Client,
}

impl fmt::Debug for FirestoreFavoritesStore {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("FirestoreFavoritesStore")
            .field("documents_url", &self.documents_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("id_token", &self.id_token.as_ref().map(|_| "[REDACTED]"))
            .finish_non_exhaustive()
    }
}

impl FirestoreFavoritesStore {
    pub fn new(config: &FirebaseConfig) -> Result<Self> {
        let documents_url = config.firestore_documents_url()?;
        Ok(Self {
            documents_url,
            api_key: normalize_text_option(config.api_key.clone()),
            id_token: None,
            client: Client::builder()
                .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
                .build()?,
        })
    }

    /// Attach the signed-in user's ID token as a bearer credential.
    #[must_use]
    pub fn with_id_token(mut self, id_token: Option<String>) -> Self {
        self.id_token = normalize_text_option(id_token);
        self
    }

    fn user_document_url(&self, user: &UserId) -> String {
        format!(
            "{}/{USERS_COLLECTION}/{}",
            self.documents_url,
            urlencoding::encode(user.as_str())
        )
    }

    fn favorite_document_url(&self, user: &UserId, movie_id: MovieId) -> String {
        format!(
            "{}/{FAVORITES_COLLECTION}/{movie_id}",
            self.user_document_url(user)
        )
    }

    fn authorize(&self, mut request: RequestBuilder) -> RequestBuilder {
        if let Some(api_key) = &self.api_key {
            request = request.query(&[("key", api_key)]);
        }
        if let Some(id_token) = &self.id_token {
            request = request.bearer_auth(id_token);
        }
        request.header("Accept", "application/json")
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = self.authorize(request).send().await?;
        ensure_success(response).await
    }
}

async fn ensure_success(response: Response) -> Result<Response> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    Err(Error::Remote(parse_api_error(status, &body)))
}

impl RemoteFavoritesStore for FirestoreFavoritesStore {
    async fn list_for(&self, user: &UserId) -> Result<Vec<FavoriteRecord>> {
        let request = self
            .client
            .post(format!("{}:runQuery", self.user_document_url(user)))
            .json(&favorites_query());
        let body = self.send(request).await?.text().await?;
        parse_run_query_response(&body)
    }

    async fn upsert(&self, user: &UserId, record: &FavoriteRecord) -> Result<()> {
        let request = self
            .client
            .patch(self.favorite_document_url(user, record.id()))
            .json(&encode_document(record));
        self.send(request).await?;
        Ok(())
    }

    async fn delete(&self, user: &UserId, movie_id: MovieId) -> Result<()> {
        let request = self
            .client
            .delete(self.favorite_document_url(user, movie_id));
        let response = self.authorize(request).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(());
        }
        ensure_success(response).await?;
        Ok(())
    }
}

fn favorites_query() -> Value {
    json!({
        "structuredQuery": {
            "from": [{ "collectionId": FAVORITES_COLLECTION }],
            "orderBy": [{
                "field": { "fieldPath": ADDED_AT_FIELD },
                "direction": "DESCENDING"
            }]
        }
    })
}

fn encode_document(record: &FavoriteRecord) -> Value {
    let movie = &record.movie;
    json!({
        "fields": {
            "id": integer_value(movie.id.get().to_string()),
            "title": string_value(Some(&movie.title)),
            "poster_path": string_value(movie.poster_path.as_deref()),
            "backdrop_path": string_value(movie.backdrop_path.as_deref()),
            "release_date": string_value(movie.release_date.as_deref()),
            "vote_average": { "doubleValue": movie.vote_average },
            "overview": string_value(Some(&movie.overview)),
            ADDED_AT_FIELD: integer_value(record.added_at.to_string()),
        }
    })
}

fn integer_value(value: String) -> Value {
    json!({ "integerValue": value })
}

fn string_value(value: Option<&str>) -> Value {
    value.map_or_else(
        || json!({ "nullValue": null }),
        |value| json!({ "stringValue": value }),
    )
}

#[derive(Debug, Deserialize)]
struct RunQueryItem {
    #[serde(default)]
    document: Option<FirestoreDocument>,
}

#[derive(Debug, Deserialize)]
struct FirestoreDocument {
    name: String,
    #[serde(default)]
    fields: BTreeMap<String, FirestoreValue>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FirestoreValue {
    #[serde(default)]
    integer_value: Option<Value>,
    #[serde(default)]
    double_value: Option<f64>,
    #[serde(default)]
    string_value: Option<String>,
}

impl FirestoreValue {
    fn as_i64(&self) -> Option<i64> {
        match self.integer_value.as_ref()? {
            Value::String(raw) => raw.trim().parse().ok(),
            Value::Number(number) => number.as_i64(),
            _ => None,
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn as_f64(&self) -> Option<f64> {
        self.double_value
            .or_else(|| self.as_i64().map(|value| value as f64))
    }
}

impl FirestoreDocument {
    fn field(&self, name: &str) -> Option<&FirestoreValue> {
        self.fields.get(name)
    }

    fn string(&self, name: &str) -> Option<String> {
        self.field(name)
            .and_then(|value| value.string_value.clone())
    }

    fn movie_id(&self) -> Result<MovieId> {
        let from_field = self
            .field("id")
            .and_then(FirestoreValue::as_i64)
            .and_then(|id| u64::try_from(id).ok());
        let from_name = || {
            self.name
                .rsplit('/')
                .next()
                .and_then(|segment| segment.parse::<u64>().ok())
        };
        from_field
            .or_else(from_name)
            .map(MovieId::new)
            .ok_or_else(|| {
                Error::Remote(format!(
                    "favorite document {} has no movie id",
                    compact_text(&self.name)
                ))
            })
    }

    fn into_record(self) -> Result<FavoriteRecord> {
        let movie = MovieSummary {
            id: self.movie_id()?,
            title: self.string("title").unwrap_or_default(),
            poster_path: self.string("poster_path"),
            backdrop_path: self.string("backdrop_path"),
            release_date: self.string("release_date"),
            vote_average: self
                .field("vote_average")
                .and_then(FirestoreValue::as_f64)
                .unwrap_or_default(),
            overview: self.string("overview").unwrap_or_default(),
        };
        let added_at = self
            .field(ADDED_AT_FIELD)
            .and_then(FirestoreValue::as_i64)
            .unwrap_or_default();
        Ok(FavoriteRecord::with_added_at(movie, added_at))
    }
}

fn parse_run_query_response(body: &str) -> Result<Vec<FavoriteRecord>> {
    let items = serde_json::from_str::<Vec<RunQueryItem>>(body)?;
    let mut records = items
        .into_iter()
        .filter_map(|item| item.document)
        .map(FirestoreDocument::into_record)
        .collect::<Result<Vec<_>>>()?;
    sort_newest_first(&mut records);
    Ok(records)
}

#[derive(Debug, Deserialize)]
struct GoogleErrorResponse {
    error: Option<GoogleErrorBody>,
}

#[derive(Debug, Deserialize)]
struct GoogleErrorBody {
    message: Option<String>,
    status: Option<String>,
}

fn parse_api_error(status: StatusCode, body: &str) -> String {
    if let Ok(GoogleErrorResponse { error: Some(error) }) =
        serde_json::from_str::<GoogleErrorResponse>(body)
    {
        if let Some(message) = error.message.or(error.status) {
            return format!("{} ({})", message.trim(), status.as_u16());
        }
    }

    let trimmed = compact_text(body);
    if trimmed.is_empty() {
        format!("HTTP {}", status.as_u16())
    } else {
        format!("{} ({})", trimmed, status.as_u16())
    }
}
