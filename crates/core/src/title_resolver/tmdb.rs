//! TMDB (The Movie Database) backed title resolver.
//!
//! IMDb ids are looked up with `/find/{id}` in Russian to get the localized
//! title and year, then the matching movie or TV record's details are fetched
//! for the original-language title (the English name when TMDB has none).
//! TMDB has no Kinopoisk index.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use crate::config::TmdbConfig;
use crate::searcher::ContentType;

use super::{ExternalId, ResolveError, ResolvedTitle, TitleResolver};

const LOCALIZED_LANGUAGE: &str = "ru-RU";
const ORIGINAL_LANGUAGE: &str = "en-US";

/// TMDB `/find` response.
#[derive(Debug, Deserialize)]
struct FindResponse {
    #[serde(default)]
    movie_results: Vec<FindMovie>,
    #[serde(default)]
    tv_results: Vec<FindTv>,
}

#[derive(Debug, Deserialize)]
struct FindMovie {
    id: u64,
    #[serde(default)]
    title: String,
    #[serde(default)]
    original_title: String,
    #[serde(default)]
    release_date: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FindTv {
    id: u64,
    #[serde(default)]
    name: String,
    #[serde(default)]
    original_name: String,
    #[serde(default)]
    first_air_date: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MovieDetails {
    #[serde(default)]
    original_title: String,
    #[serde(default)]
    title: String,
}

#[derive(Debug, Deserialize)]
struct TvDetails {
    #[serde(default)]
    original_name: String,
    #[serde(default)]
    name: String,
}

/// First non-blank of the original-language and English names.
fn prefer_original(original: String, english: String) -> String {
    if original.trim().is_empty() {
        english
    } else {
        original
    }
}

/// A match from `/find`, before the details lookup.
#[derive(Debug)]
enum Found {
    Movie(FindMovie),
    Tv(FindTv),
}

impl Found {
    fn details_path(&self) -> String {
        match self {
            Found::Movie(m) => format!("movie/{}", m.id),
            Found::Tv(t) => format!("tv/{}", t.id),
        }
    }

    fn into_resolved(self) -> ResolvedTitle {
        match self {
            Found::Movie(m) => ResolvedTitle {
                original_title: m.original_title,
                russian_title: m.title,
                year: parse_year(m.release_date.as_deref()),
            },
            Found::Tv(t) => ResolvedTitle {
                original_title: t.original_name,
                russian_title: t.name,
                year: parse_year(t.first_air_date.as_deref()),
            },
        }
    }
}

/// Year from a TMDB `YYYY-MM-DD` date.
fn parse_year(date: Option<&str>) -> Option<u32> {
    date.and_then(|d| d.get(..4)).and_then(|y| y.parse().ok())
}

/// Title resolver backed by the TMDB v3 API.
pub struct TmdbResolver {
    client: Client,
    base_url: String,
    api_key: String,
}

impl TmdbResolver {
    /// Create a new TMDB resolver.
    pub fn new(config: TmdbConfig) -> Result<Self, ResolveError> {
        if config.api_key.is_empty() {
            return Err(ResolveError::NotConfigured(
                "TMDB API key is required".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key,
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<T, ResolveError> {
        let url = format!("{}/{}", self.base_url, path);

        let response = self
            .client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str())])
            .query(params)
            .send()
            .await?;

        let response = check_status(response, path).await?;
        response
            .json()
            .await
            .map_err(|e| ResolveError::ParseError(format!("{}: {}", path, e)))
    }

    /// Look up an IMDb id, preferring results of the requested kind.
    async fn find(&self, imdb_id: &str, kind: ContentType) -> Result<Found, ResolveError> {
        let find: FindResponse = self
            .get_json(
                &format!("find/{}", imdb_id),
                &[
                    ("external_source", "imdb_id"),
                    ("language", LOCALIZED_LANGUAGE),
                ],
            )
            .await?;

        let mut movies = find.movie_results.into_iter().map(Found::Movie);
        let mut shows = find.tv_results.into_iter().map(Found::Tv);

        let found = match kind {
            ContentType::Movie => movies.next().or_else(|| shows.next()),
            ContentType::Serial | ContentType::Anime => shows.next().or_else(|| movies.next()),
        };

        found.ok_or_else(|| ResolveError::NotFound(imdb_id.to_string()))
    }

    /// Original title of a found record from its details.
    async fn details_title(&self, found: &Found) -> Result<String, ResolveError> {
        let path = found.details_path();
        let params = [("language", ORIGINAL_LANGUAGE)];

        let title = match found {
            Found::Movie(_) => {
                let details: MovieDetails = self.get_json(&path, &params).await?;
                prefer_original(details.original_title, details.title)
            }
            Found::Tv(_) => {
                let details: TvDetails = self.get_json(&path, &params).await?;
                prefer_original(details.original_name, details.name)
            }
        };
        Ok(title)
    }
}

async fn check_status(response: Response, what: &str) -> Result<Response, ResolveError> {
    let status = response.status();
    if status == 401 {
        return Err(ResolveError::NotConfigured(
            "Invalid TMDB API key".to_string(),
        ));
    }
    if status == 404 {
        return Err(ResolveError::NotFound(what.to_string()));
    }
    if status == 429 {
        return Err(ResolveError::RateLimitExceeded);
    }
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ResolveError::ApiError {
            status: status.as_u16(),
            message: body,
        });
    }
    Ok(response)
}

#[async_trait]
impl TitleResolver for TmdbResolver {
    fn name(&self) -> &str {
        "tmdb"
    }

    async fn resolve(
        &self,
        id: &ExternalId,
        kind: ContentType,
    ) -> Result<ResolvedTitle, ResolveError> {
        let imdb_id = match id {
            ExternalId::Imdb(imdb_id) => imdb_id,
            ExternalId::Kinopoisk(_) => {
                return Err(ResolveError::Unsupported(format!(
                    "TMDB cannot resolve Kinopoisk id {}",
                    id
                )))
            }
        };

        debug!(id = %imdb_id, kind = %kind, "TMDB find");
        let found = self.find(imdb_id, kind).await?;

        // The details title is a refinement; the localized match is enough to search.
        let details_title = match self.details_title(&found).await {
            Ok(title) => Some(title),
            Err(e) => {
                debug!(id = %imdb_id, error = %e, "TMDB details lookup failed, keeping original title");
                None
            }
        };

        let mut resolved = found.into_resolved();
        if let Some(title) = details_title.filter(|t| !t.trim().is_empty()) {
            resolved.original_title = title;
        }

        if resolved.is_empty() {
            return Err(ResolveError::NotFound(imdb_id.clone()));
        }

        Ok(resolved)
    }
}
