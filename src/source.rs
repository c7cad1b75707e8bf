//! Content sources: where the catalog, company profiles and reviews come from.
//!
//! `Fixture` serves the data embedded in `fixtures.ron` and accepts writes
//! without keeping them. `Remote` talks JSON to a content service over HTTP.

use anyhow::{Context, Result};
use reqwest::{Client, StatusCode, Url};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::collections::HashMap;
use std::sync::LazyLock;
use std::time::Duration;
use tracing::{debug, warn};

use crate::catalog::Catalog;
use crate::constants::constants;
use crate::model::{Company, CompanySlug, Review, Video, VideoId};

/// Failure at the content boundary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
  /// Unknown video id or company slug. Not retried.
  #[error("not found")]
  NotFound,
  /// The service understood the request and refused it.
  #[error("rejected: {0}")]
  Rejected(String),
  /// Transport failure, server error or undecodable body. Retryable.
  #[error("unavailable: {0}")]
  Unavailable(String),
}

impl FetchError {
  pub fn is_retryable(&self) -> bool {
    matches!(self, FetchError::Unavailable(_))
  }
}

impl From<reqwest::Error> for FetchError {
  fn from(e: reqwest::Error) -> Self {
    FetchError::Unavailable(e.to_string())
  }
}

// --- Fixtures ---

/// Data shipped with the binary.
#[derive(Debug, Deserialize)]
pub struct Fixtures {
  pub videos: Vec<Video>,
  pub companies: Vec<Company>,
  #[serde(default)]
  pub reviews: HashMap<VideoId, Vec<Review>>,
}

impl Fixtures {
  pub fn catalog(&self) -> Catalog {
    Catalog { videos: self.videos.clone(), companies: self.companies.clone() }
  }
}

static FIXTURES: LazyLock<Fixtures> = LazyLock::new(|| {
  // Safety: the RON file is embedded at compile time; a malformed file fails the first test run.
  ron::from_str(include_str!("../fixtures.ron")).expect("fixtures.ron must be valid RON (embedded at compile time)")
});

pub fn fixtures() -> &'static Fixtures {
  &FIXTURES
}

// --- Remote ---

/// Body of `POST /videos/{id}/reviews`.
#[derive(Debug, Serialize)]
struct ReviewSubmission<'a> {
  rating: f32,
  text: &'a str,
}

#[derive(Debug, Clone)]
pub struct RemoteSource {
  base_url: String,
  base: Url,
  client: Client,
}

impl RemoteSource {
  pub fn new(base_url: &str) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(constants().http_timeout_secs))
      .user_agent(format!("{}/{}", constants().user_agent, env!("CARGO_PKG_VERSION")))
      .build()
      .context("Failed to build HTTP client")?;
    let base_url = base_url.trim_end_matches('/').to_string();
    let base = Url::parse(&base_url).with_context(|| format!("Invalid content source URL '{}'", base_url))?;
    if base.cannot_be_a_base() {
      anyhow::bail!("Content source URL '{}' cannot take a path", base_url);
    }
    Ok(Self { base_url, base, client })
  }

  /// Endpoint under the base URL. Each segment is percent-encoded on its own,
  /// so ids and slugs never add path levels, queries or fragments.
  fn url(&self, segments: &[&str]) -> Url {
    let mut url = self.base.clone();
    if let Ok(mut path) = url.path_segments_mut() {
      path.pop_if_empty().extend(segments);
    }
    url
  }

  async fn get_json<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, FetchError> {
    let url = self.url(segments);
    debug!(url = %url, "source: GET");
    let response = self.client.get(url.clone()).send().await?;
    check_status(response.status())?;
    response.json::<T>().await.map_err(|e| FetchError::Unavailable(format!("invalid response from {}: {}", url, e)))
  }

  async fn catalog(&self) -> Result<Catalog, FetchError> {
    let (videos, companies) =
      futures::try_join!(self.get_json::<Vec<Video>>(&["videos"]), self.get_json::<Vec<Company>>(&["companies"]))?;
    Ok(Catalog { videos, companies })
  }

  async fn submit_review(&self, video: &VideoId, rating: f32, text: &str) -> Result<(), FetchError> {
    let url = self.url(&["videos", video.as_str(), "reviews"]);
    debug!(url = %url, rating, "source: POST review");
    let response = self.client.post(url).json(&ReviewSubmission { rating, text }).send().await?;
    check_status(response.status())
  }

  async fn set_following(&self, slug: &CompanySlug, follow: bool) -> Result<(), FetchError> {
    let url = self.url(&["companies", slug.as_str(), "follow"]);
    debug!(url = %url, follow, "source: follow");
    let request = if follow { self.client.post(url) } else { self.client.delete(url) };
    check_status(request.send().await?.status())
  }
}

fn check_status(status: StatusCode) -> Result<(), FetchError> {
  if status.is_success() {
    Ok(())
  } else if status == StatusCode::NOT_FOUND {
    Err(FetchError::NotFound)
  } else if status.is_client_error() {
    Err(FetchError::Rejected(status.to_string()))
  } else {
    Err(FetchError::Unavailable(status.to_string()))
  }
}

// --- Source ---

#[derive(Debug, Clone)]
pub enum ContentSource {
  Fixture,
  Remote(RemoteSource),
}

impl ContentSource {
  /// Build a source from an optional service base URL. No URL means fixtures.
  pub fn from_url(url: Option<&str>) -> Result<Self> {
    match url.map(str::trim).filter(|u| !u.is_empty()) {
      None => Ok(ContentSource::Fixture),
      Some(u) if u.starts_with("http://") || u.starts_with("https://") => Ok(ContentSource::Remote(RemoteSource::new(u)?)),
      Some(u) => Err(anyhow::anyhow!("Content source must be an http(s) URL, got '{}'", u)),
    }
  }

  pub fn label(&self) -> String {
    match self {
      ContentSource::Fixture => "fixtures".to_string(),
      ContentSource::Remote(r) => r.base_url.clone(),
    }
  }

  pub async fn catalog(&self) -> Result<Catalog, FetchError> {
    match self {
      ContentSource::Fixture => Ok(fixtures().catalog()),
      ContentSource::Remote(r) => r.catalog().await,
    }
  }

  pub async fn company(&self, slug: &CompanySlug) -> Result<Company, FetchError> {
    match self {
      ContentSource::Fixture => fixtures().companies.iter().find(|c| &c.slug == slug).cloned().ok_or(FetchError::NotFound),
      ContentSource::Remote(r) => r.get_json(&["companies", slug.as_str()]).await,
    }
  }

  pub async fn reviews(&self, video: &VideoId) -> Result<Vec<Review>, FetchError> {
    match self {
      ContentSource::Fixture => {
        if !fixtures().videos.iter().any(|v| &v.id == video) {
          return Err(FetchError::NotFound);
        }
        Ok(fixtures().reviews.get(video).cloned().unwrap_or_default())
      }
      ContentSource::Remote(r) => r.get_json(&["videos", video.as_str(), "reviews"]).await,
    }
  }

  /// Submit a review. Fixtures accept without storing anything.
  pub async fn submit_review(&self, video: &VideoId, rating: f32, text: &str) -> Result<(), FetchError> {
    match self {
      ContentSource::Fixture => {
        debug!(video = %video, rating, "source: review accepted by fixtures");
        Ok(())
      }
      ContentSource::Remote(r) => r.submit_review(video, rating, text).await.inspect_err(|e| {
        warn!(video = %video, err = %e, "source: review submission failed");
      }),
    }
  }

  pub async fn set_following(&self, slug: &CompanySlug, follow: bool) -> Result<(), FetchError> {
    match self {
      ContentSource::Fixture => {
        if fixtures().companies.iter().any(|c| &c.slug == slug) { Ok(()) } else { Err(FetchError::NotFound) }
      }
      ContentSource::Remote(r) => r.set_following(slug, follow).await,
    }
  }
}
