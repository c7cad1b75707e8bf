//! Catalog queries: search filtering, derived orderings and company lookups.
//!
//! Every function here borrows the catalog and returns a new sequence of
//! references; the underlying `Vec<Video>` is never reordered.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::format::parse_date;
use crate::model::{Company, CompanySlug, Video, VideoId};

/// A named ordering over the catalog, one per home-feed tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortView {
  /// Most viewed first.
  #[default]
  Trending,
  /// Newest upload first.
  Recent,
  /// Highest rated first, ties broken by review count.
  TopRated,
}

impl SortView {
  pub const ALL: [SortView; 3] = [SortView::Trending, SortView::Recent, SortView::TopRated];

  pub fn label(self) -> &'static str {
    match self {
      SortView::Trending => "Trending",
      SortView::Recent => "Recent",
      SortView::TopRated => "Top Rated",
    }
  }

  pub fn heading(self) -> &'static str {
    match self {
      SortView::Trending => "Trending Now",
      SortView::Recent => "Recently Added",
      SortView::TopRated => "Highest Rated",
    }
  }

  pub fn next(self) -> Self {
    let idx = Self::ALL.iter().position(|v| *v == self).unwrap_or(0);
    Self::ALL[(idx + 1) % Self::ALL.len()]
  }

  pub fn prev(self) -> Self {
    let idx = Self::ALL.iter().position(|v| *v == self).unwrap_or(0);
    Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
  }
}

/// Everything the home feed needs: the videos plus the company directory.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
  pub videos: Vec<Video>,
  pub companies: Vec<Company>,
}

impl Catalog {
  pub fn video(&self, id: &VideoId) -> Option<&Video> {
    self.videos.iter().find(|v| &v.id == id)
  }

  pub fn company(&self, slug: &CompanySlug) -> Option<&Company> {
    self.companies.iter().find(|c| &c.slug == slug)
  }

  /// Resolve the company that owns `video`.
  pub fn company_of(&self, video: &Video) -> Option<&Company> {
    match &video.company_slug {
      Some(slug) => self.company(slug),
      None => self.companies.iter().find(|c| same_name(&c.name, &video.company)),
    }
  }

  /// Slug to navigate to from a video, even when no company record exists for it.
  pub fn company_slug_of(&self, video: &Video) -> CompanySlug {
    video
      .company_slug
      .clone()
      .or_else(|| self.company_of(video).map(|c| c.slug.clone()))
      .unwrap_or_else(|| CompanySlug(video.company.to_lowercase()))
  }

  /// Videos belonging to `company`, in catalog order.
  pub fn videos_of(&self, company: &Company) -> Vec<&Video> {
    self.videos.iter().filter(|v| belongs_to(v, company)).collect()
  }
}

fn belongs_to(video: &Video, company: &Company) -> bool {
  match &video.company_slug {
    Some(slug) => slug == &company.slug,
    None => same_name(&video.company, &company.name),
  }
}

/// Check whether a video matches an already-lowercased search needle.
/// Matches against title, company name and any tag.
pub fn matches(video: &Video, needle: &str) -> bool {
  video.title.to_lowercase().contains(needle)
    || video.company.to_lowercase().contains(needle)
    || video.tags.iter().any(|tag| tag.to_lowercase().contains(needle))
}

/// Case-insensitive substring search, order-preserving. A blank query keeps
/// every video; any other query is matched as typed, spaces included.
pub fn filter<'a>(videos: impl IntoIterator<Item = &'a Video>, query: &str) -> Vec<&'a Video> {
  if query.trim().is_empty() {
    return videos.into_iter().collect();
  }
  let needle = query.to_lowercase();
  videos.into_iter().filter(|v| matches(v, &needle)).collect()
}

fn same_name(a: &str, b: &str) -> bool {
  a.to_lowercase() == b.to_lowercase()
}

fn compare(view: SortView, a: &Video, b: &Video) -> Ordering {
  match view {
    SortView::Trending => b.views.cmp(&a.views),
    // Unparseable dates compare as None and sink to the end.
    SortView::Recent => parse_date(&b.upload_date).cmp(&parse_date(&a.upload_date)),
    SortView::TopRated => b.rating.total_cmp(&a.rating).then_with(|| b.review_count.cmp(&a.review_count)),
  }
}

/// Stable sort into a new sequence.
pub fn sorted<'a>(videos: impl IntoIterator<Item = &'a Video>, view: SortView) -> Vec<&'a Video> {
  let mut out: Vec<&Video> = videos.into_iter().collect();
  out.sort_by(|a, b| compare(view, a, b));
  out
}

pub fn trending(videos: &[Video]) -> Vec<&Video> {
  sorted(videos, SortView::Trending)
}

pub fn recent(videos: &[Video]) -> Vec<&Video> {
  sorted(videos, SortView::Recent)
}

pub fn top_rated(videos: &[Video]) -> Vec<&Video> {
  sorted(videos, SortView::TopRated)
}

/// The ordering shown under a home-feed tab, narrowed by the search query.
pub fn browse<'a>(videos: &'a [Video], view: SortView, query: &str) -> Vec<&'a Video> {
  let ordered = match view {
    SortView::Trending => trending(videos),
    SortView::Recent => recent(videos),
    SortView::TopRated => top_rated(videos),
  };
  filter(ordered, query)
}

/// Leading catalog entries highlighted above the tabs.
pub fn featured(videos: &[Video], count: usize) -> Vec<&Video> {
  videos.iter().take(count).collect()
}

/// Other companies to suggest next to a profile.
pub fn recommended<'a>(companies: &'a [Company], exclude: &CompanySlug, count: usize) -> Vec<&'a Company> {
  companies.iter().filter(|c| &c.slug != exclude).take(count).collect()
}
