use serde::{Deserialize, Serialize};

/// Unique identifier of a video within a catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VideoId(pub String);

/// Unique lookup key of a company profile.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompanySlug(pub String);

impl VideoId {
  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl CompanySlug {
  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl std::fmt::Display for VideoId {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(&self.0)
  }
}

impl std::fmt::Display for CompanySlug {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(&self.0)
  }
}

/// A single catalog entry. Optional fields are display-only and may be absent
/// depending on where the record came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Video {
  pub id: VideoId,
  pub title: String,
  /// Display name of the owning company.
  pub company: String,
  /// Owning company. Records without one fall back to matching `company`
  /// against `Company::name`.
  #[serde(default)]
  pub company_slug: Option<CompanySlug>,
  pub thumbnail: String,
  /// Already formatted, e.g. "8:42".
  pub duration: String,
  /// ISO calendar date, e.g. "2024-01-15".
  pub upload_date: String,
  pub views: u64,
  pub rating: f32,
  pub review_count: u32,
  #[serde(default)]
  pub tags: Vec<String>,
  #[serde(default)]
  pub description: Option<String>,
  #[serde(default)]
  pub genre: Option<String>,
  #[serde(default)]
  pub year: Option<String>,
  #[serde(default)]
  pub age_rating: Option<String>,
  #[serde(default)]
  pub submitted_by: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialLinks {
  #[serde(default)]
  pub website: Option<String>,
  #[serde(default)]
  pub twitter: Option<String>,
  #[serde(default)]
  pub linkedin: Option<String>,
  #[serde(default)]
  pub instagram: Option<String>,
}

impl SocialLinks {
  /// Present links as (label, uri) pairs in display order.
  pub fn entries(&self) -> Vec<(&'static str, &str)> {
    [
      ("Website", self.website.as_deref()),
      ("Twitter", self.twitter.as_deref()),
      ("LinkedIn", self.linkedin.as_deref()),
      ("Instagram", self.instagram.as_deref()),
    ]
    .into_iter()
    .filter_map(|(label, uri)| uri.map(|u| (label, u)))
    .collect()
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
  pub slug: CompanySlug,
  pub name: String,
  pub logo: String,
  pub description: String,
  pub location: String,
  pub vertical: String,
  pub followers: u32,
  #[serde(default)]
  pub social_links: Option<SocialLinks>,
}

/// A user review. Ratings use the continuous 0–5 scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
  pub id: String,
  pub user: String,
  pub avatar: String,
  pub rating: f32,
  pub text: String,
  /// ISO calendar date.
  pub date: String,
  pub likes: u32,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn video_deserializes_camel_case_with_optional_fields_missing() {
    let json = r#"{
      "id": "9",
      "title": "Demo",
      "company": "Acme",
      "thumbnail": "https://example.com/t.jpg",
      "duration": "1:00",
      "uploadDate": "2024-02-01",
      "views": 10,
      "rating": 3.5,
      "reviewCount": 2
    }"#;
    let video: Video = serde_json::from_str(json).unwrap();
    assert_eq!(video.id, VideoId("9".to_string()));
    assert_eq!(video.upload_date, "2024-02-01");
    assert_eq!(video.review_count, 2);
    assert!(video.company_slug.is_none());
    assert!(video.tags.is_empty());
    assert!(video.genre.is_none());
  }

  #[test]
  fn social_links_entries_skip_missing() {
    let links = SocialLinks {
      website: Some("https://stripe.com".to_string()),
      twitter: None,
      linkedin: Some("https://linkedin.com/company/stripe".to_string()),
      instagram: None,
    };
    let entries = links.entries();
    assert_eq!(entries, vec![("Website", "https://stripe.com"), ("LinkedIn", "https://linkedin.com/company/stripe")]);
  }

  #[test]
  fn identifiers_display_as_raw_string() {
    assert_eq!(VideoId("6".to_string()).to_string(), "6");
    assert_eq!(CompanySlug("openai".to_string()).as_str(), "openai");
  }
}
