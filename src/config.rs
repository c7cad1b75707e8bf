use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::warn;

use crate::catalog::SortView;

/// User preferences persisted to `prefs.toml`.
#[derive(Serialize, Deserialize, Default, Debug, Clone, PartialEq)]
pub struct Config {
  pub theme_name: Option<String>,
  pub default_tab: Option<SortView>,
  /// Base URL of a content service; fixtures are used when unset.
  pub source_url: Option<String>,
}

fn project_dirs() -> Option<ProjectDirs> {
  ProjectDirs::from("", "", "reels")
}

/// Directory for log files.
pub fn data_dir() -> Option<PathBuf> {
  project_dirs().map(|d| d.data_local_dir().to_path_buf())
}

impl Config {
  pub fn load() -> Self {
    if let Some(proj_dirs) = project_dirs() {
      let config_file = proj_dirs.config_dir().join("prefs.toml");
      if let Ok(content) = std::fs::read_to_string(&config_file) {
        match Self::parse(&content) {
          Some(config) => return config,
          None => warn!(path = %config_file.display(), "config: ignoring unreadable prefs"),
        }
      }
    }
    Self::default()
  }

  pub fn parse(content: &str) -> Option<Self> {
    toml::from_str(content).ok()
  }

  pub fn save(&self) {
    if let Some(proj_dirs) = project_dirs() {
      let config_dir = proj_dirs.config_dir();
      if std::fs::create_dir_all(config_dir).is_ok() {
        let config_file = config_dir.join("prefs.toml");
        match toml::to_string(self) {
          Ok(content) => {
            if let Err(e) = std::fs::write(&config_file, content) {
              warn!(path = %config_file.display(), err = %e, "config: failed to save prefs");
            }
          }
          Err(e) => warn!(err = %e, "config: failed to serialize prefs"),
        }
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parse_full_prefs() {
    let config = Config::parse(
      r#"
theme_name = "Paper"
default_tab = "top-rated"
source_url = "https://api.example.com"
"#,
    )
    .unwrap();
    assert_eq!(config.theme_name.as_deref(), Some("Paper"));
    assert_eq!(config.default_tab, Some(SortView::TopRated));
    assert_eq!(config.source_url.as_deref(), Some("https://api.example.com"));
  }

  #[test]
  fn parse_empty_is_default() {
    assert_eq!(Config::parse(""), Some(Config::default()));
  }

  #[test]
  fn parse_invalid_is_none() {
    assert_eq!(Config::parse("default_tab = \"sideways\""), None);
  }

  #[test]
  fn round_trips_through_toml() {
    let config = Config { theme_name: Some("Reel".to_string()), default_tab: Some(SortView::Recent), source_url: None };
    let text = toml::to_string(&config).unwrap();
    assert_eq!(Config::parse(&text), Some(config));
  }
}
