//! Application constants loaded from `constants.ron` at compile time.
//!
//! The RON file is embedded via `include_str!`, parsed once on first access
//! via `LazyLock`.

use serde::Deserialize;
use std::sync::LazyLock;

/// All tuneable application constants.
#[derive(Debug, Deserialize)]
pub struct Constants {
  // Home feed
  pub featured_count: usize,
  pub recommended_count: usize,
  pub tag_preview_count: usize,

  // Status line
  pub error_dismiss_secs: u64,

  // Event loop
  pub poll_interval_ms: u64,

  // Remote content service
  pub http_timeout_secs: u64,
  pub user_agent: String,

  pub local_reviewer: String,
}

static CONSTANTS: LazyLock<Constants> = LazyLock::new(|| {
  // Safety: the RON file is embedded at compile time; a malformed file fails the first test run.
  ron::from_str(include_str!("../constants.ron")).expect("constants.ron must be valid RON (embedded at compile time)")
});

/// Returns a reference to the parsed application constants.
pub fn constants() -> &'static Constants {
  &CONSTANTS
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn embedded_constants_parse() {
    let c = constants();
    assert_eq!(c.featured_count, 3);
    assert!(c.poll_interval_ms > 0);
    assert!(!c.user_agent.is_empty());
  }
}
