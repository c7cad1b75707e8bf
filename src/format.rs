//! Display formatters for counts and dates.

use chrono::NaiveDate;

/// Abbreviate a view count: `1.2M`, `125.0K`, or the plain number below 1,000.
/// One decimal place, rounded half up.
pub fn format_views(views: u64) -> String {
  let abbreviate = |divisor: u64, suffix: &str| {
    let tenths = (views as u128 * 10 + divisor as u128 / 2) / divisor as u128;
    format!("{}.{}{}", tenths / 10, tenths % 10, suffix)
  };
  if views >= 1_000_000 {
    abbreviate(1_000_000, "M")
  } else if views >= 1_000 {
    abbreviate(1_000, "K")
  } else {
    views.to_string()
  }
}

/// Group thousands with commas: `125000` → `125,000`.
pub fn format_count(n: u64) -> String {
  let digits = n.to_string();
  let mut out = String::with_capacity(digits.len() + digits.len() / 3);
  for (i, c) in digits.chars().enumerate() {
    if i > 0 && (digits.len() - i) % 3 == 0 {
      out.push(',');
    }
    out.push(c);
  }
  out
}

pub fn parse_date(iso: &str) -> Option<NaiveDate> {
  NaiveDate::parse_from_str(iso.trim(), "%Y-%m-%d").ok()
}

/// Compact date, e.g. `Jan 15, 2024`. Unparseable input is returned as-is.
pub fn format_date_short(iso: &str) -> String {
  parse_date(iso).map_or_else(|| iso.to_string(), |d| d.format("%b %-d, %Y").to_string())
}

/// Long date for detail pages, e.g. `January 15, 2024`.
pub fn format_date_long(iso: &str) -> String {
  parse_date(iso).map_or_else(|| iso.to_string(), |d| d.format("%B %-d, %Y").to_string())
}

/// `1 review` / `89 reviews`.
pub fn plural(n: u64, singular: &str, plural: &str) -> String {
  if n == 1 { format!("{} {}", n, singular) } else { format!("{} {}", format_count(n), plural) }
}

#[cfg(test)]
mod tests {
  use super::*;

  // --- format_views ---

  #[test]
  fn views_below_thousand_are_plain() {
    assert_eq!(format_views(42), "42");
    assert_eq!(format_views(0), "0");
    assert_eq!(format_views(999), "999");
  }

  #[test]
  fn views_in_thousands() {
    assert_eq!(format_views(125_000), "125.0K");
    assert_eq!(format_views(1_000), "1.0K");
    assert_eq!(format_views(67_000), "67.0K");
    assert_eq!(format_views(1_250), "1.3K");
  }

  #[test]
  fn views_below_a_million_stay_in_thousands() {
    assert_eq!(format_views(892_000), "892.0K");
  }

  #[test]
  fn views_in_millions() {
    assert_eq!(format_views(1_000_000), "1.0M");
    assert_eq!(format_views(2_345_678), "2.3M");
    assert_eq!(format_views(1_250_000), "1.3M");
  }

  // --- format_count ---

  #[test]
  fn count_groups_thousands() {
    assert_eq!(format_count(0), "0");
    assert_eq!(format_count(999), "999");
    assert_eq!(format_count(1_000), "1,000");
    assert_eq!(format_count(125_000), "125,000");
    assert_eq!(format_count(1_234_567), "1,234,567");
  }

  // --- dates ---

  #[test]
  fn date_short_and_long() {
    assert_eq!(format_date_short("2024-01-15"), "Jan 15, 2024");
    assert_eq!(format_date_long("2024-01-15"), "January 15, 2024");
    assert_eq!(format_date_short("2023-12-05"), "Dec 5, 2023");
  }

  #[test]
  fn date_unparseable_is_verbatim() {
    assert_eq!(format_date_short("sometime"), "sometime");
    assert_eq!(format_date_long(""), "");
  }

  #[test]
  fn plural_labels() {
    assert_eq!(plural(1, "review", "reviews"), "1 review");
    assert_eq!(plural(89, "review", "reviews"), "89 reviews");
    assert_eq!(plural(0, "video", "videos"), "0 videos");
  }
}
