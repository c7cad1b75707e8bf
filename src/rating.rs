//! Star rating model.
//!
//! Ratings live on a continuous scale (0 to `max_rating`, fractional allowed)
//! and render against a fixed number of stars. Half stars are display-only:
//! interactive selection always yields a whole number.

/// Default number of stars on the scale.
pub const MAX_RATING: u8 = 5;

/// Fill state of one star position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StarFill {
  Filled,
  Half,
  Empty,
}

impl StarFill {
  pub fn glyph(self) -> &'static str {
    match self {
      StarFill::Filled => "★",
      StarFill::Half => "⯪",
      StarFill::Empty => "☆",
    }
  }

  pub fn is_lit(self) -> bool {
    !matches!(self, StarFill::Empty)
  }
}

/// Clamp a rating to `[0, max_rating]`. NaN collapses to 0.
pub fn clamp(rating: f32, max_rating: u8) -> f32 {
  if rating.is_nan() { 0.0 } else { rating.clamp(0.0, max_rating as f32) }
}

/// Compute the fill state of every star position `1..=max_rating`.
///
/// Star `i` is filled if `i <= rating`, half-filled if `i - 0.5 <= rating < i`,
/// otherwise empty. Out-of-range input is clamped first, so a rating above the
/// scale never overfills.
pub fn render(rating: f32, max_rating: u8) -> Vec<StarFill> {
  let rating = clamp(rating, max_rating);
  (1..=max_rating)
    .map(|i| {
      let pos = i as f32;
      if pos <= rating {
        StarFill::Filled
      } else if pos - 0.5 <= rating {
        StarFill::Half
      } else {
        StarFill::Empty
      }
    })
    .collect()
}

/// One-decimal numeric label shown next to the stars. A zero rating has no label.
pub fn label(rating: f32) -> Option<String> {
  let rating = clamp(rating, MAX_RATING);
  (rating > 0.0).then(|| format!("{:.1}", rating))
}

/// Value produced when the user picks star `position` on an interactive
/// rating. Positions outside the scale are ignored.
pub fn pick(position: u8, max_rating: u8) -> Option<u8> {
  (1..=max_rating).contains(&position).then_some(position)
}

/// Mean rating of a set of reviews; `None` when there are none.
pub fn average(ratings: impl IntoIterator<Item = f32>) -> Option<f32> {
  let (sum, count) = ratings.into_iter().fold((0.0f32, 0u32), |(s, c), r| (s + clamp(r, MAX_RATING), c + 1));
  (count > 0).then(|| sum / count as f32)
}
