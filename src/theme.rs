use ratatui::style::Color;

pub struct Theme {
  pub name: &'static str,
  pub bg: Color,
  pub fg: Color,
  pub accent: Color,
  pub muted: Color,
  pub border: Color,
  pub highlight_fg: Color,
  pub highlight_bg: Color,
  pub stripe_bg: Color,
  pub star: Color,
  pub star_empty: Color,
  pub status: Color,
  pub error: Color,
  pub key_fg: Color,
  pub key_bg: Color,
}

pub static THEMES: [Theme; 3] = [
  Theme {
    name: "Reel",
    bg: Color::Rgb(18, 18, 20),
    fg: Color::Rgb(228, 228, 231),
    accent: Color::Rgb(250, 204, 21),
    muted: Color::Rgb(140, 140, 150),
    border: Color::Rgb(63, 63, 70),
    highlight_fg: Color::Rgb(18, 18, 20),
    highlight_bg: Color::Rgb(250, 204, 21),
    stripe_bg: Color::Rgb(26, 26, 30),
    star: Color::Rgb(250, 204, 21),
    star_empty: Color::Rgb(82, 82, 91),
    status: Color::Rgb(125, 211, 252),
    error: Color::Rgb(248, 113, 113),
    key_fg: Color::Rgb(18, 18, 20),
    key_bg: Color::Rgb(161, 161, 170),
  },
  Theme {
    name: "Paper",
    bg: Color::Rgb(250, 249, 246),
    fg: Color::Rgb(39, 39, 42),
    accent: Color::Rgb(219, 39, 119),
    muted: Color::Rgb(113, 113, 122),
    border: Color::Rgb(212, 212, 216),
    highlight_fg: Color::Rgb(250, 249, 246),
    highlight_bg: Color::Rgb(219, 39, 119),
    stripe_bg: Color::Rgb(243, 242, 238),
    star: Color::Rgb(217, 119, 6),
    star_empty: Color::Rgb(212, 212, 216),
    status: Color::Rgb(37, 99, 235),
    error: Color::Rgb(220, 38, 38),
    key_fg: Color::Rgb(250, 249, 246),
    key_bg: Color::Rgb(82, 82, 91),
  },
  Theme {
    name: "Terminal",
    bg: Color::Reset,
    fg: Color::Reset,
    accent: Color::Cyan,
    muted: Color::DarkGray,
    border: Color::Gray,
    highlight_fg: Color::Black,
    highlight_bg: Color::Cyan,
    stripe_bg: Color::Reset,
    star: Color::Yellow,
    star_empty: Color::DarkGray,
    status: Color::Blue,
    error: Color::Red,
    key_fg: Color::Black,
    key_bg: Color::Gray,
  },
];

/// Index of the theme called `name`, falling back to the first one.
pub fn index_of(name: Option<&str>) -> usize {
  name.and_then(|n| THEMES.iter().position(|t| t.name.eq_ignore_ascii_case(n))).unwrap_or(0)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn index_of_known_and_unknown() {
    assert_eq!(index_of(Some("paper")), 1);
    assert_eq!(index_of(Some("nope")), 0);
    assert_eq!(index_of(None), 0);
  }
}
