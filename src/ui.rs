use ratatui::{
  Frame,
  layout::{Alignment, Constraint, Layout, Rect},
  style::{Modifier, Style, Stylize},
  text::{Line, Span},
  widgets::{Block, BorderType, List, ListItem, ListState, Padding, Paragraph, Wrap},
};

use crate::app::{App, Load};
use crate::catalog::{self, Catalog, SortView};
use crate::constants::constants;
use crate::format::{format_count, format_date_long, format_date_short, format_views, plural};
use crate::model::{Company, Review, Video};
use crate::rating::{self, MAX_RATING};
use crate::source::FetchError;
use crate::state::{DetailFocus, DetailState, HomeFocus, Page, ProfileState, TextField};
use crate::theme::Theme;

// --- Helpers ---

/// Compute the display width of the first `n` chars (accounting for double-width CJK).
pub fn display_width(s: &str, n: usize) -> usize {
  use unicode_width::UnicodeWidthChar;
  s.chars().take(n).map(|c| c.width().unwrap_or(0)).sum()
}

/// Truncate a string to `max_width` characters, appending "…" if truncated.
fn truncate_str(s: &str, max_width: usize) -> String {
  if s.chars().count() <= max_width {
    s.to_string()
  } else {
    let truncated: String = s.chars().take(max_width.saturating_sub(1)).collect();
    format!("{}…", truncated)
  }
}

fn panel<'a>(theme: &Theme, title: impl Into<Line<'a>>, focused: bool) -> Block<'a> {
  let color = if focused { theme.accent } else { theme.border };
  Block::bordered()
    .title(title)
    .title_style(Style::default().fg(theme.accent).add_modifier(Modifier::BOLD))
    .border_type(BorderType::Rounded)
    .border_style(Style::default().fg(color))
    .padding(Padding::horizontal(1))
}

/// One span per star, lit stars in the theme's star color.
fn star_spans(theme: &Theme, value: f32) -> Vec<Span<'static>> {
  rating::render(value, MAX_RATING)
    .into_iter()
    .map(|fill| {
      let color = if fill.is_lit() { theme.star } else { theme.star_empty };
      Span::styled(fill.glyph(), Style::default().fg(color))
    })
    .collect()
}

/// Stars followed by the numeric label, e.g. `★★★★⯪ 4.7`.
fn rating_spans(theme: &Theme, value: f32) -> Vec<Span<'static>> {
  let mut spans = star_spans(theme, value);
  if let Some(label) = rating::label(value) {
    spans.push(Span::styled(format!(" {}", label), Style::default().fg(theme.fg)));
  }
  spans
}

fn tag_preview(tags: &[String]) -> String {
  tags.iter().take(constants().tag_preview_count).map(|t| format!("#{}", t)).collect::<Vec<_>>().join(" ")
}

/// Render a text field inside a bordered box, keeping the cursor in view.
fn render_field(frame: &mut Frame, theme: &Theme, field: &mut TextField, area: Rect, title: &str, focused: bool) {
  let block = panel(theme, format!(" {} ", title), focused);
  let inner_w = area.width.saturating_sub(4) as usize;
  let cursor_col = display_width(&field.text, field.cursor);

  if cursor_col < field.scroll {
    field.scroll = cursor_col;
  } else if cursor_col >= field.scroll + inner_w {
    field.scroll = cursor_col.saturating_sub(inner_w) + 1;
  }

  let scroll = field.scroll;
  let visible: String = field
    .text
    .chars()
    .scan(0usize, |col, c| {
      let w = unicode_width::UnicodeWidthChar::width(c).unwrap_or(0);
      let start = *col;
      *col += w;
      Some((start, *col, c))
    })
    .skip_while(|(_, end, _)| *end <= scroll)
    .take_while(|(start, _, _)| *start < scroll + inner_w)
    .map(|(_, _, c)| c)
    .collect();

  let paragraph = Paragraph::new(visible).style(Style::default().fg(theme.fg)).block(block);
  frame.render_widget(paragraph, area);

  if focused {
    let cursor_x = area.x + 2 + (cursor_col - scroll) as u16;
    frame.set_cursor_position((cursor_x, area.y + 1));
  }
}

/// Centered message box used for loading and failure pages.
fn render_message(frame: &mut Frame, theme: &Theme, area: Rect, title: &str, lines: Vec<Line<'static>>) {
  let mut text = vec![Line::from("")];
  text.extend(lines);
  let paragraph =
    Paragraph::new(text).alignment(Alignment::Center).wrap(Wrap { trim: true }).block(panel(theme, title, false));
  frame.render_widget(paragraph, area);
}

fn render_failure(frame: &mut Frame, theme: &Theme, area: Rect, what: &str, err: &FetchError) {
  match err {
    FetchError::NotFound => render_message(
      frame,
      theme,
      area,
      " Not found ",
      vec![
        Line::from(Span::styled(
          format!("{} not found", what),
          Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled("It may have been removed. Press Esc to go back.", Style::default().fg(theme.muted))),
      ],
    ),
    other => render_message(
      frame,
      theme,
      area,
      " Unavailable ",
      vec![
        Line::from(Span::styled(
          format!("{} could not be loaded", what),
          Style::default().fg(theme.error).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(other.to_string(), Style::default().fg(theme.fg))),
        Line::from(""),
        Line::from(Span::styled("Press r to retry.", Style::default().fg(theme.muted))),
      ],
    ),
  }
}

fn render_loading(frame: &mut Frame, theme: &Theme, area: Rect, what: &str) {
  render_message(
    frame,
    theme,
    area,
    " Loading ",
    vec![Line::from(Span::styled(format!("Loading {}…", what), Style::default().fg(theme.muted)))],
  );
}

// --- UI Rendering ---

pub fn ui(frame: &mut Frame, app: &mut App) {
  let theme = app.theme();

  frame.render_widget(Block::default().style(Style::default().bg(theme.bg)), frame.area());

  let [header_area, search_area, main_area, status_area, footer_area] = Layout::vertical([
    Constraint::Length(1),
    Constraint::Length(3),
    Constraint::Min(3),
    Constraint::Length(1),
    Constraint::Length(1),
  ])
  .areas(frame.area());

  render_header(frame, theme, header_area);

  let search_focused = app.current_page().is_none() && app.home.focus == HomeFocus::Search;
  render_field(frame, theme, &mut app.home.search, search_area, "Search videos", search_focused);

  match app.current_page().cloned() {
    None => render_home(frame, app, main_area),
    Some(Page::Video(state)) => render_video(frame, app, &state, main_area),
    Some(Page::Company(state)) => render_company(frame, app, &state, main_area),
  }

  render_status(frame, app, status_area);
  render_footer(frame, app, footer_area);
}

fn render_header(frame: &mut Frame, theme: &Theme, area: Rect) {
  let left = Line::from(vec![
    Span::styled(" ▶ STARTUPREELS ", Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)),
    Span::styled("startup videos, reviewed", Style::default().fg(theme.muted)),
  ]);
  frame.render_widget(left, area);

  let version = format!("v{} ", env!("CARGO_PKG_VERSION"));
  let right = Line::from(Span::styled(&version, Style::default().fg(theme.muted)));
  let right_area =
    Rect { x: area.x + area.width.saturating_sub(version.len() as u16), width: version.len() as u16, ..area };
  frame.render_widget(right, right_area);
}

// --- Home ---

fn render_home(frame: &mut Frame, app: &App, area: Rect) {
  let theme = app.theme();
  let catalog = match &app.catalog {
    Load::Loading => return render_loading(frame, theme, area, "catalog"),
    Load::Failed(e) => return render_failure(frame, theme, area, "The catalog", e),
    Load::Ready(c) => c,
  };

  let [featured_area, tabs_area, list_area] =
    Layout::vertical([Constraint::Length(4), Constraint::Length(1), Constraint::Min(3)]).areas(area);

  render_featured(frame, theme, catalog, featured_area);
  let videos = app.home_list();
  render_tabs(frame, theme, app.home.tab, videos.len(), tabs_area);

  if videos.is_empty() {
    let query = app.home.query().trim();
    let msg = if query.is_empty() {
      "No videos yet.".to_string()
    } else {
      format!("No videos match \u{201c}{}\u{201d}.", query)
    };
    let paragraph = Paragraph::new(Line::from(Span::styled(msg, Style::default().fg(theme.muted))))
      .alignment(Alignment::Center)
      .block(panel(theme, format!(" {} ", app.home.tab.heading()), false));
    frame.render_widget(paragraph, list_area);
    return;
  }

  let focused = app.home.focus == HomeFocus::Feed;
  let selected = focused.then_some(app.home.selected);
  render_video_list(frame, theme, &videos, selected, list_area, format!(" {} ", app.home.tab.heading()), focused);
}

fn render_featured(frame: &mut Frame, theme: &Theme, catalog: &Catalog, area: Rect) {
  let featured = catalog::featured(&catalog.videos, constants().featured_count);
  if featured.is_empty() {
    return;
  }
  let constraints = vec![Constraint::Ratio(1, featured.len() as u32); featured.len()];
  let cells = Layout::horizontal(constraints).split(area);

  for (video, cell) in featured.iter().zip(cells.iter()) {
    let inner_w = cell.width.saturating_sub(4) as usize;
    let mut second = rating_spans(theme, video.rating);
    second.push(Span::styled(format!("  {}", truncate_str(&video.company, 20)), Style::default().fg(theme.muted)));
    let lines = vec![
      Line::from(Span::styled(
        truncate_str(&video.title, inner_w),
        Style::default().fg(theme.fg).add_modifier(Modifier::BOLD),
      )),
      Line::from(second),
    ];
    let block = panel(theme, Span::styled(" ★ Featured ", Style::default().fg(theme.star)), false);
    frame.render_widget(Paragraph::new(lines).block(block), *cell);
  }
}

fn render_tabs(frame: &mut Frame, theme: &Theme, current: SortView, count: usize, area: Rect) {
  let mut spans = vec![Span::raw(" ")];
  for (i, view) in SortView::ALL.iter().enumerate() {
    let style = if *view == current {
      Style::default().fg(theme.highlight_fg).bg(theme.highlight_bg).add_modifier(Modifier::BOLD)
    } else {
      Style::default().fg(theme.muted)
    };
    spans.push(Span::styled(format!(" {} {} ", i + 1, view.label()), style));
    spans.push(Span::raw(" "));
  }
  frame.render_widget(Line::from(spans), area);

  let badge = format!("{} ", plural(count as u64, "video", "videos"));
  let right = Line::from(Span::styled(&badge, Style::default().fg(theme.muted)));
  let right_area =
    Rect { x: area.x + area.width.saturating_sub(badge.len() as u16), width: badge.len() as u16, ..area };
  frame.render_widget(right, right_area);
}

/// Two-line list entries: title and views, then rating, company, date and tags.
fn render_video_list(
  frame: &mut Frame,
  theme: &Theme,
  videos: &[&Video],
  selected: Option<usize>,
  area: Rect,
  title: String,
  focused: bool,
) {
  // Inner width: area minus borders, padding and the highlight symbol
  let inner_w = area.width.saturating_sub(6) as usize;

  let items: Vec<ListItem> = videos
    .iter()
    .enumerate()
    .map(|(i, video)| {
      let is_selected = Some(i) == selected;
      let fg = if is_selected { theme.highlight_fg } else { theme.fg };
      let muted = if is_selected { theme.highlight_fg } else { theme.muted };
      let bg = if is_selected {
        theme.highlight_bg
      } else if i % 2 == 1 {
        theme.stripe_bg
      } else {
        theme.bg
      };

      let right = format!("{} views  {}", format_views(video.views), video.duration);
      let right_w = right.chars().count();
      let title = truncate_str(&video.title, inner_w.saturating_sub(right_w + 2));
      let gap = inner_w.saturating_sub(title.chars().count() + right_w);
      let first = Line::from(vec![
        Span::styled(title, Style::default().fg(fg).add_modifier(Modifier::BOLD)),
        Span::raw(" ".repeat(gap)),
        Span::styled(right, Style::default().fg(muted)),
      ]);

      let mut second = rating_spans(theme, video.rating);
      let mut details = format!("  {}  ·  {}", video.company, format_date_short(&video.upload_date));
      let tags = tag_preview(&video.tags);
      if !tags.is_empty() {
        details.push_str("  ·  ");
        details.push_str(&tags);
      }
      second.push(Span::styled(details, Style::default().fg(muted)));

      ListItem::new(vec![first, Line::from(second)]).bg(bg)
    })
    .collect();

  let list = List::new(items)
    .block(panel(theme, title, focused))
    .highlight_symbol("▶ ")
    .highlight_style(Style::default().fg(theme.highlight_fg).bg(theme.highlight_bg).add_modifier(Modifier::BOLD));

  let mut state = ListState::default().with_selected(selected);
  frame.render_stateful_widget(list, area, &mut state);
}

// --- Video detail ---

fn render_video(frame: &mut Frame, app: &mut App, state: &DetailState, area: Rect) {
  let theme = app.theme();
  let catalog = match &app.catalog {
    Load::Loading => return render_loading(frame, theme, area, "video"),
    Load::Failed(e) => return render_failure(frame, theme, area, "The catalog", e),
    Load::Ready(c) => c,
  };
  let Some(video) = catalog.video(&state.video) else {
    return render_failure(frame, theme, area, "Video", &FetchError::NotFound);
  };

  let [info_area, side_area] =
    Layout::horizontal([Constraint::Percentage(58), Constraint::Percentage(42)]).areas(area);
  let [reviews_area, draft_area] = Layout::vertical([Constraint::Min(5), Constraint::Length(7)]).areas(side_area);

  render_video_info(frame, theme, video, state.liked, info_area);
  let reviews = app.reviews_for(&state.video);
  render_reviews(frame, theme, &reviews, app.reviews.get(&state.video), state, reviews_area);
  render_draft(frame, app, state, draft_area);
}

fn render_video_info(frame: &mut Frame, theme: &Theme, video: &Video, liked: bool, area: Rect) {
  let muted = Style::default().fg(theme.muted);
  let mut lines = vec![
    Line::from(Span::styled(video.title.clone(), Style::default().fg(theme.fg).add_modifier(Modifier::BOLD))),
    Line::from(vec![
      Span::styled(video.company.clone(), Style::default().fg(theme.accent)),
      Span::styled("  (c to view company)", muted),
    ]),
    Line::from(""),
  ];

  let mut meta = vec![format!("{} views", format_count(video.views)), format_date_long(&video.upload_date)];
  if !video.duration.is_empty() {
    meta.push(video.duration.clone());
  }
  lines.push(Line::from(Span::styled(meta.join("  ·  "), Style::default().fg(theme.fg))));

  let mut stars = rating_spans(theme, video.rating);
  stars.push(Span::styled(format!("  ({})", plural(video.review_count as u64, "review", "reviews")), muted));
  lines.push(Line::from(stars));

  let heart = if liked {
    Span::styled("♥ Liked", Style::default().fg(theme.error).add_modifier(Modifier::BOLD))
  } else {
    Span::styled("♡ Like", muted)
  };
  lines.push(Line::from(heart));

  let extras: Vec<&str> =
    [&video.genre, &video.year, &video.age_rating].into_iter().filter_map(|v| v.as_deref()).collect();
  if !extras.is_empty() {
    lines.push(Line::from(Span::styled(extras.join("  ·  "), muted)));
  }
  if !video.tags.is_empty() {
    let tags = video.tags.iter().map(|t| format!("#{}", t)).collect::<Vec<_>>().join(" ");
    lines.push(Line::from(Span::styled(tags, Style::default().fg(theme.status))));
  }
  if let Some(description) = &video.description {
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(description.clone(), Style::default().fg(theme.fg))));
  }
  if let Some(who) = &video.submitted_by {
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(format!("Submitted by {}", who), muted)));
  }

  let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false }).block(panel(theme, " Video ", false));
  frame.render_widget(paragraph, area);
}

fn render_reviews(
  frame: &mut Frame,
  theme: &Theme,
  reviews: &[&Review],
  load: Option<&Load<Vec<Review>>>,
  state: &DetailState,
  area: Rect,
) {
  let title = match rating::average(reviews.iter().map(|r| r.rating)) {
    Some(avg) => format!(" Reviews · {:.1} avg ", avg),
    None => " Reviews ".to_string(),
  };
  let focused = state.focus == DetailFocus::Reviews;

  let lines: Vec<Line> = if reviews.is_empty() {
    let (msg, color) = match load {
      None | Some(Load::Loading) => ("Loading reviews…".to_string(), theme.muted),
      Some(Load::Ready(_)) | Some(Load::Failed(FetchError::NotFound)) => {
        ("No reviews yet. Press w to write the first one.".to_string(), theme.muted)
      }
      Some(Load::Failed(e)) => (format!("Reviews unavailable: {}. Press r to retry.", e), theme.error),
    };
    vec![Line::from(Span::styled(msg, Style::default().fg(color)))]
  } else {
    reviews
      .iter()
      .skip(state.review_offset)
      .flat_map(|review| {
        let mut head = vec![
          Span::styled(review.user.clone(), Style::default().fg(theme.fg).add_modifier(Modifier::BOLD)),
          Span::raw("  "),
        ];
        head.extend(star_spans(theme, review.rating));
        head.push(Span::styled(format!("  {}", format_date_short(&review.date)), Style::default().fg(theme.muted)));
        let mut out = vec![Line::from(head), Line::from(Span::styled(review.text.clone(), Style::default().fg(theme.fg)))];
        if review.likes > 0 {
          out.push(Line::from(Span::styled(
            format!("♥ {}", plural(review.likes as u64, "like", "likes")),
            Style::default().fg(theme.muted),
          )));
        }
        out.push(Line::from(""));
        out
      })
      .collect()
  };

  let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true }).block(panel(theme, title, focused));
  frame.render_widget(paragraph, area);
}

fn render_draft(frame: &mut Frame, app: &mut App, state: &DetailState, area: Rect) {
  let theme = app.theme();
  let focused = state.focus == DetailFocus::Draft;
  let block = panel(theme, " Write a review ", focused);
  let inner = block.inner(area);
  frame.render_widget(block, area);

  let [stars_area, body_area, hint_area] =
    Layout::vertical([Constraint::Length(1), Constraint::Length(3), Constraint::Length(1)]).areas(inner);

  let mut stars = star_spans(theme, state.draft.rating as f32);
  let picked = if state.draft.rating == 0 {
    "  press 1-5 to rate".to_string()
  } else {
    format!("  {} of {}", state.draft.rating, MAX_RATING)
  };
  stars.push(Span::styled(picked, Style::default().fg(theme.muted)));
  frame.render_widget(Line::from(stars), stars_area);

  if let Some(Page::Video(s)) = app.pages.last_mut() {
    render_field(frame, theme, &mut s.draft.body, body_area, "Your review", focused);
  }

  let hint = if state.submitting {
    Span::styled("Submitting…", Style::default().fg(theme.status))
  } else if state.draft.can_submit() {
    Span::styled("Ready to submit. Press Enter.", Style::default().fg(theme.accent))
  } else {
    Span::styled(state.draft.problem().unwrap_or_default(), Style::default().fg(theme.muted))
  };
  frame.render_widget(Line::from(hint), hint_area);
}

// --- Company profile ---

fn render_company(frame: &mut Frame, app: &App, state: &ProfileState, area: Rect) {
  let theme = app.theme();
  let company = match app.companies.get(&state.company) {
    None | Some(Load::Loading) => return render_loading(frame, theme, area, "company"),
    Some(Load::Failed(e)) => return render_failure(frame, theme, area, "Company", e),
    Some(Load::Ready(c)) => c,
  };

  let [main_area, side_area] = Layout::horizontal([Constraint::Min(40), Constraint::Length(34)]).areas(area);

  let info = company_info_lines(theme, company, state);
  let info_h = (info.len() as u16 + 4).min(main_area.height / 2).max(5);
  let [info_area, videos_area] = Layout::vertical([Constraint::Length(info_h), Constraint::Min(3)]).areas(main_area);

  let paragraph =
    Paragraph::new(info).wrap(Wrap { trim: true }).block(panel(theme, format!(" {} ", company.name), false));
  frame.render_widget(paragraph, info_area);

  let videos = app.company_videos(company);
  if videos.is_empty() {
    let paragraph =
      Paragraph::new(Line::from(Span::styled("No videos from this company yet.", Style::default().fg(theme.muted))))
        .alignment(Alignment::Center)
        .block(panel(theme, " Videos ", true));
    frame.render_widget(paragraph, videos_area);
  } else {
    let title = format!(" Videos ({}) ", videos.len());
    render_video_list(frame, theme, &videos, Some(state.selected), videos_area, title, true);
  }

  if let Some(catalog) = app.catalog.ready() {
    render_recommended(frame, theme, catalog, company, side_area);
  }
}

fn company_info_lines(theme: &Theme, company: &Company, state: &ProfileState) -> Vec<Line<'static>> {
  let muted = Style::default().fg(theme.muted);
  let mut lines = vec![
    Line::from(vec![
      Span::styled(company.vertical.to_uppercase(), Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)),
      Span::styled(format!("  ⌖ {}", company.location), muted),
    ]),
    Line::from(Span::styled(company.description.clone(), Style::default().fg(theme.fg))),
    Line::from(""),
  ];

  let button = if state.following {
    Span::styled(" ✓ FOLLOWING ", Style::default().fg(theme.key_fg).bg(theme.key_bg).add_modifier(Modifier::BOLD))
  } else {
    Span::styled(" + FOLLOW ", Style::default().fg(theme.highlight_fg).bg(theme.highlight_bg).add_modifier(Modifier::BOLD))
  };
  lines.push(Line::from(vec![
    button,
    Span::styled(
      format!("  {}", plural(state.followers(company.followers), "follower", "followers")),
      Style::default().fg(theme.fg),
    ),
  ]));

  if let Some(links) = &company.social_links {
    let entries = links.entries();
    if !entries.is_empty() {
      lines.push(Line::from(""));
    }
    for (label, url) in entries {
      lines.push(Line::from(vec![
        Span::styled(format!("{:<10}", label), muted),
        Span::styled(url.to_string(), Style::default().fg(theme.accent).add_modifier(Modifier::UNDERLINED)),
      ]));
    }
  }
  lines
}

fn render_recommended(frame: &mut Frame, theme: &Theme, catalog: &Catalog, company: &Company, area: Rect) {
  let inner_w = area.width.saturating_sub(4) as usize;
  let items: Vec<ListItem> = catalog::recommended(&catalog.companies, &company.slug, constants().recommended_count)
    .into_iter()
    .map(|c| {
      ListItem::new(vec![
        Line::from(Span::styled(
          truncate_str(&c.name, inner_w),
          Style::default().fg(theme.fg).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
          truncate_str(&format!("{} · {}", c.vertical, plural(c.followers as u64, "follower", "followers")), inner_w),
          Style::default().fg(theme.muted),
        )),
        Line::from(""),
      ])
    })
    .collect();

  frame.render_widget(List::new(items).block(panel(theme, " You might also like ", false)), area);
}

// --- Status and footer ---

fn render_status(frame: &mut Frame, app: &App, area: Rect) {
  let theme = app.theme();
  let (text, style) = if let Some(msg) = &app.status_message {
    (format!(" ⏳ {}", msg), Style::default().fg(theme.status))
  } else if let Some(err) = &app.last_error {
    (format!(" ⚠  {}", err), Style::default().fg(theme.error))
  } else if let Some(info) = &app.info_message {
    (format!(" ℹ  {}", info), Style::default().fg(theme.status))
  } else {
    (format!(" Ready · {}", app.source.label()), Style::default().fg(theme.muted))
  };
  frame.render_widget(Paragraph::new(text).style(style), area);
}

fn footer_keys(app: &App) -> Vec<(&'static str, &'static str)> {
  match app.current_page() {
    None => match app.home.focus {
      HomeFocus::Search => {
        let mut k = vec![("Tab", "Sort"), ("^t", "Theme")];
        if app.home_list().is_empty() {
          k.insert(0, ("Esc", if app.home.query().is_empty() { "Quit" } else { "Clear" }));
        } else {
          k.insert(0, ("Enter", "Browse"));
          k.push(("Esc", if app.home.query().is_empty() { "Browse" } else { "Clear" }));
        }
        k
      }
      HomeFocus::Feed => vec![
        ("Enter", "Open"),
        ("j/k", "Navigate"),
        ("1-3", "Sort"),
        ("c", "Company"),
        ("/", "Search"),
        ("q", "Quit"),
      ],
    },
    Some(Page::Video(state)) => match state.focus {
      DetailFocus::Reviews => {
        let like = if state.liked { "Unlike" } else { "Like" };
        vec![("w", "Review"), ("1-5", "Rate"), ("l", like), ("c", "Company"), ("j/k", "Scroll"), ("Esc", "Back")]
      }
      DetailFocus::Draft => vec![("Enter", "Submit"), ("↑/↓", "Stars"), ("Esc", "Done")],
    },
    Some(Page::Company(state)) => {
      let follow = if state.following { "Unfollow" } else { "Follow" };
      vec![("f", follow), ("Enter", "Open"), ("j/k", "Navigate"), ("^r", "Retry"), ("Esc", "Back")]
    }
  }
}

fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
  let theme = app.theme();
  let keys = footer_keys(app);

  let spans: Vec<Span> = keys
    .iter()
    .enumerate()
    .flat_map(|(i, (key, action))| {
      let mut s = vec![
        Span::styled(format!(" {} ", key), Style::default().fg(theme.key_fg).bg(theme.key_bg)),
        Span::styled(format!(" {} ", action), Style::default().fg(theme.muted)),
      ];
      if i < keys.len() - 1 {
        s.push(Span::raw("  "));
      }
      s
    })
    .collect();

  frame.render_widget(Line::from(spans), area);

  let theme_label = format!("{} ", theme.name);
  let right = Line::from(Span::styled(&theme_label, Style::default().fg(theme.muted)));
  let right_area =
    Rect { x: area.x + area.width.saturating_sub(theme_label.len() as u16), width: theme_label.len() as u16, ..area };
  frame.render_widget(right, right_area);
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::app::StartOptions;
  use crate::config::Config;
  use crate::model::{CompanySlug, VideoId};
  use crate::source::{ContentSource, fixtures};
  use ratatui::{Terminal, backend::TestBackend};

  fn app() -> App {
    let mut app = App::new(ContentSource::Fixture, Config::default(), StartOptions::default());
    app.catalog = Load::Ready(fixtures().catalog());
    app
  }

  fn draw(app: &mut App) -> String {
    let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
    terminal.draw(|f| ui(f, app)).unwrap();
    let buffer = terminal.backend().buffer();
    let width = buffer.area.width as usize;
    buffer
      .content()
      .chunks(width)
      .map(|row| row.iter().map(|c| c.symbol()).collect::<String>())
      .collect::<Vec<_>>()
      .join("\n")
  }

  #[test]
  fn truncate_str_appends_ellipsis() {
    assert_eq!(truncate_str("Payments", 20), "Payments");
    assert_eq!(truncate_str("Payments infrastructure", 8), "Payment…");
  }

  #[test]
  fn display_width_counts_wide_chars() {
    assert_eq!(display_width("abc", 2), 2);
    assert_eq!(display_width("日本", 2), 4);
  }

  #[test]
  fn star_spans_match_rating_model() {
    let spans = star_spans(&crate::theme::THEMES[0], 3.5);
    let glyphs: String = spans.iter().map(|s| s.content.as_ref()).collect();
    assert_eq!(glyphs, "★★★⯪☆");
  }

  #[test]
  fn home_shows_brand_tabs_and_count() {
    let mut app = app();
    let screen = draw(&mut app);
    assert!(screen.contains("STARTUPREELS"));
    assert!(screen.contains("Trending"));
    assert!(screen.contains("Top Rated"));
    assert!(screen.contains("8 videos"));
  }

  #[test]
  fn home_reports_empty_search() {
    let mut app = app();
    app.home = crate::state::HomeState::new(SortView::Trending, "zzz");
    let screen = draw(&mut app);
    assert!(screen.contains("No videos match"));
    assert!(screen.contains("0 videos"));
  }

  #[test]
  fn missing_video_renders_not_found() {
    let mut app = app();
    app.pages.push(Page::Video(DetailState::new(VideoId("999".to_string()))));
    let screen = draw(&mut app);
    assert!(screen.contains("Video not found"));
  }

  #[test]
  fn missing_company_renders_not_found() {
    let mut app = app();
    let slug = CompanySlug("slack".to_string());
    app.companies.insert(slug.clone(), Load::Failed(FetchError::NotFound));
    app.pages.push(Page::Company(ProfileState::new(slug)));
    let screen = draw(&mut app);
    assert!(screen.contains("Company not found"));
  }

  #[test]
  fn unavailable_company_offers_retry() {
    let mut app = app();
    let slug = CompanySlug("stripe".to_string());
    app.companies.insert(slug.clone(), Load::Failed(FetchError::Unavailable("timed out".to_string())));
    app.pages.push(Page::Company(ProfileState::new(slug)));
    let screen = draw(&mut app);
    assert!(screen.contains("Press r to retry"));
  }

  #[test]
  fn company_profile_shows_follow_button() {
    let mut app = app();
    let slug = CompanySlug("stripe".to_string());
    let company = fixtures().catalog().company(&slug).cloned().unwrap();
    app.companies.insert(slug.clone(), Load::Ready(company));
    app.pages.push(Page::Company(ProfileState::new(slug)));
    let screen = draw(&mut app);
    assert!(screen.contains("FOLLOW"));
    assert!(screen.contains("You might also like"));
  }

  #[test]
  fn video_page_without_reviews_invites_one() {
    let mut app = app();
    let id = VideoId("2".to_string());
    app.reviews.insert(id.clone(), Load::Failed(FetchError::NotFound));
    app.pages.push(Page::Video(DetailState::new(id)));
    let screen = draw(&mut app);
    assert!(screen.contains("No reviews yet"));
    assert!(screen.contains("Write a review"));
  }
}
