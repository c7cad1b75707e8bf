//! View state for each page, with transitions expressed as pure reducers.
//!
//! Key handling translates key presses into actions; rendering reads the
//! resulting state. Neither side mutates state directly.

use crate::catalog::SortView;
use crate::model::{CompanySlug, VideoId};
use crate::rating::{self, MAX_RATING};

// --- Text field ---

/// Convert a char index to a byte offset within the string.
pub fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
  s.char_indices().nth(char_idx).map_or(s.len(), |(i, _)| i)
}

/// Single-line text with a char-indexed cursor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextField {
  pub text: String,
  /// Cursor position (char index).
  pub cursor: usize,
  /// Horizontal scroll offset in display columns, maintained by the renderer.
  pub scroll: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditAction {
  Insert(char),
  Backspace,
  Delete,
  Left,
  Right,
  Home,
  End,
  Clear,
}

impl TextField {
  pub fn with_text(text: &str) -> Self {
    Self { text: text.to_string(), cursor: text.chars().count(), scroll: 0 }
  }

  pub fn is_blank(&self) -> bool {
    self.text.trim().is_empty()
  }

  pub fn reduce(mut self, action: EditAction) -> Self {
    let len = self.text.chars().count();
    match action {
      EditAction::Insert(c) => {
        let byte_idx = char_to_byte_index(&self.text, self.cursor);
        self.text.insert(byte_idx, c);
        self.cursor += 1;
      }
      EditAction::Backspace => {
        if self.cursor > 0 {
          self.cursor -= 1;
          let byte_idx = char_to_byte_index(&self.text, self.cursor);
          self.text.remove(byte_idx);
        }
      }
      EditAction::Delete => {
        if self.cursor < len {
          let byte_idx = char_to_byte_index(&self.text, self.cursor);
          self.text.remove(byte_idx);
        }
      }
      EditAction::Left => self.cursor = self.cursor.saturating_sub(1),
      EditAction::Right => self.cursor = (self.cursor + 1).min(len),
      EditAction::Home => self.cursor = 0,
      EditAction::End => self.cursor = len,
      EditAction::Clear => self = Self::default(),
    }
    self
  }
}

/// Wrapping list selection over `len` items.
fn step(selected: usize, len: usize, forward: bool) -> usize {
  if len == 0 {
    0
  } else if forward {
    (selected + 1) % len
  } else if selected == 0 {
    len - 1
  } else {
    (selected - 1).min(len - 1)
  }
}

// --- Home feed ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HomeFocus {
  /// Typing into the header search bar.
  #[default]
  Search,
  /// Moving through the video list.
  Feed,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HomeState {
  pub search: TextField,
  pub tab: SortView,
  pub selected: usize,
  pub focus: HomeFocus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HomeAction {
  Edit(EditAction),
  NextTab,
  PrevTab,
  SelectTab(SortView),
  /// Move the selection; `len` is the length of the visible list.
  SelectNext { len: usize },
  SelectPrev { len: usize },
  Focus(HomeFocus),
}

impl HomeState {
  pub fn new(tab: SortView, query: &str) -> Self {
    Self { search: TextField::with_text(query), tab, ..Self::default() }
  }

  pub fn query(&self) -> &str {
    &self.search.text
  }

  pub fn reduce(mut self, action: HomeAction) -> Self {
    match action {
      HomeAction::Edit(edit) => {
        let before = self.search.text.clone();
        self.search = self.search.reduce(edit);
        if self.search.text != before {
          self.selected = 0;
        }
      }
      HomeAction::NextTab => {
        self.tab = self.tab.next();
        self.selected = 0;
      }
      HomeAction::PrevTab => {
        self.tab = self.tab.prev();
        self.selected = 0;
      }
      HomeAction::SelectTab(tab) => {
        if tab != self.tab {
          self.tab = tab;
          self.selected = 0;
        }
      }
      HomeAction::SelectNext { len } => self.selected = step(self.selected, len, true),
      HomeAction::SelectPrev { len } => self.selected = step(self.selected, len, false),
      HomeAction::Focus(focus) => self.focus = focus,
    }
    self
  }
}

// --- Video detail ---

/// Review being written on the detail page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewDraft {
  /// Whole-star selection; 0 means nothing picked yet.
  pub rating: u8,
  pub body: TextField,
}

impl ReviewDraft {
  /// Why the draft cannot be submitted yet, if anything.
  pub fn problem(&self) -> Option<&'static str> {
    if self.rating == 0 {
      Some("Pick a rating before submitting.")
    } else if self.body.is_blank() {
      Some("Write a few words before submitting.")
    } else {
      None
    }
  }

  pub fn can_submit(&self) -> bool {
    self.problem().is_none()
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DetailFocus {
  #[default]
  Reviews,
  Draft,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailState {
  pub video: VideoId,
  pub liked: bool,
  pub draft: ReviewDraft,
  pub focus: DetailFocus,
  /// Index of the first review shown.
  pub review_offset: usize,
  /// A submission is in flight; further submits are ignored.
  pub submitting: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailAction {
  ToggleLike,
  /// Interactive star pick; positions outside the scale are ignored.
  PickStar(u8),
  Edit(EditAction),
  Focus(DetailFocus),
  ScrollReviews { down: bool, len: usize },
  SubmitStarted,
  /// The service accepted the review: reset the draft.
  SubmitAccepted,
  /// The service refused it: keep the draft so it can be retried.
  SubmitFailed,
}

impl DetailState {
  pub fn new(video: VideoId) -> Self {
    Self {
      video,
      liked: false,
      draft: ReviewDraft::default(),
      focus: DetailFocus::default(),
      review_offset: 0,
      submitting: false,
    }
  }

  pub fn reduce(mut self, action: DetailAction) -> Self {
    match action {
      DetailAction::ToggleLike => self.liked = !self.liked,
      DetailAction::PickStar(position) => {
        if let Some(value) = rating::pick(position, MAX_RATING) {
          self.draft.rating = value;
        }
      }
      DetailAction::Edit(edit) => self.draft.body = self.draft.body.reduce(edit),
      DetailAction::Focus(focus) => self.focus = focus,
      DetailAction::ScrollReviews { down, len } => {
        self.review_offset =
          if down { (self.review_offset + 1).min(len.saturating_sub(1)) } else { self.review_offset.saturating_sub(1) };
      }
      DetailAction::SubmitStarted => self.submitting = true,
      DetailAction::SubmitAccepted => {
        self.submitting = false;
        self.draft = ReviewDraft::default();
        self.review_offset = 0;
      }
      DetailAction::SubmitFailed => self.submitting = false,
    }
    self
  }
}

// --- Company profile ---

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileState {
  pub company: CompanySlug,
  pub following: bool,
  /// Local adjustment applied on top of the service's follower count.
  pub follower_delta: i64,
  pub selected: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileAction {
  /// Optimistic follow/unfollow.
  ToggleFollow,
  /// The service refused the last toggle: undo it.
  RevertFollow,
  SelectNext { len: usize },
  SelectPrev { len: usize },
}

impl ProfileState {
  pub fn new(company: CompanySlug) -> Self {
    Self { company, following: false, follower_delta: 0, selected: 0 }
  }

  pub fn followers(&self, base: u32) -> u64 {
    (base as i64 + self.follower_delta).max(0) as u64
  }

  pub fn reduce(mut self, action: ProfileAction) -> Self {
    match action {
      ProfileAction::ToggleFollow | ProfileAction::RevertFollow => {
        self.follower_delta += if self.following { -1 } else { 1 };
        self.following = !self.following;
      }
      ProfileAction::SelectNext { len } => self.selected = step(self.selected, len, true),
      ProfileAction::SelectPrev { len } => self.selected = step(self.selected, len, false),
    }
    self
  }
}

// --- Navigation ---

/// A page above the home feed. The home feed itself is always underneath.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Page {
  Video(DetailState),
  Company(ProfileState),
}

#[cfg(test)]
mod tests {
  use super::*;

  fn type_text(field: TextField, s: &str) -> TextField {
    s.chars().fold(field, |f, c| f.reduce(EditAction::Insert(c)))
  }

  // --- char_to_byte_index ---

  #[test]
  fn char_to_byte_ascii() {
    assert_eq!(char_to_byte_index("hello", 0), 0);
    assert_eq!(char_to_byte_index("hello", 3), 3);
    assert_eq!(char_to_byte_index("hello", 5), 5); // past end
  }

  #[test]
  fn char_to_byte_multibyte() {
    let s = "aé日"; // a=1 byte, é=2 bytes, 日=3 bytes
    assert_eq!(char_to_byte_index(s, 0), 0);
    assert_eq!(char_to_byte_index(s, 1), 1);
    assert_eq!(char_to_byte_index(s, 2), 3);
    assert_eq!(char_to_byte_index(s, 3), 6);
  }

  #[test]
  fn char_to_byte_empty() {
    assert_eq!(char_to_byte_index("", 0), 0);
    assert_eq!(char_to_byte_index("", 5), 0);
  }

  // --- TextField ---

  #[test]
  fn text_field_insert_and_backspace() {
    let f = type_text(TextField::default(), "ai");
    assert_eq!(f.text, "ai");
    assert_eq!(f.cursor, 2);
    let f = f.reduce(EditAction::Backspace);
    assert_eq!(f.text, "a");
    assert_eq!(f.cursor, 1);
  }

  #[test]
  fn text_field_edits_in_middle_of_multibyte() {
    let f = TextField::with_text("日本").reduce(EditAction::Left).reduce(EditAction::Insert('x'));
    assert_eq!(f.text, "日x本");
    let f = f.reduce(EditAction::Delete);
    assert_eq!(f.text, "日x");
  }

  #[test]
  fn text_field_cursor_bounds() {
    let f = TextField::with_text("ab").reduce(EditAction::Right).reduce(EditAction::Right);
    assert_eq!(f.cursor, 2);
    let f = f.reduce(EditAction::Home).reduce(EditAction::Left).reduce(EditAction::Backspace);
    assert_eq!(f.cursor, 0);
    assert_eq!(f.text, "ab");
    assert_eq!(f.reduce(EditAction::End).cursor, 2);
  }

  #[test]
  fn text_field_clear() {
    let f = TextField::with_text("stripe").reduce(EditAction::Clear);
    assert_eq!(f, TextField::default());
  }

  // --- HomeState ---

  #[test]
  fn typing_resets_selection() {
    let s = HomeState::default().reduce(HomeAction::SelectNext { len: 8 }).reduce(HomeAction::SelectNext { len: 8 });
    assert_eq!(s.selected, 2);
    let s = s.reduce(HomeAction::Edit(EditAction::Insert('a')));
    assert_eq!(s.query(), "a");
    assert_eq!(s.selected, 0);
  }

  #[test]
  fn cursor_moves_keep_selection() {
    let s = HomeState::new(SortView::Trending, "ai").reduce(HomeAction::SelectNext { len: 4 });
    let s = s.reduce(HomeAction::Edit(EditAction::Left));
    assert_eq!(s.selected, 1);
  }

  #[test]
  fn tabs_cycle_and_reset_selection() {
    let s = HomeState::default().reduce(HomeAction::SelectNext { len: 8 });
    let s = s.reduce(HomeAction::NextTab);
    assert_eq!(s.tab, SortView::Recent);
    assert_eq!(s.selected, 0);
    let s = s.reduce(HomeAction::PrevTab).reduce(HomeAction::PrevTab);
    assert_eq!(s.tab, SortView::TopRated);
  }

  #[test]
  fn selecting_same_tab_keeps_selection() {
    let s = HomeState::default().reduce(HomeAction::SelectNext { len: 8 });
    let s = s.reduce(HomeAction::SelectTab(SortView::Trending));
    assert_eq!(s.selected, 1);
  }

  #[test]
  fn selection_wraps() {
    let s = HomeState::default().reduce(HomeAction::SelectPrev { len: 3 });
    assert_eq!(s.selected, 2);
    let s = s.reduce(HomeAction::SelectNext { len: 3 });
    assert_eq!(s.selected, 0);
    let s = s.reduce(HomeAction::SelectNext { len: 0 });
    assert_eq!(s.selected, 0);
  }

  #[test]
  fn selection_clamps_when_list_shrinks() {
    let s = HomeState { selected: 7, ..HomeState::default() };
    assert_eq!(s.reduce(HomeAction::SelectPrev { len: 2 }).selected, 1);
  }

  // --- DetailState ---

  fn detail() -> DetailState {
    DetailState::new(VideoId("1".to_string()))
  }

  #[test]
  fn like_toggles() {
    let s = detail().reduce(DetailAction::ToggleLike);
    assert!(s.liked);
    assert!(!s.reduce(DetailAction::ToggleLike).liked);
  }

  #[test]
  fn star_pick_is_whole_and_in_range() {
    let s = detail().reduce(DetailAction::PickStar(4));
    assert_eq!(s.draft.rating, 4);
    let s = s.reduce(DetailAction::PickStar(9)).reduce(DetailAction::PickStar(0));
    assert_eq!(s.draft.rating, 4);
  }

  #[test]
  fn draft_needs_rating_and_text() {
    let s = detail();
    assert!(!s.draft.can_submit());
    let s = s.reduce(DetailAction::PickStar(5));
    assert_eq!(s.draft.problem(), Some("Write a few words before submitting."));
    let s = s.reduce(DetailAction::Edit(EditAction::Insert(' ')));
    assert!(!s.draft.can_submit());
    let s = s.reduce(DetailAction::Edit(EditAction::Insert('!')));
    assert!(s.draft.can_submit());
  }

  #[test]
  fn accepted_submission_resets_draft() {
    let s = detail()
      .reduce(DetailAction::PickStar(3))
      .reduce(DetailAction::Edit(EditAction::Insert('k')))
      .reduce(DetailAction::SubmitStarted);
    assert!(s.submitting);
    let s = s.reduce(DetailAction::SubmitAccepted);
    assert!(!s.submitting);
    assert_eq!(s.draft, ReviewDraft::default());
  }

  #[test]
  fn failed_submission_keeps_draft() {
    let s = detail()
      .reduce(DetailAction::PickStar(2))
      .reduce(DetailAction::Edit(EditAction::Insert('x')))
      .reduce(DetailAction::SubmitStarted)
      .reduce(DetailAction::SubmitFailed);
    assert!(!s.submitting);
    assert_eq!(s.draft.rating, 2);
    assert_eq!(s.draft.body.text, "x");
  }

  #[test]
  fn review_scroll_bounded() {
    let s = detail().reduce(DetailAction::ScrollReviews { down: true, len: 2 });
    assert_eq!(s.review_offset, 1);
    let s = s.reduce(DetailAction::ScrollReviews { down: true, len: 2 });
    assert_eq!(s.review_offset, 1);
    let s = s.reduce(DetailAction::ScrollReviews { down: false, len: 2 }).reduce(DetailAction::ScrollReviews {
      down: false,
      len: 2,
    });
    assert_eq!(s.review_offset, 0);
  }

  // --- ProfileState ---

  #[test]
  fn follow_toggle_adjusts_count() {
    let s = ProfileState::new(CompanySlug("stripe".to_string())).reduce(ProfileAction::ToggleFollow);
    assert!(s.following);
    assert_eq!(s.followers(1247), 1248);
    let s = s.reduce(ProfileAction::ToggleFollow);
    assert!(!s.following);
    assert_eq!(s.followers(1247), 1247);
  }

  #[test]
  fn revert_undoes_optimistic_follow() {
    let s = ProfileState::new(CompanySlug("figma".to_string()))
      .reduce(ProfileAction::ToggleFollow)
      .reduce(ProfileAction::RevertFollow);
    assert!(!s.following);
    assert_eq!(s.follower_delta, 0);
  }

  #[test]
  fn followers_never_negative() {
    let s = ProfileState { following: true, follower_delta: -5, ..ProfileState::new(CompanySlug("x".to_string())) };
    assert_eq!(s.followers(2), 0);
  }
}
