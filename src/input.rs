use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::App;
use crate::model::VideoId;
use crate::state::{DetailAction, DetailFocus, EditAction, HomeAction, HomeFocus, Page, ProfileAction};

// --- Helpers ---

/// Text-editing keys shared by every input field.
fn edit_action(key: &KeyEvent) -> Option<EditAction> {
  match key.code {
    KeyCode::Char(c) => Some(EditAction::Insert(c)),
    KeyCode::Backspace => Some(EditAction::Backspace),
    KeyCode::Delete => Some(EditAction::Delete),
    KeyCode::Left => Some(EditAction::Left),
    KeyCode::Right => Some(EditAction::Right),
    KeyCode::Home => Some(EditAction::Home),
    KeyCode::End => Some(EditAction::End),
    _ => None,
  }
}

fn digit(key: &KeyEvent) -> Option<u8> {
  match key.code {
    KeyCode::Char(c) => c.to_digit(10).map(|d| d as u8),
    _ => None,
  }
}

// --- Event Handling ---

pub fn handle_key_event(app: &mut App, key: KeyEvent) {
  let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
  if ctrl && key.code == KeyCode::Char('c') {
    app.should_quit = true;
    return;
  }

  if ctrl && key.code == KeyCode::Char('t') {
    app.next_theme();
    return;
  }

  if ctrl && key.code == KeyCode::Char('r') {
    app.retry();
    return;
  }

  app.info_message = None;
  match app.current_page().cloned() {
    None => match app.home.focus {
      HomeFocus::Search => handle_search_key(app, key),
      HomeFocus::Feed => handle_feed_key(app, key),
    },
    Some(Page::Video(state)) => match state.focus {
      DetailFocus::Reviews => handle_detail_key(app, &state.video, key),
      DetailFocus::Draft => handle_draft_key(app, &state.video, state.draft.rating, key),
    },
    Some(Page::Company(state)) => handle_company_key(app, &state.company, key),
  }
}

fn handle_search_key(app: &mut App, key: KeyEvent) {
  app.clear_error();
  match key.code {
    KeyCode::Enter | KeyCode::Down => {
      if !app.home_list().is_empty() {
        app.dispatch_home(HomeAction::Focus(HomeFocus::Feed));
      }
    }
    KeyCode::Tab => app.dispatch_home(HomeAction::NextTab),
    KeyCode::BackTab => app.dispatch_home(HomeAction::PrevTab),
    KeyCode::Esc => {
      if !app.home.query().is_empty() {
        app.dispatch_home(HomeAction::Edit(EditAction::Clear));
      } else if !app.home_list().is_empty() {
        app.dispatch_home(HomeAction::Focus(HomeFocus::Feed));
      } else {
        app.should_quit = true;
      }
    }
    _ => {
      if let Some(edit) = edit_action(&key) {
        app.dispatch_home(HomeAction::Edit(edit));
      }
    }
  }
}

fn handle_feed_key(app: &mut App, key: KeyEvent) {
  let len = app.home_list().len();
  match key.code {
    KeyCode::Enter => {
      if let Some(id) = app.selected_home_video().map(|v| v.id.clone()) {
        app.open_video(id);
      }
    }
    KeyCode::Char('c') => {
      if let Some(id) = app.selected_home_video().map(|v| v.id.clone()) {
        app.open_company_of(&id);
      }
    }
    KeyCode::Down | KeyCode::Char('j') => app.dispatch_home(HomeAction::SelectNext { len }),
    KeyCode::Up | KeyCode::Char('k') => app.dispatch_home(HomeAction::SelectPrev { len }),
    KeyCode::Tab | KeyCode::Right | KeyCode::Char('l') => app.dispatch_home(HomeAction::NextTab),
    KeyCode::BackTab | KeyCode::Left | KeyCode::Char('h') => app.dispatch_home(HomeAction::PrevTab),
    KeyCode::Char('r') => app.retry(),
    KeyCode::Char('/') | KeyCode::Esc => app.dispatch_home(HomeAction::Focus(HomeFocus::Search)),
    KeyCode::Char('q') => app.should_quit = true,
    _ => {
      if let Some(d) = digit(&key)
        && let Some(tab) = d.checked_sub(1).and_then(|i| crate::catalog::SortView::ALL.get(i as usize))
      {
        app.dispatch_home(HomeAction::SelectTab(*tab));
      }
    }
  }
}

fn handle_detail_key(app: &mut App, video: &VideoId, key: KeyEvent) {
  let len = app.reviews_for(video).len();
  match key.code {
    KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('q') => app.back(),
    KeyCode::Char('l') => app.dispatch_detail(video, DetailAction::ToggleLike),
    KeyCode::Char('c') => app.open_company_of(video),
    KeyCode::Char('r') => app.retry(),
    KeyCode::Char('w') | KeyCode::Enter | KeyCode::Tab => {
      app.dispatch_detail(video, DetailAction::Focus(DetailFocus::Draft));
    }
    KeyCode::Down | KeyCode::Char('j') => app.dispatch_detail(video, DetailAction::ScrollReviews { down: true, len }),
    KeyCode::Up | KeyCode::Char('k') => app.dispatch_detail(video, DetailAction::ScrollReviews { down: false, len }),
    _ => {
      if let Some(d) = digit(&key) {
        app.dispatch_detail(video, DetailAction::PickStar(d));
      }
    }
  }
}

fn handle_draft_key(app: &mut App, video: &VideoId, rating: u8, key: KeyEvent) {
  match key.code {
    KeyCode::Enter => app.submit_review(),
    KeyCode::Esc | KeyCode::Tab => app.dispatch_detail(video, DetailAction::Focus(DetailFocus::Reviews)),
    KeyCode::Up => app.dispatch_detail(video, DetailAction::PickStar(rating.saturating_add(1))),
    KeyCode::Down => app.dispatch_detail(video, DetailAction::PickStar(rating.saturating_sub(1))),
    _ => {
      app.clear_error();
      if let Some(edit) = edit_action(&key) {
        app.dispatch_detail(video, DetailAction::Edit(edit));
      }
    }
  }
}

fn handle_company_key(app: &mut App, company: &crate::model::CompanySlug, key: KeyEvent) {
  let videos: Vec<VideoId> = match app.companies.get(company).and_then(|l| l.ready()) {
    Some(c) => app.company_videos(c).iter().map(|v| v.id.clone()).collect(),
    None => Vec::new(),
  };
  let len = videos.len();
  let selected = match app.current_page() {
    Some(Page::Company(s)) => s.selected,
    _ => 0,
  };
  match key.code {
    KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('q') => app.back(),
    KeyCode::Char('f') => {
      if app.companies.get(company).and_then(|l| l.ready()).is_some() {
        app.toggle_follow();
      }
    }
    KeyCode::Char('r') => app.retry(),
    KeyCode::Down | KeyCode::Char('j') => app.dispatch_profile(company, ProfileAction::SelectNext { len }),
    KeyCode::Up | KeyCode::Char('k') => app.dispatch_profile(company, ProfileAction::SelectPrev { len }),
    KeyCode::Enter => {
      if let Some(id) = videos.get(selected) {
        app.open_video(id.clone());
      }
    }
    _ => {}
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::app::{Load, StartOptions};
  use crate::catalog::SortView;
  use crate::config::Config;
  use crate::source::{ContentSource, fixtures};
  use ratatui::crossterm::event::{KeyEventKind, KeyEventState};

  fn key(code: KeyCode) -> KeyEvent {
    KeyEvent { code, modifiers: KeyModifiers::NONE, kind: KeyEventKind::Press, state: KeyEventState::NONE }
  }

  fn app() -> App {
    let mut app = App::new(ContentSource::Fixture, Config::default(), StartOptions::default());
    app.catalog = Load::Ready(fixtures().catalog());
    app
  }

  #[test]
  fn typing_filters_home_feed() {
    let mut app = app();
    for c in "fintech".chars() {
      handle_key_event(&mut app, key(KeyCode::Char(c)));
    }
    assert_eq!(app.home.query(), "fintech");
    assert_eq!(app.home_list().len(), 1);
  }

  #[test]
  fn esc_clears_query_then_moves_to_feed() {
    let mut app = app();
    handle_key_event(&mut app, key(KeyCode::Char('x')));
    handle_key_event(&mut app, key(KeyCode::Esc));
    assert_eq!(app.home.query(), "");
    assert_eq!(app.home.focus, HomeFocus::Search);
    handle_key_event(&mut app, key(KeyCode::Esc));
    assert_eq!(app.home.focus, HomeFocus::Feed);
    assert!(!app.should_quit);
  }

  #[test]
  fn enter_with_no_results_stays_in_search() {
    let mut app = app();
    for c in "zzz".chars() {
      handle_key_event(&mut app, key(KeyCode::Char(c)));
    }
    handle_key_event(&mut app, key(KeyCode::Enter));
    assert_eq!(app.home.focus, HomeFocus::Search);
  }

  #[test]
  fn feed_navigation_wraps() {
    let mut app = app();
    app.home.focus = HomeFocus::Feed;
    handle_key_event(&mut app, key(KeyCode::Char('k')));
    assert_eq!(app.home.selected, 7);
    handle_key_event(&mut app, key(KeyCode::Char('j')));
    assert_eq!(app.home.selected, 0);
  }

  #[test]
  fn feed_digit_selects_tab() {
    let mut app = app();
    app.home.focus = HomeFocus::Feed;
    handle_key_event(&mut app, key(KeyCode::Char('3')));
    assert_eq!(app.home.tab, SortView::TopRated);
    handle_key_event(&mut app, key(KeyCode::Char('9')));
    assert_eq!(app.home.tab, SortView::TopRated);
  }

  #[test]
  fn detail_digits_pick_stars_and_draft_takes_text() {
    let mut app = app();
    let video = VideoId("2".to_string());
    app.pages.push(Page::Video(crate::state::DetailState::new(video.clone())));
    handle_key_event(&mut app, key(KeyCode::Char('4')));
    handle_key_event(&mut app, key(KeyCode::Char('w')));
    handle_key_event(&mut app, key(KeyCode::Char('5')));
    handle_key_event(&mut app, key(KeyCode::Up));
    let Some(Page::Video(state)) = app.current_page() else { panic!("expected video page") };
    assert_eq!(state.focus, DetailFocus::Draft);
    assert_eq!(state.draft.rating, 5);
    assert_eq!(state.draft.body.text, "5");
    handle_key_event(&mut app, key(KeyCode::Esc));
    handle_key_event(&mut app, key(KeyCode::Esc));
    assert!(app.current_page().is_none());
  }

  #[test]
  fn ctrl_c_quits_from_anywhere() {
    let mut app = app();
    let ev = KeyEvent {
      code: KeyCode::Char('c'),
      modifiers: KeyModifiers::CONTROL,
      kind: KeyEventKind::Press,
      state: KeyEventState::NONE,
    };
    handle_key_event(&mut app, ev);
    assert!(app.should_quit);
  }
}
