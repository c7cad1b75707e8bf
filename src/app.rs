use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

use crate::catalog::{self, Catalog, SortView};
use crate::config::Config;
use crate::constants::constants;
use crate::model::{Company, CompanySlug, Review, Video, VideoId};
use crate::source::{ContentSource, FetchError};
use crate::state::{DetailAction, DetailState, HomeAction, HomeState, Page, ProfileAction, ProfileState};
use crate::theme::{self, THEMES};

// --- Types ---

/// Progress of a single fetch from the content source.
#[derive(Debug, Clone, PartialEq)]
pub enum Load<T> {
  Loading,
  Ready(T),
  Failed(FetchError),
}

impl<T> Load<T> {
  pub fn ready(&self) -> Option<&T> {
    match self {
      Load::Ready(v) => Some(v),
      _ => None,
    }
  }

  fn is_retryable(&self) -> bool {
    matches!(self, Load::Failed(e) if e.is_retryable())
  }
}

impl<T> From<Result<T, FetchError>> for Load<T> {
  fn from(result: Result<T, FetchError>) -> Self {
    match result {
      Ok(v) => Load::Ready(v),
      Err(e) => Load::Failed(e),
    }
  }
}

type Pending<K, T> = Vec<(K, oneshot::Receiver<Result<T, FetchError>>)>;

/// In-flight background fetches.
#[derive(Default)]
pub(crate) struct AsyncTasks {
  pub(crate) catalog_rx: Option<oneshot::Receiver<Result<Catalog, FetchError>>>,
  pub(crate) reviews_rx: Pending<VideoId, Vec<Review>>,
  pub(crate) company_rx: Pending<CompanySlug, Company>,
  pub(crate) submit_rx: Option<(VideoId, Review, oneshot::Receiver<Result<(), FetchError>>)>,
  pub(crate) follow_rx: Option<(CompanySlug, oneshot::Receiver<Result<(), FetchError>>)>,
}

/// Where the app should start, from the command line.
#[derive(Debug, Clone, Default)]
pub struct StartOptions {
  pub tab: Option<SortView>,
  pub query: Option<String>,
  pub video: Option<String>,
  pub company: Option<String>,
  /// Write preference changes back to `prefs.toml`.
  pub persist_prefs: bool,
}

pub struct App {
  pub source: ContentSource,
  pub catalog: Load<Catalog>,
  pub home: HomeState,
  /// Pages above the home feed; the last one is on screen.
  pub pages: Vec<Page>,
  pub reviews: HashMap<VideoId, Load<Vec<Review>>>,
  pub companies: HashMap<CompanySlug, Load<Company>>,
  /// Reviews accepted during this session, newest first.
  pub local_reviews: HashMap<VideoId, Vec<Review>>,
  pub theme_index: usize,
  pub last_error: Option<String>,
  pub status_message: Option<String>,
  /// Informational message, shown below status and error in priority.
  pub info_message: Option<String>,
  pub should_quit: bool,
  pub(crate) tasks: AsyncTasks,
  /// When the last error was set, for auto-dismiss.
  error_time: Option<Instant>,
  config: Config,
  persist_prefs: bool,
}

impl App {
  pub fn new(source: ContentSource, config: Config, start: StartOptions) -> Self {
    let theme_index = theme::index_of(config.theme_name.as_deref());
    let tab = start.tab.or(config.default_tab).unwrap_or_default();
    let home = HomeState::new(tab, start.query.as_deref().unwrap_or(""));

    let mut app = Self {
      source,
      catalog: Load::Loading,
      home,
      pages: Vec::new(),
      reviews: HashMap::new(),
      companies: HashMap::new(),
      local_reviews: HashMap::new(),
      theme_index,
      last_error: None,
      status_message: None,
      info_message: None,
      should_quit: false,
      tasks: AsyncTasks::default(),
      error_time: None,
      config,
      persist_prefs: start.persist_prefs,
    };

    if let Some(id) = start.video {
      app.open_video(VideoId(id));
    } else if let Some(slug) = start.company {
      app.open_company(CompanySlug(slug));
    }
    app
  }

  pub fn theme(&self) -> &'static crate::theme::Theme {
    // Safety: theme_index is bounded by modular arithmetic in next_theme()
    // and by index_of() on initialization.
    &THEMES[self.theme_index]
  }

  /// Set an error message with auto-dismiss tracking.
  pub fn set_error(&mut self, msg: String) {
    self.last_error = Some(msg);
    self.error_time = Some(Instant::now());
  }

  /// Clear the current error message and its expiry timer.
  pub fn clear_error(&mut self) {
    self.last_error = None;
    self.error_time = None;
  }

  /// Clear stale error messages.
  pub fn expire_error(&mut self) {
    if let Some(t) = self.error_time
      && t.elapsed() >= Duration::from_secs(constants().error_dismiss_secs)
    {
      self.last_error = None;
      self.error_time = None;
    }
  }

  fn save_config(&mut self) {
    self.config.theme_name = Some(self.theme().name.to_string());
    self.config.default_tab = Some(self.home.tab);
    if self.persist_prefs {
      self.config.save();
    }
  }

  pub fn next_theme(&mut self) {
    self.theme_index = (self.theme_index + 1) % THEMES.len();
    self.save_config();
  }

  // --- View state ---

  pub fn current_page(&self) -> Option<&Page> {
    self.pages.last()
  }

  pub fn dispatch_home(&mut self, action: HomeAction) {
    let tab = self.home.tab;
    self.home = std::mem::take(&mut self.home).reduce(action);
    if self.home.tab != tab {
      debug!(tab = ?self.home.tab, "home: tab changed");
      self.save_config();
    }
  }

  /// Apply `action` to the detail page of `video`, wherever it sits in the stack.
  pub fn dispatch_detail(&mut self, video: &VideoId, action: DetailAction) {
    for page in self.pages.iter_mut().rev() {
      if let Page::Video(state) = page
        && &state.video == video
      {
        *state = state.clone().reduce(action);
        return;
      }
    }
  }

  /// Settle the submission on the page that sent it, if that page is still open.
  /// A page for the same video opened afterwards keeps its own draft.
  fn finish_submit(&mut self, video: &VideoId, action: DetailAction) {
    for page in self.pages.iter_mut().rev() {
      if let Page::Video(state) = page
        && &state.video == video
        && state.submitting
      {
        *state = state.clone().reduce(action);
        return;
      }
    }
  }

  pub fn dispatch_profile(&mut self, company: &CompanySlug, action: ProfileAction) {
    for page in self.pages.iter_mut().rev() {
      if let Page::Company(state) = page
        && &state.company == company
      {
        *state = state.clone().reduce(action);
        return;
      }
    }
  }

  /// The home feed as currently shown: the selected tab's ordering narrowed by the query.
  pub fn home_list(&self) -> Vec<&Video> {
    match self.catalog.ready() {
      Some(c) => catalog::browse(&c.videos, self.home.tab, self.home.query()),
      None => Vec::new(),
    }
  }

  pub fn selected_home_video(&self) -> Option<&Video> {
    self.home_list().get(self.home.selected).copied()
  }

  /// Reviews for a video: this session's first, then the service's.
  pub fn reviews_for(&self, video: &VideoId) -> Vec<&Review> {
    let local = self.local_reviews.get(video).into_iter().flatten();
    let fetched = self.reviews.get(video).and_then(Load::ready).into_iter().flatten();
    local.chain(fetched).collect()
  }

  /// Videos listed on a company profile.
  pub fn company_videos(&self, company: &Company) -> Vec<&Video> {
    self.catalog.ready().map(|c| c.videos_of(company)).unwrap_or_default()
  }

  // --- Navigation ---

  pub fn open_video(&mut self, id: VideoId) {
    info!(video = %id, "open video");
    self.clear_error();
    let needs_fetch = !matches!(self.reviews.get(&id), Some(Load::Ready(_)) | Some(Load::Loading));
    self.pages.push(Page::Video(DetailState::new(id.clone())));
    if needs_fetch {
      self.trigger_reviews(id);
    }
  }

  pub fn open_company(&mut self, slug: CompanySlug) {
    info!(company = %slug, "open company");
    self.clear_error();
    let needs_fetch = !matches!(self.companies.get(&slug), Some(Load::Ready(_)) | Some(Load::Loading));
    self.pages.push(Page::Company(ProfileState::new(slug.clone())));
    if needs_fetch {
      self.trigger_company(slug);
    }
  }

  /// Open the company behind a video.
  pub fn open_company_of(&mut self, video: &VideoId) {
    let slug = match self.catalog.ready() {
      Some(c) => c.video(video).map(|v| c.company_slug_of(v)),
      None => None,
    };
    if let Some(slug) = slug {
      self.open_company(slug);
    }
  }

  pub fn back(&mut self) {
    self.pages.pop();
    self.clear_error();
  }

  // --- Background work ---

  pub fn trigger_catalog(&mut self) {
    info!(source = %self.source.label(), "loading catalog");
    self.catalog = Load::Loading;
    self.status_message = Some("Loading catalog…".to_string());
    let source = self.source.clone();
    let (tx, rx) = oneshot::channel();
    tokio::spawn(async move {
      let _ = tx.send(source.catalog().await);
    });
    self.tasks.catalog_rx = Some(rx);
  }

  fn trigger_reviews(&mut self, id: VideoId) {
    self.reviews.insert(id.clone(), Load::Loading);
    let source = self.source.clone();
    let key = id.clone();
    let (tx, rx) = oneshot::channel();
    tokio::spawn(async move {
      let _ = tx.send(source.reviews(&key).await);
    });
    self.tasks.reviews_rx.push((id, rx));
  }

  fn trigger_company(&mut self, slug: CompanySlug) {
    self.companies.insert(slug.clone(), Load::Loading);
    let source = self.source.clone();
    let key = slug.clone();
    let (tx, rx) = oneshot::channel();
    tokio::spawn(async move {
      let _ = tx.send(source.company(&key).await);
    });
    self.tasks.company_rx.push((slug, rx));
  }

  /// Retry whatever failed with a retryable error on the current page.
  pub fn retry(&mut self) {
    if self.catalog.is_retryable() {
      self.trigger_catalog();
    }
    match self.pages.last() {
      Some(Page::Video(state)) => {
        let id = state.video.clone();
        if self.reviews.get(&id).is_some_and(Load::is_retryable) {
          info!(video = %id, "retrying reviews");
          self.trigger_reviews(id);
        }
      }
      Some(Page::Company(state)) => {
        let slug = state.company.clone();
        if self.companies.get(&slug).is_some_and(Load::is_retryable) {
          info!(company = %slug, "retrying company");
          self.trigger_company(slug);
        }
      }
      None => {}
    }
  }

  /// Submit the draft on the current video page.
  pub fn submit_review(&mut self) {
    let Some(Page::Video(state)) = self.pages.last() else { return };
    if state.submitting || self.tasks.submit_rx.is_some() {
      self.info_message = Some("Still saving the last change…".to_string());
      return;
    }
    if let Some(problem) = state.draft.problem() {
      self.set_error(problem.to_string());
      return;
    }
    let video = state.video.clone();
    let rating = state.draft.rating as f32;
    let text = state.draft.body.text.trim().to_string();
    let count = self.local_reviews.get(&video).map_or(0, Vec::len);
    let review = Review {
      id: format!("local-{}-{}", video, count + 1),
      user: constants().local_reviewer.clone(),
      avatar: String::new(),
      rating,
      text: text.clone(),
      date: chrono::Local::now().date_naive().format("%Y-%m-%d").to_string(),
      likes: 0,
    };

    info!(video = %video, rating, "submitting review");
    self.clear_error();
    self.status_message = Some("Submitting review…".to_string());
    self.dispatch_detail(&video, DetailAction::SubmitStarted);

    let source = self.source.clone();
    let key = video.clone();
    let (tx, rx) = oneshot::channel();
    tokio::spawn(async move {
      let _ = tx.send(source.submit_review(&key, rating, &text).await);
    });
    self.tasks.submit_rx = Some((video, review, rx));
  }

  /// Optimistically toggle following the company on the current page.
  pub fn toggle_follow(&mut self) {
    let Some(Page::Company(state)) = self.pages.last() else { return };
    if self.tasks.follow_rx.is_some() {
      self.info_message = Some("Still saving the last change…".to_string());
      return;
    }
    let slug = state.company.clone();
    let follow = !state.following;
    self.dispatch_profile(&slug, ProfileAction::ToggleFollow);
    info!(company = %slug, follow, "follow toggled");

    let source = self.source.clone();
    let key = slug.clone();
    let (tx, rx) = oneshot::channel();
    tokio::spawn(async move {
      let _ = tx.send(source.set_following(&key, follow).await);
    });
    self.tasks.follow_rx = Some((slug, rx));
  }

  pub fn check_pending(&mut self) {
    if let Some(mut rx) = self.tasks.catalog_rx.take() {
      match rx.try_recv() {
        Ok(result) => {
          self.status_message = None;
          match &result {
            Ok(c) => info!(videos = c.videos.len(), companies = c.companies.len(), "catalog loaded"),
            Err(e) => warn!(err = %e, "catalog load failed"),
          }
          self.catalog = result.into();
        }
        Err(oneshot::error::TryRecvError::Empty) => {
          self.tasks.catalog_rx = Some(rx);
        }
        Err(oneshot::error::TryRecvError::Closed) => {
          self.status_message = None;
          self.catalog = Load::Failed(FetchError::Unavailable("catalog task failed".to_string()));
        }
      }
    }

    for (id, result) in drain_ready(&mut self.tasks.reviews_rx) {
      if let Err(e) = &result {
        warn!(video = %id, err = %e, "reviews load failed");
      }
      self.reviews.insert(id, result.into());
    }

    for (slug, result) in drain_ready(&mut self.tasks.company_rx) {
      if let Err(e) = &result {
        warn!(company = %slug, err = %e, "company load failed");
      }
      self.companies.insert(slug, result.into());
    }

    if let Some((video, review, mut rx)) = self.tasks.submit_rx.take() {
      match rx.try_recv() {
        Ok(Ok(())) => {
          self.status_message = None;
          info!(video = %video, "review accepted");
          self.finish_submit(&video, DetailAction::SubmitAccepted);
          self.local_reviews.entry(video).or_default().insert(0, review);
          self.info_message = Some("Review submitted.".to_string());
        }
        Ok(Err(e)) => {
          self.status_message = None;
          warn!(video = %video, err = %e, "review rejected");
          self.finish_submit(&video, DetailAction::SubmitFailed);
          self.set_error(format!("Review not submitted: {}", e));
        }
        Err(oneshot::error::TryRecvError::Empty) => {
          self.tasks.submit_rx = Some((video, review, rx));
        }
        Err(oneshot::error::TryRecvError::Closed) => {
          self.status_message = None;
          self.finish_submit(&video, DetailAction::SubmitFailed);
          self.set_error("Review task failed.".to_string());
        }
      }
    }

    if let Some((slug, mut rx)) = self.tasks.follow_rx.take() {
      match rx.try_recv() {
        Ok(Ok(())) => {}
        Ok(Err(e)) => {
          warn!(company = %slug, err = %e, "follow failed, reverting");
          self.dispatch_profile(&slug, ProfileAction::RevertFollow);
          self.set_error(format!("Could not update follow: {}", e));
        }
        Err(oneshot::error::TryRecvError::Empty) => {
          self.tasks.follow_rx = Some((slug, rx));
        }
        Err(oneshot::error::TryRecvError::Closed) => {
          self.dispatch_profile(&slug, ProfileAction::RevertFollow);
          self.set_error("Follow task failed.".to_string());
        }
      }
    }
  }
}

/// Remove and return every finished receiver in `pending`. A receiver whose
/// task died counts as unavailable.
fn drain_ready<K, T>(pending: &mut Pending<K, T>) -> Vec<(K, Result<T, FetchError>)> {
  let mut done = Vec::new();
  let mut waiting = Vec::with_capacity(pending.len());
  for (key, mut rx) in pending.drain(..) {
    match rx.try_recv() {
      Ok(result) => done.push((key, result)),
      Err(oneshot::error::TryRecvError::Empty) => waiting.push((key, rx)),
      Err(oneshot::error::TryRecvError::Closed) => {
        done.push((key, Err(FetchError::Unavailable("task failed".to_string()))));
      }
    }
  }
  *pending = waiting;
  done
}
