use crate::keybindings::KeybindingRegistry;
use crate::news::{Article, Category, FetchError, NewsClient};
use crate::state::{FetchRequest, PageOutcome, ViewState};
use crate::theme::StyleMap;
use crate::util::MAX_SEARCH_TERM_LENGTH;
use ratatui::style::Style;
use std::borrow::Cow;
use std::time::Duration;
use tokio::time::Instant;

/// How long a failed page waits before the sentinel may trigger again.
pub const SENTINEL_RETRY_DELAY: Duration = Duration::from_secs(2);

/// Events from background tasks
pub enum AppEvent {
    /// A page fetch finished, successfully or not.
    ///
    /// Fields:
    /// - `generation`: The view generation the fetch was issued under
    /// - `category`/`page`: What was requested, for logging and appending
    /// - `result`: Parsed articles or the fetch error
    PageLoaded {
        generation: u64,
        category: Category,
        page: u32,
        result: Result<Vec<Article>, FetchError>,
    },
    /// A background task panicked.
    ///
    /// Fields:
    /// - `task`: Name of the task that panicked (e.g., "page_fetch")
    /// - `generation`: The view generation the task was working for
    /// - `error`: The panic message extracted from the panic payload
    TaskPanicked {
        task: &'static str,
        generation: u64,
        error: String,
    },
}

/// Edge detector for the "load more" row at the bottom of the list.
///
/// Behaves like a visibility observer: [`observe`](Self::observe) returns
/// true only when the row goes from hidden to visible.
#[derive(Debug, Default)]
pub struct SentinelWatch {
    visible: bool,
}

impl SentinelWatch {
    /// Record this frame's visibility. Returns true on a hidden → visible edge.
    pub fn observe(&mut self, visible: bool) -> bool {
        let rising = visible && !self.visible;
        self.visible = visible;
        rising
    }

    /// Forget the last observation so the next visible frame fires again.
    pub fn reset(&mut self) {
        self.visible = false;
    }
}

// ============================================================================
// Application State
// ============================================================================

/// Central application state
pub struct App {
    /// Query, articles and fetch generations.
    pub view: ViewState,
    pub client: NewsClient,

    /// Resolved styles for the active theme, rebuilt on toggle.
    pub theme: StyleMap,
    pub keybindings: KeybindingRegistry,

    /// Index into the *visible* (filtered) articles.
    pub selected: usize,
    /// First visible card of the list viewport.
    pub list_offset: usize,
    /// Cards that fit in the list viewport, written by the renderer.
    pub cards_per_page: usize,

    pub search_mode: bool,
    pub status_message: Option<(Cow<'static, str>, Instant)>,

    /// Only redraw when state has changed
    pub needs_redraw: bool,

    pub show_help: bool,
    pub help_scroll_offset: usize,

    /// Sentinel visibility computed during the last draw.
    pub sentinel_visible: bool,
    pub sentinel: SentinelWatch,
    /// Set after a failed page; the sentinel re-arms once this passes.
    pub sentinel_retry_at: Option<Instant>,

    /// In-flight page fetch. Aborted when a newer fetch supersedes it.
    pub fetch_handle: Option<tokio::task::JoinHandle<()>>,

    /// Current frame of the loading spinner (cycles 0..SPINNER_FRAMES).
    pub spinner_frame: usize,
}

impl App {
    pub fn new(view: ViewState, client: NewsClient, keybindings: KeybindingRegistry) -> Self {
        let theme = StyleMap::from(view.query().theme);
        Self {
            view,
            client,
            theme,
            keybindings,
            selected: 0,
            list_offset: 0,
            cards_per_page: 1,
            search_mode: false,
            status_message: None,
            needs_redraw: true,
            show_help: false,
            help_scroll_offset: 0,
            sentinel_visible: false,
            sentinel: SentinelWatch::default(),
            sentinel_retry_at: None,
            fetch_handle: None,
            spinner_frame: 0,
        }
    }

    /// Resolve a semantic role name to its `Style`.
    pub fn style(&self, role: &str) -> Style {
        self.theme.resolve(role)
    }

    /// Flip light/dark and rebuild the style map.
    ///
    /// Returns the name of the new theme for status display.
    pub fn toggle_theme(&mut self) -> &'static str {
        let variant = self.view.toggle_theme();
        self.theme = StyleMap::from(variant);
        self.needs_redraw = true;
        variant.name()
    }

    /// Number of articles passing the current search filter.
    pub fn visible_count(&self) -> usize {
        self.view.visible_articles().len()
    }

    pub fn selected_article(&self) -> Option<&Article> {
        self.view.visible_articles().get(self.selected).copied()
    }

    /// Switch category. Returns the fetch to run, `None` if already active.
    pub fn select_category(&mut self, category: Category) -> Option<FetchRequest> {
        let request = self.view.select_category(category)?;
        self.reset_list();
        Some(request)
    }

    /// Refetch page 1 of the current category.
    pub fn reload(&mut self) -> FetchRequest {
        let request = self.view.reload();
        self.reset_list();
        request
    }

    /// Append a character to the search term, up to the length cap.
    ///
    /// Returns false when the cap was hit.
    pub fn push_search_char(&mut self, c: char) -> bool {
        let term = &self.view.query().search_term;
        if term.chars().count() >= MAX_SEARCH_TERM_LENGTH {
            return false;
        }
        let mut term = term.clone();
        term.push(c);
        self.set_search_term(term);
        true
    }

    pub fn pop_search_char(&mut self) {
        let mut term = self.view.query().search_term.clone();
        if term.pop().is_some() {
            self.set_search_term(term);
        }
    }

    /// Replace the search term and move the selection back to the top.
    pub fn set_search_term(&mut self, term: String) {
        self.view.set_search_term(term);
        self.selected = 0;
        self.list_offset = 0;
    }

    /// Selection and scroll back to the top after the list is replaced.
    fn reset_list(&mut self) {
        self.selected = 0;
        self.list_offset = 0;
        self.sentinel.reset();
        self.sentinel_retry_at = None;
    }

    /// Turn the last frame's sentinel visibility into a page request.
    ///
    /// Only a hidden → visible edge counts, and `advance_page` refuses while
    /// a fetch is in flight.
    pub fn poll_sentinel(&mut self) -> Option<FetchRequest> {
        if !self.sentinel.observe(self.sentinel_visible) {
            return None;
        }
        self.view.advance_page()
    }

    /// Re-arm the sentinel after a fetch for the current view settles.
    ///
    /// A page that brought articles re-arms at once, so a row still on screen
    /// asks for the next page. A failure re-arms after
    /// [`SENTINEL_RETRY_DELAY`]. An empty page is the end of the feed and
    /// leaves the watch alone until the row scrolls out and back in.
    pub fn settle_sentinel(&mut self, outcome: &PageOutcome) {
        match outcome {
            PageOutcome::Replaced { count } | PageOutcome::Appended { count } if *count > 0 => {
                self.sentinel.reset();
                self.sentinel_retry_at = None;
            }
            PageOutcome::Failed => {
                self.sentinel_retry_at = Some(Instant::now() + SENTINEL_RETRY_DELAY);
            }
            _ => {}
        }
    }

    /// Re-arm the sentinel once a pending retry delay has elapsed.
    ///
    /// Returns true if it re-armed, meaning the next frame should be drawn.
    pub fn rearm_sentinel_if_due(&mut self) -> bool {
        match self.sentinel_retry_at {
            Some(at) if Instant::now() >= at => {
                self.sentinel_retry_at = None;
                self.sentinel.reset();
                true
            }
            _ => false,
        }
    }

    /// Navigate up in the article list
    pub fn nav_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Navigate down in the article list
    pub fn nav_down(&mut self) {
        let count = self.visible_count();
        if count > 0 {
            self.selected = self.selected.saturating_add(1).min(count - 1);
        }
    }

    pub fn page_up(&mut self) {
        self.selected = self.selected.saturating_sub(self.cards_per_page.max(1));
    }

    pub fn page_down(&mut self) {
        let count = self.visible_count();
        if count > 0 {
            self.selected = self
                .selected
                .saturating_add(self.cards_per_page.max(1))
                .min(count - 1);
        }
    }

    pub fn jump_top(&mut self) {
        self.selected = 0;
    }

    pub fn jump_bottom(&mut self) {
        self.selected = self.visible_count().saturating_sub(1);
    }

    /// Keep the selection inside the visible list after it shrinks.
    pub fn clamp_selection(&mut self) {
        let count = self.visible_count();
        if self.selected >= count {
            self.selected = count.saturating_sub(1);
        }
    }

    /// Set status message (will auto-expire after 3 seconds)
    pub fn set_status(&mut self, msg: impl Into<Cow<'static, str>>) {
        self.status_message = Some((msg.into(), Instant::now()));
    }

    /// Clear status message if expired (older than 3 seconds)
    /// Returns true if a message was actually cleared
    pub fn clear_expired_status(&mut self) -> bool {
        if let Some((_, time)) = &self.status_message {
            if time.elapsed().as_secs() >= 3 {
                self.status_message = None;
                return true;
            }
        }
        false
    }

    /// Store the handle of a newly spawned fetch, aborting the one it supersedes.
    pub fn track_fetch(&mut self, handle: tokio::task::JoinHandle<()>) {
        if let Some(previous) = self.fetch_handle.replace(handle) {
            if !previous.is_finished() {
                previous.abort();
                tracing::debug!("Aborted superseded page fetch");
            }
        }
    }
}

// ============================================================================
// Resource Cleanup
// ============================================================================

/// Abort the in-flight fetch on App drop so no task outlives the event loop.
impl Drop for App {
    fn drop(&mut self) {
        if let Some(handle) = self.fetch_handle.take() {
            handle.abort();
            tracing::debug!("Aborted page fetch on App drop");
        }
    }
}
