//! View state for the news list.
//!
//! `ViewState` is the single owner of everything the reader shows: the query
//! (category, search term, page, loading flag, theme) and the accumulated
//! articles. Every user action or network outcome is a method call that
//! mutates it in place and, when the action needs data, returns a
//! [`FetchRequest`] for the caller to execute. No method performs I/O.
//!
//! # Fetch generations
//!
//! Each issued request carries a generation number. Only the most recently
//! issued generation may change state when its result arrives; anything
//! older is reported as [`PageOutcome::Stale`] and dropped. This keeps a slow
//! response for a previous category from overwriting the current one.

use crate::news::{Article, Category, FetchError};
use crate::theme::ThemeVariant;
use std::sync::Arc;

/// Query parameters and flags of the current view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryState {
    pub category: Category,
    pub search_term: String,
    /// 1-based page of the most recently requested fetch.
    pub page: u32,
    pub is_loading: bool,
    pub theme: ThemeVariant,
}

impl Default for QueryState {
    fn default() -> Self {
        Self {
            category: Category::General,
            search_term: String::new(),
            page: 1,
            is_loading: false,
            theme: ThemeVariant::Light,
        }
    }
}

/// A fetch the caller must perform and report back via [`ViewState::apply_page`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchRequest {
    pub category: Category,
    pub page: u32,
    pub generation: u64,
}

/// What [`ViewState::apply_page`] did with a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageOutcome {
    /// Page 1 arrived and replaced the collection.
    Replaced { count: usize },
    /// A later page arrived and was appended.
    Appended { count: usize },
    /// The fetch failed; treated as zero new articles.
    Failed,
    /// Result belonged to a superseded request and was ignored.
    Stale,
}

/// Filter `articles` to those whose title contains `term`, ignoring case.
///
/// Order is preserved. An empty term returns every article.
pub fn filter_articles<'a>(articles: &'a [Article], term: &str) -> Vec<&'a Article> {
    let needle = term.to_lowercase();
    articles
        .iter()
        .filter(|a| a.title_contains(&needle))
        .collect()
}

/// Owner of the query and the article collection.
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    query: QueryState,
    /// Arc so the renderer and `--once` printer can hold a snapshot cheaply.
    articles: Arc<Vec<Article>>,
    generation: u64,
}

impl ViewState {
    /// State at mount: defaults from `QueryState::default()`.
    pub fn new() -> Self {
        Self::default()
    }

    /// State at mount with a chosen starting category, theme and search term.
    pub fn with_query(category: Category, theme: ThemeVariant, search_term: String) -> Self {
        Self {
            query: QueryState {
                category,
                theme,
                search_term,
                ..QueryState::default()
            },
            ..Self::default()
        }
    }

    pub fn query(&self) -> &QueryState {
        &self.query
    }

    pub fn articles(&self) -> &Arc<Vec<Article>> {
        &self.articles
    }

    pub fn is_loading(&self) -> bool {
        self.query.is_loading
    }

    /// Generation of the most recently issued fetch (0 before the first).
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Initial page-1 fetch for the starting category.
    pub fn mount(&mut self) -> FetchRequest {
        self.query.page = 1;
        self.begin_fetch()
    }

    /// Switch category: page back to 1, collection cleared, fresh fetch.
    ///
    /// Returns `None` when `category` is already active.
    pub fn select_category(&mut self, category: Category) -> Option<FetchRequest> {
        if category == self.query.category {
            return None;
        }

        tracing::debug!(from = %self.query.category, to = %category, "Category changed");
        self.query.category = category;
        Some(self.restart())
    }

    /// Refetch page 1 of the current category, replacing the collection.
    pub fn reload(&mut self) -> FetchRequest {
        self.restart()
    }

    /// Load the next page. No-op while a fetch is outstanding.
    pub fn advance_page(&mut self) -> Option<FetchRequest> {
        if self.query.is_loading {
            tracing::trace!(page = self.query.page, "Page advance ignored while loading");
            return None;
        }

        self.query.page = self.query.page.saturating_add(1);
        Some(self.begin_fetch())
    }

    /// Replace the search term. Never triggers a fetch.
    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.query.search_term = term.into();
    }

    /// Flip light/dark and return the new variant.
    pub fn toggle_theme(&mut self) -> ThemeVariant {
        self.query.theme = self.query.theme.toggled();
        self.query.theme
    }

    /// Articles whose title matches the search term, in collection order.
    pub fn visible_articles(&self) -> Vec<&Article> {
        filter_articles(&self.articles, &self.query.search_term)
    }

    /// Apply the result of a fetch issued by this state.
    ///
    /// Results for any generation but the latest are ignored, including their
    /// effect on the loading flag. For the latest generation the loading flag
    /// is always cleared, whatever the result.
    pub fn apply_page(
        &mut self,
        generation: u64,
        page: u32,
        result: Result<Vec<Article>, FetchError>,
    ) -> PageOutcome {
        if generation != self.generation {
            tracing::debug!(
                generation,
                current = self.generation,
                page,
                "Discarding stale news page"
            );
            return PageOutcome::Stale;
        }

        self.query.is_loading = false;

        let articles = match result {
            Ok(articles) => articles,
            Err(e) => {
                tracing::warn!(
                    category = %self.query.category,
                    page,
                    error = %e,
                    "Failed to fetch news page"
                );
                return PageOutcome::Failed;
            }
        };

        let count = articles.len();
        if page <= 1 {
            self.articles = Arc::new(articles);
            PageOutcome::Replaced { count }
        } else {
            Arc::make_mut(&mut self.articles).extend(articles);
            PageOutcome::Appended { count }
        }
    }

    /// A fetch task ended without producing a result (it panicked).
    ///
    /// Clears the loading flag when `generation` is still current.
    pub fn abandon(&mut self, generation: u64) {
        if generation == self.generation {
            self.query.is_loading = false;
        }
    }

    fn restart(&mut self) -> FetchRequest {
        self.query.page = 1;
        self.articles = Arc::new(Vec::new());
        self.begin_fetch()
    }

    fn begin_fetch(&mut self) -> FetchRequest {
        self.generation = self.generation.wrapping_add(1);
        self.query.is_loading = true;
        FetchRequest {
            category: self.query.category,
            page: self.query.page,
            generation: self.generation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn titles(articles: &[&Article]) -> Vec<String> {
        articles.iter().map(|a| a.title.clone()).collect()
    }

    fn page_of(names: &[&str]) -> Vec<Article> {
        names.iter().map(|n| Article::titled(*n)).collect()
    }

    fn loaded(names: &[&str]) -> ViewState {
        let mut state = ViewState::new();
        let req = state.mount();
        state.apply_page(req.generation, req.page, Ok(page_of(names)));
        state
    }

    #[test]
    fn defaults_at_mount() {
        let state = ViewState::new();
        let q = state.query();
        assert_eq!(q.category, Category::General);
        assert_eq!(q.page, 1);
        assert_eq!(q.theme, ThemeVariant::Light);
        assert_eq!(q.search_term, "");
        assert!(!q.is_loading);
        assert!(state.articles().is_empty());
    }

    #[test]
    fn mount_requests_first_page_and_sets_loading() {
        let mut state = ViewState::new();
        let req = state.mount();
        assert_eq!(req.category, Category::General);
        assert_eq!(req.page, 1);
        assert_eq!(req.generation, 1);
        assert!(state.is_loading());
    }

    #[test]
    fn search_scenario_a_b() {
        let mut state = loaded(&["A", "B"]);
        assert_eq!(titles(&state.visible_articles()), vec!["A", "B"]);

        state.set_search_term("b");
        assert_eq!(titles(&state.visible_articles()), vec!["B"]);
    }

    #[test]
    fn search_with_no_match_is_empty() {
        let mut state = loaded(&["A", "B"]);
        state.set_search_term("zzz");
        assert!(state.visible_articles().is_empty());
    }

    #[test]
    fn search_does_not_fetch_or_touch_loading() {
        let mut state = loaded(&["A"]);
        let generation = state.generation();
        state.set_search_term("a");
        assert_eq!(state.generation(), generation);
        assert!(!state.is_loading());
    }

    #[test]
    fn category_change_resets_page_and_clears_before_response() {
        let mut state = loaded(&["g1", "g2"]);
        for page in 2..=3 {
            let name = format!("g{page}");
            let req = state.advance_page().unwrap();
            state.apply_page(req.generation, req.page, Ok(page_of(&[name.as_str()])));
        }
        assert_eq!(state.query().page, 3);
        assert_eq!(state.articles().len(), 4);

        let req = state.select_category(Category::Sports).unwrap();
        assert_eq!(req.category, Category::Sports);
        assert_eq!(req.page, 1);
        assert_eq!(state.query().page, 1);
        assert!(state.articles().is_empty());
        assert!(state.is_loading());

        let outcome = state.apply_page(req.generation, req.page, Ok(page_of(&["s1"])));
        assert_eq!(outcome, PageOutcome::Replaced { count: 1 });
        assert_eq!(titles(&state.visible_articles()), vec!["s1"]);
    }

    #[test]
    fn selecting_active_category_is_noop() {
        let mut state = loaded(&["A"]);
        assert_eq!(state.select_category(Category::General), None);
        assert_eq!(state.articles().len(), 1);
    }

    #[test]
    fn page_advance_appends_in_order() {
        let mut state = loaded(&["A", "B"]);
        let req = state.advance_page().unwrap();
        assert_eq!(req.page, 2);
        assert_eq!(req.category, Category::General);

        let outcome = state.apply_page(req.generation, req.page, Ok(page_of(&["C", "A"])));
        assert_eq!(outcome, PageOutcome::Appended { count: 2 });
        // Duplicates across pages are kept.
        assert_eq!(titles(&state.visible_articles()), vec!["A", "B", "C", "A"]);
    }

    #[test]
    fn page_advance_while_loading_is_noop() {
        let mut state = ViewState::new();
        state.mount();
        assert!(state.is_loading());
        assert_eq!(state.advance_page(), None);
        assert_eq!(state.query().page, 1);
    }

    #[test]
    fn failure_clears_loading_and_keeps_collection() {
        let mut state = loaded(&["A"]);
        let req = state.advance_page().unwrap();
        let outcome = state.apply_page(
            req.generation,
            req.page,
            Err(FetchError::HttpStatus(500)),
        );
        assert_eq!(outcome, PageOutcome::Failed);
        assert!(!state.is_loading());
        assert_eq!(state.articles().len(), 1);
        // The page counter stays advanced; the next trigger asks for page 3.
        assert_eq!(state.advance_page().unwrap().page, 3);
    }

    #[test]
    fn failed_first_page_leaves_empty_collection() {
        let mut state = ViewState::new();
        let req = state.mount();
        state.apply_page(
            req.generation,
            req.page,
            Err(FetchError::Malformed("no articles".into())),
        );
        assert!(!state.is_loading());
        assert!(state.visible_articles().is_empty());
    }

    #[test]
    fn stale_response_is_dropped() {
        let mut state = ViewState::new();
        let general = state.mount();
        let sports = state.select_category(Category::Sports).unwrap();

        let outcome = state.apply_page(general.generation, general.page, Ok(page_of(&["old"])));
        assert_eq!(outcome, PageOutcome::Stale);
        assert!(state.articles().is_empty());
        assert!(state.is_loading(), "newer fetch is still outstanding");

        state.apply_page(sports.generation, sports.page, Ok(page_of(&["new"])));
        assert_eq!(titles(&state.visible_articles()), vec!["new"]);
        assert!(!state.is_loading());
    }

    #[test]
    fn repeated_first_page_fetch_last_issued_wins() {
        let mut state = ViewState::new();
        let first = state.mount();
        let second = state.reload();

        state.apply_page(second.generation, second.page, Ok(page_of(&["X", "Y"])));
        state.apply_page(first.generation, first.page, Ok(page_of(&["stale"])));

        assert_eq!(titles(&state.visible_articles()), vec!["X", "Y"]);
    }

    #[test]
    fn reload_replaces_collection() {
        let mut state = loaded(&["A"]);
        let req = state.advance_page().unwrap();
        state.apply_page(req.generation, req.page, Ok(page_of(&["B"])));

        let req = state.reload();
        assert_eq!(req.page, 1);
        assert!(state.articles().is_empty());
        state.apply_page(req.generation, req.page, Ok(page_of(&["fresh"])));
        assert_eq!(titles(&state.visible_articles()), vec!["fresh"]);
    }

    #[test]
    fn abandon_clears_loading_only_for_current_generation() {
        let mut state = ViewState::new();
        let first = state.mount();
        let second = state.reload();

        state.abandon(first.generation);
        assert!(state.is_loading());

        state.abandon(second.generation);
        assert!(!state.is_loading());
    }

    #[test]
    fn toggle_theme_flips_and_returns_new_variant() {
        let mut state = ViewState::new();
        assert_eq!(state.toggle_theme(), ThemeVariant::Dark);
        assert_eq!(state.query().theme, ThemeVariant::Dark);
        assert_eq!(state.toggle_theme(), ThemeVariant::Light);
    }

    #[test]
    fn with_query_sets_starting_values() {
        let mut state =
            ViewState::with_query(Category::Science, ThemeVariant::Dark, "mars".to_string());
        assert_eq!(state.query().theme, ThemeVariant::Dark);
        assert_eq!(state.query().search_term, "mars");
        assert_eq!(state.mount().category, Category::Science);
    }

    #[test]
    fn filter_articles_preserves_order() {
        let articles = page_of(&["Alpha", "beta", "ALPHABET", "gamma"]);
        let visible = filter_articles(&articles, "alpha");
        assert_eq!(titles(&visible), vec!["Alpha", "ALPHABET"]);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn visible_list_is_matching_subsequence(
                names in proptest::collection::vec("[a-zA-Z ]{0,12}", 0..20),
                term in "[a-zA-Z]{0,3}",
            ) {
                let articles: Vec<Article> = names.iter().map(Article::titled).collect();
                let visible = filter_articles(&articles, &term);

                let expected: Vec<&Article> = articles
                    .iter()
                    .filter(|a| a.title.to_lowercase().contains(&term.to_lowercase()))
                    .collect();
                prop_assert_eq!(visible, expected);
            }

            #[test]
            fn loading_tracks_outstanding_fetch(fail in any::<bool>(), advance in 0u32..4) {
                let mut state = ViewState::new();
                let mut req = state.mount();
                prop_assert!(state.is_loading());
                for _ in 0..advance {
                    state.apply_page(req.generation, req.page, Ok(Vec::new()));
                    prop_assert!(!state.is_loading());
                    req = state.advance_page().unwrap();
                    prop_assert!(state.is_loading());
                }
                let result = if fail { Err(FetchError::Timeout) } else { Ok(Vec::new()) };
                state.apply_page(req.generation, req.page, result);
                prop_assert!(!state.is_loading());
            }
        }
    }
}
