//! Application event handling.
//!
//! Applies background task results (page fetches, task panics) to the app.

use crate::app::{App, AppEvent};
use crate::state::PageOutcome;

/// Handle application events from background tasks.
pub(super) fn handle_app_event(app: &mut App, event: AppEvent) {
    match event {
        AppEvent::PageLoaded {
            generation,
            category,
            page,
            result,
        } => {
            let outcome = app.view.apply_page(generation, page, result);
            tracing::debug!(category = %category, page, generation, ?outcome, "Page applied");

            match outcome {
                PageOutcome::Replaced { .. } => {
                    app.selected = 0;
                    app.list_offset = 0;
                    app.fetch_handle = None;
                }
                PageOutcome::Appended { .. } | PageOutcome::Failed => {
                    app.fetch_handle = None;
                }
                PageOutcome::Stale => {}
            }
            app.settle_sentinel(&outcome);
            app.clamp_selection();
        }
        AppEvent::TaskPanicked {
            task,
            generation,
            error,
        } => {
            tracing::error!(task, generation, error, "Background task panicked");
            app.view.abandon(generation);
            app.set_status(format!("Internal error in {} task", task));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keybindings::KeybindingRegistry;
    use crate::news::{Article, Category, FetchError, NewsClient};
    use crate::app::SENTINEL_RETRY_DELAY;
    use crate::state::ViewState;
    use crate::ui::articles::layout_viewport;
    use pretty_assertions::assert_eq;
    use url::Url;

    fn test_app() -> App {
        let endpoint = Url::parse("http://127.0.0.1:9").unwrap();
        let client = NewsClient::new(endpoint, None, 50).unwrap();
        App::new(ViewState::new(), client, KeybindingRegistry::new())
    }

    fn loaded(generation: u64, page: u32, titles: &[&str]) -> AppEvent {
        AppEvent::PageLoaded {
            generation,
            category: Category::General,
            page,
            result: Ok(titles.iter().map(|t| Article::titled(*t)).collect()),
        }
    }

    fn titles(app: &App) -> Vec<&str> {
        app.view
            .articles()
            .iter()
            .map(|a| a.title.as_str())
            .collect()
    }

    #[test]
    fn test_page_one_replaces_and_resets_selection() {
        let mut app = test_app();
        let request = app.view.mount();
        handle_app_event(&mut app, loaded(request.generation, 1, &["a", "b"]));

        assert_eq!(titles(&app), vec!["a", "b"]);
        assert!(!app.view.is_loading());
        assert_eq!(app.selected, 0);
    }

    #[test]
    fn test_later_page_appends_and_keeps_selection() {
        let mut app = test_app();
        let first = app.view.mount();
        handle_app_event(&mut app, loaded(first.generation, 1, &["a", "b"]));
        app.selected = 1;

        let next = app.view.advance_page().unwrap();
        handle_app_event(&mut app, loaded(next.generation, next.page, &["c"]));

        assert_eq!(titles(&app), vec!["a", "b", "c"]);
        assert_eq!(app.selected, 1);
    }

    #[test]
    fn test_stale_event_is_ignored() {
        let mut app = test_app();
        let old = app.view.mount();
        let current = app.select_category(Category::Sports).unwrap();

        handle_app_event(&mut app, loaded(old.generation, 1, &["stale"]));
        assert!(app.view.articles().is_empty());
        assert!(app.view.is_loading());

        handle_app_event(&mut app, loaded(current.generation, 1, &["fresh"]));
        assert_eq!(titles(&app), vec!["fresh"]);
    }

    #[test]
    fn test_failed_fetch_clears_loading_silently() {
        let mut app = test_app();
        let request = app.view.mount();
        handle_app_event(
            &mut app,
            AppEvent::PageLoaded {
                generation: request.generation,
                category: Category::General,
                page: 1,
                result: Err(FetchError::HttpStatus(500)),
            },
        );

        assert!(!app.view.is_loading());
        assert!(app.view.articles().is_empty());
        assert!(app.status_message.is_none());
    }

    #[test]
    fn test_panicked_task_clears_loading_and_reports() {
        let mut app = test_app();
        let request = app.view.mount();
        handle_app_event(
            &mut app,
            AppEvent::TaskPanicked {
                task: "page_fetch",
                generation: request.generation,
                error: "boom".to_string(),
            },
        );

        assert!(!app.view.is_loading());
        let (msg, _) = app.status_message.as_ref().unwrap();
        assert!(msg.contains("page_fetch"));
    }

    #[test]
    fn test_search_filtered_selection_clamped_after_replace() {
        let mut app = test_app();
        app.set_search_term("zzz".to_string());
        let request = app.view.mount();
        handle_app_event(&mut app, loaded(request.generation, 1, &["a", "b"]));
        assert_eq!(app.visible_count(), 0);
        assert_eq!(app.selected, 0);
    }

    /// Lay out the list the way the renderer does and record sentinel visibility.
    fn draw_list(app: &mut App, height: usize) {
        let viewport = layout_viewport(app.visible_count(), app.selected, app.list_offset, height);
        app.list_offset = viewport.offset;
        app.sentinel_visible = viewport.sentinel_visible;
    }

    fn failed(generation: u64, page: u32) -> AppEvent {
        AppEvent::PageLoaded {
            generation,
            category: Category::General,
            page,
            result: Err(FetchError::HttpStatus(502)),
        }
    }

    #[test]
    fn test_short_first_page_requests_next_page_once_loaded() {
        let mut app = test_app();
        let mount = app.view.mount();

        // Empty list while page 1 loads: sentinel on screen but fetch in flight
        draw_list(&mut app, 40);
        assert!(app.sentinel_visible);
        assert_eq!(app.poll_sentinel(), None);

        handle_app_event(&mut app, loaded(mount.generation, 1, &["a", "b", "c"]));
        draw_list(&mut app, 40);
        assert!(app.sentinel_visible);

        let next = app.poll_sentinel().expect("next page requested");
        assert_eq!(next.page, 2);
        assert!(app.view.is_loading());
    }

    #[test]
    fn test_page_that_fills_the_list_does_not_advance() {
        let mut app = test_app();
        let mount = app.view.mount();
        draw_list(&mut app, 10);
        assert_eq!(app.poll_sentinel(), None);

        handle_app_event(&mut app, loaded(mount.generation, 1, &["a", "b", "c"]));
        draw_list(&mut app, 10);
        assert!(!app.sentinel_visible);

        assert_eq!(app.poll_sentinel(), None);
        assert_eq!(app.view.query().page, 1);
        assert!(!app.view.is_loading());
    }

    #[test]
    fn test_appended_page_keeps_scrolling_while_sentinel_visible() {
        let mut app = test_app();
        let mount = app.view.mount();
        draw_list(&mut app, 40);
        app.poll_sentinel();
        handle_app_event(&mut app, loaded(mount.generation, 1, &["a"]));
        draw_list(&mut app, 40);
        let second = app.poll_sentinel().unwrap();

        // Still loading page 2: redraws must not queue anything
        draw_list(&mut app, 40);
        assert_eq!(app.poll_sentinel(), None);

        handle_app_event(&mut app, loaded(second.generation, 2, &["b"]));
        draw_list(&mut app, 40);
        assert_eq!(app.poll_sentinel().map(|r| r.page), Some(3));
    }

    #[test]
    fn test_empty_page_stops_scrolling() {
        let mut app = test_app();
        let mount = app.view.mount();
        draw_list(&mut app, 40);
        app.poll_sentinel();
        handle_app_event(&mut app, loaded(mount.generation, 1, &["a"]));
        draw_list(&mut app, 40);
        let second = app.poll_sentinel().unwrap();

        handle_app_event(&mut app, loaded(second.generation, 2, &[]));
        draw_list(&mut app, 40);
        assert!(app.sentinel_visible);
        assert_eq!(app.poll_sentinel(), None);
        assert_eq!(app.view.query().page, 2);
    }

    #[tokio::test]
    async fn test_failed_page_retries_after_delay_while_sentinel_visible() {
        tokio::time::pause();
        let mut app = test_app();
        let mount = app.view.mount();
        draw_list(&mut app, 40);
        app.poll_sentinel();
        handle_app_event(&mut app, loaded(mount.generation, 1, &["a"]));
        draw_list(&mut app, 40);
        let second = app.poll_sentinel().unwrap();

        handle_app_event(&mut app, failed(second.generation, 2));
        draw_list(&mut app, 40);
        assert_eq!(app.poll_sentinel(), None);

        tokio::time::advance(SENTINEL_RETRY_DELAY).await;
        assert!(app.rearm_sentinel_if_due());
        draw_list(&mut app, 40);
        assert_eq!(app.poll_sentinel().map(|r| r.page), Some(3));
    }

    #[test]
    fn test_stale_page_does_not_rearm_sentinel() {
        let mut app = test_app();
        let old = app.view.mount();
        app.select_category(Category::Sports).unwrap();
        draw_list(&mut app, 40);
        assert_eq!(app.poll_sentinel(), None);

        handle_app_event(&mut app, loaded(old.generation, 1, &["stale"]));
        draw_list(&mut app, 40);
        assert_eq!(app.poll_sentinel(), None);
        assert!(app.view.is_loading());
    }
}
