//! Input handling for the TUI.
//!
//! Keys are resolved through the keybinding registry and dispatched to the
//! app. Search mode captures printable characters for the filter.

use crate::app::{App, AppEvent};
use crate::keybindings::{Action as KbAction, Context as KbContext};
use crate::news::Category;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyModifiers};
use tokio::sync::mpsc;

use super::helpers::{dispatch_fetch, open_selected_article};
use super::Action;

/// Main input dispatch function.
///
/// Routes input to the help overlay, search editing or the list.
pub(super) fn handle_input(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Result<Action> {
    // Help overlay captures all keys when visible
    if app.show_help {
        return Ok(handle_help_input(app, code));
    }

    if app.search_mode {
        return Ok(handle_search_input(app, code, modifiers));
    }

    handle_browse_input(app, code, modifiers, event_tx)
}

/// Handle input while the help overlay is visible.
///
/// Captures all keys: j/k/Up/Down scroll, Esc/q/? dismiss.
fn handle_help_input(app: &mut App, code: KeyCode) -> Action {
    match code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') => {
            app.show_help = false;
            app.help_scroll_offset = 0;
        }
        KeyCode::Char('j') | KeyCode::Down => {
            app.help_scroll_offset = app.help_scroll_offset.saturating_add(1);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.help_scroll_offset = app.help_scroll_offset.saturating_sub(1);
        }
        _ => {}
    }
    Action::Continue
}

/// Handle input while editing the search filter.
///
/// The filter applies live on every keystroke; no fetch is ever issued.
fn handle_search_input(app: &mut App, code: KeyCode, modifiers: KeyModifiers) -> Action {
    match app
        .keybindings
        .action_for_key(code, modifiers, KbContext::Search)
    {
        Some(KbAction::ExitSearch) => {
            app.search_mode = false;
            app.set_search_term(String::new());
            return Action::Continue;
        }
        Some(KbAction::CommitSearch) => {
            app.search_mode = false;
            return Action::Continue;
        }
        Some(KbAction::Quit) if modifiers.contains(KeyModifiers::CONTROL) => {
            return Action::Quit;
        }
        _ => {}
    }

    match code {
        KeyCode::Char(c) if !modifiers.contains(KeyModifiers::CONTROL) => {
            if !app.push_search_char(c) {
                app.set_status("Search term too long");
            }
        }
        KeyCode::Backspace => app.pop_search_char(),
        KeyCode::Down => app.nav_down(),
        KeyCode::Up => app.nav_up(),
        _ => {}
    }
    Action::Continue
}

/// Handle input on the article list.
fn handle_browse_input(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Result<Action> {
    let Some(action) = app
        .keybindings
        .action_for_key(code, modifiers, KbContext::Global)
    else {
        return Ok(Action::Continue);
    };

    match action {
        KbAction::Quit => return Ok(Action::Quit),
        KbAction::NavDown => app.nav_down(),
        KbAction::NavUp => app.nav_up(),
        KbAction::PageDown => app.page_down(),
        KbAction::PageUp => app.page_up(),
        KbAction::JumpTop => app.jump_top(),
        KbAction::JumpBottom => app.jump_bottom(),
        KbAction::NextCategory => {
            let next = app.view.query().category.next();
            switch_category(app, next, event_tx);
        }
        KbAction::PrevCategory => {
            let prev = app.view.query().category.prev();
            switch_category(app, prev, event_tx);
        }
        KbAction::SelectCategory(index) => {
            if let Some(category) = Category::from_index(index as usize) {
                switch_category(app, category, event_tx);
            }
        }
        KbAction::EnterSearch => app.search_mode = true,
        KbAction::ClearSearch | KbAction::ExitSearch => {
            if !app.view.query().search_term.is_empty() {
                app.set_search_term(String::new());
            }
        }
        KbAction::CommitSearch => {}
        KbAction::ToggleTheme => {
            let name = app.toggle_theme();
            app.set_status(format!("Theme: {}", name));
        }
        KbAction::OpenInBrowser => open_selected_article(app),
        KbAction::Reload => {
            let request = app.reload();
            app.set_status(format!("Reloading {}", request.category.label()));
            dispatch_fetch(app, Some(request), event_tx);
        }
        KbAction::ShowHelp => {
            app.show_help = true;
            app.help_scroll_offset = 0;
        }
    }

    Ok(Action::Continue)
}

fn switch_category(app: &mut App, category: Category, event_tx: &mpsc::Sender<AppEvent>) {
    let request = app.select_category(category);
    dispatch_fetch(app, request, event_tx);
}
