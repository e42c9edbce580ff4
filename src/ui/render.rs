//! Render functions for the TUI.
//!
//! Lays out the single news view top to bottom: header, category tabs,
//! search bar, article cards, status bar. The help overlay draws on top.

use crate::app::App;
use crate::util::truncate_to_width;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::{articles, categories, help, status};

/// Minimum terminal dimensions required for normal operation.
pub(super) const MIN_WIDTH: u16 = 60;
pub(super) const MIN_HEIGHT: u16 = 16;

/// Main render dispatch function.
pub(super) fn render(f: &mut Frame, app: &mut App) {
    let area = f.area();

    // Guard against zero-width/height to prevent panics
    if area.width < 1 || area.height < 1 {
        return;
    }

    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        let msg = if area.height < 3 || area.width < 20 {
            Paragraph::new("Too small")
        } else {
            Paragraph::new(format!(
                "Terminal too small\n\nMinimum: {}x{}\nCurrent: {}x{}",
                MIN_WIDTH, MIN_HEIGHT, area.width, area.height
            ))
            .alignment(Alignment::Center)
        };
        f.render_widget(msg, area);
        // Nothing on screen, so the sentinel cannot be in view
        app.sentinel_visible = false;
        return;
    }

    f.render_widget(Block::default().style(app.style("background")), area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    render_header(f, app, chunks[0]);
    categories::render(f, app, chunks[1]);
    render_search_bar(f, app, chunks[2]);
    articles::render(f, app, chunks[3]);
    status::render(f, app, chunks[4]);

    if app.show_help {
        help::render(f, app);
    }
}

/// Title on the left, theme toggle label on the right.
fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let label = format!(" {} ", app.view.query().theme.toggle_label());
    let label_width = label.chars().count() as u16;

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(label_width)])
        .split(area);

    let title = Paragraph::new(Line::from(Span::styled(
        " Headlines",
        app.style("header_title"),
    )));
    f.render_widget(title, cols[0]);

    let toggle = Paragraph::new(Line::from(Span::styled(label, app.style("theme_toggle"))));
    f.render_widget(toggle, cols[1]);
}

/// Search input. Shows a placeholder when empty and a cursor while editing.
fn render_search_bar(f: &mut Frame, app: &App, area: Rect) {
    let term = app.view.query().search_term.as_str();
    let width = area.width.saturating_sub(4) as usize;

    let line = if term.is_empty() && !app.search_mode {
        Line::from(Span::styled(
            "Search headlines... (/)",
            app.style("search_placeholder"),
        ))
    } else {
        let cursor = if app.search_mode { "_" } else { "" };
        // Keep the tail visible while typing past the box width
        let shown = if term.chars().count() + 1 > width {
            let skip = term.chars().count() + 1 - width;
            term.chars().skip(skip).collect::<String>()
        } else {
            term.to_string()
        };
        Line::from(Span::styled(
            format!("{}{}", truncate_to_width(&shown, width), cursor),
            app.style("search_input"),
        ))
    };

    let border = if app.search_mode {
        app.style("panel_border_focused")
    } else {
        app.style("panel_border")
    };

    let paragraph = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border)
            .title(" Search "),
    );
    f.render_widget(paragraph, area);
}
