use crate::app::App;
use ratatui::{layout::Rect, widgets::Paragraph, Frame};
use std::borrow::Cow;

/// Braille spinner, one frame per tick while a fetch is in flight.
pub(super) const SPINNER: [&str; 10] = [
    "⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏",
];

/// Render the status bar
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    // Guard against zero-width/height areas
    if area.width < 1 || area.height < 1 {
        return;
    }

    let query = app.view.query();
    let spinner = if query.is_loading {
        SPINNER[app.spinner_frame % SPINNER.len()]
    } else {
        " "
    };

    let counts = format!(
        "{} page {} | {}/{} ",
        spinner,
        query.page,
        app.visible_count(),
        app.view.articles().len()
    );

    // Cow avoids allocating for the static hint strings
    let text: Cow<'_, str> = if let Some((msg, _)) = &app.status_message {
        Cow::Borrowed(msg.as_ref())
    } else if app.search_mode {
        Cow::Borrowed("Type to filter | ESC clear | ENTER keep")
    } else {
        Cow::Borrowed("[h/l]category [/]search [t]heme [o]pen [r]eload [?]help [q]uit")
    };

    let paragraph = Paragraph::new(format!("{}| {}", counts, text)).style(app.style("status_bar"));
    f.render_widget(paragraph, area);
}
