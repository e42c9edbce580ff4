use crate::app::App;
use crate::news::Category;
use ratatui::{
    layout::Rect,
    text::Line,
    widgets::{Block, Borders, Tabs},
    Frame,
};

/// Render the category selector as a row of tabs, numbered for direct jumps.
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 3 || area.height < 3 {
        return;
    }

    let titles: Vec<Line> = Category::ALL
        .iter()
        .enumerate()
        .map(|(i, category)| Line::from(format!("{} {}", i + 1, category.label())))
        .collect();

    let tabs = Tabs::new(titles)
        .select(app.view.query().category.index())
        .style(app.style("category_inactive"))
        .highlight_style(app.style("category_active"))
        .divider("|")
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(app.style("panel_border"))
                .title(" Category [h/l] "),
        );

    f.render_widget(tabs, area);
}
