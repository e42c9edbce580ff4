use crate::app::App;
use crate::news::Article;
use crate::util::{single_line, strip_control_chars, truncate_to_width};
use chrono::{DateTime, Utc};
use ratatui::{
    layout::Rect,
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};

/// Rows per article card: title, meta, description, link, spacer.
pub(super) const CARD_HEIGHT: usize = 5;

/// Format timestamp as relative time
pub fn format_relative_time(timestamp: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    let Some(ts) = timestamp else {
        return String::new();
    };

    let diff = (now - ts).num_seconds();

    // Future dates (clock skew upstream)
    if diff < 0 {
        return "now".to_string();
    }
    if diff < 3600 {
        return format!("{}m ago", diff / 60);
    }
    if diff < 86400 {
        return format!("{}h ago", diff / 3600);
    }
    if diff < 604800 {
        return format!("{}d ago", diff / 86400);
    }

    ts.format("%b %d").to_string()
}

/// Which cards are on screen and whether the sentinel row made it in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct Viewport {
    pub offset: usize,
    pub cards: usize,
    pub sentinel_visible: bool,
}

/// Scroll the list so `selected` stays on screen, and report sentinel visibility.
///
/// `height` is the number of rows inside the list border. The sentinel is a
/// single row directly after the last card.
pub(super) fn layout_viewport(
    count: usize,
    selected: usize,
    offset: usize,
    height: usize,
) -> Viewport {
    let per_page = (height / CARD_HEIGHT).max(1);

    let mut offset = offset.min(count.saturating_sub(1));
    if selected < offset {
        offset = selected;
    } else if selected >= offset + per_page {
        offset = selected + 1 - per_page;
    }

    let remaining = count - offset.min(count);
    let cards = remaining.min(per_page);
    let sentinel_visible = remaining * CARD_HEIGHT < height;

    Viewport {
        offset,
        cards,
        sentinel_visible,
    }
}

fn card(
    article: &Article,
    app: &App,
    width: usize,
    selected: bool,
    now: DateTime<Utc>,
) -> ListItem<'static> {
    let title = strip_control_chars(&article.title);
    let mut meta: Vec<String> = Vec::with_capacity(3);
    if let Some(source) = &article.source {
        meta.push(strip_control_chars(source).into_owned());
    }
    let age = format_relative_time(article.published_at, now);
    if !age.is_empty() {
        meta.push(age);
    }
    let meta = meta.join(" · ");

    let description = article
        .description
        .as_deref()
        .map(|d| single_line(&strip_control_chars(d)).into_owned())
        .unwrap_or_default();

    let mut meta_line = vec![Span::styled(
        truncate_to_width(&meta, width).into_owned(),
        app.style("article_meta"),
    )];
    if article.url_to_image.is_some() {
        meta_line.push(Span::styled(" [img]", app.style("article_image")));
    }

    let lines = vec![
        Line::from(Span::styled(
            truncate_to_width(&title, width).into_owned(),
            app.style("article_title"),
        )),
        Line::from(meta_line),
        Line::from(Span::styled(
            truncate_to_width(&description, width).into_owned(),
            app.style("article_description"),
        )),
        Line::from(Span::styled(
            truncate_to_width(&strip_control_chars(&article.url), width).into_owned(),
            app.style("article_link"),
        )),
        Line::from(""),
    ];

    let item = ListItem::new(Text::from(lines));
    if selected {
        item.style(app.style("article_selected"))
    } else {
        item
    }
}

/// Render the article cards followed by the sentinel row.
///
/// Updates `app.list_offset`, `app.cards_per_page` and `app.sentinel_visible`
/// from the laid-out viewport.
pub fn render(f: &mut Frame, app: &mut App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(app.style("panel_border"))
        .title(format!(" {} ", app.view.query().category.label()));
    let inner = block.inner(area);
    let height = inner.height as usize;
    let width = inner.width.saturating_sub(1) as usize;

    let visible = app.view.visible_articles();
    let viewport = layout_viewport(visible.len(), app.selected, app.list_offset, height);
    let now = Utc::now();

    let mut items: Vec<ListItem> = visible
        .iter()
        .enumerate()
        .skip(viewport.offset)
        .take(viewport.cards)
        .map(|(i, article)| card(article, app, width, i == app.selected, now))
        .collect();

    if visible.is_empty() && !app.view.is_loading() {
        let msg = if app.view.articles().is_empty() {
            "No articles"
        } else {
            "No articles match the search"
        };
        items.push(ListItem::new(Line::from(Span::styled(
            msg,
            app.style("empty_message"),
        ))));
    }

    if viewport.sentinel_visible {
        let label = if app.view.is_loading() {
            "Loading..."
        } else {
            "- more -"
        };
        items.push(ListItem::new(Line::from(Span::styled(
            label,
            app.style("sentinel"),
        ))));
    }

    let list = List::new(items).block(block);
    f.render_widget(list, area);

    app.list_offset = viewport.offset;
    app.cards_per_page = (height / CARD_HEIGHT).max(1);
    app.sentinel_visible = viewport.sentinel_visible;
}
