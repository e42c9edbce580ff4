//! Theme system for the TUI.
//!
//! Provides semantic color roles that map to ratatui `Style` values.
//! The `ThemeVariant` enum selects between Light and Dark palettes,
//! and `StyleMap` resolves role names to concrete styles.

use ratatui::style::{Color, Modifier, Style};
use std::collections::HashMap;

// ============================================================================
// Theme Variant
// ============================================================================

/// Available theme variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeVariant {
    #[default]
    Light,
    Dark,
}

impl ThemeVariant {
    /// Parse a variant name from a string (case-insensitive).
    pub fn from_str_name(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            _ => None,
        }
    }

    /// Build the `ColorPalette` for this variant.
    pub fn palette(self) -> ColorPalette {
        match self {
            Self::Light => ColorPalette::light(),
            Self::Dark => ColorPalette::dark(),
        }
    }

    /// The other variant: Light → Dark → Light.
    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    /// Human-readable name for status display.
    pub fn name(self) -> &'static str {
        match self {
            Self::Light => "Light",
            Self::Dark => "Dark",
        }
    }

    /// Label of the header toggle: names the theme a press switches to.
    pub fn toggle_label(self) -> &'static str {
        match self {
            Self::Light => "[t] Dark",
            Self::Dark => "[t] Light",
        }
    }
}

// ============================================================================
// Color Palette: semantic roles to Style
// ============================================================================

/// A complete color palette mapping every semantic UI role to a `Style`.
#[derive(Debug, Clone)]
pub struct ColorPalette {
    // -- Page --
    pub background: Style,
    pub header_title: Style,
    pub theme_toggle: Style,

    // -- Category selector --
    pub category_active: Style,
    pub category_inactive: Style,

    // -- Search bar --
    pub search_input: Style,
    pub search_placeholder: Style,

    // -- Article cards --
    pub article_title: Style,
    pub article_description: Style,
    pub article_meta: Style,
    pub article_link: Style,
    pub article_image: Style,
    pub article_selected: Style,
    pub empty_message: Style,
    pub sentinel: Style,

    // -- Chrome --
    pub status_bar: Style,
    pub panel_border: Style,
    pub panel_border_focused: Style,
    pub help_heading: Style,
}

impl ColorPalette {
    /// Light palette, the default. Dark text on a white page.
    fn light() -> Self {
        Self {
            background: Style::default().bg(Color::White).fg(Color::Black),
            header_title: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            theme_toggle: Style::default().bg(Color::DarkGray).fg(Color::White),

            category_active: Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            category_inactive: Style::default().fg(Color::DarkGray),

            search_input: Style::default().fg(Color::Black),
            search_placeholder: Style::default().fg(Color::Gray),

            article_title: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            article_description: Style::default().fg(Color::DarkGray),
            article_meta: Style::default().fg(Color::Gray),
            article_link: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::UNDERLINED),
            article_image: Style::default().fg(Color::Magenta),
            article_selected: Style::default().bg(Color::Gray),
            empty_message: Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
            sentinel: Style::default().fg(Color::Gray),

            status_bar: Style::default().bg(Color::Gray).fg(Color::Black),
            panel_border: Style::default().fg(Color::Gray),
            panel_border_focused: Style::default().fg(Color::Blue),
            help_heading: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
        }
    }

    /// Dark palette: light text on a black page.
    fn dark() -> Self {
        Self {
            background: Style::default().bg(Color::Black).fg(Color::White),
            header_title: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            theme_toggle: Style::default().bg(Color::White).fg(Color::Black),

            category_active: Style::default()
                .bg(Color::Cyan)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            category_inactive: Style::default().fg(Color::Gray),

            search_input: Style::default().fg(Color::White),
            search_placeholder: Style::default().fg(Color::DarkGray),

            article_title: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            article_description: Style::default().fg(Color::Gray),
            article_meta: Style::default().fg(Color::DarkGray),
            article_link: Style::default()
                .fg(Color::LightBlue)
                .add_modifier(Modifier::UNDERLINED),
            article_image: Style::default().fg(Color::Yellow),
            article_selected: Style::default().bg(Color::DarkGray),
            empty_message: Style::default()
                .fg(Color::Gray)
                .add_modifier(Modifier::ITALIC),
            sentinel: Style::default().fg(Color::DarkGray),

            status_bar: Style::default().bg(Color::DarkGray).fg(Color::White),
            panel_border: Style::default().fg(Color::DarkGray),
            panel_border_focused: Style::default().fg(Color::Cyan),
            help_heading: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        }
    }
}

// ============================================================================
// Style Map: string-keyed lookup
// ============================================================================

/// String-keyed style lookup used by every widget.
///
/// Swapping the map is the single switch that re-themes the whole screen.
#[derive(Debug, Clone)]
pub struct StyleMap {
    map: HashMap<&'static str, Style>,
}

/// All semantic role names, in declaration order.
const ROLE_NAMES: [&str; 19] = [
    "background",
    "header_title",
    "theme_toggle",
    "category_active",
    "category_inactive",
    "search_input",
    "search_placeholder",
    "article_title",
    "article_description",
    "article_meta",
    "article_link",
    "article_image",
    "article_selected",
    "empty_message",
    "sentinel",
    "status_bar",
    "panel_border",
    "panel_border_focused",
    "help_heading",
];

impl StyleMap {
    /// Build a `StyleMap` from a `ColorPalette`.
    pub fn from_palette(p: &ColorPalette) -> Self {
        let styles: [Style; 19] = [
            p.background,
            p.header_title,
            p.theme_toggle,
            p.category_active,
            p.category_inactive,
            p.search_input,
            p.search_placeholder,
            p.article_title,
            p.article_description,
            p.article_meta,
            p.article_link,
            p.article_image,
            p.article_selected,
            p.empty_message,
            p.sentinel,
            p.status_bar,
            p.panel_border,
            p.panel_border_focused,
            p.help_heading,
        ];

        let map = ROLE_NAMES.iter().copied().zip(styles).collect();
        Self { map }
    }

    /// Resolve a role name to its `Style`. Returns `Style::default()` for unknown roles.
    pub fn resolve(&self, role: &str) -> Style {
        self.map.get(role).copied().unwrap_or_default()
    }
}

impl From<ThemeVariant> for StyleMap {
    fn from(variant: ThemeVariant) -> Self {
        Self::from_palette(&variant.palette())
    }
}

// ============================================================================
// Tests
// ============================================================================
