//! Terminal news reader: category tabs, live title search, light/dark theme
//! and infinite scroll over a paginated news API.

pub mod app;
pub mod config;
pub mod keybindings;
pub mod news;
pub mod state;
pub mod theme;
pub mod ui;
pub mod util;
