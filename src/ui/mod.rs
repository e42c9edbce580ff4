//! Terminal User Interface module.
//!
//! # Module Structure
//!
//! - `loop_runner` - Main event loop and terminal management
//! - `input` - Keyboard input handling
//! - `events` - Background task event processing
//! - `render` - Screen layout, header and search bar
//! - `helpers` - Fetch spawning, panic capture, browser launch
//! - `articles` - Article cards, viewport and sentinel row
//! - `categories` - Category tabs
//! - `status` - Status bar widget
//! - `help` - Keybinding overlay

mod articles;
mod categories;
mod events;
mod help;
mod helpers;
mod input;
mod loop_runner;
mod render;
mod status;

// Re-export the public API
pub use articles::format_relative_time;
pub use loop_runner::{run, Action};
