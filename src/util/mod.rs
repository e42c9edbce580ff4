//! Utility functions for common operations.
//!
//! - **URL validation**: the endpoint check at startup and the safety check
//!   applied to article links before they reach the system browser
//! - **Text processing**: Unicode-aware width calculation, truncation and
//!   sanitizing of remote text before it is drawn
//!
//! # Examples
//!
//! ```
//! use headlines::util::{display_width, truncate_to_width, validate_url_for_open};
//!
//! assert!(validate_url_for_open("https://example.com/story").is_ok());
//! assert_eq!(display_width("Hello 世界"), 10);
//! assert_eq!(truncate_to_width("Long article title", 10), "Long ar...");
//! ```

mod text;
mod url_validator;

pub use text::{display_width, single_line, strip_control_chars, truncate_to_width};
pub use url_validator::{validate_endpoint, validate_url_for_open, UrlValidationError};

/// Maximum search filter length accepted from the keyboard.
pub const MAX_SEARCH_TERM_LENGTH: usize = 256;
