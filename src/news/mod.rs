//! News API access.
//!
//! - [`types`] - `Article` and `Category`, the strict shapes the rest of the
//!   crate works with
//! - [`parser`] - JSON body validation and coercion into `Article`
//! - [`client`] - HTTP fetching of one page per category
//!
//! # Example
//!
//! ```ignore
//! use headlines::news::{Category, NewsClient};
//!
//! let client = NewsClient::new(endpoint, Some(Duration::from_secs(30)), 50)?;
//! let articles = client.fetch_page(Category::Science, 1).await?;
//! ```

mod client;
mod parser;
mod types;

pub use client::{page_url, FetchError, NewsClient};
pub use parser::{parse_articles, ParseResult};
pub use types::{Article, Category, UnknownCategory};
