use crate::news::types::Article;
use crate::util::strip_control_chars;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

/// Outcome of parsing one response body.
#[derive(Debug, Default)]
pub struct ParseResult {
    pub articles: Vec<Article>,
    /// Entries dropped because they had no usable title or the wrong shape.
    pub skipped: usize,
}

/// Loose wire shape of a single entry. Every field is optional here;
/// [`coerce`] decides what is required.
#[derive(Debug, Deserialize)]
struct RawArticle {
    title: Option<String>,
    description: Option<String>,
    url: Option<String>,
    #[serde(rename = "urlToImage")]
    url_to_image: Option<String>,
    source: Option<RawSource>,
    #[serde(rename = "publishedAt")]
    published_at: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawSource {
    name: Option<String>,
}

/// Parse a news response body into articles.
///
/// The body must be a JSON object whose `articles` field is an array.
/// Individual entries that fail to deserialize or lack a title are skipped
/// and counted, so one bad entry never drops a whole page.
///
/// Returns an error message when the body is not JSON or `articles` is
/// missing or not an array.
pub fn parse_articles(bytes: &[u8]) -> Result<ParseResult, String> {
    let body: Value = serde_json::from_slice(bytes).map_err(|e| e.to_string())?;

    let entries = match body.get("articles") {
        Some(Value::Array(entries)) => entries,
        Some(_) => return Err("`articles` is not an array".to_string()),
        None => return Err("response has no `articles` field".to_string()),
    };

    let mut result = ParseResult {
        articles: Vec::with_capacity(entries.len()),
        skipped: 0,
    };

    for entry in entries {
        match serde_json::from_value::<RawArticle>(entry.clone())
            .ok()
            .and_then(coerce)
        {
            Some(article) => result.articles.push(article),
            None => result.skipped += 1,
        }
    }

    Ok(result)
}

fn coerce(raw: RawArticle) -> Option<Article> {
    let title = clean(raw.title?);

    Some(Article {
        title,
        description: raw.description.map(clean).filter(|s| !s.is_empty()),
        url: raw.url.map(|u| u.trim().to_string()).unwrap_or_default(),
        url_to_image: raw
            .url_to_image
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty()),
        source: raw
            .source
            .and_then(|s| s.name)
            .map(clean)
            .filter(|s| !s.is_empty()),
        published_at: raw.published_at.as_deref().and_then(parse_timestamp),
    })
}

/// Strip terminal escapes and surrounding whitespace from API text.
fn clean(s: String) -> String {
    strip_control_chars(&s).trim().to_string()
}

fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s.trim())
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
