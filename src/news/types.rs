use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// ============================================================================
// Category
// ============================================================================

/// Topic filter accepted by the news endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Category {
    #[default]
    General,
    Business,
    Entertainment,
    Health,
    Science,
    Sports,
    Technology,
}

/// Error returned when a category name is not one of the seven known topics.
#[derive(Debug, Error)]
#[error(
    "Unknown category '{0}' (expected one of: general, business, entertainment, \
     health, science, sports, technology)"
)]
pub struct UnknownCategory(pub String);

impl Category {
    /// All categories in selector order.
    pub const ALL: [Category; 7] = [
        Category::General,
        Category::Business,
        Category::Entertainment,
        Category::Health,
        Category::Science,
        Category::Sports,
        Category::Technology,
    ];

    /// Query-string value sent to the endpoint.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Business => "business",
            Self::Entertainment => "entertainment",
            Self::Health => "health",
            Self::Science => "science",
            Self::Sports => "sports",
            Self::Technology => "technology",
        }
    }

    /// Human-readable name for the category tabs.
    pub fn label(self) -> &'static str {
        match self {
            Self::General => "General",
            Self::Business => "Business",
            Self::Entertainment => "Entertainment",
            Self::Health => "Health",
            Self::Science => "Science",
            Self::Sports => "Sports",
            Self::Technology => "Technology",
        }
    }

    /// Parse a category name (case-insensitive).
    pub fn from_str_name(s: &str) -> Option<Self> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|c| c.as_str() == wanted)
    }

    /// Position in [`Category::ALL`].
    pub fn index(self) -> usize {
        Self::ALL
            .iter()
            .position(|c| *c == self)
            .unwrap_or_default()
    }

    /// Category at `index`, if any.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Next category, wrapping at the end.
    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    /// Previous category, wrapping at the start.
    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_str_name(s).ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

// ============================================================================
// Article
// ============================================================================

/// A single news article as shown in the list.
///
/// Built only through the response parser, which fills optional fields with
/// `None` rather than empty strings. Articles carry no identity: two pages may
/// return the same story and both copies are kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    pub title: String,
    pub description: Option<String>,
    /// Link to the full story. Empty when the API omitted it.
    pub url: String,
    pub url_to_image: Option<String>,
    /// Publisher name (`source.name`).
    pub source: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
}

impl Article {
    /// Article with only a title, the minimum the parser accepts.
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            url: String::new(),
            url_to_image: None,
            source: None,
            published_at: None,
        }
    }

    /// Case-insensitive title match. An empty needle matches everything.
    ///
    /// `needle_lower` must already be lowercased.
    pub fn title_contains(&self, needle_lower: &str) -> bool {
        needle_lower.is_empty() || self.title.to_lowercase().contains(needle_lower)
    }
}
