use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};
use thiserror::Error;
use time::{OffsetDateTime, UtcDateTime, format_description::well_known::Rfc3339};

#[derive(
    Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum NewsCategory {
    #[default]
    General,
    Sports,
    Technology,
    Finance,
    Entertainment,
}

#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash, Error)]
#[error("Unknown news category: {0}")]
pub struct UnknownNewsCategoryError(String);

impl NewsCategory {
    pub const ALL: [NewsCategory; 5] = [
        NewsCategory::General,
        NewsCategory::Sports,
        NewsCategory::Technology,
        NewsCategory::Finance,
        NewsCategory::Entertainment,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            NewsCategory::General => "general",
            NewsCategory::Sports => "sports",
            NewsCategory::Technology => "technology",
            NewsCategory::Finance => "finance",
            NewsCategory::Entertainment => "entertainment",
        }
    }
}

impl Display for NewsCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NewsCategory {
    type Err = UnknownNewsCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownNewsCategoryError(s.to_owned()))
    }
}

#[derive(Clone, Eq, PartialEq, Debug, Default, Hash, Deserialize, Serialize)]
pub struct NewsFeed {
    pub category: String,
    #[serde(default)]
    pub articles: Vec<Article>,
    #[serde(default)]
    pub total_results: u64,
    #[serde(default)]
    pub last_updated: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Clone, Eq, PartialEq, Debug, Default, Hash, Deserialize, Serialize)]
pub struct Article {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub url: String,
    #[serde(default, rename = "urlToImage")]
    pub url_to_image: Option<String>,
    #[serde(default, rename = "publishedAt")]
    pub published_at: Option<String>,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub author: Option<String>,
}

impl Article {
    /// Publication time, if the feed supplied a parseable RFC 3339 timestamp.
    #[must_use]
    pub fn published(&self) -> Option<UtcDateTime> {
        let published_at = self.published_at.as_deref()?;
        OffsetDateTime::parse(published_at, &Rfc3339)
            .ok()
            .map(OffsetDateTime::to_utc)
    }
}
