//! Data models for parsed articles and the interaction state kept on them.
//!
//! This module defines the core data structures used throughout the application:
//! - [`ArticleRecord`]: One article as parsed from the delimited report
//! - [`Comment`]: A user comment attached to an article
//! - [`InteractionState`]: Likes, comments and display name for the session
//! - [`Aggregates`]: Totals derived from the interaction state
//! - [`ReportHeader`] and [`FeedSummary`]: Report-level metadata for the feed banner

use chrono::{DateTime, Utc};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Display name used until the user picks one.
pub const DEFAULT_DISPLAY_NAME: &str = "Anonymous User";

/// Relevance score assumed when the report has none for an article.
pub const DEFAULT_RELEVANCE_SCORE: u8 = 5;

/// An article parsed from the delimited text report.
///
/// Records are only ever produced by [`crate::parser::parse`], which
/// guarantees that `title`, `source` and `url` are non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ArticleRecord {
    /// Stable identifier, `article_<n>`.
    pub id: String,
    /// The report's ordinal for the article, or its position in the output.
    pub sequence_number: u32,
    pub title: String,
    /// Name of the outlet, e.g. "TechCrunch".
    pub source: String,
    /// Publication date as free-form text, `"Unknown"` when missing.
    pub published: String,
    pub url: String,
    /// Summary paragraph, `"No summary available"` when missing.
    pub summary: String,
    /// Upstream relevance rating in `0..=10`.
    pub relevance_score: u8,
}

/// A comment left on an article.
///
/// Comments are append-only: once created by the store they are never edited.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Comment {
    /// Random UUID-v4 shaped identifier.
    pub id: String,
    /// Display name of the commenter at the time of posting.
    pub author: String,
    /// Non-empty, trimmed comment body.
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

/// Per-article likes and comments plus the user's display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InteractionState {
    pub like_counts: BTreeMap<String, u64>,
    pub comments_by_article: BTreeMap<String, Vec<Comment>>,
    pub display_name: String,
}

impl Default for InteractionState {
    fn default() -> Self {
        Self {
            like_counts: BTreeMap::new(),
            comments_by_article: BTreeMap::new(),
            display_name: DEFAULT_DISPLAY_NAME.to_string(),
        }
    }
}

impl InteractionState {
    /// Sum likes and comments over every article.
    ///
    /// The like total saturates at `u64::MAX` instead of overflowing.
    pub fn aggregates(&self) -> Aggregates {
        Aggregates {
            total_likes: self
                .like_counts
                .values()
                .fold(0u64, |total, &n| total.saturating_add(n)),
            total_comments: self.comments_by_article.values().map(Vec::len).sum(),
        }
    }
}

/// Session-wide totals shown next to the feed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Aggregates {
    pub total_likes: u64,
    pub total_comments: usize,
}

/// Metadata from the banner at the top of a report.
///
/// Every field is optional because producers are free to omit the banner.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ReportHeader {
    /// Generation time as written by the producer, e.g. `2025-10-09 21:09:52`.
    pub generated: Option<String>,
    pub total_articles: Option<u32>,
    pub total_sources: Option<u32>,
    pub average_relevance: Option<f32>,
}

/// Statistics computed from the articles that actually parsed.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FeedSummary {
    pub article_count: usize,
    pub source_count: usize,
    pub average_relevance: f32,
}

impl FeedSummary {
    pub fn from_articles(articles: &[ArticleRecord]) -> Self {
        if articles.is_empty() {
            return Self::default();
        }
        let total: u32 = articles.iter().map(|a| u32::from(a.relevance_score)).sum();
        Self {
            article_count: articles.len(),
            source_count: articles.iter().map(|a| a.source.as_str()).unique().count(),
            average_relevance: total as f32 / articles.len() as f32,
        }
    }
}

/// Sort articles by relevance, highest first, keeping report order among ties.
pub fn sort_by_relevance(articles: &mut [ArticleRecord]) {
    articles.sort_by(|a, b| b.relevance_score.cmp(&a.relevance_score));
}
