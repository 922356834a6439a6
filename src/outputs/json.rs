//! JSON snapshot export of the feed and its interactions.
//!
//! # Output Structure
//!
//! ```text
//! json_output_dir/
//! └── 2025-10-09/
//!     └── feed.json
//! ```
//!
//! The snapshot holds every article with its like count and comments, plus
//! the session totals, so other tools can consume it without the state file.

use crate::models::{Aggregates, ArticleRecord, Comment, InteractionState};
use crate::error::Result;
use crate::utils::ensure_writable_dir;
use chrono::Local;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, instrument};

#[derive(Debug, Serialize)]
pub struct FeedSnapshot<'a> {
    pub exported_at: String,
    pub origin: String,
    pub display_name: &'a str,
    pub totals: Aggregates,
    pub articles: Vec<SnapshotArticle<'a>>,
}

#[derive(Debug, Serialize)]
pub struct SnapshotArticle<'a> {
    #[serde(flatten)]
    pub article: &'a ArticleRecord,
    pub likes: u64,
    pub comments: &'a [Comment],
}

impl<'a> FeedSnapshot<'a> {
    pub fn new(origin: String, articles: &'a [ArticleRecord], state: &'a InteractionState) -> Self {
        Self {
            exported_at: Local::now().to_rfc3339(),
            origin,
            display_name: &state.display_name,
            totals: state.aggregates(),
            articles: articles
                .iter()
                .map(|article| SnapshotArticle {
                    article,
                    likes: state.like_counts.get(&article.id).copied().unwrap_or(0),
                    comments: state
                        .comments_by_article
                        .get(&article.id)
                        .map(Vec::as_slice)
                        .unwrap_or(&[]),
                })
                .collect(),
        }
    }
}

/// Write `snapshot` to `{json_output_dir}/{date}/feed.json` and return the path.
#[instrument(level = "info", skip_all, fields(json_output_dir = %json_output_dir.display()))]
pub async fn write_snapshot(
    snapshot: &FeedSnapshot<'_>,
    json_output_dir: &Path,
) -> Result<PathBuf> {
    let json = serde_json::to_string_pretty(snapshot)?;

    let full_json_dir = json_output_dir.join(Local::now().date_naive().to_string());
    info!(full_json_dir = %full_json_dir.display(), "Ensuring JSON directory exists");
    ensure_writable_dir(&full_json_dir).await?;

    let output_json_filename = full_json_dir.join("feed.json");
    fs::write(&output_json_filename, json).await?;
    info!(path = %output_json_filename.display(), articles = snapshot.articles.len(), "Wrote feed snapshot");

    Ok(output_json_filename)
}
