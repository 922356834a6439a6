//! Utility functions for identifiers, share links, log previews and file system checks.
//!
//! This module provides helper functions used throughout the application:
//! - Random UUID v4 comment identifiers
//! - Share URLs for the article card
//! - String truncation for logging
//! - Timestamp formatting for comment display
//! - File system validation for output directories

use chrono::{DateTime, Local, Utc};
use std::fs as stdfs;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::error::Result;

/// Generate a random UUID v4 string for a new comment.
pub fn generate_comment_id() -> String {
    Uuid::new_v4().to_string()
}

/// Build the Twitter intent URL for sharing an article.
pub fn twitter_share_url(title: &str, url: &str) -> String {
    let text = format!("Check out this article: {title} - {url}");
    format!(
        "https://twitter.com/intent/tweet?text={}",
        urlencoding::encode(&text)
    )
}

/// Build the LinkedIn share-offsite URL for an article.
pub fn linkedin_share_url(url: &str) -> String {
    format!(
        "https://www.linkedin.com/sharing/share-offsite/?url={}",
        urlencoding::encode(url)
    )
}

/// Truncate a string for logging purposes.
///
/// Long strings are cut to `max` characters with an ellipsis and a count of
/// the dropped bytes appended.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log("a".repeat(500), 10), "aaaaaaaaaa…(+490 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        None => s.to_string(),
        Some((cut, _)) => format!("{}…(+{} bytes)", &s[..cut], s.len() - cut),
    }
}

/// Render a comment timestamp in the local timezone, e.g. `10/09/2025, 21:09`.
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.with_timezone(&Local).format("%m/%d/%Y, %H:%M").to_string()
}

/// Ensure a directory exists and is writable.
///
/// Creates the directory if needed, then writes and removes a scratch file.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or is not writable.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn ensure_writable_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path).await?;
    let scratch = path.join("..__write_check__");
    stdfs::File::create(&scratch)?;
    let _ = stdfs::remove_file(&scratch);
    info!("Output directory is writable");
    Ok(())
}
