//! Markdown-flavoured text rendering for the terminal.
//!
//! Each function returns a `String` so the CLI decides where it goes and tests
//! can assert on the exact text.

use crate::loader::ReportOrigin;
use crate::models::{Aggregates, ArticleRecord, Comment, FeedSummary, ReportHeader};
use crate::utils::{format_timestamp, linkedin_share_url, twitter_share_url};
use std::fmt::Write;

/// Banner shown above the feed.
pub fn feed_banner(
    origin: &ReportOrigin,
    summary: &FeedSummary,
    header: Option<&ReportHeader>,
) -> String {
    let mut md = String::new();
    writeln!(md, "# Interactive Tech News Feed\n").ok();
    writeln!(md, "Loaded {} articles from {}", summary.article_count, origin).ok();
    if let Some(generated) = header.and_then(|h| h.generated.as_deref()) {
        writeln!(md, "Report generated {generated}").ok();
    }
    writeln!(
        md,
        "Sources: {} | Average relevance: {:.1}/10\n",
        summary.source_count, summary.average_relevance
    )
    .ok();
    md
}

/// One line-block per article with its interaction counts.
pub fn feed_entry(article: &ArticleRecord, likes: u64, comments: usize) -> String {
    let mut md = String::new();
    writeln!(md, "## [{}] {}", article.sequence_number, article.title).ok();
    writeln!(
        md,
        "{} | {} | {}/10",
        article.source, article.published, article.relevance_score
    )
    .ok();
    writeln!(md, "Likes: {likes} | Comments: {comments}\n").ok();
    md
}

/// Full article card with summary and comments.
pub fn article_card(article: &ArticleRecord, likes: u64, comments: &[Comment]) -> String {
    let mut md = feed_entry(article, likes, comments.len());
    writeln!(md, "{}\n", article.summary).ok();
    writeln!(md, "Read: {}\n", article.url).ok();
    writeln!(md, "### Comments\n").ok();
    if comments.is_empty() {
        writeln!(md, "No comments yet. Be the first to comment!").ok();
    }
    for comment in comments {
        writeln!(
            md,
            "- **{}** ({}): {}",
            comment.author,
            format_timestamp(&comment.timestamp),
            comment.text
        )
        .ok();
    }
    md
}

pub fn share_links(article: &ArticleRecord) -> String {
    let mut md = String::new();
    writeln!(md, "### Share: {}\n", article.title).ok();
    writeln!(md, "- Link: {}", article.url).ok();
    writeln!(md, "- Twitter: {}", twitter_share_url(&article.title, &article.url)).ok();
    writeln!(md, "- LinkedIn: {}", linkedin_share_url(&article.url)).ok();
    md
}

pub fn activity(display_name: &str, totals: &Aggregates) -> String {
    let mut md = String::new();
    writeln!(md, "### Your Activity ({display_name})\n").ok();
    writeln!(md, "- Total Likes Given: {}", totals.total_likes).ok();
    writeln!(md, "- Total Comments: {}", totals.total_comments).ok();
    md
}
