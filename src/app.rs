//! Terminal presentation layer.
//!
//! [`App`] ties a parsed report to an [`InteractionStore`] and turns each
//! [`Command`] into text for stdout. It is the only caller of the store's
//! mutators, mirroring the buttons of an article card: like, comment, share,
//! plus the sidebar's display name, totals and refresh.

use crate::cli::{Command, SessionLine, SortOrder};
use crate::error::{Error, Result};
use crate::loader::{LoadedReport, ReportOrigin};
use crate::models::{ArticleRecord, FeedSummary, ReportHeader, sort_by_relevance};
use crate::outputs::{json, markdown};
use crate::parser::{parse, parse_report_header};
use crate::persistence::Persistence;
use crate::store::InteractionStore;
use clap::Parser;
use itertools::Itertools;
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{info, instrument};

pub struct App<P> {
    articles: Vec<ArticleRecord>,
    origin: ReportOrigin,
    header: Option<ReportHeader>,
    store: InteractionStore<P>,
}

impl<P: Persistence> App<P> {
    /// Parse `report` and pair it with `store`.
    pub fn new(report: LoadedReport, store: InteractionStore<P>) -> Self {
        let articles = parse(&report.content);
        let header = parse_report_header(&report.content);
        if let Some(expected) = header.as_ref().and_then(|h| h.total_articles) {
            if expected as usize != articles.len() {
                info!(expected, parsed = articles.len(), "Report banner disagrees with parsed article count");
            }
        }
        info!(origin = %report.origin, count = articles.len(), "Feed ready");
        Self {
            articles,
            origin: report.origin,
            header,
            store,
        }
    }

    pub fn articles(&self) -> &[ArticleRecord] {
        &self.articles
    }

    #[cfg(test)]
    pub fn store(&self) -> &InteractionStore<P> {
        &self.store
    }

    /// Run one command and return what should be printed.
    #[instrument(level = "debug", skip(self))]
    pub async fn execute(&mut self, command: &Command) -> Result<String> {
        match command {
            Command::Feed { sort, min_score } => Ok(self.render_feed(*sort, *min_score)),
            Command::Show { id } => {
                let article = resolve(&self.articles, id)?;
                Ok(markdown::article_card(
                    article,
                    self.store.likes_for(&article.id),
                    self.store.comments_for(&article.id),
                ))
            }
            Command::Like { id } => {
                let article = resolve(&self.articles, id)?;
                let count = self.store.like(&article.id)?;
                Ok(format!("Liked \"{}\" ({count} likes)\n", article.title))
            }
            Command::Comment { id, text } => {
                let article = resolve(&self.articles, id)?;
                let author = self.store.display_name().to_string();
                let text = text.iter().join(" ");
                Ok(match self.store.add_comment(&article.id, &text, &author)? {
                    Some(comment) => format!("{} commented on \"{}\"\n", comment.author, article.title),
                    None => "Comment is empty; nothing posted\n".to_string(),
                })
            }
            Command::Name { name } => {
                let name = name.iter().join(" ");
                self.store.set_display_name(&name)?;
                Ok(format!("Display name set to {name}\n"))
            }
            Command::Stats => Ok(self.render_activity()),
            Command::Refresh => {
                self.store.refresh();
                Ok(self.render_activity())
            }
            Command::Share { id } => Ok(markdown::share_links(resolve(&self.articles, id)?)),
            Command::Export { json_output_dir } => {
                let snapshot = json::FeedSnapshot::new(
                    self.origin.to_string(),
                    &self.articles,
                    self.store.state(),
                );
                let path = json::write_snapshot(&snapshot, json_output_dir).await?;
                Ok(format!("Wrote {}\n", path.display()))
            }
            Command::Session => Ok("Already in a session\n".to_string()),
        }
    }

    /// Read commands line by line until EOF or `quit`.
    ///
    /// Bad lines and failing commands are reported on `out` and the loop
    /// carries on.
    #[instrument(level = "info", skip_all)]
    pub async fn run_session<R, W>(&mut self, input: R, out: &mut W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        writeln!(out, "Type a command (feed, show, like, comment, name, stats, refresh, share, export) or quit")?;
        let mut lines = input.lines();
        while let Some(line) = lines.next_line().await? {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if matches!(line, "quit" | "exit") {
                break;
            }
            match SessionLine::try_parse_from(line.split_whitespace()) {
                Ok(parsed) => match self.execute(&parsed.command).await {
                    Ok(output) => write!(out, "{output}")?,
                    Err(e) => writeln!(out, "error: {e}")?,
                },
                Err(e) => write!(out, "{}", e.render())?,
            }
            out.flush()?;
        }
        info!("Session ended");
        Ok(())
    }

    fn render_feed(&self, sort: SortOrder, min_score: Option<u8>) -> String {
        let mut shown: Vec<ArticleRecord> = self
            .articles
            .iter()
            .filter(|a| min_score.is_none_or(|min| a.relevance_score >= min))
            .cloned()
            .collect();
        if sort == SortOrder::Score {
            sort_by_relevance(&mut shown);
        }

        let summary = FeedSummary::from_articles(&self.articles);
        let mut out = markdown::feed_banner(&self.origin, &summary, self.header.as_ref());
        for article in &shown {
            out.push_str(&markdown::feed_entry(
                article,
                self.store.likes_for(&article.id),
                self.store.comments_for(&article.id).len(),
            ));
        }
        out.push_str(&self.render_activity());
        out
    }

    fn render_activity(&self) -> String {
        markdown::activity(self.store.display_name(), &self.store.aggregates())
    }
}

/// Find an article by id (`article_2`) or bare ordinal (`2`).
fn resolve<'a>(articles: &'a [ArticleRecord], id: &str) -> Result<&'a ArticleRecord> {
    let prefixed = format!("article_{id}");
    articles
        .iter()
        .find(|a| a.id == id || a.id == prefixed)
        .ok_or_else(|| Error::UnknownArticle(id.to_string()))
}
