//! Raw report loading with an embedded fallback.
//!
//! Sources are tried in priority order. Each one is either a filesystem path
//! or an `http(s)` URL fetched with a plain GET. A source that cannot be read,
//! answers with a non-success status, or yields empty text is logged and
//! skipped. When none succeed the sample report compiled into the binary is
//! used, so the feed always has something to show.

use crate::error::{Error, Result};
use reqwest::get;
use std::fmt;
use tokio::fs;
use tracing::{info, instrument, warn};
use url::Url;

/// Two-article report shipped with the binary.
pub const EMBEDDED_REPORT: &str = include_str!("../assets/sample_report.txt");

/// Where the report text came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportOrigin {
    /// One of the configured sources, by the name it was configured with.
    Source(String),
    /// The sample report compiled into the binary.
    Embedded,
}

impl fmt::Display for ReportOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportOrigin::Source(name) => f.write_str(name),
            ReportOrigin::Embedded => f.write_str("embedded data"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoadedReport {
    pub content: String,
    pub origin: ReportOrigin,
}

#[derive(Debug, Clone)]
pub struct ReportLoader {
    sources: Vec<String>,
    fallback: &'static str,
}

impl ReportLoader {
    pub fn new(sources: Vec<String>) -> Self {
        Self {
            sources,
            fallback: EMBEDDED_REPORT,
        }
    }

    /// Replace the embedded fallback text.
    #[cfg(test)]
    pub fn with_fallback(mut self, fallback: &'static str) -> Self {
        self.fallback = fallback;
        self
    }

    /// Return the text of the first readable source, or the fallback.
    ///
    /// # Errors
    ///
    /// [`Error::NoArticleSource`] when every source fails and the fallback
    /// is empty.
    #[instrument(level = "info", skip_all, fields(sources = self.sources.len()))]
    pub async fn load(&self) -> Result<LoadedReport> {
        for name in &self.sources {
            match read_source(name).await {
                Ok(content) if !content.trim().is_empty() => {
                    info!(source = %name, bytes = content.len(), "Loaded report");
                    return Ok(LoadedReport {
                        content,
                        origin: ReportOrigin::Source(name.clone()),
                    });
                }
                Ok(_) => warn!(source = %name, "Report source is empty; trying next"),
                Err(e) => warn!(source = %name, error = %e, "Report source unavailable; trying next"),
            }
        }

        if self.fallback.trim().is_empty() {
            return Err(Error::NoArticleSource);
        }
        info!(bytes = self.fallback.len(), "Using embedded report");
        Ok(LoadedReport {
            content: self.fallback.to_string(),
            origin: ReportOrigin::Embedded,
        })
    }
}

async fn read_source(name: &str) -> Result<String> {
    match Url::parse(name) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {
            let response = get(url).await?.error_for_status()?;
            Ok(response.text().await?)
        }
        _ => Ok(fs::read_to_string(name).await?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    #[test]
    fn test_embedded_report_parses() {
        let articles = parse(EMBEDDED_REPORT);
        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].title, "Accelerating Business");
        assert_eq!(articles[1].source, "TechCrunch");
    }

    #[tokio::test]
    async fn test_first_readable_source_wins() {
        let tmp = tempfile::tempdir().unwrap();
        let empty = tmp.path().join("empty.txt");
        let report = tmp.path().join("report.txt");
        std::fs::write(&empty, "  \n").unwrap();
        std::fs::write(&report, "ARTICLE #1\nTITLE: x").unwrap();

        let sources = vec![
            tmp.path().join("missing.txt").display().to_string(),
            empty.display().to_string(),
            report.display().to_string(),
        ];
        let loaded = ReportLoader::new(sources).load().await.unwrap();
        assert_eq!(loaded.origin, ReportOrigin::Source(report.display().to_string()));
        assert_eq!(loaded.content, "ARTICLE #1\nTITLE: x");
    }

    #[tokio::test]
    async fn test_falls_back_to_embedded() {
        let loaded = ReportLoader::new(vec!["/definitely/not/here.txt".to_string()])
            .load()
            .await
            .unwrap();
        assert_eq!(loaded.origin, ReportOrigin::Embedded);
        assert_eq!(loaded.origin.to_string(), "embedded data");
        assert_eq!(loaded.content, EMBEDDED_REPORT);
    }

    #[tokio::test]
    async fn test_missing_fallback_is_an_error() {
        let result = ReportLoader::new(vec![]).with_fallback("").load().await;
        assert!(matches!(result, Err(Error::NoArticleSource)));
    }
}
