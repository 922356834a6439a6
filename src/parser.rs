//! Parser for the delimited plain-text news report.
//!
//! A report is a banner followed by article blocks, each separated by a line
//! of 100 `=` characters:
//!
//! ```text
//! ARTICLE #2
//! --------------------------------------------------------------------------------
//! TITLE: India pilots AI chatbot-led e-commerce
//! SOURCE: TechCrunch
//! PUBLISHED: Thu, 09 Oct 2025 14:46:53 +0000
//! URL: https://techcrunch.com/...
//! GEMINI SCORE: 9/10
//!
//! SUMMARY:
//! India is piloting AI-powered e-commerce...
//!
//! CONTENT PREVIEW:
//! ...
//! ```
//!
//! Fields are looked up independently inside each segment, so their order does
//! not matter and optional ones may be missing. Segments without a title,
//! source or URL are dropped; the rest of the report still parses.

use crate::models::{ArticleRecord, DEFAULT_RELEVANCE_SCORE, ReportHeader};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, info, instrument};

/// Line separating segments in the report.
pub const DELIMITER: &str = "====================================================================================================";

const MAX_RELEVANCE_SCORE: u8 = 10;

static ARTICLE_NUM: Lazy<Regex> = Lazy::new(|| Regex::new(r"ARTICLE #(\d+)").unwrap());
static TITLE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^TITLE: (.+)").unwrap());
static SOURCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^SOURCE: (.+)").unwrap());
static PUBLISHED: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^PUBLISHED: (.+)").unwrap());
static URL: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^URL: (.+)").unwrap());
static SUMMARY: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?ms)^SUMMARY:\n(.+?)\n\n").unwrap());
static SCORE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^GEMINI SCORE: (.+?)/10").unwrap());

static GENERATED: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)RESULTS - (.+)$").unwrap());
static TOTAL_ARTICLES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Total Articles: (\d+)").unwrap());
static TOTAL_SOURCES: Lazy<Regex> = Lazy::new(|| Regex::new(r"Sources: (\d+)").unwrap());
static AVERAGE_SCORE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Average Relevance Score: ([0-9]+(?:\.[0-9]+)?)/10").unwrap());

/// Convert CRLF and bare CR line endings to LF.
pub fn normalize_line_endings(raw: &str) -> String {
    raw.replace("\r\n", "\n").replace('\r', "\n")
}

/// Parse a report into article records, in the order they appear.
///
/// Never fails: header and footer segments are skipped, and segments missing
/// a required field are dropped. Empty or unrelated input yields an empty
/// vector.
#[instrument(level = "debug", skip_all, fields(bytes = raw_text.len()))]
pub fn parse(raw_text: &str) -> Vec<ArticleRecord> {
    let normalized = normalize_line_endings(raw_text);
    let mut articles = Vec::new();

    for (index, segment) in normalized.split(DELIMITER).enumerate() {
        if !(segment.contains("ARTICLE #") && segment.contains("TITLE:")) {
            continue;
        }
        match parse_segment(segment, articles.len()) {
            Some(article) => {
                debug!(index, id = %article.id, title = %article.title, "Parsed article");
                articles.push(article);
            }
            None => debug!(index, "Dropping segment missing title, source or url"),
        }
    }

    info!(count = articles.len(), "Parsed articles from report");
    articles
}

fn parse_segment(segment: &str, emitted: usize) -> Option<ArticleRecord> {
    let title = capture(&TITLE, segment)?;
    let source = capture(&SOURCE, segment)?;
    let url = capture(&URL, segment)?;

    let ordinal = ARTICLE_NUM
        .captures(segment)
        .and_then(|c| c[1].parse::<u32>().ok());
    let sequence_number = ordinal.unwrap_or(emitted as u32);

    Some(ArticleRecord {
        id: format!("article_{sequence_number}"),
        sequence_number,
        title,
        source,
        published: capture(&PUBLISHED, segment).unwrap_or_else(|| "Unknown".to_string()),
        url,
        summary: capture(&SUMMARY, segment)
            .unwrap_or_else(|| "No summary available".to_string()),
        relevance_score: SCORE
            .captures(segment)
            .map(|c| parse_score(&c[1]))
            .unwrap_or(DEFAULT_RELEVANCE_SCORE),
    })
}

/// First capture of `re` in `segment`, trimmed; `None` if absent or blank.
fn capture(re: &Regex, segment: &str) -> Option<String> {
    let text = re.captures(segment)?.get(1)?.as_str().trim();
    (!text.is_empty()).then(|| text.to_string())
}

/// Read a score from the text before `/10`.
///
/// `N/A` and values without a leading integer fall back to the default;
/// anything above ten is clamped.
fn parse_score(raw: &str) -> u8 {
    let raw = raw.trim();
    if raw == "N/A" {
        return DEFAULT_RELEVANCE_SCORE;
    }
    let digits: String = raw.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits
        .parse::<u64>()
        .map(|n| n.min(u64::from(MAX_RELEVANCE_SCORE)) as u8)
        .unwrap_or(DEFAULT_RELEVANCE_SCORE)
}

/// Read the producer's banner from the text preceding the first article.
///
/// Returns `None` when none of the banner lines are present.
pub fn parse_report_header(raw_text: &str) -> Option<ReportHeader> {
    let normalized = normalize_line_endings(raw_text);
    let banner = match normalized.find("ARTICLE #") {
        Some(pos) => &normalized[..pos],
        None => normalized.as_str(),
    };

    let header = ReportHeader {
        generated: capture(&GENERATED, banner),
        total_articles: TOTAL_ARTICLES
            .captures(banner)
            .and_then(|c| c[1].parse().ok()),
        total_sources: TOTAL_SOURCES
            .captures(banner)
            .and_then(|c| c[1].parse().ok()),
        average_relevance: AVERAGE_SCORE
            .captures(banner)
            .and_then(|c| c[1].parse().ok()),
    };

    (header != ReportHeader::default()).then_some(header)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_ARTICLES: &str = "HYBRID TECH NEWS SCRAPER RESULTS - 2025-10-09 21:09:52
====================================================================================================
Total Articles: 2 | Sources: 2
Average Relevance Score: 9.5/10
====================================================================================================

ARTICLE #1
--------------------------------------------------------------------------------
TITLE: Accelerating Business
SOURCE: Financial Times Tech
PUBLISHED: Thu, 09 Oct 2025 04:03:58 GMT
URL: https://www.ft.com/reports/accelerating-business
GEMINI SCORE: 10/10

SUMMARY:
Six companies use AI in the legal industry.
A second summary line.

CONTENT PREVIEW:
Please enable JavaScript to proceed.

====================================================================================================

ARTICLE #2
--------------------------------------------------------------------------------
TITLE: India pilots AI chatbot-led e-commerce
SOURCE: TechCrunch
PUBLISHED: Thu, 09 Oct 2025 14:46:53 +0000
URL: https://techcrunch.com/2025/10/09/india-pilots/
GEMINI SCORE: 9/10

SUMMARY:
India is piloting AI-powered e-commerce.

CONTENT PREVIEW:
India has kicked off a pilot.

====================================================================================================
";

    fn segment(body: &str) -> String {
        format!("{DELIMITER}\n\nARTICLE #1\n{body}\n\n{DELIMITER}\n")
    }

    #[test]
    fn test_parse_two_articles() {
        let articles = parse(TWO_ARTICLES);
        assert_eq!(articles.len(), 2);

        let first = &articles[0];
        assert_eq!(first.id, "article_1");
        assert_eq!(first.sequence_number, 1);
        assert_eq!(first.title, "Accelerating Business");
        assert_eq!(first.source, "Financial Times Tech");
        assert_eq!(first.published, "Thu, 09 Oct 2025 04:03:58 GMT");
        assert_eq!(first.url, "https://www.ft.com/reports/accelerating-business");
        assert_eq!(
            first.summary,
            "Six companies use AI in the legal industry.\nA second summary line."
        );
        assert_eq!(first.relevance_score, 10);

        let second = &articles[1];
        assert_eq!(second.id, "article_2");
        assert_eq!(second.title, "India pilots AI chatbot-led e-commerce");
        assert_eq!(second.source, "TechCrunch");
        assert_eq!(second.url, "https://techcrunch.com/2025/10/09/india-pilots/");
        assert_eq!(second.summary, "India is piloting AI-powered e-commerce.");
        assert_eq!(second.relevance_score, 9);
    }

    #[test]
    fn test_score_defaults() {
        let na = segment("TITLE: T\nSOURCE: S\nURL: u\nGEMINI SCORE: N/A/10");
        assert_eq!(parse(&na)[0].relevance_score, 5);

        let missing = segment("TITLE: T\nSOURCE: S\nURL: u");
        assert_eq!(parse(&missing)[0].relevance_score, 5);

        let seven = segment("TITLE: T\nSOURCE: S\nURL: u\nGEMINI SCORE: 7/10");
        assert_eq!(parse(&seven)[0].relevance_score, 7);
    }

    #[test]
    fn test_parse_score_edge_cases() {
        assert_eq!(parse_score("N/A"), 5);
        assert_eq!(parse_score("abc"), 5);
        assert_eq!(parse_score("8.5"), 8);
        assert_eq!(parse_score("42"), 10);
        assert_eq!(parse_score(" 0"), 0);
    }

    #[test]
    fn test_missing_title_is_dropped() {
        let report = TWO_ARTICLES.replacen("TITLE: Accelerating Business\n", "", 1);
        let articles = parse(&report);
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].id, "article_2");
    }

    #[test]
    fn test_missing_url_is_dropped() {
        let report = segment("TITLE: T\nSOURCE: S\nPUBLISHED: today");
        assert!(parse(&report).is_empty());
    }

    #[test]
    fn test_blank_title_is_dropped() {
        let report = segment("TITLE:    \nSOURCE: S\nURL: u");
        assert!(parse(&report).is_empty());
    }

    #[test]
    fn test_optional_field_defaults() {
        let articles = parse(&segment("TITLE: T  \nSOURCE: S\nURL: u"));
        assert_eq!(articles[0].title, "T");
        assert_eq!(articles[0].published, "Unknown");
        assert_eq!(articles[0].summary, "No summary available");
    }

    #[test]
    fn test_line_ending_variants_parse_identically() {
        let unix = parse(TWO_ARTICLES);
        let windows = parse(&TWO_ARTICLES.replace('\n', "\r\n"));
        let classic_mac = parse(&TWO_ARTICLES.replace('\n', "\r"));
        assert_eq!(unix, windows);
        assert_eq!(unix, classic_mac);
        assert_eq!(unix.len(), 2);
    }

    #[test]
    fn test_empty_and_unrelated_input() {
        assert!(parse("").is_empty());
        assert!(parse("no markers here").is_empty());
    }

    #[test]
    fn test_id_falls_back_to_output_count() {
        let report = format!(
            "{DELIMITER}\nARTICLE #\nTITLE: A\nSOURCE: S\nURL: u1\n{DELIMITER}\nARTICLE #\nTITLE: B\nSOURCE: S\nURL: u2\n{DELIMITER}"
        );
        let articles = parse(&report);
        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].id, "article_0");
        assert_eq!(articles[1].id, "article_1");
        assert_eq!(articles[1].sequence_number, 1);
    }

    #[test]
    fn test_labels_must_start_a_line() {
        let report = segment("TITLE: Look at the URL: nowhere\nSOURCE: S");
        assert!(parse(&report).is_empty());
    }

    #[test]
    fn test_parse_report_header() {
        let header = parse_report_header(TWO_ARTICLES).unwrap();
        assert_eq!(header.generated.as_deref(), Some("2025-10-09 21:09:52"));
        assert_eq!(header.total_articles, Some(2));
        assert_eq!(header.total_sources, Some(2));
        assert_eq!(header.average_relevance, Some(9.5));
    }

    #[test]
    fn test_parse_report_header_absent() {
        assert_eq!(parse_report_header("no banner here"), None);
        assert_eq!(parse_report_header(&segment("TITLE: T\nSOURCE: S\nURL: u")), None);
    }
}
