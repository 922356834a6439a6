//! Command-line interface definitions for News Feed.
//!
//! This module defines the CLI arguments and subcommands using the `clap` crate.
//! Global options can also be provided through environment variables.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Command-line arguments for the News Feed application.
///
/// # Examples
///
/// ```sh
/// # List the feed from the default report locations
/// news_feed feed
///
/// # Read a specific report and keep state somewhere else
/// news_feed --source ./public/hybrid_tech_news.txt --storage ~/.news_state.json feed
///
/// # Like and comment on the second article
/// news_feed like 2
/// news_feed comment article_2 Great write-up
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to a config.yaml file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// JSON file holding likes, comments and the display name
    #[arg(short, long, env = "NEWS_FEED_STORAGE")]
    pub storage: Option<PathBuf>,

    /// Report file or http(s) URL; repeat to give fallbacks in priority order.
    /// Without this flag, a comma-separated NEWS_FEED_SOURCE is used
    #[arg(long = "source")]
    pub sources: Vec<String>,

    /// Keep likes and comments in memory only; nothing is read or written
    #[arg(long)]
    pub ephemeral: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Environment variable holding comma-separated report sources.
pub const SOURCE_ENV: &str = "NEWS_FEED_SOURCE";

impl Cli {
    /// Report sources given on the command line, else those in `env_value`.
    ///
    /// Each `--source` is taken whole, so URLs with commas survive. Only the
    /// environment value is split on commas.
    pub fn source_list(&self, env_value: Option<&str>) -> Vec<String> {
        if !self.sources.is_empty() {
            return self.sources.clone();
        }
        env_value
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List every article with its likes and comment count
    Feed {
        /// Ordering of the listing
        #[arg(long, value_enum, default_value_t = SortOrder::File)]
        sort: SortOrder,

        /// Hide articles scored below this value
        #[arg(long, value_parser = clap::value_parser!(u8).range(0..=10))]
        min_score: Option<u8>,
    },
    /// Show one article with its comments
    Show { id: String },
    /// Like an article
    Like { id: String },
    /// Comment on an article as the current display name
    Comment {
        id: String,
        #[arg(required = true, num_args = 1.., allow_hyphen_values = true)]
        text: Vec<String>,
    },
    /// Set the display name used for new comments
    Name {
        #[arg(required = true, num_args = 1..)]
        name: Vec<String>,
    },
    /// Print total likes and comments
    Stats,
    /// Reload likes and comments from the state file and print totals
    Refresh,
    /// Print share links for an article
    Share { id: String },
    /// Write a JSON snapshot of the feed and its interactions
    Export {
        /// Output directory for the JSON snapshot
        #[arg(short, long)]
        json_output_dir: PathBuf,
    },
    /// Read commands from stdin, one per line, against a single store
    Session,
}

/// One line typed during `session`, parsed with the same subcommands.
#[derive(Parser, Debug)]
#[command(no_binary_name = true, disable_version_flag = true)]
pub struct SessionLine {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Order of appearance in the report
    File,
    /// Highest relevance score first
    Score,
}
