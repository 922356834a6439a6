//! # News Feed
//!
//! An interactive reader for plain-text news reports. A report is parsed into
//! article records, and each article can be liked, commented on and shared.
//! Likes, comments and the reader's display name are kept in a local JSON
//! state file so they survive between runs.
//!
//! ## Usage
//!
//! ```sh
//! news_feed feed --sort score
//! news_feed like 2
//! news_feed comment 2 Worth reading
//! news_feed session
//! ```
//!
//! ## Architecture
//!
//! 1. **Loading**: Read the report from the first available source, falling
//!    back to a sample compiled into the binary
//! 2. **Parsing**: Split the report into segments and extract article fields
//! 3. **Hydration**: Restore likes, comments and display name from the state file
//! 4. **Interaction**: Apply the requested command and persist any change

use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod app;
mod cli;
mod config;
mod error;
mod loader;
mod models;
mod outputs;
mod parser;
mod persistence;
mod store;
mod utils;

use app::App;
use cli::{Cli, Command, SOURCE_ENV};
use config::FeedConfig;
use loader::ReportLoader;
use persistence::{FilePersistence, MemoryPersistence, Persistence};
use store::InteractionStore;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let args = Cli::parse();
    let sources = args.source_list(std::env::var(SOURCE_ENV).ok().as_deref());
    let config = FeedConfig::load(args.config.as_deref())?
        .with_overrides(args.storage.clone(), sources);

    // --- Tracing init ---
    let default_filter = config.log_filter.as_deref().unwrap_or("warn");
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tfmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("news_feed starting up");
    debug!(?args.command, storage = %config.storage_path.display(), sources = ?config.sources, "Resolved configuration");

    let report = match ReportLoader::new(config.sources.clone()).load().await {
        Ok(report) => report,
        Err(e) => {
            error!(error = %e, "No report available");
            return Err(e.into());
        }
    };

    let articles = if args.ephemeral {
        info!("Ephemeral mode; interactions will not be saved");
        let store = InteractionStore::hydrate(MemoryPersistence::new());
        run(App::new(report, store), &args.command).await?
    } else {
        let store = InteractionStore::hydrate(FilePersistence::new(&config.storage_path));
        run(App::new(report, store), &args.command).await?
    };

    let elapsed = start_time.elapsed();
    info!(?elapsed, articles, "Execution complete");
    Ok(())
}

/// Execute `command` against `app` and return the number of articles in the feed.
async fn run<P: Persistence>(mut app: App<P>, command: &Command) -> Result<usize, Box<dyn Error>> {
    match command {
        Command::Session => {
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            app.run_session(stdin, &mut std::io::stdout()).await?;
        }
        command => {
            let output = app.execute(command).await.inspect_err(|e| {
                error!(error = %e, "Command failed");
            })?;
            print!("{output}");
        }
    }
    Ok(app.articles().len())
}
