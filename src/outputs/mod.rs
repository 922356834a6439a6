//! Output generation for the terminal and for JSON export.
//!
//! # Submodules
//!
//! - [`markdown`]: Renders the feed, article cards, share links and activity
//!   totals as Markdown-flavoured text for stdout
//! - [`json`]: Writes a snapshot of the feed and its interactions to disk
//!
//! # Output Structure
//!
//! ```text
//! json_output_dir/
//! └── 2025-10-09/
//!     └── feed.json
//! ```

pub mod json;
pub mod markdown;
