//! super-grep: search a directory tree for a term in any naming convention.
//!
//! `fooBar`, `foo_bar`, `foo-bar`, `foo bar` and `FooBar` all find each other. The term is split
//! into tokens, joined by an optional-separator pattern and matched case-insensitively against
//! file names or lines of file contents by a pool of worker threads.

pub mod engine;
pub mod pipeline;
pub mod search;
pub mod types;
pub mod utils;

/// Re-export types for API
pub use types::*;

pub use engine::matcher::Matcher;
pub use engine::tokenizer::{Token, tokenize};

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

/// Result alias used by public super-grep API
pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;

/// Search `root` for `term` and hand every record to `sink` as it arrives.
///
/// When nothing matched, `sink.no_matches()` is called once. Fails only on configuration
/// problems (missing root, unusable pattern) or when the sink itself fails.
pub fn search_dir<S>(root: &Path, term: &str, opts: &SearchOpts, sink: &mut S) -> Result<Summary>
where
    S: RecordSink + ?Sized,
{
    let cancel: CancelFlag = Arc::new(AtomicBool::new(false));
    search_dir_with_cancel(root, term, opts, sink, &cancel)
}

/// Like [`search_dir`], but stops early when `cancel` is set (e.g. from a Ctrl+C handler).
/// Records already queued are still delivered; the no-matches notice is skipped after a cancel.
pub fn search_dir_with_cancel<S>(
    root: &Path,
    term: &str,
    opts: &SearchOpts,
    sink: &mut S,
    cancel: &CancelFlag,
) -> Result<Summary>
where
    S: RecordSink + ?Sized,
{
    log::debug!(
        "{} CONFIG:{:#?}",
        env!("CARGO_PKG_NAME").to_uppercase(),
        opts
    );
    search::run_search(root, term, opts, sink, cancel)
}

/// Collect every record into a `Vec` (no streaming). Order across files is not defined.
pub fn collect_records(
    root: &Path,
    term: &str,
    opts: &SearchOpts,
) -> Result<(Vec<ResultRecord>, Summary)> {
    let mut records = Vec::new();
    let summary = search_dir(root, term, opts, &mut records)?;
    Ok((records, summary))
}
