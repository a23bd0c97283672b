//! Pipeline context: channels and shared diagnostics for the walk + scan pool.

use crossbeam_channel::{Receiver, Sender, bounded, unbounded};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::utils::config::RESULT_CHANNEL_CAP;
use crate::{CancelFlag, Candidate, Diagnostics, MaxDepth, ResultRecord, SearchOpts};

/// One worker's output for one file, in line order.
pub type RecordBatch = Vec<ResultRecord>;

/// Everything the walk needs: root, filters, and where to record skipped paths.
pub struct WalkContext {
    pub root: PathBuf,
    pub max_depth: MaxDepth,
    pub follow_links: bool,
    pub exclude: Vec<String>,
    pub skipped_paths: Diagnostics,
    pub cancel: CancelFlag,
}

/// Channels and shared state for one run. The walk gets `path_tx` and `walk_ctx`;
/// workers get `path_rx` and clones of `result_tx`; the aggregator keeps `result_rx`.
pub struct PipelineChannels {
    pub path_tx: Sender<Candidate>,
    pub path_rx: Receiver<Candidate>,
    pub result_tx: Sender<RecordBatch>,
    pub result_rx: Receiver<RecordBatch>,
    pub skipped_paths: Diagnostics,
    pub scan_failures: Diagnostics,
    pub walk_ctx: WalkContext,
}

pub fn create_pipeline_channels(
    root: &Path,
    opts: &SearchOpts,
    cancel: &CancelFlag,
) -> PipelineChannels {
    // Path queue is unbounded: the walk finishes before any worker starts.
    let (path_tx, path_rx) = unbounded::<Candidate>();
    let (result_tx, result_rx) = bounded::<RecordBatch>(RESULT_CHANNEL_CAP);
    let skipped_paths: Diagnostics = Arc::new(Mutex::new(Vec::new()));
    let scan_failures: Diagnostics = Arc::new(Mutex::new(Vec::new()));

    let walk_ctx = WalkContext {
        root: root.to_path_buf(),
        max_depth: opts.max_depth,
        follow_links: opts.follow_links,
        exclude: opts.exclude.clone(),
        skipped_paths: Arc::clone(&skipped_paths),
        cancel: Arc::clone(cancel),
    };

    PipelineChannels {
        path_tx,
        path_rx,
        result_tx,
        result_rx,
        skipped_paths,
        scan_failures,
        walk_ctx,
    }
}

/// Push a `(path, reason)` pair. A poisoned lock is still written to.
pub fn record_diagnostic(list: &Diagnostics, path: PathBuf, reason: String) {
    list.lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
        .push((path, reason));
}

/// Take all collected pairs out of a diagnostics list.
pub fn take_diagnostics(list: &Diagnostics) -> Vec<(PathBuf, String)> {
    std::mem::take(&mut *list.lock().unwrap_or_else(std::sync::PoisonError::into_inner))
}
