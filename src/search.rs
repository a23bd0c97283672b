//! Coordinator: compile the term, enumerate, scan, aggregate, then report.

use anyhow::{Context, Result};
use log::{debug, warn};
use std::path::Path;
use std::sync::atomic::Ordering;

use crate::engine::matcher::Matcher;
use crate::engine::tools::check_search_root;
use crate::pipeline;
use crate::utils::{WorkerThreadLimits, cap_workers_by_fd_limit};
use crate::{CancelFlag, RecordSink, SearchOpts, Summary};

/// Worker count for this run: requested or host parallelism, capped by the open-file limit.
pub fn resolve_worker_count(opts: &SearchOpts) -> usize {
    let requested = opts
        .num_workers
        .unwrap_or_else(|| WorkerThreadLimits::current().default_workers())
        .get();
    cap_workers_by_fd_limit(requested)
}

/// Run one search. Configuration errors (bad root, oversized pattern) fail before any traversal.
/// Per-file problems are reported through logging and counted in the [`Summary`].
pub fn run_search<S>(
    root: &Path,
    term: &str,
    opts: &SearchOpts,
    sink: &mut S,
    cancel: &CancelFlag,
) -> Result<Summary>
where
    S: RecordSink + ?Sized,
{
    let root = check_search_root(root)?;
    let matcher = Matcher::from_term(term)?;
    if matcher.matches_everything() {
        warn!("Search term {:?} has no tokens; every line will match", term);
    }
    debug!("pattern: {}", matcher.as_str());

    let num_workers = resolve_worker_count(opts);
    debug!("using {} scan workers", num_workers);

    let pipeline::PipelineHandles {
        result_rx,
        worker_handles,
        candidates,
        skipped_paths,
        scan_failures,
    } = pipeline::run_pipeline(&root, &matcher, opts, num_workers, cancel)?;

    let drained = pipeline::drain_results(&result_rx, sink, cancel);
    let files_scanned = pipeline::shutdown_pipeline_handles(worker_handles)?;

    let skipped = pipeline::take_diagnostics(&skipped_paths);
    let failures = pipeline::take_diagnostics(&scan_failures);
    pipeline::report_diagnostics(&skipped, &failures);

    if let Some(e) = drained.sink_error {
        return Err(e).context("write search results");
    }

    let cancelled = cancel.load(Ordering::Relaxed);
    if drained.emitted == 0 && !cancelled {
        sink.no_matches().context("write search results")?;
    }

    let summary = Summary {
        records_emitted: drained.emitted,
        candidates,
        files_scanned,
        scan_failures: failures.len(),
        skipped_paths: skipped.len(),
        cancelled,
    };
    debug!("{:?}", summary);
    Ok(summary)
}
