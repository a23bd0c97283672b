use anyhow::{Result, anyhow};
use crossbeam_channel::Receiver;
use log::debug;
use std::io;
use std::path::Path;
use std::sync::atomic::Ordering;
use std::thread::JoinHandle;

use crate::engine::matcher::Matcher;
use crate::pipeline;
use crate::pipeline::context::RecordBatch;
use crate::{CancelFlag, Diagnostics, RecordSink, SearchOpts};

/// Handles returned by [`run_pipeline`]: the caller drains `result_rx`, then joins `worker_handles`.
pub struct PipelineHandles {
    pub result_rx: Receiver<RecordBatch>,
    pub worker_handles: Vec<JoinHandle<usize>>,
    /// Candidates the walk enqueued.
    pub candidates: usize,
    pub skipped_paths: Diagnostics,
    pub scan_failures: Diagnostics,
}

/// Start the two-phase pipeline: walk `root` to completion on this thread, then spawn the scan pool.
pub fn run_pipeline(
    root: &Path,
    matcher: &Matcher,
    opts: &SearchOpts,
    num_workers: usize,
    cancel: &CancelFlag,
) -> Result<PipelineHandles> {
    let channels = pipeline::create_pipeline_channels(root, opts, cancel);

    let candidates = pipeline::run_walk(channels.path_tx, &channels.walk_ctx, opts.parallel_walk);
    debug!(
        "walk done: {} candidates under {} (parallel walk: {})",
        candidates,
        root.display(),
        opts.parallel_walk
    );

    let worker_handles = pipeline::spawn_scan_workers(
        channels.path_rx,
        &channels.result_tx,
        matcher,
        opts,
        cancel,
        &channels.scan_failures,
        num_workers,
    );

    // Dropping the last sender closes the channel once every worker exits.
    drop(channels.result_tx);

    Ok(PipelineHandles {
        result_rx: channels.result_rx,
        worker_handles,
        candidates,
        skipped_paths: channels.skipped_paths,
        scan_failures: channels.scan_failures,
    })
}

/// What the aggregator delivered.
#[derive(Debug, Default)]
pub struct DrainResult {
    pub emitted: usize,
    /// First sink failure. After it, the run is cancelled and remaining records are discarded.
    pub sink_error: Option<io::Error>,
}

/// Aggregator: block on `result_rx` until every worker has exited, handing each record to `sink`.
/// Records of one batch stay together and in line order.
pub fn drain_results<S>(result_rx: &Receiver<RecordBatch>, sink: &mut S, cancel: &CancelFlag) -> DrainResult
where
    S: RecordSink + ?Sized,
{
    let mut out = DrainResult::default();
    while let Ok(batch) = result_rx.recv() {
        if out.sink_error.is_some() {
            continue;
        }
        for record in &batch {
            if let Err(e) = sink.emit(record) {
                debug!("sink failed: {}; cancelling", e);
                cancel.store(true, Ordering::Relaxed);
                out.sink_error = Some(e);
                break;
            }
            out.emitted += 1;
        }
    }
    out
}

/// Join the scan pool after the result channel is drained. Returns the total files scanned.
pub fn shutdown_pipeline_handles(worker_handles: Vec<JoinHandle<usize>>) -> Result<usize> {
    let mut scanned = 0_usize;
    for h in worker_handles {
        scanned += h.join().map_err(|_| anyhow!("scan worker panicked"))?;
    }
    Ok(scanned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ResultRecord;
    use crossbeam_channel::unbounded;
    use std::sync::Arc;
    use std::sync::atomic::AtomicBool;

    struct FailingSink {
        accepted: usize,
        limit: usize,
    }

    impl RecordSink for FailingSink {
        fn emit(&mut self, _record: &ResultRecord) -> io::Result<()> {
            if self.accepted == self.limit {
                return Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"));
            }
            self.accepted += 1;
            Ok(())
        }

        fn no_matches(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn batch(name: &str, lines: usize) -> RecordBatch {
        (1..=lines)
            .map(|n| ResultRecord::ContentMatch {
                path: name.into(),
                line_number: n,
                line_text: format!("line {n}"),
            })
            .collect()
    }

    #[test]
    fn test_drain_keeps_batch_order() {
        let (tx, rx) = unbounded();
        tx.send(batch("a", 2)).unwrap();
        tx.send(batch("b", 3)).unwrap();
        drop(tx);
        let cancel: CancelFlag = Arc::new(AtomicBool::new(false));
        let mut sink: Vec<ResultRecord> = Vec::new();
        let res = drain_results(&rx, &mut sink, &cancel);
        assert_eq!(res.emitted, 5);
        assert!(res.sink_error.is_none());
        let mut expected = batch("a", 2);
        expected.extend(batch("b", 3));
        assert_eq!(sink, expected);
    }

    #[test]
    fn test_sink_error_cancels_and_keeps_draining() {
        let (tx, rx) = unbounded();
        tx.send(batch("a", 2)).unwrap();
        tx.send(batch("b", 2)).unwrap();
        drop(tx);
        let cancel: CancelFlag = Arc::new(AtomicBool::new(false));
        let mut sink = FailingSink {
            accepted: 0,
            limit: 3,
        };
        let res = drain_results(&rx, &mut sink, &cancel);
        assert_eq!(res.emitted, 3);
        assert_eq!(
            res.sink_error.map(|e| e.kind()),
            Some(io::ErrorKind::BrokenPipe)
        );
        assert!(cancel.load(Ordering::Relaxed));
        assert!(rx.is_empty());
    }
}
