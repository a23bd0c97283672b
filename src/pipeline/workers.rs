//! Scan worker pool: drain the candidate queue, scan each file, send per-file batches.

use crossbeam_channel::{Receiver, Sender};
use log::{debug, trace};
use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::thread::{self, JoinHandle};

use crate::engine::matcher::Matcher;
use crate::engine::scan::{ScanOutcome, scan_candidate};
use crate::{CancelFlag, Candidate, Diagnostics, SearchOpts};

use super::context::{RecordBatch, record_diagnostic};

/// Shared read-only state for every worker.
struct WorkerShared {
    matcher: Matcher,
    opts: SearchOpts,
    cancel: CancelFlag,
    scan_failures: Diagnostics,
}

/// Single scan worker: take candidates with `try_recv` until the queue is empty (the walk has
/// already finished) or the run is cancelled. Returns the number of files scanned.
fn scan_worker_loop(
    id: usize,
    path_rx: Receiver<Candidate>,
    result_tx: Sender<RecordBatch>,
    shared: Arc<WorkerShared>,
) -> usize {
    let mut scanned = 0_usize;
    while !shared.cancel.load(Ordering::Relaxed) {
        let Ok(candidate) = path_rx.try_recv() else {
            break;
        };
        scanned += 1;
        match scan_candidate(&candidate, &shared.matcher, &shared.opts, &shared.cancel) {
            ScanOutcome::Matched(records) => {
                trace!(
                    "worker {}: {} record(s) from {}",
                    id,
                    records.len(),
                    candidate.path.display()
                );
                if result_tx.send(records).is_err() {
                    break;
                }
            }
            ScanOutcome::NoMatch => {}
            ScanOutcome::Failed(err) => {
                debug!("worker {}: cannot scan {}: {}", id, candidate.path.display(), err);
                record_diagnostic(&shared.scan_failures, candidate.path, err.to_string());
            }
        }
    }
    drop(result_tx);
    scanned
}

/// Spawn `num_workers` scan workers. Caller must drop its own `result_tx` afterwards so the
/// result channel closes when the last worker exits.
pub fn spawn_scan_workers(
    path_rx: Receiver<Candidate>,
    result_tx: &Sender<RecordBatch>,
    matcher: &Matcher,
    opts: &SearchOpts,
    cancel: &CancelFlag,
    scan_failures: &Diagnostics,
    num_workers: usize,
) -> Vec<JoinHandle<usize>> {
    let shared = Arc::new(WorkerShared {
        matcher: matcher.clone(),
        opts: opts.clone(),
        cancel: Arc::clone(cancel),
        scan_failures: Arc::clone(scan_failures),
    });
    (0..num_workers)
        .map(|id| {
            let path_rx = path_rx.clone();
            let result_tx = result_tx.clone();
            let shared = Arc::clone(&shared);
            thread::spawn(move || scan_worker_loop(id, path_rx, result_tx, shared))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ResultRecord;
    use crossbeam_channel::{bounded, unbounded};
    use std::sync::Mutex;
    use std::sync::atomic::AtomicBool;
    use tempfile::tempdir;

    #[test]
    fn test_workers_drain_queue_and_close_channel() {
        let dir = tempdir().unwrap();
        let (path_tx, path_rx) = unbounded();
        for i in 0..20 {
            let path = dir.path().join(format!("f{i}.txt"));
            let body = if i % 2 == 0 { "user_name\n" } else { "nothing\n" };
            std::fs::write(&path, body).unwrap();
            path_tx.send(Candidate { path, depth: 0 }).unwrap();
        }
        // Missing file counts as scanned and failed.
        path_tx
            .send(Candidate {
                path: dir.path().join("gone.txt"),
                depth: 0,
            })
            .unwrap();
        drop(path_tx);

        let (result_tx, result_rx) = bounded(4);
        let cancel: CancelFlag = Arc::new(AtomicBool::new(false));
        let failures: Diagnostics = Arc::new(Mutex::new(Vec::new()));
        let matcher = Matcher::from_term("userName").unwrap();
        let handles = spawn_scan_workers(
            path_rx,
            &result_tx,
            &matcher,
            &SearchOpts::default(),
            &cancel,
            &failures,
            3,
        );
        drop(result_tx);

        let batches: Vec<RecordBatch> = result_rx.iter().collect();
        let scanned: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();

        assert_eq!(scanned, 21);
        assert_eq!(batches.len(), 10);
        assert!(batches.iter().all(|b| matches!(
            &b[..],
            [ResultRecord::ContentMatch { line_number: 1, .. }]
        )));
        assert_eq!(failures.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_cancelled_pool_scans_nothing() {
        let (path_tx, path_rx) = unbounded();
        path_tx
            .send(Candidate {
                path: "whatever.txt".into(),
                depth: 0,
            })
            .unwrap();
        drop(path_tx);
        let (result_tx, result_rx) = bounded(1);
        let cancel: CancelFlag = Arc::new(AtomicBool::new(true));
        let failures: Diagnostics = Arc::new(Mutex::new(Vec::new()));
        let matcher = Matcher::from_term("x").unwrap();
        let handles = spawn_scan_workers(
            path_rx,
            &result_tx,
            &matcher,
            &SearchOpts::default(),
            &cancel,
            &failures,
            2,
        );
        drop(result_tx);
        assert_eq!(result_rx.iter().count(), 0);
        let scanned: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(scanned, 0);
    }
}
