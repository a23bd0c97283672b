//! Common walk loop: consumes an iterator of entries / errors, sends file candidates to path_tx, records skipped paths.

use crossbeam_channel::Sender;
use log::debug;
use std::fs::FileType;
use std::path::{Path, PathBuf};
use std::sync::atomic::Ordering;

use crate::Candidate;
use crate::engine::tools::should_include_in_walk;

use super::context::{WalkContext, record_diagnostic};

/// One result from a directory walk: an entry with its walker depth (root = 0), or an error with optional path.
pub enum WalkOutcome {
    Ok {
        path: PathBuf,
        depth: usize,
        is_file: bool,
    },
    Err {
        msg: String,
        path: Option<PathBuf>,
    },
}

/// Regular files and symlinks that resolve to a regular file are candidates.
fn is_candidate_file(file_type: FileType, path: &Path) -> bool {
    file_type.is_file() || (file_type.is_symlink() && path.is_file())
}

/// Convert a jwalk result into [`WalkOutcome`].
pub fn to_outcome_jwalk(r: Result<jwalk::DirEntry<((), ())>, jwalk::Error>) -> WalkOutcome {
    match r {
        Ok(entry) => {
            let path = entry.path();
            WalkOutcome::Ok {
                is_file: is_candidate_file(entry.file_type, &path),
                depth: entry.depth,
                path,
            }
        }
        Err(err) => WalkOutcome::Err {
            msg: format!("{}", err),
            path: err.path().map(PathBuf::from),
        },
    }
}

/// Convert a walkdir result into [`WalkOutcome`].
pub fn to_outcome_walkdir(r: Result<walkdir::DirEntry, walkdir::Error>) -> WalkOutcome {
    match r {
        Ok(entry) => {
            let is_file = is_candidate_file(entry.file_type(), entry.path());
            let depth = entry.depth();
            WalkOutcome::Ok {
                path: entry.into_path(),
                depth,
                is_file,
            }
        }
        Err(err) => WalkOutcome::Err {
            msg: format!("{}", err),
            path: err.path().map(PathBuf::from),
        },
    }
}

fn jwalk_iter(ctx: &WalkContext) -> Box<dyn Iterator<Item = WalkOutcome>> {
    use jwalk::Parallelism;
    use std::time::Duration;
    let root = ctx.root.clone();
    let exclude = ctx.exclude.clone();
    let mut walker = jwalk::WalkDir::new(&ctx.root)
        .follow_links(ctx.follow_links)
        .skip_hidden(false)
        .parallelism(Parallelism::RayonDefaultPool {
            busy_timeout: Duration::from_secs(60),
        })
        .process_read_dir(move |_depth, _dir, _state, children| {
            // Pruning here stops jwalk from descending into excluded directories.
            children.retain(|child| match child {
                Ok(entry) => should_include_in_walk(&entry.path(), &root, &exclude),
                Err(_) => true,
            });
        });
    if let Some(limit) = ctx.max_depth.walk_limit() {
        walker = walker.max_depth(limit);
    }
    Box::new(walker.into_iter().map(to_outcome_jwalk))
}

fn walkdir_iter(ctx: &WalkContext) -> Box<dyn Iterator<Item = WalkOutcome>> {
    use walkdir::WalkDir;
    let root = ctx.root.clone();
    let exclude = ctx.exclude.clone();
    let mut walker = WalkDir::new(&ctx.root).follow_links(ctx.follow_links);
    if let Some(limit) = ctx.max_depth.walk_limit() {
        walker = walker.max_depth(limit);
    }
    Box::new(
        walker
            .into_iter()
            .filter_entry(move |e| should_include_in_walk(e.path(), &root, &exclude))
            .map(to_outcome_walkdir),
    )
}

/// Enumerate candidates under `ctx.root` with the chosen backend and send them on `path_tx`.
/// Runs on the calling thread; returns the number of candidates sent.
pub fn run_walk(path_tx: Sender<Candidate>, ctx: &WalkContext, parallel_walk: bool) -> usize {
    let iter: Box<dyn Iterator<Item = WalkOutcome>> = match parallel_walk {
        true => jwalk_iter(ctx),
        false => walkdir_iter(ctx),
    };
    run_walk_loop(path_tx, ctx, iter, !parallel_walk)
}

/// Run the common walk loop: consume `iter` of [`WalkOutcome`], send file entries within the depth
/// bound to `path_tx`, push errors to `skipped_paths`. Stops early when cancelled. Drops `path_tx`
/// when done so workers see the queue close. Returns the count of candidates sent.
/// When `track_last_path` is true (walkdir/serial), the last path seen labels errors that carry no path.
pub fn run_walk_loop<I>(
    path_tx: Sender<Candidate>,
    ctx: &WalkContext,
    iter: I,
    track_last_path: bool,
) -> usize
where
    I: Iterator<Item = WalkOutcome>,
{
    let mut count = 0_usize;
    let mut last_path: Option<PathBuf> = None;
    for outcome in iter {
        if ctx.cancel.load(Ordering::Relaxed) {
            debug!("walk: cancelled after {} candidates", count);
            break;
        }
        match outcome {
            WalkOutcome::Ok {
                path,
                depth,
                is_file,
            } => {
                if track_last_path {
                    last_path = Some(path.clone());
                }
                if !is_file || depth == 0 {
                    continue;
                }
                let dir_depth = depth - 1;
                if !ctx.max_depth.allows(dir_depth) {
                    continue;
                }
                if path_tx
                    .send(Candidate {
                        path,
                        depth: dir_depth,
                    })
                    .is_err()
                {
                    break;
                }
                count += 1;
            }
            WalkOutcome::Err { msg, path } => {
                let to_push = path.unwrap_or_else(|| {
                    PathBuf::from(format!(
                        "<no-path, last was {}>",
                        last_path
                            .as_ref()
                            .map(|p| p.display().to_string())
                            .unwrap_or_else(|| "<none>".to_string())
                    ))
                });
                debug!("walk: skipped {}: {}", to_push.display(), msg);
                record_diagnostic(&ctx.skipped_paths, to_push, msg);
            }
        }
    }
    drop(path_tx);
    count
}
