//! Per-file scan: test one candidate's name or contents against the matcher.

use memmap2::Mmap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;

use crate::engine::matcher::Matcher;
use crate::engine::tools::file_name_lossy;
use crate::utils::config::ScanConsts;
use crate::{Candidate, ResultRecord, ScanMode, SearchOpts};

/// Why a file produced no results other than "nothing matched".
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("{0}")]
    Io(#[from] std::io::Error),
    #[error("not a regular file")]
    NotRegularFile,
}

/// Result of scanning one candidate.
#[derive(Debug)]
pub enum ScanOutcome {
    /// One batch of records, in line order.
    Matched(Vec<ResultRecord>),
    NoMatch,
    Failed(ScanError),
}

impl ScanOutcome {
    fn from_records(records: Vec<ResultRecord>) -> Self {
        if records.is_empty() {
            ScanOutcome::NoMatch
        } else {
            ScanOutcome::Matched(records)
        }
    }
}

/// Scan `candidate` according to `opts.mode`. Never panics on I/O; failures become [`ScanOutcome::Failed`].
/// If `cancel` is set mid-file, the records found so far are returned.
pub fn scan_candidate(
    candidate: &Candidate,
    matcher: &Matcher,
    opts: &SearchOpts,
    cancel: &AtomicBool,
) -> ScanOutcome {
    match opts.mode {
        ScanMode::FilenameOnly => scan_file_name(&candidate.path, matcher, opts),
        ScanMode::Contents => match scan_contents(&candidate.path, matcher, opts, cancel) {
            Ok(records) => ScanOutcome::from_records(records),
            Err(e) => ScanOutcome::Failed(e),
        },
    }
}

/// Match against the final path component only.
fn scan_file_name(path: &Path, matcher: &Matcher, opts: &SearchOpts) -> ScanOutcome {
    let Some(name) = file_name_lossy(path) else {
        return ScanOutcome::NoMatch;
    };
    if !matcher.is_match(&name) {
        return ScanOutcome::NoMatch;
    }
    let path = path.to_path_buf();
    let record = if opts.files_with_matches {
        ResultRecord::MatchedFileOnly { path }
    } else {
        ResultRecord::FilenameMatch { path }
    };
    ScanOutcome::Matched(vec![record])
}

/// Collects records for one file and decides when to stop.
struct LineCollector<'a> {
    path: &'a Path,
    matcher: &'a Matcher,
    opts: &'a SearchOpts,
    records: Vec<ResultRecord>,
}

impl LineCollector<'_> {
    /// Test one raw line (without its newline). Returns false when scanning should stop.
    fn push_line(&mut self, line_number: usize, raw: &[u8]) -> bool {
        let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
        let Ok(line) = std::str::from_utf8(raw) else {
            log::trace!(
                "{}:{}: undecodable line skipped",
                self.path.display(),
                line_number
            );
            return true;
        };
        if !self.matcher.is_match(line) {
            return true;
        }
        if self.opts.files_with_matches {
            self.records.push(ResultRecord::MatchedFileOnly {
                path: self.path.to_path_buf(),
            });
            return false;
        }
        self.records.push(ResultRecord::ContentMatch {
            path: self.path.to_path_buf(),
            line_number,
            line_text: line.trim().to_string(),
        });
        !self.opts.stop_on_first_match
    }
}

fn scan_contents(
    path: &Path,
    matcher: &Matcher,
    opts: &SearchOpts,
    cancel: &AtomicBool,
) -> Result<Vec<ResultRecord>, ScanError> {
    // Checked before open: opening a FIFO blocks until a writer appears.
    let meta = std::fs::metadata(path)?;
    if !meta.is_file() {
        return Err(ScanError::NotRegularFile);
    }
    let file = File::open(path)?;
    let mut collector = LineCollector {
        path,
        matcher,
        opts,
        records: Vec::new(),
    };
    let size = meta.len();
    if size == 0 {
        return Ok(collector.records);
    }

    if size >= ScanConsts::MMAP_THRESHOLD {
        log::trace!("mmap scan: {} ({} bytes)", path.display(), size);
        let mmap = unsafe { Mmap::map(&file)? };
        let data: &[u8] = &mmap;
        // A trailing newline ends the last line; it does not start another.
        let data = data.strip_suffix(b"\n").unwrap_or(data);
        for (idx, raw) in data.split(|&b| b == b'\n').enumerate() {
            if cancel.load(Ordering::Relaxed) || !collector.push_line(idx + 1, raw) {
                break;
            }
        }
    } else {
        let mut reader = BufReader::with_capacity(ScanConsts::READ_BUFFER_SIZE, file);
        let mut buf = Vec::with_capacity(ScanConsts::LINE_BUFFER_SIZE);
        let mut line_number = 0_usize;
        loop {
            if cancel.load(Ordering::Relaxed) {
                break;
            }
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            line_number += 1;
            let raw = buf.strip_suffix(b"\n").unwrap_or(&buf);
            if !collector.push_line(line_number, raw) {
                break;
            }
        }
    }
    Ok(collector.records)
}
