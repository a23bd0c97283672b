//! Public and internal types for the super-grep API and pipeline.

use std::io;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use anyhow::{Result, bail};

use crate::engine::output::OutputStyle;

/// Shared cancellation token. Set it to stop the walk and the workers; output already queued is still delivered.
pub type CancelFlag = Arc<AtomicBool>;

/// `(path, reason)` pairs collected during a run (skipped subtrees, failed scans).
pub type Diagnostics = Arc<std::sync::Mutex<Vec<(PathBuf, String)>>>;

/// A file discovered by the walk. `depth` is the depth of its parent directory (root = 0).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Candidate {
    pub path: PathBuf,
    pub depth: usize,
}

/// One unit of reported output.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResultRecord {
    /// File name matched (filename-only mode).
    FilenameMatch { path: PathBuf },
    /// A line matched. `line_number` is 1-based, `line_text` is trimmed.
    ContentMatch {
        path: PathBuf,
        line_number: usize,
        line_text: String,
    },
    /// File has at least one match; lines are not reported (`files_with_matches`).
    MatchedFileOnly { path: PathBuf },
}

impl ResultRecord {
    pub fn path(&self) -> &Path {
        match self {
            ResultRecord::FilenameMatch { path }
            | ResultRecord::ContentMatch { path, .. }
            | ResultRecord::MatchedFileOnly { path } => path,
        }
    }
}

/// How deep the walk may go. Files in a directory at depth `d` are candidates when `d <= max`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MaxDepth {
    /// Only the given directory (depth 0) unless a larger bound is set.
    Bounded(usize),
    #[default]
    Unbounded,
}

impl MaxDepth {
    /// CLI sentinel for "no limit".
    pub const UNBOUNDED_SENTINEL: i64 = -1;

    /// Parse the CLI/config form: `-1` is unbounded, any other negative is a configuration error.
    pub fn from_signed(depth: i64) -> Result<Self> {
        match depth {
            Self::UNBOUNDED_SENTINEL => Ok(MaxDepth::Unbounded),
            d if d < 0 => bail!("invalid depth {d}: use a non-negative number or -1 for unlimited"),
            d => Ok(MaxDepth::Bounded(d as usize)),
        }
    }

    /// True if files inside a directory at `dir_depth` are in range.
    pub fn allows(&self, dir_depth: usize) -> bool {
        match self {
            MaxDepth::Bounded(max) => dir_depth <= *max,
            MaxDepth::Unbounded => true,
        }
    }

    /// Entry depth limit for walkers that count the root's children as depth 1.
    pub fn walk_limit(&self) -> Option<usize> {
        match self {
            MaxDepth::Bounded(max) => Some(max.saturating_add(1)),
            MaxDepth::Unbounded => None,
        }
    }
}

/// Whether workers test file names or file contents.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ScanMode {
    FilenameOnly,
    #[default]
    Contents,
}

/// Lib options for [`search_dir`](crate::search_dir). Everything the core needs; no output styling.
#[derive(Clone, Debug, Default)]
pub struct SearchOpts {
    /// Worker count. When None, host parallelism (capped by the open-file limit).
    pub num_workers: Option<NonZeroUsize>,
    /// Filename-only or content search.
    pub mode: ScanMode,
    /// Depth bound for the walk.
    pub max_depth: MaxDepth,
    /// Stop scanning a file after its first matching line.
    pub stop_on_first_match: bool,
    /// Report each matching file once, without lines.
    pub files_with_matches: bool,
    /// Descend into symlinked directories.
    pub follow_links: bool,
    /// Walk with jwalk (parallel) instead of walkdir (serial).
    pub parallel_walk: bool,
    /// Exclude patterns (glob syntax, e.g. `node_modules`, `*.min.js`).
    pub exclude: Vec<String>,
}

/// Full options (CLI). Use [`SearchOpts`] for lib.
#[derive(Clone, Debug)]
pub struct Opts {
    pub search: SearchOpts,
    pub output: OutputStyle,
    /// Debug logging and per-path diagnostics.
    pub verbose: bool,
}

impl Default for Opts {
    fn default() -> Self {
        Opts {
            search: SearchOpts {
                // The CLI searches only the given directory unless told otherwise.
                max_depth: MaxDepth::Bounded(0),
                ..SearchOpts::default()
            },
            output: OutputStyle::default(),
            verbose: false,
        }
    }
}

/// Receives records as the aggregator drains them. Called from the coordinating thread only.
pub trait RecordSink {
    /// Deliver one record. An error stops the search (e.g. stdout closed).
    fn emit(&mut self, record: &ResultRecord) -> io::Result<()>;

    /// Called once after the pool finishes when nothing was emitted.
    fn no_matches(&mut self) -> io::Result<()>;
}

impl RecordSink for Vec<ResultRecord> {
    fn emit(&mut self, record: &ResultRecord) -> io::Result<()> {
        self.push(record.clone());
        Ok(())
    }

    fn no_matches(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Counters for one finished run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Summary {
    /// Records delivered to the sink.
    pub records_emitted: usize,
    /// Candidates the walk produced.
    pub candidates: usize,
    /// Candidates a worker picked up.
    pub files_scanned: usize,
    /// Files that could not be opened or read.
    pub scan_failures: usize,
    /// Walk errors (permission denied, broken links).
    pub skipped_paths: usize,
    /// The run was interrupted.
    pub cancelled: bool,
}

impl Summary {
    pub fn any_matches(&self) -> bool {
        self.records_emitted > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_depth_sentinel_is_unbounded() {
        assert_eq!(MaxDepth::from_signed(-1).unwrap(), MaxDepth::Unbounded);
        assert_eq!(MaxDepth::from_signed(0).unwrap(), MaxDepth::Bounded(0));
        assert_eq!(MaxDepth::from_signed(3).unwrap(), MaxDepth::Bounded(3));
    }

    #[test]
    fn test_max_depth_rejects_other_negatives() {
        assert!(MaxDepth::from_signed(-2).is_err());
        assert!(MaxDepth::from_signed(i64::MIN).is_err());
    }

    #[test]
    fn test_max_depth_allows() {
        assert!(MaxDepth::Bounded(1).allows(0));
        assert!(MaxDepth::Bounded(1).allows(1));
        assert!(!MaxDepth::Bounded(1).allows(2));
        assert!(MaxDepth::Unbounded.allows(usize::MAX));
        assert_eq!(MaxDepth::Bounded(0).walk_limit(), Some(1));
        assert_eq!(MaxDepth::Unbounded.walk_limit(), None);
    }

    #[test]
    fn test_record_path() {
        let r = ResultRecord::ContentMatch {
            path: PathBuf::from("a/b.py"),
            line_number: 3,
            line_text: "x".into(),
        };
        assert_eq!(r.path(), Path::new("a/b.py"));
    }
}
