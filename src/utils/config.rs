//! Application configuration constants.
//! Tuning and thresholds in one place.

use std::num::NonZeroUsize;
use std::sync::OnceLock;

// ---- Package / paths (from CARGO_PKG_NAME, cached) ----

/// Package-derived names: built once from `CARGO_PKG_NAME`, then cached.
pub struct PackagePaths {
    pkg_name: &'static str,
    config_filename: String,
}

static PACKAGE_PATHS: OnceLock<PackagePaths> = OnceLock::new();

impl PackagePaths {
    /// Build and cache names from `CARGO_PKG_NAME`. Called once on first use.
    pub fn get() -> &'static PackagePaths {
        PACKAGE_PATHS.get_or_init(|| {
            let pkg = env!("CARGO_PKG_NAME");
            PackagePaths {
                pkg_name: pkg,
                config_filename: format!(".{pkg}.toml"),
            }
        })
    }

    pub fn pkg_name(&self) -> &str {
        self.pkg_name
    }

    /// Optional settings file looked up in the search root (e.g. `.super-grep.toml`).
    pub fn config_filename(&self) -> &str {
        &self.config_filename
    }
}

// ---- Worker threads ----

/// Worker count limits for the scan pool.
#[derive(Clone, Copy, Debug)]
pub struct WorkerThreadLimits {
    /// Host parallelism (from rayon); set by [`WorkerThreadLimits::current()`].
    pub all_threads: usize,
    /// Floor when host parallelism is unknown.
    pub floor: usize,
}

impl Default for WorkerThreadLimits {
    fn default() -> Self {
        Self {
            all_threads: 0, // use current() to set from rayon
            floor: Self::FLOOR_THREADS,
        }
    }
}

impl WorkerThreadLimits {
    pub const FLOOR_THREADS: usize = 1;

    /// Build limits with `all_threads` set from `rayon::current_num_threads()`.
    pub fn current() -> Self {
        Self {
            all_threads: rayon::current_num_threads(),
            ..Self::default()
        }
    }

    /// Default worker count: host parallelism, never below the floor.
    pub fn default_workers(&self) -> NonZeroUsize {
        NonZeroUsize::new(self.all_threads.max(self.floor)).unwrap_or(NonZeroUsize::MIN)
    }
}

// ---- Scanning ----

/// File reading strategy thresholds and buffer sizes.
pub struct ScanConsts;

impl ScanConsts {
    /// File size at or above which content scans memory-map the file (bytes). 8 MB.
    pub const MMAP_THRESHOLD: u64 = 8 * 1024 * 1024;
    /// Buffered reader capacity for smaller files (bytes). 64 KB.
    pub const READ_BUFFER_SIZE: usize = 64 * 1024;
    /// Initial capacity of the per-line byte buffer.
    pub const LINE_BUFFER_SIZE: usize = 256;
}

// ---- Channels ----

/// Result queue capacity in per-file batches. The path queue is unbounded: the walk fills it
/// completely before any worker starts.
pub const RESULT_CHANNEL_CAP: usize = 1024;
