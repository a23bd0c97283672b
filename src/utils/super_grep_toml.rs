//! Load `.super-grep.toml` from the search root (CLI only). Lib callers pass [`SearchOpts`](crate::SearchOpts) directly.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::num::NonZeroUsize;
use std::path::Path;

use crate::utils::config::PackagePaths;
use crate::{MaxDepth, Opts, ScanMode};

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct SuperGrepToml {
    #[serde(default)]
    settings: SearchSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct SearchSection {
    workers: Option<NonZeroUsize>,
    depth: Option<i64>,
    filenames_only: Option<bool>,
    color: Option<bool>,
    stop_on_first_match: Option<bool>,
    hide_path: Option<bool>,
    files_with_matches: Option<bool>,
    exclude: Option<Vec<String>>,
    follow_links: Option<bool>,
    parallel_walk: Option<bool>,
    verbose: Option<bool>,
}

/// Load the settings file from `dir` if present. A missing file is `Ok(None)`; a malformed one is a configuration error.
pub(crate) fn load_super_grep_toml(dir: &Path) -> Result<Option<SuperGrepToml>> {
    let path = dir.join(PackagePaths::get().config_filename());
    let s = match std::fs::read_to_string(&path) {
        Ok(s) => s,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e).with_context(|| format!("read {}", path.display())),
    };
    let parsed = toml::from_str(&s).with_context(|| format!("parse {}", path.display()))?;
    Ok(Some(parsed))
}

/// Overwrite opts field from file when present.
macro_rules! apply_file_opt {
    ($idx:expr, $opts:expr, $idx_field:ident => $($opts_field:ident).+) => {
        if let Some(v) = $idx.$idx_field {
            $opts.$($opts_field).+ = v;
        }
    };
}

/// Apply file config to opts (only fields present in the file). Call before applying CLI.
pub(crate) fn apply_file_to_opts(file: &SuperGrepToml, opts: &mut Opts) -> Result<()> {
    let idx = &file.settings;
    if let Some(n) = idx.workers {
        opts.search.num_workers = Some(n);
    }
    if let Some(d) = idx.depth {
        opts.search.max_depth =
            MaxDepth::from_signed(d).context("settings.depth in config file")?;
    }
    if let Some(filenames_only) = idx.filenames_only {
        opts.search.mode = if filenames_only {
            ScanMode::FilenameOnly
        } else {
            ScanMode::Contents
        };
    }
    apply_file_opt!(idx, opts, color => output.colorize);
    apply_file_opt!(idx, opts, hide_path => output.hide_path);
    apply_file_opt!(idx, opts, stop_on_first_match => search.stop_on_first_match);
    apply_file_opt!(idx, opts, files_with_matches => search.files_with_matches);
    apply_file_opt!(idx, opts, follow_links => search.follow_links);
    apply_file_opt!(idx, opts, parallel_walk => search.parallel_walk);
    apply_file_opt!(idx, opts, verbose => verbose);
    if let Some(ref v) = idx.exclude {
        opts.search.exclude = v.clone();
    }
    Ok(())
}
