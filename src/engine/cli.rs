//! CLI command handler: merge settings, wire Ctrl+C, stream results to stdout.

use anyhow::Result;
use log::debug;
use std::io;
use std::process::ExitCode;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::engine::arg_parser::Cli;
use crate::engine::output::StdoutSink;
use crate::utils::config::PackagePaths;
use crate::utils::setup_logging;
use crate::utils::super_grep_toml::{apply_file_to_opts, load_super_grep_toml};
use crate::{CancelFlag, MaxDepth, Opts, ScanMode, Summary, search_dir_with_cancel};

/// Conventional exit status after SIGINT.
pub const EXIT_INTERRUPTED: u8 = 130;

/// Build opts: defaults, then `.super-grep.toml` in the search root, then CLI flags.
/// Returns whether a settings file was applied.
pub fn setup_opts(cli: &Cli) -> Result<(Opts, bool)> {
    let mut opts = Opts::default();
    let file = load_super_grep_toml(&cli.directory)?;
    if let Some(ref file) = file {
        apply_file_to_opts(file, &mut opts)?;
    }
    apply_cli_to_opts(cli, &mut opts)?;
    Ok((opts, file.is_some()))
}

fn apply_cli_to_opts(cli: &Cli, opts: &mut Opts) -> Result<()> {
    if let Some(n) = cli.workers {
        opts.search.num_workers = Some(n);
    }
    if let Some(d) = cli.depth {
        opts.search.max_depth = MaxDepth::from_signed(d)?;
    }
    if let Some(filenames_only) = cli.filenames_only {
        opts.search.mode = if filenames_only {
            ScanMode::FilenameOnly
        } else {
            ScanMode::Contents
        };
    }
    if !cli.exclude.is_empty() {
        opts.search.exclude.extend(cli.exclude.iter().cloned());
    }
    opts.output.colorize = cli.color.unwrap_or(opts.output.colorize);
    opts.output.hide_path = cli.hide_path.unwrap_or(opts.output.hide_path);
    opts.search.stop_on_first_match = cli
        .stop_on_first_match
        .unwrap_or(opts.search.stop_on_first_match);
    opts.search.files_with_matches = cli
        .files_with_matches
        .unwrap_or(opts.search.files_with_matches);
    opts.search.follow_links = cli.follow_links.unwrap_or(opts.search.follow_links);
    opts.search.parallel_walk = cli.parallel_walk.unwrap_or(opts.search.parallel_walk);
    opts.verbose = cli.verbose.unwrap_or(opts.verbose);
    Ok(())
}

/// Install the Ctrl+C handler: set the shared flag so the walk and workers stop at their next check.
fn install_interrupt_handler(cancel: &CancelFlag) -> Result<()> {
    let flag = Arc::clone(cancel);
    ctrlc::set_handler(move || {
        if !flag.swap(true, Ordering::SeqCst) {
            eprintln!("\nInterrupted by user. Stopping gracefully...");
        }
    })?;
    Ok(())
}

/// True when the error chain ends in a closed stdout.
fn is_broken_pipe(err: &anyhow::Error) -> bool {
    err.chain()
        .filter_map(|e| e.downcast_ref::<io::Error>())
        .any(|e| e.kind() == io::ErrorKind::BrokenPipe)
}

/// Map a finished search to the process exit status: 130 after an interrupt, 0 on completion
/// or a closed stdout. Other errors are passed through.
fn exit_status(outcome: Result<Summary>) -> Result<u8> {
    match outcome {
        Ok(summary) if summary.cancelled => Ok(EXIT_INTERRUPTED),
        Ok(_) => Ok(0),
        Err(e) if is_broken_pipe(&e) => {
            debug!("stdout closed; stopping");
            Ok(0)
        }
        Err(e) => Err(e),
    }
}

/// Run one search and map the outcome to an exit status.
pub fn handle_run(cli: &Cli) -> Result<ExitCode> {
    let (opts, from_file) = setup_opts(cli)?;
    setup_logging(opts.verbose);
    if from_file {
        debug!(
            "Loaded settings from {}",
            cli.directory
                .join(PackagePaths::get().config_filename())
                .display()
        );
    }

    let cancel: CancelFlag = Arc::new(AtomicBool::new(false));
    install_interrupt_handler(&cancel)?;

    let mut sink = StdoutSink::new(opts.output);
    debug!("Searching {} for {:?}", cli.directory.display(), cli.pattern);
    let outcome =
        search_dir_with_cancel(&cli.directory, &cli.pattern, &opts.search, &mut sink, &cancel);
    Ok(ExitCode::from(exit_status(outcome)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::num::NonZeroUsize;
    use tempfile::tempdir;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("super-grep").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_cli_defaults() {
        let dir = tempdir().unwrap();
        let root = dir.path().to_str().unwrap();
        let (opts, from_file) = setup_opts(&parse(&[root, "x"])).unwrap();
        assert!(!from_file);
        assert_eq!(opts.search.max_depth, MaxDepth::Bounded(0));
        assert_eq!(opts.search.mode, ScanMode::Contents);
        assert!(!opts.output.colorize);
        assert!(opts.search.num_workers.is_none());
    }

    #[test]
    fn test_cli_overrides_file() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join(".super-grep.toml"),
            "[settings]\ndepth = 3\ncolor = true\nworkers = 2\nexclude = [\"target\"]\n",
        )
        .unwrap();
        let root = dir.path().to_str().unwrap();
        let (opts, from_file) =
            setup_opts(&parse(&[root, "x", "-d", "-1", "--color=false", "-e", "*.log"])).unwrap();
        assert!(from_file);
        assert_eq!(opts.search.max_depth, MaxDepth::Unbounded);
        assert!(!opts.output.colorize);
        assert_eq!(opts.search.num_workers, NonZeroUsize::new(2));
        assert_eq!(opts.search.exclude, vec!["target", "*.log"]);
    }

    #[test]
    fn test_bad_depth_is_config_error() {
        let dir = tempdir().unwrap();
        let root = dir.path().to_str().unwrap();
        assert!(setup_opts(&parse(&[root, "x", "-d", "-2"])).is_err());
    }

    #[test]
    fn test_broken_pipe_detected_through_context() {
        let err = anyhow::Error::new(io::Error::from(io::ErrorKind::BrokenPipe)).context("write");
        assert!(is_broken_pipe(&err));
        assert!(!is_broken_pipe(&anyhow::anyhow!("other")));
    }

    #[test]
    fn test_exit_status_mapping() {
        let done = Summary::default();
        let interrupted = Summary {
            cancelled: true,
            ..Summary::default()
        };
        assert_eq!(exit_status(Ok(done)).unwrap(), 0);
        assert_eq!(exit_status(Ok(interrupted)).unwrap(), EXIT_INTERRUPTED);

        let closed = anyhow::Error::new(io::Error::from(io::ErrorKind::BrokenPipe))
            .context("write search results");
        assert_eq!(exit_status(Err(closed)).unwrap(), 0);
        assert!(exit_status(Err(anyhow::anyhow!("bad root"))).is_err());
    }
}
