use clap::Parser;
use std::num::NonZeroUsize;
use std::path::PathBuf;

const AFTER_HELP: &str = "\
Recommendation: include -C for prettier output unless you are piping the results.

Examples:
  Search only in the given directory:
    super-grep /path/to/search FooBar

  Search up to 2 levels deep:
    super-grep /path/to/search first_name -d 2

  Search all subdirectories:
    super-grep /path/to/search first_name -d -1

  Search file names only, 3 levels deep, with colored output:
    super-grep /path/to/search FooBar -f -d 3 -C

  Use 8 worker threads:
    super-grep /path/to/search FooBar -w 8

  Hide the directory path in the output:
    super-grep /path/to/search getValueFromSection -H

  Stop scanning each file after its first match:
    super-grep /path/to/search getValueFromSection -H -s

Settings can also be stored in a .super-grep.toml file in the searched directory
under a [settings] table; command line flags override it.";

/// Format-agnostic search: `fooBar` also finds `foo_bar`, `foo-bar`, `foo bar` and `FooBar`.
#[derive(Clone, Parser)]
#[command(name = "super-grep", version)]
#[command(about = "Search file names or contents for a term in any naming convention.")]
#[command(after_help = AFTER_HELP)]
pub struct Cli {
    /// Directory to search in.
    #[arg(value_name = "DIRECTORY")]
    pub directory: PathBuf,

    /// Search term. Split into words on case changes, digits, `-`, `_` and whitespace.
    #[arg(value_name = "PATTERN")]
    pub pattern: String,

    /// Number of worker threads. Default: CPU count.
    #[arg(long, short = 'w')]
    pub workers: Option<NonZeroUsize>,

    /// Search only within file names (default: search file contents).
    #[arg(long, short = 'f', num_args = 0..=1, require_equals = true, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub filenames_only: Option<bool>,

    /// Colorize the output.
    #[arg(long = "color", short = 'C', num_args = 0..=1, require_equals = true, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub color: Option<bool>,

    /// Depth of directory search. Default: 0, only the given directory; -1 for unlimited.
    #[arg(long, short = 'd', allow_negative_numbers = true, value_parser = clap::value_parser!(i64))]
    pub depth: Option<i64>,

    /// Stop searching a file after the first match is found.
    #[arg(long, short = 's', num_args = 0..=1, require_equals = true, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub stop_on_first_match: Option<bool>,

    /// Hide the directory path, showing only the file name.
    #[arg(long, short = 'H', num_args = 0..=1, require_equals = true, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub hide_path: Option<bool>,

    /// Only print the names of files containing matches, not the matched lines.
    #[arg(long, short = 'l', num_args = 0..=1, require_equals = true, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub files_with_matches: Option<bool>,

    /// Exclude patterns (glob syntax). Can specify multiple: -e pattern1 pattern2 pattern3
    #[arg(long, short = 'e', num_args = 1..)]
    pub exclude: Vec<String>,

    /// Descend into symlinked directories.
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub follow_links: Option<bool>,

    /// Walk the tree with a parallel walker (helps on large or network trees).
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub parallel_walk: Option<bool>,

    /// Verbose output (debug logging, per-path diagnostics).
    #[arg(long, short = 'v', num_args = 0..=1, require_equals = true, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub verbose: Option<bool>,
}
