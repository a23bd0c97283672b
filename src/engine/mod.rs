//! Engine: term matching, per-file scanning, output formatting, CLI.

pub mod arg_parser;
pub mod cli;
pub mod matcher;
pub mod output;
pub mod scan;
pub mod tokenizer;
pub mod tools;

// Re-export commonly used items
pub use arg_parser::Cli;
pub use cli::handle_run;
pub use matcher::{Matcher, compile};
pub use output::{NO_MATCHES_MESSAGE, OutputStyle, StdoutSink, display_path, format_record};
pub use scan::{ScanError, ScanOutcome, scan_candidate};
pub use tokenizer::{Token, tokenize};
pub use tools::{check_search_root, glob_match, should_include_in_walk};
