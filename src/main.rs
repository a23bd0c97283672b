//! super-grep CLI: search file names or contents for a term in any naming convention.

use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;
use std::time::Instant;
use super_grep::engine::arg_parser::Cli;
use super_grep::engine::handle_run;

fn main() -> Result<ExitCode> {
    let start_time = Instant::now();
    let cli = Cli::parse();
    let code = handle_run(&cli)?;
    log::debug!("Total time: {:?}", start_time.elapsed());
    Ok(code)
}
