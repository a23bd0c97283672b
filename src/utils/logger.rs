use colored::Colorize;
use env_logger::{Builder, Target};
use log::Level;
use std::io::Write;

use crate::utils::config::PackagePaths;

/// Install the stderr logger for the binary. The library never calls this.
pub fn setup_logging(verbose: bool) {
    use log::LevelFilter;

    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    let _ = Builder::from_default_env()
        .target(Target::Stderr)
        .filter_level(LevelFilter::Warn) // Default: only warnings from dependencies
        .filter_module(env!("CARGO_CRATE_NAME"), level) // Our crate: use requested level
        .format(|buf, record| {
            let name = PackagePaths::get().pkg_name();
            let line = match record.level() {
                Level::Error | Level::Warn => {
                    let level_str = match record.level() {
                        Level::Warn => "WARN".yellow(),
                        _ => "ERROR".red(),
                    };
                    let path = record.target().to_string().white();
                    format!("[{} {} {}] {}", name.cyan(), level_str, path, record.args())
                }
                _ => format!("[{}] {}", name.cyan(), record.args()),
            };
            writeln!(buf, "{}", line)
        })
        .try_init();
}
