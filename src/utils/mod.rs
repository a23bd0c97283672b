pub mod config;
pub mod fd_limit;
pub mod logger;
pub(crate) mod super_grep_toml;

pub use config::*;
pub use fd_limit::cap_workers_by_fd_limit;
pub use logger::setup_logging;
