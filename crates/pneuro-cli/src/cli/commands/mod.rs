//! CLI command handlers, one per file.

mod checksum;
mod get;
mod stat;

pub use checksum::run_checksum;
pub use get::run_get;
pub use stat::run_stat;
