//! CLI subcommand implementations.

pub mod generate;
pub mod schedule;
pub mod status;
pub mod util;
pub mod watch;
