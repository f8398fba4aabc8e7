//! CLI subcommand implementations.

pub mod analytics;
pub mod clock;
pub mod plan;
pub mod progress;
pub mod serve;
pub mod session;
pub mod util;
pub mod validate;
