//! CLI subcommand implementations.

pub mod add;
pub mod clock;
pub mod edit;
pub mod history;
pub mod resolve;
pub mod rm;
pub mod stats;
pub mod status;
pub mod util;
pub mod watch;
