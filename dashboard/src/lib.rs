//! Terminal front end for the user-management dashboard.
//!
//! Wires `users_core` to a blocking `ureq` transport and drives it from a
//! line-oriented command loop.

pub mod commands;
pub mod config;
pub mod console;
pub mod repl;
pub mod transport;

pub use config::Cli;
pub use console::Console;
pub use transport::UreqTransport;
