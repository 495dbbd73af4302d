//! CLI module
//!
//! Command-line front-end over the session service and list fetchers.
//!
//! # Commands
//!
//! - `whoami`, `profile`, `update-profile` - the signed-in account
//! - `search`, `mine` - paginated restaurant lists
//! - `add` - submit a restaurant
//! - `register`, `forgot`, `reset`, `logout` - account lifecycle
//! - `route` - evaluate the redirect policy for a path

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::Runner;
