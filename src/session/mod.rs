//! Session module
//!
//! The session service replaces a process-wide client singleton: callers
//! build one `Session` from injected backend services, call `init` once, and
//! pass `SessionState` snapshots to list fetchers and the redirect policy.

mod provider;
mod types;

pub use provider::Session;
pub use types::{SessionSettings, SessionState};

#[cfg(test)]
mod tests;
