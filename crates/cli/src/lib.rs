//! Shared terminal plumbing for the homeutils binaries.
//!
//! The core library talks to the user through `Prompter` and runs jobs
//! through `SyncRunner`; this crate provides the terminal-facing
//! implementations of both, plus styling, tables, and tracing setup.

pub mod logging;
pub mod progress;
pub mod report;
pub mod style;
pub mod terminal;
