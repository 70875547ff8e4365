//! homeutils core library.
//!
//! Building blocks for two small home-directory tools: the whitespace
//! filename normalizer and the rsync-over-SSH backup runner. Validation,
//! rename planning, route probing, rsync job execution, log placement,
//! configuration, and the backup workflow itself all live here so the
//! binaries stay thin.

pub mod backup;
pub mod config;
pub mod errors;
pub mod logs;
pub mod network;
pub mod pager;
pub mod prompt;
pub mod rename;
pub mod rsync;
pub mod validate;

// Re-exports for convenience.
pub use backup::{BackupOptions, BackupOutcome, BackupSettings, BackupWorkflow};
pub use config::BackupConfig;
pub use errors::CoreError;
pub use rename::{RenamePlan, RenameReport};
