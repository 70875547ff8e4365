//! rsync-over-SSH plumbing: the job list, the SSH transport, argument
//! construction, and the process runner.

pub mod invocation;
pub mod job;
pub mod runner;
pub mod transport;

pub use invocation::{RsyncInvocation, RunMode};
pub use job::{default_jobs, SyncJob};
pub use runner::{run_pass, JobOutcome, PassSummary, RsyncRunner, SyncRunner};
pub use transport::{Destination, RemoteShell};
