//! Showing a finished log to the user.

use std::path::Path;

use tokio::process::Command;
use tracing::{debug, instrument};

/// Something that can display a log file.
#[allow(async_fn_in_trait)]
pub trait LogViewer {
    async fn show(&self, path: &Path) -> std::io::Result<()>;
}

/// Runs a pager program (e.g. `less`, `less -R`) on the log file and waits
/// for it to exit. With no command configured, showing is a no-op.
#[derive(Debug, Clone, Default)]
pub struct PagerViewer {
    command: Option<String>,
}

impl PagerViewer {
    pub fn new(command: Option<String>) -> Self {
        Self { command }
    }

    pub fn disabled() -> Self {
        Self { command: None }
    }
}

impl LogViewer for PagerViewer {
    #[instrument(skip(self), fields(path = %path.display()))]
    async fn show(&self, path: &Path) -> std::io::Result<()> {
        let Some(command) = self.command.as_deref() else {
            debug!("pager disabled");
            return Ok(());
        };

        let mut parts = command.split_whitespace();
        let program = parts.next().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "empty pager command")
        })?;

        let status = Command::new(program).args(parts).arg(path).status().await?;
        if status.success() {
            Ok(())
        } else {
            Err(std::io::Error::new(
                std::io::ErrorKind::Other,
                format!("{} exited with {}", program, status),
            ))
        }
    }
}
