use std::path::Path;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use tokio::process::Command;
use tracing::info;

/// Icon shipped next to the binary, used unless `--icon` says otherwise.
pub const DEFAULT_ICON: &str = "assets/information.png";

#[async_trait]
pub trait Notifier {
    /// Deliver one notification. Returns once delivery finished; an error
    /// means it was not delivered.
    async fn notify(&self, title: &str, body: &str, icon: &Path) -> Result<()>;
}

/// Desktop notifications through the `notify-send` command.
pub struct DesktopNotifier;

#[async_trait]
impl Notifier for DesktopNotifier {
    async fn notify(&self, title: &str, body: &str, icon: &Path) -> Result<()> {
        let status = Command::new("notify-send")
            .arg("--icon")
            .arg(icon)
            .arg(title)
            .arg(body)
            .status()
            .await
            .context("Failed to run notify-send")?;

        if !status.success() {
            bail!("notify-send exited with {}", status);
        }
        Ok(())
    }
}

/// Writes notifications to the log instead of the desktop.
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, title: &str, body: &str, _icon: &Path) -> Result<()> {
        info!(title, body = body.trim_end(), "Notification");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn log_notifier_never_fails() {
        LogNotifier
            .notify("New job", "Country: Germany\n", Path::new(DEFAULT_ICON))
            .await
            .unwrap();
    }
}
