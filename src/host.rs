//! The automation surface the runner drives.

use crate::Result;
use async_trait::async_trait;
use skiptap_adb::{AdbConfig, Device, Node};
use tracing::{debug, info};

/// Tag for the notification skiptap posts, so each post replaces the last.
const NOTIFICATION_TAG: &str = "skiptap";

/// Host operations used by a scan cycle.
#[async_trait]
pub trait Host: Send + Sync {
    /// Block until the automation surface is available.
    async fn wait_ready(&self) -> Result<()>;

    /// Snapshot of the currently clickable elements, in host order.
    async fn clickable_nodes(&self) -> Result<Vec<Node>>;

    /// Native click on the element. `Ok(false)` means it failed or is not
    /// supported.
    async fn click(&self, _node: &Node) -> Result<bool> {
        Ok(false)
    }

    /// Synthetic tap at screen coordinates.
    async fn tap(&self, x: i32, y: i32) -> Result<bool>;

    /// Show a user-visible message.
    async fn toast(&self, message: &str) -> Result<()>;
}

/// [`Host`] backed by a device reached through `adb`.
///
/// ADB has no node-level click, so dispatch always taps by coordinates.
pub struct AdbHost {
    device: Device,
}

impl AdbHost {
    pub fn new(config: AdbConfig) -> Self {
        Self {
            device: Device::new(config),
        }
    }

    pub fn device(&self) -> &Device {
        &self.device
    }
}

#[async_trait]
impl Host for AdbHost {
    async fn wait_ready(&self) -> Result<()> {
        info!(
            "Waiting for device{}",
            self.device
                .config()
                .serial
                .as_deref()
                .map(|s| format!(" {}", s))
                .unwrap_or_default()
        );
        self.device.wait_for_device().await?;
        Ok(())
    }

    async fn clickable_nodes(&self) -> Result<Vec<Node>> {
        let nodes = self.device.nodes().await?;
        let total = nodes.len();
        let clickable: Vec<Node> = nodes.into_iter().filter(|n| n.clickable).collect();
        debug!("dump: {} nodes, {} clickable", total, clickable.len());
        Ok(clickable)
    }

    async fn tap(&self, x: i32, y: i32) -> Result<bool> {
        self.device.tap(x, y).await?;
        Ok(true)
    }

    async fn toast(&self, message: &str) -> Result<()> {
        self.device
            .notify(NOTIFICATION_TAG, "skiptap", message)
            .await?;
        Ok(())
    }
}
