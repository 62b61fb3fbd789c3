//! # skiptap
//!
//! Watches an Android screen over ADB and taps the first clickable element
//! whose text, description or resource id contains one of the configured
//! keywords ("skip", "close", ...).
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use skiptap::{AdbHost, Config, Runner};
//!
//! # #[tokio::main]
//! # async fn main() -> skiptap::Result<()> {
//! let config = Config::load("skiptap.yaml")?;
//! let host = AdbHost::new(config.device.adb_config());
//! let mut runner = Runner::new(host, &config);
//! let result = runner.run().await?;
//! println!("taps: {}", result.taps);
//! # Ok(())
//! # }
//! ```

mod config;
mod host;
mod keywords;
mod runner;

pub use config::{Config, DeviceConfig, NotifyConfig, Overrides};
pub use host::{AdbHost, Host};
pub use keywords::{has_keyword, KeywordSet};
pub use runner::dispatch::click_node;
pub use runner::notifier::Notifier;
pub use runner::scanner::{find_match, matches, scan};
pub use runner::{CycleOutcome, RunResult, Runner};
pub use skiptap_adb::{Bounds, Node};

/// Result type for skiptap operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during config loading or a scan cycle.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("yaml parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("device error: {0}")]
    Device(#[from] skiptap_adb::Error),

    #[error("host error: {0}")]
    Host(String),
}
