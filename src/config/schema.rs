use crate::keywords::KeywordSet;
use crate::{Error, Result};
use serde::Deserialize;
use skiptap_adb::AdbConfig;
use std::path::Path;
use std::time::Duration;

const DEFAULT_KEYWORDS: &[&str] = &[
    "skip",
    "пропустить",
    "skip ad",
    "skip ads",
    "close",
    "закрыть",
];

/// Top-level config structure.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Name shown in logs and `--check` output.
    #[serde(default = "default_name")]
    pub name: String,

    /// Keywords matched against text, description and resource id.
    #[serde(default = "default_keywords")]
    pub keywords: Vec<String>,

    /// Delay between scan cycles in milliseconds.
    #[serde(default = "default_scan_interval_ms")]
    pub scan_interval_ms: u64,

    /// Stop after this many taps (0 = run until interrupted).
    #[serde(default)]
    pub max_taps: u64,

    /// Log the tap coordinates without tapping.
    #[serde(default)]
    pub dry_run: bool,

    /// Block until the device has booted before the first scan.
    #[serde(default = "default_true")]
    pub wait_ready: bool,

    /// Notification settings.
    #[serde(default)]
    pub notify: NotifyConfig,

    /// Device connection.
    #[serde(default)]
    pub device: DeviceConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            name: default_name(),
            keywords: default_keywords(),
            scan_interval_ms: default_scan_interval_ms(),
            max_taps: 0,
            dry_run: false,
            wait_ready: true,
            notify: NotifyConfig::default(),
            device: DeviceConfig::default(),
        }
    }
}

impl Config {
    /// Load config from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::parse(&content)
    }

    /// Parse config from a YAML string.
    pub fn parse(yaml: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the config.
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(Error::Config("name must not be empty".into()));
        }
        if self.keyword_set().is_empty() {
            return Err(Error::Config(
                "at least one non-empty keyword is required".into(),
            ));
        }
        if self.scan_interval_ms == 0 {
            return Err(Error::Config(
                "scan_interval_ms must be greater than 0".into(),
            ));
        }
        if self.notify.enabled && self.notify.message.trim().is_empty() {
            return Err(Error::Config(
                "notify.message must not be empty when notifications are enabled".into(),
            ));
        }
        Ok(())
    }

    /// Normalized keywords.
    pub fn keyword_set(&self) -> KeywordSet {
        KeywordSet::new(&self.keywords)
    }

    pub fn scan_interval(&self) -> Duration {
        Duration::from_millis(self.scan_interval_ms)
    }
}

/// User-visible notification settings.
#[derive(Debug, Clone, Deserialize)]
pub struct NotifyConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Minimum spacing between notifications in milliseconds.
    #[serde(default = "default_notify_interval_ms")]
    pub interval_ms: u64,

    /// Text shown when a cycle ends without a tap.
    #[serde(default = "default_notify_message")]
    pub message: String,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_ms: default_notify_interval_ms(),
            message: default_notify_message(),
        }
    }
}

impl NotifyConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

/// ADB connection settings.
#[derive(Debug, Clone, Deserialize)]
pub struct DeviceConfig {
    /// Path to the adb executable.
    #[serde(default = "default_adb")]
    pub adb: String,

    /// Device serial (if multiple devices).
    pub serial: Option<String>,

    /// Where `uiautomator dump` writes on the device.
    pub dump_path: Option<String>,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            adb: default_adb(),
            serial: None,
            dump_path: None,
        }
    }
}

impl DeviceConfig {
    pub fn adb_config(&self) -> AdbConfig {
        let mut config = AdbConfig::new().adb(self.adb.clone());
        if let Some(ref serial) = self.serial {
            config = config.serial(serial.clone());
        }
        if let Some(ref path) = self.dump_path {
            config = config.dump_path(path.clone());
        }
        config
    }
}

fn default_name() -> String {
    "skiptap".into()
}

fn default_keywords() -> Vec<String> {
    DEFAULT_KEYWORDS.iter().map(|k| k.to_string()).collect()
}

fn default_scan_interval_ms() -> u64 {
    1000
}

fn default_notify_interval_ms() -> u64 {
    5000
}

fn default_notify_message() -> String {
    "No skip button found".into()
}

fn default_adb() -> String {
    "adb".into()
}

fn default_true() -> bool {
    true
}
