use super::Config;
use crate::Result;

/// Command-line values that replace what the config file says.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub serial: Option<String>,
    pub adb: Option<String>,
    pub scan_interval_ms: Option<u64>,
    pub notify_interval_ms: Option<u64>,
    /// Replaces the configured keywords entirely when non-empty.
    pub keywords: Vec<String>,
    pub max_taps: Option<u64>,
    pub dry_run: bool,
    pub no_wait: bool,
    pub no_notify: bool,
}

impl Config {
    /// Apply overrides, then re-validate.
    pub fn apply(&mut self, overrides: &Overrides) -> Result<()> {
        if let Some(ref serial) = overrides.serial {
            self.device.serial = Some(serial.clone());
        }
        if let Some(ref adb) = overrides.adb {
            self.device.adb = adb.clone();
        }
        if let Some(ms) = overrides.scan_interval_ms {
            self.scan_interval_ms = ms;
        }
        if let Some(ms) = overrides.notify_interval_ms {
            self.notify.interval_ms = ms;
        }
        if !overrides.keywords.is_empty() {
            self.keywords = overrides.keywords.clone();
        }
        if let Some(n) = overrides.max_taps {
            self.max_taps = n;
        }
        if overrides.dry_run {
            self.dry_run = true;
        }
        if overrides.no_wait {
            self.wait_ready = false;
        }
        if overrides.no_notify {
            self.notify.enabled = false;
        }
        self.validate()
    }
}
