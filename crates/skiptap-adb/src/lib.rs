//! Thin async wrapper around the `adb` executable: hierarchy dumps, taps and
//! notifications on a single Android device.

mod dump;

pub use dump::{parse_nodes, Bounds, Node};

use std::time::Duration;
use tokio::process::Command;
use tracing::debug;

/// How often `wait_for_device` re-checks `sys.boot_completed`.
const BOOT_POLL_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Clone)]
pub struct AdbConfig {
    pub adb: String,
    pub serial: Option<String>,
    pub dump_path: String,
}

impl Default for AdbConfig {
    fn default() -> Self {
        Self {
            adb: "adb".into(),
            serial: None,
            dump_path: "/sdcard/window_dump.xml".into(),
        }
    }
}

impl AdbConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn adb(mut self, path: impl Into<String>) -> Self {
        self.adb = path.into();
        self
    }

    pub fn serial(mut self, serial: impl Into<String>) -> Self {
        self.serial = Some(serial.into());
        self
    }

    pub fn dump_path(mut self, path: impl Into<String>) -> Self {
        self.dump_path = path.into();
        self
    }
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("adb command failed ({command}): {stderr}")]
    CommandFailed { command: String, stderr: String },
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("unexpected bounds: {0:?}")]
    Bounds(String),
    #[error("non UTF-8 output: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// A device reachable through `adb`.
#[derive(Debug, Clone)]
pub struct Device {
    config: AdbConfig,
}

impl Device {
    pub fn new(config: AdbConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AdbConfig {
        &self.config
    }

    /// Run `adb shell <args>` and return stdout.
    pub async fn shell(&self, args: &[&str]) -> Result<String> {
        let mut full = Vec::with_capacity(args.len() + 1);
        full.push("shell".to_string());
        full.extend(args.iter().map(|a| shell_quote(a)));
        self.run(&full).await
    }

    /// Block until the device is attached and has finished booting.
    pub async fn wait_for_device(&self) -> Result<()> {
        self.run(&["wait-for-device".to_string()]).await?;
        while !self.boot_completed().await? {
            debug!("device attached, waiting for boot to complete");
            tokio::time::sleep(BOOT_POLL_INTERVAL).await;
        }
        Ok(())
    }

    pub async fn boot_completed(&self) -> Result<bool> {
        let out = self.shell(&["getprop", "sys.boot_completed"]).await?;
        Ok(out.trim() == "1")
    }

    /// Dump the current window hierarchy and return the raw XML.
    ///
    /// The previous dump is removed first, so a dump that fails without a
    /// non-zero exit cannot hand back a stale file.
    pub async fn dump_ui(&self) -> Result<String> {
        let path = self.config.dump_path.as_str();
        self.shell(&["rm", "-f", path]).await?;
        let out = self.shell(&["uiautomator", "dump", path]).await?;
        check_dump_output(&out, path)?;
        self.shell(&["cat", path]).await
    }

    /// Dump and parse the current window hierarchy.
    pub async fn nodes(&self) -> Result<Vec<Node>> {
        let xml = self.dump_ui().await?;
        parse_nodes(&xml)
    }

    pub async fn tap(&self, x: i32, y: i32) -> Result<()> {
        self.shell(&["input", "tap", &x.to_string(), &y.to_string()])
            .await?;
        Ok(())
    }

    /// Post (or replace) a notification identified by `tag`.
    pub async fn notify(&self, tag: &str, title: &str, text: &str) -> Result<()> {
        self.shell(&["cmd", "notification", "post", "-t", title, tag, text])
            .await?;
        Ok(())
    }

    async fn run(&self, args: &[String]) -> Result<String> {
        let argv = self.command_args(args);
        debug!("{} {}", self.config.adb, argv.join(" "));

        let output = Command::new(&self.config.adb)
            .args(&argv)
            .kill_on_drop(true)
            .output()
            .await?;

        if !output.status.success() {
            return Err(Error::CommandFailed {
                command: format!("{} {}", self.config.adb, argv.join(" ")),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8(output.stdout)?)
    }

    fn command_args(&self, args: &[String]) -> Vec<String> {
        let mut argv = Vec::with_capacity(args.len() + 2);
        if let Some(ref serial) = self.config.serial {
            argv.push("-s".to_string());
            argv.push(serial.clone());
        }
        argv.extend(args.iter().cloned());
        argv
    }
}

/// `uiautomator dump` exits 0 on some failures ("ERROR: null root node
/// returned by UiTestAutomationBridge"); success prints "... dumped to: <path>".
fn check_dump_output(out: &str, path: &str) -> Result<()> {
    if out.contains("dumped to") && !out.contains("ERROR") {
        return Ok(());
    }
    Err(Error::CommandFailed {
        command: format!("uiautomator dump {}", path),
        stderr: out.trim().to_string(),
    })
}

/// Quote one argument for the device-side `sh` that `adb shell` hands its
/// joined arguments to.
fn shell_quote(arg: &str) -> String {
    let safe = !arg.is_empty()
        && arg
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "_-./:=,@%+".contains(c));
    if safe {
        arg.to_string()
    } else {
        format!("'{}'", arg.replace('\'', r"'\''"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quote_leaves_plain_words() {
        assert_eq!(shell_quote("uiautomator"), "uiautomator");
        assert_eq!(shell_quote("/sdcard/window_dump.xml"), "/sdcard/window_dump.xml");
        assert_eq!(shell_quote("-t"), "-t");
        assert_eq!(shell_quote("540"), "540");
    }

    #[test]
    fn quote_wraps_spaces_and_unicode() {
        assert_eq!(shell_quote("No skip button"), "'No skip button'");
        assert_eq!(shell_quote("закрыть"), "'закрыть'");
        assert_eq!(shell_quote(""), "''");
    }

    #[test]
    fn quote_escapes_single_quotes() {
        assert_eq!(shell_quote("it's"), r"'it'\''s'");
    }

    #[test]
    fn dump_output_success() {
        let out = "UI hierchary dumped to: /sdcard/window_dump.xml\n";
        assert!(check_dump_output(out, "/sdcard/window_dump.xml").is_ok());
    }

    #[test]
    fn dump_output_error_with_zero_exit() {
        let out = "ERROR: null root node returned by UiTestAutomationBridge.\n";
        let err = check_dump_output(out, "/sdcard/window_dump.xml").unwrap_err();
        match err {
            Error::CommandFailed { command, stderr } => {
                assert_eq!(command, "uiautomator dump /sdcard/window_dump.xml");
                assert!(stderr.contains("null root node"));
            }
            other => panic!("expected CommandFailed, got {:?}", other),
        }
    }

    #[test]
    fn dump_output_idle_state_error() {
        let out = "ERROR: could not get idle state.\n";
        assert!(check_dump_output(out, "/sdcard/window_dump.xml").is_err());
    }

    #[test]
    fn dump_output_empty() {
        assert!(check_dump_output("", "/sdcard/window_dump.xml").is_err());
    }

    #[test]
    fn command_args_without_serial() {
        let device = Device::new(AdbConfig::new());
        let argv = device.command_args(&["shell".into(), "ls".into()]);
        assert_eq!(argv, vec!["shell", "ls"]);
    }

    #[test]
    fn command_args_with_serial() {
        let device = Device::new(AdbConfig::new().serial("emulator-5554"));
        let argv = device.command_args(&["wait-for-device".into()]);
        assert_eq!(argv, vec!["-s", "emulator-5554", "wait-for-device"]);
    }

    #[test]
    fn config_builder() {
        let config = AdbConfig::new()
            .adb("/opt/platform-tools/adb")
            .dump_path("/data/local/tmp/ui.xml");
        assert_eq!(config.adb, "/opt/platform-tools/adb");
        assert_eq!(config.dump_path, "/data/local/tmp/ui.xml");
        assert!(config.serial.is_none());
    }

    #[tokio::test]
    async fn missing_adb_binary_is_io_error() {
        let device = Device::new(AdbConfig::new().adb("/nonexistent/skiptap-adb-test"));
        let err = device.tap(1, 2).await.unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
