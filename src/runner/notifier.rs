use crate::host::Host;
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

/// Rate-limited user notifications.
#[derive(Debug, Clone)]
pub struct Notifier {
    interval: Duration,
    enabled: bool,
    last_shown: Option<Instant>,
}

impl Notifier {
    /// Show at most one notification per `interval`.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            enabled: true,
            last_shown: None,
        }
    }

    /// A notifier that never shows anything.
    pub fn disabled() -> Self {
        Self {
            interval: Duration::ZERO,
            enabled: false,
            last_shown: None,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn last_shown(&self) -> Option<Instant> {
        self.last_shown
    }

    /// Whether a notification may be shown at `now`.
    pub fn ready(&self, now: Instant) -> bool {
        if !self.enabled {
            return false;
        }
        match self.last_shown {
            None => true,
            Some(last) => now.saturating_duration_since(last) >= self.interval,
        }
    }

    /// Show `message` unless one was shown within the interval. Returns
    /// whether it was shown; toast failures are swallowed.
    pub async fn notify<H: Host + ?Sized>(&mut self, host: &H, message: &str) -> bool {
        let now = Instant::now();
        if !self.ready(now) {
            return false;
        }
        match host.toast(message).await {
            Ok(()) => {
                self.last_shown = Some(now);
                true
            }
            Err(e) => {
                debug!("notification failed: {}", e);
                false
            }
        }
    }
}
