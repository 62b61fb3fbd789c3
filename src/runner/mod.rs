pub mod dispatch;
pub mod notifier;
pub mod scanner;

#[cfg(test)]
pub(crate) mod fake;

use crate::config::Config;
use crate::host::Host;
use crate::keywords::KeywordSet;
use crate::{Error, Result};
use notifier::Notifier;
use skiptap_adb::Node;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// What a single scan cycle ended with.
#[derive(Debug)]
pub enum CycleOutcome {
    /// A matching node was clicked.
    Tapped(Node),
    /// A matching node was found in dry-run mode; nothing was tapped.
    Previewed(Node),
    /// No clickable node matched.
    NoMatch,
    /// A node matched but neither click nor tap went through.
    ClickFailed(Node),
    /// The cycle hit an error.
    Failed(Error),
}

impl CycleOutcome {
    /// Whether this cycle counts towards the tap total.
    pub fn is_tap(&self) -> bool {
        matches!(self, CycleOutcome::Tapped(_) | CycleOutcome::Previewed(_))
    }
}

/// Totals for a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunResult {
    /// Successful taps (dry-run matches included).
    pub taps: u64,
    /// Scan cycles completed.
    pub cycles: u64,
    /// Cycles that ended in an error.
    pub errors: u64,
    /// Time since the run started, in milliseconds.
    pub duration_ms: u64,
}

/// Scan-and-tap loop over a [`Host`].
pub struct Runner<H> {
    host: H,
    keywords: KeywordSet,
    scan_interval: Duration,
    max_taps: u64,
    dry_run: bool,
    wait_ready: bool,
    message: String,
    notifier: Notifier,
    taps: u64,
    cycles: u64,
    errors: u64,
    started: Option<Instant>,
}

impl<H: Host> Runner<H> {
    pub fn new(host: H, config: &Config) -> Self {
        let notifier = if config.notify.enabled {
            Notifier::new(config.notify.interval())
        } else {
            Notifier::disabled()
        };
        Self {
            host,
            keywords: config.keyword_set(),
            scan_interval: config.scan_interval(),
            max_taps: config.max_taps,
            dry_run: config.dry_run,
            wait_ready: config.wait_ready,
            message: config.notify.message.clone(),
            notifier,
            taps: 0,
            cycles: 0,
            errors: 0,
            started: None,
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn keywords(&self) -> &KeywordSet {
        &self.keywords
    }

    pub fn taps(&self) -> u64 {
        self.taps
    }

    /// Wait for the host, then scan every interval until `max_taps` is
    /// reached. With `max_taps == 0` this only returns on a readiness error.
    pub async fn run(&mut self) -> Result<RunResult> {
        self.started = Some(Instant::now());

        if self.wait_ready {
            self.host.wait_ready().await?;
            debug!("host ready");
        }
        if !self.notifier.is_enabled() {
            info!("Notifications disabled");
        }

        loop {
            self.cycle().await;

            if self.max_taps > 0 && self.taps >= self.max_taps {
                info!("Reached max taps ({})", self.max_taps);
                break;
            }

            tokio::time::sleep(self.scan_interval).await;
        }

        Ok(self.stats())
    }

    /// Run one scan cycle: find, tap, count or notify. Never fails; errors
    /// come back as [`CycleOutcome::Failed`].
    pub async fn cycle(&mut self) -> CycleOutcome {
        self.cycles += 1;
        let outcome = match self.try_cycle().await {
            Ok(outcome) => outcome,
            Err(e) => CycleOutcome::Failed(e),
        };

        match &outcome {
            CycleOutcome::Tapped(node) => {
                self.taps += 1;
                info!("Tapped {} (taps={})", describe(node), self.taps);
            }
            CycleOutcome::Previewed(node) => {
                self.taps += 1;
                info!("[dry run] Match: {} (taps={})", describe(node), self.taps);
            }
            CycleOutcome::NoMatch => {
                debug!("No skip-like button found on current screen");
                self.notifier.notify(&self.host, &self.message).await;
            }
            CycleOutcome::ClickFailed(node) => {
                debug!("Could not click {}", describe(node));
                self.notifier.notify(&self.host, &self.message).await;
            }
            CycleOutcome::Failed(e) => {
                self.errors += 1;
                warn!("Cycle {} failed: {}", self.cycles, e);
                self.notifier.notify(&self.host, &self.message).await;
            }
        }

        outcome
    }

    /// Totals so far.
    pub fn stats(&self) -> RunResult {
        RunResult {
            taps: self.taps,
            cycles: self.cycles,
            errors: self.errors,
            duration_ms: self
                .started
                .map(|s| s.elapsed().as_millis() as u64)
                .unwrap_or(0),
        }
    }

    async fn try_cycle(&self) -> Result<CycleOutcome> {
        let Some(node) = scanner::scan(&self.host, &self.keywords).await? else {
            return Ok(CycleOutcome::NoMatch);
        };

        if self.dry_run {
            return Ok(CycleOutcome::Previewed(node));
        }

        if dispatch::click_node(&self.host, &node).await? {
            Ok(CycleOutcome::Tapped(node))
        } else {
            Ok(CycleOutcome::ClickFailed(node))
        }
    }
}

fn describe(node: &Node) -> String {
    let at = node
        .bounds
        .map(|b| {
            let (x, y) = b.center();
            format!("({},{})", x, y)
        })
        .unwrap_or_else(|| "(no bounds)".into());
    format!(
        "{} text={:?}, id={:?}, desc={:?}",
        at,
        node.text.as_deref().unwrap_or(""),
        node.resource_id.as_deref().unwrap_or(""),
        node.content_desc.as_deref().unwrap_or("")
    )
}
