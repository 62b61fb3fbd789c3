//! In-memory host for unit tests.

use crate::host::Host;
use crate::{Error, Result};
use async_trait::async_trait;
use skiptap_adb::Node;
use std::sync::Mutex;

#[derive(Debug, Clone, Copy, Default)]
pub enum ClickBehavior {
    Succeed,
    #[default]
    Fail,
    Error,
}

#[derive(Default)]
pub struct FakeHost {
    nodes: Vec<Node>,
    snapshot_error: Option<String>,
    click: ClickBehavior,
    tap_fails: bool,
    toast_fails: bool,
    clicks: Mutex<usize>,
    taps: Mutex<Vec<(i32, i32)>>,
    toasts: Mutex<Vec<String>>,
}

impl FakeHost {
    pub fn with_nodes(nodes: Vec<Node>) -> Self {
        Self {
            nodes,
            ..Default::default()
        }
    }

    pub fn failing_snapshot(message: &str) -> Self {
        Self {
            snapshot_error: Some(message.into()),
            ..Default::default()
        }
    }

    pub fn click(mut self, behavior: ClickBehavior) -> Self {
        self.click = behavior;
        self
    }

    pub fn tap_result(mut self, ok: bool) -> Self {
        self.tap_fails = !ok;
        self
    }

    pub fn toast_fails(mut self, fails: bool) -> Self {
        self.toast_fails = fails;
        self
    }

    pub fn click_count(&self) -> usize {
        *self.clicks.lock().unwrap()
    }

    pub fn taps(&self) -> Vec<(i32, i32)> {
        self.taps.lock().unwrap().clone()
    }

    pub fn toasts(&self) -> Vec<String> {
        self.toasts.lock().unwrap().clone()
    }
}

#[async_trait]
impl Host for FakeHost {
    async fn wait_ready(&self) -> Result<()> {
        Ok(())
    }

    async fn clickable_nodes(&self) -> Result<Vec<Node>> {
        match self.snapshot_error {
            Some(ref e) => Err(Error::Host(e.clone())),
            None => Ok(self.nodes.clone()),
        }
    }

    async fn click(&self, _node: &Node) -> Result<bool> {
        *self.clicks.lock().unwrap() += 1;
        match self.click {
            ClickBehavior::Succeed => Ok(true),
            ClickBehavior::Fail => Ok(false),
            ClickBehavior::Error => Err(Error::Host("click rejected".into())),
        }
    }

    async fn tap(&self, x: i32, y: i32) -> Result<bool> {
        self.taps.lock().unwrap().push((x, y));
        Ok(!self.tap_fails)
    }

    async fn toast(&self, message: &str) -> Result<()> {
        if self.toast_fails {
            return Err(Error::Host("toast unavailable".into()));
        }
        self.toasts.lock().unwrap().push(message.to_string());
        Ok(())
    }
}
