use crate::host::Host;
use crate::Result;
use skiptap_adb::Node;
use tracing::debug;

/// Click `node`: native click first, then a tap at the centre of its bounds.
///
/// Returns `Ok(false)` when the native click did not work and the node has
/// no bounds to fall back on.
pub async fn click_node<H: Host + ?Sized>(host: &H, node: &Node) -> Result<bool> {
    match host.click(node).await {
        Ok(true) => return Ok(true),
        Ok(false) => debug!("native click unavailable for '{}'", node.label()),
        Err(e) => debug!("native click on '{}' failed: {}", node.label(), e),
    }

    let Some(bounds) = node.bounds else {
        debug!("'{}' has no bounds, cannot tap", node.label());
        return Ok(false);
    };
    let (x, y) = bounds.center();
    debug!("tap fallback at ({}, {})", x, y);
    host.tap(x, y).await
}
