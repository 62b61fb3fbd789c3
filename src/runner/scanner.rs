use crate::host::Host;
use crate::keywords::{has_keyword, KeywordSet};
use crate::Result;
use skiptap_adb::Node;

/// Whether any of the node's text, description or resource id matches.
pub fn matches(node: &Node, keywords: &KeywordSet) -> bool {
    has_keyword(node.text.as_deref(), keywords)
        || has_keyword(node.content_desc.as_deref(), keywords)
        || has_keyword(node.resource_id.as_deref(), keywords)
}

/// First matching node, in snapshot order.
pub fn find_match<'a>(nodes: &'a [Node], keywords: &KeywordSet) -> Option<&'a Node> {
    nodes.iter().find(|n| matches(n, keywords))
}

/// Query the host once and return the first matching clickable node.
pub async fn scan<H: Host + ?Sized>(host: &H, keywords: &KeywordSet) -> Result<Option<Node>> {
    let nodes = host.clickable_nodes().await?;
    Ok(find_match(&nodes, keywords).cloned())
}
