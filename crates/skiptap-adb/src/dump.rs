//! uiautomator hierarchy dumps: node attributes and screen bounds.

use crate::{Error, Result};
use once_cell::sync::Lazy;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use regex::Regex;
use serde::Serialize;
use std::fmt;

static BOUNDS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\[(-?\d+),(-?\d+)\]\[(-?\d+),(-?\d+)\]$").expect("valid regex"));

/// Screen rectangle of a node, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Bounds {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Bounds {
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Parse uiautomator notation: `[x1,y1][x2,y2]`.
    pub fn parse(s: &str) -> Result<Self> {
        let caps = BOUNDS_RE
            .captures(s.trim())
            .ok_or_else(|| Error::Bounds(s.to_string()))?;
        let num = |i: usize| -> Result<i32> {
            caps[i]
                .parse::<i32>()
                .map_err(|_| Error::Bounds(s.to_string()))
        };
        Ok(Self::new(num(1)?, num(2)?, num(3)?, num(4)?))
    }

    /// Integer midpoint of the rectangle.
    pub fn center(&self) -> (i32, i32) {
        (midpoint(self.left, self.right), midpoint(self.top, self.bottom))
    }
}

impl fmt::Display for Bounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{},{}][{},{}]",
            self.left, self.top, self.right, self.bottom
        )
    }
}

// Widened so coordinates near i32::MAX cannot overflow.
fn midpoint(a: i32, b: i32) -> i32 {
    ((a as i64 + b as i64) / 2) as i32
}

/// One `<node>` of a hierarchy dump. Empty attributes are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Node {
    pub text: Option<String>,
    pub content_desc: Option<String>,
    pub resource_id: Option<String>,
    pub class: Option<String>,
    pub package: Option<String>,
    pub clickable: bool,
    pub bounds: Option<Bounds>,
}

impl Node {
    /// Short human label: text, then description, then resource id.
    pub fn label(&self) -> &str {
        self.text
            .as_deref()
            .or(self.content_desc.as_deref())
            .or(self.resource_id.as_deref())
            .unwrap_or("<unlabeled>")
    }
}

/// Parse every `<node>` element of a dump, in document order.
pub fn parse_nodes(xml: &str) -> Result<Vec<Node>> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut nodes = Vec::new();
    loop {
        match reader.read_event()? {
            Event::Start(e) | Event::Empty(e) => {
                if e.name().as_ref() == b"node" {
                    nodes.push(node_from_element(&e)?);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(nodes)
}

fn node_from_element(e: &BytesStart<'_>) -> Result<Node> {
    let mut node = Node::default();
    for attr in e.attributes().flatten() {
        let value = attr.unescape_value()?;
        let value = value.trim();
        match attr.key.as_ref() {
            b"text" => node.text = non_empty(value),
            b"content-desc" => node.content_desc = non_empty(value),
            b"resource-id" => node.resource_id = non_empty(value),
            b"class" => node.class = non_empty(value),
            b"package" => node.package = non_empty(value),
            b"clickable" => node.clickable = value == "true",
            // A single malformed rectangle should not sink the whole snapshot.
            b"bounds" => node.bounds = Bounds::parse(value).ok(),
            _ => {}
        }
    }
    Ok(node)
}

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DUMP: &str = r#"<?xml version='1.0' encoding='UTF-8' standalone='yes' ?>
<hierarchy rotation="0">
  <node index="0" text="" resource-id="" class="android.widget.FrameLayout" package="com.example.video" content-desc="" clickable="false" bounds="[0,0][1080,2340]">
    <node index="0" text="Skip Ad" resource-id="com.example.video:id/skip_button" class="android.widget.Button" package="com.example.video" content-desc="" clickable="true" bounds="[880,1500][1060,1580]" />
    <node index="1" text="" resource-id="" class="android.widget.ImageView" package="com.example.video" content-desc="Close &amp; continue" clickable="true" bounds="[980,40][1060,120]" />
    <node index="2" text="Broken" resource-id="" class="android.view.View" package="com.example.video" content-desc="" clickable="true" bounds="garbage" />
  </node>
</hierarchy>"#;

    #[test]
    fn bounds_center() {
        let b = Bounds::parse("[0,0][200,100]").unwrap();
        assert_eq!(b, Bounds::new(0, 0, 200, 100));
        assert_eq!(b.center(), (100, 50));
    }

    #[test]
    fn bounds_center_rounds_down() {
        let b = Bounds::parse("[880,1500][1061,1581]").unwrap();
        assert_eq!(b.center(), (970, 1540));
    }

    #[test]
    fn bounds_center_near_i32_max() {
        let b = Bounds::parse("[2000000000,0][2000000000,10]").unwrap();
        assert_eq!(b.center(), (2000000000, 5));

        let b = Bounds::new(i32::MIN, i32::MIN, i32::MAX, i32::MAX);
        assert_eq!(b.center(), (0, 0));
    }

    #[test]
    fn parse_node_with_huge_bounds() {
        let xml = r#"<hierarchy><node text="Skip" clickable="true" bounds="[2000000000,0][2000000000,10]" /></hierarchy>"#;
        let nodes = parse_nodes(xml).unwrap();
        assert_eq!(nodes[0].bounds.unwrap().center(), (2000000000, 5));
    }

    #[test]
    fn bounds_rejects_malformed() {
        assert!(matches!(Bounds::parse("[1,2][3]"), Err(Error::Bounds(_))));
        assert!(Bounds::parse("").is_err());
        assert!(Bounds::parse("[a,b][c,d]").is_err());
    }

    #[test]
    fn bounds_display_matches_dump_notation() {
        let b = Bounds::new(1, 2, 3, 4);
        assert_eq!(b.to_string(), "[1,2][3,4]");
    }

    #[test]
    fn parse_keeps_document_order() {
        let nodes = parse_nodes(DUMP).unwrap();
        assert_eq!(nodes.len(), 4);
        assert_eq!(nodes[0].class.as_deref(), Some("android.widget.FrameLayout"));
        assert_eq!(nodes[1].text.as_deref(), Some("Skip Ad"));
        assert_eq!(nodes[2].content_desc.as_deref(), Some("Close & continue"));
        assert_eq!(nodes[3].text.as_deref(), Some("Broken"));
    }

    #[test]
    fn parse_maps_empty_attributes_to_none() {
        let nodes = parse_nodes(DUMP).unwrap();
        let root = &nodes[0];
        assert!(root.text.is_none());
        assert!(root.resource_id.is_none());
        assert!(root.content_desc.is_none());
        assert!(!root.clickable);
    }

    #[test]
    fn parse_reads_clickable_and_bounds() {
        let nodes = parse_nodes(DUMP).unwrap();
        let skip = &nodes[1];
        assert!(skip.clickable);
        assert_eq!(
            skip.resource_id.as_deref(),
            Some("com.example.video:id/skip_button")
        );
        assert_eq!(skip.bounds, Some(Bounds::new(880, 1500, 1060, 1580)));
    }

    #[test]
    fn parse_tolerates_malformed_bounds() {
        let nodes = parse_nodes(DUMP).unwrap();
        assert!(nodes[3].clickable);
        assert!(nodes[3].bounds.is_none());
    }

    #[test]
    fn parse_empty_hierarchy() {
        let nodes = parse_nodes("<hierarchy rotation=\"0\"></hierarchy>").unwrap();
        assert!(nodes.is_empty());
    }

    #[test]
    fn label_prefers_text() {
        let nodes = parse_nodes(DUMP).unwrap();
        assert_eq!(nodes[1].label(), "Skip Ad");
        assert_eq!(nodes[2].label(), "Close & continue");
        assert_eq!(nodes[0].label(), "<unlabeled>");
    }
}
