//! Markup rendering pipeline
//!
//! Takes one content item's raw file contents, strips the front matter, and
//! compiles the body into a node tree rendered through the rule table. Any
//! compilation fault yields `None` so pages can fall back to metadata-only
//! presentation; partial trees are never produced.

pub mod rules;
pub mod tree;

pub use rules::RuleTable;
pub use tree::{Node, NodeKind, RenderError};

use crate::content::frontmatter;

/// A successfully compiled body
#[derive(Debug, Clone)]
pub struct RenderedBody {
    /// The compiled node tree
    pub nodes: Vec<Node>,
    /// HTML produced by applying the rule table
    pub html: String,
}

/// Render a content file's body. Front matter is stripped here regardless of
/// whether the repository already consumed it for metadata.
pub fn render_body(raw: &str, table: &RuleTable) -> Option<RenderedBody> {
    let (_front_matter, body) = frontmatter::split(raw);
    match tree::compile(body) {
        Ok(nodes) => {
            let html = table.render(&nodes);
            Some(RenderedBody { nodes, html })
        }
        Err(e) => {
            tracing::warn!("body failed to compile: {e}");
            None
        }
    }
}
