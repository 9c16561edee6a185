//! Rendering rule table
//!
//! Maps each node kind to the class string of its presentational element.
//! The defaults carry the site theme; callers may override individual rules
//! (say, a different image treatment) without touching parse logic.

use std::collections::HashMap;

use super::tree::{Node, NodeKind};

/// Pluggable kind -> presentation mapping
#[derive(Debug, Clone)]
pub struct RuleTable {
    classes: HashMap<NodeKind, String>,
}

impl Default for RuleTable {
    fn default() -> Self {
        let mut classes = HashMap::new();
        let defaults: [(NodeKind, &str); 19] = [
            (
                NodeKind::Heading1,
                "scroll-m-20 text-3xl font-semibold tracking-tight mt-8 mb-4 first:mt-0",
            ),
            (
                NodeKind::Heading2,
                "scroll-m-20 text-2xl font-semibold tracking-tight mt-8 mb-4 border-b border-border/50 pb-2",
            ),
            (
                NodeKind::Heading3,
                "scroll-m-20 text-xl font-semibold tracking-tight mt-6 mb-3",
            ),
            (
                NodeKind::Heading4,
                "scroll-m-20 text-lg font-semibold tracking-tight mt-6 mb-3",
            ),
            (NodeKind::Paragraph, "leading-7 mb-4 text-foreground/90"),
            (NodeKind::Emphasis, ""),
            (NodeKind::Strong, ""),
            (
                NodeKind::Link,
                "font-medium text-copper-600 underline underline-offset-2 hover:text-copper-700 transition-colors",
            ),
            (
                NodeKind::InlineCode,
                "relative rounded bg-muted px-[0.3rem] py-[0.2rem] font-mono text-sm font-semibold text-foreground",
            ),
            (
                NodeKind::CodeBlock,
                "mb-4 mt-6 overflow-x-auto rounded-lg border border-border/50 bg-muted/50 p-4",
            ),
            (
                NodeKind::OrderedList,
                "my-4 ml-6 list-decimal space-y-2 text-foreground/90",
            ),
            (
                NodeKind::UnorderedList,
                "my-4 ml-6 list-disc space-y-2 text-foreground/90",
            ),
            (NodeKind::ListItem, "leading-7"),
            (
                NodeKind::BlockQuote,
                "mt-6 mb-4 border-l-4 border-copper-600/30 bg-muted/30 pl-4 py-2 italic text-foreground/80",
            ),
            (NodeKind::Rule, "my-8 border-border/50"),
            (
                NodeKind::Image,
                "mt-6 mb-4 rounded-lg border border-border/50 shadow-soft max-w-full h-auto",
            ),
            (
                NodeKind::Table,
                "my-6 w-full overflow-y-auto rounded-lg border border-border/50",
            ),
            (
                NodeKind::TableHeaderCell,
                "border-b border-border/50 bg-muted/50 px-4 py-2 text-left font-semibold text-foreground",
            ),
            (
                NodeKind::TableBodyCell,
                "border-b border-border/30 px-4 py-2 text-foreground/90",
            ),
        ];
        for (kind, class) in defaults {
            classes.insert(kind, class.to_string());
        }
        Self { classes }
    }
}

impl RuleTable {
    /// Class string for a node kind
    pub fn class(&self, kind: NodeKind) -> &str {
        self.classes.get(&kind).map(String::as_str).unwrap_or("")
    }

    /// Override a single rule
    pub fn set(&mut self, kind: NodeKind, class: impl Into<String>) {
        self.classes.insert(kind, class.into());
    }

    /// Render a compiled tree to HTML
    pub fn render(&self, nodes: &[Node]) -> String {
        let mut out = String::new();
        for node in nodes {
            self.render_node(node, &mut out);
        }
        out
    }

    fn render_node(&self, node: &Node, out: &mut String) {
        match node {
            Node::Text(text) => out.push_str(&html_escape(text)),
            Node::Heading { level, children } => {
                let kind = node.kind().unwrap_or(NodeKind::Heading4);
                open_tag(out, &format!("h{level}"), self.class(kind), &[]);
                self.render_children(children, out);
                out.push_str(&format!("</h{level}>"));
            }
            Node::Paragraph(children) => {
                self.wrap(out, "p", NodeKind::Paragraph, children);
            }
            Node::Emphasis(children) => {
                self.wrap(out, "em", NodeKind::Emphasis, children);
            }
            Node::Strong(children) => {
                self.wrap(out, "strong", NodeKind::Strong, children);
            }
            Node::Link { href, children } => {
                open_tag(
                    out,
                    "a",
                    self.class(NodeKind::Link),
                    &[("href", href.as_str())],
                );
                self.render_children(children, out);
                out.push_str("</a>");
            }
            Node::InlineCode(code) => {
                open_tag(out, "code", self.class(NodeKind::InlineCode), &[]);
                out.push_str(&html_escape(code));
                out.push_str("</code>");
            }
            Node::CodeBlock { language, code } => {
                open_tag(out, "pre", self.class(NodeKind::CodeBlock), &[]);
                // The language-* class is the downstream highlighting hook
                let code_class = language
                    .as_deref()
                    .map(|lang| format!("language-{lang}"))
                    .unwrap_or_default();
                open_tag(out, "code", &code_class, &[]);
                out.push_str(&html_escape(code));
                out.push_str("</code></pre>");
            }
            Node::List { ordered, items } => {
                let (tag, kind) = if *ordered {
                    ("ol", NodeKind::OrderedList)
                } else {
                    ("ul", NodeKind::UnorderedList)
                };
                open_tag(out, tag, self.class(kind), &[]);
                self.render_children(items, out);
                out.push_str(&format!("</{tag}>"));
            }
            Node::ListItem(children) => {
                self.wrap(out, "li", NodeKind::ListItem, children);
            }
            Node::BlockQuote(children) => {
                self.wrap(out, "blockquote", NodeKind::BlockQuote, children);
            }
            Node::Rule => {
                open_tag(out, "hr", self.class(NodeKind::Rule), &[]);
            }
            Node::Image { src, alt } => {
                open_tag(
                    out,
                    "img",
                    self.class(NodeKind::Image),
                    &[("src", src.as_str()), ("alt", alt.as_str())],
                );
            }
            Node::Table { head, rows } => {
                open_tag(out, "div", self.class(NodeKind::Table), &[]);
                out.push_str("<table class=\"w-full text-sm\"><thead><tr>");
                for cell in head {
                    self.render_cell(cell, true, out);
                }
                out.push_str("</tr></thead><tbody>");
                for row in rows {
                    out.push_str("<tr>");
                    for cell in row {
                        self.render_cell(cell, false, out);
                    }
                    out.push_str("</tr>");
                }
                out.push_str("</tbody></table></div>");
            }
            Node::TableCell(_) => {
                // Reached only for a cell outside a table; render as body cell
                self.render_cell(node, false, out);
            }
        }
    }

    fn render_cell(&self, cell: &Node, header: bool, out: &mut String) {
        let children: &[Node] = match cell {
            Node::TableCell(children) => children,
            other => std::slice::from_ref(other),
        };
        let (tag, kind) = if header {
            ("th", NodeKind::TableHeaderCell)
        } else {
            ("td", NodeKind::TableBodyCell)
        };
        open_tag(out, tag, self.class(kind), &[]);
        self.render_children(children, out);
        out.push_str(&format!("</{tag}>"));
    }

    fn wrap(&self, out: &mut String, tag: &str, kind: NodeKind, children: &[Node]) {
        open_tag(out, tag, self.class(kind), &[]);
        self.render_children(children, out);
        out.push_str(&format!("</{tag}>"));
    }

    fn render_children(&self, children: &[Node], out: &mut String) {
        for child in children {
            self.render_node(child, out);
        }
    }
}

fn open_tag(out: &mut String, tag: &str, class: &str, attrs: &[(&str, &str)]) {
    out.push('<');
    out.push_str(tag);
    for (name, value) in attrs {
        out.push_str(&format!(" {}=\"{}\"", name, html_escape(value)));
    }
    if !class.is_empty() {
        out.push_str(&format!(" class=\"{}\"", html_escape(class)));
    }
    out.push('>');
}

/// Simple HTML escaping
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
