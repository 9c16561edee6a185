//! Markup node tree
//!
//! Compiles a markdown body into a tree over a closed set of node kinds. The
//! set is deliberately small: what the rule table cannot style, the compiler
//! refuses, so a page either renders fully or not at all.

use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag};
use thiserror::Error;

/// Body compilation faults. All of them turn into a null render result.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum RenderError {
    #[error("unterminated fenced code block")]
    UnterminatedFence,

    #[error("unsupported construct: {0}")]
    Unsupported(&'static str),

    #[error("malformed body structure")]
    Malformed,
}

/// A compiled markup node
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Heading levels 1-4; deeper levels are clamped to 4
    Heading { level: u8, children: Vec<Node> },
    Paragraph(Vec<Node>),
    Text(String),
    Emphasis(Vec<Node>),
    Strong(Vec<Node>),
    Link { href: String, children: Vec<Node> },
    /// Backtick-delimited span; never carries a language tag
    InlineCode(String),
    /// Fenced (or indented) block; the language tag is preserved verbatim
    CodeBlock {
        language: Option<String>,
        code: String,
    },
    List { ordered: bool, items: Vec<Node> },
    ListItem(Vec<Node>),
    BlockQuote(Vec<Node>),
    Rule,
    Image { src: String, alt: String },
    /// Header cells and body rows of cells
    Table {
        head: Vec<Node>,
        rows: Vec<Vec<Node>>,
    },
    TableCell(Vec<Node>),
}

/// The closed set of node kinds the rule table maps over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Heading1,
    Heading2,
    Heading3,
    Heading4,
    Paragraph,
    Emphasis,
    Strong,
    Link,
    InlineCode,
    CodeBlock,
    OrderedList,
    UnorderedList,
    ListItem,
    BlockQuote,
    Rule,
    Image,
    Table,
    TableHeaderCell,
    TableBodyCell,
}

impl Node {
    /// Kind used for rule lookup. Table cells default to the body-cell kind;
    /// the renderer picks the header rule by position.
    pub fn kind(&self) -> Option<NodeKind> {
        Some(match self {
            Node::Heading { level, .. } => match level {
                1 => NodeKind::Heading1,
                2 => NodeKind::Heading2,
                3 => NodeKind::Heading3,
                _ => NodeKind::Heading4,
            },
            Node::Paragraph(_) => NodeKind::Paragraph,
            Node::Emphasis(_) => NodeKind::Emphasis,
            Node::Strong(_) => NodeKind::Strong,
            Node::Link { .. } => NodeKind::Link,
            Node::InlineCode(_) => NodeKind::InlineCode,
            Node::CodeBlock { .. } => NodeKind::CodeBlock,
            Node::List { ordered: true, .. } => NodeKind::OrderedList,
            Node::List { ordered: false, .. } => NodeKind::UnorderedList,
            Node::ListItem(_) => NodeKind::ListItem,
            Node::BlockQuote(_) => NodeKind::BlockQuote,
            Node::Rule => NodeKind::Rule,
            Node::Image { .. } => NodeKind::Image,
            Node::Table { .. } => NodeKind::Table,
            Node::TableCell(_) => NodeKind::TableBodyCell,
            Node::Text(_) => return None,
        })
    }
}

/// Compile a markdown body into a node tree
pub fn compile(body: &str) -> Result<Vec<Node>, RenderError> {
    check_fences(body)?;

    // Tables are part of the supported grammar; front matter is stripped
    // before compilation, so no metadata options here
    let parser = Parser::new_ext(body, Options::ENABLE_TABLES);

    let mut builder = TreeBuilder::new();
    for event in parser {
        builder.event(event)?;
    }
    builder.finish()
}

/// Reject bodies whose last fence never closes. pulldown-cmark would quietly
/// swallow the rest of the document into the code block instead.
///
/// Fences open on a run of three or more backticks or tildes and close only
/// on the same character with at least the opening run length.
fn check_fences(body: &str) -> Result<(), RenderError> {
    let mut open: Option<(char, usize)> = None;
    for line in body.lines() {
        let trimmed = line.trim_start();
        let marker = match trimmed.chars().next() {
            Some(c @ ('`' | '~')) => c,
            _ => continue,
        };
        let run = trimmed.chars().take_while(|c| *c == marker).count();
        if run < 3 {
            continue;
        }
        let rest = &trimmed[run..];
        match open {
            None => {
                // a second backtick run on the same line makes this an
                // inline code span, not a fence
                if marker == '`' && rest.contains("```") {
                    continue;
                }
                open = Some((marker, run));
            }
            Some((c, n)) if marker == c && run >= n && rest.trim().is_empty() => open = None,
            Some(_) => {}
        }
    }
    if open.is_some() {
        Err(RenderError::UnterminatedFence)
    } else {
        Ok(())
    }
}

/// In-progress container while walking the event stream
enum Frame {
    Root(Vec<Node>),
    Heading { level: u8, children: Vec<Node> },
    Paragraph(Vec<Node>),
    Emphasis(Vec<Node>),
    Strong(Vec<Node>),
    Link { href: String, children: Vec<Node> },
    CodeBlock {
        language: Option<String>,
        code: String,
    },
    List { ordered: bool, items: Vec<Node> },
    Item(Vec<Node>),
    BlockQuote(Vec<Node>),
    Image { src: String, alt: String },
    Table {
        head: Vec<Node>,
        rows: Vec<Vec<Node>>,
    },
    TableHead(Vec<Node>),
    TableRow(Vec<Node>),
    TableCell(Vec<Node>),
}

struct TreeBuilder {
    stack: Vec<Frame>,
}

impl TreeBuilder {
    fn new() -> Self {
        Self {
            stack: vec![Frame::Root(Vec::new())],
        }
    }

    fn event(&mut self, event: Event) -> Result<(), RenderError> {
        match event {
            Event::Start(tag) => self.start(tag),
            // Every supported Start pushes a frame, so End always pops one
            Event::End(_) => self.pop(),
            Event::Text(text) => {
                self.text(&text);
                Ok(())
            }
            Event::Code(code) => {
                self.attach(Node::InlineCode(code.to_string()));
                Ok(())
            }
            Event::SoftBreak => {
                self.text(" ");
                Ok(())
            }
            Event::HardBreak => {
                self.text("\n");
                Ok(())
            }
            Event::Rule => {
                self.attach(Node::Rule);
                Ok(())
            }
            Event::Html(_) | Event::InlineHtml(_) => {
                Err(RenderError::Unsupported("embedded markup"))
            }
            _ => Err(RenderError::Unsupported("markup extension")),
        }
    }

    fn start(&mut self, tag: Tag) -> Result<(), RenderError> {
        let frame = match tag {
            Tag::Paragraph => Frame::Paragraph(Vec::new()),
            Tag::Heading { level, .. } => Frame::Heading {
                level: heading_level(level),
                children: Vec::new(),
            },
            Tag::Emphasis => Frame::Emphasis(Vec::new()),
            Tag::Strong => Frame::Strong(Vec::new()),
            Tag::Link { dest_url, .. } => Frame::Link {
                href: dest_url.to_string(),
                children: Vec::new(),
            },
            Tag::CodeBlock(kind) => Frame::CodeBlock {
                language: match kind {
                    CodeBlockKind::Fenced(lang) if !lang.is_empty() => Some(lang.to_string()),
                    _ => None,
                },
                code: String::new(),
            },
            Tag::List(start) => Frame::List {
                ordered: start.is_some(),
                items: Vec::new(),
            },
            Tag::Item => Frame::Item(Vec::new()),
            Tag::BlockQuote(_) => Frame::BlockQuote(Vec::new()),
            Tag::Image { dest_url, .. } => Frame::Image {
                src: dest_url.to_string(),
                alt: String::new(),
            },
            Tag::Table(_) => Frame::Table {
                head: Vec::new(),
                rows: Vec::new(),
            },
            Tag::TableHead => Frame::TableHead(Vec::new()),
            Tag::TableRow => Frame::TableRow(Vec::new()),
            Tag::TableCell => Frame::TableCell(Vec::new()),
            Tag::HtmlBlock => return Err(RenderError::Unsupported("embedded markup")),
            _ => return Err(RenderError::Unsupported("markup extension")),
        };
        self.stack.push(frame);
        Ok(())
    }

    fn pop(&mut self) -> Result<(), RenderError> {
        let frame = self.stack.pop().ok_or(RenderError::Malformed)?;
        match frame {
            Frame::Root(_) => return Err(RenderError::Malformed),
            Frame::Heading { level, children } => {
                self.attach(Node::Heading { level, children });
            }
            Frame::Paragraph(children) => self.attach(Node::Paragraph(children)),
            Frame::Emphasis(children) => self.attach(Node::Emphasis(children)),
            Frame::Strong(children) => self.attach(Node::Strong(children)),
            Frame::Link { href, children } => self.attach(Node::Link { href, children }),
            Frame::CodeBlock { language, code } => {
                self.attach(Node::CodeBlock { language, code });
            }
            Frame::List { ordered, items } => self.attach(Node::List { ordered, items }),
            Frame::Item(children) => self.attach(Node::ListItem(children)),
            Frame::BlockQuote(children) => self.attach(Node::BlockQuote(children)),
            Frame::Image { src, alt } => self.attach(Node::Image { src, alt }),
            Frame::Table { head, rows } => self.attach(Node::Table { head, rows }),
            Frame::TableHead(cells) => {
                if let Some(Frame::Table { head, .. }) = self.stack.last_mut() {
                    *head = cells;
                } else {
                    return Err(RenderError::Malformed);
                }
            }
            Frame::TableRow(cells) => {
                if let Some(Frame::Table { rows, .. }) = self.stack.last_mut() {
                    rows.push(cells);
                } else {
                    return Err(RenderError::Malformed);
                }
            }
            Frame::TableCell(children) => self.attach(Node::TableCell(children)),
        }
        Ok(())
    }

    fn text(&mut self, text: &str) {
        match self.stack.last_mut() {
            Some(Frame::CodeBlock { code, .. }) => code.push_str(text),
            Some(Frame::Image { alt, .. }) => alt.push_str(text),
            _ => self.attach(Node::Text(text.to_string())),
        }
    }

    fn attach(&mut self, node: Node) {
        let children = match self.stack.last_mut() {
            Some(Frame::Root(children))
            | Some(Frame::Heading { children, .. })
            | Some(Frame::Paragraph(children))
            | Some(Frame::Emphasis(children))
            | Some(Frame::Strong(children))
            | Some(Frame::Link { children, .. })
            | Some(Frame::Item(children))
            | Some(Frame::BlockQuote(children))
            | Some(Frame::TableHead(children))
            | Some(Frame::TableRow(children))
            | Some(Frame::TableCell(children)) => children,
            Some(Frame::List { items, .. }) => items,
            // Text inside code blocks and images is handled in text();
            // anything else stray is dropped on the floor
            _ => return,
        };
        children.push(node);
    }

    fn finish(mut self) -> Result<Vec<Node>, RenderError> {
        match (self.stack.pop(), self.stack.is_empty()) {
            (Some(Frame::Root(nodes)), true) => Ok(nodes),
            _ => Err(RenderError::Malformed),
        }
    }
}

fn heading_level(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        _ => 4,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_heading_and_paragraph() {
        let nodes = compile("## Title\n\nSome text.").unwrap();
        assert_eq!(nodes.len(), 2);
        assert!(matches!(nodes[0], Node::Heading { level: 2, .. }));
        assert!(matches!(nodes[1], Node::Paragraph(_)));
    }

    #[test]
    fn test_fenced_block_keeps_language_tag() {
        let nodes = compile("```python\nprint('hi')\n```").unwrap();
        match &nodes[0] {
            Node::CodeBlock { language, code } => {
                assert_eq!(language.as_deref(), Some("python"));
                assert!(code.contains("print"));
            }
            other => panic!("expected code block, got {other:?}"),
        }
    }

    #[test]
    fn test_bare_fence_has_no_language() {
        let nodes = compile("```\nplain\n```").unwrap();
        assert!(matches!(&nodes[0], Node::CodeBlock { language: None, .. }));
    }

    #[test]
    fn test_inline_code_is_never_fenced() {
        let nodes = compile("Use `cargo build` here.").unwrap();
        let Node::Paragraph(children) = &nodes[0] else {
            panic!("expected paragraph");
        };
        assert!(children
            .iter()
            .any(|n| matches!(n, Node::InlineCode(c) if c == "cargo build")));
        assert!(!children.iter().any(|n| matches!(n, Node::CodeBlock { .. })));
    }

    #[test]
    fn test_unterminated_fence_is_error() {
        let err = compile("before\n```rust\nfn main() {}\n").unwrap_err();
        assert_eq!(err, RenderError::UnterminatedFence);
    }

    #[test]
    fn test_unterminated_tilde_fence_is_error() {
        let err = compile("~~~rust\nfn main() {}\n\nrest of the document\n").unwrap_err();
        assert_eq!(err, RenderError::UnterminatedFence);
    }

    #[test]
    fn test_tilde_fence_closes_only_with_tildes() {
        let nodes = compile("~~~sh\nls -la\n~~~\n").unwrap();
        assert!(matches!(&nodes[0], Node::CodeBlock { language, .. }
            if language.as_deref() == Some("sh")));

        let err = compile("```\ncode\n~~~\n").unwrap_err();
        assert_eq!(err, RenderError::UnterminatedFence);
    }

    #[test]
    fn test_backtick_span_line_is_not_a_fence() {
        let nodes = compile("``` ls -la ```\n").unwrap();
        let Node::Paragraph(children) = &nodes[0] else {
            panic!("expected paragraph");
        };
        assert!(children
            .iter()
            .any(|n| matches!(n, Node::InlineCode(c) if c == "ls -la")));
    }

    #[test]
    fn test_embedded_component_markup_unsupported() {
        let err = compile("Hello <Button>click</Button> world").unwrap_err();
        assert!(matches!(err, RenderError::Unsupported(_)));
    }

    #[test]
    fn test_lists_keep_order_and_kind() {
        let nodes = compile("1. one\n2. two\n\n- a\n- b\n").unwrap();
        assert!(matches!(nodes[0], Node::List { ordered: true, .. }));
        match &nodes[1] {
            Node::List { ordered: false, items } => assert_eq!(items.len(), 2),
            other => panic!("expected unordered list, got {other:?}"),
        }
    }

    #[test]
    fn test_table_head_and_rows() {
        let body = "| a | b |\n|---|---|\n| 1 | 2 |\n| 3 | 4 |\n";
        let nodes = compile(body).unwrap();
        match &nodes[0] {
            Node::Table { head, rows } => {
                assert_eq!(head.len(), 2);
                assert_eq!(rows.len(), 2);
                assert_eq!(rows[0].len(), 2);
            }
            other => panic!("expected table, got {other:?}"),
        }
    }

    #[test]
    fn test_link_and_image() {
        let nodes = compile("[site](https://example.com)\n\n![logo](/img/logo.png)\n").unwrap();
        let Node::Paragraph(children) = &nodes[0] else {
            panic!("expected paragraph");
        };
        assert!(matches!(&children[0], Node::Link { href, .. } if href == "https://example.com"));
        let Node::Paragraph(children) = &nodes[1] else {
            panic!("expected paragraph");
        };
        assert!(matches!(&children[0], Node::Image { src, alt } if src == "/img/logo.png" && alt == "logo"));
    }

    #[test]
    fn test_deep_heading_clamps_to_four() {
        let nodes = compile("###### tiny").unwrap();
        assert!(matches!(nodes[0], Node::Heading { level: 4, .. }));
    }

    #[test]
    fn test_blockquote_and_rule() {
        let nodes = compile("> quoted\n\n---\n").unwrap();
        assert!(matches!(nodes[0], Node::BlockQuote(_)));
        assert!(matches!(nodes[1], Node::Rule));
    }
}
