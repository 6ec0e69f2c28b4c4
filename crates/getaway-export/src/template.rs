//! Parser for the itinerary template's placeholder syntax.
//!
//! Recognised tags:
//! - `{{name}}`: scalar placeholder
//! - `{{#each name}}` … `{{/each}}`: repeated block
//! - `{{#if name}}` … `{{else}}` … `{{/if}}`: conditional block, `else` optional
//!
//! Parsing never fails. Block tags that do not balance, and `{{…}}`
//! sequences that are not one of the forms above, are kept as literal text.
//! Blocks nest.

/// A parsed template node. Borrows from the template source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node<'a> {
    Text(&'a str),
    Var(&'a str),
    Each {
        name: &'a str,
        body: Vec<Node<'a>>,
    },
    If {
        name: &'a str,
        then: Vec<Node<'a>>,
        otherwise: Vec<Node<'a>>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template<'a> {
    nodes: Vec<Node<'a>>,
}

impl<'a> Template<'a> {
    pub fn parse(source: &'a str) -> Self {
        let mut parser = Parser::default();
        let mut rest = source;

        while let Some(start) = rest.find("{{") {
            parser.text(&rest[..start]);
            let after = &rest[start + 2..];
            let Some(end) = after.find("}}") else {
                rest = &rest[start..];
                break;
            };
            let inner = &after[..end];

            // `{{ {{name}}`: the first opener is literal, retry from the second.
            if let Some(nested) = inner.rfind("{{") {
                let literal_end = start + 2 + nested;
                parser.text(&rest[start..literal_end]);
                rest = &rest[literal_end..];
                continue;
            }

            let tag_end = start + 2 + end + 2;
            let raw = &rest[start..tag_end];
            rest = &rest[tag_end..];

            match classify(inner) {
                Some(tag) => parser.tag(tag, raw),
                None => parser.text(raw),
            }
        }
        parser.text(rest);

        Self {
            nodes: parser.finish(),
        }
    }

    pub fn nodes(&self) -> &[Node<'a>] {
        &self.nodes
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tag<'a> {
    Var(&'a str),
    OpenEach(&'a str),
    OpenIf(&'a str),
    Else,
    CloseEach,
    CloseIf,
}

fn classify(inner: &str) -> Option<Tag<'_>> {
    let inner = inner.trim();
    if let Some(rest) = inner.strip_prefix('#') {
        let mut parts = rest.split_whitespace();
        let (Some(keyword), Some(name), None) = (parts.next(), parts.next(), parts.next()) else {
            return None;
        };
        if !is_ident(name) {
            return None;
        }
        return match keyword {
            "each" => Some(Tag::OpenEach(name)),
            "if" => Some(Tag::OpenIf(name)),
            _ => None,
        };
    }
    match inner {
        "/each" => Some(Tag::CloseEach),
        "/if" => Some(Tag::CloseIf),
        "else" => Some(Tag::Else),
        name if is_ident(name) => Some(Tag::Var(name)),
        _ => None,
    }
}

fn is_ident(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockKind {
    Each,
    If,
}

/// An open block awaiting its closing tag.
struct Frame<'a> {
    kind: BlockKind,
    name: &'a str,
    open: &'a str,
    body: Vec<Node<'a>>,
    /// Literal `{{else}}` tag and the nodes that follow it.
    alt: Option<(&'a str, Vec<Node<'a>>)>,
}

#[derive(Default)]
struct Parser<'a> {
    root: Vec<Node<'a>>,
    stack: Vec<Frame<'a>>,
}

impl<'a> Parser<'a> {
    fn current(&mut self) -> &mut Vec<Node<'a>> {
        match self.stack.last_mut() {
            Some(Frame {
                alt: Some((_, nodes)),
                ..
            }) => nodes,
            Some(frame) => &mut frame.body,
            None => &mut self.root,
        }
    }

    fn text(&mut self, text: &'a str) {
        if !text.is_empty() {
            self.current().push(Node::Text(text));
        }
    }

    fn tag(&mut self, tag: Tag<'a>, raw: &'a str) {
        match tag {
            Tag::Var(name) => self.current().push(Node::Var(name)),
            Tag::OpenEach(name) => self.open(BlockKind::Each, name, raw),
            Tag::OpenIf(name) => self.open(BlockKind::If, name, raw),
            Tag::Else => {
                let open_if = self
                    .stack
                    .last_mut()
                    .filter(|f| f.kind == BlockKind::If && f.alt.is_none());
                if let Some(frame) = open_if {
                    frame.alt = Some((raw, Vec::new()));
                } else {
                    self.text(raw);
                }
            }
            Tag::CloseEach => self.close(BlockKind::Each, raw),
            Tag::CloseIf => self.close(BlockKind::If, raw),
        }
    }

    fn open(&mut self, kind: BlockKind, name: &'a str, raw: &'a str) {
        self.stack.push(Frame {
            kind,
            name,
            open: raw,
            body: Vec::new(),
            alt: None,
        });
    }

    fn close(&mut self, kind: BlockKind, raw: &'a str) {
        if !self.stack.last().is_some_and(|f| f.kind == kind) {
            self.text(raw);
            return;
        }
        let Some(frame) = self.stack.pop() else {
            return;
        };
        let node = match frame.kind {
            BlockKind::Each => Node::Each {
                name: frame.name,
                body: frame.body,
            },
            BlockKind::If => Node::If {
                name: frame.name,
                then: frame.body,
                otherwise: frame.alt.map(|(_, nodes)| nodes).unwrap_or_default(),
            },
        };
        self.current().push(node);
    }

    /// Unclosed blocks fall back to literal text around their contents.
    fn finish(mut self) -> Vec<Node<'a>> {
        while let Some(frame) = self.stack.pop() {
            let target = self.current();
            target.push(Node::Text(frame.open));
            target.extend(frame.body);
            if let Some((raw, nodes)) = frame.alt {
                target.push(Node::Text(raw));
                target.extend(nodes);
            }
        }
        self.root
    }
}
