// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! A deliberately tiny HTML-ish reader and writer.
//!
//! Enough to write fixtures as `<p>The <b>cat</b> sat.</p>` and to assert on
//! the exact tree shape after an edit. Not a conforming HTML parser: no
//! implied end tags, no raw-text elements, five entities.

use super::{ArenaDocument, Document, ElementData};
use crate::error::DocumentError;
use crate::types::NodeId;
use std::fmt;

/// Elements that never have children.
const VOID_TAGS: &[&str] = &["br", "hr", "img", "input", "meta", "link", "wbr"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkupError {
    /// Closing tag did not match the open element.
    Mismatched {
        expected: String,
        found: String,
        at: usize,
    },
    /// Input ended inside a tag or with elements still open.
    UnexpectedEof { open: Option<String> },
    /// Malformed tag syntax.
    BadTag { at: usize },
    Tree(DocumentError),
}

impl fmt::Display for MarkupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarkupError::Mismatched {
                expected,
                found,
                at,
            } => write!(
                f,
                "expected </{}> but found </{}> at byte {}",
                expected, found, at
            ),
            MarkupError::UnexpectedEof { open: Some(tag) } => {
                write!(f, "unexpected end of input, <{}> still open", tag)
            }
            MarkupError::UnexpectedEof { open: None } => write!(f, "unexpected end of input"),
            MarkupError::BadTag { at } => write!(f, "malformed tag at byte {}", at),
            MarkupError::Tree(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for MarkupError {}

impl From<DocumentError> for MarkupError {
    fn from(err: DocumentError) -> Self {
        MarkupError::Tree(err)
    }
}

/// Parse markup into the children of a fresh `body` root.
pub fn parse(input: &str) -> Result<ArenaDocument, MarkupError> {
    let mut doc = ArenaDocument::new();
    let root = doc.root();
    parse_into(&mut doc, root, input)?;
    Ok(doc)
}

/// Parse markup and append the result under `parent`.
pub fn parse_into<D: Document + ?Sized>(
    doc: &mut D,
    parent: NodeId,
    input: &str,
) -> Result<(), MarkupError> {
    let mut stack: Vec<(NodeId, String)> = vec![(parent, String::new())];
    let mut pos = 0;

    while pos < input.len() {
        let rest = &input[pos..];
        if let Some(comment) = rest.strip_prefix("<!--") {
            let close = comment
                .find("-->")
                .ok_or(MarkupError::UnexpectedEof { open: None })?;
            pos += 4 + close + 3;
            continue;
        }
        if rest.starts_with('<') {
            let close = rest
                .find('>')
                .ok_or(MarkupError::UnexpectedEof { open: None })?;
            let tag_src = &rest[1..close];
            let tag_start = pos;
            pos += close + 1;

            if let Some(name) = tag_src.strip_prefix('/') {
                let name = name.trim().to_ascii_lowercase();
                let (_, open) = stack
                    .last()
                    .ok_or(MarkupError::BadTag { at: tag_start })?;
                if stack.len() == 1 || *open != name {
                    return Err(MarkupError::Mismatched {
                        expected: open.clone(),
                        found: name,
                        at: tag_start,
                    });
                }
                stack.pop();
                continue;
            }

            let self_closing = tag_src.ends_with('/');
            let body = tag_src.trim_end_matches('/');
            let data = parse_tag(body).ok_or(MarkupError::BadTag { at: tag_start })?;
            let is_void = self_closing || VOID_TAGS.contains(&data.tag.as_str());
            let tag = data.tag.clone();
            let current = stack.last().map(|(id, _)| *id).unwrap_or(parent);
            let node = doc.create_element(data);
            doc.append_child(current, node)?;
            if !is_void {
                stack.push((node, tag));
            }
            continue;
        }

        let next = rest.find('<').unwrap_or(rest.len());
        let text = decode_entities(&rest[..next]);
        pos += next;
        if !text.is_empty() {
            let current = stack.last().map(|(id, _)| *id).unwrap_or(parent);
            let node = doc.create_text(&text);
            doc.append_child(current, node)?;
        }
    }

    if stack.len() > 1 {
        return Err(MarkupError::UnexpectedEof {
            open: stack.pop().map(|(_, tag)| tag),
        });
    }
    Ok(())
}

fn parse_tag(src: &str) -> Option<ElementData> {
    let src = src.trim();
    let name_end = src.find(char::is_whitespace).unwrap_or(src.len());
    let name = &src[..name_end];
    if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return None;
    }
    let mut data = ElementData::new(name);
    let mut rest = src[name_end..].trim_start();

    while !rest.is_empty() {
        let key_end = rest
            .find(|c: char| c == '=' || c.is_whitespace())
            .unwrap_or(rest.len());
        let key = &rest[..key_end];
        if key.is_empty() {
            return None;
        }
        rest = rest[key_end..].trim_start();
        if let Some(after_eq) = rest.strip_prefix('=') {
            let after_eq = after_eq.trim_start();
            let quote = after_eq.chars().next()?;
            if quote == '"' || quote == '\'' {
                let close = after_eq[1..].find(quote)?;
                data.set_attr(key, &decode_entities(&after_eq[1..1 + close]));
                rest = after_eq[close + 2..].trim_start();
            } else {
                let end = after_eq.find(char::is_whitespace).unwrap_or(after_eq.len());
                data.set_attr(key, &after_eq[..end]);
                rest = after_eq[end..].trim_start();
            }
        } else {
            data.set_attr(key, "");
        }
    }
    Some(data)
}

fn decode_entities(raw: &str) -> String {
    if !raw.contains('&') {
        return raw.to_string();
    }
    raw.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&nbsp;", "\u{a0}")
        .replace("&amp;", "&")
}

fn escape_text(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
}

/// Outer markup of `node`.
pub fn render<D: Document + ?Sized>(doc: &D, node: NodeId) -> String {
    let mut out = String::new();
    render_node(doc, node, &mut out);
    out
}

/// Markup of the children of `node`, without `node`'s own tags.
pub fn render_inner<D: Document + ?Sized>(doc: &D, node: NodeId) -> String {
    let mut out = String::new();
    for &child in doc.children(node) {
        render_node(doc, child, &mut out);
    }
    out
}

fn render_node<D: Document + ?Sized>(doc: &D, node: NodeId, out: &mut String) {
    if let Some(text) = doc.text(node) {
        escape_text(text, out);
        return;
    }
    let Some(data) = doc.element(node) else {
        return;
    };
    out.push('<');
    out.push_str(&data.tag);
    for (key, value) in &data.attrs {
        out.push(' ');
        out.push_str(key);
        out.push_str("=\"");
        for c in value.chars() {
            match c {
                '&' => out.push_str("&amp;"),
                '"' => out.push_str("&quot;"),
                _ => out.push(c),
            }
        }
        out.push('"');
    }
    if VOID_TAGS.contains(&data.tag.as_str()) && doc.children(node).is_empty() {
        out.push_str("/>");
        return;
    }
    out.push('>');
    for &child in doc.children(node) {
        render_node(doc, child, out);
    }
    out.push_str("</");
    out.push_str(&data.tag);
    out.push('>');
}
