use quick_xml::events::{BytesStart, Event as XmlEvent};
use quick_xml::reader::Reader as XmlReader;

use super::{Document, DomError, NodeId, NodeKind};
use crate::xml::{decode_entities, resolve_entity};

/// HTML elements that never have content and may appear without a closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

/// Elements whose body is text up to the matching end tag, markup or not.
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

/// Like [`RAW_TEXT_ELEMENTS`], but character references in the body are decoded.
const ESCAPABLE_RAW_TEXT_ELEMENTS: &[&str] = &["textarea", "title"];

pub(super) fn is_void(tag: &str) -> bool {
    VOID_ELEMENTS.iter().any(|void| void.eq_ignore_ascii_case(tag))
}

pub(super) fn is_raw_text(tag: &str) -> bool {
    RAW_TEXT_ELEMENTS.iter().any(|raw| raw.eq_ignore_ascii_case(tag))
}

fn is_escapable_raw_text(tag: &str) -> bool {
    ESCAPABLE_RAW_TEXT_ELEMENTS
        .iter()
        .any(|raw| raw.eq_ignore_ascii_case(tag))
}

fn element_kind(e: &BytesStart<'_>) -> NodeKind {
    let tag = String::from_utf8_lossy(e.name().as_ref()).to_string();
    let attributes = e
        .html_attributes()
        .with_checks(false)
        .filter_map(|a| a.ok())
        .map(|a| {
            let key = String::from_utf8_lossy(a.key.as_ref()).to_string();
            let value = decode_entities(&String::from_utf8_lossy(&a.value));
            (key, value)
        })
        .collect();
    NodeKind::Element { tag, attributes }
}

/// Splits `markup` (which starts right after `<tag ...>`) into the element body
/// and the byte offset just past its end tag. An unterminated body runs to the end.
fn raw_text_body<'a>(markup: &'a str, tag: &str) -> (&'a str, usize) {
    let bytes = markup.as_bytes();
    let mut from = 0;
    while let Some(found) = markup[from..].find("</") {
        let open = from + found;
        let name_end = open + 2 + tag.len();
        let names_match = bytes
            .get(open + 2..name_end)
            .is_some_and(|name| name.eq_ignore_ascii_case(tag.as_bytes()));
        let boundary = bytes
            .get(name_end)
            .is_some_and(|&b| b == b'>' || b == b'/' || b.is_ascii_whitespace());
        if names_match && boundary {
            let close = markup[name_end..]
                .find('>')
                .map_or(markup.len(), |gt| name_end + gt + 1);
            return (&markup[..open], close);
        }
        from = open + 2;
    }
    (markup, markup.len())
}

fn new_reader(markup: &str) -> XmlReader<&[u8]> {
    let mut reader = XmlReader::from_str(markup);
    let config = reader.config_mut();
    config.check_end_names = false;
    config.allow_unmatched_ends = true;
    reader
}

impl Document {
    /// Parses a complete document.
    pub fn parse(markup: &str) -> Result<Self, DomError> {
        let mut doc = Self::new();
        let root = doc.root();
        doc.read_into(root, markup)?;
        Ok(doc)
    }

    /// Parses `markup` into a detached subtree and returns its first element.
    ///
    /// Everything else in `markup` is discarded.
    pub fn parse_fragment(&mut self, markup: &str) -> Result<NodeId, DomError> {
        let holder = self.create_element("template");
        let fragment = self
            .read_into(holder, markup)
            .and_then(|()| self.first_element_child(holder).ok_or(DomError::EmptyFragment));
        if let Ok(first) = fragment {
            self.detach(first);
        }
        self.remove_subtree(holder);
        fragment
    }

    fn append_text(&mut self, parent: NodeId, text: &str) {
        if text.is_empty() {
            return;
        }
        let last = self.children(parent).last().copied();
        if let Some(last) = last {
            if let NodeKind::Text(existing) = self.kind_mut(last) {
                existing.push_str(text);
                return;
            }
        }
        let node = self.create_text(text);
        self.append_child(parent, node);
    }

    fn read_into(&mut self, parent: NodeId, markup: &str) -> Result<(), DomError> {
        // (tag, node) of every element still open
        let mut stack: Vec<(String, NodeId)> = Vec::new();
        // quick-xml tokenizes `<` inside scripts, so raw-text bodies are cut
        // out by hand and parsing resumes with a fresh reader after them.
        let mut offset = 0;

        'segments: while offset < markup.len() {
            let mut reader = new_reader(&markup[offset..]);
            loop {
                let current = stack.last().map_or(parent, |(_, node)| *node);
                let event = reader.read_event().map_err(|e| DomError::Markup {
                    position: offset as u64 + reader.error_position(),
                    message: e.to_string(),
                })?;
                match event {
                    XmlEvent::Start(e) => {
                        let kind = element_kind(&e);
                        let node = self.create_node(kind);
                        self.append_child(current, node);
                        let tag = self.tag(node).unwrap_or_default().to_string();
                        let raw = is_raw_text(&tag);
                        if raw || is_escapable_raw_text(&tag) {
                            let body_start = offset + reader.buffer_position() as usize;
                            let (body, consumed) = raw_text_body(&markup[body_start..], &tag);
                            if raw {
                                self.append_text(node, body);
                            } else {
                                self.append_text(node, &decode_entities(body));
                            }
                            offset = body_start + consumed;
                            continue 'segments;
                        }
                        if !is_void(&tag) {
                            stack.push((tag, node));
                        }
                    }
                    XmlEvent::Empty(e) => {
                        let node = self.create_node(element_kind(&e));
                        self.append_child(current, node);
                    }
                    XmlEvent::End(e) => {
                        let tag = String::from_utf8_lossy(e.name().as_ref()).to_string();
                        if let Some(open) = stack.iter().rposition(|(name, _)| *name == tag) {
                            stack.truncate(open);
                        }
                    }
                    XmlEvent::Text(e) => {
                        let text = e.decode().unwrap_or_default();
                        self.append_text(current, &text);
                    }
                    XmlEvent::CData(e) => {
                        let text = String::from_utf8_lossy(&e).to_string();
                        self.append_text(current, &text);
                    }
                    XmlEvent::GeneralRef(e) => {
                        let name = e.decode().unwrap_or_default().to_string();
                        match resolve_entity(&name) {
                            Some(resolved) => self.append_text(current, &resolved),
                            None => self.append_text(current, &format!("&{name};")),
                        }
                    }
                    XmlEvent::Comment(e) => {
                        let text = String::from_utf8_lossy(&e).to_string();
                        let node = self.create_node(NodeKind::Comment(text));
                        self.append_child(current, node);
                    }
                    XmlEvent::DocType(e) => {
                        let text = String::from_utf8_lossy(&e).trim().to_string();
                        let node = self.create_node(NodeKind::Doctype(text));
                        self.append_child(current, node);
                    }
                    XmlEvent::Eof => break 'segments,
                    _ => {}
                }
            }
        }
        Ok(())
    }
}
