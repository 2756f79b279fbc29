use super::parse::{is_raw_text, is_void};
use super::{Document, NodeId, NodeKind};
use crate::xml::escape_xml;

impl Document {
    /// Serializes everything attached to the root.
    pub fn to_markup(&self) -> String {
        let mut out = String::new();
        for &child in self.children(self.root()) {
            self.write_node(child, &mut out);
        }
        out
    }

    /// Serializes `id` together with its subtree.
    pub fn outer_markup(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_node(id, &mut out);
        out
    }

    fn write_node(&self, id: NodeId, out: &mut String) {
        match self.kind(id) {
            NodeKind::Root => {
                for &child in self.children(id) {
                    self.write_node(child, out);
                }
            }
            NodeKind::Element { tag, attributes } => {
                out.push('<');
                out.push_str(tag);
                for (key, value) in attributes {
                    out.push(' ');
                    out.push_str(key);
                    // `defer`, `open`: an empty value is written as a bare name
                    if value.is_empty() {
                        continue;
                    }
                    out.push_str("=\"");
                    out.push_str(&escape_xml(value));
                    out.push('"');
                }
                let children = self.children(id);
                if children.is_empty() && is_void(tag) {
                    out.push_str("/>");
                    return;
                }
                out.push('>');
                let raw = is_raw_text(tag);
                for &child in children {
                    match self.kind(child) {
                        NodeKind::Text(text) if raw => out.push_str(text),
                        _ => self.write_node(child, out),
                    }
                }
                out.push_str("</");
                out.push_str(tag);
                out.push('>');
            }
            NodeKind::Text(text) => out.push_str(&escape_xml(text)),
            NodeKind::Comment(text) => {
                out.push_str("<!--");
                out.push_str(text);
                out.push_str("-->");
            }
            NodeKind::Doctype(text) => {
                out.push_str("<!DOCTYPE ");
                out.push_str(text);
                out.push('>');
            }
        }
    }
}
