//! The full-screen view of one instance's diagram.
//!
//! ```text
//! div.railroad_modal            (.railroad_active while open)
//!   div.railroad_modal_backdrop (click here closes)
//!   div.railroad_modal_content  (holds the visual)
//! ```
//!
//! Backdrop and content are siblings, and the close listener only reacts
//! when the backdrop itself is the event target, so clicks anywhere inside
//! the diagram never close the overlay.

use crate::dom::{Document, DomError, EventKind, Listener, NodeId};
use crate::instance::{Action, Command};

const MODAL_CLASS: &str = "railroad_modal";
const BACKDROP_CLASS: &str = "railroad_modal_backdrop";
const CONTENT_CLASS: &str = "railroad_modal_content";
const ACTIVE_CLASS: &str = "railroad_active";
const UNSTYLED: &str = "display: none";

/// `onload` hook for the stylesheet link that undoes [`Modal::hide_until_styled`].
pub const REVEAL_ON_STYLESHEET_LOAD: &str = concat!(
    "for (const n of document.getElementsByClassName('railroad_modal')) ",
    "{ n.removeAttribute('style'); }"
);

#[derive(Debug, Clone)]
pub struct Modal {
    root: NodeId,
    backdrop: NodeId,
    content: NodeId,
    visual: NodeId,
    visible: bool,
}

impl Modal {
    /// Builds a hidden, detached modal for instance `instance`.
    pub fn build(doc: &mut Document, instance: usize) -> Result<Self, DomError> {
        let root = doc.create_element("div");
        doc.set_attribute(root, "class", MODAL_CLASS)?;

        let backdrop = doc.create_element("div");
        doc.set_attribute(backdrop, "class", BACKDROP_CLASS)?;
        doc.add_listener(
            backdrop,
            Listener::target_only(
                EventKind::Click,
                Action {
                    instance,
                    command: Command::CloseModal,
                },
            ),
        );

        let content = doc.create_element("div");
        doc.set_attribute(content, "class", CONTENT_CLASS)?;
        let visual = doc.create_element("svg");
        doc.append_child(content, visual);

        doc.append_child(root, backdrop);
        doc.append_child(root, content);

        Ok(Self {
            root,
            backdrop,
            content,
            visual,
            visible: false,
        })
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn backdrop(&self) -> NodeId {
        self.backdrop
    }

    pub fn content(&self) -> NodeId {
        self.content
    }

    pub fn visual(&self) -> NodeId {
        self.visual
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Keeps the modal out of the layout until the injected stylesheet has
    /// loaded; [`REVEAL_ON_STYLESHEET_LOAD`] lifts it again.
    pub fn hide_until_styled(&self, doc: &mut Document) -> Result<(), DomError> {
        doc.set_attribute(self.root, "style", UNSTYLED)
    }

    pub fn open(&mut self, doc: &mut Document) -> Result<(), DomError> {
        doc.add_class(self.root, ACTIVE_CLASS)?;
        self.visible = true;
        Ok(())
    }

    pub fn close(&mut self, doc: &mut Document) -> Result<(), DomError> {
        doc.remove_class(self.root, ACTIVE_CLASS)?;
        self.visible = false;
        Ok(())
    }

    /// Swaps in a new visual without touching the open/closed state.
    pub fn replace_visual(&mut self, doc: &mut Document, visual: NodeId) -> Result<(), DomError> {
        doc.replace_child(self.content, visual, self.visual)?;
        doc.remove_subtree(self.visual);
        self.visual = visual;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mounted() -> (Document, Modal) {
        let mut doc = Document::new();
        let modal = Modal::build(&mut doc, 3).unwrap();
        let root = doc.root();
        doc.append_child(root, modal.root());
        (doc, modal)
    }

    #[test]
    fn starts_hidden_with_sibling_layout() {
        let (doc, modal) = mounted();
        assert!(!modal.is_visible());
        assert!(!doc.has_class(modal.root(), ACTIVE_CLASS));
        assert_eq!(doc.children(modal.root()), &[modal.backdrop(), modal.content()]);
        assert_eq!(doc.parent(modal.visual()), Some(modal.content()));
    }

    #[test]
    fn only_the_backdrop_closes() {
        let (doc, modal) = mounted();
        let close = Action {
            instance: 3,
            command: Command::CloseModal,
        };
        assert_eq!(doc.dispatch(modal.backdrop(), EventKind::Click), vec![close]);
        assert!(doc.dispatch(modal.content(), EventKind::Click).is_empty());
        assert!(doc.dispatch(modal.visual(), EventKind::Click).is_empty());
        assert!(doc.dispatch(modal.root(), EventKind::Click).is_empty());
    }

    #[test]
    fn open_close_track_class() {
        let (mut doc, mut modal) = mounted();
        modal.open(&mut doc).unwrap();
        modal.open(&mut doc).unwrap();
        assert!(modal.is_visible());
        assert_eq!(doc.attribute(modal.root(), "class"), Some("railroad_modal railroad_active"));
        modal.close(&mut doc).unwrap();
        assert!(!modal.is_visible());
        assert_eq!(doc.attribute(modal.root(), "class"), Some("railroad_modal"));
    }

    #[test]
    fn replacing_visual_keeps_modal_open() {
        let (mut doc, mut modal) = mounted();
        modal.open(&mut doc).unwrap();
        let count = doc.node_count();
        let new = doc.parse_fragment("<svg><g/></svg>").unwrap();
        modal.replace_visual(&mut doc, new).unwrap();
        assert!(modal.is_visible());
        assert_eq!(modal.visual(), new);
        assert_eq!(doc.children(modal.content()), &[new]);
        // the old placeholder is freed, only the new <g> is extra
        assert_eq!(doc.node_count(), count + 1);
    }

    #[test]
    fn hidden_until_styled() {
        let (mut doc, modal) = mounted();
        modal.hide_until_styled(&mut doc).unwrap();
        assert_eq!(doc.style_property(modal.root(), "display").as_deref(), Some("none"));
        assert!(REVEAL_ON_STYLESHEET_LOAD.contains(MODAL_CLASS));
    }
}
