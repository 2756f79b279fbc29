//! A small owned document model.
//!
//! The host document is held in an arena and driven from the outside: the
//! embedder parses markup into a [`Document`], pushes user input in as events
//! and serializes the result back out. Listeners are plain data, so a
//! dispatch yields the actions to run instead of calling back into closures.

mod event;
mod node;
mod parse;
mod selector;
mod serialize;

pub use event::{EventKind, Listener};
pub use node::{Document, NodeId, NodeKind};
pub use selector::Selector;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DomError {
    #[error("malformed markup at byte {position}: {message}")]
    Markup { position: u64, message: String },
    #[error("markup contains no element")]
    EmptyFragment,
    #[error("node {0:?} is not an element")]
    NotAnElement(NodeId),
    #[error("node {child:?} is not a child of {parent:?}")]
    NotAChild { parent: NodeId, child: NodeId },
}
