use super::{Document, NodeId};
use crate::instance::Action;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Click,
    Change,
}

/// A listener registered on a node.
///
/// With `target_only` set the listener ignores events bubbling up from
/// descendants and fires only when its own node is the event target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Listener {
    pub kind: EventKind,
    pub action: Action,
    pub target_only: bool,
}

impl Listener {
    pub fn bubbling(kind: EventKind, action: Action) -> Self {
        Self {
            kind,
            action,
            target_only: false,
        }
    }

    pub fn target_only(kind: EventKind, action: Action) -> Self {
        Self {
            kind,
            action,
            target_only: true,
        }
    }
}

impl Document {
    /// Runs an event from `target` up to the root and returns the actions of
    /// every listener it triggers, innermost first.
    pub fn dispatch(&self, target: NodeId, kind: EventKind) -> Vec<Action> {
        let mut fired = Vec::new();
        let mut current = Some(target);
        while let Some(node) = current {
            for listener in self.listeners(node) {
                if listener.kind != kind || (listener.target_only && node != target) {
                    continue;
                }
                fired.push(listener.action);
            }
            current = self.parent(node);
        }
        fired
    }
}
