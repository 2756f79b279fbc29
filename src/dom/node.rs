use super::{DomError, Listener};

/// Handle to a node inside a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Root,
    Element {
        tag: String,
        attributes: Vec<(String, String)>,
    },
    Text(String),
    Comment(String),
    Doctype(String),
}

#[derive(Debug, Clone)]
struct Node {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    listeners: Vec<Listener>,
}

impl Node {
    fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            parent: None,
            children: Vec::new(),
            listeners: Vec::new(),
        }
    }
}

/// Arena-backed document tree.
///
/// A node removed from the tree simply becomes detached until
/// [`Document::remove_subtree`] frees its slot for reuse. Only nodes reachable
/// from [`Document::root`] are visible to queries and serialization.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
    free: Vec<usize>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new(NodeKind::Root)],
            free: Vec::new(),
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    fn push(&mut self, kind: NodeKind) -> NodeId {
        if let Some(slot) = self.free.pop() {
            self.nodes[slot] = Node::new(kind);
            return NodeId(slot);
        }
        self.nodes.push(Node::new(kind));
        NodeId(self.nodes.len() - 1)
    }

    /// Number of live nodes, attached or not.
    pub fn node_count(&self) -> usize {
        self.nodes.len() - self.free.len()
    }

    /// Detaches `id` and frees it together with everything below it.
    ///
    /// The freed ids are handed out again by later insertions, so no handle
    /// into the subtree may be used afterwards. The root is never removed.
    pub fn remove_subtree(&mut self, id: NodeId) {
        if id == self.root() {
            return;
        }
        self.detach(id);
        for node in self.descendants(id) {
            self.nodes[node.0] = Node::new(NodeKind::Text(String::new()));
            self.free.push(node.0);
        }
    }

    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.push(NodeKind::Element {
            tag: tag.to_string(),
            attributes: Vec::new(),
        })
    }

    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.push(NodeKind::Text(text.to_string()))
    }

    pub(super) fn create_node(&mut self, kind: NodeKind) -> NodeId {
        self.push(kind)
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.node(id).kind
    }

    pub(super) fn kind_mut(&mut self, id: NodeId) -> &mut NodeKind {
        &mut self.node_mut(id).kind
    }

    pub fn tag(&self, id: NodeId) -> Option<&str> {
        match &self.node(id).kind {
            NodeKind::Element { tag, .. } => Some(tag),
            _ => None,
        }
    }

    pub fn is_element(&self, id: NodeId) -> bool {
        self.tag(id).is_some()
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).children
    }

    pub fn first_element_child(&self, id: NodeId) -> Option<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .find(|&child| self.is_element(child))
    }

    /// Returns `true` if `id` is reachable from the root.
    pub fn is_attached(&self, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(node) = current {
            if node == self.root() {
                return true;
            }
            current = self.parent(node);
        }
        false
    }

    pub fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.node_mut(id).parent.take() {
            self.node_mut(parent).children.retain(|&child| child != id);
        }
    }

    /// Appends `child` to `parent`, moving it out of its previous parent.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        self.node_mut(child).parent = Some(parent);
        self.node_mut(parent).children.push(child);
    }

    pub fn insert_before(
        &mut self,
        parent: NodeId,
        child: NodeId,
        reference: NodeId,
    ) -> Result<(), DomError> {
        if self.parent(reference) != Some(parent) {
            return Err(DomError::NotAChild {
                parent,
                child: reference,
            });
        }
        self.detach(child);
        let siblings = &mut self.node_mut(parent).children;
        let position = siblings
            .iter()
            .position(|&sibling| sibling == reference)
            .unwrap_or(siblings.len());
        siblings.insert(position, child);
        self.node_mut(child).parent = Some(parent);
        Ok(())
    }

    /// Puts `new` where `old` was; `old` ends up detached.
    pub fn replace_child(
        &mut self,
        parent: NodeId,
        new: NodeId,
        old: NodeId,
    ) -> Result<(), DomError> {
        if new == old {
            return Ok(());
        }
        self.insert_before(parent, new, old)?;
        self.detach(old);
        Ok(())
    }

    /// Pre-order list of `id` and everything below it.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(self.children(node).iter().rev().copied());
        }
        out
    }

    /// The concatenated text of every text node below `id`, unmodified.
    pub fn text_content(&self, id: NodeId) -> String {
        self.descendants(id)
            .into_iter()
            .filter_map(|node| match &self.node(node).kind {
                NodeKind::Text(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Deep copy of the subtree at `id`. The copy is detached and carries no listeners.
    pub fn clone_subtree(&mut self, id: NodeId) -> NodeId {
        let kind = self.node(id).kind.clone();
        let copy = self.push(kind);
        let children = self.children(id).to_vec();
        for child in children {
            let child_copy = self.clone_subtree(child);
            self.append_child(copy, child_copy);
        }
        copy
    }

    // Attributes

    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        match &self.node(id).kind {
            NodeKind::Element { attributes, .. } => attributes
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.as_str()),
            _ => None,
        }
    }

    fn attributes_mut(&mut self, id: NodeId) -> Result<&mut Vec<(String, String)>, DomError> {
        match &mut self.node_mut(id).kind {
            NodeKind::Element { attributes, .. } => Ok(attributes),
            _ => Err(DomError::NotAnElement(id)),
        }
    }

    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) -> Result<(), DomError> {
        let attributes = self.attributes_mut(id)?;
        match attributes.iter_mut().find(|(key, _)| key == name) {
            Some((_, existing)) => *existing = value.to_string(),
            None => attributes.push((name.to_string(), value.to_string())),
        }
        Ok(())
    }

    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> Result<(), DomError> {
        self.attributes_mut(id)?.retain(|(key, _)| key != name);
        Ok(())
    }

    // Class list

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.attribute(id, "class")
            .is_some_and(|classes| classes.split_whitespace().any(|c| c == class))
    }

    fn write_classes(&mut self, id: NodeId, classes: Vec<&str>) -> Result<(), DomError> {
        let joined = classes.join(" ");
        self.set_attribute(id, "class", &joined)
    }

    pub fn add_class(&mut self, id: NodeId, class: &str) -> Result<(), DomError> {
        if self.has_class(id, class) {
            return Ok(());
        }
        let current = self.attribute(id, "class").unwrap_or_default().to_string();
        let mut classes: Vec<&str> = current.split_whitespace().collect();
        classes.push(class);
        self.write_classes(id, classes)
    }

    pub fn remove_class(&mut self, id: NodeId, class: &str) -> Result<(), DomError> {
        if !self.has_class(id, class) {
            return Ok(());
        }
        let current = self.attribute(id, "class").unwrap_or_default().to_string();
        let classes = current.split_whitespace().filter(|&c| c != class).collect();
        self.write_classes(id, classes)
    }

    /// Flips `class` and returns whether it is now present.
    pub fn toggle_class(&mut self, id: NodeId, class: &str) -> Result<bool, DomError> {
        if self.has_class(id, class) {
            self.remove_class(id, class)?;
            Ok(false)
        } else {
            self.add_class(id, class)?;
            Ok(true)
        }
    }

    // Inline style

    fn style_declarations(&self, id: NodeId) -> Vec<(String, String)> {
        self.attribute(id, "style")
            .unwrap_or_default()
            .split(';')
            .filter_map(|declaration| {
                let (property, value) = declaration.split_once(':')?;
                Some((property.trim().to_string(), value.trim().to_string()))
            })
            .filter(|(property, _)| !property.is_empty())
            .collect()
    }

    pub fn style_property(&self, id: NodeId, property: &str) -> Option<String> {
        self.style_declarations(id)
            .into_iter()
            .find(|(name, _)| name == property)
            .map(|(_, value)| value)
    }

    pub fn set_style_property(
        &mut self,
        id: NodeId,
        property: &str,
        value: &str,
    ) -> Result<(), DomError> {
        let mut declarations = self.style_declarations(id);
        match declarations.iter_mut().find(|(name, _)| name == property) {
            Some((_, existing)) => *existing = value.to_string(),
            None => declarations.push((property.to_string(), value.to_string())),
        }
        let style = declarations
            .iter()
            .map(|(name, value)| format!("{name}: {value}"))
            .collect::<Vec<_>>()
            .join("; ");
        self.set_attribute(id, "style", &style)
    }

    // Form controls

    pub fn is_checkbox(&self, id: NodeId) -> bool {
        self.tag(id) == Some("input") && self.attribute(id, "type") == Some("checkbox")
    }

    pub fn is_checked(&self, id: NodeId) -> bool {
        self.attribute(id, "checked").is_some()
    }

    pub fn set_checked(&mut self, id: NodeId, checked: bool) -> Result<(), DomError> {
        if checked {
            self.set_attribute(id, "checked", "checked")
        } else {
            self.remove_attribute(id, "checked")
        }
    }

    // Listeners

    pub fn add_listener(&mut self, id: NodeId, listener: Listener) {
        self.node_mut(id).listeners.push(listener);
    }

    pub fn listeners(&self, id: NodeId) -> &[Listener] {
        &self.node(id).listeners
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree() -> (Document, NodeId, NodeId, NodeId) {
        let mut doc = Document::new();
        let body = doc.create_element("body");
        let a = doc.create_element("p");
        let b = doc.create_element("pre");
        let root = doc.root();
        doc.append_child(root, body);
        doc.append_child(body, a);
        doc.append_child(body, b);
        (doc, body, a, b)
    }

    #[test]
    fn insert_before_keeps_sibling_order() {
        let (mut doc, body, a, b) = tree();
        let wrapper = doc.create_element("div");
        doc.insert_before(body, wrapper, b).unwrap();
        doc.append_child(wrapper, b);
        assert_eq!(doc.children(body), &[a, wrapper]);
        assert_eq!(doc.children(wrapper), &[b]);
        assert_eq!(doc.parent(b), Some(wrapper));
    }

    #[test]
    fn replace_child_detaches_old_node() {
        let (mut doc, body, a, b) = tree();
        let new = doc.create_element("svg");
        doc.replace_child(body, new, a).unwrap();
        assert_eq!(doc.children(body), &[new, b]);
        assert_eq!(doc.parent(a), None);
        assert!(!doc.is_attached(a));
    }

    #[test]
    fn replace_child_rejects_foreign_reference() {
        let (mut doc, _, a, b) = tree();
        let new = doc.create_element("svg");
        assert_eq!(
            doc.replace_child(a, new, b),
            Err(DomError::NotAChild { parent: a, child: b })
        );
        assert_eq!(doc.parent(new), None);
    }

    #[test]
    fn clone_subtree_is_independent() {
        let (mut doc, body, a, _) = tree();
        let text = doc.create_text("hello");
        doc.append_child(a, text);
        doc.set_attribute(a, "class", "x").unwrap();

        let copy = doc.clone_subtree(a);
        assert_ne!(copy, a);
        assert_eq!(doc.parent(copy), None);
        assert_eq!(doc.text_content(copy), "hello");

        doc.set_attribute(copy, "class", "y").unwrap();
        assert_eq!(doc.attribute(a, "class"), Some("x"));
        assert_eq!(doc.children(body).len(), 2);
    }

    #[test]
    fn removed_subtrees_free_their_slots() {
        let (mut doc, body, a, b) = tree();
        let text = doc.create_text("gone");
        doc.append_child(a, text);
        let before = doc.node_count();

        doc.remove_subtree(a);
        assert_eq!(doc.node_count(), before - 2);
        assert_eq!(doc.children(body), &[b]);

        let reused = doc.create_element("svg");
        let again = doc.create_element("g");
        assert!([a, text].contains(&reused));
        assert!([a, text].contains(&again));
        assert_eq!(doc.children(reused), &[] as &[NodeId]);
        assert_eq!(doc.parent(reused), None);
        assert_eq!(doc.node_count(), before);

        let root = doc.root();
        doc.remove_subtree(root);
        assert_eq!(doc.node_count(), before);
    }

    #[test]
    fn class_list_operations() {
        let (mut doc, _, a, _) = tree();
        doc.add_class(a, "railroad_modal").unwrap();
        doc.add_class(a, "railroad_active").unwrap();
        doc.add_class(a, "railroad_active").unwrap();
        assert_eq!(doc.attribute(a, "class"), Some("railroad_modal railroad_active"));

        assert!(!doc.toggle_class(a, "railroad_active").unwrap());
        assert!(!doc.has_class(a, "railroad_active"));
        assert!(doc.toggle_class(a, "railroad_active").unwrap());
        doc.remove_class(a, "railroad_modal").unwrap();
        assert_eq!(doc.attribute(a, "class"), Some("railroad_active"));
    }

    #[test]
    fn style_properties_are_updated_in_place() {
        let (mut doc, _, a, _) = tree();
        doc.set_attribute(a, "style", "position: relative; display: inline").unwrap();
        doc.set_style_property(a, "display", "block").unwrap();
        doc.set_style_property(a, "width", "420px").unwrap();
        assert_eq!(
            doc.attribute(a, "style"),
            Some("position: relative; display: block; width: 420px")
        );
        assert_eq!(doc.style_property(a, "width").as_deref(), Some("420px"));
    }

    #[test]
    fn attributes_on_text_nodes_are_rejected() {
        let mut doc = Document::new();
        let text = doc.create_text("x");
        assert_eq!(
            doc.set_attribute(text, "id", "y"),
            Err(DomError::NotAnElement(text))
        );
    }

    #[test]
    fn checkbox_state_follows_attribute_presence() {
        let mut doc = Document::new();
        let input = doc.create_element("input");
        doc.set_attribute(input, "type", "checkbox").unwrap();
        assert!(doc.is_checkbox(input));
        assert!(!doc.is_checked(input));
        doc.set_checked(input, true).unwrap();
        assert!(doc.is_checked(input));
        doc.set_checked(input, false).unwrap();
        assert!(!doc.is_checked(input));
    }
}
