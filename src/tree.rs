//! Arena document tree.
//!
//! Nodes live in one flat vector and refer to each other by index; children
//! are owned in order by their parent, parents are non-owning back
//! references.  Unlinked nodes stay in the arena (they are simply no longer
//! reachable from the root), which keeps every `NodeId` valid for the life
//! of the document.

use crate::dtd::{AttributeDef, ElementId};

pub type NodeId = usize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttrInstance {
    pub def: &'static AttributeDef,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Element {
        elem: ElementId,
        attributes: Vec<AttrInstance>,
    },
    Text(String),
    CData(String),
    Comment(String),
}

#[derive(Debug, Clone)]
pub struct Node {
    pub kind: NodeKind,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

#[derive(Debug, Default)]
pub struct Document {
    nodes: Vec<Node>,
    pub root: Option<NodeId>,
}

impl Document {
    pub fn new() -> Document {
        Document::default()
    }

    fn push(&mut self, kind: NodeKind) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(Node { kind, parent: None, children: Vec::new() });
        id
    }

    pub fn new_element(&mut self, elem: ElementId) -> NodeId {
        self.push(NodeKind::Element { elem, attributes: Vec::new() })
    }

    pub fn new_text(&mut self, text: impl Into<String>) -> NodeId {
        self.push(NodeKind::Text(text.into()))
    }

    pub fn new_cdata(&mut self, text: impl Into<String>) -> NodeId {
        self.push(NodeKind::CData(text.into()))
    }

    pub fn new_comment(&mut self, text: impl Into<String>) -> NodeId {
        self.push(NodeKind::Comment(text.into()))
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    /// Append `child` as the last child of `parent`.
    pub fn link_child(&mut self, parent: NodeId, child: NodeId) {
        debug_assert!(self.nodes[child].parent.is_none());
        self.nodes[child].parent = Some(parent);
        self.nodes[parent].children.push(child);
    }

    /// Insert `child` as the first child of `parent`.
    pub fn link_first_child(&mut self, parent: NodeId, child: NodeId) {
        debug_assert!(self.nodes[child].parent.is_none());
        self.nodes[child].parent = Some(parent);
        self.nodes[parent].children.insert(0, child);
    }

    /// Detach `node` from its parent (or clear the root if it is the root).
    pub fn unlink(&mut self, node: NodeId) {
        if let Some(parent) = self.nodes[node].parent.take() {
            self.nodes[parent].children.retain(|&c| c != node);
        } else if self.root == Some(node) {
            self.root = None;
        }
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node].parent
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        &self.nodes[node].children
    }

    pub fn element_id(&self, node: NodeId) -> Option<ElementId> {
        match self.nodes[node].kind {
            NodeKind::Element { elem, .. } => Some(elem),
            _ => None,
        }
    }

    pub fn is_element(&self, node: NodeId, elem: ElementId) -> bool {
        self.element_id(node) == Some(elem)
    }

    /// Element ids of the element children, in document order.
    pub fn element_child_ids(&self, node: NodeId) -> Vec<ElementId> {
        self.nodes[node]
            .children
            .iter()
            .filter_map(|&c| self.element_id(c))
            .collect()
    }

    pub fn find_child_element(&self, node: NodeId, elem: ElementId) -> Option<NodeId> {
        self.nodes[node]
            .children
            .iter()
            .copied()
            .find(|&c| self.is_element(c, elem))
    }

    /// Set an attribute, replacing any instance of the same name.
    pub fn set_attribute(&mut self, node: NodeId, def: &'static AttributeDef, value: String) {
        if let NodeKind::Element { attributes, .. } = &mut self.nodes[node].kind {
            if let Some(existing) = attributes.iter_mut().find(|a| a.def.name == def.name) {
                existing.value = value;
            } else {
                attributes.push(AttrInstance { def, value });
            }
        }
    }

    pub fn get_attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        match &self.nodes[node].kind {
            NodeKind::Element { attributes, .. } => attributes
                .iter()
                .find(|a| a.def.name == name)
                .map(|a| a.value.as_str()),
            _ => None,
        }
    }

    pub fn attributes(&self, node: NodeId) -> &[AttrInstance] {
        match &self.nodes[node].kind {
            NodeKind::Element { attributes, .. } => attributes,
            _ => &[],
        }
    }

    /// Append character data, merging into a trailing text node when one is
    /// already there.
    pub fn append_character_data(&mut self, parent: NodeId, text: &str) {
        if let Some(&last) = self.nodes[parent].children.last() {
            if let NodeKind::Text(existing) = &mut self.nodes[last].kind {
                existing.push_str(text);
                return;
            }
        }
        let node = self.new_text(text);
        self.link_child(parent, node);
    }

    /// Walk ancestors from `node` (inclusive) to the root.
    pub fn ancestors_or_self(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(Some(node), |&n| self.nodes[n].parent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dtd::data::{ATT_CLASS, ATT_ID, ELM_BODY, ELM_HTML, ELM_LI, ELM_P, ELM_UL};

    #[test]
    fn links_and_unlinks_children() {
        let mut doc = Document::new();
        let ul = doc.new_element(ELM_UL);
        let li1 = doc.new_element(ELM_LI);
        let li2 = doc.new_element(ELM_LI);
        doc.link_child(ul, li1);
        doc.link_child(ul, li2);
        assert_eq!(doc.children(ul), &[li1, li2]);
        assert_eq!(doc.parent(li1), Some(ul));

        doc.unlink(li1);
        assert_eq!(doc.children(ul), &[li2]);
        assert_eq!(doc.parent(li1), None);
    }

    #[test]
    fn unlinking_the_root_clears_it() {
        let mut doc = Document::new();
        let html = doc.new_element(ELM_HTML);
        doc.root = Some(html);
        doc.unlink(html);
        assert_eq!(doc.root, None);
    }

    #[test]
    fn first_child_insertion_keeps_order() {
        let mut doc = Document::new();
        let html = doc.new_element(ELM_HTML);
        let body = doc.new_element(ELM_BODY);
        let p = doc.new_element(ELM_P);
        doc.link_child(html, body);
        doc.link_first_child(html, p);
        assert_eq!(doc.children(html), &[p, body]);
    }

    #[test]
    fn attributes_replace_by_name() {
        let mut doc = Document::new();
        let p = doc.new_element(ELM_P);
        doc.set_attribute(p, &ATT_ID, "first".into());
        doc.set_attribute(p, &ATT_CLASS, "note".into());
        doc.set_attribute(p, &ATT_ID, "second".into());
        assert_eq!(doc.get_attribute(p, "id"), Some("second"));
        assert_eq!(doc.get_attribute(p, "class"), Some("note"));
        assert_eq!(doc.attributes(p).len(), 2);
    }

    #[test]
    fn character_data_merges_with_trailing_text() {
        let mut doc = Document::new();
        let p = doc.new_element(ELM_P);
        doc.append_character_data(p, "hello");
        doc.append_character_data(p, " world");
        assert_eq!(doc.children(p).len(), 1);
        let text = doc.children(p)[0];
        assert_eq!(doc.node(text).kind, NodeKind::Text("hello world".into()));

        let li = doc.new_element(ELM_LI);
        doc.link_child(p, li);
        doc.append_character_data(p, "!");
        assert_eq!(doc.children(p).len(), 3);
    }

    #[test]
    fn element_child_ids_skip_character_data() {
        let mut doc = Document::new();
        let ul = doc.new_element(ELM_UL);
        let li = doc.new_element(ELM_LI);
        doc.append_character_data(ul, "\n");
        doc.link_child(ul, li);
        assert_eq!(doc.element_child_ids(ul), vec![ELM_LI]);
    }
}
