use crate::marks::LayoutMarks;
use crate::node::{BrailleSegment, ElementKind, NodeAttrs, NodeKind};
use emboss_types::{NodeId, PageNumberKind};

#[derive(Debug, Clone)]
struct NodeData {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    attrs: NodeAttrs,
    marks: LayoutMarks,
}

/// Arena-backed document tree.
///
/// Nodes are addressed by [`NodeId`] so that formatters can annotate and
/// restructure the tree while walking it. Detached nodes stay in the arena
/// (ids remain valid) but are unreachable from the root.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<NodeData>,
    root: NodeId,
}

impl Document {
    pub fn new() -> Self {
        let root = NodeData {
            kind: NodeKind::Element(ElementKind::Block),
            parent: None,
            children: Vec::new(),
            attrs: NodeAttrs::default(),
            marks: LayoutMarks::default(),
        };
        Self {
            nodes: vec![root],
            root: NodeId(0),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    fn push(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(data);
        id
    }

    /// Creates an unattached element node.
    pub fn new_element(&mut self, kind: ElementKind) -> NodeId {
        self.push(NodeData {
            kind: NodeKind::Element(kind),
            parent: None,
            children: Vec::new(),
            attrs: NodeAttrs::default(),
            marks: LayoutMarks::default(),
        })
    }

    /// Creates an unattached braille node.
    pub fn new_braille(&mut self, segment: BrailleSegment) -> NodeId {
        self.push(NodeData {
            kind: NodeKind::Braille(segment),
            parent: None,
            children: Vec::new(),
            attrs: NodeAttrs::default(),
            marks: LayoutMarks::default(),
        })
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    /// Inserts `node` as a sibling immediately before `anchor`.
    pub fn insert_before(&mut self, anchor: NodeId, node: NodeId) {
        let Some(parent) = self.nodes[anchor.0].parent else {
            return;
        };
        self.detach(node);
        let idx = self.nodes[parent.0]
            .children
            .iter()
            .position(|&c| c == anchor)
            .unwrap_or(0);
        self.nodes[parent.0].children.insert(idx, node);
        self.nodes[node.0].parent = Some(parent);
    }

    pub fn insert_after(&mut self, anchor: NodeId, node: NodeId) {
        let Some(parent) = self.nodes[anchor.0].parent else {
            return;
        };
        self.detach(node);
        let idx = self.nodes[parent.0]
            .children
            .iter()
            .position(|&c| c == anchor)
            .map(|i| i + 1)
            .unwrap_or(self.nodes[parent.0].children.len());
        self.nodes[parent.0].children.insert(idx, node);
        self.nodes[node.0].parent = Some(parent);
    }

    /// Unlinks a node from its parent. The node and its subtree stay in the
    /// arena but are no longer reachable from the root.
    pub fn detach(&mut self, node: NodeId) {
        if let Some(parent) = self.nodes[node.0].parent.take() {
            self.nodes[parent.0].children.retain(|&c| c != node);
        }
    }

    // --- Accessors ---

    pub fn kind(&self, node: NodeId) -> &NodeKind {
        &self.nodes[node.0].kind
    }

    pub fn element_kind(&self, node: NodeId) -> Option<&ElementKind> {
        match &self.nodes[node.0].kind {
            NodeKind::Element(kind) => Some(kind),
            NodeKind::Braille(_) => None,
        }
    }

    pub fn braille(&self, node: NodeId) -> Option<&BrailleSegment> {
        match &self.nodes[node.0].kind {
            NodeKind::Braille(segment) => Some(segment),
            NodeKind::Element(_) => None,
        }
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        &self.nodes[node.0].children
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node.0].parent
    }

    pub fn marks(&self, node: NodeId) -> &LayoutMarks {
        &self.nodes[node.0].marks
    }

    pub fn marks_mut(&mut self, node: NodeId) -> &mut LayoutMarks {
        &mut self.nodes[node.0].marks
    }

    pub fn attrs(&self, node: NodeId) -> &NodeAttrs {
        &self.nodes[node.0].attrs
    }

    pub fn set_guide_word(&mut self, node: NodeId, word: impl Into<String>) {
        self.nodes[node.0].attrs.guide_word = Some(word.into());
    }

    pub fn set_page_number_kind(&mut self, node: NodeId, kind: PageNumberKind) {
        self.nodes[node.0].attrs.page_number_kind = Some(kind);
    }

    pub fn set_facing(&mut self, node: NodeId) {
        self.nodes[node.0].attrs.facing = true;
    }

    // --- Convenience builders ---

    pub fn add_element(&mut self, parent: NodeId, kind: ElementKind) -> NodeId {
        let id = self.new_element(kind);
        self.append_child(parent, id);
        id
    }

    pub fn add_braille(&mut self, parent: NodeId, text: impl Into<String>) -> NodeId {
        let id = self.new_braille(BrailleSegment::new(text));
        self.append_child(parent, id);
        id
    }

    // --- Traversal ---

    /// All reachable descendants of `node` in document order.
    pub fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(node).iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.children(id).iter().rev());
        }
        out
    }

    /// Concatenated braille text of all reachable braille descendants.
    pub fn collect_braille(&self, node: NodeId) -> String {
        let mut out = String::new();
        if let Some(segment) = self.braille(node) {
            out.push_str(&segment.text);
        }
        for id in self.descendants(node) {
            if let Some(segment) = self.braille(id) {
                out.push_str(&segment.text);
            }
        }
        out
    }

    /// Ancestor path from the root down to (and including) `node`.
    pub fn path_from_root(&self, node: NodeId) -> Vec<NodeId> {
        let mut path = vec![node];
        let mut cur = node;
        while let Some(parent) = self.parent(cur) {
            path.push(parent);
            cur = parent;
        }
        path.reverse();
        path
    }

    /// Detaches every synthetic descendant of `node` and clears its own
    /// layout marks. Used to delete a stale layout before re-formatting.
    pub fn clear_synthetic(&mut self, node: NodeId) {
        let stale: Vec<NodeId> = self
            .descendants(node)
            .into_iter()
            .filter(|&id| self.marks(id).synthetic)
            .collect();
        for id in stale {
            self.detach(id);
        }
        for id in self.descendants(node) {
            self.nodes[id.0].marks.clear();
        }
        self.nodes[node.0].marks.clear();
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}
