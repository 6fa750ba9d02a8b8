//! Node arena for structured surface content.
//!
//! Structured surfaces own a tree of element and text nodes stored in a
//! single arena indexed by [`NodeId`]. Rendered text is the concatenation of
//! text-node contents in document order; element nodes contribute markup but
//! no characters of their own. Offsets inside a text node count characters,
//! offsets inside an element count children (the same convention native
//! range boundaries use).

use crate::dom::range::Boundary;

/// Index into the host's node arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub usize);

/// What a node is: a tagged element with children, or a text leaf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Element { tag: String },
    Text { content: String },
}

/// A node in the arena. Text nodes always have an empty child list.
#[derive(Debug, Clone)]
pub struct Node {
    pub kind: NodeKind,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

impl Node {
    pub fn is_text(&self) -> bool {
        matches!(self.kind, NodeKind::Text { .. })
    }

    /// Text content for text nodes, empty for elements.
    pub fn text(&self) -> &str {
        match &self.kind {
            NodeKind::Text { content } => content,
            NodeKind::Element { .. } => "",
        }
    }
}

/// Slotted arena with a free list so removed subtrees can be reclaimed
/// across repeated shadow-surface churn.
#[derive(Debug, Default)]
pub struct NodeArena {
    slots: Vec<Option<Node>>,
    free: Vec<usize>,
}

impl NodeArena {
    pub fn new() -> Self {
        Self::default()
    }

    fn alloc(&mut self, node: Node) -> NodeId {
        if let Some(index) = self.free.pop() {
            self.slots[index] = Some(node);
            NodeId(index)
        } else {
            self.slots.push(Some(node));
            NodeId(self.slots.len() - 1)
        }
    }

    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.alloc(Node {
            kind: NodeKind::Element {
                tag: tag.to_string(),
            },
            parent: None,
            children: Vec::new(),
        })
    }

    pub fn create_text(&mut self, content: &str) -> NodeId {
        self.alloc(Node {
            kind: NodeKind::Text {
                content: content.to_string(),
            },
            parent: None,
            children: Vec::new(),
        })
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.slots.get(id.0).and_then(|slot| slot.as_ref())
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.slots.get_mut(id.0).and_then(|slot| slot.as_mut())
    }

    /// Append `child` as the last child of `parent`. Appending a text node
    /// under another text node, or using a stale id, is a no-op.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        let parent_ok = self.get(parent).map(|n| !n.is_text()).unwrap_or(false);
        if !parent_ok || self.get(child).is_none() || parent == child {
            tracing::warn!(?parent, ?child, "ignoring invalid append_child");
            return;
        }
        if let Some(node) = self.get_mut(child) {
            node.parent = Some(parent);
        }
        if let Some(node) = self.get_mut(parent) {
            node.children.push(child);
        }
    }

    /// Detach `child` from its parent without freeing it.
    pub fn detach(&mut self, child: NodeId) {
        let parent = match self.get(child).and_then(|n| n.parent) {
            Some(p) => p,
            None => return,
        };
        if let Some(node) = self.get_mut(parent) {
            node.children.retain(|&c| c != child);
        }
        if let Some(node) = self.get_mut(child) {
            node.parent = None;
        }
    }

    /// Detach `root` and free it together with its entire subtree.
    pub fn remove_subtree(&mut self, root: NodeId) {
        self.detach(root);
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            if let Some(node) = self.slots.get_mut(id.0).and_then(|slot| slot.take()) {
                stack.extend(node.children);
                self.free.push(id.0);
            }
        }
    }

    /// Replace a text node's content. No-op on elements and stale ids.
    pub fn set_text(&mut self, id: NodeId, new_content: &str) {
        if let Some(node) = self.get_mut(id) {
            if let NodeKind::Text { content } = &mut node.kind {
                *content = new_content.to_string();
            }
        }
    }

    /// Number of live nodes (diagnostics and leak checks).
    pub fn live_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    // ========================================================================
    // Rendered text
    // ========================================================================

    /// Rendered character length of a subtree.
    pub fn text_len(&self, id: NodeId) -> usize {
        let Some(node) = self.get(id) else { return 0 };
        match &node.kind {
            NodeKind::Text { content } => content.chars().count(),
            NodeKind::Element { .. } => node
                .children
                .iter()
                .map(|&child| self.text_len(child))
                .sum(),
        }
    }

    /// Rendered text of a subtree (text nodes in document order).
    pub fn subtree_text(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        let Some(node) = self.get(id) else { return };
        match &node.kind {
            NodeKind::Text { content } => out.push_str(content),
            NodeKind::Element { .. } => {
                for &child in &node.children {
                    self.collect_text(child, out);
                }
            }
        }
    }

    /// Topmost ancestor of `id` (the node itself when detached).
    pub fn root_of(&self, id: NodeId) -> NodeId {
        let mut current = id;
        while let Some(parent) = self.get(current).and_then(|n| n.parent) {
            current = parent;
        }
        current
    }

    // ========================================================================
    // Linear offsets
    // ========================================================================

    /// Rendered character offset of a boundary, measured from the start of
    /// `root`'s content. Returns `None` when the boundary node is not inside
    /// the `root` subtree.
    pub fn linear_offset(&self, root: NodeId, boundary: Boundary) -> Option<usize> {
        let mut acc = 0usize;
        if self.measure_to(root, boundary, &mut acc) {
            Some(acc)
        } else {
            None
        }
    }

    fn measure_to(&self, id: NodeId, boundary: Boundary, acc: &mut usize) -> bool {
        let Some(node) = self.get(id) else { return false };
        if id == boundary.node {
            match &node.kind {
                NodeKind::Text { content } => {
                    *acc += boundary.offset.min(content.chars().count());
                }
                NodeKind::Element { .. } => {
                    let upto = boundary.offset.min(node.children.len());
                    for &child in &node.children[..upto] {
                        *acc += self.text_len(child);
                    }
                }
            }
            return true;
        }
        match &node.kind {
            NodeKind::Text { content } => {
                *acc += content.chars().count();
                false
            }
            NodeKind::Element { .. } => {
                for &child in &node.children {
                    if self.measure_to(child, boundary, acc) {
                        return true;
                    }
                }
                false
            }
        }
    }

    /// Resolve a linear offset under `root` back to a node boundary.
    ///
    /// Prefers positions inside text nodes; an offset that lands exactly
    /// between two adjacent text nodes resolves to the end of the earlier
    /// one. This is the lossy direction of the dual representation: callers
    /// that captured a native snapshot should re-apply that instead.
    pub fn boundary_at(&self, root: NodeId, offset: usize) -> Boundary {
        let mut acc = 0usize;
        let mut last_text: Option<(NodeId, usize)> = None;
        if let Some(boundary) = self.resolve_at(root, offset, &mut acc, &mut last_text) {
            return boundary;
        }
        match last_text {
            Some((node, len)) => Boundary::new(node, len),
            None => Boundary::new(root, 0),
        }
    }

    fn resolve_at(
        &self,
        id: NodeId,
        offset: usize,
        acc: &mut usize,
        last_text: &mut Option<(NodeId, usize)>,
    ) -> Option<Boundary> {
        let node = self.get(id)?;
        match &node.kind {
            NodeKind::Text { content } => {
                let len = content.chars().count();
                if offset <= *acc + len {
                    return Some(Boundary::new(id, offset - *acc));
                }
                *acc += len;
                *last_text = Some((id, len));
                None
            }
            NodeKind::Element { .. } => {
                for &child in &node.children {
                    if let Some(found) = self.resolve_at(child, offset, acc, last_text) {
                        return Some(found);
                    }
                }
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Build `<div><b>Hello</b> World</div>`, returning (arena, div, b-text, tail-text).
    fn sample_tree() -> (NodeArena, NodeId, NodeId, NodeId) {
        let mut arena = NodeArena::new();
        let div = arena.create_element("div");
        let b = arena.create_element("b");
        let hello = arena.create_text("Hello");
        let world = arena.create_text(" World");
        arena.append_child(b, hello);
        arena.append_child(div, b);
        arena.append_child(div, world);
        (arena, div, hello, world)
    }

    #[test]
    fn test_subtree_text_and_len() {
        let (arena, div, _, _) = sample_tree();
        assert_eq!(arena.subtree_text(div), "Hello World");
        assert_eq!(arena.text_len(div), 11);
    }

    #[test]
    fn test_linear_offset_in_text_nodes() {
        let (arena, div, hello, world) = sample_tree();
        assert_eq!(arena.linear_offset(div, Boundary::new(hello, 0)), Some(0));
        assert_eq!(arena.linear_offset(div, Boundary::new(hello, 3)), Some(3));
        assert_eq!(arena.linear_offset(div, Boundary::new(world, 0)), Some(5));
        assert_eq!(arena.linear_offset(div, Boundary::new(world, 6)), Some(11));
    }

    #[test]
    fn test_linear_offset_element_boundary_counts_children() {
        let (arena, div, _, _) = sample_tree();
        // (div, 1) sits after <b> and before " World"
        assert_eq!(arena.linear_offset(div, Boundary::new(div, 1)), Some(5));
        assert_eq!(arena.linear_offset(div, Boundary::new(div, 2)), Some(11));
    }

    #[test]
    fn test_linear_offset_outside_root_is_none() {
        let (mut arena, _, hello, _) = sample_tree();
        let other = arena.create_element("div");
        assert_eq!(arena.linear_offset(other, Boundary::new(hello, 0)), None);
    }

    #[test]
    fn test_boundary_at_prefers_text_nodes() {
        let (arena, div, hello, world) = sample_tree();
        assert_eq!(arena.boundary_at(div, 0), Boundary::new(hello, 0));
        assert_eq!(arena.boundary_at(div, 3), Boundary::new(hello, 3));
        // Exactly between the two text nodes: resolves into the earlier one
        assert_eq!(arena.boundary_at(div, 5), Boundary::new(hello, 5));
        assert_eq!(arena.boundary_at(div, 7), Boundary::new(world, 2));
    }

    #[test]
    fn test_boundary_at_past_end_clamps_to_last_text() {
        let (arena, div, _, world) = sample_tree();
        assert_eq!(arena.boundary_at(div, 99), Boundary::new(world, 6));
    }

    #[test]
    fn test_boundary_at_empty_root() {
        let mut arena = NodeArena::new();
        let div = arena.create_element("div");
        assert_eq!(arena.boundary_at(div, 4), Boundary::new(div, 0));
    }

    #[test]
    fn test_remove_subtree_frees_and_reuses_slots() {
        let (mut arena, div, _, _) = sample_tree();
        let before = arena.live_count();
        arena.remove_subtree(div);
        assert_eq!(arena.live_count(), 0);
        // Freed slots are reused by later allocations
        let _fresh = arena.create_element("div");
        assert!(arena.live_count() <= before);
    }

    #[test]
    fn test_root_of_walks_to_top() {
        let (arena, div, hello, _) = sample_tree();
        assert_eq!(arena.root_of(hello), div);
        assert_eq!(arena.root_of(div), div);
    }
}
