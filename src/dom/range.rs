//! Ranges over the node arena.
//!
//! A [`DomRange`] is a pair of boundaries in document order. It supports the
//! operations the selection reader's prefix-length measurement needs: select
//! a node's contents, move one boundary, extract rendered text, and
//! serialize the spanned fragment as markup.

use crate::dom::node::{NodeArena, NodeId, NodeKind};

/// A position inside the tree: a node plus an offset. For text nodes the
/// offset counts characters, for elements it counts children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Boundary {
    pub node: NodeId,
    pub offset: usize,
}

impl Boundary {
    pub const fn new(node: NodeId, offset: usize) -> Self {
        Self { node, offset }
    }
}

/// A range spanning part of a structured surface's tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DomRange {
    pub start: Boundary,
    pub end: Boundary,
}

impl DomRange {
    pub fn new(start: Boundary, end: Boundary) -> Self {
        Self { start, end }
    }

    pub fn collapsed(at: Boundary) -> Self {
        Self { start: at, end: at }
    }

    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }

    /// Range covering the entire content of `node`.
    pub fn select_node_contents(arena: &NodeArena, node: NodeId) -> Self {
        let end_offset = match arena.get(node).map(|n| &n.kind) {
            Some(NodeKind::Element { .. }) => {
                arena.get(node).map(|n| n.children.len()).unwrap_or(0)
            }
            Some(NodeKind::Text { content }) => content.chars().count(),
            None => 0,
        };
        Self {
            start: Boundary::new(node, 0),
            end: Boundary::new(node, end_offset),
        }
    }

    pub fn set_start(&mut self, boundary: Boundary) {
        self.start = boundary;
    }

    pub fn set_end(&mut self, boundary: Boundary) {
        self.end = boundary;
    }

    pub fn collapse_to_start(&mut self) {
        self.end = self.start;
    }

    /// Deepest node containing both boundaries, or `None` when the
    /// boundaries live in unrelated trees.
    pub fn common_ancestor(&self, arena: &NodeArena) -> Option<NodeId> {
        let mut chain = Vec::new();
        let mut current = Some(self.start.node);
        while let Some(id) = current {
            chain.push(id);
            current = arena.get(id).and_then(|n| n.parent);
        }
        let mut candidate = Some(self.end.node);
        while let Some(id) = candidate {
            if chain.contains(&id) {
                return Some(id);
            }
            candidate = arena.get(id).and_then(|n| n.parent);
        }
        None
    }

    /// Linear offsets of both boundaries relative to the common ancestor.
    fn linear_span(&self, arena: &NodeArena) -> Option<(NodeId, usize, usize)> {
        let ancestor = self.common_ancestor(arena)?;
        let start = arena.linear_offset(ancestor, self.start)?;
        let end = arena.linear_offset(ancestor, self.end)?;
        // Boundaries may have been set out of document order; normalize.
        Some((ancestor, start.min(end), start.max(end)))
    }

    /// Rendered text between the boundaries.
    pub fn to_text(&self, arena: &NodeArena) -> String {
        match self.linear_span(arena) {
            Some((ancestor, start, end)) => {
                let text = arena.subtree_text(ancestor);
                text.chars().skip(start).take(end - start).collect()
            }
            None => String::new(),
        }
    }

    /// Rendered character count between the boundaries.
    pub fn len_chars(&self, arena: &NodeArena) -> usize {
        match self.linear_span(arena) {
            Some((_, start, end)) => end - start,
            None => 0,
        }
    }

    /// Serialized markup of the spanned fragment, the structured analogue of
    /// cloning range contents into a scratch container and reading its inner
    /// markup. Elements that intersect the span are opened and closed even
    /// when only partially covered, so re-inserting the fragment preserves
    /// formatting. Text content is escaped.
    pub fn contents_markup(&self, arena: &NodeArena) -> String {
        let Some((ancestor, start, end)) = self.linear_span(arena) else {
            return String::new();
        };
        if start == end {
            return String::new();
        }
        let mut out = String::new();
        let mut pos = 0usize;
        match arena.get(ancestor).map(|n| &n.kind) {
            Some(NodeKind::Element { .. }) => {
                let children: Vec<NodeId> = arena
                    .get(ancestor)
                    .map(|n| n.children.clone())
                    .unwrap_or_default();
                for child in children {
                    emit_fragment(arena, child, start, end, &mut pos, &mut out);
                }
            }
            // Ancestor can be a text node when both boundaries share it
            Some(NodeKind::Text { .. }) | None => {
                emit_fragment(arena, ancestor, start, end, &mut pos, &mut out);
            }
        }
        out
    }
}

fn emit_fragment(
    arena: &NodeArena,
    id: NodeId,
    start: usize,
    end: usize,
    pos: &mut usize,
    out: &mut String,
) {
    let Some(node) = arena.get(id) else { return };
    match &node.kind {
        NodeKind::Text { content } => {
            let len = content.chars().count();
            let lo = start.max(*pos);
            let hi = end.min(*pos + len);
            if lo < hi {
                let piece: String = content.chars().skip(lo - *pos).take(hi - lo).collect();
                out.push_str(&html_escape::encode_text(&piece));
            }
            *pos += len;
        }
        NodeKind::Element { tag } => {
            let len = arena.text_len(id);
            let lo = start.max(*pos);
            let hi = end.min(*pos + len);
            if lo < hi {
                out.push('<');
                out.push_str(tag);
                out.push('>');
                for &child in &node.children {
                    emit_fragment(arena, child, start, end, pos, out);
                }
                out.push_str("</");
                out.push_str(tag);
                out.push('>');
            } else {
                *pos += len;
            }
        }
    }
}
