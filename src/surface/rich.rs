//! Structured surface state: an editable region whose content is a tree of
//! markup nodes rooted in the host's arena.

use crate::dom::NodeId;

/// State of a structured (rich) surface. Selection state is not stored here;
/// structured surfaces share the host-global native selection, the same way
/// the platform exposes one document-level selection object.
#[derive(Debug, Clone, Copy)]
pub struct RichState {
    root: NodeId,
}

impl RichState {
    pub fn new(root: NodeId) -> Self {
        Self { root }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }
}
