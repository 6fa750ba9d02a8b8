//! In-memory document primitives consumed by the selection algorithms:
//! node arena, ranges, and the monospace layout that stands in for native
//! client-rect queries.

pub mod layout;
mod node;
mod range;

pub use node::{Node, NodeArena, NodeId, NodeKind};
pub use range::{Boundary, DomRange};
