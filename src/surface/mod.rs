//! Editable surfaces and their classification.
//!
//! Two structurally different surface kinds share one selection model:
//!
//! - Field surfaces (single- or multi-line plain text entry) store selection
//!   natively as character offsets; see [`FieldState`].
//! - Structured surfaces store content as a node tree and share the host's
//!   document-level native selection; see [`RichState`].
//!
//! The classification predicates here ([`Surface::is_field`],
//! [`Surface::is_single_line_field`]) are the dispatch points every reader,
//! writer and remover operation branches on.

mod field;
mod rich;

pub use field::FieldState;
pub use rich::RichState;

use serde::{Deserialize, Serialize};

use crate::geometry::Rect;

/// Identifier of a surface within a host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SurfaceId(pub u64);

/// Surface classification used for dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceKind {
    Field { multi_line: bool },
    Rich,
}

#[derive(Debug, Clone)]
pub(crate) enum SurfaceState {
    Field(FieldState),
    Rich(RichState),
}

/// An editable surface registered with a host.
#[derive(Debug, Clone)]
pub struct Surface {
    pub id: SurfaceId,
    /// Visible frame of the surface in viewport coordinates.
    pub bounds: Rect,
    pub scroll_x: f64,
    pub scroll_y: f64,
    /// Transient geometry proxy, excluded from normal surface queries.
    pub(crate) shadow: bool,
    /// Whether content soft-wraps at the bounds width. Single-line controls
    /// and their shadow proxies never wrap.
    pub(crate) wrap: bool,
    pub(crate) state: SurfaceState,
}

impl Surface {
    pub fn kind(&self) -> SurfaceKind {
        match &self.state {
            SurfaceState::Field(field) => SurfaceKind::Field {
                multi_line: field.multi_line(),
            },
            SurfaceState::Rich(_) => SurfaceKind::Rich,
        }
    }

    /// Any plain-text entry control.
    pub fn is_field(&self) -> bool {
        matches!(self.state, SurfaceState::Field(_))
    }

    /// A single-line plain-text entry control. These skip the scroll
    /// adjustment step of rectangle extraction because their shadow proxy
    /// already accounts for horizontal scrolling.
    pub fn is_single_line_field(&self) -> bool {
        match &self.state {
            SurfaceState::Field(field) => !field.multi_line(),
            SurfaceState::Rich(_) => false,
        }
    }

    pub fn is_rich(&self) -> bool {
        matches!(self.state, SurfaceState::Rich(_))
    }

    pub(crate) fn is_shadow(&self) -> bool {
        self.shadow
    }

    pub fn field(&self) -> Option<&FieldState> {
        match &self.state {
            SurfaceState::Field(field) => Some(field),
            SurfaceState::Rich(_) => None,
        }
    }

    pub(crate) fn field_mut(&mut self) -> Option<&mut FieldState> {
        match &mut self.state {
            SurfaceState::Field(field) => Some(field),
            SurfaceState::Rich(_) => None,
        }
    }

    pub fn rich(&self) -> Option<&RichState> {
        match &self.state {
            SurfaceState::Rich(rich) => Some(rich),
            SurfaceState::Field(_) => None,
        }
    }
}
