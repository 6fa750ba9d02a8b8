//! Error type for surface-addressed operations.
//!
//! Absence of a selection is never an error anywhere in this crate; readers
//! degrade to empty results instead. Errors are reserved for invalid surface
//! references and kind mismatches, which are caller bugs rather than states
//! the host can be in.

use crate::surface::SurfaceId;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    /// The surface id does not refer to a live surface in this host.
    #[error("unknown surface {0:?}")]
    UnknownSurface(SurfaceId),

    /// No surface argument was given and no surface currently has focus.
    #[error("no focused surface to target")]
    NoFocusedSurface,

    /// A field-only operation was invoked on a structured surface.
    #[error("surface {0:?} is not a field surface")]
    NotAFieldSurface(SurfaceId),

    /// A structured-surface operation was invoked on a field surface.
    #[error("surface {0:?} is not a structured surface")]
    NotAStructuredSurface(SurfaceId),

    /// A selection boundary referenced a node outside the surface's subtree.
    #[error("selection boundary node is outside surface {0:?}")]
    BoundaryOutsideSurface(SurfaceId),

    /// A native snapshot's nodes no longer belong to any live surface.
    #[error("native snapshot does not belong to any surface")]
    SnapshotWithoutSurface,
}
