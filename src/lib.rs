//! Unified text-selection state across editable surfaces.
//!
//! This crate provides one selection model over two structurally different
//! editable surfaces of an in-memory host document:
//!
//! - **Field surfaces** (single- or multi-line plain text entry) store
//!   selection natively as character offsets.
//! - **Structured surfaces** (editable markup trees) store selection as a
//!   range over nodes, translated to and from linear offsets on demand.
//!
//! # Architecture
//!
//! The core components are:
//!
//! - [`Host`]: the document environment owning surfaces, content tree,
//!   native selection, pointer and blur event state.
//! - [`selection::read`]: normalization to [`NormalizedSelection`] and
//!   selection geometry ([`SelectionRectResult`]).
//! - [`selection::write`]: silent or effectful selection re-application.
//! - [`selection::keep`]: retention of a selection across focus loss,
//!   gated by a spatial bound test.
//! - [`selection::remove`]: deletion of the spanned content.
//! - [`geometry`]: pure rectangle clamping and scroll-relative conversion.
//!
//! # Example
//!
//! ```
//! use selkeep::{get_selection, Host, Rect};
//!
//! let mut host = Host::new();
//! let field = host.create_field("hello world", false, Rect::from_size(0.0, 0.0, 160.0, 16.0));
//! selkeep::set_selection(&mut host, field, &selkeep::SetSelectionOptions {
//!     start: 0,
//!     end: 5,
//!     direction: Some(selkeep::Direction::Forward),
//!     no_effect: true,
//! }).unwrap();
//!
//! let selection = get_selection(&host, Some(field)).unwrap();
//! assert_eq!(selection.text, "hello");
//! assert_eq!((selection.start, selection.end), (0, 5));
//! ```

pub mod dom;
pub mod error;
pub mod geometry;
pub mod host;
pub mod selection;
pub mod surface;

// Re-export commonly used types
pub use error::SelectionError;
pub use geometry::{clamp_rect, relative_rect, Position, Rect};
pub use host::{BlurEvent, GlobalSelection, Host};
pub use selection::{
    get_native_selection, get_selection, get_selection_rect, keep_selection,
    remove_selection_content, set_selection, set_selection_node, set_selection_rich, BoundRegion,
    Direction, KeepSelection, KeepSelectionOptions, NativeSelectionSnapshot, NormalizedSelection,
    RemoveSelectionOptions, SelectionRectResult, SetSelectionNodeOptions, SetSelectionOptions,
};
pub use surface::{Surface, SurfaceId, SurfaceKind};
