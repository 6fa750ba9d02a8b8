//! The host document environment.
//!
//! [`Host`] is the single owner of all mutable state: the node arena,
//! the registered surfaces, the document-level native selection, the shared
//! pointer tracker, and the armed retention listeners. Everything runs
//! synchronously inside the caller's event turn; `blur` and `pointer_moved`
//! are the event entry points a real environment would wire up to its queue.
//!
//! Focus loss semantics: when `blur` runs and no armed retention listener
//! restores the selection, a field surface's selection collapses to its end
//! offset and a structured surface loses the document-level selection. This
//! mirrors what happens natively when focus moves elsewhere.

use tracing::{debug, trace};

use crate::dom::{layout, Boundary, DomRange, NodeArena};
use crate::error::SelectionError;
use crate::geometry::{Position, Rect};
use crate::selection::keep::{self, RetentionEntry};
use crate::surface::{FieldState, RichState, Surface, SurfaceId, SurfaceState};

/// The document-level native selection: anchor and focus boundaries on one
/// structured surface. Anchor/focus order is user order, not document order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlobalSelection {
    pub surface: SurfaceId,
    pub anchor: Boundary,
    pub focus: Boundary,
}

/// Event payload delivered to retention blur callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlurEvent {
    pub surface: SurfaceId,
}

/// Process-wide pointer position tracker, shared by every armed retention
/// controller. Starting it is idempotent and it is never stopped; the start
/// counter exists so callers can verify no duplicate trackers accumulate.
#[derive(Debug, Default)]
struct PointerTracker {
    watching: bool,
    starts: u32,
    position: Option<Position>,
}

impl PointerTracker {
    fn watch(&mut self) {
        if !self.watching {
            self.watching = true;
            self.starts += 1;
            trace!("pointer tracker started");
        }
    }
}

/// The host document: surfaces, content tree, selection and event state.
#[derive(Default)]
pub struct Host {
    arena: NodeArena,
    surfaces: Vec<Surface>,
    next_surface: u64,
    focused: Option<SurfaceId>,
    global: Option<GlobalSelection>,
    pointer: PointerTracker,
    retention: Vec<RetentionEntry>,
}

impl Host {
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Surface registry
    // ========================================================================

    fn alloc_surface_id(&mut self) -> SurfaceId {
        let id = SurfaceId(self.next_surface);
        self.next_surface += 1;
        id
    }

    /// Register a field surface with an initial value.
    pub fn create_field(&mut self, value: &str, multi_line: bool, bounds: Rect) -> SurfaceId {
        let id = self.alloc_surface_id();
        self.surfaces.push(Surface {
            id,
            bounds,
            scroll_x: 0.0,
            scroll_y: 0.0,
            shadow: false,
            wrap: multi_line,
            state: SurfaceState::Field(FieldState::new(value, multi_line)),
        });
        id
    }

    /// Register a structured surface with an empty root element. Content is
    /// built through [`Host::arena_mut`] and [`Host::rich_root`].
    pub fn create_rich(&mut self, bounds: Rect) -> SurfaceId {
        let root = self.arena.create_element("div");
        let id = self.alloc_surface_id();
        self.surfaces.push(Surface {
            id,
            bounds,
            scroll_x: 0.0,
            scroll_y: 0.0,
            shadow: false,
            wrap: true,
            state: SurfaceState::Rich(RichState::new(root)),
        });
        id
    }

    pub fn surface(&self, id: SurfaceId) -> Result<&Surface, SelectionError> {
        self.surfaces
            .iter()
            .find(|s| s.id == id)
            .ok_or(SelectionError::UnknownSurface(id))
    }

    pub(crate) fn surface_mut(&mut self, id: SurfaceId) -> Result<&mut Surface, SelectionError> {
        self.surfaces
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(SelectionError::UnknownSurface(id))
    }

    /// Root node of a structured surface's content tree.
    pub fn rich_root(&self, id: SurfaceId) -> Result<crate::dom::NodeId, SelectionError> {
        let surface = self.surface(id)?;
        surface
            .rich()
            .map(|r| r.root())
            .ok_or(SelectionError::NotAStructuredSurface(id))
    }

    /// Remove a surface. Structured content is freed from the arena; a
    /// native selection or focus pointing at the surface is cleared.
    /// Removing an already-removed surface is a no-op.
    pub fn remove_surface(&mut self, id: SurfaceId) {
        let Some(index) = self.surfaces.iter().position(|s| s.id == id) else {
            return;
        };
        if let Some(root) = self.surfaces[index].rich().map(|r| r.root()) {
            self.arena.remove_subtree(root);
        }
        if self.global.map(|g| g.surface) == Some(id) {
            self.global = None;
        }
        if self.focused == Some(id) {
            self.focused = None;
        }
        self.surfaces.remove(index);
    }

    /// Surface whose structured content is rooted at `root`, if any.
    pub(crate) fn surface_owning_root(&self, root: crate::dom::NodeId) -> Option<SurfaceId> {
        self.surfaces
            .iter()
            .find(|s| s.rich().map(|r| r.root()) == Some(root))
            .map(|s| s.id)
    }

    pub fn arena(&self) -> &NodeArena {
        &self.arena
    }

    pub fn arena_mut(&mut self) -> &mut NodeArena {
        &mut self.arena
    }

    /// Number of live shadow surfaces (diagnostics; zero outside a geometry
    /// query).
    pub fn shadow_count(&self) -> usize {
        self.surfaces.iter().filter(|s| s.is_shadow()).count()
    }

    pub fn set_scroll(&mut self, id: SurfaceId, x: f64, y: f64) -> Result<(), SelectionError> {
        let surface = self.surface_mut(id)?;
        surface.scroll_x = x;
        surface.scroll_y = y;
        Ok(())
    }

    // ========================================================================
    // Focus
    // ========================================================================

    pub fn focus(&mut self, id: SurfaceId) -> Result<(), SelectionError> {
        self.surface(id)?;
        self.focused = Some(id);
        Ok(())
    }

    pub fn focused(&self) -> Option<SurfaceId> {
        self.focused
    }

    /// Resolve an explicit target or fall back to the focused surface.
    pub(crate) fn resolve_target(
        &self,
        surface: Option<SurfaceId>,
    ) -> Result<SurfaceId, SelectionError> {
        match surface {
            Some(id) => {
                self.surface(id)?;
                Ok(id)
            }
            None => self.focused.ok_or(SelectionError::NoFocusedSurface),
        }
    }

    // ========================================================================
    // Native selection
    // ========================================================================

    /// Set the document-level selection on a structured surface, as a user
    /// drag would. Both boundaries must lie inside the surface's subtree.
    pub fn set_native_selection(
        &mut self,
        surface: SurfaceId,
        anchor: Boundary,
        focus: Boundary,
    ) -> Result<(), SelectionError> {
        let root = self.rich_root(surface)?;
        for boundary in [anchor, focus] {
            if self.arena.root_of(boundary.node) != root {
                return Err(SelectionError::BoundaryOutsideSurface(surface));
            }
        }
        self.global = Some(GlobalSelection {
            surface,
            anchor,
            focus,
        });
        Ok(())
    }

    pub fn clear_native_selection(&mut self) {
        self.global = None;
    }

    pub fn native_selection(&self) -> Option<&GlobalSelection> {
        self.global.as_ref()
    }

    /// The native selection as a document-ordered range, with the surface it
    /// lives on. `None` when there is no selection or its boundaries no
    /// longer resolve.
    pub fn ordered_range(&self) -> Option<(SurfaceId, DomRange)> {
        let sel = self.global.as_ref()?;
        let root = self
            .surfaces
            .iter()
            .find(|s| s.id == sel.surface)?
            .rich()?
            .root();
        let anchor_offset = self.arena.linear_offset(root, sel.anchor)?;
        let focus_offset = self.arena.linear_offset(root, sel.focus)?;
        let range = if focus_offset < anchor_offset {
            DomRange::new(sel.focus, sel.anchor)
        } else {
            DomRange::new(sel.anchor, sel.focus)
        };
        Some((sel.surface, range))
    }

    // ========================================================================
    // Pointer tracking
    // ========================================================================

    /// Feed a pointer movement into the shared tracker. Movements before the
    /// first retention activation are not recorded (nothing is watching).
    pub fn pointer_moved(&mut self, x: f64, y: f64) {
        if self.pointer.watching {
            self.pointer.position = Some(Position::new(x, y));
        }
    }

    pub(crate) fn watch_pointer(&mut self) {
        self.pointer.watch();
    }

    pub fn last_pointer(&self) -> Option<Position> {
        self.pointer.position
    }

    /// How many times the shared tracker has actually been started. Stays at
    /// one across any number of retention activations.
    pub fn pointer_watch_starts(&self) -> u32 {
        self.pointer.starts
    }

    // ========================================================================
    // Blur dispatch
    // ========================================================================

    pub(crate) fn arm_retention(&mut self, entry: RetentionEntry) {
        self.retention.push(entry);
    }

    /// Deliver focus loss to a surface: run armed retention listeners, then
    /// apply native selection loss unless one of them restored it.
    pub fn blur(&mut self, surface: SurfaceId) -> Result<(), SelectionError> {
        self.surface(surface)?;
        let event = BlurEvent { surface };

        // Entries are taken out for the duration of dispatch so handlers can
        // borrow the host mutably. Callbacks never see the host, so nothing
        // can re-arm mid-dispatch.
        let mut entries = std::mem::take(&mut self.retention);
        let mut restored = false;
        for entry in entries.iter_mut() {
            if entry.surface != surface || !entry.is_active() {
                continue;
            }
            if keep::handle_blur(self, entry, &event) {
                restored = true;
            }
        }
        entries.retain(|entry| entry.is_active());
        self.retention = entries;

        if self.focused == Some(surface) {
            self.focused = None;
        }

        if !restored {
            debug!(?surface, "blur proceeds, selection not retained");
            if let Ok(s) = self.surface_mut(surface) {
                if let Some(field) = s.field_mut() {
                    field.collapse_selection();
                }
            }
            if self.global.map(|g| g.surface) == Some(surface) {
                self.global = None;
            }
        }
        Ok(())
    }

    // ========================================================================
    // Geometry support
    // ========================================================================

    /// Per-line client rectangles of a range on a structured surface, in
    /// viewport coordinates (not scroll adjusted). Empty for collapsed
    /// ranges, unknown surfaces, and boundaries that do not resolve.
    pub(crate) fn range_client_rects(&self, surface: SurfaceId, range: &DomRange) -> Vec<Rect> {
        let Ok(s) = self.surface(surface) else {
            return Vec::new();
        };
        let Some(root) = s.rich().map(|r| r.root()) else {
            return Vec::new();
        };
        if range.is_collapsed() {
            return Vec::new();
        }
        let (Some(a), Some(b)) = (
            self.arena.linear_offset(root, range.start),
            self.arena.linear_offset(root, range.end),
        ) else {
            return Vec::new();
        };
        let (start, end) = (a.min(b), a.max(b));
        let text = self.arena.subtree_text(root);
        let max_cols = if s.wrap {
            layout::wrap_columns(s.bounds.width)
        } else {
            usize::MAX
        };
        layout::span_rects(&text, max_cols, start, end, &s.bounds)
    }

    /// Inject the off-screen structured proxy used to borrow rectangle
    /// geometry for a field surface: same frame and scroll position,
    /// populated with the field's value.
    pub(crate) fn insert_shadow_for_field(
        &mut self,
        field: SurfaceId,
    ) -> Result<SurfaceId, SelectionError> {
        let surface = self.surface(field)?;
        let state = surface
            .field()
            .ok_or(SelectionError::NotAFieldSurface(field))?;
        let value = state.value();
        let wrap = state.multi_line();
        let (bounds, scroll_x, scroll_y) = (surface.bounds, surface.scroll_x, surface.scroll_y);

        let root = self.arena.create_element("div");
        let text = self.arena.create_text(&value);
        self.arena.append_child(root, text);

        let id = self.alloc_surface_id();
        self.surfaces.push(Surface {
            id,
            bounds,
            scroll_x,
            scroll_y,
            shadow: true,
            wrap,
            state: SurfaceState::Rich(RichState::new(root)),
        });
        trace!(field = ?field, shadow = ?id, "shadow surface inserted");
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_target_prefers_explicit() {
        let mut host = Host::new();
        let a = host.create_field("a", false, Rect::from_size(0.0, 0.0, 80.0, 16.0));
        let b = host.create_field("b", false, Rect::from_size(0.0, 20.0, 80.0, 16.0));
        host.focus(a).unwrap();
        assert_eq!(host.resolve_target(Some(b)).unwrap(), b);
        assert_eq!(host.resolve_target(None).unwrap(), a);
    }

    #[test]
    fn test_resolve_target_without_focus_errors() {
        let host = Host::new();
        assert_eq!(
            host.resolve_target(None),
            Err(SelectionError::NoFocusedSurface)
        );
    }

    #[test]
    fn test_pointer_ignored_until_watched() {
        let mut host = Host::new();
        host.pointer_moved(5.0, 5.0);
        assert_eq!(host.last_pointer(), None);
        host.watch_pointer();
        host.pointer_moved(5.0, 5.0);
        assert_eq!(host.last_pointer(), Some(Position::new(5.0, 5.0)));
    }

    #[test]
    fn test_watch_pointer_is_idempotent() {
        let mut host = Host::new();
        host.watch_pointer();
        host.watch_pointer();
        host.watch_pointer();
        assert_eq!(host.pointer_watch_starts(), 1);
    }

    #[test]
    fn test_shadow_surface_mirrors_field_and_is_removable() {
        let mut host = Host::new();
        let bounds = Rect::from_size(10.0, 10.0, 80.0, 16.0);
        let field = host.create_field("hello", false, bounds);
        let shadow = host.insert_shadow_for_field(field).unwrap();
        assert_eq!(host.shadow_count(), 1);

        let root = host.rich_root(shadow).unwrap();
        assert_eq!(host.arena().subtree_text(root), "hello");
        assert_eq!(host.surface(shadow).unwrap().bounds, bounds);

        let live_before = host.arena().live_count();
        host.remove_surface(shadow);
        assert_eq!(host.shadow_count(), 0);
        assert!(host.arena().live_count() < live_before);
    }

    #[test]
    fn test_remove_surface_clears_dangling_selection() {
        let mut host = Host::new();
        let rich = host.create_rich(Rect::from_size(0.0, 0.0, 160.0, 64.0));
        let root = host.rich_root(rich).unwrap();
        let text = host.arena_mut().create_text("abc");
        host.arena_mut().append_child(root, text);
        host.set_native_selection(rich, Boundary::new(text, 0), Boundary::new(text, 2))
            .unwrap();
        host.focus(rich).unwrap();

        host.remove_surface(rich);
        assert!(host.native_selection().is_none());
        assert_eq!(host.focused(), None);
    }

    #[test]
    fn test_set_native_selection_rejects_foreign_nodes() {
        let mut host = Host::new();
        let rich = host.create_rich(Rect::from_size(0.0, 0.0, 160.0, 64.0));
        let stray = host.arena_mut().create_text("outside");
        let err = host
            .set_native_selection(rich, Boundary::new(stray, 0), Boundary::new(stray, 1))
            .unwrap_err();
        assert_eq!(err, SelectionError::BoundaryOutsideSurface(rich));
    }

    #[test]
    fn test_ordered_range_swaps_backward_drag() {
        let mut host = Host::new();
        let rich = host.create_rich(Rect::from_size(0.0, 0.0, 160.0, 64.0));
        let root = host.rich_root(rich).unwrap();
        let text = host.arena_mut().create_text("hello");
        host.arena_mut().append_child(root, text);
        // Dragged right-to-left: anchor after focus
        host.set_native_selection(rich, Boundary::new(text, 4), Boundary::new(text, 1))
            .unwrap();
        let (surface, range) = host.ordered_range().unwrap();
        assert_eq!(surface, rich);
        assert_eq!(range.start, Boundary::new(text, 1));
        assert_eq!(range.end, Boundary::new(text, 4));
    }
}
