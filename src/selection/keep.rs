//! Selection retention across focus loss.
//!
//! Arming a surface attaches a blur listener and starts the shared pointer
//! tracker. When the surface blurs, the listener reads the current
//! selection and decides: restore it silently, or let the blur proceed and
//! notify the caller. The decision is spatial: focus loss caused by a
//! pointer inside a permitted region keeps the selection alive, anywhere
//! else it is allowed to clear.

use std::cell::Cell;
use std::rc::Rc;

use tracing::debug;

use crate::error::SelectionError;
use crate::geometry::Rect;
use crate::host::{BlurEvent, Host};
use crate::selection::read;
use crate::selection::write::{self, SetSelectionNodeOptions, SetSelectionOptions};
use crate::surface::SurfaceId;

/// A region in which pointer-driven focus loss does not clear the cached
/// selection. Multiple regions are ORed; the armed surface itself is always
/// permitted.
#[derive(Debug, Clone, Copy)]
pub enum BoundRegion {
    /// Another surface's bounding box.
    Surface(SurfaceId),
    /// An explicit rectangle in viewport coordinates.
    Rect(Rect),
}

/// Callback invoked when a blur is allowed to proceed without restoration.
pub type BlurCallback = Box<dyn FnMut(&BlurEvent)>;

/// Configuration for one retention activation.
///
/// Defaults: no bound restriction (`within_bound` empty means any focus loss
/// with a non-empty selection is restored) and no blur callback.
#[derive(Default)]
pub struct KeepSelectionOptions {
    /// Permitted regions for the spatial bound test. Leaving this empty
    /// disables the test entirely.
    pub within_bound: Vec<BoundRegion>,
    /// Invoked when the blur proceeds normally (empty selection, or pointer
    /// outside every permitted region).
    pub on_blur: Option<BlurCallback>,
}

impl KeepSelectionOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn within_bound(mut self, region: BoundRegion) -> Self {
        self.within_bound.push(region);
        self
    }

    pub fn on_blur(mut self, callback: impl FnMut(&BlurEvent) + 'static) -> Self {
        self.on_blur = Some(Box::new(callback));
        self
    }
}

/// One armed retention listener, owned by the host while active.
pub(crate) struct RetentionEntry {
    pub(crate) surface: SurfaceId,
    active: Rc<Cell<bool>>,
    within_bound: Vec<BoundRegion>,
    on_blur: Option<BlurCallback>,
}

impl RetentionEntry {
    pub(crate) fn is_active(&self) -> bool {
        self.active.get()
    }
}

/// Deactivation handle for one retention activation.
#[derive(Debug, Clone)]
pub struct KeepSelection {
    active: Rc<Cell<bool>>,
}

impl KeepSelection {
    /// Disarm this activation. Subsequent blurs on the surface neither
    /// restore the selection nor fire the blur callback. The shared pointer
    /// tracker is not stopped; it outlives individual activations.
    pub fn stop(&self) {
        self.active.set(false);
    }

    pub fn is_active(&self) -> bool {
        self.active.get()
    }
}

/// Arm selection retention on a surface.
///
/// The blur listener stays armed for every subsequent blur until the
/// returned handle's [`KeepSelection::stop`] is called. Activating twice
/// arms two independent listeners but the pointer tracker is only started
/// once.
pub fn keep_selection(
    host: &mut Host,
    surface: SurfaceId,
    options: KeepSelectionOptions,
) -> Result<KeepSelection, SelectionError> {
    host.surface(surface)?;
    host.watch_pointer();

    let active = Rc::new(Cell::new(true));
    host.arm_retention(RetentionEntry {
        surface,
        active: Rc::clone(&active),
        within_bound: options.within_bound,
        on_blur: options.on_blur,
    });
    debug!(?surface, "selection retention armed");
    Ok(KeepSelection { active })
}

/// Blur-time decision and restoration for one armed entry. Returns whether
/// the selection was restored.
pub(crate) fn handle_blur(host: &mut Host, entry: &mut RetentionEntry, event: &BlurEvent) -> bool {
    let Ok(current) = read::get_selection(host, Some(entry.surface)) else {
        return false;
    };

    let bound_failed = !entry.within_bound.is_empty()
        && !pointer_in_bound(host, BoundRegion::Surface(entry.surface))
        && !entry
            .within_bound
            .iter()
            .any(|region| pointer_in_bound(host, *region));

    if current.is_empty() || bound_failed {
        debug!(
            surface = ?entry.surface,
            empty = current.is_empty(),
            "blur passes through without restoration"
        );
        if let Some(callback) = entry.on_blur.as_mut() {
            callback(event);
        }
        return false;
    }

    let restored = if host.surface(entry.surface).map(|s| s.is_field()).unwrap_or(false) {
        write::set_selection(
            host,
            entry.surface,
            &SetSelectionOptions {
                start: current.start,
                end: current.end,
                direction: current.direction,
                no_effect: true,
            },
        )
        .is_ok()
    } else {
        // Structured content can put the same linear offset at the boundary
        // of two adjacent nodes, so restoration goes through the node-level
        // snapshot rather than offsets.
        match read::get_native_selection(host) {
            Some(snapshot) => write::set_selection_node(
                host,
                &SetSelectionNodeOptions {
                    native_selection: snapshot,
                    no_effect: true,
                },
            )
            .is_ok(),
            None => false,
        }
    };
    if restored {
        debug!(surface = ?entry.surface, "selection restored after blur");
    }
    restored
}

/// Inclusive point-in-rect test of the last observed pointer position
/// against one permitted region. A pointer that has never been observed is
/// inside nothing.
fn pointer_in_bound(host: &Host, region: BoundRegion) -> bool {
    let Some(pointer) = host.last_pointer() else {
        return false;
    };
    let rect = match region {
        BoundRegion::Rect(rect) => rect,
        BoundRegion::Surface(id) => match host.surface(id) {
            Ok(surface) => surface.bounds,
            Err(_) => return false,
        },
    };
    rect.contains(pointer.x, pointer.y)
}
