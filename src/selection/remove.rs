//! Deleting the content spanned by a selection.

use tracing::debug;

use crate::dom::{DomRange, NodeKind};
use crate::error::SelectionError;
use crate::host::Host;
use crate::surface::SurfaceId;

/// The `(start, end)` pair to delete. Only field surfaces consume the
/// offsets; structured surfaces delete the contents of the active native
/// range (offsets cannot name nodes).
#[derive(Debug, Clone, Copy)]
pub struct RemoveSelectionOptions {
    pub start: usize,
    pub end: usize,
}

/// Delete the selected content.
///
/// Field surfaces splice the value string directly. Structured surfaces
/// delete the active native range's contents and return the consumed range,
/// collapsed to its start; `Ok(None)` when there is no active range.
pub fn remove_selection_content(
    host: &mut Host,
    surface: SurfaceId,
    options: &RemoveSelectionOptions,
) -> Result<Option<DomRange>, SelectionError> {
    let target = host.surface(surface)?;
    if target.is_field() {
        let field = host
            .surface_mut(surface)?
            .field_mut()
            .ok_or(SelectionError::NotAFieldSurface(surface))?;
        field.splice_out(options.start, options.end);
        debug!(?surface, start = options.start, end = options.end, "field content removed");
        return Ok(None);
    }

    let Some((range_surface, range)) = host.ordered_range() else {
        return Ok(None);
    };
    let root = host.rich_root(range_surface)?;
    let arena = host.arena();
    let Some(start) = arena.linear_offset(root, range.start) else {
        return Ok(None);
    };
    let Some(end) = arena.linear_offset(root, range.end) else {
        return Ok(None);
    };
    if start < end {
        delete_rendered_span(host, root, start, end);
    }

    // Collapse to where the deleted span began and leave that as the active
    // selection, the way a native range collapses after deleteContents.
    let collapsed = DomRange::collapsed(host.arena().boundary_at(root, start));
    host.set_native_selection(range_surface, collapsed.start, collapsed.end)?;
    debug!(?surface, start, end, "structured content removed");
    Ok(Some(collapsed))
}

/// Remove the rendered characters in `[start, end)` under `root`: partially
/// covered text nodes are trimmed, fully covered nodes are detached. An
/// element whose whole rendered span sits inside the range is detached with
/// its subtree rather than left behind as an empty shell.
fn delete_rendered_span(host: &mut Host, root: crate::dom::NodeId, start: usize, end: usize) {
    let mut detach = Vec::new();
    let mut trims = Vec::new();
    let children: Vec<crate::dom::NodeId> = host
        .arena()
        .get(root)
        .map(|n| n.children.clone())
        .unwrap_or_default();
    let mut pos = 0usize;
    for child in children {
        plan_deletion(host, child, start, end, &mut pos, &mut detach, &mut trims);
    }

    for (node, kept) in trims {
        host.arena_mut().set_text(node, &kept);
    }
    for node in detach {
        host.arena_mut().remove_subtree(node);
    }
}

fn plan_deletion(
    host: &Host,
    node: crate::dom::NodeId,
    start: usize,
    end: usize,
    pos: &mut usize,
    detach: &mut Vec<crate::dom::NodeId>,
    trims: &mut Vec<(crate::dom::NodeId, String)>,
) {
    let Some(n) = host.arena().get(node) else { return };
    match &n.kind {
        NodeKind::Text { content } => {
            let len = content.chars().count();
            let at = *pos;
            *pos += len;
            let lo = start.max(at);
            let hi = end.min(at + len);
            if lo >= hi {
                return;
            }
            if lo == at && hi == at + len {
                detach.push(node);
                return;
            }
            let kept: String = content
                .chars()
                .take(lo - at)
                .chain(content.chars().skip(hi - at))
                .collect();
            trims.push((node, kept));
        }
        NodeKind::Element { .. } => {
            let len = host.arena().text_len(node);
            let at = *pos;
            if len > 0 && start <= at && end >= at + len {
                detach.push(node);
                *pos += len;
                return;
            }
            for &child in &n.children {
                plan_deletion(host, child, start, end, pos, detach, trims);
            }
        }
    }
}
