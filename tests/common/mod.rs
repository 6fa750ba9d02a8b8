//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use std::sync::Once;

use selkeep::dom::NodeId;
use selkeep::{Host, Rect, SurfaceId};

static TRACING: Once = Once::new();

/// Install the fmt subscriber once per test binary so `RUST_LOG` surfaces
/// crate diagnostics during test runs.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Default frame for a single-line field: 20 columns by 1 line.
pub fn input_bounds() -> Rect {
    init_tracing();
    Rect::from_size(0.0, 0.0, 160.0, 16.0)
}

/// Default frame for a structured surface: 20 columns by 4 lines.
pub fn rich_bounds() -> Rect {
    Rect::from_size(0.0, 0.0, 160.0, 64.0)
}

/// Build a structured surface containing `<b>Hello</b> World`.
///
/// Returns the surface plus the two text nodes: the one inside the bold
/// element ("Hello") and the plain one after it (" World").
pub fn bold_hello_world(host: &mut Host) -> (SurfaceId, NodeId, NodeId) {
    init_tracing();
    let surface = host.create_rich(rich_bounds());
    let root = host.rich_root(surface).unwrap();
    let b = host.arena_mut().create_element("b");
    let hello = host.arena_mut().create_text("Hello");
    let world = host.arena_mut().create_text(" World");
    host.arena_mut().append_child(b, hello);
    host.arena_mut().append_child(root, b);
    host.arena_mut().append_child(root, world);
    (surface, hello, world)
}

/// Current field selection offsets, for asserting restoration.
pub fn field_offsets(host: &Host, surface: SurfaceId) -> (usize, usize) {
    host.surface(surface)
        .unwrap()
        .field()
        .unwrap()
        .selection_offsets()
}
