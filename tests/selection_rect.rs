//! Tests for selection geometry: shadow borrowing, clamping, ordering

mod common;

use common::{bold_hello_world, field_offsets, input_bounds, rich_bounds};
use pretty_assertions::assert_eq;
use selkeep::dom::Boundary;
use selkeep::{
    get_selection, get_selection_rect, set_selection, Direction, Host, Position, Rect,
    SetSelectionOptions,
};

fn select_silently(host: &mut Host, surface: selkeep::SurfaceId, start: usize, end: usize) {
    set_selection(
        host,
        surface,
        &SetSelectionOptions {
            start,
            end,
            direction: Some(Direction::Forward),
            no_effect: true,
        },
    )
    .unwrap();
}

// ============================================================================
// Field surfaces (shadow path)
// ============================================================================

#[test]
fn test_single_line_field_rect() {
    let mut host = Host::new();
    let field = host.create_field("hello world", false, input_bounds());
    select_silently(&mut host, field, 0, 5);

    let result = get_selection_rect(&mut host, Some(field), None).unwrap();
    assert_eq!(result.children.len(), 1);
    assert_eq!(result.children[0], Rect::from_edges(0.0, 0.0, 40.0, 16.0));
    assert_eq!(result.rect, Some(Rect::from_edges(0.0, 0.0, 40.0, 16.0)));
    assert_eq!(result.start, Position::new(0.0, 0.0));
    assert_eq!(result.end, Position::new(40.0, 16.0));
}

#[test]
fn test_field_selection_is_not_observably_changed() {
    let mut host = Host::new();
    let field = host.create_field("hello world", false, input_bounds());
    set_selection(
        &mut host,
        field,
        &SetSelectionOptions {
            start: 3,
            end: 9,
            direction: Some(Direction::Backward),
            no_effect: true,
        },
    )
    .unwrap();

    let before = get_selection(&host, Some(field)).unwrap();
    get_selection_rect(&mut host, Some(field), None).unwrap();
    let after = get_selection(&host, Some(field)).unwrap();

    assert_eq!(before, after);
    assert_eq!(field_offsets(&host, field), (3, 9));
    // The silent restore must not scroll either
    let surface = host.surface(field).unwrap();
    assert_eq!((surface.scroll_x, surface.scroll_y), (0.0, 0.0));
}

#[test]
fn test_shadow_surface_never_leaks() {
    let mut host = Host::new();
    let field = host.create_field("hello world", false, input_bounds());
    select_silently(&mut host, field, 0, 5);
    for _ in 0..3 {
        get_selection_rect(&mut host, Some(field), None).unwrap();
        assert_eq!(host.shadow_count(), 0);
    }
}

#[test]
fn test_precomputed_selection_is_used_verbatim() {
    let mut host = Host::new();
    let field = host.create_field("hello world", false, input_bounds());
    select_silently(&mut host, field, 0, 5);

    let precomputed = get_selection(&host, Some(field)).unwrap();
    let fresh = get_selection_rect(&mut host, Some(field), None).unwrap();
    let reused = get_selection_rect(&mut host, Some(field), Some(&precomputed)).unwrap();
    assert_eq!(fresh, reused);
}

#[test]
fn test_empty_field_selection_yields_empty_geometry() {
    let mut host = Host::new();
    let field = host.create_field("hello world", false, input_bounds());
    select_silently(&mut host, field, 3, 3);

    let result = get_selection_rect(&mut host, Some(field), None).unwrap();
    assert_eq!(result.rect, None);
    assert!(result.children.is_empty());
    assert_eq!(result.start, Position::zero());
    assert_eq!(result.end, Position::zero());
    assert_eq!(host.shadow_count(), 0);
}

#[test]
fn test_single_line_field_is_not_scroll_adjusted() {
    let mut host = Host::new();
    let field = host.create_field("hello world", false, input_bounds());
    host.set_scroll(field, 16.0, 0.0).unwrap();
    select_silently(&mut host, field, 0, 2);

    let result = get_selection_rect(&mut host, Some(field), None).unwrap();
    // The shadow proxy accounts for field scrolling; rects come back as-is
    assert_eq!(result.children[0], Rect::from_edges(0.0, 0.0, 16.0, 16.0));
}

#[test]
fn test_multi_line_field_is_scroll_adjusted() {
    let mut host = Host::new();
    let bounds = input_bounds(); // one visible line
    let field = host.create_field("abcdefghij\nklmno", true, bounds);
    host.set_scroll(field, 0.0, 16.0).unwrap();
    // Second line, scrolled into the visible frame
    select_silently(&mut host, field, 11, 16);

    let result = get_selection_rect(&mut host, Some(field), None).unwrap();
    assert_eq!(result.children.len(), 1);
    assert_eq!(result.children[0], Rect::from_edges(0.0, 0.0, 40.0, 16.0));
    // Scroll untouched by the query
    let surface = host.surface(field).unwrap();
    assert_eq!((surface.scroll_x, surface.scroll_y), (0.0, 16.0));
}

// ============================================================================
// Structured surfaces
// ============================================================================

#[test]
fn test_multi_line_children_are_ordered_top_to_bottom() {
    let mut host = Host::new();
    let surface = host.create_rich(rich_bounds());
    let root = host.rich_root(surface).unwrap();
    let text = host.arena_mut().create_text("abcdefghij\nklmno");
    host.arena_mut().append_child(root, text);
    host.set_native_selection(surface, Boundary::new(text, 2), Boundary::new(text, 13))
        .unwrap();

    let result = get_selection_rect(&mut host, Some(surface), None).unwrap();
    assert_eq!(result.children.len(), 2);
    assert_eq!(result.children[0], Rect::from_edges(16.0, 0.0, 80.0, 16.0));
    assert_eq!(result.children[1], Rect::from_edges(0.0, 16.0, 16.0, 32.0));
    assert!(result.children[0].top < result.children[1].top);

    assert_eq!(result.start, Position::new(16.0, 0.0));
    assert_eq!(result.end, Position::new(16.0, 32.0));
    assert_eq!(result.rect, Some(Rect::from_edges(0.0, 0.0, 80.0, 32.0)));
}

#[test]
fn test_fragments_scrolled_out_of_view_are_dropped() {
    let mut host = Host::new();
    let surface = host.create_rich(rich_bounds());
    let root = host.rich_root(surface).unwrap();
    let text = host.arena_mut().create_text("abcdefghij\nklmno");
    host.arena_mut().append_child(root, text);
    host.set_scroll(surface, 0.0, 32.0).unwrap();
    host.set_native_selection(surface, Boundary::new(text, 0), Boundary::new(text, 3))
        .unwrap();

    let result = get_selection_rect(&mut host, Some(surface), None).unwrap();
    assert!(result.children.is_empty());
    assert_eq!(result.start, Position::zero());
    assert_eq!(result.end, Position::zero());
}

#[test]
fn test_rich_geometry_spanning_markup() {
    let mut host = Host::new();
    let (surface, hello, world) = bold_hello_world(&mut host);
    host.set_native_selection(surface, Boundary::new(hello, 0), Boundary::new(world, 6))
        .unwrap();

    let result = get_selection_rect(&mut host, Some(surface), None).unwrap();
    // "Hello World" is 11 chars on one line
    assert_eq!(result.children.len(), 1);
    assert_eq!(result.children[0], Rect::from_edges(0.0, 0.0, 88.0, 16.0));
}

#[test]
fn test_rich_without_selection_yields_empty_geometry() {
    let mut host = Host::new();
    let (surface, _, _) = bold_hello_world(&mut host);
    let result = get_selection_rect(&mut host, Some(surface), None).unwrap();
    assert_eq!(result.rect, None);
    assert!(result.children.is_empty());
}
