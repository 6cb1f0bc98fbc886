//! Editor Integration Tests
//!
//! Exercises the editor end to end through its public API:
//! - Resize anchoring and the minimum size
//! - Z-order nudge, reorder and duplicate
//! - Clip drag and clip edge resize on the timeline
//! - Selection coherence after updates
//! - Command scripts and JSON snapshots

use proptest::prelude::*;
use studio_core::{
    CanvasError, CanvasState, Clip, ClipEdge, Command, Editor, EditorConfig, Element, ElementId,
    ElementKind, ElementPatch, Geometry, Point, PointerEvent, PointerTarget, ResizeHandle,
    Selection, SelectionTarget, ShapeKind, ZDirection, MIN_CLIP_DURATION, MIN_ELEMENT_SIZE,
};

fn add_shape(editor: &mut Editor, x: f32, y: f32, w: f32, h: f32) -> ElementId {
    editor.add_element(
        Element::new(ElementKind::shape(ShapeKind::Rectangle))
            .with_geometry(Geometry::new(x, y, w, h)),
    )
}

fn add_clip(editor: &mut Editor, start: f64, duration: f64) -> ElementId {
    editor.add_element(
        Element::new(ElementKind::video("clip.mp4"))
            .with_clip(Clip::new(start, duration)),
    )
}

fn geometry(editor: &Editor, id: ElementId) -> Geometry {
    editor.store().element(id).expect("element exists").geometry
}

fn clip(editor: &Editor, id: ElementId) -> Clip {
    editor
        .store()
        .element(id)
        .and_then(|e| e.clip)
        .expect("element is on the timeline")
}

fn z(editor: &Editor, id: ElementId) -> i32 {
    geometry(editor, id).z_index
}

/// Timeline pixels for `seconds` at the default scale.
#[allow(clippy::cast_possible_truncation)]
fn px(seconds: f64) -> Point {
    Point::new((seconds * 100.0) as f32, 0.0)
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6
}

// ============================================================================
// Transform Engine
// ============================================================================

#[test]
fn test_se_resize_does_not_shift() {
    let mut editor = Editor::default();
    let id = add_shape(&mut editor, 100.0, 100.0, 150.0, 150.0);

    editor
        .begin_resize(id, ResizeHandle::Se, Point::new(250.0, 250.0))
        .expect("begin");
    editor.on_pointer_move(Point::new(280.0, 240.0));
    editor.end();

    let g = geometry(&editor, id);
    assert_eq!((g.x, g.y, g.width, g.height), (100.0, 100.0, 180.0, 140.0));
}

#[test]
fn test_nw_resize_anchors_bottom_right() {
    let mut editor = Editor::default();
    let id = add_shape(&mut editor, 100.0, 100.0, 150.0, 150.0);

    editor
        .begin_resize(id, ResizeHandle::Nw, Point::new(100.0, 100.0))
        .expect("begin");
    editor.on_pointer_move(Point::new(130.0, 90.0));
    editor.end();

    let g = geometry(&editor, id);
    assert_eq!((g.x, g.y, g.width, g.height), (130.0, 90.0, 120.0, 160.0));
}

#[test]
fn test_resize_through_minimum_and_back() {
    let mut editor = Editor::default();
    let id = add_shape(&mut editor, 100.0, 100.0, 150.0, 150.0);

    editor
        .begin_resize(id, ResizeHandle::W, Point::new(100.0, 175.0))
        .expect("begin");
    editor.on_pointer_move(Point::new(600.0, 175.0));
    let clamped = geometry(&editor, id);
    assert!((clamped.width - MIN_ELEMENT_SIZE).abs() < f32::EPSILON);
    assert!((clamped.right() - 250.0).abs() < 1e-3);

    editor.on_pointer_move(Point::new(500.0, 175.0));
    editor.end();
    let g = geometry(&editor, id);
    assert!((g.width - 120.0).abs() < 1e-3);
    assert!((g.right() - 250.0).abs() < 1e-3);
}

#[test]
fn test_drag_is_not_clamped_to_canvas() {
    let mut editor = Editor::default();
    let id = add_shape(&mut editor, 10.0, 10.0, 50.0, 50.0);

    editor.begin_drag(id, Point::new(20.0, 20.0)).expect("begin");
    editor.on_pointer_move(Point::new(-480.0, 5000.0));
    editor.end();

    let g = geometry(&editor, id);
    assert_eq!((g.x, g.y), (-490.0, 4990.0));
}

proptest! {
    #[test]
    fn prop_single_edge_resize_keeps_opposite_edge(
        x in -500.0f32..500.0,
        y in -500.0f32..500.0,
        w in 20.0f32..400.0,
        h in 20.0f32..400.0,
        handle in prop::sample::select(vec![
            ResizeHandle::N, ResizeHandle::S, ResizeHandle::E, ResizeHandle::W,
        ]),
        moves in prop::collection::vec((-600.0f32..600.0, -600.0f32..600.0), 1..8),
    ) {
        let mut editor = Editor::default();
        let id = add_shape(&mut editor, x, y, w, h);
        let before = geometry(&editor, id);

        editor.begin_resize(id, handle, Point::default()).expect("begin");
        for (px, py) in moves {
            editor.on_pointer_move(Point::new(px, py));
        }
        editor.end();

        let after = geometry(&editor, id);
        prop_assert!(after.width >= MIN_ELEMENT_SIZE);
        prop_assert!(after.height >= MIN_ELEMENT_SIZE);
        match handle {
            ResizeHandle::N => prop_assert!((after.bottom() - before.bottom()).abs() < 1e-2),
            ResizeHandle::S => prop_assert!((after.y - before.y).abs() < 1e-2),
            ResizeHandle::E => prop_assert!((after.x - before.x).abs() < 1e-2),
            _ => prop_assert!((after.right() - before.right()).abs() < 1e-2),
        }
    }
}

// ============================================================================
// Layering
// ============================================================================

#[test]
fn test_nudge_swaps_with_neighbor_only() {
    let mut editor = Editor::default();
    let a = add_shape(&mut editor, 0.0, 0.0, 50.0, 50.0);
    let b = add_shape(&mut editor, 0.0, 0.0, 50.0, 50.0);
    let c = add_shape(&mut editor, 0.0, 0.0, 50.0, 50.0);
    let (za, zb, zc) = (z(&editor, a), z(&editor, b), z(&editor, c));

    assert!(editor.nudge_z(a, ZDirection::Up));
    assert_eq!(z(&editor, a), zb);
    assert_eq!(z(&editor, b), za);
    assert_eq!(z(&editor, c), zc);

    assert!(!editor.nudge_z(c, ZDirection::Up));
}

#[test]
fn test_reorder_is_total() {
    let mut editor = Editor::default();
    let e1 = add_shape(&mut editor, 0.0, 0.0, 50.0, 50.0);
    let e2 = add_shape(&mut editor, 0.0, 0.0, 50.0, 50.0);
    let e3 = add_shape(&mut editor, 0.0, 0.0, 50.0, 50.0);

    assert!(editor.reorder_z(&[e3, e1, e2]));
    assert_eq!((z(&editor, e3), z(&editor, e1), z(&editor, e2)), (3, 2, 1));
}

#[test]
fn test_duplicate_lands_on_top_with_offset() {
    let mut editor = Editor::default();
    let original = add_shape(&mut editor, 40.0, 60.0, 50.0, 50.0);
    let other = add_shape(&mut editor, 0.0, 0.0, 50.0, 50.0);
    editor.update_element(
        other,
        &ElementPatch {
            z_index: Some(42),
            ..ElementPatch::default()
        },
    );

    let copy = editor.duplicate_element(original).expect("duplicated");
    assert_ne!(copy, original);

    let g = geometry(&editor, copy);
    assert_eq!((g.x, g.y), (60.0, 80.0));
    let page = editor.store().current_page();
    assert!(page
        .elements()
        .filter(|e| e.id != copy)
        .all(|e| e.geometry.z_index < g.z_index));
}

// ============================================================================
// Timeline
// ============================================================================

#[test]
fn test_left_edge_resize_scenarios() {
    let mut editor = Editor::default();
    let id = add_clip(&mut editor, 2.0, 5.0);

    editor
        .begin_clip_resize(id, ClipEdge::Left, px(0.0))
        .expect("begin");
    editor.on_pointer_move(px(-1.0));
    let c = clip(&editor, id);
    assert!(close(c.start_time, 1.0) && close(c.duration, 6.0));

    editor.on_pointer_move(px(6.0));
    editor.end();
    let c = clip(&editor, id);
    assert!(close(c.start_time, 8.0));
    assert!(close(c.duration, MIN_CLIP_DURATION));
}

#[test]
fn test_clip_drag_never_before_zero() {
    let mut editor = Editor::default();
    let id = add_clip(&mut editor, 1.0, 3.0);

    editor.begin_clip_drag(id, px(5.0)).expect("begin");
    editor.on_pointer_move(px(0.0));
    assert!(close(clip(&editor, id).start_time, 0.0));
    editor.on_pointer_move(px(30.0));
    editor.end();
    assert!(close(clip(&editor, id).start_time, 26.0));
    assert!(close(clip(&editor, id).duration, 3.0));
}

#[test]
fn test_media_cap_is_opt_in() {
    let config = EditorConfig {
        cap_clips_to_media: true,
        ..EditorConfig::default()
    };
    let mut editor = Editor::new(config);
    let id = add_clip(&mut editor, 0.0, 4.0);
    editor.set_media_duration(id, 6.0);

    editor
        .begin_clip_resize(id, ClipEdge::Right, px(4.0))
        .expect("begin");
    editor.on_pointer_move(px(10.0));
    editor.end();
    assert!(close(clip(&editor, id).duration, 6.0));
}

#[test]
fn test_capped_left_edge_extension_pins_clip_end() {
    let config = EditorConfig {
        cap_clips_to_media: true,
        ..EditorConfig::default()
    };
    let mut editor = Editor::new(config);
    let id = add_clip(&mut editor, 2.0, 5.0);
    editor.set_media_duration(id, 6.0);

    editor
        .begin_clip_resize(id, ClipEdge::Left, px(0.0))
        .expect("begin");
    editor.on_pointer_move(px(-2.0));
    editor.end();

    let c = clip(&editor, id);
    assert!(close(c.start_time, 1.0));
    assert!(close(c.duration, 6.0));
    assert!(close(c.start_time + c.duration, 7.0));
}

proptest! {
    #[test]
    fn prop_right_edge_floor(
        start in 0.0f64..20.0,
        duration in 0.5f64..30.0,
        overshoot in 0.01f64..20.0,
    ) {
        let mut editor = Editor::default();
        let id = add_clip(&mut editor, start, duration);

        editor.begin_clip_resize(id, ClipEdge::Right, px(0.0)).expect("begin");
        editor.on_pointer_move(px(-(duration - MIN_CLIP_DURATION + overshoot)));
        editor.end();

        let c = clip(&editor, id);
        prop_assert!((c.duration - MIN_CLIP_DURATION).abs() < 1e-9);
        prop_assert!(close(c.start_time, start));
    }
}

// ============================================================================
// Selection Bridge
// ============================================================================

#[test]
fn test_selection_snapshot_follows_updates() {
    let mut editor = Editor::default();
    let id = editor.add_element(Element::new(ElementKind::text("Title")));
    editor.set_selection(SelectionTarget::Element(id));

    editor.update_element(
        id,
        &ElementPatch {
            color: Some("#fff".to_string()),
            ..ElementPatch::default()
        },
    );

    let snapshot = editor.selection().snapshot().expect("snapshot");
    assert_eq!(snapshot.kind.color(), Some("#fff"));
}

#[test]
fn test_selection_clears_when_element_removed() {
    let mut editor = Editor::default();
    let id = add_shape(&mut editor, 0.0, 0.0, 50.0, 50.0);
    editor.set_selection(SelectionTarget::Element(id));

    editor.remove_element(id);
    assert_eq!(editor.selection(), &Selection::Empty);
}

#[test]
fn test_session_on_deleted_element_is_harmless() {
    let mut editor = Editor::default();
    let id = add_clip(&mut editor, 0.0, 2.0);
    editor.begin_clip_drag(id, px(0.0)).expect("begin");
    editor.remove_element(id);

    assert!(!editor.on_pointer_move(px(3.0)));
    assert!(editor.end());
    assert!(editor.store().current_page().is_empty());
}

// ============================================================================
// Pointer Routing and Commands
// ============================================================================

#[test]
fn test_pointer_handle_resize_flow() {
    let mut editor = Editor::default();
    let id = add_shape(&mut editor, 100.0, 100.0, 150.0, 150.0);

    editor.handle_pointer(PointerEvent::down(
        Point::new(250.0, 250.0),
        PointerTarget::Handle {
            id,
            handle: ResizeHandle::Se,
        },
    ));
    editor.handle_pointer(PointerEvent::moved(Point::new(280.0, 240.0)));
    editor.handle_pointer(PointerEvent::up(Point::new(280.0, 240.0)));

    let g = geometry(&editor, id);
    assert_eq!((g.width, g.height), (180.0, 140.0));
    assert!(editor.is_idle());
}

#[test]
fn test_command_script_from_json() {
    let mut editor = Editor::default();
    let id = add_clip(&mut editor, 2.0, 5.0);
    let script = format!(
        r#"[
            {{"op":"begin_clip_resize","id":"{id}","edge":"right","pointer":{{"x":0.0,"y":0.0}}}},
            {{"op":"pointer_move","pointer":{{"x":-1000.0,"y":0.0}}}},
            {{"op":"end"}},
            {{"op":"set_canvas_size","width":50,"height":9000}}
        ]"#
    );
    let commands: Vec<Command> = serde_json::from_str(&script).expect("parse script");
    assert!(matches!(editor.apply_all(commands), Ok(4)));

    assert!(close(clip(&editor, id).duration, MIN_CLIP_DURATION));
    let snapshot = editor.snapshot();
    assert_eq!((snapshot.width(), snapshot.height()), (100, 5000));
}

#[test]
fn test_locked_element_rejects_command() {
    let mut editor = Editor::default();
    let id = editor.add_element(
        Element::new(ElementKind::text("fixed")).with_locked(true),
    );
    let result = editor.apply(Command::BeginDrag {
        id,
        pointer: Point::default(),
    });
    assert!(matches!(result, Err(CanvasError::ElementLocked(_))));
}

#[test]
fn test_snapshot_json_round_trip_preserves_layers() {
    let mut editor = Editor::default();
    let a = add_shape(&mut editor, 0.0, 0.0, 50.0, 50.0);
    let b = add_clip(&mut editor, 1.0, 2.0);
    editor.reorder_z(&[a, b]);

    let json = editor.snapshot().to_json().expect("serialize");
    let restored = CanvasState::from_json(&json).expect("parse");
    let reloaded = Editor::with_state(restored, EditorConfig::default());

    assert_eq!(z(&reloaded, a), 2);
    assert_eq!(z(&reloaded, b), 1);
    assert_eq!(reloaded.store().element(b).and_then(|e| e.clip), Some(Clip::new(1.0, 2.0)));
}
