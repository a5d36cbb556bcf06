//! Level 2: Drag and Camera Tests
//!
//! Tests node dragging, connection re-routing, canvas panning and wheel zoom.

mod common;

use common::harness::EditorHarness;
use flow_graph_editor::{Camera, GraphEventKind, GraphModel, SocketRef};
use slint::platform::Key;

// ============================================================================
// Node drag
// ============================================================================

#[test]
fn test_drag_node_moves_it() {
    let harness = EditorHarness::new();
    let a = harness.add_const(0.0, 0.0);

    harness.drag_node(a, 50.0, 20.0);

    let ctrl = harness.editor.borrow();
    assert_eq!(ctrl.node(a).unwrap().position(), (50.0, 20.0));
    assert_eq!(ctrl.model().node(a).map(|n| (n.x, n.y)), Some((50.0, 20.0)));
    assert!(ctrl.gesture().is_idle());
}

#[test]
fn test_model_is_written_on_release_only() {
    let harness = EditorHarness::new();
    let a = harness.add_const(0.0, 0.0);
    let (x, y) = harness.node_screen(a);

    harness.pointer_down(x, y);
    harness.pointer_move(x + 50.0, y + 20.0);
    {
        let ctrl = harness.editor.borrow();
        assert_eq!(ctrl.node(a).unwrap().position(), (50.0, 20.0));
        assert_eq!(ctrl.model().node(a).map(|n| (n.x, n.y)), Some((0.0, 0.0)));
    }

    harness.pointer_up(x + 50.0, y + 20.0);
    assert_eq!(harness.editor.borrow().model().node(a).map(|n| (n.x, n.y)), Some((50.0, 20.0)));
}

#[test]
fn test_pressing_a_node_selects_it() {
    let harness = EditorHarness::new();
    let a = harness.add_const(0.0, 0.0);
    let (x, y) = harness.node_screen(a);

    harness.pointer_down(x, y);
    harness.pointer_up(x, y);

    assert_eq!(harness.editor.borrow().selection().node(), Some(a));
    assert!(harness.editor.borrow().node(a).unwrap().is_active());
    assert_eq!(harness.events.count(GraphEventKind::NodeClicked), 1);
}

#[test]
fn test_drag_respects_zoom() {
    let harness = EditorHarness::new();
    let a = harness.add_const(0.0, 0.0);
    harness.editor.borrow_mut().update_camera(0.0, 0.0, 0.5);

    harness.drag_node(a, 50.0, 20.0);
    assert_eq!(harness.editor.borrow().node(a).unwrap().position(), (100.0, 40.0));
}

#[test]
fn test_escape_cancels_node_drag() {
    let harness = EditorHarness::new();
    let a = harness.add_const(10.0, 10.0);
    let (x, y) = harness.node_screen(a);

    harness.pointer_down(x, y);
    harness.pointer_move(x + 80.0, y + 80.0);
    assert!(harness.key_tap(Key::Escape));

    let ctrl = harness.editor.borrow();
    assert_eq!(ctrl.node(a).unwrap().position(), (10.0, 10.0));
    assert_eq!(ctrl.geometry().node_rect(a).map(|r| (r.x, r.y)), Some((10.0, 10.0)));
    assert!(ctrl.gesture().is_idle());
}

// ============================================================================
// Re-routing
// ============================================================================

#[test]
fn test_connection_follows_dragged_node() {
    let harness = EditorHarness::new();
    let a = harness.add_const(0.0, 0.0);
    let b = harness.add_step(400.0, 0.0);
    let id = harness.connect(SocketRef::input(b, 0), SocketRef::output(a, 0));
    let before = harness.rows()[0].path.clone();

    harness.drag_node(a, 50.0, 20.0);

    let ctrl = harness.editor.borrow();
    let conn = ctrl.connection(id).unwrap();
    assert_eq!(conn.start(), (200.0, 72.0));
    assert_eq!(conn.end(), (400.0, 52.0));
    assert_ne!(harness.rows()[0].path, before);
    assert!(harness.rows()[0].path.starts_with("M 200 72 C"));
}

#[test]
fn test_renderer_rect_report_reroutes() {
    let harness = EditorHarness::new();
    let a = harness.add_const(0.0, 0.0);
    let b = harness.add_step(400.0, 0.0);
    let id = harness.connect(SocketRef::input(b, 0), SocketRef::output(a, 0));

    (harness.editor.node_rect_callback())(b.0, 400.0, 100.0, 180.0, 120.0);

    assert_eq!(harness.editor.borrow().connection(id).unwrap().end(), (400.0, 152.0));
    assert!(harness.rows()[0].path.ends_with("400 152"));
}

#[test]
fn test_socket_report_reroutes() {
    let harness = EditorHarness::new();
    let a = harness.add_const(0.0, 0.0);
    let b = harness.add_step(400.0, 0.0);
    let id = harness.connect(SocketRef::input(b, 0), SocketRef::output(a, 0));

    harness
        .editor
        .borrow_mut()
        .handle_socket_position(SocketRef::input(b, 0), -6.0, 60.0);
    assert_eq!(harness.editor.borrow().connection(id).unwrap().end(), (394.0, 60.0));
}

// ============================================================================
// Camera
// ============================================================================

#[test]
fn test_canvas_drag_pans_camera() {
    let harness = EditorHarness::new();

    harness.pointer_down(1000.0, 1000.0);
    harness.pointer_move(1100.0, 950.0);
    harness.pointer_up(1100.0, 950.0);

    assert_eq!(harness.editor.borrow().camera(), Camera::new(100.0, -50.0, 1.0));
    assert_eq!(harness.events.kinds(), vec![GraphEventKind::GraphClicked]);
}

#[test]
fn test_pan_scales_with_zoom() {
    let harness = EditorHarness::new();
    harness.editor.borrow_mut().update_camera(0.0, 0.0, 0.5);

    harness.pointer_down(1000.0, 1000.0);
    harness.pointer_up(1100.0, 950.0);

    assert_eq!(harness.editor.borrow().camera(), Camera::new(200.0, -100.0, 0.5));
}

#[test]
fn test_escape_restores_camera() {
    let harness = EditorHarness::new();
    harness.editor.borrow_mut().update_camera(5.0, 5.0, 1.0);

    harness.pointer_down(1000.0, 1000.0);
    harness.pointer_move(1300.0, 1300.0);
    assert!(harness.key_tap(Key::Escape));

    assert_eq!(harness.editor.borrow().camera(), Camera::new(5.0, 5.0, 1.0));
}

#[test]
fn test_wheel_zoom_is_bounded() {
    let harness = EditorHarness::new();
    let wheel = harness.editor.wheel_callback();

    let mut steps_in = 0;
    while wheel(-1.0) {
        steps_in += 1;
    }
    assert_eq!(steps_in, 20);
    assert!((harness.editor.borrow().camera().zoom - 2.0).abs() < 1e-3);

    let mut steps_out = 0;
    while wheel(1.0) {
        steps_out += 1;
    }
    assert_eq!(steps_out, 39);
    assert!((harness.editor.borrow().camera().zoom - 0.05).abs() < 1e-3);

    assert!(!wheel(0.0));
}
