//! Level 5: Keyboard Input Tests
//!
//! Tests Delete for removing the selected node or connection (with cascade
//! delete of attached connections) and Escape for cancelling gestures.

mod common;

use common::harness::EditorHarness;
use flow_graph_editor::{EditorKey, GraphEvent, GraphEventKind, GraphModel, SocketRef, TargetRef};
use slint::platform::Key;

// ============================================================================
// Deleting connections
// ============================================================================

#[test]
fn test_delete_selected_connection() {
    let harness = EditorHarness::new();
    let a = harness.add_const(0.0, 0.0);
    let b = harness.add_step(400.0, 0.0);
    let id = harness
        .drag_connection(SocketRef::output(a, 0), SocketRef::input(b, 0))
        .unwrap();
    assert_eq!(harness.editor.borrow().model().node(b).unwrap().inputs[0].target, Some(TargetRef::new(a, "value")));

    harness.editor.borrow_mut().click_connection(id).unwrap();
    harness.hooks.clear();
    harness.events.clear();
    assert!(harness.key_tap(Key::Delete));

    let ctrl = harness.editor.borrow();
    assert_eq!(ctrl.connection_count(), 0);
    assert_eq!(ctrl.model().node(b).unwrap().inputs[0].target, None);
    assert!(ctrl.socket(SocketRef::output(a, 0)).unwrap().connections().is_empty());
    assert!(ctrl.socket(SocketRef::input(b, 0)).unwrap().connections().is_empty());
    assert!(ctrl.selection().is_empty());
    assert_eq!(harness.node_count(), 2);

    assert_eq!(
        harness.hooks.calls(),
        vec![format!("connection_removed@{}", b), format!("connection_removed@{}", a)]
    );
    assert_eq!(harness.events.kinds(), vec![GraphEventKind::ConnectionDeleted]);
    assert!(harness.rows().is_empty());
}

#[test]
fn test_delete_without_selection_is_not_handled() {
    let harness = EditorHarness::new();
    harness.add_const(0.0, 0.0);

    assert!(!harness.key_tap(Key::Delete));
    assert_eq!(harness.node_count(), 1);
}

#[test]
fn test_other_keys_are_not_handled() {
    let harness = EditorHarness::new();
    let a = harness.add_const(0.0, 0.0);
    harness.editor.borrow_mut().click_node(a).unwrap();

    assert!(!harness.key_tap(Key::Backspace));
    assert!(!(harness.editor.key_pressed_callback())("d".into()));
    assert_eq!(harness.node_count(), 1);
}

// ============================================================================
// Cascade delete
// ============================================================================

#[test]
fn test_delete_node_cascades_to_connections() {
    let harness = EditorHarness::new();
    let a = harness.add_const(0.0, 0.0);
    let s = harness.add_step(400.0, 0.0);
    let t = harness.add_step(800.0, 0.0);
    let u = harness.add_step(800.0, 200.0);

    harness.connect(SocketRef::input(s, 0), SocketRef::output(a, 0));
    harness.connect(SocketRef::input(t, 0), SocketRef::output(s, 0));
    harness.connect(SocketRef::flow_input(u), SocketRef::output(s, 1));
    let untouched = harness.connect(SocketRef::input(u, 0), SocketRef::output(a, 0));

    harness.editor.borrow_mut().click_node(s).unwrap();
    harness.events.clear();
    harness.hooks.clear();
    assert!(harness.key_tap(Key::Delete));

    assert_eq!(
        harness.events.kinds(),
        vec![
            GraphEventKind::ConnectionDeleted,
            GraphEventKind::ConnectionDeleted,
            GraphEventKind::ConnectionDeleted,
            GraphEventKind::NodeDeleted,
        ]
    );
    // every removal hook runs before the node's own `deleted` hook
    assert_eq!(harness.hooks.calls().last(), Some(&format!("deleted@{}", s)));
    assert_eq!(harness.hooks.count("deleted"), 1);

    let ctrl = harness.editor.borrow();
    assert!(ctrl.node(s).is_none());
    assert!(ctrl.model().node(s).is_none());
    assert!(ctrl.geometry().node_rect(s).is_none());
    assert_eq!(ctrl.connections().map(|c| c.id()).collect::<Vec<_>>(), vec![untouched]);

    // neighbours no longer point at the deleted node
    assert_eq!(ctrl.model().node(t).unwrap().inputs[0].target, None);
    assert_eq!(ctrl.socket(SocketRef::output(a, 0)).unwrap().connections(), &[untouched]);
    assert!(ctrl.socket(SocketRef::flow_input(u)).unwrap().connections().is_empty());
    assert_eq!(harness.rows().len(), 1);
}

#[test]
fn test_delete_flow_target_resets_source() {
    let harness = EditorHarness::new();
    let a = harness.add_step(0.0, 0.0);
    let b = harness.add_step(400.0, 0.0);
    harness.connect(SocketRef::flow_input(b), SocketRef::output(a, 1));

    harness.editor.borrow_mut().delete_node(b).unwrap();

    let ctrl = harness.editor.borrow();
    assert_eq!(ctrl.model().node(a).unwrap().outputs[1].flow_target(), None);
    assert_eq!(ctrl.model().node(a).unwrap().outputs[1].value, serde_json::json!(-1));
}

#[test]
fn test_node_deleted_event_carries_id() {
    let harness = EditorHarness::new();
    let a = harness.add_const(0.0, 0.0);
    harness.events.clear();

    harness.editor.borrow_mut().delete_node(a).unwrap();
    assert_eq!(*harness.events.events.borrow(), vec![GraphEvent::NodeDeleted(a)]);
}

#[test]
fn test_delete_node_during_drag_from_it() {
    let harness = EditorHarness::new();
    let a = harness.add_const(0.0, 0.0);

    harness.pointer_down(150.0, 52.0);
    assert!(harness.editor.borrow().preview().is_some());
    harness.editor.borrow_mut().delete_node(a).unwrap();

    let ctrl = harness.editor.borrow();
    assert!(ctrl.preview().is_none());
    assert!(ctrl.gesture().is_idle());
}

// ============================================================================
// Escape
// ============================================================================

#[test]
fn test_escape_while_idle_is_not_handled() {
    let harness = EditorHarness::new();
    assert!(!harness.key_tap(Key::Escape));
}

#[test]
fn test_escape_cancels_connection_drag() {
    let harness = EditorHarness::new();
    harness.add_const(0.0, 0.0);

    harness.pointer_down(150.0, 52.0);
    harness.pointer_move(200.0, 90.0);
    assert_eq!(harness.rows().len(), 1);

    assert!(harness.key_tap(Key::Escape));
    assert!(harness.rows().is_empty());
    assert!(harness.editor.borrow().gesture().is_idle());
}

#[test]
fn test_key_mapping() {
    assert_eq!(EditorKey::from_text(&slint::SharedString::from(Key::Delete)), EditorKey::Delete);
    assert_eq!(EditorKey::from_text(&slint::SharedString::from(Key::Escape)), EditorKey::Escape);
    assert_eq!(EditorKey::from_text("q"), EditorKey::Other);
}
