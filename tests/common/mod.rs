//! Common test utilities for integration tests.

#![allow(dead_code)]

pub mod harness;

use flow_graph_editor::{EventBus, GraphEvent, GraphEventKind};
use std::cell::RefCell;
use std::rc::Rc;

/// Route `log` output through the test harness; safe to call from every test.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Records every event dispatched on a bus.
#[derive(Default, Clone)]
pub struct EventTracker {
    pub events: Rc<RefCell<Vec<GraphEvent>>>,
}

impl EventTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to all events of `bus`.
    pub fn attach(&self, bus: &mut EventBus) {
        let events = self.events.clone();
        bus.subscribe_all(move |event| events.borrow_mut().push(event.clone()));
    }

    pub fn kinds(&self) -> Vec<GraphEventKind> {
        self.events.borrow().iter().map(GraphEvent::kind).collect()
    }

    pub fn count(&self, kind: GraphEventKind) -> usize {
        self.events.borrow().iter().filter(|e| e.kind() == kind).count()
    }

    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }
}

/// Records registry hook invocations as `"<hook>@<node id>"`.
#[derive(Default, Clone)]
pub struct HookTracker {
    pub calls: Rc<RefCell<Vec<String>>>,
}

impl HookTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, hook: &str, node: impl std::fmt::Display) {
        self.calls.borrow_mut().push(format!("{}@{}", hook, node));
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    /// Number of calls to `hook`, on any node.
    pub fn count(&self, hook: &str) -> usize {
        let prefix = format!("{}@", hook);
        self.calls.borrow().iter().filter(|c| c.starts_with(&prefix)).count()
    }

    pub fn clear(&self) {
        self.calls.borrow_mut().clear();
    }
}
