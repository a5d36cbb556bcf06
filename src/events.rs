//! Editor events.
//!
//! The controller reports user-visible changes through an [`EventBus`].
//! Listeners run synchronously inside the controller call that caused the
//! event, so they observe the state right after the change. They receive the
//! event by reference and cannot call back into the controller.
//!
//! # Example
//!
//! ```ignore
//! let id = ctrl.events_mut().subscribe(GraphEventKind::NodeDeleted, |event| {
//!     log::info!("{:?}", event);
//! });
//! // later
//! ctrl.events_mut().unsubscribe(id);
//! ```

use crate::connection::{ConnectionId, ConnectionInfo};
use crate::model::NodeId;
use std::fmt;
use std::rc::Rc;

#[derive(Clone, Debug, PartialEq)]
pub enum GraphEvent {
    GraphClicked,
    NodeAdded(NodeId),
    NodeClicked(NodeId),
    NodeDeleted(NodeId),
    ConnectionAdded(ConnectionInfo),
    ConnectionClicked(ConnectionId),
    ConnectionDeleted(ConnectionInfo),
}

/// Event names without payload, used to filter subscriptions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GraphEventKind {
    GraphClicked,
    NodeAdded,
    NodeClicked,
    NodeDeleted,
    ConnectionAdded,
    ConnectionClicked,
    ConnectionDeleted,
}

impl GraphEvent {
    pub fn kind(&self) -> GraphEventKind {
        match self {
            GraphEvent::GraphClicked => GraphEventKind::GraphClicked,
            GraphEvent::NodeAdded(_) => GraphEventKind::NodeAdded,
            GraphEvent::NodeClicked(_) => GraphEventKind::NodeClicked,
            GraphEvent::NodeDeleted(_) => GraphEventKind::NodeDeleted,
            GraphEvent::ConnectionAdded(_) => GraphEventKind::ConnectionAdded,
            GraphEvent::ConnectionClicked(_) => GraphEventKind::ConnectionClicked,
            GraphEvent::ConnectionDeleted(_) => GraphEventKind::ConnectionDeleted,
        }
    }
}

impl GraphEventKind {
    /// Event name as used by hosts, e.g. `"node-deleted"`.
    pub fn name(self) -> &'static str {
        match self {
            GraphEventKind::GraphClicked => "graph-clicked",
            GraphEventKind::NodeAdded => "node-added",
            GraphEventKind::NodeClicked => "node-clicked",
            GraphEventKind::NodeDeleted => "node-deleted",
            GraphEventKind::ConnectionAdded => "connection-added",
            GraphEventKind::ConnectionClicked => "connection-clicked",
            GraphEventKind::ConnectionDeleted => "connection-deleted",
        }
    }
}

impl fmt::Display for GraphEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Handle returned by `subscribe`, used to unsubscribe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

pub type Listener = Rc<dyn Fn(&GraphEvent)>;

struct Subscription {
    id: ListenerId,
    kind: Option<GraphEventKind>,
    listener: Listener,
}

#[derive(Default)]
pub struct EventBus {
    subscriptions: Vec<Subscription>,
    next_id: u64,
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.subscriptions.len())
            .finish()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Listen to one kind of event.
    pub fn subscribe(&mut self, kind: GraphEventKind, listener: impl Fn(&GraphEvent) + 'static) -> ListenerId {
        self.insert(Some(kind), Rc::new(listener))
    }

    /// Listen to every event.
    pub fn subscribe_all(&mut self, listener: impl Fn(&GraphEvent) + 'static) -> ListenerId {
        self.insert(None, Rc::new(listener))
    }

    fn insert(&mut self, kind: Option<GraphEventKind>, listener: Listener) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.subscriptions.push(Subscription { id, kind, listener });
        id
    }

    /// Returns `false` if the listener was already gone.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.subscriptions.len();
        self.subscriptions.retain(|s| s.id != id);
        self.subscriptions.len() != before
    }

    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }

    /// Deliver an event to matching listeners in subscription order.
    pub fn dispatch(&self, event: &GraphEvent) {
        let kind = event.kind();
        log::trace!("dispatch {}", kind);
        for subscription in &self.subscriptions {
            if subscription.kind.map_or(true, |k| k == kind) {
                (subscription.listener)(event);
            }
        }
    }
}
