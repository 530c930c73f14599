use std::cell::{Cell, RefCell};
use std::fmt::Debug;
use std::rc::Rc;

/// An event that knows which topic it is published on.
pub trait TopicEvent {
    type Topic: Copy + Eq + Debug;

    fn topic(&self) -> Self::Topic;
}

/// Identity of a subscriber instance. Allocated fresh for every scene load so a
/// recreated scene never shares identity with the instance it replaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OwnerId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandlerId(pub u64);

type Handler<E> = Rc<dyn Fn(&E)>;

struct Subscription<E: TopicEvent> {
    topic: E::Topic,
    owner: OwnerId,
    handler_id: HandlerId,
    handler: Handler<E>,
}

/// Synchronous, unbuffered publish/subscribe keyed by topic.
///
/// `publish` runs every handler subscribed to the event's topic, in
/// subscription order, before it returns. Nothing is queued or replayed.
/// Handlers may publish, subscribe or unsubscribe while a delivery is in
/// progress: handlers added during a publish do not see that event, and a
/// handler removed during a publish is not invoked afterwards.
pub struct EventBus<E: TopicEvent> {
    subscriptions: RefCell<Vec<Subscription<E>>>,
    next_owner: Cell<u64>,
    next_handler: Cell<u64>,
}

impl<E: TopicEvent> Default for EventBus<E> {
    fn default() -> Self {
        Self {
            subscriptions: RefCell::new(Vec::new()),
            next_owner: Cell::new(0),
            next_handler: Cell::new(0),
        }
    }
}

impl<E: TopicEvent> EventBus<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate_owner(&self) -> OwnerId {
        let id = self.next_owner.get();
        self.next_owner.set(id.saturating_add(1));
        OwnerId(id)
    }

    pub fn subscribe<F>(&self, topic: E::Topic, owner: OwnerId, handler: F) -> HandlerId
    where
        F: Fn(&E) + 'static,
    {
        let id = self.next_handler.get();
        self.next_handler.set(id.saturating_add(1));
        let handler_id = HandlerId(id);
        self.subscriptions.borrow_mut().push(Subscription {
            topic,
            owner,
            handler_id,
            handler: Rc::new(handler),
        });
        handler_id
    }

    /// Removes the subscription only when topic, handler and owner all match.
    pub fn unsubscribe(&self, topic: E::Topic, handler_id: HandlerId, owner: OwnerId) -> bool {
        let mut subscriptions = self.subscriptions.borrow_mut();
        let before = subscriptions.len();
        subscriptions.retain(|subscription| {
            !(subscription.topic == topic
                && subscription.handler_id == handler_id
                && subscription.owner == owner)
        });
        subscriptions.len() != before
    }

    pub fn unsubscribe_owner(&self, owner: OwnerId) -> usize {
        let mut subscriptions = self.subscriptions.borrow_mut();
        let before = subscriptions.len();
        subscriptions.retain(|subscription| subscription.owner != owner);
        before - subscriptions.len()
    }

    pub fn subscriber_count(&self, topic: E::Topic) -> usize {
        self.subscriptions
            .borrow()
            .iter()
            .filter(|subscription| subscription.topic == topic)
            .count()
    }

    /// Returns how many handlers were invoked.
    pub fn publish(&self, event: &E) -> usize {
        let topic = event.topic();
        // The borrow must end before any handler runs.
        let targets: Vec<(HandlerId, Handler<E>)> = self
            .subscriptions
            .borrow()
            .iter()
            .filter(|subscription| subscription.topic == topic)
            .map(|subscription| (subscription.handler_id, Rc::clone(&subscription.handler)))
            .collect();

        let mut delivered = 0usize;
        for (handler_id, handler) in targets {
            if !self.is_live(handler_id) {
                continue;
            }
            handler(event);
            delivered = delivered.saturating_add(1);
        }
        delivered
    }

    fn is_live(&self, handler_id: HandlerId) -> bool {
        self.subscriptions
            .borrow()
            .iter()
            .any(|subscription| subscription.handler_id == handler_id)
    }
}
