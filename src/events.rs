//! Publish/subscribe primitive
//!
//! Session changes and theme changes are delivered through explicit
//! subscriber lists instead of a global event bus. A publisher owns its
//! subscribers; callers keep the returned id to unsubscribe.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

/// Identifies one subscription on one publisher
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Handler<T> = Rc<dyn Fn(&T)>;

/// Single-threaded observer list
pub struct Publisher<T> {
    subscribers: RefCell<Vec<(SubscriptionId, Handler<T>)>>,
    next_id: Cell<u64>,
}

impl<T> Publisher<T> {
    pub fn new() -> Self {
        Self {
            subscribers: RefCell::new(Vec::new()),
            next_id: Cell::new(0),
        }
    }

    /// Register a handler, invoked on every subsequent `publish`
    pub fn subscribe(&self, handler: impl Fn(&T) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.subscribers.borrow_mut().push((id, Rc::new(handler)));
        id
    }

    /// Remove a handler. Returns false if the id was not subscribed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscribers = self.subscribers.borrow_mut();
        let before = subscribers.len();
        subscribers.retain(|(sub_id, _)| *sub_id != id);
        subscribers.len() != before
    }

    /// Deliver an event to every subscriber in registration order
    ///
    /// Handlers may subscribe or unsubscribe while being notified; such
    /// changes take effect from the next publish.
    pub fn publish(&self, event: &T) {
        let handlers: Vec<Handler<T>> = self
            .subscribers
            .borrow()
            .iter()
            .map(|(_, handler)| Rc::clone(handler))
            .collect();

        for handler in handlers {
            handler(event);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.borrow().len()
    }
}

impl<T> Default for Publisher<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Publisher<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Publisher")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_reaches_all_subscribers() {
        let publisher = Publisher::<u32>::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let a = Rc::clone(&seen);
        publisher.subscribe(move |v| a.borrow_mut().push(("a", *v)));
        let b = Rc::clone(&seen);
        publisher.subscribe(move |v| b.borrow_mut().push(("b", *v)));

        publisher.publish(&7);

        assert_eq!(*seen.borrow(), vec![("a", 7), ("b", 7)]);
    }

    #[test]
    fn test_unsubscribe() {
        let publisher = Publisher::<()>::new();
        let count = Rc::new(Cell::new(0));

        let c = Rc::clone(&count);
        let id = publisher.subscribe(move |_| c.set(c.get() + 1));

        publisher.publish(&());
        assert!(publisher.unsubscribe(id));
        assert!(!publisher.unsubscribe(id));
        publisher.publish(&());

        assert_eq!(count.get(), 1);
        assert_eq!(publisher.subscriber_count(), 0);
    }

    #[test]
    fn test_subscribe_during_publish() {
        let publisher = Rc::new(Publisher::<()>::new());
        let inner = Rc::clone(&publisher);

        publisher.subscribe(move |_| {
            inner.subscribe(|_| {});
        });

        publisher.publish(&());
        assert_eq!(publisher.subscriber_count(), 2);
    }
}
