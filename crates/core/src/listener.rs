//! Event-to-handler bindings with scoped release.
//!
//! A host owns a [`Listeners`] per event kind and calls [`Listeners::emit`]
//! when the event fires. Whoever subscribes holds the returned
//! [`Subscription`]; dropping it unbinds the handler, so a torn-down page
//! view can never be called back.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

type Handler<E> = Rc<RefCell<dyn FnMut(&E)>>;

struct Registry<E: ?Sized> {
    next_id: u64,
    handlers: Vec<(u64, Handler<E>)>,
}

impl<E: ?Sized> Registry<E> {
    fn contains(&self, id: u64) -> bool {
        self.handlers.iter().any(|(h, _)| *h == id)
    }
}

/// Handlers for one kind of event.
///
/// Cloning yields another handle to the same registry.
pub struct Listeners<E: ?Sized> {
    registry: Rc<RefCell<Registry<E>>>,
}

impl<E: ?Sized + 'static> Listeners<E> {
    pub fn new() -> Self {
        Self {
            registry: Rc::new(RefCell::new(Registry {
                next_id: 0,
                handlers: Vec::new(),
            })),
        }
    }

    /// Bind `handler` until the returned guard is dropped.
    pub fn subscribe<F>(&self, handler: F) -> Subscription
    where
        F: FnMut(&E) + 'static,
    {
        let handler: Handler<E> = Rc::new(RefCell::new(handler));
        let id = {
            let mut registry = self.registry.borrow_mut();
            let id = registry.next_id;
            registry.next_id += 1;
            registry.handlers.push((id, handler));
            id
        };

        let weak: Weak<RefCell<Registry<E>>> = Rc::downgrade(&self.registry);
        Subscription {
            detach: Some(Box::new(move || {
                if let Some(registry) = weak.upgrade() {
                    registry.borrow_mut().handlers.retain(|(h, _)| *h != id);
                }
            })),
        }
    }

    /// Run every bound handler. Returns how many ran.
    ///
    /// Handlers may subscribe or unsubscribe while the event is being
    /// delivered; one unbound mid-delivery is not called. A handler that
    /// re-emits the event it is handling is skipped for the nested call.
    pub fn emit(&self, event: &E) -> usize {
        let snapshot: Vec<(u64, Handler<E>)> = self
            .registry
            .borrow()
            .handlers
            .iter()
            .map(|(id, h)| (*id, Rc::clone(h)))
            .collect();

        let mut ran = 0;
        for (id, handler) in snapshot {
            if !self.registry.borrow().contains(id) {
                continue;
            }
            let Ok(mut handler) = handler.try_borrow_mut() else {
                continue;
            };
            (*handler)(event);
            ran += 1;
        }
        ran
    }

    pub fn len(&self) -> usize {
        self.registry.borrow().handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<E: ?Sized + 'static> Default for Listeners<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: ?Sized> Clone for Listeners<E> {
    fn clone(&self) -> Self {
        Self {
            registry: Rc::clone(&self.registry),
        }
    }
}

impl<E: ?Sized> fmt::Debug for Listeners<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners")
            .field("handlers", &self.registry.borrow().handlers.len())
            .finish()
    }
}

/// Keeps a handler bound. Dropping it unbinds the handler.
#[must_use = "dropping a Subscription unbinds its handler immediately"]
pub struct Subscription {
    detach: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    /// Unbind now. Equivalent to dropping the guard.
    pub fn cancel(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(detach) = self.detach.take() {
            detach();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.detach.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    #[test]
    fn emits_to_bound_handlers() {
        let events: Listeners<u32> = Listeners::new();
        let total = Rc::new(Cell::new(0));
        let t = Rc::clone(&total);
        let _sub = events.subscribe(move |n| t.set(t.get() + n));

        assert_eq!(events.emit(&3), 1);
        assert_eq!(events.emit(&4), 1);
        assert_eq!(total.get(), 7);
    }

    #[test]
    fn dropping_the_guard_unbinds() {
        let events: Listeners<u32> = Listeners::new();
        let calls = Rc::new(Cell::new(0));
        let c = Rc::clone(&calls);
        let sub = events.subscribe(move |_| c.set(c.get() + 1));
        events.emit(&0);
        drop(sub);

        assert!(events.is_empty());
        assert_eq!(events.emit(&0), 0);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn repeated_subscribe_cycles_do_not_accumulate() {
        let events: Listeners<u32> = Listeners::new();
        for _ in 0..10 {
            let sub = events.subscribe(|_| {});
            assert_eq!(events.len(), 1);
            sub.cancel();
        }
        assert!(events.is_empty());
    }

    #[test]
    fn guard_outliving_registry_is_harmless() {
        let sub = {
            let events: Listeners<u32> = Listeners::new();
            events.subscribe(|_| {})
        };
        drop(sub);
    }

    #[test]
    fn unsized_events() {
        let events: Listeners<str> = Listeners::new();
        let seen = Rc::new(RefCell::new(String::new()));
        let s = Rc::clone(&seen);
        let _sub = events.subscribe(move |text: &str| s.borrow_mut().push_str(text));
        events.emit("scroll");
        assert_eq!(seen.borrow().as_str(), "scroll");
    }

    #[test]
    fn handler_unbound_mid_delivery_is_skipped() {
        let events: Listeners<u32> = Listeners::new();
        let second_calls = Rc::new(Cell::new(0));
        let victim: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));

        let v = Rc::clone(&victim);
        let _first = events.subscribe(move |_| {
            v.borrow_mut().take();
        });
        let c = Rc::clone(&second_calls);
        *victim.borrow_mut() = Some(events.subscribe(move |_| c.set(c.get() + 1)));

        assert_eq!(events.emit(&0), 1);
        assert_eq!(second_calls.get(), 0);
        assert_eq!(events.len(), 1);
    }
}
