// Copyright (c) 2024 Mike Tsao

use crate::types::{ListenerId, UidFactory};
use core::fmt::Debug;
use std::{
    any::Any,
    cell::RefCell,
    panic::{self, AssertUnwindSafe},
    rc::Rc,
};

type Listener<T> = Rc<dyn Fn(&T)>;

struct BusInner<T> {
    listeners: RefCell<Vec<(ListenerId, Listener<T>)>>,
    uid_factory: UidFactory,

    // Registrations this bus holds on the buses it was derived from.
    upstream: RefCell<Vec<Unsubscribe>>,
}
impl<T> BusInner<T> {
    fn remove(&self, id: ListenerId) {
        self.listeners.borrow_mut().retain(|(i, _)| *i != id);
    }
}

/// A hot, synchronous, multi-listener broadcast channel.
///
/// [EventBus::send] hands the value to every listener that was registered when
/// the call began, exactly once each, before returning. Nothing is buffered: a
/// value sent while nobody is listening is gone.
///
/// Listeners may subscribe, unsubscribe (themselves or others), or send during
/// delivery. Those changes take effect for the *next* delivery; the one in
/// progress works from a snapshot of the listener set taken at entry.
///
/// A listener that panics is logged and skipped. The remaining listeners still
/// run, and the panic never reaches the caller of [EventBus::send].
///
/// Cloning an [EventBus] produces another handle to the same listener set.
///
/// A bus made by [EventBus::map], [EventBus::filter], [EventBus::flat_map],
/// [merge](crate::bus::merge) or [combine](crate::bus::combine) is owned by
/// its sources, not by its handles. Dropping every handle leaves it
/// registered upstream and forwarding to whatever listens to it, which is
/// what lets chains of temporaries work. Keep a handle and call
/// [EventBus::dispose] to detach it.
pub struct EventBus<T> {
    inner: Rc<BusInner<T>>,
}
impl<T> Clone for EventBus<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}
impl<T> Default for EventBus<T> {
    fn default() -> Self {
        Self {
            inner: Rc::new(BusInner {
                listeners: Default::default(),
                uid_factory: Default::default(),
                upstream: Default::default(),
            }),
        }
    }
}
impl<T> Debug for EventBus<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listener_count())
            .field("upstream", &self.inner.upstream.borrow().len())
            .finish()
    }
}
impl<T: 'static> EventBus<T> {
    /// Registers `listener`. The returned [Unsubscribe] removes exactly this
    /// registration.
    pub fn subscribe(&self, listener: impl Fn(&T) + 'static) -> Unsubscribe {
        let id = self.inner.uid_factory.mint_next();
        self.inner
            .listeners
            .borrow_mut()
            .push((id, Rc::new(listener)));

        let weak = Rc::downgrade(&self.inner);
        Unsubscribe::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.remove(id);
            }
        })
    }

    /// Delivers `value` to every current listener.
    pub fn send(&self, value: T) {
        let snapshot: Vec<Listener<T>> = self
            .inner
            .listeners
            .borrow()
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();

        for listener in snapshot {
            if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| listener(&value))) {
                log::error!(
                    "EventBus listener panicked; continuing delivery: {}",
                    panic_message(payload.as_ref())
                );
            }
        }
    }
}
impl<T> EventBus<T> {
    /// Creates a bus with no listeners.
    pub fn new() -> Self {
        Self::default()
    }

    /// How many listeners are registered right now.
    pub fn listener_count(&self) -> usize {
        self.inner.listeners.borrow().len()
    }

    #[allow(missing_docs)]
    pub fn has_listeners(&self) -> bool {
        self.listener_count() > 0
    }

    /// Whether `other` is a handle to this same bus.
    pub fn same_bus(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Detaches this bus from every bus it was derived from. After this, the
    /// bus receives nothing more from upstream, and it's freed once the caller
    /// drops its handles. Calling it again does nothing.
    pub fn dispose(&self) {
        let upstream = core::mem::take(&mut *self.inner.upstream.borrow_mut());
        if !upstream.is_empty() {
            log::trace!("disposing bus with {} upstream links", upstream.len());
        }
        for unsubscribe in upstream {
            unsubscribe.unsubscribe();
        }
    }

    pub(crate) fn adopt_upstream(&self, unsubscribe: Unsubscribe) {
        self.inner.upstream.borrow_mut().push(unsubscribe);
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "(non-string panic payload)"
    }
}

/// The capability to remove one listener from one [EventBus].
///
/// Invoking it more than once, or after the bus is gone, is harmless. Dropping
/// it without invoking it leaves the listener registered.
#[derive(Clone)]
pub struct Unsubscribe {
    remove: Rc<dyn Fn()>,
}
impl Debug for Unsubscribe {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("Unsubscribe")
    }
}
impl Unsubscribe {
    fn new(remove: impl Fn() + 'static) -> Self {
        Self {
            remove: Rc::new(remove),
        }
    }

    /// Removes the listener. Effective immediately, including for any
    /// delivery pass that starts after this call.
    pub fn unsubscribe(&self) {
        (self.remove)()
    }
}
