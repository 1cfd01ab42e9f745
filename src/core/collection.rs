use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use tracing::trace;

use super::{CollectionEvent, EventEnvelope, EventFlavor};

/// Callback invoked when a subscribed event fires.
///
/// Listener identity is `Rc` pointer identity; attach and detach are
/// idempotent with respect to it.
pub type EventListener = Rc<dyn Fn(&EventEnvelope)>;

/// Shared handle to a bound collection.
///
/// The coordinator only ever holds references; collection lifetime belongs to
/// the caller, and the same instance may be bound to many views at once.
pub type SharedCollection = Rc<dyn ObservableCollection>;

/// Capability contract required from a bindable collection.
pub trait ObservableCollection {
    /// Which event vocabulary this collection emits.
    fn flavor(&self) -> EventFlavor {
        EventFlavor::Generic
    }

    /// Capability probe: whether this collection can emit `event`.
    ///
    /// Registration checks the full flavor vocabulary through this before
    /// touching any state; a collection answering `false` for a required
    /// event is rejected as an invalid collaborator.
    fn supports(&self, event: CollectionEvent) -> bool {
        self.flavor().events().contains(&event)
    }

    fn subscribe(&self, event: CollectionEvent, listener: &EventListener);

    fn unsubscribe(&self, event: CollectionEvent, listener: &EventListener);
}

/// Address-based identity of a collection instance.
///
/// Two handles compare equal exactly when they point at the same allocation,
/// which is the registry's notion of "same collection".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CollectionKey(usize);

impl CollectionKey {
    #[must_use]
    pub fn of(collection: &SharedCollection) -> Self {
        Self(Rc::as_ptr(collection) as *const u8 as usize)
    }

    #[must_use]
    pub const fn raw(self) -> usize {
        self.0
    }
}

/// Whether two shared handles refer to the same collection instance.
#[must_use]
pub fn same_collection(a: &SharedCollection, b: &SharedCollection) -> bool {
    CollectionKey::of(a) == CollectionKey::of(b)
}

/// Collection-side listener registry.
///
/// Emission snapshots the listener list before invoking anything, so a
/// listener that detaches itself (or others) while running cannot corrupt the
/// iteration in progress.
#[derive(Default)]
pub struct ListenerSet {
    listeners: RefCell<HashMap<CollectionEvent, Vec<EventListener>>>,
}

impl ListenerSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches `listener` to `event`; a listener already attached under the
    /// same identity is left alone.
    pub fn attach(&self, event: CollectionEvent, listener: &EventListener) {
        let mut listeners = self.listeners.borrow_mut();
        let slot = listeners.entry(event).or_default();
        if slot.iter().any(|existing| Rc::ptr_eq(existing, listener)) {
            return;
        }
        slot.push(Rc::clone(listener));
        trace!(event = %event, count = slot.len(), "listener attached");
    }

    /// Detaches `listener` from `event` by identity; unknown pairs are a
    /// no-op.
    pub fn detach(&self, event: CollectionEvent, listener: &EventListener) {
        let mut listeners = self.listeners.borrow_mut();
        if let Some(slot) = listeners.get_mut(&event) {
            slot.retain(|existing| !Rc::ptr_eq(existing, listener));
            trace!(event = %event, count = slot.len(), "listener detached");
        }
    }

    #[must_use]
    pub fn count(&self, event: CollectionEvent) -> usize {
        self.listeners.borrow().get(&event).map_or(0, Vec::len)
    }

    /// Total attachments across all events.
    #[must_use]
    pub fn total(&self) -> usize {
        self.listeners.borrow().values().map(Vec::len).sum()
    }

    /// Delivers `envelope` to every listener attached to its event.
    pub fn emit(&self, envelope: &EventEnvelope) {
        let snapshot: Vec<EventListener> = self
            .listeners
            .borrow()
            .get(&envelope.event)
            .map(|slot| slot.iter().map(Rc::clone).collect())
            .unwrap_or_default();
        for listener in snapshot {
            listener(envelope);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::{CollectionEvent, EventEnvelope, EventListener, ListenerSet};

    fn counting_listener(hits: &Rc<Cell<usize>>) -> EventListener {
        let hits = Rc::clone(hits);
        Rc::new(move |_: &EventEnvelope| hits.set(hits.get() + 1))
    }

    #[test]
    fn attach_is_idempotent_by_identity() {
        let set = ListenerSet::new();
        let hits = Rc::new(Cell::new(0));
        let listener = counting_listener(&hits);

        set.attach(CollectionEvent::Set, &listener);
        set.attach(CollectionEvent::Set, &listener);
        assert_eq!(set.count(CollectionEvent::Set), 1);

        set.emit(&EventEnvelope::bare(CollectionEvent::Set));
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn detach_removes_only_the_given_identity() {
        let set = ListenerSet::new();
        let hits_a = Rc::new(Cell::new(0));
        let hits_b = Rc::new(Cell::new(0));
        let a = counting_listener(&hits_a);
        let b = counting_listener(&hits_b);

        set.attach(CollectionEvent::Change, &a);
        set.attach(CollectionEvent::Change, &b);
        set.detach(CollectionEvent::Change, &a);

        set.emit(&EventEnvelope::bare(CollectionEvent::Change));
        assert_eq!(hits_a.get(), 0);
        assert_eq!(hits_b.get(), 1);
        assert_eq!(set.count(CollectionEvent::Change), 1);
    }

    #[test]
    fn listener_may_detach_itself_during_emission() {
        let set = Rc::new(ListenerSet::new());
        let hits = Rc::new(Cell::new(0));

        let slot: Rc<RefCell<Option<EventListener>>> = Rc::new(RefCell::new(None));
        let listener: EventListener = {
            let set = Rc::clone(&set);
            let hits = Rc::clone(&hits);
            let slot = Rc::clone(&slot);
            Rc::new(move |envelope: &EventEnvelope| {
                hits.set(hits.get() + 1);
                if let Some(me) = slot.borrow().as_ref() {
                    set.detach(envelope.event, me);
                }
            })
        };
        *slot.borrow_mut() = Some(Rc::clone(&listener));
        set.attach(CollectionEvent::Reset, &listener);

        set.emit(&EventEnvelope::bare(CollectionEvent::Reset));
        set.emit(&EventEnvelope::bare(CollectionEvent::Reset));
        assert_eq!(hits.get(), 1);
        assert_eq!(set.count(CollectionEvent::Reset), 0);
    }
}
