#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use chart_bind::api::{BindingCoordinator, BindingHost, BindingNotice, RenderGate};
use chart_bind::core::{
    CollectionEvent, EventEnvelope, EventListener, ListenerSet, ObservableCollection,
    SeriesCollection, SharedCollection,
};
use serde_json::Value;

/// View double recording everything that reaches it.
///
/// `render` honors the coordinator's gate the way a real view would;
/// `invoke_callback` records the resolved name and only falls through to
/// `render` for the `render` callback, so named-dispatch tests can tell the
/// two paths apart.
#[derive(Default)]
pub struct RecordingView {
    pub gate: Option<RenderGate>,
    pub render_count: usize,
    pub rendered: Vec<Option<EventEnvelope>>,
    pub callbacks: Vec<(String, Option<EventEnvelope>)>,
    pub notices: Vec<(String, Option<String>)>,
}

impl BindingHost for RecordingView {
    fn render(&mut self, event: Option<&EventEnvelope>) {
        if let Some(gate) = &self.gate
            && !gate.permits_render()
        {
            return;
        }
        self.render_count += 1;
        self.rendered.push(event.cloned());
    }

    fn invoke_callback(&mut self, name: &str, event: Option<&EventEnvelope>) {
        self.callbacks.push((name.to_owned(), event.cloned()));
        if name == "render" {
            self.render(event);
        }
    }

    fn notify(&mut self, notice: &BindingNotice) {
        self.notices.push((
            notice.name().to_owned(),
            notice.binding_id().map(ToString::to_string),
        ));
    }
}

/// A coordinator wired to a fresh recording view.
pub fn recording_setup() -> (Rc<RefCell<RecordingView>>, BindingCoordinator) {
    let view = Rc::new(RefCell::new(RecordingView::default()));
    let coordinator = BindingCoordinator::new(&view);
    view.borrow_mut().gate = Some(coordinator.render_gate());
    (view, coordinator)
}

/// Generic-flavor collection double with manual emission.
#[derive(Default)]
pub struct GenericCollection {
    listeners: ListenerSet,
}

impl GenericCollection {
    pub fn emit(&self, event: CollectionEvent, payload: Value) {
        self.listeners.emit(&EventEnvelope::new(event, payload));
    }

    pub fn listener_count(&self, event: CollectionEvent) -> usize {
        self.listeners.count(event)
    }

    pub fn listener_total(&self) -> usize {
        self.listeners.total()
    }
}

impl ObservableCollection for GenericCollection {
    fn subscribe(&self, event: CollectionEvent, listener: &EventListener) {
        self.listeners.attach(event, listener);
    }

    fn unsubscribe(&self, event: CollectionEvent, listener: &EventListener) {
        self.listeners.detach(event, listener);
    }
}

/// Collection refusing part of its advertised vocabulary.
pub struct LameCollection;

impl ObservableCollection for LameCollection {
    fn supports(&self, event: CollectionEvent) -> bool {
        event != CollectionEvent::Sort
    }

    fn subscribe(&self, _event: CollectionEvent, _listener: &EventListener) {}

    fn unsubscribe(&self, _event: CollectionEvent, _listener: &EventListener) {}
}

pub fn generic() -> Rc<GenericCollection> {
    Rc::new(GenericCollection::default())
}

pub fn series() -> Rc<SeriesCollection> {
    Rc::new(SeriesCollection::new())
}

/// Coerces a concrete collection handle into the shared trait handle.
pub fn shared<C: ObservableCollection + 'static>(collection: &Rc<C>) -> SharedCollection {
    let shared: SharedCollection = collection.clone();
    shared
}
