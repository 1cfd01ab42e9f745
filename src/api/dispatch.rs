use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::core::{CollectionEvent, EventEnvelope};

use super::binding::BindingNotice;

/// Callback name targeted when a map carries no better entry.
pub const DEFAULT_CALLBACK: &str = "render";

/// Event-to-callback routing declared by a binding.
///
/// Resolution order for an incoming event: the exact event entry, then the
/// default entry, then the view's `render` method directly. The default map
/// carries a single default entry pointing at `render`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventCallbackMap {
    entries: IndexMap<CollectionEvent, String>,
    default_callback: Option<String>,
}

impl Default for EventCallbackMap {
    fn default() -> Self {
        Self {
            entries: IndexMap::new(),
            default_callback: Some(DEFAULT_CALLBACK.to_owned()),
        }
    }
}

impl EventCallbackMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Map with no entries at all; every event falls through to `render`.
    #[must_use]
    pub fn bare() -> Self {
        Self {
            entries: IndexMap::new(),
            default_callback: None,
        }
    }

    /// Routes `event` to the named callback.
    #[must_use]
    pub fn with_entry(mut self, event: CollectionEvent, callback: impl Into<String>) -> Self {
        self.entries.insert(event, callback.into());
        self
    }

    /// Replaces the default entry.
    #[must_use]
    pub fn with_default(mut self, callback: impl Into<String>) -> Self {
        self.default_callback = Some(callback.into());
        self
    }

    /// Drops the default entry; unmapped events then dispatch straight to
    /// `render`.
    #[must_use]
    pub fn without_default(mut self) -> Self {
        self.default_callback = None;
        self
    }

    /// Resolves the dispatch destination for `event`.
    #[must_use]
    pub fn resolve(&self, event: CollectionEvent) -> DispatchTarget {
        if let Some(name) = self.entries.get(&event) {
            return DispatchTarget::Callback(name.clone());
        }
        match &self.default_callback {
            Some(name) => DispatchTarget::Callback(name.clone()),
            None => DispatchTarget::RenderDirect,
        }
    }
}

/// Resolved dispatch destination for one subscribed event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchTarget {
    /// Invoke a named callback on the view.
    Callback(String),
    /// Invoke the view's `render` method directly.
    RenderDirect,
}

/// Contract required from the owning view.
///
/// `render` is the ultimate dispatch target. Implementations check the
/// coordinator's [`RenderGate`](super::RenderGate) as their first
/// precondition; that check is the suspension enforcement point, so a
/// suspended view keeps its bookkeeping and non-render side effects while
/// skipping actual drawing work.
pub trait BindingHost {
    /// Redraw entry point. `event` carries the triggering notification, or
    /// `None` for direct redraw requests (visibility changes, post-bind
    /// renders).
    fn render(&mut self, event: Option<&EventEnvelope>);

    /// Name-keyed callback dispatch; unknown names fall through to `render`.
    fn invoke_callback(&mut self, name: &str, event: Option<&EventEnvelope>) {
        let _ = name;
        self.render(event);
    }

    /// Observation point for the named binding notifications.
    fn notify(&mut self, notice: &BindingNotice) {
        let _ = notice;
    }
}

#[cfg(test)]
mod tests {
    use super::{DEFAULT_CALLBACK, DispatchTarget, EventCallbackMap};
    use crate::core::CollectionEvent;

    #[test]
    fn exact_entry_wins_over_default() {
        let map = EventCallbackMap::new().with_entry(CollectionEvent::Sort, "on_sort");
        assert_eq!(
            map.resolve(CollectionEvent::Sort),
            DispatchTarget::Callback("on_sort".to_owned())
        );
        assert_eq!(
            map.resolve(CollectionEvent::Change),
            DispatchTarget::Callback(DEFAULT_CALLBACK.to_owned())
        );
    }

    #[test]
    fn missing_default_falls_through_to_render() {
        let map = EventCallbackMap::bare();
        assert_eq!(
            map.resolve(CollectionEvent::Add),
            DispatchTarget::RenderDirect
        );

        let map = EventCallbackMap::bare().with_entry(CollectionEvent::Destroy, "on_destroy");
        assert_eq!(
            map.resolve(CollectionEvent::Destroy),
            DispatchTarget::Callback("on_destroy".to_owned())
        );
        assert_eq!(
            map.resolve(CollectionEvent::Set),
            DispatchTarget::RenderDirect
        );
    }

    #[test]
    fn replaced_default_routes_unmapped_events() {
        let map = EventCallbackMap::new().with_default("redraw_all");
        assert_eq!(
            map.resolve(CollectionEvent::Reset),
            DispatchTarget::Callback("redraw_all".to_owned())
        );
    }
}
