use std::rc::Rc;

use smallvec::SmallVec;
use tracing::{trace, warn};

use crate::core::{
    CollectionEvent, CollectionKey, EventEnvelope, EventFlavor, EventListener, SharedCollection,
};

use super::binding::BindingOptions;
use super::coordinator::BindingCoordinator;
use super::dispatch::DispatchTarget;

/// Installed listener state for one collection instance.
///
/// The flavor and the exact listener pairs are cached at install time, so
/// uninstall detaches precisely what install attached and never leaves a
/// dangling listener behind.
pub(super) struct SubscriptionRecord {
    pub(super) collection: SharedCollection,
    pub(super) flavor: EventFlavor,
    pub(super) listeners: SmallVec<[(CollectionEvent, EventListener); 8]>,
}

impl SubscriptionRecord {
    pub(super) fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl BindingCoordinator {
    /// Attaches listeners for every event in the collection's vocabulary.
    ///
    /// Dispatch targets are resolved here, at subscribe time, through the
    /// installing binding's callback map; later bindings of the same
    /// collection share the installed routing. A `silence` binding installs
    /// an empty record: the flavor is still cached, no listener is attached.
    pub(super) fn install_subscription(
        &mut self,
        collection: &SharedCollection,
        options: &BindingOptions,
    ) {
        let flavor = collection.flavor();
        let mut listeners: SmallVec<[(CollectionEvent, EventListener); 8]> = SmallVec::new();

        if !options.silence {
            for &event in flavor.events() {
                let target = options.event_callbacks.resolve(event);
                let listener = self.dispatch_listener(target);
                collection.subscribe(event, &listener);
                listeners.push((event, listener));
            }
        }
        trace!(flavor = ?flavor, count = listeners.len(), "subscription installed");

        self.subscriptions.insert(
            CollectionKey::of(collection),
            SubscriptionRecord {
                collection: Rc::clone(collection),
                flavor,
                listeners,
            },
        );
    }

    /// Detaches exactly the cached listener pairs for `key`.
    pub(super) fn uninstall_subscription(&mut self, key: CollectionKey) {
        let Some(record) = self.subscriptions.remove(&key) else {
            return;
        };
        for (event, listener) in &record.listeners {
            record.collection.unsubscribe(*event, listener);
        }
        trace!(count = record.listeners.len(), "subscription uninstalled");
    }

    /// Number of live listener attachments for `collection`; zero when the
    /// collection is unknown or bound in silence.
    #[must_use]
    pub fn subscription_count(&self, collection: &SharedCollection) -> usize {
        self.subscriptions
            .get(&CollectionKey::of(collection))
            .map_or(0, SubscriptionRecord::listener_count)
    }

    /// Event flavor cached when `collection`'s subscription was installed.
    #[must_use]
    pub fn subscribed_flavor(&self, collection: &SharedCollection) -> Option<EventFlavor> {
        self.subscriptions
            .get(&CollectionKey::of(collection))
            .map(|record| record.flavor)
    }

    fn dispatch_listener(&self, target: DispatchTarget) -> EventListener {
        let host = self.host.clone();
        Rc::new(move |envelope: &EventEnvelope| {
            let Some(host) = host.upgrade() else {
                warn!(event = %envelope.event, "dropping event for released view");
                return;
            };
            match host.try_borrow_mut() {
                Ok(mut view) => match &target {
                    DispatchTarget::Callback(name) => view.invoke_callback(name, Some(envelope)),
                    DispatchTarget::RenderDirect => view.render(Some(envelope)),
                },
                Err(_) => warn!(event = %envelope.event, "re-entrant dispatch suppressed"),
            }
        })
    }
}
