use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use indexmap::IndexMap;
use serde_json::Value;
use tracing::{debug, warn};

use crate::core::{CollectionKey, EventEnvelope, SharedCollection};
use crate::error::{BindError, BindResult};

use super::binding::{
    Binding, BindingId, BindingNotice, BindingOptions, BindingSelector, RenderConfig,
    empty_render_config,
};
use super::dispatch::BindingHost;
use super::render_gate::RenderGate;
use super::subscriptions::SubscriptionRecord;

/// Per-view coordinator: the binding registry, the per-collection
/// subscription records and the redraw suspension gate.
///
/// One coordinator belongs to exactly one view. The view owns the
/// coordinator; the coordinator holds the view weakly, so no reference cycle
/// forms. Collections are referenced, never owned, and the same instance may
/// be bound here multiple times under distinct ids while carrying exactly one
/// installed subscription.
///
/// Calls that reach back into the view (`request_render`, notices) expect the
/// view not to be mutably borrowed; a re-entrant call finding it borrowed is
/// suppressed and logged rather than panicking.
pub struct BindingCoordinator {
    pub(super) host: Weak<RefCell<dyn BindingHost>>,
    pub(super) gate: RenderGate,
    pub(super) bindings: IndexMap<BindingId, Binding>,
    pub(super) subscriptions: HashMap<CollectionKey, SubscriptionRecord>,
    next_auto_id: u64,
}

impl BindingCoordinator {
    /// Creates a coordinator for `host`.
    #[must_use]
    pub fn new<H>(host: &Rc<RefCell<H>>) -> Self
    where
        H: BindingHost + 'static,
    {
        let host: Rc<RefCell<dyn BindingHost>> = host.clone();
        Self {
            host: Rc::downgrade(&host),
            gate: RenderGate::new(),
            bindings: IndexMap::new(),
            subscriptions: HashMap::new(),
            next_auto_id: 0,
        }
    }

    /// Registers `collection` under a caller-supplied or generated id and
    /// returns the resolved id.
    ///
    /// The capability check runs eagerly over the collection's full event
    /// vocabulary and fails before any state is touched. The first binding
    /// for a collection instance installs the event subscription and emits
    /// `bindingInstalled`; every registration emits `bindingAdded`.
    /// Re-registering an existing id detaches the displaced binding first,
    /// so its collection's subscription is released when that was the last
    /// reference.
    pub fn register(
        &mut self,
        collection: &SharedCollection,
        render_config: Option<RenderConfig>,
        options: BindingOptions,
    ) -> BindResult<BindingId> {
        self.check_capabilities(collection)?;

        let id = match &options.id {
            Some(explicit) => BindingId::new(explicit.clone()),
            None => self.generate_id(),
        };

        if self.bindings.contains_key(&id) {
            debug!(id = %id, "replacing binding under existing id");
            let _ = self.remove_by_id(&id);
        }

        let key = CollectionKey::of(collection);
        if !self.subscriptions.contains_key(&key) {
            self.install_subscription(collection, &options);
            self.notify_host(&BindingNotice::Installed {
                collection: Rc::clone(collection),
            });
        }

        let render_config = render_config.unwrap_or_else(empty_render_config);
        self.bindings.insert(
            id.clone(),
            Binding {
                collection: Rc::clone(collection),
                render_config: render_config.clone(),
                options: options.clone(),
            },
        );
        debug!(id = %id, bindings = self.bindings.len(), "binding registered");

        self.notify_host(&BindingNotice::Added {
            id: id.clone(),
            collection: Rc::clone(collection),
            render_config,
            options: options.clone(),
        });

        if options.render_after_on {
            self.request_render(None);
        }

        Ok(id)
    }

    /// Registers every collection in `collections` with the same config and
    /// options; returns the id assigned per collection instance.
    ///
    /// A collection appearing more than once gets independent bindings with
    /// independent ids, unless `options.id` forces every registration under
    /// one id, in which case later entries replace earlier ones.
    pub fn register_many(
        &mut self,
        collections: &[SharedCollection],
        render_config: Option<RenderConfig>,
        options: BindingOptions,
    ) -> BindResult<IndexMap<CollectionKey, BindingId>> {
        let mut assigned = IndexMap::new();
        for collection in collections {
            let id = self.register(collection, render_config.clone(), options.clone())?;
            assigned.insert(CollectionKey::of(collection), id);
        }
        Ok(assigned)
    }

    /// Removes the selected binding(s); returns the underlying collection
    /// when anything was removed.
    pub fn remove(&mut self, selector: &BindingSelector) -> Option<SharedCollection> {
        match selector {
            BindingSelector::ById(id) => self.remove_by_id(id),
            BindingSelector::ByCollection(collection) => {
                // Snapshot first: a notice handler may re-enter the registry.
                let ids = self.ids_for(collection);
                if ids.is_empty() {
                    return None;
                }
                for id in ids {
                    let _ = self.remove_by_id(&id);
                }
                Some(Rc::clone(collection))
            }
        }
    }

    pub(super) fn remove_by_id(&mut self, id: &BindingId) -> Option<SharedCollection> {
        let binding = self.bindings.shift_remove(id)?;
        let collection = binding.collection;
        let key = CollectionKey::of(&collection);

        if !self.references(key) {
            self.uninstall_subscription(key);
            self.notify_host(&BindingNotice::Removed {
                collection: Rc::clone(&collection),
            });
        }
        debug!(id = %id, bindings = self.bindings.len(), "binding removed");
        self.notify_host(&BindingNotice::Deleted {
            id: id.clone(),
            collection: Rc::clone(&collection),
            render_config: binding.render_config,
            options: binding.options,
        });
        Some(collection)
    }

    /// Removes every binding; the teardown path.
    pub fn clear(&mut self) {
        let ids: Vec<BindingId> = self.bindings.keys().cloned().collect();
        debug!(count = ids.len(), "clearing all bindings");
        for id in ids {
            let _ = self.remove_by_id(&id);
        }
    }

    /// Stable-order traversal over all bindings. The order is the registry's
    /// insertion order and does not change while the registry is unmutated.
    pub fn for_each<F>(&self, mut f: F)
    where
        F: FnMut(&BindingId, &SharedCollection, &RenderConfig, &BindingOptions),
    {
        for (id, binding) in &self.bindings {
            f(id, &binding.collection, &binding.render_config, &binding.options);
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    #[must_use]
    pub fn contains(&self, id: &BindingId) -> bool {
        self.bindings.contains_key(id)
    }

    /// Requests one redraw through the host's render entry point. The render
    /// gate check inside that entry point is the suspension enforcement.
    pub fn request_render(&self, event: Option<&EventEnvelope>) {
        let Some(host) = self.host.upgrade() else {
            warn!("dropping render request for released view");
            return;
        };
        match host.try_borrow_mut() {
            Ok(mut view) => view.render(event),
            Err(_) => warn!("re-entrant render request suppressed"),
        }
    }

    /// Emits the `rendered` notification; views call this after a completed
    /// render pass, forwarding whatever payload their renderer produced.
    pub fn finish_render(&self, payload: Value) {
        self.notify_host(&BindingNotice::Rendered { payload });
    }

    pub(super) fn notify_host(&self, notice: &BindingNotice) {
        let Some(host) = self.host.upgrade() else {
            warn!(notice = notice.name(), "dropping notice for released view");
            return;
        };
        match host.try_borrow_mut() {
            Ok(mut view) => view.notify(notice),
            Err(_) => warn!(notice = notice.name(), "re-entrant notice suppressed"),
        }
    }

    fn references(&self, key: CollectionKey) -> bool {
        self.bindings.values().any(|binding| binding.key() == key)
    }

    fn generate_id(&mut self) -> BindingId {
        // Skip ids the caller already claimed explicitly.
        loop {
            self.next_auto_id += 1;
            let candidate = BindingId::generated(self.next_auto_id);
            if !self.bindings.contains_key(&candidate) {
                return candidate;
            }
        }
    }

    fn check_capabilities(&self, collection: &SharedCollection) -> BindResult<()> {
        let missing: Vec<_> = collection
            .flavor()
            .events()
            .iter()
            .copied()
            .filter(|event| !collection.supports(*event))
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(BindError::InvalidCollaborator { missing })
        }
    }
}
