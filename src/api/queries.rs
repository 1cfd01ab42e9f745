use std::rc::Rc;

use indexmap::IndexMap;

use crate::core::{CollectionKey, SharedCollection, same_collection};

use super::binding::{Binding, BindingId, BindingOptions, RenderConfig};
use super::coordinator::BindingCoordinator;

/// Read-only projections over the registry, all derived from the same
/// stable-order traversal `for_each` uses.
impl BindingCoordinator {
    /// Distinct bound collections, in registry order. A collection bound
    /// under several ids appears once.
    #[must_use]
    pub fn collections(&self) -> Vec<SharedCollection> {
        let mut seen: Vec<CollectionKey> = Vec::new();
        let mut distinct = Vec::new();
        self.for_each(|_, collection, _, _| {
            let key = CollectionKey::of(collection);
            if !seen.contains(&key) {
                seen.push(key);
                distinct.push(Rc::clone(collection));
            }
        });
        distinct
    }

    /// The collection bound under `id`.
    #[must_use]
    pub fn collection_for(&self, id: &BindingId) -> Option<SharedCollection> {
        self.bindings.get(id).map(|binding| Rc::clone(&binding.collection))
    }

    /// Every bind id referencing `collection`, in registry order.
    #[must_use]
    pub fn ids_for(&self, collection: &SharedCollection) -> Vec<BindingId> {
        let mut ids = Vec::new();
        self.for_each(|id, bound, _, _| {
            if same_collection(bound, collection) {
                ids.push(id.clone());
            }
        });
        ids
    }

    /// Collection-keyed map of every bind id.
    #[must_use]
    pub fn ids_by_collection(&self) -> IndexMap<CollectionKey, Vec<BindingId>> {
        let mut map: IndexMap<CollectionKey, Vec<BindingId>> = IndexMap::new();
        self.for_each(|id, collection, _, _| {
            map.entry(CollectionKey::of(collection))
                .or_default()
                .push(id.clone());
        });
        map
    }

    /// Render configuration stored for `id`.
    #[must_use]
    pub fn render_config(&self, id: &BindingId) -> Option<&RenderConfig> {
        self.bindings.get(id).map(Binding::render_config)
    }

    /// Options stored for `id`.
    #[must_use]
    pub fn options(&self, id: &BindingId) -> Option<&BindingOptions> {
        self.bindings.get(id).map(Binding::options)
    }

    /// Render configurations of every binding referencing `collection`.
    #[must_use]
    pub fn render_configs_for(&self, collection: &SharedCollection) -> Vec<RenderConfig> {
        let mut configs = Vec::new();
        self.for_each(|_, bound, config, _| {
            if same_collection(bound, collection) {
                configs.push(config.clone());
            }
        });
        configs
    }

    /// Options of every binding referencing `collection`.
    #[must_use]
    pub fn options_for(&self, collection: &SharedCollection) -> Vec<BindingOptions> {
        let mut all = Vec::new();
        self.for_each(|_, bound, _, options| {
            if same_collection(bound, collection) {
                all.push(options.clone());
            }
        });
        all
    }
}
