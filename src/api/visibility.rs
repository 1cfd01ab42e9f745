use indexmap::IndexMap;
use tracing::debug;

use crate::core::{SharedCollection, same_collection};

use super::binding::{BindingId, BindingSelector};
use super::coordinator::BindingCoordinator;
use super::render_gate::RenderGate;

/// Visibility toggling and redraw suspension.
impl BindingCoordinator {
    /// Flips visibility for the selected binding(s), then requests a redraw.
    ///
    /// Visibility changes are assumed render-affecting, so the redraw request
    /// goes out even when the selector matched nothing; the flip itself is a
    /// no-op for unknown targets.
    pub fn set_visible(&mut self, selector: &BindingSelector, visible: bool) {
        match selector {
            BindingSelector::ById(id) => {
                if let Some(binding) = self.bindings.get_mut(id) {
                    binding.options.visible = visible;
                    debug!(id = %id, visible, "binding visibility changed");
                }
            }
            BindingSelector::ByCollection(collection) => {
                for binding in self.bindings.values_mut() {
                    if same_collection(&binding.collection, collection) {
                        binding.options.visible = visible;
                    }
                }
            }
        }
        self.request_render(None);
    }

    pub fn show(&mut self, selector: &BindingSelector) {
        self.set_visible(selector, true);
    }

    pub fn hide(&mut self, selector: &BindingSelector) {
        self.set_visible(selector, false);
    }

    /// Visibility of one binding; unknown ids read as hidden.
    #[must_use]
    pub fn is_visible(&self, id: &BindingId) -> bool {
        self.bindings
            .get(id)
            .is_some_and(|binding| binding.options.visible)
    }

    /// Per-binding visibility of every binding referencing `collection`.
    #[must_use]
    pub fn collection_visibility(&self, collection: &SharedCollection) -> IndexMap<BindingId, bool> {
        let mut map = IndexMap::new();
        self.for_each(|id, bound, _, options| {
            if same_collection(bound, collection) {
                map.insert(id.clone(), options.visible);
            }
        });
        map
    }

    /// Suspends or resumes redraws. A single flat flag: resuming once fully
    /// re-enables dispatch no matter how many times it was suspended.
    pub fn set_suspended(&self, suspended: bool) {
        self.gate.set_suspended(suspended);
    }

    #[must_use]
    pub fn is_suspended(&self) -> bool {
        self.gate.is_suspended()
    }

    /// Gate handle for the view's render entry point.
    #[must_use]
    pub fn render_gate(&self) -> RenderGate {
        self.gate.clone()
    }
}
