use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::core::{CollectionKey, SharedCollection};

use super::dispatch::EventCallbackMap;

/// Prefix used for coordinator-generated binding ids.
pub const BINDING_ID_PREFIX: &str = "bind";

/// Identifier of one binding, unique within its coordinator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BindingId(String);

impl BindingId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub(super) fn generated(counter: u64) -> Self {
        Self(format!("{BINDING_ID_PREFIX}-{counter}"))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BindingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BindingId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for BindingId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Opaque per-binding render configuration.
///
/// Stored as owned JSON, so later mutation of the caller's original can never
/// reach the registry.
pub type RenderConfig = Value;

/// Default render configuration: an empty object.
#[must_use]
pub fn empty_render_config() -> RenderConfig {
    Value::Object(Map::new())
}

/// Per-binding flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BindingOptions {
    /// Caller-supplied binding id; generated when absent.
    pub id: Option<String>,
    /// Skip subscribing to the collection's events entirely.
    pub silence: bool,
    /// Whether the bound series takes part in rendering.
    pub visible: bool,
    /// Trigger one synchronous redraw right after registration completes.
    pub render_after_on: bool,
    /// Event-to-callback routing declared by this binding.
    pub event_callbacks: EventCallbackMap,
}

impl Default for BindingOptions {
    fn default() -> Self {
        Self {
            id: None,
            silence: false,
            visible: true,
            render_after_on: false,
            event_callbacks: EventCallbackMap::default(),
        }
    }
}

impl BindingOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets an explicit binding id.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Binds without subscribing to the collection's events.
    #[must_use]
    pub fn silent(mut self) -> Self {
        self.silence = true;
        self
    }

    /// Starts the binding hidden.
    #[must_use]
    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    /// Requests one synchronous redraw after registration completes.
    #[must_use]
    pub fn render_after_on(mut self) -> Self {
        self.render_after_on = true;
        self
    }

    /// Sets this binding's event-to-callback routing.
    #[must_use]
    pub fn with_event_callbacks(mut self, callbacks: EventCallbackMap) -> Self {
        self.event_callbacks = callbacks;
        self
    }
}

/// One attachment of a collection to the owning view.
pub struct Binding {
    pub(super) collection: SharedCollection,
    pub(super) render_config: RenderConfig,
    pub(super) options: BindingOptions,
}

impl Binding {
    #[must_use]
    pub fn collection(&self) -> &SharedCollection {
        &self.collection
    }

    #[must_use]
    pub fn render_config(&self) -> &RenderConfig {
        &self.render_config
    }

    #[must_use]
    pub fn options(&self) -> &BindingOptions {
        &self.options
    }

    /// Identity of the bound collection instance.
    #[must_use]
    pub fn key(&self) -> CollectionKey {
        CollectionKey::of(&self.collection)
    }
}

/// Which binding(s) an operation targets.
#[derive(Clone)]
pub enum BindingSelector {
    /// One binding by its identifier.
    ById(BindingId),
    /// Every binding referencing a collection instance.
    ByCollection(SharedCollection),
}

impl BindingSelector {
    #[must_use]
    pub fn id(id: impl Into<BindingId>) -> Self {
        Self::ById(id.into())
    }

    #[must_use]
    pub fn collection(collection: &SharedCollection) -> Self {
        Self::ByCollection(Rc::clone(collection))
    }
}

impl From<BindingId> for BindingSelector {
    fn from(id: BindingId) -> Self {
        Self::ById(id)
    }
}

/// Named notifications emitted toward the owning view.
#[derive(Clone)]
pub enum BindingNotice {
    /// First binding for a collection installed its event subscription.
    Installed { collection: SharedCollection },
    /// A binding was stored in the registry.
    Added {
        id: BindingId,
        collection: SharedCollection,
        render_config: RenderConfig,
        options: BindingOptions,
    },
    /// The last binding for a collection released its event subscription.
    Removed { collection: SharedCollection },
    /// A binding left the registry.
    Deleted {
        id: BindingId,
        collection: SharedCollection,
        render_config: RenderConfig,
        options: BindingOptions,
    },
    /// A render pass finished.
    Rendered { payload: Value },
}

impl BindingNotice {
    /// Wire name of the notification.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Installed { .. } => "bindingInstalled",
            Self::Added { .. } => "bindingAdded",
            Self::Removed { .. } => "bindingRemoved",
            Self::Deleted { .. } => "bindingDeleted",
            Self::Rendered { .. } => "rendered",
        }
    }

    /// Binding id carried by the notice, when it has one.
    #[must_use]
    pub fn binding_id(&self) -> Option<&BindingId> {
        match self {
            Self::Added { id, .. } | Self::Deleted { id, .. } => Some(id),
            _ => None,
        }
    }
}

impl fmt::Debug for BindingNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut debug = f.debug_struct(self.name());
        if let Some(id) = self.binding_id() {
            debug.field("id", id);
        }
        match self {
            Self::Installed { collection }
            | Self::Added { collection, .. }
            | Self::Removed { collection }
            | Self::Deleted { collection, .. } => {
                debug.field("collection", &CollectionKey::of(collection));
            }
            Self::Rendered { payload } => {
                debug.field("payload", payload);
            }
        }
        debug.finish()
    }
}
