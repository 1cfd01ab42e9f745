use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Change notification names a bound collection may emit.
///
/// Two vocabularies share this enum. Generic collections emit single-phase
/// mutation events (`set`, `add`, `reset`, ...). Native collections emit the
/// refined post-mutation names (`seted`, `removed`, `reseted`) plus
/// `change:visible`, which allows a view to gate redraws during batch
/// mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollectionEvent {
    Set,
    Add,
    Change,
    Destroy,
    Reset,
    Sort,
    Seted,
    Removed,
    Reseted,
    #[serde(rename = "change:visible")]
    ChangeVisible,
}

impl CollectionEvent {
    /// Wire name of the event.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Set => "set",
            Self::Add => "add",
            Self::Change => "change",
            Self::Destroy => "destroy",
            Self::Reset => "reset",
            Self::Sort => "sort",
            Self::Seted => "seted",
            Self::Removed => "removed",
            Self::Reseted => "reseted",
            Self::ChangeVisible => "change:visible",
        }
    }
}

impl fmt::Display for CollectionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which event vocabulary a collection speaks.
///
/// Resolved once at subscribe time and cached on the subscription record, so
/// unsubscription always walks the same event set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum EventFlavor {
    #[default]
    Generic,
    Native,
}

impl EventFlavor {
    /// The exact event set subscribed for this flavor.
    #[must_use]
    pub const fn events(self) -> &'static [CollectionEvent] {
        match self {
            Self::Generic => &[
                CollectionEvent::Set,
                CollectionEvent::Add,
                CollectionEvent::Change,
                CollectionEvent::Destroy,
                CollectionEvent::Reset,
                CollectionEvent::Sort,
            ],
            Self::Native => &[
                CollectionEvent::Seted,
                CollectionEvent::Removed,
                CollectionEvent::Change,
                CollectionEvent::Destroy,
                CollectionEvent::Reseted,
                CollectionEvent::Sort,
                CollectionEvent::ChangeVisible,
            ],
        }
    }
}

/// An emitted notification together with its original arguments.
///
/// The payload travels through dispatch unchanged; the coordinator never
/// inspects it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventEnvelope {
    pub event: CollectionEvent,
    #[serde(default)]
    pub payload: Value,
}

impl EventEnvelope {
    #[must_use]
    pub fn new(event: CollectionEvent, payload: Value) -> Self {
        Self { event, payload }
    }

    /// Envelope with no arguments.
    #[must_use]
    pub fn bare(event: CollectionEvent) -> Self {
        Self {
            event,
            payload: Value::Null,
        }
    }
}
