//! Collaborator contracts: the event vocabulary, the observable-collection
//! capability set and a reference native collection.

pub mod collection;
pub mod events;
pub mod series;

pub use collection::{
    CollectionKey, EventListener, ListenerSet, ObservableCollection, SharedCollection,
    same_collection,
};
pub use events::{CollectionEvent, EventEnvelope, EventFlavor};
pub use series::SeriesCollection;
