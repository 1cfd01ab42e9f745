use std::cell::{Cell, RefCell};
use std::cmp::Ordering;

use serde_json::{Value, json};
use tracing::debug;

use super::{
    CollectionEvent, EventEnvelope, EventFlavor, EventListener, ListenerSet, ObservableCollection,
};

/// Reference native-flavor collection: a small JSON row store emitting the
/// refined post-mutation vocabulary (`seted`, `removed`, `reseted`, ...).
///
/// Mutating methods take `&self` so the collection can live behind a shared
/// handle; row access and listener bookkeeping use interior mutability. Row
/// borrows are released before any event is emitted, so listeners are free to
/// read the collection back.
pub struct SeriesCollection {
    rows: RefCell<Vec<Value>>,
    visible: Cell<bool>,
    listeners: ListenerSet,
}

impl Default for SeriesCollection {
    fn default() -> Self {
        Self {
            rows: RefCell::new(Vec::new()),
            visible: Cell::new(true),
            listeners: ListenerSet::new(),
        }
    }
}

impl SeriesCollection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_rows(rows: Vec<Value>) -> Self {
        Self {
            rows: RefCell::new(rows),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.borrow().is_empty()
    }

    #[must_use]
    pub fn rows(&self) -> Vec<Value> {
        self.rows.borrow().clone()
    }

    #[must_use]
    pub fn row(&self, index: usize) -> Option<Value> {
        self.rows.borrow().get(index).cloned()
    }

    /// Appends a row; emits `seted`.
    pub fn push_row(&self, row: Value) {
        let index = {
            let mut rows = self.rows.borrow_mut();
            rows.push(row.clone());
            rows.len() - 1
        };
        self.emit(CollectionEvent::Seted, json!({ "index": index, "row": row }));
    }

    /// Writes `row` at `index`, appending when the index is past the end;
    /// emits `seted`.
    pub fn set_row(&self, index: usize, row: Value) {
        let index = {
            let mut rows = self.rows.borrow_mut();
            if index < rows.len() {
                rows[index] = row.clone();
                index
            } else {
                rows.push(row.clone());
                rows.len() - 1
            }
        };
        self.emit(CollectionEvent::Seted, json!({ "index": index, "row": row }));
    }

    /// Replaces an existing row in place; emits `change`. Returns `false`
    /// when the index is out of range.
    pub fn update_row(&self, index: usize, row: Value) -> bool {
        {
            let mut rows = self.rows.borrow_mut();
            let Some(slot) = rows.get_mut(index) else {
                return false;
            };
            *slot = row.clone();
        }
        self.emit(
            CollectionEvent::Change,
            json!({ "index": index, "row": row }),
        );
        true
    }

    /// Removes and returns the row at `index`; emits `removed`.
    pub fn remove_row(&self, index: usize) -> Option<Value> {
        let removed = {
            let mut rows = self.rows.borrow_mut();
            if index >= rows.len() {
                return None;
            }
            rows.remove(index)
        };
        self.emit(
            CollectionEvent::Removed,
            json!({ "index": index, "row": removed }),
        );
        Some(removed)
    }

    /// Replaces the whole row set; emits `reseted`.
    pub fn replace_rows(&self, rows: Vec<Value>) {
        let count = rows.len();
        *self.rows.borrow_mut() = rows;
        debug!(count, "series rows replaced");
        self.emit(CollectionEvent::Reseted, json!({ "count": count }));
    }

    /// Sorts rows by the given object key; emits `sort`.
    pub fn sort_rows_by_key(&self, key: &str) {
        self.rows
            .borrow_mut()
            .sort_by(|a, b| compare_fields(a.get(key), b.get(key)));
        self.emit(CollectionEvent::Sort, json!({ "key": key }));
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible.get()
    }

    /// Flips the series-level visibility flag; emits `change:visible` only
    /// when the value actually changed.
    pub fn set_visible(&self, visible: bool) {
        if self.visible.replace(visible) == visible {
            return;
        }
        self.emit(
            CollectionEvent::ChangeVisible,
            json!({ "visible": visible }),
        );
    }

    /// Drops all rows and emits `destroy`.
    pub fn destroy(&self) {
        self.rows.borrow_mut().clear();
        self.emit(CollectionEvent::Destroy, Value::Null);
    }

    #[must_use]
    pub fn listener_count(&self, event: CollectionEvent) -> usize {
        self.listeners.count(event)
    }

    /// Total listener attachments across all events.
    #[must_use]
    pub fn listener_total(&self) -> usize {
        self.listeners.total()
    }

    fn emit(&self, event: CollectionEvent, payload: Value) {
        self.listeners.emit(&EventEnvelope::new(event, payload));
    }
}

impl ObservableCollection for SeriesCollection {
    fn flavor(&self) -> EventFlavor {
        EventFlavor::Native
    }

    fn subscribe(&self, event: CollectionEvent, listener: &EventListener) {
        self.listeners.attach(event, listener);
    }

    fn unsubscribe(&self, event: CollectionEvent, listener: &EventListener) {
        self.listeners.detach(event, listener);
    }
}

fn compare_fields(left: Option<&Value>, right: Option<&Value>) -> Ordering {
    match (left, right) {
        (Some(Value::Number(a)), Some(Value::Number(b))) => a
            .as_f64()
            .unwrap_or(f64::NAN)
            .total_cmp(&b.as_f64().unwrap_or(f64::NAN)),
        (Some(Value::String(a)), Some(Value::String(b))) => a.cmp(b),
        (Some(a), Some(b)) => a.to_string().cmp(&b.to_string()),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
