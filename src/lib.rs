//! chart-bind: collection-binding and event-dispatch coordination for chart
//! views.
//!
//! One coordinator per view tracks which observable collections are attached,
//! under which identifiers and per-binding configuration, and decides which
//! data-change notifications reach the view's render path. Redraws can be
//! suspended view-wide while bookkeeping continues, and individual bindings
//! can be hidden without detaching them.

pub mod api;
pub mod core;
pub mod error;
pub mod telemetry;

pub use api::{BindingCoordinator, BindingHost, BindingOptions, BindingSelector};
pub use error::{BindError, BindResult};
