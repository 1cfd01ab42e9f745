//! Binding coordination: the registry, subscription manager, dispatch-policy
//! resolver and visibility/silence control for one owning view.

mod binding;
mod coordinator;
mod dispatch;
mod queries;
mod render_gate;
mod subscriptions;
mod visibility;

pub use binding::{
    BINDING_ID_PREFIX, Binding, BindingId, BindingNotice, BindingOptions, BindingSelector,
    RenderConfig, empty_render_config,
};
pub use coordinator::BindingCoordinator;
pub use dispatch::{BindingHost, DEFAULT_CALLBACK, DispatchTarget, EventCallbackMap};
pub use render_gate::RenderGate;
