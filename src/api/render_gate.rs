use std::cell::Cell;
use std::rc::Rc;

use tracing::debug;

/// Cooperative redraw gate shared between a coordinator and its view.
///
/// The gate is checked at the top of the view's render entry point, not
/// inside the dispatcher, so a suspended view still updates its registry and
/// still runs non-render side effects attached to events.
///
/// The flag is a single boolean with no nesting semantics: suspending twice
/// and resuming once still fully re-enables rendering.
#[derive(Debug, Clone, Default)]
pub struct RenderGate {
    suspended: Rc<Cell<bool>>,
}

impl RenderGate {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_suspended(&self, suspended: bool) {
        if self.suspended.replace(suspended) != suspended {
            debug!(suspended, "render gate toggled");
        }
    }

    #[must_use]
    pub fn is_suspended(&self) -> bool {
        self.suspended.get()
    }

    /// Whether a render pass may proceed.
    #[must_use]
    pub fn permits_render(&self) -> bool {
        !self.suspended.get()
    }
}

#[cfg(test)]
mod tests {
    use super::RenderGate;

    #[test]
    fn gate_starts_open() {
        let gate = RenderGate::new();
        assert!(gate.permits_render());
        assert!(!gate.is_suspended());
    }

    #[test]
    fn clones_share_the_same_flag() {
        let gate = RenderGate::new();
        let handle = gate.clone();
        gate.set_suspended(true);
        assert!(handle.is_suspended());
        handle.set_suspended(false);
        assert!(gate.permits_render());
    }

    #[test]
    fn suspension_has_no_nesting_semantics() {
        let gate = RenderGate::new();
        gate.set_suspended(true);
        gate.set_suspended(true);
        gate.set_suspended(false);
        assert!(gate.permits_render());
    }
}
