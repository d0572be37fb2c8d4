//! Shared application state for axum handlers.

use std::sync::Arc;

use homeguard_app::ports::AlarmControl;

/// Application state shared across all axum handlers.
///
/// Generic over the gate implementation to avoid dynamic dispatch. `Clone`
/// is implemented manually so `C` itself does not need to be `Clone`.
pub struct AppState<C> {
    /// Arm / disarm surface of the alarm gate.
    pub alarm: Arc<C>,
}

impl<C> Clone for AppState<C> {
    fn clone(&self) -> Self {
        Self {
            alarm: Arc::clone(&self.alarm),
        }
    }
}

impl<C: AlarmControl + 'static> AppState<C> {
    /// Wrap an already shared gate.
    pub fn new(alarm: Arc<C>) -> Self {
        Self { alarm }
    }
}
