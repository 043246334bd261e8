// Binding state module
//
// This module provides a shared state mechanism for connection handles
// to track their binding status without lock contention.

use tokio::sync::watch;
use tracing::debug;

use crate::binder::Binder;

/// Represents the client-side record of a binding
#[derive(Clone, Debug, Default)]
pub struct BindingState {
    /// Whether the connect callback has fired and the binding is live
    pub connected: bool,
    /// Reference to the endpoint, present only while `connected` is true
    pub binder: Option<Binder>,
}

impl BindingState {
    /// Create a new disconnected state
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if the binding is live
    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Clear the state back to disconnected
    ///
    /// The binder reference is cleared together with the flag, so a
    /// disconnected state never carries a stale endpoint reference.
    pub fn clear(&mut self) {
        self.connected = false;
        self.binder = None;
    }
}

/// Channel for watching and updating binding state
pub struct BindingStateChannel {
    /// Sender for updating the state
    tx: watch::Sender<BindingState>,
    /// Receiver for watching the state
    rx: watch::Receiver<BindingState>,
}

impl BindingStateChannel {
    /// Create a new binding state channel
    pub fn new() -> Self {
        let (tx, rx) = watch::channel(BindingState::default());
        Self { tx, rx }
    }

    /// Get a receiver that can be cloned and shared
    pub fn receiver(&self) -> watch::Receiver<BindingState> {
        self.rx.clone()
    }

    /// Update the state with a modifier function
    pub fn update<F>(&self, f: F) where F: FnOnce(&mut BindingState) {
        let mut state = self.tx.borrow().clone();
        f(&mut state);
        if let Err(e) = self.tx.send(state) {
            debug!("Failed to update binding state: {}", e);
        }
    }

    /// Get the current state
    pub fn current(&self) -> BindingState {
        self.tx.borrow().clone()
    }

    /// Check if the binding is live
    pub fn is_connected(&self) -> bool {
        self.tx.borrow().is_connected()
    }

    /// Clear the state back to disconnected
    pub fn clear(&self) {
        self.update(|state| state.clear());
    }
}

impl Default for BindingStateChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for BindingStateChannel {
    fn clone(&self) -> Self {
        // Create a new receiver from the same sender
        // This ensures all receivers get updates from the same source
        Self {
            tx: self.tx.clone(),
            rx: self.tx.subscribe(),
        }
    }
}
