//! Client-side connection surface
//!
//! This module defines the callback interface a client hands to
//! [`Host::bind_service`](crate::host::Host::bind_service) and a ready-made
//! implementation, [`ConnectionHandle`], that keeps the connected flag and
//! endpoint reference in a watchable state record.

pub mod state;

use std::fmt;
use std::sync::Arc;

use tokio::sync::watch;

use crate::binder::Binder;
use crate::errors::Error;

pub use state::{ BindingState, BindingStateChannel };

/// Callbacks a client receives as its binding changes.
///
/// For a given binding the host delivers `on_service_connected` before
/// `bind_service` returns, and `on_service_disconnected` while the binding
/// is released. Callbacks run outside the host's internal locks, so an
/// implementation may call back into the host.
pub trait ServiceConnection: Send + Sync {
    /// Delivered once the host has a live endpoint for the binding.
    fn on_service_connected(&self, binder: Binder);

    /// Delivered when the binding is released and the reference stops
    /// being valid.
    fn on_service_disconnected(&self, service_name: &str);
}

/// Client-side record of a binding: connected flag plus endpoint reference.
///
/// The handle implements [`ServiceConnection`] by updating an internal
/// watch channel, so callers can poll it (`is_bound`, the guarded
/// accessors) or await transitions through [`ConnectionHandle::subscribe`].
/// On disconnect the reference is cleared together with the flag; a
/// disconnected handle never hands out a stale endpoint.
#[derive(Clone, Default)]
pub struct ConnectionHandle {
    state: BindingStateChannel,
}

impl ConnectionHandle {
    /// Create a new, unbound handle
    pub fn new() -> Self {
        Self { state: BindingStateChannel::new() }
    }

    /// Whether the binding is currently live
    pub fn is_bound(&self) -> bool {
        self.state.is_connected()
    }

    /// Returns the binder for the live binding.
    ///
    /// Calling this while the connected flag is false is a caller error
    /// and yields [`Error::NotBound`].
    pub fn binder(&self) -> Result<Binder, Error> {
        let state = self.state.current();
        if !state.connected {
            return Err(Error::NotBound);
        }
        state.binder.ok_or(Error::NotBound)
    }

    /// Returns a typed reference to the live endpoint.
    ///
    /// Combines the [`ConnectionHandle::binder`] guard with the
    /// [`Binder::service`] downcast.
    pub fn service<S>(&self) -> Result<Arc<S>, Error> where S: Send + Sync + 'static {
        self.binder()?.service::<S>()
    }

    /// Get a receiver that observes every state transition
    pub fn subscribe(&self) -> watch::Receiver<BindingState> {
        self.state.receiver()
    }

    /// Get the current state record
    pub fn state(&self) -> BindingState {
        self.state.current()
    }
}

impl ServiceConnection for ConnectionHandle {
    fn on_service_connected(&self, binder: Binder) {
        self.state.update(|state| {
            state.connected = true;
            state.binder = Some(binder);
        });
    }

    fn on_service_disconnected(&self, _service_name: &str) {
        self.state.clear();
    }
}

impl fmt::Debug for ConnectionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionHandle").field("bound", &self.is_bound()).finish()
    }
}
