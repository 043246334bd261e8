//! Service trait
//!
//! A service is a long-lived endpoint that clients reach through a
//! [`Host`](crate::host::Host). The host instantiates it on the first bind,
//! hands out references to it while bindings exist, and tears it down after
//! the last binding is released.

/// A host-managed service endpoint.
///
/// Implementations expose their operations as ordinary methods; clients
/// obtain a typed reference via [`Binder::service`](crate::binder::Binder::service)
/// and call them directly.
pub trait Service: Send + Sync + 'static {
    /// Called once the host has created the instance, before the first
    /// binder for it is handed out.
    ///
    /// Runs while the host's registry is locked. Hooks must not call back
    /// into the host.
    fn on_create(&self) {}

    /// Called once the host has released the last binding to the instance.
    ///
    /// Runs while the host's registry is locked. Hooks must not call back
    /// into the host. Clients still holding a reference keep the value
    /// alive; this hook marks the end of the instance's hosted lifetime,
    /// not its deallocation.
    fn on_destroy(&self) {}
}
