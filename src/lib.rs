//! localbind
//!
//! An in-process take on the bound-service pattern: long-lived service
//! endpoints are registered with a [`Host`], clients bind to them by name
//! and receive a [`Binder`] through their connection callbacks, and every
//! lifecycle edge is observable through callbacks, a watchable binding
//! state, and a broadcast event stream. The crate ships one endpoint,
//! [`TimeService`], which answers the current wall-clock time as a
//! formatted string.

// Re-export core components
pub mod binder;
pub mod clock;
pub mod connection;
pub mod errors;
pub mod events;
pub mod host;
pub mod service;
pub mod services;

// Re-export commonly used items
pub use binder::Binder;
pub use clock::{ Clock, FixedClock, SystemClock, TIME_FORMAT };
pub use connection::{ BindingState, ConnectionHandle, ServiceConnection };
pub use errors::Error;
pub use events::{ BindingEvent, Subscription };
pub use host::{ Binding, Host, HostSnapshot, ServiceStatus };
pub use service::Service;
pub use services::TimeService;

#[cfg(test)]
mod tests;
