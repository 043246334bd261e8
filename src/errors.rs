//! Error types
//!
//! This module defines the crate-level error type covering registry
//! lookups, binding preconditions, and binder downcasts. The time-query
//! operation itself has no failure conditions.

use thiserror::Error;
use uuid::Uuid;

/// The main error type for the localbind library
#[derive(Error, Debug)]
pub enum Error {
    /// No service is registered under the requested name
    #[error("Service not found: {0}")]
    ServiceNotFound(String),

    /// A service is already registered under the requested name
    #[error("Service already registered: {0}")]
    AlreadyRegistered(String),

    /// A guarded accessor was used while the connected flag was false
    #[error("Connection is not bound to a service")]
    NotBound,

    /// The binder does not hand out the requested endpoint type
    #[error("Service type mismatch for {service}: endpoint is not a {requested}")]
    TypeMismatch {
        /// Name of the service behind the binder
        service: String,
        /// Type the caller asked the binder for
        requested: &'static str,
    },

    /// The host no longer tracks a binding with this id
    #[error("Unknown binding: {0}")]
    UnknownBinding(Uuid),
}
