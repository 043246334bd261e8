//! Binder handles
//!
//! A [`Binder`] is the reference a client receives through its connect
//! callback. It is a cheap clone of the host's own handle to the live
//! service instance; [`Binder::service`] recovers the concrete endpoint
//! type so the client can call it directly.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::errors::Error;

/// Type-erased reference to a live service endpoint.
#[derive(Clone)]
pub struct Binder {
    /// Registry name of the service behind this binder
    service_name: String,

    /// The endpoint instance itself
    endpoint: Arc<dyn Any + Send + Sync>,
}

impl Binder {
    pub(crate) fn new(service_name: String, endpoint: Arc<dyn Any + Send + Sync>) -> Self {
        Self { service_name, endpoint }
    }

    /// Name the service is registered under.
    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    /// Returns the service instance behind this binder.
    ///
    /// The caller names the concrete endpoint type it expects; a wrong
    /// type yields [`Error::TypeMismatch`] rather than a panic.
    pub fn service<S>(&self) -> Result<Arc<S>, Error> where S: Send + Sync + 'static {
        self.endpoint
            .clone()
            .downcast::<S>()
            .map_err(|_| Error::TypeMismatch {
                service: self.service_name.clone(),
                requested: std::any::type_name::<S>(),
            })
    }
}

impl fmt::Debug for Binder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binder").field("service_name", &self.service_name).finish()
    }
}
