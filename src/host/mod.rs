//! Service host
//!
//! The [`Host`] owns the registry of named services and the bookkeeping of
//! live bindings. Binding is keyed by service name: the first bind creates
//! the instance through its registered factory, further binds reuse it,
//! and the last release tears it down. Every edge is published on the
//! host's event channel and, per binding, delivered through the client's
//! [`ServiceConnection`] callbacks.

mod registry;

use std::collections::HashMap;
use std::fmt;
use std::sync::{ Arc, RwLock };

use serde::{ Deserialize, Serialize };
use tokio::sync::broadcast;
use tracing::debug;
use uuid::Uuid;

use crate::binder::Binder;
use crate::connection::ServiceConnection;
use crate::errors::Error;
use crate::events::{ self, BindingEvent, Subscription };
use crate::service::Service;

use registry::{ ServiceInstance, ServiceRegistry };

/// Capacity of the host's lifecycle event channel
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Snapshot row for one registered service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceStatus {
    /// Registry name
    pub name: String,
    /// Whether a live instance currently exists
    pub running: bool,
    /// Number of bindings attached to the instance
    pub bind_count: usize,
}

/// Serializable view of the host's registry, sorted by service name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostSnapshot {
    /// One row per registered service
    pub services: Vec<ServiceStatus>,
}

/// Record of one live binding
struct BindingRecord {
    service: String,
    connection: Arc<dyn ServiceConnection>,
}

/// State shared between host clones
struct HostState {
    registry: RwLock<ServiceRegistry>,
    bindings: RwLock<HashMap<Uuid, BindingRecord>>,
    events: broadcast::Sender<BindingEvent>,
}

/// In-process host for bound services
///
/// Cloning a host is cheap and yields another handle onto the same
/// registry and bindings.
#[derive(Clone)]
pub struct Host {
    state: Arc<HostState>,
}

impl Host {
    /// Create a new host with no registered services
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            state: Arc::new(HostState {
                registry: RwLock::new(ServiceRegistry::new()),
                bindings: RwLock::new(HashMap::new()),
                events,
            }),
        }
    }

    /// Register a service factory under a name.
    ///
    /// The factory runs on the first bind to the name; the host keeps the
    /// resulting instance alive until the last binding is released.
    pub fn register_service<S, F>(&self, name: impl Into<String>, factory: F) -> Result<(), Error>
        where S: Service, F: (Fn() -> S) + Send + Sync + 'static
    {
        let factory = Box::new(move || {
            let service = Arc::new(factory());
            ServiceInstance {
                lifecycle: service.clone(),
                endpoint: service,
            }
        });

        let mut registry = self.state.registry.write().unwrap();
        registry.register(name.into(), factory)
    }

    /// Bind a connection to a named service.
    ///
    /// Delivers `on_service_connected` with a [`Binder`] for the live
    /// instance before returning. The returned [`Binding`] guard releases
    /// the binding when dropped or through [`Binding::unbind`].
    pub fn bind_service(
        &self,
        name: &str,
        connection: Arc<dyn ServiceConnection>
    ) -> Result<Binding, Error> {
        // Instance creation and bind counting happen under the registry
        // lock; callbacks run after it is released so a connection may
        // re-enter the host.
        let (instance, created) = {
            let mut registry = self.state.registry.write().unwrap();
            registry.acquire(name)?
        };

        let id = Uuid::new_v4();
        {
            let mut bindings = self.state.bindings.write().unwrap();
            bindings.insert(id, BindingRecord {
                service: name.to_string(),
                connection: connection.clone(),
            });
        }

        if created {
            self.publish(BindingEvent::ServiceCreated { service: name.to_string() });
        }

        let binder = Binder::new(name.to_string(), instance.endpoint.clone());
        connection.on_service_connected(binder);
        debug!("Binding {} connected to {}", id, name);
        self.publish(BindingEvent::Connected {
            service: name.to_string(),
            binding: id,
        });

        Ok(Binding {
            id,
            service: name.to_string(),
            host: self.clone(),
            released: false,
        })
    }

    /// Get a receiver for host lifecycle events
    pub fn events(&self) -> broadcast::Receiver<BindingEvent> {
        self.state.events.subscribe()
    }

    /// Get an owned subscription to host lifecycle events
    pub fn subscribe_events(&self) -> Subscription<BindingEvent> {
        events::from_broadcast(self.events(), format!("events-{}", Uuid::new_v4()))
    }

    /// Serializable view of the registry for diagnostics
    pub fn snapshot(&self) -> HostSnapshot {
        let registry = self.state.registry.read().unwrap();
        HostSnapshot { services: registry.statuses() }
    }

    /// Release one binding: disconnect its client, then drop its count.
    fn release_binding(&self, id: Uuid) -> Result<(), Error> {
        let record = {
            let mut bindings = self.state.bindings.write().unwrap();
            bindings.remove(&id).ok_or(Error::UnknownBinding(id))?
        };

        record.connection.on_service_disconnected(&record.service);
        debug!("Binding {} disconnected from {}", id, record.service);
        self.publish(BindingEvent::Disconnected {
            service: record.service.clone(),
            binding: id,
        });

        let destroyed = {
            let mut registry = self.state.registry.write().unwrap();
            registry.release(&record.service)
        };
        if destroyed {
            self.publish(BindingEvent::ServiceDestroyed { service: record.service });
        }

        Ok(())
    }

    fn publish(&self, event: BindingEvent) {
        // A send error just means nobody is subscribed right now
        let _ = self.state.events.send(event);
    }
}

impl Default for Host {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Host {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Host").field("snapshot", &self.snapshot()).finish()
    }
}

/// Guard for one live binding
///
/// Dropping the guard releases the binding; [`Binding::unbind`] does the
/// same explicitly. Either way the client's disconnect callback fires and
/// the service's bind count drops.
pub struct Binding {
    id: Uuid,
    service: String,
    host: Host,
    released: bool,
}

impl Binding {
    /// Id assigned to this binding by the host
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Name of the bound service
    pub fn service_name(&self) -> &str {
        &self.service
    }

    /// Release the binding explicitly
    pub fn unbind(mut self) -> Result<(), Error> {
        self.release()
    }

    fn release(&mut self) -> Result<(), Error> {
        if self.released {
            return Ok(());
        }
        self.released = true;
        self.host.release_binding(self.id)
    }
}

impl Drop for Binding {
    fn drop(&mut self) {
        if let Err(e) = self.release() {
            debug!("Binding {} release on drop: {}", self.id, e);
        }
    }
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f
            .debug_struct("Binding")
            .field("id", &self.id)
            .field("service", &self.service)
            .field("released", &self.released)
            .finish()
    }
}
