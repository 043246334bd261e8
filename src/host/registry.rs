//! Service registry
//!
//! Name-keyed bookkeeping behind the host: one entry per registered
//! service holding its factory, the live instance (if any), and the number
//! of bindings currently attached to it. Instances are created on the
//! first bind and destroyed when the count returns to zero.

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::errors::Error;
use crate::host::ServiceStatus;
use crate::service::Service;

/// Boxed constructor for a service instance
pub(crate) type ServiceFactory = Box<dyn (Fn() -> ServiceInstance) + Send + Sync>;

/// A live service instance with both of the host's views onto it
#[derive(Clone)]
pub(crate) struct ServiceInstance {
    /// Lifecycle view used for the create/destroy hooks
    pub lifecycle: Arc<dyn Service>,

    /// Type-erased view handed out through binders
    pub endpoint: Arc<dyn Any + Send + Sync>,
}

/// Bookkeeping for one registered service
struct ServiceEntry {
    factory: ServiceFactory,
    instance: Option<ServiceInstance>,
    bind_count: usize,
}

/// Registry of named services
pub(crate) struct ServiceRegistry {
    services: HashMap<String, ServiceEntry>,
}

impl ServiceRegistry {
    pub fn new() -> Self {
        Self {
            services: HashMap::new(),
        }
    }

    /// Register a service factory under a name
    pub fn register(&mut self, name: String, factory: ServiceFactory) -> Result<(), Error> {
        if self.services.contains_key(&name) {
            return Err(Error::AlreadyRegistered(name));
        }

        debug!("Registered service {}", name);
        self.services.insert(name, ServiceEntry {
            factory,
            instance: None,
            bind_count: 0,
        });
        Ok(())
    }

    /// Take one binding on a service, creating the instance on first use.
    ///
    /// Returns the instance together with a flag telling the caller whether
    /// this call created it. Creation runs the `on_create` hook before the
    /// instance becomes visible to any other binding.
    pub fn acquire(&mut self, name: &str) -> Result<(ServiceInstance, bool), Error> {
        let entry = self.services
            .get_mut(name)
            .ok_or_else(|| Error::ServiceNotFound(name.to_string()))?;

        let created = entry.instance.is_none();
        let instance = match &entry.instance {
            Some(existing) => existing.clone(),
            None => {
                let instance = (entry.factory)();
                instance.lifecycle.on_create();
                debug!("Created service {}", name);
                entry.instance = Some(instance.clone());
                instance
            }
        };

        entry.bind_count += 1;
        Ok((instance, created))
    }

    /// Drop one binding on a service.
    ///
    /// When the last binding goes away the instance is taken out of the
    /// entry and its `on_destroy` hook runs. Returns true if this call
    /// destroyed the instance.
    pub fn release(&mut self, name: &str) -> bool {
        let Some(entry) = self.services.get_mut(name) else {
            debug!("Release for unknown service {}", name);
            return false;
        };

        if entry.bind_count == 0 {
            debug!("Release for service {} with no bindings", name);
            return false;
        }

        entry.bind_count -= 1;
        if entry.bind_count > 0 {
            return false;
        }

        if let Some(instance) = entry.instance.take() {
            instance.lifecycle.on_destroy();
            debug!("Destroyed service {}", name);
            return true;
        }
        false
    }

    /// Status rows for the host snapshot, sorted by name
    pub fn statuses(&self) -> Vec<ServiceStatus> {
        let mut statuses: Vec<ServiceStatus> = self.services
            .iter()
            .map(|(name, entry)| ServiceStatus {
                name: name.clone(),
                running: entry.instance.is_some(),
                bind_count: entry.bind_count,
            })
            .collect();
        statuses.sort_by(|a, b| a.name.cmp(&b.name));
        statuses
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{ AtomicUsize, Ordering };

    struct Probe {
        created: Arc<AtomicUsize>,
        destroyed: Arc<AtomicUsize>,
    }

    impl Service for Probe {
        fn on_create(&self) {
            self.created.fetch_add(1, Ordering::SeqCst);
        }

        fn on_destroy(&self) {
            self.destroyed.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn probe_factory(
        created: Arc<AtomicUsize>,
        destroyed: Arc<AtomicUsize>
    ) -> ServiceFactory {
        Box::new(move || {
            let service = Arc::new(Probe {
                created: created.clone(),
                destroyed: destroyed.clone(),
            });
            ServiceInstance {
                lifecycle: service.clone(),
                endpoint: service,
            }
        })
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let mut registry = ServiceRegistry::new();
        let created = Arc::new(AtomicUsize::new(0));
        let destroyed = Arc::new(AtomicUsize::new(0));

        registry
            .register("probe".to_string(), probe_factory(created.clone(), destroyed.clone()))
            .unwrap();
        let err = registry
            .register("probe".to_string(), probe_factory(created, destroyed))
            .unwrap_err();

        assert!(matches!(err, Error::AlreadyRegistered(name) if name == "probe"));
    }

    #[test]
    fn acquire_of_unknown_service_is_rejected() {
        let mut registry = ServiceRegistry::new();

        let result = registry.acquire("missing");
        assert!(matches!(result, Err(Error::ServiceNotFound(name)) if name == "missing"));
    }

    #[test]
    fn instance_is_created_once_and_destroyed_at_zero() {
        let mut registry = ServiceRegistry::new();
        let created = Arc::new(AtomicUsize::new(0));
        let destroyed = Arc::new(AtomicUsize::new(0));
        registry
            .register("probe".to_string(), probe_factory(created.clone(), destroyed.clone()))
            .unwrap();

        let (first, was_created) = registry.acquire("probe").unwrap();
        assert!(was_created);
        let (second, was_created) = registry.acquire("probe").unwrap();
        assert!(!was_created);
        assert!(Arc::ptr_eq(&first.lifecycle, &second.lifecycle));
        assert_eq!(created.load(Ordering::SeqCst), 1);

        assert!(!registry.release("probe"));
        assert_eq!(destroyed.load(Ordering::SeqCst), 0);

        assert!(registry.release("probe"));
        assert_eq!(destroyed.load(Ordering::SeqCst), 1);

        // A fresh bind after teardown builds a new instance
        let (third, was_created) = registry.acquire("probe").unwrap();
        assert!(was_created);
        assert!(!Arc::ptr_eq(&first.lifecycle, &third.lifecycle));
        assert_eq!(created.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn statuses_are_sorted_and_counted() {
        let mut registry = ServiceRegistry::new();
        let created = Arc::new(AtomicUsize::new(0));
        let destroyed = Arc::new(AtomicUsize::new(0));
        registry
            .register("zulu".to_string(), probe_factory(created.clone(), destroyed.clone()))
            .unwrap();
        registry
            .register("alpha".to_string(), probe_factory(created, destroyed))
            .unwrap();

        registry.acquire("zulu").unwrap();

        let statuses = registry.statuses();
        assert_eq!(statuses.len(), 2);
        assert_eq!(statuses[0].name, "alpha");
        assert!(!statuses[0].running);
        assert_eq!(statuses[0].bind_count, 0);
        assert_eq!(statuses[1].name, "zulu");
        assert!(statuses[1].running);
        assert_eq!(statuses[1].bind_count, 1);
    }
}
