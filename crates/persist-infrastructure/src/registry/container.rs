//! Lazy service container
//!
//! Creates services on first access through a factory callback and keeps
//! them until reset. Every identifier owns a slot whose lock is held while
//! the service is being created, so concurrent first accesses create one
//! instance and the later callers receive it.

use std::sync::{Arc, Mutex, PoisonError};

use dashmap::DashMap;
use persist_domain::error::Result;
use persist_domain::ports::ServiceContainer;
use tracing::debug;

type ServiceSlot<S> = Arc<Mutex<Option<Arc<S>>>>;
type ServiceFactoryFn<S> = dyn Fn(&str) -> Result<Arc<S>> + Send + Sync;

/// Service container creating each service id at most once until reset
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use persist_domain::ports::ServiceContainer;
/// use persist_infrastructure::registry::LazyServiceContainer;
///
/// let container = LazyServiceContainer::<String>::new(|id| Ok(Arc::new(id.to_uppercase())));
/// let first = container.get_service("default_manager").unwrap();
/// let again = container.get_service("default_manager").unwrap();
/// assert!(Arc::ptr_eq(&first, &again));
/// ```
pub struct LazyServiceContainer<S: ?Sized> {
    factory: Box<ServiceFactoryFn<S>>,
    slots: DashMap<String, ServiceSlot<S>>,
}

impl<S: ?Sized + Send + Sync + 'static> LazyServiceContainer<S> {
    /// Create a container backed by `factory`
    pub fn new<F>(factory: F) -> Self
    where
        F: Fn(&str) -> Result<Arc<S>> + Send + Sync + 'static,
    {
        Self {
            factory: Box::new(factory),
            slots: DashMap::new(),
        }
    }

    /// Whether `id` currently holds a created instance
    pub fn is_initialized(&self, id: &str) -> bool {
        // The shard guard must be released before waiting on the slot.
        let Some(slot) = self.slots.get(id).map(|slot| Arc::clone(slot.value())) else {
            return false;
        };
        slot.lock().unwrap_or_else(PoisonError::into_inner).is_some()
    }

    fn slot(&self, id: &str) -> ServiceSlot<S> {
        Arc::clone(self.slots.entry(id.to_string()).or_default().value())
    }
}

impl<S: ?Sized + Send + Sync + 'static> ServiceContainer<S> for LazyServiceContainer<S> {
    fn get_service(&self, id: &str) -> Result<Arc<S>> {
        let slot = self.slot(id);
        let mut instance = slot.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(service) = instance.as_ref() {
            return Ok(Arc::clone(service));
        }

        let service = (self.factory)(id)?;
        *instance = Some(Arc::clone(&service));
        debug!(service = id, "Service created");
        Ok(service)
    }

    fn reset_service(&self, id: &str) {
        let Some(slot) = self.slots.get(id).map(|slot| Arc::clone(slot.value())) else {
            return;
        };
        if slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .is_some()
        {
            debug!(service = id, "Service reset");
        }
    }
}

impl<S: ?Sized> std::fmt::Debug for LazyServiceContainer<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LazyServiceContainer")
            .field("slots", &self.slots.len())
            .finish()
    }
}
