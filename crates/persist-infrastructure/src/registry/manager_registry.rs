//! Manager registry
//!
//! Maps symbolic connection and manager names to lazily created services and
//! finds the manager responsible for a class.

use std::any::Any;
use std::sync::Arc;

use persist_domain::error::{Error, Result};
use persist_domain::ports::{AliasResolver, ObjectManager, ReflectionService, ServiceContainer};
use persist_domain::value_objects::{fqcn_from_alias, split_alias};
use tracing::debug;

use crate::config::{RegistryConfig, ServiceBinding};
use crate::mapping::{NamespaceAliases, ensure_class_exists};

/// Type-erased connection handle
pub type Connection = Arc<dyn Any + Send + Sync>;

/// Container handing out object managers
pub type ManagerContainer = Arc<dyn ServiceContainer<dyn ObjectManager>>;

/// Container handing out connections
pub type ConnectionContainer = Arc<dyn ServiceContainer<dyn Any + Send + Sync>>;

/// Registry of connections and object managers
pub struct ManagerRegistry {
    name: String,
    connections: Vec<ServiceBinding>,
    managers: Vec<ServiceBinding>,
    default_connection: String,
    default_manager: String,
    proxy_interface: String,
    aliases: Arc<dyn AliasResolver>,
    reflection: Arc<dyn ReflectionService>,
    manager_services: ManagerContainer,
    connection_services: Option<ConnectionContainer>,
}

impl ManagerRegistry {
    /// Build a registry from configuration.
    ///
    /// Namespace aliases come from `config.aliases` unless replaced with
    /// [`ManagerRegistry::with_aliases`].
    pub fn new(
        config: &RegistryConfig,
        manager_services: ManagerContainer,
        reflection: Arc<dyn ReflectionService>,
    ) -> Self {
        Self {
            name: config.name.clone(),
            connections: config.connections.clone(),
            managers: config.managers.clone(),
            default_connection: config.default_connection.clone(),
            default_manager: config.default_manager.clone(),
            proxy_interface: config.proxy_interface.clone(),
            aliases: Arc::new(NamespaceAliases::from_bindings(&config.aliases)),
            reflection,
            manager_services,
            connection_services: None,
        }
    }

    /// Attach the container that creates connections
    pub fn with_connection_container(mut self, connections: ConnectionContainer) -> Self {
        self.connection_services = Some(connections);
        self
    }

    /// Replace the alias resolver
    pub fn with_aliases(mut self, aliases: Arc<dyn AliasResolver>) -> Self {
        self.aliases = aliases;
        self
    }

    /// Registry name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name of the default connection
    pub fn default_connection_name(&self) -> &str {
        &self.default_connection
    }

    /// Name of the default manager
    pub fn default_manager_name(&self) -> &str {
        &self.default_manager
    }

    /// Marker interface implemented by proxies
    pub fn proxy_interface(&self) -> &str {
        &self.proxy_interface
    }

    /// Registered connection names, in declaration order
    pub fn connection_names(&self) -> Vec<&str> {
        self.connections.iter().map(|b| b.name.as_str()).collect()
    }

    /// Registered manager names, in declaration order
    pub fn manager_names(&self) -> Vec<&str> {
        self.managers.iter().map(|b| b.name.as_str()).collect()
    }

    /// Connection bound to `name`, or the default connection
    pub fn connection(&self, name: Option<&str>) -> Result<Connection> {
        let name = name.unwrap_or(&self.default_connection);
        let binding = find_binding(&self.connections, name)
            .ok_or_else(|| Error::connection_not_found(&self.name, name))?;
        self.connection_container()?.get_service(&binding.service)
    }

    /// Every connection, keyed by name
    pub fn connections(&self) -> Result<Vec<(String, Connection)>> {
        let container = self.connection_container()?;
        self.connections
            .iter()
            .map(|b| Ok((b.name.clone(), container.get_service(&b.service)?)))
            .collect()
    }

    /// Manager bound to `name`, or the default manager
    pub fn manager(&self, name: Option<&str>) -> Result<Arc<dyn ObjectManager>> {
        let binding = self.manager_binding(name)?;
        self.manager_services.get_service(&binding.service)
    }

    /// Every manager, keyed by name
    pub fn managers(&self) -> Result<Vec<(String, Arc<dyn ObjectManager>)>> {
        self.managers
            .iter()
            .map(|b| Ok((b.name.clone(), self.manager_services.get_service(&b.service)?)))
            .collect()
    }

    /// Drop the instance bound to `name` (or the default manager) and return
    /// a freshly created one
    pub fn reset_manager(&self, name: Option<&str>) -> Result<Arc<dyn ObjectManager>> {
        let binding = self.manager_binding(name)?;
        self.manager_services.reset_service(&binding.service);
        debug!(registry = %self.name, manager = %binding.name, "Manager reset");
        self.manager_services.get_service(&binding.service)
    }

    /// Namespace registered for `alias`
    pub fn alias_namespace(&self, alias: &str) -> Result<String> {
        self.aliases.namespace_for(alias)
    }

    /// Manager owning `class_name`, if any.
    ///
    /// Alias-prefixed names are expanded first and the class must exist.
    /// Proxies are looked up through their parent class. Interfaces, the
    /// proxy marker itself and proxies without a parent class have no
    /// manager. Managers are asked in declaration order and the first
    /// one that maps the class wins; `Ok(None)` means no manager maps it.
    pub fn manager_for_class(&self, class_name: &str) -> Result<Option<Arc<dyn ObjectManager>>> {
        let mut fqcn = match split_alias(class_name) {
            Some((alias, rest)) => fqcn_from_alias(&self.aliases.namespace_for(alias)?, rest),
            None => class_name.to_string(),
        };
        ensure_class_exists(&fqcn, self.reflection.as_ref())?;

        if fqcn == self.proxy_interface || self.reflection.is_interface(&fqcn) {
            return Ok(None);
        }

        if self
            .reflection
            .implements_interface(&fqcn, &self.proxy_interface)
        {
            match self.reflection.parent_class(&fqcn)? {
                Some(parent) => fqcn = parent,
                None => return Ok(None),
            }
        }

        for binding in &self.managers {
            let manager = self.manager_services.get_service(&binding.service)?;
            if !manager.metadata_factory().is_transient(&fqcn)? {
                debug!(class = %fqcn, manager = %binding.name, "Manager resolved for class");
                return Ok(Some(manager));
            }
        }

        debug!(class = %fqcn, "No manager maps class");
        Ok(None)
    }

    fn manager_binding(&self, name: Option<&str>) -> Result<&ServiceBinding> {
        let name = name.unwrap_or(&self.default_manager);
        find_binding(&self.managers, name).ok_or_else(|| Error::manager_not_found(&self.name, name))
    }

    fn connection_container(&self) -> Result<&ConnectionContainer> {
        self.connection_services.as_ref().ok_or_else(|| {
            Error::internal(format!(
                "{} registry has no connection container",
                self.name
            ))
        })
    }
}

fn find_binding<'a>(bindings: &'a [ServiceBinding], name: &str) -> Option<&'a ServiceBinding> {
    bindings.iter().find(|b| b.name == name)
}

impl std::fmt::Debug for ManagerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManagerRegistry")
            .field("name", &self.name)
            .field("connections", &self.connections)
            .field("managers", &self.managers)
            .field("default_connection", &self.default_connection)
            .field("default_manager", &self.default_manager)
            .field("proxy_interface", &self.proxy_interface)
            .finish_non_exhaustive()
    }
}
