//! Namespace aliases and class-name resolution
//!
//! Resolution happens in two stages that stay separate:
//! [`expand_class_name`] is a pure string transform (alias or proxy name to
//! fully-qualified name), [`ensure_class_exists`] is the structural check.

use std::collections::HashMap;

use persist_domain::error::{Error, Result};
use persist_domain::ports::{AliasResolver, ReflectionService};
use persist_domain::value_objects::{fqcn_from_alias, real_class_name, split_alias};

use crate::config::AliasBinding;

/// Table of registered namespace aliases
#[derive(Debug, Clone, Default)]
pub struct NamespaceAliases {
    aliases: HashMap<String, String>,
}

impl NamespaceAliases {
    /// Create an empty alias table
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an alias, builder style
    pub fn with<A: Into<String>, N: Into<String>>(mut self, alias: A, namespace: N) -> Self {
        self.register(alias, namespace);
        self
    }

    /// Register or replace an alias
    pub fn register<A: Into<String>, N: Into<String>>(&mut self, alias: A, namespace: N) {
        self.aliases.insert(alias.into(), namespace.into());
    }

    /// Build the table from configured bindings
    pub fn from_bindings(bindings: &[AliasBinding]) -> Self {
        let aliases = bindings
            .iter()
            .map(|b| (b.alias.clone(), b.namespace.clone()))
            .collect();
        Self { aliases }
    }

    /// Number of registered aliases
    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    /// Whether no alias is registered
    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }
}

impl AliasResolver for NamespaceAliases {
    fn namespace_for(&self, alias: &str) -> Result<String> {
        self.aliases
            .get(alias)
            .cloned()
            .ok_or_else(|| Error::unknown_alias(alias))
    }
}

/// Turn a possibly aliased or proxy class name into a fully-qualified name.
///
/// `alias:Foo` becomes `<namespace>\Foo` and `alias:Foo:Bar` becomes
/// `<namespace>\Foo\Bar`. Names without an alias prefix only lose a proxy
/// prefix, if they carry one.
pub fn expand_class_name(class_name: &str, aliases: &dyn AliasResolver) -> Result<String> {
    match split_alias(class_name) {
        Some((alias, rest)) => Ok(fqcn_from_alias(&aliases.namespace_for(alias)?, rest)),
        None => Ok(real_class_name(class_name).to_string()),
    }
}

/// Fail with [`Error::ClassNotFound`] unless `fqcn` names an existing class.
pub fn ensure_class_exists(fqcn: &str, reflection: &dyn ReflectionService) -> Result<()> {
    if reflection.class_exists(fqcn) {
        Ok(())
    } else {
        Err(Error::class_not_found(fqcn))
    }
}

/// Expand `class_name` and verify the result exists.
pub fn resolve_class_name(
    class_name: &str,
    aliases: &dyn AliasResolver,
    reflection: &dyn ReflectionService,
) -> Result<String> {
    let fqcn = expand_class_name(class_name, aliases)?;
    ensure_class_exists(&fqcn, reflection)?;
    Ok(fqcn)
}
