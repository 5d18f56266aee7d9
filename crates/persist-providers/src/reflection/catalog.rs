//! Declarative reflection service
//!
//! Rust has no runtime class reflection, so the set of known classes, their
//! parents and the interfaces they implement is declared up front.

use std::collections::{HashMap, HashSet};

use persist_domain::error::{Error, Result};
use persist_domain::ports::ReflectionService;

/// A class or interface known to the catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassDeclaration {
    /// Fully-qualified name
    pub name: String,
    /// Direct parent (for interfaces: the extended interface)
    pub parent: Option<String>,
    /// Interfaces implemented directly
    pub interfaces: Vec<String>,
    /// Whether this declares an interface
    pub is_interface: bool,
}

impl ClassDeclaration {
    /// Declare a class without a parent
    pub fn class<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            parent: None,
            interfaces: Vec::new(),
            is_interface: false,
        }
    }

    /// Declare an interface
    pub fn interface<S: Into<String>>(name: S) -> Self {
        Self {
            is_interface: true,
            ..Self::class(name)
        }
    }

    /// Set the direct parent
    pub fn extends<S: Into<String>>(mut self, parent: S) -> Self {
        self.parent = Some(parent.into());
        self
    }

    /// Add an implemented interface
    pub fn implements<S: Into<String>>(mut self, interface: S) -> Self {
        self.interfaces.push(interface.into());
        self
    }
}

/// Reflection service backed by a table of declared classes
///
/// # Example
///
/// ```
/// use persist_domain::ports::ReflectionService;
/// use persist_providers::reflection::{ClassCatalog, ClassDeclaration};
///
/// let catalog = ClassCatalog::new()
///     .with(ClassDeclaration::class("App\\RootEntity"))
///     .with(ClassDeclaration::class("App\\ChildEntity").extends("App\\RootEntity"));
///
/// assert_eq!(
///     catalog.parent_classes("App\\ChildEntity").unwrap(),
///     vec!["App\\RootEntity".to_string()]
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct ClassCatalog {
    classes: HashMap<String, ClassDeclaration>,
}

impl ClassCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a declaration, builder style
    pub fn with(mut self, declaration: ClassDeclaration) -> Self {
        self.declare(declaration);
        self
    }

    /// Add or replace a declaration
    pub fn declare(&mut self, declaration: ClassDeclaration) {
        self.classes.insert(declaration.name.clone(), declaration);
    }

    /// Look up a declaration
    pub fn declaration(&self, class_name: &str) -> Option<&ClassDeclaration> {
        self.classes.get(class_name)
    }

    /// Number of declared classes and interfaces
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Whether nothing has been declared
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    fn lineage(&self, class_name: &str) -> Vec<&ClassDeclaration> {
        let mut chain = Vec::new();
        let mut seen = HashSet::new();
        let mut current = self.classes.get(class_name);
        while let Some(declaration) = current {
            if !seen.insert(declaration.name.as_str()) {
                break;
            }
            chain.push(declaration);
            current = declaration
                .parent
                .as_deref()
                .and_then(|parent| self.classes.get(parent));
        }
        chain
    }
}

impl ReflectionService for ClassCatalog {
    fn class_exists(&self, class_name: &str) -> bool {
        self.classes.contains_key(class_name)
    }

    fn parent_classes(&self, class_name: &str) -> Result<Vec<String>> {
        let declaration = self
            .classes
            .get(class_name)
            .ok_or_else(|| Error::class_not_found(class_name))?;

        let mut parents = Vec::new();
        let mut seen = HashSet::from([declaration.name.as_str()]);
        let mut next = declaration.parent.as_deref();
        while let Some(parent) = next {
            if !seen.insert(parent) {
                return Err(Error::mapping(format!(
                    "Inheritance cycle detected at class '{parent}'"
                )));
            }
            parents.push(parent.to_string());
            next = self
                .classes
                .get(parent)
                .and_then(|declaration| declaration.parent.as_deref());
        }
        Ok(parents)
    }

    fn is_interface(&self, class_name: &str) -> bool {
        self.classes
            .get(class_name)
            .is_some_and(|declaration| declaration.is_interface)
    }

    fn implements_interface(&self, class_name: &str, interface: &str) -> bool {
        let mut pending: Vec<&str> = self
            .lineage(class_name)
            .into_iter()
            .flat_map(|declaration| declaration.interfaces.iter().map(String::as_str))
            .collect();
        let mut seen = HashSet::new();

        while let Some(candidate) = pending.pop() {
            if candidate == interface {
                return true;
            }
            if !seen.insert(candidate) {
                continue;
            }
            // Interfaces inherit from the interfaces they extend.
            for declaration in self.lineage(candidate) {
                if declaration.name != candidate {
                    pending.push(&declaration.name);
                }
                pending.extend(declaration.interfaces.iter().map(String::as_str));
            }
        }
        false
    }
}
