//! Static mapping driver
//!
//! Mappings declared in code. Each class lists only the fields and
//! associations it declares itself; inherited mappings are merged by the
//! metadata factory.

use std::collections::BTreeMap;

use persist_domain::error::{Error, Result};
use persist_domain::ports::MappingDriver;
use persist_domain::value_objects::{
    AssociationMapping, ClassMetadata, FieldMapping, MappingKind,
};

/// Declared mapping of one class
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassMapping {
    /// Fully-qualified class name
    pub class_name: String,
    /// Kind of mapping
    pub kind: MappingKind,
    /// Fields declared by the class itself
    pub fields: Vec<FieldMapping>,
    /// Associations declared by the class itself
    pub associations: Vec<AssociationMapping>,
}

impl ClassMapping {
    /// Mapping of an entity
    pub fn entity<S: Into<String>>(class_name: S) -> Self {
        Self::of_kind(class_name, MappingKind::Entity)
    }

    /// Mapping of a mapped superclass
    pub fn mapped_superclass<S: Into<String>>(class_name: S) -> Self {
        Self::of_kind(class_name, MappingKind::MappedSuperclass)
    }

    /// Mapping of an embeddable
    pub fn embeddable<S: Into<String>>(class_name: S) -> Self {
        Self::of_kind(class_name, MappingKind::Embeddable)
    }

    fn of_kind<S: Into<String>>(class_name: S, kind: MappingKind) -> Self {
        Self {
            class_name: class_name.into(),
            kind,
            fields: Vec::new(),
            associations: Vec::new(),
        }
    }

    /// Declare a field
    pub fn field(mut self, field: FieldMapping) -> Self {
        self.fields.push(field);
        self
    }

    /// Declare an association
    pub fn association(mut self, association: AssociationMapping) -> Self {
        self.associations.push(association);
        self
    }
}

/// Mapping driver over mappings declared in code
#[derive(Debug, Clone, Default)]
pub struct StaticMappingDriver {
    mappings: BTreeMap<String, ClassMapping>,
}

impl StaticMappingDriver {
    /// Create a driver without mappings
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a class mapping, builder style
    pub fn with(mut self, mapping: ClassMapping) -> Self {
        self.add_mapping(mapping);
        self
    }

    /// Add or replace a class mapping
    pub fn add_mapping(&mut self, mapping: ClassMapping) {
        self.mappings.insert(mapping.class_name.clone(), mapping);
    }

    /// Declared mapping of `class_name`
    pub fn mapping(&self, class_name: &str) -> Option<&ClassMapping> {
        self.mappings.get(class_name)
    }
}

impl MappingDriver for StaticMappingDriver {
    fn load_metadata_for_class(
        &self,
        class_name: &str,
        metadata: &mut ClassMetadata,
    ) -> Result<()> {
        let mapping = self
            .mappings
            .get(class_name)
            .filter(|mapping| mapping.kind != MappingKind::Transient)
            .ok_or_else(|| Error::metadata_not_found(class_name))?;

        metadata.kind = mapping.kind;
        for field in &mapping.fields {
            metadata.add_field(field.clone())?;
        }
        for association in &mapping.associations {
            metadata.add_association(association.clone())?;
        }
        Ok(())
    }

    fn all_class_names(&self) -> Result<Vec<String>> {
        Ok(self
            .mappings
            .values()
            .filter(|mapping| mapping.kind != MappingKind::Transient)
            .map(|mapping| mapping.class_name.clone())
            .collect())
    }

    fn is_transient(&self, class_name: &str) -> bool {
        self.mappings
            .get(class_name)
            .is_none_or(|mapping| mapping.kind == MappingKind::Transient)
    }
}
