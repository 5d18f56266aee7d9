//! Class mapping metadata
//!
//! The resolved description of how a class maps to storage. Instances are
//! built by the metadata factory, populated by a mapping driver and shared
//! afterwards behind an `Arc`.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// What kind of mapping a class carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MappingKind {
    /// A mapped entity with its own identity
    #[default]
    Entity,
    /// A mapped ancestor that contributes fields but is never persisted itself
    MappedSuperclass,
    /// A value object embedded into entities
    Embeddable,
    /// No mapping of its own
    Transient,
}

/// Lifecycle of the reflection data attached to a metadata instance
///
/// Reflection state is process-local and never serialized; metadata read
/// back from an external cache starts `Cold` and must be woken up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReflectionState {
    /// Freshly constructed or deserialized
    #[default]
    Cold,
    /// Reflection initialized, mapping not yet finalized
    Initialized,
    /// Reflection restored after the mapping was completed
    Awake,
}

/// Mapping of a single persistent field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMapping {
    /// Property name on the class
    pub name: String,
    /// Storage column name
    pub column: String,
    /// Storage type name
    #[serde(rename = "type")]
    pub field_type: String,
    /// Whether the column accepts null
    #[serde(default)]
    pub nullable: bool,
    /// Whether the field is part of the identifier
    #[serde(default)]
    pub id: bool,
    /// Class that declared the field, when inherited
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inherited: Option<String>,
}

impl FieldMapping {
    /// Create a field mapping whose column matches the property name
    pub fn new<N: Into<String>, T: Into<String>>(name: N, field_type: T) -> Self {
        let name = name.into();
        Self {
            column: name.clone(),
            name,
            field_type: field_type.into(),
            nullable: false,
            id: false,
            inherited: None,
        }
    }

    /// Mark this field as part of the identifier
    pub fn identifier(mut self) -> Self {
        self.id = true;
        self
    }

    /// Store the field under a different column name
    pub fn with_column<S: Into<String>>(mut self, column: S) -> Self {
        self.column = column.into();
        self
    }

    /// Allow null values
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }
}

/// Cardinality of an association
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssociationType {
    /// Single-valued, unique on both sides
    OneToOne,
    /// Single-valued, many owners
    ManyToOne,
    /// Collection-valued inverse side
    OneToMany,
    /// Collection-valued on both sides
    ManyToMany,
}

/// Mapping of a relationship to another class
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssociationMapping {
    /// Property name on the class
    pub name: String,
    /// Fully-qualified name of the associated class
    pub target_class: String,
    /// Cardinality
    #[serde(rename = "type")]
    pub association_type: AssociationType,
    /// Owning-side property on the target, for inverse sides
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mapped_by: Option<String>,
    /// Class that declared the association, when inherited
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inherited: Option<String>,
}

impl AssociationMapping {
    /// Create an owning-side association
    pub fn new<N: Into<String>, T: Into<String>>(
        name: N,
        target_class: T,
        association_type: AssociationType,
    ) -> Self {
        Self {
            name: name.into(),
            target_class: target_class.into(),
            association_type,
            mapped_by: None,
            inherited: None,
        }
    }

    /// Make this the inverse side of `property` on the target
    pub fn mapped_by<S: Into<String>>(mut self, property: S) -> Self {
        self.mapped_by = Some(property.into());
        self
    }
}

/// Per-class mapping descriptor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassMetadata {
    /// Fully-qualified class name
    pub name: String,
    /// Kind of mapping
    #[serde(default)]
    pub kind: MappingKind,
    /// Most general mapped entity in the hierarchy
    pub root_entity_name: String,
    /// Mapped entity ancestors, nearest first
    #[serde(default)]
    pub parent_classes: Vec<String>,
    /// Persistent fields, inherited ones included
    #[serde(default)]
    pub fields: Vec<FieldMapping>,
    /// Associations, inherited ones included
    #[serde(default)]
    pub associations: Vec<AssociationMapping>,
    #[serde(skip)]
    reflection: ReflectionState,
}

impl ClassMetadata {
    /// Create empty entity metadata for `name`
    pub fn new<S: Into<String>>(name: S) -> Self {
        let name = name.into();
        Self {
            root_entity_name: name.clone(),
            name,
            kind: MappingKind::Entity,
            parent_classes: Vec::new(),
            fields: Vec::new(),
            associations: Vec::new(),
            reflection: ReflectionState::Cold,
        }
    }

    /// Create metadata with a specific mapping kind
    pub fn with_kind<S: Into<String>>(name: S, kind: MappingKind) -> Self {
        Self {
            kind,
            ..Self::new(name)
        }
    }

    /// Fully-qualified class name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether this class is a mapped entity
    pub fn is_entity(&self) -> bool {
        self.kind == MappingKind::Entity
    }

    /// Whether this class is a mapped superclass
    pub fn is_mapped_superclass(&self) -> bool {
        self.kind == MappingKind::MappedSuperclass
    }

    /// Whether this class has no mapping of its own
    pub fn is_transient(&self) -> bool {
        self.kind == MappingKind::Transient
    }

    /// Look up a field by property name
    pub fn field(&self, name: &str) -> Option<&FieldMapping> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Whether a field with this property name is mapped
    pub fn has_field(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    /// Look up an association by property name
    pub fn association(&self, name: &str) -> Option<&AssociationMapping> {
        self.associations.iter().find(|a| a.name == name)
    }

    /// Whether an association with this property name is mapped
    pub fn has_association(&self, name: &str) -> bool {
        self.association(name).is_some()
    }

    /// Names of the identifier fields, in mapping order
    pub fn identifier(&self) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|f| f.id)
            .map(|f| f.name.as_str())
            .collect()
    }

    /// Add a field mapping; property names must be unique
    pub fn add_field(&mut self, field: FieldMapping) -> Result<()> {
        if self.has_field(&field.name) || self.has_association(&field.name) {
            return Err(Error::mapping(format!(
                "Duplicate mapping of property '{}' in class '{}'",
                field.name, self.name
            )));
        }
        self.fields.push(field);
        Ok(())
    }

    /// Add an association mapping; property names must be unique
    pub fn add_association(&mut self, association: AssociationMapping) -> Result<()> {
        if self.has_field(&association.name) || self.has_association(&association.name) {
            return Err(Error::mapping(format!(
                "Duplicate mapping of property '{}' in class '{}'",
                association.name, self.name
            )));
        }
        self.associations.push(association);
        Ok(())
    }

    /// Copy the fields and associations of `parent` into this class.
    ///
    /// Inherited mappings remember the class that first declared them.
    pub fn inherit_from(&mut self, parent: &ClassMetadata) {
        for field in &parent.fields {
            if self.has_field(&field.name) {
                continue;
            }
            let mut inherited = field.clone();
            inherited
                .inherited
                .get_or_insert_with(|| parent.name.clone());
            self.fields.push(inherited);
        }
        for association in &parent.associations {
            if self.has_association(&association.name) {
                continue;
            }
            let mut inherited = association.clone();
            inherited
                .inherited
                .get_or_insert_with(|| parent.name.clone());
            self.associations.push(inherited);
        }
    }

    /// Current reflection lifecycle state
    pub fn reflection_state(&self) -> ReflectionState {
        self.reflection
    }

    /// Record that reflection data has been initialized
    pub fn mark_reflection_initialized(&mut self) {
        self.reflection = ReflectionState::Initialized;
    }

    /// Record that reflection data has been restored
    pub fn mark_reflection_awake(&mut self) {
        self.reflection = ReflectionState::Awake;
    }

    /// Serialize for an external cache
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Deserialize a cache payload; fails for anything that is not metadata
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

// Reflection state is process-local and does not take part in equality.
impl PartialEq for ClassMetadata {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.kind == other.kind
            && self.root_entity_name == other.root_entity_name
            && self.parent_classes == other.parent_classes
            && self.fields == other.fields
            && self.associations == other.associations
    }
}

impl Eq for ClassMetadata {}
