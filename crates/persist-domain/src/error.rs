//! Error handling types

use thiserror::Error;

/// Result type alias for operations that can fail
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the persistence layer
#[derive(Error, Debug)]
pub enum Error {
    /// The resolved (post-alias) class name does not denote a known class
    #[error("Class '{class_name}' does not exist")]
    ClassNotFound {
        /// The class name exactly as it was resolved
        class_name: String,
    },

    /// The class exists but no metadata could be produced for it
    #[error("No mapping metadata found for class '{class_name}'")]
    MetadataNotFound {
        /// The fully-qualified class name
        class_name: String,
    },

    /// Mapping driver failure while populating metadata
    #[error("Mapping error: {message}")]
    Mapping {
        /// Description of the mapping error
        message: String,
    },

    /// A namespace alias prefix with no registered namespace
    #[error("Unknown namespace alias '{alias}'")]
    UnknownAlias {
        /// The alias prefix
        alias: String,
    },

    /// An explicitly requested manager name is not registered
    #[error("{registry} manager named '{name}' does not exist")]
    ManagerNotFound {
        /// Name of the registry that was asked
        registry: String,
        /// The unregistered manager name
        name: String,
    },

    /// An explicitly requested connection name is not registered
    #[error("{registry} connection named '{name}' does not exist")]
    ConnectionNotFound {
        /// Name of the registry that was asked
        registry: String,
        /// The unregistered connection name
        name: String,
    },

    /// Metadata cache backend error
    #[error("Cache error: {message}")]
    Cache {
        /// Description of the cache error
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration-related error
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration error
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// JSON parsing or serialization error
    #[error("JSON parsing error: {source}")]
    Json {
        /// The underlying JSON error
        #[from]
        source: serde_json::Error,
    },

    /// Internal system error
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the internal error
        message: String,
    },
}

// Mapping error creation methods
impl Error {
    /// Create a class-not-found error
    pub fn class_not_found<S: Into<String>>(class_name: S) -> Self {
        Self::ClassNotFound {
            class_name: class_name.into(),
        }
    }

    /// Create a metadata-not-found error
    pub fn metadata_not_found<S: Into<String>>(class_name: S) -> Self {
        Self::MetadataNotFound {
            class_name: class_name.into(),
        }
    }

    /// Create a mapping error
    pub fn mapping<S: Into<String>>(message: S) -> Self {
        Self::Mapping {
            message: message.into(),
        }
    }

    /// Create an unknown alias error
    pub fn unknown_alias<S: Into<String>>(alias: S) -> Self {
        Self::UnknownAlias {
            alias: alias.into(),
        }
    }
}

// Registry error creation methods
impl Error {
    /// Create a manager-not-found error
    pub fn manager_not_found<R: Into<String>, S: Into<String>>(registry: R, name: S) -> Self {
        Self::ManagerNotFound {
            registry: registry.into(),
            name: name.into(),
        }
    }

    /// Create a connection-not-found error
    pub fn connection_not_found<R: Into<String>, S: Into<String>>(registry: R, name: S) -> Self {
        Self::ConnectionNotFound {
            registry: registry.into(),
            name: name.into(),
        }
    }
}

// Infrastructure error creation methods
impl Error {
    /// Create a cache error
    pub fn cache<S: Into<String>>(message: S) -> Self {
        Self::Cache {
            message: message.into(),
            source: None,
        }
    }

    /// Create a cache error with source
    pub fn cache_with_source<S: Into<String>, E: std::error::Error + Send + Sync + 'static>(
        message: S,
        source: E,
    ) -> Self {
        Self::Cache {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
            source: None,
        }
    }

    /// Create a configuration error with source
    pub fn configuration_with_source<
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    >(
        message: S,
        source: E,
    ) -> Self {
        Self::Configuration {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

// Classification
impl Error {
    /// Whether this error belongs to the mapping family (class-not-found,
    /// metadata-not-found, driver mapping failure)
    pub fn is_mapping_error(&self) -> bool {
        matches!(
            self,
            Self::ClassNotFound { .. } | Self::MetadataNotFound { .. } | Self::Mapping { .. }
        )
    }

    /// Whether this error reports a missing class, metadata, manager or connection
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::ClassNotFound { .. }
                | Self::MetadataNotFound { .. }
                | Self::ManagerNotFound { .. }
                | Self::ConnectionNotFound { .. }
        )
    }
}
