//! Class metadata factory
//!
//! Resolves a (possibly aliased) class name to its mapping metadata,
//! computing it once through an inheritance-aware walk and sharing the
//! result through an in-process table and an optional external cache.
//!
//! ## Resolution order
//!
//! ```text
//! get_metadata_for("app:User")
//!        │
//!        ├─ in-process table (exact name)      → hit: return
//!        ├─ expand alias, check class exists   → ClassNotFound
//!        ├─ in-process table (fqcn)            → hit: remember alias, return
//!        ├─ loader lock, table re-check
//!        ├─ external cache "<fqcn>$CLASSMETADATA" → metadata payload: wake up, return
//!        ├─ inheritance walk + driver           → write loaded classes to cache
//!        └─ not-found fallback                 → write to cache, or fail
//! ```
//!
//! Computation is serialised by a loader lock so concurrent first lookups of
//! one class run a single walk. Drivers and fallbacks must not call back
//! into the same factory.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use dashmap::DashMap;
use persist_domain::error::{Error, Result};
use persist_domain::ports::{
    AliasResolver, MappingDriver, MetadataCache, MetadataFactory, NotFoundFallback,
    ReflectionService,
};
use persist_domain::value_objects::{ClassMetadata, MappingKind, metadata_cache_key};
use tracing::{debug, warn};

use super::aliases::{NamespaceAliases, expand_class_name, resolve_class_name};

/// Parent of the class currently being loaded during a walk
enum WalkParent {
    /// Already in the in-process table
    Loaded(Arc<ClassMetadata>),
    /// Built earlier in this walk, index into the walk's list
    Built(usize),
}

/// Class metadata factory
pub struct ClassMetadataFactory {
    driver: Arc<dyn MappingDriver>,
    reflection: RwLock<Arc<dyn ReflectionService>>,
    aliases: Arc<dyn AliasResolver>,
    fallback: Option<NotFoundFallback>,
    cache: RwLock<Option<Arc<dyn MetadataCache>>>,
    loaded: DashMap<String, Arc<ClassMetadata>>,
    initialized: Mutex<bool>,
    loader: Mutex<()>,
}

// Construction and configuration
impl ClassMetadataFactory {
    /// Create a factory without aliases, fallback or external cache
    pub fn new(driver: Arc<dyn MappingDriver>, reflection: Arc<dyn ReflectionService>) -> Self {
        Self {
            driver,
            reflection: RwLock::new(reflection),
            aliases: Arc::new(NamespaceAliases::new()),
            fallback: None,
            cache: RwLock::new(None),
            loaded: DashMap::new(),
            initialized: Mutex::new(false),
            loader: Mutex::new(()),
        }
    }

    /// Use `aliases` to expand `alias:Name` class names
    pub fn with_aliases(mut self, aliases: Arc<dyn AliasResolver>) -> Self {
        self.aliases = aliases;
        self
    }

    /// Consult `fallback` when a class has no obtainable metadata
    pub fn with_fallback(mut self, fallback: NotFoundFallback) -> Self {
        self.fallback = Some(fallback);
        self
    }

    /// Attach an external metadata cache
    pub fn with_cache_driver(self, cache: Arc<dyn MetadataCache>) -> Self {
        self.set_cache_driver(Some(cache));
        self
    }

    /// The external metadata cache, if any
    pub fn cache_driver(&self) -> Option<Arc<dyn MetadataCache>> {
        self.cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Attach or detach the external metadata cache
    pub fn set_cache_driver(&self, cache: Option<Arc<dyn MetadataCache>>) {
        *self.cache.write().unwrap_or_else(PoisonError::into_inner) = cache;
    }

    /// The reflection service
    pub fn reflection_service(&self) -> Arc<dyn ReflectionService> {
        Arc::clone(&self.reflection.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Replace the reflection service
    pub fn set_reflection_service(&self, reflection: Arc<dyn ReflectionService>) {
        *self.reflection.write().unwrap_or_else(PoisonError::into_inner) = reflection;
    }

    /// The mapping driver
    pub fn driver(&self) -> Arc<dyn MappingDriver> {
        Arc::clone(&self.driver)
    }
}

// Resolution
impl ClassMetadataFactory {
    fn lookup(&self, class_name: &str) -> Option<Arc<ClassMetadata>> {
        self.loaded
            .get(class_name)
            .map(|entry| Arc::clone(entry.value()))
    }

    fn remember_alias(&self, class_name: &str, fqcn: &str, metadata: &Arc<ClassMetadata>) {
        if class_name != fqcn {
            self.loaded
                .insert(class_name.to_string(), Arc::clone(metadata));
        }
    }

    fn ensure_initialized(&self) -> Result<()> {
        let mut initialized = self
            .initialized
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if !*initialized {
            self.driver.initialize()?;
            *initialized = true;
            debug!("Metadata factory initialized");
        }
        Ok(())
    }

    fn resolve(&self, class_name: &str) -> Result<Arc<ClassMetadata>> {
        let reflection = self.reflection_service();
        let fqcn = resolve_class_name(class_name, self.aliases.as_ref(), reflection.as_ref())?;

        if let Some(metadata) = self.lookup(&fqcn) {
            self.remember_alias(class_name, &fqcn, &metadata);
            return Ok(metadata);
        }

        self.ensure_initialized()?;

        let _guard = self.loader.lock().unwrap_or_else(PoisonError::into_inner);
        // Another caller may have finished this class while we waited.
        let metadata = match self.lookup(&fqcn) {
            Some(metadata) => metadata,
            None => match self.fetch_cached(&fqcn, reflection.as_ref()) {
                Some(metadata) => metadata,
                None => self.load_or_fallback(&fqcn)?,
            },
        };

        self.remember_alias(class_name, &fqcn, &metadata);
        Ok(metadata)
    }

    /// Read `fqcn` from the external cache; anything but a metadata payload
    /// counts as a miss
    fn fetch_cached(
        &self,
        fqcn: &str,
        reflection: &dyn ReflectionService,
    ) -> Option<Arc<ClassMetadata>> {
        let cache = self.cache_driver()?;
        let key = metadata_cache_key(fqcn);

        let payload = match cache.fetch(&key) {
            Ok(Some(payload)) => payload,
            Ok(None) => {
                debug!(class = fqcn, "Metadata cache miss");
                return None;
            }
            Err(e) => {
                warn!(class = fqcn, error = %e, "Metadata cache fetch failed, treating as miss");
                return None;
            }
        };

        match ClassMetadata::from_json(&payload) {
            Ok(mut metadata) => {
                reflection.wakeup_reflection(&mut metadata);
                let metadata = Arc::new(metadata);
                self.loaded.insert(fqcn.to_string(), Arc::clone(&metadata));
                debug!(class = fqcn, "Metadata cache hit");
                Some(metadata)
            }
            Err(e) => {
                warn!(key = %key, error = %e, "Ignoring cache entry that is not class metadata");
                None
            }
        }
    }

    fn save_to_cache(&self, key: &str, metadata: &ClassMetadata) {
        let Some(cache) = self.cache_driver() else {
            return;
        };
        let saved = metadata
            .to_json()
            .and_then(|payload| cache.save(&metadata_cache_key(key), &payload));
        if let Err(e) = saved {
            warn!(class = key, error = %e, "Failed to write metadata to cache");
        }
    }

    fn load_or_fallback(&self, fqcn: &str) -> Result<Arc<ClassMetadata>> {
        match self.load_metadata(fqcn) {
            Ok(loaded) => {
                for metadata in &loaded {
                    self.save_to_cache(&metadata.name, metadata);
                }
                self.lookup(fqcn)
                    .ok_or_else(|| Error::metadata_not_found(fqcn))
            }
            Err(err) if err.is_mapping_error() => {
                let Some(metadata) = self.fallback.as_ref().and_then(|fallback| fallback(fqcn))
                else {
                    return Err(err);
                };
                debug!(class = fqcn, "Using fallback metadata");
                let metadata = Arc::new(metadata);
                self.loaded.insert(fqcn.to_string(), Arc::clone(&metadata));
                self.save_to_cache(fqcn, &metadata);
                Ok(metadata)
            }
            Err(err) => Err(err),
        }
    }

    /// Walk the hierarchy of `fqcn` from the root-most ancestor down,
    /// loading every class not yet known.
    ///
    /// Returns the mapped classes loaded by this walk; transient ancestors
    /// are recorded in the in-process table only.
    fn load_metadata(&self, fqcn: &str) -> Result<Vec<Arc<ClassMetadata>>> {
        let reflection = self.reflection_service();
        let mut lineage = reflection.parent_classes(fqcn)?;
        lineage.reverse();
        lineage.push(fqcn.to_string());

        let mut parent: Option<WalkParent> = None;
        let mut root_entity_found = false;
        let mut non_superclass_parents: Vec<String> = Vec::new();
        let mut built: Vec<ClassMetadata> = Vec::new();
        let mut transient: Vec<ClassMetadata> = Vec::new();

        for class_name in &lineage {
            let is_requested = class_name == fqcn;

            if !is_requested && self.driver.is_transient(class_name) {
                if !self.loaded.contains_key(class_name) {
                    let mut metadata =
                        ClassMetadata::with_kind(class_name.as_str(), MappingKind::Transient);
                    reflection.initialize_reflection(&mut metadata);
                    transient.push(metadata);
                }
                continue;
            }

            if let Some(existing) = self.lookup(class_name) {
                if existing.is_entity() {
                    root_entity_found = true;
                    non_superclass_parents.insert(0, class_name.clone());
                }
                parent = Some(WalkParent::Loaded(existing));
                continue;
            }

            let mut metadata = ClassMetadata::new(class_name.as_str());
            reflection.initialize_reflection(&mut metadata);
            {
                let parent_metadata = match &parent {
                    Some(WalkParent::Loaded(loaded)) => Some(loaded.as_ref()),
                    Some(WalkParent::Built(index)) => built.get(*index),
                    None => None,
                };
                self.do_load_metadata(
                    &mut metadata,
                    parent_metadata,
                    root_entity_found,
                    &non_superclass_parents,
                )?;
            }

            if metadata.is_entity() {
                root_entity_found = true;
                non_superclass_parents.insert(0, class_name.clone());
            }
            built.push(metadata);
            parent = Some(WalkParent::Built(built.len() - 1));
        }

        // Wake up most-derived first so the root-most class is finalized last.
        for metadata in transient.iter_mut().chain(built.iter_mut().rev()) {
            reflection.wakeup_reflection(metadata);
        }

        for metadata in transient {
            self.loaded.insert(metadata.name.clone(), Arc::new(metadata));
        }

        let loaded: Vec<Arc<ClassMetadata>> = built.into_iter().map(Arc::new).collect();
        for metadata in &loaded {
            debug!(class = %metadata.name, "Metadata computed");
            self.loaded
                .insert(metadata.name.clone(), Arc::clone(metadata));
        }
        Ok(loaded)
    }

    /// Populate `metadata` from its parent and the mapping driver
    fn do_load_metadata(
        &self,
        metadata: &mut ClassMetadata,
        parent: Option<&ClassMetadata>,
        root_entity_found: bool,
        non_superclass_parents: &[String],
    ) -> Result<()> {
        if let Some(parent) = parent {
            metadata.inherit_from(parent);
        }
        metadata.parent_classes = non_superclass_parents.to_vec();

        let class_name = metadata.name.clone();
        self.driver.load_metadata_for_class(&class_name, metadata)?;

        metadata.root_entity_name = match non_superclass_parents.last() {
            Some(root) if root_entity_found => root.clone(),
            _ => class_name,
        };
        Ok(())
    }
}

impl MetadataFactory for ClassMetadataFactory {
    fn get_metadata_for(&self, class_name: &str) -> Result<Arc<ClassMetadata>> {
        match self.lookup(class_name) {
            Some(metadata) => Ok(metadata),
            None => self.resolve(class_name),
        }
    }

    fn has_metadata_for(&self, class_name: &str) -> bool {
        self.loaded.contains_key(class_name)
    }

    fn set_metadata_for(&self, class_name: &str, metadata: Arc<ClassMetadata>) {
        self.save_to_cache(class_name, &metadata);
        self.loaded.insert(class_name.to_string(), metadata);
    }

    fn is_transient(&self, class_name: &str) -> Result<bool> {
        self.ensure_initialized()?;
        let fqcn = expand_class_name(class_name, self.aliases.as_ref())?;
        Ok(self.driver.is_transient(&fqcn))
    }

    fn all_metadata(&self) -> Result<Vec<Arc<ClassMetadata>>> {
        self.ensure_initialized()?;
        self.driver
            .all_class_names()?
            .iter()
            .map(|class_name| self.get_metadata_for(class_name))
            .collect()
    }

    fn loaded_metadata(&self) -> Vec<Arc<ClassMetadata>> {
        let mut seen = HashSet::new();
        let mut loaded: Vec<Arc<ClassMetadata>> = self
            .loaded
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .filter(|metadata| seen.insert(Arc::as_ptr(metadata)))
            .collect();
        loaded.sort_by(|a, b| a.name.cmp(&b.name));
        loaded
    }
}

impl std::fmt::Debug for ClassMetadataFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClassMetadataFactory")
            .field("loaded", &self.loaded.len())
            .field("cache", &self.cache_driver().map(|c| c.provider_name().to_string()))
            .field("fallback", &self.fallback.is_some())
            .finish()
    }
}
