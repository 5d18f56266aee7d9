//! Class metadata factory tests

use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

use persist_domain::Error;
use persist_domain::ports::{MetadataCache, MetadataFactory, NotFoundFallback};
use persist_domain::value_objects::{
    ClassMetadata, FieldMapping, MappingKind, ReflectionState, metadata_cache_key,
};
use persist_infrastructure::ClassMetadataFactory;
use persist_providers::cache::MokaMetadataCache;

use crate::test_utils::*;

fn factory_with(driver: Arc<RecordingDriver>) -> ClassMetadataFactory {
    ClassMetadataFactory::new(driver, Arc::new(catalog())).with_aliases(aliases())
}

fn setup() -> (ClassMetadataFactory, Arc<RecordingDriver>) {
    let driver = Arc::new(RecordingDriver::new(mappings()));
    (factory_with(Arc::clone(&driver)), driver)
}

fn setup_cached() -> (ClassMetadataFactory, Arc<RecordingDriver>, Arc<RecordingCache>) {
    let (factory, driver) = setup();
    let cache = Arc::new(RecordingCache::new());
    let factory = factory.with_cache_driver(cache.clone());
    (factory, driver, cache)
}

fn fallback_returning(metadata: Option<ClassMetadata>) -> NotFoundFallback {
    Arc::new(move |_fqcn: &str| metadata.clone())
}

#[test]
fn test_cache_driver_get_and_set() {
    let (factory, _) = setup();
    assert!(factory.cache_driver().is_none());

    let cache: Arc<dyn MetadataCache> = Arc::new(MokaMetadataCache::new());
    factory.set_cache_driver(Some(Arc::clone(&cache)));
    let attached = factory.cache_driver().unwrap();
    assert!(Arc::ptr_eq(&attached, &cache));

    factory.set_cache_driver(None);
    assert!(factory.cache_driver().is_none());
}

#[test]
fn test_get_metadata_for_mapped_class() {
    let (factory, driver) = setup();

    let metadata = factory.get_metadata_for(ROOT_ENTITY).unwrap();

    assert_eq!(metadata.name, ROOT_ENTITY);
    assert_eq!(metadata.root_entity_name, ROOT_ENTITY);
    assert!(metadata.has_field("id"));
    assert_eq!(metadata.reflection_state(), ReflectionState::Awake);
    assert_eq!(driver.load_count(ROOT_ENTITY), 1);
}

#[test]
fn test_get_metadata_for_absent_class() {
    let (factory, driver) = setup();

    let err = factory
        .get_metadata_for("Acme\\Tests\\Persistence\\Missing")
        .unwrap_err();

    assert!(
        matches!(err, Error::ClassNotFound { ref class_name } if class_name == "Acme\\Tests\\Persistence\\Missing")
    );
    assert!(driver.loads().is_empty());
}

#[test]
fn test_get_parent_metadata() {
    let (factory, _) = setup();

    let child = factory.get_metadata_for(CHILD_ENTITY).unwrap();

    assert!(factory.has_metadata_for(CHILD_ENTITY));
    assert!(factory.has_metadata_for(ROOT_ENTITY));
    assert_eq!(child.root_entity_name, ROOT_ENTITY);
    assert_eq!(child.parent_classes, vec![ROOT_ENTITY.to_string()]);
}

#[test]
fn test_child_inherits_parent_fields() {
    let (factory, _) = setup();

    let child = factory.get_metadata_for(CHILD_ENTITY).unwrap();

    let id = child.field("id").unwrap();
    assert_eq!(id.inherited.as_deref(), Some(ROOT_ENTITY));
    assert!(child.field("name").unwrap().inherited.is_none());
    assert_eq!(child.identifier(), vec!["id"]);
}

#[test]
fn test_walk_runs_root_most_first() {
    let (factory, driver) = setup();

    let grandchild = factory.get_metadata_for(GRANDCHILD_ENTITY).unwrap();

    assert_eq!(
        driver.loads(),
        vec![ROOT_ENTITY.to_string(), CHILD_ENTITY.to_string(), GRANDCHILD_ENTITY.to_string()]
    );
    assert_eq!(grandchild.root_entity_name, ROOT_ENTITY);
    assert_eq!(
        grandchild.parent_classes,
        vec![CHILD_ENTITY.to_string(), ROOT_ENTITY.to_string()]
    );
    assert!(grandchild.has_association("owner"));
}

#[test]
fn test_walk_reuses_loaded_ancestors() {
    let (factory, driver) = setup();
    factory.get_metadata_for(CHILD_ENTITY).unwrap();

    let grandchild = factory.get_metadata_for(GRANDCHILD_ENTITY).unwrap();

    assert_eq!(driver.load_count(ROOT_ENTITY), 1);
    assert_eq!(driver.load_count(CHILD_ENTITY), 1);
    assert_eq!(grandchild.root_entity_name, ROOT_ENTITY);
    assert!(grandchild.has_field("name"));
}

#[test]
fn test_transient_ancestor_is_recorded_but_not_loaded() {
    let (factory, driver) = setup();

    factory.get_metadata_for(ROOT_ENTITY).unwrap();

    assert_eq!(driver.load_count(BASE_OBJECT), 0);
    let base = factory.get_metadata_for(BASE_OBJECT).unwrap();
    assert_eq!(base.kind, MappingKind::Transient);
}

#[test]
fn test_mapped_superclass_is_not_root_entity() {
    let (factory, _) = setup();

    let audited = factory.get_metadata_for(AUDITED_ENTITY).unwrap();

    assert_eq!(audited.root_entity_name, AUDITED_ENTITY);
    assert!(audited.parent_classes.is_empty());
    assert_eq!(
        audited.field("created_at").unwrap().inherited.as_deref(),
        Some(MAPPED_SUPERCLASS)
    );
    let superclass = factory.get_metadata_for(MAPPED_SUPERCLASS).unwrap();
    assert!(superclass.is_mapped_superclass());
}

#[test]
fn test_get_cached_metadata() {
    let (factory, driver, cache) = setup_cached();
    let stored = ClassMetadata::new(CHILD_ENTITY);
    cache.seed(&metadata_cache_key(CHILD_ENTITY), &stored.to_json().unwrap());

    let metadata = factory.get_metadata_for(CHILD_ENTITY).unwrap();

    assert_eq!(*metadata, stored);
    assert_eq!(metadata.reflection_state(), ReflectionState::Awake);
    assert!(driver.loads().is_empty());
    assert!(cache.saved_keys().is_empty());
}

#[test]
fn test_cache_written_after_load() {
    let (factory, _, cache) = setup_cached();

    factory.get_metadata_for(CHILD_ENTITY).unwrap();

    let saved = cache.saved_keys();
    assert!(saved.contains(&metadata_cache_key(ROOT_ENTITY)));
    assert!(saved.contains(&metadata_cache_key(CHILD_ENTITY)));
    assert!(!saved.contains(&metadata_cache_key(BASE_OBJECT)));

    let payload = cache.stored(&metadata_cache_key(CHILD_ENTITY)).unwrap();
    let restored = ClassMetadata::from_json(&payload).unwrap();
    assert_eq!(restored.root_entity_name, ROOT_ENTITY);
}

#[test]
fn test_get_aliased_metadata() {
    let (factory, _) = setup();

    factory.get_metadata_for("prefix:ChildEntity").unwrap();

    assert!(factory.has_metadata_for(CHILD_ENTITY));
    assert!(factory.has_metadata_for("prefix:ChildEntity"));
}

#[test]
fn test_alias_and_fqcn_share_one_instance() {
    let (factory, driver) = setup();

    let by_alias = factory.get_metadata_for("prefix:ChildEntity").unwrap();
    let by_name = factory.get_metadata_for(CHILD_ENTITY).unwrap();

    assert!(Arc::ptr_eq(&by_alias, &by_name));
    assert_eq!(driver.load_count(CHILD_ENTITY), 1);
}

#[test]
fn test_get_invalid_aliased_metadata() {
    let (factory, _) = setup();

    let err = factory.get_metadata_for("prefix:ChildEntity:Foo").unwrap_err();

    assert_eq!(
        err.to_string(),
        "Class 'Acme\\Tests\\Persistence\\ChildEntity\\Foo' does not exist"
    );
}

#[test]
fn test_unknown_alias_fails() {
    let (factory, _) = setup();

    let err = factory.get_metadata_for("other:ChildEntity").unwrap_err();

    assert!(matches!(err, Error::UnknownAlias { ref alias } if alias == "other"));
}

#[test]
fn test_proxy_name_resolves_to_real_class() {
    let (factory, _) = setup();

    let metadata = factory.get_metadata_for(USER_PROXY).unwrap();

    assert_eq!(metadata.name, USER);
    assert!(factory.has_metadata_for(USER_PROXY));
}

#[test]
fn test_get_invalid_aliased_metadata_is_transient() {
    let (factory, _) = setup();

    assert!(factory.is_transient("prefix:ChildEntity:Foo").unwrap());
    assert!(!factory.is_transient("prefix:ChildEntity").unwrap());
    assert!(factory.is_transient(TEST_OBJECT).unwrap());
}

#[test]
fn test_will_fallback_on_not_loaded_metadata() {
    let (factory, _) = setup();
    let replacement = ClassMetadata::new(TEST_OBJECT);
    let factory = factory.with_fallback(fallback_returning(Some(replacement.clone())));

    let metadata = factory.get_metadata_for(TEST_OBJECT).unwrap();

    assert_eq!(*metadata, replacement);
    assert!(factory.has_metadata_for(TEST_OBJECT));
}

#[test]
fn test_fallback_receives_expanded_name() {
    let (factory, _) = setup();
    let seen = Arc::new(std::sync::Mutex::new(Vec::new()));
    let recorder = Arc::clone(&seen);
    let factory = factory.with_fallback(Arc::new(move |fqcn: &str| {
        recorder.lock().unwrap().push(fqcn.to_string());
        Some(ClassMetadata::new(fqcn))
    }));

    factory.get_metadata_for("prefix:TestObject").unwrap();

    assert_eq!(*seen.lock().unwrap(), vec![TEST_OBJECT.to_string()]);
}

#[test]
fn test_will_fail_on_fallback_failure_with_not_loaded_metadata() {
    let (factory, _) = setup();
    let factory = factory.with_fallback(fallback_returning(None));

    let err = factory.get_metadata_for(TEST_OBJECT).unwrap_err();

    assert!(matches!(err, Error::MetadataNotFound { ref class_name } if class_name == TEST_OBJECT));
    assert!(!factory.has_metadata_for(TEST_OBJECT));
}

#[test]
fn test_unmapped_class_without_fallback_fails() {
    let (factory, _) = setup();

    let err = factory.get_metadata_for(TEST_OBJECT).unwrap_err();

    assert!(err.is_mapping_error());
}

#[test]
fn test_will_ignore_cache_entries_that_are_not_metadata_instances() {
    let (factory, driver, cache) = setup_cached();
    cache.seed(&metadata_cache_key(ROOT_ENTITY), "\"not metadata\"");

    let metadata = factory.get_metadata_for(ROOT_ENTITY).unwrap();

    assert_eq!(metadata.name, ROOT_ENTITY);
    assert_eq!(cache.fetch_count(), 1);
    assert_eq!(driver.load_count(ROOT_ENTITY), 1);

    let payload = cache.stored(&metadata_cache_key(ROOT_ENTITY)).unwrap();
    let replaced = ClassMetadata::from_json(&payload).unwrap();
    assert_eq!(replaced, *metadata);
}

#[test]
fn test_invalid_cache_entry_is_replaced_for_aliased_lookup() {
    let (factory, _, cache) = setup_cached();
    cache.seed(&metadata_cache_key(CHILD_ENTITY), "[1, 2, 3]");

    let by_alias = factory.get_metadata_for("prefix:ChildEntity").unwrap();
    let by_name = factory.get_metadata_for(CHILD_ENTITY).unwrap();

    assert!(Arc::ptr_eq(&by_alias, &by_name));
    let payload = cache.stored(&metadata_cache_key(CHILD_ENTITY)).unwrap();
    assert_eq!(ClassMetadata::from_json(&payload).unwrap().name, CHILD_ENTITY);
}

#[test]
fn test_wakeup_runs_root_most_class_last() {
    let reflection = Arc::new(RecordingReflection::new(catalog()));
    let driver = Arc::new(RecordingDriver::new(mappings()));
    let factory =
        ClassMetadataFactory::new(driver, reflection.clone()).with_aliases(aliases());

    factory.get_metadata_for(GRANDCHILD_ENTITY).unwrap();

    assert_eq!(
        reflection.wakeups(),
        vec![
            BASE_OBJECT.to_string(),
            GRANDCHILD_ENTITY.to_string(),
            CHILD_ENTITY.to_string(),
            ROOT_ENTITY.to_string(),
        ]
    );
}

#[test]
fn test_wakeup_skips_classes_already_loaded() {
    let reflection = Arc::new(RecordingReflection::new(catalog()));
    let driver = Arc::new(RecordingDriver::new(mappings()));
    let factory =
        ClassMetadataFactory::new(driver, reflection.clone()).with_aliases(aliases());
    factory.get_metadata_for(ROOT_ENTITY).unwrap();

    factory.get_metadata_for(GRANDCHILD_ENTITY).unwrap();

    assert_eq!(
        reflection.wakeups(),
        vec![
            BASE_OBJECT.to_string(),
            ROOT_ENTITY.to_string(),
            GRANDCHILD_ENTITY.to_string(),
            CHILD_ENTITY.to_string(),
        ]
    );
}

#[test]
fn test_fallback_metadata_should_be_cached() {
    let (factory, _, cache) = setup_cached();
    let factory = factory.with_fallback(fallback_returning(Some(ClassMetadata::new(TEST_OBJECT))));

    factory.get_metadata_for(TEST_OBJECT).unwrap();

    assert_eq!(cache.saved_keys(), vec![metadata_cache_key(TEST_OBJECT)]);
}

#[test]
fn test_set_metadata_for_skips_driver() {
    let (factory, driver, cache) = setup_cached();
    let mut metadata = ClassMetadata::new("Foo");
    metadata
        .add_field(FieldMapping::new("id", "integer").identifier())
        .unwrap();
    let metadata = Arc::new(metadata);

    factory.set_metadata_for("Foo", Arc::clone(&metadata));
    let fetched = factory.get_metadata_for("Foo").unwrap();

    assert!(Arc::ptr_eq(&fetched, &metadata));
    assert!(driver.loads().is_empty());
    assert_eq!(cache.saved_keys(), vec![metadata_cache_key("Foo")]);
}

#[test]
fn test_repeated_lookups_are_idempotent() {
    let (factory, driver) = setup();

    let first = factory.get_metadata_for(CHILD_ENTITY).unwrap();
    let second = factory.get_metadata_for(CHILD_ENTITY).unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(driver.load_count(CHILD_ENTITY), 1);
    assert_eq!(driver.initializations(), 1);
}

#[test]
fn test_concurrent_first_lookup_computes_once() {
    let driver = Arc::new(RecordingDriver::new(mappings()).with_delay(Duration::from_millis(20)));
    let factory = Arc::new(factory_with(Arc::clone(&driver)));
    let barrier = Arc::new(Barrier::new(8));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let factory = Arc::clone(&factory);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                factory.get_metadata_for(CHILD_ENTITY).unwrap()
            })
        })
        .collect();
    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    assert_eq!(driver.load_count(CHILD_ENTITY), 1);
    assert_eq!(driver.load_count(ROOT_ENTITY), 1);
    assert!(results.iter().all(|m| Arc::ptr_eq(m, &results[0])));
}

#[test]
fn test_all_metadata_loads_every_mapped_class() {
    let (factory, _) = setup();

    let all = factory.all_metadata().unwrap();

    let mut names: Vec<&str> = all.iter().map(|m| m.name.as_str()).collect();
    names.sort_unstable();
    assert_eq!(
        names,
        vec![AUDITED_ENTITY, CHILD_ENTITY, GRANDCHILD_ENTITY, ROOT_ENTITY, MAPPED_SUPERCLASS, USER]
    );
}

#[test]
fn test_loaded_metadata_deduplicates_aliases() {
    let (factory, _) = setup();
    factory.get_metadata_for("prefix:RootEntity").unwrap();

    let loaded = factory.loaded_metadata();

    let names: Vec<&str> = loaded.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec![BASE_OBJECT, ROOT_ENTITY]);
}

#[test]
fn test_reflection_service_can_be_replaced() {
    let (factory, _) = setup();
    let empty = Arc::new(persist_providers::ClassCatalog::new());

    factory.set_reflection_service(empty);

    assert!(!factory.reflection_service().class_exists(ROOT_ENTITY));
    assert!(matches!(
        factory.get_metadata_for(ROOT_ENTITY),
        Err(Error::ClassNotFound { .. })
    ));
}
