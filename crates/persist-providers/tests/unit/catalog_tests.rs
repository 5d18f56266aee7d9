//! Class catalog reflection tests

use persist_domain::Error;
use persist_domain::ports::ReflectionService;
use persist_domain::value_objects::ClassMetadata;
use persist_domain::value_objects::ReflectionState;
use persist_providers::reflection::{ClassCatalog, ClassDeclaration};

fn catalog() -> ClassCatalog {
    ClassCatalog::new()
        .with(ClassDeclaration::interface("Persistence\\ObjectManagerAware"))
        .with(ClassDeclaration::interface("Persistence\\Proxy").extends("Persistence\\ObjectManagerAware"))
        .with(ClassDeclaration::class("App\\Base"))
        .with(ClassDeclaration::class("App\\RootEntity").extends("App\\Base"))
        .with(ClassDeclaration::class("App\\ChildEntity").extends("App\\RootEntity"))
        .with(
            ClassDeclaration::class("Proxies\\__CG__\\App\\ChildEntity")
                .extends("App\\ChildEntity")
                .implements("Persistence\\Proxy"),
        )
}

#[test]
fn test_parent_classes_nearest_first() {
    assert_eq!(
        catalog().parent_classes("App\\ChildEntity").unwrap(),
        vec!["App\\RootEntity".to_string(), "App\\Base".to_string()]
    );
    assert!(catalog().parent_classes("App\\Base").unwrap().is_empty());
}

#[test]
fn test_parent_class_of_root_is_none() {
    assert_eq!(catalog().parent_class("App\\Base").unwrap(), None);
    assert_eq!(
        catalog().parent_class("App\\ChildEntity").unwrap().as_deref(),
        Some("App\\RootEntity")
    );
}

#[test]
fn test_unknown_class_is_class_not_found() {
    let err = catalog().parent_classes("App\\Missing").unwrap_err();
    match err {
        Error::ClassNotFound { class_name } => assert_eq!(class_name, "App\\Missing"),
        other => panic!("Expected ClassNotFound, got {other:?}"),
    }
    assert!(!catalog().class_exists("App\\Missing"));
}

#[test]
fn test_interfaces_are_inherited_through_extension() {
    let catalog = catalog();
    let proxy = "Proxies\\__CG__\\App\\ChildEntity";

    assert!(catalog.implements_interface(proxy, "Persistence\\Proxy"));
    assert!(catalog.implements_interface(proxy, "Persistence\\ObjectManagerAware"));
    assert!(!catalog.implements_interface("App\\ChildEntity", "Persistence\\Proxy"));
    assert!(catalog.is_interface("Persistence\\ObjectManagerAware"));
    assert!(!catalog.is_interface("App\\ChildEntity"));
}

#[test]
fn test_reflection_lifecycle_hooks() {
    let catalog = catalog();
    let mut metadata = ClassMetadata::new("App\\ChildEntity");

    catalog.initialize_reflection(&mut metadata);
    assert_eq!(metadata.reflection_state(), ReflectionState::Initialized);

    catalog.wakeup_reflection(&mut metadata);
    assert_eq!(metadata.reflection_state(), ReflectionState::Awake);
}
