//! Namespace alias and class-name resolution tests

use persist_domain::Error;
use persist_domain::ports::AliasResolver;
use persist_infrastructure::config::AliasBinding;
use persist_infrastructure::mapping::{
    NamespaceAliases, ensure_class_exists, expand_class_name, resolve_class_name,
};

use crate::test_utils::*;

#[test]
fn test_simple_alias_expands_to_namespace() {
    assert_eq!(
        expand_class_name("prefix:ChildEntity", aliases().as_ref()).unwrap(),
        CHILD_ENTITY
    );
}

#[test]
fn test_nested_alias_segments_become_namespace_separators() {
    assert_eq!(
        expand_class_name("prefix:ChildEntity:Foo", aliases().as_ref()).unwrap(),
        "Acme\\Tests\\Persistence\\ChildEntity\\Foo"
    );
}

#[test]
fn test_plain_names_pass_through() {
    assert_eq!(
        expand_class_name(CHILD_ENTITY, aliases().as_ref()).unwrap(),
        CHILD_ENTITY
    );
}

#[test]
fn test_closure_works_as_resolver() {
    let resolver = |alias: &str| -> persist_domain::Result<String> {
        Ok(format!("Ns\\{alias}"))
    };

    assert_eq!(expand_class_name("app:User", &resolver).unwrap(), "Ns\\app\\User");
}

#[test]
fn test_from_bindings() {
    let aliases = NamespaceAliases::from_bindings(&[
        AliasBinding::new("app", "App\\Entity"),
        AliasBinding::new("cms", "Cms\\Entity"),
    ]);

    assert_eq!(aliases.len(), 2);
    assert_eq!(aliases.namespace_for("cms").unwrap(), "Cms\\Entity");
    assert!(matches!(
        aliases.namespace_for("shop"),
        Err(Error::UnknownAlias { .. })
    ));
}

#[test]
fn test_existence_is_checked_separately() {
    let catalog = catalog();

    ensure_class_exists(ROOT_ENTITY, &catalog).unwrap();
    assert!(matches!(
        ensure_class_exists("Acme\\Missing", &catalog),
        Err(Error::ClassNotFound { .. })
    ));
    assert_eq!(
        resolve_class_name("prefix:RootEntity", aliases().as_ref(), &catalog).unwrap(),
        ROOT_ENTITY
    );
}
