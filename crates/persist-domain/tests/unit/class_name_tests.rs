//! Unit tests for class-name helpers

use persist_domain::constants::CLASS_METADATA_CACHE_SALT;
use persist_domain::value_objects::{fqcn_from_alias, metadata_cache_key, split_alias};

#[test]
fn test_split_alias_uses_first_separator() {
    assert_eq!(split_alias("prefix:ChildEntity"), Some(("prefix", "ChildEntity")));
    assert_eq!(
        split_alias("prefix:ChildEntity:Foo"),
        Some(("prefix", "ChildEntity:Foo"))
    );
    assert_eq!(split_alias("Tests\\Mapping\\ChildEntity"), None);
}

#[test]
fn test_nested_names_become_namespace_segments() {
    assert_eq!(
        fqcn_from_alias("Tests\\Mapping", "ChildEntity:Foo"),
        "Tests\\Mapping\\ChildEntity\\Foo"
    );
    assert_eq!(
        fqcn_from_alias("Tests\\Mapping", "A:B:C"),
        "Tests\\Mapping\\A\\B\\C"
    );
}

#[test]
fn test_metadata_cache_key_format() {
    assert_eq!(CLASS_METADATA_CACHE_SALT, "$CLASSMETADATA");
    assert_eq!(
        metadata_cache_key("Tests\\Mapping\\ChildEntity"),
        "Tests\\Mapping\\ChildEntity$CLASSMETADATA"
    );
    assert_eq!(metadata_cache_key("Foo"), "Foo$CLASSMETADATA");
}
