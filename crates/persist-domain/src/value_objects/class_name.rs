//! Class-name helpers
//!
//! Pure string transforms used before any structural lookup happens.
//! Resolving a name is a two-stage affair: these functions turn an alias or
//! proxy name into a fully-qualified class name, and a reflection service
//! then decides whether that class exists.

use crate::constants::{
    ALIAS_SEPARATOR, CLASS_METADATA_CACHE_SALT, NAMESPACE_SEPARATOR, PROXY_MARKER,
};

/// Split `alias:Rest` on the first alias separator.
///
/// Returns `None` for names without an alias prefix.
///
/// ```
/// use persist_domain::value_objects::class_name::split_alias;
///
/// assert_eq!(split_alias("app:User"), Some(("app", "User")));
/// assert_eq!(split_alias("app:User:Address"), Some(("app", "User:Address")));
/// assert_eq!(split_alias("App\\Entity\\User"), None);
/// ```
pub fn split_alias(class_name: &str) -> Option<(&str, &str)> {
    class_name.split_once(ALIAS_SEPARATOR)
}

/// Join a namespace and the remainder of an aliased name.
///
/// Every further alias separator in `rest` introduces a nested class name,
/// so `Foo:Bar` under `App` becomes `App\Foo\Bar`.
///
/// ```
/// use persist_domain::value_objects::class_name::fqcn_from_alias;
///
/// assert_eq!(fqcn_from_alias("App\\Entity", "User"), "App\\Entity\\User");
/// assert_eq!(fqcn_from_alias("App\\Entity", "User:Address"), "App\\Entity\\User\\Address");
/// ```
pub fn fqcn_from_alias(namespace: &str, rest: &str) -> String {
    let nested: String = rest
        .chars()
        .map(|c| {
            if c == ALIAS_SEPARATOR {
                NAMESPACE_SEPARATOR
            } else {
                c
            }
        })
        .collect();

    let namespace = namespace.trim_end_matches(NAMESPACE_SEPARATOR);
    if namespace.is_empty() {
        nested
    } else {
        format!("{namespace}{NAMESPACE_SEPARATOR}{nested}")
    }
}

/// Map a generated proxy class name back to the class it proxies.
///
/// Names without the proxy marker segment are returned unchanged.
pub fn real_class_name(class_name: &str) -> &str {
    let marker = format!("{NAMESPACE_SEPARATOR}{PROXY_MARKER}{NAMESPACE_SEPARATOR}");
    match class_name.rfind(&marker) {
        Some(pos) => &class_name[pos + marker.len()..],
        None => class_name,
    }
}

/// Cache key under which the metadata of `fqcn` is stored.
pub fn metadata_cache_key(fqcn: &str) -> String {
    format!("{fqcn}{CLASS_METADATA_CACHE_SALT}")
}

/// The namespace part of a fully-qualified class name, if any.
pub fn namespace_of(fqcn: &str) -> Option<&str> {
    fqcn.rfind(NAMESPACE_SEPARATOR).map(|pos| &fqcn[..pos])
}
