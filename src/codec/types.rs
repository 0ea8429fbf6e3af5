//! Type-name resolution
//!
//! A type parameter may arrive as a raw tag or as a name; names go through
//! a `TypeResolver`. `TypeCatalog` is the in-process default.

use crate::value::TypeTag;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use once_cell::sync::Lazy;
use std::sync::atomic::{AtomicU16, Ordering};
use std::sync::Arc;

/// Maps type names to tags
pub trait TypeResolver: Send + Sync {
    fn resolve(&self, name: &str) -> Option<TypeTag>;

    /// Reverse lookup, for diagnostics
    fn name_of(&self, _tag: TypeTag) -> Option<String> {
        None
    }
}

/// Concurrent name <-> tag table, tags allocated densely from zero
#[derive(Debug, Default)]
pub struct TypeCatalog {
    by_name: DashMap<String, TypeTag>,
    by_tag: DashMap<TypeTag, String>,
    next: AtomicU16,
}

static SHARED: Lazy<Arc<TypeCatalog>> = Lazy::new(|| Arc::new(TypeCatalog::new()));

impl TypeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog pre-populated with `names`, tagged in order
    pub fn with_types<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let catalog = Self::new();
        for name in names {
            let _ = catalog.define(name.as_ref());
        }
        catalog
    }

    /// Process-wide catalog used by the global registry
    pub fn shared() -> Arc<TypeCatalog> {
        Arc::clone(&SHARED)
    }

    /// Define `name`, returning its tag; defining twice returns the same tag.
    /// `None` once every tag below `NOTYPE` is taken.
    pub fn define(&self, name: &str) -> Option<TypeTag> {
        match self.by_name.entry(name.to_string()) {
            Entry::Occupied(entry) => Some(*entry.get()),
            Entry::Vacant(entry) => {
                let raw = self
                    .next
                    .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| {
                        (n < TypeTag::NOTYPE.raw()).then(|| n + 1)
                    })
                    .ok()?;
                let tag = TypeTag::new(raw);
                self.by_tag.insert(tag, name.to_string());
                entry.insert(tag);
                Some(tag)
            }
        }
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

impl TypeResolver for TypeCatalog {
    fn resolve(&self, name: &str) -> Option<TypeTag> {
        self.by_name.get(name).map(|entry| *entry.value())
    }

    fn name_of(&self, tag: TypeTag) -> Option<String> {
        self.by_tag.get(&tag).map(|entry| entry.value().clone())
    }
}
