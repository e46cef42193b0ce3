use std::any::{Any, TypeId};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::{ResolveContext, ResolveError};

/// Specifies the lifetime of a registration in the container.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lifetime {
    /// A new instance is created every time the type is resolved.
    #[default]
    Transient,
    /// A single instance is created lazily and shared for the lifetime of the
    /// container.
    Singleton,
    /// A single instance is created lazily and shared within a scope.
    Scoped,
}

/// Type-erased instance handle. The payload is always the typed `Rc<A>`
/// handle under which the registration was keyed.
pub(crate) type Handle = Rc<dyn Any>;

/// Construction recipe stored with a registration.
pub(crate) type Factory = Rc<dyn Fn(&ResolveContext<'_>) -> Result<Handle, ResolveError>>;

/// A single registration: how to construct the type and how long to keep it.
pub(crate) struct Registration {
    pub(crate) type_name: &'static str,
    pub(crate) lifetime: Lifetime,
    pub(crate) factory: Factory,
    /// Lazily populated, meaningful only for `Lifetime::Singleton`.
    pub(crate) singleton: RefCell<Option<Handle>>,
}

/// Mapping from abstract-type identity to its registration.
///
/// Owned exclusively by the container. Inserting under an existing key
/// overwrites the prior entry, dropping any singleton cached for it.
pub(crate) struct Registry {
    entries: HashMap<TypeId, Registration>,
}

impl Registry {
    pub(crate) fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    pub(crate) fn insert(&mut self, key: TypeId, registration: Registration) {
        self.entries.insert(key, registration);
    }

    pub(crate) fn get(&self, key: &TypeId) -> Option<&Registration> {
        self.entries.get(key)
    }

    pub(crate) fn contains(&self, key: &TypeId) -> bool {
        self.entries.contains_key(key)
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}
