use std::any::{TypeId, type_name};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use crate::container::{Container, ResolveContext, ResolveError};
use crate::registry::{Handle, Registration};

/// A bounded resolution context with its own cache for scoped instances.
///
/// Created via [`Container::create_scope`]. Scoped registrations resolve to
/// one instance per scope; singleton and transient registrations delegate to
/// the container with this scope threaded through, so scoped dependencies
/// nested anywhere in the graph still land in this scope's cache. Ending the
/// scope discards its cache; the container's registrations and singletons are
/// unaffected.
///
/// # Examples
///
/// ```rust
/// use solder::Container;
/// use std::rc::Rc;
///
/// struct Session {
///     user: String,
/// }
///
/// let mut container = Container::new();
/// container.register_scoped_with::<Session, _>(|_| {
///     Ok(Rc::new(Session {
///         user: "alice".to_string(),
///     }))
/// });
///
/// let scope_a = container.create_scope();
/// let scope_b = container.create_scope();
/// let from_a = scope_a.resolve::<Session>().unwrap();
/// let from_b = scope_b.resolve::<Session>().unwrap();
/// assert!(!Rc::ptr_eq(&from_a, &from_b));
/// ```
pub struct Scope<'a> {
    container: &'a Container,
    cache: RefCell<HashMap<TypeId, Handle>>,
    ended: Cell<bool>,
}

impl<'a> Scope<'a> {
    pub(crate) fn new(container: &'a Container) -> Self {
        Self {
            container,
            cache: RefCell::new(HashMap::new()),
            ended: Cell::new(false),
        }
    }

    /// Resolves an instance of `A` within this scope.
    ///
    /// Fails with [`ResolveError::ScopeEnded`] after [`end`](Scope::end) has
    /// been called, and with [`ResolveError::NotRegistered`] under the same
    /// condition as the container.
    pub fn resolve<A>(&self) -> Result<Rc<A>, ResolveError>
    where
        A: ?Sized + 'static,
    {
        if self.ended.get() {
            return Err(ResolveError::ScopeEnded {
                type_name: type_name::<A>(),
            });
        }
        ResolveContext::scoped(self.container, self).resolve()
    }

    /// Returns the cached scoped instance or constructs it once through the
    /// engine, with this scope threaded through for nested dependencies.
    pub(crate) fn resolve_scoped(
        &self,
        cx: &ResolveContext<'_>,
        entry: &Registration,
        key: TypeId,
    ) -> Result<Handle, ResolveError> {
        if let Some(cached) = self.cache.borrow().get(&key) {
            tracing::trace!(ty = entry.type_name, "Reusing scoped instance");
            return Ok(cached.clone());
        }
        let instance = self.container.construct(cx, entry, key)?;
        self.cache.borrow_mut().insert(key, instance.clone());
        Ok(instance)
    }

    /// Ends the scope, discarding all scoped instances.
    ///
    /// Idempotent. Further resolutions through this scope fail with
    /// [`ResolveError::ScopeEnded`].
    pub fn end(&self) {
        tracing::debug!("Ending scope");
        self.cache.borrow_mut().clear();
        self.ended.set(true);
    }

    /// Checks whether [`end`](Scope::end) has been called.
    pub fn has_ended(&self) -> bool {
        self.ended.get()
    }
}
