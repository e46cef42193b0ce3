use std::any::{TypeId, type_name};
use std::cell::RefCell;
use std::rc::Rc;

use crate::registry::{Factory, Handle, Registration, Registry};
use crate::scope::Scope;
use crate::{Injectable, Lifetime, StdError};

/// The composition root of an object graph.
///
/// A container owns the registration table and all singleton instances.
/// Registrations map an abstract type identity to a construction recipe and a
/// [`Lifetime`]; resolution walks the recipe's dependencies recursively and
/// caches instances according to their lifetime. Independent containers share
/// nothing.
///
/// # Examples
///
/// ```rust
/// use solder::{Container, Lifetime};
/// use std::rc::Rc;
///
/// struct Config {
///     url: String,
/// }
///
/// let mut container = Container::new();
/// container.register_with::<Config, _>(Lifetime::Singleton, |_| {
///     Ok(Rc::new(Config {
///         url: "localhost".to_string(),
///     }))
/// });
///
/// let first = container.resolve::<Config>().unwrap();
/// let second = container.resolve::<Config>().unwrap();
/// assert!(Rc::ptr_eq(&first, &second));
/// ```
pub struct Container {
    registry: Registry,
}

/// Errors that can occur during resolution.
#[derive(Debug)]
pub enum ResolveError {
    /// The requested type has no registration.
    NotRegistered { type_name: &'static str },
    /// The requested type is (transitively) a dependency of itself.
    CircularDependency {
        type_name: &'static str,
        chain: Vec<&'static str>,
    },
    /// A scoped registration was resolved with no active scope.
    MissingScope { type_name: &'static str },
    /// The scope used for resolution has already ended.
    ScopeEnded { type_name: &'static str },
    /// A construction recipe failed.
    Construction(StdError),
}

impl std::fmt::Display for ResolveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResolveError::NotRegistered { type_name } => {
                write!(f, "Type {type_name} not registered")
            }
            ResolveError::CircularDependency { type_name, chain } => {
                write!(
                    f,
                    "Circular dependency detected for {type_name}: {}",
                    chain.join(" -> ")
                )
            }
            ResolveError::MissingScope { type_name } => {
                write!(f, "Type {type_name} is scoped but no scope is active")
            }
            ResolveError::ScopeEnded { type_name } => {
                write!(f, "Cannot resolve {type_name}: scope has ended")
            }
            ResolveError::Construction(e) => write!(f, "Construction failed: {e}"),
        }
    }
}

impl std::error::Error for ResolveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ResolveError::Construction(e) => Some(e.as_ref()),
            _ => None,
        }
    }
}

impl From<StdError> for ResolveError {
    fn from(value: StdError) -> Self {
        Self::Construction(value)
    }
}

impl Container {
    /// Creates an empty container.
    pub fn new() -> Self {
        Self {
            registry: Registry::new(),
        }
    }

    /// Registers a construction recipe for `A` with an explicit lifetime.
    ///
    /// `A` is the abstract identity under which the registration is keyed; it
    /// may be a trait object (`dyn Trait`) or a concrete type. The factory
    /// receives a [`ResolveContext`] through which it resolves its own
    /// dependencies, and coerces its result to `Rc<A>` at the registration
    /// site.
    ///
    /// Registering the same `A` again overwrites the previous entry; a
    /// singleton cached for the overwritten entry is discarded with it.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use solder::{Container, Lifetime};
    /// use std::rc::Rc;
    ///
    /// trait Greeter {
    ///     fn greet(&self) -> String;
    /// }
    ///
    /// struct English;
    ///
    /// impl Greeter for English {
    ///     fn greet(&self) -> String {
    ///         "hello".to_string()
    ///     }
    /// }
    ///
    /// let mut container = Container::new();
    /// container.register_with::<dyn Greeter, _>(Lifetime::Transient, |_| Ok(Rc::new(English)));
    ///
    /// let greeter = container.resolve::<dyn Greeter>().unwrap();
    /// assert_eq!(greeter.greet(), "hello");
    /// ```
    pub fn register_with<A, F>(&mut self, lifetime: Lifetime, factory: F)
    where
        A: ?Sized + 'static,
        F: Fn(&ResolveContext<'_>) -> Result<Rc<A>, ResolveError> + 'static,
    {
        tracing::debug!(ty = type_name::<A>(), lifetime = ?lifetime, "Registering type");
        let factory: Factory =
            Rc::new(move |cx: &ResolveContext<'_>| Ok(Rc::new(factory(cx)?) as Handle));
        self.registry.insert(
            TypeId::of::<A>(),
            Registration {
                type_name: type_name::<A>(),
                lifetime,
                factory,
                singleton: RefCell::new(None),
            },
        );
    }

    /// Registers a transient factory: a new instance on every resolution.
    pub fn register_transient_with<A, F>(&mut self, factory: F)
    where
        A: ?Sized + 'static,
        F: Fn(&ResolveContext<'_>) -> Result<Rc<A>, ResolveError> + 'static,
    {
        self.register_with(Lifetime::Transient, factory)
    }

    /// Registers a singleton factory: the instance is built on first demand
    /// and shared for the container's lifetime.
    pub fn register_singleton_with<A, F>(&mut self, factory: F)
    where
        A: ?Sized + 'static,
        F: Fn(&ResolveContext<'_>) -> Result<Rc<A>, ResolveError> + 'static,
    {
        self.register_with(Lifetime::Singleton, factory)
    }

    /// Registers a scoped factory: one instance per scope, built on first
    /// demand within that scope.
    pub fn register_scoped_with<A, F>(&mut self, factory: F)
    where
        A: ?Sized + 'static,
        F: Fn(&ResolveContext<'_>) -> Result<Rc<A>, ResolveError> + 'static,
    {
        self.register_with(Lifetime::Scoped, factory)
    }

    /// Registers an [`Injectable`] type as itself with an explicit lifetime.
    pub fn register<C>(&mut self, lifetime: Lifetime)
    where
        C: Injectable,
    {
        self.register_with(lifetime, |cx: &ResolveContext<'_>| {
            Ok(Rc::new(C::inject(cx)?))
        });
    }

    /// Registers an [`Injectable`] type as itself, transient.
    pub fn register_transient<C>(&mut self)
    where
        C: Injectable,
    {
        self.register::<C>(Lifetime::Transient)
    }

    /// Registers an [`Injectable`] type as itself, singleton.
    pub fn register_singleton<C>(&mut self)
    where
        C: Injectable,
    {
        self.register::<C>(Lifetime::Singleton)
    }

    /// Registers an [`Injectable`] type as itself, scoped.
    pub fn register_scoped<C>(&mut self)
    where
        C: Injectable,
    {
        self.register::<C>(Lifetime::Scoped)
    }

    /// Registers an already-constructed instance as a singleton for `A`.
    ///
    /// The supplied handle becomes the cached singleton immediately; no
    /// construction ever runs for this registration.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use solder::Container;
    /// use std::rc::Rc;
    ///
    /// struct Config {
    ///     url: String,
    /// }
    ///
    /// let config = Rc::new(Config {
    ///     url: "localhost".to_string(),
    /// });
    ///
    /// let mut container = Container::new();
    /// container.register_instance(config.clone());
    ///
    /// let resolved = container.resolve::<Config>().unwrap();
    /// assert!(Rc::ptr_eq(&resolved, &config));
    /// ```
    pub fn register_instance<A>(&mut self, instance: Rc<A>)
    where
        A: ?Sized + 'static,
    {
        tracing::debug!(ty = type_name::<A>(), "Registering instance as singleton");
        let cached: Handle = Rc::new(instance.clone());
        let factory: Factory =
            Rc::new(move |_: &ResolveContext<'_>| Ok(Rc::new(instance.clone()) as Handle));
        self.registry.insert(
            TypeId::of::<A>(),
            Registration {
                type_name: type_name::<A>(),
                lifetime: Lifetime::Singleton,
                factory,
                singleton: RefCell::new(Some(cached)),
            },
        );
    }

    /// Checks whether `A` has a registration.
    pub fn has_registration<A>(&self) -> bool
    where
        A: ?Sized + 'static,
    {
        self.registry.contains(&TypeId::of::<A>())
    }

    /// Resolves an instance of `A` at the root, with no active scope.
    ///
    /// Fails with [`ResolveError::NotRegistered`] if `A` has no registration
    /// and with [`ResolveError::MissingScope`] if `A` is registered scoped.
    pub fn resolve<A>(&self) -> Result<Rc<A>, ResolveError>
    where
        A: ?Sized + 'static,
    {
        ResolveContext::root(self).resolve()
    }

    /// Creates a new scope for resolving scoped registrations.
    ///
    /// A container may have any number of scopes alive at once; each owns an
    /// independent cache.
    pub fn create_scope(&self) -> Scope<'_> {
        tracing::debug!("Creating scope");
        Scope::new(self)
    }

    /// Lifetime dispatch for a single resolution step. Scoped entries are
    /// delegated to the active scope; everything else is handled here.
    pub(crate) fn resolve_erased(
        &self,
        cx: &ResolveContext<'_>,
        key: TypeId,
        requested: &'static str,
    ) -> Result<Handle, ResolveError> {
        let entry = self.registry.get(&key).ok_or(ResolveError::NotRegistered {
            type_name: requested,
        })?;
        match entry.lifetime {
            Lifetime::Singleton => {
                if let Some(cached) = entry.singleton.borrow().as_ref() {
                    tracing::trace!(ty = entry.type_name, "Reusing cached singleton");
                    return Ok(cached.clone());
                }
                let instance = self.construct(cx, entry, key)?;
                *entry.singleton.borrow_mut() = Some(instance.clone());
                Ok(instance)
            }
            Lifetime::Transient => self.construct(cx, entry, key),
            Lifetime::Scoped => match cx.scope {
                Some(scope) => scope.resolve_scoped(cx, entry, key),
                None => Err(ResolveError::MissingScope {
                    type_name: entry.type_name,
                }),
            },
        }
    }

    /// Runs a registration's factory under the context's cycle guard.
    pub(crate) fn construct(
        &self,
        cx: &ResolveContext<'_>,
        entry: &Registration,
        key: TypeId,
    ) -> Result<Handle, ResolveError> {
        cx.enter(key, entry.type_name)?;
        tracing::trace!(ty = entry.type_name, "Constructing instance");
        let result = (entry.factory)(cx);
        cx.exit(key);
        result
    }
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Container {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Container")
            .field("registered", &self.registry.len())
            .finish()
    }
}

/// The context threaded through one top-level resolution call.
///
/// Carries the originating container, the active scope (if any), and the
/// stack of types currently being constructed. Factories and [`Injectable`]
/// implementations receive a reference to the context and resolve their
/// dependencies through it, so nested resolutions share the same scope and
/// cycle guard.
pub struct ResolveContext<'a> {
    container: &'a Container,
    scope: Option<&'a Scope<'a>>,
    resolving: RefCell<Vec<(TypeId, &'static str)>>,
}

impl<'a> ResolveContext<'a> {
    pub(crate) fn root(container: &'a Container) -> Self {
        Self {
            container,
            scope: None,
            resolving: RefCell::new(Vec::new()),
        }
    }

    pub(crate) fn scoped(container: &'a Container, scope: &'a Scope<'a>) -> Self {
        Self {
            container,
            scope: Some(scope),
            resolving: RefCell::new(Vec::new()),
        }
    }

    /// Resolves a dependency, carrying this context's scope and cycle guard.
    pub fn resolve<A>(&self) -> Result<Rc<A>, ResolveError>
    where
        A: ?Sized + 'static,
    {
        let handle = self
            .container
            .resolve_erased(self, TypeId::of::<A>(), type_name::<A>())?;
        // Registrations key the stored handle under the same `A`, so the
        // payload is always an `Rc<A>`.
        Ok(handle
            .downcast_ref::<Rc<A>>()
            .expect("handle payload matches registration key")
            .clone())
    }

    fn enter(&self, key: TypeId, ty: &'static str) -> Result<(), ResolveError> {
        let mut resolving = self.resolving.borrow_mut();
        if resolving.iter().any(|(in_progress, _)| *in_progress == key) {
            let mut chain: Vec<&'static str> =
                resolving.iter().map(|(_, name)| *name).collect();
            chain.push(ty);
            return Err(ResolveError::CircularDependency {
                type_name: ty,
                chain,
            });
        }
        resolving.push((key, ty));
        Ok(())
    }

    fn exit(&self, key: TypeId) {
        let popped = self.resolving.borrow_mut().pop();
        debug_assert_eq!(popped.map(|(in_progress, _)| in_progress), Some(key));
    }
}
