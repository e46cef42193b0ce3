//! # solder
//!
//! A lifetime-aware dependency injection container for Rust applications.
//! Abstractions are registered against construction recipes, and the container
//! wires up whole object graphs on demand, honoring one of three lifetime
//! policies.
//!
//! ## Core Concepts
//!
//! - **Container**: The composition root holding the registration table and
//!   all singleton instances
//! - **Lifetime**: Governs instance reuse — `Transient` (fresh every time),
//!   `Singleton` (one per container), `Scoped` (one per scope)
//! - **Scope**: A bounded resolution context with its own cache for scoped
//!   instances
//! - **Injectable**: A trait for types that construct themselves from
//!   resolved dependencies
//!
//! Resolved instances are handed out as `Rc<A>`; the container is
//! single-threaded by design and performs no locking.
//!
//! ## Basic Usage
//!
//! Binding a trait to an implementation with a factory closure:
//!
//! ```rust
//! use solder::Container;
//! use std::rc::Rc;
//!
//! trait Animal {
//!     fn sound(&self) -> &'static str;
//! }
//!
//! struct Cat;
//!
//! impl Animal for Cat {
//!     fn sound(&self) -> &'static str {
//!         "Meow"
//!     }
//! }
//!
//! let mut container = Container::new();
//! container.register_transient_with::<dyn Animal, _>(|_| Ok(Rc::new(Cat)));
//!
//! let animal = container.resolve::<dyn Animal>().unwrap();
//! assert_eq!(animal.sound(), "Meow");
//! ```
//!
//! ## Dependencies
//!
//! Factories receive a [`ResolveContext`] and pull their own dependencies
//! through it, so registrations compose into arbitrarily deep graphs:
//!
//! ```rust
//! use solder::Container;
//! use std::rc::Rc;
//!
//! struct Database {
//!     url: String,
//! }
//!
//! struct UserService {
//!     database: Rc<Database>,
//! }
//!
//! let mut container = Container::new();
//! container.register_singleton_with::<Database, _>(|_| {
//!     Ok(Rc::new(Database {
//!         url: "sqlite::memory:".to_string(),
//!     }))
//! });
//! container.register_transient_with::<UserService, _>(|cx| {
//!     Ok(Rc::new(UserService {
//!         database: cx.resolve()?,
//!     }))
//! });
//!
//! let service = container.resolve::<UserService>().unwrap();
//! assert_eq!(service.database.url, "sqlite::memory:");
//! ```
//!
//! ## Scopes
//!
//! Scoped registrations produce one instance per [`Scope`]; ending a scope
//! discards its cache while singletons stay container-wide:
//!
//! ```rust
//! use solder::Container;
//! use std::rc::Rc;
//!
//! struct Session {
//!     id: u32,
//! }
//!
//! let mut container = Container::new();
//! container.register_scoped_with::<Session, _>(|_| Ok(Rc::new(Session { id: 7 })));
//!
//! let scope = container.create_scope();
//! let first = scope.resolve::<Session>().unwrap();
//! let second = scope.resolve::<Session>().unwrap();
//! assert!(Rc::ptr_eq(&first, &second));
//! assert_eq!(first.id, 7);
//! scope.end();
//! ```
//!
//! ## Using Macros
//!
//! With the `macros` feature enabled, construction recipes for plain structs
//! can be derived; every `Rc<_>` field is resolved through the container in
//! declared order:
//!
//! ```rust
//! use solder::{Container, Injectable};
//! use std::rc::Rc;
//!
//! struct Config {
//!     greeting: String,
//! }
//!
//! #[derive(Injectable)]
//! struct Greeter {
//!     config: Rc<Config>,
//! }
//!
//! let mut container = Container::new();
//! container.register_instance(Rc::new(Config {
//!     greeting: "hello".to_string(),
//! }));
//! container.register_transient::<Greeter>();
//!
//! let greeter = container.resolve::<Greeter>().unwrap();
//! assert_eq!(greeter.config.greeting, "hello");
//! ```
//!
//! ## Features
//!
//! - `macros` (default): Enables the `Injectable` derive macro

mod container;
mod inject;
mod registry;
mod scope;

pub use container::*;
pub use inject::*;
pub use registry::*;
pub use scope::*;

#[cfg(feature = "macros")]
pub use solder_macros::*;
