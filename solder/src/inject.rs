//! The construction recipe trait for self-registering types.
//!
//! A type implementing [`Injectable`] carries exactly one way to build
//! itself from resolved dependencies, which removes any ambiguity about
//! constructor selection: the recipe is the constructor. Implementations
//! resolve each dependency through the [`ResolveContext`] in the order the
//! fields are declared.
//!
//! With the `macros` feature enabled the implementation can be derived for
//! structs whose dependency fields are `Rc<_>` handles.
//!
//! # Examples
//!
//! ```rust
//! use solder::{Container, Injectable, ResolveContext, ResolveError};
//! use std::rc::Rc;
//!
//! struct Config {
//!     retries: u32,
//! }
//!
//! struct Client {
//!     config: Rc<Config>,
//! }
//!
//! impl Injectable for Client {
//!     fn inject(cx: &ResolveContext<'_>) -> Result<Self, ResolveError> {
//!         Ok(Self {
//!             config: cx.resolve()?,
//!         })
//!     }
//! }
//!
//! let mut container = Container::new();
//! container.register_instance(Rc::new(Config { retries: 3 }));
//! container.register_transient::<Client>();
//!
//! let client = container.resolve::<Client>().unwrap();
//! assert_eq!(client.config.retries, 3);
//! ```

use crate::{ResolveContext, ResolveError};

/// Type alias for boxed errors that can be sent across threads.
///
/// Construction recipes that fail for domain reasons convert their errors
/// into this type; the engine reports them as
/// [`ResolveError::Construction`](crate::ResolveError::Construction).
pub type StdError = Box<dyn std::error::Error + Send + Sync>;

/// A type that constructs itself from dependencies resolved through the
/// container.
pub trait Injectable: Sized + 'static {
    /// Builds an instance, resolving each dependency through `cx`.
    ///
    /// The context carries the active scope and the in-progress resolution
    /// stack, so dependencies resolved here follow the same lifetime and
    /// cycle rules as the outer resolution.
    fn inject(cx: &ResolveContext<'_>) -> Result<Self, ResolveError>;
}
