//! pinwire - type-directed conversion resolution for dataflow graph pins.
//!
//! When a graph edge connects two pins of different types, the runtime
//! asks pinwire for a converter between them. Converters come from direct
//! registrations, factories for whole families of types, or are
//! synthesised on demand (casts, array mapping, chaining, base types).
//!
//! # Crates
//!
//! - `pinwire-core` - type identity, the type catalog, runtime values
//! - `pinwire-registry` - the converter registry and resolver
//! - `pinwire-modules` - built-in converter modules
//!
//! # Example
//!
//! ```
//! use pinwire::{ConversionEdge, Context, Module, TypeEntry, TypeHash, Value, primitives};
//!
//! let celsius = TypeHash::from_name("Celsius");
//! let module = Module::new("weather")
//!     .ty(TypeEntry::class("Celsius"))
//!     .converter(ConversionEdge::new(celsius, primitives::DOUBLE, Ok));
//!
//! let mut ctx = Context::with_default_modules().unwrap();
//! ctx.install(module).unwrap();
//!
//! // Celsius -> double -> string, the second hop from the text module.
//! let edge = ctx.converter(celsius, primitives::STRING).unwrap();
//! assert_eq!(edge.apply(Value::Double(21.5)), Ok(Value::from("21.5")));
//! ```

mod context;

pub use context::{Context, ContextError};

pub use pinwire_core::{
    ArrayValue, ConversionError, FromValue, IntoValue, MAX_ARRAY_RANK, ObjectValue,
    PrimitiveKind, RegistrationError, TypeCatalog, TypeEntry, TypeHash, TypeKind, TypeUniverse,
    Typed, Value, primitives,
};
pub use pinwire_modules::{Sequence, default_modules, sequence_of, sequence_type};
pub use pinwire_registry::{
    ConversionEdge, ConverterRegistry, DuplicatePolicy, DynamicConverterFactory, Module,
    RegistryOptions, Resolver, Strategy, TypeShape,
};

/// Built-in modules.
pub mod modules {
    pub use pinwire_modules::{numeric, sequence, text};
}
