//! Converter registry and resolver for pinwire.
//!
//! - [`ConverterRegistry`] - stores direct converters, converter factories
//!   and the type catalog
//! - [`Resolver`] - synthesises converters over a registry snapshot
//! - [`ConversionEdge`] - a converter between two types
//! - [`DynamicConverterFactory`] / [`TypeShape`] - converters built on
//!   demand for whole families of types
//! - [`Module`] - a bundle of registrations installed in one call
//!
//! # Example
//!
//! ```
//! use pinwire_core::{Value, primitives};
//! use pinwire_registry::{ConversionEdge, ConverterRegistry};
//!
//! let mut registry = ConverterRegistry::new();
//! registry
//!     .add_converter(ConversionEdge::from_fn(|x: i32| f64::from(x)))
//!     .unwrap();
//! registry
//!     .add_converter(ConversionEdge::from_fn(|x: f64| format!("{x:.2}")))
//!     .unwrap();
//!
//! // int -> double -> string, composed on demand.
//! let edge = registry.get_converter(primitives::INT32, primitives::STRING).unwrap();
//! assert_eq!(edge.apply(Value::Int32(3)), Ok(Value::from("3.00")));
//! ```

mod edge;
mod factory;
mod module;
mod options;
mod registry;
mod resolver;
mod shape;

pub use edge::{ConversionEdge, ConvertFn};
pub use factory::{DynamicConverterFactory, FactoryFn};
pub use module::Module;
pub use options::{DuplicatePolicy, RegistryOptions};
pub use registry::ConverterRegistry;
pub use resolver::{Resolver, Strategy};
pub use shape::TypeShape;
