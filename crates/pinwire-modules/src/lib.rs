//! Built-in converter modules for pinwire.
//!
//! - **numeric** - widening converters between integer and floating point
//!   primitives, plus `bool -> int`
//! - **text** - parsing `string` into primitives, formatting `double`
//! - **sequence** - the `Sequence<T>` generic container and converter
//!   factories between sequences and arrays
//!
//! # Usage
//!
//! Each module provides a function that returns a `Module` which can be
//! installed into a registry:
//!
//! ```
//! use pinwire_registry::ConverterRegistry;
//!
//! let mut registry = ConverterRegistry::new();
//! for module in pinwire_modules::default_modules() {
//!     module.install_into(&mut registry).unwrap();
//! }
//! assert!(registry.factory_count() >= 3);
//! ```

pub mod numeric;
pub mod sequence;
pub mod text;

pub use sequence::{Sequence, sequence_of, sequence_type};

use pinwire_registry::Module;

/// Every built-in module, in installation order.
pub fn default_modules() -> Vec<Module> {
    vec![numeric::module(), text::module(), sequence::module()]
}
