//! Core types for pinwire.
//!
//! This crate holds everything the converter registry and resolver build on:
//!
//! - [`TypeHash`] - deterministic type identity
//! - [`TypeCatalog`] / [`TypeUniverse`] - the explicit type registry and the
//!   structural view the resolver consumes
//! - [`Value`] - runtime values flowing across graph edges
//! - [`Typed`], [`FromValue`], [`IntoValue`] - bridges to Rust types
//! - [`cast_primitive`] - value casts between primitive kinds
//! - [`RegistrationError`], [`ConversionError`] - the error taxonomy

mod cast;
mod catalog;
mod convert;
mod entry;
mod error;
mod primitive_kind;
mod type_hash;
mod value;

pub use cast::cast_primitive;
pub use catalog::{MAX_ARRAY_RANK, TypeCatalog, TypeUniverse};
pub use convert::{FromValue, IntoValue, Typed};
pub use entry::{DefaultFn, TypeEntry, TypeKind};
pub use error::{ConversionError, RegistrationError};
pub use primitive_kind::PrimitiveKind;
pub use type_hash::{TypeHash, hash_constants, primitives};
pub use value::{ArrayValue, ObjectValue, Value};
