//! Bridges between Rust types and [`Value`].
//!
//! - [`Typed`]: type identity of a Rust type inside the pinwire universe
//! - [`FromValue`]: extract a Rust value from a [`Value`]
//! - [`IntoValue`]: wrap a Rust value into a [`Value`]
//!
//! These let converters be written as plain strongly-typed closures; the
//! closure's parameter and return types supply the edge's source and
//! destination types.
//!
//! ## Supported Types
//!
//! - Integers: `i8`, `i16`, `i32`, `i64`, `u8`, `u16`, `u32`, `u64`
//! - Floats: `f32`, `f64`
//! - `bool`, `String`
//! - `Vec<T>` for any supported `T` (typed arrays)
//! - `Value` itself (the universal `object` type)
//!
//! ## Example
//!
//! ```
//! use pinwire_core::{FromValue, IntoValue, Value};
//!
//! let value = 42i32.into_value();
//! let back = i32::from_value(value).unwrap();
//! assert_eq!(back, 42);
//! ```

use crate::{ArrayValue, ConversionError, TypeHash, Value, primitives};

/// Type identity of a Rust type.
pub trait Typed: 'static {
    /// Hash of the pinwire type this Rust type maps to.
    fn type_hash() -> TypeHash;

    /// Display name of the pinwire type.
    fn type_name() -> &'static str;
}

/// Extract a Rust value from a [`Value`].
pub trait FromValue: Sized {
    /// Returns a `ConversionError` if the value holds an incompatible variant.
    fn from_value(value: Value) -> Result<Self, ConversionError>;
}

/// Wrap a Rust value into a [`Value`].
pub trait IntoValue {
    fn into_value(self) -> Value;
}

// ============================================================================
// Primitive implementations
// ============================================================================

macro_rules! impl_primitive {
    ($($ty:ty => $variant:ident, $hash:expr, $name:literal);* $(;)?) => {
        $(
            impl Typed for $ty {
                fn type_hash() -> TypeHash {
                    $hash
                }

                fn type_name() -> &'static str {
                    $name
                }
            }

            impl FromValue for $ty {
                fn from_value(value: Value) -> Result<Self, ConversionError> {
                    match value {
                        Value::$variant(v) => Ok(v),
                        Value::Null => Err(ConversionError::NullValue($name.to_string())),
                        other => Err(ConversionError::mismatch($name, other.type_name())),
                    }
                }
            }

            impl IntoValue for $ty {
                fn into_value(self) -> Value {
                    Value::$variant(self)
                }
            }

            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(v)
                }
            }
        )*
    };
}

impl_primitive! {
    bool => Bool, primitives::BOOL, "bool";
    i8 => Int8, primitives::INT8, "int8";
    i16 => Int16, primitives::INT16, "int16";
    i32 => Int32, primitives::INT32, "int";
    i64 => Int64, primitives::INT64, "int64";
    u8 => UInt8, primitives::UINT8, "uint8";
    u16 => UInt16, primitives::UINT16, "uint16";
    u32 => UInt32, primitives::UINT32, "uint";
    u64 => UInt64, primitives::UINT64, "uint64";
    f32 => Float, primitives::FLOAT, "float";
    f64 => Double, primitives::DOUBLE, "double";
    String => String, primitives::STRING, "string";
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

// ============================================================================
// Value (the universal object type)
// ============================================================================

impl Typed for Value {
    fn type_hash() -> TypeHash {
        primitives::OBJECT
    }

    fn type_name() -> &'static str {
        "object"
    }
}

impl FromValue for Value {
    fn from_value(value: Value) -> Result<Self, ConversionError> {
        Ok(value)
    }
}

impl IntoValue for Value {
    fn into_value(self) -> Value {
        self
    }
}

// ============================================================================
// Arrays
// ============================================================================

impl<T: Typed> Typed for Vec<T> {
    fn type_hash() -> TypeHash {
        TypeHash::array_of(T::type_hash())
    }

    fn type_name() -> &'static str {
        "array"
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    fn from_value(value: Value) -> Result<Self, ConversionError> {
        match value {
            Value::Array(array) => array.into_items().into_iter().map(T::from_value).collect(),
            Value::Null => Err(ConversionError::NullValue("array".to_string())),
            other => Err(ConversionError::mismatch("array", other.type_name())),
        }
    }
}

impl<T: Typed + IntoValue> IntoValue for Vec<T> {
    fn into_value(self) -> Value {
        let items = self.into_iter().map(IntoValue::into_value).collect();
        Value::Array(ArrayValue::typed(T::type_hash(), items))
    }
}
