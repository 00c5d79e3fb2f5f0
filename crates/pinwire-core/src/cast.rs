//! Value casts between primitive kinds.
//!
//! This is the apply-time half of the "mutually convertible primitives"
//! strategy: integers are range-checked, floating point values are rounded
//! half-to-even before narrowing to an integer, booleans map to `0`/`1`, and
//! strings are parsed.

use crate::{ConversionError, PrimitiveKind, Value};

/// Cast a primitive value into the given primitive kind.
///
/// # Errors
///
/// - [`ConversionError::Overflow`] if the value does not fit `target`
/// - [`ConversionError::Parse`] if a string does not parse as `target`
/// - [`ConversionError::NullValue`] for [`Value::Null`]
/// - [`ConversionError::TypeMismatch`] for arrays and objects
pub fn cast_primitive(value: Value, target: PrimitiveKind) -> Result<Value, ConversionError> {
    if target == PrimitiveKind::String {
        return match value {
            Value::Null => Err(ConversionError::NullValue(target.name().to_string())),
            Value::Array(_) | Value::Object(_) => {
                Err(ConversionError::mismatch("primitive", value.type_name()))
            }
            other => Ok(Value::String(other.to_text())),
        };
    }

    match value {
        Value::Null => Err(ConversionError::NullValue(target.name().to_string())),
        Value::Bool(b) => from_integer(i128::from(b), target),
        Value::Int8(v) => from_integer(i128::from(v), target),
        Value::Int16(v) => from_integer(i128::from(v), target),
        Value::Int32(v) => from_integer(i128::from(v), target),
        Value::Int64(v) => from_integer(i128::from(v), target),
        Value::UInt8(v) => from_integer(i128::from(v), target),
        Value::UInt16(v) => from_integer(i128::from(v), target),
        Value::UInt32(v) => from_integer(i128::from(v), target),
        Value::UInt64(v) => from_integer(i128::from(v), target),
        Value::Float(v) => from_float(f64::from(v), target),
        Value::Double(v) => from_float(v, target),
        Value::String(s) => parse(&s, target),
        other => Err(ConversionError::mismatch("primitive", other.type_name())),
    }
}

fn overflow(value: impl ToString, target: PrimitiveKind) -> ConversionError {
    ConversionError::Overflow {
        value: value.to_string(),
        target: target.name(),
    }
}

fn from_integer(n: i128, target: PrimitiveKind) -> Result<Value, ConversionError> {
    let out = match target {
        PrimitiveKind::Bool => Value::Bool(n != 0),
        PrimitiveKind::Int8 => Value::Int8(i8::try_from(n).map_err(|_| overflow(n, target))?),
        PrimitiveKind::Int16 => Value::Int16(i16::try_from(n).map_err(|_| overflow(n, target))?),
        PrimitiveKind::Int32 => Value::Int32(i32::try_from(n).map_err(|_| overflow(n, target))?),
        PrimitiveKind::Int64 => Value::Int64(i64::try_from(n).map_err(|_| overflow(n, target))?),
        PrimitiveKind::Uint8 => Value::UInt8(u8::try_from(n).map_err(|_| overflow(n, target))?),
        PrimitiveKind::Uint16 => {
            Value::UInt16(u16::try_from(n).map_err(|_| overflow(n, target))?)
        }
        PrimitiveKind::Uint32 => {
            Value::UInt32(u32::try_from(n).map_err(|_| overflow(n, target))?)
        }
        PrimitiveKind::Uint64 => {
            Value::UInt64(u64::try_from(n).map_err(|_| overflow(n, target))?)
        }
        PrimitiveKind::Float => Value::Float(n as f32),
        PrimitiveKind::Double => Value::Double(n as f64),
        PrimitiveKind::String => Value::String(n.to_string()),
    };
    Ok(out)
}

fn from_float(v: f64, target: PrimitiveKind) -> Result<Value, ConversionError> {
    match target {
        PrimitiveKind::Bool => Ok(Value::Bool(v != 0.0)),
        PrimitiveKind::Float => {
            let narrowed = v as f32;
            if v.is_finite() && narrowed.is_infinite() {
                return Err(overflow(v, target));
            }
            Ok(Value::Float(narrowed))
        }
        PrimitiveKind::Double => Ok(Value::Double(v)),
        PrimitiveKind::String => Ok(Value::String(v.to_string())),
        _ => {
            let rounded = v.round_ties_even();
            // i128 covers every integer target; anything outside it overflows
            if !rounded.is_finite() || rounded < i128::MIN as f64 || rounded >= i128::MAX as f64 {
                return Err(overflow(v, target));
            }
            from_integer(rounded as i128, target).map_err(|_| overflow(v, target))
        }
    }
}

fn parse(text: &str, target: PrimitiveKind) -> Result<Value, ConversionError> {
    let trimmed = text.trim();
    let failed = || ConversionError::Parse {
        input: text.to_string(),
        target: target.name(),
    };

    match target {
        PrimitiveKind::Bool => {
            if trimmed.eq_ignore_ascii_case("true") {
                Ok(Value::Bool(true))
            } else if trimmed.eq_ignore_ascii_case("false") {
                Ok(Value::Bool(false))
            } else {
                Err(failed())
            }
        }
        PrimitiveKind::Float => trimmed.parse::<f32>().map(Value::Float).map_err(|_| failed()),
        PrimitiveKind::Double => trimmed.parse::<f64>().map(Value::Double).map_err(|_| failed()),
        PrimitiveKind::String => Ok(Value::String(text.to_string())),
        _ => {
            let n = trimmed.parse::<i128>().map_err(|_| failed())?;
            from_integer(n, target)
        }
    }
}
