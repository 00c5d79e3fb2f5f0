//! Runtime values flowing across graph edges.
//!
//! [`Value`] is the tagged representation of everything a pin can carry.
//! Every non-null value knows its runtime type ([`Value::runtime_type`]),
//! which is what dynamic-source dispatch and the heterogeneous-array
//! fallback branch on.
//!
//! Arrays are an explicit tagged union: a [`ArrayValue::Typed`] array
//! carries its element type, a [`ArrayValue::Heterogeneous`] array is an
//! `object[]` whose elements may each have a different runtime type.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::{TypeHash, primitives};

/// A dynamic value carried by a pin.
#[derive(Clone, PartialEq)]
pub enum Value {
    /// Absent value.
    Null,
    /// Boolean value
    Bool(bool),
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    UInt8(u8),
    UInt16(u16),
    UInt32(u32),
    UInt64(u64),
    Float(f32),
    Double(f64),
    /// String value (owned)
    String(String),
    /// Typed or heterogeneous array
    Array(ArrayValue),
    /// Instance of a module-registered type
    Object(ObjectValue),
}

impl Value {
    /// The value's actual runtime type, or `None` for [`Value::Null`].
    pub fn runtime_type(&self) -> Option<TypeHash> {
        let hash = match self {
            Value::Null => return None,
            Value::Bool(_) => primitives::BOOL,
            Value::Int8(_) => primitives::INT8,
            Value::Int16(_) => primitives::INT16,
            Value::Int32(_) => primitives::INT32,
            Value::Int64(_) => primitives::INT64,
            Value::UInt8(_) => primitives::UINT8,
            Value::UInt16(_) => primitives::UINT16,
            Value::UInt32(_) => primitives::UINT32,
            Value::UInt64(_) => primitives::UINT64,
            Value::Float(_) => primitives::FLOAT,
            Value::Double(_) => primitives::DOUBLE,
            Value::String(_) => primitives::STRING,
            Value::Array(array) => array.runtime_type(),
            Value::Object(object) => object.type_hash(),
        };
        Some(hash)
    }

    /// Get a human-readable name for this value's variant.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int8(_) => "int8",
            Value::Int16(_) => "int16",
            Value::Int32(_) => "int",
            Value::Int64(_) => "int64",
            Value::UInt8(_) => "uint8",
            Value::UInt16(_) => "uint16",
            Value::UInt32(_) => "uint",
            Value::UInt64(_) => "uint64",
            Value::Float(_) => "float",
            Value::Double(_) => "double",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }

    /// Check if this value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Textual representation, `"null"` for an absent value.
    pub fn to_text(&self) -> String {
        match self {
            Value::Null => "null".to_string(),
            Value::Bool(v) => v.to_string(),
            Value::Int8(v) => v.to_string(),
            Value::Int16(v) => v.to_string(),
            Value::Int32(v) => v.to_string(),
            Value::Int64(v) => v.to_string(),
            Value::UInt8(v) => v.to_string(),
            Value::UInt16(v) => v.to_string(),
            Value::UInt32(v) => v.to_string(),
            Value::UInt64(v) => v.to_string(),
            Value::Float(v) => v.to_string(),
            Value::Double(v) => v.to_string(),
            Value::String(s) => s.clone(),
            Value::Array(array) => {
                let items: Vec<String> = array.items().iter().map(Value::to_text).collect();
                format!("[{}]", items.join(", "))
            }
            Value::Object(object) => object.to_text(),
        }
    }

    /// Borrow the array payload, if this is an array.
    pub fn as_array(&self) -> Option<&ArrayValue> {
        match self {
            Value::Array(array) => Some(array),
            _ => None,
        }
    }

    /// Borrow the object payload, if this is an object.
    pub fn as_object(&self) -> Option<&ObjectValue> {
        match self {
            Value::Object(object) => Some(object),
            _ => None,
        }
    }

    /// Borrow the string payload, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "Null"),
            Value::String(s) => write!(f, "String({:?})", s),
            Value::Array(array) => write!(f, "{:?}", array),
            Value::Object(object) => write!(f, "{:?}", object),
            other => write!(f, "{}({})", other.type_name(), other.to_text()),
        }
    }
}

// ============================================================================
// Arrays
// ============================================================================

/// Array payload: either typed or heterogeneous.
#[derive(Debug, Clone, PartialEq)]
pub enum ArrayValue {
    /// Every element is of `element` (or assignable to it).
    Typed {
        /// Declared element type.
        element: TypeHash,
        /// Elements in order.
        items: Vec<Value>,
    },
    /// `object[]`: elements carry their own runtime types.
    Heterogeneous(Vec<Value>),
}

impl ArrayValue {
    /// Create a typed array.
    pub fn typed(element: TypeHash, items: Vec<Value>) -> Self {
        ArrayValue::Typed { element, items }
    }

    /// Create a heterogeneous (`object[]`) array.
    pub fn heterogeneous(items: Vec<Value>) -> Self {
        ArrayValue::Heterogeneous(items)
    }

    /// Declared element type; `OBJECT` for heterogeneous arrays.
    pub fn element_type(&self) -> TypeHash {
        match self {
            ArrayValue::Typed { element, .. } => *element,
            ArrayValue::Heterogeneous(_) => primitives::OBJECT,
        }
    }

    /// Runtime type of the array itself.
    pub fn runtime_type(&self) -> TypeHash {
        match self {
            ArrayValue::Typed { element, .. } => TypeHash::array_of(*element),
            ArrayValue::Heterogeneous(_) => primitives::OBJECT_ARRAY,
        }
    }

    pub fn items(&self) -> &[Value] {
        match self {
            ArrayValue::Typed { items, .. } => items,
            ArrayValue::Heterogeneous(items) => items,
        }
    }

    pub fn into_items(self) -> Vec<Value> {
        match self {
            ArrayValue::Typed { items, .. } => items,
            ArrayValue::Heterogeneous(items) => items,
        }
    }

    pub fn len(&self) -> usize {
        self.items().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items().is_empty()
    }
}

// ============================================================================
// Objects
// ============================================================================

type RenderFn = fn(&(dyn Any + Send + Sync)) -> String;

/// Instance of a module-registered type.
///
/// The payload is shared, so cloning an object value clones a handle, not
/// the underlying data. Equality is handle identity.
#[derive(Clone)]
pub struct ObjectValue {
    type_hash: TypeHash,
    data: Arc<dyn Any + Send + Sync>,
    render: RenderFn,
}

impl ObjectValue {
    /// Wrap a payload whose textual form is its `Display` output.
    pub fn new<T>(type_hash: TypeHash, value: T) -> Self
    where
        T: Any + Send + Sync + fmt::Display,
    {
        Self {
            type_hash,
            data: Arc::new(value),
            render: render_display::<T>,
        }
    }

    /// Wrap a payload whose textual form is its `Debug` output.
    pub fn with_debug<T>(type_hash: TypeHash, value: T) -> Self
    where
        T: Any + Send + Sync + fmt::Debug,
    {
        Self {
            type_hash,
            data: Arc::new(value),
            render: render_debug::<T>,
        }
    }

    /// The object's runtime type.
    pub fn type_hash(&self) -> TypeHash {
        self.type_hash
    }

    /// Borrow the payload as `T`.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.data.downcast_ref::<T>()
    }

    /// Textual form of the payload.
    pub fn to_text(&self) -> String {
        (self.render)(self.data.as_ref())
    }
}

fn render_display<T: Any + fmt::Display>(data: &(dyn Any + Send + Sync)) -> String {
    data.downcast_ref::<T>()
        .map(ToString::to_string)
        .unwrap_or_default()
}

fn render_debug<T: Any + fmt::Debug>(data: &(dyn Any + Send + Sync)) -> String {
    data.downcast_ref::<T>()
        .map(|v| format!("{:?}", v))
        .unwrap_or_default()
}

impl PartialEq for ObjectValue {
    fn eq(&self, other: &Self) -> bool {
        self.type_hash == other.type_hash && Arc::ptr_eq(&self.data, &other.data)
    }
}

impl fmt::Debug for ObjectValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Object({}, {})", self.type_hash, self.to_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Point {
        x: i32,
        y: i32,
    }

    impl fmt::Display for Point {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "({}, {})", self.x, self.y)
        }
    }

    #[test]
    fn primitive_runtime_types() {
        assert_eq!(Value::Int32(1).runtime_type(), Some(primitives::INT32));
        assert_eq!(Value::Double(1.0).runtime_type(), Some(primitives::DOUBLE));
        assert_eq!(
            Value::String("a".into()).runtime_type(),
            Some(primitives::STRING)
        );
        assert_eq!(Value::Null.runtime_type(), None);
    }

    #[test]
    fn array_runtime_types() {
        let typed = Value::Array(ArrayValue::typed(primitives::INT32, vec![Value::Int32(1)]));
        assert_eq!(
            typed.runtime_type(),
            Some(TypeHash::array_of(primitives::INT32))
        );

        let mixed = Value::Array(ArrayValue::heterogeneous(vec![
            Value::Int32(1),
            Value::String("x".into()),
        ]));
        assert_eq!(mixed.runtime_type(), Some(primitives::OBJECT_ARRAY));
    }

    #[test]
    fn object_runtime_type_and_text() {
        let point_hash = TypeHash::from_name("Point");
        let value = Value::Object(ObjectValue::new(point_hash, Point { x: 1, y: 2 }));
        assert_eq!(value.runtime_type(), Some(point_hash));
        assert_eq!(value.to_text(), "(1, 2)");

        let debug = ObjectValue::with_debug(point_hash, Point { x: 3, y: 4 });
        assert_eq!(debug.to_text(), "Point { x: 3, y: 4 }");
    }

    #[test]
    fn object_downcast() {
        let object = ObjectValue::new(TypeHash::from_name("Point"), Point { x: 5, y: 6 });
        let point = object.downcast_ref::<Point>().unwrap();
        assert_eq!(point.x, 5);
        assert!(object.downcast_ref::<String>().is_none());
    }

    #[test]
    fn object_equality_is_identity() {
        let hash = TypeHash::from_name("Point");
        let a = ObjectValue::new(hash, Point { x: 1, y: 1 });
        let b = ObjectValue::new(hash, Point { x: 1, y: 1 });
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
    }

    #[test]
    fn text_forms() {
        assert_eq!(Value::Null.to_text(), "null");
        assert_eq!(Value::Bool(true).to_text(), "true");
        assert_eq!(Value::Int64(-7).to_text(), "-7");
        assert_eq!(Value::Double(2.5).to_text(), "2.5");
        let array = Value::Array(ArrayValue::typed(
            primitives::INT32,
            vec![Value::Int32(1), Value::Int32(2)],
        ));
        assert_eq!(array.to_text(), "[1, 2]");
    }

    #[test]
    fn array_accessors() {
        let array = ArrayValue::heterogeneous(vec![Value::Null, Value::Bool(false)]);
        assert_eq!(array.len(), 2);
        assert!(!array.is_empty());
        assert_eq!(array.element_type(), primitives::OBJECT);
        assert_eq!(array.into_items().len(), 2);
    }
}
