//! Sequence - the generic `Sequence<T>` container and its converters.
//!
//! A sequence value is an object whose payload is a [`Sequence`]. The
//! module registers the generic definition, an instance for every
//! primitive plus `object`, and three factories:
//!
//! - `U[] -> Sequence<T>`
//! - `Sequence<T> -> U[]`
//! - `Sequence<T> -> Sequence<U>`
//!
//! Each factory resolves the element converter `T -> U` through the
//! resolver it is given, so one registration serves every instance.

use std::fmt;

use pinwire_core::{
    ArrayValue, ConversionError, ObjectValue, PrimitiveKind, TypeEntry, TypeHash, TypeKind, Value,
    primitives,
};
use pinwire_registry::{ConversionEdge, DynamicConverterFactory, Module, Resolver, TypeShape};

/// Name of the generic definition.
pub const SEQUENCE_NAME: &str = "Sequence";

/// Hash of the generic definition `Sequence<T>`.
pub fn sequence_type() -> TypeHash {
    TypeHash::from_name(SEQUENCE_NAME)
}

/// Hash of the instance `Sequence<element>`.
pub fn sequence_of(element: TypeHash) -> TypeHash {
    TypeHash::from_generic_instance(sequence_type(), &[element])
}

// =========================================================================
// PAYLOAD
// =========================================================================

/// Payload of a `Sequence<T>` value.
#[derive(Debug, Clone, PartialEq)]
pub struct Sequence {
    element: TypeHash,
    items: Vec<Value>,
}

impl Sequence {
    pub fn new(element: TypeHash, items: Vec<Value>) -> Self {
        Self { element, items }
    }

    pub fn element_type(&self) -> TypeHash {
        self.element
    }

    pub fn items(&self) -> &[Value] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Wrap into a `Sequence<T>` object value.
    pub fn into_value(self) -> Value {
        Value::Object(ObjectValue::new(sequence_of(self.element), self))
    }

    /// Borrow the payload of a sequence value.
    pub fn from_value(value: &Value) -> Option<&Sequence> {
        value.as_object()?.downcast_ref::<Sequence>()
    }
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let items: Vec<String> = self.items.iter().map(Value::to_text).collect();
        write!(f, "[{}]", items.join(", "))
    }
}

/// Items of a sequence value, `None` for `Null`.
fn sequence_items(value: Value) -> Result<Option<Vec<Value>>, ConversionError> {
    if value.is_null() {
        return Ok(None);
    }
    match Sequence::from_value(&value) {
        Some(sequence) => Ok(Some(sequence.items.clone())),
        None => Err(ConversionError::mismatch(SEQUENCE_NAME, value.type_name())),
    }
}

/// Items of an array value, `None` for `Null`.
fn array_items(value: Value) -> Result<Option<Vec<Value>>, ConversionError> {
    match value {
        Value::Array(array) => Ok(Some(array.into_items())),
        Value::Null => Ok(None),
        other => Err(ConversionError::mismatch("array", other.type_name())),
    }
}

fn map_items(items: Vec<Value>, element: &ConversionEdge) -> Result<Vec<Value>, ConversionError> {
    items.into_iter().map(|item| element.apply(item)).collect()
}

/// Default value of a `Sequence<T>` type: an empty sequence of `T`.
fn empty_sequence(entry: &TypeEntry) -> Value {
    let element = match &entry.kind {
        TypeKind::GenericInstance { args, .. } => {
            args.first().copied().unwrap_or(primitives::OBJECT)
        }
        _ => primitives::OBJECT,
    };
    Sequence::new(element, Vec::new()).into_value()
}

// =========================================================================
// FACTORIES
// =========================================================================

/// Element type argument of a `Sequence<T>` instance.
fn element_of(resolver: &Resolver, sequence: TypeHash) -> Option<TypeHash> {
    resolver.types().generic_arguments(sequence).first().copied()
}

/// `U[] -> Sequence<T>`.
fn array_to_sequence(
    resolver: &Resolver,
    source: TypeHash,
    destination: TypeHash,
) -> Option<ConversionEdge> {
    let to = element_of(resolver, destination)?;
    // An untyped array converts each element by its runtime type.
    let from = resolver
        .types()
        .element_type(source)
        .unwrap_or(primitives::OBJECT);
    let element = resolver.try_get_converter(from, to)?;

    Some(ConversionEdge::new(source, destination, move |value| {
        let Some(items) = array_items(value)? else {
            return Ok(Value::Null);
        };
        Ok(Sequence::new(to, map_items(items, &element)?).into_value())
    }))
}

/// `Sequence<T> -> U[]`.
fn sequence_to_array(
    resolver: &Resolver,
    source: TypeHash,
    destination: TypeHash,
) -> Option<ConversionEdge> {
    let from = element_of(resolver, source)?;
    let to = resolver.types().element_type(destination);
    let element = resolver.try_get_converter(from, to.unwrap_or(primitives::OBJECT))?;

    Some(ConversionEdge::new(source, destination, move |value| {
        let Some(items) = sequence_items(value)? else {
            return Ok(Value::Null);
        };
        let items = map_items(items, &element)?;
        Ok(Value::Array(match to {
            Some(to) => ArrayValue::typed(to, items),
            None => ArrayValue::heterogeneous(items),
        }))
    }))
}

/// `Sequence<T> -> Sequence<U>`.
fn sequence_to_sequence(
    resolver: &Resolver,
    source: TypeHash,
    destination: TypeHash,
) -> Option<ConversionEdge> {
    let from = element_of(resolver, source)?;
    let to = element_of(resolver, destination)?;
    let element = resolver.try_get_converter(from, to)?;

    Some(ConversionEdge::new(source, destination, move |value| {
        let Some(items) = sequence_items(value)? else {
            return Ok(Value::Null);
        };
        Ok(Sequence::new(to, map_items(items, &element)?).into_value())
    }))
}

// =========================================================================
// MODULE CREATION
// =========================================================================

/// Creates the sequence module with the `Sequence<T>` generic type.
pub fn module() -> Module {
    let definition = sequence_type();
    let shape = TypeShape::GenericDefinition(definition);

    let module = Module::new("sequence").ty(
        TypeEntry::generic_definition(SEQUENCE_NAME, &["T"]).with_default(empty_sequence),
    );

    PrimitiveKind::ALL
        .iter()
        .map(|kind| kind.type_hash())
        .chain([primitives::OBJECT])
        .fold(module, |module, element| {
            module.generic_instance(definition, &[element])
        })
        .dynamic_converter(
            TypeShape::ARRAY,
            shape,
            DynamicConverterFactory::new(array_to_sequence),
        )
        .dynamic_converter(
            shape,
            TypeShape::ARRAY,
            DynamicConverterFactory::new(sequence_to_array),
        )
        .dynamic_converter(
            shape,
            shape,
            DynamicConverterFactory::new(sequence_to_sequence),
        )
}
