//! Array strategies: element-wise mapping and heterogeneous `object[]`.

use pinwire_core::{ArrayValue, ConversionError, TypeHash, Value, primitives};

use super::Resolver;
use crate::ConversionEdge;

/// Take the items out of an array value. `Ok(None)` for `Null`.
fn take_items(value: Value) -> Result<Option<Vec<Value>>, ConversionError> {
    match value {
        Value::Array(array) => Ok(Some(array.into_items())),
        Value::Null => Ok(None),
        other => Err(ConversionError::mismatch("array", other.type_name())),
    }
}

/// Check that every item can be stored in a `T[]` unchanged.
///
/// `Null` items are allowed; anything else must be assignable to `element`.
fn check_items(
    resolver: &Resolver,
    items: &[Value],
    element: TypeHash,
) -> Result<(), ConversionError> {
    let types = resolver.types();
    for actual in items.iter().filter_map(Value::runtime_type) {
        if !types.is_assignable(actual, element) {
            return Err(ConversionError::mismatch(
                types.name(element),
                types.name(actual),
            ));
        }
    }
    Ok(())
}

/// Both sides are arrays.
///
/// With both element types known the element converter is resolved once
/// and mapped over the input. If either side is the untyped array shape
/// the elements are copied unchanged; copying into a typed destination
/// fails on the first item that is not assignable to its element type.
pub(super) fn array_to_array(
    resolver: &Resolver,
    source: TypeHash,
    destination: TypeHash,
) -> Option<ConversionEdge> {
    let types = resolver.types();
    if !types.is_array(source) || !types.is_array(destination) {
        return None;
    }

    let to_element = types.element_type(destination);
    let element = match (types.element_type(source), to_element) {
        (Some(from), Some(to)) => Some(resolver.try_get_converter(from, to)?),
        _ => None,
    };

    let resolver = resolver.clone();
    Some(ConversionEdge::new(source, destination, move |value| {
        let Some(items) = take_items(value)? else {
            return Ok(Value::Null);
        };
        let items = match &element {
            Some(edge) => items
                .into_iter()
                .map(|item| edge.apply(item))
                .collect::<Result<Vec<_>, _>>()?,
            None => items,
        };
        Ok(Value::Array(match to_element {
            Some(to) => {
                if element.is_none() {
                    check_items(&resolver, &items, to)?;
                }
                ArrayValue::typed(to, items)
            }
            None => ArrayValue::heterogeneous(items),
        }))
    }))
}

/// Source is `object[]` and no earlier strategy applied.
///
/// An empty input yields the destination's default value. Otherwise the
/// first element's runtime type `T` picks the converter for `T[]`. Every
/// item is converted to `T` by its own runtime type before the resulting
/// `T[]` is handed to that converter.
pub(super) fn heterogeneous(resolver: &Resolver, destination: TypeHash) -> ConversionEdge {
    let resolver = resolver.clone();
    ConversionEdge::new(primitives::OBJECT_ARRAY, destination, move |value| {
        let Some(items) = take_items(value)? else {
            return Ok(Value::Null);
        };
        let Some(first) = items.first() else {
            return Ok(resolver.types().default_value(destination));
        };
        let Some(element) = first.runtime_type() else {
            return Err(ConversionError::NullValue(format!(
                "{} (first element of object[])",
                resolver.types().name(destination)
            )));
        };

        let typed = TypeHash::array_of(element);
        let converter = resolver.get_converter(typed, destination)?;
        let items = items
            .into_iter()
            .map(|item| resolver.convert(item, element))
            .collect::<Result<Vec<_>, _>>()?;
        converter.apply(Value::Array(ArrayValue::typed(element, items)))
    })
}

#[cfg(test)]
mod tests {
    use crate::resolver::Strategy;
    use crate::{ConversionEdge, ConverterRegistry};
    use pinwire_core::{
        ArrayValue, ConversionError, FromValue, ObjectValue, TypeEntry, TypeHash, Value,
        primitives,
    };

    fn ints(values: &[i32]) -> Value {
        Value::Array(ArrayValue::typed(
            primitives::INT32,
            values.iter().copied().map(Value::Int32).collect(),
        ))
    }

    #[test]
    fn maps_arrays_of_every_length() {
        let resolver = ConverterRegistry::new().snapshot();
        let edge = resolver
            .get_converter(
                TypeHash::array_of(primitives::INT32),
                TypeHash::array_of(primitives::INT64),
            )
            .unwrap();
        assert_eq!(
            resolver.explain(
                TypeHash::array_of(primitives::INT32),
                TypeHash::array_of(primitives::INT64)
            ),
            Some(Strategy::ArrayToArray)
        );

        for input in [&[][..], &[7][..], &[1, -2, 3, 400][..]] {
            let out = edge.apply(ints(input)).unwrap();
            let array = out.as_array().unwrap();
            assert_eq!(array.element_type(), primitives::INT64);
            assert_eq!(array.len(), input.len());
            for (item, expected) in array.items().iter().zip(input) {
                assert_eq!(*item, Value::Int64(i64::from(*expected)));
            }
        }
    }

    #[test]
    fn element_failures_propagate() {
        let resolver = ConverterRegistry::new().snapshot();
        let edge = resolver
            .get_converter(
                TypeHash::array_of(primitives::INT32),
                TypeHash::array_of(primitives::UINT8),
            )
            .unwrap();
        assert!(matches!(
            edge.apply(ints(&[1, 300])),
            Err(ConversionError::Overflow { .. })
        ));
    }

    #[test]
    fn untyped_arrays_copy_elements() {
        let resolver = ConverterRegistry::new().snapshot();
        let edge = resolver
            .get_converter(primitives::ARRAY, TypeHash::array_of(primitives::STRING))
            .unwrap();
        let out = edge
            .apply(Value::Array(ArrayValue::heterogeneous(vec![Value::from("a")])))
            .unwrap();
        assert_eq!(
            out,
            Value::Array(ArrayValue::typed(primitives::STRING, vec![Value::from("a")]))
        );
        assert_eq!(edge.apply(Value::Null), Ok(Value::Null));
    }

    #[test]
    fn untyped_copy_rejects_mismatched_items() {
        let resolver = ConverterRegistry::new().snapshot();
        let edge = resolver
            .get_converter(primitives::ARRAY, TypeHash::array_of(primitives::INT32))
            .unwrap();

        let mixed = Value::Array(ArrayValue::heterogeneous(vec![
            Value::Int32(1),
            Value::from("abc"),
            Value::Bool(true),
        ]));
        assert_eq!(
            edge.apply(mixed),
            Err(ConversionError::TypeMismatch {
                expected: "int".to_string(),
                actual: "string".to_string(),
            })
        );

        let ok = Value::Array(ArrayValue::heterogeneous(vec![Value::Int32(4), Value::Null]));
        assert_eq!(
            edge.apply(ok),
            Ok(Value::Array(ArrayValue::typed(
                primitives::INT32,
                vec![Value::Int32(4), Value::Null]
            )))
        );
    }

    #[test]
    fn untyped_copy_accepts_derived_items() {
        let mut registry = ConverterRegistry::new();
        let shape = registry.register_type(TypeEntry::class("Shape")).unwrap();
        let circle = registry
            .register_type(TypeEntry::class("Circle").with_base(shape))
            .unwrap();
        let edge = registry
            .get_converter(primitives::ARRAY, TypeHash::array_of(shape))
            .unwrap();

        let item = Value::Object(ObjectValue::with_debug(circle, 1));
        let out = edge
            .apply(Value::Array(ArrayValue::heterogeneous(vec![item.clone()])))
            .unwrap();
        assert_eq!(out, Value::Array(ArrayValue::typed(shape, vec![item])));
    }

    #[test]
    fn unconvertible_elements_block_array_conversion() {
        let mut registry = ConverterRegistry::new();
        let a = registry.register_type(TypeEntry::class("A")).unwrap();
        let b = registry.register_type(TypeEntry::class("B")).unwrap();

        assert!(
            registry
                .try_get_converter(TypeHash::array_of(a), TypeHash::array_of(b))
                .is_none()
        );
    }

    #[test]
    fn object_arrays_dispatch_per_element() {
        let resolver = ConverterRegistry::new().snapshot();
        let edge = resolver
            .get_converter(primitives::OBJECT_ARRAY, TypeHash::array_of(primitives::DOUBLE))
            .unwrap();
        let mixed = Value::Array(ArrayValue::heterogeneous(vec![
            Value::Int32(1),
            Value::from("2.5"),
            Value::Null,
        ]));
        assert_eq!(
            edge.apply(mixed),
            Ok(Value::Array(ArrayValue::typed(
                primitives::DOUBLE,
                vec![Value::Double(1.0), Value::Double(2.5), Value::Null],
            )))
        );
    }

    #[test]
    fn heterogeneous_fallback_uses_first_element() {
        let mut registry = ConverterRegistry::new();
        let total = registry.register_type(TypeEntry::class("Total")).unwrap();
        registry
            .add_converter(ConversionEdge::new(
                TypeHash::array_of(primitives::INT32),
                total,
                |value| {
                    let numbers = Vec::<i32>::from_value(value)?;
                    Ok(Value::Int64(numbers.into_iter().map(i64::from).sum()))
                },
            ))
            .unwrap();
        let resolver = registry.snapshot();

        assert_eq!(
            resolver.explain(primitives::OBJECT_ARRAY, total),
            Some(Strategy::HeterogeneousArray)
        );
        let edge = resolver.get_converter(primitives::OBJECT_ARRAY, total).unwrap();
        let input = Value::Array(ArrayValue::heterogeneous(vec![
            Value::Int32(2),
            Value::Int32(5),
        ]));
        assert_eq!(edge.apply(input), Ok(Value::Int64(7)));
    }

    #[test]
    fn heterogeneous_fallback_coerces_every_item() {
        let mut registry = ConverterRegistry::new();
        let count = registry.register_type(TypeEntry::class("Count")).unwrap();
        registry
            .add_converter(ConversionEdge::new(
                TypeHash::array_of(primitives::INT32),
                count,
                |value| {
                    let numbers = Vec::<i32>::from_value(value)?;
                    Ok(Value::String(format!("{:?}", numbers)))
                },
            ))
            .unwrap();
        let edge = registry
            .get_converter(primitives::OBJECT_ARRAY, count)
            .unwrap();

        let mixed = Value::Array(ArrayValue::heterogeneous(vec![
            Value::Int32(1),
            Value::from("2"),
            Value::Double(3.0),
        ]));
        assert_eq!(edge.apply(mixed), Ok(Value::from("[1, 2, 3]")));

        let bad = Value::Array(ArrayValue::heterogeneous(vec![
            Value::Int32(1),
            Value::from("x"),
        ]));
        assert_eq!(
            edge.apply(bad),
            Err(ConversionError::Parse {
                input: "x".to_string(),
                target: "int",
            })
        );
    }

    #[test]
    fn heterogeneous_empty_input_yields_default() {
        let mut registry = ConverterRegistry::new();
        let total = registry
            .register_type(TypeEntry::class("Total").with_default(|_| Value::Int64(0)))
            .unwrap();
        let resolver = registry.snapshot();

        let edge = resolver.get_converter(primitives::OBJECT_ARRAY, total).unwrap();
        assert_eq!(
            edge.apply(Value::Array(ArrayValue::heterogeneous(Vec::new()))),
            Ok(Value::Int64(0))
        );
    }

    #[test]
    fn heterogeneous_without_element_converter_fails() {
        let mut registry = ConverterRegistry::new();
        let total = registry.register_type(TypeEntry::class("Total")).unwrap();
        let resolver = registry.snapshot();

        let edge = resolver.get_converter(primitives::OBJECT_ARRAY, total).unwrap();
        let input = Value::Array(ArrayValue::heterogeneous(vec![Value::Bool(true)]));
        assert_eq!(
            edge.apply(input),
            Err(ConversionError::NotFound {
                from: "bool[]".to_string(),
                to: "Total".to_string(),
            })
        );
    }
}
