//! Factory-backed strategies for generic containers and shapes.
//!
//! Each strategy tries a specific factory key first and a catch-all key
//! (`AnySource` on the source side) second. A factory returning `None`
//! counts as a miss.

use pinwire_core::TypeHash;

use super::Resolver;
use crate::{ConversionEdge, TypeShape};

/// Array source, generic instance destination.
pub(super) fn array_to_generic(
    resolver: &Resolver,
    source: TypeHash,
    destination: TypeHash,
) -> Option<ConversionEdge> {
    if !resolver.types().is_array(source) {
        return None;
    }
    let definition = resolver.types().generic_definition(destination)?;
    let definition = TypeShape::GenericDefinition(definition);

    resolver
        .instantiate((TypeShape::ARRAY, definition), source, destination)
        .or_else(|| resolver.instantiate((TypeShape::AnySource, definition), source, destination))
}

/// Generic instance source, array destination.
pub(super) fn generic_to_array(
    resolver: &Resolver,
    source: TypeHash,
    destination: TypeHash,
) -> Option<ConversionEdge> {
    if !resolver.types().is_array(destination) {
        return None;
    }
    let definition = resolver.types().generic_definition(source)?;
    let definition = TypeShape::GenericDefinition(definition);

    resolver
        .instantiate((definition, TypeShape::ARRAY), source, destination)
        .or_else(|| {
            resolver.instantiate((TypeShape::AnySource, TypeShape::ARRAY), source, destination)
        })
}

/// Any pair, keyed by the shapes of both sides.
pub(super) fn shape_factory(
    resolver: &Resolver,
    source: TypeHash,
    destination: TypeHash,
) -> Option<ConversionEdge> {
    let from = TypeShape::of(resolver.types(), source);
    let to = TypeShape::of(resolver.types(), destination);

    resolver
        .instantiate((from, to), source, destination)
        .or_else(|| resolver.instantiate((TypeShape::AnySource, to), source, destination))
}

#[cfg(test)]
mod tests {
    use crate::resolver::Strategy;
    use crate::{ConversionEdge, ConverterRegistry, DynamicConverterFactory, TypeShape};
    use pinwire_core::{
        ArrayValue, IntoValue, TypeEntry, TypeHash, TypeUniverse, Value, primitives,
    };

    /// `Box<T>` with a factory that wraps any `T` into a box carrying the
    /// element converter's output.
    fn boxed_registry() -> (ConverterRegistry, TypeHash) {
        let mut registry = ConverterRegistry::new();
        let def = registry
            .register_type(TypeEntry::generic_definition("Box", &["T"]))
            .unwrap();
        registry
            .add_dynamic_converter(
                TypeShape::AnySource,
                TypeShape::GenericDefinition(def),
                DynamicConverterFactory::new(|resolver, source, destination| {
                    let element = *resolver.types().generic_arguments(destination).first()?;
                    let inner = resolver.try_get_converter(source, element)?;
                    let name = resolver.types().name(destination);
                    Some(ConversionEdge::new(source, destination, move |value| {
                        let converted = inner.apply(value)?;
                        Ok(Value::String(format!("{name}({})", converted.to_text())))
                    }))
                }),
            )
            .unwrap();
        (registry, def)
    }

    #[test]
    fn factory_serves_every_instance() {
        let (mut registry, def) = boxed_registry();
        let box_int = registry
            .register_generic_instance(def, &[primitives::INT32])
            .unwrap();
        let box_string = registry
            .register_generic_instance(def, &[primitives::STRING])
            .unwrap();
        let resolver = registry.snapshot();

        assert_eq!(
            resolver.explain(primitives::DOUBLE, box_int),
            Some(Strategy::ShapeFactory)
        );
        let to_int = resolver.get_converter(primitives::DOUBLE, box_int).unwrap();
        let to_string = resolver.get_converter(primitives::DOUBLE, box_string).unwrap();

        assert_eq!(to_int.source(), primitives::DOUBLE);
        assert_eq!(to_int.destination(), box_int);
        assert_eq!(
            to_int.apply(Value::Double(2.0)),
            Ok(Value::from("Box<int>(2)"))
        );
        assert_eq!(
            to_string.apply(Value::Double(2.5)),
            Ok(Value::from("Box<string>(2.5)"))
        );
    }

    #[test]
    fn factory_returning_none_falls_through() {
        let (mut registry, def) = boxed_registry();
        let widget = registry.register_type(TypeEntry::class("Widget")).unwrap();
        let box_int = registry
            .register_generic_instance(def, &[primitives::INT32])
            .unwrap();

        // Widget -> int has no converter, so the factory declines.
        assert!(registry.try_get_converter(widget, box_int).is_none());
    }

    #[test]
    fn array_to_generic_prefers_array_key() {
        let (mut registry, def) = boxed_registry();
        let box_int = registry
            .register_generic_instance(def, &[primitives::INT32])
            .unwrap();
        registry
            .add_dynamic_converter(
                TypeShape::ARRAY,
                TypeShape::GenericDefinition(def),
                DynamicConverterFactory::new(|_, source, destination| {
                    Some(ConversionEdge::new(source, destination, |value| {
                        let count = value.as_array().map_or(0, |a| a.len());
                        Ok(Value::UInt64(count as u64))
                    }))
                }),
            )
            .unwrap();
        let resolver = registry.snapshot();

        let ints = TypeHash::array_of(primitives::INT32);
        assert_eq!(resolver.explain(ints, box_int), Some(Strategy::ArrayToGeneric));
        let edge = resolver.get_converter(ints, box_int).unwrap();
        assert_eq!(
            edge.apply(vec![1i32, 2, 3].into_value()),
            Ok(Value::UInt64(3))
        );
    }

    #[test]
    fn generic_to_array_uses_definition_key() {
        let (mut registry, def) = boxed_registry();
        let box_int = registry
            .register_generic_instance(def, &[primitives::INT32])
            .unwrap();
        registry
            .add_dynamic_converter(
                TypeShape::GenericDefinition(def),
                TypeShape::ARRAY,
                DynamicConverterFactory::new(|_, source, destination| {
                    Some(ConversionEdge::new(source, destination, |value| {
                        Ok(Value::Array(ArrayValue::heterogeneous(vec![value])))
                    }))
                }),
            )
            .unwrap();
        let resolver = registry.snapshot();

        let strings = TypeHash::array_of(primitives::STRING);
        assert_eq!(
            resolver.explain(box_int, strings),
            Some(Strategy::GenericToArray)
        );
    }

    #[test]
    fn shape_keys_normalize_generic_instances() {
        let mut registry = ConverterRegistry::new();
        let def = registry
            .register_type(TypeEntry::generic_definition("Pair", &["A", "B"]))
            .unwrap();
        let pair = registry
            .register_generic_instance(def, &[primitives::INT32, primitives::BOOL])
            .unwrap();
        registry
            .add_dynamic_converter(
                TypeShape::GenericDefinition(def),
                TypeShape::Concrete(primitives::INT32),
                DynamicConverterFactory::new(|_, source, destination| {
                    Some(ConversionEdge::new(source, destination, |_| {
                        Ok(Value::Int32(2))
                    }))
                }),
            )
            .unwrap();

        let edge = registry.get_converter(pair, primitives::INT32).unwrap();
        assert_eq!(edge.apply(Value::Null), Ok(Value::Int32(2)));
        assert!(registry.types().is_generic(pair));
    }
}
