//! Integration tests for `Context` and module installation.

use pinwire::{
    ConversionEdge, Context, ContextError, IntoValue, Module, RegistryOptions, Sequence,
    TypeEntry, TypeHash, Value, primitives, sequence_of,
};

fn temperature_module() -> Module {
    let celsius = TypeHash::from_name("Celsius");
    let fahrenheit = TypeHash::from_name("Fahrenheit");
    Module::new("temperature")
        .ty(TypeEntry::class("Celsius"))
        .ty(TypeEntry::class("Fahrenheit"))
        .converter(ConversionEdge::new(celsius, fahrenheit, |value| match value {
            Value::Double(c) => Ok(Value::Double(c * 9.0 / 5.0 + 32.0)),
            other => Ok(other),
        }))
        .converter(ConversionEdge::new(fahrenheit, primitives::DOUBLE, Ok))
}

// =============================================================================
// Installation
// =============================================================================

#[test]
fn test_default_modules_installed() {
    let ctx = Context::with_default_modules().unwrap();
    let names: Vec<_> = ctx.modules().iter().map(|m| m.name()).collect();
    assert_eq!(names, ["numeric", "text", "sequence"]);
}

#[test]
fn test_module_types_and_converters_visible() {
    let mut ctx = Context::with_default_modules().unwrap();
    ctx.install(temperature_module()).unwrap();

    let celsius = TypeHash::from_name("Celsius");
    let edge = ctx.converter(celsius, primitives::STRING).unwrap();
    assert_eq!(edge.intermediate(), Some(TypeHash::from_name("Fahrenheit")));
    assert_eq!(edge.apply(Value::Double(100.0)), Ok(Value::from("212")));
}

#[test]
fn test_reinstall_rejected() {
    let mut ctx = Context::new();
    ctx.install(temperature_module()).unwrap();
    assert!(matches!(
        ctx.install(temperature_module()),
        Err(ContextError::ModuleAlreadyInstalled(_))
    ));
}

#[test]
fn test_options_carried_into_registry() {
    let options = RegistryOptions::default()
        .with_find_intermediate(false)
        .with_base_type_depth(0);
    let mut ctx = Context::with_options(options);
    ctx.install(temperature_module()).unwrap();

    let celsius = TypeHash::from_name("Celsius");
    assert!(ctx.try_converter(celsius, primitives::DOUBLE).is_none());
    assert!(
        ctx.try_converter(celsius, TypeHash::from_name("Fahrenheit"))
            .is_some()
    );
}

// =============================================================================
// Conversion
// =============================================================================

#[test]
fn test_convert_array_into_sequence() {
    let ctx = Context::with_default_modules().unwrap();
    let out = ctx
        .convert(vec![1i32, 2, 3].into_value(), sequence_of(primitives::INT64))
        .unwrap();

    let sequence = Sequence::from_value(&out).unwrap();
    assert_eq!(sequence.element_type(), primitives::INT64);
    assert_eq!(
        sequence.items(),
        &[Value::Int64(1), Value::Int64(2), Value::Int64(3)]
    );
}

#[test]
fn test_resolver_isolated_from_later_installs() {
    let mut ctx = Context::with_default_modules().unwrap();
    let before = ctx.resolver();
    ctx.install(temperature_module()).unwrap();

    let celsius = TypeHash::from_name("Celsius");
    let fahrenheit = TypeHash::from_name("Fahrenheit");
    assert!(before.try_get_converter(celsius, fahrenheit).is_none());
    assert!(ctx.resolver().try_get_converter(celsius, fahrenheit).is_some());
}

#[test]
fn test_not_found_message_names_types() {
    let mut ctx = Context::new();
    ctx.install(temperature_module()).unwrap();

    let err = ctx
        .converter(primitives::BOOL, TypeHash::from_name("Celsius"))
        .unwrap_err();
    assert_eq!(err.to_string(), "no converter from 'bool' to 'Celsius'");
}
