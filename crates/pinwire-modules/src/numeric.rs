//! Numeric module: lossless widening converters between primitives.
//!
//! These are registered as direct edges rather than left to primitive
//! casts so they take part in chaining, e.g. `int8 -> int -> Celsius`
//! when a module only registers `int -> Celsius`.

use pinwire_registry::{ConversionEdge, Module};

/// Widening edges, smallest types first.
pub fn converters() -> Vec<ConversionEdge> {
    vec![
        // signed integers
        ConversionEdge::from_fn(|x: i8| i16::from(x)),
        ConversionEdge::from_fn(|x: i16| i32::from(x)),
        ConversionEdge::from_fn(|x: i32| i64::from(x)),
        // unsigned integers
        ConversionEdge::from_fn(|x: u8| u16::from(x)),
        ConversionEdge::from_fn(|x: u16| u32::from(x)),
        ConversionEdge::from_fn(|x: u32| u64::from(x)),
        // unsigned into the next signed width
        ConversionEdge::from_fn(|x: u8| i16::from(x)),
        ConversionEdge::from_fn(|x: u16| i32::from(x)),
        ConversionEdge::from_fn(|x: u32| i64::from(x)),
        // integers and floats into double
        ConversionEdge::from_fn(|x: i32| f64::from(x)),
        ConversionEdge::from_fn(|x: u32| f64::from(x)),
        ConversionEdge::from_fn(|x: i64| x as f64),
        ConversionEdge::from_fn(|x: f32| f64::from(x)),
        // bool as 0/1
        ConversionEdge::from_fn(|x: bool| i32::from(x)),
    ]
}

/// Creates the numeric module.
pub fn module() -> Module {
    converters()
        .into_iter()
        .fold(Module::new("numeric"), Module::converter)
}
