//! Text module: parsing strings into primitives and formatting doubles.

use std::str::FromStr;

use pinwire_core::ConversionError;
use pinwire_registry::{ConversionEdge, Module};

fn parse<T: FromStr>(text: &str, target: &'static str) -> Result<T, ConversionError> {
    text.trim().parse().map_err(|_| ConversionError::Parse {
        input: text.to_string(),
        target,
    })
}

fn parse_bool(text: &str) -> Result<bool, ConversionError> {
    match text.trim() {
        t if t.eq_ignore_ascii_case("true") => Ok(true),
        t if t.eq_ignore_ascii_case("false") => Ok(false),
        _ => Err(ConversionError::Parse {
            input: text.to_string(),
            target: "bool",
        }),
    }
}

pub fn converters() -> Vec<ConversionEdge> {
    vec![
        ConversionEdge::try_from_fn(|s: String| parse_bool(&s)),
        ConversionEdge::try_from_fn(|s: String| parse::<i32>(&s, "int")),
        ConversionEdge::try_from_fn(|s: String| parse::<i64>(&s, "int64")),
        ConversionEdge::try_from_fn(|s: String| parse::<f64>(&s, "double")),
        // Display for f64 is the shortest text that parses back exactly.
        ConversionEdge::from_fn(|x: f64| x.to_string()),
    ]
}

/// Creates the text module.
pub fn module() -> Module {
    converters()
        .into_iter()
        .fold(Module::new("text"), Module::converter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pinwire_core::{Value, primitives};
    use pinwire_registry::ConverterRegistry;

    fn registry() -> ConverterRegistry {
        let mut registry = ConverterRegistry::new();
        module().install_into(&mut registry).unwrap();
        registry
    }

    #[test]
    fn test_module_creates() {
        assert_eq!(module().name(), "text");
        assert_eq!(module().converter_count(), 5);
    }

    #[test]
    fn test_parse_numbers() {
        let registry = registry();
        let to_int = registry
            .get_converter(primitives::STRING, primitives::INT32)
            .unwrap();
        assert_eq!(to_int.apply(Value::from(" -12 ")), Ok(Value::Int32(-12)));
        assert_eq!(
            to_int.apply(Value::from("twelve")),
            Err(ConversionError::Parse {
                input: "twelve".to_string(),
                target: "int",
            })
        );

        let to_double = registry
            .get_converter(primitives::STRING, primitives::DOUBLE)
            .unwrap();
        assert_eq!(to_double.apply(Value::from("0.25")), Ok(Value::Double(0.25)));
    }

    #[test]
    fn test_parse_bool() {
        let edge = registry()
            .get_converter(primitives::STRING, primitives::BOOL)
            .unwrap();
        assert_eq!(edge.apply(Value::from("False")), Ok(Value::Bool(false)));
        assert!(edge.apply(Value::from("yes")).is_err());
    }

    #[test]
    fn test_double_round_trip_text() {
        let registry = registry();
        let format = registry
            .get_converter(primitives::DOUBLE, primitives::STRING)
            .unwrap();
        let parse = registry
            .get_converter(primitives::STRING, primitives::DOUBLE)
            .unwrap();

        let text = format.apply(Value::Double(0.1)).unwrap();
        assert_eq!(text, Value::from("0.1"));
        assert_eq!(parse.apply(text), Ok(Value::Double(0.1)));
    }
}
