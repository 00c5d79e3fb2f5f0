//! Module - a bundle of registrations installed in one call.
//!
//! A graph node library describes everything it contributes (types,
//! generic instances, direct converters, converter factories) as a
//! [`Module`] and installs it into a [`ConverterRegistry`] at load time.
//!
//! # Example
//!
//! ```
//! use pinwire_core::{TypeEntry, TypeHash, Value, primitives};
//! use pinwire_registry::{ConversionEdge, ConverterRegistry, Module};
//!
//! let celsius = TypeHash::from_name("units::Celsius");
//! let module = Module::new("units")
//!     .ty(TypeEntry::class("units::Celsius"))
//!     .converter(ConversionEdge::new(celsius, primitives::DOUBLE, Ok));
//!
//! let mut registry = ConverterRegistry::new();
//! module.install_into(&mut registry).unwrap();
//! assert!(registry.contains(celsius, primitives::DOUBLE));
//! ```

use log::debug;

use pinwire_core::{RegistrationError, TypeEntry, TypeHash};

use crate::{ConversionEdge, ConverterRegistry, DynamicConverterFactory, TypeShape};

/// Registrations contributed by one module.
#[derive(Debug, Clone)]
pub struct Module {
    name: String,
    types: Vec<TypeEntry>,
    generic_instances: Vec<(TypeHash, Vec<TypeHash>)>,
    converters: Vec<ConversionEdge>,
    factories: Vec<(TypeShape, TypeShape, DynamicConverterFactory)>,
}

impl Module {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            types: Vec::new(),
            generic_instances: Vec::new(),
            converters: Vec::new(),
            factories: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    // === Builder Methods ===

    /// Add a type registration.
    pub fn ty(mut self, entry: TypeEntry) -> Self {
        self.types.push(entry);
        self
    }

    /// Add a closed generic instance registration.
    pub fn generic_instance(mut self, definition: TypeHash, args: &[TypeHash]) -> Self {
        self.generic_instances.push((definition, args.to_vec()));
        self
    }

    /// Add a direct converter.
    pub fn converter(mut self, edge: ConversionEdge) -> Self {
        self.converters.push(edge);
        self
    }

    /// Add a converter factory.
    pub fn dynamic_converter(
        mut self,
        source: TypeShape,
        destination: TypeShape,
        factory: DynamicConverterFactory,
    ) -> Self {
        self.factories.push((source, destination, factory));
        self
    }

    // === Queries ===

    pub fn type_count(&self) -> usize {
        self.types.len()
    }

    pub fn converter_count(&self) -> usize {
        self.converters.len()
    }

    pub fn factory_count(&self) -> usize {
        self.factories.len()
    }

    /// Install everything into `registry`.
    ///
    /// Types go first, then generic instances, then converters and
    /// factories, so edges may refer to types of the same module.
    ///
    /// # Errors
    ///
    /// Stops at the first `RegistrationError`. Registrations made before
    /// the failure stay in place.
    pub fn install_into(&self, registry: &mut ConverterRegistry) -> Result<(), RegistrationError> {
        debug!(
            "installing module '{}' ({} types, {} converters, {} factories)",
            self.name,
            self.types.len(),
            self.converters.len(),
            self.factories.len()
        );

        for entry in &self.types {
            registry.register_type(entry.clone())?;
        }
        for (definition, args) in &self.generic_instances {
            registry.register_generic_instance(*definition, args)?;
        }
        registry.add_converters(self.converters.iter().cloned())?;
        for (source, destination, factory) in &self.factories {
            registry.add_dynamic_converter(*source, *destination, factory.clone())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pinwire_core::{TypeUniverse, Value, primitives};

    fn sample() -> Module {
        let meters = TypeHash::from_name("Meters");
        let list = TypeHash::from_name("List");
        Module::new("units")
            .ty(TypeEntry::class("Meters"))
            .ty(TypeEntry::generic_definition("List", &["T"]))
            .generic_instance(list, &[meters])
            .converter(ConversionEdge::new(meters, primitives::DOUBLE, Ok))
            .dynamic_converter(
                TypeShape::AnySource,
                TypeShape::GenericDefinition(list),
                DynamicConverterFactory::new(|_, _, _| None),
            )
    }

    #[test]
    fn builder_collects_registrations() {
        let module = sample();
        assert_eq!(module.name(), "units");
        assert_eq!(module.type_count(), 2);
        assert_eq!(module.converter_count(), 1);
        assert_eq!(module.factory_count(), 1);
    }

    #[test]
    fn install_registers_everything() {
        let mut registry = ConverterRegistry::new();
        sample().install_into(&mut registry).unwrap();

        let meters = TypeHash::from_name("Meters");
        let list = TypeHash::from_name("List");
        let meters_list = TypeHash::from_generic_instance(list, &[meters]);

        assert_eq!(registry.types().name(meters_list), "List<Meters>");
        assert!(registry.contains(meters, primitives::DOUBLE));
        assert_eq!(registry.factory_count(), 1);

        let edge = registry.get_converter(meters, primitives::DOUBLE).unwrap();
        assert_eq!(edge.apply(Value::Double(1.0)), Ok(Value::Double(1.0)));
    }

    #[test]
    fn installing_twice_fails_on_duplicate_type() {
        let mut registry = ConverterRegistry::new();
        sample().install_into(&mut registry).unwrap();
        assert!(matches!(
            sample().install_into(&mut registry),
            Err(RegistrationError::DuplicateType(_))
        ));
    }
}
