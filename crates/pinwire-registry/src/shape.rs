//! Type shapes: the keys dynamic converter factories are registered under.

use pinwire_core::{TypeHash, TypeUniverse, primitives};

/// Lookup key for a [`DynamicConverterFactory`](crate::DynamicConverterFactory).
///
/// A shape is either one concrete type, every instance of a generic
/// definition, or (source side only) any type at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeShape {
    /// Exactly this type.
    Concrete(TypeHash),
    /// Every instance of this generic definition.
    GenericDefinition(TypeHash),
    /// Any source type.
    AnySource,
}

impl TypeShape {
    /// The untyped array shape. Matches every array type in the
    /// array/generic strategies.
    pub const ARRAY: TypeShape = TypeShape::Concrete(primitives::ARRAY);

    /// Normalize a type to its shape: generic instances become their
    /// definition, everything else stays concrete.
    pub fn of(universe: &dyn TypeUniverse, ty: TypeHash) -> Self {
        match universe.generic_definition(ty) {
            Some(definition) => TypeShape::GenericDefinition(definition),
            None => TypeShape::Concrete(ty),
        }
    }

    /// Human readable form for logs and errors.
    pub fn describe(&self, universe: &dyn TypeUniverse) -> String {
        match self {
            TypeShape::Concrete(ty) => universe.name(*ty),
            TypeShape::GenericDefinition(def) => format!("{}<..>", universe.name(*def)),
            TypeShape::AnySource => "*".to_string(),
        }
    }
}
