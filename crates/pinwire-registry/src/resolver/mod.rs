//! Converter resolution.
//!
//! [`Resolver`] answers "how do I turn a `source` value into a
//! `destination` value?" over an immutable view of a
//! [`ConverterRegistry`](crate::ConverterRegistry). Answers are synthesised
//! on demand and never stored back.
//!
//! ## Resolution Order
//!
//! Strategies are tried in this order; the first to produce a converter
//! wins:
//! 1. Exact match (registered edge for the pair)
//! 2. Assignability (same type, the root, a base type or interface)
//! 3. Primitive casts (both primitive, destination not `string`)
//! 4. Dynamic source (`object` source, dispatched on the runtime type)
//! 5. Array to array (element-wise)
//! 6. Array to generic container (factory)
//! 7. Generic container to array (factory)
//! 8. Shape factories (generic to generic, catch-all sources)
//! 9. Heterogeneous `object[]` (dispatched on the first element)
//! 10. Two-hop chaining through registered edges
//! 11. Base type fallback (costs one level of depth)
//! 12. Text fallback to `string` (needs depth)
//!
//! ## Termination
//!
//! Chaining never chains again on its second hop, and base type fallback
//! recurses with `depth - 1`. Element and runtime dispatch recurse on
//! strictly smaller types or defer to apply time.

mod arrays;
mod generics;
mod hierarchy;

use std::fmt;
use std::sync::Arc;

use log::{debug, trace};

use pinwire_core::{
    ConversionError, PrimitiveKind, TypeHash, TypeUniverse, Value, cast_primitive, primitives,
};

use crate::registry::ConverterTables;
use crate::{ConversionEdge, RegistryOptions, TypeShape};

/// The strategy that produced a converter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    Exact,
    Assignable,
    PrimitiveCast,
    DynamicSource,
    ArrayToArray,
    ArrayToGeneric,
    GenericToArray,
    ShapeFactory,
    HeterogeneousArray,
    Chain,
    BaseType,
    Text,
}

impl Strategy {
    pub fn as_str(self) -> &'static str {
        match self {
            Strategy::Exact => "exact",
            Strategy::Assignable => "assignable",
            Strategy::PrimitiveCast => "primitive cast",
            Strategy::DynamicSource => "dynamic source",
            Strategy::ArrayToArray => "array to array",
            Strategy::ArrayToGeneric => "array to generic",
            Strategy::GenericToArray => "generic to array",
            Strategy::ShapeFactory => "shape factory",
            Strategy::HeterogeneousArray => "heterogeneous array",
            Strategy::Chain => "chain",
            Strategy::BaseType => "base type",
            Strategy::Text => "text",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable resolver over a registry snapshot.
///
/// Cheap to clone. Registry mutations made after the snapshot was taken
/// are not visible.
#[derive(Clone)]
pub struct Resolver {
    types: Arc<dyn TypeUniverse>,
    tables: Arc<ConverterTables>,
    options: RegistryOptions,
}

impl Resolver {
    pub(crate) fn new(
        types: Arc<dyn TypeUniverse>,
        tables: Arc<ConverterTables>,
        options: RegistryOptions,
    ) -> Self {
        Self {
            types,
            tables,
            options,
        }
    }

    /// The type universe this resolver sees.
    pub fn types(&self) -> &dyn TypeUniverse {
        self.types.as_ref()
    }

    pub fn options(&self) -> &RegistryOptions {
        &self.options
    }

    /// Resolve a converter with the configured chaining and depth.
    pub fn try_get_converter(
        &self,
        source: TypeHash,
        destination: TypeHash,
    ) -> Option<ConversionEdge> {
        self.try_get_converter_with(
            source,
            destination,
            self.options.find_intermediate,
            self.options.base_type_depth,
        )
    }

    /// Resolve a converter with explicit chaining and depth budget.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn try_get_converter_with(
        &self,
        source: TypeHash,
        destination: TypeHash,
        find_intermediate: bool,
        depth: u32,
    ) -> Option<ConversionEdge> {
        match self.find(source, destination, find_intermediate, depth) {
            Some((strategy, edge)) => {
                debug!(
                    "resolved {} -> {} via {}",
                    self.types.name(source),
                    self.types.name(destination),
                    strategy
                );
                Some(edge)
            }
            None => {
                debug!(
                    "no converter {} -> {}",
                    self.types.name(source),
                    self.types.name(destination)
                );
                None
            }
        }
    }

    /// Resolve a converter or fail with [`ConversionError::NotFound`]
    /// naming both types.
    pub fn get_converter(
        &self,
        source: TypeHash,
        destination: TypeHash,
    ) -> Result<ConversionEdge, ConversionError> {
        self.try_get_converter(source, destination)
            .ok_or_else(|| self.not_found(source, destination))
    }

    /// Which strategy would answer `(source, destination)`, if any.
    pub fn explain(&self, source: TypeHash, destination: TypeHash) -> Option<Strategy> {
        self.find(
            source,
            destination,
            self.options.find_intermediate,
            self.options.base_type_depth,
        )
        .map(|(strategy, _)| strategy)
    }

    /// Convert a value using its runtime type as the source.
    ///
    /// `Null` has no runtime type and passes through unchanged.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn convert(&self, value: Value, destination: TypeHash) -> Result<Value, ConversionError> {
        match value.runtime_type() {
            None => Ok(Value::Null),
            Some(actual) => self.get_converter(actual, destination)?.apply(value),
        }
    }

    fn not_found(&self, source: TypeHash, destination: TypeHash) -> ConversionError {
        ConversionError::NotFound {
            from: self.types.name(source),
            to: self.types.name(destination),
        }
    }

    // ==========================================================================
    // Strategy chain
    // ==========================================================================

    fn find(
        &self,
        source: TypeHash,
        destination: TypeHash,
        find_intermediate: bool,
        depth: u32,
    ) -> Option<(Strategy, ConversionEdge)> {
        trace!(
            "probing {} -> {} (intermediate: {}, depth: {})",
            self.types.name(source),
            self.types.name(destination),
            find_intermediate,
            depth
        );

        if let Some(edge) = self.exact(source, destination) {
            return Some((Strategy::Exact, edge));
        }

        if self.types.is_assignable(source, destination) {
            return Some((
                Strategy::Assignable,
                ConversionEdge::identity(source, destination),
            ));
        }

        if let Some(edge) = self.primitive_cast(source, destination) {
            return Some((Strategy::PrimitiveCast, edge));
        }

        if source == primitives::OBJECT {
            return Some((Strategy::DynamicSource, self.dynamic_source(destination)));
        }

        if let Some(edge) = arrays::array_to_array(self, source, destination) {
            return Some((Strategy::ArrayToArray, edge));
        }

        if let Some(edge) = generics::array_to_generic(self, source, destination) {
            return Some((Strategy::ArrayToGeneric, edge));
        }

        if let Some(edge) = generics::generic_to_array(self, source, destination) {
            return Some((Strategy::GenericToArray, edge));
        }

        if let Some(edge) = generics::shape_factory(self, source, destination) {
            return Some((Strategy::ShapeFactory, edge));
        }

        if source == primitives::OBJECT_ARRAY {
            return Some((
                Strategy::HeterogeneousArray,
                arrays::heterogeneous(self, destination),
            ));
        }

        if find_intermediate
            && let Some(edge) = self.chain(source, destination, depth)
        {
            return Some((Strategy::Chain, edge));
        }

        if depth > 0 {
            if let Some(edge) =
                hierarchy::base_type_fallback(self, source, destination, find_intermediate, depth)
            {
                return Some((Strategy::BaseType, edge));
            }

            if destination == primitives::STRING {
                return Some((Strategy::Text, Self::text(source)));
            }
        }

        None
    }

    /// Registered edge for the pair.
    pub(crate) fn exact(&self, source: TypeHash, destination: TypeHash) -> Option<ConversionEdge> {
        self.tables.exact.get(&(source, destination)).cloned()
    }

    /// Run the factory registered under `key`, if any.
    fn instantiate(
        &self,
        key: (TypeShape, TypeShape),
        source: TypeHash,
        destination: TypeHash,
    ) -> Option<ConversionEdge> {
        let factory = self.tables.factories.get(&key)?;
        trace!(
            "trying factory {} -> {}",
            key.0.describe(self.types()),
            key.1.describe(self.types())
        );
        factory.instantiate(self, source, destination)
    }

    fn primitive_cast(&self, source: TypeHash, destination: TypeHash) -> Option<ConversionEdge> {
        self.types.primitive_kind(source)?;
        let target = self.types.primitive_kind(destination)?;
        if target == PrimitiveKind::String {
            return None;
        }
        Some(ConversionEdge::new(source, destination, move |value| {
            cast_primitive(value, target)
        }))
    }

    /// Defers resolution to apply time, keyed on the value's runtime type.
    fn dynamic_source(&self, destination: TypeHash) -> ConversionEdge {
        let resolver = self.clone();
        ConversionEdge::new(primitives::OBJECT, destination, move |value| {
            resolver.convert(value, destination)
        })
    }

    fn chain(
        &self,
        source: TypeHash,
        destination: TypeHash,
        depth: u32,
    ) -> Option<ConversionEdge> {
        let intermediates = self.tables.adjacency.get(&source)?;
        intermediates.iter().find_map(|&intermediate| {
            let (_, second) = self.find(intermediate, destination, false, depth)?;
            let first = self.tables.exact.get(&(source, intermediate))?;
            Some(first.then(&second).retarget(source, destination))
        })
    }

    fn text(source: TypeHash) -> ConversionEdge {
        ConversionEdge::new(source, primitives::STRING, |value| {
            Ok(Value::String(value.to_text()))
        })
    }
}

impl fmt::Debug for Resolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolver")
            .field("edges", &self.tables.exact.len())
            .field("factories", &self.tables.factories.len())
            .field("options", &self.options)
            .finish()
    }
}
