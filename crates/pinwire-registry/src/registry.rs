//! ConverterRegistry - the store of conversion edges and factories.
//!
//! This module provides [`ConverterRegistry`], which owns the type catalog,
//! every directly registered [`ConversionEdge`] and every
//! [`DynamicConverterFactory`]. Resolution itself lives in
//! [`Resolver`]; the registry hands out resolvers through
//! [`ConverterRegistry::snapshot`].
//!
//! # Storage Model
//!
//! - **Exact**: edges keyed by `(source, destination)`
//! - **Adjacency**: per source, the destinations of its exact edges in
//!   insertion order; chaining walks this list
//! - **Factories**: keyed by `(TypeShape, TypeShape)`
//! - **Types**: the owned [`TypeCatalog`]
//!
//! # Thread Safety
//!
//! All state sits behind `Arc`s and mutators use copy-on-write
//! (`Arc::make_mut`). The typical pattern:
//!
//! - **Bootstrap phase**: modules register types, edges and factories
//!   through `&mut` access.
//!
//! - **Resolution phase**: [`snapshot`](ConverterRegistry::snapshot) returns
//!   a [`Resolver`] sharing the maps as they are now. Later mutations copy
//!   the maps first, so a snapshot never observes a half-applied change.
//!   `Resolver` is `Send + Sync`.
//!
//! # Example
//!
//! ```
//! use pinwire_core::{Value, primitives};
//! use pinwire_registry::{ConversionEdge, ConverterRegistry};
//!
//! let mut registry = ConverterRegistry::new();
//! registry
//!     .add_converter(ConversionEdge::from_fn(|x: i32| f64::from(x)))
//!     .unwrap();
//!
//! let edge = registry.get_converter(primitives::INT32, primitives::DOUBLE).unwrap();
//! assert_eq!(edge.apply(Value::Int32(2)), Ok(Value::Double(2.0)));
//! ```

use std::fmt;
use std::sync::Arc;

use log::debug;
use rustc_hash::FxHashMap;

use pinwire_core::{
    ConversionError, RegistrationError, TypeCatalog, TypeEntry, TypeHash, TypeUniverse,
};

use crate::{
    ConversionEdge, DuplicatePolicy, DynamicConverterFactory, RegistryOptions, Resolver,
    TypeShape,
};

/// Edge and factory maps shared between a registry and its snapshots.
#[derive(Clone, Default)]
pub(crate) struct ConverterTables {
    pub(crate) exact: FxHashMap<(TypeHash, TypeHash), ConversionEdge>,
    pub(crate) adjacency: FxHashMap<TypeHash, Vec<TypeHash>>,
    pub(crate) factories: FxHashMap<(TypeShape, TypeShape), DynamicConverterFactory>,
}

/// Registry of conversion edges and dynamic converter factories.
#[derive(Clone)]
pub struct ConverterRegistry {
    types: Arc<TypeCatalog>,
    tables: Arc<ConverterTables>,
    options: RegistryOptions,
}

impl fmt::Debug for ConverterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConverterRegistry")
            .field("types", &self.types.len())
            .field("edges", &self.tables.exact.len())
            .field("factories", &self.tables.factories.len())
            .field("options", &self.options)
            .finish()
    }
}

impl Default for ConverterRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ConverterRegistry {
    /// Create a registry with default options and a catalog of the built-in
    /// types.
    pub fn new() -> Self {
        Self::with_options(RegistryOptions::default())
    }

    pub fn with_options(options: RegistryOptions) -> Self {
        Self::with_catalog(TypeCatalog::with_builtins(), options)
    }

    /// Create a registry around an existing catalog.
    pub fn with_catalog(catalog: TypeCatalog, options: RegistryOptions) -> Self {
        Self {
            types: Arc::new(catalog),
            tables: Arc::new(ConverterTables::default()),
            options,
        }
    }

    pub fn options(&self) -> &RegistryOptions {
        &self.options
    }

    // ==========================================================================
    // Types
    // ==========================================================================

    pub fn types(&self) -> &TypeCatalog {
        &self.types
    }

    /// Mutable access to the catalog. Copies it if a snapshot shares it.
    pub fn types_mut(&mut self) -> &mut TypeCatalog {
        Arc::make_mut(&mut self.types)
    }

    /// Register a type in the owned catalog.
    pub fn register_type(&mut self, entry: TypeEntry) -> Result<TypeHash, RegistrationError> {
        let name = entry.name.clone();
        let hash = self.types_mut().register(entry)?;
        debug!("registered type '{}' ({})", name, hash);
        Ok(hash)
    }

    /// Register the closed generic instance `definition<args...>`.
    pub fn register_generic_instance(
        &mut self,
        definition: TypeHash,
        args: &[TypeHash],
    ) -> Result<TypeHash, RegistrationError> {
        self.types_mut().register_generic_instance(definition, args)
    }

    // ==========================================================================
    // Edges
    // ==========================================================================

    /// Add a direct converter.
    ///
    /// The edge becomes the exact match for its pair and its destination is
    /// appended to the source's adjacency list, making it a chaining
    /// candidate.
    ///
    /// # Errors
    ///
    /// Returns `RegistrationError::DuplicateConverter` if the pair already
    /// has an edge and the duplicate policy is `Reject`.
    pub fn add_converter(&mut self, edge: ConversionEdge) -> Result<(), RegistrationError> {
        let key = (edge.source(), edge.destination());
        let replace = self.tables.exact.contains_key(&key);
        if replace && self.options.duplicate_policy == DuplicatePolicy::Reject {
            return Err(RegistrationError::DuplicateConverter {
                from: self.types.name(key.0),
                to: self.types.name(key.1),
            });
        }

        debug!(
            "{} converter {} -> {}",
            if replace { "replacing" } else { "adding" },
            self.types.name(key.0),
            self.types.name(key.1)
        );

        let tables = Arc::make_mut(&mut self.tables);
        tables.exact.insert(key, edge);
        if !replace {
            tables.adjacency.entry(key.0).or_default().push(key.1);
        }
        Ok(())
    }

    /// Add several converters, stopping at the first error.
    pub fn add_converters<I>(&mut self, edges: I) -> Result<(), RegistrationError>
    where
        I: IntoIterator<Item = ConversionEdge>,
    {
        edges
            .into_iter()
            .try_for_each(|edge| self.add_converter(edge))
    }

    /// Remove the direct converter for a pair.
    ///
    /// The adjacency entry goes with it, so the removed edge no longer
    /// takes part in chaining.
    pub fn remove_converter(
        &mut self,
        source: TypeHash,
        destination: TypeHash,
    ) -> Option<ConversionEdge> {
        if !self.tables.exact.contains_key(&(source, destination)) {
            return None;
        }

        let tables = Arc::make_mut(&mut self.tables);
        let removed = tables.exact.remove(&(source, destination));
        if let Some(next) = tables.adjacency.get_mut(&source) {
            next.retain(|ty| *ty != destination);
            if next.is_empty() {
                tables.adjacency.remove(&source);
            }
        }

        debug!(
            "removed converter {} -> {}",
            self.types.name(source),
            self.types.name(destination)
        );
        removed
    }

    // ==========================================================================
    // Factories
    // ==========================================================================

    /// Register a factory for a pair of shapes.
    ///
    /// # Errors
    ///
    /// Returns `RegistrationError::DuplicateFactory` if the key is taken and
    /// the duplicate policy is `Reject`.
    pub fn add_dynamic_converter(
        &mut self,
        source: TypeShape,
        destination: TypeShape,
        factory: DynamicConverterFactory,
    ) -> Result<(), RegistrationError> {
        let key = (source, destination);
        if self.tables.factories.contains_key(&key)
            && self.options.duplicate_policy == DuplicatePolicy::Reject
        {
            return Err(RegistrationError::DuplicateFactory {
                from: source.describe(&*self.types),
                to: destination.describe(&*self.types),
            });
        }

        debug!(
            "adding converter factory {} -> {}",
            source.describe(&*self.types),
            destination.describe(&*self.types)
        );
        Arc::make_mut(&mut self.tables)
            .factories
            .insert(key, factory);
        Ok(())
    }

    pub fn remove_dynamic_converter(
        &mut self,
        source: TypeShape,
        destination: TypeShape,
    ) -> Option<DynamicConverterFactory> {
        if !self.tables.factories.contains_key(&(source, destination)) {
            return None;
        }
        debug!(
            "removed converter factory {} -> {}",
            source.describe(&*self.types),
            destination.describe(&*self.types)
        );
        Arc::make_mut(&mut self.tables)
            .factories
            .remove(&(source, destination))
    }

    // ==========================================================================
    // Resolution
    // ==========================================================================

    /// Immutable resolver over the current state.
    pub fn snapshot(&self) -> Resolver {
        let types: Arc<dyn TypeUniverse> = self.types.clone();
        Resolver::new(types, Arc::clone(&self.tables), self.options)
    }

    /// Resolve a converter or fail with `ConversionError::NotFound`.
    pub fn get_converter(
        &self,
        source: TypeHash,
        destination: TypeHash,
    ) -> Result<ConversionEdge, ConversionError> {
        self.snapshot().get_converter(source, destination)
    }

    /// Resolve a converter with the configured chaining and depth.
    pub fn try_get_converter(
        &self,
        source: TypeHash,
        destination: TypeHash,
    ) -> Option<ConversionEdge> {
        self.snapshot().try_get_converter(source, destination)
    }

    /// Resolve a converter with explicit chaining and depth budget.
    pub fn try_get_converter_with(
        &self,
        source: TypeHash,
        destination: TypeHash,
        find_intermediate: bool,
        depth: u32,
    ) -> Option<ConversionEdge> {
        self.snapshot()
            .try_get_converter_with(source, destination, find_intermediate, depth)
    }

    // ==========================================================================
    // Enumeration
    // ==========================================================================

    /// Number of directly registered edges.
    pub fn len(&self) -> usize {
        self.tables.exact.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.exact.is_empty()
    }

    /// Whether a direct edge exists for the pair. Synthesised converters
    /// are not considered.
    pub fn contains(&self, source: TypeHash, destination: TypeHash) -> bool {
        self.tables.exact.contains_key(&(source, destination))
    }

    /// Directly registered edges in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = &ConversionEdge> {
        self.tables.exact.values()
    }

    /// Number of registered factories.
    pub fn factory_count(&self) -> usize {
        self.tables.factories.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pinwire_core::{Value, primitives};

    fn int_to_double() -> ConversionEdge {
        ConversionEdge::from_fn(|x: i32| f64::from(x))
    }

    #[test]
    fn new_registry_is_empty() {
        let registry = ConverterRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
        assert_eq!(registry.factory_count(), 0);
        assert!(registry.types().contains(primitives::INT32));
    }

    #[test]
    fn add_converter_updates_exact_and_adjacency() {
        let mut registry = ConverterRegistry::new();
        registry.add_converter(int_to_double()).unwrap();

        assert_eq!(registry.len(), 1);
        assert!(registry.contains(primitives::INT32, primitives::DOUBLE));
        assert_eq!(
            registry.tables.adjacency.get(&primitives::INT32),
            Some(&vec![primitives::DOUBLE])
        );
    }

    #[test]
    fn duplicate_converter_rejected_by_default() {
        let mut registry = ConverterRegistry::new();
        registry.add_converter(int_to_double()).unwrap();

        let err = registry.add_converter(int_to_double()).unwrap_err();
        assert_eq!(
            err,
            RegistrationError::DuplicateConverter {
                from: "int".to_string(),
                to: "double".to_string(),
            }
        );
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn duplicate_converter_replaced_without_duplicate_adjacency() {
        let options = RegistryOptions::default().with_duplicate_policy(DuplicatePolicy::Replace);
        let mut registry = ConverterRegistry::with_options(options);
        registry.add_converter(int_to_double()).unwrap();
        registry
            .add_converter(ConversionEdge::from_fn(|x: i32| f64::from(x) * 10.0))
            .unwrap();

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.tables.adjacency[&primitives::INT32].len(), 1);
        let edge = registry
            .get_converter(primitives::INT32, primitives::DOUBLE)
            .unwrap();
        assert_eq!(edge.apply(Value::Int32(2)), Ok(Value::Double(20.0)));
    }

    #[test]
    fn remove_converter_is_symmetric() {
        let mut registry = ConverterRegistry::new();
        registry.add_converter(int_to_double()).unwrap();

        let removed = registry.remove_converter(primitives::INT32, primitives::DOUBLE);
        assert!(removed.is_some());
        assert!(registry.is_empty());
        assert!(!registry.tables.adjacency.contains_key(&primitives::INT32));
        assert!(
            registry
                .remove_converter(primitives::INT32, primitives::DOUBLE)
                .is_none()
        );
    }

    #[test]
    fn add_converters_stops_at_first_error() {
        let mut registry = ConverterRegistry::new();
        let result = registry.add_converters([
            int_to_double(),
            int_to_double(),
            ConversionEdge::from_fn(|x: bool| i32::from(x)),
        ]);

        assert!(result.is_err());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn factories_follow_duplicate_policy() {
        let mut registry = ConverterRegistry::new();
        let factory = DynamicConverterFactory::new(|_, _, _| None);

        registry
            .add_dynamic_converter(TypeShape::AnySource, TypeShape::ARRAY, factory.clone())
            .unwrap();
        assert!(matches!(
            registry.add_dynamic_converter(TypeShape::AnySource, TypeShape::ARRAY, factory),
            Err(RegistrationError::DuplicateFactory { .. })
        ));
        assert_eq!(registry.factory_count(), 1);

        assert!(
            registry
                .remove_dynamic_converter(TypeShape::AnySource, TypeShape::ARRAY)
                .is_some()
        );
        assert_eq!(registry.factory_count(), 0);
    }

    #[test]
    fn register_type_forwards_to_catalog() {
        let mut registry = ConverterRegistry::new();
        let hash = registry.register_type(TypeEntry::class("Widget")).unwrap();

        assert_eq!(registry.types().name(hash), "Widget");
        assert!(registry.types().contains(TypeHash::array_of(hash)));
        assert!(matches!(
            registry.register_type(TypeEntry::class("Widget")),
            Err(RegistrationError::DuplicateType(_))
        ));
    }

    #[test]
    fn snapshot_is_isolated_from_later_mutation() {
        let mut registry = ConverterRegistry::new();
        registry.add_converter(int_to_double()).unwrap();
        let snapshot = registry.snapshot();

        registry.remove_converter(primitives::INT32, primitives::DOUBLE);
        let widget = registry.register_type(TypeEntry::class("Widget")).unwrap();

        assert!(
            snapshot
                .exact(primitives::INT32, primitives::DOUBLE)
                .is_some()
        );
        assert!(snapshot.types().entry(widget).is_none());
        assert!(registry.types().contains(widget));
    }

    #[test]
    fn iter_lists_only_direct_edges() {
        let mut registry = ConverterRegistry::new();
        registry.add_converter(int_to_double()).unwrap();
        registry
            .add_converter(ConversionEdge::from_fn(|x: f64| x.to_string()))
            .unwrap();

        // Chaining can synthesise int -> string, but it is never stored.
        assert!(
            registry
                .try_get_converter(primitives::INT32, primitives::STRING)
                .is_some()
        );
        assert_eq!(registry.iter().count(), 2);
        assert!(!registry.contains(primitives::INT32, primitives::STRING));
    }
}
