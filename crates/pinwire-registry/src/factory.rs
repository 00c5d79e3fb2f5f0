//! Dynamic converter factories.
//!
//! A factory builds a [`ConversionEdge`] on demand for a concrete
//! `(source, destination)` pair whose shapes matched the factory's key.
//! Factories receive the [`Resolver`] so they can inspect generic
//! arguments and resolve element converters recursively.
//!
//! Returning `None` means "not applicable to this pair"; resolution then
//! continues with the next strategy. A factory that panics is not caught.

use std::fmt;
use std::sync::Arc;

use pinwire_core::TypeHash;

use crate::{ConversionEdge, Resolver};

/// Signature of a factory function.
pub type FactoryFn =
    Arc<dyn Fn(&Resolver, TypeHash, TypeHash) -> Option<ConversionEdge> + Send + Sync>;

/// Deferred constructor of conversion edges.
#[derive(Clone)]
pub struct DynamicConverterFactory {
    func: FactoryFn,
}

impl DynamicConverterFactory {
    pub fn new<F>(func: F) -> Self
    where
        F: Fn(&Resolver, TypeHash, TypeHash) -> Option<ConversionEdge> + Send + Sync + 'static,
    {
        Self {
            func: Arc::new(func),
        }
    }

    /// Build the edge for `(source, destination)`.
    ///
    /// Whatever endpoints the factory reports, the returned edge is
    /// retargeted to the requested pair.
    pub fn instantiate(
        &self,
        resolver: &Resolver,
        source: TypeHash,
        destination: TypeHash,
    ) -> Option<ConversionEdge> {
        (self.func)(resolver, source, destination)
            .map(|edge| edge.retarget(source, destination))
    }
}

impl fmt::Debug for DynamicConverterFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DynamicConverterFactory").finish_non_exhaustive()
    }
}
