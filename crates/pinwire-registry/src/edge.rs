//! Conversion edges: one callable converting values of a source type into
//! values of a destination type.

use std::fmt;
use std::sync::Arc;

use pinwire_core::{ConversionError, FromValue, IntoValue, TypeHash, Typed, Value};

/// The function behind a [`ConversionEdge`].
pub type ConvertFn = Arc<dyn Fn(Value) -> Result<Value, ConversionError> + Send + Sync>;

/// A converter between two types.
///
/// Edges are immutable once built and cheap to clone; the function is
/// shared behind an `Arc`. `intermediate` is informational only and names
/// the type a composed edge passes through.
#[derive(Clone)]
pub struct ConversionEdge {
    source: TypeHash,
    destination: TypeHash,
    intermediate: Option<TypeHash>,
    func: ConvertFn,
}

impl ConversionEdge {
    /// Create an edge from an untyped conversion function.
    pub fn new<F>(source: TypeHash, destination: TypeHash, func: F) -> Self
    where
        F: Fn(Value) -> Result<Value, ConversionError> + Send + Sync + 'static,
    {
        Self {
            source,
            destination,
            intermediate: None,
            func: Arc::new(func),
        }
    }

    /// Create an edge from an infallible, strongly typed closure.
    ///
    /// Source and destination come from the [`Typed`] impls of the closure's
    /// parameter and return type.
    ///
    /// ```
    /// use pinwire_core::{Value, primitives};
    /// use pinwire_registry::ConversionEdge;
    ///
    /// let edge = ConversionEdge::from_fn(|x: i32| f64::from(x) * 0.5);
    /// assert_eq!(edge.source(), primitives::INT32);
    /// assert_eq!(edge.destination(), primitives::DOUBLE);
    /// assert_eq!(edge.apply(Value::Int32(3)), Ok(Value::Double(1.5)));
    /// ```
    pub fn from_fn<S, D, F>(func: F) -> Self
    where
        S: Typed + FromValue,
        D: Typed + IntoValue,
        F: Fn(S) -> D + Send + Sync + 'static,
    {
        Self::new(S::type_hash(), D::type_hash(), move |value| {
            S::from_value(value).map(|input| func(input).into_value())
        })
    }

    /// Create an edge from a fallible, strongly typed closure.
    pub fn try_from_fn<S, D, F>(func: F) -> Self
    where
        S: Typed + FromValue,
        D: Typed + IntoValue,
        F: Fn(S) -> Result<D, ConversionError> + Send + Sync + 'static,
    {
        Self::new(S::type_hash(), D::type_hash(), move |value| {
            func(S::from_value(value)?).map(IntoValue::into_value)
        })
    }

    /// Pass-through edge. Values are returned unchanged.
    pub fn identity(source: TypeHash, destination: TypeHash) -> Self {
        Self::new(source, destination, Ok)
    }

    /// Compose `self` followed by `next`.
    ///
    /// The result converts `self.source()` into `next.destination()` and
    /// records `self.destination()` as its intermediate type.
    pub fn then(&self, next: &ConversionEdge) -> ConversionEdge {
        let first = Arc::clone(&self.func);
        let second = Arc::clone(&next.func);
        Self {
            source: self.source,
            destination: next.destination,
            intermediate: Some(self.destination),
            func: Arc::new(move |value| second(first(value)?)),
        }
    }

    /// Same function, reported under different endpoints.
    ///
    /// Used when an edge found for a related pair (a base type, a chain)
    /// answers a request for `(source, destination)`.
    pub fn retarget(mut self, source: TypeHash, destination: TypeHash) -> Self {
        if self.source != source && self.intermediate.is_none() {
            self.intermediate = Some(self.source);
        }
        self.source = source;
        self.destination = destination;
        self
    }

    /// Convert one value.
    #[inline]
    pub fn apply(&self, value: Value) -> Result<Value, ConversionError> {
        (self.func)(value)
    }

    #[inline]
    pub fn source(&self) -> TypeHash {
        self.source
    }

    #[inline]
    pub fn destination(&self) -> TypeHash {
        self.destination
    }

    #[inline]
    pub fn intermediate(&self) -> Option<TypeHash> {
        self.intermediate
    }
}

impl fmt::Debug for ConversionEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionEdge")
            .field("source", &self.source)
            .field("destination", &self.destination)
            .field("intermediate", &self.intermediate)
            .finish_non_exhaustive()
    }
}
