//! The type universe.
//!
//! [`TypeUniverse`] is the single capability interface the resolver
//! consumes: given a [`TypeHash`] it answers the structural questions the
//! conversion strategies need (array element, generic definition and
//! arguments, base type, interfaces, primitive kind, default value).
//! Everything except [`TypeUniverse::entry`] has a default implementation in
//! terms of the entry.
//!
//! [`TypeCatalog`] is the explicit type registry implementing it. Modules
//! register their types into it at load time.
//!
//! # Thread Safety
//!
//! `TypeCatalog` is plain data with no interior mutability. It is populated
//! during bootstrap through `&mut` access and shared read-only afterwards.
//!
//! # Example
//!
//! ```
//! use pinwire_core::{TypeCatalog, TypeEntry, TypeUniverse, TypeHash, primitives};
//!
//! let mut catalog = TypeCatalog::with_builtins();
//! let shape = catalog.register(TypeEntry::interface("IShape")).unwrap();
//! let circle = catalog
//!     .register(TypeEntry::class("Circle").with_interface(shape))
//!     .unwrap();
//!
//! assert!(catalog.is_assignable(circle, shape));
//! assert!(catalog.is_array(TypeHash::array_of(circle)));
//! assert!(catalog.contains(primitives::INT32));
//! ```

use rustc_hash::{FxHashMap, FxHashSet};

use crate::{
    ArrayValue, PrimitiveKind, RegistrationError, TypeEntry, TypeHash, TypeKind, Value,
    primitives,
};

/// Array dimensions registered alongside every type (`T[]` to `T[][][]`).
pub const MAX_ARRAY_RANK: usize = 3;

/// Structural view of the type universe.
pub trait TypeUniverse: Send + Sync {
    /// Look up the entry for a type.
    fn entry(&self, ty: TypeHash) -> Option<&TypeEntry>;

    /// Display name; unknown types render as their hash.
    fn name(&self, ty: TypeHash) -> String {
        self.entry(ty)
            .map(|e| e.name.clone())
            .unwrap_or_else(|| ty.to_string())
    }

    /// Element type of an array type. `None` for non-arrays and for the
    /// untyped array shape.
    fn element_type(&self, ty: TypeHash) -> Option<TypeHash> {
        match self.entry(ty)?.kind {
            TypeKind::Array { element } => element,
            _ => None,
        }
    }

    fn is_array(&self, ty: TypeHash) -> bool {
        self.entry(ty).is_some_and(TypeEntry::is_array)
    }

    /// Generic definition of a closed generic instance.
    fn generic_definition(&self, ty: TypeHash) -> Option<TypeHash> {
        match self.entry(ty)?.kind {
            TypeKind::GenericInstance { definition, .. } => Some(definition),
            _ => None,
        }
    }

    /// Type arguments of a closed generic instance, empty otherwise.
    fn generic_arguments(&self, ty: TypeHash) -> &[TypeHash] {
        match self.entry(ty).map(|e| &e.kind) {
            Some(TypeKind::GenericInstance { args, .. }) => args.as_slice(),
            _ => &[],
        }
    }

    fn is_generic(&self, ty: TypeHash) -> bool {
        self.entry(ty).is_some_and(TypeEntry::is_generic_instance)
    }

    fn base_type(&self, ty: TypeHash) -> Option<TypeHash> {
        self.entry(ty)?.base
    }

    /// Directly implemented interfaces in declaration order.
    fn interfaces(&self, ty: TypeHash) -> &[TypeHash] {
        self.entry(ty).map(|e| e.interfaces.as_slice()).unwrap_or(&[])
    }

    fn primitive_kind(&self, ty: TypeHash) -> Option<PrimitiveKind> {
        match self.entry(ty)?.kind {
            TypeKind::Primitive(kind) => Some(kind),
            _ => None,
        }
    }

    /// Whether a `source` value can be used as a `destination` unchanged:
    /// same type, the root, or a transitive base type or interface.
    ///
    /// The walk tracks visited types, so cyclic interface graphs terminate.
    fn is_assignable(&self, source: TypeHash, destination: TypeHash) -> bool {
        if source == destination || destination == primitives::OBJECT {
            return true;
        }

        let mut visited = FxHashSet::default();
        let mut pending = vec![source];
        visited.insert(source);

        while let Some(current) = pending.pop() {
            let parents = self
                .base_type(current)
                .into_iter()
                .chain(self.interfaces(current).iter().copied());
            for parent in parents {
                if parent == destination {
                    return true;
                }
                if visited.insert(parent) {
                    pending.push(parent);
                }
            }
        }
        false
    }

    /// The "empty" value of a type: an empty typed array for arrays, the
    /// registered default for module types, zero for numeric primitives,
    /// and `Null` otherwise.
    fn default_value(&self, ty: TypeHash) -> Value {
        let Some(entry) = self.entry(ty) else {
            return Value::Null;
        };
        if let Some(default) = &entry.default {
            return default(entry);
        }
        match entry.kind {
            TypeKind::Array { element: Some(element) } => {
                Value::Array(ArrayValue::typed(element, Vec::new()))
            }
            TypeKind::Array { element: None } => {
                Value::Array(ArrayValue::heterogeneous(Vec::new()))
            }
            TypeKind::Primitive(kind) => zero_value(kind),
            _ => Value::Null,
        }
    }
}

fn zero_value(kind: PrimitiveKind) -> Value {
    match kind {
        PrimitiveKind::Bool => Value::Bool(false),
        PrimitiveKind::Int8 => Value::Int8(0),
        PrimitiveKind::Int16 => Value::Int16(0),
        PrimitiveKind::Int32 => Value::Int32(0),
        PrimitiveKind::Int64 => Value::Int64(0),
        PrimitiveKind::Uint8 => Value::UInt8(0),
        PrimitiveKind::Uint16 => Value::UInt16(0),
        PrimitiveKind::Uint32 => Value::UInt32(0),
        PrimitiveKind::Uint64 => Value::UInt64(0),
        PrimitiveKind::Float => Value::Float(0.0),
        PrimitiveKind::Double => Value::Double(0.0),
        PrimitiveKind::String => Value::Null,
    }
}

/// Explicit type registry.
#[derive(Debug, Clone, Default)]
pub struct TypeCatalog {
    types: FxHashMap<TypeHash, TypeEntry>,
    /// Name index for lookup by display name.
    by_name: FxHashMap<String, TypeHash>,
}

impl TypeCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a catalog with the root, the untyped array shape, every
    /// primitive, and the array types of each of them.
    pub fn with_builtins() -> Self {
        let mut catalog = Self::new();
        catalog.insert(TypeEntry::root());
        catalog.insert(TypeEntry::untyped_array());
        catalog.register_arrays(primitives::OBJECT);
        for kind in PrimitiveKind::ALL {
            catalog.insert(TypeEntry::primitive(kind));
            catalog.register_arrays(kind.type_hash());
        }
        catalog
    }

    fn insert(&mut self, entry: TypeEntry) {
        self.by_name.insert(entry.name.clone(), entry.type_hash);
        self.types.insert(entry.type_hash, entry);
    }

    /// Register a type.
    ///
    /// Registering a non-array, non-generic-definition type also registers
    /// its array types up to [`MAX_ARRAY_RANK`], so `T[]` and `T[][]` are
    /// always known for a registered `T`.
    ///
    /// # Errors
    ///
    /// Returns `RegistrationError::DuplicateType` if the hash is taken.
    pub fn register(&mut self, entry: TypeEntry) -> Result<TypeHash, RegistrationError> {
        if self.types.contains_key(&entry.type_hash) {
            return Err(RegistrationError::DuplicateType(entry.name));
        }

        let hash = entry.type_hash;
        let wants_array = !entry.is_array() && !entry.is_generic_definition();
        self.insert(entry);
        if wants_array {
            self.register_arrays(hash);
        }
        Ok(hash)
    }

    /// Register the array type of `element` if it is not known yet.
    ///
    /// Idempotent; returns the array's hash either way.
    pub fn register_array(&mut self, element: TypeHash) -> TypeHash {
        let hash = TypeHash::array_of(element);
        if !self.types.contains_key(&hash) {
            let element_name = self.name(element);
            self.insert(TypeEntry::array(element, &element_name));
        }
        hash
    }

    /// Register `element[]`, `element[][]` and so on up to
    /// [`MAX_ARRAY_RANK`] dimensions.
    fn register_arrays(&mut self, element: TypeHash) {
        let mut current = element;
        for _ in 0..MAX_ARRAY_RANK {
            current = self.register_array(current);
        }
    }

    /// Register (or look up) the closed instance `definition<args...>`.
    ///
    /// The instance inherits the definition's base type and default value
    /// constructor. Its array types are registered alongside it.
    ///
    /// # Errors
    ///
    /// - `UnknownGenericDefinition` if `definition` is not registered
    /// - `NotGenericDefinition` if it is not an open generic
    /// - `GenericArityMismatch` if the argument count is wrong
    pub fn register_generic_instance(
        &mut self,
        definition: TypeHash,
        args: &[TypeHash],
    ) -> Result<TypeHash, RegistrationError> {
        let def = self
            .types
            .get(&definition)
            .ok_or(RegistrationError::UnknownGenericDefinition(definition))?;

        let TypeKind::GenericDefinition { params } = &def.kind else {
            return Err(RegistrationError::NotGenericDefinition(def.name.clone()));
        };
        if params.len() != args.len() {
            return Err(RegistrationError::GenericArityMismatch {
                name: def.name.clone(),
                expected: params.len(),
                actual: args.len(),
            });
        }

        let hash = TypeHash::from_generic_instance(definition, args);
        if self.types.contains_key(&hash) {
            return Ok(hash);
        }

        let arg_names: Vec<String> = args.iter().map(|a| self.name(*a)).collect();
        let name = format!("{}<{}>", def.name, arg_names.join(", "));
        let entry = TypeEntry::generic_instance(name, def, args.to_vec());
        self.insert(entry);
        self.register_arrays(hash);
        Ok(hash)
    }

    /// Get an entry by hash.
    pub fn get(&self, ty: TypeHash) -> Option<&TypeEntry> {
        self.types.get(&ty)
    }

    /// Get an entry by display name.
    pub fn get_by_name(&self, name: &str) -> Option<&TypeEntry> {
        self.by_name.get(name).and_then(|hash| self.types.get(hash))
    }

    pub fn contains(&self, ty: TypeHash) -> bool {
        self.types.contains_key(&ty)
    }

    /// Number of registered types, including synthesised array types.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Iterate over all entries in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = &TypeEntry> {
        self.types.values()
    }
}

impl TypeUniverse for TypeCatalog {
    fn entry(&self, ty: TypeHash) -> Option<&TypeEntry> {
        self.types.get(&ty)
    }

    /// Unregistered arrays of a registered element render as `T[]`.
    fn name(&self, ty: TypeHash) -> String {
        if let Some(entry) = self.types.get(&ty) {
            return entry.name.clone();
        }
        self.types
            .values()
            .find(|entry| TypeHash::array_of(entry.type_hash) == ty)
            .map(|entry| format!("{}[]", entry.name))
            .unwrap_or_else(|| ty.to_string())
    }
}
