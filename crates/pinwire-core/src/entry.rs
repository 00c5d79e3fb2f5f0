//! Type entries: what the catalog knows about one type.

use std::fmt;
use std::sync::Arc;

use crate::{PrimitiveKind, TypeHash, Value};

/// Produces the default ("empty") value of a type.
///
/// The entry being defaulted is passed in, so a generic definition's
/// default can read the instance's type arguments.
pub type DefaultFn = Arc<dyn Fn(&TypeEntry) -> Value + Send + Sync>;

/// The structural kind of a type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeKind {
    /// Built-in convertible primitive.
    Primitive(PrimitiveKind),
    /// The universal root type.
    Object,
    /// Module-defined concrete type.
    Class,
    /// Module-defined interface.
    Interface,
    /// Array type. `element` is `None` for the untyped array shape.
    Array { element: Option<TypeHash> },
    /// Open generic definition such as `Sequence<T>`.
    GenericDefinition { params: Vec<String> },
    /// Closed generic instance such as `Sequence<int>`.
    GenericInstance {
        definition: TypeHash,
        args: Vec<TypeHash>,
    },
}

/// Catalog entry for one type.
#[derive(Clone)]
pub struct TypeEntry {
    /// Display name (qualified for module types, `T[]` for arrays).
    pub name: String,
    /// Identity.
    pub type_hash: TypeHash,
    /// Structural kind.
    pub kind: TypeKind,
    /// Base type (single inheritance). `None` means the root.
    pub base: Option<TypeHash>,
    /// Implemented interfaces in declaration order.
    pub interfaces: Vec<TypeHash>,
    /// Default value constructor.
    pub default: Option<DefaultFn>,
}

impl TypeEntry {
    fn new(name: impl Into<String>, type_hash: TypeHash, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            type_hash,
            kind,
            base: None,
            interfaces: Vec::new(),
            default: None,
        }
    }

    /// Entry for a built-in primitive.
    pub fn primitive(kind: PrimitiveKind) -> Self {
        Self::new(kind.name(), kind.type_hash(), TypeKind::Primitive(kind))
    }

    /// Entry for a module class; hash is derived from the name.
    pub fn class(name: impl Into<String>) -> Self {
        let name = name.into();
        let type_hash = TypeHash::from_name(&name);
        Self::new(name, type_hash, TypeKind::Class)
    }

    /// Entry for a module interface; hash is derived from the name.
    pub fn interface(name: impl Into<String>) -> Self {
        let name = name.into();
        let type_hash = TypeHash::from_name(&name);
        Self::new(name, type_hash, TypeKind::Interface)
    }

    /// Entry for an open generic definition with the given parameter names.
    pub fn generic_definition(name: impl Into<String>, params: &[&str]) -> Self {
        let name = name.into();
        let type_hash = TypeHash::from_name(&name);
        let params = params.iter().map(|p| (*p).to_string()).collect();
        Self::new(name, type_hash, TypeKind::GenericDefinition { params })
    }

    /// Entry for an array of `element`.
    pub fn array(element: TypeHash, element_name: &str) -> Self {
        Self::new(
            format!("{}[]", element_name),
            TypeHash::array_of(element),
            TypeKind::Array {
                element: Some(element),
            },
        )
        .with_base(crate::primitives::ARRAY)
    }

    pub(crate) fn root() -> Self {
        Self::new("object", crate::primitives::OBJECT, TypeKind::Object)
    }

    pub(crate) fn untyped_array() -> Self {
        Self::new(
            "array",
            crate::primitives::ARRAY,
            TypeKind::Array { element: None },
        )
    }

    pub(crate) fn generic_instance(
        name: String,
        definition: &TypeEntry,
        args: Vec<TypeHash>,
    ) -> Self {
        let type_hash = TypeHash::from_generic_instance(definition.type_hash, &args);
        let mut entry = Self::new(
            name,
            type_hash,
            TypeKind::GenericInstance {
                definition: definition.type_hash,
                args,
            },
        );
        entry.base = definition.base;
        entry.default = definition.default.clone();
        entry
    }

    // === Builder Methods ===

    /// Set the base type.
    pub fn with_base(mut self, base: TypeHash) -> Self {
        self.base = Some(base);
        self
    }

    /// Add an implemented interface.
    pub fn with_interface(mut self, interface: TypeHash) -> Self {
        self.interfaces.push(interface);
        self
    }

    /// Set the default value constructor.
    pub fn with_default<F>(mut self, default: F) -> Self
    where
        F: Fn(&TypeEntry) -> Value + Send + Sync + 'static,
    {
        self.default = Some(Arc::new(default));
        self
    }

    // === Queries ===

    pub fn is_array(&self) -> bool {
        matches!(self.kind, TypeKind::Array { .. })
    }

    pub fn is_generic_instance(&self) -> bool {
        matches!(self.kind, TypeKind::GenericInstance { .. })
    }

    pub fn is_generic_definition(&self) -> bool {
        matches!(self.kind, TypeKind::GenericDefinition { .. })
    }

    pub fn is_interface(&self) -> bool {
        matches!(self.kind, TypeKind::Interface)
    }
}

impl fmt::Debug for TypeEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeEntry")
            .field("name", &self.name)
            .field("type_hash", &self.type_hash)
            .field("kind", &self.kind)
            .field("base", &self.base)
            .field("interfaces", &self.interfaces)
            .field("has_default", &self.default.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives;

    #[test]
    fn class_builder() {
        let shape = TypeEntry::interface("IShape");
        let entry = TypeEntry::class("Circle")
            .with_base(TypeHash::from_name("Figure"))
            .with_interface(shape.type_hash);

        assert_eq!(entry.type_hash, TypeHash::from_name("Circle"));
        assert_eq!(entry.base, Some(TypeHash::from_name("Figure")));
        assert_eq!(entry.interfaces, vec![shape.type_hash]);
        assert!(shape.is_interface());
    }

    #[test]
    fn array_entry() {
        let entry = TypeEntry::array(primitives::INT32, "int");
        assert_eq!(entry.name, "int[]");
        assert_eq!(entry.type_hash, TypeHash::array_of(primitives::INT32));
        assert_eq!(entry.base, Some(primitives::ARRAY));
        assert!(entry.is_array());
    }

    #[test]
    fn generic_instance_inherits_default() {
        let def = TypeEntry::generic_definition("Box", &["T"])
            .with_default(|_| Value::Int32(0));
        let instance =
            TypeEntry::generic_instance("Box<int>".to_string(), &def, vec![primitives::INT32]);

        assert!(def.is_generic_definition());
        assert!(instance.is_generic_instance());
        assert_eq!(
            instance.type_hash,
            TypeHash::from_generic_instance(def.type_hash, &[primitives::INT32])
        );
        let default = instance.default.as_ref().unwrap();
        assert_eq!(default(&instance), Value::Int32(0));
    }
}
