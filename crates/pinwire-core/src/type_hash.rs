//! Deterministic hash-based type identity.
//!
//! [`TypeHash`] is a 64-bit hash that identifies a type in the pinwire type
//! universe. Hashes are computed from names rather than handed out
//! sequentially, which gives:
//!
//! - Forward references (a module can name a type before it is registered)
//! - No registration order dependencies between modules
//! - Same name = same hash across independently loaded modules
//! - Cheap `Copy + Eq + Hash` keys for the converter maps
//!
//! # Examples
//!
//! ```
//! use pinwire_core::TypeHash;
//!
//! let image = TypeHash::from_name("Image");
//! assert_eq!(image, TypeHash::from_name("Image"));
//!
//! // Arrays and generic instances are derived structurally
//! let images = TypeHash::array_of(image);
//! assert_ne!(images, image);
//! ```

use std::fmt;
use xxhash_rust::xxh64::xxh64;

/// Domain-specific mixing constants for hash computation.
pub mod hash_constants {
    /// Separator constant for path components.
    pub const SEP: u64 = 0x4bc94d6bd06053ad;

    /// Domain marker for type hashes
    pub const TYPE: u64 = 0x2fac10b63a6cc57c;

    /// Argument position mixing constants.
    /// Each position gets a unique constant so argument order matters.
    pub const PARAM_MARKERS: [u64; 8] = [
        0x9e3779b97f4a7c15,
        0xbf58476d1ce4e5b9,
        0x94d049bb133111eb,
        0xd6e8feb86659fd93,
        0xe7037ed1a0b428db,
        0xc6a4a7935bd1e995,
        0x8648dbbc94d49b8d,
        0xa2b48b2c69e0d657,
    ];
}

/// A deterministic 64-bit hash identifying a type.
///
/// Two types are the same type iff their hashes are equal.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct TypeHash(pub u64);

impl TypeHash {
    /// Empty/invalid hash constant.
    pub const EMPTY: TypeHash = TypeHash(0);

    /// Create a type hash from a qualified type name.
    ///
    /// # Examples
    ///
    /// ```
    /// use pinwire_core::TypeHash;
    ///
    /// let hash1 = TypeHash::from_name("int");
    /// let hash2 = TypeHash::from_name("int");
    /// assert_eq!(hash1, hash2);
    /// ```
    #[inline]
    pub fn from_name(name: &str) -> Self {
        TypeHash(hash_constants::TYPE ^ xxh64(name.as_bytes(), 0))
    }

    /// Create the hash of a generic instance from its definition and arguments.
    ///
    /// Argument order matters - `Map<int, string>` differs from `Map<string, int>`.
    ///
    /// ```
    /// use pinwire_core::TypeHash;
    ///
    /// let sequence = TypeHash::from_name("Sequence");
    /// let int_hash = TypeHash::from_name("int");
    /// let seq_int = TypeHash::from_generic_instance(sequence, &[int_hash]);
    /// assert_ne!(seq_int, sequence);
    /// ```
    #[inline]
    pub const fn from_generic_instance(definition: TypeHash, args: &[TypeHash]) -> Self {
        let mut hash = definition.0;
        let mut i = 0;
        while i < args.len() {
            let marker = if i < hash_constants::PARAM_MARKERS.len() {
                hash_constants::PARAM_MARKERS[i]
            } else {
                hash_constants::PARAM_MARKERS[0].wrapping_add(i as u64)
            };
            // wrapping_mul keeps argument order significant
            hash = hash
                .wrapping_mul(hash_constants::SEP)
                .wrapping_add(marker ^ args[i].0);
            i += 1;
        }
        TypeHash(hash)
    }

    /// Hash of the array type whose elements are `element`.
    #[inline]
    pub const fn array_of(element: TypeHash) -> Self {
        Self::from_generic_instance(primitives::ARRAY, &[element])
    }

    /// Check if this is an empty/invalid hash.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Get the underlying u64 value.
    #[inline]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for TypeHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeHash({:#018x})", self.0)
    }
}

impl fmt::Display for TypeHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#018x}", self.0)
    }
}

/// Well-known constant hashes.
///
/// Primitive hashes are pre-computed from `TypeHash::from_name()` (TYPE
/// constant already XORed in).
pub mod primitives {
    use super::TypeHash;

    /// Hash for `bool` type
    pub const BOOL: TypeHash = TypeHash(0x1e0c8fa4cced99c1);

    /// Hash for `int8` type
    pub const INT8: TypeHash = TypeHash(0x2b44191092e74388);

    /// Hash for `int16` type
    pub const INT16: TypeHash = TypeHash(0x95aebfc985e9b115);

    /// Hash for `int` type (32-bit signed integer)
    pub const INT32: TypeHash = TypeHash(0x4f5e5320cd1c92bf);

    /// Hash for `int64` type
    pub const INT64: TypeHash = TypeHash(0x7d6c550df59a1924);

    /// Hash for `uint8` type
    pub const UINT8: TypeHash = TypeHash(0x0e8b2d31cdfa9716);

    /// Hash for `uint16` type
    pub const UINT16: TypeHash = TypeHash(0x269d68dfde65ae7f);

    /// Hash for `uint` type (32-bit unsigned integer)
    pub const UINT32: TypeHash = TypeHash(0x543fb8f520aa3e26);

    /// Hash for `uint64` type
    pub const UINT64: TypeHash = TypeHash(0x32ba58d17fda82dd);

    /// Hash for `float` type
    pub const FLOAT: TypeHash = TypeHash(0x02d5a2fddaf5bb69);

    /// Hash for `double` type
    pub const DOUBLE: TypeHash = TypeHash(0xeb125587f6c2a79b);

    /// Hash for `string` type
    pub const STRING: TypeHash = TypeHash(0x7a8d5fb1ba695978);

    /// The universal root type. Every value is an `object`.
    /// This is a special sentinel value, not computed from a name.
    pub const OBJECT: TypeHash = TypeHash(0xfffffffffffffffd);

    /// The untyped array shape (element type unknown).
    /// This is a special sentinel value, not computed from a name.
    pub const ARRAY: TypeHash = TypeHash(0xfffffffffffffffc);

    /// Array of untyped values (`object[]`), the heterogeneous array type.
    pub const OBJECT_ARRAY: TypeHash = TypeHash::array_of(OBJECT);
}
