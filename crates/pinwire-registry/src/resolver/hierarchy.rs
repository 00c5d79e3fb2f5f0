//! Base type fallback.
//!
//! When nothing converts `source` to `destination` directly, retry with the
//! source's base type and interfaces, then via the destination's base type
//! and interfaces as a two-hop path. Every retry spends one level of the
//! depth budget, which bounds the search over cyclic interface graphs.

use pinwire_core::{TypeHash, TypeUniverse, primitives};

use super::Resolver;
use crate::ConversionEdge;

pub(super) fn base_type_fallback(
    resolver: &Resolver,
    source: TypeHash,
    destination: TypeHash,
    find_intermediate: bool,
    depth: u32,
) -> Option<ConversionEdge> {
    let types = resolver.types();
    let depth = depth.saturating_sub(1);

    let source_bases = related(types, source, true);
    let mut destination_bases = related(types, destination, false);
    // Stable: generic instances first, declaration order otherwise.
    destination_bases.sort_by_key(|ty| !types.is_generic(*ty));

    for &from in &source_bases {
        if let Some((_, edge)) = resolver.find(from, destination, find_intermediate, depth) {
            return Some(edge.retarget(source, destination));
        }
    }

    for &from in &source_bases {
        for &via in &destination_bases {
            let Some((_, first)) = resolver.find(from, via, find_intermediate, depth) else {
                continue;
            };
            if let Some((_, second)) = resolver.find(via, destination, find_intermediate, depth) {
                return Some(first.then(&second).retarget(source, destination));
            }
        }
    }

    None
}

/// `ty` (optionally), its base type and its interfaces, without the root
/// and the untyped array shape.
fn related(types: &dyn TypeUniverse, ty: TypeHash, include_self: bool) -> Vec<TypeHash> {
    let candidates = include_self
        .then_some(ty)
        .into_iter()
        .chain(types.base_type(ty))
        .chain(types.interfaces(ty).iter().copied());

    let mut out = Vec::new();
    for candidate in candidates {
        let sentinel = candidate == primitives::OBJECT || candidate == primitives::ARRAY;
        if !sentinel && !out.contains(&candidate) {
            out.push(candidate);
        }
    }
    out
}
