//! Type resolution along each root's delegation chain.

use std::collections::HashSet;
use std::sync::Arc;

use crate::loader::{loader_id, LoadedType};
use crate::roots::SearchRootSet;

/// Resolve `type_name` against `roots`.
///
/// Each root's chain (root, parent, grandparent, …) is walked in turn. A
/// link already tried through an earlier root is not asked again, and
/// neither is anything above it. Returns `None` when no link defines the
/// type.
pub fn resolve_type(type_name: &str, roots: &SearchRootSet) -> Option<LoadedType> {
    let mut tried: HashSet<*const ()> = HashSet::new();

    for root in roots {
        let mut link = Some(Arc::clone(root));
        while let Some(current) = link {
            // The rest of this chain was walked from an earlier link.
            if !tried.insert(loader_id(&current)) {
                break;
            }
            tracing::trace!(loader = current.name(), type_name, "trying loader");
            if let Some(found) = current.find_type(type_name) {
                tracing::debug!(loader = found.loader(), type_name, "resolved type");
                return Some(found);
            }
            link = current.parent();
        }
    }

    tracing::debug!(type_name, "type not found in any search root");
    None
}
