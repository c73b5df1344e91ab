//! Resource discovery across every search root.

use indexmap::IndexSet;

use crate::error::LoaderError;
use crate::resource::ResourceLocation;
use crate::roots::SearchRootSet;

/// Every location bound to `path` by any root, duplicates collapsed.
///
/// Locations keep the order in which they were first seen: root order, then
/// each root's own enumeration order. No precedence between same-named
/// resources from different roots is implied by that order.
///
/// # Errors
/// Returns the first enumeration failure. A root without the resource is
/// skipped silently.
pub fn locate_resources(
    path: &str,
    roots: &SearchRootSet,
) -> Result<IndexSet<ResourceLocation>, LoaderError> {
    let mut found = IndexSet::new();
    for root in roots {
        let locations = root.resources(path)?;
        tracing::trace!(
            loader = root.name(),
            path,
            count = locations.len(),
            "enumerated resources"
        );
        found.extend(locations);
    }
    tracing::debug!(path, count = found.len(), "located resources");
    Ok(found)
}
