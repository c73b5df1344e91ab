//! Folding descriptor entries into the final ordered plugin list.

use std::collections::HashMap;
use std::fmt;

use loadout_config::{parse_descriptor, DescriptorEntry, OrderAssigner};
use loadout_loader::{locate_resources, SearchRootSet};

use crate::error::EngineError;

/// Where a descriptor entry was declared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntrySource {
    /// Logical descriptor path that was searched.
    pub path: String,
    /// The resource the entry was read from.
    pub location: String,
    /// 1-based line within that resource.
    pub line: usize,
}

impl fmt::Display for EntrySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{} for {}", self.location, self.line, self.path)
    }
}

/// A surviving entry, ready to be instantiated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedEntry {
    pub type_name: String,
    pub order: i32,
    /// The declaration that last added this entry.
    pub source: EntrySource,
}

impl ResolvedEntry {
    /// Key for the final ordering: order first, type name as tie-break.
    pub fn sort_key(&self) -> (i32, &str) {
        (self.order, &self.type_name)
    }
}

/// Entries accumulated so far, keyed by type name.
///
/// Later additions replace earlier ones of the same name (including their
/// order) and removals delete them. Ordering happens once, at the end.
#[derive(Debug, Default)]
pub struct ServiceRegistry {
    entries: HashMap<String, ResolvedEntry>,
}

impl ServiceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one directive.
    pub fn apply(&mut self, entry: DescriptorEntry, source: EntrySource) {
        if entry.remove {
            let removed = self.entries.remove(&entry.type_name).is_some();
            tracing::trace!(type_name = %entry.type_name, removed, at = %source, "remove");
        } else {
            tracing::trace!(type_name = %entry.type_name, order = entry.order, at = %source, "add");
            self.entries.insert(
                entry.type_name.clone(),
                ResolvedEntry {
                    type_name: entry.type_name,
                    order: entry.order,
                    source,
                },
            );
        }
    }

    /// Parse one descriptor's text and apply its directives in line order.
    pub fn fold_descriptor(
        &mut self,
        content: &str,
        path: &str,
        location: &str,
        orders: &mut OrderAssigner,
    ) {
        for parsed in parse_descriptor(content, orders) {
            let source = EntrySource {
                path: path.to_owned(),
                location: location.to_owned(),
                line: parsed.line,
            };
            self.apply(parsed.entry, source);
        }
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.entries.contains_key(type_name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The surviving entries by ascending order, ties broken by type name.
    pub fn into_sorted(self) -> Vec<ResolvedEntry> {
        let mut entries: Vec<ResolvedEntry> = self.entries.into_values().collect();
        entries.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
        entries
    }

    /// Locate every descriptor for each path in turn and fold them into one
    /// ordered entry list.
    ///
    /// Paths are processed in the order given, and each path's resources in
    /// located order, so later paths can override or remove entries from
    /// earlier ones.
    ///
    /// # Errors
    /// Returns an error if a search root cannot be enumerated or a located
    /// descriptor cannot be read.
    pub fn resolve<S: AsRef<str>>(
        paths: &[S],
        roots: &SearchRootSet,
        orders: &mut OrderAssigner,
    ) -> Result<Vec<ResolvedEntry>, EngineError> {
        let mut registry = Self::new();
        for path in paths {
            let path = path.as_ref();
            let locations = locate_resources(path, roots).map_err(|source| EngineError::Locate {
                path: path.to_owned(),
                source,
            })?;

            for location in &locations {
                let content =
                    location
                        .read_to_string()
                        .map_err(|source| EngineError::DescriptorRead {
                            path: path.to_owned(),
                            location: location.to_string(),
                            source,
                        })?;
                registry.fold_descriptor(&content, path, &location.to_string(), orders);
            }
        }

        let entries = registry.into_sorted();
        tracing::debug!(
            paths = paths.len(),
            entries = entries.len(),
            "resolved descriptor entries"
        );
        Ok(entries)
    }
}
