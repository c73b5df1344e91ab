//! The ordered, duplicate-free set of loaders consulted during resolution.

use std::fmt;
use std::sync::Arc;

use crate::loader::{same_loader, Loader};

/// Search roots in consultation order. A loader appears at most once.
#[derive(Clone, Default)]
pub struct SearchRootSet {
    roots: Vec<Arc<dyn Loader>>,
}

impl SearchRootSet {
    /// Build the default pair (`primary`, then `defining`) followed by
    /// `extra` in the order given. Repeats are dropped.
    pub fn new(
        primary: Arc<dyn Loader>,
        defining: Arc<dyn Loader>,
        extra: impl IntoIterator<Item = Arc<dyn Loader>>,
    ) -> Self {
        let mut set = Self::default();
        set.add_loader(primary);
        set.add_loader(defining);
        for loader in extra {
            set.add_loader(loader);
        }
        set
    }

    /// Build a set from an arbitrary list, keeping first occurrences.
    pub fn from_loaders(loaders: impl IntoIterator<Item = Arc<dyn Loader>>) -> Self {
        let mut set = Self::default();
        for loader in loaders {
            set.add_loader(loader);
        }
        set
    }

    /// Append `loader` unless the same instance is already present.
    ///
    /// Returns whether the loader was added.
    pub fn add_loader(&mut self, loader: Arc<dyn Loader>) -> bool {
        if self.contains(&loader) {
            return false;
        }
        self.roots.push(loader);
        true
    }

    pub fn contains(&self, loader: &Arc<dyn Loader>) -> bool {
        self.roots.iter().any(|existing| same_loader(existing, loader))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Loader>> {
        self.roots.iter()
    }

    pub fn len(&self) -> usize {
        self.roots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }
}

impl fmt::Debug for SearchRootSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.roots.iter().map(|l| l.name()))
            .finish()
    }
}

impl<'a> IntoIterator for &'a SearchRootSet {
    type Item = &'a Arc<dyn Loader>;
    type IntoIter = std::slice::Iter<'a, Arc<dyn Loader>>;

    fn into_iter(self) -> Self::IntoIter {
        self.roots.iter()
    }
}
