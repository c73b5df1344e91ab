//! The programmatic entry point: search roots plus an optional constructor
//! argument, producing ordered plugin instances.

use std::fmt;
use std::marker::PhantomData;
use std::path::Path;
use std::sync::Arc;

use loadout_config::{OrderAssigner, SearchManifest};
use loadout_loader::{resolve_type, Loader, SearchRootSet, TypeTable};

use crate::error::EngineError;
use crate::instantiate::{construct, instantiate};
use crate::registry::{ResolvedEntry, ServiceRegistry};
use crate::typeinfo::{NoArgument, RuntimeType};

/// Discovers, merges, orders and instantiates plugins of family `T`.
///
/// `A` is the argument handed to single-argument constructors. An engine is
/// immutable apart from [`Engine::add_loader`], so `resolve` can run from
/// several threads at once.
pub struct Engine<T, A = NoArgument> {
    roots: SearchRootSet,
    arg: Option<A>,
    plugins: PhantomData<fn() -> T>,
}

impl<T: 'static, A: RuntimeType + 'static> Engine<T, A> {
    pub fn new(roots: SearchRootSet, arg: Option<A>) -> Self {
        Self {
            roots,
            arg,
            plugins: PhantomData,
        }
    }

    /// An engine over `primary`, then `defining`, then `extra`.
    pub fn with_loaders(
        primary: Arc<dyn Loader>,
        defining: Arc<dyn Loader>,
        arg: Option<A>,
        extra: impl IntoIterator<Item = Arc<dyn Loader>>,
    ) -> Self {
        Self::new(SearchRootSet::new(primary, defining, extra), arg)
    }

    /// An engine over the search roots a manifest describes.
    ///
    /// # Errors
    /// Returns an error if the manifest is invalid or one of its contexts
    /// cannot be opened.
    pub fn from_manifest(
        manifest: &SearchManifest,
        base_dir: &Path,
        types: impl Fn(&str) -> TypeTable,
        arg: Option<A>,
    ) -> Result<Self, EngineError> {
        let roots = manifest.build_roots(base_dir, types)?;
        Ok(Self::new(roots, arg))
    }

    /// Add a search root after the existing ones.
    ///
    /// Returns `false` if the same loader is already a root.
    pub fn add_loader(&mut self, loader: Arc<dyn Loader>) -> bool {
        let added = self.roots.add_loader(loader);
        tracing::debug!(added, roots = ?self.roots, "add loader");
        added
    }

    pub fn roots(&self) -> &SearchRootSet {
        &self.roots
    }

    /// The merged, ordered entry list for `paths`, without instantiating.
    ///
    /// # Errors
    /// Returns an error if a search root cannot be enumerated or a
    /// descriptor cannot be read.
    pub fn resolve_entries<S: AsRef<str>>(
        &self,
        paths: &[S],
    ) -> Result<Vec<ResolvedEntry>, EngineError> {
        let mut orders = OrderAssigner::new();
        ServiceRegistry::resolve(paths, &self.roots, &mut orders)
    }

    /// Discover every descriptor for `paths`, merge them, and instantiate
    /// the surviving entries in order.
    ///
    /// Auto-assigned orders start afresh for each call. Any failure aborts
    /// the whole call.
    ///
    /// # Errors
    /// Returns an error if discovery fails, a listed type cannot be found,
    /// or a plugin cannot be constructed.
    pub fn resolve<S: AsRef<str>>(&self, paths: &[S]) -> Result<Vec<T>, EngineError> {
        let entries = self.resolve_entries(paths)?;
        let mut plugins = Vec::with_capacity(entries.len());
        for entry in entries {
            let loaded = resolve_type(&entry.type_name, &self.roots).ok_or_else(|| {
                EngineError::TypeNotFound {
                    type_name: entry.type_name.clone(),
                    declared_at: Some(entry.source.clone()),
                }
            })?;
            plugins.push(construct(&loaded, self.arg.as_ref())?);
        }
        tracing::debug!(count = plugins.len(), "instantiated plugins");
        Ok(plugins)
    }

    /// Instantiate a single type with this engine's roots and argument.
    ///
    /// # Errors
    /// Returns an error if the type cannot be found or constructed.
    pub fn instantiate(&self, type_name: &str) -> Result<T, EngineError> {
        instantiate(type_name, self.arg.as_ref(), &self.roots)
    }
}

impl<T, A> fmt::Debug for Engine<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("roots", &self.roots)
            .field("argument", &self.arg.is_some())
            .finish()
    }
}
