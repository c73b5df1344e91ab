//! The `Loader` abstraction and per-loader type tables.
//!
//! A loader is one search context: it can enumerate resources bound to a
//! logical path, resolve type names it defines, and delegate to an optional
//! parent. Loaders are shared as `Arc<dyn Loader>` and compared by identity.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::LoaderError;
use crate::resource::ResourceLocation;

/// A class-loading context consulted for resources and types.
pub trait Loader: Send + Sync + fmt::Debug {
    /// Human-readable name used in logs and resource locations.
    fn name(&self) -> &str;

    /// The next link in this loader's delegation chain.
    fn parent(&self) -> Option<Arc<dyn Loader>>;

    /// Enumerate every resource this loader binds to `path`.
    ///
    /// Only this loader is consulted; parents are not.
    ///
    /// # Errors
    /// Returns an error if the underlying storage cannot be enumerated.
    /// A loader that simply has nothing at `path` returns an empty list.
    fn resources(&self, path: &str) -> Result<Vec<ResourceLocation>, LoaderError>;

    /// Resolve a type this loader defines itself.
    fn find_type(&self, type_name: &str) -> Option<LoadedType>;
}

/// Identity of a shared loader: the address of its allocation.
pub(crate) fn loader_id(loader: &Arc<dyn Loader>) -> *const () {
    Arc::as_ptr(loader).cast::<()>()
}

/// Whether two handles refer to the same loader instance.
pub fn same_loader(a: &Arc<dyn Loader>, b: &Arc<dyn Loader>) -> bool {
    loader_id(a) == loader_id(b)
}

/// A type definition that can be registered in a [`TypeTable`].
pub trait TypeDefinition: Any + Send + Sync {
    /// The fully qualified name the definition is registered under.
    fn type_name(&self) -> &str;
}

/// A successfully resolved type.
#[derive(Clone)]
pub struct LoadedType {
    type_name: String,
    loader: String,
    definition: Arc<dyn Any + Send + Sync>,
}

impl LoadedType {
    /// Fully qualified type name.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Name of the loader that defines the type.
    pub fn loader(&self) -> &str {
        &self.loader
    }

    /// The erased definition, to be downcast by the consumer.
    pub fn definition(&self) -> &(dyn Any + Send + Sync) {
        &*self.definition
    }
}

impl fmt::Debug for LoadedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadedType")
            .field("type_name", &self.type_name)
            .field("loader", &self.loader)
            .finish_non_exhaustive()
    }
}

/// Types defined directly by one loader, keyed by fully qualified name.
#[derive(Clone, Default)]
pub struct TypeTable {
    types: HashMap<String, Arc<dyn Any + Send + Sync>>,
}

impl TypeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a definition, replacing any earlier one with the same name.
    pub fn define<D: TypeDefinition>(&mut self, definition: D) {
        let name = definition.type_name().to_owned();
        self.types.insert(name, Arc::new(definition));
    }

    /// Builder form of [`TypeTable::define`].
    pub fn with<D: TypeDefinition>(mut self, definition: D) -> Self {
        self.define(definition);
        self
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.types.contains_key(type_name)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Look up `type_name`, attributing the result to `loader`.
    pub fn lookup(&self, type_name: &str, loader: &str) -> Option<LoadedType> {
        self.types.get(type_name).map(|definition| LoadedType {
            type_name: type_name.to_owned(),
            loader: loader.to_owned(),
            definition: Arc::clone(definition),
        })
    }
}

impl fmt::Debug for TypeTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.types.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_set().entries(names).finish()
    }
}
