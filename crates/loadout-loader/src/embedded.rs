//! A loader whose resources live in memory.
//!
//! Used for descriptors compiled into a binary with `include_str!` and for
//! wiring up plugin sets in tests.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::error::LoaderError;
use crate::loader::{LoadedType, Loader, TypeDefinition, TypeTable};
use crate::resource::ResourceLocation;

static NEXT_INSTANCE: AtomicU64 = AtomicU64::new(0);

#[derive(Debug)]
pub struct EmbeddedLoader {
    name: String,
    /// Distinguishes loaders that share a name.
    instance: u64,
    resources: BTreeMap<String, Vec<Arc<str>>>,
    parent: Option<Arc<dyn Loader>>,
    types: TypeTable,
}

impl EmbeddedLoader {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            instance: NEXT_INSTANCE.fetch_add(1, Ordering::Relaxed),
            resources: BTreeMap::new(),
            parent: None,
            types: TypeTable::new(),
        }
    }

    /// Bind `content` to `path`. Binding the same path again adds a second
    /// resource rather than replacing the first.
    pub fn with_resource(mut self, path: &str, content: &str) -> Self {
        self.resources
            .entry(path.trim_start_matches('/').to_owned())
            .or_default()
            .push(Arc::from(content));
        self
    }

    pub fn with_parent(mut self, parent: Arc<dyn Loader>) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn with_types(mut self, types: TypeTable) -> Self {
        self.types = types;
        self
    }

    pub fn with_type<D: TypeDefinition>(mut self, definition: D) -> Self {
        self.types.define(definition);
        self
    }
}

impl Loader for EmbeddedLoader {
    fn name(&self) -> &str {
        &self.name
    }

    fn parent(&self) -> Option<Arc<dyn Loader>> {
        self.parent.clone()
    }

    fn resources(&self, path: &str) -> Result<Vec<ResourceLocation>, LoaderError> {
        let key = path.trim_start_matches('/');
        let Some(contents) = self.resources.get(key) else {
            return Ok(Vec::new());
        };
        Ok(contents
            .iter()
            .enumerate()
            .map(|(index, content)| ResourceLocation::Embedded {
                loader: self.name.clone(),
                instance: self.instance,
                path: key.to_owned(),
                index,
                content: Arc::clone(content),
            })
            .collect())
    }

    fn find_type(&self, type_name: &str) -> Option<LoadedType> {
        self.types.lookup(type_name, &self.name)
    }
}
