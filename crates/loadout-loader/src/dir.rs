//! A loader backed by directories on disk.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::LoaderError;
use crate::loader::{LoadedType, Loader, TypeDefinition, TypeTable};
use crate::resource::ResourceLocation;

/// Serves resources from an ordered list of directories.
///
/// Each directory behaves like one entry of a class path: a logical path
/// `META-INF/x` is looked up as `<dir>/META-INF/x` in every directory, so one
/// loader can bind several resources to the same path.
#[derive(Debug)]
pub struct DirLoader {
    name: String,
    dirs: Vec<PathBuf>,
    parent: Option<Arc<dyn Loader>>,
    types: TypeTable,
}

impl DirLoader {
    pub fn new(name: &str, dir: impl Into<PathBuf>) -> Self {
        Self::with_dirs(name, vec![dir.into()])
    }

    pub fn with_dirs(name: &str, dirs: Vec<PathBuf>) -> Self {
        Self {
            name: name.to_owned(),
            dirs,
            parent: None,
            types: TypeTable::new(),
        }
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

impl Loader for DirLoader {
    fn name(&self) -> &str {
        &self.name
    }

    fn parent(&self) -> Option<Arc<dyn Loader>> {
        self.parent.clone()
    }

    fn resources(&self, path: &str) -> Result<Vec<ResourceLocation>, LoaderError> {
        let relative = path.trim_start_matches('/');
        let mut found = Vec::new();
        for dir in &self.dirs {
            let candidate = dir.join(relative);
            if is_regular_file(&candidate)? {
                found.push(ResourceLocation::File(candidate));
            }
        }
        Ok(found)
    }

    fn find_type(&self, type_name: &str) -> Option<LoadedType> {
        self.types.lookup(type_name, &self.name)
    }
}

/// Whether `path` is an existing regular file.
///
/// A missing path (or a missing parent directory) is `false`; any other
/// metadata failure is an error.
fn is_regular_file(path: &Path) -> Result<bool, LoaderError> {
    match std::fs::metadata(path) {
        Ok(meta) => Ok(meta.is_file()),
        Err(e)
            if matches!(
                e.kind(),
                std::io::ErrorKind::NotFound | std::io::ErrorKind::NotADirectory
            ) =>
        {
            Ok(false)
        }
        Err(source) => Err(LoaderError::Io {
            location: path.display().to_string(),
            source,
        }),
    }
}
