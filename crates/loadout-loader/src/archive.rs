//! A loader backed by a `.tar.gz` plugin archive.

use std::collections::BTreeSet;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use crate::error::LoaderError;
use crate::loader::{LoadedType, Loader, TypeDefinition, TypeTable};
use crate::resource::ResourceLocation;

/// Serves resources from the regular-file entries of a gzip-compressed tarball.
///
/// The entry list is indexed once by [`ArchiveLoader::open`]; contents are
/// streamed from the archive when a location is read.
#[derive(Debug)]
pub struct ArchiveLoader {
    name: String,
    archive: PathBuf,
    entries: BTreeSet<String>,
    parent: Option<Arc<dyn Loader>>,
    types: TypeTable,
}

impl ArchiveLoader {
    /// Open `archive` and index its file entries.
    ///
    /// # Errors
    /// Returns an error if the archive cannot be opened or is not a valid
    /// gzip-compressed tarball.
    pub fn open(name: &str, archive: &Path) -> Result<Self, LoaderError> {
        let entries = index_entries(archive)?;
        tracing::debug!(
            loader = name,
            archive = %archive.display(),
            entries = entries.len(),
            "indexed plugin archive"
        );
        Ok(Self {
            name: name.to_owned(),
            archive: archive.to_path_buf(),
            entries,
            parent: None,
            types: TypeTable::new(),
        })
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

    /// Whether the archive holds a file entry at `path`.
    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains(path)
    }
}

impl Loader for ArchiveLoader {
    fn name(&self) -> &str {
        &self.name
    }

    fn parent(&self) -> Option<Arc<dyn Loader>> {
        self.parent.clone()
    }

    fn resources(&self, path: &str) -> Result<Vec<ResourceLocation>, LoaderError> {
        let Some(wanted) = normalize_entry(Path::new(path)) else {
            return Ok(Vec::new());
        };
        if !self.entries.contains(&wanted) {
            return Ok(Vec::new());
        }
        Ok(vec![ResourceLocation::ArchiveEntry {
            archive: self.archive.clone(),
            entry: wanted,
        }])
    }

    fn find_type(&self, type_name: &str) -> Option<LoadedType> {
        self.types.lookup(type_name, &self.name)
    }
}

/// Normalise an entry path to `a/b/c` form.
///
/// Leading `./` and `/` are dropped. Paths that climb out with `..` have no
/// normal form and yield `None`.
pub(crate) fn normalize_entry(path: &Path) -> Option<String> {
    let mut parts = Vec::new();
    for component in path.components() {
        match component {
            Component::Normal(part) => parts.push(part.to_str()?),
            Component::CurDir | Component::RootDir => {}
            Component::ParentDir | Component::Prefix(_) => return None,
        }
    }
    if parts.is_empty() {
        return None;
    }
    Some(parts.join("/"))
}

fn index_entries(archive: &Path) -> Result<BTreeSet<String>, LoaderError> {
    let io_err = |source| LoaderError::Io {
        location: archive.display().to_string(),
        source,
    };

    let file = std::fs::File::open(archive).map_err(io_err)?;
    let decoder = flate2::read::GzDecoder::new(file);
    let mut tar = tar::Archive::new(decoder);

    let mut entries = BTreeSet::new();
    for entry in tar.entries().map_err(io_err)? {
        let entry = entry.map_err(io_err)?;
        if !entry.header().entry_type().is_file() {
            continue;
        }
        let path = entry.path().map_err(io_err)?;
        if let Some(normalized) = normalize_entry(&path) {
            entries.insert(normalized);
        }
    }
    Ok(entries)
}
