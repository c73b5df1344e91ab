//! The `loadout.toml` search-root manifest.
//!
//! A manifest names a graph of search contexts (directory lists or plugin
//! archives, each with an optional parent) and the descriptor paths to
//! resolve by default:
//!
//! ```toml
//! descriptors = ["META-INF/loadout/default", "META-INF/loadout/custom"]
//! primary = "app"
//! defining = "platform"
//! extra = ["tools"]
//!
//! [contexts.platform]
//! dirs = ["lib/platform"]
//!
//! [contexts.app]
//! dirs = ["build/classes"]
//! parent = "platform"
//!
//! [contexts.tools]
//! archive = "tools/plugins.tar.gz"
//! ```

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Deserialize;

use loadout_loader::{ArchiveLoader, DirLoader, Loader, LoaderError, SearchRootSet, TypeTable};

/// Conventional manifest file name.
pub const MANIFEST_FILE: &str = "loadout.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SearchManifest {
    /// Descriptor paths, lowest precedence first.
    #[serde(default)]
    pub descriptors: Vec<String>,
    /// Context consulted first.
    pub primary: String,
    /// Context standing in for the engine's own loader. Defaults to `primary`.
    #[serde(default)]
    pub defining: Option<String>,
    /// Further contexts, appended in order.
    #[serde(default)]
    pub extra: Vec<String>,
    pub contexts: BTreeMap<String, ContextSpec>,
}

/// One named search context.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContextSpec {
    /// Directories searched in order.
    #[serde(default)]
    pub dirs: Vec<PathBuf>,
    /// A `.tar.gz` plugin archive.
    #[serde(default)]
    pub archive: Option<PathBuf>,
    /// Context this one delegates to.
    #[serde(default)]
    pub parent: Option<String>,
}

impl SearchManifest {
    /// Read, parse and validate a `loadout.toml` from the given path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, contains invalid TOML,
    /// or fails [`SearchManifest::validate`].
    pub fn from_path(path: &Path) -> Result<Self, ManifestError> {
        let content = std::fs::read_to_string(path).map_err(|e| ManifestError::Read {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_toml_str(&content, &path.display().to_string())
    }

    /// Parse and validate manifest text. `origin` names the source in errors.
    ///
    /// # Errors
    /// Returns an error if the text is not a valid manifest.
    pub fn from_toml_str(content: &str, origin: &str) -> Result<Self, ManifestError> {
        let manifest: SearchManifest =
            toml::from_str(content).map_err(|e| ManifestError::Parse {
                path: origin.to_owned(),
                source: e,
            })?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// The context name used as the defining loader.
    pub fn defining(&self) -> &str {
        self.defining.as_deref().unwrap_or(&self.primary)
    }

    /// Check context shapes, references, and parent cycles.
    ///
    /// # Errors
    /// Returns the first problem found.
    pub fn validate(&self) -> Result<(), ManifestError> {
        for (name, spec) in &self.contexts {
            match (spec.dirs.is_empty(), &spec.archive) {
                (true, None) => {
                    return Err(ManifestError::InvalidContext {
                        context: name.clone(),
                        reason: "declare either `dirs` or `archive`".to_owned(),
                    })
                }
                (false, Some(_)) => {
                    return Err(ManifestError::InvalidContext {
                        context: name.clone(),
                        reason: "`dirs` and `archive` are mutually exclusive".to_owned(),
                    })
                }
                _ => {}
            }
            if let Some(parent) = &spec.parent {
                self.require(parent, name)?;
            }
        }

        self.require(&self.primary, "primary")?;
        self.require(self.defining(), "defining")?;
        for name in &self.extra {
            self.require(name, "extra")?;
        }

        for name in self.contexts.keys() {
            self.check_acyclic(name)?;
        }
        Ok(())
    }

    fn require(&self, context: &str, referenced_by: &str) -> Result<(), ManifestError> {
        if self.contexts.contains_key(context) {
            return Ok(());
        }
        Err(ManifestError::UnknownContext {
            context: context.to_owned(),
            referenced_by: referenced_by.to_owned(),
        })
    }

    fn check_acyclic(&self, start: &str) -> Result<(), ManifestError> {
        let mut seen = BTreeSet::new();
        let mut current = Some(start);
        while let Some(name) = current {
            if !seen.insert(name) {
                return Err(ManifestError::Cycle {
                    context: start.to_owned(),
                });
            }
            current = self
                .contexts
                .get(name)
                .and_then(|spec| spec.parent.as_deref());
        }
        Ok(())
    }

    /// Build the search roots this manifest describes.
    ///
    /// Relative paths are resolved against `base_dir`. `types` supplies the
    /// types each context defines, by context name. Parents are built before
    /// their children and each context is built once, so contexts that share
    /// a parent share the same parent loader.
    ///
    /// # Errors
    /// Returns an error if the manifest is invalid or a plugin archive
    /// cannot be opened.
    pub fn build_roots(
        &self,
        base_dir: &Path,
        types: impl Fn(&str) -> TypeTable,
    ) -> Result<SearchRootSet, ManifestError> {
        self.validate()?;

        let mut built: HashMap<String, Arc<dyn Loader>> = HashMap::new();
        let primary = self.build_context(&self.primary, base_dir, &types, &mut built)?;
        let defining = self.build_context(self.defining(), base_dir, &types, &mut built)?;
        let mut extra = Vec::with_capacity(self.extra.len());
        for name in &self.extra {
            extra.push(self.build_context(name, base_dir, &types, &mut built)?);
        }

        let roots = SearchRootSet::new(primary, defining, extra);
        tracing::debug!(roots = ?roots, "built search roots from manifest");
        Ok(roots)
    }

    fn build_context(
        &self,
        name: &str,
        base_dir: &Path,
        types: &impl Fn(&str) -> TypeTable,
        built: &mut HashMap<String, Arc<dyn Loader>>,
    ) -> Result<Arc<dyn Loader>, ManifestError> {
        if let Some(existing) = built.get(name) {
            return Ok(Arc::clone(existing));
        }
        let spec = self
            .contexts
            .get(name)
            .ok_or_else(|| ManifestError::UnknownContext {
                context: name.to_owned(),
                referenced_by: "build".to_owned(),
            })?;

        let parent = match &spec.parent {
            Some(parent) => Some(self.build_context(parent, base_dir, types, built)?),
            None => None,
        };

        let loader: Arc<dyn Loader> = if let Some(archive) = &spec.archive {
            let mut loader =
                ArchiveLoader::open(name, &base_dir.join(archive))?.with_types(types(name));
            if let Some(parent) = parent {
                loader = loader.with_parent(parent);
            }
            Arc::new(loader)
        } else {
            let dirs = spec.dirs.iter().map(|d| base_dir.join(d)).collect();
            let mut loader = DirLoader::with_dirs(name, dirs).with_types(types(name));
            if let Some(parent) = parent {
                loader = loader.with_parent(parent);
            }
            Arc::new(loader)
        };

        built.insert(name.to_owned(), Arc::clone(&loader));
        Ok(loader)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid loadout.toml at {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
    #[error("unknown context `{context}` referenced by {referenced_by}")]
    UnknownContext {
        context: String,
        referenced_by: String,
    },
    #[error("context `{context}` is its own ancestor")]
    Cycle { context: String },
    #[error("invalid context `{context}`: {reason}")]
    InvalidContext { context: String, reason: String },
    #[error("{0}")]
    Loader(#[from] LoaderError),
}
