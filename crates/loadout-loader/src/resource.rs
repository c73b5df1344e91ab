//! Located resources and reading them as text.

use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::LoaderError;

/// Where a resource was found.
///
/// Locations are comparable and hashable so that the same resource reached
/// through two roots collapses to one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResourceLocation {
    /// A regular file on disk.
    File(PathBuf),
    /// A regular-file entry inside a `.tar.gz` archive.
    ArchiveEntry { archive: PathBuf, entry: String },
    /// An in-memory resource registered with an embedded loader.
    ///
    /// `instance` tells apart loaders that share a name; it is not shown.
    Embedded {
        loader: String,
        instance: u64,
        path: String,
        index: usize,
        content: Arc<str>,
    },
}

impl fmt::Display for ResourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "file:{}", path.display()),
            Self::ArchiveEntry { archive, entry } => {
                write!(f, "archive:{}!/{entry}", archive.display())
            }
            Self::Embedded {
                loader,
                path,
                index,
                ..
            } => write!(f, "embedded:{loader}!/{path}#{index}"),
        }
    }
}

impl ResourceLocation {
    /// Read the whole resource as UTF-8 text.
    ///
    /// # Errors
    /// Returns an error if the file or archive cannot be read, the archive
    /// entry no longer exists, or the content is not UTF-8.
    pub fn read_to_string(&self) -> Result<String, LoaderError> {
        match self {
            Self::File(path) => read_file(path),
            Self::ArchiveEntry { archive, entry } => read_archive_entry(archive, entry),
            Self::Embedded { content, .. } => Ok(content.to_string()),
        }
    }
}

fn read_file(path: &Path) -> Result<String, LoaderError> {
    let bytes = std::fs::read(path).map_err(|source| LoaderError::Io {
        location: path.display().to_string(),
        source,
    })?;
    String::from_utf8(bytes).map_err(|_| LoaderError::NotText {
        location: path.display().to_string(),
    })
}

fn read_archive_entry(archive: &Path, wanted: &str) -> Result<String, LoaderError> {
    let io_err = |source| LoaderError::Io {
        location: format!("{}!/{wanted}", archive.display()),
        source,
    };

    let file = std::fs::File::open(archive).map_err(io_err)?;
    let decoder = flate2::read::GzDecoder::new(file);
    let mut tar = tar::Archive::new(decoder);

    for entry in tar.entries().map_err(io_err)? {
        let mut entry = entry.map_err(io_err)?;
        let matches = {
            let path = entry.path().map_err(io_err)?;
            crate::archive::normalize_entry(&path).as_deref() == Some(wanted)
        };
        if !matches {
            continue;
        }
        let mut bytes = Vec::new();
        entry.read_to_end(&mut bytes).map_err(io_err)?;
        return String::from_utf8(bytes).map_err(|_| LoaderError::NotText {
            location: format!("{}!/{wanted}", archive.display()),
        });
    }

    Err(LoaderError::MissingEntry {
        archive: archive.display().to_string(),
        entry: wanted.to_owned(),
    })
}
