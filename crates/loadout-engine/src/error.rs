//! Error types for loadout-engine.

use crate::registry::EntrySource;

/// Error type returned by plugin constructors.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors produced while resolving and instantiating a plugin set.
///
/// Every variant is fatal to the call that produced it: no partial plugin
/// list is ever returned.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// A search root could not be enumerated for a descriptor path.
    #[error("cannot locate descriptors for {path}: {source}")]
    Locate {
        path: String,
        source: loadout_loader::LoaderError,
    },

    /// A located descriptor could not be read.
    #[error("cannot read descriptor {location} for {path}: {source}")]
    DescriptorRead {
        path: String,
        location: String,
        source: loadout_loader::LoaderError,
    },

    /// No search root defines the type.
    #[error("type `{type_name}` not found in any search root{}", declared_at_suffix(.declared_at))]
    TypeNotFound {
        type_name: String,
        declared_at: Option<EntrySource>,
    },

    /// The type exists but its definition builds a different kind of plugin.
    #[error("type `{type_name}` defined by {loader} does not build this kind of plugin")]
    IncompatibleType { type_name: String, loader: String },

    /// No constructor fits the available argument.
    #[error("no usable constructor for `{type_name}`: {}", tried_summary(.tried))]
    NoUsableConstructor {
        type_name: String,
        /// Parameter types tried, in order. Empty when a no-argument
        /// constructor was required.
        tried: Vec<String>,
    },

    /// The selected constructor failed.
    #[error("cannot construct `{type_name}`: {source}")]
    Construction { type_name: String, source: BoxError },

    /// The search manifest could not be turned into search roots.
    #[error("{0}")]
    Manifest(#[from] loadout_config::ManifestError),
}

fn declared_at_suffix(declared_at: &Option<EntrySource>) -> String {
    declared_at
        .as_ref()
        .map(|source| format!(" (declared at {source})"))
        .unwrap_or_default()
}

fn tried_summary(tried: &[String]) -> String {
    if tried.is_empty() {
        "a no-argument constructor is required".to_owned()
    } else {
        format!("none accepts any of {}", tried.join(", "))
    }
}
