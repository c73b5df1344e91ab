#![forbid(unsafe_code)]
//! Parse service descriptors and the `loadout.toml` search manifest.

pub mod descriptor;
pub mod manifest;

pub use descriptor::{
    parse_descriptor, DescriptorEntry, OrderAssigner, ParsedLine, DEFAULT_ORDER_START,
};
pub use manifest::{ContextSpec, ManifestError, SearchManifest, MANIFEST_FILE};
