#![forbid(unsafe_code)]
//! Search roots, resource discovery, and type resolution for Loadout.

pub mod archive;
pub mod dir;
pub mod embedded;
pub mod error;
pub mod loader;
pub mod locate;
pub mod resolve;
pub mod resource;
pub mod roots;

pub use archive::ArchiveLoader;
pub use dir::DirLoader;
pub use embedded::EmbeddedLoader;
pub use error::LoaderError;
pub use loader::{same_loader, LoadedType, Loader, TypeDefinition, TypeTable};
pub use locate::locate_resources;
pub use resolve::resolve_type;
pub use resource::ResourceLocation;
pub use roots::SearchRootSet;
