#![forbid(unsafe_code)]
//! Discovery, merging, ordering and instantiation of pluggable services.
//!
//! Descriptors found under a logical path in every search root are folded
//! into one ordered list of type names, and each surviving type is built
//! through the constructor table its loader registered for it.

pub mod engine;
pub mod error;
pub mod instantiate;
pub mod registry;
pub mod service;
pub mod typeinfo;

pub use engine::Engine;
pub use error::{BoxError, EngineError};
pub use instantiate::{construct, instantiate};
pub use registry::{EntrySource, ResolvedEntry, ServiceRegistry};
pub use service::ServiceType;
pub use typeinfo::{NoArgument, RuntimeType, TypeInfo};
