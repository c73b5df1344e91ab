//! Static runtime type descriptions for constructor arguments.
//!
//! A constructor argument describes its concrete type and the interfaces it
//! implements with a [`TypeInfo`] graph declared in statics:
//!
//! ```
//! use loadout_engine::{RuntimeType, TypeInfo};
//!
//! static CONTEXT: TypeInfo = TypeInfo::new("api.Context", &[]);
//! static ENRICHER_CONTEXT: TypeInfo = TypeInfo::new("api.EnricherContext", &[&CONTEXT]);
//! static MAVEN_CONTEXT: TypeInfo = TypeInfo::new("maven.MavenContext", &[&ENRICHER_CONTEXT]);
//!
//! struct MavenContext;
//!
//! impl RuntimeType for MavenContext {
//!     fn runtime_type(&self) -> &'static TypeInfo {
//!         &MAVEN_CONTEXT
//!     }
//! }
//!
//! assert_eq!(
//!     MavenContext.runtime_type().candidate_types(),
//!     vec!["maven.MavenContext", "api.EnricherContext", "api.Context"],
//! );
//! ```

use std::collections::{HashSet, VecDeque};
use std::fmt;

/// A named runtime type and the interfaces it directly implements.
pub struct TypeInfo {
    name: &'static str,
    interfaces: &'static [&'static TypeInfo],
}

impl TypeInfo {
    pub const fn new(name: &'static str, interfaces: &'static [&'static TypeInfo]) -> Self {
        Self { name, interfaces }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Parameter types a value of this type can be passed as, best match
    /// first: the type itself, then every implemented interface in
    /// breadth-first order. Each interface appears once even when it is
    /// reachable along several paths.
    pub fn candidate_types(&self) -> Vec<&'static str> {
        let mut candidates = vec![self.name];
        let mut seen: HashSet<&'static str> = HashSet::from([self.name]);
        let mut queue: VecDeque<&'static TypeInfo> = self.interfaces.iter().copied().collect();

        while let Some(interface) = queue.pop_front() {
            if !seen.insert(interface.name) {
                continue;
            }
            candidates.push(interface.name);
            queue.extend(interface.interfaces.iter().copied());
        }
        candidates
    }
}

impl fmt::Debug for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let interfaces: Vec<&str> = self.interfaces.iter().map(|i| i.name).collect();
        f.debug_struct("TypeInfo")
            .field("name", &self.name)
            .field("interfaces", &interfaces)
            .finish()
    }
}

/// A value that can report its runtime type.
pub trait RuntimeType {
    fn runtime_type(&self) -> &'static TypeInfo;
}

/// Argument type for engines whose plugins take no constructor argument.
///
/// It has no values, so such an engine always selects no-argument
/// constructors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoArgument {}

impl RuntimeType for NoArgument {
    fn runtime_type(&self) -> &'static TypeInfo {
        match *self {}
    }
}
