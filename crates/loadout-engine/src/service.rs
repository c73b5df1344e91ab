//! Plugin type definitions with explicit constructor tables.
//!
//! A [`ServiceType`] is what a loader's `TypeTable` holds for a plugin type:
//! its name plus the constructors it exposes. `T` is the plugin family the
//! engine produces (usually a boxed trait object) and `A` is the argument
//! type handed to single-argument constructors.

use std::fmt;
use std::sync::Arc;

use loadout_loader::TypeDefinition;

use crate::error::BoxError;
use crate::typeinfo::{NoArgument, TypeInfo};

type DefaultFn<T> = Arc<dyn Fn() -> Result<T, BoxError> + Send + Sync>;
type AcceptingFn<T, A> = Arc<dyn Fn(&A) -> Result<T, BoxError> + Send + Sync>;

enum Constructor<T, A> {
    Default(DefaultFn<T>),
    Accepting {
        param: String,
        build: AcceptingFn<T, A>,
    },
}

/// A plugin type and the constructors it declares.
pub struct ServiceType<T, A = NoArgument> {
    type_name: String,
    constructors: Vec<Constructor<T, A>>,
}

impl<T, A> ServiceType<T, A> {
    /// A type with no constructors yet.
    pub fn new(type_name: &str) -> Self {
        Self {
            type_name: type_name.to_owned(),
            constructors: Vec::new(),
        }
    }

    /// Declare the no-argument constructor, replacing any earlier one.
    pub fn with_default(
        mut self,
        build: impl Fn() -> Result<T, BoxError> + Send + Sync + 'static,
    ) -> Self {
        self.constructors
            .retain(|c| !matches!(c, Constructor::Default(_)));
        self.constructors.push(Constructor::Default(Arc::new(build)));
        self
    }

    /// Declare a constructor taking one argument declared as `param`.
    ///
    /// A later declaration for the same parameter type replaces the
    /// earlier one.
    pub fn accepting(
        mut self,
        param: &str,
        build: impl Fn(&A) -> Result<T, BoxError> + Send + Sync + 'static,
    ) -> Self {
        self.constructors
            .retain(|c| !matches!(c, Constructor::Accepting { param: p, .. } if p == param));
        self.constructors.push(Constructor::Accepting {
            param: param.to_owned(),
            build: Arc::new(build),
        });
        self
    }

    /// [`ServiceType::accepting`] with the parameter named by a [`TypeInfo`].
    pub fn accepting_type(
        self,
        param: &'static TypeInfo,
        build: impl Fn(&A) -> Result<T, BoxError> + Send + Sync + 'static,
    ) -> Self {
        self.accepting(param.name(), build)
    }

    pub fn has_default(&self) -> bool {
        self.constructors
            .iter()
            .any(|c| matches!(c, Constructor::Default(_)))
    }

    /// Parameter types of the single-argument constructors, in declaration
    /// order.
    pub fn accepted_types(&self) -> Vec<&str> {
        self.constructors
            .iter()
            .filter_map(|c| match c {
                Constructor::Accepting { param, .. } => Some(param.as_str()),
                Constructor::Default(_) => None,
            })
            .collect()
    }

    /// Run the no-argument constructor, if declared.
    pub(crate) fn construct_default(&self) -> Option<Result<T, BoxError>> {
        self.constructors.iter().find_map(|c| match c {
            Constructor::Default(build) => Some(build()),
            Constructor::Accepting { .. } => None,
        })
    }

    /// Run the constructor declared for exactly `param`, if any.
    pub(crate) fn construct_with(&self, param: &str, arg: &A) -> Option<Result<T, BoxError>> {
        self.constructors.iter().find_map(|c| match c {
            Constructor::Accepting { param: p, build } if p == param => Some(build(arg)),
            _ => None,
        })
    }
}

impl<T: 'static, A: 'static> TypeDefinition for ServiceType<T, A> {
    fn type_name(&self) -> &str {
        &self.type_name
    }
}

impl<T, A> fmt::Debug for ServiceType<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceType")
            .field("type_name", &self.type_name)
            .field("default", &self.has_default())
            .field("accepting", &self.accepted_types())
            .finish()
    }
}
