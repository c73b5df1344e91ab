//! Turning a resolved type into a plugin instance.

use loadout_loader::{resolve_type, LoadedType, SearchRootSet};

use crate::error::{BoxError, EngineError};
use crate::service::ServiceType;
use crate::typeinfo::RuntimeType;

/// Resolve `type_name` through `roots` and construct it.
///
/// # Errors
/// Returns an error if no root defines the type, the definition builds a
/// different plugin family, no constructor fits `arg`, or the selected
/// constructor fails.
pub fn instantiate<T: 'static, A: RuntimeType + 'static>(
    type_name: &str,
    arg: Option<&A>,
    roots: &SearchRootSet,
) -> Result<T, EngineError> {
    let loaded = resolve_type(type_name, roots).ok_or_else(|| EngineError::TypeNotFound {
        type_name: type_name.to_owned(),
        declared_at: None,
    })?;
    construct(&loaded, arg)
}

/// Construct an already resolved type.
///
/// Without an argument the no-argument constructor is required. With one,
/// the constructor whose parameter type comes first among the argument's
/// candidate types is used; there is no fallback to the no-argument
/// constructor.
///
/// # Errors
/// As for [`instantiate`], minus type lookup.
pub fn construct<T: 'static, A: RuntimeType + 'static>(
    loaded: &LoadedType,
    arg: Option<&A>,
) -> Result<T, EngineError> {
    let type_name = loaded.type_name();
    let service = loaded
        .definition()
        .downcast_ref::<ServiceType<T, A>>()
        .ok_or_else(|| EngineError::IncompatibleType {
            type_name: type_name.to_owned(),
            loader: loaded.loader().to_owned(),
        })?;

    let built = match arg {
        None => service
            .construct_default()
            .ok_or_else(|| EngineError::NoUsableConstructor {
                type_name: type_name.to_owned(),
                tried: Vec::new(),
            })?,
        Some(arg) => construct_with_argument(service, type_name, arg)?,
    };

    built.map_err(|source| EngineError::Construction {
        type_name: type_name.to_owned(),
        source,
    })
}

fn construct_with_argument<T, A: RuntimeType>(
    service: &ServiceType<T, A>,
    type_name: &str,
    arg: &A,
) -> Result<Result<T, BoxError>, EngineError> {
    let candidates = arg.runtime_type().candidate_types();
    for candidate in &candidates {
        if let Some(built) = service.construct_with(candidate, arg) {
            tracing::trace!(type_name, param = candidate, "selected constructor");
            return Ok(built);
        }
    }
    Err(EngineError::NoUsableConstructor {
        type_name: type_name.to_owned(),
        tried: candidates.into_iter().map(str::to_owned).collect(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use loadout_loader::{EmbeddedLoader, Loader};

    use super::*;
    use crate::typeinfo::{NoArgument, TypeInfo};

    static I1: TypeInfo = TypeInfo::new("api.I1", &[]);
    static I2: TypeInfo = TypeInfo::new("api.I2", &[]);
    static IMPL: TypeInfo = TypeInfo::new("impl.Impl", &[&I1, &I2]);

    #[derive(Debug)]
    struct Impl;

    impl RuntimeType for Impl {
        fn runtime_type(&self) -> &'static TypeInfo {
            &IMPL
        }
    }

    fn roots_with(loader: EmbeddedLoader) -> SearchRootSet {
        let loader: Arc<dyn Loader> = Arc::new(loader);
        SearchRootSet::from_loaders([loader])
    }

    #[test]
    fn default_constructor_without_argument() {
        let roots = roots_with(EmbeddedLoader::new("app").with_type(
            ServiceType::<String>::new("a.Foo").with_default(|| Ok("foo".to_owned())),
        ));
        let built: String = instantiate::<String, NoArgument>("a.Foo", None, &roots).unwrap();
        assert_eq!(built, "foo");
    }

    #[test]
    fn unknown_type_is_not_found() {
        let roots = roots_with(EmbeddedLoader::new("app"));
        let err = instantiate::<String, NoArgument>("a.Missing", None, &roots).unwrap_err();
        assert!(
            matches!(err, EngineError::TypeNotFound { ref type_name, declared_at: None } if type_name == "a.Missing"),
            "unexpected error: {err}"
        );
    }

    #[test]
    fn interface_constructor_is_selected() {
        let roots = roots_with(EmbeddedLoader::new("app").with_type(
            ServiceType::<String, Impl>::new("a.Foo").accepting_type(&I2, |_| Ok("via I2".to_owned())),
        ));
        let built = instantiate::<String, Impl>("a.Foo", Some(&Impl), &roots).unwrap();
        assert_eq!(built, "via I2");
    }

    #[test]
    fn exact_type_wins_over_interfaces() {
        let roots = roots_with(EmbeddedLoader::new("app").with_type(
            ServiceType::<String, Impl>::new("a.Foo")
                .accepting_type(&I1, |_| Ok("via I1".to_owned()))
                .accepting_type(&IMPL, |_| Ok("via Impl".to_owned())),
        ));
        let built = instantiate::<String, Impl>("a.Foo", Some(&Impl), &roots).unwrap();
        assert_eq!(built, "via Impl");
    }

    #[test]
    fn first_interface_wins() {
        let roots = roots_with(EmbeddedLoader::new("app").with_type(
            ServiceType::<String, Impl>::new("a.Foo")
                .accepting_type(&I2, |_| Ok("via I2".to_owned()))
                .accepting_type(&I1, |_| Ok("via I1".to_owned())),
        ));
        let built = instantiate::<String, Impl>("a.Foo", Some(&Impl), &roots).unwrap();
        assert_eq!(built, "via I1");
    }

    #[test]
    fn argument_present_does_not_fall_back_to_default() {
        let roots = roots_with(EmbeddedLoader::new("app").with_type(
            ServiceType::<String, Impl>::new("a.Foo")
                .with_default(|| Ok("default".to_owned()))
                .accepting("api.Unrelated", |_| Ok("unrelated".to_owned())),
        ));
        let err = instantiate::<String, Impl>("a.Foo", Some(&Impl), &roots).unwrap_err();
        assert!(
            matches!(
                &err,
                EngineError::NoUsableConstructor { type_name, tried }
                    if type_name == "a.Foo" && *tried == ["impl.Impl", "api.I1", "api.I2"]
            ),
            "unexpected error: {err}"
        );
    }

    #[test]
    fn missing_default_is_reported() {
        let roots = roots_with(EmbeddedLoader::new("app").with_type(
            ServiceType::<String, Impl>::new("a.Foo").accepting_type(&I1, |_| Ok(String::new())),
        ));
        let err = instantiate::<String, Impl>("a.Foo", None, &roots).unwrap_err();
        assert_eq!(
            err.to_string(),
            "no usable constructor for `a.Foo`: a no-argument constructor is required"
        );
    }

    #[test]
    fn wrong_family_is_incompatible() {
        let roots = roots_with(EmbeddedLoader::new("app").with_type(
            ServiceType::<u32>::new("a.Foo").with_default(|| Ok(1)),
        ));
        let err = instantiate::<String, NoArgument>("a.Foo", None, &roots).unwrap_err();
        assert!(
            matches!(err, EngineError::IncompatibleType { ref loader, .. } if loader == "app"),
            "unexpected error: {err}"
        );
    }

    #[test]
    fn constructor_failure_is_wrapped() {
        let roots = roots_with(EmbeddedLoader::new("app").with_type(
            ServiceType::<String>::new("a.Foo").with_default(|| Err("no config".into())),
        ));
        let err = instantiate::<String, NoArgument>("a.Foo", None, &roots).unwrap_err();
        assert_eq!(err.to_string(), "cannot construct `a.Foo`: no config");
    }
}
