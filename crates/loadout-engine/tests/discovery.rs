#![allow(clippy::unwrap_used)]
//! End-to-end discovery, merging and instantiation over in-memory loaders.

use std::fmt;
use std::sync::Arc;

use loadout_engine::{Engine, EngineError, RuntimeType, ServiceType, TypeInfo};
use loadout_loader::{EmbeddedLoader, Loader};

const ENRICHERS: &str = "META-INF/loadout/enricher";
const CUSTOM: &str = "META-INF/loadout/enricher-custom";

static CONTEXT: TypeInfo = TypeInfo::new("api.Context", &[]);
static ENRICHER_CONTEXT: TypeInfo = TypeInfo::new("api.EnricherContext", &[&CONTEXT]);
static CONFIGURED: TypeInfo = TypeInfo::new("api.Configured", &[]);
static MAVEN_CONTEXT: TypeInfo =
    TypeInfo::new("maven.MavenContext", &[&ENRICHER_CONTEXT, &CONFIGURED]);

trait Enricher: Send + fmt::Debug {
    fn name(&self) -> String;
}

#[derive(Debug)]
struct Named(String);

impl Enricher for Named {
    fn name(&self) -> String {
        self.0.clone()
    }
}

#[derive(Debug)]
struct MavenContext {
    project: String,
}

impl RuntimeType for MavenContext {
    fn runtime_type(&self) -> &'static TypeInfo {
        &MAVEN_CONTEXT
    }
}

type Plugin = Box<dyn Enricher>;

fn plain(type_name: &'static str) -> ServiceType<Plugin, MavenContext> {
    ServiceType::<Plugin, MavenContext>::new(type_name)
        .with_default(move || Ok(Box::new(Named(type_name.to_owned()))))
}

fn loader(l: EmbeddedLoader) -> Arc<dyn Loader> {
    Arc::new(l)
}

fn names(plugins: &[Plugin]) -> Vec<String> {
    plugins.iter().map(|p| p.name()).collect()
}

fn engine(app: EmbeddedLoader, arg: Option<MavenContext>) -> Engine<Plugin, MavenContext> {
    let app = loader(app);
    Engine::with_loaders(Arc::clone(&app), app, arg, Vec::new())
}

#[test]
fn single_entry() {
    let engine = engine(
        EmbeddedLoader::new("app")
            .with_resource(ENRICHERS, "a.Foo\n")
            .with_type(plain("a.Foo")),
        None,
    );
    let entries = engine.resolve_entries(&[ENRICHERS]).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries.first().unwrap().order, 100);
    assert_eq!(names(&engine.resolve(&[ENRICHERS]).unwrap()), vec!["a.Foo"]);
}

#[test]
fn explicit_order_beats_auto_order() {
    let engine = engine(
        EmbeddedLoader::new("app")
            .with_resource(ENRICHERS, "a.Foo,5\nb.Bar\n")
            .with_type(plain("a.Foo"))
            .with_type(plain("b.Bar")),
        None,
    );
    let orders: Vec<(String, i32)> = engine
        .resolve_entries(&[ENRICHERS])
        .unwrap()
        .into_iter()
        .map(|e| (e.type_name, e.order))
        .collect();
    assert_eq!(
        orders,
        vec![("a.Foo".to_owned(), 5), ("b.Bar".to_owned(), 100)]
    );
}

#[test]
fn custom_descriptor_removes_default() {
    let engine = engine(
        EmbeddedLoader::new("app")
            .with_resource(ENRICHERS, "a.Foo\n")
            .with_resource(CUSTOM, "!a.Foo\n")
            .with_type(plain("a.Foo")),
        None,
    );
    assert!(engine.resolve(&[ENRICHERS, CUSTOM]).unwrap().is_empty());
}

#[test]
fn custom_descriptor_overrides_order() {
    let engine = engine(
        EmbeddedLoader::new("app")
            .with_resource(ENRICHERS, "a.Foo,10\nb.Bar,5\n")
            .with_resource(CUSTOM, "a.Foo,1\n")
            .with_type(plain("a.Foo"))
            .with_type(plain("b.Bar")),
        None,
    );
    assert_eq!(
        names(&engine.resolve(&[ENRICHERS, CUSTOM]).unwrap()),
        vec!["a.Foo", "b.Bar"]
    );
}

#[test]
fn removed_type_need_not_exist() {
    // A removed entry is never instantiated, so its type may be absent.
    let engine = engine(
        EmbeddedLoader::new("app")
            .with_resource(ENRICHERS, "a.Gone\nb.Bar\n")
            .with_resource(CUSTOM, "!a.Gone\n")
            .with_type(plain("b.Bar")),
        None,
    );
    assert_eq!(
        names(&engine.resolve(&[ENRICHERS, CUSTOM]).unwrap()),
        vec!["b.Bar"]
    );
}

#[test]
fn interface_constructor_receives_argument() {
    let service = ServiceType::<Plugin, MavenContext>::new("a.Foo").accepting_type(
        &CONFIGURED,
        |ctx: &MavenContext| Ok(Box::new(Named(format!("a.Foo for {}", ctx.project)))),
    );
    let engine = engine(
        EmbeddedLoader::new("app")
            .with_resource(ENRICHERS, "a.Foo\n")
            .with_type(service),
        Some(MavenContext {
            project: "demo".to_owned(),
        }),
    );
    assert_eq!(
        names(&engine.resolve(&[ENRICHERS]).unwrap()),
        vec!["a.Foo for demo"]
    );
}

#[test]
fn transitive_interface_is_a_candidate() {
    let service = ServiceType::<Plugin, MavenContext>::new("a.Foo")
        .accepting_type(&CONTEXT, |_| Ok(Box::new(Named("via Context".to_owned()))));
    let engine = engine(
        EmbeddedLoader::new("app")
            .with_resource(ENRICHERS, "a.Foo\n")
            .with_type(service),
        Some(MavenContext {
            project: "demo".to_owned(),
        }),
    );
    assert_eq!(
        names(&engine.resolve(&[ENRICHERS]).unwrap()),
        vec!["via Context"]
    );
}

#[test]
fn no_matching_constructor_fails() {
    let service = ServiceType::<Plugin, MavenContext>::new("a.Foo")
        .accepting("gradle.GradleContext", |_| Ok(Box::new(Named(String::new()))));
    let engine = engine(
        EmbeddedLoader::new("app")
            .with_resource(ENRICHERS, "a.Foo\n")
            .with_type(service),
        Some(MavenContext {
            project: "demo".to_owned(),
        }),
    );
    let err = engine.resolve(&[ENRICHERS]).unwrap_err();
    assert_eq!(
        err.to_string(),
        "no usable constructor for `a.Foo`: none accepts any of \
         maven.MavenContext, api.EnricherContext, api.Configured, api.Context"
    );
}

#[test]
fn types_resolve_through_parent_loaders() {
    let platform = loader(
        EmbeddedLoader::new("platform")
            .with_resource(ENRICHERS, "p.Base,1\n")
            .with_type(plain("p.Base"))
            .with_type(plain("a.Foo")),
    );
    let app = loader(
        EmbeddedLoader::new("app")
            .with_resource(ENRICHERS, "a.Foo\n")
            .with_parent(Arc::clone(&platform)),
    );
    let engine: Engine<Plugin, MavenContext> =
        Engine::with_loaders(app, platform, None, Vec::new());
    assert_eq!(
        names(&engine.resolve(&[ENRICHERS]).unwrap()),
        vec!["p.Base", "a.Foo"]
    );
}

#[test]
fn primary_root_shadows_later_roots() {
    let app = loader(
        EmbeddedLoader::new("app")
            .with_resource(ENRICHERS, "a.Foo\n")
            .with_type(
                ServiceType::<Plugin, MavenContext>::new("a.Foo")
                    .with_default(|| Ok(Box::new(Named("from app".to_owned())))),
            ),
    );
    let other = loader(
        EmbeddedLoader::new("other").with_type(
            ServiceType::<Plugin, MavenContext>::new("a.Foo")
                .with_default(|| Ok(Box::new(Named("from other".to_owned())))),
        ),
    );
    let engine: Engine<Plugin, MavenContext> = Engine::with_loaders(app, other, None, Vec::new());
    assert_eq!(
        names(&engine.resolve(&[ENRICHERS]).unwrap()),
        vec!["from app"]
    );
}

#[test]
fn unknown_type_reports_declaration() {
    let engine = engine(
        EmbeddedLoader::new("app").with_resource(ENRICHERS, "# header\na.Ghost,3\n"),
        None,
    );
    let err = engine.resolve(&[ENRICHERS]).unwrap_err();
    assert!(
        matches!(
            &err,
            EngineError::TypeNotFound { type_name, declared_at: Some(source) }
                if type_name == "a.Ghost" && source.path == ENRICHERS && source.line == 2
        ),
        "unexpected error: {err}"
    );
}
