/// `compile` command: classify a node, optionally replace its classes, compile
/// its catalog and display it.
use std::io::Write;

use crate::catalog::{Catalog, CatalogError, file_contents, sort_catalog};
use crate::cli::OutputCtx;
use crate::cli::args::{CompileArgs, DisplayMode};
use crate::cli::output::{write_file_contents, write_sorted, write_tree};
use crate::config::{ClassifierTerminus, Config};
use crate::terminus::{
    CatalogCompiler, ExecClassifier, ExecCommand, ExecCompiler, Node, NodeClassifier,
    RestClassifier, TlsFiles, parse_classlist,
};

/// Run `minicat compile` against the configured classifier and compiler.
///
/// # Errors
///
/// Returns `CatalogError::NodeNotFound` if the classifier does not know the
/// node, and `CatalogError` on classifier, compiler, parse or output failure.
pub fn run(args: &CompileArgs, ctx: &OutputCtx, config: &Config) -> Result<(), CatalogError> {
    let classifier = build_classifier(config)?;
    let compiler = ExecCompiler::new(ExecCommand::new(
        config.compiler.command.clone(),
        config.compiler.args.clone(),
    ));

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    compile(
        args,
        ctx,
        &config.environment,
        classifier.as_ref(),
        &compiler,
        &mut out,
    )
}

fn build_classifier(config: &Config) -> Result<Box<dyn NodeClassifier>, CatalogError> {
    match config.classifier.terminus {
        ClassifierTerminus::Exec => Ok(Box::new(ExecClassifier::new(ExecCommand::new(
            config.classifier.command.clone(),
            config.classifier.args.clone(),
        )))),
        ClassifierTerminus::Rest => {
            let tls = TlsFiles {
                ca_cert: config.server.ca_cert.clone(),
                client_cert: config.server.client_cert.clone(),
                client_key: config.server.client_key.clone(),
            };
            let classifier = RestClassifier::new(&config.server.url, &config.environment, &tls)?;
            Ok(Box::new(classifier))
        }
    }
}

/// Look up `name` and, when `classlist` is given, replace its classes.
///
/// # Errors
///
/// Returns `CatalogError::NodeNotFound` if the classifier has no such node.
pub fn resolve_node(
    classifier: &dyn NodeClassifier,
    name: &str,
    classlist: Option<&str>,
) -> Result<Node, CatalogError> {
    let mut node = classifier
        .find(name)?
        .ok_or_else(|| CatalogError::NodeNotFound {
            node: name.to_owned(),
        })?;

    if let Some(raw) = classlist {
        let classes = parse_classlist(raw);
        tracing::debug!(node = name, ?classes, "overriding classifier classes");
        node.set_classes(classes);
    }
    Ok(node)
}

/// The whole pipeline with explicit collaborators and output sink.
///
/// Nothing is written to `out` unless compilation succeeds.
///
/// # Errors
///
/// See [`run`].
pub fn compile<W: Write + ?Sized>(
    args: &CompileArgs,
    ctx: &OutputCtx,
    default_environment: &str,
    classifier: &dyn NodeClassifier,
    compiler: &dyn CatalogCompiler,
    out: &mut W,
) -> Result<(), CatalogError> {
    let mode = args.display_mode();
    if args.filename.is_some() && mode != DisplayMode::ContentOnly {
        tracing::warn!("--filename only applies with --contentonly; ignoring it");
    }

    ctx.notice(&format!("looking up {}...", args.node));
    let _t_lookup = ctx.timer("node_lookup");
    let mut node = resolve_node(classifier, &args.node, args.classlist.as_deref())?;
    drop(_t_lookup);

    if node.environment.is_none() {
        node.environment = Some(default_environment.to_owned());
    }

    let _t_compile = ctx.timer("compile");
    let tree = compiler.compile(&node)?;
    drop(_t_compile);

    match mode {
        DisplayMode::ContentOnly => {
            let catalog = Catalog::from_tree(&tree)?;
            let files = file_contents(&catalog, args.filename.as_deref());
            tracing::debug!(count = files.len(), "file resources with content");
            write_file_contents(out, &files)
        }
        DisplayMode::Sorted => {
            let catalog = Catalog::from_tree(&tree)?;
            write_sorted(out, &sort_catalog(&catalog), ctx.format)
        }
        DisplayMode::Raw => {
            write_tree(out, &tree, ctx.format)?;
            ctx.notice("done");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::HashMap;

    use serde_json::{Value, json};

    use super::*;
    use crate::cli::args::OutputFormat;
    use crate::terminus::TerminusError;
    use crate::terminus::node::NodeClasses;

    struct StaticClassifier(HashMap<String, Node>);

    impl StaticClassifier {
        fn with_web01() -> Self {
            let mut node = Node::new("web01");
            node.set_classes(vec!["base".to_owned()]);
            Self(HashMap::from([("web01".to_owned(), node)]))
        }
    }

    impl NodeClassifier for StaticClassifier {
        fn find(&self, name: &str) -> Result<Option<Node>, TerminusError> {
            Ok(self.0.get(name).cloned())
        }
    }

    /// Records every node it is asked to compile and reflects its classes
    /// into the returned catalog.
    struct RecordingCompiler {
        seen: RefCell<Vec<Node>>,
        resources: Value,
    }

    impl RecordingCompiler {
        fn new(resources: Value) -> Self {
            Self {
                seen: RefCell::new(Vec::new()),
                resources,
            }
        }
    }

    impl CatalogCompiler for RecordingCompiler {
        fn compile(&self, node: &Node) -> Result<Value, TerminusError> {
            self.seen.borrow_mut().push(node.clone());
            Ok(json!({
                "name": node.name,
                "resources": self.resources,
                "edges": [],
                "classes": node.classes.names(),
                "tags": node.classes.names(),
            }))
        }
    }

    fn args(node: &str) -> CompileArgs {
        CompileArgs {
            node: node.to_owned(),
            classlist: None,
            contentonly: false,
            sorted: false,
            filename: None,
        }
    }

    fn ctx() -> OutputCtx {
        OutputCtx::new(OutputFormat::Compact, true)
    }

    fn run_with(
        args: &CompileArgs,
        compiler: &RecordingCompiler,
    ) -> (Result<(), CatalogError>, String) {
        let mut out = Vec::new();
        let result = compile(
            args,
            &ctx(),
            "production",
            &StaticClassifier::with_web01(),
            compiler,
            &mut out,
        );
        (result, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_resolve_known_node() {
        let node = resolve_node(&StaticClassifier::with_web01(), "web01", None).unwrap();
        assert_eq!(node.classes.names(), vec!["base"]);
    }

    #[test]
    fn test_resolve_unknown_node() {
        let err = resolve_node(&StaticClassifier::with_web01(), "doesnotexist", None).unwrap_err();
        assert!(matches!(err, CatalogError::NodeNotFound { .. }));
        assert_eq!(err.exit_code(), 4);
    }

    #[test]
    fn test_classlist_replaces_classifier_classes() {
        let compiler = RecordingCompiler::new(json!([]));
        let mut a = args("web01");
        a.classlist = Some("base,nginx".to_owned());

        let (result, out) = run_with(&a, &compiler);
        result.unwrap();

        let seen = compiler.seen.borrow();
        assert_eq!(seen.len(), 1);
        assert_eq!(
            seen[0].classes,
            NodeClasses::List(vec!["base".to_owned(), "nginx".to_owned()])
        );
        assert!(out.contains(r#""classes":["base","nginx"]"#));
    }

    #[test]
    fn test_without_classlist_uses_classifier_classes() {
        let compiler = RecordingCompiler::new(json!([]));
        let (result, _) = run_with(&args("web01"), &compiler);
        result.unwrap();
        assert_eq!(compiler.seen.borrow()[0].classes.names(), vec!["base"]);
    }

    #[test]
    fn test_default_environment_filled_in() {
        let compiler = RecordingCompiler::new(json!([]));
        let (result, _) = run_with(&args("web01"), &compiler);
        result.unwrap();
        assert_eq!(
            compiler.seen.borrow()[0].environment.as_deref(),
            Some("production")
        );
    }

    #[test]
    fn test_unknown_node_aborts_without_output() {
        let compiler = RecordingCompiler::new(json!([]));
        let (result, out) = run_with(&args("doesnotexist"), &compiler);

        let err = result.unwrap_err();
        assert_eq!(err.to_string(), "Couldn't find node doesnotexist");
        assert!(out.is_empty());
        assert!(compiler.seen.borrow().is_empty());
    }

    #[test]
    fn test_contentonly_mode() {
        let compiler = RecordingCompiler::new(json!([
            {"type": "File", "title": "/etc/motd", "file": "/m/motd.pp",
             "parameters": {"content": "hello\n"}},
            {"type": "File", "title": "/etc/issue", "parameters": {"content": "issue\n"}},
            {"type": "Package", "title": "nginx", "parameters": {"content": "nope"}}
        ]));
        let mut a = args("web01");
        a.contentonly = true;
        a.filename = Some("motd".to_owned());

        let (result, out) = run_with(&a, &compiler);
        result.unwrap();
        assert_eq!(
            out,
            "\"/m/motd.pp\"\n\"/etc/motd\"\nhello\n----------------------------------\n\n"
        );
    }

    #[test]
    fn test_sorted_mode() {
        let compiler = RecordingCompiler::new(json!([
            {"type": "Service", "title": "nginx"},
            {"type": "Class", "title": "Base"}
        ]));
        let mut a = args("web01");
        a.sorted = true;
        a.classlist = Some("zeta,alpha".to_owned());

        let (result, out) = run_with(&a, &compiler);
        result.unwrap();
        let base = out.find("\"title\":\"Base\"").unwrap();
        let nginx = out.find("\"title\":\"nginx\"").unwrap();
        assert!(base < nginx);
        assert!(out.contains(r#"["alpha","zeta"]"#));
    }

    #[test]
    fn test_sorted_mode_rejects_malformed_catalog() {
        struct Broken;
        impl CatalogCompiler for Broken {
            fn compile(&self, _node: &Node) -> Result<Value, TerminusError> {
                Ok(json!({"resources": "not a list"}))
            }
        }

        let mut a = args("web01");
        a.sorted = true;
        let mut out = Vec::new();
        let err = compile(
            &a,
            &ctx(),
            "production",
            &StaticClassifier::with_web01(),
            &Broken,
            &mut out,
        )
        .unwrap_err();
        assert!(matches!(err, CatalogError::Parse(_)));
        assert!(out.is_empty());
    }
}
