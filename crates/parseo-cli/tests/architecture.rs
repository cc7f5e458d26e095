use arch_lint::rules::{NoErrorSwallowing, NoSilentResultDrop};
use arch_lint::{Analyzer, Severity};

/// Error-handling discipline across the workspace: no swallowed errors
/// (AL003) and no silently dropped Results (AL013). Test code and the
/// bundled example apps are out of scope.
#[test]
fn arch_lint_al003_al013() {
    let workspace_root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .and_then(|p| p.parent())
        .expect("workspace root");

    let analyzer = Analyzer::builder()
        .root(workspace_root)
        .rule(NoErrorSwallowing::new())
        .rule(NoSilentResultDrop::new())
        .exclude("**/target/**")
        .exclude("**/tests/**")
        .exclude("examples/**")
        .build()
        .expect("build analyzer");

    let result = analyzer.analyze().expect("analyze");
    if result.has_violations_at(Severity::Warning) {
        panic!("{}", result.format_test_report(Severity::Warning));
    }
}
