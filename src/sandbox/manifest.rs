//! Manifest and program file contents.
//!
//! The manifest is a `go.mod` with one directive per line: the module
//! identity, the `go` directive naming the toolchain version, and at most
//! one `require`. The program is a `main.go` that either does nothing or
//! blank-imports the dependency.

use crate::dependency::PinnedDependency;
use crate::toolchain::ToolchainVersion;

/// Manifest file name.
pub const MANIFEST_FILE: &str = "go.mod";

/// Lock file the toolchain writes during resolution.
pub const LOCK_FILE: &str = "go.sum";

/// Program file name.
pub const PROGRAM_FILE: &str = "main.go";

/// Line prefix identifying the toolchain-version directive.
pub const GO_DIRECTIVE_PREFIX: &str = "go ";

/// Render a manifest for `module_name` targeting `toolchain`.
pub fn render_manifest(
    module_name: &str,
    toolchain: &ToolchainVersion,
    dependency: Option<&PinnedDependency>,
) -> String {
    let mut out = format!("module {}\n\n{}{}\n", module_name, GO_DIRECTIVE_PREFIX, toolchain);
    if let Some(PinnedDependency {
        module,
        version: Some(version),
        ..
    }) = dependency
    {
        out.push_str(&format!("\nrequire {} {}\n", module, version));
    }
    out
}

/// Render the probe program. Without an import it is an empty program.
pub fn render_program(import_path: Option<&str>) -> String {
    match import_path {
        Some(path) => format!(
            "package main\n\nimport (\n\t_ \"{}\"\n)\n\nfunc main() {{\n}}\n",
            path
        ),
        None => "package main\n\nfunc main() {\n}\n".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(raw: &str) -> ToolchainVersion {
        ToolchainVersion::parse(raw).unwrap()
    }

    /// The `go` directive value of manifest content.
    fn go_directive(content: &str) -> Option<&str> {
        content
            .lines()
            .map(str::trim_start)
            .find_map(|line| line.strip_prefix(GO_DIRECTIVE_PREFIX))
            .map(str::trim)
    }

    #[test]
    fn manifest_without_dependency_has_no_require() {
        let manifest = render_manifest("sandbox", &v("1.18"), None);
        assert_eq!(manifest, "module sandbox\n\ngo 1.18\n");
        assert_eq!(go_directive(&manifest), Some("1.18"));
    }

    #[test]
    fn manifest_requires_pinned_version() {
        let dep = PinnedDependency {
            module: "github.com/gorilla/mux".into(),
            import_path: "github.com/gorilla/mux".into(),
            version: Some("v1.8.1".into()),
        };
        let manifest = render_manifest("sandbox", &v("1.21.0"), Some(&dep));
        assert!(manifest.contains("go 1.21.0\n"));
        assert!(manifest.contains("require github.com/gorilla/mux v1.8.1\n"));
    }

    #[test]
    fn unpinned_dependency_leaves_require_to_tidy() {
        let dep = PinnedDependency {
            module: "github.com/lib/pq".into(),
            import_path: "github.com/lib/pq".into(),
            version: None,
        };
        let manifest = render_manifest("sandbox", &v("1.20"), Some(&dep));
        assert!(!manifest.contains("require"));
    }

    #[test]
    fn program_blank_imports_dependency() {
        let program = render_program(Some("gopkg.in/yaml.v3"));
        assert!(program.contains("_ \"gopkg.in/yaml.v3\""));
        assert!(program.contains("func main()"));

        let control = render_program(None);
        assert!(!control.contains("import"));
    }
}
