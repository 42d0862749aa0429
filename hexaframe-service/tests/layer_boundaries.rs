//! Enforces the layer-boundary contract spec.md calls a "policy table": a
//! fixed list of (module, allowed `use` prefixes) pairs. Scans `use` lines
//! with a regex rather than a full `syn` parse -- the policy table itself is
//! the enforceable unit, not full semantic analysis.

use regex::Regex;
use std::fs;
use std::path::Path;

/// (source file, allowed `use` path prefixes). A `use` line whose path
/// doesn't start with one of these is a boundary violation.
const POLICY: &[(&str, &[&str])] = &[("src/domain.rs", &["std::", "crate::domain::"])];

fn use_paths(source: &str) -> Vec<String> {
    let re = Regex::new(r"(?m)^\s*use\s+([a-zA-Z0-9_:]+)").unwrap();
    re.captures_iter(source)
        .map(|cap| cap[1].to_string())
        .collect()
}

#[test]
fn domain_module_imports_only_the_standard_library() {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    for (relative_path, allowed_prefixes) in POLICY {
        let path = Path::new(manifest_dir).join(relative_path);
        let source = fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("failed to read {relative_path}: {e}"));

        for path in use_paths(&source) {
            let allowed = allowed_prefixes.iter().any(|prefix| path.starts_with(prefix));
            assert!(
                allowed,
                "{relative_path} imports `{path}`, which is outside its allowed prefixes {allowed_prefixes:?} -- \
                 domain modules must not depend on framework or I/O types"
            );
        }
    }
}
