//! Enforces this crate's hexagonal layering with a fixed policy table, the
//! same mechanism `hexaframe-service/tests/layer_boundaries.rs` uses for its
//! own `src/domain.rs`: a `use` line whose path doesn't start with one of a
//! module's allowed prefixes is a boundary violation. Scanned with a regex
//! rather than a full `syn` parse -- the policy table is the enforceable
//! unit, not full semantic analysis.

use regex::Regex;
use std::fs;
use std::path::Path;

/// (source directory relative to this crate's root, allowed `use` path
/// prefixes). Every `.rs` file under the directory is checked.
const POLICY: &[(&str, &[&str])] = &[
    // Entities and the repository port they're read/written through. No
    // framework imports beyond the port trait itself, no I/O.
    (
        "src/domain",
        &["std::", "crate::domain::", "hexaframe_service::repository::", "chrono::", "serde::", "uuid::"],
    ),
    // Use cases: depend on the domain and on sibling ports (audit log), but
    // never reach into transport or a concrete infra adapter -- handlers
    // hand them a `Repository` impl generically instead.
    (
        "src/app",
        &[
            "std::",
            "super::",
            "crate::domain::",
            "crate::admin::",
            "hexaframe_service::domain::",
            "hexaframe_service::repository::",
            "async_trait::",
            "serde_json::",
            "tokio::",
        ],
    ),
    // Adapters implementing domain ports. Depend on the domain and the
    // framework's port traits, never on the use-case or transport layers.
    (
        "src/infra",
        &["std::", "crate::domain::", "hexaframe_service::repository::", "chrono::"],
    ),
    // Inbound HTTP adapters: depend on the domain, use cases, and the admin
    // port, plus the framework's HTTP surface -- never on a concrete infra
    // adapter directly.
    (
        "src/transport",
        &[
            "std::",
            "super::",
            "crate::domain::",
            "crate::app::",
            "crate::admin::",
            "crate::transport::",
            "axum::",
            "serde::",
            "hexaframe_service::domain::",
            "hexaframe_service::envelope::",
            "hexaframe_service::extract::",
            "hexaframe_service::handlers::",
            "hexaframe_service::jobs::",
            "hexaframe_service::middleware::",
            "hexaframe_service::problem::",
            "hexaframe_service::repository::",
            "hexaframe_service::ids::",
        ],
    ),
];

fn use_paths(source: &str) -> Vec<String> {
    let re = Regex::new(r"(?m)^\s*use\s+([a-zA-Z0-9_:]+)").unwrap();
    re.captures_iter(source).map(|cap| cap[1].to_string()).collect()
}

fn rs_files(dir: &Path, out: &mut Vec<std::path::PathBuf>) {
    for entry in fs::read_dir(dir).unwrap_or_else(|e| panic!("failed to read {}: {e}", dir.display())) {
        let entry = entry.unwrap();
        let path = entry.path();
        if path.is_dir() {
            rs_files(&path, out);
        } else if path.extension().is_some_and(|ext| ext == "rs") {
            out.push(path);
        }
    }
}

#[test]
fn each_layer_only_imports_its_allowed_dependencies() {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    for (relative_dir, allowed_prefixes) in POLICY {
        let dir = Path::new(manifest_dir).join(relative_dir);
        let mut files = Vec::new();
        rs_files(&dir, &mut files);
        assert!(!files.is_empty(), "policy directory {relative_dir} matched no files");

        for file in files {
            let source = fs::read_to_string(&file)
                .unwrap_or_else(|e| panic!("failed to read {}: {e}", file.display()));
            for path in use_paths(&source) {
                let allowed = allowed_prefixes.iter().any(|prefix| path.starts_with(prefix));
                assert!(
                    allowed,
                    "{} imports `{path}`, which is outside {relative_dir}'s allowed prefixes \
                     {allowed_prefixes:?} -- this breaks the crate's layering contract",
                    file.display(),
                );
            }
        }
    }
}
