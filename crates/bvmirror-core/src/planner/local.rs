//! Local mirror walk: the already-synced file set used in the diff.

use std::collections::HashSet;
use std::path::Path;
use walkdir::WalkDir;

/// Normalize a key for comparison: forward slashes, no leading slash.
pub fn normalize_key(key: &str) -> String {
    key.replace('\\', "/").trim_start_matches('/').to_string()
}

/// Recursive walk of `root`; returns root-relative, slash-normalized paths.
/// A missing root yields the empty set (nothing mirrored yet).
pub fn local_file_set(root: &Path) -> HashSet<String> {
    let mut files = HashSet::new();
    for entry in WalkDir::new(root).into_iter().filter_map(Result::ok) {
        if !entry.file_type().is_file() {
            continue;
        }
        let Ok(rel) = entry.path().strip_prefix(root) else {
            continue;
        };
        let joined = rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join("/");
        files.insert(joined);
    }
    files
}
