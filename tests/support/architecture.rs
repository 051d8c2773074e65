use std::fs;
use std::path::{Path, PathBuf};

/// A source line matching a forbidden pattern: `(path, line number, line)`.
pub type Hit = (String, usize, String);

/// Every line under `src_dir` (relative to the crate root) that contains
/// one of `patterns`.
pub fn find_lines_containing(src_dir: &str, patterns: &[&str]) -> Vec<Hit> {
    let root = Path::new(env!("CARGO_MANIFEST_DIR"));
    let mut files = Vec::new();
    walk(&root.join(src_dir), &mut files);
    files.sort();

    files
        .iter()
        .flat_map(|file| {
            let content = fs::read_to_string(file)
                .unwrap_or_else(|e| panic!("cannot read {}: {e}", file.display()));
            let shown = file.strip_prefix(root).unwrap_or(file).display().to_string();
            content
                .lines()
                .enumerate()
                .filter(|(_, line)| patterns.iter().any(|p| line.contains(p)))
                .map(|(idx, line)| (shown.clone(), idx + 1, line.to_string()))
                .collect::<Vec<_>>()
        })
        .collect()
}

fn walk(dir: &Path, files: &mut Vec<PathBuf>) {
    let entries =
        fs::read_dir(dir).unwrap_or_else(|e| panic!("cannot list {}: {e}", dir.display()));
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            walk(&path, files);
        } else if path.extension().is_some_and(|ext| ext == "rs") {
            files.push(path);
        }
    }
}
