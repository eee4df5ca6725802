use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

pub const SKIP_DIRS: [&str; 11] = [
    "node_modules",
    ".git",
    "target",
    "dist",
    "build",
    "vendor",
    "__pycache__",
    ".venv",
    "venv",
    "coverage",
    ".next",
];

/// Repository-relative file paths, `/`-separated and sorted.
pub fn list_files(root: &Path) -> Vec<String> {
    let mut files: Vec<String> = WalkDir::new(root)
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_skipped_dir(entry))
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| relative_path(root, entry.path()))
        .collect();
    files.sort();
    files
}

fn is_skipped_dir(entry: &DirEntry) -> bool {
    entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .map(|name| SKIP_DIRS.contains(&name))
            .unwrap_or(false)
}

fn relative_path(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts = relative
        .components()
        .map(|component| component.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>();
    Some(parts.join("/"))
}

pub fn read_to_string_if_exists(path: &Path) -> Option<String> {
    std::fs::read_to_string(path).ok()
}

pub fn absolute(root: &Path, relative: &str) -> PathBuf {
    relative
        .split('/')
        .fold(root.to_path_buf(), |path, segment| path.join(segment))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn list_files_skips_dependency_caches() {
        let dir = TempDir::new().expect("temp dir should be created");
        fs::create_dir_all(dir.path().join("src/nested")).expect("src should create");
        fs::create_dir_all(dir.path().join("node_modules/left-pad")).expect("cache should create");
        fs::create_dir_all(dir.path().join(".git")).expect("git dir should create");
        fs::write(dir.path().join("src/nested/b.rs"), "fn b() {}").expect("b should write");
        fs::write(dir.path().join("src/a.rs"), "fn a() {}").expect("a should write");
        fs::write(dir.path().join("node_modules/left-pad/index.js"), "").expect("dep write");
        fs::write(dir.path().join(".git/HEAD"), "ref").expect("head should write");

        let files = list_files(dir.path());
        assert_eq!(files, vec!["src/a.rs".to_string(), "src/nested/b.rs".to_string()]);
    }

    #[test]
    fn absolute_joins_each_segment() {
        let root = Path::new("/repo");
        assert_eq!(absolute(root, "src/lib.rs"), root.join("src").join("lib.rs"));
    }
}
