use super::filesystem::{absolute, read_to_string_if_exists};
use std::path::Path;

pub const README_NAMES: [&str; 4] = ["README.md", "README", "README.txt", "README.rst"];

pub fn find_readme(files: &[String]) -> Option<&String> {
    files.iter().find(|path| {
        !path.contains('/')
            && README_NAMES
                .iter()
                .any(|name| path.eq_ignore_ascii_case(name))
    })
}

/// Content of the root readme, or `None` when absent or unreadable.
pub fn read_readme(root: &Path, files: &[String]) -> Option<String> {
    let relative = find_readme(files)?;
    read_to_string_if_exists(&absolute(root, relative))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn read_readme_prefers_root_file() {
        let dir = TempDir::new().expect("temp dir should be created");
        fs::create_dir_all(dir.path().join("docs")).expect("docs should create");
        fs::write(dir.path().join("docs/README.md"), "nested").expect("nested should write");
        fs::write(dir.path().join("Readme.md"), "# Project\n## Usage").expect("root write");

        let files = vec!["Readme.md".to_string(), "docs/README.md".to_string()];
        let content = read_readme(dir.path(), &files).expect("readme should be found");
        assert!(content.contains("## Usage"));
    }

    #[test]
    fn read_readme_returns_none_without_root_readme() {
        let dir = TempDir::new().expect("temp dir should be created");
        let files = vec!["docs/README.md".to_string()];
        assert!(read_readme(dir.path(), &files).is_none());
    }
}
