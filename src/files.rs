//! Template discovery.
//!
//! Walks the search root and returns every file matching the configured
//! patterns, relative to the root and sorted so runs are deterministic.

use std::path::{Path, PathBuf};

use tug_core::filter::FileFilterSpec;
use walkdir::WalkDir;

/// Patterns used when none are given on the command line.
pub const DEFAULT_PATTERNS: &[&str] = &["app/**/*.hbs", "addon/**/*.hbs"];

pub fn default_patterns() -> Vec<String> {
    DEFAULT_PATTERNS.iter().map(|s| s.to_string()).collect()
}

/// Collect template paths under `root` matching `filter`.
///
/// Unreadable directory entries are skipped. Returned paths are relative to
/// `root`.
pub fn collect_templates(root: &Path, filter: &FileFilterSpec) -> Vec<PathBuf> {
    let mut files = Vec::new();

    let walker = WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|entry| {
            if !entry.file_type().is_dir() {
                return true;
            }
            match entry.path().strip_prefix(root) {
                Ok(rel) if rel.as_os_str().is_empty() => true,
                Ok(rel) => !filter.excludes_dir(rel),
                Err(_) => false,
            }
        });

    for entry in walker.filter_map(|e| e.ok()) {
        if !entry.file_type().is_file() {
            continue;
        }
        let Ok(rel_path) = entry.path().strip_prefix(root) else {
            continue;
        };
        if filter.matches(rel_path) {
            files.push(rel_path.to_path_buf());
        }
    }

    files.sort();
    files
}

/// Render a relative path with `/` separators for reports.
pub fn display_path(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "{{x}}").unwrap();
    }

    #[test]
    fn finds_templates_under_default_roots() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "app/templates/b.hbs");
        touch(dir.path(), "app/components/a.hbs");
        touch(dir.path(), "addon/components/c.hbs");
        touch(dir.path(), "app/components/a.js");
        touch(dir.path(), "lib/other.hbs");

        let filter = FileFilterSpec::parse(&default_patterns()).unwrap();
        let found: Vec<String> = collect_templates(dir.path(), &filter)
            .iter()
            .map(|p| display_path(p))
            .collect();
        assert_eq!(
            found,
            vec![
                "addon/components/c.hbs",
                "app/components/a.hbs",
                "app/templates/b.hbs",
            ]
        );
    }

    #[test]
    fn skips_excluded_directories() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "app/node_modules/pkg/x.hbs");
        touch(dir.path(), "tmp/app/y.hbs");
        touch(dir.path(), "dist/app/z.hbs");
        touch(dir.path(), "app/ok.hbs");

        let filter = FileFilterSpec::parse(&["**/*.hbs".to_string()]).unwrap();
        let found = collect_templates(dir.path(), &filter);
        assert_eq!(found, vec![PathBuf::from("app/ok.hbs")]);
    }

    #[test]
    fn nested_tmp_directory_is_migrated() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "app/components/tmp/x.hbs");

        let filter = FileFilterSpec::parse(&default_patterns()).unwrap();
        let found = collect_templates(dir.path(), &filter);
        assert_eq!(found, vec![PathBuf::from("app/components/tmp/x.hbs")]);
    }

    #[test]
    fn user_exclusions_apply() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "app/legacy/old.hbs");
        touch(dir.path(), "app/new.hbs");

        let filter =
            FileFilterSpec::parse(&["app/**/*.hbs".to_string(), "!app/legacy/**".to_string()])
                .unwrap();
        let found = collect_templates(dir.path(), &filter);
        assert_eq!(found, vec![PathBuf::from("app/new.hbs")]);
    }
}
