//! Path and naming helpers shared by the library and the CLI.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Derives a table name from a source file path (the file stem).
#[must_use]
pub fn filename_to_table_name(path: &Path) -> String {
    path.file_stem()
        .map_or_else(|| "import".to_string(), |stem| stem.to_string_lossy().into_owned())
}

/// Expands a mixed list of files and directories into `(table name, file)`
/// pairs.
///
/// Files are taken as-is and named after their stem; directories are
/// walked recursively for files with the given extension, named after
/// their relative path without the extension. Duplicate names get `-1`,
/// `-2`, ... suffixes. Paths that are neither files nor directories
/// contribute nothing; the caller decides whether an empty result is an
/// error.
#[must_use]
pub fn files_from_paths(paths: &[PathBuf], extension: &str) -> Vec<(String, PathBuf)> {
    let mut files: Vec<(String, PathBuf)> = Vec::new();
    let mut taken: BTreeSet<String> = BTreeSet::new();

    let mut add = |name: String, path: PathBuf, files: &mut Vec<(String, PathBuf)>| {
        let unique = if taken.contains(&name) {
            let mut i = 1;
            loop {
                let candidate = format!("{name}-{i}");
                if !taken.contains(&candidate) {
                    break candidate;
                }
                i += 1;
            }
        } else {
            name
        };
        taken.insert(unique.clone());
        files.push((unique, path));
    };

    for path in paths {
        if path.is_file() {
            add(filename_to_table_name(path), path.clone(), &mut files);
        } else if path.is_dir() {
            let mut matched = Vec::new();
            collect_matching_files(path, extension, &mut matched);
            matched.sort();
            for file in matched {
                let name = file
                    .strip_prefix(path)
                    .unwrap_or(&file)
                    .with_extension("")
                    .to_string_lossy()
                    .into_owned();
                add(name, file, &mut files);
            }
        }
    }

    files
}

fn collect_matching_files(dir: &Path, extension: &str, out: &mut Vec<PathBuf>) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_matching_files(&path, extension, out);
        } else if path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
        {
            out.push(path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn table_name_is_the_file_stem() {
        assert_eq!(
            filename_to_table_name(Path::new("dir/valid.geojson")),
            "valid"
        );
        assert_eq!(filename_to_table_name(Path::new("plain")), "plain");
    }

    #[test]
    fn duplicate_stems_get_suffixes() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a");
        let b = dir.path().join("b");
        fs::create_dir_all(&a).unwrap();
        fs::create_dir_all(&b).unwrap();
        fs::write(a.join("valid.geojson"), "{}").unwrap();
        fs::write(b.join("valid.geojson"), "{}").unwrap();

        let files = files_from_paths(
            &[a.join("valid.geojson"), b.join("valid.geojson")],
            "geojson",
        );
        let names: Vec<&str> = files.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, vec!["valid", "valid-1"]);
    }

    #[test]
    fn directories_are_walked_recursively() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("top.geojson"), "{}").unwrap();
        fs::write(dir.path().join("nested/deep.geojson"), "{}").unwrap();
        fs::write(dir.path().join("ignored.txt"), "").unwrap();

        let files = files_from_paths(&[dir.path().to_path_buf()], "geojson");
        let names: Vec<&str> = files.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(files.len(), 2);
        assert!(names.contains(&"top"));
        assert!(names.iter().any(|n| n.ends_with("deep")));
    }

    #[test]
    fn missing_paths_contribute_nothing() {
        let files = files_from_paths(&[PathBuf::from("does/not/exist.geojson")], "geojson");
        assert!(files.is_empty());
    }
}
