// collect.rs
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const HEIF_EXTENSIONS: [&str; 2] = ["heic", "heif"];

/// True if the path carries a `.heic`/`.heif` extension (case-insensitive).
pub fn is_heif_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| HEIF_EXTENSIONS.iter().any(|known| ext.eq_ignore_ascii_case(known)))
        .unwrap_or(false)
}

/// Expands the user's selection into the list of files to convert.
///
/// Files are kept in selection order; directories are walked recursively in
/// sorted order. Non-matching files and unreadable entries are skipped
/// silently. An empty result means "nothing found", not an error.
pub fn collect_files(inputs: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for input in inputs {
        if input.is_file() {
            if is_heif_file(input) {
                files.push(input.clone());
            }
        } else if input.is_dir() {
            let walker = WalkDir::new(input)
                .sort_by_file_name()
                .into_iter()
                .filter_map(|entry| entry.ok())
                .filter(|entry| entry.file_type().is_file());

            for entry in walker {
                if is_heif_file(entry.path()) {
                    files.push(entry.path().to_path_buf());
                }
            }
        }
        // Anything else (broken symlink, deleted path) is skipped.
    }

    files
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn touch(path: &Path) {
        fs::write(path, b"x").unwrap();
    }

    #[test]
    fn extension_match_is_case_insensitive() {
        assert!(is_heif_file(Path::new("photo.heic")));
        assert!(is_heif_file(Path::new("photo.HEIC")));
        assert!(is_heif_file(Path::new("photo.HeIf")));
        assert!(!is_heif_file(Path::new("photo.jpg")));
        assert!(!is_heif_file(Path::new("photo.heic.txt")));
        assert!(!is_heif_file(Path::new("heic")));
    }

    #[test]
    fn directory_walk_finds_nested_matches_only() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        touch(&root.join("a.HEIC"));
        touch(&root.join("b.txt"));
        fs::create_dir(root.join("sub")).unwrap();
        touch(&root.join("sub").join("c.heif"));

        let found = collect_files(&[root.to_path_buf()]);
        let names: Vec<_> = found
            .iter()
            .map(|p| p.strip_prefix(root).unwrap().to_string_lossy().to_string())
            .collect();
        let expected = vec![
            "a.HEIC".to_string(),
            format!("sub{}c.heif", std::path::MAIN_SEPARATOR),
        ];
        assert_eq!(names, expected);
    }

    #[test]
    fn file_inputs_keep_selection_order() {
        let dir = tempdir().unwrap();
        let b = dir.path().join("b.heic");
        let a = dir.path().join("a.heif");
        touch(&b);
        touch(&a);

        let found = collect_files(&[b.clone(), a.clone()]);
        assert_eq!(found, vec![b, a]);
    }

    #[test]
    fn non_matching_file_input_is_skipped() {
        let dir = tempdir().unwrap();
        let txt = dir.path().join("notes.txt");
        touch(&txt);

        assert!(collect_files(&[txt]).is_empty());
    }

    #[test]
    fn missing_path_yields_nothing() {
        let dir = tempdir().unwrap();
        let gone = dir.path().join("does_not_exist");
        assert!(collect_files(&[gone]).is_empty());
    }

    #[test]
    fn directory_walk_order_is_stable() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        for name in ["c.heic", "a.heic", "b.heic"] {
            touch(&root.join(name));
        }

        let first = collect_files(&[root.to_path_buf()]);
        let second = collect_files(&[root.to_path_buf()]);
        assert_eq!(first, second);

        let names: Vec<_> = first
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.heic", "b.heic", "c.heic"]);
    }
}
