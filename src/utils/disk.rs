//! Test executables on disk

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use tracing::warn;

/// Names of the executable files directly inside `folder`
///
/// A folder that cannot be read yields an empty set.
pub fn tests_on_disk(folder: &Path) -> BTreeSet<String> {
    let entries = match fs::read_dir(folder) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("Cannot read tests folder {}: {}", folder.display(), e);
            return BTreeSet::new();
        }
    };

    entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            fs::metadata(entry.path())
                .map(|m| m.is_file() && is_executable(&m))
                .unwrap_or(false)
        })
        .filter_map(|entry| entry.file_name().into_string().ok())
        .collect()
}

/// Keep the requested names that exist on disk, in request order
pub fn filter_runlist(requested: &[String], on_disk: &BTreeSet<String>) -> Vec<String> {
    requested
        .iter()
        .filter(|name| on_disk.contains(name.as_str()))
        .cloned()
        .collect()
}

#[cfg(unix)]
fn is_executable(metadata: &fs::Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode() & 0o111 != 0
}

#[cfg(not(unix))]
fn is_executable(_metadata: &fs::Metadata) -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn names(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_filter_runlist_drops_unknown_names() {
        let on_disk: BTreeSet<String> = names(&["a", "b", "c"]).into_iter().collect();
        let runlist = filter_runlist(&names(&["a", "ghost", "b"]), &on_disk);
        assert_eq!(runlist, names(&["a", "b"]));
    }

    #[test]
    fn test_filter_runlist_keeps_order_and_duplicates() {
        let on_disk: BTreeSet<String> = names(&["a", "b"]).into_iter().collect();
        let runlist = filter_runlist(&names(&["b", "a", "b"]), &on_disk);
        assert_eq!(runlist, names(&["b", "a", "b"]));
    }

    #[test]
    fn test_missing_folder_is_empty() {
        let dir = tempdir().unwrap();
        assert!(tests_on_disk(&dir.path().join("nope")).is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_only_executable_files_are_listed() {
        use crate::executor::fixtures::write_script;

        let dir = tempdir().unwrap();
        write_script(dir.path(), "search_integration_tests", "exit 0");
        std::fs::write(dir.path().join("README.txt"), "not a test").unwrap();
        std::fs::create_dir(dir.path().join("subdir")).unwrap();

        let found = tests_on_disk(dir.path());
        assert_eq!(found.into_iter().collect::<Vec<_>>(), names(&["search_integration_tests"]));
    }
}
