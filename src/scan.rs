//! Filesystem enumeration of projects, tasks, and existing links.
//!
//! ```text
//! work/                          # target root
//! ├── ABC_新製品/                # project
//! │   ├── t_20230105_Design/     # task
//! │   ├── t_FinalReview/         # task
//! │   ├── #t_parked/             # ignored (prefix '#')
//! │   └── notes/                 # not a task (no t_ prefix)
//! ├── !archive/                  # ignored project
//! └── readme.txt                 # not a directory
//!
//! links/                         # link directory
//! ├── 20230105_ABC_Design.lnk    # existing link, removed on refresh
//! └── @keep.lnk                  # ignored
//! ```
//!
//! Every listing is a read of one directory followed by a conjunction of
//! predicates. A directory that cannot be read is reported and treated as
//! empty; it never aborts a run. Results are sorted by path so two runs over
//! the same tree visit entries in the same order.

use crate::naming::TASK_PREFIX;
use std::fs;
use std::path::{Path, PathBuf};

type Predicate<'a> = Box<dyn Fn(&Path) -> bool + 'a>;

/// Whether the entry's name starts with one of the `ignores` characters.
///
/// Only the leading character has to be valid UTF-8, so a name like
/// `#\xff` is still ignored.
pub fn is_ignored(path: &Path, ignores: &str) -> bool {
    path.file_name()
        .and_then(|n| n.to_string_lossy().chars().next())
        .is_some_and(|first| first != char::REPLACEMENT_CHARACTER && ignores.contains(first))
}

/// Directory check that does not follow symlinks.
fn is_real_dir(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok_and(|m| m.is_dir())
}

fn has_task_prefix(path: &Path) -> bool {
    path.file_name()
        .is_some_and(|n| n.as_encoded_bytes().starts_with(TASK_PREFIX.as_bytes()))
}

/// Name ends in `.{extension}`. A bare `.lnk` counts, unlike `Path::extension`.
fn has_extension(path: &Path, extension: &str) -> bool {
    let suffix = format!(".{extension}");
    path.file_name()
        .is_some_and(|n| n.as_encoded_bytes().ends_with(suffix.as_bytes()))
}

/// Read `dir` and keep the entries every predicate accepts.
fn list_filtered(dir: &Path, predicates: &[Predicate<'_>]) -> Vec<PathBuf> {
    let read = match fs::read_dir(dir) {
        Ok(read) => read,
        Err(err) => {
            tracing::warn!(dir = %dir.display(), error = %err, "cannot list directory");
            return Vec::new();
        }
    };

    let mut entries: Vec<PathBuf> = read
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| predicates.iter().all(|pred| pred(p)))
        .collect();

    entries.sort();
    entries
}

/// Project directories directly under `root`.
pub fn list_project_dirs(root: &Path, ignores: &str) -> Vec<PathBuf> {
    list_filtered(
        root,
        &[
            Box::new(is_real_dir),
            Box::new(|p: &Path| !is_ignored(p, ignores)),
        ],
    )
}

/// Task directories (`t_*`) directly under a project directory.
pub fn list_task_dirs(project: &Path, ignores: &str) -> Vec<PathBuf> {
    list_filtered(
        project,
        &[
            Box::new(has_task_prefix),
            Box::new(is_real_dir),
            Box::new(|p: &Path| !is_ignored(p, ignores)),
        ],
    )
}

/// Existing link files in `link_dir` carrying `extension`.
///
/// Directories are skipped even when their name ends in the extension. A
/// symlink to a directory counts as a link file, not a directory.
pub fn list_link_files(link_dir: &Path, extension: &str, ignores: &str) -> Vec<PathBuf> {
    list_filtered(
        link_dir,
        &[
            Box::new(|p: &Path| has_extension(p, extension)),
            Box::new(|p: &Path| !is_real_dir(p)),
            Box::new(|p: &Path| !is_ignored(p, ignores)),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use std::fs;
    use tempfile::TempDir;

    fn names(paths: &[PathBuf]) -> Vec<String> {
        paths
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect()
    }

    #[test]
    fn ignored_by_first_character_only() {
        assert!(is_ignored(Path::new("/w/#old"), "!#@"));
        assert!(is_ignored(Path::new("/w/!x"), "!#@"));
        assert!(!is_ignored(Path::new("/w/a#b"), "!#@"));
        assert!(!is_ignored(Path::new("/w/abc"), "!#@"));
    }

    #[test]
    fn nothing_ignored_with_empty_ignore_set() {
        assert!(!is_ignored(Path::new("/w/#old"), ""));
    }

    #[test]
    fn ignore_set_may_hold_multibyte_characters() {
        assert!(is_ignored(Path::new("/w/済_old"), "済"));
    }

    #[test]
    fn projects_are_directories_not_ignored_and_sorted() {
        let tmp = build_tree(&[
            ("DEF_Second", &[]),
            ("ABC_First", &[]),
            ("!archive", &[]),
        ]);
        fs::write(tmp.path().join("readme.txt"), "x").unwrap();

        let projects = list_project_dirs(tmp.path(), "!#@");
        assert_eq!(names(&projects), vec!["ABC_First", "DEF_Second"]);
    }

    #[test]
    fn tasks_need_prefix_and_directory() {
        let tmp = build_tree(&[(
            "ABC",
            &["t_20230105_Design", "t_FinalReview", "#t_parked", "notes"],
        )]);
        fs::write(tmp.path().join("ABC/t_file.txt"), "x").unwrap();

        let tasks = list_task_dirs(&tmp.path().join("ABC"), "!#@");
        assert_eq!(names(&tasks), vec!["t_20230105_Design", "t_FinalReview"]);
    }

    #[test]
    fn tasks_prefix_is_case_sensitive() {
        let tmp = build_tree(&[("ABC", &["T_upper", "t_lower"])]);
        let tasks = list_task_dirs(&tmp.path().join("ABC"), "");
        assert_eq!(names(&tasks), vec!["t_lower"]);
    }

    #[test]
    fn link_files_filtered_by_extension_and_ignores() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("a.lnk"), "").unwrap();
        fs::write(tmp.path().join("b.txt"), "").unwrap();
        fs::write(tmp.path().join("@keep.lnk"), "").unwrap();
        fs::create_dir(tmp.path().join("dir.lnk")).unwrap();

        let links = list_link_files(tmp.path(), "lnk", "!#@");
        assert_eq!(names(&links), vec!["a.lnk"]);
    }

    #[test]
    fn nameless_link_file_is_listed() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(".lnk"), "").unwrap();
        fs::write(tmp.path().join("lnk"), "").unwrap();
        fs::write(tmp.path().join("x.lnk.bak"), "").unwrap();

        let links = list_link_files(tmp.path(), "lnk", "!#@");
        assert_eq!(names(&links), vec![".lnk"]);
    }

    #[test]
    fn multi_part_extension_matches_whole_suffix() {
        assert!(has_extension(Path::new("/l/a.tar.gz"), "tar.gz"));
        assert!(!has_extension(Path::new("/l/a.gz"), "tar.gz"));
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_names_are_still_classified() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let task = Path::new(OsStr::from_bytes(b"t_\xff\xfe"));
        let parked = Path::new(OsStr::from_bytes(b"#\xff"));
        let garbled = Path::new(OsStr::from_bytes(b"\xff_x"));
        let link = Path::new(OsStr::from_bytes(b"\xff.lnk"));

        assert!(has_task_prefix(task));
        assert!(is_ignored(parked, "!#@"));
        assert!(!is_ignored(garbled, "!#@"));
        assert!(has_extension(link, "lnk"));
    }

    #[cfg(unix)]
    #[test]
    fn symlink_to_directory_counts_as_link_file() {
        let tmp = TempDir::new().unwrap();
        let target = tmp.path().join("target");
        fs::create_dir(&target).unwrap();
        let links = tmp.path().join("links");
        fs::create_dir(&links).unwrap();
        std::os::unix::fs::symlink(&target, links.join("x.lnk")).unwrap();

        assert_eq!(names(&list_link_files(&links, "lnk", "")), vec!["x.lnk"]);
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_project_is_not_a_project() {
        let tmp = build_tree(&[("ABC", &[])]);
        std::os::unix::fs::symlink(tmp.path().join("ABC"), tmp.path().join("ALIAS")).unwrap();

        assert_eq!(names(&list_project_dirs(tmp.path(), "")), vec!["ABC"]);
    }

    #[test]
    fn missing_directory_lists_nothing() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("nope");
        assert!(list_project_dirs(&missing, "").is_empty());
        assert!(list_task_dirs(&missing, "").is_empty());
        assert!(list_link_files(&missing, "lnk", "").is_empty());
    }
}
