//! Shared test utilities for the taskol test suite.
//!
//! Builds throwaway project trees and link directories so tests do not depend
//! on checked-in fixtures.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = build_tree(&[
//!     ("ABC_新製品", &["t_20230105_Design_Review", "t_FinalReview"]),
//!     ("!archive", &["t_old"]),
//! ]);
//! let work = WorkDirs::in_temp(&tmp);
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::refresh::{Plan, ProjectPlan};

// =========================================================================
// Fixture setup
// =========================================================================

/// Create `project/task` directories inside a fresh temp directory.
///
/// Each entry is `(project, tasks)`; use `&[]` for a project without tasks.
pub fn build_tree(projects: &[(&str, &[&str])]) -> TempDir {
    let tmp = TempDir::new().unwrap();
    add_projects(tmp.path(), projects);
    tmp
}

/// Add `project/task` directories under `root`.
pub fn add_projects(root: &Path, projects: &[(&str, &[&str])]) {
    for (project, tasks) in projects {
        let dir = root.join(project);
        fs::create_dir_all(&dir).unwrap();
        for task in *tasks {
            fs::create_dir_all(dir.join(task)).unwrap();
        }
    }
}

/// A target root and a link directory side by side in one temp directory.
pub struct WorkDirs {
    pub target: PathBuf,
    pub link: PathBuf,
}

impl WorkDirs {
    /// `work/` and `links/` under `tmp`, both created.
    pub fn in_temp(tmp: &TempDir) -> Self {
        let target = tmp.path().join("work");
        let link = tmp.path().join("links");
        fs::create_dir_all(&target).unwrap();
        fs::create_dir_all(&link).unwrap();
        Self { target, link }
    }
}

// =========================================================================
// Plan lookups (panic with a clear message on miss)
// =========================================================================

/// Find a project plan by folder name. Panics if not found.
pub fn find_project<'a>(plan: &'a Plan, folder: &str) -> &'a ProjectPlan {
    plan.projects
        .iter()
        .find(|p| p.project_dir.file_name().is_some_and(|n| n == folder))
        .unwrap_or_else(|| {
            let folders: Vec<String> = plan
                .projects
                .iter()
                .map(|p| p.project_dir.display().to_string())
                .collect();
            panic!("project '{folder}' not found. Available: {folders:?}")
        })
}

/// All link base names in plan order.
pub fn link_names(plan: &Plan) -> Vec<&str> {
    plan.projects
        .iter()
        .flat_map(|p| p.links.iter().map(|l| l.name.as_str()))
        .collect()
}

/// Sorted file names currently in `dir`.
pub fn dir_listing(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    names.sort();
    names
}
