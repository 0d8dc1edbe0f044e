//! The refresh pipeline: plan, then apply.
//!
//! ```text
//! 1. Plan    target/  →  Plan           (read-only: enumerate, parse, name)
//! 2. Apply   Plan     →  links/         (delete old shortcuts, create new ones)
//! ```
//!
//! Planning never writes anything, which is what `taskol plan` shows. The
//! apply step is best-effort: a link that cannot be removed or created is
//! logged, recorded in the [`RefreshReport`], and the run moves on.
//!
//! Configuration problems are the only fatal errors, and they are raised
//! before the first filesystem change.

use crate::config::{ConfigError, TaskolConfig};
use crate::links::Linker;
use crate::naming::{self, ProjectIdentity, TaskIdentity};
use crate::scan;
use crate::template::LinkTemplate;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RefreshError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error("{role} directory does not exist: {}", .path.display())]
    MissingDirectory { role: &'static str, path: PathBuf },
}

/// Everything a refresh would create.
#[derive(Debug, Clone, Serialize)]
pub struct Plan {
    pub link_dir: PathBuf,
    pub projects: Vec<ProjectPlan>,
}

/// One project folder and the links for its tasks.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectPlan {
    pub project_dir: PathBuf,
    pub project: ProjectIdentity,
    pub links: Vec<PlannedLink>,
}

/// One task folder and the shortcut pointing at it.
#[derive(Debug, Clone, Serialize)]
pub struct PlannedLink {
    pub task_dir: PathBuf,
    pub task: TaskIdentity,
    /// Link base name, as rendered from the template.
    pub name: String,
    pub link_path: PathBuf,
}

impl Plan {
    pub fn link_count(&self) -> usize {
        self.projects.iter().map(|p| p.links.len()).sum()
    }

    /// Link names rendered for more than one task, in name order.
    ///
    /// Only the last task with a given name keeps its shortcut.
    pub fn collisions(&self) -> Vec<&str> {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for link in self.projects.iter().flat_map(|p| &p.links) {
            *counts.entry(link.name.as_str()).or_default() += 1;
        }
        counts
            .into_iter()
            .filter(|&(_, n)| n > 1)
            .map(|(name, _)| name)
            .collect()
    }
}

/// Enumeration settings shared by planning and cleanup.
#[derive(Debug, Clone)]
pub struct Layout {
    pub target: PathBuf,
    pub link_dir: PathBuf,
    pub extension: String,
    pub ignores: String,
}

impl Layout {
    pub fn from_config(config: &TaskolConfig) -> Self {
        Self {
            target: config.target_dir(),
            link_dir: config.link_dir(),
            extension: config.link_extension().to_string(),
            ignores: config.ignores.clone(),
        }
    }

    /// Both directories must exist before anything is planned or touched.
    pub fn check(&self) -> Result<(), RefreshError> {
        for (role, path) in [("Target", &self.target), ("Link", &self.link_dir)] {
            if !path.is_dir() {
                return Err(RefreshError::MissingDirectory {
                    role,
                    path: path.clone(),
                });
            }
        }
        Ok(())
    }

    fn link_path(&self, name: &str) -> PathBuf {
        self.link_dir.join(format!("{name}.{}", self.extension))
    }
}

/// Walk the target tree and render every link name. Read-only.
pub fn build_plan(layout: &Layout, template: &LinkTemplate) -> Plan {
    let mut projects = Vec::new();

    for project_dir in scan::list_project_dirs(&layout.target, &layout.ignores) {
        let project = naming::parse_project_identity(&project_dir);
        tracing::debug!(
            dir = %project_dir.display(),
            abbreviation = %project.abbreviation,
            name = %project.display_name,
            "project"
        );

        let links = scan::list_task_dirs(&project_dir, &layout.ignores)
            .into_iter()
            .map(|task_dir| {
                let task = naming::parse_task_identity(&task_dir);
                let name = template.render(&project, &task);
                tracing::debug!(task = %task_dir.display(), link = %name, "planned");
                PlannedLink {
                    link_path: layout.link_path(&name),
                    task_dir,
                    task,
                    name,
                }
            })
            .collect();

        projects.push(ProjectPlan {
            project_dir,
            project,
            links,
        });
    }

    let plan = Plan {
        link_dir: layout.link_dir.clone(),
        projects,
    };
    for name in plan.collisions() {
        tracing::warn!(link = %name, "several tasks share this link name; the last one wins");
    }
    plan
}

/// Validate the configuration and directories, then build the plan.
pub fn plan(config: &TaskolConfig) -> Result<Plan, RefreshError> {
    config.validate()?;
    let template = config.template()?;
    let layout = Layout::from_config(config);
    layout.check()?;
    Ok(build_plan(&layout, &template))
}

/// What an apply step did to the link directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Remove,
    Create,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Remove => f.write_str("remove"),
            Action::Create => f.write_str("create"),
        }
    }
}

/// A per-item failure during apply.
#[derive(Debug, Clone, Serialize)]
pub struct Failure {
    pub action: Action,
    pub path: PathBuf,
    pub message: String,
}

/// Outcome of an apply step.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RefreshReport {
    pub removed: usize,
    pub created: usize,
    pub failures: Vec<Failure>,
}

impl RefreshReport {
    fn fail(&mut self, action: Action, path: &Path, err: impl fmt::Display) {
        tracing::warn!(%action, path = %path.display(), error = %err, "link operation failed");
        self.failures.push(Failure {
            action,
            path: path.to_path_buf(),
            message: err.to_string(),
        });
    }
}

/// Delete the existing shortcuts, then create the planned ones.
pub fn apply(layout: &Layout, plan: &Plan, linker: &dyn Linker) -> RefreshReport {
    let mut report = RefreshReport::default();

    for existing in scan::list_link_files(&layout.link_dir, &layout.extension, &layout.ignores) {
        match linker.remove_link(&existing) {
            Ok(()) => {
                tracing::debug!(link = %existing.display(), "removed");
                report.removed += 1;
            }
            Err(err) => report.fail(Action::Remove, &existing, err),
        }
    }

    for link in plan.projects.iter().flat_map(|p| &p.links) {
        match linker.create_link(&link.task_dir, &link.link_path) {
            Ok(()) => {
                tracing::debug!(link = %link.link_path.display(), "created");
                report.created += 1;
            }
            Err(err) => report.fail(Action::Create, &link.link_path, err),
        }
    }

    tracing::info!(
        removed = report.removed,
        created = report.created,
        failed = report.failures.len(),
        "refresh finished"
    );
    report
}

/// Plan and apply in one go.
pub fn refresh(
    config: &TaskolConfig,
    linker: &dyn Linker,
) -> Result<(Plan, RefreshReport), RefreshError> {
    let plan = plan(config)?;
    let layout = Layout::from_config(config);
    let report = apply(&layout, &plan, linker);
    Ok((plan, report))
}
