//! CLI output formatting.
//!
//! Each project is shown by its parsed identity first, with the folder it
//! came from as an indented `Source:` line, followed by one line per task
//! mapping the task folder to its shortcut:
//!
//! ```text
//! 001 ABC 新製品 (2 tasks)
//!     Source: ABC_新製品/
//!     001 t_20230105_Design_Review → 20230105_ABC_Design_Review.lnk
//!     002 t_FinalReview → _ABC_FinalReview.lnk
//! 002 SLS 営業部 (1 task)
//!     Source: 営業部(SLS)/
//!     001 t_2024-02-10_見積(A社) → 20240210_SLS_見積_A社.lnk
//!
//! Removed 3 links, created 3 links
//! ```
//!
//! Every `format_*` function is pure and returns lines; the `print_*`
//! wrappers write them to stdout.

use crate::config::TaskolConfig;
use crate::refresh::{Plan, RefreshReport};
use crate::template::LinkTemplate;
use std::path::Path;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

/// Project header: abbreviation, then the display name when it differs.
fn project_header(index: usize, abbreviation: &str, display_name: &str, tasks: usize) -> String {
    let title = if abbreviation == display_name {
        abbreviation.to_string()
    } else {
        format!("{abbreviation} {display_name}")
    };
    format!("{} {} ({})", format_index(index), title, plural(tasks, "task"))
}

pub fn format_plan(plan: &Plan) -> Vec<String> {
    let mut lines = Vec::new();
    for (i, project) in plan.projects.iter().enumerate() {
        lines.push(project_header(
            i + 1,
            &project.project.abbreviation,
            &project.project.display_name,
            project.links.len(),
        ));
        lines.push(format!(
            "{}Source: {}/",
            indent(1),
            file_name(&project.project_dir)
        ));
        for (j, link) in project.links.iter().enumerate() {
            lines.push(format!(
                "{}{} {} → {}",
                indent(1),
                format_index(j + 1),
                file_name(&link.task_dir),
                file_name(&link.link_path)
            ));
        }
    }
    if plan.projects.is_empty() {
        lines.push("No projects found".to_string());
    }
    for name in plan.collisions() {
        lines.push(format!("Warning: several tasks map to {name:?}; only the last is kept"));
    }
    lines
}

pub fn format_report(report: &RefreshReport) -> Vec<String> {
    let mut lines = vec![format!(
        "Removed {}, created {}",
        plural(report.removed, "link"),
        plural(report.created, "link")
    )];
    if !report.failures.is_empty() {
        lines.push(format!("{} failed:", plural(report.failures.len(), "operation")));
        for failure in &report.failures {
            lines.push(format!(
                "{}{} {}: {}",
                indent(1),
                failure.action,
                failure.path.display(),
                failure.message
            ));
        }
    }
    lines
}

/// Resolved settings plus template warnings, for `taskol check`.
pub fn format_check(config: &TaskolConfig, template: &LinkTemplate) -> Vec<String> {
    let mut lines = vec![
        format!("Target:    {}", config.target_dir().display()),
        format!("Link:      {}", config.link_dir().display()),
        format!("Format:    {template}"),
        format!("Ignores:   {}", config.ignores),
        format!("Extension: .{}", config.link_extension()),
    ];
    let used: Vec<String> = template.placeholders().iter().map(|p| p.to_string()).collect();
    if used.is_empty() {
        lines.push(
            "Warning: format has no placeholders; every task gets the same link".to_string(),
        );
    } else {
        lines.push(format!("Placeholders: {}", used.join(" ")));
        if !template.distinguishes_tasks() {
            lines.push(
                "Warning: format has no task placeholder; tasks of a project share one link"
                    .to_string(),
            );
        }
    }
    lines
}

pub fn print_plan(plan: &Plan) {
    for line in format_plan(plan) {
        println!("{}", line);
    }
}

pub fn print_report(report: &RefreshReport) {
    for line in format_report(report) {
        println!("{}", line);
    }
}

pub fn print_check(config: &TaskolConfig, template: &LinkTemplate) {
    for line in format_check(config, template) {
        println!("{}", line);
    }
}
