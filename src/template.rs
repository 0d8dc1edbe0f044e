//! Link-name templates.
//!
//! A template is plain text with placeholders wrapped in colons. Each
//! placeholder is replaced with a field parsed from the project or task
//! folder; everything else is copied through untouched.
//!
//! | Placeholder | Value |
//! |---|---|
//! | `:pabb:` | project abbreviation |
//! | `:pname:` | project display name |
//! | `:tname:` | task display name |
//! | `:tdate:` | task date as `YYYYMMDD` |
//! | `:tdate-:` | task date as `YYYY-MM-DD` |
//! | `:tdate年月日:` | task date as `YYYY年MM月DD日` |
//!
//! Date placeholders render as the empty string for undated tasks, so the
//! default template `:tdate:_:pabb:_:tname:` yields `_ABC_Review` there.
//!
//! Substitution is a single left-to-right pass. Replacement text is never
//! scanned again: a task literally named `:pabb:` keeps that name.
//!
//! When placeholders overlap, the one starting first wins regardless of its
//! kind. In `:tname:pabb:` the colon after `tname` closes `:tname:`, so the
//! trailing `pabb:` is plain text and the result is `<task>pabb:`.

use crate::date;
use crate::naming::{ProjectIdentity, TaskIdentity};
use regex::{Captures, Regex};
use std::fmt;
use std::sync::LazyLock;
use thiserror::Error;

static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r":(pabb|pname|tname|tdate-|tdate年月日|tdate):").unwrap());

#[derive(Error, Debug, PartialEq, Eq)]
pub enum TemplateError {
    #[error("link name template is empty")]
    Empty,
}

/// A recognized placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder {
    ProjectAbbreviation,
    ProjectName,
    TaskName,
    TaskDate,
    TaskDateHyphenated,
    TaskDateKanji,
}

impl Placeholder {
    fn from_key(key: &str) -> Option<Self> {
        match key {
            "pabb" => Some(Self::ProjectAbbreviation),
            "pname" => Some(Self::ProjectName),
            "tname" => Some(Self::TaskName),
            "tdate" => Some(Self::TaskDate),
            "tdate-" => Some(Self::TaskDateHyphenated),
            "tdate年月日" => Some(Self::TaskDateKanji),
            _ => None,
        }
    }

    /// The placeholder as written in a template, colons included.
    pub fn token(self) -> &'static str {
        match self {
            Self::ProjectAbbreviation => ":pabb:",
            Self::ProjectName => ":pname:",
            Self::TaskName => ":tname:",
            Self::TaskDate => ":tdate:",
            Self::TaskDateHyphenated => ":tdate-:",
            Self::TaskDateKanji => ":tdate年月日:",
        }
    }

    /// Whether the value differs between tasks of the same project.
    pub fn is_task_specific(self) -> bool {
        !matches!(self, Self::ProjectAbbreviation | Self::ProjectName)
    }

    fn render(self, project: &ProjectIdentity, task: &TaskIdentity) -> String {
        match self {
            Self::ProjectAbbreviation => project.abbreviation.clone(),
            Self::ProjectName => project.display_name.clone(),
            Self::TaskName => task.display_name.clone(),
            Self::TaskDate => task.date.map(date::compact).unwrap_or_default(),
            Self::TaskDateHyphenated => task.date.map(date::hyphenated).unwrap_or_default(),
            Self::TaskDateKanji => task.date.map(date::kanji).unwrap_or_default(),
        }
    }
}

impl fmt::Display for Placeholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// A validated, non-empty link-name template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkTemplate {
    raw: String,
}

impl LinkTemplate {
    pub fn parse(raw: &str) -> Result<Self, TemplateError> {
        if raw.is_empty() {
            return Err(TemplateError::Empty);
        }
        Ok(Self {
            raw: raw.to_string(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Recognized placeholders in order of appearance, duplicates included.
    pub fn placeholders(&self) -> Vec<Placeholder> {
        PLACEHOLDER_RE
            .captures_iter(&self.raw)
            .filter_map(|caps| Placeholder::from_key(&caps[1]))
            .collect()
    }

    /// True when at least one placeholder varies per task.
    ///
    /// Without one, every task of a project maps to the same link name and
    /// only the last one survives a refresh.
    pub fn distinguishes_tasks(&self) -> bool {
        self.placeholders().iter().any(|p| p.is_task_specific())
    }

    /// Render the link base name (no directory, no extension).
    pub fn render(&self, project: &ProjectIdentity, task: &TaskIdentity) -> String {
        format_link_name(&self.raw, project, task)
    }
}

impl fmt::Display for LinkTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Substitute every recognized placeholder in `template`.
pub fn format_link_name(template: &str, project: &ProjectIdentity, task: &TaskIdentity) -> String {
    PLACEHOLDER_RE
        .replace_all(template, |caps: &Captures| match Placeholder::from_key(&caps[1]) {
            Some(p) => p.render(project, task),
            None => caps[0].to_string(),
        })
        .into_owned()
}
