//! # taskol
//!
//! Keeps a flat directory of shortcuts to every in-progress task folder.
//!
//! Work lives in project folders, and each project holds task folders
//! prefixed `t_`. Digging through that tree every morning gets old, so
//! taskol maintains a separate link directory with one shortcut per task,
//! named from the project and task folder names:
//!
//! ```text
//! work/                                  links/
//! ├── ABC_新製品/                         ├── 20230105_ABC_Design_Review.lnk
//! │   ├── t_20230105_Design_Review/  ──▶  ├── _ABC_FinalReview.lnk
//! │   └── t_FinalReview/                  └── 20240210_SLS_見積_A社.lnk
//! └── 営業部(SLS)/
//!     └── t_2024-02-10_見積(A社)/
//! ```
//!
//! Every run deletes the old shortcuts and creates them again, so renamed,
//! finished, or ignored tasks drop out without any bookkeeping.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`naming`] | Folder-name tokenizing plus project and task identity parsing |
//! | [`date`] | Date detection inside task names and date rendering |
//! | [`template`] | Link name templates (`:tdate:_:pabb:_:tname:`) |
//! | [`scan`] | Project, task, and link-file enumeration with ignore prefixes |
//! | [`links`] | [`links::Linker`] trait and the symlink implementation |
//! | [`refresh`] | The plan → apply pipeline |
//! | [`config`] | Layered `taskol.toml` loading and validation |
//! | [`logging`] | tracing subscriber setup |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Parsing Never Fails
//!
//! Folder names are whatever the operator typed. The parsers always return
//! a best-effort identity: no date means an undated task, no ASCII code means
//! the label doubles as the abbreviation. Only configuration problems stop a
//! run, and they stop it before anything is deleted.
//!
//! ## Plan Before Apply
//!
//! The refresh is split into a read-only plan and a best-effort apply. The
//! plan is what `taskol plan` prints (or serializes with `--json`), so the
//! naming rules can be checked against a real tree without touching it.

pub mod config;
pub mod date;
pub mod links;
pub mod logging;
pub mod naming;
pub mod output;
pub mod refresh;
pub mod scan;
pub mod template;

#[cfg(test)]
pub(crate) mod test_helpers;
