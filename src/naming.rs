//! Folder-name parsing for projects and tasks.
//!
//! Both kinds of folder follow the same loose convention: a handful of
//! components separated by `_` or wrapped in parentheses, in whatever order
//! the operator found natural that day.
//!
//! ```text
//! ABC_新製品                 → abbreviation "ABC", name "新製品"
//! Project Foo_ABC            → abbreviation "ABC", name "Project Foo"
//! 営業部(SLS)                → abbreviation "SLS", name "営業部"
//! t_20230105_Design_Review   → task "Design_Review", dated 2023-01-05
//! t_FinalReview              → task "FinalReview", undated
//! ```
//!
//! ## Projects
//!
//! A component is *alnum-bearing* when it contains at least one ASCII letter
//! or digit. The last alnum-bearing component becomes the abbreviation, and
//! the first one seeds the display name. Components without any ASCII
//! alphanumerics (kanji labels, symbols) always take over the display name
//! and only fill the abbreviation when nothing else has.
//!
//! ## Tasks
//!
//! The `t_` prefix is stripped, date-shaped components are pulled out (last
//! one wins), and the remaining components are glued back together with `_`.

use crate::date::detect_date;
use chrono::NaiveDate;
use serde::Serialize;
use std::path::Path;

/// Prefix every task folder carries.
pub const TASK_PREFIX: &str = "t_";

const SEPARATORS: [char; 3] = ['_', '(', ')'];

/// Abbreviation and display name parsed from a project folder.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProjectIdentity {
    pub abbreviation: String,
    pub display_name: String,
}

/// Display name and optional date parsed from a task folder.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TaskIdentity {
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
}

/// Split a folder name into its non-empty components.
///
/// Separators are `_`, `(` and `)`. Runs of separators never produce empty
/// components, and order is preserved.
pub fn split_components(name: &str) -> Vec<&str> {
    name.split(SEPARATORS).filter(|c| !c.is_empty()).collect()
}

fn is_alnum_bearing(component: &str) -> bool {
    component.chars().any(|c| c.is_ascii_alphanumeric())
}

/// Pick the abbreviation and display name out of project name components.
pub fn parse_project_name(components: &[&str]) -> ProjectIdentity {
    let mut identity = ProjectIdentity::default();
    for &c in components {
        if is_alnum_bearing(c) {
            identity.abbreviation = c.to_string();
            if identity.display_name.is_empty() {
                identity.display_name = c.to_string();
            }
        } else {
            if identity.abbreviation.is_empty() {
                identity.abbreviation = c.to_string();
            }
            identity.display_name = c.to_string();
        }
    }
    identity
}

/// Parse a task folder's base name, with or without its `t_` prefix.
pub fn parse_task_name(base: &str) -> TaskIdentity {
    let rest = base.strip_prefix(TASK_PREFIX).unwrap_or(base);

    let mut identity = TaskIdentity::default();
    for c in split_components(rest) {
        match detect_date(c) {
            Some(date) => identity.date = Some(date),
            None => {
                if !identity.display_name.is_empty() {
                    identity.display_name.push('_');
                }
                identity.display_name.push_str(c);
            }
        }
    }
    identity
}

/// Parse the project identity from a project folder path.
pub fn parse_project_identity(path: &Path) -> ProjectIdentity {
    let base = base_name(path);
    parse_project_name(&split_components(&base))
}

/// Parse the task identity from a task folder path.
pub fn parse_task_identity(path: &Path) -> TaskIdentity {
    parse_task_name(&base_name(path))
}

fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn ymd(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, d)
    }

    // =========================================================================
    // split_components
    // =========================================================================

    #[test]
    fn split_on_underscores() {
        assert_eq!(split_components("a_b_c"), vec!["a", "b", "c"]);
    }

    #[test]
    fn split_on_parentheses() {
        assert_eq!(split_components("営業部(SLS)"), vec!["営業部", "SLS"]);
    }

    #[test]
    fn split_drops_empty_components() {
        assert_eq!(split_components("__a__(b)_"), vec!["a", "b"]);
        assert!(split_components("").is_empty());
        assert!(split_components("_()_").is_empty());
    }

    #[test]
    fn split_keeps_spaces_and_hyphens() {
        assert_eq!(
            split_components("Project Foo_2023-01-05"),
            vec!["Project Foo", "2023-01-05"]
        );
    }

    #[test]
    fn split_never_yields_empty_and_preserves_order() {
        for name in ["x", "_x", "x_", "(x)(y)", "a__b((c))d", "ü_ö_(ä)"] {
            let parts = split_components(name);
            assert!(parts.iter().all(|p| !p.is_empty()), "{name}: {parts:?}");
            let expected: Vec<&str> = name
                .split(|c: char| c == '_' || c == '(' || c == ')')
                .filter(|s| !s.is_empty())
                .collect();
            assert_eq!(parts, expected);
        }
    }

    // =========================================================================
    // parse_project_name
    // =========================================================================

    #[test]
    fn project_code_then_label() {
        let p = parse_project_name(&["ABC", "Project Foo"]);
        assert_eq!(p.abbreviation, "Project Foo");
        assert_eq!(p.display_name, "ABC");
    }

    #[test]
    fn project_label_then_code_both_alnum() {
        let p = parse_project_name(&["Project Foo", "ABC"]);
        assert_eq!(p.abbreviation, "ABC");
        assert_eq!(p.display_name, "Project Foo");
    }

    #[test]
    fn project_code_then_non_alnum_label() {
        let p = parse_project_name(&["ABC", "新製品"]);
        assert_eq!(p.abbreviation, "ABC");
        assert_eq!(p.display_name, "新製品");
    }

    #[test]
    fn project_label_then_code() {
        let p = parse_project_name(&["新製品", "ABC"]);
        assert_eq!(p.abbreviation, "ABC");
        assert_eq!(p.display_name, "新製品");
    }

    #[test]
    fn project_single_alnum_component() {
        let p = parse_project_name(&["ABC"]);
        assert_eq!(p.abbreviation, "ABC");
        assert_eq!(p.display_name, "ABC");
    }

    #[test]
    fn project_single_non_alnum_component() {
        let p = parse_project_name(&["営業部"]);
        assert_eq!(p.abbreviation, "営業部");
        assert_eq!(p.display_name, "営業部");
    }

    #[test]
    fn project_later_non_alnum_overrides_display_name() {
        let p = parse_project_name(&["ABC", "営業部", "新製品"]);
        assert_eq!(p.abbreviation, "ABC");
        assert_eq!(p.display_name, "新製品");
    }

    #[test]
    fn project_last_alnum_wins_abbreviation() {
        let p = parse_project_name(&["ABC", "DEF"]);
        assert_eq!(p.abbreviation, "DEF");
        assert_eq!(p.display_name, "ABC");
    }

    #[test]
    fn project_empty_components() {
        assert_eq!(parse_project_name(&[]), ProjectIdentity::default());
    }

    #[test]
    fn project_identity_from_path() {
        let p = parse_project_identity(&PathBuf::from("/work/営業部(SLS)"));
        assert_eq!(p.abbreviation, "SLS");
        assert_eq!(p.display_name, "営業部");
    }

    // =========================================================================
    // parse_task_name
    // =========================================================================

    #[test]
    fn task_with_leading_date() {
        let t = parse_task_name("t_20230105_Design_Review");
        assert_eq!(t.display_name, "Design_Review");
        assert_eq!(t.date, ymd(2023, 1, 5));
    }

    #[test]
    fn task_without_date() {
        let t = parse_task_name("t_FinalReview");
        assert_eq!(t.display_name, "FinalReview");
        assert_eq!(t.date, None);
    }

    #[test]
    fn task_date_in_the_middle() {
        let t = parse_task_name("t_Design_2023-01-05_Review");
        assert_eq!(t.display_name, "Design_Review");
        assert_eq!(t.date, ymd(2023, 1, 5));
    }

    #[test]
    fn task_last_date_wins() {
        let t = parse_task_name("t_20230105_Review_20240210");
        assert_eq!(t.display_name, "Review");
        assert_eq!(t.date, ymd(2024, 2, 10));
    }

    #[test]
    fn task_parentheses_rejoined_with_underscore() {
        let t = parse_task_name("t_見積(A社)");
        assert_eq!(t.display_name, "見積_A社");
    }

    #[test]
    fn task_without_prefix_is_parsed_as_is() {
        let t = parse_task_name("230105_Kickoff");
        assert_eq!(t.display_name, "Kickoff");
        assert_eq!(t.date, ymd(2023, 1, 5));
    }

    #[test]
    fn task_prefix_is_case_sensitive() {
        let t = parse_task_name("T_Kickoff");
        assert_eq!(t.display_name, "T_Kickoff");
    }

    #[test]
    fn task_date_only() {
        let t = parse_task_name("t_2023-01-05");
        assert_eq!(t.display_name, "");
        assert_eq!(t.date, ymd(2023, 1, 5));
    }

    #[test]
    fn task_out_of_range_date_rolls_over() {
        let t = parse_task_name("t_20231399_Audit");
        assert_eq!(t.display_name, "Audit");
        assert_eq!(t.date, ymd(2024, 4, 8));
    }

    #[test]
    fn task_digit_run_inside_word_is_taken_as_date() {
        let t = parse_task_name("t_Ticket123456_Fix");
        assert_eq!(t.display_name, "Fix");
        assert_eq!(t.date, ymd(2014, 11, 25));
    }

    #[test]
    fn task_identity_from_path() {
        let t = parse_task_identity(&PathBuf::from("/work/ABC/t_20230105_Design_Review"));
        assert_eq!(t.display_name, "Design_Review");
        assert_eq!(t.date, ymd(2023, 1, 5));
    }

    #[test]
    fn parsing_is_repeatable() {
        let a = parse_task_name("t_20230105_Design_Review");
        let b = parse_task_name("t_20230105_Design_Review");
        assert_eq!(a, b);
    }
}
