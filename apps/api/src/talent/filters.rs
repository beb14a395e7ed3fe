//! Filter Resolver: the distinct dropdown values for the candidate filters.

use std::collections::HashSet;

use serde::Serialize;

use crate::models::candidate::Candidate;
use crate::talent::query::role_matches;

/// Distinct option values in first-seen order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterOptions {
    /// Omitted when the options were narrowed by a role search.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roles: Option<Vec<String>>,
    pub skills: Vec<String>,
    pub institutions: Vec<String>,
}

pub fn resolve_filter_options(candidates: &[Candidate]) -> FilterOptions {
    FilterOptions {
        roles: Some(distinct(candidates.iter().map(|c| c.role.as_str()))),
        skills: distinct_skills(candidates.iter()),
        institutions: distinct_institutions(candidates.iter()),
    }
}

/// Skill and institution options limited to candidates whose role contains
/// `role` (case-insensitive). Roles are not returned.
pub fn resolve_for_role(candidates: &[Candidate], role: &str) -> FilterOptions {
    let matching = move || candidates.iter().filter(move |c| role_matches(&c.role, role));
    FilterOptions {
        roles: None,
        skills: distinct_skills(matching()),
        institutions: distinct_institutions(matching()),
    }
}

fn distinct_skills<'a>(candidates: impl Iterator<Item = &'a Candidate>) -> Vec<String> {
    distinct(candidates.flat_map(|c| c.skills.iter().map(String::as_str)))
}

fn distinct_institutions<'a>(candidates: impl Iterator<Item = &'a Candidate>) -> Vec<String> {
    distinct(candidates.flat_map(|c| c.education.iter().map(|e| e.institution_name.as_str())))
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .filter(|v| seen.insert(*v))
        .map(str::to_string)
        .collect()
}
