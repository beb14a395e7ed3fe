//! Candidate query predicates.
//!
//! Role matching is a case-insensitive substring test, so `engineer` matches
//! both "Software Engineer" and "Engineering Manager". Skill and institution
//! matching are exact, surrounding whitespace included. Predicates compose
//! with AND; a missing or blank predicate imposes no constraint.

use serde::Deserialize;

use crate::models::candidate::Candidate;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CandidateFilter {
    pub role: Option<String>,
    pub skill: Option<String>,
    pub institution: Option<String>,
}

impl CandidateFilter {
    pub fn role(&self) -> Option<&str> {
        non_blank(self.role.as_deref())
    }

    pub fn skill(&self) -> Option<&str> {
        non_blank(self.skill.as_deref())
    }

    pub fn institution(&self) -> Option<&str> {
        non_blank(self.institution.as_deref())
    }

    pub fn is_empty(&self) -> bool {
        self.role().is_none() && self.skill().is_none() && self.institution().is_none()
    }

    pub fn matches(&self, candidate: &Candidate) -> bool {
        if let Some(role) = self.role() {
            if !role_matches(&candidate.role, role) {
                return false;
            }
        }
        if let Some(skill) = self.skill() {
            if !candidate.skills.iter().any(|s| s == skill) {
                return false;
            }
        }
        if let Some(institution) = self.institution() {
            if !candidate
                .education
                .iter()
                .any(|e| e.institution_name == institution)
            {
                return false;
            }
        }
        true
    }

    /// Keeps matching candidates in their original order.
    pub fn apply(&self, candidates: Vec<Candidate>) -> Vec<Candidate> {
        if self.is_empty() {
            return candidates;
        }
        candidates.into_iter().filter(|c| self.matches(c)).collect()
    }
}

/// Case-insensitive substring match of `needle` within `role`.
pub fn role_matches(role: &str, needle: &str) -> bool {
    role.to_lowercase().contains(&needle.trim().to_lowercase())
}

/// Blank values count as absent; anything else is returned untouched.
fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
