//! The rule engine: an ordered label → conditions mapping evaluated against
//! a pull request snapshot.

use indexmap::IndexMap;
use regex::Regex;
use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::labels::{add_label, remove_label};
use crate::snapshot::PrSnapshot;

/// Conditions gating a single label. Absent fields do not constrain; a rule
/// with no fields set always matches and adds its label unconditionally.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Rule {
    pub draft: Option<bool>,
    pub changes_requested: Option<bool>,
    pub approved: Option<bool>,
    /// Regex matched against the PR title. Empty means unset.
    #[serde(default)]
    pub title: String,
    /// Regex matched against the head branch name. Empty means unset.
    #[serde(default)]
    pub branch_name: String,
}

impl Rule {
    /// Check the conditions in a fixed order, short-circuiting on the first
    /// mismatch. Regex patterns are only compiled once the boolean
    /// conditions have passed, and a malformed pattern is an error naming
    /// the offending field.
    fn matches(&self, label: &str, state: &PrSnapshot) -> Result<bool> {
        if let Some(approved) = self.approved {
            if approved != state.approved {
                return Ok(false);
            }
        }

        if let Some(changes_requested) = self.changes_requested {
            if changes_requested != state.changes_requested {
                return Ok(false);
            }
        }

        if let Some(draft) = self.draft {
            if draft != state.draft {
                return Ok(false);
            }
        }

        if !self.title.is_empty() && !pattern_matches(label, "title", &self.title, &state.title)? {
            return Ok(false);
        }

        if !self.branch_name.is_empty()
            && !pattern_matches(label, "branch_name", &self.branch_name, &state.branch_name)?
        {
            return Ok(false);
        }

        Ok(true)
    }
}

fn pattern_matches(label: &str, field: &str, pattern: &str, text: &str) -> Result<bool> {
    let re = Regex::new(pattern).map_err(|e| {
        AppError::Rules(format!("invalid {field} pattern for label {label:?}: {e}"))
    })?;
    Ok(re.is_match(text))
}

/// Ordered label → rule mapping, as written in the repository's rules file.
/// Document order is preserved and determines the order newly added labels
/// are appended in.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct RuleSet(IndexMap<String, Rule>);

impl RuleSet {
    /// Parse the raw YAML rules document.
    pub fn parse(raw: &[u8]) -> Result<Self> {
        serde_yaml::from_slice(raw)
            .map_err(|e| AppError::Config(format!("unparsable rules file: {e}")))
    }

    /// Derive the desired label list for `state`.
    ///
    /// Every rule is evaluated against the same snapshot; rules never see
    /// each other's output. A matching rule adds its label, a non-matching
    /// one removes it. Pre-existing labels keep their relative order and
    /// additions are appended in rule order. Any malformed regex fails the
    /// whole evaluation; no partial list is returned.
    pub fn evaluate(&self, state: &PrSnapshot) -> Result<Vec<String>> {
        let mut labels = state.labels.clone();
        for (label, rule) in &self.0 {
            if rule.matches(label, state)? {
                add_label(&mut labels, label);
            } else {
                remove_label(&mut labels, label);
            }
        }
        Ok(labels)
    }
}
