//! Set-like transformations over label lists.
//!
//! Labels are kept as an ordered sequence (the order GitHub reports them in),
//! but treated as a set: removal drops every occurrence, addition never
//! duplicates. All transformations preserve the relative order of the labels
//! they keep and append new labels at the end.

/// Remove every occurrence of `removal`, preserving the order of the rest.
pub fn remove_label(labels: &mut Vec<String>, removal: &str) {
    labels.retain(|label| label != removal);
}

/// Append `addition` unless it is already present.
pub fn add_label(labels: &mut Vec<String>, addition: &str) {
    if !labels.iter().any(|label| label == addition) {
        labels.push(addition.to_string());
    }
}

/// A remove-then-add transformation: strip everything in `remove`, then append
/// each entry of `set` that is not already present.
#[derive(Debug, Clone, Default)]
pub struct Operations {
    pub remove: Vec<String>,
    pub set: Vec<String>,
}

impl Operations {
    /// Apply both phases to `labels`, returning the resulting list. Removal
    /// runs first, so a label named in both `remove` and `set` ends up
    /// present exactly once.
    pub fn apply(&self, labels: &[String]) -> Vec<String> {
        let mut result: Vec<String> = labels
            .iter()
            .filter(|label| !self.remove.iter().any(|r| r == *label))
            .cloned()
            .collect();

        for label in &self.set {
            add_label(&mut result, label);
        }

        result
    }
}
