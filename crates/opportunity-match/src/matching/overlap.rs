use std::collections::HashSet;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

/// Members of the first collection that also appear in the second, in first-collection order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Overlap<T> {
    pub members: Vec<T>,
    pub count: usize,
}

impl<T> Overlap<T> {
    fn from_members(members: Vec<T>) -> Self {
        let count = members.len();
        Self { members, count }
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

/// Canonical comparison form for skill labels.
pub fn normalize_label(label: &str) -> String {
    label.trim().to_lowercase()
}

/// Number of distinct, non-blank labels once normalized.
pub fn distinct_label_count(labels: &[String]) -> usize {
    labels
        .iter()
        .map(|label| normalize_label(label))
        .filter(|label| !label.is_empty())
        .collect::<HashSet<_>>()
        .len()
}

pub fn distinct_tag_count(tags: &[u8]) -> usize {
    tags.iter().collect::<HashSet<_>>().len()
}

/// Labels from `source` whose normalized form is present in `target`.
///
/// The original spelling from `source` is kept. Blank labels never match, and a label that
/// repeats in `source` (after normalization) is reported once.
pub fn overlap_labels(source: &[String], target: &[String]) -> Overlap<String> {
    let wanted: HashSet<String> = target
        .iter()
        .map(|label| normalize_label(label))
        .filter(|label| !label.is_empty())
        .collect();

    let mut seen = HashSet::new();
    let members = source
        .iter()
        .filter(|label| {
            let normalized = normalize_label(label);
            wanted.contains(&normalized) && seen.insert(normalized)
        })
        .cloned()
        .collect();

    Overlap::from_members(members)
}

/// Tags from `source` present in `target`, compared by exact value.
pub fn overlap_tags(source: &[u8], target: &[u8]) -> Overlap<u8> {
    Overlap::from_members(overlap_exact(source, target))
}

fn overlap_exact<T>(source: &[T], target: &[T]) -> Vec<T>
where
    T: Copy + Eq + Hash,
{
    let wanted: HashSet<T> = target.iter().copied().collect();
    let mut seen = HashSet::new();
    source
        .iter()
        .copied()
        .filter(|item| wanted.contains(item) && seen.insert(*item))
        .collect()
}
