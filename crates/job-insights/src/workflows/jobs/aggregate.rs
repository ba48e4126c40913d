use super::domain::{JobAttribute, JobRecord};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Listing count per group key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct GroupCounts {
    counts: BTreeMap<String, usize>,
}

impl GroupCounts {
    pub fn get(&self, key: &str) -> Option<usize> {
        self.counts.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.counts.iter().map(|(key, count)| (key.as_str(), *count))
    }

    /// Chart order: count descending, then key ascending.
    pub fn ordered(&self) -> Vec<GroupCountEntry> {
        let mut entries: Vec<GroupCountEntry> = self
            .iter()
            .map(|(key, count)| GroupCountEntry {
                key: key.to_string(),
                count,
            })
            .collect();
        entries.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.key.cmp(&b.key)));
        entries
    }
}

impl FromIterator<(String, usize)> for GroupCounts {
    fn from_iter<I: IntoIterator<Item = (String, usize)>>(iter: I) -> Self {
        let mut counts = BTreeMap::new();
        for (key, count) in iter {
            *counts.entry(key).or_insert(0) += count;
        }
        Self { counts }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupCountEntry {
    pub key: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupShareEntry {
    pub key: String,
    pub count: usize,
    pub share: f64,
}

/// Per-key shares of a [`GroupCounts`] table.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct GroupShares {
    shares: BTreeMap<String, f64>,
}

impl GroupShares {
    pub fn get(&self, key: &str) -> Option<f64> {
        self.shares.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.shares.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shares.is_empty()
    }

    pub fn sum(&self) -> f64 {
        self.shares.values().sum()
    }

    /// Shares laid out in the chart order of `groups`.
    pub fn ordered(&self, groups: &GroupCounts) -> Vec<GroupShareEntry> {
        groups
            .ordered()
            .into_iter()
            .map(|entry| GroupShareEntry {
                share: self.get(&entry.key).unwrap_or(0.0),
                key: entry.key,
                count: entry.count,
            })
            .collect()
    }
}

pub(crate) fn aggregate_by_key(records: &[JobRecord], attribute: JobAttribute) -> GroupCounts {
    records
        .iter()
        .map(|record| (record.group_key(attribute).to_string(), 1))
        .collect()
}

pub(crate) fn compute_group_share(groups: &GroupCounts) -> GroupShares {
    let total = groups.total();
    let shares = groups
        .iter()
        .map(|(key, count)| {
            let share = if total == 0 {
                0.0
            } else {
                count as f64 / total as f64
            };
            (key.to_string(), share)
        })
        .collect();

    GroupShares { shares }
}

/// Group keys hidden from a chart by clicking its legend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupExclusions {
    keys: BTreeSet<String>,
}

impl GroupExclusions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hides `key` if shown, shows it if hidden. Returns whether it is now hidden.
    pub fn toggle(&mut self, key: &str) -> bool {
        if self.keys.remove(key) {
            false
        } else {
            self.keys.insert(key.to_string());
            true
        }
    }

    pub fn is_excluded(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(String::as_str)
    }

    pub fn visible(&self, ordered: &[GroupCountEntry]) -> Vec<GroupCountEntry> {
        ordered
            .iter()
            .filter(|entry| !self.is_excluded(&entry.key))
            .cloned()
            .collect()
    }
}

impl<S: Into<String>> FromIterator<S> for GroupExclusions {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            keys: iter.into_iter().map(Into::into).collect(),
        }
    }
}
