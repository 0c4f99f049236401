//! Culture groups for cultural unions, read from EU4's `common/cultures`.
//!
//! The file structure is `group = { culture = { ... } ... }`. Group-level
//! keys describing names and graphics are not cultures and are skipped.

use std::collections::HashMap;

use crate::node::RuleNode;

/// Group-level keys that are not member cultures.
const DESCRIPTIVE_KEYS: &[&str] = &[
    "dynasty_names",
    "graphical_culture",
    "second_graphical_culture",
    "male_names",
    "female_names",
];

/// Culture group → member cultures, with the inverse culture → group index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnionCultures {
    groups: HashMap<String, Vec<String>>,
    group_of: HashMap<String, String>,
}

impl UnionCultures {
    pub fn build<N: RuleNode>(root: &N) -> Self {
        let mut cultures = Self::default();
        cultures.extend_from(root);
        cultures
    }

    /// Adds the groups of another culture file. Members of a group that was
    /// already seen are appended to it. A culture keeps the first group it
    /// was registered under.
    pub fn extend_from<N: RuleNode>(&mut self, root: &N) {
        for group in root.leaves() {
            let group_name = group.key().into_owned();
            let members = self.groups.entry(group_name.clone()).or_default();
            for item in group.leaves() {
                let culture = item.key();
                if DESCRIPTIVE_KEYS.contains(&culture.as_ref()) {
                    continue;
                }
                members.push(culture.to_string());
                self.group_of
                    .entry(culture.into_owned())
                    .or_insert_with(|| group_name.clone());
            }
        }
    }

    /// Member cultures of a group, in definition order.
    pub fn cultures_in(&self, group: &str) -> &[String] {
        self.groups.get(group).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn group_of(&self, culture: &str) -> Option<&str> {
        self.group_of.get(culture).map(String::as_str)
    }

    pub fn groups(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.groups
            .iter()
            .map(|(name, members)| (name.as_str(), members.as_slice()))
    }

    /// Number of groups.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}
