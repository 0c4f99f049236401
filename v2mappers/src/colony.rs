//! Colonial rules: which EU4 colonial nations become which Victoria 2
//! countries, and the flag names available per colonial region.
//!
//! The file holds two top-level sections, rules first and flags second:
//!
//! ```text
//! colonial_rules = {
//!     link = { tag = USA EU4_region = colonial_eastern_america V2_region = usa_region }
//! }
//! colonial_flags = {
//!     colonial_eastern_america = {
//!         flag = { name = "New England" unique = yes }
//!     }
//! }
//! ```

use std::collections::HashMap;

use crate::error::MapperError;
use crate::naming::flag_key;
use crate::node::RuleNode;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColonyRule {
    pub tag: String,
    pub eu4_region: String,
    pub v2_region: String,
    pub culture_group: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColonyFlag {
    pub region: String,
    /// Display name, lowercased.
    pub name: String,
    /// At most one nation may use this flag.
    pub unique: bool,
    /// Tag of the nation that took this flag; empty until assigned.
    pub overlord: String,
}

/// Colonial flags keyed by [`flag_key`] of their name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColonyFlagset {
    flags: HashMap<String, ColonyFlag>,
}

impl ColonyFlagset {
    pub fn build<N: RuleNode>(root: &N) -> Result<Self, MapperError> {
        let (_, flag_section) = sections(root)?;
        let mut flags = HashMap::new();
        for region in flag_section.leaves() {
            let region_name = region.key();
            for block in region.leaves() {
                let mut name = None;
                let mut unique = false;
                for item in block.leaves() {
                    match item.key().as_ref() {
                        "name" => name = Some(item.leaf().into_owned()),
                        "unique" => unique = item.leaf() != "no",
                        _ => {}
                    }
                }
                let Some(name) = name else {
                    log::debug!("Skipping unnamed colonial flag in {}", region_name);
                    continue;
                };
                flags.insert(
                    flag_key(&name),
                    ColonyFlag {
                        region: region_name.to_string(),
                        name: name.to_lowercase(),
                        unique,
                        overlord: String::new(),
                    },
                );
            }
        }
        Ok(Self { flags })
    }

    /// Looks a flag up by display name, in any case.
    pub fn get(&self, name: &str) -> Option<&ColonyFlag> {
        self.flags.get(&flag_key(name))
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut ColonyFlag> {
        self.flags.get_mut(&flag_key(name))
    }

    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ColonyFlag)> {
        self.flags.iter().map(|(key, flag)| (key.as_str(), flag))
    }
}

/// Reads the first section of a colonial rules file.
pub fn build_colony_rules<N: RuleNode>(root: &N) -> Result<Vec<ColonyRule>, MapperError> {
    let (rule_section, _) = sections(root)?;
    let rules = rule_section
        .leaves()
        .into_iter()
        .map(|link| {
            let mut rule = ColonyRule::default();
            for item in link.leaves() {
                match item.key().as_ref() {
                    "tag" => rule.tag = item.leaf().into_owned(),
                    "EU4_region" => rule.eu4_region = item.leaf().into_owned(),
                    "V2_region" => rule.v2_region = item.leaf().into_owned(),
                    "is_culture_group" => rule.culture_group = item.leaf().into_owned(),
                    _ => {}
                }
            }
            rule
        })
        .collect();
    Ok(rules)
}

/// The (rules, flags) sections of a colonial rules file.
fn sections<N: RuleNode>(root: &N) -> Result<(&N, &N), MapperError> {
    match root.leaves().as_slice() {
        [rules, flags, ..] => Ok((*rules, *flags)),
        other => Err(MapperError::MissingSection {
            expected: 2,
            found: other.len(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::rules;

    const COLONIAL: &str = r#"
        colonial_rules = {
            link = { tag = USA EU4_region = colonial_eastern_america V2_region = usa_region }
            link = { tag = MEX EU4_region = colonial_mexico is_culture_group = iberian }
        }
        colonial_flags = {
            colonial_eastern_america = {
                flag = { name = "New England" unique = yes }
                flag = { name = "Carolina" }
                flag = { unique = yes }
            }
            colonial_canada = {
                flag = { name = "Nouvelle-France" unique = no }
            }
        }
    "#;

    #[test]
    fn test_colony_rules() {
        let colonies = build_colony_rules(&rules(COLONIAL)).unwrap();
        assert_eq!(colonies.len(), 2);
        assert_eq!(
            colonies[0],
            ColonyRule {
                tag: "USA".to_string(),
                eu4_region: "colonial_eastern_america".to_string(),
                v2_region: "usa_region".to_string(),
                culture_group: String::new(),
            }
        );
        assert_eq!(colonies[1].culture_group, "iberian");
        assert_eq!(colonies[1].v2_region, "");
    }

    #[test]
    fn test_colony_flags() {
        let flags = ColonyFlagset::build(&rules(COLONIAL)).unwrap();
        assert_eq!(flags.len(), 3);

        let new_england = flags.get("NEW ENGLAND").unwrap();
        assert_eq!(new_england.name, "new england");
        assert_eq!(new_england.region, "colonial_eastern_america");
        assert!(new_england.unique);
        assert_eq!(new_england.overlord, "");

        assert!(!flags.get("carolina").unwrap().unique);
        assert!(!flags.get("nouvelle-france").unwrap().unique);
    }

    #[test]
    fn test_overlord_can_be_assigned() {
        let mut flags = ColonyFlagset::build(&rules(COLONIAL)).unwrap();
        flags.get_mut("Carolina").unwrap().overlord = "ENG".to_string();
        assert_eq!(flags.get("carolina").unwrap().overlord, "ENG");
    }

    #[test]
    fn test_missing_flag_section() {
        let root = rules("colonial_rules = { link = { tag = USA } }");
        assert!(matches!(
            build_colony_rules(&root),
            Err(MapperError::MissingSection { expected: 2, found: 1 })
        ));
        assert!(matches!(
            ColonyFlagset::build(&eu4txt::EU4TxtParseNode::list()),
            Err(MapperError::MissingSection { found: 0, .. })
        ));
    }
}
