//! One-pass rule tables without matching logic of their own.

use std::collections::HashMap;

use crate::node::RuleNode;

/// EU4 name → Victoria 2 name, read from `link = { eu4 = .. v2 = .. }` blocks.
///
/// Used for religions and governments. A block may list several `eu4`
/// names. When the same EU4 name appears in more than one block, the first
/// block wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameMapping {
    links: HashMap<String, String>,
}

impl NameMapping {
    pub fn build<N: RuleNode>(root: &N) -> Self {
        let mut links = HashMap::new();
        for link in root.leaves() {
            let mut destination = String::new();
            let mut sources = Vec::new();
            for item in link.leaves() {
                match item.key().as_ref() {
                    "v2" => destination = item.leaf().into_owned(),
                    "eu4" => sources.push(item.leaf().into_owned()),
                    _ => {}
                }
            }
            for source in sources {
                links.entry(source).or_insert_with(|| destination.clone());
            }
        }
        Self { links }
    }

    pub fn get(&self, eu4_name: &str) -> Option<&str> {
        self.links.get(eu4_name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

/// A culture/religion pairing whose pops count as minorities.
///
/// An empty field is a wildcard: `{ religion = jewish }` marks every
/// jewish pop regardless of culture.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MinorityPop {
    pub culture: String,
    pub religion: String,
}

impl MinorityPop {
    pub fn applies_to(&self, culture: &str, religion: &str) -> bool {
        (self.culture.is_empty() || self.culture == culture)
            && (self.religion.is_empty() || self.religion == religion)
    }
}

pub fn build_minority_pops<N: RuleNode>(root: &N) -> Vec<MinorityPop> {
    root.leaves()
        .into_iter()
        .map(|block| {
            let mut pop = MinorityPop::default();
            for item in block.leaves() {
                match item.key().as_ref() {
                    "culture" => pop.culture = item.leaf().into_owned(),
                    "religion" => pop.religion = item.leaf().into_owned(),
                    _ => {}
                }
            }
            pop
        })
        .collect()
}

/// A culture whose union nation is `tag`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CulturalUnion {
    pub culture: String,
    pub tag: String,
}

pub fn build_cultural_unions<N: RuleNode>(root: &N) -> Vec<CulturalUnion> {
    root.leaves()
        .into_iter()
        .map(|block| {
            let mut union = CulturalUnion::default();
            for item in block.leaves() {
                match item.key().as_ref() {
                    "culture" => union.culture = item.leaf().into_owned(),
                    "tag" => union.tag = item.leaf().into_owned(),
                    _ => {}
                }
            }
            union
        })
        .collect()
}
