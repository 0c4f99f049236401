//! Culture rules: EU4 culture → Victoria 2 culture.
//!
//! A rule file is a list of `link` blocks:
//!
//! ```text
//! link = { v2 = north_german eu4 = prussian eu4 = pommeranian owner = PRU }
//! link = { v2 = north_german eu4 = prussian region = north_german_region }
//! link = { v2 = south_german eu4 = prussian }
//! ```
//!
//! Every `eu4` entry becomes its own [`CultureRule`]. `owner`, `religion`,
//! `region` and `provinceid` entries are [`Distinguisher`]s that must all hold
//! for the rule to apply. Rules are tried in file order and the first match
//! wins, so catch-all rules go last.

use crate::ProvinceId;
use crate::diagnostics::{Diagnostics, MapperWarning};
use crate::node::RuleNode;
use crate::regions::RegionIndex;

/// A condition narrowing when a culture rule applies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Distinguisher {
    /// Province owner tag must equal this.
    Owner(String),
    /// Province religion must equal this.
    Religion(String),
    /// Province must belong to this region or area.
    Region(String),
    /// Province id must equal this.
    ProvinceId(ProvinceId),
    /// A condition that could not be read. Never satisfied.
    Unrecognized { kind: String, value: String },
}

impl Distinguisher {
    /// Reads a distinguisher from one `key = value` entry of a rule block.
    /// Returns `None` for keys that are not distinguishers.
    pub fn from_entry(key: &str, value: &str, diagnostics: &mut dyn Diagnostics) -> Option<Self> {
        let distinguisher = match key {
            "owner" => Distinguisher::Owner(value.to_string()),
            "religion" => Distinguisher::Religion(value.to_string()),
            "region" => Distinguisher::Region(value.to_string()),
            "provinceid" => match value.trim().parse::<ProvinceId>() {
                Ok(id) => Distinguisher::ProvinceId(id),
                Err(_) => {
                    diagnostics.warn(MapperWarning::InvalidProvinceId {
                        context: "culture rule provinceid".to_string(),
                        value: value.to_string(),
                    });
                    Distinguisher::Unrecognized {
                        kind: key.to_string(),
                        value: value.to_string(),
                    }
                }
            },
            _ => return None,
        };
        Some(distinguisher)
    }

    pub fn matches(
        &self,
        query: &CultureQuery<'_>,
        regions: &RegionIndex,
        diagnostics: &mut dyn Diagnostics,
    ) -> bool {
        match self {
            Distinguisher::Owner(tag) => query.owner == tag,
            Distinguisher::Religion(religion) => query.religion == religion,
            Distinguisher::Region(region) => regions.contains(query.province, region),
            Distinguisher::ProvinceId(id) => query.province == *id,
            Distinguisher::Unrecognized { kind, value } => {
                diagnostics.warn(MapperWarning::UnrecognizedDistinguisher {
                    kind: kind.clone(),
                    value: value.clone(),
                });
                false
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CultureRule {
    pub source: String,
    pub destination: String,
    pub distinguishers: Vec<Distinguisher>,
}

impl CultureRule {
    /// True when every distinguisher holds. A rule without distinguishers
    /// matches any province of its source culture.
    pub fn applies_to(
        &self,
        query: &CultureQuery<'_>,
        regions: &RegionIndex,
        diagnostics: &mut dyn Diagnostics,
    ) -> bool {
        for distinguisher in &self.distinguishers {
            if !distinguisher.matches(query, regions, diagnostics) {
                return false;
            }
        }
        true
    }
}

/// The facts about one EU4 province that culture rules look at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CultureQuery<'a> {
    pub culture: &'a str,
    pub religion: &'a str,
    pub province: ProvinceId,
    pub owner: &'a str,
}

/// Ordered culture rules. Order is match priority.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CultureMapping {
    rules: Vec<CultureRule>,
}

impl CultureMapping {
    pub fn build<N: RuleNode>(root: &N, diagnostics: &mut dyn Diagnostics) -> Self {
        let mut rules = Vec::new();

        for link in root.leaves() {
            let mut sources = Vec::new();
            let mut destination = String::new();
            let mut distinguishers = Vec::new();

            for item in link.leaves() {
                let key = item.key();
                match key.as_ref() {
                    "v2" => destination = item.leaf().into_owned(),
                    "eu4" => sources.push(item.leaf().into_owned()),
                    other => {
                        if let Some(d) = Distinguisher::from_entry(other, &item.leaf(), diagnostics)
                        {
                            distinguishers.push(d);
                        }
                    }
                }
            }

            for source in sources {
                rules.push(CultureRule {
                    source,
                    destination: destination.clone(),
                    distinguishers: distinguishers.clone(),
                });
            }
        }

        log::debug!("Built {} culture rules", rules.len());
        Self { rules }
    }

    /// Finds the Victoria 2 culture for a province.
    ///
    /// Rules for other source cultures are skipped. Of the rest, the first
    /// whose distinguishers all hold decides; a rule that fails does not stop
    /// the search. `None` means no rule applies and the caller picks a
    /// fallback.
    pub fn resolve(
        &self,
        query: &CultureQuery<'_>,
        regions: &RegionIndex,
        diagnostics: &mut dyn Diagnostics,
    ) -> Option<&str> {
        for rule in &self.rules {
            if rule.source != query.culture {
                continue;
            }
            if rule.applies_to(query, regions, diagnostics) {
                return Some(rule.destination.as_str());
            }
        }
        None
    }

    pub fn rules(&self) -> &[CultureRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// [`CultureMapping::resolve`] with the query spelled out.
pub fn culture_match<'m>(
    mapping: &'m CultureMapping,
    regions: &RegionIndex,
    culture: &str,
    religion: &str,
    province: ProvinceId,
    owner: &str,
    diagnostics: &mut dyn Diagnostics,
) -> Option<&'m str> {
    let query = CultureQuery {
        culture,
        religion,
        province,
        owner,
    };
    mapping.resolve(&query, regions, diagnostics)
}
