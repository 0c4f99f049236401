//! Province → region/area membership.
//!
//! Two input layouts are supported:
//!
//! - legacy `region.txt`: `region_name = { 1 2 3 }`, provinces listed directly;
//! - current `area.txt` + `region.txt`: `area_name = { 1 2 3 }` and
//!   `region_name = { areas = { area_a area_b } }`.
//!
//! After a two-level build every province carries both its area names and
//! the names of every region that includes one of those areas.

use std::collections::{HashMap, HashSet};

use crate::ProvinceId;
use crate::diagnostics::{Diagnostics, MapperWarning};
use crate::node::RuleNode;

/// Maps province IDs to the set of region and area names they belong to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegionIndex {
    provinces: HashMap<ProvinceId, HashSet<String>>,
}

impl RegionIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an index from a legacy single-level `region.txt`.
    pub fn from_legacy<N: RuleNode>(regions: &N, diagnostics: &mut dyn Diagnostics) -> Self {
        let mut index = Self::new();
        index.rebuild_legacy(regions, diagnostics);
        index
    }

    /// Builds an index from `area.txt` and a two-level `region.txt`.
    pub fn from_areas<N: RuleNode>(
        regions: &N,
        areas: &N,
        diagnostics: &mut dyn Diagnostics,
    ) -> Self {
        let mut index = Self::new();
        index.rebuild(regions, areas, diagnostics);
        index
    }

    /// Replaces the contents of this index with a legacy `region.txt`.
    pub fn rebuild_legacy<N: RuleNode>(&mut self, regions: &N, diagnostics: &mut dyn Diagnostics) {
        self.provinces.clear();
        for region in regions.leaves() {
            let region_name = region.key();
            for province in province_ids(region, diagnostics) {
                self.insert(province, &region_name);
            }
        }
        log::debug!("Mapped {} provinces from legacy regions", self.provinces.len());
    }

    /// Replaces the contents of this index with `area.txt` + `region.txt`.
    ///
    /// Regions without an `areas` list contribute nothing. A region naming an
    /// area that `area.txt` does not define gets a
    /// [`MapperWarning::UndefinedArea`] and that reference is skipped.
    pub fn rebuild<N: RuleNode>(
        &mut self,
        regions: &N,
        areas: &N,
        diagnostics: &mut dyn Diagnostics,
    ) {
        self.provinces.clear();

        let mut area_provinces: HashMap<String, Vec<ProvinceId>> = HashMap::new();
        for area in areas.leaves() {
            let area_name = area.key().into_owned();
            let ids = province_ids(area, diagnostics);
            for &province in &ids {
                self.insert(province, &area_name);
            }
            // An area defined twice keeps the provinces of both definitions.
            area_provinces.entry(area_name).or_default().extend(ids);
        }

        for region in regions.leaves() {
            let region_name = region.key();
            let Some(members) = region.values("areas").first().copied() else {
                continue;
            };
            for area_name in members.tokens() {
                match area_provinces.get(&area_name) {
                    Some(ids) => {
                        for &province in ids {
                            self.insert(province, &region_name);
                        }
                    }
                    None => diagnostics.warn(MapperWarning::UndefinedArea {
                        region: region_name.to_string(),
                        area: area_name,
                    }),
                }
            }
        }

        log::debug!(
            "Mapped {} provinces from {} areas",
            self.provinces.len(),
            area_provinces.len()
        );
    }

    fn insert(&mut self, province: ProvinceId, name: &str) {
        let names = self.provinces.entry(province).or_default();
        if !names.contains(name) {
            names.insert(name.to_string());
        }
    }

    /// Region and area names for a province, if it belongs to any.
    pub fn names(&self, province: ProvinceId) -> Option<&HashSet<String>> {
        self.provinces.get(&province)
    }

    pub fn contains(&self, province: ProvinceId, name: &str) -> bool {
        self.provinces
            .get(&province)
            .is_some_and(|names| names.contains(name))
    }

    /// Number of provinces with at least one region or area.
    pub fn len(&self) -> usize {
        self.provinces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.provinces.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ProvinceId, &HashSet<String>)> {
        self.provinces.iter().map(|(&id, names)| (id, names))
    }
}

/// Province ids listed under a region or area. Tokens that are not ids are
/// reported and dropped.
fn province_ids<N: RuleNode>(node: &N, diagnostics: &mut dyn Diagnostics) -> Vec<ProvinceId> {
    let mut ids = Vec::new();
    for token in node.tokens() {
        match token.parse::<ProvinceId>() {
            Ok(id) => ids.push(id),
            Err(_) => diagnostics.warn(MapperWarning::InvalidProvinceId {
                context: node.key().into_owned(),
                value: token,
            }),
        }
    }
    ids
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::rules;
    use proptest::prelude::*;

    fn sorted(index: &RegionIndex, province: ProvinceId) -> Vec<String> {
        let mut names: Vec<String> = index
            .names(province)
            .map(|n| n.iter().cloned().collect())
            .unwrap_or_default();
        names.sort();
        names
    }

    #[test]
    fn test_two_level_closure() {
        let areas = rules("A1 = { 1 2 3 }\nA2 = { 4 }");
        let regions = rules("R1 = { areas = { A1 A2 } }");
        let mut warnings = Vec::new();

        let index = RegionIndex::from_areas(&regions, &areas, &mut warnings);

        assert_eq!(sorted(&index, 1), vec!["A1", "R1"]);
        assert_eq!(sorted(&index, 3), vec!["A1", "R1"]);
        assert_eq!(sorted(&index, 4), vec!["A2", "R1"]);
        assert!(index.names(99).is_none());
        assert!(!index.contains(99, "R1"));
        assert_eq!(index.len(), 4);
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_region_without_areas_contributes_nothing() {
        let areas = rules("A1 = { 1 }");
        let regions = rules(
            r#"
            R1 = { areas = { A1 } }
            random_new_world_region = { }
            monsoon_region = { monsoon = { 00.06.01 00.09.30 } }
            "#,
        );
        let mut warnings = Vec::new();
        let index = RegionIndex::from_areas(&regions, &areas, &mut warnings);
        assert_eq!(sorted(&index, 1), vec!["A1", "R1"]);
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_undefined_area_is_skipped_with_warning() {
        let areas = rules("A1 = { 1 2 }");
        let regions = rules("R1 = { areas = { missing_area A1 } }");
        let mut warnings = Vec::new();

        let index = RegionIndex::from_areas(&regions, &areas, &mut warnings);

        assert_eq!(
            warnings,
            vec![MapperWarning::UndefinedArea {
                region: "R1".to_string(),
                area: "missing_area".to_string(),
            }]
        );
        // The defined area after the bad reference is still applied.
        assert_eq!(sorted(&index, 2), vec!["A1", "R1"]);
    }

    #[test]
    fn test_area_color_block_is_not_a_province() {
        let areas = rules("finland_area = { color = { 10 20 30 } 27 28 }");
        let regions = rules("scandinavia_region = { areas = { finland_area } }");
        let mut warnings = Vec::new();
        let index = RegionIndex::from_areas(&regions, &areas, &mut warnings);
        assert_eq!(index.len(), 2);
        assert!(index.contains(27, "scandinavia_region"));
        assert!(index.names(10).is_none());
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_legacy_regions_overlap() {
        let regions = rules(
            r#"
            scandinavia = { 1 2 3 }
            baltic = { 3 4 }
            "#,
        );
        let mut warnings = Vec::new();
        let index = RegionIndex::from_legacy(&regions, &mut warnings);
        assert_eq!(sorted(&index, 1), vec!["scandinavia"]);
        assert_eq!(sorted(&index, 3), vec!["baltic", "scandinavia"]);
        assert_eq!(sorted(&index, 4), vec!["baltic"]);
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_legacy_bad_token_warns() {
        let regions = rules("scandinavia = { 1 two 3 }");
        let mut warnings = Vec::new();
        let index = RegionIndex::from_legacy(&regions, &mut warnings);
        assert_eq!(index.len(), 2);
        assert_eq!(
            warnings,
            vec![MapperWarning::InvalidProvinceId {
                context: "scandinavia".to_string(),
                value: "two".to_string(),
            }]
        );
    }

    #[test]
    fn test_rebuild_replaces_previous_contents() {
        let legacy = rules("old_region = { 50 51 }");
        let areas = rules("A1 = { 1 }");
        let regions = rules("R1 = { areas = { A1 } }");
        let mut warnings = Vec::new();

        let mut index = RegionIndex::from_legacy(&legacy, &mut warnings);
        index.rebuild(&regions, &areas, &mut warnings);

        assert!(index.names(50).is_none());
        assert_eq!(sorted(&index, 1), vec!["A1", "R1"]);
    }

    proptest! {
        #[test]
        fn prop_rebuild_is_idempotent(
            areas in proptest::collection::vec(proptest::collection::vec(1..40u32, 0..6), 1..6),
            picks in proptest::collection::vec(proptest::collection::vec(0..6usize, 0..4), 0..4),
        ) {
            let mut area_text = String::new();
            for (i, ids) in areas.iter().enumerate() {
                let ids: Vec<String> = ids.iter().map(u32::to_string).collect();
                area_text.push_str(&format!("area_{} = {{ {} }}\n", i, ids.join(" ")));
            }
            let mut region_text = String::from("placeholder_region = { }\n");
            for (i, members) in picks.iter().enumerate() {
                let names: Vec<String> = members.iter().map(|m| format!("area_{}", m)).collect();
                region_text.push_str(&format!("region_{} = {{ areas = {{ {} }} }}\n", i, names.join(" ")));
            }
            let area_root = rules(&area_text);
            let region_root = rules(&region_text);
            let mut warnings = Vec::new();

            let mut index = RegionIndex::from_areas(&region_root, &area_root, &mut warnings);
            let first = index.clone();
            index.rebuild(&region_root, &area_root, &mut warnings);
            prop_assert_eq!(first, index);
        }
    }
}
