//! Reads every rule file of a conversion into a [`Mappers`] set.

use std::path::{Path, PathBuf};

use eu4txt::{DefaultEU4Txt, EU4Txt, EU4TxtParseNode};
use rayon::prelude::*;

use crate::colony::{ColonyFlagset, ColonyRule, build_colony_rules};
use crate::config::MapperConfig;
use crate::culture::{CultureMapping, CultureQuery};
use crate::diagnostics::Diagnostics;
use crate::error::MapperError;
use crate::ideas::IdeaEffects;
use crate::regions::RegionIndex;
use crate::tables::{
    CulturalUnion, MinorityPop, NameMapping, build_cultural_unions, build_minority_pops,
};
use crate::unions::UnionCultures;

/// Parses one rule file. An empty file is an empty root list.
pub fn parse_file(path: &Path) -> Result<EU4TxtParseNode, MapperError> {
    let tokens = DefaultEU4Txt::open_txt(path).map_err(|source| MapperError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    if tokens.is_empty() {
        return Ok(EU4TxtParseNode::list());
    }
    DefaultEU4Txt::parse(tokens).map_err(|source| MapperError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Every rule table of a conversion run.
#[derive(Debug, Clone, Default)]
pub struct Mappers {
    pub cultures: CultureMapping,
    pub religions: NameMapping,
    pub governments: NameMapping,
    pub minority_pops: Vec<MinorityPop>,
    pub unions: Vec<CulturalUnion>,
    pub union_cultures: UnionCultures,
    pub idea_effects: IdeaEffects,
    pub colonies: Vec<ColonyRule>,
    pub colony_flags: ColonyFlagset,
    pub regions: RegionIndex,
}

/// Files every rule set has, in the order they are parsed.
const CULTURES: usize = 0;
const RELIGIONS: usize = 1;
const GOVERNMENTS: usize = 2;
const MINORITY_POPS: usize = 3;
const UNIONS: usize = 4;
const IDEA_EFFECTS: usize = 5;
const COLONIAL: usize = 6;
const REGIONS: usize = 7;
const FIXED_FILES: usize = 8;

impl Mappers {
    /// Parses all rule files named by `config` in parallel, then builds the
    /// tables.
    ///
    /// Regions are read in the two-level area format when the area file
    /// exists, otherwise as a legacy region file.
    pub fn load(config: &MapperConfig, diagnostics: &mut dyn Diagnostics) -> Result<Self, MapperError> {
        let area_path = config.area_path();
        let use_areas = area_path.is_file();

        let mut paths: Vec<PathBuf> = vec![
            config.mapping_file(&config.culture_map),
            config.mapping_file(&config.religion_map),
            config.mapping_file(&config.government_map),
            config.mapping_file(&config.minority_pops),
            config.mapping_file(&config.union_tags),
            config.mapping_file(&config.idea_effects),
            config.mapping_file(&config.colonial_rules),
            config.region_path(),
        ];
        if use_areas {
            paths.push(area_path);
        }
        paths.extend(config.union_culture_paths());

        let roots = paths
            .par_iter()
            .map(|path| parse_file(path))
            .collect::<Result<Vec<_>, _>>()?;
        log::info!("Parsed {} rule files", roots.len());

        let (fixed, rest) = roots.split_at(FIXED_FILES);
        let (area_root, culture_roots) = match rest.split_first() {
            Some((areas, cultures)) if use_areas => (Some(areas), cultures),
            _ => (None, rest),
        };

        let regions = match area_root {
            Some(areas) => RegionIndex::from_areas(&fixed[REGIONS], areas, diagnostics),
            None => RegionIndex::from_legacy(&fixed[REGIONS], diagnostics),
        };

        let mut union_cultures = UnionCultures::default();
        for root in culture_roots {
            union_cultures.extend_from(root);
        }

        let mappers = Self {
            cultures: CultureMapping::build(&fixed[CULTURES], diagnostics),
            religions: NameMapping::build(&fixed[RELIGIONS]),
            governments: NameMapping::build(&fixed[GOVERNMENTS]),
            minority_pops: build_minority_pops(&fixed[MINORITY_POPS]),
            unions: build_cultural_unions(&fixed[UNIONS]),
            union_cultures,
            idea_effects: IdeaEffects::build(&fixed[IDEA_EFFECTS], diagnostics),
            colonies: build_colony_rules(&fixed[COLONIAL])?,
            colony_flags: ColonyFlagset::build(&fixed[COLONIAL])?,
            regions,
        };

        for (table, size) in mappers.summary() {
            log::info!("{}: {}", table, size);
        }
        Ok(mappers)
    }

    /// Entry count of every table, in load order.
    pub fn summary(&self) -> Vec<(&'static str, usize)> {
        vec![
            ("culture rules", self.cultures.len()),
            ("religions", self.religions.len()),
            ("governments", self.governments.len()),
            ("minority pops", self.minority_pops.len()),
            ("cultural unions", self.unions.len()),
            ("culture groups", self.union_cultures.len()),
            ("idea effects", self.idea_effects.entry_count()),
            ("colony rules", self.colonies.len()),
            ("colony flags", self.colony_flags.len()),
            ("provinces in regions", self.regions.len()),
        ]
    }

    pub fn resolve_culture(
        &self,
        query: &CultureQuery<'_>,
        diagnostics: &mut dyn Diagnostics,
    ) -> Option<&str> {
        self.cultures.resolve(query, &self.regions, diagnostics)
    }
}
