//! Rule tables for converting EU4 game state to Victoria 2.
//!
//! Each rule family (cultures, religions, governments, minority pops,
//! cultural unions, colonies, idea effects, regions) is read from a parsed
//! rule file into an in-memory table. [`CultureMapping::resolve`] then answers
//! "which Victoria 2 culture does this EU4 province's culture become?".
//!
//! Tables are built once per conversion run and only read afterwards.

pub mod colony;
pub mod config;
pub mod culture;
pub mod diagnostics;
pub mod error;
pub mod ideas;
pub mod loader;
pub mod naming;
pub mod node;
pub mod regions;
pub mod tables;
pub mod unions;

#[cfg(test)]
mod testing;

/// EU4 province identifier, as used in `area.txt` and `region.txt`.
pub type ProvinceId = u32;

pub use colony::{ColonyFlag, ColonyFlagset, ColonyRule};
pub use config::MapperConfig;
pub use culture::{CultureMapping, CultureQuery, CultureRule, Distinguisher, culture_match};
pub use diagnostics::{Diagnostics, LogDiagnostics, MapperWarning};
pub use error::MapperError;
pub use ideas::{IdeaEffect, IdeaEffects};
pub use loader::Mappers;
pub use node::RuleNode;
pub use regions::RegionIndex;
pub use tables::{CulturalUnion, MinorityPop, NameMapping};
pub use unions::UnionCultures;
