//! National idea effects on the converted country.
//!
//! ```text
//! quality_ideas = {
//!     army_investment = 2
//!     army_tech_score = 0.5
//!     literacy = "1 2"
//! }
//! ```

use std::collections::HashMap;

use crate::diagnostics::{Diagnostics, MapperWarning};
use crate::node::RuleNode;

/// Every effect key an idea block may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdeaEffect {
    ArmyInvestment,
    CommerceInvestment,
    CultureInvestment,
    IndustryInvestment,
    NavyInvestment,
    ArmyTechScore,
    CommerceTechScore,
    CultureTechScore,
    IndustryTechScore,
    NavyTechScore,
    UpperHouseLiberal,
    UpperHouseReactionary,
    Order,
    Liberty,
    Equality,
    Literacy,
}

impl IdeaEffect {
    pub const ALL: [IdeaEffect; 16] = [
        IdeaEffect::ArmyInvestment,
        IdeaEffect::CommerceInvestment,
        IdeaEffect::CultureInvestment,
        IdeaEffect::IndustryInvestment,
        IdeaEffect::NavyInvestment,
        IdeaEffect::ArmyTechScore,
        IdeaEffect::CommerceTechScore,
        IdeaEffect::CultureTechScore,
        IdeaEffect::IndustryTechScore,
        IdeaEffect::NavyTechScore,
        IdeaEffect::UpperHouseLiberal,
        IdeaEffect::UpperHouseReactionary,
        IdeaEffect::Order,
        IdeaEffect::Liberty,
        IdeaEffect::Equality,
        IdeaEffect::Literacy,
    ];

    pub fn key(self) -> &'static str {
        match self {
            IdeaEffect::ArmyInvestment => "army_investment",
            IdeaEffect::CommerceInvestment => "commerce_investment",
            IdeaEffect::CultureInvestment => "culture_investment",
            IdeaEffect::IndustryInvestment => "industry_investment",
            IdeaEffect::NavyInvestment => "navy_investment",
            IdeaEffect::ArmyTechScore => "army_tech_score",
            IdeaEffect::CommerceTechScore => "commerce_tech_score",
            IdeaEffect::CultureTechScore => "culture_tech_score",
            IdeaEffect::IndustryTechScore => "industry_tech_score",
            IdeaEffect::NavyTechScore => "navy_tech_score",
            IdeaEffect::UpperHouseLiberal => "upper_house_liberal",
            IdeaEffect::UpperHouseReactionary => "upper_house_reactionary",
            IdeaEffect::Order => "NV_order",
            IdeaEffect::Liberty => "NV_liberty",
            IdeaEffect::Equality => "NV_equality",
            IdeaEffect::Literacy => "literacy",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|effect| effect.key() == key)
    }
}

/// Idea effect tables, one map per effect kind.
///
/// Investments and national values are whole numbers; tech scores and upper
/// house shifts are fractional. `literacy` keeps every listed value in order,
/// so an idea may appear several times.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IdeaEffects {
    pub army_investment: HashMap<String, i32>,
    pub commerce_investment: HashMap<String, i32>,
    pub culture_investment: HashMap<String, i32>,
    pub industry_investment: HashMap<String, i32>,
    pub navy_investment: HashMap<String, i32>,
    pub army_tech_score: HashMap<String, f64>,
    pub commerce_tech_score: HashMap<String, f64>,
    pub culture_tech_score: HashMap<String, f64>,
    pub industry_tech_score: HashMap<String, f64>,
    pub navy_tech_score: HashMap<String, f64>,
    pub upper_house_liberal: HashMap<String, f64>,
    pub upper_house_reactionary: HashMap<String, f64>,
    pub order: HashMap<String, i32>,
    pub liberty: HashMap<String, i32>,
    pub equality: HashMap<String, i32>,
    pub literacy: Vec<(String, i32)>,
}

enum EffectTable<'a> {
    Count(&'a mut HashMap<String, i32>),
    Score(&'a mut HashMap<String, f64>),
    Sequence(&'a mut Vec<(String, i32)>),
}

impl IdeaEffects {
    pub fn build<N: RuleNode>(root: &N, diagnostics: &mut dyn Diagnostics) -> Self {
        let mut effects = Self::default();
        for idea in root.leaves() {
            let idea_name = idea.key();
            for entry in idea.leaves() {
                let Some(effect) = IdeaEffect::from_key(&entry.key()) else {
                    continue;
                };
                match effects.table_mut(effect) {
                    EffectTable::Count(table) => {
                        let value = parse_count(&idea_name, effect, &entry.leaf(), diagnostics);
                        table.insert(idea_name.to_string(), value);
                    }
                    EffectTable::Score(table) => {
                        let value = parse_score(&idea_name, effect, &entry.leaf(), diagnostics);
                        table.insert(idea_name.to_string(), value);
                    }
                    EffectTable::Sequence(list) => {
                        for token in entry.tokens() {
                            let value = parse_count(&idea_name, effect, &token, diagnostics);
                            list.push((idea_name.to_string(), value));
                        }
                    }
                }
            }
        }
        log::debug!("Loaded {} idea effects", effects.entry_count());
        effects
    }

    fn table_mut(&mut self, effect: IdeaEffect) -> EffectTable<'_> {
        match effect {
            IdeaEffect::ArmyInvestment => EffectTable::Count(&mut self.army_investment),
            IdeaEffect::CommerceInvestment => EffectTable::Count(&mut self.commerce_investment),
            IdeaEffect::CultureInvestment => EffectTable::Count(&mut self.culture_investment),
            IdeaEffect::IndustryInvestment => EffectTable::Count(&mut self.industry_investment),
            IdeaEffect::NavyInvestment => EffectTable::Count(&mut self.navy_investment),
            IdeaEffect::ArmyTechScore => EffectTable::Score(&mut self.army_tech_score),
            IdeaEffect::CommerceTechScore => EffectTable::Score(&mut self.commerce_tech_score),
            IdeaEffect::CultureTechScore => EffectTable::Score(&mut self.culture_tech_score),
            IdeaEffect::IndustryTechScore => EffectTable::Score(&mut self.industry_tech_score),
            IdeaEffect::NavyTechScore => EffectTable::Score(&mut self.navy_tech_score),
            IdeaEffect::UpperHouseLiberal => EffectTable::Score(&mut self.upper_house_liberal),
            IdeaEffect::UpperHouseReactionary => {
                EffectTable::Score(&mut self.upper_house_reactionary)
            }
            IdeaEffect::Order => EffectTable::Count(&mut self.order),
            IdeaEffect::Liberty => EffectTable::Count(&mut self.liberty),
            IdeaEffect::Equality => EffectTable::Count(&mut self.equality),
            IdeaEffect::Literacy => EffectTable::Sequence(&mut self.literacy),
        }
    }

    /// Total number of entries over all effect tables.
    pub fn entry_count(&self) -> usize {
        let counts = [
            &self.army_investment,
            &self.commerce_investment,
            &self.culture_investment,
            &self.industry_investment,
            &self.navy_investment,
            &self.order,
            &self.liberty,
            &self.equality,
        ];
        let scores = [
            &self.army_tech_score,
            &self.commerce_tech_score,
            &self.culture_tech_score,
            &self.industry_tech_score,
            &self.navy_tech_score,
            &self.upper_house_liberal,
            &self.upper_house_reactionary,
        ];
        counts.iter().map(|t| t.len()).sum::<usize>()
            + scores.iter().map(|t| t.len()).sum::<usize>()
            + self.literacy.len()
    }
}

/// Whole-number effect value. Fractions are truncated toward zero.
fn parse_count(
    idea: &str,
    effect: IdeaEffect,
    value: &str,
    diagnostics: &mut dyn Diagnostics,
) -> i32 {
    let trimmed = value.trim();
    if let Ok(n) = trimmed.parse::<i32>() {
        return n;
    }
    match trimmed.parse::<f64>() {
        Ok(f) if f.is_finite() => f as i32,
        _ => {
            warn_invalid(idea, effect, value, diagnostics);
            0
        }
    }
}

fn parse_score(
    idea: &str,
    effect: IdeaEffect,
    value: &str,
    diagnostics: &mut dyn Diagnostics,
) -> f64 {
    match value.trim().parse::<f64>() {
        Ok(f) if f.is_finite() => f,
        _ => {
            warn_invalid(idea, effect, value, diagnostics);
            0.0
        }
    }
}

fn warn_invalid(idea: &str, effect: IdeaEffect, value: &str, diagnostics: &mut dyn Diagnostics) {
    diagnostics.warn(MapperWarning::InvalidEffectValue {
        idea: idea.to_string(),
        effect: effect.key(),
        value: value.to_string(),
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::rules;

    #[test]
    fn test_effect_keys_round_trip() {
        for effect in IdeaEffect::ALL {
            assert_eq!(IdeaEffect::from_key(effect.key()), Some(effect));
        }
        assert_eq!(IdeaEffect::from_key("nv_order"), None);
    }

    #[test]
    fn test_literacy_keeps_every_value_in_order() {
        let mut warnings = Vec::new();
        let effects = IdeaEffects::build(
            &rules(r#"innovativeness_ideas = { literacy = "1 2 3" }"#),
            &mut warnings,
        );
        assert_eq!(
            effects.literacy,
            vec![
                ("innovativeness_ideas".to_string(), 1),
                ("innovativeness_ideas".to_string(), 2),
                ("innovativeness_ideas".to_string(), 3),
            ]
        );
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_counts_and_scores() {
        let mut warnings = Vec::new();
        let effects = IdeaEffects::build(
            &rules(
                r#"
                quality_ideas = {
                    army_investment = 2
                    navy_investment = "2.7"
                    army_tech_score = 0.5
                    upper_house_reactionary = -0.25
                    NV_order = 1
                    unknown_effect = 7
                }
                plutocratic_ideas = {
                    commerce_investment = 3
                    NV_liberty = -1
                }
                "#,
            ),
            &mut warnings,
        );
        assert_eq!(effects.army_investment["quality_ideas"], 2);
        assert_eq!(effects.navy_investment["quality_ideas"], 2);
        assert_eq!(effects.army_tech_score["quality_ideas"], 0.5);
        assert_eq!(effects.upper_house_reactionary["quality_ideas"], -0.25);
        assert_eq!(effects.order["quality_ideas"], 1);
        assert_eq!(effects.commerce_investment["plutocratic_ideas"], 3);
        assert_eq!(effects.liberty["plutocratic_ideas"], -1);
        assert!(effects.equality.is_empty());
        assert_eq!(effects.entry_count(), 7);
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_unreadable_value_defaults_to_zero() {
        let mut warnings = Vec::new();
        let effects = IdeaEffects::build(
            &rules("economic_ideas = { industry_investment = lots culture_tech_score = some }"),
            &mut warnings,
        );
        assert_eq!(effects.industry_investment["economic_ideas"], 0);
        assert_eq!(effects.culture_tech_score["economic_ideas"], 0.0);
        assert_eq!(warnings.len(), 2);
        assert!(matches!(
            &warnings[0],
            MapperWarning::InvalidEffectValue { effect: "industry_investment", .. }
        ));
    }
}
