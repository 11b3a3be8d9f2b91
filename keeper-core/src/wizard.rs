//! Creation wizard: step progression, personal info, and attribute rolls
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::derived::Derived;
use crate::dice::RollFormula;
use crate::fields::{FieldCategory, FieldUpdate};
use crate::skills::{SkillAllocator, SkillCategory};
use crate::talents::TalentPicker;

/// Wizard pages in order. Forward movement is gated on the current page
/// being complete; backward movement is always allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum WizardStep {
    #[serde(rename = "personalInfo")]
    PersonalInfo,
    #[serde(rename = "attributes")]
    Attributes,
    #[serde(rename = "talents")]
    Talents,
    #[serde(rename = "skills")]
    Skills,
}

impl WizardStep {
    pub const ALL: [Self; 4] = [
        Self::PersonalInfo,
        Self::Attributes,
        Self::Talents,
        Self::Skills,
    ];

    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::PersonalInfo => Some(Self::Attributes),
            Self::Attributes => Some(Self::Talents),
            Self::Talents => Some(Self::Skills),
            Self::Skills => None,
        }
    }

    #[must_use]
    pub const fn back(self) -> Option<Self> {
        match self {
            Self::PersonalInfo => None,
            Self::Attributes => Some(Self::PersonalInfo),
            Self::Talents => Some(Self::Attributes),
            Self::Skills => Some(Self::Talents),
        }
    }
}

/// The identity fields collected on the first wizard page.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PersonalInfo {
    pub name: String,
    pub age: String,
    pub residence: String,
    pub birthplace: String,
    pub archetype: String,
    pub occupation: String,
}

impl PersonalInfo {
    /// Every field filled in (whitespace does not count).
    #[must_use]
    pub fn complete(&self) -> bool {
        [
            &self.name,
            &self.age,
            &self.residence,
            &self.birthplace,
            &self.archetype,
            &self.occupation,
        ]
        .iter()
        .all(|f| !f.trim().is_empty())
    }

    /// Changes to push when a single field is edited.
    #[must_use]
    pub fn update(field: &str, value: &str) -> FieldUpdate {
        FieldUpdate::new(FieldCategory::PersonalInfo, field, value)
    }
}

/// The eight rollable characteristics.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Characteristic {
    Str,
    Con,
    Dex,
    App,
    Pow,
    Siz,
    Int,
    Edu,
}

impl Characteristic {
    pub const ALL: [Self; 8] = [
        Self::Str,
        Self::Con,
        Self::Dex,
        Self::App,
        Self::Pow,
        Self::Siz,
        Self::Int,
        Self::Edu,
    ];

    /// Wire/display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Str => "str",
            Self::Con => "con",
            Self::Dex => "dex",
            Self::App => "app",
            Self::Pow => "pow",
            Self::Siz => "siz",
            Self::Int => "int",
            Self::Edu => "edu",
        }
    }

    /// SIZ, INT and EDU roll (2d6+6)x5; the rest roll 3d6x5.
    #[must_use]
    pub const fn formula(self) -> RollFormula {
        match self {
            Self::Siz | Self::Int | Self::Edu => RollFormula::TwoD6Plus6Times5,
            _ => RollFormula::ThreeD6Times5,
        }
    }
}

/// Rolled attribute values; unrolled characteristics are simply absent.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttributeSet {
    values: BTreeMap<Characteristic, i32>,
}

impl AttributeSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, characteristic: Characteristic) -> Option<i32> {
        self.values.get(&characteristic).copied()
    }

    pub fn set(&mut self, characteristic: Characteristic, value: i32) {
        self.values.insert(characteristic, value);
    }

    /// Half/fifth companions for a rolled characteristic.
    #[must_use]
    pub fn derived(&self, characteristic: Characteristic) -> Option<Derived> {
        self.get(characteristic).map(Derived::of)
    }

    /// Roll one characteristic with its formula and return the new value.
    pub fn roll<R: Rng>(&mut self, rng: &mut R, characteristic: Characteristic) -> i32 {
        let value = characteristic.formula().roll(rng);
        self.values.insert(characteristic, value);
        value
    }

    /// Roll every characteristic at once.
    pub fn roll_all<R: Rng>(&mut self, rng: &mut R) {
        for characteristic in Characteristic::ALL {
            self.roll(rng, characteristic);
        }
    }

    /// Gate for leaving the attributes page.
    #[must_use]
    pub fn all_filled(&self) -> bool {
        Characteristic::ALL.iter().all(|c| self.values.contains_key(c))
    }

    /// The change to push after a roll or manual entry.
    #[must_use]
    pub fn update(&self, characteristic: Characteristic) -> Option<FieldUpdate> {
        self.get(characteristic).map(|value| {
            FieldUpdate::new(FieldCategory::Attributes, characteristic.name(), value)
        })
    }
}

/// Tracks where the player is in the creation flow and whether the
/// current page lets them continue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct CreationWizard {
    pub step: WizardStep,
    pub personal: PersonalInfo,
    pub attributes: AttributeSet,
}

impl Default for WizardStep {
    fn default() -> Self {
        Self::PersonalInfo
    }
}

impl CreationWizard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the current page's continue affordance is unlocked.
    #[must_use]
    pub fn step_complete(&self, talents: &TalentPicker, skills: &SkillAllocator) -> bool {
        match self.step {
            WizardStep::PersonalInfo => self.personal.complete(),
            WizardStep::Attributes => self.attributes.all_filled(),
            WizardStep::Talents => talents.complete(),
            WizardStep::Skills => SkillCategory::ALL
                .iter()
                .all(|c| skills.category_complete(*c)),
        }
    }

    /// Advance only when the current page is complete.
    pub fn advance(&mut self, talents: &TalentPicker, skills: &SkillAllocator) -> bool {
        if !self.step_complete(talents, skills) {
            return false;
        }
        match self.step.next() {
            Some(next) => {
                self.step = next;
                true
            }
            None => false,
        }
    }

    /// Going back is never gated.
    pub fn back(&mut self) -> bool {
        match self.step.back() {
            Some(prev) => {
                self.step = prev;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::skills::{PointPools, SkillField};
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn filled_info() -> PersonalInfo {
        PersonalInfo {
            name: "Harvey Walters".into(),
            age: "42".into(),
            residence: "Arkham".into(),
            birthplace: "Boston".into(),
            archetype: "Scholar".into(),
            occupation: "Journalist".into(),
        }
    }

    #[test]
    fn personal_info_requires_every_field() {
        let mut info = filled_info();
        assert!(info.complete());
        info.residence = "   ".into();
        assert!(!info.complete());
    }

    #[test]
    fn formulas_match_characteristic() {
        assert_eq!(Characteristic::Str.formula(), RollFormula::ThreeD6Times5);
        assert_eq!(Characteristic::Siz.formula(), RollFormula::TwoD6Plus6Times5);
        assert_eq!(Characteristic::Edu.formula(), RollFormula::TwoD6Plus6Times5);
    }

    #[test]
    fn rolls_stay_in_formula_range() {
        let mut rng = ChaCha20Rng::seed_from_u64(3);
        let mut attrs = AttributeSet::new();
        for _ in 0..20 {
            attrs.roll_all(&mut rng);
            for c in Characteristic::ALL {
                let v = attrs.get(c).unwrap();
                assert!(v >= c.formula().min() && v <= c.formula().max(), "{c:?}={v}");
            }
        }
        assert!(attrs.all_filled());
    }

    #[test]
    fn attribute_update_carries_wire_name() {
        let mut attrs = AttributeSet::new();
        attrs.set(Characteristic::Pow, 65);
        let update = attrs.update(Characteristic::Pow).unwrap();
        assert_eq!(update.field, "pow");
        assert!(attrs.update(Characteristic::Edu).is_none());
    }

    #[test]
    fn advance_is_gated_and_back_is_not() {
        let talents = TalentPicker::new(["Keen Vision".to_string()], 1);
        let skills = SkillAllocator::new(PointPools::default())
            .with_field(SkillField::new("Dodge", 20, SkillCategory::General));
        let mut wizard = CreationWizard::new();

        assert!(!wizard.advance(&talents, &skills));
        wizard.personal = filled_info();
        assert!(wizard.advance(&talents, &skills));
        assert_eq!(wizard.step, WizardStep::Attributes);

        assert!(wizard.back());
        assert_eq!(wizard.step, WizardStep::PersonalInfo);
        assert!(!wizard.back());
    }

    #[test]
    fn full_flow_reaches_the_skills_page() {
        let mut talents = TalentPicker::new(["Keen Vision".to_string()], 1);
        talents.toggle("Keen Vision").unwrap();
        // Empty pools count as spent, so the skills page is complete too.
        let skills = SkillAllocator::new(PointPools::default());
        let mut rng = ChaCha20Rng::seed_from_u64(9);

        let mut wizard = CreationWizard::new();
        wizard.personal = filled_info();
        wizard.attributes.roll_all(&mut rng);

        assert!(wizard.advance(&talents, &skills));
        assert!(wizard.advance(&talents, &skills));
        assert!(wizard.advance(&talents, &skills));
        assert_eq!(wizard.step, WizardStep::Skills);
        assert!(!wizard.advance(&talents, &skills), "last page has no next");
    }
}
