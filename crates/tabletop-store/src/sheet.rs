//! Rolling against a loaded character sheet.

use tabletop_shared::dice::{resolve_roll, DieRoller, RollOutcome};

use crate::models::CharacterSheet;

impl CharacterSheet {
    /// The character's value for the named attribute, if it has one.
    pub fn attribute_value(&self, name: &str) -> Option<i64> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value)
    }

    /// The character's bonus for the named skill, if it has one.
    pub fn skill_bonus(&self, name: &str) -> Option<i64> {
        self.skills.iter().find(|s| s.name == name).map(|s| s.bonus)
    }

    /// Roll the die for `attribute`, adding the bonus for `skill` when one is
    /// named. Missing values fall back to a d4 and a zero bonus.
    pub fn roll<D: DieRoller + ?Sized>(
        &self,
        attribute: &str,
        skill: Option<&str>,
        roller: &mut D,
    ) -> RollOutcome {
        let value = self.attribute_value(attribute);
        let bonus = skill.and_then(|s| self.skill_bonus(s));
        let outcome = resolve_roll(value, bonus, roller);

        tracing::debug!(
            character_id = self.character.id,
            attribute,
            skill,
            die = %outcome.die,
            natural = outcome.natural,
            total = outcome.total,
            "roll"
        );
        outcome
    }
}
