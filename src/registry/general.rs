//! Generals (characters).

use serde::{Deserialize, Serialize};

/// Gender tag of a general.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    #[default]
    Male,
    Female,
    Neuter,
}

/// A general definition.
///
/// Max hp is kept in half-points (`double_max_hp`) so the head and deputy
/// general can each contribute half a point.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct General {
    name: String,
    kingdom: String,
    package: String,
    double_max_hp: i32,
    gender: Gender,
    lord: bool,
    hidden: bool,
    never_shown: bool,
    head_max_hp_adjust: i32,
    deputy_max_hp_adjust: i32,
    abilities: Vec<String>,
    extra_abilities: Vec<String>,
    related_abilities: Vec<String>,
    companions: Vec<String>,
}

impl General {
    /// A general named `name`. A trailing `$` marks a lord and is stripped.
    pub fn new(name: &str, kingdom: impl Into<String>, double_max_hp: i32) -> Self {
        let (name, lord) = match name.strip_suffix('$') {
            Some(stripped) => (stripped.to_string(), true),
            None => (name.to_string(), false),
        };
        Self {
            name,
            kingdom: kingdom.into(),
            package: String::new(),
            double_max_hp,
            gender: Gender::Male,
            lord,
            hidden: false,
            never_shown: false,
            head_max_hp_adjust: 0,
            deputy_max_hp_adjust: 0,
            abilities: Vec::new(),
            extra_abilities: Vec::new(),
            related_abilities: Vec::new(),
            companions: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_gender(mut self, gender: Gender) -> Self {
        self.gender = gender;
        self
    }

    /// Hidden from random draws unless the config unhides it.
    #[must_use]
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// Never offered at all.
    #[must_use]
    pub fn never_shown(mut self) -> Self {
        self.hidden = true;
        self.never_shown = true;
        self
    }

    /// Grant an ability defined by the same package.
    #[must_use]
    pub fn with_ability(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !self.abilities.contains(&name) {
            self.abilities.push(name);
        }
        self
    }

    /// Grant an ability defined elsewhere, by name.
    ///
    /// The registry pulls in abilities related to these names when the
    /// general is registered.
    #[must_use]
    pub fn with_extra_ability(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if self.extra_abilities.contains(&name) {
            return self;
        }
        if !self.abilities.contains(&name) {
            self.abilities.push(name.clone());
        }
        self.extra_abilities.push(name);
        self
    }

    /// An ability this general can gain during play.
    #[must_use]
    pub fn with_related_ability(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !self.related_abilities.contains(&name) {
            self.related_abilities.push(name);
        }
        self
    }

    #[must_use]
    pub fn with_companion(mut self, name: impl Into<String>) -> Self {
        self.companions.push(name.into());
        self
    }

    /// Half-point max-hp adjustments when used as head or deputy.
    #[must_use]
    pub fn with_max_hp_adjust(mut self, head: i32, deputy: i32) -> Self {
        self.head_max_hp_adjust = head;
        self.deputy_max_hp_adjust = deputy;
        self
    }

    pub(crate) fn set_package(&mut self, package: &str) {
        self.package = package.to_string();
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn kingdom(&self) -> &str {
        &self.kingdom
    }

    /// Owning package; empty until registered.
    #[must_use]
    pub fn package(&self) -> &str {
        &self.package
    }

    #[must_use]
    pub fn double_max_hp(&self) -> i32 {
        self.double_max_hp
    }

    #[must_use]
    pub fn max_hp_head(&self) -> i32 {
        self.double_max_hp + self.head_max_hp_adjust
    }

    #[must_use]
    pub fn max_hp_deputy(&self) -> i32 {
        self.double_max_hp + self.deputy_max_hp_adjust
    }

    #[must_use]
    pub fn gender(&self) -> Gender {
        self.gender
    }

    #[must_use]
    pub fn is_lord(&self) -> bool {
        self.lord
    }

    /// Hidden by definition. The registry's answer also consults the config.
    #[must_use]
    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    #[must_use]
    pub fn is_never_shown(&self) -> bool {
        self.never_shown
    }

    /// Granted ability names, in order, without duplicates.
    #[must_use]
    pub fn abilities(&self) -> &[String] {
        &self.abilities
    }

    #[must_use]
    pub fn extra_abilities(&self) -> &[String] {
        &self.extra_abilities
    }

    #[must_use]
    pub fn has_ability(&self, name: &str) -> bool {
        self.abilities.iter().any(|a| a == name)
    }

    #[must_use]
    pub fn related_abilities(&self) -> &[String] {
        &self.related_abilities
    }

    #[must_use]
    pub fn companions(&self) -> &[String] {
        &self.companions
    }

    #[must_use]
    pub fn lists_companion(&self, name: &str) -> bool {
        self.companions.iter().any(|c| c == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lord_suffix() {
        let lord = General::new("liubei$", "shu", 8);
        assert_eq!(lord.name(), "liubei");
        assert!(lord.is_lord());
        assert!(!General::new("guanyu", "shu", 10).is_lord());
    }

    #[test]
    fn test_abilities_deduplicated() {
        let general = General::new("zhaoyun", "shu", 8)
            .with_ability("dragon_heart")
            .with_ability("dragon_heart")
            .with_extra_ability("dragon_heart")
            .with_extra_ability("shield")
            .with_extra_ability("shield")
            .with_related_ability("tiger")
            .with_related_ability("tiger");

        assert_eq!(general.abilities(), &["dragon_heart", "shield"]);
        assert_eq!(general.extra_abilities(), &["dragon_heart", "shield"]);
        assert!(general.has_ability("shield"));
        assert_eq!(general.related_abilities(), &["tiger"]);
        assert!(!general.has_ability("tiger"));
    }

    #[test]
    fn test_max_hp_adjust() {
        let general = General::new("dengai", "wei", 8).with_max_hp_adjust(-1, 0);
        assert_eq!(general.max_hp_head(), 7);
        assert_eq!(general.max_hp_deputy(), 8);
    }

    #[test]
    fn test_never_shown_is_hidden() {
        let general = General::new("anjiang", "god", 8).never_shown();
        assert!(general.is_hidden());
        assert!(general.is_never_shown());
    }
}
