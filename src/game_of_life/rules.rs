//! Neighbor-count rule sets

use crate::error::SimError;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// Largest possible live-neighbor count in a Moore neighborhood
pub const MAX_NEIGHBORS: u8 = 8;

/// Birth, survival and death neighbor counts.
///
/// `die` is carried for documentation and validation only: any live cell whose
/// count is not in `survive` dies regardless of what `die` lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSet {
    pub populate: Vec<u8>,
    pub survive: Vec<u8>,
    pub die: Vec<u8>,
}

impl RuleSet {
    /// Build and validate a rule set
    pub fn new(populate: Vec<u8>, survive: Vec<u8>, die: Vec<u8>) -> Result<Self, SimError> {
        let rules = Self { populate, survive, die };
        rules.validate()?;
        Ok(rules)
    }

    /// Build a rule set from birth/survival counts, deriving `die` as the complement of `survive`
    pub fn from_birth_survival(populate: &[u8], survive: &[u8]) -> Self {
        let die = (0..=MAX_NEIGHBORS).filter(|n| !survive.contains(n)).collect();
        Self {
            populate: populate.to_vec(),
            survive: survive.to_vec(),
            die,
        }
    }

    /// Conway's Game of Life (B3/S23)
    pub fn conway() -> Self {
        Self::from_birth_survival(&[3], &[2, 3])
    }

    /// HighLife (B36/S23)
    pub fn high_life() -> Self {
        Self::from_birth_survival(&[3, 6], &[2, 3])
    }

    /// Seeds (B2/S): every live cell dies each generation
    pub fn seeds() -> Self {
        Self::from_birth_survival(&[2], &[])
    }

    /// Day & Night (B3678/S34678)
    pub fn day_and_night() -> Self {
        Self::from_birth_survival(&[3, 6, 7, 8], &[3, 4, 6, 7, 8])
    }

    /// Check that counts are in range and that `survive` and `die` partition `0..=8`
    pub fn validate(&self) -> Result<(), SimError> {
        let named = [
            ("populate", &self.populate),
            ("survive", &self.survive),
            ("die", &self.die),
        ];
        for (name, counts) in named {
            if let Some(bad) = counts.iter().find(|&&n| n > MAX_NEIGHBORS) {
                return Err(SimError::InvalidRuleSet(format!(
                    "{} count {} exceeds {}",
                    name, bad, MAX_NEIGHBORS
                )));
            }
        }

        for n in 0..=MAX_NEIGHBORS {
            match (self.survive.contains(&n), self.die.contains(&n)) {
                (true, true) => {
                    return Err(SimError::InvalidRuleSet(format!(
                        "count {} is listed in both survive and die",
                        n
                    )))
                }
                (false, false) => {
                    return Err(SimError::InvalidRuleSet(format!(
                        "count {} is listed in neither survive nor die",
                        n
                    )))
                }
                _ => {}
            }
        }

        Ok(())
    }

    /// Dead cell with `neighbors` live neighbors is born
    pub fn should_populate(&self, neighbors: u8) -> bool {
        self.populate.contains(&neighbors)
    }

    /// Live cell with `neighbors` live neighbors stays alive
    pub fn should_survive(&self, neighbors: u8) -> bool {
        self.survive.contains(&neighbors)
    }

    /// Next state of a cell given its current state and neighbor count
    pub fn next_state(&self, alive: bool, neighbors: u8) -> bool {
        if alive {
            self.should_survive(neighbors)
        } else {
            self.should_populate(neighbors)
        }
    }

    /// Rule string in B/S notation, e.g. `B3/S23`
    pub fn notation(&self) -> String {
        format!(
            "B{}/S{}",
            self.populate.iter().sorted().dedup().join(""),
            self.survive.iter().sorted().dedup().join("")
        )
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::conway()
    }
}

/// Named rule sets selectable from the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum RulePreset {
    Conway,
    HighLife,
    Seeds,
    DayAndNight,
}

impl RulePreset {
    pub fn all() -> [RulePreset; 4] {
        [
            RulePreset::Conway,
            RulePreset::HighLife,
            RulePreset::Seeds,
            RulePreset::DayAndNight,
        ]
    }

    pub fn name(self) -> &'static str {
        match self {
            RulePreset::Conway => "Conway",
            RulePreset::HighLife => "HighLife",
            RulePreset::Seeds => "Seeds",
            RulePreset::DayAndNight => "Day & Night",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            RulePreset::Conway => "The classic rules",
            RulePreset::HighLife => "Conway plus birth on 6; grows replicators",
            RulePreset::Seeds => "Nothing survives; explosive growth",
            RulePreset::DayAndNight => "Symmetric under inversion of live and dead",
        }
    }

    pub fn rules(self) -> RuleSet {
        match self {
            RulePreset::Conway => RuleSet::conway(),
            RulePreset::HighLife => RuleSet::high_life(),
            RulePreset::Seeds => RuleSet::seeds(),
            RulePreset::DayAndNight => RuleSet::day_and_night(),
        }
    }
}
