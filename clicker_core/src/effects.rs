use std::fmt;

use crate::resources::GameRng;

/// How an effect is meant to be applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectShape {
    /// Scales a single click's base points before they are added
    PerClick,
    /// Replaces the whole running total
    WholeScore,
}

/// Score effect strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Effect {
    #[default]
    Identity,
    Double,
    /// Adds a uniform draw from `lo..hi`
    RandomBonus { lo: i64, hi: i64 },
    Reset,
}

impl Effect {
    pub fn shape(&self) -> EffectShape {
        match self {
            Effect::Identity | Effect::Double | Effect::RandomBonus { .. } => EffectShape::PerClick,
            Effect::Reset => EffectShape::WholeScore,
        }
    }

    /// Apply the effect to `value`: base click points for per-click effects,
    /// the current score for whole-score effects
    pub fn apply(&self, value: i64, rng: &mut GameRng) -> i64 {
        match *self {
            Effect::Identity => value,
            Effect::Double => value.saturating_mul(2),
            Effect::RandomBonus { lo, hi } => value.saturating_add(rng.gen_range(lo, hi)),
            Effect::Reset => 0,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Effect::Identity => "Normal",
            Effect::Double => "Double",
            Effect::RandomBonus { .. } => "Random Bonus",
            Effect::Reset => "Reset",
        }
    }
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
