use std::time::Duration;

use crate::params::Params;

/// Game configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub base_click_points: i64,
    pub random_bonus_min: i64,
    pub random_bonus_max: i64,
    pub double_cost: i64,
    pub double_duration: Duration,
    pub pps_cost: i64,
    pub pps_increment: i64,
    pub passive_interval: Duration,
    pub power_up_unlock_score: i64,
    pub rng_seed: Option<u64>, // None = seed from entropy
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_click_points: Params::BASE_CLICK_POINTS,
            random_bonus_min: Params::RANDOM_BONUS_MIN,
            random_bonus_max: Params::RANDOM_BONUS_MAX,
            double_cost: Params::DOUBLE_COST,
            double_duration: Duration::from_secs(Params::DOUBLE_DURATION_SECS),
            pps_cost: Params::PPS_COST,
            pps_increment: Params::PPS_INCREMENT,
            passive_interval: Duration::from_millis(Params::PASSIVE_INTERVAL_MS),
            power_up_unlock_score: Params::POWER_UP_UNLOCK_SCORE,
            rng_seed: None,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Same tunables, fixed RNG seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }

    /// Whether the secondary power-up control should be enabled at this score
    pub fn power_up_unlocked(&self, score: i64) -> bool {
        score >= self.power_up_unlock_score
    }
}
