/// Game tuning parameters for the clicker
#[derive(Debug, Clone, Copy)]
pub struct Params;

impl Params {
    // Clicking
    pub const BASE_CLICK_POINTS: i64 = 1;

    // Random bonus strategy (half-open: 0, 1, 2 or 3 extra points)
    pub const RANDOM_BONUS_MIN: i64 = 0;
    pub const RANDOM_BONUS_MAX: i64 = 4;

    // Double points power-up
    pub const DOUBLE_COST: i64 = 50;
    pub const DOUBLE_DURATION_SECS: u64 = 20;

    // Passive income upgrade
    pub const PPS_COST: i64 = 30;
    pub const PPS_INCREMENT: i64 = 1;
    pub const PASSIVE_INTERVAL_MS: u64 = 1000;

    // HUD
    pub const POWER_UP_UNLOCK_SCORE: i64 = 50;
}
