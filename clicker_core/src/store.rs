//! Score store: the single owner of the player's score.
//!
//! Every mutation goes through one of the entrypoints below, runs under the
//! store's mutex, and notifies observers before the lock is released, so an
//! observer never sees a stale value and a click racing a passive tick can
//! never lose an update.
//!
//! Observers are called synchronously in subscription order with the new
//! score. They must not call back into the store.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::config::Config;
use crate::effects::{Effect, EffectShape};
use crate::error::{ClickerError, Result};
use crate::resources::{GameRng, ScoreSnapshot};

/// Receives the new score after every change
pub trait ScoreObserver: Send + Sync {
    fn on_score_changed(&self, score: i64);
}

impl<F> ScoreObserver for F
where
    F: Fn(i64) + Send + Sync,
{
    fn on_score_changed(&self, score: i64) {
        self(score)
    }
}

/// Handle returned by `subscribe`, used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

/// Where an addition came from. Only `Click` counts as a click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointSource {
    Click,
    Passive,
    Bonus,
}

struct ScoreState {
    score: i64,
    clicks: u64,
    passive_rate: i64,
    click_effect: Effect,
    rng: GameRng,
    observers: Vec<(ObserverId, Arc<dyn ScoreObserver>)>,
    next_observer_id: u64,
}

impl ScoreState {
    fn commit(&mut self, score: i64) -> i64 {
        self.score = score;
        for (_, observer) in &self.observers {
            observer.on_score_changed(score);
        }
        score
    }
}

pub struct ScoreStore {
    state: Mutex<ScoreState>,
    base_click_points: i64,
}

impl ScoreStore {
    pub fn new(config: &Config) -> Self {
        Self::with_rng(config, GameRng::from_optional_seed(config.rng_seed))
    }

    /// Store drawing its random bonuses from `rng`
    pub fn with_rng(config: &Config, rng: GameRng) -> Self {
        Self {
            state: Mutex::new(ScoreState {
                score: 0,
                clicks: 0,
                passive_rate: 0,
                click_effect: Effect::Identity,
                rng,
                observers: Vec::new(),
                next_observer_id: 0,
            }),
            base_click_points: config.base_click_points,
        }
    }

    // A panicking observer must not brick the store
    fn lock(&self) -> MutexGuard<'_, ScoreState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn score(&self) -> i64 {
        self.lock().score
    }

    pub fn clicks(&self) -> u64 {
        self.lock().clicks
    }

    pub fn passive_rate(&self) -> i64 {
        self.lock().passive_rate
    }

    pub fn click_effect(&self) -> Effect {
        self.lock().click_effect
    }

    pub fn snapshot(&self) -> ScoreSnapshot {
        let state = self.lock();
        ScoreSnapshot {
            score: state.score,
            clicks: state.clicks,
            passive_rate: state.passive_rate,
            click_effect: state.click_effect,
        }
    }

    // === Mutation ===

    /// Add `amount` verbatim. Returns the new score.
    pub fn add_points(&self, amount: i64, source: PointSource) -> i64 {
        let mut state = self.lock();
        if source == PointSource::Click {
            state.clicks += 1;
        }
        let score = state.score.saturating_add(amount);
        tracing::debug!(amount, ?source, score, "points added");
        state.commit(score)
    }

    /// One player click: base points through the current click strategy
    pub fn click(&self) -> i64 {
        let mut state = self.lock();
        let effect = state.click_effect;
        let points = effect.apply(self.base_click_points, &mut state.rng);
        state.clicks += 1;
        let score = state.score.saturating_add(points);
        tracing::debug!(points, %effect, score, clicks = state.clicks, "click");
        state.commit(score)
    }

    pub fn add_passive_points(&self, amount: i64) -> i64 {
        self.add_points(amount, PointSource::Passive)
    }

    /// Apply a one-off effect to the score.
    ///
    /// Per-click effects add their scaled base points; whole-score effects
    /// replace the total. An absent effect changes nothing and is reported.
    pub fn apply_effect(&self, effect: Option<Effect>) -> Result<i64> {
        let Some(effect) = effect else {
            tracing::warn!("apply_effect called without an effect");
            return Err(ClickerError::NoEffect);
        };

        let mut state = self.lock();
        let score = match effect.shape() {
            EffectShape::PerClick => {
                let points = effect.apply(self.base_click_points, &mut state.rng);
                state.score.saturating_add(points)
            }
            EffectShape::WholeScore => {
                let current = state.score;
                effect.apply(current, &mut state.rng)
            }
        };
        tracing::info!(%effect, from = state.score, to = score, "effect applied");
        Ok(state.commit(score))
    }

    /// Deduct `cost` if affordable, returning the new score
    pub fn spend(&self, cost: i64) -> Result<i64> {
        let mut state = self.lock();
        if state.score < cost {
            tracing::debug!(cost, score = state.score, "spend rejected");
            return Err(ClickerError::InsufficientFunds {
                cost,
                score: state.score,
            });
        }
        let score = state.score.saturating_sub(cost);
        tracing::debug!(cost, score, "spent");
        Ok(state.commit(score))
    }

    /// Deduct `cost` iff `score >= cost`. The score is untouched on failure.
    pub fn try_spend(&self, cost: i64) -> bool {
        self.spend(cost).is_ok()
    }

    /// Install the strategy used by `click`. Whole-score effects are refused.
    pub fn set_click_effect(&self, effect: Effect) -> Result<()> {
        if effect.shape() != EffectShape::PerClick {
            tracing::warn!(%effect, "refusing whole-score effect as click strategy");
            return Err(ClickerError::NotAClickEffect(effect));
        }
        let mut state = self.lock();
        tracing::debug!(from = %state.click_effect, to = %effect, "click strategy changed");
        state.click_effect = effect;
        Ok(())
    }

    /// Raise (or lower) the passive income rate, returning the new rate
    pub fn add_passive_rate(&self, delta: i64) -> i64 {
        let mut state = self.lock();
        state.passive_rate = state.passive_rate.saturating_add(delta);
        state.passive_rate
    }

    /// One passive income tick. Returns the amount added (0 when the rate is not positive).
    pub fn tick_passive(&self) -> i64 {
        let mut state = self.lock();
        let rate = state.passive_rate;
        if rate <= 0 {
            return 0;
        }
        let score = state.score.saturating_add(rate);
        tracing::debug!(rate, score, "passive income");
        state.commit(score);
        rate
    }

    // === Observers ===

    pub fn subscribe(&self, observer: Arc<dyn ScoreObserver>) -> ObserverId {
        let mut state = self.lock();
        let id = ObserverId(state.next_observer_id);
        state.next_observer_id += 1;
        state.observers.push((id, observer));
        id
    }

    /// Subscribe and deliver the current score to `observer` before any
    /// other mutation can run, so it starts from a value it can trust
    pub fn subscribe_with_current(&self, observer: Arc<dyn ScoreObserver>) -> ObserverId {
        let mut state = self.lock();
        let id = ObserverId(state.next_observer_id);
        state.next_observer_id += 1;
        observer.on_score_changed(state.score);
        state.observers.push((id, observer));
        id
    }

    /// Returns whether the observer was registered. Unknown ids are a no-op.
    pub fn unsubscribe(&self, id: ObserverId) -> bool {
        let mut state = self.lock();
        let before = state.observers.len();
        state.observers.retain(|(observer_id, _)| *observer_id != id);
        state.observers.len() != before
    }

    pub fn observer_count(&self) -> usize {
        self.lock().observers.len()
    }
}

impl std::fmt::Debug for ScoreStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScoreStore")
            .field("snapshot", &self.snapshot())
            .finish()
    }
}
