//! HUD bindings: what a graphical frontend hangs off the score store.
//!
//! The widgets themselves live in the frontend; here they are two small
//! traits. A binding whose widget was never configured logs an error and
//! skips the update, the rest of the game carries on.

use std::sync::{Arc, Mutex, PoisonError};

use crate::config::Config;
use crate::error::{ClickerError, Result};
use crate::store::{ObserverId, ScoreObserver, ScoreStore};

/// A text widget
pub trait TextLabel: Send + Sync {
    fn set_text(&self, text: &str);
}

/// A control that can be enabled or disabled
pub trait Toggle: Send + Sync {
    fn set_enabled(&self, enabled: bool);
}

/// Shows `Score: N` on a label
pub struct ScoreDisplay {
    label: Option<Arc<dyn TextLabel>>,
}

impl ScoreDisplay {
    pub fn new(label: Option<Arc<dyn TextLabel>>) -> Self {
        Self { label }
    }

    pub fn format(score: i64) -> String {
        format!("Score: {score}")
    }

    pub fn render(&self, score: i64) -> Result<()> {
        let label = self
            .label
            .as_ref()
            .ok_or(ClickerError::MissingWiring("score label"))?;
        label.set_text(&Self::format(score));
        Ok(())
    }
}

impl ScoreObserver for ScoreDisplay {
    fn on_score_changed(&self, score: i64) {
        if let Err(err) = self.render(score) {
            tracing::error!(%err, score, "score display update skipped");
        }
    }
}

/// Enables the power-up control once the score reaches the unlock threshold
pub struct UnlockGate {
    control: Option<Arc<dyn Toggle>>,
    config: Config,
}

impl UnlockGate {
    pub fn new(control: Option<Arc<dyn Toggle>>, config: &Config) -> Self {
        Self {
            control,
            config: config.clone(),
        }
    }

    pub fn update(&self, score: i64) -> Result<()> {
        let control = self
            .control
            .as_ref()
            .ok_or(ClickerError::MissingWiring("power-up control"))?;
        control.set_enabled(self.config.power_up_unlocked(score));
        Ok(())
    }
}

impl ScoreObserver for UnlockGate {
    fn on_score_changed(&self, score: i64) {
        if let Err(err) = self.update(score) {
            tracing::error!(%err, score, "unlock gate update skipped");
        }
    }
}

/// Score display plus unlock gate, attached to a store as a pair
pub struct Hud {
    display: Arc<ScoreDisplay>,
    gate: Arc<UnlockGate>,
    subscriptions: Mutex<Vec<ObserverId>>,
}

impl Hud {
    pub fn new(
        label: Option<Arc<dyn TextLabel>>,
        control: Option<Arc<dyn Toggle>>,
        config: &Config,
    ) -> Self {
        Self {
            display: Arc::new(ScoreDisplay::new(label)),
            gate: Arc::new(UnlockGate::new(control, config)),
            subscriptions: Mutex::new(Vec::new()),
        }
    }

    /// Subscribe to `store` and draw the current score. Attaching twice is a no-op.
    pub fn attach(&self, store: &ScoreStore) {
        let mut subscriptions = self.subscriptions.lock().unwrap_or_else(PoisonError::into_inner);
        if !subscriptions.is_empty() {
            return;
        }
        // Initial draw happens under the store lock, so a concurrent change
        // can never be overwritten by an older score
        subscriptions.push(store.subscribe_with_current(self.display.clone()));
        subscriptions.push(store.subscribe_with_current(self.gate.clone()));
    }

    /// Unsubscribe from `store`. Safe to call when not attached.
    pub fn detach(&self, store: &ScoreStore) {
        let mut subscriptions = self.subscriptions.lock().unwrap_or_else(PoisonError::into_inner);
        for id in subscriptions.drain(..) {
            store.unsubscribe(id);
        }
    }

    pub fn is_attached(&self) -> bool {
        !self
            .subscriptions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_empty()
    }
}
