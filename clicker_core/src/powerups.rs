//! Purchasable power-ups.
//!
//! Double points is timed: buying it while it is already running cancels the
//! pending expiry and restarts the full duration (refresh, don't stack).
//! Passive income is permanent and raises the store's per-tick rate.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::config::Config;
use crate::effects::Effect;
use crate::error::Result;
use crate::store::ScoreStore;

#[derive(Default)]
struct DoubleState {
    // Bumped on every activation and cancel; a waking expiry only acts if it still matches
    generation: u64,
    expiry: Option<JoinHandle<()>>,
    expires_at: Option<Instant>,
}

pub struct PowerUps {
    store: Arc<ScoreStore>,
    runtime: Handle,
    double_cost: i64,
    double_duration: Duration,
    pps_cost: i64,
    pps_increment: i64,
    double: Arc<Mutex<DoubleState>>,
}

fn lock(double: &Mutex<DoubleState>) -> MutexGuard<'_, DoubleState> {
    double.lock().unwrap_or_else(PoisonError::into_inner)
}

impl PowerUps {
    pub fn new(store: Arc<ScoreStore>, config: &Config, runtime: Handle) -> Self {
        Self {
            store,
            runtime,
            double_cost: config.double_cost,
            double_duration: config.double_duration,
            pps_cost: config.pps_cost,
            pps_increment: config.pps_increment,
            double: Arc::new(Mutex::new(DoubleState::default())),
        }
    }

    /// Spend the double cost and switch clicks to Double for the configured
    /// duration. `on_expire` runs once the power-up lapses, after the click
    /// strategy is back to Identity.
    pub fn buy_double<F>(&self, on_expire: F) -> Result<()>
    where
        F: FnOnce() + Send + 'static,
    {
        let mut state = lock(&self.double);
        self.store.spend(self.double_cost)?;
        self.store.set_click_effect(Effect::Double)?;

        let refreshed = match state.expiry.take() {
            Some(pending) => {
                pending.abort();
                true
            }
            None => false,
        };
        state.generation += 1;
        state.expires_at = Some(Instant::now() + self.double_duration);

        let generation = state.generation;
        let duration = self.double_duration;
        let store = self.store.clone();
        let shared = self.double.clone();
        state.expiry = Some(self.runtime.spawn(async move {
            tokio::time::sleep(duration).await;
            {
                let mut state = lock(&shared);
                if state.generation != generation {
                    return;
                }
                state.expiry = None;
                state.expires_at = None;
                if let Err(err) = store.set_click_effect(Effect::Identity) {
                    tracing::error!(%err, "could not revert click strategy");
                }
            }
            tracing::info!("double points expired");
            on_expire();
        }));

        tracing::info!(
            refreshed,
            duration_secs = duration.as_secs(),
            "double points activated"
        );
        Ok(())
    }

    /// Spend the pps cost and permanently raise passive income. Returns the new rate.
    pub fn buy_passive(&self) -> Result<i64> {
        self.store.spend(self.pps_cost)?;
        let rate = self.store.add_passive_rate(self.pps_increment);
        tracing::info!(rate, "passive income upgraded");
        Ok(rate)
    }

    pub fn is_double_active(&self) -> bool {
        lock(&self.double).expiry.is_some()
    }

    /// Time left on the running double power-up
    pub fn double_remaining(&self) -> Option<Duration> {
        lock(&self.double)
            .expires_at
            .map(|at| at.saturating_duration_since(Instant::now()))
    }

    /// Drop any pending expiry. The click strategy is left as it is.
    pub fn cancel(&self) {
        let mut state = lock(&self.double);
        state.generation += 1;
        state.expires_at = None;
        if let Some(pending) = state.expiry.take() {
            pending.abort();
            tracing::debug!("pending double expiry cancelled");
        }
    }
}

impl Drop for PowerUps {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::GameRng;
    use crate::store::PointSource;
    use crate::ClickerError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn setup(score: i64) -> (Arc<ScoreStore>, PowerUps) {
        let config = Config::new();
        let store = Arc::new(ScoreStore::with_rng(&config, GameRng::new(1)));
        store.add_points(score, PointSource::Bonus);
        let power_ups = PowerUps::new(store.clone(), &config, Handle::current());
        (store, power_ups)
    }

    fn counter() -> (Arc<AtomicUsize>, impl FnOnce() + Send + 'static) {
        let fired = Arc::new(AtomicUsize::new(0));
        let hook = fired.clone();
        (fired, move || {
            hook.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[tokio::test(start_paused = true)]
    async fn test_buy_double_insufficient_funds() {
        let (store, power_ups) = setup(3);
        let result = power_ups.buy_double(|| {});
        assert_eq!(
            result,
            Err(ClickerError::InsufficientFunds { cost: 50, score: 3 })
        );
        assert_eq!(store.score(), 3);
        assert_eq!(store.click_effect(), Effect::Identity);
        assert!(!power_ups.is_double_active());
    }

    #[tokio::test(start_paused = true)]
    async fn test_double_expires_after_duration() {
        let (store, power_ups) = setup(50);
        let (fired, on_expire) = counter();

        power_ups.buy_double(on_expire).unwrap();
        assert_eq!(store.score(), 0);
        assert_eq!(store.click_effect(), Effect::Double);
        assert_eq!(power_ups.double_remaining(), Some(Duration::from_secs(20)));

        tokio::time::sleep(Duration::from_secs(19)).await;
        assert_eq!(store.click_effect(), Effect::Double, "Still active at 19s");
        assert_eq!(fired.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(store.click_effect(), Effect::Identity, "Reverted after 20s");
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert!(!power_ups.is_double_active());
    }

    #[tokio::test(start_paused = true)]
    async fn test_rebuying_double_refreshes_instead_of_stacking() {
        let (store, power_ups) = setup(100);
        let (first, first_hook) = counter();
        let (second, second_hook) = counter();

        power_ups.buy_double(first_hook).unwrap();
        tokio::time::sleep(Duration::from_secs(10)).await;
        power_ups.buy_double(second_hook).unwrap();
        assert_eq!(store.score(), 0, "Each purchase is paid for");

        // First expiry would have been at 20s
        tokio::time::sleep(Duration::from_secs(11)).await;
        assert_eq!(store.click_effect(), Effect::Double, "Refresh moved the expiry");
        assert_eq!(first.load(Ordering::SeqCst), 0, "Cancelled expiry never fires");

        // Refreshed expiry at 10s + 20s
        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(store.click_effect(), Effect::Identity);
        assert_eq!(second.load(Ordering::SeqCst), 1);
        assert_eq!(first.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_clicks_double_while_active() {
        let (store, power_ups) = setup(50);
        power_ups.buy_double(|| {}).unwrap();
        store.click();
        assert_eq!(store.score(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_prevents_expiry() {
        let (store, power_ups) = setup(50);
        let (fired, on_expire) = counter();
        power_ups.buy_double(on_expire).unwrap();

        power_ups.cancel();
        tokio::time::sleep(Duration::from_secs(30)).await;

        assert_eq!(fired.load(Ordering::SeqCst), 0);
        assert!(!power_ups.is_double_active());
        assert_eq!(store.click_effect(), Effect::Double, "Cancel does not revert");
    }

    #[tokio::test(start_paused = true)]
    async fn test_buy_passive() {
        let (store, power_ups) = setup(60);
        assert_eq!(power_ups.buy_passive(), Ok(1));
        assert_eq!(power_ups.buy_passive(), Ok(2));
        assert_eq!(store.score(), 0);
        assert_eq!(store.passive_rate(), 2);

        assert!(power_ups.buy_passive().is_err());
        assert_eq!(store.passive_rate(), 2, "Failed purchase changes nothing");
    }
}
