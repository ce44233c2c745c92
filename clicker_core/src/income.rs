use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use crate::config::Config;
use crate::store::ScoreStore;

/// Background ticker paying the store's passive rate once per interval.
/// Aborted on `cancel` or drop.
pub struct PassiveIncome {
    task: JoinHandle<()>,
}

impl PassiveIncome {
    pub fn spawn(store: Arc<ScoreStore>, config: &Config, runtime: &Handle) -> Self {
        let period = config.passive_interval;
        let task = runtime.spawn(async move {
            // First payout one full period after start
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                store.tick_passive();
            }
        });
        tracing::debug!(period_ms = period.as_millis() as u64, "passive income ticker started");
        Self { task }
    }

    pub fn cancel(&self) {
        if !self.task.is_finished() {
            self.task.abort();
            tracing::debug!("passive income ticker stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }
}

impl Drop for PassiveIncome {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::GameRng;
    use crate::store::PointSource;
    use std::time::Duration;

    fn setup() -> (Arc<ScoreStore>, Config) {
        let config = Config::new();
        let store = Arc::new(ScoreStore::with_rng(&config, GameRng::new(1)));
        (store, config)
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_income_at_zero_rate() {
        let (store, config) = setup();
        let _income = PassiveIncome::spawn(store.clone(), &config, &Handle::current());

        tokio::time::sleep(Duration::from_millis(3500)).await;
        assert_eq!(store.score(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_pays_rate_each_second() {
        let (store, config) = setup();
        store.add_passive_rate(2);
        let _income = PassiveIncome::spawn(store.clone(), &config, &Handle::current());

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(store.score(), 0, "Nothing before the first full second");

        tokio::time::sleep(Duration::from_millis(600)).await;
        assert_eq!(store.score(), 2);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(store.score(), 6);
        assert_eq!(store.clicks(), 0, "Passive ticks are not clicks");
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_stops_ticks() {
        let (store, config) = setup();
        store.add_passive_rate(1);
        store.add_points(10, PointSource::Bonus);
        let income = PassiveIncome::spawn(store.clone(), &config, &Handle::current());

        tokio::time::sleep(Duration::from_millis(1100)).await;
        assert_eq!(store.score(), 11);

        income.cancel();
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(store.score(), 11, "No ticks after cancel");
        assert!(!income.is_running());
    }
}
