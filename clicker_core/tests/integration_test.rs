use clicker_core::*;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::runtime::Handle;

fn setup() -> (Config, Arc<ScoreStore>) {
    let config = Config::new().with_seed(12345);
    let store = Arc::new(ScoreStore::new(&config));
    (config, store)
}

#[tokio::test(start_paused = true)]
async fn test_click_then_buy_double_scenario() {
    let (config, store) = setup();
    let power_ups = PowerUps::new(store.clone(), &config, Handle::current());

    for _ in 0..3 {
        store.click();
    }
    assert_eq!(store.score(), 3);
    assert_eq!(store.clicks(), 3);

    // Not affordable yet
    let result = power_ups.buy_double(|| {});
    assert!(matches!(
        result,
        Err(ClickerError::InsufficientFunds { cost: 50, score: 3 })
    ));
    assert_eq!(store.score(), 3, "Failed purchase leaves score alone");

    store.add_points(47, PointSource::Bonus);
    assert_eq!(store.score(), 50);

    power_ups.buy_double(|| {}).unwrap();
    assert_eq!(store.score(), 0);
    assert_eq!(store.click_effect(), Effect::Double);

    store.click();
    assert_eq!(store.score(), 2);
    assert_eq!(store.clicks(), 4);
}

#[tokio::test(start_paused = true)]
async fn test_passive_income_scenario() {
    let (config, store) = setup();
    let power_ups = PowerUps::new(store.clone(), &config, Handle::current());
    let income = PassiveIncome::spawn(store.clone(), &config, &Handle::current());

    store.add_points(60, PointSource::Bonus);
    power_ups.buy_passive().unwrap();
    power_ups.buy_passive().unwrap();
    assert_eq!(store.passive_rate(), 2);
    assert_eq!(store.score(), 0);

    let clicks_before = store.clicks();
    tokio::time::sleep(Duration::from_millis(1050)).await;
    assert_eq!(store.score(), 2, "One tick pays exactly the rate");
    assert_eq!(store.clicks(), clicks_before, "No click counted for income");

    income.cancel();
}

#[tokio::test(start_paused = true)]
async fn test_observer_sees_clicks_income_and_spending_in_order() {
    let (config, store) = setup();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let id = store.subscribe(Arc::new(move |score: i64| sink.lock().unwrap().push(score)));

    let power_ups = PowerUps::new(store.clone(), &config, Handle::current());
    let _income = PassiveIncome::spawn(store.clone(), &config, &Handle::current());

    store.add_points(30, PointSource::Bonus);
    power_ups.buy_passive().unwrap();
    store.click();
    tokio::time::sleep(Duration::from_millis(1001)).await;

    assert_eq!(*seen.lock().unwrap(), vec![30, 0, 1, 2]);

    assert!(store.unsubscribe(id));
    tokio::time::sleep(Duration::from_secs(2)).await;
    assert_eq!(seen.lock().unwrap().len(), 4, "No notifications after unsubscribe");
    assert_eq!(store.score(), 4);
}

#[test]
fn test_engine_style_power_up_buttons() {
    let (_config, store) = setup();
    for _ in 0..10 {
        store.click();
    }

    assert_eq!(store.apply_effect(Some(Effect::Double)), Ok(12));
    assert_eq!(store.apply_effect(Some(Effect::Reset)), Ok(0));
    assert_eq!(store.apply_effect(None), Err(ClickerError::NoEffect));
    assert_eq!(store.score(), 0);
}

#[test]
fn test_random_bonus_click_strategy_is_reproducible() {
    let config = Config::new();
    let bonus = Effect::RandomBonus {
        lo: config.random_bonus_min,
        hi: config.random_bonus_max,
    };

    let run = || {
        let store = ScoreStore::with_rng(&config, GameRng::new(7));
        store.set_click_effect(bonus).unwrap();
        (0..20).map(|_| store.click()).collect::<Vec<_>>()
    };

    let first = run();
    assert_eq!(first, run(), "Seeded store replays the same bonuses");

    // Every click is worth 1..=4
    let mut prev = 0;
    for score in first {
        assert!((1..=4).contains(&(score - prev)));
        prev = score;
    }
}
