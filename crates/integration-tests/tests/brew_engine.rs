//! Brew Engine Integration Tests
//!
//! Drives the orchestrator against real equipment pools and checks the
//! batch-level guarantees: result subsets, recipe fidelity, equipment
//! capacity, cancellation and metric accounting.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use std::time::{Duration, Instant};

use brewline_core::application::{BrewOrchestrator, EquipmentRegistry, OrderMetrics};
use brewline_core::domain::{DrinkType, EquipmentType, Order, OrderResult, ShopConfig};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio_util::sync::CancellationToken;

const MENU: [DrinkType; 4] = [
    DrinkType::Espresso,
    DrinkType::Latte,
    DrinkType::Frappe,
    DrinkType::Matcha,
];

struct Shop {
    config: ShopConfig,
    registry: Arc<EquipmentRegistry>,
    orchestrator: BrewOrchestrator,
}

impl Shop {
    async fn open(config: ShopConfig) -> Self {
        let registry = Arc::new(EquipmentRegistry::from_config(&config));
        registry.start_all().await;
        let orchestrator = BrewOrchestrator::new(
            registry.clone(),
            Arc::new(config.catalog.clone()),
            Arc::new(OrderMetrics::new(config.metrics_window)),
        );
        Self {
            config,
            registry,
            orchestrator,
        }
    }

    async fn close(self) {
        self.registry.stop_all().await;
    }

    /// Every result belongs to the batch, appears once, and follows its recipe
    fn assert_valid_results(&self, orders: &[Order], results: &[OrderResult]) {
        assert!(results.len() <= orders.len());

        let drinks: BTreeMap<_, _> = orders.iter().map(|o| (o.id, o.drink)).collect();
        let mut seen = HashSet::new();

        for result in results {
            assert!(seen.insert(result.order_id), "duplicate result {}", result.order_id);
            let drink = drinks
                .get(&result.order_id)
                .unwrap_or_else(|| panic!("result {} was never ordered", result.order_id));

            let recipe = self.config.catalog.get(*drink).expect("only known drinks complete");
            let expected: Vec<_> = recipe.equipment().collect();
            let actual: Vec<_> = result.steps.iter().map(|s| s.equipment).collect();
            assert_eq!(actual, expected, "order {}", result.order_id);

            for step in &result.steps {
                assert!(step.end_ms >= step.start_ms);
                assert!(step.held.start_ms >= step.start_ms);
                assert!(step.held.end_ms <= step.end_ms);
            }
            for pair in result.steps.windows(2) {
                assert!(pair[1].start_ms >= pair[0].end_ms, "steps of one order overlap");
            }
        }
    }
}

fn random_orders(rng: &mut StdRng, count: i64) -> Vec<Order> {
    (1..=count)
        .map(|id| Order::new(id, MENU[rng.gen_range(0..MENU.len())]))
        .collect()
}

/// Highest number of units of each equipment type held at once across `results`
fn peak_usage(results: &[OrderResult]) -> BTreeMap<EquipmentType, usize> {
    let mut events: BTreeMap<EquipmentType, Vec<(i64, i32)>> = BTreeMap::new();
    for step in results.iter().flat_map(|r| r.steps.iter()) {
        let timeline = events.entry(step.equipment).or_default();
        timeline.push((step.held.start_ms, 1));
        timeline.push((step.held.end_ms, -1));
    }

    events
        .into_iter()
        .map(|(equipment, mut timeline)| {
            // A hold ending at t frees the unit for one starting at t
            timeline.sort();
            let mut current = 0i32;
            let mut peak = 0i32;
            for (_, delta) in timeline {
                current += delta;
                peak = peak.max(current);
            }
            (equipment, peak as usize)
        })
        .collect()
}

#[tokio::test]
async fn test_single_latte_takes_full_recipe_time() {
    let shop = Shop::open(ShopConfig::uniform(1)).await;
    let orders = vec![Order::new(1, DrinkType::Latte)];

    let results = shop
        .orchestrator
        .execute_brew(&CancellationToken::new(), orders.clone(), 1)
        .await;

    assert_eq!(results.len(), 1);
    shop.assert_valid_results(&orders, &results);
    assert_eq!(results[0].steps.len(), 3);
    assert!(results[0].latency_ms().unwrap() >= 28);

    shop.close().await;
}

#[tokio::test]
async fn test_single_grinder_serializes_two_baristas() {
    let shop = Shop::open(ShopConfig::default().with_workers(EquipmentType::Grinder, 1)).await;
    let orders = vec![
        Order::new(1, DrinkType::Espresso),
        Order::new(2, DrinkType::Espresso),
    ];

    let results = shop
        .orchestrator
        .execute_brew(&CancellationToken::new(), orders.clone(), 2)
        .await;

    assert_eq!(results.len(), 2);
    shop.assert_valid_results(&orders, &results);

    let mut grinder: Vec<_> = results
        .iter()
        .flat_map(|r| r.steps.iter())
        .filter(|s| s.equipment == EquipmentType::Grinder)
        .collect();
    grinder.sort_by_key(|s| s.held.start_ms);
    assert_eq!(grinder.len(), 2);
    assert!(
        grinder[1].held.start_ms >= grinder[0].held.end_ms,
        "grinder steps overlap: {:?}",
        grinder
    );

    shop.close().await;
}

#[tokio::test]
async fn test_equipment_capacity_never_exceeded() {
    let shop = Shop::open(ShopConfig::default()).await;
    let mut rng = StdRng::seed_from_u64(7);
    let orders = random_orders(&mut rng, 24);

    let results = shop
        .orchestrator
        .execute_brew(&CancellationToken::new(), orders.clone(), 8)
        .await;

    assert_eq!(results.len(), orders.len());
    shop.assert_valid_results(&orders, &results);

    for (equipment, peak) in peak_usage(&results) {
        let workers = shop.config.equipment_workers[&equipment];
        assert!(
            peak <= workers,
            "{} used {} units at once, has {}",
            equipment,
            peak,
            workers
        );
    }

    shop.close().await;
}

#[tokio::test]
async fn test_sequential_batches_count_exactly() {
    let shop = Shop::open(ShopConfig::default()).await;
    let metrics = shop.orchestrator.metrics().clone();
    let mut rng = StdRng::seed_from_u64(42);

    let mut expected_completed = 0u64;
    for batch in 1..=2u64 {
        let orders = random_orders(&mut rng, 10);
        // Far more baristas than any pool has workers
        let results = shop
            .orchestrator
            .execute_brew(&CancellationToken::new(), orders.clone(), 64)
            .await;

        shop.assert_valid_results(&orders, &results);
        expected_completed += results.len() as u64;

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.total_batches, batch);
        assert_eq!(snapshot.total_orders_submitted, batch * 10);
        assert_eq!(snapshot.total_orders_completed, expected_completed);
    }

    assert_eq!(expected_completed, 20);
    assert!(metrics.p90_latency_ms() >= 13);
    shop.close().await;
}

#[tokio::test]
async fn test_immediate_cancel_returns_promptly() {
    let shop = Shop::open(ShopConfig::default()).await;
    let token = CancellationToken::new();
    token.cancel();

    let mut rng = StdRng::seed_from_u64(1);
    let orders = random_orders(&mut rng, 100);

    let started = Instant::now();
    let outcome = shop
        .orchestrator
        .execute_brew_detailed(&token, orders, 16)
        .await;

    assert!(started.elapsed() < Duration::from_millis(200));
    assert!(outcome.results.is_empty());
    assert_eq!(outcome.cancelled + outcome.abandoned, 100);
    assert_eq!(shop.orchestrator.metrics().total_completed(), 0);

    shop.close().await;
}

#[tokio::test]
async fn test_deadline_yields_valid_partial_batch() {
    let shop = Shop::open(ShopConfig::uniform(1)).await;
    let orders: Vec<_> = (1..=40).map(|id| Order::new(id, DrinkType::Latte)).collect();

    let token = CancellationToken::new();
    let deadline = {
        let token = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(60)).await;
            token.cancel();
        })
    };

    let started = Instant::now();
    let outcome = shop
        .orchestrator
        .execute_brew_detailed(&token, orders.clone(), 2)
        .await;
    deadline.await.unwrap();

    // 40 lattes through one milk steamer need well over a second
    assert!(started.elapsed() < Duration::from_millis(500));
    assert!(outcome.completed() < orders.len());
    assert_eq!(
        outcome.completed() + outcome.abandoned + outcome.cancelled,
        orders.len()
    );
    shop.assert_valid_results(&orders, &outcome.results);

    shop.close().await;
}

#[tokio::test]
async fn test_unknown_drinks_are_abandoned_not_fatal() {
    let shop = Shop::open(ShopConfig::default()).await;
    let orders = vec![
        Order::new(1, DrinkType::Unspecified),
        Order::new(2, DrinkType::Matcha),
        Order::new(3, DrinkType::Unspecified),
        Order::new(4, DrinkType::Espresso),
    ];

    let outcome = shop
        .orchestrator
        .execute_brew_detailed(&CancellationToken::new(), orders.clone(), 2)
        .await;

    let ids: HashSet<_> = outcome.results.iter().map(|r| r.order_id).collect();
    assert_eq!(ids, HashSet::from([2, 4]));
    assert_eq!(outcome.abandoned, 2);
    shop.assert_valid_results(&orders, &outcome.results);

    shop.close().await;
}

#[tokio::test]
async fn test_concurrent_batches_share_equipment() {
    let shop = Shop::open(ShopConfig::default()).await;
    let mut rng = StdRng::seed_from_u64(99);
    let first = random_orders(&mut rng, 12);
    let second: Vec<_> = random_orders(&mut rng, 12)
        .into_iter()
        .map(|o| Order::new(o.id + 100, o.drink))
        .collect();

    let token = CancellationToken::new();
    let (a, b) = futures::join!(
        shop.orchestrator.execute_brew(&token, first.clone(), 4),
        shop.orchestrator.execute_brew(&token, second.clone(), 4),
    );

    assert_eq!(a.len(), first.len());
    assert_eq!(b.len(), second.len());
    shop.assert_valid_results(&first, &a);
    shop.assert_valid_results(&second, &b);

    let all: Vec<_> = a.into_iter().chain(b).collect();
    for (equipment, peak) in peak_usage(&all) {
        assert!(peak <= shop.config.equipment_workers[&equipment]);
    }
    assert_eq!(shop.orchestrator.metrics().total_batches(), 2);

    shop.close().await;
}

#[tokio::test]
async fn test_stop_all_mid_batch_drains_pools() {
    let shop = Shop::open(ShopConfig::uniform(1)).await;
    let orders: Vec<_> = (1..=40).map(|id| Order::new(id, DrinkType::Latte)).collect();

    let token = CancellationToken::new();
    let (outcome, stopped) = futures::join!(
        shop.orchestrator.execute_brew_detailed(&token, orders.clone(), 2),
        async {
            tokio::time::sleep(Duration::from_millis(40)).await;
            tokio::time::timeout(Duration::from_secs(1), shop.registry.stop_all()).await
        },
    );

    assert!(stopped.is_ok(), "stop_all must return while a batch is running");
    assert!(!token.is_cancelled());
    assert!(outcome.completed() < orders.len());
    assert!(outcome.abandoned > 0);
    assert_eq!(
        outcome.completed() + outcome.abandoned + outcome.cancelled,
        orders.len()
    );
    // Whatever came back ran every step in full
    shop.assert_valid_results(&orders, &outcome.results);
    let latte = shop.config.catalog.get(DrinkType::Latte).unwrap();
    for result in &outcome.results {
        for (step, recipe_step) in result.steps.iter().zip(latte.steps()) {
            let nominal = recipe_step.duration.as_millis() as i64;
            assert!(step.held.end_ms - step.held.start_ms >= nominal - 1);
        }
    }

    shop.close().await;
}
