//! Day-cycle behaviour observed through the facts it emits.

use minimarket_sim::model::product::{Catalog, Product, ProductFlags};
use minimarket_sim::simulation::facts::{Fact, OrderFact, SaleFact};
use minimarket_sim::{Config, RunState, StoreSimulation};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn simulation(catalog: Catalog, config: Config, seed: u64) -> StoreSimulation<StdRng, Vec<Fact>> {
    StoreSimulation::new(
        RunState::new(config, catalog),
        StdRng::seed_from_u64(seed),
        Vec::new(),
    )
}

fn sales_on(facts: &[Fact], day: u32) -> Vec<&SaleFact> {
    facts
        .iter()
        .filter_map(|f| match f {
            Fact::Sale(s) if s.day == day => Some(s),
            _ => None,
        })
        .collect()
}

fn orders_on(facts: &[Fact], day: u32) -> Vec<&OrderFact> {
    facts
        .iter()
        .filter_map(|f| match f {
            Fact::Order(o) if o.day_placed == day => Some(o),
            _ => None,
        })
        .collect()
}

#[test]
fn served_never_exceeds_requested_or_stock() {
    let mut sim = simulation(Catalog::demo(), Config::default(), 1);

    for _ in 0..60 {
        let stock_before: Vec<u32> = sim.state.catalog.iter().map(|p| p.stock).collect();
        let arrivals_due: Vec<u32> = (0..stock_before.len())
            .map(|i| {
                sim.state
                    .ledger
                    .iter()
                    .filter(|o| o.product_index == i && o.due_day == sim.state.day + 1)
                    .map(|o| o.qty)
                    .sum()
            })
            .collect();

        let day = sim.step().unwrap().day;

        for (i, sale) in sales_on(sim.sink(), day).iter().enumerate() {
            assert!(sale.served <= sale.requested);
            assert!(sale.served <= stock_before[i] + arrivals_due[i]);
            assert_eq!(sale.shortage, sale.requested - sale.served);
        }
    }
}

#[test]
fn stock_balances_every_day() {
    let mut sim = simulation(Catalog::demo(), Config::default(), 2);

    for _ in 0..60 {
        let next_day = sim.state.day + 1;
        let before: Vec<u32> = sim.state.catalog.iter().map(|p| p.stock).collect();
        let arrivals: Vec<u32> = (0..before.len())
            .map(|i| {
                sim.state
                    .ledger
                    .iter()
                    .filter(|o| o.product_index == i && o.due_day == next_day)
                    .map(|o| o.qty)
                    .sum()
            })
            .collect();

        sim.step().unwrap();

        let sales = sales_on(sim.sink(), next_day);
        for (i, product) in sim.state.catalog.iter().enumerate() {
            let expected = before[i] + arrivals[i] - sales[i].served - sales[i].waste;
            assert_eq!(product.stock, expected, "product {} on day {}", product.name, next_day);
        }
    }
}

#[test]
fn empty_shelf_turns_all_demand_into_stockouts() {
    let catalog = Catalog::new(vec![Product::new(
        9,
        "Ghost",
        1.0,
        1.0,
        0,
        ProductFlags::default(),
    )])
    .unwrap();
    // Orders never arrive within the test window
    let config = Config {
        lead_min: 100,
        lead_max: 100,
        ..Config::default()
    };
    let mut sim = simulation(catalog, config, 3);
    sim.run(30).unwrap();

    let product = sim.state.catalog.get(0).unwrap();
    assert_eq!(product.served, 0);
    assert_eq!(product.stockouts, product.requested);
    assert!(product.requested > 0);
}

#[test]
fn reorders_exactly_at_or_below_reorder_point() {
    let config = Config::default();
    let mut sim = simulation(Catalog::demo(), config.clone(), 4);

    for _ in 0..60 {
        let day = sim.step().unwrap().day;
        let orders = orders_on(sim.sink(), day);

        for (index, product) in sim.state.catalog.iter().enumerate() {
            let position = sim.state.inventory_position(index);
            let ordered = orders.iter().any(|o| o.product_id == product.id);
            if ordered {
                let before = position - i64::from(config.order_quantity);
                assert!(before <= config.reorder_point);
            } else {
                assert!(position > config.reorder_point);
            }
        }
    }
}

#[test]
fn order_arrives_on_its_due_day() {
    let config = Config {
        reorder_point: 10_000,
        lead_min: 3,
        lead_max: 3,
        ..Config::default()
    };
    let mut sim = simulation(Catalog::demo(), config, 5);
    sim.run(10).unwrap();

    let placed = orders_on(sim.sink(), 10)[0].clone();
    assert_eq!(placed.due_day, 13);
    assert_eq!(placed.lead_time, 3);
    assert!(sim.state.ledger.iter().any(|o| o.po_id == placed.po_id));

    sim.run(3).unwrap();
    assert_eq!(sim.state.day, 13);
    assert!(sim.state.ledger.iter().all(|o| o.po_id != placed.po_id));
    assert!(sim.state.ledger.iter().all(|o| o.due_day > 13));
}

#[test]
fn lifetime_counters_only_grow() {
    let mut sim = simulation(Catalog::demo(), Config::default(), 6);
    let mut previous = sim.state.catalog.clone();

    for _ in 0..40 {
        sim.step().unwrap();
        for (old, new) in previous.iter().zip(sim.state.catalog.iter()) {
            assert!(new.requested >= old.requested);
            assert!(new.served >= old.served);
            assert!(new.stockouts >= old.stockouts);
            assert!(new.waste_units >= old.waste_units);
            assert!(new.revenue >= old.revenue);
            assert!(new.cogs >= old.cogs);
            assert!(new.orders_cost >= old.orders_cost);
        }
        previous = sim.state.catalog.clone();
    }
}

#[test]
fn po_ids_increase_and_are_never_reused() {
    let config = Config {
        reorder_point: 10_000,
        ..Config::default()
    };
    let mut sim = simulation(Catalog::demo(), config, 7);
    sim.run(15).unwrap();

    let ids: Vec<u32> = sim
        .sink()
        .iter()
        .filter_map(|f| match f {
            Fact::Order(o) => Some(o.po_id),
            _ => None,
        })
        .collect();
    assert_eq!(ids.len(), 60);
    assert!(ids.windows(2).all(|w| w[1] == w[0] + 1));
    assert_eq!(ids[0], 1);
}

#[test]
fn daily_fact_matches_returned_totals() {
    let mut sim = simulation(Catalog::demo(), Config::default(), 8);
    let totals = sim.step().unwrap();

    let Some(Fact::Daily(daily)) = sim.sink().last() else {
        panic!("day must close with a daily fact");
    };
    assert_eq!(daily.day, totals.day);
    assert_eq!(daily.profit, totals.profit);
    assert_eq!(daily.fill_rate, totals.fill_rate());
    assert_eq!(daily.stockout_units, totals.stockouts);
}

#[test]
fn same_seed_same_run() {
    let mut a = simulation(Catalog::demo(), Config::default(), 99);
    let mut b = simulation(Catalog::demo(), Config::default(), 99);
    a.run(25).unwrap();
    b.run(25).unwrap();

    assert_eq!(a.state, b.state);
    assert_eq!(a.sink(), b.sink());
}
