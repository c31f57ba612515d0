// src/simulation/engine.rs

use crate::error::Result;
use crate::io::checkpoint::CheckpointStore;
use crate::io::demand::{demand_lambda, sample_poisson, waste_units};
use crate::model::ledger::PurchaseOrder;
use crate::model::product::Sale;
use crate::simulation::facts::{DailyFact, Fact, FactSink, OrderFact, SaleFact};
use crate::simulation::state::RunState;
use crate::strategy::implementations::SqPolicy;
use crate::strategy::traits::OrderPolicy;
use rand::Rng;
use rand_distr::{Distribution, Uniform};
use tracing::{debug, info, warn};

/// Money and service totals for a single simulated day.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DayTotals {
    pub day: u32,
    pub revenue: f64,
    pub cogs: f64,
    pub orders_cost: f64,
    pub profit: f64,
    pub requested: u64,
    pub served: u64,
    pub stockouts: u64,
}

impl DayTotals {
    fn new(day: u32) -> Self {
        Self {
            day,
            ..Self::default()
        }
    }

    fn add_sale(&mut self, sale: &Sale, price: f64, base_cost: f64) {
        self.requested += u64::from(sale.requested);
        self.served += u64::from(sale.served);
        self.stockouts += u64::from(sale.shortage);
        self.revenue += f64::from(sale.served) * price;
        self.cogs += f64::from(sale.served) * base_cost;
    }

    /// Share of requested units that were served; 1.0 on a day without demand.
    pub fn fill_rate(&self) -> f64 {
        if self.requested == 0 {
            1.0
        } else {
            self.served as f64 / self.requested as f64
        }
    }

    fn to_fact(self) -> DailyFact {
        DailyFact {
            day: self.day,
            revenue: self.revenue,
            cogs: self.cogs,
            orders_cost: self.orders_cost,
            profit: self.profit,
            fill_rate: self.fill_rate(),
            stockout_units: self.stockouts,
        }
    }
}

/// Drives the store one day at a time.
pub struct StoreSimulation<R: Rng, S: FactSink> {
    pub state: RunState,

    // The "Brain" deciding when to reorder
    policy: Box<dyn OrderPolicy>,

    rng: R,
    sink: S,
    checkpoint: Option<CheckpointStore>,
}

impl<R: Rng, S: FactSink> StoreSimulation<R, S> {
    /// Uses the (s,Q) policy from the state's config and no checkpointing.
    pub fn new(state: RunState, rng: R, sink: S) -> Self {
        let policy = Box::new(SqPolicy::from_config(&state.config));
        Self {
            state,
            policy,
            rng,
            sink,
            checkpoint: None,
        }
    }

    /// Saves the state to `store` at the end of every day.
    pub fn with_checkpoint(mut self, store: CheckpointStore) -> Self {
        self.checkpoint = Some(store);
        self
    }

    pub fn with_policy(mut self, policy: Box<dyn OrderPolicy>) -> Self {
        self.policy = policy;
        self
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn run(&mut self, days: u32) -> Result<Vec<DayTotals>> {
        let mut totals = Vec::new();
        totals.try_reserve_exact(days as usize)?;
        for _ in 0..days {
            totals.push(self.step()?);
        }
        Ok(totals)
    }

    /// Simulates the next day.
    ///
    /// The config is checked and memory for the day is reserved before
    /// anything changes; if either fails the day is not started and the
    /// state is untouched.
    pub fn step(&mut self) -> Result<DayTotals> {
        self.state.config.validate()?;
        let product_count = self.state.catalog.len();
        self.state.ledger.reserve(product_count)?;
        let mut sales: Vec<Sale> = Vec::new();
        sales.try_reserve_exact(product_count)?;

        self.state.day += 1;
        let day = self.state.day;
        let mut totals = DayTotals::new(day);

        // =================================================================
        // PHASE 1: ARRIVALS
        // =================================================================
        let RunState {
            catalog, ledger, ..
        } = &mut self.state;
        for order in ledger.pop_due_today(day) {
            match catalog.get_mut(order.product_index) {
                Some(product) => {
                    product.receive_shipment(order.qty);
                    info!(
                        day,
                        po_id = order.po_id,
                        product = %product.name,
                        qty = order.qty,
                        "arrival"
                    );
                }
                None => warn!(
                    po_id = order.po_id,
                    index = order.product_index,
                    "arrival for unknown product dropped"
                ),
            }
        }

        // =================================================================
        // PHASE 2: DEMAND & SALES
        // =================================================================
        for product in self.state.catalog.iter_mut() {
            let requested = sample_poisson(&mut self.rng, demand_lambda(product));
            let sale = product.sell(requested);
            totals.add_sale(&sale, product.price, product.base_cost);
            debug!(day, product = %product.name, requested, served = sale.served, "demand");
            sales.push(sale);
        }

        // =================================================================
        // PHASE 3: WASTE
        // =================================================================
        for (product, sale) in self.state.catalog.iter_mut().zip(&sales) {
            let spoiled = waste_units(&mut self.rng, product);
            let waste = product.spoil(spoiled);

            if sale.shortage > 0 {
                info!(day, product = %product.name, short = sale.shortage, "stockout");
            }
            if waste > 0 {
                info!(day, product = %product.name, waste, "perishables discarded");
            }

            self.sink.record(Fact::Sale(SaleFact {
                day,
                product_id: product.id,
                product_name: product.name.clone(),
                unit_price: product.price,
                requested: sale.requested,
                served: sale.served,
                shortage: sale.shortage,
                waste,
            }));
        }

        // =================================================================
        // PHASE 4: REORDERS
        // =================================================================
        let lead_times = Uniform::from(self.state.config.lead_time_range());
        let order_cost = self.state.config.order_cost_fixed;
        for index in 0..product_count {
            let position = self.state.inventory_position(index);
            let Some(qty) = self.policy.calculate_order(position) else {
                continue;
            };

            let lead_time = lead_times.sample(&mut self.rng);
            let order = PurchaseOrder {
                po_id: self.state.next_po_id,
                product_index: index,
                qty,
                due_day: day + lead_time,
                lead_time,
            };
            self.state.ledger.insert(order)?;
            self.state.next_po_id += 1;
            totals.orders_cost += order_cost;

            if let Some(product) = self.state.catalog.get_mut(index) {
                product.book_order_cost(order_cost);
                info!(
                    day,
                    po_id = order.po_id,
                    product = %product.name,
                    qty,
                    eta = order.due_day,
                    "reorder placed"
                );
                self.sink.record(Fact::Order(OrderFact {
                    po_id: order.po_id,
                    day_placed: day,
                    product_id: product.id,
                    product_name: product.name.clone(),
                    qty,
                    due_day: order.due_day,
                    lead_time,
                    order_cost,
                }));
            }
        }

        // =================================================================
        // PHASE 5: CLOSE
        // =================================================================
        totals.profit = totals.revenue - totals.cogs - totals.orders_cost;
        info!(
            day,
            revenue = totals.revenue,
            cogs = totals.cogs,
            orders = totals.orders_cost,
            profit = totals.profit,
            fill_rate = totals.fill_rate(),
            "day closed"
        );
        self.sink.record(Fact::Daily(totals.to_fact()));
        self.save_checkpoint();

        Ok(totals)
    }

    /// Best-effort save; failures are logged and the run carries on.
    pub fn save_checkpoint(&self) -> bool {
        let Some(store) = &self.checkpoint else {
            return false;
        };
        match store.save(&self.state) {
            Ok(()) => true,
            Err(e) => {
                warn!(path = %store.path().display(), error = %e, "checkpoint save failed");
                false
            }
        }
    }

    /// Starts the run over: counters zeroed, ledger emptied, day 0,
    /// next order id 1, checkpoint deleted. Safe to call repeatedly.
    pub fn reset(&mut self) -> Result<()> {
        self.state.reset();
        self.sink.reset();
        if let Some(store) = &self.checkpoint {
            store.discard()?;
        }
        info!("simulation reset");
        Ok(())
    }

    /// Graceful shutdown: persist the current state.
    pub fn shutdown(self) -> (RunState, S) {
        self.save_checkpoint();
        (self.state, self.sink)
    }
}
