// src/io/summary.rs

//! Read-only views over the lifetime counters of a run.

use crate::model::product::Catalog;
use crate::simulation::state::RunState;

#[derive(Debug, Clone, PartialEq)]
pub struct ProfitRow {
    pub id: i32,
    pub name: String,
    pub sold: u64,
    pub revenue: f64,
    pub cogs: f64,
    pub orders_cost: f64,
    pub profit: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServiceLevel {
    /// Served over requested units; 1.0 when nothing was requested.
    pub fill_rate: f64,
    pub stockout_units: u64,
    /// Up to three products with the most stockout units, worst first.
    pub top_stockouts: Vec<(String, u64)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub day: u32,
    pub revenue: f64,
    pub cogs: f64,
    pub orders_cost: f64,
    pub profit: f64,
    pub service: ServiceLevel,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OpenOrderRow {
    pub po_id: u32,
    pub product_name: String,
    pub qty: u32,
    pub due_day: u32,
    pub days_left: u32,
}

/// The `k` most profitable products, best first. Ties keep catalog order.
pub fn top_products_by_profit(catalog: &Catalog, k: usize) -> Vec<ProfitRow> {
    let mut rows: Vec<ProfitRow> = catalog
        .iter()
        .map(|p| ProfitRow {
            id: p.id,
            name: p.name.clone(),
            sold: p.served,
            revenue: p.revenue,
            cogs: p.cogs,
            orders_cost: p.orders_cost,
            profit: p.profit(),
        })
        .collect();
    rows.sort_by(|a, b| b.profit.total_cmp(&a.profit));
    rows.truncate(k);
    rows
}

pub fn service_level(catalog: &Catalog) -> ServiceLevel {
    let requested: u64 = catalog.iter().map(|p| p.requested).sum();
    let served: u64 = catalog.iter().map(|p| p.served).sum();
    let stockout_units = catalog.iter().map(|p| p.stockouts).sum();

    let mut worst: Vec<(String, u64)> = catalog
        .iter()
        .filter(|p| p.stockouts > 0)
        .map(|p| (p.name.clone(), p.stockouts))
        .collect();
    worst.sort_by(|a, b| b.1.cmp(&a.1));
    worst.truncate(3);

    ServiceLevel {
        fill_rate: if requested == 0 {
            1.0
        } else {
            served as f64 / requested as f64
        },
        stockout_units,
        top_stockouts: worst,
    }
}

pub fn cumulative_summary(state: &RunState) -> Summary {
    let catalog = &state.catalog;
    let revenue = catalog.iter().map(|p| p.revenue).sum::<f64>();
    let cogs = catalog.iter().map(|p| p.cogs).sum::<f64>();
    let orders_cost = catalog.iter().map(|p| p.orders_cost).sum::<f64>();

    Summary {
        day: state.day,
        revenue,
        cogs,
        orders_cost,
        profit: revenue - cogs - orders_cost,
        service: service_level(catalog),
    }
}

/// Outstanding purchase orders in arrival order.
pub fn open_orders(state: &RunState) -> Vec<OpenOrderRow> {
    state
        .ledger
        .iter()
        .map(|order| OpenOrderRow {
            po_id: order.po_id,
            product_name: state
                .catalog
                .get(order.product_index)
                .map_or_else(|| "?".to_string(), |p| p.name.clone()),
            qty: order.qty,
            due_day: order.due_day,
            days_left: order.due_day.saturating_sub(state.day),
        })
        .collect()
}
