// src/simulation/facts.rs

use serde::Serialize;

/// Demand, sales and spoilage of one product on one day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SaleFact {
    pub day: u32,
    pub product_id: i32,
    pub product_name: String,
    pub unit_price: f64,
    pub requested: u32,
    pub served: u32,
    pub shortage: u32,
    pub waste: u32,
}

impl SaleFact {
    pub fn revenue(&self) -> f64 {
        f64::from(self.served) * self.unit_price
    }
}

/// A purchase order placed by the reorder phase.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderFact {
    pub po_id: u32,
    pub day_placed: u32,
    pub product_id: i32,
    pub product_name: String,
    pub qty: u32,
    pub due_day: u32,
    pub lead_time: u32,
    pub order_cost: f64,
}

/// End-of-day financial and service totals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyFact {
    pub day: u32,
    pub revenue: f64,
    pub cogs: f64,
    pub orders_cost: f64,
    pub profit: f64,
    pub fill_rate: f64,
    pub stockout_units: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Fact {
    Sale(SaleFact),
    Order(OrderFact),
    Daily(DailyFact),
}

/// Receives the facts a simulated day produces, e.g. an audit log.
pub trait FactSink {
    fn record(&mut self, fact: Fact);

    /// Called when the run is reset; sinks holding history drop it here.
    fn reset(&mut self) {}
}

/// Collects facts in memory.
impl FactSink for Vec<Fact> {
    fn record(&mut self, fact: Fact) {
        self.push(fact);
    }

    fn reset(&mut self) {
        self.clear();
    }
}

/// A missing sink (e.g. a log file that could not be opened) drops facts.
impl<T: FactSink> FactSink for Option<T> {
    fn record(&mut self, fact: Fact) {
        if let Some(sink) = self {
            sink.record(fact);
        }
    }

    fn reset(&mut self) {
        if let Some(sink) = self {
            sink.reset();
        }
    }
}

/// Discards everything.
impl FactSink for () {
    fn record(&mut self, _fact: Fact) {}
}
