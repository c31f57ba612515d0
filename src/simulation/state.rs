// src/simulation/state.rs

use crate::model::ledger::OrderLedger;
use crate::model::product::Catalog;
use crate::simulation::config::Config;

/// Everything a run needs to resume: the unit of checkpointing.
#[derive(Debug, Clone, PartialEq)]
pub struct RunState {
    pub config: Config,
    /// Last completed day; 0 before the first day runs.
    pub day: u32,
    /// Id handed to the next purchase order. Ids are never reused.
    pub next_po_id: u32,
    pub catalog: Catalog,
    pub ledger: OrderLedger,
}

impl RunState {
    /// A fresh run: day 0, no orders outstanding.
    pub fn new(config: Config, catalog: Catalog) -> Self {
        Self {
            config,
            day: 0,
            next_po_id: 1,
            catalog,
            ledger: OrderLedger::new(),
        }
    }

    /// Stock on hand plus units on order for the product at `index`.
    pub fn inventory_position(&self, index: usize) -> i64 {
        let on_hand = self
            .catalog
            .get(index)
            .map_or(0, |product| i64::from(product.stock));
        let on_order = i64::try_from(self.ledger.outstanding_qty(index)).unwrap_or(i64::MAX);
        on_hand.saturating_add(on_order)
    }

    /// Zeroes every lifetime counter and forgets outstanding orders.
    /// Stock levels are left as they are.
    pub fn reset(&mut self) {
        self.catalog.reset_counters();
        self.ledger.clear();
        self.day = 0;
        self.next_po_id = 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ledger::PurchaseOrder;

    #[test]
    fn reset_is_idempotent() {
        let mut state = RunState::new(Config::default(), Catalog::demo());
        state.day = 12;
        state.next_po_id = 9;
        state.catalog.get_mut(0).unwrap().sell(3);
        state
            .ledger
            .insert(PurchaseOrder {
                po_id: 8,
                product_index: 0,
                qty: 40,
                due_day: 14,
                lead_time: 2,
            })
            .unwrap();

        state.reset();
        let once = state.clone();
        state.reset();

        assert_eq!(state, once);
        assert_eq!(state.day, 0);
        assert_eq!(state.next_po_id, 1);
        assert!(state.ledger.is_empty());
        assert_eq!(state.catalog.get(0).unwrap().requested, 0);
    }

    #[test]
    fn inventory_position_includes_orders_in_transit() {
        let mut state = RunState::new(Config::default(), Catalog::demo());
        state
            .ledger
            .insert(PurchaseOrder {
                po_id: 1,
                product_index: 3,
                qty: 40,
                due_day: 3,
                lead_time: 3,
            })
            .unwrap();

        assert_eq!(state.inventory_position(3), 15 + 40);
        assert_eq!(state.inventory_position(1), 40);
    }
}
