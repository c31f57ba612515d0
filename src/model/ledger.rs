// src/model/ledger.rs

use serde::{Deserialize, Serialize};
use std::collections::vec_deque::{Drain, Iter};
use std::collections::{TryReserveError, VecDeque};

/// An outstanding replenishment order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseOrder {
    pub po_id: u32,
    /// Position of the product in the catalog.
    pub product_index: usize,
    pub qty: u32,
    /// Absolute simulated day the goods arrive.
    pub due_day: u32,
    pub lead_time: u32,
}

/// Outstanding purchase orders, kept sorted by due day.
///
/// Orders sharing a due day stay in insertion order, so the ledger never
/// needs re-sorting and everything due today sits at the front.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderLedger {
    orders: VecDeque<PurchaseOrder>,
}

impl OrderLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Places the order after every entry due on or before its due day.
    pub fn insert(&mut self, order: PurchaseOrder) -> Result<(), TryReserveError> {
        self.orders.try_reserve(1)?;
        let at = self
            .orders
            .partition_point(|existing| existing.due_day <= order.due_day);
        self.orders.insert(at, order);
        Ok(())
    }

    /// Makes room for `additional` orders up front, so later inserts
    /// cannot fail halfway through a day.
    pub fn reserve(&mut self, additional: usize) -> Result<(), TryReserveError> {
        self.orders.try_reserve(additional)
    }

    /// Removes and yields every order due on `day`, in ledger order.
    pub fn pop_due_today(&mut self, day: u32) -> Drain<'_, PurchaseOrder> {
        let due = self
            .orders
            .iter()
            .take_while(|order| order.due_day == day)
            .count();
        self.orders.drain(..due)
    }

    /// Units on order but not yet arrived for one product.
    pub fn outstanding_qty(&self, product_index: usize) -> u64 {
        self.orders
            .iter()
            .filter(|order| order.product_index == product_index)
            .map(|order| u64::from(order.qty))
            .sum()
    }

    pub fn iter(&self) -> Iter<'_, PurchaseOrder> {
        self.orders.iter()
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    pub fn clear(&mut self) {
        self.orders.clear();
    }

    /// Highest id currently outstanding, if any.
    pub fn max_po_id(&self) -> Option<u32> {
        self.orders.iter().map(|order| order.po_id).max()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn po(po_id: u32, due_day: u32) -> PurchaseOrder {
        PurchaseOrder {
            po_id,
            product_index: 0,
            qty: 10,
            due_day,
            lead_time: 2,
        }
    }

    fn ids(ledger: &OrderLedger) -> Vec<u32> {
        ledger.iter().map(|o| o.po_id).collect()
    }

    #[test]
    fn insert_keeps_due_day_order_with_fifo_ties() {
        let mut ledger = OrderLedger::new();
        ledger.insert(po(1, 5)).unwrap();
        ledger.insert(po(2, 3)).unwrap();
        ledger.insert(po(3, 5)).unwrap();
        ledger.insert(po(4, 4)).unwrap();
        ledger.insert(po(5, 3)).unwrap();

        assert_eq!(ids(&ledger), vec![2, 5, 4, 1, 3]);
    }

    #[test]
    fn pop_due_today_takes_only_the_matching_head() {
        let mut ledger = OrderLedger::new();
        ledger.insert(po(1, 3)).unwrap();
        ledger.insert(po(2, 3)).unwrap();
        ledger.insert(po(3, 4)).unwrap();

        let popped: Vec<u32> = ledger.pop_due_today(3).map(|o| o.po_id).collect();
        assert_eq!(popped, vec![1, 2]);
        assert_eq!(ids(&ledger), vec![3]);

        assert_eq!(ledger.pop_due_today(3).count(), 0);
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn outstanding_qty_sums_per_product() {
        let mut ledger = OrderLedger::new();
        ledger.insert(po(1, 3)).unwrap();
        ledger
            .insert(PurchaseOrder {
                product_index: 1,
                ..po(2, 4)
            })
            .unwrap();
        ledger.insert(po(3, 6)).unwrap();

        assert_eq!(ledger.outstanding_qty(0), 20);
        assert_eq!(ledger.outstanding_qty(1), 10);
        assert_eq!(ledger.outstanding_qty(2), 0);
    }
}
