//! Ordering properties of the purchase-order ledger.

use minimarket_sim::model::ledger::{OrderLedger, PurchaseOrder};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Insert { product_index: usize, qty: u32, due_day: u32 },
    Pop(u32),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (0usize..4, 1u32..50, 0u32..20).prop_map(|(product_index, qty, due_day)| Op::Insert {
            product_index,
            qty,
            due_day
        }),
        1 => (0u32..20).prop_map(Op::Pop),
    ]
}

fn is_sorted(ledger: &OrderLedger) -> bool {
    let orders: Vec<&PurchaseOrder> = ledger.iter().collect();
    orders.windows(2).all(|w| w[0].due_day <= w[1].due_day)
}

proptest! {
    #[test]
    fn ledger_stays_sorted(ops in prop::collection::vec(op(), 0..80)) {
        let mut ledger = OrderLedger::new();
        let mut next_id = 1;
        for op in ops {
            match op {
                Op::Insert { product_index, qty, due_day } => {
                    ledger.insert(PurchaseOrder { po_id: next_id, product_index, qty, due_day, lead_time: 1 }).unwrap();
                    next_id += 1;
                }
                Op::Pop(day) => {
                    for order in ledger.pop_due_today(day) {
                        prop_assert_eq!(order.due_day, day);
                    }
                }
            }
            prop_assert!(is_sorted(&ledger));
        }
    }

    #[test]
    fn equal_due_days_keep_insertion_order(days in prop::collection::vec(0u32..5, 1..40)) {
        let mut ledger = OrderLedger::new();
        for (i, due_day) in days.iter().enumerate() {
            ledger.insert(PurchaseOrder { po_id: i as u32 + 1, product_index: 0, qty: 1, due_day: *due_day, lead_time: 1 }).unwrap();
        }

        let orders: Vec<&PurchaseOrder> = ledger.iter().collect();
        for w in orders.windows(2) {
            if w[0].due_day == w[1].due_day {
                prop_assert!(w[0].po_id < w[1].po_id);
            }
        }
    }

    #[test]
    fn outstanding_qty_counts_only_later_orders(
        orders in prop::collection::vec((0usize..3, 1u32..30, 1u32..15), 0..40),
        through in 0u32..15,
    ) {
        let mut ledger = OrderLedger::new();
        for (i, (product_index, qty, due_day)) in orders.iter().enumerate() {
            ledger.insert(PurchaseOrder {
                po_id: i as u32 + 1,
                product_index: *product_index,
                qty: *qty,
                due_day: *due_day,
                lead_time: 1,
            }).unwrap();
        }

        // Days before the first due day pop nothing; keep going through `through`.
        for day in 0..=through {
            let _ = ledger.pop_due_today(day).count();
        }

        for product in 0..3 {
            let expected: u64 = orders
                .iter()
                .filter(|(p, _, due)| *p == product && *due > through)
                .map(|(_, qty, _)| u64::from(*qty))
                .sum();
            prop_assert_eq!(ledger.outstanding_qty(product), expected);
        }
    }
}
