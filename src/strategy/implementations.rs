// src/strategy/implementations.rs

use crate::simulation::config::Config;
use crate::strategy::traits::OrderPolicy;

/// Continuous-review (s,Q) policy.
///
/// Whenever the inventory position drops to the reorder point `s` or below,
/// order a fixed batch of `Q` units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SqPolicy {
    reorder_point: i64,
    order_quantity: u32,
}

impl SqPolicy {
    pub fn new(reorder_point: i64, order_quantity: u32) -> Self {
        Self {
            reorder_point,
            order_quantity,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.reorder_point, config.order_quantity)
    }
}

impl OrderPolicy for SqPolicy {
    fn calculate_order(&self, inventory_position: i64) -> Option<u32> {
        (inventory_position <= self.reorder_point).then_some(self.order_quantity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn orders_at_or_below_reorder_point() {
        let policy = SqPolicy::new(15, 40);
        assert_eq!(policy.calculate_order(15), Some(40));
        assert_eq!(policy.calculate_order(0), Some(40));
        assert_eq!(policy.calculate_order(16), None);
    }
}
