// src/strategy/traits.rs

use std::fmt::Debug;

/// Decides whether a product needs replenishing.
///
/// We require `Debug` so the simulation can be printed with its policy.
pub trait OrderPolicy: Debug + Send + Sync {
    /// Returns the quantity to order, or `None` to skip ordering today.
    ///
    /// # Arguments
    /// * `inventory_position` - On-hand stock plus units already on order.
    fn calculate_order(&self, inventory_position: i64) -> Option<u32>;
}
