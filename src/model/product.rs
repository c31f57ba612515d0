// src/model/product.rs

use crate::error::{Result, SimError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Upper bound on catalog size, shared with the checkpoint reader.
pub const MAX_PRODUCTS: usize = 128;

/// Independent product attributes.
///
/// The numeric form (`bits`) matches the legacy catalog files:
/// 1 = perishable, 2 = on sale, 4 = tax exempt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductFlags {
    pub perishable: bool,
    pub on_sale: bool,
    /// Carried through config and checkpoints; no amount is ever taxed.
    pub tax_exempt: bool,
}

impl ProductFlags {
    pub const PERISHABLE: u32 = 0x01;
    pub const ON_SALE: u32 = 0x02;
    pub const TAX_EXEMPT: u32 = 0x04;

    pub fn from_bits(bits: u32) -> Self {
        Self {
            perishable: bits & Self::PERISHABLE != 0,
            on_sale: bits & Self::ON_SALE != 0,
            tax_exempt: bits & Self::TAX_EXEMPT != 0,
        }
    }

    pub fn bits(&self) -> u32 {
        let mut bits = 0;
        if self.perishable {
            bits |= Self::PERISHABLE;
        }
        if self.on_sale {
            bits |= Self::ON_SALE;
        }
        if self.tax_exempt {
            bits |= Self::TAX_EXEMPT;
        }
        bits
    }

    pub fn perishable() -> Self {
        Self {
            perishable: true,
            ..Self::default()
        }
    }
}

/// Accepts either a decimal bitmask ("3") or names joined by `|`
/// ("PERISHABLE|ON_SALE"). Unknown names are ignored.
impl FromStr for ProductFlags {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let token = s.trim();
        if let Ok(bits) = token.parse::<u32>() {
            return Ok(Self::from_bits(bits));
        }

        let mut flags = Self::default();
        for name in token.split('|') {
            match name.trim().to_ascii_uppercase().as_str() {
                "PERISHABLE" => flags.perishable = true,
                "ON_SALE" => flags.on_sale = true,
                "TAX_EXEMPT" => flags.tax_exempt = true,
                _ => {}
            }
        }
        Ok(flags)
    }
}

impl fmt::Display for ProductFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names = Vec::new();
        if self.perishable {
            names.push("PERISHABLE");
        }
        if self.on_sale {
            names.push("ON_SALE");
        }
        if self.tax_exempt {
            names.push("TAX_EXEMPT");
        }
        if names.is_empty() {
            write!(f, "-")
        } else {
            write!(f, "{}", names.join("|"))
        }
    }
}

/// Outcome of serving one day's demand for a single product.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sale {
    pub requested: u32,
    pub served: u32,
    pub shortage: u32,
}

/// A single stock-keeping unit and its lifetime counters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    // Identity
    pub id: i32,
    pub name: String,

    // Pricing
    pub base_cost: f64,
    pub price: f64,

    // State Variables
    pub stock: u32,
    pub flags: ProductFlags,

    // Lifetime counters (only grow until a reset)
    pub requested: u64,
    pub served: u64,
    pub stockouts: u64,
    pub waste_units: u64,
    pub revenue: f64,
    pub cogs: f64,
    pub orders_cost: f64,
}

impl Product {
    /// Constructor for a new product with zeroed counters
    pub fn new(
        id: i32,
        name: impl Into<String>,
        base_cost: f64,
        price: f64,
        stock: u32,
        flags: ProductFlags,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            base_cost,
            price,
            stock,
            flags,
            requested: 0,
            served: 0,
            stockouts: 0,
            waste_units: 0,
            revenue: 0.0,
            cogs: 0.0,
            orders_cost: 0.0,
        }
    }

    /// Rejects products whose pricing would make the demand or money
    /// arithmetic meaningless.
    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: &str| SimError::InvalidProduct {
            id: self.id,
            reason: reason.to_string(),
        };

        if self.name.trim().is_empty() {
            return Err(invalid("name is empty"));
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(invalid("price must be a non-negative number"));
        }
        if !self.base_cost.is_finite() || self.base_cost < 0.0 {
            return Err(invalid("base cost must be a non-negative number"));
        }
        Ok(())
    }

    /// Goods from a purchase order land on the shelf.
    pub fn receive_shipment(&mut self, quantity: u32) {
        self.stock = self.stock.saturating_add(quantity);
    }

    /// Serves as much of `requested` as stock allows and books the sale.
    pub fn sell(&mut self, requested: u32) -> Sale {
        let served = requested.min(self.stock);
        let shortage = requested - served;
        self.stock -= served;

        self.requested += u64::from(requested);
        self.served += u64::from(served);
        self.stockouts += u64::from(shortage);
        self.revenue += f64::from(served) * self.price;
        self.cogs += f64::from(served) * self.base_cost;

        Sale {
            requested,
            served,
            shortage,
        }
    }

    /// Removes spoiled units, never more than what is on the shelf.
    /// Returns the units actually discarded.
    pub fn spoil(&mut self, units: u32) -> u32 {
        let waste = units.min(self.stock);
        self.stock -= waste;
        self.waste_units += u64::from(waste);
        waste
    }

    pub fn book_order_cost(&mut self, cost: f64) {
        self.orders_cost += cost;
    }

    /// Lifetime profit: revenue minus cost of goods and ordering costs.
    pub fn profit(&self) -> f64 {
        self.revenue - self.cogs - self.orders_cost
    }

    pub fn reset_counters(&mut self) {
        self.requested = 0;
        self.served = 0;
        self.stockouts = 0;
        self.waste_units = 0;
        self.revenue = 0.0;
        self.cogs = 0.0;
        self.orders_cost = 0.0;
    }
}

/// The fixed-for-the-run product list. Positions are stable and serve as
/// the foreign key from purchase orders.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    pub fn new(products: Vec<Product>) -> Result<Self> {
        if products.len() > MAX_PRODUCTS {
            return Err(SimError::CatalogFull { max: MAX_PRODUCTS });
        }
        for product in &products {
            product.validate()?;
        }
        Ok(Self { products })
    }

    /// The store used when no catalog file is available.
    pub fn demo() -> Self {
        Self {
            products: vec![
                Product::new(101, "Milk 1L", 6.0, 8.0, 50, ProductFlags::perishable()),
                Product::new(102, "Bread", 5.0, 7.5, 40, ProductFlags::default()),
                Product::new(204, "Strawberries", 20.0, 28.0, 20, ProductFlags::perishable()),
                Product::new(305, "Olive Oil", 23.0, 35.0, 15, ProductFlags::default()),
            ],
        }
    }

    pub fn push(&mut self, product: Product) -> Result<usize> {
        if self.products.len() >= MAX_PRODUCTS {
            return Err(SimError::CatalogFull { max: MAX_PRODUCTS });
        }
        product.validate()?;
        self.products.push(product);
        Ok(self.products.len() - 1)
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Product> {
        self.products.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Product> {
        self.products.get_mut(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Product> {
        self.products.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Product> {
        self.products.iter_mut()
    }

    pub fn as_slice(&self) -> &[Product] {
        &self.products
    }

    pub fn reset_counters(&mut self) {
        for product in &mut self.products {
            product.reset_counters();
        }
    }
}
