// src/io/demand.rs

use crate::model::product::Product;
use rand::Rng;
use rand_distr::{Distribution, Uniform};

const MIN_LAMBDA: f64 = 0.2;
const MAX_LAMBDA: f64 = 18.0;

/// Mean daily customer requests for a product.
///
/// Perishables sell faster, cheaper goods sell faster, promotions add 25%.
/// The result is clamped to `[0.2, 18.0]`.
pub fn demand_lambda(product: &Product) -> f64 {
    let base = if product.flags.perishable { 6.0 } else { 3.5 };
    let price_factor = if product.price > 0.0 {
        12.0 / (product.price + 4.0)
    } else {
        2.0
    };
    let promo = if product.flags.on_sale { 1.25 } else { 1.0 };

    (base * price_factor * promo).clamp(MIN_LAMBDA, MAX_LAMBDA)
}

/// Draws one day's request count from a Poisson distribution.
///
/// Multiplies uniform draws until the running product falls to
/// `exp(-lambda)`; the number of draws minus one is the sample.
pub fn sample_poisson<R: Rng + ?Sized>(rng: &mut R, lambda: f64) -> u32 {
    if lambda <= 0.0 {
        return 0;
    }

    let limit = (-lambda).exp();
    let mut product = 1.0;
    let mut draws: u32 = 0;
    loop {
        draws += 1;
        product *= rng.gen::<f64>();
        if product <= limit {
            break;
        }
    }
    draws - 1
}

/// Units of a perishable that spoil overnight: 1, 2 or 3 percent of the
/// remaining stock (picked uniformly), rounded to nearest and capped at stock.
/// Non-perishables never spoil.
pub fn waste_units<R: Rng + ?Sized>(rng: &mut R, product: &Product) -> u32 {
    if !product.flags.perishable || product.stock == 0 {
        return 0;
    }

    let percent = Uniform::new_inclusive(1u32, 3).sample(rng);
    let rate = f64::from(percent) / 100.0;
    let waste = (rate * f64::from(product.stock) + 0.5).floor() as u32;
    waste.min(product.stock)
}
