pub mod ledger;
pub mod product;
