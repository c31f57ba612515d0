pub mod catalog;
pub mod checkpoint;
pub mod demand;
pub mod reporting;
pub mod summary;
