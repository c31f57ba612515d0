pub mod config;
pub mod engine;
pub mod facts;
pub mod state;
