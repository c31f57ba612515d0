// src/error.rs

use std::collections::TryReserveError;
use thiserror::Error;

/// Everything that can go wrong inside the simulator.
///
/// None of these terminate the process on their own; the caller decides.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid product {id}: {reason}")]
    InvalidProduct { id: i32, reason: String },

    #[error("catalog is full ({max} products)")]
    CatalogFull { max: usize },

    #[error("out of memory: {0}")]
    ResourceExhausted(#[from] TryReserveError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("config file error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("checkpoint encoding failed: {0}")]
    Checkpoint(#[from] bincode::Error),
}

pub type Result<T> = std::result::Result<T, SimError>;
