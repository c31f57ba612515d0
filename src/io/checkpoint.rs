// src/io/checkpoint.rs

//! Save and resume a run.
//!
//! File layout: a 4-byte magic marker followed by a bincode-encoded
//! [`CheckpointRecord`]. The marker carries the format version; a file
//! with any other marker is treated as absent rather than misread.

use crate::error::{Result, SimError};
use crate::model::ledger::{OrderLedger, PurchaseOrder};
use crate::model::product::{Catalog, Product, MAX_PRODUCTS};
use crate::simulation::config::Config;
use crate::simulation::state::RunState;
use serde::{Deserialize, Serialize};
use std::collections::TryReserveError;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const CHECKPOINT_MAGIC: [u8; 4] = *b"SQS1";

/// On-disk form of [`RunState`]. Orders are stored in ledger order.
#[derive(Debug, Serialize, Deserialize)]
struct CheckpointRecord {
    config: Config,
    day: u32,
    next_po_id: u32,
    products: Vec<Product>,
    orders: Vec<PurchaseOrder>,
}

/// Why a checkpoint file was rejected.
#[derive(Debug, Error)]
pub enum CorruptCheckpoint {
    #[error("missing or unknown magic marker")]
    BadMagic,

    #[error("undecodable record: {0}")]
    Malformed(#[from] bincode::Error),

    #[error("{0} products exceeds the catalog limit")]
    TooManyProducts(usize),

    #[error("order {po_id} refers to product index {index} outside the catalog")]
    UnknownProduct { po_id: u32, index: usize },

    #[error("invalid catalog: {0}")]
    InvalidCatalog(String),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("order {po_id} was due on day {due_day} but the run is already at day {day}")]
    OrderNotPending { po_id: u32, due_day: u32, day: u32 },

    #[error("out of memory replaying orders: {0}")]
    OutOfMemory(#[from] TryReserveError),
}

pub fn encode(state: &RunState) -> Result<Vec<u8>> {
    let record = CheckpointRecord {
        config: state.config.clone(),
        day: state.day,
        next_po_id: state.next_po_id,
        products: state.catalog.as_slice().to_vec(),
        orders: state.ledger.iter().copied().collect(),
    };

    let mut bytes = CHECKPOINT_MAGIC.to_vec();
    bincode::serialize_into(&mut bytes, &record)?;
    Ok(bytes)
}

/// Rebuilds a run from checkpoint bytes. Either the whole state comes back
/// or nothing does.
pub fn decode(bytes: &[u8]) -> std::result::Result<RunState, CorruptCheckpoint> {
    let body = bytes
        .strip_prefix(&CHECKPOINT_MAGIC[..])
        .ok_or(CorruptCheckpoint::BadMagic)?;
    let record: CheckpointRecord = bincode::deserialize(body)?;

    record
        .config
        .validate()
        .map_err(|e| CorruptCheckpoint::InvalidConfig(e.to_string()))?;

    let product_count = record.products.len();
    if product_count > MAX_PRODUCTS {
        return Err(CorruptCheckpoint::TooManyProducts(product_count));
    }
    let catalog = Catalog::new(record.products)
        .map_err(|e| CorruptCheckpoint::InvalidCatalog(e.to_string()))?;

    // Replaying in saved order keeps equal due days in their saved order.
    let mut ledger = OrderLedger::new();
    ledger.reserve(record.orders.len())?;
    let mut next_po_id = record.next_po_id.max(1);
    for order in record.orders {
        if order.product_index >= product_count {
            return Err(CorruptCheckpoint::UnknownProduct {
                po_id: order.po_id,
                index: order.product_index,
            });
        }
        // Anything due on or before the saved day was already received.
        if order.due_day <= record.day {
            return Err(CorruptCheckpoint::OrderNotPending {
                po_id: order.po_id,
                due_day: order.due_day,
                day: record.day,
            });
        }
        ledger.insert(order)?;
        next_po_id = next_po_id.max(order.po_id.saturating_add(1));
    }

    Ok(RunState {
        config: record.config,
        day: record.day,
        next_po_id,
        catalog,
        ledger,
    })
}

/// A checkpoint file on disk.
#[derive(Debug, Clone)]
pub struct CheckpointStore {
    path: PathBuf,
}

impl CheckpointStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes the state to a sibling temp file, then renames it into place.
    pub fn save(&self, state: &RunState) -> Result<()> {
        let bytes = encode(state)?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, &bytes)?;
        fs::rename(&tmp, &self.path)?;
        tracing::debug!(path = %self.path.display(), day = state.day, "checkpoint saved");
        Ok(())
    }

    /// Returns the saved run, or `None` when there is no usable checkpoint.
    ///
    /// I/O errors other than a missing file, and running out of memory while
    /// rebuilding the ledger, are returned as errors.
    pub fn load(&self) -> Result<Option<RunState>> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        self.accept(decode(&bytes))
    }

    fn accept(
        &self,
        decoded: std::result::Result<RunState, CorruptCheckpoint>,
    ) -> Result<Option<RunState>> {
        match decoded {
            Ok(state) => Ok(Some(state)),
            Err(CorruptCheckpoint::OutOfMemory(e)) => Err(SimError::ResourceExhausted(e)),
            Err(reason) => {
                tracing::warn!(
                    path = %self.path.display(),
                    %reason,
                    "ignoring unusable checkpoint"
                );
                Ok(None)
            }
        }
    }

    /// Resumes the saved run if there is one, otherwise builds a new one
    /// with `start`. `start` is not called when a checkpoint is usable, so a
    /// broken config or catalog file cannot block a resume.
    pub fn resume_or<F>(&self, start: F) -> Result<RunState>
    where
        F: FnOnce() -> Result<RunState>,
    {
        match self.load() {
            Ok(Some(saved)) => {
                tracing::info!(path = %self.path.display(), day = saved.day, "resuming saved state");
                return Ok(saved);
            }
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "cannot read saved state")
            }
        }

        tracing::info!("starting new simulation");
        start()
    }

    /// Deletes the checkpoint. Deleting a missing file succeeds.
    pub fn discard(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
