// src/io/catalog.rs

use crate::error::Result;
use crate::model::product::{Catalog, Product, ProductFlags, MAX_PRODUCTS};
use serde::Deserialize;
use std::io::ErrorKind;
use std::path::Path;

/// One line of the inventory file: `id,name,base_cost,price,stock[,flags]`.
#[derive(Debug, Deserialize)]
struct CatalogRow {
    id: i32,
    name: String,
    base_cost: f64,
    price: f64,
    stock: u32,
    #[serde(default)]
    flags: Option<String>,
}

impl From<CatalogRow> for Product {
    fn from(row: CatalogRow) -> Self {
        let flags: ProductFlags = row
            .flags
            .as_deref()
            .and_then(|token| token.parse().ok())
            .unwrap_or_default();
        Product::new(row.id, row.name, row.base_cost, row.price, row.stock, flags)
    }
}

/// Reads the inventory CSV. The first line is a header and is skipped.
///
/// A missing or empty file falls back to the demo store. Lines that cannot
/// be parsed are skipped; lines that parse but carry invalid pricing are an
/// error.
pub fn load_catalog(path: impl AsRef<Path>) -> Result<Catalog> {
    let path = path.as_ref();
    let mut reader = match csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
    {
        Ok(reader) => reader,
        Err(e) if is_not_found(&e) => {
            tracing::info!(path = %path.display(), "no inventory file, using demo catalog");
            return Ok(Catalog::demo());
        }
        Err(e) => return Err(e.into()),
    };

    if reader.headers()?.is_empty() {
        return Ok(Catalog::demo());
    }

    let mut catalog = Catalog::default();
    for (line, record) in reader.records().enumerate() {
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(line = line + 2, error = %e, "skipping unreadable inventory line");
                continue;
            }
        };
        let row: CatalogRow = match record.deserialize(None) {
            Ok(row) => row,
            Err(e) => {
                tracing::warn!(line = line + 2, error = %e, "skipping malformed inventory line");
                continue;
            }
        };
        if catalog.len() >= MAX_PRODUCTS {
            tracing::warn!(max = MAX_PRODUCTS, "inventory file truncated at catalog limit");
            break;
        }
        let product: Product = row.into();
        tracing::debug!(id = product.id, name = %product.name, flags = %product.flags, "product loaded");
        catalog.push(product)?;
    }

    tracing::info!(products = catalog.len(), path = %path.display(), "catalog loaded");
    Ok(catalog)
}

fn is_not_found(error: &csv::Error) -> bool {
    matches!(error.kind(), csv::ErrorKind::Io(e) if e.kind() == ErrorKind::NotFound)
}
