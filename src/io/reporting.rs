// src/io/reporting.rs

use crate::error::Result;
use crate::simulation::facts::{Fact, FactSink};
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

const HEADER: [&str; 22] = [
    "type",
    "day",
    "po_id",
    "day_placed",
    "product_id",
    "product_name",
    "order_qty",
    "due_day",
    "lead_time",
    "order_cost",
    "requested",
    "served",
    "unit_price",
    "revenue",
    "shortage",
    "waste",
    "revenue_d",
    "cogs_d",
    "orders_d",
    "profit_d",
    "fill_rate",
    "stockouts",
];

/// One line of the audit log. Each kind of fact fills only its own columns.
#[derive(Debug, Default, Serialize)]
struct LogRow {
    #[serde(rename = "type")]
    kind: &'static str,
    day: Option<u32>,
    po_id: Option<u32>,
    day_placed: Option<u32>,
    product_id: Option<i32>,
    product_name: Option<String>,
    order_qty: Option<u32>,
    due_day: Option<u32>,
    lead_time: Option<u32>,
    order_cost: Option<f64>,
    requested: Option<u32>,
    served: Option<u32>,
    unit_price: Option<f64>,
    revenue: Option<f64>,
    shortage: Option<u32>,
    waste: Option<u32>,
    revenue_d: Option<f64>,
    cogs_d: Option<f64>,
    orders_d: Option<f64>,
    profit_d: Option<f64>,
    fill_rate: Option<f64>,
    stockouts: Option<u64>,
}

impl From<&Fact> for LogRow {
    fn from(fact: &Fact) -> Self {
        match fact {
            Fact::Sale(sale) => LogRow {
                kind: "sale",
                day: Some(sale.day),
                product_id: Some(sale.product_id),
                product_name: Some(sale.product_name.clone()),
                requested: Some(sale.requested),
                served: Some(sale.served),
                unit_price: Some(sale.unit_price),
                revenue: Some(sale.revenue()),
                shortage: Some(sale.shortage),
                waste: Some(sale.waste),
                ..LogRow::default()
            },
            Fact::Order(order) => LogRow {
                kind: "order",
                po_id: Some(order.po_id),
                day_placed: Some(order.day_placed),
                product_id: Some(order.product_id),
                product_name: Some(order.product_name.clone()),
                order_qty: Some(order.qty),
                due_day: Some(order.due_day),
                lead_time: Some(order.lead_time),
                order_cost: Some(order.order_cost),
                ..LogRow::default()
            },
            Fact::Daily(daily) => LogRow {
                kind: "daily",
                day: Some(daily.day),
                revenue_d: Some(daily.revenue),
                cogs_d: Some(daily.cogs),
                orders_d: Some(daily.orders_cost),
                profit_d: Some(daily.profit),
                fill_rate: Some(daily.fill_rate),
                stockouts: Some(daily.stockout_units),
                ..LogRow::default()
            },
        }
    }
}

/// Appends every simulation fact to a single CSV file.
///
/// The header is written only when the file starts out empty, so
/// successive runs keep extending the same log.
pub struct CsvAuditLog {
    path: PathBuf,
    writer: csv::Writer<File>,
}

impl CsvAuditLog {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let empty = file.metadata()?.len() == 0;

        let mut log = Self {
            writer: Self::writer_for(file),
            path,
        };
        if empty {
            log.write_header()?;
        }
        Ok(log)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Discards everything logged so far, leaving only the header.
    pub fn truncate(&mut self) -> Result<()> {
        let file = File::create(&self.path)?;
        self.writer = Self::writer_for(file);
        self.write_header()
    }

    pub fn try_record(&mut self, fact: &Fact) -> Result<()> {
        self.writer.serialize(LogRow::from(fact))?;
        self.writer.flush()?;
        Ok(())
    }

    fn writer_for(file: File) -> csv::Writer<File> {
        csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file)
    }

    fn write_header(&mut self) -> Result<()> {
        self.writer.write_record(HEADER)?;
        self.writer.flush()?;
        Ok(())
    }
}

impl FactSink for CsvAuditLog {
    fn record(&mut self, fact: Fact) {
        if let Err(e) = self.try_record(&fact) {
            tracing::warn!(path = %self.path.display(), error = %e, "audit log write failed");
        }
    }

    fn reset(&mut self) {
        if let Err(e) = self.truncate() {
            tracing::warn!(path = %self.path.display(), error = %e, "audit log reset failed");
        }
    }
}
