//! # narrowframe
//!
//! Numeric column downcasting for columnar tables built on arrow.
//!
//! ## Quick Start
//!
//! ```rust
//! use narrowframe::{Table, TableOptimizer, export_schema};
//! use arrow::array::{ArrayRef, Int64Array};
//! use std::sync::Arc;
//!
//! // A table with one numeric column stored wider than its values need
//! let col: ArrayRef = Arc::new(Int64Array::from(vec![1, 2, 3]));
//! let mut table = Table::from_named(vec![("id", col)]).unwrap();
//!
//! // Retag every numeric column to its best-fit storage
//! let report = TableOptimizer::new().optimize(&mut table).unwrap();
//! println!("saved {} bytes", report.bytes_saved());
//!
//! // Derive a migration script for the narrowed schema
//! let script = export_schema(&table, "my_table");
//! assert!(script.starts_with("ALTER TABLE `my_table`"));
//! ```
//!
//! ## Features
//!
//! - **Value-driven classification**: a float column holding only whole
//!   numbers is retagged as an integer column
//! - **Best-fit width selection**: narrowest signed/unsigned integer or
//!   float precision that exactly preserves the value range
//! - **Missing-value aware**: columns with nulls keep a nullable storage
//!   field; all-missing columns are dropped
//! - **Structured reporting**: before/after memory summaries go to a
//!   pluggable sink, never to stdout

// Internal modules
pub mod error;
pub mod export;
pub mod optimize;
pub mod report;
pub mod table;

// Public API - Main types users need
pub use table::{is_numeric, numeric_byte_width, Table};
pub use optimize::{
    classify, select_float_type, select_int_type, ColumnClass, ColumnOutcome, FloatPrecision,
    IntWidth, OptimizeReport, Signedness, TableOptimizer, TypeDescriptor,
};
pub use report::{MemorySummary, RecordingSink, ReportPhase, ReportSink, TracingSink};
pub use export::{export_schema, sql_type_name};

// Re-export commonly used error types
pub use error::{OptimizeError, OptimizeResult};
