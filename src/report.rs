//! Memory-usage reporting for the optimizer
//!
//! The optimizer never prints; it pushes structured before/after summaries to
//! a [`ReportSink`] collaborator. The default sink emits `tracing` events, a
//! recording sink is provided for tests and programmatic capture.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Arc, Mutex};
use tracing::info;

/// Which side of the optimization pass a summary describes
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportPhase {
    Before,
    After,
}

/// Aggregate memory footprint of a table at one point in time
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemorySummary {
    /// Total byte footprint across all columns
    pub bytes: usize,

    /// Number of columns in the table
    pub column_count: usize,
}

impl MemorySummary {
    pub fn new(bytes: usize, column_count: usize) -> Self {
        Self { bytes, column_count }
    }

    /// Format the byte total the way DataFrame-style info lines do:
    /// `"<X.Y> MB"`, or `"<X.Y>+ GB"` once the footprint exceeds 1 GiB.
    pub fn format_size(&self) -> String {
        let total_gb = self.bytes as f64 / 1024f64.powi(3);
        if total_gb > 1.0 {
            format!("{:.1}+ GB", total_gb)
        } else {
            format!("{:.1} MB", self.bytes as f64 / 1024f64.powi(2))
        }
    }
}

impl fmt::Display for MemorySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Memory usage: {} Total Columns: {}",
            self.format_size(),
            self.column_count
        )
    }
}

/// Receiver for the optimizer's before/after summaries
///
/// Exactly two reports arrive per optimization pass, in order:
/// `Before`, then `After`.
pub trait ReportSink {
    fn report(&mut self, phase: ReportPhase, summary: &MemorySummary);
}

/// Default sink: emits each summary as an `info` event
pub struct TracingSink;

impl ReportSink for TracingSink {
    fn report(&mut self, phase: ReportPhase, summary: &MemorySummary) {
        match phase {
            ReportPhase::Before => info!("Before Optimization: {}", summary),
            ReportPhase::After => info!("After Optimization: {}", summary),
        }
    }
}

/// Sink that records every report, for tests and programmatic inspection
///
/// Clones share the same underlying log, so a caller can keep a handle while
/// handing the sink to the optimizer.
#[derive(Clone, Default)]
pub struct RecordingSink {
    entries: Arc<Mutex<Vec<(ReportPhase, MemorySummary)>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all reports received so far, in arrival order
    pub fn entries(&self) -> Vec<(ReportPhase, MemorySummary)> {
        self.entries.lock().expect("report log poisoned").clone()
    }
}

impl ReportSink for RecordingSink {
    fn report(&mut self, phase: ReportPhase, summary: &MemorySummary) {
        self.entries
            .lock()
            .expect("report log poisoned")
            .push((phase, *summary));
    }
}
