//! Table-Level Optimizer
//!
//! Walks every numeric column of a table, classifies it, selects the
//! best-fit storage, and retags the column in place via the arrow cast
//! kernel. Columns with no non-missing values are dropped. Before/after
//! memory summaries go to a [`ReportSink`]; the optimizer itself never
//! prints.

use crate::error::OptimizeResult;
use crate::optimize::classify::{classify, ColumnClass};
use crate::optimize::select::{select_float_type, select_int_type, TypeDescriptor};
use crate::report::{MemorySummary, ReportPhase, ReportSink, TracingSink};
use crate::table::{is_numeric, Table};
use arrow::array::Array;
use arrow::datatypes::DataType;
use tracing::{debug, info};

/// Terminal outcome for one column of an optimization pass
#[derive(Clone, Debug, PartialEq)]
pub enum ColumnOutcome {
    /// Numeric column retagged to best-fit storage
    Retyped {
        column: String,
        from: DataType,
        to: DataType,
    },

    /// Column removed: it held no non-missing values
    Dropped { column: String },

    /// Nothing to do: non-numeric storage, or already minimal
    Unchanged { column: String },
}

/// Structured result of one optimization pass
#[derive(Clone, Debug)]
pub struct OptimizeReport {
    pub before: MemorySummary,
    pub after: MemorySummary,
    pub outcomes: Vec<ColumnOutcome>,
}

impl OptimizeReport {
    /// Bytes saved by the pass
    pub fn bytes_saved(&self) -> usize {
        self.before.bytes.saturating_sub(self.after.bytes)
    }
}

/// Applies the classifier and selector across a whole table
///
/// Per-column mutation is the atomic unit: a cast failure on one column
/// surfaces as an error and leaves every other column either fully converted
/// or untouched.
pub struct TableOptimizer {
    sink: Box<dyn ReportSink>,
}

impl TableOptimizer {
    pub fn new() -> Self {
        Self {
            sink: Box::new(TracingSink),
        }
    }

    pub fn with_sink(sink: Box<dyn ReportSink>) -> Self {
        Self { sink }
    }

    /// Optimize every numeric column of `table` in place
    ///
    /// Returns the structured before/after report; the same summaries are
    /// pushed to the sink in order (before, then after).
    pub fn optimize(&mut self, table: &mut Table) -> OptimizeResult<OptimizeReport> {
        let before = table.memory_summary();
        self.sink.report(ReportPhase::Before, &before);
        info!(columns = table.column_count(), rows = table.row_count(), "starting table optimization");

        // Snapshot names up front: dropping a column shifts the indices of
        // everything behind it
        let columns: Vec<(String, bool)> = table
            .schema()
            .fields()
            .iter()
            .map(|f| (f.name().clone(), is_numeric(f.data_type())))
            .collect();

        let mut outcomes = Vec::with_capacity(columns.len());
        for (name, numeric) in columns {
            if !numeric {
                outcomes.push(ColumnOutcome::Unchanged { column: name });
                continue;
            }
            let Some(idx) = table.index_of(&name) else {
                continue;
            };

            let column = table.column(idx).expect("index from schema").clone();
            let outcome = match classify(column.as_ref()) {
                ColumnClass::Empty => {
                    table.remove_column(idx)?;
                    debug!(column = %name, "dropped all-missing column");
                    ColumnOutcome::Dropped { column: name }
                }
                ColumnClass::Integral => {
                    self.apply(table, idx, name, select_int_type(column.as_ref()))?
                }
                ColumnClass::Fractional => {
                    self.apply(table, idx, name, select_float_type(column.as_ref()))?
                }
            };
            outcomes.push(outcome);
        }

        let after = table.memory_summary();
        self.sink.report(ReportPhase::After, &after);
        info!(
            bytes_before = before.bytes,
            bytes_after = after.bytes,
            "table optimization complete"
        );

        Ok(OptimizeReport {
            before,
            after,
            outcomes,
        })
    }

    fn apply(
        &mut self,
        table: &mut Table,
        idx: usize,
        name: String,
        descriptor: TypeDescriptor,
    ) -> OptimizeResult<ColumnOutcome> {
        let Some(to) = descriptor.data_type() else {
            // Selector saw no non-missing values (Empty sentinel)
            table.remove_column(idx)?;
            debug!(column = %name, "dropped all-missing column");
            return Ok(ColumnOutcome::Dropped { column: name });
        };

        // The selector owns the nullable decision for integers; floats have
        // no nullable variant, so the column's own null count decides
        let nullable = match descriptor {
            TypeDescriptor::Int { nullable, .. } => nullable,
            _ => {
                table
                    .column(idx)
                    .expect("index from schema")
                    .null_count()
                    > 0
            }
        };
        let field = table.schema().field(idx);
        if field.data_type() == &to && field.is_nullable() == nullable {
            return Ok(ColumnOutcome::Unchanged { column: name });
        }

        let from = field.data_type().clone();
        table.retag_column(idx, &to, nullable)?;
        debug!(column = %name, from = ?from, to = ?to, "retyped column");
        Ok(ColumnOutcome::Retyped {
            column: name,
            from,
            to,
        })
    }
}

impl Default for TableOptimizer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::RecordingSink;
    use arrow::array::{ArrayRef, Float64Array, Int64Array};
    use std::sync::Arc;

    #[test]
    fn test_single_column_pass() {
        let col: ArrayRef = Arc::new(Int64Array::from(vec![1, 2, 3]));
        let mut table = Table::from_named(vec![("a", col)]).unwrap();

        let report = TableOptimizer::new().optimize(&mut table).unwrap();

        assert_eq!(table.schema().field(0).data_type(), &DataType::UInt8);
        assert_eq!(report.bytes_saved(), 3 * 7);
        assert_eq!(
            report.outcomes,
            vec![ColumnOutcome::Retyped {
                column: "a".to_string(),
                from: DataType::Int64,
                to: DataType::UInt8,
            }]
        );
    }

    #[test]
    fn test_empty_column_dropped_before_selector_runs() {
        let empty: ArrayRef = Arc::new(Float64Array::from(vec![None::<f64>, None]));
        let kept: ArrayRef = Arc::new(Int64Array::from(vec![5, 6]));
        let mut table = Table::from_named(vec![("gone", empty), ("kept", kept)]).unwrap();

        let report = TableOptimizer::new().optimize(&mut table).unwrap();

        assert_eq!(table.column_count(), 1);
        assert_eq!(table.row_count(), 2);
        assert_eq!(
            report.outcomes[0],
            ColumnOutcome::Dropped {
                column: "gone".to_string()
            }
        );
    }

    #[test]
    fn test_huge_integral_floats_are_left_intact() {
        // 1e30 classifies as integral but exceeds every fixed-width integer
        // range; the column must keep its values, not trade them for nulls
        let col: ArrayRef = Arc::new(Float64Array::from(vec![1.0e30]));
        let mut table = Table::from_named(vec![("big", col)]).unwrap();

        let report = TableOptimizer::new().optimize(&mut table).unwrap();

        assert_eq!(table.schema().field(0).data_type(), &DataType::Float64);
        let values = table
            .column(0)
            .unwrap()
            .as_any()
            .downcast_ref::<Float64Array>()
            .unwrap();
        assert_eq!(values.null_count(), 0);
        assert_eq!(values.value(0), 1.0e30);
        assert_eq!(
            report.outcomes,
            vec![ColumnOutcome::Unchanged {
                column: "big".to_string()
            }]
        );
    }

    #[test]
    fn test_descriptor_nullable_flag_drives_field_nullability() {
        let col: ArrayRef = Arc::new(Int64Array::from(vec![Some(1), None, Some(3)]));
        let mut table = Table::from_named(vec![("gaps", col)]).unwrap();

        TableOptimizer::new().optimize(&mut table).unwrap();

        let field = table.schema().field(0);
        assert_eq!(field.data_type(), &DataType::UInt8);
        assert!(field.is_nullable());
        assert_eq!(table.column(0).unwrap().null_count(), 1);
    }

    #[test]
    fn test_sink_receives_before_then_after() {
        let sink = RecordingSink::new();
        let col: ArrayRef = Arc::new(Int64Array::from(vec![10, 20]));
        let mut table = Table::from_named(vec![("a", col)]).unwrap();

        TableOptimizer::with_sink(Box::new(sink.clone()))
            .optimize(&mut table)
            .unwrap();

        let entries = sink.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].0, ReportPhase::Before);
        assert_eq!(entries[1].0, ReportPhase::After);
        assert!(entries[0].1.bytes > entries[1].1.bytes);
    }

    #[test]
    fn test_already_minimal_column_is_unchanged() {
        let col: ArrayRef = Arc::new(Int64Array::from(vec![1, 2]));
        let mut table = Table::from_named(vec![("a", col)]).unwrap();

        TableOptimizer::new().optimize(&mut table).unwrap();
        let report = TableOptimizer::new().optimize(&mut table).unwrap();

        assert_eq!(
            report.outcomes,
            vec![ColumnOutcome::Unchanged {
                column: "a".to_string()
            }]
        );
        assert_eq!(report.bytes_saved(), 0);
    }
}
