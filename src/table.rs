//! Columnar table - ordered named columns over arrow arrays
//!
//! The optimizer only needs a narrow surface from its input: column
//! enumeration, a numeric-kind test, null inspection, and retag/remove
//! mutation. `Table` provides exactly that over `ArrayRef` columns.

use crate::error::{OptimizeError, OptimizeResult};
use crate::report::MemorySummary;
use arrow::array::{Array, ArrayRef};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Field, Schema, SchemaRef};
use std::collections::HashSet;
use std::sync::Arc;

/// Byte width of one element for numeric storage kinds; `None` for anything
/// the optimizer must leave untouched (strings, booleans, nested types, ...)
pub fn numeric_byte_width(data_type: &DataType) -> Option<usize> {
    match data_type {
        DataType::Int8 | DataType::UInt8 => Some(1),
        DataType::Int16 | DataType::UInt16 | DataType::Float16 => Some(2),
        DataType::Int32 | DataType::UInt32 | DataType::Float32 => Some(4),
        DataType::Int64 | DataType::UInt64 | DataType::Float64 => Some(8),
        _ => None,
    }
}

/// Whether a storage type is a numeric kind the optimizer may rewrite
pub fn is_numeric(data_type: &DataType) -> bool {
    numeric_byte_width(data_type).is_some()
}

/// A table: ordered columns with unique names, all of equal length
///
/// Mutated in place by the optimizer - columns are only retagged or removed,
/// never added, reordered, or renamed. Not safe for concurrent mutation of
/// one instance.
#[derive(Clone)]
pub struct Table {
    /// Column arrays (one per schema field, same order)
    columns: Vec<ArrayRef>,

    /// Schema describing the columns
    schema: SchemaRef,

    /// Number of rows (shared by every column)
    row_count: usize,
}

impl Table {
    pub fn new(columns: Vec<ArrayRef>, schema: SchemaRef) -> OptimizeResult<Self> {
        if columns.len() != schema.fields().len() {
            return Err(OptimizeError::table(format!(
                "column count ({}) != schema field count ({})",
                columns.len(),
                schema.fields().len()
            )));
        }

        let mut seen = HashSet::new();
        for field in schema.fields() {
            if !seen.insert(field.name().as_str()) {
                return Err(OptimizeError::table_with_column(
                    "duplicate column name",
                    field.name().clone(),
                ));
            }
        }

        let row_count = columns.first().map(|c| c.len()).unwrap_or(0);
        for (column, field) in columns.iter().zip(schema.fields()) {
            if column.len() != row_count {
                return Err(OptimizeError::table_with_column(
                    format!("column length {} != row count {}", column.len(), row_count),
                    field.name().clone(),
                ));
            }
        }

        Ok(Self {
            columns,
            schema,
            row_count,
        })
    }

    /// Build a table from (name, array) pairs; field nullability follows the
    /// arrays' actual null counts
    pub fn from_named(columns: Vec<(&str, ArrayRef)>) -> OptimizeResult<Self> {
        let fields: Vec<Field> = columns
            .iter()
            .map(|(name, array)| {
                Field::new(*name, array.data_type().clone(), array.null_count() > 0)
            })
            .collect();
        let arrays = columns.into_iter().map(|(_, array)| array).collect();
        Self::new(arrays, Arc::new(Schema::new(fields)))
    }

    pub fn schema(&self) -> &SchemaRef {
        &self.schema
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Get a column by index
    pub fn column(&self, idx: usize) -> Option<&ArrayRef> {
        self.columns.get(idx)
    }

    /// Get a column by name
    pub fn column_by_name(&self, name: &str) -> Option<&ArrayRef> {
        self.column(self.index_of(name)?)
    }

    /// Index of a named column, if present
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.schema.index_of(name).ok()
    }

    /// Retag one column: cast its storage to `to` and rebuild the schema
    /// field with the given nullability. The column is the atomic unit of
    /// mutation - on cast failure this table is left exactly as it was.
    pub fn retag_column(
        &mut self,
        idx: usize,
        to: &DataType,
        nullable: bool,
    ) -> OptimizeResult<()> {
        let field = self
            .schema
            .fields()
            .get(idx)
            .ok_or_else(|| OptimizeError::table(format!("column index {} out of range", idx)))?
            .clone();

        let casted = cast(self.columns[idx].as_ref(), to)
            .map_err(|e| OptimizeError::cast(field.name(), format!("{:?}", to), e.to_string()))?;

        let mut fields: Vec<Field> = self
            .schema
            .fields()
            .iter()
            .map(|f| f.as_ref().clone())
            .collect();
        fields[idx] = Field::new(field.name(), to.clone(), nullable);

        self.columns[idx] = casted;
        self.schema = Arc::new(Schema::new(fields));
        Ok(())
    }

    /// Remove one column, narrowing the table in place
    pub fn remove_column(&mut self, idx: usize) -> OptimizeResult<ArrayRef> {
        if idx >= self.columns.len() {
            return Err(OptimizeError::table(format!(
                "column index {} out of range",
                idx
            )));
        }

        let fields: Vec<Field> = self
            .schema
            .fields()
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != idx)
            .map(|(_, f)| f.as_ref().clone())
            .collect();

        self.schema = Arc::new(Schema::new(fields));
        Ok(self.columns.remove(idx))
    }

    /// Total byte footprint: fixed element width x row count for numeric
    /// columns, arrow's full buffer accounting for variable-length ones
    pub fn memory_bytes(&self) -> usize {
        self.columns
            .iter()
            .map(|column| match numeric_byte_width(column.data_type()) {
                Some(width) => width * self.row_count,
                None => column.get_array_memory_size(),
            })
            .sum()
    }

    pub fn memory_summary(&self) -> MemorySummary {
        MemorySummary::new(self.memory_bytes(), self.column_count())
    }
}
