//! Schema export transform
//!
//! Stateless: reads a table's current column-type metadata and emits one
//! `ALTER TABLE ... MODIFY COLUMN ...` migration script matching it, so a
//! relational store can be narrowed the same way the in-memory table was.

use crate::table::Table;
use arrow::datatypes::DataType;

/// SQL type name for an arrow storage type
///
/// Storage types outside the mapping fall back to a bounded generic text
/// type; the export path never fails.
pub fn sql_type_name(data_type: &DataType) -> &'static str {
    match data_type {
        DataType::UInt8 => "TINYINT UNSIGNED",
        DataType::UInt16 => "SMALLINT UNSIGNED",
        DataType::UInt32 => "INT UNSIGNED",
        DataType::UInt64 => "BIGINT UNSIGNED",
        DataType::Int8 => "TINYINT",
        DataType::Int16 => "SMALLINT",
        DataType::Int32 => "INT",
        DataType::Int64 => "BIGINT",
        // MySQL has no half-precision column type; FLOAT is the narrowest
        // that can hold binary16 values
        DataType::Float16 => "FLOAT",
        DataType::Float32 => "FLOAT",
        DataType::Float64 => "DOUBLE",
        _ => "VARCHAR(255)",
    }
}

/// Render a schema-migration script for `table`
///
/// One `MODIFY COLUMN` clause per column, in column order, joined under a
/// single `ALTER TABLE` statement scoped to `table_name`.
pub fn export_schema(table: &Table, table_name: &str) -> String {
    let clauses: Vec<String> = table
        .schema()
        .fields()
        .iter()
        .map(|field| {
            format!(
                "MODIFY COLUMN `{}` {}",
                field.name(),
                sql_type_name(field.data_type())
            )
        })
        .collect();

    format!("ALTER TABLE `{}` {};", table_name, clauses.join(",\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{ArrayRef, StringArray, UInt8Array};
    use std::sync::Arc;

    #[test]
    fn test_single_column_script() {
        let col: ArrayRef = Arc::new(UInt8Array::from(vec![1u8]));
        let table = Table::from_named(vec![("a", col)]).unwrap();

        assert_eq!(
            export_schema(&table, "t"),
            "ALTER TABLE `t` MODIFY COLUMN `a` TINYINT UNSIGNED;"
        );
    }

    #[test]
    fn test_clause_order_matches_column_order() {
        let a: ArrayRef = Arc::new(UInt8Array::from(vec![1u8]));
        let b: ArrayRef = Arc::new(StringArray::from(vec!["x"]));
        let table = Table::from_named(vec![("first", a), ("second", b)]).unwrap();

        assert_eq!(
            export_schema(&table, "orders"),
            "ALTER TABLE `orders` MODIFY COLUMN `first` TINYINT UNSIGNED,\n\
             MODIFY COLUMN `second` VARCHAR(255);"
        );
    }

    #[test]
    fn test_unmapped_type_falls_back_to_text() {
        assert_eq!(sql_type_name(&DataType::Boolean), "VARCHAR(255)");
        assert_eq!(sql_type_name(&DataType::Utf8), "VARCHAR(255)");
    }

    #[test]
    fn test_numeric_type_names() {
        assert_eq!(sql_type_name(&DataType::Int16), "SMALLINT");
        assert_eq!(sql_type_name(&DataType::UInt64), "BIGINT UNSIGNED");
        assert_eq!(sql_type_name(&DataType::Float16), "FLOAT");
        assert_eq!(sql_type_name(&DataType::Float64), "DOUBLE");
    }
}
