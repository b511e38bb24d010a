//! Column Type Classifier
//!
//! Decides, for one numeric column, whether its non-missing values are all
//! integral or whether a fractional value is present. The decision is made on
//! the values, never on the current storage type: a Float64 column holding
//! [2.0, 4.0] classifies as integral.

use arrow::array::{Array, Float16Array, Float32Array, Float64Array};
use arrow::datatypes::DataType;

/// Classification of one numeric column's non-missing values
///
/// Derived per optimization pass and discarded after width selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColumnClass {
    /// No non-missing values at all
    Empty,

    /// Every non-missing value equals its floor
    Integral,

    /// At least one non-missing value has a non-zero fractional part
    Fractional,
}

/// Classify one numeric column
///
/// Callers guarantee numeric storage (`is_numeric` on the data type);
/// integer-typed storage is integral by construction, float storage is
/// scanned value by value. Sign-agnostic: -3.0 and -0.0 are integral.
pub fn classify(column: &dyn Array) -> ColumnClass {
    if column.len() == column.null_count() {
        return ColumnClass::Empty;
    }

    let integral = match column.data_type() {
        DataType::Float16 => {
            let values = column
                .as_any()
                .downcast_ref::<Float16Array>()
                .expect("Float16 storage");
            non_null_all_integral(values.len(), |i| values.is_null(i), |i| {
                values.value(i).to_f64()
            })
        }
        DataType::Float32 => {
            let values = column
                .as_any()
                .downcast_ref::<Float32Array>()
                .expect("Float32 storage");
            non_null_all_integral(values.len(), |i| values.is_null(i), |i| {
                values.value(i) as f64
            })
        }
        DataType::Float64 => {
            let values = column
                .as_any()
                .downcast_ref::<Float64Array>()
                .expect("Float64 storage");
            non_null_all_integral(values.len(), |i| values.is_null(i), |i| values.value(i))
        }
        // Integer storage cannot hold a fractional value
        _ => true,
    };

    if integral {
        ColumnClass::Integral
    } else {
        ColumnClass::Fractional
    }
}

fn non_null_all_integral(
    len: usize,
    is_null: impl Fn(usize) -> bool,
    value: impl Fn(usize) -> f64,
) -> bool {
    (0..len)
        .filter(|&i| !is_null(i))
        .all(|i| is_integral(value(i)))
}

/// A value is integral iff it equals its own floor. Non-finite values
/// (NaN, infinities) have no exact integer representation and can never
/// take the integer path.
fn is_integral(v: f64) -> bool {
    v.is_finite() && v == v.floor()
}
