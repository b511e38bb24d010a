//! Best-Fit Width Selector
//!
//! Given a classified column, picks the minimal-width storage that exactly
//! preserves the column's value range: unsigned-first fixed-width integers
//! for integral columns, IEEE binary16/32/64 by magnitude for fractional
//! ones. Results are closed enums; display names exist only at boundaries.

use arrow::array::{
    Array, Float16Array, Float32Array, Float64Array, Int16Array, Int32Array, Int64Array,
    Int8Array, UInt16Array, UInt32Array, UInt64Array, UInt8Array,
};
use arrow::datatypes::DataType;
use half::f16;
use serde::{Deserialize, Serialize};

/// Integer signedness half of a descriptor
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Signedness {
    Signed,
    Unsigned,
}

/// Fixed-width integer sizes, narrowest first
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum IntWidth {
    W8,
    W16,
    W32,
    W64,
}

impl IntWidth {
    const ASCENDING: [IntWidth; 4] = [IntWidth::W8, IntWidth::W16, IntWidth::W32, IntWidth::W64];

    fn bits(self) -> u32 {
        match self {
            IntWidth::W8 => 8,
            IntWidth::W16 => 16,
            IntWidth::W32 => 32,
            IntWidth::W64 => 64,
        }
    }

    /// Largest value of the unsigned type at this width
    pub fn unsigned_max(self) -> i128 {
        (1i128 << self.bits()) - 1
    }

    /// Two's-complement bounds of the signed type at this width
    pub fn signed_min(self) -> i128 {
        -(1i128 << (self.bits() - 1))
    }

    pub fn signed_max(self) -> i128 {
        (1i128 << (self.bits() - 1)) - 1
    }
}

/// IEEE floating-point precisions, narrowest first
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FloatPrecision {
    Half,
    Single,
    Double,
}

/// Target storage for one column, produced by the selector
///
/// `Empty` is the sentinel for a column with no non-missing values; the
/// caller drops such columns instead of retagging them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TypeDescriptor {
    Empty,
    Int {
        signedness: Signedness,
        width: IntWidth,
        /// Set when the column has missing entries, so the retagged storage
        /// must still be able to encode them
        nullable: bool,
    },
    Float {
        precision: FloatPrecision,
    },
}

impl TypeDescriptor {
    /// Concrete arrow storage type; `None` for the `Empty` sentinel
    pub fn data_type(&self) -> Option<DataType> {
        match self {
            TypeDescriptor::Empty => None,
            TypeDescriptor::Int {
                signedness: Signedness::Unsigned,
                width,
                ..
            } => Some(match width {
                IntWidth::W8 => DataType::UInt8,
                IntWidth::W16 => DataType::UInt16,
                IntWidth::W32 => DataType::UInt32,
                IntWidth::W64 => DataType::UInt64,
            }),
            TypeDescriptor::Int {
                signedness: Signedness::Signed,
                width,
                ..
            } => Some(match width {
                IntWidth::W8 => DataType::Int8,
                IntWidth::W16 => DataType::Int16,
                IntWidth::W32 => DataType::Int32,
                IntWidth::W64 => DataType::Int64,
            }),
            TypeDescriptor::Float { precision } => Some(match precision {
                FloatPrecision::Half => DataType::Float16,
                FloatPrecision::Single => DataType::Float32,
                FloatPrecision::Double => DataType::Float64,
            }),
        }
    }
}

/// Select the minimal fixed-width integer storage for an integral column
///
/// Walks widths narrowest-first: unsigned when the minimum is non-negative,
/// signed otherwise. Missing entries set the descriptor's nullable flag.
/// The chosen width's representable range always contains `[min, max]`:
/// when not even 64 bits hold the range (integral float values beyond the
/// 64-bit domain), the column keeps double-precision float storage rather
/// than taking a retag that would push values out of range.
pub fn select_int_type(column: &dyn Array) -> TypeDescriptor {
    let Some((min, max)) = int_value_range(column) else {
        return TypeDescriptor::Empty;
    };
    let nullable = column.null_count() > 0;

    let descriptor = if min >= 0 {
        IntWidth::ASCENDING
            .into_iter()
            .find(|w| max <= w.unsigned_max())
            .map(|width| TypeDescriptor::Int {
                signedness: Signedness::Unsigned,
                width,
                nullable,
            })
    } else {
        IntWidth::ASCENDING
            .into_iter()
            .find(|w| w.signed_min() <= min && max <= w.signed_max())
            .map(|width| TypeDescriptor::Int {
                signedness: Signedness::Signed,
                width,
                nullable,
            })
    };

    descriptor.unwrap_or(TypeDescriptor::Float {
        precision: FloatPrecision::Double,
    })
}

/// Select floating-point precision for a fractional column by magnitude
///
/// Magnitude-only by design: narrowing to binary16/32 may round values that
/// a magnitude check alone cannot detect. Exactly-integral values never
/// reach this path, so rounding is confined to genuinely fractional columns.
/// No nullable variant exists - floats natively encode missing entries.
pub fn select_float_type(column: &dyn Array) -> TypeDescriptor {
    let precision = match max_abs_value(column) {
        Some(m) if m.is_nan() => FloatPrecision::Half,
        Some(m) if m <= f16::MAX.to_f64() => FloatPrecision::Half,
        Some(m) if m <= f32::MAX as f64 => FloatPrecision::Single,
        Some(_) => FloatPrecision::Double,
        None => FloatPrecision::Half,
    };
    TypeDescriptor::Float { precision }
}

macro_rules! fold_min_max {
    ($column:expr, $array_ty:ty, $to_i128:expr) => {{
        let values = $column
            .as_any()
            .downcast_ref::<$array_ty>()
            .expect("storage matches data type");
        let mut range: Option<(i128, i128)> = None;
        for i in 0..values.len() {
            if values.is_null(i) {
                continue;
            }
            let v: i128 = $to_i128(values.value(i));
            range = Some(match range {
                Some((lo, hi)) => (lo.min(v), hi.max(v)),
                None => (v, v),
            });
        }
        range
    }};
}

/// Min/max over non-missing values, exact across the full u64/i64 domain.
/// Float storage reaching here holds integral values only (classifier
/// contract), so truncation to i128 is exact within f64's integer range;
/// larger magnitudes saturate, which still lands them outside every
/// fixed-width range.
fn int_value_range(column: &dyn Array) -> Option<(i128, i128)> {
    match column.data_type() {
        DataType::Int8 => fold_min_max!(column, Int8Array, |v: i8| v as i128),
        DataType::Int16 => fold_min_max!(column, Int16Array, |v: i16| v as i128),
        DataType::Int32 => fold_min_max!(column, Int32Array, |v: i32| v as i128),
        DataType::Int64 => fold_min_max!(column, Int64Array, |v: i64| v as i128),
        DataType::UInt8 => fold_min_max!(column, UInt8Array, |v: u8| v as i128),
        DataType::UInt16 => fold_min_max!(column, UInt16Array, |v: u16| v as i128),
        DataType::UInt32 => fold_min_max!(column, UInt32Array, |v: u32| v as i128),
        DataType::UInt64 => fold_min_max!(column, UInt64Array, |v: u64| v as i128),
        DataType::Float16 => fold_min_max!(column, Float16Array, |v: f16| v.to_f64() as i128),
        DataType::Float32 => fold_min_max!(column, Float32Array, |v: f32| v as i128),
        DataType::Float64 => fold_min_max!(column, Float64Array, |v: f64| v as i128),
        _ => None,
    }
}

macro_rules! fold_max_abs {
    ($column:expr, $array_ty:ty, $to_f64:expr) => {{
        let values = $column
            .as_any()
            .downcast_ref::<$array_ty>()
            .expect("storage matches data type");
        let mut max_abs: Option<f64> = None;
        for i in 0..values.len() {
            if values.is_null(i) {
                continue;
            }
            let v: f64 = $to_f64(values.value(i));
            let abs = v.abs();
            // f64::max ignores a NaN operand, so NaN entries never win
            // unless the column holds nothing else
            max_abs = Some(match max_abs {
                Some(m) => m.max(abs),
                None => abs,
            });
        }
        max_abs
    }};
}

/// Maximum absolute value over non-missing entries; `None` when there are
/// no non-missing entries
fn max_abs_value(column: &dyn Array) -> Option<f64> {
    match column.data_type() {
        DataType::Float16 => fold_max_abs!(column, Float16Array, |v: f16| v.to_f64()),
        DataType::Float32 => fold_max_abs!(column, Float32Array, |v: f32| v as f64),
        DataType::Float64 => fold_max_abs!(column, Float64Array, |v: f64| v),
        _ => None,
    }
}
