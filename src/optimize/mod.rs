// Numeric column optimization: classification, width selection, and the
// table-level pass that applies them

pub mod classify;
pub mod optimizer;
pub mod select;

pub use classify::{classify, ColumnClass};
pub use optimizer::{ColumnOutcome, OptimizeReport, TableOptimizer};
pub use select::{
    select_float_type, select_int_type, FloatPrecision, IntWidth, Signedness, TypeDescriptor,
};
