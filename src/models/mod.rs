pub mod field;
pub mod table;

pub use field::{DerivedField, Encoding, FieldCatalog, FieldKind, FieldSpec, Imputation, ValidRange};
pub use table::{Column, ObservationTable, RawColumn, RawTable};
