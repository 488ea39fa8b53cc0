pub mod column_selector;
pub mod feature_encoder;
pub mod imputer;
pub mod pipeline;
pub mod range_validator;
pub mod renamer;
pub mod resampler;
pub mod sanitizer;

pub use column_selector::ColumnSelector;
pub use feature_encoder::FeatureEncoder;
pub use imputer::Imputer;
pub use pipeline::{CleaningOutput, CleaningPipeline};
pub use range_validator::{RangeValidator, ValidationReport, ValidationWarning, ViolationType};
pub use renamer::ColumnRenamer;
pub use resampler::HourlyResampler;
pub use sanitizer::ValueSanitizer;
