mod model;
pub mod normalize;
mod response;
mod source;

pub use model::{
    ColumnDefinition, NormalizationResult, NormalizedRow, PathAndName, RawRecord,
};
pub use normalize::{normalize, normalize_columns, normalize_rows, PropertyMapping, COLUMN_PREFIX};
pub use response::{GabRequest, ServerResponse};
pub use source::ArtifactSource;
