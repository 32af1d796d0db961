pub mod etl;
pub mod pipeline;
pub mod projector;
pub mod selector;

pub use crate::domain::model::{DraftListing, InputRecord, TransformResult};
pub use crate::domain::ports::{ConfigProvider, ListingSink, Pipeline, RecordSource};
pub use crate::utils::error::Result;
