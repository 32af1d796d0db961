use crate::core::projector::FieldDefaults;
use crate::core::selector::SelectionRule;
use crate::domain::model::{InputRecord, TransformResult};
use crate::utils::error::Result;
use std::path::Path;

/// Where inventory records come from.
pub trait RecordSource {
    /// Human-readable location, for logs.
    fn describe(&self) -> String;

    /// Reads every record. A missing input is not an error: implementations
    /// log a warning and return an empty set.
    fn read_records(&self) -> Result<Vec<InputRecord>>;
}

/// Where the rendered upload file goes.
pub trait ListingSink {
    /// Writes the complete document, replacing any previous output.
    /// Returns the final output location.
    fn write_document(&self, document: &[u8]) -> Result<String>;
}

pub trait ConfigProvider {
    fn input_dir(&self) -> &Path;
    fn input_file(&self) -> Option<&Path>;
    fn output_dir(&self) -> &Path;
    fn output_file_name(&self) -> &str;
    fn clean_stale_outputs(&self) -> bool;
    fn selection_rule(&self) -> SelectionRule;
    fn field_defaults(&self) -> FieldDefaults;
}

pub trait Pipeline {
    fn extract(&self) -> Result<Vec<InputRecord>>;
    fn transform(&self, records: Vec<InputRecord>) -> Result<TransformResult>;
    fn load(&self, result: &TransformResult) -> Result<String>;
}
