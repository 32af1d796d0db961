// Adapters layer: filesystem implementations of the record source and listing sink ports.

pub mod sink;
pub mod source;

pub use sink::CsvDirectorySink;
pub use source::{read_csv_records, CsvFileSource, InputSource, NewestCsvSource};
