pub mod formatter;
pub mod writer;

pub use formatter::{COLUMN_HEADERS, DECIMAL_PLACES, RowFormatter};
pub use writer::{CsvWriter, WriteMode};
