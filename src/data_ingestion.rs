pub mod cleaner;
pub mod error;
pub mod reader;

pub use cleaner::{CleaningStats, RecordCleaner};
pub use error::{IngestError, IngestResult};
pub use reader::{account_name, decode_export, ExportReader, ExportReaderConfig};
