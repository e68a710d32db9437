// Charge Pipeline - Core Library
// Ingest → repair → transform → daily view, usable from the CLI and tests

pub mod config;
pub mod error;
pub mod extract;
pub mod identity;
pub mod ingest;
pub mod logging;
pub mod naturals;
pub mod records;
pub mod repair;
pub mod store;
pub mod transform;
pub mod view;

// Re-export commonly used types
pub use config::PipelineConfig;
pub use error::{InputError, NaturalsError};
pub use extract::{export_columns, extract, write_records};
pub use identity::{clean_identifier, clean_name, is_valid_identifier, title_case};
pub use ingest::{ingest, ingest_file, read_input, repair_rows, IngestReport};
pub use naturals::NaturalNumbersSet;
pub use records::{
    Charge, Company, DailyTotal, InputRow, RawRecord, NO_DATE_KEY, UNKNOWN_COMPANY,
    UNKNOWN_DATE, UNKNOWN_STATUS,
};
pub use repair::NameDirectory;
pub use store::{Collection, DocumentStore, MemoryStore, SqliteStore};
pub use transform::{parse_amount, parse_date, transform, transform_at, TransformReport};
pub use view::{aggregate, group_daily_totals, render_line};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
