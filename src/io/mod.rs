//! Schedule files and CSV interchange.

pub mod csv_export;
pub mod csv_import;
pub mod file;

pub use csv_export::export_items;
pub use csv_import::{import_items, parse_items, CsvImport};
pub use file::{load_schedule, save_schedule};
