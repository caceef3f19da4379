//! Модуль сериализации выписки в CSV.

pub mod writer;

pub use writer::{CsvWriter, CSV_HEADER};
