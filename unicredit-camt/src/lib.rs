//! # Unicredit CAMT
//!
//! Библиотека чтения выписок CAMT.053 (ISO 20022) венгерского Unicredit
//! в нормализованную выписку: сводка по счету и строки транзакций, готовые
//! к конвертации в OFX.
//!
//! ## Выбор счета
//!
//! Выгрузка может содержать выписки по нескольким счетам. Если выписка одна,
//! настройка `account` не нужна. Если их несколько, без `account` разбор
//! завершается ошибкой со списком счетов из файла.
//!
//! ## Пример использования
//!
//! ```rust,ignore
//! use unicredit_camt::{PluginSettings, UnicreditPlugin};
//!
//! let plugin = UnicreditPlugin::new(PluginSettings::with_account("10918001-00000001-00000001"));
//! let statement = plugin.parser("STATEMENT_20171130.xml").parse()?;
//! for line in &statement.lines {
//!     println!("{} {} {}", line.date, line.amount, line.memo);
//! }
//! ```

pub mod camt053;
pub mod config;
pub mod csv;
pub mod error;
pub mod flatten;
pub mod plugin;
pub mod types;

pub use camt053::{Camt053Document, ParsedStatement, StatementParser};
pub use config::PluginSettings;
pub use csv::CsvWriter;
pub use error::{Error, Result, SelectionError};
pub use flatten::{flatten, FlatField};
pub use plugin::{UnicreditParser, UnicreditPlugin};
pub use types::*;

/// Парсит выписку из строки.
///
/// `account` выбирает счет, если в файле несколько выписок.
pub fn parse_statement(content: &str, account: Option<&str>) -> Result<Statement> {
    let document = Camt053Document::parse(content)?;
    StatementParser::new(account).parse_statement(&document)
}
