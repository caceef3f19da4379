//! Модуль чтения выписок CAMT.053 (ISO 20022) в диалекте Unicredit.

pub mod card;
pub mod document;
pub mod parser;
pub mod selection;

pub use document::{
    Camt053Amount, Camt053Balance, Camt053Document, Camt053Entry, Camt053Statement,
    DateAndDateTime,
};
pub use parser::{ParsedStatement, StatementParser};
pub use selection::{select_statement, Candidates};
