//! Модуль обработки ошибок библиотеки.

use crate::types::AccountId;
use thiserror::Error;

/// Основной тип ошибки библиотеки.
#[derive(Debug, Error)]
pub enum Error {
    /// Ошибка ввода/вывода
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Документ не является корректным XML
    #[error("XML error: {0}")]
    Xml(String),

    /// Не удалось однозначно выбрать выписку
    #[error(transparent)]
    Selection(#[from] SelectionError),

    /// Отсутствует обязательное поле
    #[error("Malformed statement: missing {0}")]
    MalformedDocument(String),

    /// Значение поля не разбирается как число или дата
    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<quick_xml::DeError> for Error {
    fn from(err: quick_xml::DeError) -> Self {
        Error::Xml(err.to_string())
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::Xml(err.to_string())
    }
}

/// Причина, по которой не удалось выбрать выписку (`<Stmt>`) из файла.
///
/// Сообщения рассчитаны на то, что их увидит оператор: в них перечислены
/// все счета, найденные в файле, чтобы можно было сразу поправить настройку
/// `account`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    /// В файле нет ни одной выписки.
    #[error("No statement data in the file")]
    NoStatements,

    /// В файле несколько счетов, а настройка `account` не задана.
    #[error(
        "You have more than one accounts, please configure one with the \
         `account` setting: {}",
        join_ids(.available)
    )]
    AccountNotConfigured {
        /// Счета в порядке появления в документе.
        available: Vec<AccountId>,
    },

    /// Счет из настройки не найден в файле.
    #[error(
        "The account you specified ('{requested}') is not among the ones in \
         the file, please configure one with the `account` setting: {}",
        join_ids(.available)
    )]
    AccountNotFound {
        /// Нормализованный счет из настройки.
        requested: AccountId,
        /// Счета в порядке появления в документе.
        available: Vec<AccountId>,
    },
}

impl SelectionError {
    /// Счета, найденные в файле (пусто для [`SelectionError::NoStatements`]).
    pub fn available(&self) -> &[AccountId] {
        match self {
            SelectionError::NoStatements => &[],
            SelectionError::AccountNotConfigured { available }
            | SelectionError::AccountNotFound { available, .. } => available,
        }
    }
}

fn join_ids(ids: &[AccountId]) -> String {
    ids.iter()
        .map(AccountId::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Тип Result с ошибкой библиотеки.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_statements_message() {
        let err = Error::from(SelectionError::NoStatements);
        assert_eq!(err.to_string(), "No statement data in the file");
    }

    #[test]
    fn test_not_configured_lists_accounts() {
        let err = SelectionError::AccountNotConfigured {
            available: vec![
                AccountId::normalize("HU11-2222"),
                AccountId::normalize("HU33-4444"),
            ],
        };
        assert!(err.to_string().ends_with(": HU112222, HU334444"));
        assert_eq!(err.available().len(), 2);
    }

    #[test]
    fn test_not_found_names_requested_account() {
        let err = SelectionError::AccountNotFound {
            requested: AccountId::normalize("HU99"),
            available: vec![AccountId::normalize("HU11")],
        };
        let msg = err.to_string();
        assert!(msg.contains("('HU99') is not among the ones"));
        assert!(msg.ends_with(": HU11"));
    }
}
