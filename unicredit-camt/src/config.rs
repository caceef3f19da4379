//! Настройки плагина.
//!
//! Хост хранит настройки как пары ключ/значение в секции своего
//! конфигурационного файла. Плагин понимает единственный ключ `account`.

use crate::types::AccountId;

/// Ключ настройки, выбирающей счет.
pub const ACCOUNT_KEY: &str = "account";

/// Настройки плагина.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PluginSettings {
    /// Номер счета, выписку по которому нужно взять из файла.
    /// Дефисы допускаются.
    pub account: Option<String>,
}

impl PluginSettings {
    /// Настройки с заданным счетом.
    pub fn with_account(account: impl Into<String>) -> Self {
        Self {
            account: Some(account.into()),
        }
    }

    /// Собирает настройки из пар ключ/значение.
    ///
    /// Пустое значение `account` равносильно его отсутствию.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut settings = Self::default();

        for (key, value) in pairs {
            match key.as_ref() {
                ACCOUNT_KEY => {
                    let value: String = value.into();
                    settings.account = if value.trim().is_empty() { None } else { Some(value) };
                }
                other => tracing::debug!(key = other, "ignoring unknown setting"),
            }
        }

        settings
    }

    /// Нормализованный счет из настройки `account`.
    pub fn account_id(&self) -> Option<AccountId> {
        self.account.as_deref().map(AccountId::normalize)
    }
}
