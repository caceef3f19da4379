//! Базовые типы данных нормализованной выписки.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use std::fmt;

// =============================================================================
// Константы для CAMT.053 формата
// =============================================================================

/// Пространство имен CAMT.053, версия 001.02.
pub const CAMT053_NAMESPACE: &str = "urn:iso:std:iso:20022:tech:xsd:camt.053.001.02";

/// Тип баланса: начальный (Opening Booked).
pub const BALANCE_TYPE_OPENING: &str = "OPBD";
/// Тип баланса: конечный (Closing Booked).
pub const BALANCE_TYPE_CLOSING: &str = "CLBD";

/// Индикатор кредита (поступление).
pub const CREDIT_INDICATOR: &str = "CRDT";
/// Индикатор дебета (списание).
pub const DEBIT_INDICATOR: &str = "DBIT";

/// Идентификатор банка, если в выписке нет имени агента получателя.
pub const DEFAULT_BANK_ID: &str = "UNICREDIT";

/// Длина нормализованного номера счета.
pub const ACCOUNT_ID_LEN: usize = 23;

// =============================================================================
// Структуры данных
// =============================================================================

/// Нормализованный номер счета.
///
/// Дефисы удаляются, результат обрезается до 23 символов. В венгерском
/// IBAN (`HUkk bbbs sssx cccc cccc cccc cccx`) последний символ является
/// контрольной цифрой, учетные программы ее тоже отбрасывают.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AccountId(String);

impl AccountId {
    /// Нормализует номер счета из выписки или из настроек.
    pub fn normalize(raw: &str) -> Self {
        let id = raw
            .trim()
            .chars()
            .filter(|c| *c != '-')
            .take(ACCOUNT_ID_LEN)
            .collect();
        Self(id)
    }

    /// Строковое представление.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for AccountId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Тип транзакции.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionType {
    /// Поступление.
    Credit,
    /// Списание.
    Debit,
}

impl TransactionType {
    /// Имя типа в терминах OFX.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Credit => "CREDIT",
            TransactionType::Debit => "DEBIT",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Сводка по выбранной выписке.
#[derive(Debug, Clone, PartialEq)]
pub struct StatementSummary {
    /// Идентификатор банка.
    pub bank_id: String,
    /// Нормализованный номер счета.
    pub account_id: AccountId,
    /// Код валюты счета.
    pub currency: Option<String>,
    /// Начальный баланс.
    pub start_balance: Decimal,
    /// Дата начального баланса.
    pub start_date: NaiveDateTime,
    /// Конечный баланс.
    pub end_balance: Option<Decimal>,
    /// Дата конечного баланса.
    pub end_date: Option<NaiveDateTime>,
}

/// Строка выписки, полученная из одной записи `<Ntry>`.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionLine {
    /// Уникальный идентификатор (совпадает с `refnum`).
    pub id: Option<String>,
    /// Референс банка (AcctSvcrRef).
    pub refnum: Option<String>,
    /// Дата валютирования.
    pub date: NaiveDateTime,
    /// Дата проводки.
    pub date_user: NaiveDateTime,
    /// Сумма со знаком: списания отрицательные.
    pub amount: Decimal,
    /// Контрагент.
    pub payee: Option<String>,
    /// Назначение платежа с дополнительной информацией.
    pub memo: String,
    /// Тип транзакции.
    pub trntype: TransactionType,
}

/// Выписка целиком: сводка и все строки.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    /// Сводка.
    pub summary: StatementSummary,
    /// Строки в порядке документа.
    pub lines: Vec<TransactionLine>,
}
