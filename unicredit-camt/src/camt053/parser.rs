//! Разбор выписки CAMT.053 в нормализованную выписку.

use crate::camt053::card;
use crate::camt053::document::{
    Camt053Amount, Camt053Document, Camt053Entry, Camt053Statement, DateAndDateTime,
};
use crate::camt053::selection::select_statement;
use crate::error::{Error, Result};
use crate::types::{
    AccountId, Statement, StatementSummary, TransactionLine, TransactionType,
    BALANCE_TYPE_CLOSING, BALANCE_TYPE_OPENING, CREDIT_INDICATOR, DEBIT_INDICATOR,
    DEFAULT_BANK_ID,
};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use std::collections::HashMap;

/// Парсер выписки Unicredit.
///
/// Один экземпляр отвечает за выбор выписки по настройке `account`.
#[derive(Debug, Clone, Default)]
pub struct StatementParser {
    account: Option<AccountId>,
}

/// Выбранная выписка: сводка уже посчитана, строки строятся по запросу.
#[derive(Debug)]
pub struct ParsedStatement<'a> {
    summary: StatementSummary,
    statement: &'a Camt053Statement,
}

impl StatementParser {
    /// Создает парсер. `account` может содержать дефисы.
    pub fn new(account: Option<&str>) -> Self {
        Self {
            account: account.map(AccountId::normalize),
        }
    }

    /// Счет, по которому выбирается выписка.
    pub fn account(&self) -> Option<&AccountId> {
        self.account.as_ref()
    }

    /// Выбирает выписку и строит сводку по ней.
    pub fn parse<'a>(&self, document: &'a Camt053Document) -> Result<ParsedStatement<'a>> {
        let statements = document.statements();
        tracing::debug!(count = statements.len(), "statements found");

        let (account_id, statement) = select_statement(statements, self.account.as_ref())?;
        let summary = Self::parse_summary(account_id, statement)?;

        Ok(ParsedStatement { summary, statement })
    }

    /// Разбирает документ и сразу собирает все строки.
    pub fn parse_statement(&self, document: &Camt053Document) -> Result<Statement> {
        self.parse(document)?.into_statement()
    }

    fn parse_summary(account_id: AccountId, stmt: &Camt053Statement) -> Result<StatementSummary> {
        let bank_id = stmt
            .creditor_agent_name()
            .unwrap_or(DEFAULT_BANK_ID)
            .to_string();

        let balances = Self::parse_balances(stmt)?;
        let (start_balance, start_date) = balances
            .get(BALANCE_TYPE_OPENING)
            .copied()
            .ok_or_else(|| Error::MalformedDocument(format!("Bal with code {}", BALANCE_TYPE_OPENING)))?;
        let closing = balances.get(BALANCE_TYPE_CLOSING).copied();

        Ok(StatementSummary {
            bank_id,
            account_id,
            currency: stmt.currency().map(str::to_string),
            start_balance,
            start_date,
            end_balance: closing.map(|(amount, _)| amount),
            end_date: closing.map(|(_, date)| date),
        })
    }

    fn parse_balances(stmt: &Camt053Statement) -> Result<HashMap<&str, (Decimal, NaiveDateTime)>> {
        let mut balances = HashMap::new();

        for bal in stmt.balances() {
            let code = bal
                .type_code()
                .ok_or_else(|| Error::MalformedDocument("Bal/Tp/CdOrPrtry/Cd".to_string()))?;
            let amount = parse_amount(bal.amount(), "Bal/Amt")?;
            let date = parse_date(bal.date(), "Bal/Dt")?;

            balances.insert(code, (amount, date));
        }

        Ok(balances)
    }

    /// Превращает одну запись `<Ntry>` в строку выписки.
    pub fn parse_record(entry: &Camt053Entry) -> Result<TransactionLine> {
        let amount = parse_amount(entry.amount(), "Ntry/Amt")?.abs();

        let (amount, payee, trntype) = match entry.indicator() {
            Some(DEBIT_INDICATOR) => (-amount, entry.creditor_name(), TransactionType::Debit),
            Some(CREDIT_INDICATOR) => (amount, entry.debtor_name(), TransactionType::Credit),
            Some(other) => {
                return Err(Error::Parse(format!("unknown Ntry/CdtDbtInd: {}", other)));
            }
            None => return Err(Error::MalformedDocument("Ntry/CdtDbtInd".to_string())),
        };
        let mut payee = payee.filter(|p| !p.is_empty()).map(str::to_string);

        let date = parse_date(entry.value_date(), "Ntry/ValDt")?;
        let date_user = parse_date(entry.booking_date(), "Ntry/BookgDt")?;

        let refnum = entry.servicer_reference().map(str::to_string);

        let info = entry.additional_info().ok_or_else(|| {
            Error::MalformedDocument("Ntry/NtryDtls/TxDtls/AddtlTxInf".to_string())
        })?;

        let mut memo = entry.remittance_text().unwrap_or_default().to_string();
        if payee.is_none() && card::is_card_transaction(info) {
            payee = card::merchant_name(&memo).map(str::to_string);
        }
        memo.push(' ');
        memo.push_str(info);

        Ok(TransactionLine {
            id: refnum.clone(),
            refnum,
            date,
            date_user,
            amount,
            payee,
            memo,
            trntype,
        })
    }
}

impl<'a> ParsedStatement<'a> {
    /// Сводка по выписке.
    pub fn summary(&self) -> &StatementSummary {
        &self.summary
    }

    /// Количество записей в выписке.
    pub fn entry_count(&self) -> usize {
        self.statement.entries().len()
    }

    /// Строки выписки в порядке документа.
    ///
    /// Каждая запись разбирается независимо, при первом обращении.
    pub fn lines(&self) -> impl Iterator<Item = Result<TransactionLine>> + 'a {
        self.statement.entries().iter().map(StatementParser::parse_record)
    }

    /// Собирает сводку и все строки.
    pub fn into_statement(self) -> Result<Statement> {
        let lines = self.lines().collect::<Result<Vec<_>>>()?;
        Ok(Statement {
            summary: self.summary,
            lines,
        })
    }
}

/// Парсит сумму как обычное десятичное число.
fn parse_amount(node: Option<&Camt053Amount>, path: &str) -> Result<Decimal> {
    let text = node
        .map(|amt| amt.text().trim())
        .filter(|t| !t.is_empty())
        .ok_or_else(|| Error::MalformedDocument(path.to_string()))?;

    Decimal::from_str_exact(text)
        .or_else(|_| text.parse::<Decimal>())
        .map_err(|e| Error::Parse(format!("{} '{}': {}", path, text, e)))
}

/// Парсит узел `ValDt`/`BookgDt`/`Bal/Dt`: `Dt` имеет приоритет над `DtTm`.
fn parse_date(node: Option<&DateAndDateTime>, path: &str) -> Result<NaiveDateTime> {
    let node = node.ok_or_else(|| Error::MalformedDocument(path.to_string()))?;

    if let Some(date) = node.date() {
        let date = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
            .map_err(|e| Error::Parse(format!("{}/Dt '{}': {}", path, date, e)))?;
        return Ok(date.and_time(NaiveTime::MIN));
    }

    let date_time = node
        .date_time()
        .ok_or_else(|| Error::MalformedDocument(format!("{}/Dt or {}/DtTm", path, path)))?
        .trim();

    NaiveDateTime::parse_from_str(date_time, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| DateTime::parse_from_rfc3339(date_time).map(|dt| dt.naive_local()))
        .map_err(|e| Error::Parse(format!("{}/DtTm '{}': {}", path, date_time, e)))
}
