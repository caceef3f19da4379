//! Выбор одной выписки из файла, в котором их может быть несколько.
//!
//! Выгрузка по нескольким счетам содержит по `<Stmt>` на каждый счет.
//! Угадывать нужный счет мы не пытаемся: без настройки `account` подходит
//! только файл с единственной выпиской, во всех остальных случаях ошибка
//! перечисляет найденные счета.

use crate::camt053::document::Camt053Statement;
use crate::error::{Error, Result, SelectionError};
use crate::types::AccountId;

/// Выписки файла, проиндексированные по нормализованному счету.
///
/// Порядок соответствует первому появлению счета в документе. Повторный
/// счет заменяет выписку, но сохраняет позицию.
#[derive(Debug)]
pub struct Candidates<'a> {
    by_account: Vec<(AccountId, &'a Camt053Statement)>,
    blocks: usize,
}

impl<'a> Candidates<'a> {
    /// Индексирует выписки документа.
    ///
    /// Выписка без номера счета считается поврежденной.
    pub fn index(statements: &'a [Camt053Statement]) -> Result<Self> {
        let mut by_account: Vec<(AccountId, &'a Camt053Statement)> =
            Vec::with_capacity(statements.len());

        for stmt in statements {
            let raw = stmt
                .account_id()
                .ok_or_else(|| Error::MalformedDocument("Stmt/Acct/Id/Othr/Id".to_string()))?;
            let id = AccountId::normalize(raw);

            match by_account.iter_mut().find(|(known, _)| *known == id) {
                Some(slot) => {
                    tracing::warn!(account = %id, "account appears twice, keeping the last statement");
                    slot.1 = stmt;
                }
                None => by_account.push((id, stmt)),
            }
        }

        Ok(Self {
            by_account,
            blocks: statements.len(),
        })
    }

    /// Нормализованные счета в порядке документа.
    pub fn accounts(&self) -> Vec<AccountId> {
        self.by_account.iter().map(|(id, _)| id.clone()).collect()
    }

    /// Количество различных счетов.
    pub fn len(&self) -> usize {
        self.by_account.len()
    }

    /// Количество блоков `<Stmt>`, включая повторы счетов.
    pub fn blocks(&self) -> usize {
        self.blocks
    }

    /// В файле нет выписок.
    pub fn is_empty(&self) -> bool {
        self.by_account.is_empty()
    }

    /// Выбирает выписку по настройке `account`.
    ///
    /// Без настройки подходит только файл ровно с одним блоком `<Stmt>`.
    pub fn select(
        &self,
        filter: Option<&AccountId>,
    ) -> std::result::Result<(&AccountId, &'a Camt053Statement), SelectionError> {
        if self.by_account.is_empty() {
            return Err(SelectionError::NoStatements);
        }

        let (id, stmt) = match filter {
            None if self.blocks == 1 => &self.by_account[0],
            None => {
                return Err(SelectionError::AccountNotConfigured {
                    available: self.accounts(),
                })
            }
            Some(wanted) => self
                .by_account
                .iter()
                .find(|(id, _)| id == wanted)
                .ok_or_else(|| SelectionError::AccountNotFound {
                    requested: wanted.clone(),
                    available: self.accounts(),
                })?,
        };

        tracing::debug!(account = %id, "statement selected");
        Ok((id, *stmt))
    }
}

/// Выбирает выписку из списка кандидатов.
pub fn select_statement<'a>(
    statements: &'a [Camt053Statement],
    filter: Option<&AccountId>,
) -> Result<(AccountId, &'a Camt053Statement)> {
    let candidates = Candidates::index(statements)?;
    let (id, stmt) = candidates.select(filter)?;
    Ok((id.clone(), stmt))
}
