//! Точка входа для хоста конвертации.

use crate::camt053::{Camt053Document, StatementParser};
use crate::config::PluginSettings;
use crate::error::Result;
use crate::types::Statement;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Плагин Unicredit (XML).
#[derive(Debug, Clone, Default)]
pub struct UnicreditPlugin {
    settings: PluginSettings,
}

impl UnicreditPlugin {
    /// Создает плагин с настройками хоста.
    pub fn new(settings: PluginSettings) -> Self {
        Self { settings }
    }

    /// Настройки плагина.
    pub fn settings(&self) -> &PluginSettings {
        &self.settings
    }

    /// Возвращает парсер для одного файла.
    pub fn parser(&self, path: impl AsRef<Path>) -> UnicreditParser {
        UnicreditParser {
            path: path.as_ref().to_path_buf(),
            parser: StatementParser::new(self.settings.account.as_deref()),
        }
    }
}

/// Парсер одного файла выписки.
#[derive(Debug, Clone)]
pub struct UnicreditParser {
    path: PathBuf,
    parser: StatementParser,
}

impl UnicreditParser {
    /// Путь к файлу.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Читает файл и возвращает выписку со всеми строками.
    pub fn parse(&self) -> Result<Statement> {
        tracing::debug!(path = %self.path.display(), "reading statement");

        let mut file = File::open(&self.path)?;
        let document = Camt053Document::from_read(&mut file)?;
        let statement = self.parser.parse_statement(&document)?;

        tracing::debug!(
            account = %statement.summary.account_id,
            lines = statement.lines.len(),
            "statement parsed"
        );
        Ok(statement)
    }
}
