//! Сериализация нормализованной выписки в CSV.

use crate::error::Result;
use crate::types::{Statement, TransactionLine};
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use std::io::{BufWriter, Write};

/// Заголовок CSV.
pub const CSV_HEADER: &str = "Date,User date,Amount,Currency,Type,Reference,Payee,Memo";

/// Writer для формата CSV.
pub struct CsvWriter;

impl CsvWriter {
    /// Записывает выписку в любой приемник, реализующий трейт Write.
    pub fn write_to<W: Write>(statement: &Statement, writer: &mut W) -> Result<()> {
        let mut buf_writer = BufWriter::new(writer);

        writeln!(buf_writer, "{}", CSV_HEADER)?;

        let currency = statement.summary.currency.as_deref().unwrap_or("");
        for line in &statement.lines {
            Self::write_line(&mut buf_writer, line, currency)?;
        }

        buf_writer.flush()?;
        Ok(())
    }

    fn write_line<W: Write>(writer: &mut W, line: &TransactionLine, currency: &str) -> Result<()> {
        writeln!(
            writer,
            "{},{},{},{},{},{},{},{}",
            Self::format_date(&line.date),
            Self::format_date(&line.date_user),
            Self::format_amount(line.amount),
            Self::escape_csv_field(currency),
            line.trntype,
            Self::escape_csv_field(line.refnum.as_deref().unwrap_or("")),
            Self::escape_csv_field(line.payee.as_deref().unwrap_or("")),
            Self::escape_csv_field(&line.memo),
        )?;

        Ok(())
    }

    fn format_date(date: &NaiveDateTime) -> String {
        date.format("%Y-%m-%d").to_string()
    }

    fn format_amount(amount: Decimal) -> String {
        format!("{:.2}", amount)
    }

    fn escape_csv_field(s: &str) -> String {
        if s.contains(',') || s.contains('"') || s.contains('\n') {
            format!("\"{}\"", s.replace('"', "\"\""))
        } else {
            s.to_string()
        }
    }
}

impl Statement {
    /// Записывает выписку в CSV.
    pub fn write_csv<W: Write>(&self, writer: &mut W) -> Result<()> {
        CsvWriter::write_to(self, writer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AccountId, StatementSummary, TransactionType};
    use chrono::NaiveDate;
    use std::str::FromStr;

    fn statement(lines: Vec<TransactionLine>) -> Statement {
        let day = NaiveDate::from_ymd_opt(2017, 11, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
        Statement {
            summary: StatementSummary {
                bank_id: "UNICREDIT".to_string(),
                account_id: AccountId::normalize("HU11"),
                currency: Some("HUF".to_string()),
                start_balance: Decimal::from(1000),
                start_date: day,
                end_balance: None,
                end_date: None,
            },
            lines,
        }
    }

    fn line(amount: &str, payee: Option<&str>, memo: &str) -> TransactionLine {
        let day = NaiveDate::from_ymd_opt(2017, 11, 2).unwrap().and_hms_opt(12, 0, 0).unwrap();
        TransactionLine {
            id: Some("R1".to_string()),
            refnum: Some("R1".to_string()),
            date: day,
            date_user: day,
            amount: Decimal::from_str(amount).unwrap(),
            payee: payee.map(str::to_string),
            memo: memo.to_string(),
            trntype: TransactionType::Debit,
        }
    }

    #[test]
    fn test_write_rows() {
        let stmt = statement(vec![line("-100.5", Some("ACME"), " +CMS CLT")]);
        let mut out = Vec::new();
        stmt.write_csv(&mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        let rows: Vec<&str> = text.lines().collect();
        assert_eq!(rows[0], CSV_HEADER);
        assert_eq!(rows[1], "2017-11-02,2017-11-02,-100.50,HUF,DEBIT,R1,ACME, +CMS CLT");
    }

    #[test]
    fn test_fields_with_commas_and_quotes_are_escaped() {
        let stmt = statement(vec![line("1", Some("Kovács, Bt."), "say \"hi\"")]);
        let mut out = Vec::new();
        CsvWriter::write_to(&stmt, &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains(",\"Kovács, Bt.\","));
        assert!(text.ends_with("\"say \"\"hi\"\"\"\n"));
    }

    #[test]
    fn test_empty_statement_has_only_header() {
        let mut out = Vec::new();
        CsvWriter::write_to(&statement(Vec::new()), &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), format!("{}\n", CSV_HEADER));
    }
}
