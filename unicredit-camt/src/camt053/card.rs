//! Имя продавца для карточных операций.
//!
//! У карточных операций Unicredit не заполняет контрагента, но кладет его в
//! назначение платежа:
//!
//! ```text
//! Vásárlás(2021.01.15)  Card:1234567890123456  ACME BOLT 1234,00 HUF
//! ```
//!
//! Шаблон рассчитан только на венгерскую локаль и суммы в HUF.

use regex::Regex;
use std::sync::OnceLock;

/// Префикс `AddtlTxInf`, которым банк помечает карточные операции.
pub const CARD_TRANSACTION_MARKER: &str = "+CMS CLT";

fn purchase_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(concat!(
            r"^V.s.rl.s\(\d{4}\.\d{2}\.\d{2}\)  +",
            r"Card:\d{16}  +(?P<merchant>.*) [0-9.]+,00 HUF$"
        ))
        .expect("valid card purchase regex")
    })
}

/// Операция помечена как карточная.
pub fn is_card_transaction(additional_info: &str) -> bool {
    additional_info.starts_with(CARD_TRANSACTION_MARKER)
}

/// Достает имя продавца из назначения платежа карточной покупки.
pub fn merchant_name(memo: &str) -> Option<&str> {
    purchase_re()
        .captures(memo)
        .and_then(|caps| caps.name("merchant"))
        .map(|m| m.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merchant_from_purchase_memo() {
        let memo = "Vásárlás(2021.01.15)  Card:1234567890123456  ACME BOLT 1234,00 HUF";
        assert_eq!(merchant_name(memo), Some("ACME BOLT"));
    }

    #[test]
    fn test_thousands_separator_in_amount() {
        let memo = "Vásárlás(2021.01.15)   Card:1234567890123456   TESCO 1.234,00 HUF";
        assert_eq!(merchant_name(memo), Some("TESCO"));
    }

    #[test]
    fn test_other_memos_do_not_match() {
        assert_eq!(merchant_name(""), None);
        assert_eq!(merchant_name("Átutalás ACME BOLT"), None);
        assert_eq!(
            merchant_name("Vásárlás(2021.01.15)  Card:1234567890123456  ACME 12,50 EUR"),
            None
        );
    }

    #[test]
    fn test_marker() {
        assert!(is_card_transaction("+CMS CLT 0012"));
        assert!(!is_card_transaction("ATUTALAS"));
    }
}
