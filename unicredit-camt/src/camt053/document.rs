//! Модель документа CAMT.053 и доступ к его полям.
//!
//! Документ разбирается целиком в дерево serde-структур, описывающих только
//! ту часть схемы, которая нужна для выписки Unicredit. Каждому логическому
//! пути (`Acct/Id/Othr/Id`, `NtryDtls/TxDtls/RmtInf/Ustrd` и т.д.) соответствует
//! метод-аксессор. Аксессор возвращает первое совпадение (`Option`) или все
//! совпадения (срез/итератор); отсутствие поля ошибкой не считается.
//!
//! Имена элементов сопоставляются по локальной части, поэтому префикс
//! (`<c:Document xmlns:c="...">`) не мешает разбору. Пространство имен
//! определяется отдельно, по URI корневого элемента.

use crate::error::Result;
use crate::types::CAMT053_NAMESPACE;
use quick_xml::de::from_str;
use quick_xml::events::Event;
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::NsReader;
use serde::Deserialize;
use std::io::Read;

/// Документ `<Document>` целиком.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Camt053Document {
    #[serde(skip)]
    namespace: Option<String>,
    #[serde(rename = "BkToCstmrStmt")]
    bank_to_customer: Option<BankToCustomerStatement>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct BankToCustomerStatement {
    #[serde(rename = "Stmt", default)]
    statements: Vec<Camt053Statement>,
}

/// Выписка по одному счету (`<Stmt>`).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Camt053Statement {
    id: Option<String>,
    acct: Option<Camt053Account>,
    #[serde(default)]
    bal: Vec<Camt053Balance>,
    #[serde(default)]
    ntry: Vec<Camt053Entry>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Camt053Account {
    id: Option<AccountIdentification>,
    ccy: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AccountIdentification {
    #[serde(rename = "IBAN")]
    iban: Option<String>,
    othr: Option<GenericIdentification>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct GenericIdentification {
    id: Option<String>,
}

/// Баланс (`<Bal>`).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Camt053Balance {
    tp: Option<BalanceType>,
    amt: Option<Camt053Amount>,
    dt: Option<DateAndDateTime>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct BalanceType {
    cd_or_prtry: Option<CodeOrProprietary>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct CodeOrProprietary {
    cd: Option<String>,
}

/// Сумма с атрибутом валюты: `<Amt Ccy="HUF">1000.00</Amt>`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Camt053Amount {
    #[serde(rename = "@Ccy")]
    currency: Option<String>,
    #[serde(rename = "$text", default)]
    value: String,
}

impl Camt053Amount {
    /// Текст суммы как есть.
    pub fn text(&self) -> &str {
        &self.value
    }

    /// Валюта из атрибута `Ccy`.
    pub fn currency(&self) -> Option<&str> {
        self.currency.as_deref()
    }
}

/// Узел даты, содержащий либо `<Dt>`, либо `<DtTm>`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DateAndDateTime {
    dt: Option<String>,
    dt_tm: Option<String>,
}

impl DateAndDateTime {
    /// `Dt`
    pub fn date(&self) -> Option<&str> {
        non_empty(self.dt.as_deref())
    }

    /// `DtTm`
    pub fn date_time(&self) -> Option<&str> {
        non_empty(self.dt_tm.as_deref())
    }
}

/// Запись (`<Ntry>`).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Camt053Entry {
    amt: Option<Camt053Amount>,
    cdt_dbt_ind: Option<String>,
    bookg_dt: Option<DateAndDateTime>,
    val_dt: Option<DateAndDateTime>,
    acct_svcr_ref: Option<String>,
    #[serde(default)]
    ntry_dtls: Vec<EntryDetails>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct EntryDetails {
    #[serde(default)]
    tx_dtls: Vec<TransactionDetails>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct TransactionDetails {
    rltd_pties: Option<RelatedParties>,
    rltd_agts: Option<RelatedAgents>,
    rmt_inf: Option<RemittanceInformation>,
    addtl_tx_inf: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RelatedParties {
    dbtr: Option<Party>,
    cdtr: Option<Party>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Party {
    nm: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RelatedAgents {
    cdtr_agt: Option<Agent>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Agent {
    fin_instn_id: Option<FinancialInstitution>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct FinancialInstitution {
    nm: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RemittanceInformation {
    #[serde(default)]
    ustrd: Vec<String>,
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// URI пространства имен корневого элемента, к которому привязан его префикс
/// или `xmlns` по умолчанию.
fn root_namespace(content: &str) -> Result<Option<String>> {
    let mut reader = NsReader::from_str(content);

    loop {
        match reader.read_event()? {
            Event::Start(e) | Event::Empty(e) => {
                let (ns, _) = reader.resolve_element(e.name());
                return Ok(match ns {
                    ResolveResult::Bound(Namespace(uri)) => {
                        Some(String::from_utf8_lossy(uri).into_owned())
                    }
                    _ => None,
                });
            }
            Event::Eof => return Ok(None),
            _ => {}
        }
    }
}

impl Camt053Document {
    /// Парсит CAMT.053 из любого источника, реализующего трейт Read.
    pub fn from_read<R: Read>(reader: &mut R) -> Result<Self> {
        let mut content = String::new();
        reader.read_to_string(&mut content)?;
        Self::parse(&content)
    }

    /// Парсит CAMT.053 из строки.
    pub fn parse(content: &str) -> Result<Self> {
        let content = content.trim_start_matches('\u{feff}');
        let mut document: Camt053Document = from_str(content)?;
        document.namespace = root_namespace(content)?;

        if !document.namespace_matches() {
            tracing::warn!(
                namespace = document.namespace.as_deref().unwrap_or(""),
                "document is not in the {} namespace, no statements will be read",
                CAMT053_NAMESPACE
            );
        }

        Ok(document)
    }

    /// URI пространства имен корневого элемента.
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// Документ объявлен в пространстве имен CAMT.053.001.02.
    pub fn namespace_matches(&self) -> bool {
        self.namespace.as_deref() == Some(CAMT053_NAMESPACE)
    }

    /// `BkToCstmrStmt/Stmt`: все выписки документа.
    ///
    /// Для документа из чужого пространства имен совпадений нет.
    pub fn statements(&self) -> &[Camt053Statement] {
        match &self.bank_to_customer {
            Some(b2c) if self.namespace_matches() => &b2c.statements,
            _ => &[],
        }
    }
}

impl Camt053Statement {
    /// `Id`
    pub fn statement_id(&self) -> Option<&str> {
        non_empty(self.id.as_deref())
    }

    /// `Acct/Id/Othr/Id`, иначе `Acct/Id/IBAN`.
    pub fn account_id(&self) -> Option<&str> {
        let id = self.acct.as_ref()?.id.as_ref()?;
        let other = id.othr.as_ref().and_then(|o| non_empty(o.id.as_deref()));
        other.or_else(|| non_empty(id.iban.as_deref()))
    }

    /// `Acct/Ccy`
    pub fn currency(&self) -> Option<&str> {
        non_empty(self.acct.as_ref()?.ccy.as_deref())
    }

    /// `Bal`
    pub fn balances(&self) -> &[Camt053Balance] {
        &self.bal
    }

    /// `Ntry`
    pub fn entries(&self) -> &[Camt053Entry] {
        &self.ntry
    }

    /// `Ntry/NtryDtls/TxDtls/RltdAgts/CdtrAgt/FinInstnId/Nm`: первое
    /// совпадение среди всех записей выписки.
    pub fn creditor_agent_name(&self) -> Option<&str> {
        self.ntry.iter().find_map(|entry| {
            entry.tx_details().find_map(|tx| {
                let agent = tx.rltd_agts.as_ref()?.cdtr_agt.as_ref()?;
                non_empty(agent.fin_instn_id.as_ref()?.nm.as_deref())
            })
        })
    }
}

impl Camt053Balance {
    /// `Tp/CdOrPrtry/Cd`
    pub fn type_code(&self) -> Option<&str> {
        let code = self.tp.as_ref()?.cd_or_prtry.as_ref()?;
        non_empty(code.cd.as_deref())
    }

    /// `Amt`
    pub fn amount(&self) -> Option<&Camt053Amount> {
        self.amt.as_ref()
    }

    /// `Dt`
    pub fn date(&self) -> Option<&DateAndDateTime> {
        self.dt.as_ref()
    }
}

impl Camt053Entry {
    fn tx_details(&self) -> impl Iterator<Item = &TransactionDetails> {
        self.ntry_dtls.iter().flat_map(|d| d.tx_dtls.iter())
    }

    /// `CdtDbtInd`
    pub fn indicator(&self) -> Option<&str> {
        non_empty(self.cdt_dbt_ind.as_deref())
    }

    /// `Amt`
    pub fn amount(&self) -> Option<&Camt053Amount> {
        self.amt.as_ref()
    }

    /// `ValDt`
    pub fn value_date(&self) -> Option<&DateAndDateTime> {
        self.val_dt.as_ref()
    }

    /// `BookgDt`
    pub fn booking_date(&self) -> Option<&DateAndDateTime> {
        self.bookg_dt.as_ref()
    }

    /// `AcctSvcrRef`
    pub fn servicer_reference(&self) -> Option<&str> {
        self.acct_svcr_ref.as_deref()
    }

    /// `NtryDtls/TxDtls/RmtInf/Ustrd`
    pub fn remittance_text(&self) -> Option<&str> {
        self.tx_details().find_map(|tx| {
            tx.rmt_inf
                .as_ref()
                .and_then(|r| r.ustrd.first())
                .map(String::as_str)
        })
    }

    /// `NtryDtls/TxDtls/AddtlTxInf`
    pub fn additional_info(&self) -> Option<&str> {
        self.tx_details().find_map(|tx| tx.addtl_tx_inf.as_deref())
    }

    /// `NtryDtls/TxDtls/RltdPties/Cdtr/Nm`
    pub fn creditor_name(&self) -> Option<&str> {
        self.tx_details().find_map(|tx| {
            let party = tx.rltd_pties.as_ref()?.cdtr.as_ref()?;
            party.nm.as_deref()
        })
    }

    /// `NtryDtls/TxDtls/RltdPties/Dbtr/Nm`
    pub fn debtor_name(&self) -> Option<&str> {
        self.tx_details().find_map(|tx| {
            let party = tx.rltd_pties.as_ref()?.dbtr.as_ref()?;
            party.nm.as_deref()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_STATEMENTS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Document xmlns="urn:iso:std:iso:20022:tech:xsd:camt.053.001.02">
  <BkToCstmrStmt>
    <GrpHdr><MsgId>MSG1</MsgId></GrpHdr>
    <Stmt>
      <Id>S1</Id>
      <Acct><Id><Othr><Id>10918001-00000001-00000001</Id></Othr></Id><Ccy>HUF</Ccy></Acct>
      <Bal>
        <Tp><CdOrPrtry><Cd>OPBD</Cd></CdOrPrtry></Tp>
        <Amt Ccy="HUF">1000.00</Amt>
        <Dt><Dt>2017-11-01</Dt></Dt>
      </Bal>
      <Ntry>
        <Amt Ccy="HUF">10.00</Amt>
        <CdtDbtInd>DBIT</CdtDbtInd>
        <BookgDt><DtTm>2017-11-02T10:11:12</DtTm></BookgDt>
        <ValDt><Dt>2017-11-02</Dt></ValDt>
        <AcctSvcrRef>REF1</AcctSvcrRef>
        <NtryDtls>
          <TxDtls>
            <RltdPties><Cdtr><Nm>Shop Kft</Nm></Cdtr></RltdPties>
            <RltdAgts><CdtrAgt><FinInstnId><Nm>OTP BANK</Nm></FinInstnId></CdtrAgt></RltdAgts>
            <RmtInf><Ustrd>first</Ustrd><Ustrd>second</Ustrd></RmtInf>
            <AddtlTxInf>+CMS CLT</AddtlTxInf>
          </TxDtls>
        </NtryDtls>
      </Ntry>
    </Stmt>
    <Stmt>
      <Acct><Id><IBAN>HU42117730161111101800000000</IBAN></Id></Acct>
    </Stmt>
  </BkToCstmrStmt>
</Document>
"#;

    #[test]
    fn test_statements_in_document_order() {
        let doc = Camt053Document::parse(TWO_STATEMENTS).unwrap();
        assert!(doc.namespace_matches());

        let stmts = doc.statements();
        assert_eq!(stmts.len(), 2);
        assert_eq!(stmts[0].statement_id(), Some("S1"));
        assert_eq!(stmts[0].account_id(), Some("10918001-00000001-00000001"));
        assert_eq!(stmts[1].account_id(), Some("HU42117730161111101800000000"));
        assert_eq!(stmts[1].currency(), None);
        assert!(stmts[1].entries().is_empty());
    }

    #[test]
    fn test_balance_fields() {
        let doc = Camt053Document::parse(TWO_STATEMENTS).unwrap();
        let bal = &doc.statements()[0].balances()[0];

        assert_eq!(bal.type_code(), Some("OPBD"));
        assert_eq!(bal.amount().map(Camt053Amount::text), Some("1000.00"));
        assert_eq!(bal.amount().and_then(Camt053Amount::currency), Some("HUF"));
        assert_eq!(bal.date().and_then(DateAndDateTime::date), Some("2017-11-01"));
    }

    #[test]
    fn test_entry_fields() {
        let doc = Camt053Document::parse(TWO_STATEMENTS).unwrap();
        let stmt = &doc.statements()[0];
        let entry = &stmt.entries()[0];

        assert_eq!(entry.indicator(), Some("DBIT"));
        assert_eq!(entry.servicer_reference(), Some("REF1"));
        assert_eq!(entry.remittance_text(), Some("first"));
        assert_eq!(entry.additional_info(), Some("+CMS CLT"));
        assert_eq!(entry.creditor_name(), Some("Shop Kft"));
        assert_eq!(entry.debtor_name(), None);

        let booked = entry.booking_date().unwrap();
        assert_eq!(booked.date(), None);
        assert_eq!(booked.date_time(), Some("2017-11-02T10:11:12"));

        assert_eq!(stmt.creditor_agent_name(), Some("OTP BANK"));
    }

    #[test]
    fn test_foreign_namespace_has_no_statements() {
        let xml = TWO_STATEMENTS.replace("camt.053.001.02", "camt.053.001.08");
        let doc = Camt053Document::parse(&xml).unwrap();

        assert!(!doc.namespace_matches());
        assert!(doc.statements().is_empty());
    }

    #[test]
    fn test_prefixed_namespace_is_accepted() {
        let xml = TWO_STATEMENTS
            .replace("xmlns=", "xmlns:c=")
            .replace("<", "<c:")
            .replace("<c:/", "</c:")
            .replace("<c:?xml", "<?xml");
        let doc = Camt053Document::parse(&xml).unwrap();

        assert_eq!(doc.namespace(), Some(CAMT053_NAMESPACE));
        let stmts = doc.statements();
        assert_eq!(stmts.len(), 2);
        assert_eq!(stmts[0].account_id(), Some("10918001-00000001-00000001"));
        assert_eq!(stmts[0].entries()[0].additional_info(), Some("+CMS CLT"));
    }

    #[test]
    fn test_prefix_bound_to_other_namespace_has_no_statements() {
        let xml = TWO_STATEMENTS.replace(
            "<Document xmlns=\"urn:iso:std:iso:20022:tech:xsd:camt.053.001.02\">",
            "<c:Document xmlns=\"urn:iso:std:iso:20022:tech:xsd:camt.053.001.02\" xmlns:c=\"urn:example:other\">",
        )
        .replace("</Document>", "</c:Document>");
        let doc = Camt053Document::parse(&xml).unwrap();

        assert_eq!(doc.namespace(), Some("urn:example:other"));
        assert!(doc.statements().is_empty());
    }

    #[test]
    fn test_balances_after_entries_are_collected() {
        let xml = TWO_STATEMENTS.replace(
            "</Ntry>",
            "</Ntry>\n<Bal><Tp><CdOrPrtry><Cd>CLBD</Cd></CdOrPrtry></Tp><Amt Ccy=\"HUF\">990.00</Amt><Dt><Dt>2017-11-30</Dt></Dt></Bal>",
        );
        let doc = Camt053Document::parse(&xml).unwrap();
        let codes: Vec<_> = doc.statements()[0]
            .balances()
            .iter()
            .filter_map(Camt053Balance::type_code)
            .collect();

        assert_eq!(codes, vec!["OPBD", "CLBD"]);
        assert_eq!(doc.statements()[0].entries().len(), 1);
    }

    #[test]
    fn test_broken_xml_is_an_error() {
        assert!(Camt053Document::parse("<Document><BkToCstmrStmt></Document>").is_err());
    }
}
