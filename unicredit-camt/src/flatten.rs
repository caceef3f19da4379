//! Плоский список полей XML-файла.
//!
//! Помогает разобраться, какие элементы банк на самом деле заполняет в
//! выгрузке: каждый элемент с непустым текстом печатается как
//! `/BkToCstmrStmt/Stmt/Acct/Ccy: HUF`. Префиксы пространств имен
//! отбрасываются, корневой элемент в путь не входит.

use crate::error::{Error, Result};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::fmt;

/// Поле документа: путь и текст.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatField {
    /// Путь от корня, например `/BkToCstmrStmt/GrpHdr/MsgId`.
    pub path: String,
    /// Текст элемента без окружающих пробелов.
    pub text: String,
}

impl fmt::Display for FlatField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.text)
    }
}

struct Frame {
    path: String,
    has_children: bool,
    has_text: bool,
}

/// Обходит документ и возвращает поля в порядке документа.
///
/// Учитывается только текст до первого дочернего элемента.
pub fn flatten(content: &str) -> Result<Vec<FlatField>> {
    let mut reader = Reader::from_str(content);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<Frame> = Vec::new();
    let mut fields = Vec::new();

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let path = match stack.last_mut() {
                    Some(parent) => {
                        parent.has_children = true;
                        let name = e.local_name();
                        format!("{}/{}", parent.path, String::from_utf8_lossy(name.as_ref()))
                    }
                    None => String::new(),
                };
                stack.push(Frame {
                    path,
                    has_children: false,
                    has_text: false,
                });
            }
            Event::Empty(_) => {
                if let Some(parent) = stack.last_mut() {
                    parent.has_children = true;
                }
            }
            Event::Text(t) => {
                let text = t.unescape().map_err(|e| Error::Xml(e.to_string()))?;
                push_text(&mut stack, &mut fields, &text);
            }
            Event::CData(t) => {
                let text = String::from_utf8_lossy(&t).into_owned();
                push_text(&mut stack, &mut fields, &text);
            }
            Event::End(_) => {
                stack.pop();
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(fields)
}

fn push_text(stack: &mut [Frame], fields: &mut Vec<FlatField>, text: &str) {
    let text = text.trim();
    let depth = stack.len();
    let Some(frame) = stack.last_mut() else {
        return;
    };

    // корень и элементы, у которых текст идет после дочерних, пропускаем
    if depth < 2 || frame.has_children || frame.has_text || text.is_empty() {
        return;
    }

    frame.has_text = true;
    fields.push(FlatField {
        path: frame.path.clone(),
        text: text.to_string(),
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flatten_namespaced_document() {
        let xml = r#"<?xml version="1.0"?>
<c:Document xmlns:c="urn:iso:std:iso:20022:tech:xsd:camt.053.001.02">
  <c:BkToCstmrStmt>
    <c:GrpHdr><c:MsgId>M&amp;1</c:MsgId></c:GrpHdr>
    <c:Stmt>
      <c:Acct><c:Ccy>HUF</c:Ccy></c:Acct>
      <c:Ntry><c:Amt Ccy="HUF"> 10.00 </c:Amt><c:Empty/></c:Ntry>
    </c:Stmt>
  </c:BkToCstmrStmt>
</c:Document>"#;

        let fields = flatten(xml).unwrap();
        let lines: Vec<String> = fields.iter().map(ToString::to_string).collect();

        assert_eq!(
            lines,
            vec![
                "/BkToCstmrStmt/GrpHdr/MsgId: M&1",
                "/BkToCstmrStmt/Stmt/Acct/Ccy: HUF",
                "/BkToCstmrStmt/Stmt/Ntry/Amt: 10.00",
            ]
        );
    }

    #[test]
    fn test_text_after_children_is_ignored() {
        let fields = flatten("<Root><A><B>x</B>tail</A></Root>").unwrap();
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].path, "/A/B");
    }

    #[test]
    fn test_mismatched_tags_are_an_error() {
        assert!(flatten("<Root><A></B></Root>").is_err());
    }
}
