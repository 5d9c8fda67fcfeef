//! SPDX license expressions: parsing into store objects and rendering back.
//!
//! `WITH` binds tighter than `AND`, which binds tighter than `OR`.

use lazy_static::lazy_static;
use regex::Regex;

use spdx_core_store::vocab::*;
use spdx_core_store::{Error, IdType, ModelStore, StoredValue, TypedValue};

/// A parsed license expression.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LicenseExpression {
    None,
    NoAssertion,
    /// A license from the SPDX license list, e.g. `Apache-2.0`.
    Listed(String),
    /// A license defined in the document, `LicenseRef-...`.
    LicenseRef(String),
    /// A license defined in another document, `DocumentRef-X:LicenseRef-Y`.
    External(String),
    OrLater(Box<LicenseExpression>),
    WithException(Box<LicenseExpression>, String),
    And(Vec<LicenseExpression>),
    Or(Vec<LicenseExpression>),
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Token {
    Open,
    Close,
    And,
    Or,
    With,
    Id(String),
}

fn tokenize(text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut word = String::new();
    let flush = |word: &mut String, tokens: &mut Vec<Token>| {
        if word.is_empty() {
            return;
        }
        let token = if word.eq_ignore_ascii_case("AND") {
            Token::And
        } else if word.eq_ignore_ascii_case("OR") {
            Token::Or
        } else if word.eq_ignore_ascii_case("WITH") {
            Token::With
        } else {
            Token::Id(word.clone())
        };
        tokens.push(token);
        word.clear();
    };
    for c in text.chars() {
        match c {
            '(' | ')' => {
                flush(&mut word, &mut tokens);
                tokens.push(if c == '(' { Token::Open } else { Token::Close });
            }
            c if c.is_whitespace() => flush(&mut word, &mut tokens),
            c => word.push(c),
        }
    }
    flush(&mut word, &mut tokens);
    tokens
}

fn syntax_error(text: &str, detail: &str) -> Error {
    Error::invalid_value(format!("invalid license expression '{}': {}", text, detail))
}

fn simple_license(id: &str, text: &str) -> Result<LicenseExpression, Error> {
    lazy_static! {
        static ref LISTED_ID: Regex = Regex::new(r"^[A-Za-z0-9][A-Za-z0-9.\-]*$").unwrap();
        static ref EXTERNAL_REF: Regex =
            Regex::new(r"^DocumentRef-[A-Za-z0-9.\-+]+:LicenseRef-[A-Za-z0-9.\-+]+$").unwrap();
    }

    if id == NONE_VALUE {
        Ok(LicenseExpression::None)
    } else if id == NOASSERTION_VALUE {
        Ok(LicenseExpression::NoAssertion)
    } else if let Some(stem) = id.strip_suffix('+').filter(|stem| !stem.is_empty()) {
        match simple_license(stem, text)? {
            base @ (LicenseExpression::Listed(_) | LicenseExpression::LicenseRef(_)) => {
                Ok(LicenseExpression::OrLater(Box::new(base)))
            }
            _ => Err(syntax_error(text, "'+' must follow a license identifier")),
        }
    } else if id.starts_with(LICENSE_REF_PREFIX) && id.len() > LICENSE_REF_PREFIX.len() {
        Ok(LicenseExpression::LicenseRef(id.to_string()))
    } else if EXTERNAL_REF.is_match(id) {
        Ok(LicenseExpression::External(id.to_string()))
    } else if LISTED_ID.is_match(id) {
        Ok(LicenseExpression::Listed(id.to_string()))
    } else {
        Err(syntax_error(text, &format!("'{}' is not a license identifier", id)))
    }
}

struct Parser<'a> {
    text: &'a str,
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        token
    }

    fn parse_or(&mut self) -> Result<LicenseExpression, Error> {
        let mut members = vec![self.parse_and()?];
        while self.peek() == Some(&Token::Or) {
            self.pos += 1;
            members.push(self.parse_and()?);
        }
        Ok(join(members, LicenseExpression::Or, |e| match e {
            LicenseExpression::Or(inner) => Ok(inner),
            other => Err(other),
        }))
    }

    fn parse_and(&mut self) -> Result<LicenseExpression, Error> {
        let mut members = vec![self.parse_with()?];
        while self.peek() == Some(&Token::And) {
            self.pos += 1;
            members.push(self.parse_with()?);
        }
        Ok(join(members, LicenseExpression::And, |e| match e {
            LicenseExpression::And(inner) => Ok(inner),
            other => Err(other),
        }))
    }

    fn parse_with(&mut self) -> Result<LicenseExpression, Error> {
        let base = self.parse_primary()?;
        if self.peek() != Some(&Token::With) {
            return Ok(base);
        }
        self.pos += 1;
        let exception = match self.next() {
            Some(Token::Id(id)) => id,
            _ => return Err(syntax_error(self.text, "WITH must be followed by an exception")),
        };
        match base {
            LicenseExpression::Listed(_)
            | LicenseExpression::LicenseRef(_)
            | LicenseExpression::OrLater(_) => Ok(LicenseExpression::WithException(
                Box::new(base),
                exception,
            )),
            _ => Err(syntax_error(self.text, "WITH must follow a single license")),
        }
    }

    fn parse_primary(&mut self) -> Result<LicenseExpression, Error> {
        match self.next() {
            Some(Token::Open) => {
                let inner = self.parse_or()?;
                match self.next() {
                    Some(Token::Close) => Ok(inner),
                    _ => Err(syntax_error(self.text, "unbalanced parentheses")),
                }
            }
            Some(Token::Id(id)) => simple_license(&id, self.text),
            Some(_) => Err(syntax_error(self.text, "unexpected operator")),
            None => Err(syntax_error(self.text, "unexpected end of expression")),
        }
    }
}

/// Collapse single-member sets and splice nested sets of the same kind.
fn join(
    mut members: Vec<LicenseExpression>,
    build: fn(Vec<LicenseExpression>) -> LicenseExpression,
    split: fn(LicenseExpression) -> Result<Vec<LicenseExpression>, LicenseExpression>,
) -> LicenseExpression {
    if members.len() == 1 {
        if let Some(only) = members.pop() {
            return only;
        }
    }
    let mut flat = Vec::with_capacity(members.len());
    for member in members {
        match split(member) {
            Ok(inner) => flat.extend(inner),
            Err(single) => flat.push(single),
        }
    }
    build(flat)
}

/// Parse a license expression.
pub fn parse_license_expression(text: &str) -> Result<LicenseExpression, Error> {
    let tokens = tokenize(text);
    if tokens.is_empty() {
        return Err(syntax_error(text, "empty expression"));
    }
    let mut parser = Parser {
        text,
        tokens,
        pos: 0,
    };
    let expression = parser.parse_or()?;
    if parser.pos < parser.tokens.len() {
        return Err(syntax_error(text, "trailing tokens"));
    }
    Ok(expression)
}

fn store_anonymous(
    store: &dyn ModelStore,
    document_uri: &str,
    type_name: &str,
) -> Result<TypedValue, Error> {
    let id = store.next_id(IdType::Anonymous, document_uri)?;
    store.create(document_uri, &id, type_name)?;
    Ok(TypedValue::new(id, type_name, document_uri))
}

fn store_expression(
    store: &dyn ModelStore,
    document_uri: &str,
    expression: &LicenseExpression,
) -> Result<StoredValue, Error> {
    let typed = match expression {
        LicenseExpression::None => return Ok(StoredValue::uri(URI_VALUE_NONE)),
        LicenseExpression::NoAssertion => return Ok(StoredValue::uri(URI_VALUE_NOASSERTION)),
        LicenseExpression::External(id) => return Ok(StoredValue::uri(id.clone())),
        LicenseExpression::Listed(id) => {
            store.create(document_uri, id, CLASS_LISTED_LICENSE)?;
            TypedValue::new(id.clone(), CLASS_LISTED_LICENSE, document_uri)
        }
        LicenseExpression::LicenseRef(id) => {
            store.create(document_uri, id, CLASS_EXTRACTED_LICENSING_INFO)?;
            TypedValue::new(id.clone(), CLASS_EXTRACTED_LICENSING_INFO, document_uri)
        }
        LicenseExpression::OrLater(base) => {
            let operator = store_anonymous(store, document_uri, CLASS_OR_LATER_OPERATOR)?;
            let member = store_expression(store, document_uri, base)?;
            store.set_value(document_uri, &operator.id, PROP_LICENSE_SET_MEMBER, member)?;
            operator
        }
        LicenseExpression::WithException(base, exception) => {
            let operator = store_anonymous(store, document_uri, CLASS_WITH_EXCEPTION_OPERATOR)?;
            let member = store_expression(store, document_uri, base)?;
            store.set_value(document_uri, &operator.id, PROP_LICENSE_SET_MEMBER, member)?;
            store.create(document_uri, exception, CLASS_LISTED_LICENSE_EXCEPTION)?;
            store.set_value(
                document_uri,
                &operator.id,
                PROP_LICENSE_EXCEPTION,
                StoredValue::Typed(TypedValue::new(
                    exception.clone(),
                    CLASS_LISTED_LICENSE_EXCEPTION,
                    document_uri,
                )),
            )?;
            operator
        }
        LicenseExpression::And(members) | LicenseExpression::Or(members) => {
            let type_name = if matches!(expression, LicenseExpression::And(_)) {
                CLASS_CONJUNCTIVE_LICENSE_SET
            } else {
                CLASS_DISJUNCTIVE_LICENSE_SET
            };
            let set = store_anonymous(store, document_uri, type_name)?;
            for member in members {
                let value = store_expression(store, document_uri, member)?;
                store.add_value_to_collection(document_uri, &set.id, PROP_LICENSE_SET_MEMBER, value)?;
            }
            set
        }
    };
    Ok(StoredValue::Typed(typed))
}

/// Parse `text` and store it as license objects of `document_uri`.
pub fn store_license_expression(
    store: &dyn ModelStore,
    document_uri: &str,
    text: &str,
) -> Result<StoredValue, Error> {
    let expression = parse_license_expression(text)?;
    store_expression(store, document_uri, &expression)
}

fn is_license_set(value: &StoredValue) -> bool {
    matches!(
        value.as_typed().map(|tv| tv.type_name.as_str()),
        Some(CLASS_CONJUNCTIVE_LICENSE_SET | CLASS_DISJUNCTIVE_LICENSE_SET)
    )
}

fn required_member(store: &dyn ModelStore, tv: &TypedValue) -> Result<StoredValue, Error> {
    store
        .get_value(&tv.document_uri, &tv.id, PROP_LICENSE_SET_MEMBER)?
        .ok_or_else(|| Error::invalid_value(format!("{} {} has no member", tv.type_name, tv.id)))
}

/// Render a stored license value as an expression string.
pub fn render_license(store: &dyn ModelStore, value: &StoredValue) -> Result<String, Error> {
    let tv = match value {
        StoredValue::Uri(uri) if uri.uri == URI_VALUE_NONE => return Ok(NONE_VALUE.to_string()),
        StoredValue::Uri(uri) if uri.uri == URI_VALUE_NOASSERTION => {
            return Ok(NOASSERTION_VALUE.to_string())
        }
        StoredValue::Uri(uri) => return Ok(uri.uri.clone()),
        StoredValue::String(s) => return Ok(s.clone()),
        StoredValue::Typed(tv) => tv,
        other => {
            return Err(Error::invalid_type(format!(
                "a {} is not a license",
                other.kind()
            )))
        }
    };

    match tv.type_name.as_str() {
        CLASS_LISTED_LICENSE
        | CLASS_EXTRACTED_LICENSING_INFO
        | CLASS_SIMPLE_LICENSING_INFO
        | CLASS_LICENSE
        | CLASS_LISTED_LICENSE_EXCEPTION => Ok(tv.id.clone()),
        CLASS_OR_LATER_OPERATOR => {
            let member = required_member(store, tv)?;
            Ok(format!("{}+", render_license(store, &member)?))
        }
        CLASS_WITH_EXCEPTION_OPERATOR => {
            let member = required_member(store, tv)?;
            let exception = store
                .get_value(&tv.document_uri, &tv.id, PROP_LICENSE_EXCEPTION)?
                .ok_or_else(|| {
                    Error::invalid_value(format!("{} has no license exception", tv.id))
                })?;
            Ok(format!(
                "{} WITH {}",
                render_license(store, &member)?,
                render_license(store, &exception)?
            ))
        }
        CLASS_CONJUNCTIVE_LICENSE_SET | CLASS_DISJUNCTIVE_LICENSE_SET => {
            let members = store.list_values(&tv.document_uri, &tv.id, PROP_LICENSE_SET_MEMBER)?;
            if members.is_empty() {
                return Err(Error::invalid_value(format!("license set {} is empty", tv.id)));
            }
            let separator = if tv.type_name == CLASS_CONJUNCTIVE_LICENSE_SET {
                " AND "
            } else {
                " OR "
            };
            let mut rendered = Vec::with_capacity(members.len());
            for member in &members {
                let text = render_license(store, member)?;
                rendered.push(if is_license_set(member) {
                    format!("({})", text)
                } else {
                    text
                });
            }
            Ok(rendered.join(separator))
        }
        other => Err(Error::invalid_type(format!("{} is not a license type", other))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spdx_mem_store::InMemoryStore;

    const DOC: &str = "https://example.com/doc";

    fn listed(id: &str) -> LicenseExpression {
        LicenseExpression::Listed(id.to_string())
    }

    #[test]
    fn parses_simple_identifiers() {
        assert_eq!(parse_license_expression("MIT").unwrap(), listed("MIT"));
        assert_eq!(
            parse_license_expression("LicenseRef-Beer").unwrap(),
            LicenseExpression::LicenseRef("LicenseRef-Beer".to_string())
        );
        assert_eq!(
            parse_license_expression("DocumentRef-x:LicenseRef-y").unwrap(),
            LicenseExpression::External("DocumentRef-x:LicenseRef-y".to_string())
        );
        assert_eq!(parse_license_expression("NONE").unwrap(), LicenseExpression::None);
        assert_eq!(
            parse_license_expression("NOASSERTION").unwrap(),
            LicenseExpression::NoAssertion
        );
    }

    #[test]
    fn and_binds_tighter_than_or() {
        assert_eq!(
            parse_license_expression("MIT OR Apache-2.0 AND BSD-3-Clause").unwrap(),
            LicenseExpression::Or(vec![
                listed("MIT"),
                LicenseExpression::And(vec![listed("Apache-2.0"), listed("BSD-3-Clause")]),
            ])
        );
    }

    #[test]
    fn parentheses_group_and_nested_sets_splice() {
        assert_eq!(
            parse_license_expression("(MIT OR ISC) OR Zlib").unwrap(),
            LicenseExpression::Or(vec![listed("MIT"), listed("ISC"), listed("Zlib")])
        );
        assert_eq!(
            parse_license_expression("(MIT OR ISC) AND Zlib").unwrap(),
            LicenseExpression::And(vec![
                LicenseExpression::Or(vec![listed("MIT"), listed("ISC")]),
                listed("Zlib"),
            ])
        );
    }

    #[test]
    fn parses_or_later_and_with() {
        assert_eq!(
            parse_license_expression("GPL-2.0+ WITH Classpath-exception-2.0").unwrap(),
            LicenseExpression::WithException(
                Box::new(LicenseExpression::OrLater(Box::new(listed("GPL-2.0")))),
                "Classpath-exception-2.0".to_string()
            )
        );
    }

    #[test]
    fn rejects_malformed_expressions() {
        for text in ["", "MIT AND", "(MIT", "MIT)", "AND MIT", "MIT WITH", "a b", "MIT$"] {
            let err = parse_license_expression(text).unwrap_err();
            assert!(
                matches!(err, Error::InvalidValue { .. }),
                "{:?} gave {:?}",
                text,
                err
            );
        }
    }

    fn round_trip(text: &str) -> String {
        let store = InMemoryStore::new();
        let value = store_license_expression(&store, DOC, text).unwrap();
        render_license(&store, &value).unwrap()
    }

    #[test]
    fn store_then_render() {
        assert_eq!(round_trip("MIT"), "MIT");
        assert_eq!(round_trip("NONE"), "NONE");
        assert_eq!(round_trip("NOASSERTION"), "NOASSERTION");
        assert_eq!(round_trip("LicenseRef-1 AND MIT"), "LicenseRef-1 AND MIT");
        assert_eq!(round_trip("(MIT OR ISC) AND Zlib"), "(MIT OR ISC) AND Zlib");
        assert_eq!(
            round_trip("GPL-2.0+ WITH Classpath-exception-2.0"),
            "GPL-2.0+ WITH Classpath-exception-2.0"
        );
        assert_eq!(
            round_trip("DocumentRef-x:LicenseRef-y OR MIT"),
            "DocumentRef-x:LicenseRef-y OR MIT"
        );
    }

    #[test]
    fn stored_licenses_have_expected_types() {
        let store = InMemoryStore::new();
        let value = store_license_expression(&store, DOC, "MIT AND LicenseRef-x").unwrap();
        assert_eq!(
            value.as_typed().unwrap().type_name,
            CLASS_CONJUNCTIVE_LICENSE_SET
        );
        assert_eq!(
            store.all_items(Some(DOC), Some(CLASS_LISTED_LICENSE)).unwrap(),
            vec![TypedValue::new("MIT", CLASS_LISTED_LICENSE, DOC)]
        );
        assert_eq!(
            store
                .all_items(Some(DOC), Some(CLASS_EXTRACTED_LICENSING_INFO))
                .unwrap()
                .len(),
            1
        );
    }

    #[test]
    fn rendering_non_license_fails() {
        let store = InMemoryStore::new();
        store.create(DOC, "SPDXRef-1", "Package").unwrap();
        let value = StoredValue::Typed(TypedValue::new("SPDXRef-1", "Package", DOC));
        assert!(matches!(
            render_license(&store, &value),
            Err(Error::InvalidType { .. })
        ));
        assert!(render_license(&store, &StoredValue::Bool(true)).is_err());
    }
}
