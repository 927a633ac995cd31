//! Structured Field Values (RFC 8941)
//!
//! Typed representation of machine-parsable HTTP header values and a strict
//! parser for them. Every value is one of three top-level shapes:
//!
//! - Item: a bare value with parameters (`text/html;charset=utf-8`)
//! - List: members separated by commas (`gzip, br`)
//! - Dictionary: named members (`max-age=60, public`)
//!
//! Values serialize back to their canonical text through `Display`.
//!
//! # Example
//!
//! ```
//! use hcensus::sfv::{parse, BareItem, FieldType};
//!
//! let value = parse(b"max-age=60, public", FieldType::Dictionary)?;
//! let dict = value.as_dictionary().expect("dictionary");
//! let max_age = dict.get("max-age").and_then(|m| m.as_item()).expect("item");
//! assert_eq!(max_age.bare, BareItem::Integer(60));
//! assert_eq!(dict.get("public").and_then(|m| m.as_item()).map(|i| &i.bare), Some(&BareItem::Boolean(true)));
//! # Ok::<(), hcensus::sfv::SfvError>(())
//! ```

mod error;
mod parser;

pub use error::SfvError;
pub use parser::parse;

use std::fmt;

use base64::Engine;
use serde::{Deserialize, Serialize};

/// Which top-level shape a header is parsed as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Item,
    List,
    Dictionary,
}

/// Exact decimal with three fractional digits, stored in thousandths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Decimal {
    thousandths: i64,
}

impl Decimal {
    pub fn from_thousandths(thousandths: i64) -> Self {
        Self { thousandths }
    }

    pub fn thousandths(&self) -> i64 {
        self.thousandths
    }

    pub fn is_negative(&self) -> bool {
        self.thousandths < 0
    }

    pub fn to_f64(&self) -> f64 {
        self.thousandths as f64 / 1000.0
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.thousandths < 0 { "-" } else { "" };
        let abs = self.thousandths.unsigned_abs();
        let fraction = format!("{:03}", abs % 1000);
        let fraction = fraction.trim_end_matches('0');
        let fraction = if fraction.is_empty() { "0" } else { fraction };
        write!(f, "{}{}.{}", sign, abs / 1000, fraction)
    }
}

/// A single value without parameters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BareItem {
    Integer(i64),
    Decimal(Decimal),
    String(String),
    Token(String),
    ByteSequence(Vec<u8>),
    Boolean(bool),
}

impl BareItem {
    /// Short name of the value's type, used in reports.
    pub fn type_name(&self) -> &'static str {
        match self {
            BareItem::Integer(_) => "integer",
            BareItem::Decimal(_) => "decimal",
            BareItem::String(_) => "string",
            BareItem::Token(_) => "token",
            BareItem::ByteSequence(_) => "byte sequence",
            BareItem::Boolean(_) => "boolean",
        }
    }

    /// Text of a token or string, otherwise `None`.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            BareItem::String(s) | BareItem::Token(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for BareItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BareItem::Integer(n) => write!(f, "{}", n),
            BareItem::Decimal(d) => write!(f, "{}", d),
            BareItem::String(s) => {
                f.write_str("\"")?;
                for c in s.chars() {
                    if c == '"' || c == '\\' {
                        f.write_str("\\")?;
                    }
                    write!(f, "{}", c)?;
                }
                f.write_str("\"")
            }
            BareItem::Token(t) => f.write_str(t),
            BareItem::ByteSequence(bytes) => write!(
                f,
                ":{}:",
                base64::engine::general_purpose::STANDARD.encode(bytes)
            ),
            BareItem::Boolean(true) => f.write_str("?1"),
            BareItem::Boolean(false) => f.write_str("?0"),
        }
    }
}

/// Ordered `key -> bare item` map. Re-inserting a key replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Parameters {
    entries: Vec<(String, BareItem)>,
}

impl Parameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: String, value: BareItem) {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&BareItem> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &BareItem)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Display for Parameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (key, value) in &self.entries {
            match value {
                BareItem::Boolean(true) => write!(f, ";{}", key)?,
                other => write!(f, ";{}={}", key, other)?,
            }
        }
        Ok(())
    }
}

/// A bare item with its parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub bare: BareItem,
    pub params: Parameters,
}

impl Item {
    pub fn new(bare: BareItem) -> Self {
        Self {
            bare,
            params: Parameters::new(),
        }
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.bare, self.params)
    }
}

/// A parenthesized list of items with its own parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InnerList {
    pub items: Vec<Item>,
    pub params: Parameters,
}

impl fmt::Display for InnerList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (i, item) in self.items.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}", item)?;
        }
        write!(f, "){}", self.params)
    }
}

/// A member of a list or dictionary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Member {
    Item(Item),
    InnerList(InnerList),
}

impl Member {
    pub fn params(&self) -> &Parameters {
        match self {
            Member::Item(item) => &item.params,
            Member::InnerList(list) => &list.params,
        }
    }

    pub fn as_item(&self) -> Option<&Item> {
        match self {
            Member::Item(item) => Some(item),
            Member::InnerList(_) => None,
        }
    }
}

impl fmt::Display for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Member::Item(item) => write!(f, "{}", item),
            Member::InnerList(list) => write!(f, "{}", list),
        }
    }
}

/// Ordered map of unique member names. The last occurrence of a name wins
/// and keeps the position of the first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dictionary {
    entries: Vec<(String, Member)>,
}

impl Dictionary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: String, member: Member) {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = member,
            None => self.entries.push((key, member)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Member> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, m)| m)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Member)> {
        self.entries.iter().map(|(k, m)| (k.as_str(), m))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Display for Dictionary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (key, member)) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            match member {
                Member::Item(Item {
                    bare: BareItem::Boolean(true),
                    params,
                }) => write!(f, "{}{}", key, params)?,
                other => write!(f, "{}={}", key, other)?,
            }
        }
        Ok(())
    }
}

/// A parsed header value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StructuredFieldValue {
    Item(Item),
    List(Vec<Member>),
    Dictionary(Dictionary),
}

impl StructuredFieldValue {
    pub fn field_type(&self) -> FieldType {
        match self {
            StructuredFieldValue::Item(_) => FieldType::Item,
            StructuredFieldValue::List(_) => FieldType::List,
            StructuredFieldValue::Dictionary(_) => FieldType::Dictionary,
        }
    }

    pub fn as_item(&self) -> Option<&Item> {
        match self {
            StructuredFieldValue::Item(item) => Some(item),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Member]> {
        match self {
            StructuredFieldValue::List(members) => Some(members),
            _ => None,
        }
    }

    pub fn as_dictionary(&self) -> Option<&Dictionary> {
        match self {
            StructuredFieldValue::Dictionary(dict) => Some(dict),
            _ => None,
        }
    }
}

impl fmt::Display for StructuredFieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StructuredFieldValue::Item(item) => write!(f, "{}", item),
            StructuredFieldValue::List(members) => {
                for (i, member) in members.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", member)?;
                }
                Ok(())
            }
            StructuredFieldValue::Dictionary(dict) => write!(f, "{}", dict),
        }
    }
}
