//! Strict structured field parser.
//!
//! Follows the parsing algorithms of RFC 8941 section 4.2 over raw header
//! bytes. Any byte outside printable ASCII is a grammar violation.

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;

use super::{
    BareItem, Decimal, Dictionary, FieldType, InnerList, Item, Member, Parameters,
    StructuredFieldValue, SfvError,
};

/// Byte sequences are accepted with or without `=` padding.
const BYTE_SEQUENCE_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

const MAX_INTEGER_DIGITS: usize = 15;
const MAX_DECIMAL_INTEGER_DIGITS: usize = 12;
const MAX_DECIMAL_FRACTION_DIGITS: usize = 3;

/// Parse `input` as the given top-level type.
///
/// Leading and trailing spaces are ignored; anything else left over after
/// the value is an error.
///
/// # Errors
///
/// Returns the first grammar violation encountered.
pub fn parse(input: &[u8], field_type: FieldType) -> Result<StructuredFieldValue, SfvError> {
    let mut parser = Parser::new(input);
    parser.skip_sp();
    let value = match field_type {
        FieldType::Item => StructuredFieldValue::Item(parser.parse_item()?),
        FieldType::List => StructuredFieldValue::List(parser.parse_list()?),
        FieldType::Dictionary => StructuredFieldValue::Dictionary(parser.parse_dictionary()?),
    };
    parser.skip_sp();
    if !parser.at_end() {
        return Err(SfvError::TrailingCharacters);
    }
    Ok(value)
}

struct Parser<'a> {
    input: &'a [u8],
    pos: usize,
}

fn is_tchar(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&b)
}

fn is_key_char(b: u8) -> bool {
    b.is_ascii_lowercase() || b.is_ascii_digit() || matches!(b, b'_' | b'-' | b'.' | b'*')
}

fn is_base64_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'+' | b'/' | b'=')
}

impl<'a> Parser<'a> {
    fn new(input: &'a [u8]) -> Self {
        Self { input, pos: 0 }
    }

    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<u8> {
        let b = self.peek()?;
        self.pos += 1;
        Some(b)
    }

    fn at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn skip_sp(&mut self) {
        while self.peek() == Some(b' ') {
            self.pos += 1;
        }
    }

    fn skip_ows(&mut self) {
        while matches!(self.peek(), Some(b' ') | Some(b'\t')) {
            self.pos += 1;
        }
    }

    fn unexpected(&self, expected: &'static str) -> SfvError {
        match self.peek() {
            Some(b) => SfvError::UnexpectedChar {
                expected,
                found: b as char,
            },
            None => SfvError::UnexpectedEnd(expected),
        }
    }

    /// Consume the separator between members. Returns `false` at end of input.
    fn member_separator(&mut self) -> Result<bool, SfvError> {
        self.skip_ows();
        if self.at_end() {
            return Ok(false);
        }
        if self.peek() != Some(b',') {
            return Err(self.unexpected("',' between members"));
        }
        self.pos += 1;
        self.skip_ows();
        if self.at_end() {
            return Err(SfvError::TrailingComma);
        }
        Ok(true)
    }

    fn parse_list(&mut self) -> Result<Vec<Member>, SfvError> {
        let mut members = Vec::new();
        if self.at_end() {
            return Ok(members);
        }
        loop {
            members.push(self.parse_item_or_inner_list()?);
            if !self.member_separator()? {
                return Ok(members);
            }
        }
    }

    fn parse_dictionary(&mut self) -> Result<Dictionary, SfvError> {
        let mut dict = Dictionary::new();
        if self.at_end() {
            return Ok(dict);
        }
        loop {
            let key = self.parse_key()?;
            let member = if self.peek() == Some(b'=') {
                self.pos += 1;
                self.parse_item_or_inner_list()?
            } else {
                let params = self.parse_parameters()?;
                Member::Item(Item {
                    bare: BareItem::Boolean(true),
                    params,
                })
            };
            dict.insert(key, member);
            if !self.member_separator()? {
                return Ok(dict);
            }
        }
    }

    fn parse_item_or_inner_list(&mut self) -> Result<Member, SfvError> {
        if self.peek() == Some(b'(') {
            Ok(Member::InnerList(self.parse_inner_list()?))
        } else {
            Ok(Member::Item(self.parse_item()?))
        }
    }

    fn parse_inner_list(&mut self) -> Result<InnerList, SfvError> {
        self.pos += 1; // '('
        let mut items = Vec::new();
        loop {
            self.skip_sp();
            match self.peek() {
                Some(b')') => {
                    self.pos += 1;
                    let params = self.parse_parameters()?;
                    return Ok(InnerList { items, params });
                }
                None => return Err(SfvError::UnexpectedEnd("')' closing inner list")),
                Some(_) => {
                    items.push(self.parse_item()?);
                    if !matches!(self.peek(), Some(b' ') | Some(b')')) {
                        return Err(self.unexpected("' ' or ')' in inner list"));
                    }
                }
            }
        }
    }

    fn parse_item(&mut self) -> Result<Item, SfvError> {
        let bare = self.parse_bare_item()?;
        let params = self.parse_parameters()?;
        Ok(Item { bare, params })
    }

    fn parse_parameters(&mut self) -> Result<Parameters, SfvError> {
        let mut params = Parameters::new();
        while self.peek() == Some(b';') {
            self.pos += 1;
            self.skip_sp();
            let key = self.parse_key()?;
            let value = if self.peek() == Some(b'=') {
                self.pos += 1;
                self.parse_bare_item()?
            } else {
                BareItem::Boolean(true)
            };
            params.insert(key, value);
        }
        Ok(params)
    }

    fn parse_key(&mut self) -> Result<String, SfvError> {
        match self.peek() {
            Some(b) if b.is_ascii_lowercase() || b == b'*' => {}
            Some(_) => return Err(SfvError::InvalidKey),
            None => return Err(SfvError::UnexpectedEnd("key")),
        }
        let start = self.pos;
        while matches!(self.peek(), Some(b) if is_key_char(b)) {
            self.pos += 1;
        }
        Ok(ascii_string(&self.input[start..self.pos]))
    }

    fn parse_bare_item(&mut self) -> Result<BareItem, SfvError> {
        match self.peek() {
            Some(b'-') | Some(b'0'..=b'9') => self.parse_number(),
            Some(b'"') => self.parse_string(),
            Some(b':') => self.parse_byte_sequence(),
            Some(b'?') => self.parse_boolean(),
            Some(b) if b.is_ascii_alphabetic() || b == b'*' => Ok(self.parse_token()),
            _ => Err(self.unexpected("bare item")),
        }
    }

    fn parse_number(&mut self) -> Result<BareItem, SfvError> {
        let negative = self.peek() == Some(b'-');
        if negative {
            self.pos += 1;
        }
        if !matches!(self.peek(), Some(b'0'..=b'9')) {
            return Err(self.unexpected("digit"));
        }

        let int_start = self.pos;
        while matches!(self.peek(), Some(b'0'..=b'9')) {
            self.pos += 1;
            if self.pos - int_start > MAX_INTEGER_DIGITS {
                return Err(SfvError::IntegerTooLong);
            }
        }
        let int_digits = &self.input[int_start..self.pos];

        if self.peek() != Some(b'.') {
            let magnitude = digits_value(int_digits);
            return Ok(BareItem::Integer(if negative { -magnitude } else { magnitude }));
        }

        if int_digits.len() > MAX_DECIMAL_INTEGER_DIGITS {
            return Err(SfvError::DecimalTooLong);
        }
        self.pos += 1; // '.'
        let frac_start = self.pos;
        while matches!(self.peek(), Some(b'0'..=b'9')) {
            self.pos += 1;
        }
        let frac_digits = &self.input[frac_start..self.pos];
        if frac_digits.is_empty() || frac_digits.len() > MAX_DECIMAL_FRACTION_DIGITS {
            return Err(SfvError::DecimalFraction);
        }

        let mut thousandths = digits_value(int_digits) * 1000;
        let mut scale = 100;
        for &d in frac_digits {
            thousandths += (d - b'0') as i64 * scale;
            scale /= 10;
        }
        Ok(BareItem::Decimal(Decimal::from_thousandths(if negative {
            -thousandths
        } else {
            thousandths
        })))
    }

    fn parse_string(&mut self) -> Result<BareItem, SfvError> {
        self.pos += 1; // '"'
        let mut out = String::new();
        loop {
            match self.bump() {
                None => return Err(SfvError::UnexpectedEnd("'\"' closing string")),
                Some(b'"') => return Ok(BareItem::String(out)),
                Some(b'\\') => match self.bump() {
                    Some(c @ (b'"' | b'\\')) => out.push(c as char),
                    Some(_) => return Err(SfvError::InvalidEscape),
                    None => return Err(SfvError::UnexpectedEnd("escaped character")),
                },
                Some(c @ 0x20..=0x7e) => out.push(c as char),
                Some(_) => return Err(SfvError::InvalidStringChar),
            }
        }
    }

    fn parse_token(&mut self) -> BareItem {
        let start = self.pos;
        self.pos += 1;
        while matches!(self.peek(), Some(b) if is_tchar(b) || b == b':' || b == b'/') {
            self.pos += 1;
        }
        BareItem::Token(ascii_string(&self.input[start..self.pos]))
    }

    fn parse_byte_sequence(&mut self) -> Result<BareItem, SfvError> {
        self.pos += 1; // ':'
        let start = self.pos;
        loop {
            match self.peek() {
                Some(b':') => break,
                Some(b) if is_base64_char(b) => self.pos += 1,
                Some(_) => return Err(self.unexpected("base64 character")),
                None => return Err(SfvError::UnexpectedEnd("':' closing byte sequence")),
            }
        }
        let encoded = &self.input[start..self.pos];
        self.pos += 1;
        BYTE_SEQUENCE_ENGINE
            .decode(encoded)
            .map(BareItem::ByteSequence)
            .map_err(|_| SfvError::InvalidBase64)
    }

    fn parse_boolean(&mut self) -> Result<BareItem, SfvError> {
        self.pos += 1; // '?'
        match self.bump() {
            Some(b'1') => Ok(BareItem::Boolean(true)),
            Some(b'0') => Ok(BareItem::Boolean(false)),
            _ => Err(SfvError::InvalidBoolean),
        }
    }
}

/// Digits are pre-validated and at most 15 long, so this cannot overflow.
fn digits_value(digits: &[u8]) -> i64 {
    digits
        .iter()
        .fold(0i64, |acc, &d| acc * 10 + (d - b'0') as i64)
}

fn ascii_string(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}
