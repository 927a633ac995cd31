//! Structured field parse errors.
//!
//! Reasons are deliberately free of offsets so failures of many different
//! values group under the same message in reports.

/// Why a header value does not match the structured field grammar.
#[derive(Debug, Clone, PartialEq, Eq, Hash, thiserror::Error)]
pub enum SfvError {
    #[error("Unexpected end of input, expected {0}")]
    UnexpectedEnd(&'static str),

    #[error("Unexpected character {found:?}, expected {expected}")]
    UnexpectedChar { expected: &'static str, found: char },

    #[error("Trailing characters after value")]
    TrailingCharacters,

    #[error("Trailing comma at end of value")]
    TrailingComma,

    #[error("Key must start with a lowercase letter or '*'")]
    InvalidKey,

    #[error("Integer has more than 15 digits")]
    IntegerTooLong,

    #[error("Decimal has more than 12 integer digits")]
    DecimalTooLong,

    #[error("Decimal fraction must have 1 to 3 digits")]
    DecimalFraction,

    #[error("Invalid escape in string")]
    InvalidEscape,

    #[error("Invalid character in string")]
    InvalidStringChar,

    #[error("Invalid base64 in byte sequence")]
    InvalidBase64,

    #[error("Boolean must be ?0 or ?1")]
    InvalidBoolean,
}
