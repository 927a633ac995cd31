//! Freshness lifetime values of `max-age` and `s-maxage`.

use crate::sfv::{BareItem, Decimal, Member};

/// Values at or beyond this magnitude do not fit a signed 32-bit delta-seconds.
pub const OVERFLOW_LIMIT: u64 = 1 << 31;

/// The value carried by a `max-age` or `s-maxage` directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MaxAgeValue {
    Integer(i64),
    Decimal(Decimal),
    /// Anything else, as serialized text
    NonNumeric(String),
}

impl MaxAgeValue {
    pub fn from_member(member: &Member) -> Self {
        match member {
            Member::Item(item) => match &item.bare {
                BareItem::Integer(v) => MaxAgeValue::Integer(*v),
                BareItem::Decimal(d) => MaxAgeValue::Decimal(*d),
                other => MaxAgeValue::NonNumeric(other.to_string()),
            },
            Member::InnerList(list) => MaxAgeValue::NonNumeric(list.to_string()),
        }
    }

    /// An integer whose magnitude is at most `limit`.
    pub fn is_small(&self, limit: i64) -> bool {
        matches!(self, MaxAgeValue::Integer(v) if v.unsigned_abs() <= limit.unsigned_abs())
    }

    pub fn is_overflow(&self) -> bool {
        matches!(self, MaxAgeValue::Integer(v) if v.unsigned_abs() >= OVERFLOW_LIMIT)
    }

    pub fn is_negative(&self) -> bool {
        matches!(self, MaxAgeValue::Integer(v) if *v < 0)
    }

    pub fn is_positive_integer(&self) -> bool {
        matches!(self, MaxAgeValue::Integer(v) if *v > 0)
    }
}
