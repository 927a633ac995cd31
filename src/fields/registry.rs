//! Header names parsed as structured fields, with the type each one uses.
//!
//! Names not listed here are left unparsed.

use crate::sfv::FieldType;

/// Recognized header names, sorted by name for binary search.
const KNOWN_FIELDS: &[(&[u8], FieldType)] = &[
    (b"accept", FieldType::List),
    (b"accept-encoding", FieldType::List),
    (b"accept-language", FieldType::List),
    (b"accept-patch", FieldType::List),
    (b"accept-ranges", FieldType::List),
    (b"access-control-allow-credentials", FieldType::Item),
    (b"access-control-allow-headers", FieldType::List),
    (b"access-control-allow-methods", FieldType::List),
    (b"access-control-allow-origin", FieldType::Item),
    (b"access-control-expose-headers", FieldType::List),
    (b"access-control-max-age", FieldType::Item),
    (b"access-control-request-headers", FieldType::List),
    (b"access-control-request-method", FieldType::Item),
    (b"age", FieldType::Item),
    (b"allow", FieldType::List),
    (b"alpn", FieldType::List),
    (b"alt-svc", FieldType::Dictionary),
    (b"alt-used", FieldType::Item),
    (b"cache-control", FieldType::Dictionary),
    (b"connection", FieldType::List),
    (b"content-encoding", FieldType::List),
    (b"content-language", FieldType::List),
    (b"content-length", FieldType::List),
    (b"content-type", FieldType::Item),
    (b"cross-origin-resource-policy", FieldType::Item),
    (b"expect", FieldType::Item),
    (b"expect-ct", FieldType::Dictionary),
    (b"host", FieldType::Item),
    (b"keep-alive", FieldType::Dictionary),
    (b"origin", FieldType::Item),
    (b"pragma", FieldType::Dictionary),
    (b"prefer", FieldType::Dictionary),
    (b"preference-applied", FieldType::Dictionary),
    (b"referrer-policy", FieldType::List),
    (b"retry-after", FieldType::Item),
    (b"surrogate-control", FieldType::Dictionary),
    (b"te", FieldType::List),
    (b"timing-allow-origin", FieldType::List),
    (b"trailer", FieldType::List),
    (b"transfer-encoding", FieldType::List),
    (b"vary", FieldType::List),
    (b"x-content-type-options", FieldType::Item),
    (b"x-frame-options", FieldType::Item),
    (b"x-xss-protection", FieldType::List),
];

/// Look up the structured type of a header name.
pub fn field_type(name: &[u8]) -> Option<FieldType> {
    KNOWN_FIELDS
        .binary_search_by(|(known, _)| (*known).cmp(name))
        .ok()
        .map(|idx| KNOWN_FIELDS[idx].1)
}

/// Every recognized header name, in sorted order.
pub fn known_names() -> impl Iterator<Item = &'static [u8]> {
    KNOWN_FIELDS.iter().map(|(name, _)| *name)
}
