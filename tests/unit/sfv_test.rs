//! Unit tests for Structured Field Value parsing

use hcensus::sfv::{parse, BareItem, Decimal, FieldType, Member, SfvError};

#[test]
fn cache_control_dictionary() {
    let value = parse(
        b"max-age=3600, public, stale-if-error=60;x",
        FieldType::Dictionary,
    )
    .unwrap();
    let dict = value.as_dictionary().unwrap();
    let keys: Vec<&str> = dict.keys().collect();
    assert_eq!(keys, vec!["max-age", "public", "stale-if-error"]);
    assert_eq!(
        dict.get("public").and_then(Member::as_item).map(|i| &i.bare),
        Some(&BareItem::Boolean(true))
    );
    let swr = dict.get("stale-if-error").unwrap();
    assert_eq!(swr.params().keys().collect::<Vec<_>>(), vec!["x"]);
}

#[test]
fn duplicate_dictionary_keys_keep_first_position() {
    let value = parse(b"a=1, b=2, a=3", FieldType::Dictionary).unwrap();
    let dict = value.as_dictionary().unwrap();
    assert_eq!(dict.keys().collect::<Vec<_>>(), vec!["a", "b"]);
    assert_eq!(
        dict.get("a").and_then(Member::as_item).map(|i| &i.bare),
        Some(&BareItem::Integer(3))
    );
}

#[test]
fn list_with_inner_list() {
    let value = parse(b"gzip, (br deflate);q=0.5", FieldType::List).unwrap();
    let members = value.as_list().unwrap();
    assert_eq!(members.len(), 2);
    match &members[1] {
        Member::InnerList(list) => {
            assert_eq!(list.items.len(), 2);
            assert_eq!(
                list.params.get("q"),
                Some(&BareItem::Decimal(Decimal::from_thousandths(500)))
            );
        }
        other => panic!("expected inner list, got {:?}", other),
    }
}

#[test]
fn item_with_parameters() {
    let value = parse(b"text/html;charset=utf-8", FieldType::Item).unwrap();
    let item = value.as_item().unwrap();
    assert_eq!(item.bare, BareItem::Token("text/html".into()));
    assert_eq!(
        item.params.get("charset"),
        Some(&BareItem::Token("utf-8".into()))
    );
}

#[test]
fn numeric_limits() {
    assert!(parse(b"999999999999999", FieldType::Item).is_ok());
    assert_eq!(
        parse(b"9999999999999999", FieldType::Item),
        Err(SfvError::IntegerTooLong)
    );
    assert!(parse(b"1.5", FieldType::Item).is_ok());
    assert!(parse(b"1.5555", FieldType::Item).is_err());
    assert!(parse(b"1.", FieldType::Item).is_err());
}

#[test]
fn byte_sequences_and_booleans() {
    let value = parse(b":aGVsbG8=:", FieldType::Item).unwrap();
    assert_eq!(
        value.as_item().unwrap().bare,
        BareItem::ByteSequence(b"hello".to_vec())
    );
    assert_eq!(
        parse(b"?0", FieldType::Item).unwrap().as_item().unwrap().bare,
        BareItem::Boolean(false)
    );
    assert!(parse(b"?2", FieldType::Item).is_err());
}

#[test]
fn strict_failures() {
    assert!(parse(b"a, ", FieldType::List).is_err());
    assert!(parse(b"\"unterminated", FieldType::Item).is_err());
    assert!(parse(b"Max-Age=60", FieldType::Dictionary).is_err());
    assert!(parse(b"a=1 b=2", FieldType::Dictionary).is_err());
    assert!(parse(b"\"\x01\"", FieldType::Item).is_err());
}

#[test]
fn serialization_round_trips() {
    for (input, field_type) in [
        (&b"max-age=60, public"[..], FieldType::Dictionary),
        (&b"a, (b c);d=?0, \"e\""[..], FieldType::List),
        (&b"-1.25;x=:AQID:"[..], FieldType::Item),
    ] {
        let parsed = parse(input, field_type).unwrap();
        let reparsed = parse(parsed.to_string().as_bytes(), field_type).unwrap();
        assert_eq!(parsed, reparsed);
    }
}
