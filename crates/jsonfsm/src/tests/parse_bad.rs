use rstest::rstest;

use super::utils::{Event, run, run_bytewise};
use crate::ErrorKind::{self, InvalidInteger, InvalidKey, InvalidValue, MalformedData};

#[rstest]
// driver
#[case(br#""abc""#, MalformedData, "Invalid start delimiter", 0)]
#[case(b"  x", MalformedData, "Invalid start delimiter", 2)]
#[case(b"{}x", MalformedData, "Unexpected data after end of document", 2)]
#[case(b"{} {}", MalformedData, "Unexpected data after end of document", 3)]
// arrays
#[case(b"[1,2,]", InvalidValue, "Trailing comma before array closure", 5)]
#[case(b"[1 2]", InvalidValue, "Invalid array value or closure", 3)]
#[case(b"[1}", InvalidValue, "Invalid array value or closure", 2)]
#[case(b"[,]", InvalidValue, "Invalid JSON value", 1)]
#[case(b"[1,,2]", InvalidValue, "Invalid JSON value", 3)]
#[case(b"[True]", InvalidValue, "Invalid JSON value", 1)]
// objects
#[case(b"{1:2}", InvalidKey, "Invalid object key", 1)]
#[case(br#"{"a":1,}"#, InvalidKey, "Invalid object key", 7)]
#[case(br#"{"a" 1}"#, InvalidValue, "Invalid middle delimiter", 5)]
#[case(br#"{"a":1 "b":2}"#, InvalidValue, "Invalid object value or closure", 7)]
#[case(br#"{"a":1]"#, InvalidValue, "Invalid object value or closure", 6)]
// literals
#[case(b"[tru]", InvalidValue, "Invalid literal", 4)]
#[case(b"[nul1]", InvalidValue, "Invalid literal", 4)]
#[case(b"[fAlse]", InvalidValue, "Invalid literal", 2)]
// strings
#[case(br#"["\x"]"#, InvalidValue, "Invalid escape character", 3)]
#[case(br#"["\u12G4"]"#, InvalidValue, "Invalid hexadecimal digit at position 3 of unicode escape", 6)]
#[case(br#"["\uZ"]"#, InvalidValue, "Invalid hexadecimal digit at position 1 of unicode escape", 4)]
#[case(b"[\"a\nb\"]", InvalidValue, "Unescaped control character in string", 3)]
#[case(b"[\"\x00\"]", InvalidValue, "Unescaped control character in string", 2)]
// number syntax
#[case(b"[-]", InvalidValue, "Expected digit after minus sign", 2)]
#[case(b"[-a]", InvalidValue, "Expected digit after minus sign", 2)]
#[case(b"[01]", InvalidValue, "Leading zeros are not allowed", 2)]
#[case(b"[-00]", InvalidValue, "Leading zeros are not allowed", 3)]
#[case(b"[1.]", InvalidValue, "Expected digit after decimal point", 3)]
#[case(b"[1.e5]", InvalidValue, "Expected digit after decimal point", 3)]
#[case(b"[1e]", InvalidValue, "Expected digit in exponent", 3)]
#[case(b"[1e+]", InvalidValue, "Expected digit in exponent", 4)]
// number overflow
#[case(b"[1e400]", InvalidInteger, "Exponent Overflow", 5)]
#[case(b"[1e309]", InvalidInteger, "Exponent Overflow", 5)]
#[case(b"[1e-325]", InvalidInteger, "Exponent Overflow", 6)]
#[case(b"[9007199254740993]", InvalidInteger, "Integer Overflow", 16)]
#[case(b"[-90071992547409920]", InvalidInteger, "Integer Overflow", 18)]
#[case(b"[0.9007199254740993]", InvalidInteger, "Fraction Overflow", 18)]
// end of input
#[case(b"", MalformedData, "Unexpected end of input", 0)]
#[case(b"  \n", MalformedData, "Unexpected end of input", 3)]
#[case(b"[1,2", MalformedData, "Unexpected end of input", 4)]
#[case(b"[1", MalformedData, "Unexpected end of input", 2)]
#[case(br#"{"ab"#, MalformedData, "Unexpected end of input", 4)]
#[case(b"[tr", MalformedData, "Unexpected end of input", 3)]
fn rejects(
    #[case] input: &[u8],
    #[case] kind: ErrorKind,
    #[case] reason: &str,
    #[case] offset: usize,
) {
    let whole = run(input);
    let err = whole.result.as_ref().unwrap_err();
    assert_eq!(err.kind(), kind, "{err}");
    assert_eq!(err.reason(), Some(reason), "{err}");
    assert_eq!(err.offset(), offset, "{err}");

    // the same error, at the same offset, however the input is split
    assert_eq!(run_bytewise(input).result, whole.result);
}

#[test]
fn overflowing_number_is_never_reported() {
    let outcome = run(b"[1, 9007199254740993]");
    assert!(outcome.result.is_err());
    assert_eq!(
        outcome
            .events
            .iter()
            .filter(|e| matches!(e, Event::Number(_)))
            .count(),
        1
    );
}

#[test]
fn nothing_is_reported_after_the_error() {
    let outcome = run(b"[true, nope, false]");
    assert_eq!(
        outcome.events,
        std::vec![Event::ArrayStart, Event::Boolean(true)]
    );
}
