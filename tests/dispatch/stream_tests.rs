//! Input stream tests: quoting round-trips and read contracts.

use herald::foundation::stream::{quote, StreamView, StringStream};
use herald::foundation::ErrorKind;

#[test]
fn quoted_round_trip_for_awkward_strings() {
    for original in [
        "hello world",
        r#"she said "hi""#,
        r"C:\path\to\thing",
        "tabs\tand spaces",
        "",
    ] {
        let serialized = quote(original);
        let mut stream = StringStream::new(serialized);
        assert_eq!(stream.read_string().unwrap(), original);
        assert!(!stream.has_remaining());
    }
}

#[test]
fn quoted_token_may_contain_spaces_between_tokens() {
    let mut stream = StringStream::new(r#"say "hello there" now"#);
    assert_eq!(stream.read_string().unwrap(), "say");
    stream.skip_whitespace();
    assert_eq!(stream.read_string().unwrap(), "hello there");
    stream.skip_whitespace();
    assert_eq!(stream.read_string().unwrap(), "now");
}

#[test]
fn number_reads_distinguish_invalid_and_out_of_range() {
    let err = StringStream::new("twelve").read_int().unwrap_err();
    assert!(matches!(err.kind, ErrorKind::InvalidNumber { .. }));

    let err = StringStream::new("123456789012345678901234567890")
        .read_int()
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::NumberOutOfRange { .. }));

    assert_eq!(StringStream::new("-3").read_int().unwrap(), -3);
    assert_eq!(StringStream::new("2.25").read_float().unwrap(), 2.25);
}

#[test]
fn eof_reads_are_expected_input() {
    let mut stream = StringStream::new("one");
    stream.read_unquoted_string().unwrap();
    for result in [
        stream.read_unquoted_string().map(|_| ()),
        stream.read_int().map(|_| ()),
        stream.read_boolean().map(|_| ()),
    ] {
        let err = result.unwrap_err();
        assert!(matches!(err.kind, ErrorKind::ExpectedInput));
    }
    // read_remaining never fails.
    assert_eq!(stream.read_remaining(), "");
}

#[test]
fn views_are_persistent() {
    let view = StreamView::new("a b c");
    let (first, after_first) = view.read_unquoted_string().unwrap();
    let (first_again, _) = view.read_unquoted_string().unwrap();
    assert_eq!(first, "a");
    assert_eq!(first_again, "a");

    let (second, _) = after_first.skip_whitespace().read_unquoted_string().unwrap();
    assert_eq!(second, "b");
    assert_eq!(view.position(), 0);
}

#[test]
fn position_tracks_bytes_and_rewinds() {
    let mut stream = StringStream::new("alpha beta");
    stream.read_unquoted_string().unwrap();
    let checkpoint = stream.position();
    stream.skip_whitespace();
    stream.read_unquoted_string().unwrap();
    assert!(!stream.has_remaining());

    stream.set_position(checkpoint);
    stream.skip_whitespace();
    assert_eq!(stream.read_unquoted_string().unwrap(), "beta");
}
