// tests/marker_classify.rs

//! Sentinel classification rules.

use commitgen::protocol::{
    classify, LineClass, MarkerRole, BEGIN_SENTINEL, END_SENTINEL,
};

#[test]
fn exact_sentinels_classify_as_markers() {
    assert_eq!(
        classify(BEGIN_SENTINEL),
        LineClass::Marker(MarkerRole::Begin)
    );
    assert_eq!(classify(END_SENTINEL), LineClass::Marker(MarkerRole::End));
}

#[test]
fn whitespace_padded_sentinels_still_match() {
    assert_eq!(
        classify("  ■★■★■  "),
        LineClass::Marker(MarkerRole::Begin)
    );
    assert_eq!(
        classify("\t▲★▲★▲\r"),
        LineClass::Marker(MarkerRole::End)
    );
    // Interior whitespace is removed before the comparison too.
    assert_eq!(
        classify("■ ★ ■ ★ ■"),
        LineClass::Marker(MarkerRole::Begin)
    );
}

#[test]
fn ordinary_lines_are_data() {
    assert_eq!(classify("feat: add parser"), LineClass::Data);
    assert_eq!(classify(""), LineClass::Data);
    assert_eq!(classify("   "), LineClass::Data);
}

#[test]
fn sentinel_with_extra_content_is_data() {
    // The stripped line must equal the sentinel exactly; embedding it in
    // other text does not count.
    assert_eq!(classify("prefix ■★■★■"), LineClass::Data);
    assert_eq!(classify("■★■★■★■★■"), LineClass::Data);
}
