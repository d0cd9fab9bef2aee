use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        QuakeError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        QuakeError::source("x")
            .to_string()
            .contains("source error:")
    );
    assert!(
        QuakeError::render("x")
            .to_string()
            .contains("render error:")
    );
    assert!(
        QuakeError::encode("x")
            .to_string()
            .contains("encode error:")
    );
}

#[test]
fn parse_error_names_the_line() {
    let err = QuakeError::parse(7, "missing magnitude");
    assert_eq!(err.to_string(), "parse error on line 7: missing magnitude");
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = QuakeError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
