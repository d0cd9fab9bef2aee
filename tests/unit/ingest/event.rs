use super::*;
use chrono::TimeZone as _;

#[test]
fn parses_usgs_row_and_ignores_trailing_columns() {
    let row = "2018-02-09T22:01:49.307Z,38.8311667,-122.8045,1.67,0.68,md,14,74,0.008,0.02,nc,nc72980516,2018-02-09T22:03:31.423Z,\"5km NW of The Geysers, CA\",earthquake";
    let ev = parse_row(row, 2).unwrap();
    assert_eq!(
        ev.timestamp,
        Utc.with_ymd_and_hms(2018, 2, 9, 22, 1, 49).unwrap() + chrono::TimeDelta::milliseconds(307)
    );
    assert_eq!(ev.latitude, 38.8311667);
    assert_eq!(ev.longitude, -122.8045);
    assert_eq!(ev.depth, 1.67);
    assert_eq!(ev.magnitude, 0.68);
}

#[test]
fn column_order_is_latitude_then_longitude() {
    let ev = parse_row("1980-01-01T00:10:00Z,10,20,5,3", 2).unwrap();
    assert_eq!(ev.latitude, 10.0);
    assert_eq!(ev.longitude, 20.0);
}

#[test]
fn missing_magnitude_is_a_parse_error() {
    let err = parse_row("1980-01-01T00:10:00Z,10,20,5", 9).unwrap_err();
    match err {
        QuakeError::Parse { line, msg } => {
            assert_eq!(line, 9);
            assert!(msg.contains("mag"), "{msg}");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn empty_and_non_numeric_fields_are_rejected() {
    assert!(parse_row("1980-01-01T00:10:00Z,10,20,5,", 2).is_err());
    assert!(parse_row("1980-01-01T00:10:00Z,north,20,5,3", 2).is_err());
    assert!(parse_row("1980-01-01T00:10:00Z,10,20,5,NaN", 2).is_err());
}

#[test]
fn bad_timestamp_is_rejected() {
    let err = parse_row("yesterday,10,20,5,3", 4).unwrap_err();
    assert!(err.to_string().contains("invalid timestamp"));
}

#[test]
fn timestamp_forms() {
    let expected = Utc.with_ymd_and_hms(1980, 1, 1, 6, 17, 45).unwrap();
    assert_eq!(parse_timestamp("1980-01-01T06:17:45Z"), Some(expected));
    assert_eq!(parse_timestamp("1980-01-01T06:17:45"), Some(expected));
    assert_eq!(parse_timestamp("1980-01-01 06:17:45"), Some(expected));
    assert_eq!(parse_timestamp("1980-01-01T08:17:45+02:00"), Some(expected));
    assert_eq!(
        parse_timestamp("1980-01-01"),
        Some(Utc.with_ymd_and_hms(1980, 1, 1, 0, 0, 0).unwrap())
    );
    assert_eq!(parse_timestamp("not a date"), None);
}
