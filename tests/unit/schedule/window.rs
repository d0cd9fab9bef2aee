use super::*;
use chrono::TimeZone as _;

fn at(h: u32, m: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(1980, 1, 1, h, m, 0).unwrap()
}

#[test]
fn first_window_spans_one_width() {
    let s = WindowScheduler::new(at(0, 0), TimeDelta::hours(4)).unwrap();
    assert_eq!(
        s.current(),
        Window {
            start: at(0, 0),
            end: at(4, 0)
        }
    );
    assert_eq!(s.advances(), 0);
}

#[test]
fn nth_advance_is_origin_plus_n_widths() {
    let origin = at(0, 0);
    let width = TimeDelta::minutes(7);
    let mut s = WindowScheduler::new(origin, width).unwrap();
    let mut prev = s.current();
    for n in 1..=50i32 {
        let w = s.advance().unwrap();
        assert_eq!(w.start, origin + width * n);
        assert_eq!(w.end, origin + width * (n + 1));
        assert_eq!(w.start, prev.end, "windows must be contiguous");
        prev = w;
    }
    assert_eq!(s.advances(), 50);
}

#[test]
fn boundary_is_strict() {
    let w = Window {
        start: at(0, 0),
        end: at(4, 0),
    };
    assert!(!w.is_closed_by(at(4, 0)));
    assert!(w.is_closed_by(at(4, 1)));
}

#[test]
fn from_range_truncates_to_milliseconds() {
    let start = at(0, 0);
    let end = start + TimeDelta::milliseconds(1000);
    assert_eq!(window_width(start, end, 3).unwrap(), TimeDelta::milliseconds(333));
    let s = WindowScheduler::from_range(start, end, 3).unwrap();
    assert_eq!(s.width(), TimeDelta::milliseconds(333));
    assert_eq!(s.origin(), start);
}

#[test]
fn default_run_windows_are_about_four_hours() {
    let start = Utc.with_ymd_and_hms(1980, 1, 1, 6, 17, 45).unwrap() + TimeDelta::milliseconds(250);
    let end = Utc.with_ymd_and_hms(2018, 2, 9, 22, 1, 49).unwrap() + TimeDelta::milliseconds(307);
    let width = window_width(start, end, 3600 * 24).unwrap();
    assert!(width > TimeDelta::hours(3) && width < TimeDelta::hours(4));
}

#[test]
fn invalid_ranges_are_rejected() {
    assert!(window_width(at(1, 0), at(0, 0), 10).is_err());
    assert!(window_width(at(0, 0), at(0, 0), 10).is_err());
    assert!(window_width(at(0, 0), at(1, 0), 0).is_err());
    assert!(window_width(at(0, 0), at(0, 0) + TimeDelta::milliseconds(5), 10).is_err());
    assert!(WindowScheduler::new(at(0, 0), TimeDelta::zero()).is_err());
}

#[test]
fn advance_policy_defaults_to_single() {
    assert_eq!(AdvancePolicy::default(), AdvancePolicy::Single);
    let p: AdvancePolicy = serde_json::from_str("\"catch_up\"").unwrap();
    assert_eq!(p, AdvancePolicy::CatchUp);
}
