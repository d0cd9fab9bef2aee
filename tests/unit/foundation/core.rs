use super::*;

#[test]
fn frame_names_are_zero_padded_to_six_digits() {
    assert_eq!(frame_file_name(FrameIndex(0), "png"), "frame-000000.png");
    assert_eq!(frame_file_name(FrameIndex(42), "png"), "frame-000042.png");
    assert_eq!(frame_file_name(FrameIndex(86_399), "jpg"), "frame-086399.jpg");
}

#[test]
fn frame_names_do_not_truncate_wide_indices() {
    assert_eq!(
        frame_file_name(FrameIndex(1_234_567), "png"),
        "frame-1234567.png"
    );
}

#[test]
fn pattern_matches_naming() {
    assert_eq!(frame_file_pattern("png"), "frame-%06d.png");
}

#[test]
fn frame_index_next_increments() {
    assert_eq!(FrameIndex(0).next(), FrameIndex(1));
    assert!(FrameIndex(1) < FrameIndex(2));
}

#[test]
fn canvas_validation() {
    assert!(Canvas::default().validate().is_ok());
    assert!(
        Canvas {
            width: 0,
            height: 10
        }
        .validate()
        .is_err()
    );
    assert!(
        Canvas {
            width: 70_000,
            height: 10
        }
        .validate()
        .is_err()
    );
    assert_eq!(
        Canvas {
            width: 2,
            height: 3
        }
        .rgba_len(),
        24
    );
}
