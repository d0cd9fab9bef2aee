use super::*;

#[test]
fn premultiply_then_unpremultiply_keeps_opaque_pixels() {
    let mut px = vec![200u8, 100, 50, 255, 10, 20, 30, 0];
    premultiply_rgba8_in_place(&mut px);
    assert_eq!(&px[..4], &[200, 100, 50, 255]);
    assert_eq!(&px[4..], &[0, 0, 0, 0]);
    unpremultiply_rgba8_in_place(&mut px);
    assert_eq!(&px[..4], &[200, 100, 50, 255]);
}

#[test]
fn unpremultiply_half_alpha_red() {
    let mut px = vec![128u8, 0, 0, 128];
    unpremultiply_rgba8_in_place(&mut px);
    assert_eq!(px, vec![255, 0, 0, 128]);
}

#[test]
fn over_opaque_source_replaces_destination() {
    let mut dst = vec![1u8, 2, 3, 255];
    premul_over_in_place(&mut dst, &[9, 8, 7, 255]);
    assert_eq!(dst, vec![9, 8, 7, 255]);
}

#[test]
fn over_transparent_source_keeps_destination() {
    let mut dst = vec![1u8, 2, 3, 255];
    premul_over_in_place(&mut dst, &[0, 0, 0, 0]);
    assert_eq!(dst, vec![1, 2, 3, 255]);
}

#[test]
fn over_half_red_on_black() {
    let mut dst = vec![0u8, 0, 0, 255];
    premul_over_in_place(&mut dst, &premul_rgba8([255, 0, 0, 128]));
    assert_eq!(dst, vec![128, 0, 0, 255]);
}
