use super::*;

fn frame() -> FrameRGBA {
    FrameRGBA {
        width: 2,
        height: 1,
        data: vec![255, 0, 0, 255, 64, 0, 0, 128],
    }
}

#[test]
fn png_roundtrip_unpremultiplies() {
    let bytes = encode_frame(&frame(), format_for_ext("png").unwrap()).unwrap();
    let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();
    assert_eq!(decoded.get_pixel(0, 0).0, [255, 0, 0, 255]);
    assert_eq!(decoded.get_pixel(1, 0).0, [128, 0, 0, 128]);
}

#[test]
fn encoding_is_byte_stable() {
    let fmt = format_for_ext("png").unwrap();
    assert_eq!(
        encode_frame(&frame(), fmt).unwrap(),
        encode_frame(&frame(), fmt).unwrap()
    );
}

#[test]
fn unknown_extension_is_rejected() {
    assert!(format_for_ext("nope").is_err());
    assert_eq!(format_for_ext("jpg").unwrap(), image::ImageFormat::Jpeg);
}

#[test]
fn short_buffers_are_rejected() {
    let bad = FrameRGBA {
        width: 4,
        height: 4,
        data: vec![0; 8],
    };
    assert!(encode_frame(&bad, image::ImageFormat::Png).is_err());
}
