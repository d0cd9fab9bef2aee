use super::*;

fn settings(width: u32, height: u32) -> RenderSettings {
    RenderSettings {
        canvas: Canvas { width, height },
        clear_rgba: [0, 0, 0, 255],
        ..RenderSettings::default()
    }
}

fn marker(x: f64, y: f64, radius: f64, alpha: f64) -> VisualEntity {
    VisualEntity {
        x,
        y,
        radius,
        alpha,
        age: 0,
    }
}

#[test]
fn empty_frame_is_the_clear_colour() {
    let mut s = CpuSurface::new(settings(16, 8), None, None).unwrap();
    let f = s.render(&[], "").unwrap();
    assert_eq!((f.width, f.height), (16, 8));
    assert_eq!(f.data.len(), 16 * 8 * 4);
    assert!(f.data.chunks_exact(4).all(|px| px == [0, 0, 0, 255]));
}

#[test]
fn opaque_marker_fills_its_centre_only() {
    let mut s = CpuSurface::new(settings(64, 64), None, None).unwrap();
    let f = s.render(&[marker(32.0, 32.0, 9.0, 1.0)], "").unwrap();
    assert_eq!(f.pixel(32, 32), Some([255, 0, 0, 255]));
    assert_eq!(f.pixel(2, 2), Some([0, 0, 0, 255]));
    assert_eq!(f.pixel(63, 63), Some([0, 0, 0, 255]));
}

#[test]
fn marker_alpha_scales_fill() {
    let mut s = CpuSurface::new(settings(64, 64), None, None).unwrap();
    let f = s.render(&[marker(32.0, 32.0, 9.0, 0.5)], "").unwrap();
    let [r, g, b, a] = f.pixel(32, 32).unwrap();
    assert!((120..=135).contains(&r), "r = {r}");
    assert_eq!((g, b, a), (0, 0, 255));
}

#[test]
fn invisible_markers_draw_nothing() {
    let mut s = CpuSurface::new(settings(32, 32), None, None).unwrap();
    let entities = [
        marker(16.0, 16.0, 0.0, 1.0),
        marker(16.0, 16.0, 5.0, 0.0),
        marker(16.0, 16.0, 5.0, -0.25),
    ];
    let f = s.render(&entities, "").unwrap();
    assert_eq!(f.pixel(16, 16), Some([0, 0, 0, 255]));
}

#[test]
fn rendering_is_deterministic_across_calls() {
    let mut s = CpuSurface::new(settings(48, 48), None, None).unwrap();
    let entities = [marker(10.0, 10.0, 4.0, 1.0), marker(30.0, 20.0, 9.0, 0.25)];
    let a = s.render(&entities, "1980-01-01 00:00 UTC").unwrap();
    let b = s.render(&entities, "1980-01-01 00:00 UTC").unwrap();
    assert_eq!(a, b);
}

#[test]
fn background_is_scaled_to_canvas() {
    let dir = std::path::PathBuf::from("target").join("unit_render_cpu");
    std::fs::create_dir_all(&dir).unwrap();
    let bg_path = dir.join("bg.png");
    let bg = image::RgbaImage::from_pixel(4, 2, image::Rgba([0, 0, 255, 255]));
    bg.save(&bg_path).unwrap();

    let mut s = CpuSurface::new(settings(16, 8), Some(&bg_path), None).unwrap();
    let f = s.render(&[], "").unwrap();
    assert_eq!(f.pixel(0, 0), Some([0, 0, 255, 255]));
    assert_eq!(f.pixel(15, 7), Some([0, 0, 255, 255]));
}

#[test]
fn missing_background_is_an_error() {
    let missing = std::path::Path::new("target/unit_render_cpu/missing.png");
    assert!(CpuSurface::new(settings(8, 8), Some(missing), None).is_err());
}

#[test]
fn marker_alpha_rounds_and_clamps() {
    assert_eq!(marker_alpha(&marker(0.0, 0.0, 1.0, 1.0)), Some(255));
    assert_eq!(marker_alpha(&marker(0.0, 0.0, 1.0, 2.0)), Some(255));
    assert_eq!(marker_alpha(&marker(0.0, 0.0, 1.0, 0.5)), Some(128));
    assert_eq!(marker_alpha(&marker(0.0, 0.0, 1.0, 0.0)), None);
    assert_eq!(marker_alpha(&marker(0.0, 0.0, f64::NAN, 1.0)), None);
}
