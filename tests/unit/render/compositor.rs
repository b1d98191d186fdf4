use super::*;

fn solid(w: u32, h: u32, shade: u8) -> PreparedFrame {
    PreparedFrame::from_straight_rgba8(w, h, [shade, shade, shade, 255].repeat((w * h) as usize))
        .unwrap()
}

fn canvas() -> Canvas {
    Canvas::new(32, 18).unwrap()
}

#[test]
fn missing_frame_only_clears() {
    let mut c = FrameCompositor::new(canvas(), CompositorOpts::default());
    let frame = solid(4, 4, 200);
    assert!(matches!(c.draw(Some(&frame), 0.5), DrawOutcome::Drawn { .. }));
    assert!(!c.surface().is_blank());

    assert_eq!(c.draw(None, 0.5), DrawOutcome::Cleared);
    assert!(c.surface().is_blank());
}

#[test]
fn full_progress_keeps_center_at_full_brightness() {
    let mut c = FrameCompositor::new(canvas(), CompositorOpts::default());
    let frame = solid(8, 8, 200);
    let DrawOutcome::Drawn { params, .. } = c.draw(Some(&frame), 1.0) else {
        panic!("expected a drawn frame");
    };
    assert_eq!(params.scale, 1.35);
    assert_eq!(params.blur_px, 0.0);
    assert_eq!(c.surface().pixel(16, 9).unwrap(), [200, 200, 200, 255]);
    assert!(c.surface().pixel(0, 0).unwrap()[0] < 200);
}

#[test]
fn zero_progress_dims_to_sixty_percent() {
    let mut c = FrameCompositor::new(canvas(), CompositorOpts::default());
    let frame = solid(8, 8, 200);
    c.draw(Some(&frame), 0.0);
    assert_eq!(c.surface().pixel(16, 9).unwrap(), [120, 120, 120, 255]);
}

#[test]
fn effects_disabled_draws_plain_cover_rect() {
    let opts = CompositorOpts {
        effects_enabled: false,
        ..CompositorOpts::default()
    };
    let mut c = FrameCompositor::new(Canvas::new(16, 9).unwrap(), opts);
    let frame = solid(4, 4, 90);
    let DrawOutcome::Drawn { params, rect } = c.draw(Some(&frame), 0.0) else {
        panic!("expected a drawn frame");
    };
    assert_eq!(params.scale, 1.0);
    assert_eq!(params.blur_px, 0.0);
    assert_eq!(params.brightness, 0.6);
    assert_eq!(rect, Rect::new(0.0, -3.5, 16.0, 12.5));
}

#[test]
fn surface_is_fully_covered() {
    let opts = CompositorOpts {
        vignette: VignetteSpec {
            enabled: false,
            ..VignetteSpec::default()
        },
        ..CompositorOpts::default()
    };
    let mut c = FrameCompositor::new(canvas(), opts);
    c.draw(Some(&solid(3, 7, 255)), 0.4);
    assert!(c.surface().data().chunks_exact(4).all(|px| px[3] == 255));
}

#[test]
fn blur_softens_hard_edges() {
    let opts = CompositorOpts {
        vignette: VignetteSpec {
            enabled: false,
            ..VignetteSpec::default()
        },
        grade: GradeRanges {
            brightness: crate::render::params::ParamRange::new(1.0, 1.0),
            ..GradeRanges::default()
        },
        ..CompositorOpts::default()
    };
    // left half black, right half white
    let mut rgba = Vec::new();
    for _y in 0..18 {
        for x in 0..32 {
            let v = if x < 16 { 0 } else { 255 };
            rgba.extend_from_slice(&[v, v, v, 255]);
        }
    }
    let frame = PreparedFrame::from_straight_rgba8(32, 18, rgba).unwrap();

    let mut sharp = FrameCompositor::new(canvas(), CompositorOpts { effects_enabled: false, ..opts });
    sharp.draw(Some(&frame), 0.0);
    assert_eq!(sharp.surface().pixel(14, 9).unwrap()[0], 0);

    let mut blurred = FrameCompositor::new(canvas(), opts);
    blurred.draw(Some(&frame), 0.0);
    let v = blurred.surface().pixel(14, 9).unwrap()[0];
    assert!(v > 0 && v < 255);
}

#[test]
fn resize_reallocates_surface() {
    let mut c = FrameCompositor::new(canvas(), CompositorOpts::default());
    c.resize(Canvas::new(10, 10).unwrap());
    assert_eq!(c.surface().width(), 10);
    c.draw(Some(&solid(2, 2, 10)), 1.0);
    assert_eq!(c.surface().data().len(), 400);
    c.set_effects_enabled(false);
    assert!(!c.opts().effects_enabled);
}

#[test]
fn malformed_frame_clears_instead_of_drawing() {
    let mut c = FrameCompositor::new(canvas(), CompositorOpts::default());
    c.draw(Some(&solid(16, 9, 200)), 1.0);
    let forged = PreparedFrame {
        width: 16,
        height: 9,
        rgba8_premul: std::sync::Arc::new(vec![255; 10]),
    };
    assert_eq!(c.draw(Some(&forged), 1.0), DrawOutcome::Cleared);
    assert!(c.surface().is_blank());
}
