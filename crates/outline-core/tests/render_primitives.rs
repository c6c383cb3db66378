//! Integration tests for outline-core.
//!
//! These exercise the public API the way the overlay engine uses it: pick the
//! display under the pointer, convert the pointer into that display's local
//! space, and drive one surface model's outline and spotlight.

use std::time::{Duration, Instant};

use outline_core::{
    display_under_point, is_multi_display_active, Appearance, DisplayDescriptor, DisplayId,
    OutlineStyle, Point, Rect, Rgba, SurfaceModel, SPOTLIGHT_DISAPPEAR,
};

fn dual() -> Vec<DisplayDescriptor> {
    vec![
        DisplayDescriptor::new(DisplayId(1), Rect::new(0.0, 0.0, 1920.0, 1080.0)).main(true),
        DisplayDescriptor::new(DisplayId(2), Rect::new(1920.0, 0.0, 1920.0, 1080.0)),
    ]
}

#[test]
fn test_pointer_on_second_display_drives_its_local_spotlight() {
    // Arrange
    let displays = dual();
    let pointer = Point::new(2000.0, 100.0);
    let display = display_under_point(&displays, pointer).expect("a display");
    let mut model = SurfaceModel::new(display.bounds, OutlineStyle::default());

    // Act
    let local = display.bounds.to_local(pointer);
    model.spotlight.update(local, Appearance::default().spotlight.radius());
    model.spotlight.set_visible(true, false, Instant::now());

    // Assert
    assert_eq!(display.id, DisplayId(2));
    assert_eq!(local, Point::new(80.0, 100.0));
    assert!(model.spotlight.is_presenting());
    let mask = model.spotlight.mask().expect("mask");
    assert!(!mask.contains(local));
    assert!(mask.contains(Point::new(1000.0, 1000.0)));
}

#[test]
fn test_single_display_is_not_multi_display() {
    let displays = vec![DisplayDescriptor::new(DisplayId(1), Rect::new(0.0, 0.0, 1920.0, 1080.0))];
    assert!(!is_multi_display_active(&displays));
}

#[test]
fn test_mirrored_pair_is_not_multi_display() {
    let displays = vec![
        DisplayDescriptor::new(DisplayId(1), Rect::new(0.0, 0.0, 1920.0, 1080.0)),
        DisplayDescriptor::new(DisplayId(2), Rect::new(0.0, 0.0, 1920.0, 1080.0)).mirrored(true),
    ];
    assert!(!is_multi_display_active(&displays));
}

#[test]
fn test_outline_restyle_keeps_stroke_inside_surface() {
    // Arrange
    let mut model = SurfaceModel::new(Rect::new(1920.0, 0.0, 1920.0, 1080.0), OutlineStyle::default());
    model.outline.set_visible(true);

    // Act
    model.outline.set_style(OutlineStyle::new(Rgba::new(1.0, 0.2, 0.2, 1.0), 12.0));

    // Assert
    let path = model.outline.path();
    let half = 6.0;
    assert_eq!(path.x, half);
    assert_eq!(path.y, half);
    assert_eq!(path.right(), 1920.0 - half);
    assert_eq!(path.bottom(), 1080.0 - half);
    assert!(model.outline.is_visible());
}

#[test]
fn test_faded_out_spotlight_does_not_reappear_on_plain_show() {
    // Arrange
    let t0 = Instant::now();
    let mut model = SurfaceModel::new(Rect::new(0.0, 0.0, 1920.0, 1080.0), OutlineStyle::default());
    model.spotlight.update(Point::new(500.0, 500.0), 120.0);
    model.spotlight.set_visible(true, false, t0);
    model.spotlight.set_visible(false, true, t0);
    model.spotlight.advance(t0 + SPOTLIGHT_DISAPPEAR + Duration::from_millis(1));

    // Act: showing again without a fresh update has nothing to draw.
    model.spotlight.set_visible(true, false, t0 + Duration::from_secs(1));

    // Assert
    assert!(model.spotlight.mask().is_none());
    assert!(!model.spotlight.is_presenting());
}
