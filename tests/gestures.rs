use image::{Rgba, RgbaImage};
use privacy_cam::detect::FaceBounds;
use privacy_cam::input::{apply_gesture, DispatchOutcome};
use privacy_cam::{
    Effect, EffectKind, Gesture, GestureConfig, GestureResolver, GlyphChoice, ImageEntry,
    RegionRect, ToolSettings,
};

fn tools() -> ToolSettings {
    ToolSettings {
        effect: EffectKind::Mosaic,
        glyph: GlyphChoice::Literal("☺️".to_owned()),
        mosaic_intensity: 12,
    }
}

fn empty_entry() -> ImageEntry {
    let raster = RgbaImage::from_pixel(200, 100, Rgba([128, 128, 128, 255]));
    ImageEntry::new("test.png".to_owned(), raster, &[], &tools())
}

fn entry_with_face() -> ImageEntry {
    let raster = RgbaImage::from_pixel(200, 100, Rgba([128, 128, 128, 255]));
    let face = FaceBounds {
        x: 10.0,
        y: 10.0,
        width: 40.0,
        height: 40.0,
    };
    ImageEntry::new("test.png".to_owned(), raster, &[face], &tools())
}

fn resolver() -> GestureResolver {
    GestureResolver::new(GestureConfig::default())
}

#[test]
fn displacement_below_threshold_is_a_click() {
    let mut r = resolver();
    r.on_press((100.0, 50.0), 0.0);
    let gesture = r.on_release((106.0, 56.0)); // ~8.5px

    assert_eq!(gesture, Some(Gesture::Click { pos: (100.0, 50.0) }));
}

#[test]
fn displacement_at_threshold_is_a_drag() {
    let mut r = resolver();
    r.on_press((100.0, 50.0), 0.0);
    let gesture = r.on_release((111.0, 50.0)); // 11px

    assert_eq!(
        gesture,
        Some(Gesture::Drag {
            start: (100.0, 50.0),
            end: (111.0, 50.0)
        })
    );
}

#[test]
fn click_on_empty_space_creates_nothing() {
    let mut entry = empty_entry();
    let mut r = resolver();
    r.on_press((100.0, 50.0), 0.0);
    let gesture = r.on_release((103.0, 50.0)).unwrap();

    let outcome = apply_gesture(&mut entry, gesture, &tools(), r.config());
    assert_eq!(outcome, DispatchOutcome::Unchanged);
    assert!(entry.manual_regions().is_empty());
}

#[test]
fn drag_creates_exactly_one_normalized_region() {
    let mut entry = empty_entry();
    let mut r = resolver();
    r.on_press((120.0, 80.0), 0.0);
    let gesture = r.on_release((60.0, 20.0)).unwrap();

    let outcome = apply_gesture(&mut entry, gesture, &tools(), r.config());
    assert_eq!(outcome, DispatchOutcome::Changed);
    assert_eq!(entry.manual_regions().len(), 1);

    let rect = entry.manual_regions()[0].rect;
    assert_eq!(rect, RegionRect::new(60.0, 20.0, 60.0, 60.0));
}

#[test]
fn long_press_fires_after_threshold_and_swallows_release() {
    let mut r = resolver();
    r.on_press((30.0, 30.0), 10.0);
    assert_eq!(r.poll(10.4), None);
    assert_eq!(
        r.poll(10.5),
        Some(Gesture::LongPress { pos: (30.0, 30.0) })
    );
    assert_eq!(r.on_release((30.0, 30.0)), None);
}

#[test]
fn movement_disarms_long_press_but_still_drags_at_release() {
    let mut r = resolver();
    r.on_press((30.0, 30.0), 0.0);
    r.on_move((60.0, 30.0));
    // Held well past the long-press threshold, but the timer is disarmed
    assert_eq!(r.poll(2.0), None);
    assert_eq!(
        r.on_release((60.0, 30.0)),
        Some(Gesture::Drag {
            start: (30.0, 30.0),
            end: (60.0, 30.0)
        })
    );
}

#[test]
fn small_movement_keeps_long_press_armed() {
    let mut r = resolver();
    r.on_press((30.0, 30.0), 0.0);
    r.on_move((35.0, 30.0));
    assert!(r.poll(0.6).is_some());
}

#[test]
fn long_press_deletes_manual_region_first() {
    let mut entry = entry_with_face();
    // Manual region overlapping the detected face
    entry.add_manual_region(RegionRect::new(20.0, 20.0, 20.0, 20.0), &tools());

    let outcome = apply_gesture(
        &mut entry,
        Gesture::LongPress { pos: (25.0, 25.0) },
        &tools(),
        &GestureConfig::default(),
    );
    assert_eq!(outcome, DispatchOutcome::Changed);
    assert!(entry.manual_regions().is_empty());
    // The detected region underneath is untouched
    assert_eq!(entry.detected_regions()[0].effect, Effect::Mosaic);
}

#[test]
fn long_press_clears_detected_region_when_no_manual_hit() {
    let mut entry = entry_with_face();
    let outcome = apply_gesture(
        &mut entry,
        Gesture::LongPress { pos: (25.0, 25.0) },
        &tools(),
        &GestureConfig::default(),
    );
    assert_eq!(outcome, DispatchOutcome::Changed);
    assert_eq!(entry.detected_regions()[0].effect, Effect::None);
    assert_eq!(entry.face_count(), 1);
}

#[test]
fn long_press_on_empty_space_stamps_square_with_haptic() {
    let mut entry = empty_entry(); // 200x100, shorter dimension 100
    let outcome = apply_gesture(
        &mut entry,
        Gesture::LongPress { pos: (150.0, 50.0) },
        &tools(),
        &GestureConfig::default(),
    );
    assert_eq!(outcome, DispatchOutcome::ChangedWithHaptic);

    let rect = entry.manual_regions()[0].rect;
    // Side is 15% of the shorter surface dimension, centered on the point
    assert_eq!(rect.width, 15.0);
    assert_eq!(rect.height, 15.0);
    assert_eq!(rect.center(), (150.0, 50.0));
}
