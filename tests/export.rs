use image::{Rgba, RgbaImage};
use privacy_cam::detect::FaceBounds;
use privacy_cam::export::{self, BUDGET_MAX_ATTEMPTS};
use privacy_cam::{EffectKind, GlyphChoice, GlyphRenderer, ImageEntry, SessionStore, ToolSettings};

fn tools() -> ToolSettings {
    ToolSettings {
        effect: EffectKind::Mosaic,
        glyph: GlyphChoice::Literal("☺️".to_owned()),
        mosaic_intensity: 12,
    }
}

/// Deterministic high-frequency texture; compresses poorly, so encoded size
/// tracks pixel count and downscaling reliably shrinks the output.
fn textured_raster(w: u32, h: u32) -> RgbaImage {
    RgbaImage::from_fn(w, h, |x, y| {
        let v = x.wrapping_mul(31).wrapping_add(y.wrapping_mul(17));
        let mixed = v.wrapping_mul(2654435761) >> 16;
        Rgba([
            (mixed & 0xff) as u8,
            ((mixed >> 4) & 0xff) as u8,
            ((mixed >> 8) & 0xff) as u8,
            255,
        ])
    })
}

fn temp_export_dir() -> std::path::PathBuf {
    let dir = std::env::temp_dir().join(format!("privacy-cam-test-{}", uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn encode_png_round_trips_dimensions() {
    let surface = textured_raster(64, 48);
    let data = export::encode_png(&surface).unwrap();
    let decoded = image::load_from_memory(&data).unwrap();
    assert_eq!(decoded.width(), 64);
    assert_eq!(decoded.height(), 48);
}

#[test]
fn budget_encode_stops_early_when_budget_is_generous() {
    let surface = textured_raster(64, 64);
    let result = export::encode_to_budget(&surface, 10_000_000).unwrap();
    assert_eq!(result.attempts(), 1);
    assert_eq!(result.width, 64);
    assert_eq!(result.height, 64);
}

#[test]
fn budget_encode_terminates_on_unreachable_budget() {
    let surface = textured_raster(256, 256);
    let result = export::encode_to_budget(&surface, 1).unwrap();

    // Attempt cap bounds the search even though 1 byte is unreachable
    assert_eq!(result.attempts(), BUDGET_MAX_ATTEMPTS);
    assert!(result.data.len() > 1);

    // Each attempt downscales, so sizes never grow
    for pair in result.attempt_sizes.windows(2) {
        assert!(pair[1] <= pair[0], "sizes must be non-increasing: {:?}", result.attempt_sizes);
    }

    // Nine 0.8x downscales from 256
    assert!(result.width < 256 / 2);
}

#[test]
fn budget_encode_result_respects_reachable_budget() {
    let surface = textured_raster(256, 256);
    let full = export::encode_png(&surface).unwrap();
    // Ask for roughly a quarter of the full size; a few downscales reach it
    let budget = full.len() / 4;
    let result = export::encode_to_budget(&surface, budget).unwrap();
    assert!(result.data.len() <= budget);
    assert!(result.attempts() <= BUDGET_MAX_ATTEMPTS);
}

#[test]
fn batch_export_writes_one_file_per_session_image() {
    let tools = tools();
    let mut session = SessionStore::new();
    let face = FaceBounds {
        x: 5.0,
        y: 5.0,
        width: 20.0,
        height: 20.0,
    };
    session.push(ImageEntry::new(
        "first.png".to_owned(),
        textured_raster(60, 60),
        &[face],
        &tools,
    ));
    session.push(ImageEntry::new(
        "second.png".to_owned(),
        textured_raster(40, 80),
        &[],
        &tools,
    ));

    let glyphs = GlyphRenderer::from_egui_fonts().unwrap();
    let dir = temp_export_dir();
    let written = export::export_session(&session, &tools, &glyphs, &dir).unwrap();

    assert_eq!(written.len(), 2);
    for (i, path) in written.iter().enumerate() {
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with(&format!("privacy-cam-{}-", i + 1)), "{name}");
        let decoded = image::load_from_memory(&std::fs::read(path).unwrap()).unwrap();
        assert_eq!(
            (decoded.width(), decoded.height()),
            (session.entries()[i].width(), session.entries()[i].height())
        );
    }

    std::fs::remove_dir_all(&dir).ok();
}
