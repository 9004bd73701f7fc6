use std::path::{Path, PathBuf};
use std::time::Duration;

use image::codecs::png::PngEncoder;
use image::imageops::FilterType;
use image::{ExtendedColorType, ImageEncoder, RgbaImage};

use crate::effects::GlyphRenderer;
use crate::error::ExportError;
use crate::render;
use crate::session::SessionStore;
use crate::tools::ToolSettings;
use crate::util::time;

/// Pause between batch items so a downstream consumer (or the filesystem
/// watcher picking the files up) is not hit with a burst. Backpressure
/// policy, not a performance knob.
pub const BATCH_ITEM_DELAY: Duration = Duration::from_millis(500);

/// Attempt cap for the size-budgeted encode loop.
pub const BUDGET_MAX_ATTEMPTS: u32 = 10;

/// Per-attempt downscale factor for the size-budgeted encode loop.
pub const BUDGET_SCALE_STEP: f32 = 0.8;

/// Encode a composited surface as lossless PNG.
pub fn encode_png(surface: &RgbaImage) -> Result<Vec<u8>, ExportError> {
    let mut buffer = Vec::new();
    PngEncoder::new(&mut buffer)
        .write_image(
            surface.as_raw(),
            surface.width(),
            surface.height(),
            ExtendedColorType::Rgba8,
        )
        .map_err(|e| ExportError::Encode(e.to_string()))?;
    Ok(buffer)
}

/// Result of [`encode_to_budget`], including the per-attempt byte sizes so
/// callers can see how the search converged.
pub struct BudgetedEncode {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub attempt_sizes: Vec<usize>,
}

impl BudgetedEncode {
    pub fn attempts(&self) -> u32 {
        self.attempt_sizes.len() as u32
    }
}

/// Encode under a byte budget by progressively downscaling.
///
/// Bounded monotonic search: each attempt after the first shrinks both
/// dimensions by [`BUDGET_SCALE_STEP`] and re-encodes, stopping early once
/// the output fits or after [`BUDGET_MAX_ATTEMPTS`] attempts, whichever
/// comes first. Not guaranteed to hit the target — the last attempt's bytes
/// are returned either way.
pub fn encode_to_budget(surface: &RgbaImage, max_bytes: usize) -> Result<BudgetedEncode, ExportError> {
    let mut current = surface.clone();
    let mut data = encode_png(&current)?;
    let mut attempt_sizes = vec![data.len()];

    while data.len() > max_bytes && (attempt_sizes.len() as u32) < BUDGET_MAX_ATTEMPTS {
        let new_w = ((current.width() as f32 * BUDGET_SCALE_STEP) as u32).max(1);
        let new_h = ((current.height() as f32 * BUDGET_SCALE_STEP) as u32).max(1);
        current = image::imageops::resize(&current, new_w, new_h, FilterType::Lanczos3);
        data = encode_png(&current)?;
        attempt_sizes.push(data.len());
        log::debug!(
            "budget encode attempt {}: {}x{} -> {} bytes (budget {})",
            attempt_sizes.len(),
            new_w,
            new_h,
            data.len(),
            max_bytes
        );
    }

    Ok(BudgetedEncode {
        width: current.width(),
        height: current.height(),
        data,
        attempt_sizes,
    })
}

/// Composite and write the active rendering of one entry.
pub fn export_entry(
    entry: &crate::document::ImageEntry,
    tools: &ToolSettings,
    glyphs: &GlyphRenderer,
    dir: &Path,
) -> Result<PathBuf, ExportError> {
    let surface = render::render(entry, tools, glyphs, true);
    let data = encode_png(&surface)?;
    let path = dir.join(format!("privacy-cam-{}.png", time::timestamp_secs()));
    std::fs::write(&path, data)?;
    Ok(path)
}

/// Export every session image, strictly sequentially, with a fixed delay
/// between items. The export render runs against session state only, so the
/// on-screen image and selection are irrelevant.
///
/// A failing item stops the batch with an error (already-written files are
/// kept); the caller surfaces a generic export-failed message.
pub fn export_session(
    session: &SessionStore,
    tools: &ToolSettings,
    glyphs: &GlyphRenderer,
    dir: &Path,
) -> Result<Vec<PathBuf>, ExportError> {
    let mut written = Vec::new();
    let stamp = time::timestamp_secs();

    for (index, entry) in session.entries().iter().enumerate() {
        let surface = render::render(entry, tools, glyphs, true);
        let data = encode_png(&surface)?;
        let path = dir.join(format!("privacy-cam-{}-{}.png", index + 1, stamp));
        std::fs::write(&path, data)?;
        log::info!("exported {} -> {}", entry.name(), path.display());
        written.push(path);

        if index + 1 < session.len() {
            std::thread::sleep(BATCH_ITEM_DELAY);
        }
    }

    Ok(written)
}
