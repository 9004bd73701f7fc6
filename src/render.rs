use image::RgbaImage;

use crate::document::ImageEntry;
use crate::effects::{apply_mosaic, draw_guide_outline, GlyphRenderer};
use crate::region::{Effect, RegionKind};
use crate::tools::ToolSettings;

/// Composite an image and its regions into a fresh surface at the image's
/// native dimensions.
///
/// Paint order is the model order (detected first, manual on top). Mosaic
/// regions read the live tool intensity, so an intensity change re-renders
/// every mosaic at the new block size without touching stored state. Export
/// surfaces get redaction effects only — guide outlines are interactive
/// chrome and never reach exported pixels.
pub fn render(
    entry: &ImageEntry,
    tools: &ToolSettings,
    glyphs: &GlyphRenderer,
    export: bool,
) -> RgbaImage {
    let mut surface = entry.raster().clone();

    for region in entry.regions() {
        match region.effect {
            Effect::None => {
                // Only detected regions can be effect-less; show where the
                // detector found a face unless this is an export render.
                if region.kind == RegionKind::Detected && !export {
                    draw_guide_outline(&mut surface, &region.rect);
                }
            }
            Effect::Mosaic => apply_mosaic(&mut surface, &region.rect, tools.block_size()),
            Effect::Glyph => {
                glyphs.apply_glyph(&mut surface, &region.rect, region.glyph.as_deref().unwrap_or(""))
            }
        }
    }

    surface
}
