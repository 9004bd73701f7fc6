use ab_glyph::{point, Font, FontArc, PxScale};
use image::{Rgba, RgbaImage};
use thiserror::Error;

use crate::region::{RegionRect, FALLBACK_GLYPH};
use crate::tools::MIN_MOSAIC_BLOCK;

/// Pixelate a rectangular region with a flat-color tile grid.
///
/// Tiles start at the rect's top-left; each tile takes the color sampled at
/// its center (clamped into the surface) and is filled clipped to the rect's
/// right/bottom edge. Sampling a single pixel instead of averaging the tile
/// trades fidelity for speed; the result is fully deterministic.
pub fn apply_mosaic(surface: &mut RgbaImage, rect: &RegionRect, block_size: u32) {
    let block = i64::from(block_size.max(MIN_MOSAIC_BLOCK));
    let (sw, sh) = (i64::from(surface.width()), i64::from(surface.height()));

    let rx = rect.x.floor() as i64;
    let ry = rect.y.floor() as i64;
    let rw = rect.width.round() as i64;
    let rh = rect.height.round() as i64;
    if rw <= 0 || rh <= 0 || sw == 0 || sh == 0 {
        return;
    }

    let mut by = ry;
    while by < ry + rh {
        let mut bx = rx;
        while bx < rx + rw {
            let cx = (bx + block / 2).clamp(0, sw - 1);
            let cy = (by + block / 2).clamp(0, sh - 1);
            let color = *surface.get_pixel(cx as u32, cy as u32);

            // Edge tiles are clipped, never padded
            let x_end = (bx + block).min(rx + rw).min(sw);
            let y_end = (by + block).min(ry + rh).min(sh);
            for y in by.max(0)..y_end {
                for x in bx.max(0)..x_end {
                    surface.put_pixel(x as u32, y as u32, color);
                }
            }
            bx += block;
        }
        by += block;
    }
}

/// Dashed semi-transparent outline marking a detected-but-unredacted region
/// on the interactive canvas. Never drawn on export surfaces.
pub fn draw_guide_outline(surface: &mut RgbaImage, rect: &RegionRect) {
    const DASH: i64 = 5;
    const THICKNESS: i64 = 2;
    const ALPHA: f32 = 0.4;
    let white = Rgba([255, 255, 255, 255]);

    let rx = rect.x.round() as i64;
    let ry = rect.y.round() as i64;
    let rw = rect.width.round() as i64;
    let rh = rect.height.round() as i64;
    if rw <= 0 || rh <= 0 {
        return;
    }

    for t in 0..THICKNESS {
        for x in rx..rx + rw {
            if (x - rx) % (DASH * 2) < DASH {
                blend_pixel(surface, x, ry + t, white, ALPHA);
                blend_pixel(surface, x, ry + rh - 1 - t, white, ALPHA);
            }
        }
        for y in ry..ry + rh {
            if (y - ry) % (DASH * 2) < DASH {
                blend_pixel(surface, rx + t, y, white, ALPHA);
                blend_pixel(surface, rx + rw - 1 - t, y, white, ALPHA);
            }
        }
    }
}

#[derive(Debug, Error)]
#[error("no usable glyph font in the egui font set")]
pub struct GlyphFontError;

/// Rasterizes glyph overlays straight into the raster surface, so the
/// interactive canvas and export output share pixel-identical glyphs.
///
/// Fonts come from egui's bundled `FontDefinitions` (monochrome NotoEmoji
/// first, text face as fallback), so no font files or fontconfig lookups are
/// needed at runtime.
pub struct GlyphRenderer {
    fonts: Vec<FontArc>,
}

impl GlyphRenderer {
    /// Renderer with no fonts; glyph regions log a warning and draw nothing.
    pub fn empty() -> Self {
        Self { fonts: Vec::new() }
    }

    pub fn from_egui_fonts() -> Result<Self, GlyphFontError> {
        let defs = egui::FontDefinitions::default();
        let mut fonts = Vec::new();
        for name in ["NotoEmoji-Regular", "Ubuntu-Light", "emoji-icon-font"] {
            if let Some(data) = defs.font_data.get(name) {
                match FontArc::try_from_vec(data.font.to_vec()) {
                    Ok(font) => fonts.push(font),
                    Err(err) => log::warn!("skipping egui font {name}: {err}"),
                }
            }
        }
        if fonts.is_empty() {
            return Err(GlyphFontError);
        }
        Ok(Self { fonts })
    }

    /// Stamp a glyph centered on the region's centroid, sized at 1.2× the
    /// larger box dimension. Empty values fall back to [`FALLBACK_GLYPH`],
    /// as does a character none of the fonts can shape.
    pub fn apply_glyph(&self, surface: &mut RgbaImage, rect: &RegionRect, glyph: &str) {
        let value = if glyph.trim().is_empty() { FALLBACK_GLYPH } else { glyph };

        let Some((font, glyph_id)) = self
            .shape(value)
            .or_else(|| self.shape(FALLBACK_GLYPH))
        else {
            log::warn!("no font can render glyph {value:?}; region left unredacted");
            return;
        };

        let px_size = 1.2 * rect.width.max(rect.height);
        let outlined = font.outline_glyph(
            glyph_id.with_scale_and_position(PxScale::from(px_size), point(0.0, 0.0)),
        );
        let Some(outlined) = outlined else {
            return; // whitespace glyph, nothing to draw
        };

        let bounds = outlined.px_bounds();
        let (cx, cy) = rect.center();
        let dx = cx - (bounds.min.x + bounds.max.x) / 2.0;
        let dy = cy - (bounds.min.y + bounds.max.y) / 2.0;

        let ink = Rgba([20, 20, 20, 255]);
        outlined.draw(|gx, gy, coverage| {
            if coverage <= 0.0 {
                return;
            }
            let x = (bounds.min.x + gx as f32 + dx).round() as i64;
            let y = (bounds.min.y + gy as f32 + dy).round() as i64;
            blend_pixel(surface, x, y, ink, coverage.min(1.0));
        });
    }

    /// First font that has a real glyph (not .notdef) for the value's
    /// leading scalar, skipping variation selectors and joiners.
    fn shape(&self, value: &str) -> Option<(&FontArc, ab_glyph::GlyphId)> {
        let ch = value
            .chars()
            .find(|c| !matches!(c, '\u{fe0e}' | '\u{fe0f}' | '\u{200d}'))?;
        self.fonts.iter().find_map(|font| {
            let id = font.glyph_id(ch);
            (id.0 != 0).then_some((font, id))
        })
    }
}

fn blend_pixel(surface: &mut RgbaImage, x: i64, y: i64, color: Rgba<u8>, alpha: f32) {
    if x < 0 || y < 0 || x >= i64::from(surface.width()) || y >= i64::from(surface.height()) {
        return;
    }
    let dst = surface.get_pixel_mut(x as u32, y as u32);
    for i in 0..3 {
        let src = f32::from(color.0[i]);
        let base = f32::from(dst.0[i]);
        dst.0[i] = (src * alpha + base * (1.0 - alpha)).round() as u8;
    }
    dst.0[3] = 255;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mosaic_fills_tiles_with_center_sample() {
        // Left half red, right half blue; one 8px tile per half
        let mut surface = RgbaImage::from_fn(16, 8, |x, _| {
            if x < 8 {
                Rgba([255, 0, 0, 255])
            } else {
                Rgba([0, 0, 255, 255])
            }
        });
        apply_mosaic(&mut surface, &RegionRect::new(0.0, 0.0, 16.0, 8.0), 8);
        assert_eq!(surface.get_pixel(7, 7), &Rgba([255, 0, 0, 255]));
        assert_eq!(surface.get_pixel(8, 0), &Rgba([0, 0, 255, 255]));
    }

    #[test]
    fn mosaic_clips_at_region_edge() {
        let mut surface = RgbaImage::from_pixel(20, 20, Rgba([10, 10, 10, 255]));
        // 9x9 region with block 4: edge tiles must not spill past x/y = 11
        surface.put_pixel(3, 3, Rgba([200, 0, 0, 255]));
        apply_mosaic(&mut surface, &RegionRect::new(2.0, 2.0, 9.0, 9.0), 4);
        assert_eq!(surface.get_pixel(11, 2), &Rgba([10, 10, 10, 255]));
        assert_eq!(surface.get_pixel(2, 11), &Rgba([10, 10, 10, 255]));
    }

    #[test]
    fn glyph_renderer_loads_bundled_fonts() {
        let renderer = GlyphRenderer::from_egui_fonts().unwrap();
        let mut surface = RgbaImage::from_pixel(64, 64, Rgba([255, 255, 255, 255]));
        renderer.apply_glyph(&mut surface, &RegionRect::new(8.0, 8.0, 48.0, 48.0), "☺");
        let changed = surface
            .pixels()
            .any(|p| p != &Rgba([255, 255, 255, 255]));
        assert!(changed, "glyph should put ink on the surface");
    }
}
