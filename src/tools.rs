use serde::{Deserialize, Serialize};

use crate::region::{EffectKind, GlyphChoice};

/// Minimum mosaic tile side, applied at render time so a dragged-down
/// intensity slider can never produce degenerate zero-size tiles.
pub const MIN_MOSAIC_BLOCK: u32 = 4;

/// The process-wide tool selection: the default for newly drawn manual
/// regions and for bulk apply. Passed explicitly into model and render
/// calls; existing regions only change when explicitly touched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolSettings {
    pub effect: EffectKind,
    pub glyph: GlyphChoice,
    /// Mosaic tile side length in pixels. Read live at render time, never
    /// cached per region, so moving the slider re-renders every mosaic.
    pub mosaic_intensity: u32,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            effect: EffectKind::Mosaic,
            glyph: GlyphChoice::Literal("☺️".to_owned()),
            mosaic_intensity: 12,
        }
    }
}

impl ToolSettings {
    pub fn block_size(&self) -> u32 {
        self.mosaic_intensity.max(MIN_MOSAIC_BLOCK)
    }
}
