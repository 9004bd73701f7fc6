use image::RgbaImage;
use uuid::Uuid;

use crate::detect::FaceBounds;
use crate::region::{Effect, EffectKind, Region, RegionKind, RegionRect};
use crate::tools::ToolSettings;

/// Stable reference to a region inside one image's model. Indices stay valid
/// because detected regions are never removed or reordered and manual ones
/// are only invalidated by their own removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionHandle {
    Detected(usize),
    Manual(usize),
}

/// One loaded photograph: the decoded raster plus its redaction regions.
///
/// Detected regions are a fixed set seeded at load time and only ever
/// toggled; manual regions are insertion-ordered, append/remove only.
pub struct ImageEntry {
    id: Uuid,
    name: String,
    raster: RgbaImage,
    detected: Vec<Region>,
    manual: Vec<Region>,
}

impl ImageEntry {
    /// Build an entry from a decoded raster and the detector's boxes. Every
    /// detected box arrives already carrying the current tool's effect, with
    /// glyph values resolved per box (independent draws for `Random`).
    pub fn new(name: String, raster: RgbaImage, faces: &[FaceBounds], tools: &ToolSettings) -> Self {
        let detected = faces
            .iter()
            .map(|f| {
                let mut region =
                    Region::detected(RegionRect::new(f.x, f.y, f.width, f.height));
                region.effect = tools.effect.into();
                if tools.effect == EffectKind::Glyph {
                    region.glyph = Some(tools.glyph.resolve());
                }
                region
            })
            .collect();

        Self {
            id: Uuid::new_v4(),
            name,
            raster,
            detected,
            manual: Vec::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn raster(&self) -> &RgbaImage {
        &self.raster
    }

    pub fn width(&self) -> u32 {
        self.raster.width()
    }

    pub fn height(&self) -> u32 {
        self.raster.height()
    }

    pub fn face_count(&self) -> usize {
        self.detected.len()
    }

    /// All regions in paint order: detected first, then manual, so manual
    /// regions composite on top.
    pub fn regions(&self) -> impl Iterator<Item = &Region> {
        self.detected.iter().chain(self.manual.iter())
    }

    pub fn region(&self, handle: RegionHandle) -> Option<&Region> {
        match handle {
            RegionHandle::Detected(i) => self.detected.get(i),
            RegionHandle::Manual(i) => self.manual.get(i),
        }
    }

    /// First region containing the point. Manual regions are searched before
    /// detected ones (reverse of paint order, so the user's own drawings win
    /// on overlap); within each group, earliest match in sequence order.
    pub fn hit_test(&self, x: f32, y: f32) -> Option<RegionHandle> {
        if let Some(i) = self.manual.iter().position(|r| r.rect.contains(x, y)) {
            return Some(RegionHandle::Manual(i));
        }
        self.detected
            .iter()
            .position(|r| r.rect.contains(x, y))
            .map(RegionHandle::Detected)
    }

    /// Click-toggle: if the region already carries the requested effect (and,
    /// for glyphs, the same value — `Random` matches anything), the click
    /// turns it off: detected regions clear to `None`, manual regions are
    /// deleted. Otherwise the requested effect is applied, resolving the
    /// glyph value fresh.
    pub fn toggle_effect(&mut self, handle: RegionHandle, tools: &ToolSettings) {
        let requested: Effect = tools.effect.into();

        let same = match self.region(handle) {
            Some(region) => {
                region.effect == requested
                    && (tools.effect != EffectKind::Glyph
                        || tools.glyph.matches(region.glyph.as_deref()))
            }
            None => return,
        };

        match handle {
            RegionHandle::Detected(i) => {
                let region = &mut self.detected[i];
                if same {
                    region.effect = Effect::None;
                } else {
                    region.effect = requested;
                    if tools.effect == EffectKind::Glyph {
                        region.glyph = Some(tools.glyph.resolve());
                    }
                }
            }
            RegionHandle::Manual(i) => {
                if same {
                    self.manual.remove(i);
                } else {
                    let region = &mut self.manual[i];
                    region.effect = requested;
                    if tools.effect == EffectKind::Glyph {
                        region.glyph = Some(tools.glyph.resolve());
                    }
                }
            }
        }
    }

    /// Append a user-drawn region with the current tool settings. Zero-area
    /// rects create nothing and return `false`.
    pub fn add_manual_region(&mut self, rect: RegionRect, tools: &ToolSettings) -> bool {
        if rect.is_empty() {
            return false;
        }
        let glyph = (tools.effect == EffectKind::Glyph).then(|| tools.glyph.resolve());
        self.manual
            .push(Region::manual(rect, tools.effect.into(), glyph));
        true
    }

    pub fn remove_manual_region(&mut self, index: usize) -> Option<Region> {
        if index < self.manual.len() {
            Some(self.manual.remove(index))
        } else {
            None
        }
    }

    /// Erase-on-hit path for long presses on a detected region.
    pub fn clear_detected_effect(&mut self, index: usize) {
        if let Some(region) = self.detected.get_mut(index) {
            region.effect = Effect::None;
        }
    }

    /// Apply the current tool to every detected region. Glyph values are
    /// resolved per region, so `Random` gives each face its own draw.
    pub fn bulk_apply(&mut self, tools: &ToolSettings) {
        for region in &mut self.detected {
            region.effect = tools.effect.into();
            if tools.effect == EffectKind::Glyph {
                region.glyph = Some(tools.glyph.resolve());
            }
        }
    }

    pub fn manual_regions(&self) -> &[Region] {
        &self.manual
    }

    pub fn detected_regions(&self) -> &[Region] {
        &self.detected
    }
}

// Keep RegionKind reachable from the handle for dispatch decisions.
impl RegionHandle {
    pub fn kind(&self) -> RegionKind {
        match self {
            RegionHandle::Detected(_) => RegionKind::Detected,
            RegionHandle::Manual(_) => RegionKind::Manual,
        }
    }
}
