use serde::{Deserialize, Serialize};

/// Pool the `Random` glyph choice draws from.
pub const EMOJI_POOL: &[&str] = &[
    "☺️", "😎", "🐱", "🐶", "🦊", "🦁", "🐵", "🐼", "🐨", "🐯", "😊", "🤣", "😍", "🤩", "🥳",
    "🥶", "😷", "🤠", "🤖", "👽", "👹", "👺", "👻", "🐸", "🐷", "🐹", "🐰", "🐻", "🐤",
];

/// Drawn in place of an empty or unrenderable glyph value.
pub const FALLBACK_GLYPH: &str = "☺";

/// The redaction treatment the user can select as the active tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectKind {
    Mosaic,
    Glyph,
}

/// The treatment currently applied to a region. `None` means "detected but
/// not redacted" and is only valid on detected regions; a manual region that
/// would become `None` is deleted instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    None,
    Mosaic,
    Glyph,
}

impl From<EffectKind> for Effect {
    fn from(kind: EffectKind) -> Self {
        match kind {
            EffectKind::Mosaic => Effect::Mosaic,
            EffectKind::Glyph => Effect::Glyph,
        }
    }
}

/// Which glyph the glyph tool stamps: a literal character, or a fresh
/// uniform draw from [`EMOJI_POOL`] each time it is applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GlyphChoice {
    Literal(String),
    Random,
}

impl GlyphChoice {
    /// Resolve to a concrete glyph value. `Random` re-rolls on every call;
    /// callers store the result so renders never re-roll implicitly.
    pub fn resolve(&self) -> String {
        match self {
            GlyphChoice::Literal(s) => s.clone(),
            GlyphChoice::Random => EMOJI_POOL[fastrand::usize(..EMOJI_POOL.len())].to_owned(),
        }
    }

    /// Whether a stored glyph value counts as "the same selection" for the
    /// toggle-off rule. `Random` matches anything, so repeated random clicks
    /// on a region still toggle it off.
    pub fn matches(&self, stored: Option<&str>) -> bool {
        match self {
            GlyphChoice::Literal(s) => stored == Some(s.as_str()),
            GlyphChoice::Random => true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionKind {
    /// Produced by the face detector; fixed set per image, toggled only.
    Detected,
    /// User-drawn; may be appended and removed, never reordered.
    Manual,
}

/// Axis-aligned rectangle in the image's native pixel space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl RegionRect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Rect spanning two corner points, normalized to a min corner and
    /// absolute extents.
    pub fn from_points(a: (f32, f32), b: (f32, f32)) -> Self {
        Self {
            x: a.0.min(b.0),
            y: a.1.min(b.1),
            width: (a.0 - b.0).abs(),
            height: (a.1 - b.1).abs(),
        }
    }

    /// Square of the given side length centered on a point.
    pub fn square_around(center: (f32, f32), side: f32) -> Self {
        Self {
            x: center.0 - side / 2.0,
            y: center.1 - side / 2.0,
            width: side,
            height: side,
        }
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x <= self.x + self.width && y >= self.y && y <= self.y + self.height
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// A rectangle subject to a redaction effect.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    pub kind: RegionKind,
    pub rect: RegionRect,
    pub effect: Effect,
    /// Glyph value rendered when `effect == Glyph`. Retained when the effect
    /// toggles away so toggling back keeps the previous character.
    pub glyph: Option<String>,
}

impl Region {
    pub fn detected(rect: RegionRect) -> Self {
        Self {
            kind: RegionKind::Detected,
            rect,
            effect: Effect::None,
            glyph: None,
        }
    }

    pub fn manual(rect: RegionRect, effect: Effect, glyph: Option<String>) -> Self {
        debug_assert!(effect != Effect::None, "manual regions always carry an active effect");
        Self {
            kind: RegionKind::Manual,
            rect,
            effect,
            glyph,
        }
    }
}
