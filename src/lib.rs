#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod detect;
pub mod document;
pub mod effects;
pub mod error;
pub mod export;
pub mod input;
pub mod loader;
pub mod region;
pub mod render;
pub mod session;
pub mod tools;
pub mod util;

pub use app::PrivacyCamApp;
pub use detect::{FaceBounds, FaceDetector};
pub use document::{ImageEntry, RegionHandle};
pub use effects::GlyphRenderer;
pub use input::{Gesture, GestureConfig, GestureResolver};
pub use region::{Effect, EffectKind, GlyphChoice, Region, RegionKind, RegionRect};
pub use session::SessionStore;
pub use tools::ToolSettings;
