use crate::document::{ImageEntry, RegionHandle};
use crate::region::RegionRect;
use crate::tools::ToolSettings;

use super::gestures::{Gesture, GestureConfig};

/// What a dispatched gesture did to the model, so the caller knows whether
/// to redraw and whether to pulse haptics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Nothing changed (click on empty space, zero-area drag).
    Unchanged,
    Changed,
    /// Changed, and the platform should emit a best-effort haptic pulse.
    ChangedWithHaptic,
}

impl DispatchOutcome {
    pub fn changed(&self) -> bool {
        !matches!(self, DispatchOutcome::Unchanged)
    }
}

/// Apply a resolved gesture to an image's region model.
///
/// Click: toggle the hit region, no-op on empty space. Drag: add a manual
/// region spanning the drag rect. Long press: delete a hit manual region,
/// else clear a hit detected region, else stamp a small square manual
/// region at the point (the only haptic case).
pub fn apply_gesture(
    entry: &mut ImageEntry,
    gesture: Gesture,
    tools: &ToolSettings,
    config: &GestureConfig,
) -> DispatchOutcome {
    match gesture {
        Gesture::Click { pos } => match entry.hit_test(pos.0, pos.1) {
            Some(handle) => {
                entry.toggle_effect(handle, tools);
                DispatchOutcome::Changed
            }
            None => DispatchOutcome::Unchanged,
        },
        Gesture::Drag { start, end } => {
            let rect = RegionRect::from_points(start, end);
            if entry.add_manual_region(rect, tools) {
                DispatchOutcome::Changed
            } else {
                DispatchOutcome::Unchanged
            }
        }
        Gesture::LongPress { pos } => match entry.hit_test(pos.0, pos.1) {
            Some(RegionHandle::Manual(i)) => {
                entry.remove_manual_region(i);
                DispatchOutcome::Changed
            }
            Some(RegionHandle::Detected(i)) => {
                entry.clear_detected_effect(i);
                DispatchOutcome::Changed
            }
            None => {
                let side = config.press_square_fraction
                    * entry.width().min(entry.height()) as f32;
                if entry.add_manual_region(RegionRect::square_around(pos, side), tools) {
                    DispatchOutcome::ChangedWithHaptic
                } else {
                    DispatchOutcome::Unchanged
                }
            }
        },
    }
}
