/// A resolved single-pointer interaction. Positions are in the image's
/// native pixel space (see [`map_to_surface`]).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gesture {
    Click { pos: (f32, f32) },
    Drag { start: (f32, f32), end: (f32, f32) },
    LongPress { pos: (f32, f32) },
}

/// Configuration for gesture classification.
#[derive(Debug, Clone)]
pub struct GestureConfig {
    /// Displacement (surface pixels) at or above which a release classifies
    /// as a drag instead of a click. Crossing it mid-press also disarms the
    /// long-press timer.
    pub move_threshold: f32,
    /// Hold duration (seconds) before a long press fires.
    pub long_press_secs: f64,
    /// Side of the square region a long press on empty space creates, as a
    /// fraction of the shorter surface dimension.
    pub press_square_fraction: f32,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            move_threshold: 10.0,
            long_press_secs: 0.5,
            press_square_fraction: 0.15,
        }
    }
}

#[derive(Debug)]
enum PressState {
    Idle,
    Pressed {
        start: (f32, f32),
        pressed_at: f64,
        /// Cleared once movement exceeds the threshold; a disarmed press can
        /// no longer fire a long press but still classifies at release.
        timer_armed: bool,
    },
    /// Long press already dispatched; the eventual release is swallowed.
    Fired,
}

/// State machine over one pointer interaction:
/// `Idle -> Pressed -> {Click, Drag, LongPress} -> Idle`.
///
/// Timestamps are passed in by the caller (seconds, any monotonic origin),
/// and the long-press timer is polled rather than scheduled, which keeps the
/// machine synchronous and testable.
#[derive(Debug)]
pub struct GestureResolver {
    config: GestureConfig,
    state: PressState,
}

impl GestureResolver {
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            state: PressState::Idle,
        }
    }

    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    pub fn is_pressed(&self) -> bool {
        matches!(self.state, PressState::Pressed { .. })
    }

    /// Pointer down: record the start point and arm the long-press timer.
    pub fn on_press(&mut self, pos: (f32, f32), now: f64) {
        self.state = PressState::Pressed {
            start: pos,
            pressed_at: now,
            timer_armed: true,
        };
    }

    /// Pointer movement while pressed. Sufficient displacement disarms the
    /// long-press timer; classification still happens at release.
    pub fn on_move(&mut self, pos: (f32, f32)) {
        if let PressState::Pressed {
            start, timer_armed, ..
        } = &mut self.state
        {
            if *timer_armed && distance(*start, pos) > self.config.move_threshold {
                *timer_armed = false;
            }
        }
    }

    /// Check the long-press timer. Once it fires the interaction is over;
    /// the following release resolves to nothing.
    pub fn poll(&mut self, now: f64) -> Option<Gesture> {
        if let PressState::Pressed {
            start,
            pressed_at,
            timer_armed: true,
        } = self.state
        {
            if now - pressed_at >= self.config.long_press_secs {
                self.state = PressState::Fired;
                return Some(Gesture::LongPress { pos: start });
            }
        }
        None
    }

    /// Pointer up: classify by total displacement unless a long press
    /// already resolved this interaction.
    pub fn on_release(&mut self, pos: (f32, f32)) -> Option<Gesture> {
        match std::mem::replace(&mut self.state, PressState::Idle) {
            PressState::Pressed { start, .. } => {
                if distance(start, pos) < self.config.move_threshold {
                    Some(Gesture::Click { pos: start })
                } else {
                    Some(Gesture::Drag { start, end: pos })
                }
            }
            _ => None,
        }
    }

    /// Abandon the current interaction (pointer left the canvas).
    pub fn cancel(&mut self) {
        self.state = PressState::Idle;
    }
}

fn distance(a: (f32, f32), b: (f32, f32)) -> f32 {
    let dx = a.0 - b.0;
    let dy = a.1 - b.1;
    (dx * dx + dy * dy).sqrt()
}

/// Map a display-space position onto the surface's native pixel space using
/// the ratio of surface dimensions to rendered dimensions, per axis.
pub fn map_to_surface(
    display_pos: (f32, f32),
    display_origin: (f32, f32),
    display_size: (f32, f32),
    surface_size: (u32, u32),
) -> (f32, f32) {
    let scale_x = surface_size.0 as f32 / display_size.0.max(1.0);
    let scale_y = surface_size.1 as f32 / display_size.1.max(1.0);
    (
        (display_pos.0 - display_origin.0) * scale_x,
        (display_pos.1 - display_origin.1) * scale_y,
    )
}
