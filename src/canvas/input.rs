/// On-screen rectangle the canvas is displayed in, in UI points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayRect {
    pub origin: (f32, f32),
    pub size: (f32, f32),
}

impl DisplayRect {
    pub fn new(origin: (f32, f32), size: (f32, f32)) -> Self {
        Self { origin, size }
    }
}

/// Map a pointer position to logical canvas coordinates.
///
/// The canvas has a fixed logical pixel grid but is displayed scaled to fit
/// the window, so screen offsets are multiplied by `logical / displayed` per
/// axis. A missing pointer position or a degenerate display rectangle yields
/// `(0.0, 0.0)`; callers treat that as a harmless stroke at the origin rather
/// than an error.
pub fn normalize_pointer(
    pointer: Option<(f32, f32)>,
    rect: DisplayRect,
    logical: (u32, u32),
) -> (f32, f32) {
    let Some((px, py)) = pointer else {
        return (0.0, 0.0);
    };
    if rect.size.0 <= 0.0 || rect.size.1 <= 0.0 {
        return (0.0, 0.0);
    }

    let scale_x = logical.0 as f32 / rect.size.0;
    let scale_y = logical.1 as f32 / rect.size.1;
    ((px - rect.origin.0) * scale_x, (py - rect.origin.1) * scale_y)
}
