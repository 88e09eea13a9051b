use crate::canvas::composite::{blit_stretched, Rgba, RgbaBuffer};
use crate::canvas::model::{BrushConfig, Color};
use crate::canvas::render;

/// The drawing surface: a flattened raster plus the most recently received
/// generated image, which sits beneath any strokes drawn after it arrived.
///
/// Conceptually the surface is two ordered layers (optional background image,
/// accumulated strokes), but only the flattened result is kept. Compositing a
/// new background repaints the whole raster, so strokes drawn before that
/// point are gone for good; there is no undo.
#[derive(Debug, Clone, PartialEq)]
pub struct Surface {
    raster: RgbaBuffer,
    background_color: Color,
    background_image: Option<RgbaBuffer>,
    stroke_active: bool,
    stroke_last: (f32, f32),
    revision: u64,
}

impl Surface {
    pub fn new(width: u32, height: u32, background_color: Color) -> Self {
        Self {
            raster: RgbaBuffer::new(width, height, Rgba::opaque(background_color)),
            background_color,
            background_image: None,
            stroke_active: false,
            stroke_last: (0.0, 0.0),
            revision: 0,
        }
    }

    pub fn width(&self) -> u32 {
        self.raster.width
    }

    pub fn height(&self) -> u32 {
        self.raster.height
    }

    pub fn logical_size(&self) -> (u32, u32) {
        (self.raster.width, self.raster.height)
    }

    pub fn background_color(&self) -> Color {
        self.background_color
    }

    pub fn raster(&self) -> &RgbaBuffer {
        &self.raster
    }

    pub fn has_background_image(&self) -> bool {
        self.background_image.is_some()
    }

    pub fn is_stroke_active(&self) -> bool {
        self.stroke_active
    }

    /// Bumped on every visible mutation; the UI re-uploads its texture when
    /// this advances.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Open a new stroke at `point`. Nothing is painted until the stroke is
    /// extended, matching pen-down semantics.
    pub fn begin_stroke(&mut self, point: (f32, f32)) {
        if self.raster.is_empty() {
            return;
        }
        self.stroke_active = true;
        self.stroke_last = point;
    }

    /// Paint a segment from the previous stroke position to `point` with the
    /// given brush. No-op while no stroke is open.
    pub fn extend_stroke(&mut self, point: (f32, f32), brush: &BrushConfig) {
        if !self.stroke_active || self.raster.is_empty() {
            return;
        }
        render::draw_segment(&mut self.raster, self.stroke_last, point, brush);
        self.stroke_last = point;
        self.revision += 1;
    }

    /// Close the open stroke, if any. Idempotent; also called when the
    /// pointer leaves the canvas so a stroke can never stay stuck open.
    pub fn end_stroke(&mut self) {
        self.stroke_active = false;
    }

    /// Install `image` as the new background layer: background fill, then the
    /// image stretched to the full logical size. Strokes already on the
    /// raster are overwritten; strokes drawn from now on land on top.
    pub fn composite_background(&mut self, image: RgbaBuffer) {
        if self.raster.is_empty() || image.is_empty() {
            return;
        }
        self.raster.fill(Rgba::opaque(self.background_color));
        blit_stretched(&mut self.raster, &image);
        self.background_image = Some(image);
        self.revision += 1;
    }

    /// Back to a blank surface: background fill, background image reference
    /// discarded, any open stroke closed.
    pub fn reset(&mut self) {
        if self.raster.is_empty() {
            return;
        }
        self.raster.fill(Rgba::opaque(self.background_color));
        self.background_image = None;
        self.stroke_active = false;
        self.revision += 1;
    }

    /// The current surface flattened over an opaque background fill, for
    /// export. The visible raster is already opaque in practice; the extra
    /// fill guarantees it even if transparency ever sneaks in.
    pub fn flattened(&self) -> RgbaBuffer {
        crate::canvas::composite::flatten_over_background(
            &self.raster,
            Rgba::opaque(self.background_color),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::Surface;
    use crate::canvas::composite::{Rgba, RgbaBuffer};
    use crate::canvas::model::{BrushConfig, Color};

    fn small_surface() -> Surface {
        Surface::new(32, 32, Color::WHITE)
    }

    #[test]
    fn new_surface_is_filled_with_background_color() {
        let surface = Surface::new(4, 3, Color::rgb(1, 2, 3));
        for y in 0..3 {
            for x in 0..4 {
                assert_eq!(surface.raster().pixel(x, y), Rgba::new(1, 2, 3, 255));
            }
        }
    }

    #[test]
    fn extend_without_begin_paints_nothing() {
        let mut surface = small_surface();
        let before = surface.raster().clone();

        surface.extend_stroke((10.0, 10.0), &BrushConfig::default());
        assert_eq!(surface.raster(), &before);
        assert_eq!(surface.revision(), 0);
    }

    #[test]
    fn stroke_paints_between_begin_and_end() {
        let mut surface = small_surface();
        let brush = BrushConfig::new(Color::BLACK, 3);

        surface.begin_stroke((4.0, 16.0));
        surface.extend_stroke((28.0, 16.0), &brush);
        surface.end_stroke();

        assert_eq!(surface.raster().pixel(16, 16), Rgba::new(0, 0, 0, 255));
        assert!(!surface.is_stroke_active());
    }

    #[test]
    fn end_stroke_is_idempotent() {
        let mut surface = small_surface();
        surface.begin_stroke((1.0, 1.0));
        surface.end_stroke();
        assert!(!surface.is_stroke_active());
        surface.end_stroke();
        assert!(!surface.is_stroke_active());
    }

    #[test]
    fn composite_background_overwrites_existing_strokes() {
        let mut surface = small_surface();
        let brush = BrushConfig::new(Color::BLACK, 5);
        surface.begin_stroke((4.0, 4.0));
        surface.extend_stroke((28.0, 28.0), &brush);
        surface.end_stroke();

        let image = RgbaBuffer::new(1, 1, Rgba::new(0, 0, 255, 255));
        surface.composite_background(image);

        assert!(surface.has_background_image());
        for y in 0..32 {
            for x in 0..32 {
                assert_eq!(surface.raster().pixel(x, y), Rgba::new(0, 0, 255, 255));
            }
        }
    }

    #[test]
    fn strokes_after_composite_land_on_top() {
        let mut surface = small_surface();
        surface.composite_background(RgbaBuffer::new(1, 1, Rgba::new(0, 0, 255, 255)));

        let brush = BrushConfig::new(Color::BLACK, 3);
        surface.begin_stroke((4.0, 16.0));
        surface.extend_stroke((28.0, 16.0), &brush);
        surface.end_stroke();

        assert_eq!(surface.raster().pixel(16, 16), Rgba::new(0, 0, 0, 255));
        assert_eq!(surface.raster().pixel(16, 2), Rgba::new(0, 0, 255, 255));
    }

    #[test]
    fn composite_then_reset_restores_blank_background() {
        let mut surface = small_surface();
        surface.composite_background(RgbaBuffer::new(1, 1, Rgba::new(0, 0, 255, 255)));
        surface.reset();

        assert!(!surface.has_background_image());
        for y in 0..32 {
            for x in 0..32 {
                assert_eq!(surface.raster().pixel(x, y), Rgba::new(255, 255, 255, 255));
            }
        }
    }

    #[test]
    fn reset_closes_an_open_stroke() {
        let mut surface = small_surface();
        surface.begin_stroke((1.0, 1.0));
        surface.reset();
        assert!(!surface.is_stroke_active());
    }

    #[test]
    fn zero_sized_surface_no_ops_every_operation() {
        let mut surface = Surface::new(0, 0, Color::WHITE);
        surface.begin_stroke((1.0, 1.0));
        assert!(!surface.is_stroke_active());
        surface.extend_stroke((2.0, 2.0), &BrushConfig::default());
        surface.composite_background(RgbaBuffer::new(1, 1, Rgba::new(0, 0, 0, 255)));
        assert!(!surface.has_background_image());
        surface.reset();
        assert_eq!(surface.revision(), 0);
    }
}
