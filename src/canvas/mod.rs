pub mod composite;
pub mod export;
pub mod input;
pub mod model;
pub mod render;
pub mod surface;

pub use composite::{Rgba, RgbaBuffer};
pub use input::{normalize_pointer, DisplayRect};
pub use model::{BrushConfig, Color};
pub use surface::Surface;
