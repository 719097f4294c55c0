mod canvas;
mod compositor;
mod cull;

pub use canvas::{clip_blit, Canvas, MacroquadCanvas, TextureCache};
pub use compositor::{footprint_row, CompositeMode, DepthCompositor, DrawItem};
pub use cull::{is_visible, padded_view};
