//! Drawing surface, text measurement and the render-to-image entry point.

pub mod clip;
pub mod graphics;
pub mod measure;
pub mod path;
pub mod raster;

pub use clip::ClipStack;
pub use graphics::{GraphicsAdapter, SmoothingMode, SmoothingToken, TextDirection};
pub use measure::{measure_extent, measure_fit, measure_fit_rescan, FitResult};
pub use path::{Corner, GraphicsPath};
pub use raster::{
    pixmap_digest, render_to_image, render_to_png, HtmlContainer, PageGeometry, Screenshot,
};
