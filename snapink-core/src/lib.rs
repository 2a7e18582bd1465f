pub mod buffer;
pub mod capture;
pub mod color;
pub mod decode;
pub mod export;
pub mod geom;
pub mod orientation;
pub mod prefs;
pub mod raster;
pub mod render;
pub mod session;
pub mod stroke;
pub mod surface;

pub use buffer::ImageBuffer;
pub use color::Color;
pub use geom::{DisplayRect, Point};
pub use orientation::OrientationTag;
pub use session::EditSession;
pub use stroke::StrokeStyle;
pub use surface::{AnnotationSurface, PointerEvent, PointerPhase};
