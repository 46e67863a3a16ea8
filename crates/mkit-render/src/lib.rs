pub mod assets;
pub mod background;
pub mod bitmap;
pub mod compositor;
pub mod export;
pub mod logo;
pub mod outline;
pub mod paint;
pub mod text;

pub use assets::{AssetSlot, Assets, LoadToken};
pub use bitmap::{Bitmap, DecodeError};
pub use compositor::Compositor;
pub use export::{ExportError, ExportedImage, demultiplied_rgba, encode_png, file_name};
pub use outline::{FaceSlot, FontError, OutlineRasterizer};
pub use paint::{RenderError, render_image, render_into};
pub use text::{MonoRasterizer, TextRasterizer};

// Re-export so hosts and tests use the same tiny-skia version
pub use tiny_skia;
