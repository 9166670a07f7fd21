mod bitmap;
pub(crate) mod dirs;
mod resolve;

pub(crate) use bitmap::*;
pub use bitmap::BitmapFont;
pub use resolve::{FontHandle, FontResolver, FontRole, FontSet};
pub(crate) use resolve::place_glyphs;
