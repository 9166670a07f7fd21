const IMAGE_WIDTH: u32 = 1080;
const IMAGE_HEIGHT: u32 = 1080;
const PADDING: f32 = 100.0;
const EDGE_MARGIN: f32 = 20.0;
const SIGNATURE_GAP: f32 = 20.0;
const SCALABLE_LINE_SPACING: f32 = 15.0;
const FALLBACK_LINE_SPACING: f32 = 10.0;
const FALLBACK_CHARS_PER_LINE: usize = 60;
const DEFAULT_CHARS_PER_LINE: usize = 30;
const DEFAULT_QUOTE_SIZE: f32 = 120.0;
const DEFAULT_AUTHOR_SIZE: f32 = 60.0;
const DEFAULT_SIGNATURE_SIZE: f32 = 30.0;
const DEFAULT_PNG_OPT_LEVEL: u8 = 0;
const MAX_PNG_OPT_LEVEL: u8 = 6;
const DEFAULT_HISTORY_SIZE: usize = 10;
const DEFAULT_API_TIMEOUT_MS: u64 = 5_000;
const DEFAULT_API_URL: &str = "https://type.fit/api/quotes";
const DEFAULT_SIGNATURE: &str = "by quotecard";
const DEFAULT_WATERMARK: &str = "☆ quotecard ☆";
const ERROR_TEXT_COLOR: Rgb = Rgb(255, 0, 0);

mod background;
mod config;
mod decorations;
mod fonts;
mod history;
mod layout;
mod png;
mod quote_source;
mod render;
mod text;
mod theme;
mod types;

pub use background::synthesize;
pub use config::{ApiOptions, Config, FontOptions, HistoryOptions, PngOptions, PngStrip};
pub use decorations::apply_decoration;
pub use fonts::{BitmapFont, FontHandle, FontResolver, FontRole, FontSet};
pub use history::{History, HistoryEntry};
pub use layout::{layout, LayoutPlan, MeasuredLine};
pub use quote_source::{fetch_random_quote, parse_quotes, pick_quote, Quote};
pub use render::{compose, render_text, ComposeRequest, RenderStatus, Rendered, TextOptions};
pub use theme::{
    lookup_theme, valid_background_styles, valid_decoration_styles, valid_themes,
    BackgroundStyle, DecorationStyle, GradientDirection, Rgb, Theme, ThemeName,
};
pub use types::{Error, Result};

/// Fixed output dimensions as `(width, height)`.
pub fn canvas_size() -> (u32, u32) {
    (IMAGE_WIDTH, IMAGE_HEIGHT)
}

#[cfg(test)]
mod tests;
