use super::bitmap::{BitmapFont, FALLBACK_FONT};
use super::dirs::resolve_font_dir;
use crate::{Error, FontOptions, Result};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontRole {
    Quote,
    Author,
    Signature,
}

impl FontRole {
    pub fn id(self) -> &'static str {
        match self {
            FontRole::Quote => "quote",
            FontRole::Author => "author",
            FontRole::Signature => "signature",
        }
    }

    pub(crate) fn file_name(self, options: &FontOptions) -> &str {
        match self {
            FontRole::Quote => &options.regular,
            FontRole::Author => &options.bold,
            FontRole::Signature => &options.light,
        }
    }

    pub(crate) fn size(self, options: &FontOptions) -> f32 {
        match self {
            FontRole::Quote => options.quote_size,
            FontRole::Author => options.author_size,
            FontRole::Signature => options.signature_size,
        }
    }
}

#[derive(Clone)]
pub enum FontHandle {
    Scalable { font: Arc<fontdue::Font>, size: f32 },
    Fallback(&'static BitmapFont),
}

impl fmt::Debug for FontHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FontHandle::Scalable { size, .. } => {
                f.debug_struct("Scalable").field("size", size).finish()
            }
            FontHandle::Fallback(_) => f.write_str("Fallback"),
        }
    }
}

/// Ink extents of a run of text, relative to an origin on the ascender line.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct TextBox {
    pub(crate) left: f32,
    pub(crate) top: f32,
    pub(crate) right: f32,
    pub(crate) bottom: f32,
}

impl TextBox {
    pub(crate) fn width(&self) -> f32 {
        self.right - self.left
    }

    pub(crate) fn height(&self) -> f32 {
        self.bottom - self.top
    }
}

#[derive(Debug, Clone)]
pub(crate) struct PlacedGlyph {
    pub(crate) ch: char,
    pub(crate) x: f32,
    pub(crate) metrics: fontdue::Metrics,
}

impl FontHandle {
    pub fn fallback() -> Self {
        FontHandle::Fallback(&FALLBACK_FONT)
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, FontHandle::Fallback(_))
    }

    pub(crate) fn ascent(&self) -> f32 {
        match self {
            FontHandle::Scalable { font, size } => font
                .horizontal_line_metrics(*size)
                .map(|metrics| metrics.ascent)
                .unwrap_or(*size),
            FontHandle::Fallback(bitmap) => bitmap.top_offset as f32,
        }
    }

    /// Horizontal advance of the whole run, kerning included.
    pub(crate) fn text_length(&self, text: &str) -> f32 {
        match self {
            FontHandle::Scalable { font, size } => {
                let glyphs = place_glyphs(font, *size, text);
                glyphs
                    .last()
                    .map(|glyph| glyph.x + glyph.metrics.advance_width)
                    .unwrap_or(0.0)
            }
            FontHandle::Fallback(bitmap) => bitmap.text_length(text),
        }
    }

    pub(crate) fn text_bbox(&self, text: &str) -> TextBox {
        match self {
            FontHandle::Scalable { font, size } => {
                let ascent = self.ascent();
                let mut bbox: Option<TextBox> = None;
                for glyph in place_glyphs(font, *size, text) {
                    let metrics = glyph.metrics;
                    if metrics.width == 0 || metrics.height == 0 {
                        continue;
                    }
                    let left = glyph.x + metrics.xmin as f32;
                    let right = left + metrics.width as f32;
                    let bottom = ascent - metrics.ymin as f32;
                    let top = bottom - metrics.height as f32;
                    bbox = Some(match bbox {
                        None => TextBox {
                            left,
                            top,
                            right,
                            bottom,
                        },
                        Some(current) => TextBox {
                            left: current.left.min(left),
                            top: current.top.min(top),
                            right: current.right.max(right),
                            bottom: current.bottom.max(bottom),
                        },
                    });
                }
                bbox.unwrap_or_default()
            }
            FontHandle::Fallback(bitmap) => TextBox {
                left: 0.0,
                top: bitmap.top_offset as f32,
                right: bitmap.text_length(text),
                bottom: (bitmap.top_offset + super::bitmap::GLYPH_ROWS) as f32,
            },
        }
    }
}

pub(crate) fn place_glyphs(font: &fontdue::Font, size: f32, text: &str) -> Vec<PlacedGlyph> {
    let mut out = Vec::with_capacity(text.len());
    let mut pen = 0.0f32;
    let mut prev: Option<char> = None;
    for ch in text.chars() {
        if let Some(left) = prev {
            pen += font.horizontal_kern(left, ch, size).unwrap_or(0.0);
        }
        let metrics = font.metrics(ch, size);
        let advance = metrics.advance_width;
        out.push(PlacedGlyph {
            ch,
            x: pen,
            metrics,
        });
        pen += advance;
        prev = Some(ch);
    }
    out
}

/// Fonts bound to the three text roles of one generation.
#[derive(Debug, Clone)]
pub struct FontSet {
    pub quote: FontHandle,
    pub author: FontHandle,
    pub signature: FontHandle,
    pub fallback_active: bool,
}

impl FontSet {
    pub fn fallback() -> Self {
        Self {
            quote: FontHandle::fallback(),
            author: FontHandle::fallback(),
            signature: FontHandle::fallback(),
            fallback_active: true,
        }
    }
}

/// Per-generation font loader. The fallback state starts cleared for every
/// resolver, so nothing leaks between generations.
#[derive(Debug)]
pub struct FontResolver {
    dir: PathBuf,
    options: FontOptions,
    fallback_active: bool,
    notices: Vec<String>,
}

impl FontResolver {
    pub fn new(options: &FontOptions) -> Self {
        Self {
            dir: resolve_font_dir(options),
            options: options.clone(),
            fallback_active: false,
            notices: Vec::new(),
        }
    }

    pub fn fallback_active(&self) -> bool {
        self.fallback_active
    }

    pub fn notices(&self) -> &[String] {
        &self.notices
    }

    pub fn resolve(&mut self, role: FontRole, size: f32) -> FontHandle {
        let name = role.file_name(&self.options).to_string();
        let path = self.dir.join(&name);
        if !path.is_file() {
            self.note_fallback(format!(
                "font '{name}' not found in {}, using the built-in fallback font (limited quality)",
                self.dir.display()
            ));
            return FontHandle::fallback();
        }
        match load_scalable(&path, size) {
            Ok(font) => {
                log::debug!("loaded {} font {} at {size}px", role.id(), path.display());
                FontHandle::Scalable {
                    font: Arc::new(font),
                    size,
                }
            }
            Err(err) => {
                self.note_fallback(format!(
                    "unable to load '{name}': {err}, using the built-in fallback font"
                ));
                FontHandle::fallback()
            }
        }
    }

    pub fn resolve_all(&mut self) -> FontSet {
        let quote = self.resolve(FontRole::Quote, FontRole::Quote.size(&self.options));
        let author = self.resolve(FontRole::Author, FontRole::Author.size(&self.options));
        let signature = self.resolve(FontRole::Signature, FontRole::Signature.size(&self.options));
        if quote.is_fallback() || author.is_fallback() || signature.is_fallback() {
            return FontSet::fallback();
        }
        FontSet {
            quote,
            author,
            signature,
            fallback_active: false,
        }
    }

    fn note_fallback(&mut self, message: String) {
        if self.fallback_active {
            log::debug!("{message}");
            return;
        }
        log::warn!("{message}");
        self.fallback_active = true;
        self.notices.push(message);
    }
}

fn load_scalable(path: &Path, size: f32) -> Result<fontdue::Font> {
    let bytes = fs::read(path)?;
    let mut settings = fontdue::FontSettings::default();
    if size.is_finite() && size > 0.0 {
        settings.scale = size;
    }
    fontdue::Font::from_bytes(bytes, settings)
        .map_err(|err| Error::Render(format!("font parse: {err}")))
}
