use crate::background::opaque;
use crate::fonts::{place_glyphs, BitmapFont, FontHandle, GLYPH_COLUMNS, GLYPH_ROWS};
use crate::{Error, Result, Rgb};
use tiny_skia::Pixmap;
use unicode_width::UnicodeWidthStr;

/// Greedy word wrap to at most `width` columns per line.
///
/// Whitespace runs collapse to a single space. A word wider than the budget
/// first fills what is left of the current line, then is cut into budget-wide
/// pieces.
pub(crate) fn wrap_words(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        let joined = text.split_whitespace().collect::<Vec<_>>().join(" ");
        return if joined.is_empty() {
            Vec::new()
        } else {
            vec![joined]
        };
    }

    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_width = 0usize;
    for word in text.split_whitespace() {
        let word_width = word.width();
        let needed = if current.is_empty() {
            word_width
        } else {
            current_width + 1 + word_width
        };
        if needed <= width {
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
            current_width = needed;
            continue;
        }
        if word_width <= width {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
            current_width = word_width;
            continue;
        }

        let mut rest = word;
        if !current.is_empty() {
            let space_left = width.saturating_sub(current_width + 1);
            if space_left > 0 {
                let (head, tail) = split_at_width(rest, space_left);
                current.push(' ');
                current.push_str(head);
                rest = tail;
            }
            lines.push(std::mem::take(&mut current));
        }
        while rest.width() > width {
            let (head, tail) = split_at_width(rest, width);
            lines.push(head.to_string());
            rest = tail;
        }
        current.push_str(rest);
        current_width = rest.width();
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Splits after the widest prefix fitting in `width`, always taking at least
/// one character.
fn split_at_width(text: &str, width: usize) -> (&str, &str) {
    let mut used = 0usize;
    let mut end = 0usize;
    for (index, ch) in text.char_indices() {
        let w = unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + w > width && end > 0 {
            break;
        }
        used += w;
        end = index + ch.len_utf8();
    }
    text.split_at(end)
}

/// Draws `text` with its origin at `(x, y)`, `y` being the ascender line.
pub(crate) fn draw_text(
    pixmap: &mut Pixmap,
    font: &FontHandle,
    text: &str,
    x: f32,
    y: f32,
    color: Rgb,
) -> Result<()> {
    if !x.is_finite() || !y.is_finite() {
        return Err(Error::Render(format!(
            "invalid text position ({x}, {y}) for {text:?}"
        )));
    }
    match font {
        FontHandle::Scalable { font, size } => {
            draw_scalable(pixmap, font, *size, text, x, y, color);
        }
        FontHandle::Fallback(bitmap) => draw_bitmap(pixmap, bitmap, text, x, y, color),
    }
    Ok(())
}

fn draw_scalable(
    pixmap: &mut Pixmap,
    font: &fontdue::Font,
    size: f32,
    text: &str,
    x: f32,
    y: f32,
    color: Rgb,
) {
    let ascent = font
        .horizontal_line_metrics(size)
        .map(|metrics| metrics.ascent)
        .unwrap_or(size);
    for glyph in place_glyphs(font, size, text) {
        if glyph.metrics.width == 0 || glyph.metrics.height == 0 {
            continue;
        }
        let (metrics, coverage) = font.rasterize(glyph.ch, size);
        let left = (x + glyph.x + metrics.xmin as f32).round() as i64;
        let top = (y + ascent - metrics.ymin as f32 - metrics.height as f32).round() as i64;
        for row in 0..metrics.height {
            for col in 0..metrics.width {
                let alpha = coverage[row * metrics.width + col];
                if alpha > 0 {
                    blend_pixel(
                        pixmap,
                        left + col as i64,
                        top + row as i64,
                        color,
                        alpha,
                    );
                }
            }
        }
    }
}

fn draw_bitmap(pixmap: &mut Pixmap, font: &BitmapFont, text: &str, x: f32, y: f32, color: Rgb) {
    let origin_x = x.round() as i64;
    let origin_y = y.round() as i64 + font.top_offset as i64;
    for (index, ch) in text.chars().enumerate() {
        let cell_x = origin_x + (index as f32 * font.advance) as i64;
        let rows = font.glyph(ch);
        for row in 0..GLYPH_ROWS {
            let bits = rows[row as usize];
            for col in 0..GLYPH_COLUMNS {
                if bits & (0x10 >> col) != 0 {
                    blend_pixel(
                        pixmap,
                        cell_x + col as i64,
                        origin_y + row as i64,
                        color,
                        255,
                    );
                }
            }
        }
    }
}

/// Source-over onto an opaque canvas; pixels outside the canvas are clipped.
fn blend_pixel(pixmap: &mut Pixmap, x: i64, y: i64, color: Rgb, alpha: u8) {
    let width = pixmap.width() as i64;
    let height = pixmap.height() as i64;
    if x < 0 || y < 0 || x >= width || y >= height {
        return;
    }
    let index = (y * width + x) as usize;
    let pixels = pixmap.pixels_mut();
    let Some(pixel) = pixels.get_mut(index) else {
        return;
    };
    if alpha == 255 {
        *pixel = opaque(color);
        return;
    }
    let under = Rgb(pixel.red(), pixel.green(), pixel.blue());
    *pixel = opaque(under.lerp(color, alpha as f32 / 255.0));
}
