use crate::fonts::FontHandle;
use crate::text::wrap_words;
use crate::{
    Error, FontSet, Result, DEFAULT_CHARS_PER_LINE, FALLBACK_CHARS_PER_LINE,
    FALLBACK_LINE_SPACING, SCALABLE_LINE_SPACING,
};

#[derive(Debug, Clone, PartialEq)]
pub struct MeasuredLine {
    pub text: String,
    pub width: f32,
    pub height: f32,
}

/// Wrapped quote lines plus the optional author line, ready to be placed.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutPlan {
    pub lines: Vec<MeasuredLine>,
    pub line_spacing: f32,
    pub total_height: f32,
    pub author: Option<MeasuredLine>,
}

pub fn layout(quote: &str, author: &str, fonts: &FontSet, max_width: f32) -> Result<LayoutPlan> {
    if !max_width.is_finite() || max_width <= 0.0 {
        return Err(Error::Render(format!("invalid text width {max_width}")));
    }
    let fallback = fonts.fallback_active || fonts.quote.is_fallback();
    let (chars_per_line, line_spacing) = if fallback {
        (FALLBACK_CHARS_PER_LINE, FALLBACK_LINE_SPACING)
    } else {
        (
            estimate_chars_per_line(&fonts.quote, max_width),
            SCALABLE_LINE_SPACING,
        )
    };

    let mut wrapped = wrap_words(quote, chars_per_line);
    if wrapped.is_empty() {
        wrapped.push(String::new());
    }
    let lines = wrapped
        .into_iter()
        .map(|text| measure_line(&fonts.quote, text))
        .collect::<Result<Vec<_>>>()?;

    let mut total_height: f32 = lines.iter().map(|line| line.height).sum();
    total_height += line_spacing * (lines.len() - 1) as f32;

    let author = if author.trim().is_empty() {
        None
    } else {
        let line = measure_line(&fonts.author, author_line(author))?;
        total_height += line.height + line_spacing * 2.0;
        Some(line)
    };

    log::debug!(
        "layout: {} line(s) at {chars_per_line} chars, block height {total_height}",
        lines.len()
    );
    Ok(LayoutPlan {
        lines,
        line_spacing,
        total_height,
        author,
    })
}

pub(crate) fn author_line(author: &str) -> String {
    format!("\u{2014} {}", author.trim())
}

fn estimate_chars_per_line(font: &FontHandle, max_width: f32) -> usize {
    let advance = font.text_length("a");
    if !advance.is_finite() || advance <= 0.0 {
        return DEFAULT_CHARS_PER_LINE;
    }
    match (max_width / advance).floor() as usize {
        0 => DEFAULT_CHARS_PER_LINE,
        estimate => estimate,
    }
}

/// Fallback lines use the fixed line box; scalable lines use their ink box.
pub(crate) fn measure_line(font: &FontHandle, text: String) -> Result<MeasuredLine> {
    let (width, height) = match font {
        FontHandle::Fallback(bitmap) => (bitmap.text_length(&text), bitmap.line_height),
        FontHandle::Scalable { .. } => {
            let bbox = font.text_bbox(&text);
            (bbox.width(), bbox.height())
        }
    };
    if !width.is_finite() || !height.is_finite() || width < 0.0 || height < 0.0 {
        return Err(Error::Render(format!(
            "invalid metrics {width}x{height} for {text:?}"
        )));
    }
    Ok(MeasuredLine {
        text,
        width,
        height,
    })
}
