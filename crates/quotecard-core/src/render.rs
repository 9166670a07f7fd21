use crate::background::synthesize;
use crate::decorations::apply_decoration;
use crate::fonts::FontHandle;
use crate::layout::{layout, measure_line, LayoutPlan};
use crate::png::{optimize_png, pixmap_to_rgb_png};
use crate::text::draw_text;
use crate::{
    Config, Error, FontResolver, FontSet, Result, Theme, EDGE_MARGIN, ERROR_TEXT_COLOR,
    PADDING, SIGNATURE_GAP,
};
use tiny_skia::Pixmap;

#[derive(Debug, Clone)]
pub struct ComposeRequest {
    pub quote: String,
    pub author: String,
    pub config: Config,
}

/// Optional footer texts drawn with the signature role font.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextOptions {
    pub signature: bool,
    pub watermark: bool,
    pub signature_text: String,
    pub watermark_text: String,
}

impl TextOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            signature: config.signature,
            watermark: config.watermark,
            signature_text: config.signature_text.clone(),
            watermark_text: config.watermark_text.clone(),
        }
    }
}

impl Default for TextOptions {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderStatus {
    Complete,
    /// Text could not be laid out or drawn; a red notice replaced it.
    Degraded(String),
}

impl RenderStatus {
    pub fn is_complete(&self) -> bool {
        matches!(self, RenderStatus::Complete)
    }
}

#[derive(Debug, Clone)]
pub struct Rendered {
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub fallback_font: bool,
    pub status: RenderStatus,
    pub notices: Vec<String>,
}

pub fn compose(request: &ComposeRequest) -> Result<Rendered> {
    if request.quote.trim().is_empty() {
        return Err(Error::InvalidInput("quote must not be empty".to_string()));
    }
    let config = &request.config;
    let theme = config.theme.palette();
    let mut resolver = FontResolver::new(&config.font);

    let mut pixmap = synthesize(config.background, config.gradient_direction, theme)?;
    apply_decoration(&mut pixmap, config.decoration, theme, &mut resolver)?;
    let fonts = resolver.resolve_all();
    let status = render_text(
        &mut pixmap,
        &request.quote,
        &request.author,
        &fonts,
        theme,
        &TextOptions::from_config(config),
    );
    if let RenderStatus::Degraded(reason) = &status {
        log::warn!("text rendering degraded: {reason}");
    }

    let png = pixmap_to_rgb_png(&pixmap)?;
    let bytes = optimize_png(png, &config.png)?;
    log::info!(
        "composed {}x{} card ({} theme, {} background, {} decoration, {} bytes)",
        pixmap.width(),
        pixmap.height(),
        config.theme,
        config.background,
        config.decoration,
        bytes.len()
    );
    Ok(Rendered {
        bytes,
        width: pixmap.width(),
        height: pixmap.height(),
        fallback_font: fonts.fallback_active || resolver.fallback_active(),
        status,
        notices: resolver.notices().to_vec(),
    })
}

/// Lays out and draws the quote block and footers. Failures never escape:
/// they are painted onto the canvas and reported through the status.
pub fn render_text(
    pixmap: &mut Pixmap,
    quote: &str,
    author: &str,
    fonts: &FontSet,
    theme: &Theme,
    options: &TextOptions,
) -> RenderStatus {
    let max_width = pixmap.width() as f32 - 2.0 * PADDING;
    let result = layout(quote, author, fonts, max_width)
        .and_then(|plan| draw_plan(pixmap, &plan, fonts, theme, options));
    recover(pixmap, result)
}

#[cfg(test)]
pub(crate) fn render_plan(
    pixmap: &mut Pixmap,
    plan: &LayoutPlan,
    fonts: &FontSet,
    theme: &Theme,
    options: &TextOptions,
) -> RenderStatus {
    let result = draw_plan(pixmap, plan, fonts, theme, options);
    recover(pixmap, result)
}

fn recover(pixmap: &mut Pixmap, result: Result<()>) -> RenderStatus {
    match result {
        Ok(()) => RenderStatus::Complete,
        Err(err) => {
            let reason = err.to_string();
            let notice = format!("text rendering failed: {reason}");
            if let Err(paint_err) = draw_text(
                pixmap,
                &FontHandle::fallback(),
                &notice,
                PADDING,
                PADDING,
                ERROR_TEXT_COLOR,
            ) {
                log::debug!("unable to paint error notice: {paint_err}");
            }
            RenderStatus::Degraded(reason)
        }
    }
}

fn draw_plan(
    pixmap: &mut Pixmap,
    plan: &LayoutPlan,
    fonts: &FontSet,
    theme: &Theme,
    options: &TextOptions,
) -> Result<()> {
    let width = pixmap.width() as f32;
    let height = pixmap.height() as f32;

    let signature = if options.signature {
        Some(measure_line(
            &fonts.signature,
            options.signature_text.clone(),
        )?)
    } else {
        None
    };
    let signature_height = signature.as_ref().map(|line| line.height).unwrap_or(0.0);

    let mut y = (height - plan.total_height - signature_height - SIGNATURE_GAP) / 2.0;
    for line in &plan.lines {
        let x = (width - line.width) / 2.0;
        draw_text(pixmap, &fonts.quote, &line.text, x, y, theme.text_color)?;
        y += line.height + plan.line_spacing;
    }

    if let Some(author) = &plan.author {
        y += plan.line_spacing;
        let x = (width - author.width) / 2.0;
        draw_text(pixmap, &fonts.author, &author.text, x, y, theme.author_color)?;
    }

    if let Some(signature) = &signature {
        let x = width - signature.width - EDGE_MARGIN;
        let y = height - signature.height - EDGE_MARGIN;
        draw_text(
            pixmap,
            &fonts.signature,
            &signature.text,
            x,
            y,
            theme.signature_color,
        )?;
    }

    if options.watermark {
        let watermark = measure_line(&fonts.signature, options.watermark_text.clone())?;
        let y = height - watermark.height - EDGE_MARGIN;
        draw_text(
            pixmap,
            &fonts.signature,
            &watermark.text,
            EDGE_MARGIN,
            y,
            theme.signature_color,
        )?;
    }
    Ok(())
}
