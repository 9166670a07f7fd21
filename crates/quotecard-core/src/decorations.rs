use crate::text::draw_text;
use crate::{DecorationStyle, Error, FontResolver, FontRole, Result, Rgb, Theme, PADDING};
use tiny_skia::{FillRule, Paint, PathBuilder, Pixmap, Rect, Transform};

const QUOTE_MARKS: &str = "\"\"";
const QUOTE_MARK_SIZE: f32 = 160.0;
const BORDER_MARGIN: f32 = 50.0;
const BORDER_WIDTH: f32 = 5.0;
const CORNER_MARGIN: f32 = 40.0;
const CORNER_LENGTH: f32 = 80.0;
const CORNER_WIDTH: f32 = 5.0;
const DOT_RADIUS: f32 = 4.0;
const DOT_SPACING: u32 = 80;

/// Paints the accent shapes of `style` in `theme.decoration_color`.
///
/// The quote-marks style draws with the author role font, so it goes through
/// `resolver` and may flip it into fallback mode.
pub fn apply_decoration(
    pixmap: &mut Pixmap,
    style: DecorationStyle,
    theme: &Theme,
    resolver: &mut FontResolver,
) -> Result<()> {
    let color = theme.decoration_color;
    match style {
        DecorationStyle::None => return Ok(()),
        DecorationStyle::QuoteMarks => {
            let font = resolver.resolve(FontRole::Author, QUOTE_MARK_SIZE);
            draw_text(pixmap, &font, QUOTE_MARKS, PADDING, PADDING, color)?;
        }
        DecorationStyle::Border => draw_border(pixmap, color)?,
        DecorationStyle::CornerMarks => draw_corner_marks(pixmap, color)?,
        DecorationStyle::DotGrid => draw_dot_grid(pixmap, color)?,
    }
    log::debug!("applied {} decoration", style.id());
    Ok(())
}

fn solid(color: Rgb, anti_alias: bool) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(color.to_skia());
    paint.anti_alias = anti_alias;
    paint
}

fn fill_rect(pixmap: &mut Pixmap, x: f32, y: f32, w: f32, h: f32, paint: &Paint) -> Result<()> {
    let rect = Rect::from_xywh(x, y, w, h)
        .ok_or_else(|| Error::Render(format!("invalid rect {x},{y} {w}x{h}")))?;
    pixmap.fill_rect(rect, paint, Transform::identity(), None);
    Ok(())
}

/// Outline of the inset rectangle; the stroke grows inward from the margin.
fn draw_border(pixmap: &mut Pixmap, color: Rgb) -> Result<()> {
    let paint = solid(color, false);
    let near = BORDER_MARGIN;
    let far_x = pixmap.width() as f32 - BORDER_MARGIN;
    let far_y = pixmap.height() as f32 - BORDER_MARGIN;
    let span_x = far_x - near + 1.0;
    let span_y = far_y - near + 1.0;
    fill_rect(pixmap, near, near, span_x, BORDER_WIDTH, &paint)?;
    fill_rect(pixmap, near, far_y + 1.0 - BORDER_WIDTH, span_x, BORDER_WIDTH, &paint)?;
    fill_rect(pixmap, near, near, BORDER_WIDTH, span_y, &paint)?;
    fill_rect(pixmap, far_x + 1.0 - BORDER_WIDTH, near, BORDER_WIDTH, span_y, &paint)?;
    Ok(())
}

/// Right-angle brackets in the four corners, each arm centered on its line.
fn draw_corner_marks(pixmap: &mut Pixmap, color: Rgb) -> Result<()> {
    let paint = solid(color, false);
    let half = (CORNER_WIDTH / 2.0).floor();
    let right = pixmap.width() as f32 - CORNER_MARGIN;
    let bottom = pixmap.height() as f32 - CORNER_MARGIN;
    let arm = CORNER_LENGTH + 1.0;

    for (cx, cy) in [
        (CORNER_MARGIN, CORNER_MARGIN),
        (right, CORNER_MARGIN),
        (CORNER_MARGIN, bottom),
        (right, bottom),
    ] {
        let arm_x = if cx < right { cx } else { cx - CORNER_LENGTH };
        let arm_y = if cy < bottom { cy } else { cy - CORNER_LENGTH };
        fill_rect(pixmap, arm_x, cy - half, arm, CORNER_WIDTH, &paint)?;
        fill_rect(pixmap, cx - half, arm_y, CORNER_WIDTH, arm, &paint)?;
    }
    Ok(())
}

fn draw_dot_grid(pixmap: &mut Pixmap, color: Rgb) -> Result<()> {
    let paint = solid(color, true);
    let rows = pixmap.height() / DOT_SPACING;
    let cols = pixmap.width() / DOT_SPACING;
    let offset = DOT_SPACING as f32 / 2.0;
    let mut builder = PathBuilder::new();
    for row in 0..rows {
        for col in 0..cols {
            let cx = (col * DOT_SPACING) as f32 + offset;
            let cy = (row * DOT_SPACING) as f32 + offset;
            builder.push_circle(cx, cy, DOT_RADIUS);
        }
    }
    let Some(path) = builder.finish() else {
        return Ok(());
    };
    pixmap.fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);
    Ok(())
}
