use crate::{
    BackgroundStyle, Error, GradientDirection, Result, Rgb, Theme, IMAGE_HEIGHT, IMAGE_WIDTH,
};
use tiny_skia::{Pixmap, PremultipliedColorU8};

/// Builds a fresh canvas of the fixed output size filled according to `style`.
pub fn synthesize(
    style: BackgroundStyle,
    direction: GradientDirection,
    theme: &Theme,
) -> Result<Pixmap> {
    let mut pixmap = new_canvas(IMAGE_WIDTH, IMAGE_HEIGHT)?;
    match style {
        BackgroundStyle::Flat => pixmap.fill(theme.bg_color1.to_skia()),
        BackgroundStyle::Gradient => {
            fill_linear(&mut pixmap, theme.bg_color1, theme.bg_color2, direction)
        }
        BackgroundStyle::Radial => fill_radial(&mut pixmap, theme.bg_color1, theme.bg_color2),
    }
    log::debug!(
        "synthesized {} background ({}x{})",
        style.id(),
        pixmap.width(),
        pixmap.height()
    );
    Ok(pixmap)
}

pub(crate) fn new_canvas(width: u32, height: u32) -> Result<Pixmap> {
    Pixmap::new(width, height)
        .ok_or_else(|| Error::Render(format!("invalid canvas size {width}x{height}")))
}

pub(crate) fn opaque(color: Rgb) -> PremultipliedColorU8 {
    PremultipliedColorU8::from_rgba(color.0, color.1, color.2, 255)
        .unwrap_or(PremultipliedColorU8::TRANSPARENT)
}

pub(crate) fn fill_linear(pixmap: &mut Pixmap, start: Rgb, end: Rgb, direction: GradientDirection) {
    let width = pixmap.width() as usize;
    let height = pixmap.height() as usize;
    match direction {
        GradientDirection::Vertical => {
            for (y, row) in pixmap.pixels_mut().chunks_exact_mut(width).enumerate() {
                let ratio = y as f32 / height as f32;
                row.fill(opaque(start.lerp(end, ratio)));
            }
        }
        GradientDirection::Horizontal => {
            let columns: Vec<PremultipliedColorU8> = (0..width)
                .map(|x| opaque(start.lerp(end, x as f32 / width as f32)))
                .collect();
            for row in pixmap.pixels_mut().chunks_exact_mut(width) {
                row.copy_from_slice(&columns);
            }
        }
    }
}

/// Concentric discs from the outer radius inward. Every pixel ends up with the
/// color of the smallest disc covering it, so the discs are resolved per pixel
/// instead of being painted one over another.
pub(crate) fn fill_radial(pixmap: &mut Pixmap, center: Rgb, edge: Rgb) {
    let width = pixmap.width() as usize;
    let height = pixmap.height() as usize;
    let max_radius = width.max(height);
    let cx = (width / 2) as f32;
    let cy = (height / 2) as f32;

    let mut rings = Vec::with_capacity(max_radius + 1);
    rings.push(opaque(center));
    for radius in 1..=max_radius {
        let ratio = radius as f32 / max_radius as f32;
        rings.push(opaque(center.lerp(edge, ratio)));
    }
    let outside = opaque(edge);

    for (y, row) in pixmap.pixels_mut().chunks_exact_mut(width).enumerate() {
        let dy = y as f32 - cy;
        for (x, pixel) in row.iter_mut().enumerate() {
            let dx = x as f32 - cx;
            let radius = ((dx * dx + dy * dy).sqrt().ceil() as usize).max(1);
            *pixel = rings.get(radius).copied().unwrap_or(outside);
        }
    }
}
