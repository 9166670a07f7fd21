use crate::{Error, PngOptions, PngStrip, Result, MAX_PNG_OPT_LEVEL};
#[cfg(test)]
use std::io::Cursor;

/// Encodes an opaque canvas as 8-bit RGB, dropping the alpha channel.
pub(crate) fn pixmap_to_rgb_png(pixmap: &tiny_skia::Pixmap) -> Result<Vec<u8>> {
    let rgb = rgba_to_rgb(pixmap.data());
    encode_rgb_png(&rgb, pixmap.width(), pixmap.height())
}

pub(crate) fn rgba_to_rgb(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len() / 4 * 3);
    for chunk in data.chunks_exact(4) {
        out.extend_from_slice(&chunk[..3]);
    }
    out
}

pub(crate) fn encode_rgb_png(rgb: &[u8], width: u32, height: u32) -> Result<Vec<u8>> {
    if rgb.len() != width as usize * height as usize * 3 {
        return Err(Error::Render("png encode: invalid rgb buffer".to_string()));
    }
    let mut out = Vec::new();
    let mut encoder = png::Encoder::new(&mut out, width, height);
    encoder.set_color(png::ColorType::Rgb);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder
        .write_header()
        .map_err(|err| Error::Render(format!("png encode: {err}")))?;
    writer
        .write_image_data(rgb)
        .map_err(|err| Error::Render(format!("png encode: {err}")))?;
    drop(writer);
    Ok(out)
}

/// Lossless recompression that leaves the color type and bit depth alone.
pub(crate) fn optimize_png(png: Vec<u8>, config: &PngOptions) -> Result<Vec<u8>> {
    if !config.optimize {
        return Ok(png);
    }
    let level = config.level.min(MAX_PNG_OPT_LEVEL);
    let mut options = oxipng::Options::from_preset(level);
    options.bit_depth_reduction = false;
    options.color_type_reduction = false;
    options.palette_reduction = false;
    options.grayscale_reduction = false;
    options.strip = match config.strip {
        PngStrip::None => oxipng::StripChunks::None,
        PngStrip::Safe => oxipng::StripChunks::Safe,
        PngStrip::All => oxipng::StripChunks::All,
    };
    let before = png.len();
    let optimized = oxipng::optimize_from_memory(&png, &options)
        .map_err(|err| Error::Render(format!("png optimize: {err}")))?;
    log::debug!("png optimize level {level}: {before} -> {} bytes", optimized.len());
    Ok(optimized)
}

/// Decoded image as `(rgb, width, height, color type)`.
#[cfg(test)]
pub(crate) fn decode_png_rgb(png: &[u8]) -> Result<(Vec<u8>, u32, u32, png::ColorType)> {
    let mut decoder = png::Decoder::new(Cursor::new(png));
    decoder.set_transformations(png::Transformations::normalize_to_color8());
    let mut reader = decoder
        .read_info()
        .map_err(|err| Error::Render(format!("png decode: {err}")))?;
    let buffer_size = reader
        .output_buffer_size()
        .ok_or_else(|| Error::Render("png decode: missing buffer size".to_string()))?;
    let mut buf = vec![0; buffer_size];
    let info = reader
        .next_frame(&mut buf)
        .map_err(|err| Error::Render(format!("png decode: {err}")))?;
    let data = &buf[..info.buffer_size()];
    let rgb = match info.color_type {
        png::ColorType::Rgb => data.to_vec(),
        png::ColorType::Rgba => rgba_to_rgb(data),
        other => {
            return Err(Error::Render(format!(
                "png decode: unexpected color type {other:?}"
            )));
        }
    };
    Ok((rgb, info.width, info.height, info.color_type))
}
