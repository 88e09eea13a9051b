use crate::canvas::composite::RgbaBuffer;
use crate::canvas::surface::Surface;
use anyhow::{anyhow, Context, Result};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use chrono::{DateTime, Local};
use std::io::Cursor;
use std::path::{Path, PathBuf};

pub const EXPORT_SUBDIR: &str = "exports";

pub fn encode_png(buffer: &RgbaBuffer) -> Result<Vec<u8>> {
    let image = image::RgbaImage::from_raw(buffer.width, buffer.height, buffer.pixels.clone())
        .ok_or_else(|| anyhow!("raster dimensions do not match pixel data"))?;
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), image::ImageOutputFormat::Png)
        .context("encode canvas as PNG")?;
    Ok(bytes)
}

pub fn decode_png(bytes: &[u8]) -> Result<RgbaBuffer> {
    let image = image::load_from_memory_with_format(bytes, image::ImageFormat::Png)
        .context("decode PNG image")?
        .to_rgba8();
    let (width, height) = image.dimensions();
    Ok(RgbaBuffer::from_pixels(width, height, image.into_raw()))
}

/// Serialize the surface for the generation request: flattened over the
/// background color so the payload is opaque, PNG-encoded, then base64.
/// Returns the bare payload with no data-URL framing.
pub fn snapshot_base64(surface: &Surface) -> Result<String> {
    let png = encode_png(&surface.flattened())?;
    Ok(BASE64.encode(png))
}

pub fn download_filename(now: DateTime<Local>) -> String {
    format!("ai-cizim-{}.png", now.timestamp_millis())
}

/// Where downloaded canvases land: the configured directory if set, else the
/// platform download directory, else an `exports/` folder beside the
/// executable.
pub fn resolve_export_dir(configured: Option<&Path>) -> Result<PathBuf> {
    let dir = match configured {
        Some(dir) => dir.to_path_buf(),
        None => match dirs_next::download_dir() {
            Some(downloads) => downloads,
            None => {
                let exe = std::env::current_exe().context("resolve current executable")?;
                exe.parent()
                    .ok_or_else(|| anyhow!("executable path has no parent: {}", exe.display()))?
                    .join(EXPORT_SUBDIR)
            }
        },
    };
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("create export folder {}", dir.display()))?;
    Ok(dir)
}

/// Save the visible canvas (no extra flattening) as a timestamped PNG and
/// return the written path.
pub fn save_canvas_png(
    surface: &Surface,
    dir: &Path,
    now: DateTime<Local>,
) -> Result<PathBuf> {
    let path = dir.join(download_filename(now));
    let png = encode_png(surface.raster())?;
    std::fs::write(&path, png).with_context(|| format!("write {}", path.display()))?;
    Ok(path)
}
