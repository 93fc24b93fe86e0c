//! PNG export with embedded metadata (tEXt chunks).

use std::io::BufWriter;
use std::path::Path;

use tracing::debug;

/// Metadata to embed in an exported PNG as tEXt chunks.
pub struct ExportMetadata {
    pub backend: String,
    pub x_origin: String,
    pub y_origin: String,
    pub extent: String,
    pub num_iterations: u32,
    pub num_threads: u32,
    pub palette_size: usize,
    pub width: u32,
    pub height: u32,
}

/// Write an ARGB pixel buffer as a PNG file with embedded render metadata.
///
/// Uses the `png` crate directly (rather than `image`) to inject custom tEXt
/// chunks readable by exiftool, IrfanView, XnView, etc.
pub fn export_png(
    pixels: &[u32],
    width: u32,
    height: u32,
    path: &Path,
    metadata: &ExportMetadata,
) -> Result<(), String> {
    let expected = width as usize * height as usize;
    if pixels.len() != expected {
        return Err(format!(
            "Pixel buffer holds {} values, expected {expected}",
            pixels.len()
        ));
    }

    let file = std::fs::File::create(path).map_err(|e| format!("Failed to create file: {e}"))?;
    let writer = BufWriter::new(file);

    let mut encoder = png::Encoder::new(writer, width, height);
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    encoder.set_compression(png::Compression::Default);

    encoder
        .add_text_chunk("Software".to_string(), "Deepbrot".to_string())
        .map_err(|e| format!("Failed to add text chunk: {e}"))?;

    let description = build_description(metadata);
    encoder
        .add_text_chunk("Description".to_string(), description)
        .map_err(|e| format!("Failed to add text chunk: {e}"))?;

    for (key, value) in &build_metadata_pairs(metadata) {
        encoder
            .add_text_chunk(key.clone(), value.clone())
            .map_err(|e| format!("Failed to add text chunk '{key}': {e}"))?;
    }

    let mut png_writer = encoder
        .write_header()
        .map_err(|e| format!("Failed to write PNG header: {e}"))?;

    png_writer
        .write_image_data(&argb_to_rgba(pixels))
        .map_err(|e| format!("Failed to write PNG image data: {e}"))?;

    debug!("Exported PNG {}x{} to {}", width, height, path.display());
    Ok(())
}

fn build_description(meta: &ExportMetadata) -> String {
    format!(
        "Mandelbrot ({}) - Origin: ({}, {}), Extent: {}, Iterations: {}",
        meta.backend, meta.x_origin, meta.y_origin, meta.extent, meta.num_iterations,
    )
}

fn build_metadata_pairs(meta: &ExportMetadata) -> Vec<(String, String)> {
    vec![
        ("Deepbrot.Backend".into(), meta.backend.clone()),
        ("Deepbrot.OriginX".into(), meta.x_origin.clone()),
        ("Deepbrot.OriginY".into(), meta.y_origin.clone()),
        ("Deepbrot.Extent".into(), meta.extent.clone()),
        (
            "Deepbrot.Iterations".into(),
            meta.num_iterations.to_string(),
        ),
        ("Deepbrot.Threads".into(), meta.num_threads.to_string()),
        ("Deepbrot.PaletteSize".into(), meta.palette_size.to_string()),
        (
            "Deepbrot.Resolution".into(),
            format!("{}x{}", meta.width, meta.height),
        ),
    ]
}

fn argb_to_rgba(pixels: &[u32]) -> Vec<u8> {
    let mut rgba = Vec::with_capacity(pixels.len() * 4);
    for &pixel in pixels {
        rgba.push(((pixel >> 16) & 0xFF) as u8);
        rgba.push(((pixel >> 8) & 0xFF) as u8);
        rgba.push((pixel & 0xFF) as u8);
        rgba.push(((pixel >> 24) & 0xFF) as u8);
    }
    rgba
}
