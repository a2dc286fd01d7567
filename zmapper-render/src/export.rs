//! PNG export with embedded metadata (tEXt chunks).

use std::io::BufWriter;
use std::path::Path;

use tracing::debug;

use zmapper_core::{Complex, ParamValues, PlaneRect};

use crate::buffer::RenderBuffer;
use crate::error::RenderError;

/// Metadata to embed in an exported PNG as tEXt chunks.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportMetadata {
    pub title: String,
    pub formula: String,
    pub parameters: ParamValues,
    pub grid_extent: PlaneRect,
    /// Visible rectangle of the exported pane.
    pub view: Option<PlaneRect>,
}

impl ExportMetadata {
    pub fn new(formula: impl Into<String>, parameters: ParamValues, grid_extent: PlaneRect) -> Self {
        let formula = formula.into();
        Self {
            title: format!("f(z) = {formula}"),
            formula,
            parameters,
            grid_extent,
            view: None,
        }
    }
}

/// Write an RGBA buffer as a PNG file with the mapping described in tEXt
/// chunks.
pub fn export_png(buffer: &RenderBuffer, path: &Path, metadata: &ExportMetadata) -> crate::Result<()> {
    let file = std::fs::File::create(path)
        .map_err(|e| RenderError::Export(format!("failed to create file: {e}")))?;
    let writer = BufWriter::new(file);

    let mut encoder = png::Encoder::new(writer, buffer.width(), buffer.height());
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    encoder.set_compression(png::Compression::Default);

    encoder
        .add_text_chunk("Software".to_string(), "ZMapper".to_string())
        .map_err(|e| RenderError::Export(format!("failed to add text chunk: {e}")))?;
    encoder
        .add_text_chunk("Title".to_string(), metadata.title.clone())
        .map_err(|e| RenderError::Export(format!("failed to add text chunk: {e}")))?;

    for (key, value) in build_metadata_pairs(metadata) {
        encoder
            .add_text_chunk(key.clone(), value)
            .map_err(|e| RenderError::Export(format!("failed to add text chunk '{key}': {e}")))?;
    }

    let mut png_writer = encoder
        .write_header()
        .map_err(|e| RenderError::Export(format!("failed to write PNG header: {e}")))?;
    png_writer
        .write_image_data(buffer.pixels())
        .map_err(|e| RenderError::Export(format!("failed to write PNG image data: {e}")))?;

    debug!(
        "Exported PNG {}x{} to {}",
        buffer.width(),
        buffer.height(),
        path.display()
    );
    Ok(())
}

fn format_complex(z: Complex) -> String {
    if z.im < 0.0 {
        format!("{}-{}i", z.re, -z.im)
    } else {
        format!("{}+{}i", z.re, z.im)
    }
}

fn format_rect(r: &PlaneRect) -> String {
    format!("[{}, {}] x [{}, {}]", r.x_min, r.x_max, r.y_min, r.y_max)
}

fn build_metadata_pairs(meta: &ExportMetadata) -> Vec<(String, String)> {
    let mut pairs = vec![
        ("ZMapper.Formula".to_string(), meta.formula.clone()),
        ("ZMapper.GridExtent".to_string(), format_rect(&meta.grid_extent)),
    ];
    for (name, value) in meta.parameters.iter() {
        pairs.push((format!("ZMapper.Param.{name}"), format_complex(value)));
    }
    if let Some(view) = &meta.view {
        pairs.push(("ZMapper.View".to_string(), format_rect(view)));
    }
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    fn meta() -> ExportMetadata {
        let params: ParamValues = [("a", Complex::new(1.5, -0.25)), ("w", Complex::ONE)]
            .into_iter()
            .collect();
        ExportMetadata::new("a*sin(w*z)", params, PlaneRect::new(-1.0, 1.0, -0.5, 0.5))
    }

    #[test]
    fn export_creates_valid_png() {
        let buf = RenderBuffer::new(4, 4).unwrap();
        let dir = std::env::temp_dir().join("zmapper_test_export");
        let _ = std::fs::create_dir_all(&dir);
        let path = dir.join("test_export.png");
        export_png(&buf, &path, &meta()).expect("export should succeed");

        let mut file = std::fs::File::open(&path).expect("file should exist");
        let mut header = [0u8; 8];
        file.read_exact(&mut header).expect("should read header");
        assert_eq!(&header, b"\x89PNG\r\n\x1a\n", "valid PNG signature");

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn export_embeds_text_chunks() {
        let buf = RenderBuffer::new(2, 2).unwrap();
        let dir = std::env::temp_dir().join("zmapper_test_export_meta");
        let _ = std::fs::create_dir_all(&dir);
        let path = dir.join("test_meta.png");
        export_png(&buf, &path, &meta()).expect("export should succeed");

        let decoder = png::Decoder::new(std::fs::File::open(&path).expect("file should exist"));
        let reader = decoder.read_info().expect("should read info");
        let texts: Vec<_> = reader.info().uncompressed_latin1_text.iter().collect();
        assert!(texts
            .iter()
            .any(|t| t.keyword == "Software" && t.text == "ZMapper"));
        assert!(texts
            .iter()
            .any(|t| t.keyword == "ZMapper.Formula" && t.text == "a*sin(w*z)"));
        assert!(texts
            .iter()
            .any(|t| t.keyword == "ZMapper.Param.a" && t.text == "1.5-0.25i"));
        assert!(texts
            .iter()
            .any(|t| t.keyword == "ZMapper.GridExtent" && t.text == "[-1, 1] x [-0.5, 0.5]"));

        let _ = std::fs::remove_dir_all(&dir);
    }
}
