use anyhow::Result;
use ::image::RgbImage;
use printpdf::*;

const MM_PER_INCH: f32 = 25.4;

/// Wraps a rendered board in a single-page PDF that prints at a fixed DPI
pub struct PdfGenerator {
    title: String,
    dpi: f32,
}

impl PdfGenerator {
    pub fn new(title: impl Into<String>, dpi: f32) -> Self {
        Self {
            title: title.into(),
            dpi,
        }
    }

    /// Page size in millimeters for an image of the given pixel size
    pub fn page_size_mm(&self, width_px: u32, height_px: u32) -> (f32, f32) {
        (
            width_px as f32 / self.dpi * MM_PER_INCH,
            height_px as f32 / self.dpi * MM_PER_INCH,
        )
    }

    pub fn generate(&self, board: &RgbImage, output_path: &str) -> Result<()> {
        if !(self.dpi > 0.0) {
            anyhow::bail!("DPI must be positive, got {}", self.dpi);
        }
        let (width_mm, height_mm) = self.page_size_mm(board.width(), board.height());

        let (doc, page1, layer1) = PdfDocument::new(
            self.title.as_str(),
            Mm(width_mm),
            Mm(height_mm),
            "Layer 1"
        );
        let layer = doc.get_page(page1).get_layer(layer1);

        // printpdf bundles its own image crate version
        let raw = printpdf::image_crate::RgbImage::from_raw(board.width(), board.height(), board.as_raw().clone())
            .ok_or_else(|| anyhow::anyhow!("Failed to convert board image"))?;
        let dynamic_img = printpdf::image_crate::DynamicImage::ImageRgb8(raw);
        let image = Image::from_dynamic_image(&dynamic_img);

        image.add_to_layer(
            layer.clone(),
            ImageTransform {
                translate_x: Some(Mm(0.0)),
                translate_y: Some(Mm(0.0)),
                dpi: Some(self.dpi),
                ..Default::default()
            },
        );

        doc.save(&mut std::io::BufWriter::new(
            std::fs::File::create(output_path)?
        ))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_size() {
        let generator = PdfGenerator::new("board", 254.0);
        let (width, height) = generator.page_size_mm(1000, 500);
        assert!((width - 100.0).abs() < 1e-3);
        assert!((height - 50.0).abs() < 1e-3);
    }

    #[test]
    fn test_rejects_zero_dpi() {
        let generator = PdfGenerator::new("board", 0.0);
        let path = std::env::temp_dir().join("board_gen_zero_dpi.pdf");
        let result = generator.generate(&RgbImage::new(2, 2), path.to_str().unwrap());
        assert!(result.is_err());
        assert!(!path.exists());
    }
}
