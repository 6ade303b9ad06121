use crate::error::{BoardError, Result};
use crate::layout::TagBoardLayout;
use crate::surface::{Rect, Surface};
use crate::tag_codes::CodeTable;
use ab_glyph::{Font, FontVec, PxScale, ScaleFont};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_ellipse_mut, draw_text_mut};
use std::path::Path;
use tagboard_common::Color;

fn rgb(color: Color) -> Rgb<u8> {
    Rgb([color.r, color.g, color.b])
}

/// Surface backed by an RGB raster; anything outside the canvas is clipped
pub struct ImageSurface {
    image: RgbImage,
    origin: (i32, i32),
    saved: Vec<(i32, i32)>,
    font: Option<FontVec>,
}

impl ImageSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbImage::new(width, height),
            origin: (0, 0),
            saved: Vec::new(),
            font: None,
        }
    }

    /// Canvas sized to fit a board
    pub fn for_layout<C: CodeTable>(layout: &TagBoardLayout<C>) -> Self {
        let (width, height) = layout.canvas_size();
        Self::new(width, height)
    }

    pub fn with_font(mut self, font: FontVec) -> Self {
        self.font = Some(font);
        self
    }

    /// Load a TrueType/OpenType font for `draw_text`
    pub fn load_font(path: impl AsRef<Path>) -> Result<FontVec> {
        let path = path.as_ref();
        let data = std::fs::read(path)?;
        FontVec::try_from_vec(data)
            .map_err(|e| BoardError::Font(format!("{}: {}", path.display(), e)))
    }

    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    pub fn into_image(self) -> RgbImage {
        self.image
    }
}

impl Surface for ImageSurface {
    fn save(&mut self) {
        self.saved.push(self.origin);
    }

    fn restore(&mut self) {
        if let Some(origin) = self.saved.pop() {
            self.origin = origin;
        }
    }

    fn translate(&mut self, dx: i32, dy: i32) {
        self.origin = (self.origin.0.saturating_add(dx), self.origin.1.saturating_add(dy));
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        if rect.is_empty() {
            return;
        }
        let rect = rect.translated(self.origin.0, self.origin.1);
        let area = imageproc::rect::Rect::at(rect.x, rect.y).of_size(rect.width, rect.height);
        draw_filled_rect_mut(&mut self.image, area, rgb(color));
    }

    fn draw_ellipse(&mut self, bounds: Rect, color: Color) -> Result<()> {
        let bounds = bounds.translated(self.origin.0, self.origin.1);
        let (rx, ry) = ((bounds.width / 2) as i32, (bounds.height / 2) as i32);
        let center = (bounds.x.saturating_add(rx), bounds.y.saturating_add(ry));
        draw_hollow_ellipse_mut(&mut self.image, center, rx, ry, rgb(color));
        Ok(())
    }

    fn draw_text(&mut self, x: i32, y: i32, size: f32, text: &str, color: Color) -> Result<()> {
        let font = self.font.as_ref().ok_or(BoardError::Unsupported("text without a font"))?;
        let scale = PxScale::from(size);
        // imageproc anchors text at its top edge, callers give the baseline
        let ascent = font.as_scaled(scale).ascent().round() as i32;
        draw_text_mut(
            &mut self.image,
            rgb(color),
            x.saturating_add(self.origin.0),
            y.saturating_add(self.origin.1).saturating_sub(ascent),
            scale,
            font,
            text,
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decorations::{paint_drill_holes, paint_label, DrillHoleGuide, LabelStyle};
    use crate::tag_codes::StaticCodeTable;
    use tagboard_common::{BoardConfig, Palette};

    const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
    const BLACK: Rgb<u8> = Rgb([0, 0, 0]);

    fn board(code: u64) -> TagBoardLayout<StaticCodeTable> {
        let config = BoardConfig {
            start_id: 0,
            border: 1,
            corner_box: 1,
            padding: 4,
            cols: 1,
            rows: 1,
            unit_pixels: 3,
        };
        let codes = StaticCodeTable::new("test", 36, vec![code]).unwrap();
        TagBoardLayout::new(config, Palette::default(), codes).unwrap()
    }

    #[test]
    fn test_canvas_size() {
        let layout = board(0);
        let surface = ImageSurface::for_layout(&layout);
        // 1 tag of 8 cells + 2 corner boxes, 3px per cell, 4px padding
        assert_eq!(surface.image().dimensions(), (10 * 3 + 8, 10 * 3 + 8));
    }

    #[test]
    fn test_board_pixels() {
        let layout = board((1 << 36) - 1);
        let mut surface = ImageSurface::for_layout(&layout);
        layout.paint_board(&mut surface).unwrap();
        let img = surface.into_image();

        // Padding
        assert_eq!(*img.get_pixel(0, 0), WHITE);
        // Top-left corner box
        assert_eq!(*img.get_pixel(4, 4), BLACK);
        assert_eq!(*img.get_pixel(6, 6), BLACK);
        // Tag border starts one corner box in
        assert_eq!(*img.get_pixel(7, 7), BLACK);
        // Data area starts one border cell further, all bits set
        assert_eq!(*img.get_pixel(10, 10), WHITE);
        assert_eq!(*img.get_pixel(27, 27), WHITE);
        // Opposite border and corner box
        assert_eq!(*img.get_pixel(29, 29), BLACK);
        assert_eq!(*img.get_pixel(33, 33), BLACK);
        assert_eq!(*img.get_pixel(37, 37), WHITE);
    }

    #[test]
    fn test_zero_code_fills_data_area() {
        let layout = board(0);
        let mut surface = ImageSurface::for_layout(&layout);
        layout.paint_board(&mut surface).unwrap();
        let img = surface.image();
        for y in 10..28 {
            for x in 10..28 {
                assert_eq!(*img.get_pixel(x, y), BLACK);
            }
        }
    }

    #[test]
    fn test_fill_is_clipped() {
        let mut surface = ImageSurface::new(4, 4);
        surface.translate(2, 2);
        surface.fill_rect(Rect::square(0, 0, 10), Color::WHITE);
        surface.fill_rect(Rect::square(-50, -50, 2), Color::WHITE);
        let img = surface.image();
        assert_eq!(*img.get_pixel(3, 3), WHITE);
        assert_eq!(*img.get_pixel(1, 1), BLACK);
    }

    #[test]
    fn test_far_tag_is_clipped() {
        let layout = board(0);
        let mut surface = ImageSurface::new(8, 8);
        layout.paint_tag(&mut surface, 0, i32::MAX - 5, i32::MAX - 5).unwrap();
        assert!(surface.image().pixels().all(|p| *p == BLACK));
        assert!(surface.saved.is_empty());
    }

    #[test]
    fn test_drill_holes_drawn() {
        let mut surface = ImageSurface::new(1000, 1000);
        paint_drill_holes(&mut surface, &DrillHoleGuide::default()).unwrap();
        assert_eq!(*surface.image().get_pixel(201, 25), Rgb([255, 0, 0]));
    }

    #[test]
    fn test_label_needs_font() {
        let layout = board(0);
        let mut surface = ImageSurface::new(1000, 1000);
        let result = paint_label(&mut surface, &layout, &LabelStyle::default());
        assert!(matches!(result, Err(BoardError::Unsupported(_))));
        assert!(surface.saved.is_empty());
    }

    #[test]
    fn test_bad_font_file() {
        let path = std::env::temp_dir().join("board_gen_not_a_font.ttf");
        std::fs::write(&path, b"not a font").unwrap();
        let result = ImageSurface::load_font(&path);
        assert!(matches!(result, Err(BoardError::Font(_))));
        let _ = std::fs::remove_file(&path);
    }
}
